mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use shelter_console::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
