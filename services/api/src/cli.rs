use crate::commands::{
    run_allocate, run_assess, run_dashboard, run_lookup, AllocateArgs, LookupArgs, ProfileArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use shelter_console::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Shelter Allocation Console",
    about = "Allocate shelter units and inspect vulnerability scoring from the command line",
    version
)]
struct Cli {
    /// Override the configured shelter backend base URL
    #[arg(long, global = true)]
    gateway_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the dashboard HTTP service (default command)
    Serve(ServeArgs),
    /// Show system stats and model availability
    Dashboard,
    /// Allocate a shelter unit to an applicant
    Allocate(AllocateArgs),
    /// Run a test vulnerability prediction for a household profile
    Assess(ProfileArgs),
    /// Look up a recorded allocation by applicant id
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let gateway_url = cli.gateway_url;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, gateway_url).await,
        Command::Dashboard => run_dashboard(gateway_url).await,
        Command::Allocate(args) => run_allocate(args, gateway_url).await,
        Command::Assess(args) => run_assess(args, gateway_url).await,
        Command::Lookup(args) => run_lookup(args, gateway_url).await,
    }
}
