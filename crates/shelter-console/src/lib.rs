//! Gateway client and console state for the shelter allocation dashboard.

pub mod config;
pub mod console;
pub mod error;
pub mod gateway;
pub mod telemetry;
