//! Client for the remote shelter allocation backend.
//!
//! Five JSON-over-HTTP operations share one failure contract: transport errors keep the
//! transport's message, non-2xx responses surface the backend `detail` (or a synthesized
//! `HTTP <status>: <reason>` line), and 2xx bodies must decode into the typed records below.

pub mod client;
pub mod domain;
pub mod error;

pub use client::{HttpShelterGateway, ShelterGateway};
pub use domain::{
    AllocationRecord, AllocationRequest, AllocationResult, ApplicantProfile, AssessmentResult,
    BlockchainStats, BlockchainTransaction, ModelStatus, Priority, SpecialCircumstance,
    SystemStats, BLOCKCHAIN_DISABLED_SENTINEL,
};
pub use error::GatewayError;
