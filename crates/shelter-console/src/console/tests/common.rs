use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Map, Value};

use crate::console::AllocationConsole;
use crate::gateway::{
    AllocationRecord, AllocationRequest, AllocationResult, ApplicantProfile, AssessmentResult,
    BlockchainStats, BlockchainTransaction, GatewayError, ModelStatus, Priority, ShelterGateway,
    SpecialCircumstance, SystemStats,
};

/// Gateway double returning canned outcomes and recording every call it receives.
#[derive(Clone)]
pub(super) struct ScriptedGateway {
    pub(super) allocation: Result<AllocationResult, GatewayError>,
    pub(super) assessment: Result<AssessmentResult, GatewayError>,
    pub(super) stats: Result<SystemStats, GatewayError>,
    pub(super) model_status: Result<ModelStatus, GatewayError>,
    pub(super) lookup: Result<AllocationRecord, GatewayError>,
    pub(super) calls: Arc<Mutex<Vec<String>>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            allocation: Ok(allocation_result()),
            assessment: Ok(assessment_result(scenario_profile())),
            stats: Ok(system_stats()),
            model_status: Ok(model_status()),
            lookup: Ok(allocation_record()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ScriptedGateway {
    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl ShelterGateway for ScriptedGateway {
    async fn allocate_shelter(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationResult, GatewayError> {
        self.record(format!(
            "allocate:{}:{}",
            request.applicant_id, request.shelter_unit_id
        ));
        self.allocation.clone()
    }

    async fn test_prediction(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<AssessmentResult, GatewayError> {
        self.record(format!("predict:{}", profile.poverty_level));
        self.assessment.clone()
    }

    async fn get_stats(&self) -> Result<SystemStats, GatewayError> {
        self.record("stats".to_string());
        self.stats.clone()
    }

    async fn get_model_status(&self) -> Result<ModelStatus, GatewayError> {
        self.record("model-status".to_string());
        self.model_status.clone()
    }

    async fn get_allocation(&self, applicant_id: &str) -> Result<AllocationRecord, GatewayError> {
        self.record(format!("lookup:{applicant_id}"));
        self.lookup.clone()
    }
}

pub(super) fn console_with(gateway: ScriptedGateway) -> AllocationConsole<ScriptedGateway> {
    AllocationConsole::new(Arc::new(gateway))
}

pub(super) fn scenario_profile() -> ApplicantProfile {
    ApplicantProfile {
        poverty_level: 90,
        unemployment_duration: 12,
        family_size: 5,
        has_disability: true,
        is_elderly: false,
        is_single_parent: false,
        minority_status: false,
        special_circumstances: vec![SpecialCircumstance::Veteran],
    }
}

pub(super) fn assessment_result(profile: ApplicantProfile) -> AssessmentResult {
    AssessmentResult {
        vulnerability_score: 87,
        priority: Priority::Critical,
        prediction_method: "ml_model".to_string(),
        applicant_data: profile,
        extra: Map::new(),
    }
}

pub(super) fn blockchain_transaction() -> BlockchainTransaction {
    BlockchainTransaction {
        success: Some(true),
        transaction_hash: Some("0x5f2c".to_string()),
        verification_url: Some("https://explorer.test/tx/0x5f2c".to_string()),
        blockchain_disabled: Some(false),
        error: None,
        extra: Map::new(),
    }
}

pub(super) fn allocation_result() -> AllocationResult {
    AllocationResult {
        applicant_id: "APP-1001".to_string(),
        shelter_unit_id: "UNIT-7".to_string(),
        vulnerability_score: 72,
        priority: Priority::High,
        blockchain_transaction: Some(blockchain_transaction()),
        extra: Map::new(),
    }
}

pub(super) fn allocation_record() -> AllocationRecord {
    AllocationRecord {
        applicant_id: Some("APP-1001".to_string()),
        shelter_unit_id: Some("UNIT-7".to_string()),
        vulnerability_score: Some(72),
        priority: Some(Priority::High),
        success: Some(true),
        timestamp: Some("2025-05-14T09:12:00".to_string()),
        blockchain_disabled: None,
        blockchain_transaction: Some(blockchain_transaction()),
        extra: Map::new(),
    }
}

pub(super) fn system_stats() -> SystemStats {
    SystemStats {
        blockchain_stats: Some(BlockchainStats {
            count: Some(41),
            extra: Map::new(),
        }),
        ml_model_loaded: Some(true),
        blockchain_enabled: Some(true),
        system_status: Some("operational".to_string()),
        extra: Map::new(),
    }
}

pub(super) fn model_status() -> ModelStatus {
    let mut extra = Map::new();
    extra.insert("model_version".to_string(), Value::from("2.3.1"));
    ModelStatus {
        ml_model_loaded: Some(true),
        extra,
    }
}

pub(super) fn network_down() -> GatewayError {
    GatewayError::transport("error sending request: connection refused")
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
