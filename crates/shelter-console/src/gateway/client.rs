use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::domain::{
    AllocationRecord, AllocationRequest, AllocationResult, ApplicantProfile, AssessmentResult,
    ModelStatus, SystemStats,
};
use super::error::GatewayError;
use crate::config::GatewayConfig;

/// The five backend operations the console depends on. Every call is attempted exactly once;
/// callers decide what to do with a failure.
#[async_trait]
pub trait ShelterGateway: Send + Sync {
    async fn allocate_shelter(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationResult, GatewayError>;

    async fn test_prediction(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<AssessmentResult, GatewayError>;

    async fn get_stats(&self) -> Result<SystemStats, GatewayError>;

    async fn get_model_status(&self) -> Result<ModelStatus, GatewayError>;

    async fn get_allocation(&self, applicant_id: &str) -> Result<AllocationRecord, GatewayError>;
}

/// `reqwest`-backed gateway speaking JSON to the allocation backend.
#[derive(Debug, Clone)]
pub struct HttpShelterGateway {
    base_url: Url,
    client: Client,
}

impl HttpShelterGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(GatewayError::transport)?;

        Ok(Self::with_client(config.base_url.clone(), client))
    }

    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn exchange<T>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|err| {
            warn!(operation, error = %err, "shelter backend unreachable");
            GatewayError::transport(err)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            warn!(operation, %status, error = %err, "failed to read shelter backend response");
            GatewayError::transport(err)
        })?;

        if !status.is_success() {
            let err = GatewayError::from_status(status, &body);
            warn!(operation, %status, error = %err, "shelter backend rejected request");
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|err| {
            warn!(operation, %status, error = %err, "unexpected shelter backend payload");
            GatewayError::Schema {
                status: status.as_u16(),
                message: format!("unexpected {operation} response: {err}"),
            }
        })
    }
}

#[async_trait]
impl ShelterGateway for HttpShelterGateway {
    async fn allocate_shelter(
        &self,
        request: &AllocationRequest,
    ) -> Result<AllocationResult, GatewayError> {
        let url = self.endpoint(&["shelter", "allocate"]);
        debug!(%url, applicant_id = %request.applicant_id, "allocating shelter unit");
        self.exchange("allocate", self.client.post(url).json(request))
            .await
    }

    async fn test_prediction(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<AssessmentResult, GatewayError> {
        let url = self.endpoint(&["shelter", "test-prediction"]);
        debug!(%url, "requesting vulnerability prediction");
        self.exchange("test-prediction", self.client.post(url).json(profile))
            .await
    }

    async fn get_stats(&self) -> Result<SystemStats, GatewayError> {
        let url = self.endpoint(&["shelter", "stats"]);
        debug!(%url, "fetching system stats");
        self.exchange("stats", self.client.get(url)).await
    }

    async fn get_model_status(&self) -> Result<ModelStatus, GatewayError> {
        let url = self.endpoint(&["shelter", "model-status"]);
        debug!(%url, "fetching model status");
        self.exchange("model-status", self.client.get(url)).await
    }

    async fn get_allocation(&self, applicant_id: &str) -> Result<AllocationRecord, GatewayError> {
        let url = self.endpoint(&["shelter", "allocation", applicant_id]);
        debug!(%url, "looking up allocation");
        self.exchange("allocation", self.client.get(url)).await
    }
}
