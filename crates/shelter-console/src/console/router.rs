use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::state::allocation_ready;
use super::{load_dashboard, DashboardSnapshot};
use crate::error::AppError;
use crate::gateway::{
    AllocationRecord, AllocationRequest, AllocationResult, ApplicantProfile, AssessmentResult,
    ShelterGateway,
};

/// Router exposing the console's gateway operations to a browser front end.
pub fn console_router<G>(gateway: Arc<G>) -> Router
where
    G: ShelterGateway + 'static,
{
    Router::new()
        .route("/api/v1/dashboard", get(dashboard_handler::<G>))
        .route(
            "/api/v1/shelter/allocations",
            post(allocate_handler::<G>),
        )
        .route(
            "/api/v1/shelter/allocations/:applicant_id",
            get(lookup_handler::<G>),
        )
        .route(
            "/api/v1/shelter/assessments",
            post(assessment_handler::<G>),
        )
        .with_state(gateway)
}

pub(crate) async fn dashboard_handler<G>(State(gateway): State<Arc<G>>) -> Json<DashboardSnapshot>
where
    G: ShelterGateway + 'static,
{
    Json(load_dashboard(gateway.as_ref()).await)
}

pub(crate) async fn allocate_handler<G>(
    State(gateway): State<Arc<G>>,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<AllocationResult>, AppError>
where
    G: ShelterGateway + 'static,
{
    if !allocation_ready(&request) {
        return Err(AppError::Incomplete(
            "applicant_id and shelter_unit_id are required",
        ));
    }

    let result = gateway.allocate_shelter(&request).await?;
    Ok(Json(result))
}

pub(crate) async fn assessment_handler<G>(
    State(gateway): State<Arc<G>>,
    Json(profile): Json<ApplicantProfile>,
) -> Result<Json<AssessmentResult>, AppError>
where
    G: ShelterGateway + 'static,
{
    let result = gateway.test_prediction(&profile).await?;
    Ok(Json(result))
}

pub(crate) async fn lookup_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(applicant_id): Path<String>,
) -> Result<Json<AllocationRecord>, AppError>
where
    G: ShelterGateway + 'static,
{
    let applicant_id = applicant_id.trim();
    if applicant_id.is_empty() {
        return Err(AppError::Incomplete("applicant id is required"));
    }

    let record = gateway.get_allocation(applicant_id).await?;
    Ok(Json(record))
}
