//! Page-level controller for the allocation dashboard.
//!
//! `AllocationConsole` owns the single `ConsoleState` of one dashboard activation and is the
//! only thing that mutates it. Gateway failures are caught at the point of invocation and
//! turned into display state; nothing raised by the gateway escapes a console operation.
//!
//! Each dialog has a two-phase `begin_*`/`finish_*` pair so an event loop can keep calls
//! from different dialogs outstanding at the same time; `submit_*` chains the two around
//! the gateway call for callers that just want to await the outcome.

pub mod display;
pub mod input;
pub mod router;
pub mod state;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::gateway::{
    AllocationRecord, AllocationRequest, AllocationResult, ApplicantProfile, AssessmentResult,
    GatewayError, ModelStatus, ShelterGateway, SpecialCircumstance, SystemStats,
};

pub use display::{priority_color, DisplayColor};
pub use router::console_router;
pub use state::{
    AllocationDialog, AssessmentDialog, ConsoleState, LookupDialog, ProfileField, ProfileFlag,
    ProfileForm, Settled,
};

/// Result of the load-time fan-out. Both slots are always populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: Settled<SystemStats>,
    pub model_status: Settled<ModelStatus>,
}

/// Fetch stats and model status concurrently. A failure in one never suppresses the other.
pub async fn load_dashboard<G>(gateway: &G) -> DashboardSnapshot
where
    G: ShelterGateway + ?Sized,
{
    let (stats, model_status) = tokio::join!(gateway.get_stats(), gateway.get_model_status());

    if let Err(err) = &stats {
        warn!(error = %err, "failed to load system stats");
    }
    if let Err(err) = &model_status {
        warn!(error = %err, "failed to load model status");
    }

    DashboardSnapshot {
        stats: Settled::from_result(stats),
        model_status: Settled::from_result(model_status),
    }
}

/// What happened to a submit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Gated off: required input missing or a call for this dialog is already in flight.
    Blocked,
    Succeeded,
    Failed,
}

pub struct AllocationConsole<G> {
    gateway: Arc<G>,
    state: ConsoleState,
}

impl<G> AllocationConsole<G>
where
    G: ShelterGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: ConsoleState::default(),
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Initial activation: fan out the stats/model-status pair.
    pub async fn load(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        let snapshot = load_dashboard(self.gateway.as_ref()).await;
        self.apply_dashboard(snapshot);
    }

    /// Manual refresh repeats the load-time pair.
    pub async fn refresh(&mut self) {
        self.load().await;
    }

    pub fn apply_dashboard(&mut self, snapshot: DashboardSnapshot) {
        self.state.stats = Some(snapshot.stats);
        self.state.model_status = Some(snapshot.model_status);
        self.state.loading = false;
    }

    pub fn dismiss_error(&mut self) {
        self.state.error = None;
    }

    pub fn set_profile_field(&mut self, form: ProfileForm, field: ProfileField, raw: &str) {
        self.state.profile_mut(form).set_numeric(field, raw);
    }

    pub fn set_profile_flag(&mut self, form: ProfileForm, flag: ProfileFlag, value: bool) {
        self.state.profile_mut(form).set_flag(flag, value);
    }

    /// Returns whether the tag is set after the toggle.
    pub fn toggle_special_circumstance(
        &mut self,
        tag: SpecialCircumstance,
        form: ProfileForm,
    ) -> bool {
        self.state.profile_mut(form).toggle_circumstance(tag)
    }

    pub fn open_allocation(&mut self) {
        self.state.allocation.open = true;
    }

    pub fn close_allocation(&mut self) {
        self.state.allocation.open = false;
        self.state.allocation.result = None;
    }

    pub fn set_applicant_id(&mut self, value: impl Into<String>) {
        self.state.allocation.draft.applicant_id = value.into();
    }

    pub fn set_shelter_unit_id(&mut self, value: impl Into<String>) {
        self.state.allocation.draft.shelter_unit_id = value.into();
    }

    /// Snapshot the draft into a request and mark the dialog busy, or `None` when gated.
    pub fn begin_allocation(&mut self) -> Option<AllocationRequest> {
        if !self.state.allocation.can_submit() {
            return None;
        }
        self.state.allocation.in_flight = true;
        Some(self.state.allocation.draft.clone())
    }

    pub fn finish_allocation(
        &mut self,
        outcome: Result<AllocationResult, GatewayError>,
    ) -> Submission {
        self.state.allocation.in_flight = false;
        match outcome {
            Ok(result) => {
                self.state.allocation.result = Some(result);
                Submission::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "allocation failed");
                self.state.error = Some(format!("Allocation failed: {err}"));
                Submission::Failed
            }
        }
    }

    pub async fn submit_allocation(&mut self) -> Submission {
        let Some(request) = self.begin_allocation() else {
            return Submission::Blocked;
        };
        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.allocate_shelter(&request).await;
        self.finish_allocation(outcome)
    }

    pub fn open_assessment(&mut self) {
        self.state.assessment.open = true;
    }

    pub fn close_assessment(&mut self) {
        self.state.assessment.open = false;
        self.state.assessment.result = None;
    }

    pub fn begin_assessment(&mut self) -> Option<ApplicantProfile> {
        if !self.state.assessment.can_submit() {
            return None;
        }
        self.state.assessment.in_flight = true;
        Some(self.state.assessment.draft.clone())
    }

    pub fn finish_assessment(
        &mut self,
        outcome: Result<AssessmentResult, GatewayError>,
    ) -> Submission {
        self.state.assessment.in_flight = false;
        match outcome {
            Ok(result) => {
                self.state.assessment.result = Some(result);
                Submission::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "assessment failed");
                self.state.error = Some(format!("Assessment failed: {err}"));
                Submission::Failed
            }
        }
    }

    pub async fn submit_assessment(&mut self) -> Submission {
        let Some(profile) = self.begin_assessment() else {
            return Submission::Blocked;
        };
        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.test_prediction(&profile).await;
        self.finish_assessment(outcome)
    }

    pub fn open_lookup(&mut self) {
        self.state.lookup.open = true;
    }

    pub fn close_lookup(&mut self) {
        self.state.lookup.open = false;
        self.state.lookup.result = None;
        self.state.lookup.applicant_id.clear();
    }

    pub fn set_lookup_id(&mut self, value: impl Into<String>) {
        self.state.lookup.applicant_id = value.into();
    }

    /// Returns the trimmed applicant id to look up, or `None` when gated.
    pub fn begin_lookup(&mut self) -> Option<String> {
        if !self.state.lookup.can_submit() {
            return None;
        }
        self.state.lookup.in_flight = true;
        Some(self.state.lookup.applicant_id.trim().to_string())
    }

    pub fn finish_lookup(&mut self, outcome: Result<AllocationRecord, GatewayError>) -> Submission {
        self.state.lookup.in_flight = false;
        let submission = match &outcome {
            Ok(_) => Submission::Succeeded,
            Err(err) => {
                warn!(error = %err, "allocation lookup failed");
                self.state.error = Some(format!("Lookup failed: {err}"));
                Submission::Failed
            }
        };
        self.state.lookup.result = Some(Settled::from_result(outcome));
        submission
    }

    pub async fn submit_lookup(&mut self) -> Submission {
        let Some(applicant_id) = self.begin_lookup() else {
            return Submission::Blocked;
        };
        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.get_allocation(&applicant_id).await;
        self.finish_lookup(outcome)
    }
}
