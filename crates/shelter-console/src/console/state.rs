use serde::Serialize;

use crate::gateway::{
    AllocationRecord, AllocationRequest, AllocationResult, ApplicantProfile, AssessmentResult,
    GatewayError, ModelStatus, SystemStats,
};

/// Outcome slot that never propagates a failure: it holds either the value or the message.
/// Serialized untagged so a failure is rendered as `{ "error": "<message>" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Settled<T> {
    Ready(T),
    Failed { error: String },
}

impl<T> Settled<T> {
    pub fn from_result(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(value) => Settled::Ready(value),
            Err(err) => Settled::Failed {
                error: err.to_string(),
            },
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Settled::Ready(value) => Some(value),
            Settled::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Settled::Ready(_) => None,
            Settled::Failed { error } => Some(error),
        }
    }
}

/// Which applicant profile draft an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileForm {
    Allocation,
    Assessment,
}

/// Numeric profile inputs that accept free-form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    PovertyLevel,
    UnemploymentDuration,
    FamilySize,
}

/// Checkbox profile inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFlag {
    HasDisability,
    IsElderly,
    IsSingleParent,
    MinorityStatus,
}

/// Allocate dialog: applicant and unit identifiers plus the profile to score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationDialog {
    pub open: bool,
    pub draft: AllocationRequest,
    pub in_flight: bool,
    pub result: Option<AllocationResult>,
}

impl AllocationDialog {
    pub fn can_submit(&self) -> bool {
        !self.in_flight && allocation_ready(&self.draft)
    }
}

/// Both identifiers must be filled in before an allocation may be sent.
pub fn allocation_ready(request: &AllocationRequest) -> bool {
    !request.applicant_id.is_empty() && !request.shelter_unit_id.is_empty()
}

/// Test-prediction dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentDialog {
    pub open: bool,
    pub draft: ApplicantProfile,
    pub in_flight: bool,
    pub result: Option<AssessmentResult>,
}

impl AssessmentDialog {
    pub fn can_submit(&self) -> bool {
        !self.in_flight
    }
}

/// Allocation lookup dialog. A failed lookup keeps its message in `result` so the view can
/// tell "lookup failed" apart from "nothing looked up yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupDialog {
    pub open: bool,
    pub applicant_id: String,
    pub in_flight: bool,
    pub result: Option<Settled<AllocationRecord>>,
}

impl LookupDialog {
    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.applicant_id.trim().is_empty()
    }
}

/// Everything the dashboard renders. Owned by exactly one console.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleState {
    pub loading: bool,
    pub error: Option<String>,
    pub stats: Option<Settled<SystemStats>>,
    pub model_status: Option<Settled<ModelStatus>>,
    pub allocation: AllocationDialog,
    pub assessment: AssessmentDialog,
    pub lookup: LookupDialog,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            stats: None,
            model_status: None,
            allocation: AllocationDialog::default(),
            assessment: AssessmentDialog::default(),
            lookup: LookupDialog::default(),
        }
    }
}

impl ConsoleState {
    pub fn profile(&self, form: ProfileForm) -> &ApplicantProfile {
        match form {
            ProfileForm::Allocation => &self.allocation.draft.applicant_data,
            ProfileForm::Assessment => &self.assessment.draft,
        }
    }

    pub fn profile_mut(&mut self, form: ProfileForm) -> &mut ApplicantProfile {
        match form {
            ProfileForm::Allocation => &mut self.allocation.draft.applicant_data,
            ProfileForm::Assessment => &mut self.assessment.draft,
        }
    }
}
