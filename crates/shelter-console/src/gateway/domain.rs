use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder the backend writes into blockchain fields when anchoring is switched off.
pub const BLOCKCHAIN_DISABLED_SENTINEL: &str = "N/A - Blockchain disabled";

/// Situational tags understood by the scoring model. Serialized as the exact labels the
/// backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCircumstance {
    #[serde(rename = "Domestic Violence Survivor")]
    DomesticViolenceSurvivor,
    #[serde(rename = "Homeless for 6+ months")]
    LongTermHomeless,
    #[serde(rename = "Veteran")]
    Veteran,
    #[serde(rename = "Recent Refugee")]
    RecentRefugee,
    #[serde(rename = "Medical Emergency")]
    MedicalEmergency,
    #[serde(rename = "Natural Disaster Victim")]
    NaturalDisasterVictim,
    #[serde(rename = "Job Loss due to COVID-19")]
    CovidJobLoss,
}

impl SpecialCircumstance {
    /// Display order used by intake forms.
    pub const ALL: [SpecialCircumstance; 7] = [
        SpecialCircumstance::DomesticViolenceSurvivor,
        SpecialCircumstance::LongTermHomeless,
        SpecialCircumstance::Veteran,
        SpecialCircumstance::RecentRefugee,
        SpecialCircumstance::MedicalEmergency,
        SpecialCircumstance::NaturalDisasterVictim,
        SpecialCircumstance::CovidJobLoss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SpecialCircumstance::DomesticViolenceSurvivor => "Domestic Violence Survivor",
            SpecialCircumstance::LongTermHomeless => "Homeless for 6+ months",
            SpecialCircumstance::Veteran => "Veteran",
            SpecialCircumstance::RecentRefugee => "Recent Refugee",
            SpecialCircumstance::MedicalEmergency => "Medical Emergency",
            SpecialCircumstance::NaturalDisasterVictim => "Natural Disaster Victim",
            SpecialCircumstance::CovidJobLoss => "Job Loss due to COVID-19",
        }
    }

    /// Shell-friendly alias accepted wherever a label is parsed.
    pub fn slug(self) -> &'static str {
        match self {
            SpecialCircumstance::DomesticViolenceSurvivor => "domestic-violence",
            SpecialCircumstance::LongTermHomeless => "long-term-homeless",
            SpecialCircumstance::Veteran => "veteran",
            SpecialCircumstance::RecentRefugee => "recent-refugee",
            SpecialCircumstance::MedicalEmergency => "medical-emergency",
            SpecialCircumstance::NaturalDisasterVictim => "natural-disaster",
            SpecialCircumstance::CovidJobLoss => "covid-job-loss",
        }
    }
}

impl fmt::Display for SpecialCircumstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpecialCircumstance {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        SpecialCircumstance::ALL
            .into_iter()
            .find(|tag| {
                tag.label().eq_ignore_ascii_case(value) || tag.slug().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| {
                let known: Vec<&str> = SpecialCircumstance::ALL
                    .iter()
                    .map(|tag| tag.slug())
                    .collect();
                format!(
                    "unknown special circumstance '{raw}' (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}

/// Priority band assigned by the backend from the vulnerability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw {
            "CRITICAL" => Some(Priority::Critical),
            "HIGH" => Some(Priority::High),
            "MEDIUM" => Some(Priority::Medium),
            "LOW" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Household snapshot scored by the vulnerability model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    #[serde(deserialize_with = "deserialize_percent")]
    pub poverty_level: u8,
    pub unemployment_duration: u32,
    #[serde(deserialize_with = "deserialize_family_size")]
    pub family_size: u32,
    #[serde(default)]
    pub has_disability: bool,
    #[serde(default)]
    pub is_elderly: bool,
    #[serde(default)]
    pub is_single_parent: bool,
    #[serde(default)]
    pub minority_status: bool,
    #[serde(default)]
    pub special_circumstances: Vec<SpecialCircumstance>,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            poverty_level: 50,
            unemployment_duration: 6,
            family_size: 2,
            has_disability: false,
            is_elderly: false,
            is_single_parent: false,
            minority_status: false,
            special_circumstances: Vec::new(),
        }
    }
}

/// Payload for `POST /shelter/allocate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub applicant_id: String,
    pub shelter_unit_id: String,
    pub applicant_data: ApplicantProfile,
}

/// On-chain anchoring details attached to allocation records.
///
/// Flags the backend may omit stay `None` so a decoded body encodes back to the same keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockchainTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockchainTransaction {
    pub fn recorded(&self) -> bool {
        self.success.unwrap_or(false)
    }

    pub fn disabled(&self) -> bool {
        self.blockchain_disabled.unwrap_or(false)
    }

    /// Transaction hash, unless anchoring was disabled for this record.
    pub fn anchored_hash(&self) -> Option<&str> {
        self.anchored(self.transaction_hash.as_deref())
    }

    /// Explorer link, unless anchoring was disabled for this record.
    pub fn anchored_url(&self) -> Option<&str> {
        self.anchored(self.verification_url.as_deref())
    }

    pub fn status_label(&self) -> &'static str {
        if self.recorded() {
            "Recorded"
        } else {
            "Failed"
        }
    }

    fn anchored<'a>(&self, value: Option<&'a str>) -> Option<&'a str> {
        if self.disabled() {
            return None;
        }
        value.filter(|raw| !raw.is_empty() && *raw != BLOCKCHAIN_DISABLED_SENTINEL)
    }
}

/// Response of `POST /shelter/allocate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub applicant_id: String,
    pub shelter_unit_id: String,
    #[serde(deserialize_with = "deserialize_percent")]
    pub vulnerability_score: u8,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_transaction: Option<BlockchainTransaction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `POST /shelter/test-prediction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    #[serde(deserialize_with = "deserialize_percent")]
    pub vulnerability_score: u8,
    pub priority: Priority,
    pub prediction_method: String,
    pub applicant_data: ApplicantProfile,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /shelter/allocation/{id}`. Every field is optional because the lookup
/// view tolerates partially recorded allocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelter_unit_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_percent",
        skip_serializing_if = "Option::is_none"
    )]
    pub vulnerability_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_transaction: Option<BlockchainTransaction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AllocationRecord {
    pub fn verified(&self) -> bool {
        self.success.unwrap_or(false)
    }

    pub fn blockchain_disabled(&self) -> bool {
        self.blockchain_disabled.unwrap_or(false)
    }

    pub fn status_label(&self) -> &'static str {
        if self.verified() {
            "Verified"
        } else {
            "Pending"
        }
    }

    /// Recording time, accepting RFC 3339 as well as naive ISO-8601 timestamps.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}

/// Aggregate counters from `GET /shelter/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_stats: Option<BlockchainStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_model_loaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SystemStats {
    pub fn model_loaded(&self) -> bool {
        self.ml_model_loaded.unwrap_or(false)
    }

    pub fn blockchain_allocations(&self) -> u64 {
        self.blockchain_stats
            .as_ref()
            .and_then(|stats| stats.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockchainStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Model availability from `GET /shelter/model-status`; extra fields are kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_model_loaded: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelStatus {
    pub fn model_loaded(&self) -> bool {
        self.ml_model_loaded.unwrap_or(false)
    }
}

fn percent_from(value: f64) -> Option<u8> {
    let rounded = value.round();
    (0.0..=100.0).contains(&rounded).then_some(rounded as u8)
}

pub(crate) fn deserialize_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    percent_from(value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected a value between 0 and 100, got {value}"))
    })
}

pub(crate) fn deserialize_optional_percent<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<f64>::deserialize(deserializer)?;
    opt.map(|value| {
        percent_from(value).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a value between 0 and 100, got {value}"))
        })
    })
    .transpose()
}

fn deserialize_family_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    if value == 0 {
        return Err(serde::de::Error::custom("family_size must be at least 1"));
    }
    Ok(value)
}
