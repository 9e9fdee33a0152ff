use serde::Serialize;

use crate::gateway::{ModelStatus, Priority, SystemStats};

/// Palette used to tint priority chips and score bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayColor {
    Red,
    Orange,
    Blue,
    Green,
    Neutral,
}

impl DisplayColor {
    pub fn hex(self) -> &'static str {
        match self {
            DisplayColor::Red => "#f44336",
            DisplayColor::Orange => "#ff9800",
            DisplayColor::Blue => "#2196f3",
            DisplayColor::Green => "#4caf50",
            DisplayColor::Neutral => "#666",
        }
    }
}

impl Priority {
    pub fn color(self) -> DisplayColor {
        match self {
            Priority::Critical => DisplayColor::Red,
            Priority::High => DisplayColor::Orange,
            Priority::Medium => DisplayColor::Blue,
            Priority::Low => DisplayColor::Green,
        }
    }
}

/// Total over raw labels: unknown or missing priorities render neutral.
pub fn priority_color(label: Option<&str>) -> DisplayColor {
    label
        .and_then(Priority::from_label)
        .map_or(DisplayColor::Neutral, Priority::color)
}

pub fn model_badge(status: &ModelStatus) -> &'static str {
    if status.model_loaded() {
        "ML Model Ready"
    } else {
        "Fallback Mode"
    }
}

/// `None` when the backend did not report whether anchoring is enabled.
pub fn blockchain_badge(stats: &SystemStats) -> Option<&'static str> {
    stats.blockchain_enabled.map(|enabled| {
        if enabled {
            "Blockchain Enabled"
        } else {
            "Blockchain Disabled"
        }
    })
}

pub fn system_badge(stats: &SystemStats) -> Option<String> {
    stats
        .system_status
        .as_deref()
        .map(|status| format!("System {status}"))
}

pub fn allocation_count_badge(stats: &SystemStats) -> String {
    format!("{} Blockchain Allocations", stats.blockchain_allocations())
}
