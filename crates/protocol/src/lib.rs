use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HudAction {
    Open,
    Close,
    Update,
    #[serde(other)]
    Unknown,
}

/// A sector's health as sent by the host. Older host builds send a bare
/// number; newer ones wrap it in an object. Both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectorStatus {
    Bare(f64),
    Detailed { health: f64 },
}

impl SectorStatus {
    pub fn health(&self) -> f64 {
        match *self {
            Self::Bare(h) => h,
            Self::Detailed { health } => health,
        }
    }
}

/// Unordered on the wire; kept sorted here so command emission is stable.
pub type SectorMap = BTreeMap<String, SectorStatus>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudMessage {
    pub action: HudAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<SectorMap>,
}

impl HudMessage {
    pub fn new(action: HudAction, sectors: Option<SectorMap>) -> Self {
        Self { action, sectors }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Critical,
    Warning,
    Online,
}

impl Classification {
    /// Thresholds are inclusive on the severe side: exactly 20 is critical,
    /// exactly 50 is warning.
    pub fn from_health(health: f64) -> Self {
        if health <= 20.0 {
            Self::Critical
        } else if health <= 50.0 {
            Self::Warning
        } else {
            Self::Online
        }
    }

    pub fn bar_fill(&self) -> &'static str {
        match self {
            Self::Critical => fills::ALERT,
            Self::Warning => fills::WARNING,
            Self::Online => fills::HEALTHY,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Online => "ONLINE",
        };
        f.write_str(s)
    }
}

/// One rendered sector card. `bar_width_pct` is deliberately unclamped;
/// out-of-range health overflows the bar, which is accepted behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    pub card: String,
    pub bar_width_pct: f64,
    pub label: String,
    pub status: Classification,
    pub critical: bool,
    pub bar_fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum VisualCommand {
    Show,
    Hide,
    Card(CardPatch),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchCrew {
    pub sector: String,
}

pub mod fills {
    pub const ALERT: &str = "#ff3333";
    pub const WARNING: &str = "linear-gradient(90deg, #ffaa00, #ff6600)";
    pub const HEALTHY: &str = "linear-gradient(90deg, #00ff88, #00aaff)";
}

pub mod endpoints {
    pub const CLOSE_UI: &str = "closeUI";
    pub const DISPATCH_CREW: &str = "dispatchCrew";
}
