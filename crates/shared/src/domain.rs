use serde::{Deserialize, Serialize};

/// Athlete details collected by the wizard before upload. Ephemeral:
/// lives only for the duration of one wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteInfo {
    pub name: String,
    pub email: String,
    pub school: String,
    pub sport: String,
    pub state: String,
    pub consent_to_kb: bool,
}

impl AthleteInfo {
    /// All identifying fields filled in. Gate for leaving the info step;
    /// UX-level validation only, the server revalidates.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.school.trim().is_empty()
            && !self.sport.trim().is_empty()
            && !self.state.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub section: String,
    pub level: RiskLevel,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub explanation: String,
}

/// Analysis result returned by `POST /analyze`. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub id: String,
    pub athlete_name: String,
    pub overall_risk: RiskLevel,
    pub summary: String,
    pub risks: Vec<RiskItem>,
    pub key_terms: Vec<KeyTerm>,
    pub generated_at: String,
}
