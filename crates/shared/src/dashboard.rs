//! Read-only dashboard aggregates computed server-side. The client renders
//! these as received; every nullable field stays `Option` because upstream
//! extraction may be pending, partial, or failed for any given deal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::KeyTerm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSummary {
    pub deal_id: String,
    pub athlete_name: String,
    pub athlete_email: String,
    pub school: String,
    pub sport: String,
    pub state: String,
    pub deal_type: Option<String>,
    pub total_compensation: Option<f64>,
    /// Server casing is not guaranteed ("low" vs "Low"), so this stays a
    /// plain string rather than `RiskLevel`.
    pub overall_risk: Option<String>,
    pub extraction_status: String,
    pub quality_score: Option<f64>,
    pub created_at: String,
}

/// `GET /dashboard/deals` wraps the list in an envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealsPage {
    #[serde(default)]
    pub deals: Vec<DealSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_deals: u64,
    pub deals_by_status: HashMap<String, f64>,
    pub deals_by_sport: HashMap<String, f64>,
    pub deals_by_risk: HashMap<String, f64>,
    pub deals_by_school: HashMap<String, f64>,
    pub total_compensation: f64,
    pub average_compensation: f64,
    pub extraction_success_rate: f64,
    pub average_quality_score: f64,
    pub deals_by_state: HashMap<String, f64>,
    pub deals_by_deal_type: HashMap<String, f64>,
    pub compensation_by_sport: HashMap<String, f64>,
    pub compensation_by_state: HashMap<String, f64>,
    pub compensation_by_deal_type: HashMap<String, f64>,
    pub risk_by_sport: HashMap<String, HashMap<String, f64>>,
    pub compensation_percentiles: HashMap<String, f64>,
    pub monthly_deal_volume: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    pub sports: Vec<String>,
    pub states: Vec<String>,
    pub schools: Vec<String>,
    pub risk_levels: Vec<String>,
    pub deal_types: Vec<String>,
    pub statuses: Vec<String>,
    pub compensation_range: CompensationRange,
}

/// Exclusivity keys arrive snake_case, unlike the rest of the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExclusivityBreakdown {
    pub exclusive: u64,
    pub non_exclusive: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsData {
    pub deals_analyzed: u64,
    pub payor_type_distribution: HashMap<String, f64>,
    pub compensation_type_distribution: HashMap<String, f64>,
    pub exclusivity_breakdown: ExclusivityBreakdown,
    pub perpetual_rights_count: u64,
    pub clawback_count: u64,
    pub clawback_rate: f64,
    pub dispute_resolution_distribution: HashMap<String, f64>,
}

/// Risk entry inside a deal detail. Unlike the wizard report, the level is a
/// free string here because historical extractions predate the enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRisk {
    pub section: String,
    pub level: String,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDetail {
    pub deal_id: String,
    pub athlete_name: String,
    pub athlete_email: String,
    pub school: String,
    pub sport: String,
    pub state: String,
    pub overall_risk: Option<String>,
    pub summary: Option<String>,
    pub risks: Option<Vec<DetailRisk>>,
    pub key_terms: Option<Vec<KeyTerm>>,
    pub extraction_status: String,
    pub extraction_data: Option<serde_json::Map<String, serde_json::Value>>,
    pub quality_score: Option<f64>,
    pub contract_s3_key: Option<String>,
    pub report_s3_key: Option<String>,
    pub extraction_s3_key: Option<String>,
    pub created_at: String,
    pub generated_at: Option<String>,
}

impl DealDetail {
    /// Extraction payload as a map, empty when extraction has not produced
    /// anything yet.
    pub fn extraction(&self) -> serde_json::Map<String, serde_json::Value> {
        self.extraction_data.clone().unwrap_or_default()
    }
}
