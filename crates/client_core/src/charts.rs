//! Shapes dashboard aggregates into render-ready rows. The maps arrive
//! unordered, so every view sorts deterministically (value descending with a
//! label tiebreak) before truncating.

use std::collections::HashMap;

use shared::dashboard::ExclusivityBreakdown;

/// Bar charts show the top entries only.
pub const BAR_LIMIT: usize = 8;
/// The risk-by-sport table keeps the busiest sports.
pub const RISK_TABLE_LIMIT: usize = 10;
/// Monthly volume shows a trailing year.
pub const MONTHLY_WINDOW: usize = 12;

pub const PERCENTILE_KEYS: [&str; 4] = ["p25", "p50", "p75", "p90"];

/// Entries sorted by value descending; equal values fall back to label order
/// so the chart is stable across refreshes.
pub fn sorted_entries(map: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = map
        .iter()
        .map(|(label, value)| (label.clone(), *value))
        .collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    entries
}

pub fn top_entries(map: &HashMap<String, f64>, limit: usize) -> Vec<(String, f64)> {
    let mut entries = sorted_entries(map);
    entries.truncate(limit);
    entries
}

/// Scale denominator for bar widths. Clamped to 1 so an all-zero map never
/// divides by zero.
pub fn bar_max(map: &HashMap<String, f64>) -> f64 {
    map.values().copied().fold(1.0_f64, f64::max)
}

/// Percentile cards in display order; missing keys render as zero.
pub fn percentile_cards(percentiles: &HashMap<String, f64>) -> [(&'static str, f64); 4] {
    PERCENTILE_KEYS.map(|key| (key, percentiles.get(key).copied().unwrap_or(0.0)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskRow {
    pub sport: String,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl RiskRow {
    pub fn total(&self) -> f64 {
        self.low + self.medium + self.high
    }
}

/// Risk-by-sport table rows, busiest sports first. The service has emitted
/// both capitalized and lowercase level keys over time, so both spellings
/// are read.
pub fn risk_by_sport_rows(risk_by_sport: &HashMap<String, HashMap<String, f64>>) -> Vec<RiskRow> {
    let mut rows: Vec<RiskRow> = risk_by_sport
        .iter()
        .map(|(sport, levels)| RiskRow {
            sport: sport.clone(),
            low: level_count(levels, "Low", "low"),
            medium: level_count(levels, "Medium", "medium"),
            high: level_count(levels, "High", "high"),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total()
            .partial_cmp(&a.total())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.sport.cmp(&b.sport))
    });
    rows.truncate(RISK_TABLE_LIMIT);
    rows
}

fn level_count(levels: &HashMap<String, f64>, key: &str, fallback: &str) -> f64 {
    levels
        .get(key)
        .or_else(|| levels.get(fallback))
        .copied()
        .unwrap_or(0.0)
}

/// Monthly volume in chronological order, trailing window only. Month keys
/// are `YYYY-MM`, so lexicographic order is chronological.
pub fn monthly_volume(volume: &HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = volume
        .iter()
        .map(|(month, count)| (month.clone(), *count))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    if entries.len() > MONTHLY_WINDOW {
        entries.drain(..entries.len() - MONTHLY_WINDOW);
    }
    entries
}

/// Share of extracted deals with an exclusivity clause, as a whole percent.
pub fn exclusivity_rate(breakdown: &ExclusivityBreakdown) -> u32 {
    let total = breakdown.exclusive + breakdown.non_exclusive;
    if total == 0 {
        return 0;
    }
    ((breakdown.exclusive as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
#[path = "tests/charts_tests.rs"]
mod tests;
