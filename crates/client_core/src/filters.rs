//! Client-side filtering of the loaded deals list. Everything is a string
//! because the values bind directly to text inputs and dropdowns; empty
//! means "not set".

use shared::dashboard::DealSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealFilters {
    pub sport: String,
    pub state: String,
    pub school: String,
    pub risk_level: String,
    pub status: String,
    pub deal_type: String,
    pub compensation_min: String,
    pub compensation_max: String,
    pub search_query: String,
}

impl DealFilters {
    /// All active criteria must hold (AND). Selects are exact matches, so a
    /// deal with a missing risk or deal type never matches a selected value.
    /// Unparseable compensation bounds are ignored rather than excluding
    /// everything while the user is still typing.
    pub fn matches(&self, deal: &DealSummary) -> bool {
        if !self.sport.is_empty() && deal.sport != self.sport {
            return false;
        }
        if !self.state.is_empty() && deal.state != self.state {
            return false;
        }
        if !self.risk_level.is_empty() && deal.overall_risk.as_deref() != Some(&self.risk_level) {
            return false;
        }
        if !self.status.is_empty() && deal.extraction_status != self.status {
            return false;
        }
        if !self.deal_type.is_empty() && deal.deal_type.as_deref() != Some(&self.deal_type) {
            return false;
        }
        if !self.school.is_empty() && deal.school != self.school {
            return false;
        }

        if !self.compensation_min.is_empty() {
            if let Ok(min) = self.compensation_min.trim().parse::<f64>() {
                match deal.total_compensation {
                    Some(comp) if comp >= min => {}
                    _ => return false,
                }
            }
        }
        if !self.compensation_max.is_empty() {
            if let Ok(max) = self.compensation_max.trim().parse::<f64>() {
                match deal.total_compensation {
                    Some(comp) if comp <= max => {}
                    _ => return false,
                }
            }
        }

        if !self.search_query.is_empty() {
            let q = self.search_query.to_lowercase();
            return deal.athlete_name.to_lowercase().contains(&q)
                || deal.school.to_lowercase().contains(&q)
                || deal.sport.to_lowercase().contains(&q)
                || deal.state.to_lowercase().contains(&q)
                || deal.deal_id.to_lowercase().contains(&q);
        }
        true
    }

    pub fn apply<'a>(&self, deals: &'a [DealSummary]) -> Vec<&'a DealSummary> {
        deals.iter().filter(|deal| self.matches(deal)).collect()
    }

    /// Number of set criteria shown on the filter toggle. The search box has
    /// its own visible state and is not counted.
    pub fn active_count(&self) -> usize {
        [
            &self.sport,
            &self.state,
            &self.risk_level,
            &self.status,
            &self.deal_type,
            &self.school,
            &self.compensation_min,
            &self.compensation_max,
        ]
        .into_iter()
        .filter(|value| !value.is_empty())
        .count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tests/filters_tests.rs"]
mod tests;
