//! State machine behind the contract-upload wizard. Pure data, no IO: the
//! GUI drives transitions and a backend worker performs the actual upload.

use shared::domain::{AnalysisReport, AthleteInfo, KeyTerm, RiskItem, RiskLevel};

pub const SPORTS: [&str; 17] = [
    "Football",
    "Basketball (M)",
    "Basketball (W)",
    "Baseball",
    "Softball",
    "Soccer (M)",
    "Soccer (W)",
    "Volleyball",
    "Swimming",
    "Track & Field",
    "Golf",
    "Tennis",
    "Gymnastics",
    "Wrestling",
    "Lacrosse",
    "Hockey",
    "Other",
];

pub const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// File extensions the upload step accepts, matching what the extraction
/// pipeline can parse.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Info,
    Upload,
    Processing,
    Report,
}

impl WizardStep {
    /// 1-based position for the step indicator. Processing and Report share
    /// the final slot.
    pub fn indicator_position(self) -> usize {
        match self {
            WizardStep::Info => 1,
            WizardStep::Upload => 2,
            WizardStep::Processing | WizardStep::Report => 3,
        }
    }

    pub const INDICATOR_TOTAL: usize = 3;
}

/// One run of the wizard, from athlete details to a rendered report. When
/// analysis fails, the flow lands on [`WizardStep::Report`] with `report`
/// empty and `last_error` set; the user may retry, or explicitly opt into a
/// sample report to preview the layout. A failure is never papered over with
/// fabricated results.
#[derive(Debug, Clone, Default)]
pub struct WizardFlow {
    step: WizardStep,
    pub athlete: AthleteInfo,
    pub report: Option<AnalysisReport>,
    pub last_error: Option<String>,
}

impl WizardFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Info -> Upload, gated on the form being filled in.
    pub fn submit_info(&mut self) -> bool {
        if self.step != WizardStep::Info || !self.athlete.is_complete() {
            return false;
        }
        self.step = WizardStep::Upload;
        true
    }

    /// Upload -> Processing once the backend accepted the submission.
    pub fn begin_processing(&mut self) -> bool {
        if self.step != WizardStep::Upload {
            return false;
        }
        self.last_error = None;
        self.step = WizardStep::Processing;
        true
    }

    pub fn finish_with_report(&mut self, report: AnalysisReport) {
        self.report = Some(report);
        self.last_error = None;
        self.step = WizardStep::Report;
    }

    pub fn finish_with_error(&mut self, message: impl Into<String>) {
        self.report = None;
        self.last_error = Some(message.into());
        self.step = WizardStep::Report;
    }

    /// Report-step action: show a canned sample so the user can see what a
    /// finished analysis looks like. Only meaningful after a failure.
    pub fn show_sample_report(&mut self) {
        if self.step == WizardStep::Report && self.report.is_none() {
            self.report = Some(sample_report(&self.athlete.name));
        }
    }

    /// After a failed analysis, return to the upload step for another try
    /// with the same athlete details.
    pub fn retry_upload(&mut self) {
        if self.step == WizardStep::Report && self.report.is_none() {
            self.last_error = None;
            self.step = WizardStep::Upload;
        }
    }

    /// Back from the upload step to edit athlete details.
    pub fn back_to_info(&mut self) {
        if self.step == WizardStep::Upload {
            self.step = WizardStep::Info;
        }
    }

    /// "Start over": clears everything including the athlete form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Suggested filename for a downloaded report PDF, e.g.
/// `NIL-Analysis-Jordan-Smith.pdf`.
pub fn suggested_pdf_filename(athlete_name: &str) -> String {
    let dashed = athlete_name.trim().replace(' ', "-");
    format!("NIL-Analysis-{dashed}.pdf")
}

/// A representative report shown only on explicit request after a failed
/// analysis. Clearly marked via its id so it can never be mistaken for a
/// real result downstream.
pub fn sample_report(athlete_name: &str) -> AnalysisReport {
    AnalysisReport {
        id: "sample".to_string(),
        athlete_name: athlete_name.to_string(),
        overall_risk: RiskLevel::Medium,
        summary: "This contract contains several standard provisions but includes some terms \
                  that warrant attention before signing. The compensation structure is clear, \
                  but there are concerns around exclusivity clauses and termination rights."
            .to_string(),
        risks: vec![
            RiskItem {
                section: "Section 3.2 - Exclusivity".to_string(),
                level: RiskLevel::High,
                title: "Broad Exclusivity Clause".to_string(),
                description: "The contract grants exclusive rights to the brand across all \
                              social media platforms for 24 months, which may limit your \
                              ability to work with other sponsors in related categories."
                    .to_string(),
                recommendation: "Negotiate to narrow the exclusivity to specific product \
                                 categories or reduce the duration to match the active \
                                 campaign period."
                    .to_string(),
            },
            RiskItem {
                section: "Section 5.1 - Termination".to_string(),
                level: RiskLevel::Medium,
                title: "One-Sided Termination Rights".to_string(),
                description: "The brand can terminate with 30 days notice for any reason, but \
                              you are bound for the full term. This creates an imbalanced \
                              relationship."
                    .to_string(),
                recommendation: "Request mutual termination rights or add specific conditions \
                                 under which you can also exit the agreement."
                    .to_string(),
            },
            RiskItem {
                section: "Section 7.3 - Image Rights".to_string(),
                level: RiskLevel::Medium,
                title: "Perpetual Image Usage".to_string(),
                description: "The contract allows the brand to use your name, image, and \
                              likeness in perpetuity, even after the agreement ends."
                    .to_string(),
                recommendation: "Limit usage rights to 12-24 months after contract \
                                 termination, or require approval for continued use."
                    .to_string(),
            },
            RiskItem {
                section: "Section 2.1 - Compensation".to_string(),
                level: RiskLevel::Low,
                title: "Payment Timeline".to_string(),
                description: "Payment terms are Net 60, which is longer than the industry \
                              standard of Net 30."
                    .to_string(),
                recommendation: "Consider negotiating to Net 30 payment terms.".to_string(),
            },
        ],
        key_terms: vec![
            KeyTerm {
                term: "Exclusivity Period".to_string(),
                explanation: "The time during which you cannot enter into similar agreements \
                              with competing brands. In this contract, it extends 6 months \
                              beyond the active term."
                    .to_string(),
            },
            KeyTerm {
                term: "Perpetual License".to_string(),
                explanation: "A license that never expires. Here, it applies to marketing \
                              materials created during the partnership."
                    .to_string(),
            },
            KeyTerm {
                term: "Morals Clause".to_string(),
                explanation: "Allows the brand to terminate if your behaviour damages their \
                              reputation. This clause is standard but broadly written."
                    .to_string(),
            },
        ],
        generated_at: chrono::Local::now().format("%B %-d, %Y").to_string(),
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
