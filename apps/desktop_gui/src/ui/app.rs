use std::{path::PathBuf, thread, time::Duration};

use anyhow::Context as _;
use arboard::Clipboard;
use chrono::Local;
use client_core::{
    charts,
    filters::DealFilters,
    format,
    wizard::{suggested_pdf_filename, WizardFlow, WizardStep, ACCEPTED_EXTENSIONS, SPORTS, US_STATES},
    ContractUpload, DashboardSession, DashboardSnapshot, NilApiClient,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::dashboard::{AnalyticsData, DashboardSummary, DealDetail};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_login_failure, UiError, UiErrorCategory, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;

pub const SETTINGS_STORAGE_KEY: &str = "nilscope.settings";

/// Extraction payload sections in display order, wire key to heading.
const EXTRACTION_SECTIONS: [(&str, &str); 15] = [
    ("deal", "Deal"),
    ("student_athlete", "Student Athlete"),
    ("institution", "Institution"),
    ("payor", "Payor"),
    ("agent_representative", "Agent / Representative"),
    ("compensation_components", "Compensation Components"),
    ("deliverables", "Deliverables"),
    ("nil_rights_grant", "NIL Rights Grant"),
    ("restriction_clauses", "Restriction Clauses"),
    ("termination_clause", "Termination Clause"),
    ("dispute_resolution", "Dispute Resolution"),
    ("group_deal_metadata", "Group Deal Metadata"),
    ("revenue_sharing_terms", "Revenue Sharing Terms"),
    ("amendments", "Amendments"),
    ("metadata", "Metadata"),
];

/// Subset of extraction sections relevant to compliance review.
const COMPLIANCE_SECTIONS: [(&str, &str); 5] = [
    ("state_compliance", "State Compliance"),
    ("nil_rights_grant", "NIL Rights Grant"),
    ("restriction_clauses", "Restriction Clauses"),
    ("dispute_resolution", "Dispute Resolution"),
    ("termination_clause", "Termination Clause"),
];

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_url: String,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedUiSettings {
    pub dark_mode: bool,
    pub filters_expanded: bool,
}

impl Default for PersistedUiSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            filters_expanded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppViewState {
    Home,
    Wizard,
    Dashboard,
    DealDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashboardTab {
    Deals,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailTab {
    Overview,
    Analysis,
    Extraction,
    Compliance,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Auth => "Authentication",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

fn risk_color(risk: &str) -> egui::Color32 {
    match risk.to_ascii_lowercase().as_str() {
        "low" => egui::Color32::from_rgb(16, 150, 72),
        "medium" => egui::Color32::from_rgb(217, 154, 0),
        "high" => egui::Color32::from_rgb(205, 43, 49),
        _ => egui::Color32::GRAY,
    }
}

fn status_color(status: &str) -> egui::Color32 {
    match status {
        "COMPLETED" => egui::Color32::from_rgb(16, 150, 72),
        "IN_PROGRESS" => egui::Color32::from_rgb(38, 107, 211),
        "FAILED" => egui::Color32::from_rgb(205, 43, 49),
        "PARTIAL" => egui::Color32::from_rgb(217, 154, 0),
        _ => egui::Color32::GRAY,
    }
}

fn badge(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    ui.label(
        egui::RichText::new(text)
            .color(color)
            .strong()
            .small()
            .monospace(),
    );
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(egui::RichText::new(text).strong().size(16.0));
    ui.add_space(4.0);
}

/// The four headline cards above the dashboard tabs.
fn summary_cards(summary: &DashboardSummary) -> [(&'static str, String); 4] {
    [
        ("Total Deals", summary.total_deals.to_string()),
        (
            "Avg Compensation",
            format::format_currency(Some(summary.average_compensation)),
        ),
        (
            "Extraction Success",
            format!("{:.0}%", summary.extraction_success_rate),
        ),
        (
            "Avg Quality Score",
            format!("{:.1}%", summary.average_quality_score),
        ),
    ]
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.group(|ui| {
        ui.set_min_width(150.0);
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(label).small().weak());
            ui.label(egui::RichText::new(value).size(20.0).strong());
        });
    });
}

fn bar_row(ui: &mut egui::Ui, label: &str, value: f64, max: f64, currency: bool) {
    let text = if currency {
        format::format_currency(Some(value))
    } else {
        format::format_count(value)
    };
    ui.horizontal(|ui| {
        ui.add_sized([160.0, 18.0], egui::Label::new(egui::RichText::new(label).small()));
        let fraction = (value / max).clamp(0.0, 1.0) as f32;
        ui.add(
            egui::ProgressBar::new(fraction)
                .desired_width(260.0)
                .text(egui::RichText::new(text).small()),
        );
    });
}

fn step_indicator(ui: &mut egui::Ui, step: WizardStep) {
    let current = step.indicator_position();
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("Step {current} of {}", WizardStep::INDICATOR_TOTAL))
                .small()
                .weak(),
        );
        for position in 1..=WizardStep::INDICATOR_TOTAL {
            let filled = position <= current;
            let color = if filled {
                ui.visuals().strong_text_color()
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(egui::RichText::new("●").color(color).small());
        }
    });
    ui.add_space(8.0);
}

fn filter_combo(
    ui: &mut egui::Ui,
    id: &str,
    value: &mut String,
    options: &[String],
    placeholder: &str,
) {
    let selected = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.clone()
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .width(150.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, String::new(), placeholder);
            for option in options {
                ui.selectable_value(value, option.clone(), option);
            }
        });
}

fn json_section(ui: &mut egui::Ui, title: &str, value: &serde_json::Value) {
    egui::CollapsingHeader::new(title)
        .id_salt(title)
        .show(ui, |ui| {
            let pretty =
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            ui.label(egui::RichText::new(pretty).monospace().small());
        });
}

fn write_extraction_json(path: &PathBuf, detail: &DealDetail) -> anyhow::Result<()> {
    let payload = serde_json::to_string_pretty(&detail.extraction())
        .context("serialize extraction payload")?;
    std::fs::write(path, payload)
        .with_context(|| format!("write extraction JSON to {}", path.display()))?;
    Ok(())
}

pub struct NilScopeApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    startup: StartupConfig,

    view_state: AppViewState,
    status_line: String,
    banner: Option<StatusBanner>,
    dark_mode: bool,
    theme_dirty: bool,
    clipboard: Option<Clipboard>,

    // Wizard
    wizard: WizardFlow,
    selected_file: Option<PathBuf>,
    pdf_saving: bool,

    // Dashboard
    dash_key_input: String,
    dash_authed: bool,
    login_pending: bool,
    login_error: String,
    dash_loading: bool,
    snapshot: Option<DashboardSnapshot>,
    filters: DealFilters,
    filters_expanded: bool,
    active_tab: DashboardTab,
    analytics: Option<AnalyticsData>,
    analytics_loading: bool,

    // Deal detail
    detail: Option<DealDetail>,
    detail_loading: bool,
    detail_error: Option<String>,
    detail_tab: DetailTab,
}

impl NilScopeApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedUiSettings>,
        startup: StartupConfig,
    ) -> Self {
        let settings = persisted.unwrap_or_default();
        Self {
            cmd_tx,
            ui_rx,
            startup,
            view_state: AppViewState::Home,
            status_line: String::new(),
            banner: None,
            dark_mode: settings.dark_mode,
            theme_dirty: true,
            clipboard: Clipboard::new().ok(),
            wizard: WizardFlow::new(),
            selected_file: None,
            pdf_saving: false,
            dash_key_input: String::new(),
            dash_authed: false,
            login_pending: false,
            login_error: String::new(),
            dash_loading: false,
            snapshot: None,
            filters: DealFilters::default(),
            filters_expanded: settings.filters_expanded,
            active_tab: DashboardTab::Deals,
            analytics: None,
            analytics_loading: false,
            detail: None,
            detail_loading: false,
            detail_error: None,
            detail_tab: DetailTab::Overview,
        }
    }

    fn sign_out(&mut self) {
        self.dash_authed = false;
        self.dash_key_input.clear();
        self.login_pending = false;
        self.dash_loading = false;
        self.snapshot = None;
        self.analytics = None;
        self.analytics_loading = false;
        self.filters.clear();
        self.detail = None;
        self.detail_error = None;
        if self.view_state == AppViewState::DealDetail {
            self.view_state = AppViewState::Dashboard;
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status_line = message;
                }
                UiEvent::Error(err) => self.handle_error(err),
                UiEvent::AnalysisCompleted(report) => {
                    self.wizard.finish_with_report(*report);
                }
                UiEvent::ReportPdfSaved(path) => {
                    self.pdf_saving = false;
                    self.status_line = format!("Report saved to {}", path.display());
                }
                UiEvent::DashboardAuthOk => {
                    self.dash_authed = true;
                    self.login_pending = false;
                    self.login_error.clear();
                    self.dash_loading = true;
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::LoadDashboard,
                        &mut self.status_line,
                    );
                }
                UiEvent::DashboardLoaded(snapshot) => {
                    self.dash_loading = false;
                    self.snapshot = Some(*snapshot);
                    self.status_line =
                        format!("Dashboard updated {}", Local::now().format("%H:%M:%S"));
                }
                UiEvent::AnalyticsLoaded(analytics) => {
                    self.analytics_loading = false;
                    self.analytics = Some(*analytics);
                }
                UiEvent::DealDetailLoaded(detail) => {
                    self.detail_loading = false;
                    self.detail_error = None;
                    self.detail = Some(*detail);
                }
            }
        }
    }

    fn handle_error(&mut self, err: UiError) {
        tracing::warn!(
            category = err_label(err.category()),
            message = err.message(),
            "ui error event"
        );
        match err.context() {
            UiErrorContext::Analyze => {
                self.wizard.finish_with_error(err.message());
            }
            UiErrorContext::DashboardLogin => {
                self.login_pending = false;
                self.login_error = classify_login_failure(err.message());
            }
            UiErrorContext::DashboardLoad => {
                self.dash_loading = false;
                self.analytics_loading = false;
                if err.requires_reauth() {
                    self.sign_out();
                    self.login_error = classify_login_failure(err.message());
                } else {
                    self.banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: format!("{}: {}", err_label(err.category()), err.message()),
                    });
                }
            }
            UiErrorContext::DealDetail => {
                self.detail_loading = false;
                if err.requires_reauth() {
                    self.sign_out();
                    self.login_error = classify_login_failure(err.message());
                } else {
                    self.detail_error = Some(err.message().to_string());
                }
            }
            UiErrorContext::DownloadPdf => {
                self.pdf_saving = false;
                self.banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Error,
                    message: format!("PDF download failed: {}", err.message()),
                });
            }
            UiErrorContext::BackendStartup | UiErrorContext::General => {
                self.banner = Some(StatusBanner {
                    severity: StatusBannerSeverity::Error,
                    message: format!("{}: {}", err_label(err.category()), err.message()),
                });
            }
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("NILScope").strong().size(18.0));
                ui.separator();
                if ui.selectable_label(self.view_state == AppViewState::Home, "Home").clicked() {
                    self.view_state = AppViewState::Home;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if self.dark_mode { "☀" } else { "🌙" };
                    if ui.button(icon).clicked() {
                        self.dark_mode = !self.dark_mode;
                        self.theme_dirty = true;
                    }
                    ui.label(egui::RichText::new(&self.status_line).small().weak());
                });
            });
            let mut dismiss = false;
            if let Some(banner) = &self.banner {
                ui.horizontal(|ui| {
                    let color = match banner.severity {
                        StatusBannerSeverity::Error => risk_color("high"),
                    };
                    ui.label(egui::RichText::new(&banner.message).color(color).small());
                    if ui.small_button("Dismiss").clicked() {
                        dismiss = true;
                    }
                });
            }
            if dismiss {
                self.banner = None;
            }
        });
    }

    fn show_home(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.label(egui::RichText::new("NILScope").size(34.0).strong());
                ui.label("Understand your NIL contract before you sign it.");
                ui.add_space(24.0);
                if ui
                    .add_sized([260.0, 40.0], egui::Button::new("Analyze a contract"))
                    .clicked()
                {
                    self.wizard.reset();
                    self.selected_file = None;
                    self.view_state = AppViewState::Wizard;
                }
                ui.add_space(8.0);
                if ui
                    .add_sized([260.0, 40.0], egui::Button::new("Internal dashboard"))
                    .clicked()
                {
                    self.view_state = AppViewState::Dashboard;
                }
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new(format!("API: {}", self.startup.api_url))
                        .small()
                        .weak(),
                );
            });
        });
    }

    fn show_wizard(&mut self, ctx: &egui::Context) {
        match self.wizard.step() {
            WizardStep::Info => self.show_wizard_info(ctx),
            WizardStep::Upload => self.show_wizard_upload(ctx),
            WizardStep::Processing => self.show_wizard_processing(ctx),
            WizardStep::Report => self.show_wizard_report(ctx),
        }
    }

    fn show_wizard_info(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.set_max_width(420.0);
                step_indicator(ui, WizardStep::Info);
                ui.label(egui::RichText::new("Tell us about yourself").size(22.0).strong());
                ui.label(
                    egui::RichText::new(
                        "This helps us tailor the analysis to your specific situation.",
                    )
                    .weak(),
                );
                ui.add_space(16.0);

                egui::Grid::new("athlete_form")
                    .num_columns(2)
                    .spacing([12.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Full name");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.wizard.athlete.name)
                                .hint_text("Jordan Smith"),
                        );
                        ui.end_row();

                        ui.label("School email");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.wizard.athlete.email)
                                .hint_text("jsmith@university.edu"),
                        );
                        ui.end_row();

                        ui.label("School");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.wizard.athlete.school)
                                .hint_text("State University"),
                        );
                        ui.end_row();

                        ui.label("Sport");
                        egui::ComboBox::from_id_salt("sport_select")
                            .selected_text(if self.wizard.athlete.sport.is_empty() {
                                "Select a sport"
                            } else {
                                self.wizard.athlete.sport.as_str()
                            })
                            .show_ui(ui, |ui| {
                                for sport in SPORTS {
                                    ui.selectable_value(
                                        &mut self.wizard.athlete.sport,
                                        sport.to_string(),
                                        sport,
                                    );
                                }
                            });
                        ui.end_row();

                        ui.label("State");
                        egui::ComboBox::from_id_salt("state_select")
                            .selected_text(if self.wizard.athlete.state.is_empty() {
                                "Select a state"
                            } else {
                                self.wizard.athlete.state.as_str()
                            })
                            .show_ui(ui, |ui| {
                                for state in US_STATES {
                                    ui.selectable_value(
                                        &mut self.wizard.athlete.state,
                                        state.to_string(),
                                        state,
                                    );
                                }
                            });
                        ui.end_row();
                    });

                ui.add_space(16.0);
                let can_continue = self.wizard.athlete.is_complete();
                if ui
                    .add_enabled(can_continue, egui::Button::new("Continue"))
                    .clicked()
                {
                    self.wizard.submit_info();
                }
            });
        });
    }

    fn show_wizard_upload(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.set_max_width(420.0);
                step_indicator(ui, WizardStep::Upload);
                ui.label(egui::RichText::new("Upload your contract").size(22.0).strong());
                ui.label(
                    egui::RichText::new("PDF, DOC, or DOCX. The document is analyzed, not stored on this device.")
                        .weak(),
                );
                ui.add_space(16.0);

                if ui.button("Choose file...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Contract documents", &ACCEPTED_EXTENSIONS)
                        .pick_file()
                    {
                        self.selected_file = Some(path);
                    }
                }
                if let Some(path) = &self.selected_file {
                    ui.label(
                        egui::RichText::new(
                            path.file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_else(|| path.display().to_string()),
                        )
                        .strong(),
                    );
                }

                ui.add_space(12.0);
                ui.checkbox(
                    &mut self.wizard.athlete.consent_to_kb,
                    "I consent to this contract being used, anonymized, to improve analysis for other athletes.",
                );

                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    if ui.button("Back").clicked() {
                        self.wizard.back_to_info();
                    }
                    let ready = self.selected_file.is_some() && self.wizard.athlete.consent_to_kb;
                    if ui
                        .add_enabled(ready, egui::Button::new("Analyze contract"))
                        .clicked()
                    {
                        if let Some(file_path) = self.selected_file.clone() {
                            if self.wizard.begin_processing() {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::AnalyzeContract {
                                        athlete: self.wizard.athlete.clone(),
                                        file_path,
                                    },
                                    &mut self.status_line,
                                );
                            }
                        }
                    }
                });
            });
        });
    }

    fn show_wizard_processing(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(140.0);
                step_indicator(ui, WizardStep::Processing);
                ui.spinner();
                ui.add_space(12.0);
                ui.label(egui::RichText::new("Analyzing your contract...").size(18.0));
                ui.label(
                    egui::RichText::new("This usually takes under a minute for typical contracts.")
                        .weak(),
                );
            });
        });
    }

    fn show_wizard_report(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(640.0);
                    ui.add_space(24.0);

                    if let Some(report) = self.wizard.report.clone() {
                        if report.id == "sample" {
                            ui.label(
                                egui::RichText::new(
                                    "Sample report for illustration only. Not based on your contract.",
                                )
                                .color(risk_color("medium"))
                                .strong(),
                            );
                            ui.add_space(8.0);
                        }
                        ui.label(egui::RichText::new("Analysis Report").size(24.0).strong());
                        ui.label(egui::RichText::new(&report.athlete_name).weak());
                        ui.horizontal(|ui| {
                            ui.label("Overall risk:");
                            badge(
                                ui,
                                report.overall_risk.label(),
                                risk_color(report.overall_risk.as_str()),
                            );
                            ui.label(
                                egui::RichText::new(format!("Generated {}", report.generated_at))
                                    .small()
                                    .weak(),
                            );
                        });
                        ui.add_space(8.0);
                        ui.label(&report.summary);

                        section_heading(ui, "Risks");
                        for risk in &report.risks {
                            ui.group(|ui| {
                                ui.horizontal(|ui| {
                                    badge(ui, risk.level.label(), risk_color(risk.level.as_str()));
                                    ui.label(egui::RichText::new(&risk.title).strong());
                                    ui.label(egui::RichText::new(&risk.section).small().weak());
                                });
                                ui.label(&risk.description);
                                ui.label(
                                    egui::RichText::new(format!(
                                        "Recommendation: {}",
                                        risk.recommendation
                                    ))
                                    .italics(),
                                );
                            });
                        }

                        section_heading(ui, "Key Terms");
                        for term in &report.key_terms {
                            ui.group(|ui| {
                                ui.label(egui::RichText::new(&term.term).strong());
                                ui.label(&term.explanation);
                            });
                        }

                        ui.add_space(16.0);
                        ui.horizontal(|ui| {
                            let downloadable = report.id != "sample" && !self.pdf_saving;
                            if ui
                                .add_enabled(downloadable, egui::Button::new("Download PDF"))
                                .clicked()
                            {
                                let mut dialog = rfd::FileDialog::new()
                                    .set_file_name(suggested_pdf_filename(&report.athlete_name));
                                if let Some(downloads) = dirs::download_dir() {
                                    dialog = dialog.set_directory(downloads);
                                }
                                if let Some(dest) = dialog.save_file() {
                                    self.pdf_saving = true;
                                    dispatch_backend_command(
                                        &self.cmd_tx,
                                        BackendCommand::DownloadReportPdf {
                                            report_id: report.id.clone(),
                                            dest,
                                        },
                                        &mut self.status_line,
                                    );
                                }
                            }
                            if self.pdf_saving {
                                ui.spinner();
                            }
                            if ui.button("Start over").clicked() {
                                self.wizard.reset();
                                self.selected_file = None;
                            }
                        });
                    } else {
                        ui.label(egui::RichText::new("Analysis failed").size(24.0).strong());
                        if let Some(message) = self.wizard.last_error.clone() {
                            ui.add_space(8.0);
                            ui.label(egui::RichText::new(message).color(risk_color("high")));
                        }
                        ui.add_space(16.0);
                        ui.horizontal(|ui| {
                            if ui.button("Try again").clicked() {
                                self.wizard.retry_upload();
                            }
                            if ui.button("View a sample report").clicked() {
                                self.wizard.show_sample_report();
                            }
                            if ui.button("Start over").clicked() {
                                self.wizard.reset();
                                self.selected_file = None;
                            }
                        });
                    }
                    ui.add_space(24.0);
                });
            });
        });
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        if !self.dash_authed {
            self.show_dashboard_login(ctx);
            return;
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Deals Dashboard").size(22.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sign out").clicked() {
                        self.sign_out();
                        return;
                    }
                    let refreshable = !self.dash_loading;
                    if ui.add_enabled(refreshable, egui::Button::new("Refresh")).clicked() {
                        self.dash_loading = true;
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::LoadDashboard,
                            &mut self.status_line,
                        );
                    }
                });
            });
            ui.separator();

            if self.snapshot.is_none() {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    if self.dash_loading {
                        ui.spinner();
                        ui.label("Loading dashboard...");
                    } else {
                        ui.label("Dashboard not loaded.");
                    }
                });
                return;
            }

            let Some(snapshot) = &self.snapshot else {
                return;
            };
            let summary = snapshot.summary.clone();
            let deal_count = snapshot.deals.len();

            ui.add_space(8.0);
            ui.horizontal_wrapped(|ui| {
                for (label, value) in summary_cards(&summary) {
                    stat_card(ui, label, &value);
                }
            });
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui
                    .selectable_label(
                        self.active_tab == DashboardTab::Deals,
                        format!("Deals ({deal_count})"),
                    )
                    .clicked()
                {
                    self.active_tab = DashboardTab::Deals;
                }
                if ui
                    .selectable_label(self.active_tab == DashboardTab::Analytics, "Analytics")
                    .clicked()
                {
                    self.active_tab = DashboardTab::Analytics;
                    // Contract patterns are expensive server-side; fetch once
                    // per session, on first view.
                    if self.analytics.is_none() && !self.analytics_loading {
                        self.analytics_loading = true;
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::LoadAnalytics,
                            &mut self.status_line,
                        );
                    }
                }
            });
            ui.separator();

            match self.active_tab {
                DashboardTab::Deals => self.show_deals_tab(ui),
                DashboardTab::Analytics => self.show_analytics_tab(ui, &summary),
            }
        });
    }

    fn show_dashboard_login(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(140.0);
                ui.set_max_width(360.0);
                ui.label(egui::RichText::new("Internal Dashboard").size(22.0).strong());
                ui.label(egui::RichText::new("Enter the dashboard key to continue.").weak());
                ui.add_space(12.0);
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.dash_key_input)
                        .password(true)
                        .hint_text("Dashboard key"),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.add_space(8.0);
                let can_submit = !self.dash_key_input.trim().is_empty() && !self.login_pending;
                let clicked = ui
                    .add_enabled(can_submit, egui::Button::new("Enter"))
                    .clicked();
                if can_submit && (clicked || submitted) {
                    self.login_pending = true;
                    self.login_error.clear();
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::DashboardLogin {
                            key: self.dash_key_input.trim().to_string(),
                        },
                        &mut self.status_line,
                    );
                }
                if self.login_pending {
                    ui.add_space(8.0);
                    ui.spinner();
                }
                if !self.login_error.is_empty() {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new(&self.login_error).color(risk_color("high")),
                    );
                }
            });
        });
    }

    fn show_deals_tab(&mut self, ui: &mut egui::Ui) {
        let mut open_deal: Option<String> = None;
        let mut clear_filters = false;

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.filters.search_query)
                    .desired_width(280.0)
                    .hint_text("Search athlete, school, sport, state, or deal ID"),
            );
            let count = self.filters.active_count();
            let label = if count > 0 {
                format!("Filters ({count})")
            } else {
                "Filters".to_string()
            };
            if ui.selectable_label(self.filters_expanded, label).clicked() {
                self.filters_expanded = !self.filters_expanded;
            }
            if count > 0 && ui.small_button("Clear").clicked() {
                clear_filters = true;
            }
        });

        if let Some(snapshot) = &self.snapshot {
            let options = &snapshot.filter_options;
            if self.filters_expanded {
                egui::Grid::new("deal_filters")
                    .num_columns(4)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        filter_combo(ui, "f_sport", &mut self.filters.sport, &options.sports, "All Sports");
                        filter_combo(ui, "f_school", &mut self.filters.school, &options.schools, "All Schools");
                        filter_combo(ui, "f_state", &mut self.filters.state, &options.states, "All States");
                        filter_combo(
                            ui,
                            "f_risk",
                            &mut self.filters.risk_level,
                            &options.risk_levels,
                            "All Risk Levels",
                        );
                        ui.end_row();
                        filter_combo(
                            ui,
                            "f_status",
                            &mut self.filters.status,
                            &options.statuses,
                            "All Statuses",
                        );
                        filter_combo(
                            ui,
                            "f_type",
                            &mut self.filters.deal_type,
                            &options.deal_types,
                            "All Deal Types",
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut self.filters.compensation_min)
                                .desired_width(90.0)
                                .hint_text("Min $"),
                        );
                        ui.add(
                            egui::TextEdit::singleline(&mut self.filters.compensation_max)
                                .desired_width(90.0)
                                .hint_text("Max $"),
                        );
                        ui.end_row();
                    });
            }

            ui.add_space(8.0);
            let filtered = self.filters.apply(&snapshot.deals);
            if filtered.is_empty() {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| {
                    if snapshot.deals.is_empty() {
                        ui.label(
                            "No deals yet. Deals will appear here after an athlete uploads a contract.",
                        );
                    } else {
                        ui.label("No deals match your filters.");
                    }
                });
            } else {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("deals_table")
                        .num_columns(8)
                        .striped(true)
                        .spacing([16.0, 6.0])
                        .show(ui, |ui| {
                            for header in [
                                "Athlete", "School", "Sport", "Compensation", "Risk", "Status",
                                "Created", "",
                            ] {
                                ui.label(egui::RichText::new(header).strong().small());
                            }
                            ui.end_row();

                            for deal in filtered {
                                ui.vertical(|ui| {
                                    ui.label(egui::RichText::new(&deal.athlete_name).strong());
                                    ui.label(
                                        egui::RichText::new(&deal.athlete_email).small().weak(),
                                    );
                                });
                                ui.label(&deal.school);
                                ui.label(&deal.sport);
                                ui.label(format::format_currency(deal.total_compensation));
                                badge(
                                    ui,
                                    &format::risk_display(deal.overall_risk.as_deref()),
                                    deal.overall_risk
                                        .as_deref()
                                        .map(risk_color)
                                        .unwrap_or(egui::Color32::GRAY),
                                );
                                badge(
                                    ui,
                                    &format::status_display(&deal.extraction_status),
                                    status_color(&deal.extraction_status),
                                );
                                ui.label(format::format_date(&deal.created_at));
                                if ui.small_button("View").clicked() {
                                    open_deal = Some(deal.deal_id.clone());
                                }
                                ui.end_row();
                            }
                        });
                });
            }
        }

        if clear_filters {
            self.filters.clear();
        }
        if let Some(deal_id) = open_deal {
            self.detail = None;
            self.detail_error = None;
            self.detail_loading = true;
            self.detail_tab = DetailTab::Overview;
            self.view_state = AppViewState::DealDetail;
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::LoadDealDetail { deal_id },
                &mut self.status_line,
            );
        }
    }

    fn show_analytics_tab(&mut self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            if !summary.compensation_percentiles.is_empty() {
                section_heading(ui, "Compensation Percentiles");
                ui.horizontal_wrapped(|ui| {
                    for (key, value) in charts::percentile_cards(&summary.compensation_percentiles)
                    {
                        stat_card(
                            ui,
                            &key.to_uppercase(),
                            &format::format_currency(Some(value)),
                        );
                    }
                });
            }

            let currency_sections = [
                ("Avg Compensation by Sport", &summary.compensation_by_sport),
                ("Avg Compensation by State", &summary.compensation_by_state),
                ("Avg Compensation by Deal Type", &summary.compensation_by_deal_type),
            ];
            for (title, map) in currency_sections {
                if map.is_empty() {
                    continue;
                }
                section_heading(ui, title);
                let max = charts::bar_max(map);
                for (label, value) in charts::top_entries(map, charts::BAR_LIMIT) {
                    bar_row(ui, &label, value, max, true);
                }
            }

            let count_sections = [
                ("Deals by Sport", &summary.deals_by_sport, charts::BAR_LIMIT),
                ("Deals by State", &summary.deals_by_state, charts::BAR_LIMIT),
                ("Deals by Type", &summary.deals_by_deal_type, charts::BAR_LIMIT),
                ("Deals by Risk Level", &summary.deals_by_risk, usize::MAX),
            ];
            for (title, map, limit) in count_sections {
                if map.is_empty() {
                    continue;
                }
                section_heading(ui, title);
                let max = charts::bar_max(map);
                for (label, value) in charts::top_entries(map, limit) {
                    bar_row(ui, &label, value, max, false);
                }
            }

            if !summary.risk_by_sport.is_empty() {
                section_heading(ui, "Risk Distribution by Sport");
                egui::Grid::new("risk_by_sport")
                    .num_columns(4)
                    .striped(true)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Sport", "Low", "Medium", "High"] {
                            ui.label(egui::RichText::new(header).strong().small());
                        }
                        ui.end_row();
                        for row in charts::risk_by_sport_rows(&summary.risk_by_sport) {
                            ui.label(&row.sport);
                            ui.label(format::format_count(row.low));
                            ui.label(format::format_count(row.medium));
                            ui.label(format::format_count(row.high));
                            ui.end_row();
                        }
                    });
            }

            if !summary.monthly_deal_volume.is_empty() {
                section_heading(ui, "Monthly Deal Volume");
                let max = charts::bar_max(&summary.monthly_deal_volume);
                for (month, count) in charts::monthly_volume(&summary.monthly_deal_volume) {
                    bar_row(ui, &month, count, max, false);
                }
            }

            if self.analytics_loading {
                ui.add_space(24.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading contract patterns...");
                });
            } else if let Some(analytics) = &self.analytics {
                if analytics.deals_analyzed > 0 {
                    section_heading(
                        ui,
                        &format!("Contract Patterns ({} extracted)", analytics.deals_analyzed),
                    );

                    let distributions = [
                        ("Payor Type Distribution", &analytics.payor_type_distribution),
                        (
                            "Compensation Component Types",
                            &analytics.compensation_type_distribution,
                        ),
                        (
                            "Dispute Resolution Methods",
                            &analytics.dispute_resolution_distribution,
                        ),
                    ];
                    for (title, map) in distributions {
                        if map.is_empty() {
                            continue;
                        }
                        section_heading(ui, title);
                        let max = charts::bar_max(map);
                        for (label, value) in charts::sorted_entries(map) {
                            bar_row(ui, &label, value, max, false);
                        }
                    }

                    section_heading(ui, "Key Contract Indicators");
                    ui.horizontal_wrapped(|ui| {
                        stat_card(
                            ui,
                            "Exclusivity Rate",
                            &format!(
                                "{}%",
                                charts::exclusivity_rate(&analytics.exclusivity_breakdown)
                            ),
                        );
                        stat_card(ui, "Clawback Rate", &format!("{}%", analytics.clawback_rate));
                        stat_card(
                            ui,
                            "Perpetual Rights",
                            &analytics.perpetual_rights_count.to_string(),
                        );
                        stat_card(ui, "Deals Analyzed", &analytics.deals_analyzed.to_string());
                    });
                }
            }
            ui.add_space(24.0);
        });
    }

    fn show_deal_detail(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("← Back to dashboard").clicked() {
                self.view_state = AppViewState::Dashboard;
                return;
            }
            ui.add_space(8.0);

            if self.detail_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.spinner();
                    ui.label("Loading deal...");
                });
                return;
            }
            if let Some(message) = &self.detail_error {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.label(egui::RichText::new(message).color(risk_color("high")));
                });
                return;
            }
            let Some(detail) = self.detail.clone() else {
                return;
            };

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&detail.athlete_name).size(22.0).strong());
                badge(
                    ui,
                    &format::risk_display(detail.overall_risk.as_deref()),
                    detail
                        .overall_risk
                        .as_deref()
                        .map(risk_color)
                        .unwrap_or(egui::Color32::GRAY),
                );
                badge(
                    ui,
                    &format::status_display(&detail.extraction_status),
                    status_color(&detail.extraction_status),
                );
            });
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} · {} · {}",
                        detail.school, detail.sport, detail.state
                    ))
                    .weak(),
                );
                ui.label(
                    egui::RichText::new(format!(
                        "Created {}",
                        format::format_date(&detail.created_at)
                    ))
                    .small()
                    .weak(),
                );
            });
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&detail.deal_id).monospace().small());
                if ui.small_button("Copy ID").clicked() {
                    if let Some(clipboard) = &mut self.clipboard {
                        if clipboard.set_text(detail.deal_id.clone()).is_ok() {
                            self.status_line = "Deal ID copied".to_string();
                        }
                    }
                }
                let contract_value = detail
                    .extraction()
                    .get("deal")
                    .and_then(|deal| deal.get("total_compensation_value"))
                    .and_then(|value| value.as_f64());
                if contract_value.is_some() {
                    ui.label(
                        egui::RichText::new(format!(
                            "Contract value: {}",
                            format::format_currency(contract_value)
                        ))
                        .strong(),
                    );
                }
                if let Some(score) = detail.quality_score {
                    ui.label(
                        egui::RichText::new(format!("Quality score: {score:.2}"))
                            .small()
                            .weak(),
                    );
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                for (tab, label) in [
                    (DetailTab::Overview, "Overview"),
                    (DetailTab::Analysis, "Analysis"),
                    (DetailTab::Extraction, "Extraction"),
                    (DetailTab::Compliance, "Compliance"),
                ] {
                    if ui.selectable_label(self.detail_tab == tab, label).clicked() {
                        self.detail_tab = tab;
                    }
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                match self.detail_tab {
                    DetailTab::Overview => self.show_detail_overview(ui, &detail),
                    DetailTab::Analysis => show_detail_analysis(ui, &detail),
                    DetailTab::Extraction => show_detail_extraction(ui, &detail),
                    DetailTab::Compliance => show_detail_compliance(ui, &detail),
                }
                ui.add_space(24.0);
            });
        });
    }

    fn show_detail_overview(&mut self, ui: &mut egui::Ui, detail: &DealDetail) {
        if let Some(summary) = &detail.summary {
            section_heading(ui, "Summary");
            ui.label(summary);
        }

        let ext = detail.extraction();
        if let Some(serde_json::Value::Array(components)) = ext.get("compensation_components") {
            if !components.is_empty() {
                section_heading(ui, "Compensation Breakdown");
                for component in components {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(
                                    component
                                        .get("type")
                                        .and_then(|v| v.as_str())
                                        .unwrap_or("Component"),
                                )
                                .strong(),
                            );
                            let amount = component.get("amount").and_then(|v| v.as_f64());
                            ui.label(format::format_currency(amount));
                        });
                        if let Some(description) =
                            component.get("description").and_then(|v| v.as_str())
                        {
                            ui.label(egui::RichText::new(description).small().weak());
                        }
                    });
                }
            }
        }

        if let Some(serde_json::Value::Array(deliverables)) = ext.get("deliverables") {
            if !deliverables.is_empty() {
                section_heading(ui, "Deliverables");
                for (i, deliverable) in deliverables.iter().enumerate() {
                    ui.group(|ui| {
                        let title = deliverable
                            .get("type")
                            .and_then(|v| v.as_str())
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("Deliverable {}", i + 1));
                        ui.label(egui::RichText::new(title).strong());
                        if let Some(description) =
                            deliverable.get("description").and_then(|v| v.as_str())
                        {
                            ui.label(egui::RichText::new(description).small().weak());
                        }
                        ui.horizontal(|ui| {
                            if let Some(quantity) = deliverable.get("quantity") {
                                if !quantity.is_null() {
                                    ui.label(
                                        egui::RichText::new(format!("Qty: {quantity}")).small(),
                                    );
                                }
                            }
                            if let Some(deadline) =
                                deliverable.get("deadline").and_then(|v| v.as_str())
                            {
                                ui.label(egui::RichText::new(format!("Due: {deadline}")).small());
                            }
                        });
                    });
                }
            }
        }

        if detail.extraction_s3_key.is_some() {
            ui.add_space(12.0);
            if ui.button("Save extraction JSON").clicked() {
                let mut dialog = rfd::FileDialog::new()
                    .set_file_name(format!("extraction-{}.json", detail.deal_id));
                if let Some(downloads) = dirs::download_dir() {
                    dialog = dialog.set_directory(downloads);
                }
                if let Some(path) = dialog.save_file() {
                    match write_extraction_json(&path, detail) {
                        Ok(()) => {
                            self.status_line = format!("Extraction saved to {}", path.display());
                        }
                        Err(err) => {
                            self.banner = Some(StatusBanner {
                                severity: StatusBannerSeverity::Error,
                                message: format!("{err:#}"),
                            });
                        }
                    }
                }
            }
        }
    }
}

fn show_detail_analysis(ui: &mut egui::Ui, detail: &DealDetail) {
    let risks = detail.risks.as_deref().unwrap_or_default();
    if !risks.is_empty() {
        section_heading(ui, "Risk Items");
        for risk in risks {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    badge(
                        ui,
                        &format::risk_display(Some(&risk.level)),
                        risk_color(&risk.level),
                    );
                    ui.label(egui::RichText::new(&risk.title).strong());
                    ui.label(egui::RichText::new(&risk.section).small().weak());
                });
                ui.label(&risk.description);
                ui.label(
                    egui::RichText::new(format!("Recommendation: {}", risk.recommendation))
                        .italics(),
                );
            });
        }
    }

    let key_terms = detail.key_terms.as_deref().unwrap_or_default();
    if !key_terms.is_empty() {
        section_heading(ui, "Key Terms");
        for term in key_terms {
            ui.group(|ui| {
                ui.label(egui::RichText::new(&term.term).strong());
                ui.label(&term.explanation);
            });
        }
    }

    if risks.is_empty() && key_terms.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label("No analysis results for this deal yet.");
        });
    }
}

fn show_detail_extraction(ui: &mut egui::Ui, detail: &DealDetail) {
    if matches!(detail.extraction_status.as_str(), "PENDING" | "IN_PROGRESS") {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.spinner();
            ui.label(format!(
                "Extraction is {}...",
                format::status_display(&detail.extraction_status).to_lowercase()
            ));
        });
        return;
    }
    let ext = detail.extraction();
    if ext.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            let suffix = if detail.extraction_status == "FAILED" {
                " The extraction failed."
            } else {
                ""
            };
            ui.label(format!("No extraction data available.{suffix}"));
        });
        return;
    }
    ui.label(
        egui::RichText::new("Structured data extracted from the contract. Click a section to expand.")
            .small()
            .weak(),
    );
    ui.add_space(8.0);
    for (key, title) in EXTRACTION_SECTIONS {
        if let Some(value) = ext.get(key) {
            if !value.is_null() {
                json_section(ui, title, value);
            }
        }
    }
}

fn show_detail_compliance(ui: &mut egui::Ui, detail: &DealDetail) {
    let ext = detail.extraction();
    if ext.get("state_compliance").is_none() {
        ui.label(
            egui::RichText::new("State compliance data not yet extracted.")
                .small()
                .weak(),
        );
    }
    for (key, title) in COMPLIANCE_SECTIONS {
        if let Some(value) = ext.get(key) {
            if !value.is_null() {
                json_section(ui, title, value);
            }
        }
    }
}

impl eframe::App for NilScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if self.theme_dirty {
            ctx.set_visuals(if self.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.theme_dirty = false;
        }

        self.show_top_bar(ctx);
        match self.view_state {
            AppViewState::Home => self.show_home(ctx),
            AppViewState::Wizard => self.show_wizard(ctx),
            AppViewState::Dashboard => self.show_dashboard(ctx),
            AppViewState::DealDetail => self.show_deal_detail(ctx),
        }

        let busy = self.wizard.step() == WizardStep::Processing
            || self.dash_loading
            || self.analytics_loading
            || self.detail_loading
            || self.login_pending
            || self.pdf_saving;
        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedUiSettings {
            dark_mode: self.dark_mode,
            filters_expanded: self.filters_expanded,
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

pub fn start_backend_bridge(
    api_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match NilApiClient::new(&api_url) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("invalid API base url '{api_url}': {err}");
                    return;
                }
            };
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            let mut session: Option<DashboardSession> = None;
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::AnalyzeContract { athlete, file_path } => {
                        let upload = match ContractUpload::from_path(&file_path).await {
                            Ok(upload) => upload,
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Analyze,
                                    err.to_string(),
                                )));
                                continue;
                            }
                        };
                        match client.analyze(&athlete, upload).await {
                            Ok(report) => {
                                let _ = ui_tx
                                    .try_send(UiEvent::AnalysisCompleted(Box::new(report)));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::Analyze,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                    BackendCommand::DownloadReportPdf { report_id, dest } => {
                        match client.download_report_pdf(&report_id).await {
                            Ok(bytes) => match tokio::fs::write(&dest, bytes).await {
                                Ok(()) => {
                                    let _ = ui_tx.try_send(UiEvent::ReportPdfSaved(dest));
                                }
                                Err(err) => {
                                    let _ =
                                        ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                            UiErrorContext::DownloadPdf,
                                            format!(
                                                "could not write {}: {err}",
                                                dest.display()
                                            ),
                                        )));
                                }
                            },
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::DownloadPdf,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                    BackendCommand::DashboardLogin { key } => {
                        match DashboardSession::login(client.clone(), key).await {
                            Ok(new_session) => {
                                session = Some(new_session);
                                let _ = ui_tx.try_send(UiEvent::DashboardAuthOk);
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::DashboardLogin,
                                    err.to_string(),
                                )));
                            }
                        }
                    }
                    BackendCommand::LoadDashboard => match &session {
                        Some(session) => match session.load_snapshot().await {
                            Ok(snapshot) => {
                                let _ = ui_tx
                                    .try_send(UiEvent::DashboardLoaded(Box::new(snapshot)));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::DashboardLoad,
                                    err.to_string(),
                                )));
                            }
                        },
                        None => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::DashboardLoad,
                                "no dashboard session; sign in first",
                            )));
                        }
                    },
                    BackendCommand::LoadAnalytics => match &session {
                        Some(session) => match session.analytics().await {
                            Ok(analytics) => {
                                let _ = ui_tx
                                    .try_send(UiEvent::AnalyticsLoaded(Box::new(analytics)));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::DashboardLoad,
                                    err.to_string(),
                                )));
                            }
                        },
                        None => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::DashboardLoad,
                                "no dashboard session; sign in first",
                            )));
                        }
                    },
                    BackendCommand::LoadDealDetail { deal_id } => match &session {
                        Some(session) => match session.deal_detail(&deal_id).await {
                            Ok(detail) => {
                                let _ = ui_tx
                                    .try_send(UiEvent::DealDetailLoaded(Box::new(detail)));
                            }
                            Err(err) => {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::DealDetail,
                                    err.to_string(),
                                )));
                            }
                        },
                        None => {
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                UiErrorContext::DealDetail,
                                "no dashboard session; sign in first",
                            )));
                        }
                    },
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_sections_cover_the_full_payload_order() {
        assert_eq!(EXTRACTION_SECTIONS.len(), 15);
        assert_eq!(EXTRACTION_SECTIONS[0], ("deal", "Deal"));
        assert_eq!(EXTRACTION_SECTIONS[14], ("metadata", "Metadata"));
        // Compliance view reuses extraction keys plus state_compliance.
        assert_eq!(COMPLIANCE_SECTIONS[0].0, "state_compliance");
        for (key, _) in &COMPLIANCE_SECTIONS[1..] {
            assert!(EXTRACTION_SECTIONS.iter().any(|(k, _)| k == key));
        }
    }

    #[test]
    fn summary_cards_show_deals_compensation_extraction_and_quality() {
        let summary = DashboardSummary {
            total_deals: 42,
            average_compensation: 15250.0,
            extraction_success_rate: 96.4,
            average_quality_score: 88.26,
            ..DashboardSummary::default()
        };
        let cards = summary_cards(&summary);
        assert_eq!(cards[0], ("Total Deals", "42".to_string()));
        assert_eq!(cards[1], ("Avg Compensation", "$15,250".to_string()));
        assert_eq!(cards[2], ("Extraction Success", "96%".to_string()));
        assert_eq!(cards[3], ("Avg Quality Score", "88.3%".to_string()));
    }

    #[test]
    fn risk_colors_fall_back_to_gray_for_unknown_levels() {
        assert_eq!(risk_color("low"), risk_color("Low"));
        assert_ne!(risk_color("low"), risk_color("high"));
        assert_eq!(risk_color("weird"), egui::Color32::GRAY);
        assert_eq!(status_color("PENDING"), egui::Color32::GRAY);
        assert_ne!(status_color("COMPLETED"), status_color("FAILED"));
    }

    #[test]
    fn persisted_settings_default_to_light_mode_with_filters_collapsed() {
        let settings: PersistedUiSettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.dark_mode);
        assert!(!settings.filters_expanded);
    }
}
