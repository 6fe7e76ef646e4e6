use super::*;

fn filled_athlete() -> AthleteInfo {
    AthleteInfo {
        name: "Jordan Smith".to_string(),
        email: "jsmith@university.edu".to_string(),
        school: "State University".to_string(),
        sport: "Football".to_string(),
        state: "Texas".to_string(),
        consent_to_kb: false,
    }
}

fn finished_report() -> AnalysisReport {
    AnalysisReport {
        id: "r-1".to_string(),
        athlete_name: "Jordan Smith".to_string(),
        overall_risk: RiskLevel::Low,
        summary: "Fine.".to_string(),
        risks: Vec::new(),
        key_terms: Vec::new(),
        generated_at: "March 4, 2026".to_string(),
    }
}

#[test]
fn info_step_blocks_until_form_is_complete() {
    let mut flow = WizardFlow::new();
    assert_eq!(flow.step(), WizardStep::Info);
    assert!(!flow.submit_info());
    assert_eq!(flow.step(), WizardStep::Info);

    flow.athlete = filled_athlete();
    assert!(flow.submit_info());
    assert_eq!(flow.step(), WizardStep::Upload);
}

#[test]
fn whitespace_only_fields_do_not_count_as_filled() {
    let mut flow = WizardFlow::new();
    flow.athlete = filled_athlete();
    flow.athlete.school = "   ".to_string();
    assert!(!flow.submit_info());
}

#[test]
fn successful_analysis_lands_on_report() {
    let mut flow = WizardFlow::new();
    flow.athlete = filled_athlete();
    flow.submit_info();
    assert!(flow.begin_processing());
    assert_eq!(flow.step(), WizardStep::Processing);

    flow.finish_with_report(finished_report());
    assert_eq!(flow.step(), WizardStep::Report);
    assert!(flow.report.is_some());
    assert!(flow.last_error.is_none());
}

#[test]
fn failed_analysis_surfaces_error_without_fabricating_a_report() {
    let mut flow = WizardFlow::new();
    flow.athlete = filled_athlete();
    flow.submit_info();
    flow.begin_processing();

    flow.finish_with_error("analysis service returned 500");
    assert_eq!(flow.step(), WizardStep::Report);
    assert!(flow.report.is_none());
    assert_eq!(
        flow.last_error.as_deref(),
        Some("analysis service returned 500")
    );
}

#[test]
fn sample_report_only_fills_in_after_a_failure() {
    let mut flow = WizardFlow::new();
    flow.athlete = filled_athlete();

    // Not on the report step yet: no-op.
    flow.show_sample_report();
    assert!(flow.report.is_none());

    flow.submit_info();
    flow.begin_processing();
    flow.finish_with_error("boom");
    flow.show_sample_report();
    let report = flow.report.as_ref().unwrap();
    assert_eq!(report.id, "sample");
    assert_eq!(report.athlete_name, "Jordan Smith");

    // A real report is never replaced by the sample.
    flow.finish_with_report(finished_report());
    flow.show_sample_report();
    assert_eq!(flow.report.as_ref().unwrap().id, "r-1");
}

#[test]
fn retry_after_failure_returns_to_upload_with_details_kept() {
    let mut flow = WizardFlow::new();
    flow.athlete = filled_athlete();
    flow.submit_info();
    flow.begin_processing();
    flow.finish_with_error("boom");

    flow.retry_upload();
    assert_eq!(flow.step(), WizardStep::Upload);
    assert!(flow.last_error.is_none());
    assert!(flow.athlete.is_complete());

    // Retry is not available once a real report is on screen.
    flow.begin_processing();
    flow.finish_with_report(finished_report());
    flow.retry_upload();
    assert_eq!(flow.step(), WizardStep::Report);
}

#[test]
fn begin_processing_requires_upload_step() {
    let mut flow = WizardFlow::new();
    assert!(!flow.begin_processing());
    assert_eq!(flow.step(), WizardStep::Info);
}

#[test]
fn back_and_reset_return_to_earlier_steps() {
    let mut flow = WizardFlow::new();
    flow.athlete = filled_athlete();
    flow.submit_info();
    flow.back_to_info();
    assert_eq!(flow.step(), WizardStep::Info);
    assert!(flow.athlete.is_complete());

    flow.submit_info();
    flow.begin_processing();
    flow.finish_with_report(finished_report());
    flow.reset();
    assert_eq!(flow.step(), WizardStep::Info);
    assert!(flow.report.is_none());
    assert_eq!(flow.athlete, AthleteInfo::default());
}

#[test]
fn indicator_positions_follow_the_three_visible_steps() {
    assert_eq!(WizardStep::Info.indicator_position(), 1);
    assert_eq!(WizardStep::Upload.indicator_position(), 2);
    assert_eq!(WizardStep::Processing.indicator_position(), 3);
    assert_eq!(WizardStep::Report.indicator_position(), 3);
}

#[test]
fn pdf_filename_dashes_the_athlete_name() {
    assert_eq!(
        suggested_pdf_filename("Jordan Smith"),
        "NIL-Analysis-Jordan-Smith.pdf"
    );
    assert_eq!(
        suggested_pdf_filename("  Ana Maria Lopez "),
        "NIL-Analysis-Ana-Maria-Lopez.pdf"
    );
}
