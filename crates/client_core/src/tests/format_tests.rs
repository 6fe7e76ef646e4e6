use super::*;

#[test]
fn currency_shows_dashes_for_missing_amounts() {
    assert_eq!(format_currency(None), "--");
}

#[test]
fn currency_groups_thousands_without_cents() {
    assert_eq!(format_currency(Some(0.0)), "$0");
    assert_eq!(format_currency(Some(950.4)), "$950");
    assert_eq!(format_currency(Some(25000.0)), "$25,000");
    assert_eq!(format_currency(Some(1234567.89)), "$1,234,568");
    assert_eq!(format_currency(Some(-500.0)), "-$500");
}

#[test]
fn counts_drop_trailing_zero_fractions() {
    assert_eq!(format_count(4.0), "4");
    assert_eq!(format_count(4.5), "4.5");
}

#[test]
fn dates_accept_the_service_timestamp_shapes() {
    assert_eq!(format_date("2026-03-04T10:00:00Z"), "Mar 4, 2026");
    assert_eq!(format_date("2026-03-04T10:00:00.123456"), "Mar 4, 2026");
    assert_eq!(format_date("2026-12-25"), "Dec 25, 2026");
}

#[test]
fn unparseable_dates_pass_through_verbatim() {
    assert_eq!(format_date("not-a-date"), "not-a-date");
}

#[test]
fn risk_display_capitalizes_and_defaults() {
    assert_eq!(risk_display(Some("low")), "Low");
    assert_eq!(risk_display(Some("High")), "High");
    assert_eq!(risk_display(None), "N/A");
    assert_eq!(risk_display(Some("")), "N/A");
}

#[test]
fn status_display_softens_wire_casing() {
    assert_eq!(status_display("IN_PROGRESS"), "In Progress");
    assert_eq!(status_display("COMPLETED"), "Completed");
}
