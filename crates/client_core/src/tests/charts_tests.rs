use super::*;

fn map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(label, value)| (label.to_string(), *value))
        .collect()
}

#[test]
fn sorted_entries_are_descending_with_label_tiebreak() {
    let entries = sorted_entries(&map(&[("Golf", 2.0), ("Football", 5.0), ("Tennis", 2.0)]));
    assert_eq!(
        entries,
        vec![
            ("Football".to_string(), 5.0),
            ("Golf".to_string(), 2.0),
            ("Tennis".to_string(), 2.0),
        ]
    );
}

#[test]
fn top_entries_truncates_to_the_bar_limit() {
    let many: Vec<(String, f64)> = (0..12).map(|i| (format!("s{i:02}"), i as f64)).collect();
    let map: HashMap<String, f64> = many.into_iter().collect();
    let top = top_entries(&map, BAR_LIMIT);
    assert_eq!(top.len(), BAR_LIMIT);
    assert_eq!(top[0], ("s11".to_string(), 11.0));
}

#[test]
fn bar_max_never_drops_below_one() {
    assert_eq!(bar_max(&map(&[])), 1.0);
    assert_eq!(bar_max(&map(&[("a", 0.0)])), 1.0);
    assert_eq!(bar_max(&map(&[("a", 7.0), ("b", 3.0)])), 7.0);
}

#[test]
fn percentile_cards_fill_missing_keys_with_zero() {
    let cards = percentile_cards(&map(&[("p50", 15000.0), ("p90", 80000.0)]));
    assert_eq!(
        cards,
        [
            ("p25", 0.0),
            ("p50", 15000.0),
            ("p75", 0.0),
            ("p90", 80000.0),
        ]
    );
}

#[test]
fn risk_rows_read_both_key_casings_and_rank_by_total() {
    let mut risk_by_sport: HashMap<String, HashMap<String, f64>> = HashMap::new();
    risk_by_sport.insert(
        "Football".to_string(),
        map(&[("Low", 4.0), ("medium", 3.0), ("High", 1.0)]),
    );
    risk_by_sport.insert("Golf".to_string(), map(&[("low", 1.0)]));

    let rows = risk_by_sport_rows(&risk_by_sport);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].sport, "Football");
    assert_eq!(rows[0].low, 4.0);
    assert_eq!(rows[0].medium, 3.0);
    assert_eq!(rows[0].high, 1.0);
    assert_eq!(rows[0].total(), 8.0);
    assert_eq!(rows[1].sport, "Golf");
    assert_eq!(rows[1].high, 0.0);
}

#[test]
fn risk_rows_keep_only_the_busiest_sports() {
    let mut risk_by_sport: HashMap<String, HashMap<String, f64>> = HashMap::new();
    for i in 0..12 {
        risk_by_sport.insert(format!("sport{i:02}"), map(&[("Low", i as f64)]));
    }
    let rows = risk_by_sport_rows(&risk_by_sport);
    assert_eq!(rows.len(), RISK_TABLE_LIMIT);
    assert_eq!(rows[0].sport, "sport11");
}

#[test]
fn monthly_volume_is_chronological_and_windowed() {
    let mut volume = HashMap::new();
    for month in 1..=14 {
        let year = if month > 12 { 2026 } else { 2025 };
        let m = if month > 12 { month - 12 } else { month };
        volume.insert(format!("{year}-{m:02}"), month as f64);
    }
    let entries = monthly_volume(&volume);
    assert_eq!(entries.len(), MONTHLY_WINDOW);
    assert_eq!(entries.first().unwrap().0, "2025-03");
    assert_eq!(entries.last().unwrap().0, "2026-02");
}

#[test]
fn exclusivity_rate_rounds_and_guards_zero() {
    assert_eq!(
        exclusivity_rate(&ExclusivityBreakdown {
            exclusive: 0,
            non_exclusive: 0,
        }),
        0
    );
    assert_eq!(
        exclusivity_rate(&ExclusivityBreakdown {
            exclusive: 1,
            non_exclusive: 2,
        }),
        33
    );
    assert_eq!(
        exclusivity_rate(&ExclusivityBreakdown {
            exclusive: 1,
            non_exclusive: 1,
        }),
        50
    );
}
