//! End-of-life (EOL) evaluation integration tests.
//!
//! Covers cycle selection, status classification around the forward-looking
//! window, and the sync, resolve and evaluate path end to end.

use chrono::{Days, NaiveDate, Utc};
use eol_scanner::evaluate::{major_token, matches_major_version, matches_version, parse_eol_date};
use eol_scanner::source::{ProductRecord, StaticSource};
use eol_scanner::{
    evaluate, evaluate_at, match_cycle, CancelToken, CatalogStore, ComponentDescriptor, Cycle,
    EolStatus, Inventory, LookupTables, MatchStrategy, Milestone, Resolver, ScanOptions, Scanner,
    SyncEngine,
};

// ============================================================================
// Helpers
// ============================================================================

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn dated(name: &str, eol: NaiveDate) -> Cycle {
    Cycle::new(name).with_eol(Milestone::Date(iso(eol)))
}

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_flagged_cycle_is_eol_regardless_of_dates() {
    let cycles = [Cycle::new("1.0").with_eol(Milestone::Flag(true))];
    let eval = evaluate(&cycles, "1.0.4", 90);
    assert_eq!(eval.status, EolStatus::Eol);
    assert_eq!(eval.eol_date, None);
    assert_eq!(eval.days_until_eol, None);
    assert_eq!(eval.matched_cycle.as_deref(), Some("1.0"));
}

#[test]
fn test_past_date_is_eol() {
    let past = today().checked_sub_days(Days::new(365)).unwrap();
    let eval = evaluate(&[dated("2.7", past)], "2.7.18", 90);
    assert_eq!(eval.status, EolStatus::Eol);
    assert_eq!(eval.eol_date, Some(iso(past)));
}

#[test]
fn test_date_within_window_is_eol_soon() {
    let soon = today().checked_add_days(Days::new(30)).unwrap();
    let eval = evaluate(&[dated("18", soon)], "18.20.1", 90);
    assert_eq!(eval.status, EolStatus::EolSoon);
    assert_eq!(eval.days_until_eol, Some(30));
}

#[test]
fn test_date_beyond_window_is_active() {
    let later = today().checked_add_days(Days::new(730)).unwrap();
    let eval = evaluate(&[dated("3.13", later)], "3.13.0", 90);
    assert_eq!(eval.status, EolStatus::Active);
    assert_eq!(eval.days_until_eol, Some(730));
}

#[test]
fn test_window_boundaries() {
    let t = fixed_today();
    let at = |days: u64, window: u32| {
        let eol = t.checked_add_days(Days::new(days)).unwrap();
        evaluate_at(&[dated("1", eol)], "1", window, t).status
    };
    assert_eq!(evaluate_at(&[dated("1", t)], "1", 90, t).status, EolStatus::Eol);
    assert_eq!(at(1, 90), EolStatus::EolSoon);
    assert_eq!(at(89, 90), EolStatus::EolSoon);
    assert_eq!(at(90, 90), EolStatus::Active);
    assert_eq!(at(1, 0), EolStatus::Active);
}

#[test]
fn test_no_date_falls_back_to_maintained_flag() {
    let t = fixed_today();
    let maintained = [Cycle::new("8").maintained(true)];
    assert_eq!(evaluate_at(&maintained, "8.1", 90, t).status, EolStatus::Active);
    assert_eq!(evaluate_at(&maintained, "8.1", 90, t).days_until_eol, None);

    let unmaintained = [Cycle::new("8")];
    assert_eq!(evaluate_at(&unmaintained, "8.1", 90, t).status, EolStatus::Unknown);

    let not_eol = [Cycle::new("8").with_eol(Milestone::Flag(false)).maintained(true)];
    assert_eq!(evaluate_at(&not_eol, "8.1", 90, t).status, EolStatus::Active);
}

#[test]
fn test_unparsable_date_degrades() {
    let t = fixed_today();
    let cycles = [Cycle::new("5").with_eol(Milestone::Date("soon".to_string()))];
    let eval = evaluate_at(&cycles, "5.0", 90, t);
    assert_eq!(eval.status, EolStatus::Unknown);
    assert_eq!(eval.matched_cycle.as_deref(), Some("5"));
}

#[test]
fn test_lts_and_latest_pass_through() {
    let t = fixed_today();
    let cycles = [Cycle::new("20")
        .with_eol(Milestone::Date("2024-04-30".to_string()))
        .lts(true)
        .with_latest("20.19.0")];
    let eval = evaluate_at(&cycles, "20.11.1", 90, t);
    assert_eq!(eval.status, EolStatus::Eol);
    assert!(eval.is_lts);
    assert_eq!(eval.latest_version.as_deref(), Some("20.19.0"));
}

#[test]
fn test_no_matching_cycle_is_unknown() {
    let eval = evaluate(&[Cycle::new("3.9")], "4.0.0", 90);
    assert_eq!(eval.status, EolStatus::Unknown);
    assert_eq!(eval.matched_cycle, None);
    assert!(evaluate(&[], "1.0", 90).matched_cycle.is_none());
}

// ============================================================================
// Cycle selection
// ============================================================================

#[test]
fn test_prefix_rule() {
    assert!(matches_version("3.9.1", "3.9"));
    assert!(matches_version("3.9", "3.9"));
    assert!(matches_version("3.9-rc1", "3.9"));
    assert!(!matches_version("3.91", "3.9"));
    assert!(!matches_version("3", "3.9"));
}

#[test]
fn test_major_rule() {
    assert!(!matches_major_version("4.0.0", "3.9"));
    assert!(matches_major_version("v2.1.0", "2.0"));
    assert!(!matches_major_version("", ""));
    assert_eq!(major_token("v12.4"), "12");
    assert_eq!(major_token("bookworm"), "bookworm");
}

#[test]
fn test_prefix_match_wins_over_earlier_major_match() {
    let cycles = [Cycle::new("3.12"), Cycle::new("3.9"), Cycle::new("2.7")];
    assert_eq!(match_cycle(&cycles, "3.9.18").unwrap().name, "3.9");
    assert_eq!(match_cycle(&cycles, "3.4.0").unwrap().name, "3.12");
    assert_eq!(match_cycle(&cycles, "v2.1").unwrap().name, "2.7");
    assert!(match_cycle(&cycles, "1.0").is_none());
}

#[test]
fn test_first_prefix_match_in_order() {
    let cycles = [Cycle::new("1.2"), Cycle::new("1")];
    assert_eq!(match_cycle(&cycles, "1.2.3").unwrap().name, "1.2");
    let cycles = [Cycle::new("1"), Cycle::new("1.2")];
    assert_eq!(match_cycle(&cycles, "1.2.3").unwrap().name, "1");
}

#[test]
fn test_eol_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2026, 10, 31);
    assert_eq!(parse_eol_date("2026-10-31"), expected);
    assert_eq!(parse_eol_date("2026-10-31T00:00:00Z"), expected);
    assert_eq!(parse_eol_date("2026-10-31T12:00:00+00:00"), expected);
    assert_eq!(parse_eol_date(" 2026-10-31 "), expected);
    assert_eq!(parse_eol_date("31/10/2026"), None);
    assert_eq!(parse_eol_date(""), None);
}

// ============================================================================
// End to end
// ============================================================================

fn python_catalog() -> Vec<ProductRecord> {
    let in_five_years = iso(today().checked_add_days(Days::new(5 * 365)).unwrap());
    serde_json::from_value(serde_json::json!([{
        "name": "python",
        "category": "lang",
        "releases": [
            {"name": "3.12", "isEol": false, "eolFrom": in_five_years},
            {"name": "2.7", "isEol": true}
        ]
    }]))
    .unwrap()
}

#[test]
fn test_python_27_is_eol_after_purl_miss() {
    let store = CatalogStore::in_memory().unwrap();
    SyncEngine::new(&store, &StaticSource::new(python_catalog()))
        .full_sync(&["lang".to_string()], &CancelToken::new())
        .unwrap();

    let component =
        ComponentDescriptor::new("python", "2.7.18").with_purl("pkg:pypi/python@2.7.18");
    let tables = LookupTables::builtin();
    let hit = Resolver::new(&store, &tables)
        .resolve(&component)
        .unwrap()
        .unwrap();
    assert_eq!(hit.product.name, "python");
    assert_eq!(hit.strategy, MatchStrategy::Name);

    let cycles = store.cycles_for_product(&hit.product.name).unwrap();
    let eval = evaluate(&cycles, &component.version, 90);
    assert_eq!(eval.status, EolStatus::Eol);
    assert_eq!(eval.matched_cycle.as_deref(), Some("2.7"));
}

#[test]
fn test_python_scan_summary() {
    let store = CatalogStore::in_memory().unwrap();
    let scanner = Scanner::new(
        &store,
        ScanOptions {
            categories: vec!["lang".to_string()],
            ..ScanOptions::default()
        },
    );
    let report = scanner
        .ensure_catalog(&StaticSource::new(python_catalog()), &CancelToken::new())
        .unwrap();
    assert!(report.is_some());

    let inventory = Inventory {
        components: vec![
            ComponentDescriptor::new("python", "2.7.18").with_purl("pkg:pypi/python@2.7.18"),
            ComponentDescriptor::new("python3", "3.12.1").with_kind("binary"),
            ComponentDescriptor::new("python", "3.12.1"),
        ],
        ..Inventory::default()
    };
    let summary = scanner.scan(&inventory).unwrap();
    assert_eq!(summary.total_components, 3);
    assert_eq!(summary.eol_components, 1);
    assert_eq!(summary.active_components, 1);
    assert_eq!(summary.unknown_components, 1);
    assert!(summary.has_eol_components());
}
