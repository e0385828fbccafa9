use address_map::dashboard::{Selection, build_view};
use address_map::loader::parse_csv;
use address_map::{Config, DashboardError, Rendered, VisitFilter};
use std::collections::BTreeSet;

const CSV: &str = "\
First,Last,Address,City,State,Zip,Latitude,Longitude,Visited By
Jane,Doe,1 Main St,Springfield,IL,62701,39.78,-89.65,Alice
John,Roe,1 Main St,Springfield,IL,62701,39.80,-89.60,
Ann,Poe,7 Elm St,Chatham,IL,62629,39.67,-89.70,
Bo,Moe,9 Oak St,Rochester,IL,62563,N/A,-89.53,Bob
";

fn config() -> Config {
    Config {
        app_password: "pw".into(),
        spreadsheet_id: "abc".into(),
        ..Config::default()
    }
}

#[test]
fn test_default_selection_shows_everything() {
    let config = config();
    let selection = Selection::default();
    let month = selection.month(&config).unwrap();
    let view = build_view(&config, month, &parse_csv(CSV).unwrap(), &selection).unwrap();

    assert_eq!(view.month, "September");
    assert_eq!(view.cities, vec!["Chatham", "Springfield"]);
    assert_eq!(view.selected_cities, view.cities);
    assert_eq!(view.visit_options, vec!["All", "Not Visited", "Alice"]);
    assert_eq!(view.visit, "All");
    assert_eq!((view.total, view.shown), (2, 2));
    assert_eq!(view.report.duplicates, 1);
    assert_eq!(view.report.bad_coordinates, 1);
    assert_eq!(view.rendered.map().unwrap().markers.len(), 2);
}

#[test]
fn test_excluding_every_city_renders_warning() {
    let config = config();
    let selection = Selection {
        month: Some("October".into()),
        cities: Some(BTreeSet::new()),
        visit: VisitFilter::All,
        filters_month: Some("October".into()),
    };
    let month = selection.month(&config).unwrap();
    let view = build_view(&config, month, &parse_csv(CSV).unwrap(), &selection).unwrap();

    assert_eq!(view.month, "October");
    assert_eq!(view.shown, 0);
    assert!(matches!(view.rendered, Rendered::Empty { .. }));
}

#[test]
fn test_filters_from_another_month_are_reset() {
    let config = config();
    let selection = Selection {
        month: Some("October".into()),
        cities: Some(BTreeSet::from(["Springfield".to_string()])),
        visit: VisitFilter::parse("Alice"),
        filters_month: Some("September".into()),
    };
    let month = selection.month(&config).unwrap();
    let view = build_view(&config, month, &parse_csv(CSV).unwrap(), &selection).unwrap();

    assert_eq!(view.month, "October");
    assert_eq!(view.selected_cities, vec!["Chatham", "Springfield"]);
    assert_eq!(view.visit, "All");
    assert_eq!((view.total, view.shown), (2, 2));
}

#[test]
fn test_filters_for_the_loaded_month_still_apply() {
    let config = config();
    let selection = Selection {
        month: Some("October".into()),
        cities: Some(BTreeSet::from(["Springfield".to_string()])),
        visit: VisitFilter::parse("Alice"),
        filters_month: Some("October".into()),
    };
    let month = selection.month(&config).unwrap();
    let view = build_view(&config, month, &parse_csv(CSV).unwrap(), &selection).unwrap();

    assert_eq!(view.selected_cities, vec!["Springfield"]);
    assert_eq!(view.visit, "Alice");
    assert_eq!(view.shown, 1);
}

#[test]
fn test_unknown_month_is_rejected() {
    let selection = Selection {
        month: Some("Smarch".into()),
        ..Selection::default()
    };
    assert!(matches!(
        selection.month(&config()),
        Err(DashboardError::UnknownMonth(ref m)) if m == "Smarch"
    ));
}
