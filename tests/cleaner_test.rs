use address_map::cleaner::clean;
use address_map::loader::parse_csv;
use address_map::{DashboardError, RawTable};
use std::collections::HashSet;

const HEADER: &str = "First,Last,Address,City,State,Zip,Latitude,Longitude,Visited By\n";

fn table(rows: &str) -> RawTable {
    parse_csv(&format!("{HEADER}{rows}")).expect("valid csv")
}

#[test]
fn test_duplicate_key_keeps_first_row() {
    let raw = table(
        "Jane,Doe,1 Main St,Springfield,IL,62701,39.78,-89.65,Alice\n\
         John,Smith,1 Main St,Springfield,IL,62701,39.80,-89.60,\n",
    );
    let cleaned = clean(&raw).unwrap();

    assert_eq!(cleaned.dataset.len(), 1);
    let kept = &cleaned.dataset.records()[0];
    assert_eq!(kept.first, "Jane");
    assert_eq!(kept.last, "Doe");
    assert_eq!(kept.visited_by.as_deref(), Some("Alice"));
    assert_eq!(cleaned.report.duplicates, 1);
}

#[test]
fn test_unparseable_latitude_is_dropped() {
    let raw = table(
        "A,One,1 Oak Ave,Springfield,IL,62701,39.70,-89.60,\n\
         B,Two,2 Oak Ave,Springfield,IL,62701,N/A,-89.61,\n\
         C,Three,3 Oak Ave,Chatham,IL,62629,39.67,-89.70,\n",
    );
    let cleaned = clean(&raw).unwrap();

    assert_eq!(cleaned.dataset.len(), raw.rows.len() - 1);
    assert!(cleaned.dataset.iter().all(|r| r.last != "Two"));
    assert_eq!(cleaned.report.bad_coordinates, 1);
}

#[test]
fn test_non_finite_coordinates_are_dropped() {
    let raw = table(
        "A,One,1 Oak Ave,Springfield,IL,62701,inf,-89.60,\n\
         B,Two,2 Oak Ave,Springfield,IL,62701,39.7,NaN,\n",
    );
    let cleaned = clean(&raw).unwrap();
    assert!(cleaned.dataset.is_empty());
    assert_eq!(cleaned.report.bad_coordinates, 2);
}

#[test]
fn test_whitespace_is_trimmed() {
    let raw = table("  Jane , Doe ,  1 Main St ,Springfield , IL, 62701 , 39.78 , -89.65 ,  \n");
    let cleaned = clean(&raw).unwrap();

    let r = &cleaned.dataset.records()[0];
    assert_eq!(r.first, "Jane");
    assert_eq!(r.address, "1 Main St");
    assert_eq!(r.city, "Springfield");
    assert_eq!(r.zip, "62701");
    assert_eq!(r.latitude, 39.78);
    assert_eq!(r.visited_by, None);
}

#[test]
fn test_blank_and_incomplete_rows_are_dropped() {
    let raw = table(
        ",,,,,,,,\n\
         \x20, , , , , , , , \n\
         Jane,Doe,,Springfield,IL,62701,39.78,-89.65,\n\
         Jane,Doe,  ,Springfield,IL,62701,39.78,-89.65,\n\
         Jane,Doe,5 Elm St,,IL,62701,39.78,-89.65,\n\
         Jane,Doe,6 Elm St,Springfield,IL,62701,39.78,-89.65,\n",
    );
    let cleaned = clean(&raw).unwrap();

    assert_eq!(cleaned.dataset.len(), 1);
    assert_eq!(cleaned.report.blank, 2);
    assert_eq!(cleaned.report.missing_fields, 3);
    assert_eq!(cleaned.report.dropped(), 5);
}

#[test]
fn test_dedup_compares_trimmed_keys() {
    let raw = table(
        "A,One,1 Main St,Springfield,IL,62701,39.78,-89.65,\n\
         B,Two, 1 Main St ,Springfield ,IL,62701,39.79,-89.66,\n",
    );
    assert_eq!(clean(&raw).unwrap().dataset.len(), 1);
}

#[test]
fn test_cleaned_records_satisfy_invariants() {
    let raw = table(
        "A,One,1 Main St,Springfield,IL,62701,39.78,-89.65,\n\
         B,Two,1 Main St,Springfield,IL,62701,x,-89.65,\n\
         C,Three,2 Main St,Springfield,IL,,39.70,-89.60,\n\
         D,Four,3 Main St,Chatham,IL,62629,39.67,-89.70,Bob\n\
         ,,,,,,,,\n\
         E,Five,4 Main St,Chatham,IL,62629,39.60,,\n\
         F,Six,5 Main St,Rochester,IL,62563,39.74,-89.53,\"Alice, Bob\"\n",
    );
    let cleaned = clean(&raw).unwrap();

    let mut keys = HashSet::new();
    for r in &cleaned.dataset {
        for field in [&r.address, &r.city, &r.state, &r.zip] {
            assert!(!field.is_empty());
            assert_eq!(field.trim(), field);
        }
        assert!(r.latitude.is_finite() && r.longitude.is_finite());
        assert!(keys.insert((r.address.clone(), r.city.clone(), r.state.clone(), r.zip.clone())));
    }
    assert_eq!(cleaned.dataset.len(), 3);
}

#[test]
fn test_cleaning_is_idempotent() {
    let raw = table(
        " A ,One,1 Main St,Springfield,IL,62701,39.781,-89.650,\n\
         B,Two,1 Main St,Springfield,IL,62701,39.78,-89.65,\n\
         D,Four,3 Main St,Chatham,IL,62629,39.6712345,-89.7,\"Alice, Bob\"\n",
    );
    let once = clean(&raw).unwrap().dataset;
    let twice = clean(&once.to_raw()).unwrap();

    assert_eq!(twice.dataset, once);
    assert_eq!(twice.report.dropped(), 0);
}

#[test]
fn test_input_order_is_preserved() {
    let raw = table(
        "A,Zeta,9 Main St,Springfield,IL,62701,39.1,-89.1,\n\
         B,Alpha,1 Main St,Springfield,IL,62701,39.2,-89.2,\n\
         C,Mu,5 Main St,Springfield,IL,62701,39.3,-89.3,\n",
    );
    let lasts: Vec<_> = clean(&raw)
        .unwrap()
        .dataset
        .iter()
        .map(|r| r.last.clone())
        .collect();
    assert_eq!(lasts, vec!["Zeta", "Alpha", "Mu"]);
}

#[test]
fn test_missing_required_column_is_an_error() {
    let raw = parse_csv("First,Last,Address,City,State,Zip,Latitude\nA,B,1 Main,X,IL,1,39\n").unwrap();
    let err = clean(&raw).unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumn(ref c) if c == "Longitude"));
}

#[test]
fn test_visited_by_column_is_optional() {
    let raw = parse_csv("First,Last,Address,City,State,Zip,Latitude,Longitude\nA,B,1 Main,X,IL,1,39,-89\n").unwrap();
    let cleaned = clean(&raw).unwrap();
    assert_eq!(cleaned.dataset.len(), 1);
    assert!(!cleaned.dataset.records()[0].is_visited());
}

#[test]
fn test_short_rows_are_padded_not_indexed_past_the_end() {
    let headers = ["First", "Last", "Address", "City", "State", "Zip", "Latitude", "Longitude"];
    let raw = RawTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: vec![
            vec!["Jane".into(), "Doe".into()],
            ["Ann", "Poe", "7 Elm St", "Chatham", "IL", "62629", "39.67", "-89.70"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            vec![],
        ],
    };
    let cleaned = clean(&raw).unwrap();

    assert_eq!(cleaned.report.missing_fields, 1);
    assert_eq!(cleaned.report.blank, 1);
    assert_eq!(cleaned.dataset.len(), 1);
    let kept = &cleaned.dataset.records()[0];
    assert_eq!(kept.last, "Poe");
    assert_eq!(kept.visited_by, None);
}
