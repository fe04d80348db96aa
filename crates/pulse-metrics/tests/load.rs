//! End-to-end tests for loading an export from disk and aggregating it.

use std::io::Write;

use chrono::{Duration, Utc};
use pulse_metrics::{derive_report, load_posts, Derivation, DeriverConfig, Field, MetricsError};

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(content.as_bytes()).expect("write fixture");
    path
}

fn day(days_ago: i64) -> String {
    (Utc::now() - Duration::days(days_ago))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[test]
fn missing_file_is_reported_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = load_posts(&path, 0.0).unwrap_err();
    assert!(
        matches!(err, MetricsError::InputNotFound(ref p) if *p == path),
        "expected InputNotFound, got: {err:?}"
    );
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn missing_date_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "posts.csv", "likes,comments\n1,2\n");
    let err = load_posts(&path, 0.0).unwrap_err();
    assert!(matches!(err, MetricsError::MissingRequiredColumn { .. }));
}

#[test]
fn versioned_columns_win_and_bad_dates_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        "Date,Date_V4,ER,ER_v4,URL\n\
         ignored,{},9.9,1.5%,https://x/1\n\
         ignored,garbage,9.9,2.0,https://x/2\n\
         ignored,{},9.9,\"2,5\",https://x/3\n",
        day(1),
        day(2),
    );
    let path = write_csv(&dir, "posts.csv", &content);
    let dataset = load_posts(&path, 0.0).unwrap();

    assert_eq!(dataset.columns.name(Field::Date), Some("Date_V4"));
    assert_eq!(dataset.columns.name(Field::Er), Some("ER_v4"));
    assert_eq!(dataset.dropped_rows, 1);
    assert_eq!(dataset.posts.len(), 2);
    assert_eq!(dataset.posts[0].er, Some(1.5));
    assert_eq!(dataset.posts[1].er, Some(25.0));
    assert_eq!(dataset.posts[1].index, 2);
}

#[test]
fn export_without_recent_posts_yields_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!("date,er\n{},1.0\n{},2.0\n", day(40), day(90));
    let path = write_csv(&dir, "posts.csv", &content);
    let dataset = load_posts(&path, 0.0).unwrap();
    assert_eq!(dataset.posts.len(), 2);
    let outcome = derive_report(
        &dataset.posts,
        &DeriverConfig::default(),
        dataset.columns.has(Field::Territory),
        Utc::now(),
    );
    assert!(matches!(outcome, Derivation::NoData));
}

#[test]
fn derives_rates_from_counts_and_fallback_followers() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!(
        "date,likes,comments,views,territory\n\
         {},90,10,1000,North\n\
         {},40,10,500,South\n\
         {},10,0,0,North\n",
        day(1),
        day(3),
        day(31),
    );
    let path = write_csv(&dir, "posts.csv", &content);
    let dataset = load_posts(&path, 1000.0).unwrap();
    let config = DeriverConfig {
        baseline_er: 5.0,
        baseline_ivr: 12.0,
        window_days: 30,
    };

    let Derivation::Report(report) =
        derive_report(&dataset.posts, &config, true, Utc::now())
    else {
        panic!("expected a report");
    };

    // ER: 10% and 5%; p95 = 9.75 trims the 10% row.
    assert_eq!(report.window.members.len(), 2);
    assert_eq!(report.window.trimmed_members.len(), 1);
    let er_median = report.window.er_median.unwrap();
    assert!((er_median - 5.0).abs() < 1e-9);
    assert!(report.window.er_delta.unwrap().abs() < 1e-9);
    let ivr_delta = report.window.ivr_delta.unwrap();
    assert!((ivr_delta - (-2.0)).abs() < 1e-9);

    let territories = report.territories.expect("territory column present");
    assert_eq!(territories.len(), 1);
    assert_eq!(territories[0].to_string(), "South: 5.00%");
}
