#![forbid(unsafe_code)]

use rusqlite::Connection;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const FIXTURE_SQL: &str = r#"
CREATE TABLE location (id INTEGER PRIMARY KEY, location TEXT, district INTEGER, community_area TEXT);
CREATE TABLE crime (id INTEGER PRIMARY KEY, type TEXT);
CREATE TABLE incident (id INTEGER PRIMARY KEY, location_id INTEGER, crime_id INTEGER, arrest, date TEXT, year INTEGER);
INSERT INTO location VALUES (1, 'STREET', 1, '32'), (2, 'ALLEY', 1, '32'), (3, 'STREET', 2, '8');
INSERT INTO crime VALUES (1, 'THEFT'), (2, 'BATTERY');
INSERT INTO incident VALUES
    (1, 1, 1, 1, '2023-05-01', 2023),
    (2, 2, 1, 0, '2023-05-02', 2023),
    (3, 1, 2, 1, '2022-05-02', 2022),
    (4, 3, 1, 0, 'garbled', 2021);
"#;

fn fixture() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("crimes.sqlite");
    let conn = Connection::open(&path).expect("create fixture db");
    conn.execute_batch(FIXTURE_SQL).expect("seed fixture db");
    drop(conn);
    (dir, path)
}

fn crimeview(db: Option<&Path>, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_crimeview");
    let mut command = Command::new(exe);
    command
        .env_remove("CRIMEVIEW_DB")
        .env_remove("CRIMEVIEW_CONFIG")
        .env_remove("CRIMEVIEW_LISTEN")
        .env("RUST_LOG", "off");
    if let Some(db) = db {
        command.arg("--db").arg(db);
    }
    command.args(args).output().expect("run crimeview")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "expected zero exit (stderr={})",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn help_exits_zero() {
    let output = crimeview(None, &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("render"), "help lists subcommands: {stdout}");
    assert!(stdout.contains("serve"), "help lists subcommands: {stdout}");
}

#[test]
fn version_includes_pkg_version() {
    let output = crimeview(None, &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{stdout}");
}

#[test]
fn pages_lists_the_sidebar() {
    let value = stdout_json(&crimeview(None, &["pages"]));
    assert_eq!(value["title"], "Navigation");
    assert_eq!(value["items"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["items"][4]["title"], "FAQs");
}

#[test]
fn render_insights_against_a_fixture() {
    let (_dir, db) = fixture();
    let value = stdout_json(&crimeview(Some(&db), &["render", "--page", "insights"]));
    assert_eq!(value["title"], "Crime Insights Dashboard");

    let charts = &value["sections"][1]["charts"];
    assert_eq!(charts[0]["kind"], "bar");
    assert_eq!(charts[0]["bars"][0]["label"], "STREET");
    assert_eq!(charts[0]["bars"][0]["value"], 2);
    assert_eq!(charts[2]["bars"][0]["label"], "Wanted");
    assert_eq!(charts[2]["bars"][0]["value"], 2);
    assert_eq!(charts[3]["kind"], "line");
    assert_eq!(charts[3]["points"].as_array().map(Vec::len), Some(2));
}

#[test]
fn render_district_defaults_to_first_options() {
    let (_dir, db) = fixture();
    let value = stdout_json(&crimeview(Some(&db), &["render", "--page", "district"]));
    assert_eq!(value["selectors"][0]["selected"], "1");
    assert_eq!(value["selectors"][1]["selected"], "ALLEY");
    assert_eq!(
        value["sections"][0]["charts"][0]["title"],
        "Crimes in District 1"
    );
    assert_eq!(
        value["sections"][1]["charts"][0]["title"],
        "Crimes in Location ALLEY, District 1"
    );
}

#[test]
fn invalid_selection_degrades_to_a_message() {
    let (_dir, db) = fixture();
    let value = stdout_json(&crimeview(
        Some(&db),
        &["render", "--page", "location", "--location", "ROOFTOP"],
    ));
    assert_eq!(value["selectors"][0]["selected"], Value::Null);
    assert_eq!(value["sections"][0]["charts"][0]["kind"], "empty");
    assert_eq!(
        value["sections"][0]["charts"][0]["message"],
        "No crime data available for the location: ROOFTOP."
    );
}

#[test]
fn render_faq_by_number() {
    let (_dir, db) = fixture();
    let value = stdout_json(&crimeview(
        Some(&db),
        &["render", "--page", "faqs", "--question", "3"],
    ));
    let table = &value["sections"][0]["charts"][0];
    assert_eq!(table["kind"], "table");
    assert_eq!(table["columns"][0], "Year");
    assert_eq!(table["rows"][0][0], 2021);
}

#[test]
fn plan_lists_bound_queries() {
    let (_dir, db) = fixture();
    let value = stdout_json(&crimeview(
        Some(&db),
        &["plan", "--page", "location", "--location", "STREET"],
    ));
    let queries = value["queries"].as_array().expect("queries");
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1]["name"], "location_crime_counts");
    assert_eq!(queries[1]["params"][0], "STREET");
}

#[test]
fn missing_database_exits_non_zero() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent.sqlite");
    let output = crimeview(Some(&missing), &["render", "--page", "insights"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: store unavailable"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_page_exits_non_zero() {
    let output = crimeview(None, &["render", "--page", "settings"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown page: settings"), "{stderr}");
}
