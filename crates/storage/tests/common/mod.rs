#![forbid(unsafe_code)]
#![allow(dead_code)]

use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE location (
    id INTEGER PRIMARY KEY,
    location TEXT,
    district INTEGER,
    community_area TEXT
);
CREATE TABLE crime (
    id INTEGER PRIMARY KEY,
    type TEXT
);
CREATE TABLE incident (
    id INTEGER PRIMARY KEY,
    location_id INTEGER,
    crime_id INTEGER,
    arrest,
    date TEXT,
    year INTEGER
);
"#;

/// Five locations over four districts (district 4 has no incidents and one
/// location has no name), three crime types, eight incidents.
pub const SEED_SQL: &str = r#"
INSERT INTO location (id, location, district, community_area) VALUES
    (1, 'STREET', 1, '32'),
    (2, 'ALLEY', 1, '32'),
    (3, 'STREET', 2, '8'),
    (4, NULL, 3, '8'),
    (5, 'GARAGE', 4, '40');
INSERT INTO crime (id, type) VALUES
    (1, 'THEFT'),
    (2, 'BATTERY'),
    (3, 'ASSAULT');
INSERT INTO incident (id, location_id, crime_id, arrest, date, year) VALUES
    (1, 1, 1, 1, '2023-05-01', 2023),
    (2, 2, 1, 0, '2023-05-02 10:00:00', 2023),
    (3, 1, 2, 'true', '05/03/2022 11:30:00 PM', 2022),
    (4, 1, 2, NULL, '2022-06-01', 2022),
    (5, 3, 1, 1, '2021-05-03T08:00:00', 2021),
    (6, 3, 1, 0, '2021-07-04', 2021),
    (7, 3, 1, 1, 'unknown', 2021),
    (8, 4, 3, 0, '2020-05-01', 2020);
"#;

pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

/// Builds a database file with a writable connection, then closes it so the
/// store under test is the only reader.
pub fn database(sql: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("crimes.sqlite");
    let conn = Connection::open(&path).expect("create fixture db");
    conn.execute_batch(sql).expect("seed fixture db");
    drop(conn);
    Fixture { _dir: dir, path }
}

pub fn seeded() -> Fixture {
    database(&format!("{SCHEMA_SQL}{SEED_SQL}"))
}
