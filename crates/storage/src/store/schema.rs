#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, params};
use std::collections::BTreeSet;

struct TableContract {
    name: &'static str,
    columns: &'static [&'static str],
}

/// The one schema every query is written against. Column names compare
/// case-insensitively, as SQLite resolves them.
const SCHEMA: [TableContract; 3] = [
    TableContract {
        name: "incident",
        columns: &["id", "location_id", "crime_id", "arrest", "date", "year"],
    },
    TableContract {
        name: "location",
        columns: &["id", "location", "district", "community_area"],
    },
    TableContract {
        name: "crime",
        columns: &["id", "type"],
    },
];

pub(super) fn preflight(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    for table in &SCHEMA {
        let mut rows = stmt.query(params![table.name])?;
        let mut present = BTreeSet::new();
        while let Some(row) = rows.next()? {
            present.insert(row.get::<_, String>(0)?.to_ascii_lowercase());
        }
        if present.is_empty() {
            return Err(StoreError::MissingTable(table.name));
        }
        if let Some(&column) = table
            .columns
            .iter()
            .find(|column| !present.contains(**column))
        {
            return Err(StoreError::MissingColumn {
                table: table.name,
                column,
            });
        }
    }
    Ok(())
}
