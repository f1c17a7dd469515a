#![forbid(unsafe_code)]

use crate::model::{AreaIncidentRatio, MostCommonCrime, NULL_LABEL, YearTypeCount};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Real(value)
    }
}

/// A FAQ answer exactly as the query returned it, column names included.
#[derive(Clone, Debug, PartialEq)]
pub struct FaqTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl FaqTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn most_common_table(rows: &[MostCommonCrime]) -> FaqTable {
    FaqTable {
        columns: vec!["District", "MostCommonCrime", "TotalIncidents"],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    row.district.as_str().into(),
                    row.crime_type.as_str().into(),
                    row.total_incidents.into(),
                ]
            })
            .collect(),
    }
}

pub fn incidents_per_area_table(rows: &[AreaIncidentRatio]) -> FaqTable {
    FaqTable {
        columns: vec![
            "Type",
            "Community_area",
            "TotalIncidents",
            "TotalCommunityAreas",
            "AvgIncidentsPerCommunityArea",
        ],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    row.crime_type.as_str().into(),
                    row.community_area.as_str().into(),
                    row.total_incidents.into(),
                    row.total_locations.into(),
                    row.incidents_per_location.into(),
                ]
            })
            .collect(),
    }
}

pub fn year_distribution_table(rows: &[YearTypeCount]) -> FaqTable {
    FaqTable {
        columns: vec!["Year", "Type", "TotalIncidents"],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    row.year.map_or_else(|| Cell::from(NULL_LABEL), Cell::from),
                    row.crime_type.as_str().into(),
                    row.total_incidents.into(),
                ]
            })
            .collect(),
    }
}
