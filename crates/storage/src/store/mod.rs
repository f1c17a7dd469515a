#![forbid(unsafe_code)]

mod decode;
mod error;
mod schema;

pub use error::StoreError;

use crate::planner::plan;
use cv_core::{AreaIncidentRatio, MostCommonCrime, QueryPlan, TypeCount, YearTypeCount};
use rusqlite::{Connection, OpenFlags, Row, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A read-only connection to the incident database. Acquire one per render
/// pass and drop it when the pass is done.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |reason: String| StoreError::Unavailable {
            path: path.clone(),
            reason,
        };
        if !path.is_file() {
            return Err(unavailable("database file not found".to_string()));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| unavailable(err.to_string()))?;

        match schema::preflight(&conn) {
            Ok(()) => {}
            Err(StoreError::Sql(err)) => return Err(unavailable(err.to_string())),
            Err(err) => return Err(err),
        }

        debug!(path = %path.display(), "store opened");
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn query<T>(
        &self,
        query: &QueryPlan,
        mut decode: impl FnMut(&Row<'_>, &'static str) -> Result<T, StoreError>,
    ) -> Result<Vec<T>, StoreError> {
        let planned = plan(query);
        let mut stmt = self.conn.prepare_cached(planned.sql)?;
        let mut rows = stmt.query(params_from_iter(planned.params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(decode(row, planned.name)?);
        }
        debug!(
            query = planned.name,
            params = planned.params.len(),
            rows = out.len(),
            "query executed"
        );
        Ok(out)
    }

    /// Non-NULL values of one label column, in result order.
    fn labels(&self, query: &QueryPlan, column: usize) -> Result<Vec<String>, StoreError> {
        let values = self.query(query, |row, name| decode::label(row, column, name))?;
        Ok(values.into_iter().flatten().collect())
    }

    fn type_counts(&self, query: &QueryPlan) -> Result<Vec<TypeCount>, StoreError> {
        self.query(query, |row, name| {
            Ok(TypeCount {
                crime_type: decode::group_label(row, 0, name)?,
                count: decode::count(row, 1, name)?,
            })
        })
    }

    /// Location name of every location row, ordered by id.
    pub fn location_names(&self) -> Result<Vec<String>, StoreError> {
        self.labels(&QueryPlan::LocationNames, 0)
    }

    /// Crime type of every crime row, ordered by id.
    pub fn crime_types(&self) -> Result<Vec<String>, StoreError> {
        self.labels(&QueryPlan::CrimeTypes, 1)
    }

    pub fn arrest_flags(&self) -> Result<Vec<bool>, StoreError> {
        let flags = self.query(&QueryPlan::ArrestFlags, |row, name| {
            decode::arrest_flag(row, 0, name)
        })?;
        Ok(flags.into_iter().flatten().collect())
    }

    /// Raw incident dates as stored; parsing is left to the aggregator.
    pub fn incident_dates(&self) -> Result<Vec<String>, StoreError> {
        self.labels(&QueryPlan::IncidentDates, 0)
    }

    pub fn district_options(&self) -> Result<Vec<String>, StoreError> {
        self.labels(&QueryPlan::DistrictOptions, 0)
    }

    pub fn district_crime_counts(&self, district: &str) -> Result<Vec<TypeCount>, StoreError> {
        self.type_counts(&QueryPlan::DistrictCrimeCounts {
            district: district.to_string(),
        })
    }

    pub fn district_location_options(&self, district: &str) -> Result<Vec<String>, StoreError> {
        self.labels(
            &QueryPlan::DistrictLocationOptions {
                district: district.to_string(),
            },
            0,
        )
    }

    pub fn district_location_crime_counts(
        &self,
        district: &str,
        location: &str,
    ) -> Result<Vec<TypeCount>, StoreError> {
        self.type_counts(&QueryPlan::DistrictLocationCrimeCounts {
            district: district.to_string(),
            location: location.to_string(),
        })
    }

    pub fn location_options(&self) -> Result<Vec<String>, StoreError> {
        self.labels(&QueryPlan::LocationOptions, 0)
    }

    /// Crime-type counts at one location, largest first.
    pub fn location_crime_counts(&self, location: &str) -> Result<Vec<TypeCount>, StoreError> {
        self.type_counts(&QueryPlan::LocationCrimeCounts {
            location: location.to_string(),
        })
    }

    pub fn most_common_per_district(&self) -> Result<Vec<MostCommonCrime>, StoreError> {
        self.query(&QueryPlan::FaqMostCommonPerDistrict, |row, name| {
            Ok(MostCommonCrime {
                district: decode::group_label(row, 0, name)?,
                crime_type: decode::group_label(row, 1, name)?,
                total_incidents: decode::count(row, 2, name)?,
            })
        })
    }

    pub fn incidents_per_community_area(&self) -> Result<Vec<AreaIncidentRatio>, StoreError> {
        self.query(&QueryPlan::FaqIncidentsPerCommunityArea, |row, name| {
            Ok(AreaIncidentRatio {
                crime_type: decode::group_label(row, 0, name)?,
                community_area: decode::group_label(row, 1, name)?,
                total_incidents: decode::count(row, 2, name)?,
                total_locations: decode::count(row, 3, name)?,
                incidents_per_location: decode::real(row, 4, name)?,
            })
        })
    }

    pub fn year_distribution(&self) -> Result<Vec<YearTypeCount>, StoreError> {
        self.query(&QueryPlan::FaqYearDistribution, |row, name| {
            Ok(YearTypeCount {
                year: decode::year(row, 0, name)?,
                crime_type: decode::group_label(row, 1, name)?,
                total_incidents: decode::count(row, 2, name)?,
            })
        })
    }
}
