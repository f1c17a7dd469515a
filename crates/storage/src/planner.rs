#![forbid(unsafe_code)]

//! Query plans to SQL. Filters are always bound parameters, never spliced
//! into the statement text. District filters compare the text form of the
//! column, the same form the district dropdown is populated with.

use cv_core::QueryPlan;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedQuery {
    pub name: &'static str,
    pub sql: &'static str,
    pub params: Vec<String>,
}

const LOCATION_NAMES: &str = "SELECT location FROM location ORDER BY id";

const CRIME_TYPES: &str = "SELECT id, type FROM crime ORDER BY id";

const ARREST_FLAGS: &str = "SELECT arrest FROM incident ORDER BY id";

const INCIDENT_DATES: &str = "SELECT date FROM incident ORDER BY id";

// Grouped on the text form so `7` and `'7'` are one option; ordered by the
// stored value so numeric districts sort numerically.
const DISTRICT_OPTIONS: &str = r#"
SELECT CAST(district AS TEXT)
FROM location
WHERE district IS NOT NULL
GROUP BY CAST(district AS TEXT)
ORDER BY MIN(district)
"#;

const DISTRICT_CRIME_COUNTS: &str = r#"
SELECT c.type, COUNT(*) AS count
FROM incident i
JOIN location l ON i.location_id = l.id
JOIN crime c ON i.crime_id = c.id
WHERE CAST(l.district AS TEXT) = ?1
GROUP BY c.type
ORDER BY c.type
"#;

const DISTRICT_LOCATION_OPTIONS: &str = r#"
SELECT DISTINCT location
FROM location
WHERE CAST(district AS TEXT) = ?1 AND location IS NOT NULL
ORDER BY location
"#;

const DISTRICT_LOCATION_CRIME_COUNTS: &str = r#"
SELECT c.type, COUNT(*) AS count
FROM incident i
JOIN location l ON i.location_id = l.id
JOIN crime c ON i.crime_id = c.id
WHERE CAST(l.district AS TEXT) = ?1 AND l.location = ?2
GROUP BY c.type
ORDER BY c.type
"#;

const LOCATION_OPTIONS: &str = r#"
SELECT DISTINCT location
FROM location
WHERE location IS NOT NULL
ORDER BY location
"#;

const LOCATION_CRIME_COUNTS: &str = r#"
SELECT c.type AS crime_type, COUNT(*) AS count
FROM incident i
JOIN location l ON i.location_id = l.id
JOIN crime c ON i.crime_id = c.id
WHERE l.location = ?1
GROUP BY c.type
ORDER BY count DESC, c.type ASC
"#;

// RANK() leaves tied crime types on rank 1, so a district can answer with
// more than one row.
const FAQ_MOST_COMMON_PER_DISTRICT: &str = r#"
WITH crime_counts AS (
    SELECT
        CAST(l.district AS TEXT) AS district,
        MIN(l.district) AS district_key,
        c.type,
        COUNT(*) AS total_incidents
    FROM incident AS i
    JOIN location AS l ON i.location_id = l.id
    JOIN crime AS c ON i.crime_id = c.id
    GROUP BY CAST(l.district AS TEXT), c.type
),
ranked AS (
    SELECT
        district,
        MIN(district_key) OVER (PARTITION BY district) AS district_order,
        type,
        total_incidents,
        RANK() OVER (PARTITION BY district ORDER BY total_incidents DESC) AS ranks
    FROM crime_counts
)
SELECT district, type AS most_common_crime, total_incidents
FROM ranked
WHERE ranks = 1
ORDER BY district_order, type
"#;

const FAQ_INCIDENTS_PER_COMMUNITY_AREA: &str = r#"
SELECT
    c.type,
    CAST(l.community_area AS TEXT) AS community_area,
    COUNT(DISTINCT i.id) AS total_incidents,
    COUNT(DISTINCT l.id) AS total_locations,
    CAST(COUNT(DISTINCT i.id) AS REAL) / COUNT(DISTINCT l.id) AS incidents_per_location
FROM incident AS i
JOIN location AS l ON i.location_id = l.id
JOIN crime AS c ON i.crime_id = c.id
GROUP BY c.type, CAST(l.community_area AS TEXT)
ORDER BY c.type, incidents_per_location DESC, community_area
"#;

// NULL years group together and sort first.
const FAQ_YEAR_DISTRIBUTION: &str = r#"
SELECT CAST(i.year AS INTEGER) AS year, c.type, COUNT(*) AS total_incidents
FROM incident AS i
JOIN crime AS c ON i.crime_id = c.id
GROUP BY CAST(i.year AS INTEGER), c.type
ORDER BY year, c.type
"#;

pub fn plan(query: &QueryPlan) -> PlannedQuery {
    let (name, sql, params) = match query {
        QueryPlan::LocationNames => ("location_names", LOCATION_NAMES, Vec::new()),
        QueryPlan::CrimeTypes => ("crime_types", CRIME_TYPES, Vec::new()),
        QueryPlan::ArrestFlags => ("arrest_flags", ARREST_FLAGS, Vec::new()),
        QueryPlan::IncidentDates => ("incident_dates", INCIDENT_DATES, Vec::new()),
        QueryPlan::DistrictOptions => ("district_options", DISTRICT_OPTIONS, Vec::new()),
        QueryPlan::DistrictCrimeCounts { district } => (
            "district_crime_counts",
            DISTRICT_CRIME_COUNTS,
            vec![district.clone()],
        ),
        QueryPlan::DistrictLocationOptions { district } => (
            "district_location_options",
            DISTRICT_LOCATION_OPTIONS,
            vec![district.clone()],
        ),
        QueryPlan::DistrictLocationCrimeCounts { district, location } => (
            "district_location_crime_counts",
            DISTRICT_LOCATION_CRIME_COUNTS,
            vec![district.clone(), location.clone()],
        ),
        QueryPlan::LocationOptions => ("location_options", LOCATION_OPTIONS, Vec::new()),
        QueryPlan::LocationCrimeCounts { location } => (
            "location_crime_counts",
            LOCATION_CRIME_COUNTS,
            vec![location.clone()],
        ),
        QueryPlan::FaqMostCommonPerDistrict => (
            "faq_most_common_per_district",
            FAQ_MOST_COMMON_PER_DISTRICT,
            Vec::new(),
        ),
        QueryPlan::FaqIncidentsPerCommunityArea => (
            "faq_incidents_per_community_area",
            FAQ_INCIDENTS_PER_COMMUNITY_AREA,
            Vec::new(),
        ),
        QueryPlan::FaqYearDistribution => (
            "faq_year_distribution",
            FAQ_YEAR_DISTRIBUTION,
            Vec::new(),
        ),
    };
    PlannedQuery { name, sql, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(sql: &str) -> usize {
        (1..=9).filter(|n| sql.contains(&format!("?{n}"))).count()
    }

    #[test]
    fn bound_parameters_match_placeholders() {
        let plans = [
            QueryPlan::LocationNames,
            QueryPlan::CrimeTypes,
            QueryPlan::ArrestFlags,
            QueryPlan::IncidentDates,
            QueryPlan::DistrictOptions,
            QueryPlan::DistrictCrimeCounts {
                district: "1".to_string(),
            },
            QueryPlan::DistrictLocationOptions {
                district: "1".to_string(),
            },
            QueryPlan::DistrictLocationCrimeCounts {
                district: "1".to_string(),
                location: "STREET".to_string(),
            },
            QueryPlan::LocationOptions,
            QueryPlan::LocationCrimeCounts {
                location: "STREET".to_string(),
            },
            QueryPlan::FaqMostCommonPerDistrict,
            QueryPlan::FaqIncidentsPerCommunityArea,
            QueryPlan::FaqYearDistribution,
        ];
        for query in &plans {
            let planned = plan(query);
            assert_eq!(
                placeholders(planned.sql),
                planned.params.len(),
                "{}",
                planned.name
            );
        }
    }

    #[test]
    fn filter_values_never_reach_sql_text() {
        let hostile = "x' OR '1'='1";
        let planned = plan(&QueryPlan::LocationCrimeCounts {
            location: hostile.to_string(),
        });
        assert!(!planned.sql.contains(hostile));
        assert_eq!(planned.params, vec![hostile.to_string()]);
    }

    #[test]
    fn planning_is_deterministic() {
        let query = QueryPlan::DistrictLocationCrimeCounts {
            district: "4".to_string(),
            location: "ALLEY".to_string(),
        };
        assert_eq!(plan(&query), plan(&query));
        assert_eq!(plan(&query).params, vec!["4", "ALLEY"]);
    }
}
