#![forbid(unsafe_code)]

//! Rows as they come back from the incident store, already canonicalized.

/// Label shown for a NULL category in grouped results.
pub const NULL_LABEL: &str = "None";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCount {
    pub crime_type: String,
    pub count: u64,
}

impl TypeCount {
    pub fn new(crime_type: impl Into<String>, count: u64) -> Self {
        Self {
            crime_type: crime_type.into(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MostCommonCrime {
    pub district: String,
    pub crime_type: String,
    pub total_incidents: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AreaIncidentRatio {
    pub crime_type: String,
    pub community_area: String,
    pub total_incidents: u64,
    pub total_locations: u64,
    pub incidents_per_location: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearTypeCount {
    /// `None` when the incident has no year recorded.
    pub year: Option<i64>,
    pub crime_type: String,
    pub total_incidents: u64,
}
