#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Overview,
    Insights,
    DistrictBreakdown,
    LocationAnalysis,
    Faqs,
}

impl Page {
    /// Sidebar order; the first entry is the landing page.
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Insights,
        Page::DistrictBreakdown,
        Page::LocationAnalysis,
        Page::Faqs,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Insights => "insights",
            Page::DistrictBreakdown => "district",
            Page::LocationAnalysis => "location",
            Page::Faqs => "faqs",
        }
    }

    pub fn menu_title(self) -> &'static str {
        match self {
            Page::Overview => "Crime Overview",
            Page::Insights => "Crime Insights",
            Page::DistrictBreakdown => "District Crime Breakdown",
            Page::LocationAnalysis => "Crime Location Analysis",
            Page::Faqs => "FAQs",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Page::Overview => "house",
            Page::Insights => "bar-chart",
            Page::DistrictBreakdown => "clipboard",
            Page::LocationAnalysis => "graph-up",
            Page::Faqs => "question-circle",
        }
    }

    /// Accepts either the slug or the sidebar title, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, NavError> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|page| {
                page.slug().eq_ignore_ascii_case(value)
                    || page.menu_title().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| NavError::UnknownPage(value.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaqQuestion {
    MostCommonPerDistrict,
    IncidentsPerCommunityArea,
    YearDistribution,
}

impl FaqQuestion {
    pub const ALL: [FaqQuestion; 3] = [
        FaqQuestion::MostCommonPerDistrict,
        FaqQuestion::IncidentsPerCommunityArea,
        FaqQuestion::YearDistribution,
    ];

    pub fn text(self) -> &'static str {
        match self {
            FaqQuestion::MostCommonPerDistrict => {
                "What are the most common crime types in each district?"
            }
            FaqQuestion::IncidentsPerCommunityArea => {
                "What is the average number of incidents per community area for each crime type?"
            }
            FaqQuestion::YearDistribution => {
                "What is the distribution of incidents across different years for each crime type?"
            }
        }
    }

    pub fn subheading(self) -> &'static str {
        match self {
            FaqQuestion::MostCommonPerDistrict => "Most Common Crime Types in Each District",
            FaqQuestion::IncidentsPerCommunityArea => {
                "Average Number of Incidents Per Community Area for Each Crime Type"
            }
            FaqQuestion::YearDistribution => {
                "Distribution of Incidents Across Different Years for Each Crime Type"
            }
        }
    }

    /// Matches the exact question text or its 1-based position in the dropdown.
    pub fn parse(value: &str) -> Option<Self> {
        if let Some(question) = Self::ALL.into_iter().find(|q| q.text() == value) {
            return Some(question);
        }
        let index = value.trim().parse::<usize>().ok()?;
        index
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(|q| q.text().to_string()).collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("unknown page: {0}")]
    UnknownPage(String),
}

/// What the user picked, as raw dropdown strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavRequest {
    pub page: Page,
    pub district: Option<String>,
    pub location: Option<String>,
    pub question: Option<String>,
}

impl NavRequest {
    pub fn page(page: Page) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice<T> {
    Selected(T),
    /// The requested value is not in the current option set.
    Invalid(String),
    NoOptions,
}

impl<T> Choice<T> {
    pub fn selected(&self) -> Option<&T> {
        match self {
            Choice::Selected(value) => Some(value),
            Choice::Invalid(_) | Choice::NoOptions => None,
        }
    }
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::NoOptions
    }
}

/// Resolves a dropdown against its option set. Nothing requested means the
/// first option, like a select box with default index 0.
pub fn choose(requested: Option<&str>, options: &[String]) -> Choice<String> {
    match requested.filter(|value| !value.is_empty()) {
        Some(value) => {
            if options.iter().any(|option| option == value) {
                Choice::Selected(value.to_string())
            } else {
                Choice::Invalid(value.to_string())
            }
        }
        None => options
            .first()
            .map_or(Choice::NoOptions, |first| Choice::Selected(first.clone())),
    }
}

pub fn choose_question(requested: Option<&str>) -> Choice<FaqQuestion> {
    match requested.filter(|value| !value.trim().is_empty()) {
        Some(value) => match FaqQuestion::parse(value) {
            Some(question) => Choice::Selected(question),
            None => Choice::Invalid(value.to_string()),
        },
        None => Choice::Selected(FaqQuestion::ALL[0]),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub district: Choice<String>,
    pub location: Choice<String>,
    pub question: Choice<FaqQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryPlan {
    LocationNames,
    CrimeTypes,
    ArrestFlags,
    IncidentDates,
    DistrictOptions,
    DistrictCrimeCounts { district: String },
    DistrictLocationOptions { district: String },
    DistrictLocationCrimeCounts { district: String, location: String },
    LocationOptions,
    LocationCrimeCounts { location: String },
    FaqMostCommonPerDistrict,
    FaqIncidentsPerCommunityArea,
    FaqYearDistribution,
}

impl QueryPlan {
    pub fn for_question(question: FaqQuestion) -> Self {
        match question {
            FaqQuestion::MostCommonPerDistrict => QueryPlan::FaqMostCommonPerDistrict,
            FaqQuestion::IncidentsPerCommunityArea => QueryPlan::FaqIncidentsPerCommunityArea,
            FaqQuestion::YearDistribution => QueryPlan::FaqYearDistribution,
        }
    }
}

/// Every query a render of `page` runs for the given selection, in execution
/// order. Option queries come before the data queries that depend on them.
pub fn plans_for(page: Page, selection: &Selection) -> Vec<QueryPlan> {
    match page {
        Page::Overview => Vec::new(),
        Page::Insights => vec![
            QueryPlan::LocationNames,
            QueryPlan::CrimeTypes,
            QueryPlan::ArrestFlags,
            QueryPlan::IncidentDates,
        ],
        Page::DistrictBreakdown => {
            let mut plans = vec![QueryPlan::DistrictOptions];
            if let Some(district) = selection.district.selected() {
                plans.push(QueryPlan::DistrictCrimeCounts {
                    district: district.clone(),
                });
                plans.push(QueryPlan::DistrictLocationOptions {
                    district: district.clone(),
                });
                if let Some(location) = selection.location.selected() {
                    plans.push(QueryPlan::DistrictLocationCrimeCounts {
                        district: district.clone(),
                        location: location.clone(),
                    });
                }
            }
            plans
        }
        Page::LocationAnalysis => {
            let mut plans = vec![QueryPlan::LocationOptions];
            if let Some(location) = selection.location.selected() {
                plans.push(QueryPlan::LocationCrimeCounts {
                    location: location.clone(),
                });
            }
            plans
        }
        Page::Faqs => selection
            .question
            .selected()
            .map(|question| vec![QueryPlan::for_question(*question)])
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn page_parse_accepts_slug_and_title() {
        assert_eq!(Page::parse("insights").unwrap(), Page::Insights);
        assert_eq!(
            Page::parse("District Crime Breakdown").unwrap(),
            Page::DistrictBreakdown
        );
        assert_eq!(Page::parse(" FAQS ").unwrap(), Page::Faqs);
        assert_eq!(
            Page::parse("settings").unwrap_err(),
            NavError::UnknownPage("settings".to_string())
        );
    }

    #[test]
    fn choose_defaults_to_first_option() {
        let options = opts(&["1", "2"]);
        assert_eq!(choose(None, &options), Choice::Selected("1".to_string()));
        assert_eq!(choose(Some(""), &options), Choice::Selected("1".to_string()));
        assert_eq!(choose(None, &[]), Choice::NoOptions);
    }

    #[test]
    fn choose_requires_exact_membership() {
        let options = opts(&["STREET", "ALLEY"]);
        assert_eq!(
            choose(Some("ALLEY"), &options),
            Choice::Selected("ALLEY".to_string())
        );
        assert_eq!(
            choose(Some("alley"), &options),
            Choice::Invalid("alley".to_string())
        );
        assert_eq!(
            choose(Some("STREET'; DROP TABLE crime; --"), &options),
            Choice::Invalid("STREET'; DROP TABLE crime; --".to_string())
        );
    }

    #[test]
    fn question_by_text_or_index() {
        assert_eq!(
            choose_question(Some(FaqQuestion::YearDistribution.text())),
            Choice::Selected(FaqQuestion::YearDistribution)
        );
        assert_eq!(
            choose_question(Some("2")),
            Choice::Selected(FaqQuestion::IncidentsPerCommunityArea)
        );
        assert_eq!(
            choose_question(Some("0")),
            Choice::Invalid("0".to_string())
        );
        assert_eq!(
            choose_question(None),
            Choice::Selected(FaqQuestion::MostCommonPerDistrict)
        );
    }

    #[test]
    fn district_plans_follow_selection_depth() {
        let mut selection = Selection::default();
        assert_eq!(
            plans_for(Page::DistrictBreakdown, &selection),
            vec![QueryPlan::DistrictOptions]
        );

        selection.district = Choice::Selected("7".to_string());
        selection.location = Choice::Invalid("NOWHERE".to_string());
        assert_eq!(
            plans_for(Page::DistrictBreakdown, &selection),
            vec![
                QueryPlan::DistrictOptions,
                QueryPlan::DistrictCrimeCounts {
                    district: "7".to_string()
                },
                QueryPlan::DistrictLocationOptions {
                    district: "7".to_string()
                },
            ]
        );

        selection.location = Choice::Selected("STREET".to_string());
        let plans = plans_for(Page::DistrictBreakdown, &selection);
        assert_eq!(
            plans.last(),
            Some(&QueryPlan::DistrictLocationCrimeCounts {
                district: "7".to_string(),
                location: "STREET".to_string(),
            })
        );
    }

    #[test]
    fn static_and_faq_pages() {
        let mut selection = Selection::default();
        assert!(plans_for(Page::Overview, &selection).is_empty());
        assert_eq!(plans_for(Page::Insights, &selection).len(), 4);
        assert!(plans_for(Page::Faqs, &selection).is_empty());

        selection.question = Choice::Selected(FaqQuestion::IncidentsPerCommunityArea);
        assert_eq!(
            plans_for(Page::Faqs, &selection),
            vec![QueryPlan::FaqIncidentsPerCommunityArea]
        );
    }
}
