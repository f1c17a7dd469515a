#![forbid(unsafe_code)]

//! One render pass: resolve the selection against the current options, run
//! the page's queries, shape the rows and lay out the page.

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use cv_core::nav::{choose, choose_question, plans_for};
use cv_core::{
    Choice, FaqQuestion, NavRequest, Page, PageView, Section, SelectorView, Selection, TOP_N,
    arrest_chart, arrest_status_counts, category_distribution, category_pie, daywise_chart,
    daywise_in_month, district_location_pie, district_pie, faq_table, incidents_per_area_table,
    location_bar, most_common_table, no_data, top_locations_chart, top_n_by_frequency,
    type_count_shares, year_distribution_table,
};
use cv_storage::{PlannedQuery, SqliteStore, StoreError, plan};
use time::Month;
use tracing::{info, warn};

const INSIGHTS_MONTH: Month = Month::May;
const NO_SELECTION: &str = "None";

/// A selection checked against the option lists it was picked from.
#[derive(Debug, Default)]
pub struct ResolvedSelection {
    pub selection: Selection,
    pub district_options: Vec<String>,
    pub location_options: Vec<String>,
}

pub fn resolve_selection(
    store: &SqliteStore,
    request: &NavRequest,
) -> Result<ResolvedSelection, StoreError> {
    let mut resolved = ResolvedSelection::default();
    match request.page {
        Page::Overview | Page::Insights => {}
        Page::DistrictBreakdown => {
            resolved.district_options = store.district_options()?;
            resolved.selection.district =
                choose(request.district.as_deref(), &resolved.district_options);
            if let Some(district) = resolved.selection.district.selected() {
                resolved.location_options = store.district_location_options(district)?;
                resolved.selection.location =
                    choose(request.location.as_deref(), &resolved.location_options);
            }
        }
        Page::LocationAnalysis => {
            resolved.location_options = store.location_options()?;
            resolved.selection.location =
                choose(request.location.as_deref(), &resolved.location_options);
        }
        Page::Faqs => {
            resolved.selection.question = choose_question(request.question.as_deref());
        }
    }
    warn_invalid(request.page, "district", &resolved.selection.district);
    warn_invalid(request.page, "location", &resolved.selection.location);
    warn_invalid(request.page, "question", &resolved.selection.question);
    Ok(resolved)
}

fn warn_invalid<T>(page: Page, selector: &str, choice: &Choice<T>) {
    if let Choice::Invalid(value) = choice {
        warn!(
            page = page.slug(),
            selector,
            value = value.as_str(),
            "selection is not among the current options"
        );
    }
}

/// Text shown for a selector in empty-result messages.
fn choice_label(choice: &Choice<String>) -> &str {
    match choice {
        Choice::Selected(value) | Choice::Invalid(value) => value,
        Choice::NoOptions => NO_SELECTION,
    }
}

/// Runs one pass against a freshly opened store. The Overview page is static
/// and never touches the database.
pub fn render_request(
    config: &DashboardConfig,
    request: &NavRequest,
) -> Result<PageView, DashboardError> {
    info!(
        page = request.page.slug(),
        district = request.district.as_deref(),
        location = request.location.as_deref(),
        question = request.question.as_deref(),
        "render"
    );
    if request.page == Page::Overview {
        return Ok(render_overview(config));
    }
    let store = SqliteStore::open(config.database()?)?;
    Ok(render_page(&store, config, request)?)
}

/// The queries a request would run, without running the data queries.
pub fn explain_request(
    config: &DashboardConfig,
    request: &NavRequest,
) -> Result<Vec<PlannedQuery>, DashboardError> {
    if request.page == Page::Overview {
        return Ok(Vec::new());
    }
    let store = SqliteStore::open(config.database()?)?;
    let resolved = resolve_selection(&store, request)?;
    Ok(plans_for(request.page, &resolved.selection)
        .iter()
        .map(plan)
        .collect())
}

pub fn render_page(
    store: &SqliteStore,
    config: &DashboardConfig,
    request: &NavRequest,
) -> Result<PageView, StoreError> {
    let resolved = resolve_selection(store, request)?;
    match request.page {
        Page::Overview => Ok(render_overview(config)),
        Page::Insights => render_insights(store, config),
        Page::DistrictBreakdown => render_district(store, resolved),
        Page::LocationAnalysis => render_location(store, resolved),
        Page::Faqs => render_faqs(store, resolved),
    }
}

fn render_overview(config: &DashboardConfig) -> PageView {
    let overview = &config.overview;
    let mut view = PageView::new(Page::Overview);
    view.sections = vec![
        Section::new("Key Metrics", vec![overview.overview_kpis()]),
        Section::new(overview.map_heading.clone(), vec![overview.map_chart()]),
    ];
    view
}

fn render_insights(store: &SqliteStore, config: &DashboardConfig) -> Result<PageView, StoreError> {
    let locations = store.location_names()?;
    let crime_types = store.crime_types()?;
    let arrests = store.arrest_flags()?;
    let dates = store.incident_dates()?;

    let series = daywise_in_month(&dates, INSIGHTS_MONTH);
    if series.skipped > 0 {
        warn!(
            skipped = series.skipped,
            total = dates.len(),
            "incident dates could not be parsed"
        );
    }

    let mut view = PageView::new(Page::Insights);
    view.sections = vec![
        Section::new("Key Metrics", vec![config.overview.insights_kpis()]),
        Section::new(
            "Crime Insights by Location",
            vec![
                top_locations_chart(&top_n_by_frequency(&locations, TOP_N)),
                category_pie(&category_distribution(&crime_types, TOP_N)),
                arrest_chart(&arrest_status_counts(&arrests)),
                daywise_chart(&series),
            ],
        ),
    ];
    Ok(view)
}

fn render_district(
    store: &SqliteStore,
    resolved: ResolvedSelection,
) -> Result<PageView, StoreError> {
    let ResolvedSelection {
        selection,
        district_options,
        location_options,
    } = resolved;

    let (district_chart, location_chart) = match selection.district.selected() {
        Some(district) => {
            let counts = store.district_crime_counts(district)?;
            let district_chart = district_pie(district, &type_count_shares(&counts));
            let location_chart = match selection.location.selected() {
                Some(location) => {
                    let counts = store.district_location_crime_counts(district, location)?;
                    district_location_pie(district, location, &type_count_shares(&counts))
                }
                None => district_location_pie(district, choice_label(&selection.location), &[]),
            };
            (district_chart, location_chart)
        }
        None => (
            district_pie(choice_label(&selection.district), &[]),
            district_location_pie(
                choice_label(&selection.district),
                choice_label(&selection.location),
                &[],
            ),
        ),
    };

    let mut view = PageView::new(Page::DistrictBreakdown);
    view.selectors = vec![
        SelectorView::new(
            "district",
            "Select a District:",
            district_options,
            &selection.district,
            String::clone,
        ),
        SelectorView::new(
            "location",
            "Select a Location in this District:",
            location_options,
            &selection.location,
            String::clone,
        ),
    ];
    view.sections = vec![
        Section::untitled(vec![district_chart]),
        Section::untitled(vec![location_chart]),
    ];
    Ok(view)
}

fn render_location(
    store: &SqliteStore,
    resolved: ResolvedSelection,
) -> Result<PageView, StoreError> {
    let ResolvedSelection {
        selection,
        location_options,
        ..
    } = resolved;

    let chart = match selection.location.selected() {
        Some(location) => location_bar(location, &store.location_crime_counts(location)?),
        None => location_bar(choice_label(&selection.location), &[]),
    };

    let mut view = PageView::new(Page::LocationAnalysis);
    view.selectors = vec![SelectorView::new(
        "location",
        "Select a Location:",
        location_options,
        &selection.location,
        String::clone,
    )];
    view.sections = vec![Section::untitled(vec![chart])];
    Ok(view)
}

fn render_faqs(store: &SqliteStore, resolved: ResolvedSelection) -> Result<PageView, StoreError> {
    let question = resolved.selection.question;
    let mut view = PageView::new(Page::Faqs);
    view.intro = Some("Select a question from the dropdown to view the answer.");
    view.selectors = vec![SelectorView::new(
        "question",
        "Select a Question:",
        FaqQuestion::options(),
        &question,
        |q: &FaqQuestion| q.text().to_string(),
    )];
    if let Some(&selected) = question.selected() {
        let table = match selected {
            FaqQuestion::MostCommonPerDistrict => {
                most_common_table(&store.most_common_per_district()?)
            }
            FaqQuestion::IncidentsPerCommunityArea => {
                incidents_per_area_table(&store.incidents_per_community_area()?)
            }
            FaqQuestion::YearDistribution => year_distribution_table(&store.year_distribution()?),
        };
        view.sections = vec![Section::untitled(vec![faq_table(selected, table)])];
    } else {
        view.sections = vec![Section::untitled(vec![no_data("the selected question")])];
    }
    Ok(view)
}
