#![forbid(unsafe_code)]

use super::{ChartSpec, MapMarker, MapSpec, MetricCard};
use crate::nav::{Choice, Page};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavItem {
    pub slug: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavMenu {
    pub title: &'static str,
    pub menu_icon: &'static str,
    pub default_index: usize,
    pub items: Vec<NavItem>,
}

pub fn sidebar() -> NavMenu {
    NavMenu {
        title: "Navigation",
        menu_icon: "cast",
        default_index: 0,
        items: Page::ALL
            .iter()
            .map(|page| NavItem {
                slug: page.slug(),
                title: page.menu_title(),
                icon: page.icon(),
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectorView {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

impl SelectorView {
    pub fn new<T>(
        key: &'static str,
        label: &'static str,
        options: Vec<String>,
        choice: &Choice<T>,
        display: impl Fn(&T) -> String,
    ) -> Self {
        Self {
            key,
            label,
            options,
            selected: choice.selected().map(display),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub charts: Vec<ChartSpec>,
}

impl Section {
    pub fn new(heading: impl Into<String>, charts: Vec<ChartSpec>) -> Self {
        Self {
            heading: Some(heading.into()),
            charts,
        }
    }

    pub fn untitled(charts: Vec<ChartSpec>) -> Self {
        Self {
            heading: None,
            charts,
        }
    }
}

/// One fully rendered page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageView {
    pub page: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<&'static str>,
    pub selectors: Vec<SelectorView>,
    pub sections: Vec<Section>,
}

impl PageView {
    pub fn new(page: Page) -> Self {
        Self {
            page: page.slug(),
            title: page_title(page),
            intro: None,
            selectors: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().flat_map(|section| section.charts.iter())
    }
}

pub fn page_title(page: Page) -> &'static str {
    match page {
        Page::Overview => "Crime Overview",
        Page::Insights => "Crime Insights Dashboard",
        Page::DistrictBreakdown => "Crime Breakdown in Specific Districts",
        Page::LocationAnalysis => "Crime Analysis in Specific Locations",
        Page::Faqs => "Frequently Asked Questions",
    }
}

/// Static content of the Overview page and the Insights KPI strip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewSettings {
    pub kpis: Vec<MetricCard>,
    /// How many of `kpis` the Insights page repeats.
    pub insights_kpi_count: usize,
    pub map_heading: String,
    pub map: MapSpec,
}

impl Default for OverviewSettings {
    fn default() -> Self {
        let chicago = [41.8781, -87.6298];
        Self {
            kpis: vec![
                MetricCard {
                    label: "Total Incidents".to_string(),
                    value: "2520".to_string(),
                    delta: None,
                },
                MetricCard {
                    label: "Open Cases".to_string(),
                    value: "1300".to_string(),
                    delta: Some("-2%".to_string()),
                },
                MetricCard {
                    label: "Resolved Cases".to_string(),
                    value: "1220".to_string(),
                    delta: Some("+1.5%".to_string()),
                },
            ],
            insights_kpi_count: 2,
            map_heading: "Crime Map: Chicago".to_string(),
            map: MapSpec {
                center: chicago,
                zoom: 11,
                width: 700,
                height: 400,
                markers: vec![MapMarker {
                    position: chicago,
                    tooltip: "Chicago".to_string(),
                    color: "red".to_string(),
                }],
            },
        }
    }
}

impl OverviewSettings {
    pub fn overview_kpis(&self) -> ChartSpec {
        ChartSpec::Metrics {
            cards: self.kpis.clone(),
        }
    }

    pub fn insights_kpis(&self) -> ChartSpec {
        ChartSpec::Metrics {
            cards: self
                .kpis
                .iter()
                .take(self.insights_kpi_count)
                .cloned()
                .collect(),
        }
    }

    pub fn map_chart(&self) -> ChartSpec {
        ChartSpec::Map(self.map.clone())
    }
}
