#![forbid(unsafe_code)]

use super::*;
use crate::aggregate::{ArrestStatus, DaywiseSeries, FaqTable, Frequency, Share};
use crate::model::TypeCount;
use crate::nav::FaqQuestion;

const PIE_START_ANGLE: u16 = 90;
const LEGEND_TITLE: &str = "Crime Types";
const LEGEND_ANCHOR: &str = "center_left_outside";

pub fn percent_label(percent: f64) -> String {
    format!("{percent:.1}%")
}

pub fn no_data(subject: &str) -> ChartSpec {
    ChartSpec::empty(format!("No data available for {subject}."))
}

pub fn no_district_data() -> ChartSpec {
    ChartSpec::empty("No crime data available for the selected district.")
}

pub fn no_district_location_data(district: &str, location: &str) -> ChartSpec {
    ChartSpec::empty(format!(
        "No crime data available for the location: {location} in District {district}."
    ))
}

pub fn no_location_data(location: &str) -> ChartSpec {
    ChartSpec::empty(format!(
        "No crime data available for the location: {location}."
    ))
}

fn dashed_grid(axis: GridAxis) -> Grid {
    Grid {
        axis,
        line_style: "--",
        alpha: 0.7,
    }
}

pub fn top_locations_chart(top: &[Frequency]) -> ChartSpec {
    if top.is_empty() {
        return no_data("locations");
    }
    ChartSpec::Bar(BarChart {
        title: "Top 10 Locations with Most Incidents".to_string(),
        orientation: Orientation::Horizontal,
        x_label: "Number of Incidents".to_string(),
        y_label: "Locations".to_string(),
        bars: top
            .iter()
            .enumerate()
            .map(|(index, freq)| Bar {
                label: freq.label.clone(),
                value: freq.count,
                color: cycle_color(&LOCATION_BAR_CYCLE, index).to_string(),
            })
            .collect(),
        label_rotation: None,
        grid: Some(dashed_grid(GridAxis::X)),
        background: None,
    })
}

fn pie(title: String, shares: &[Share], palette: &[&'static str], legend: Legend) -> ChartSpec {
    ChartSpec::Pie(PieChart {
        title,
        slices: shares
            .iter()
            .enumerate()
            .map(|(index, share)| Slice {
                label: share.label.clone(),
                value: share.count,
                percent: share.percent,
                percent_label: percent_label(share.percent),
                color: cycle_color(palette, index).to_string(),
            })
            .collect(),
        start_angle: PIE_START_ANGLE,
        legend,
    })
}

fn external_legend() -> Legend {
    Legend::External {
        title: LEGEND_TITLE.to_string(),
        anchor: LEGEND_ANCHOR,
    }
}

pub fn category_pie(shares: &[Share]) -> ChartSpec {
    if shares.is_empty() {
        return no_data("crime categories");
    }
    pie(
        "Crime Incident Categories".to_string(),
        shares,
        &SET3,
        Legend::Inline,
    )
}

pub fn arrest_chart(status: &ArrestStatus) -> ChartSpec {
    ChartSpec::Bar(BarChart {
        title: "Number of Arrests by Status".to_string(),
        orientation: Orientation::Vertical,
        x_label: "Arrest Status".to_string(),
        y_label: "Count".to_string(),
        bars: status
            .buckets()
            .iter()
            .enumerate()
            .map(|(index, (label, count))| Bar {
                label: (*label).to_string(),
                value: *count,
                color: cycle_color(&ARREST_COLORS, index).to_string(),
            })
            .collect(),
        label_rotation: Some(0),
        grid: None,
        background: None,
    })
}

pub fn daywise_chart(series: &DaywiseSeries) -> ChartSpec {
    if series.points.is_empty() {
        return no_data("May");
    }
    ChartSpec::Line(LineChart {
        title: "Day-wise Crime Rates in May".to_string(),
        x_label: "Day of the Month".to_string(),
        y_label: "Number of Crimes".to_string(),
        points: series
            .points
            .iter()
            .map(|p| Point {
                x: u64::from(p.day),
                y: p.count,
            })
            .collect(),
        color: DAYWISE_LINE_COLOR,
        markers: true,
        grid: Some(dashed_grid(GridAxis::Both)),
    })
}

pub fn district_pie(district: &str, shares: &[Share]) -> ChartSpec {
    if shares.is_empty() {
        return no_district_data();
    }
    pie(
        format!("Crimes in District {district}"),
        shares,
        &SET3,
        external_legend(),
    )
}

pub fn district_location_pie(district: &str, location: &str, shares: &[Share]) -> ChartSpec {
    if shares.is_empty() {
        return no_district_location_data(district, location);
    }
    pie(
        format!("Crimes in Location {location}, District {district}"),
        shares,
        &PAIRED,
        external_legend(),
    )
}

pub fn location_bar(location: &str, counts: &[TypeCount]) -> ChartSpec {
    if counts.is_empty() {
        return no_location_data(location);
    }
    ChartSpec::Bar(BarChart {
        title: format!("Crimes in {location}"),
        orientation: Orientation::Vertical,
        x_label: "Crime Type".to_string(),
        y_label: "Number of Crimes".to_string(),
        bars: counts
            .iter()
            .map(|row| Bar {
                label: row.crime_type.clone(),
                value: row.count,
                color: LOCATION_BREAKDOWN_COLOR.to_string(),
            })
            .collect(),
        label_rotation: Some(45),
        grid: None,
        background: Some(PANEL_BACKGROUND),
    })
}

pub fn faq_table(question: FaqQuestion, table: FaqTable) -> ChartSpec {
    if table.is_empty() {
        return no_data(&question.subheading().to_lowercase());
    }
    ChartSpec::Table(TableSpec {
        title: question.subheading().to_string(),
        columns: table.columns.iter().map(|c| (*c).to_string()).collect(),
        rows: table.rows,
        sortable: true,
    })
}
