#![forbid(unsafe_code)]

mod charts;
mod page;
mod palette;

pub use charts::*;
pub use page::*;
pub use palette::*;

use crate::aggregate::Cell;
use serde::{Deserialize, Serialize};

/// What the external renderer draws. Serialized with a `kind` tag.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Metrics { cards: Vec<MetricCard> },
    Map(MapSpec),
    Bar(BarChart),
    Pie(PieChart),
    Line(LineChart),
    Table(TableSpec),
    Empty { message: String },
}

impl ChartSpec {
    pub fn empty(message: impl Into<String>) -> Self {
        ChartSpec::Empty {
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartSpec::Empty { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub position: [f64; 2],
    pub tooltip: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub center: [f64; 2],
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub markers: Vec<MapMarker>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAxis {
    X,
    Both,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Grid {
    pub axis: GridAxis,
    pub line_style: &'static str,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub orientation: Orientation,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_rotation: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: u64,
    pub percent: f64,
    pub percent_label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum Legend {
    /// Labels drawn next to each slice.
    Inline,
    External { title: String, anchor: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<Slice>,
    pub start_angle: u16,
    pub legend: Legend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u64,
    pub y: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<Point>,
    pub color: &'static str,
    pub markers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableSpec {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub sortable: bool,
}
