#![forbid(unsafe_code)]

/// Cycled across the top-locations bars.
pub const LOCATION_BAR_CYCLE: [&str; 4] = ["#381704", "#BA261A", "#701421", "#BA261A"];

pub const ARREST_COLORS: [&str; 2] = ["#103C61", "#3180C5"];

pub const LOCATION_BREAKDOWN_COLOR: &str = "darkred";

pub const DAYWISE_LINE_COLOR: &str = "blue";

pub const PANEL_BACKGROUND: &str = "#F1F8ED";

/// Qualitative "Set3" palette.
pub const SET3: [&str; 12] = [
    "#8DD3C7", "#FFFFB3", "#BEBADA", "#FB8072", "#80B1D3", "#FDB462", "#B3DE69", "#FCCDE5",
    "#D9D9D9", "#BC80BD", "#CCEBC5", "#FFED6F",
];

/// Qualitative "Paired" palette.
pub const PAIRED: [&str; 12] = [
    "#A6CEE3", "#1F78B4", "#B2DF8A", "#33A02C", "#FB9A99", "#E31A1C", "#FDBF6F", "#FF7F00",
    "#CAB2D6", "#6A3D9A", "#FFFF99", "#B15928",
];

/// Color of the `index`-th item, wrapping around the palette.
pub fn cycle_color(palette: &[&'static str], index: usize) -> &'static str {
    if palette.is_empty() {
        return "";
    }
    palette[index % palette.len()]
}
