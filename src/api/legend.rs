use crate::render::Color;

use super::config::{BulletChartConfig, LabelPosition, ResolvedColors};
use super::format::capitalize;
use crate::core::ChartGeometry;

const LEGEND_LINE_HEIGHT: f64 = 18.0;

/// One swatch-plus-caption legend item.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub swatch_color: Color,
    pub swatch_width: f64,
    pub swatch_height: f64,
}

/// Legend block model. Its height feeds back into the chart's total height
/// so the chart area leaves room for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
    pub padding_left: f64,
    pub height: f64,
}

#[must_use]
pub fn build_legend(
    config: &BulletChartConfig,
    geometry: ChartGeometry,
    colors: &ResolvedColors,
) -> Legend {
    let padding_left = if config.label_position == LabelPosition::Top {
        geometry.row_margin_top
    } else {
        geometry.label_width + geometry.margin_left
    };

    Legend {
        entries: vec![
            LegendEntry {
                label: capitalize(&config.current_label),
                swatch_color: colors.current,
                swatch_width: LEGEND_LINE_HEIGHT,
                swatch_height: geometry.inner_height,
            },
            LegendEntry {
                label: capitalize(&config.target_label),
                swatch_color: colors.target,
                swatch_width: geometry.target_width,
                swatch_height: geometry.target_height,
            },
        ],
        padding_left,
        height: config.legend_padding_top + config.legend_padding_bottom + LEGEND_LINE_HEIGHT,
    }
}
