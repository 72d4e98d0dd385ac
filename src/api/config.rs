use serde::{Deserialize, Serialize};

use crate::core::{ThresholdBand, Thresholds};
use crate::error::ChartResult;
use crate::render::Color;

use super::format::NumberFormatSpec;

/// Where row labels sit relative to each chart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Top,
    Left,
    Right,
}

/// Where the value axis sits relative to the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Top,
    Bottom,
}

/// Display colors, hex-encoded the way host color props arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub lowest: String,
    pub middle: String,
    pub higher: String,
    pub current: String,
    pub target: String,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            lowest: "#EC5D57".to_owned(),
            middle: "#F5D328".to_owned(),
            higher: "#70BF41".to_owned(),
            current: "#53585F".to_owned(),
            target: "#FFF".to_owned(),
        }
    }
}

impl ColorPalette {
    pub fn resolve(&self) -> ChartResult<ResolvedColors> {
        Ok(ResolvedColors {
            lowest: Color::from_hex(&self.lowest)?,
            middle: Color::from_hex(&self.middle)?,
            higher: Color::from_hex(&self.higher)?,
            current: Color::from_hex(&self.current)?,
            target: Color::from_hex(&self.target)?,
        })
    }
}

/// Palette parsed into draw-ready colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedColors {
    pub lowest: Color,
    pub middle: Color,
    pub higher: Color,
    pub current: Color,
    pub target: Color,
}

impl ResolvedColors {
    #[must_use]
    pub fn band(&self, band: ThresholdBand) -> Color {
        match band {
            ThresholdBand::Lowest => self.lowest,
            ThresholdBand::Middle => self.middle,
            ThresholdBand::Higher => self.higher,
        }
    }
}

/// Full chart configuration. Immutable after construction except through
/// the explicit setters the engine exposes (`set_colors`, `animate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletChartConfig {
    pub width: u32,
    pub height: u32,
    pub show_label: bool,
    pub label_position: LabelPosition,
    pub axis_position: AxisPosition,
    /// Draw an axis beneath every row instead of one standalone strip.
    pub axis_on_chart: bool,
    pub axis_height: f64,
    pub row_height: f64,
    pub row_margin_top: f64,
    pub margin_left: f64,
    pub opacity: f64,
    pub target_percent: f64,
    pub thresholds: Thresholds,
    pub colors: ColorPalette,
    pub current_label: String,
    pub target_label: String,
    pub show_legend: bool,
    pub legend_padding_top: f64,
    pub legend_padding_bottom: f64,
    pub number_format: NumberFormatSpec,
    pub label_font_size: f64,
}

impl Default for BulletChartConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            show_label: true,
            label_position: LabelPosition::Right,
            axis_position: AxisPosition::Top,
            axis_on_chart: false,
            axis_height: 20.0,
            row_height: 30.0,
            row_margin_top: 10.0,
            margin_left: 10.0,
            opacity: 0.75,
            target_percent: 100.0,
            thresholds: Thresholds::default(),
            colors: ColorPalette::default(),
            current_label: String::new(),
            target_label: String::new(),
            show_legend: true,
            legend_padding_top: 10.0,
            legend_padding_bottom: 10.0,
            number_format: NumberFormatSpec::default(),
            label_font_size: 12.0,
        }
    }
}

impl BulletChartConfig {
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_show_label(mut self, show_label: bool) -> Self {
        self.show_label = show_label;
        self
    }

    #[must_use]
    pub fn with_label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }

    #[must_use]
    pub fn with_axis_position(mut self, position: AxisPosition) -> Self {
        self.axis_position = position;
        self
    }

    #[must_use]
    pub fn with_axis_on_chart(mut self, axis_on_chart: bool) -> Self {
        self.axis_on_chart = axis_on_chart;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ColorPalette) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_labels(
        mut self,
        current_label: impl Into<String>,
        target_label: impl Into<String>,
    ) -> Self {
        self.current_label = current_label.into();
        self.target_label = target_label.into();
        self
    }

    #[must_use]
    pub fn with_show_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    #[must_use]
    pub fn with_number_format(mut self, number_format: NumberFormatSpec) -> Self {
        self.number_format = number_format;
        self
    }
}
