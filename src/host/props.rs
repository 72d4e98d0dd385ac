use serde_json::{Map, Value};

use crate::api::{
    AxisPosition, BulletChartConfig, ColorPalette, FormatMode, LabelPosition, NumberFormatSpec,
};
use crate::core::Thresholds;

/// Reads a boolean prop that may arrive as a bool or as the strings
/// `"true"` / `"false"`.
fn prop_bool(props: &Map<String, Value>, key: &str) -> Option<bool> {
    match props.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => Some(text == "true"),
        _ => None,
    }
}

/// Reads a numeric prop that may arrive as a number or a numeric string
/// (`".75"`, `"33"`).
fn prop_f64(props: &Map<String, Value>, key: &str) -> Option<f64> {
    match props.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a pixel-length prop, tolerating a unit suffix (`"320px"` parses as
/// 320 via its leading digits).
fn prop_px(props: &Map<String, Value>, key: &str) -> Option<u32> {
    match props.get(key)? {
        Value::Number(number) => number.as_u64().map(|value| value as u32),
        Value::String(text) => {
            let digits: String = text
                .trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn prop_str<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    props.get(key).and_then(Value::as_str)
}

/// Maps the host's flat property bag onto engine configuration, mirroring
/// the plugin manifest: label on top, axis rendered per row. Unknown keys
/// are ignored; absent keys keep their defaults.
#[must_use]
pub fn build_config(
    props: &Map<String, Value>,
    current_label: impl Into<String>,
    target_label: impl Into<String>,
) -> BulletChartConfig {
    let mut config = BulletChartConfig {
        label_position: LabelPosition::Top,
        axis_on_chart: true,
        axis_position: AxisPosition::Bottom,
        current_label: current_label.into(),
        target_label: target_label.into(),
        ..BulletChartConfig::default()
    };

    if let Some(width) = prop_px(props, "width") {
        config.width = width;
    }
    if let Some(height) = prop_px(props, "height") {
        config.height = height;
    }
    if let Some(show_label) = prop_bool(props, "showlabel") {
        config.show_label = show_label;
    }
    if let Some(show_legend) = prop_bool(props, "showlegends") {
        config.show_legend = show_legend;
    }
    if let Some(axis) = prop_str(props, "axis") {
        config.axis_position = match axis {
            "top" => AxisPosition::Top,
            _ => AxisPosition::Bottom,
        };
    }
    if let Some(opacity) = prop_f64(props, "opacity") {
        config.opacity = opacity;
    }
    if let Some(font_size) = prop_f64(props, "labelfontsize") {
        config.label_font_size = font_size;
    }

    let defaults = Thresholds::default();
    config.thresholds = Thresholds {
        lowest: prop_f64(props, "lowest").unwrap_or(defaults.lowest),
        middle: prop_f64(props, "middle").unwrap_or(defaults.middle),
        higher: prop_f64(props, "higher").unwrap_or(defaults.higher),
    };

    let palette = ColorPalette::default();
    config.colors = ColorPalette {
        lowest: prop_str(props, "lowestcolor")
            .map_or(palette.lowest, str::to_owned),
        middle: prop_str(props, "middlecolor")
            .map_or(palette.middle, str::to_owned),
        higher: prop_str(props, "highercolor")
            .map_or(palette.higher, str::to_owned),
        current: prop_str(props, "currentcolor")
            .map_or(palette.current, str::to_owned),
        target: prop_str(props, "targetcolor")
            .map_or(palette.target, str::to_owned),
    };

    let mode = match prop_str(props, "numberformat") {
        Some("raw") => FormatMode::Raw,
        Some("currency") => FormatMode::Currency,
        _ => FormatMode::Thousands,
    };
    config.number_format = NumberFormatSpec {
        mode,
        symbol: prop_str(props, "currencysymbol").unwrap_or("").to_owned(),
    };

    config
}
