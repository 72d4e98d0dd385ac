mod axis;
mod config;
mod engine;
mod format;
mod legend;

pub use axis::{AXIS_TICK_COUNT, AxisTick, axis_ticks};
pub use config::{
    AxisPosition, BulletChartConfig, ColorPalette, LabelPosition, ResolvedColors,
};
pub use engine::BulletChart;
pub use format::{FormatMode, NumberFormat, NumberFormatSpec, ValueFormatter, capitalize};
pub use legend::{Legend, LegendEntry, build_legend};
