//! bullet-rs: grouped bullet chart engine.
//!
//! This crate implements a compact KPI visualization: a horizontal
//! current-value bar overlaid on qualitative threshold bands with a target
//! marker, faceted into one row per group. It is designed to be embedded
//! into a dashboard host: the host supplies tabular data and configuration,
//! the engine owns layout, a retained scene graph, popup/selection
//! interaction, and a filter event bus the host subscribes to.

pub mod api;
pub mod core;
pub mod error;
pub mod events;
pub mod host;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{BulletChart, BulletChartConfig};
pub use error::{ChartError, ChartResult};
