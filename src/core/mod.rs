pub mod layout;
pub mod scale;
pub mod types;

pub use layout::{
    ChartGeometry, RowLayout, ThresholdBand, ThresholdSegment, ThresholdStep, Thresholds,
    compute_layout,
};
pub use scale::{LinearScale, remove_exponential};
pub use types::{GroupedData, Row, Viewport};
