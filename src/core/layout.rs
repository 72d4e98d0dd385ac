use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::scale::{LinearScale, remove_exponential};
use crate::core::types::Row;

const LABEL_WIDTH_RATIO: f64 = 0.39;
const MAX_LABEL_WIDTH: f64 = 150.0;
const INNER_HEIGHT_RATIO: f64 = 0.30;
const TARGET_MARKER_WIDTH: f64 = 3.0;

/// Qualitative performance band identifiers, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdBand {
    Lowest,
    Middle,
    Higher,
}

impl ThresholdBand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::Middle => "middle",
            Self::Higher => "higher",
        }
    }
}

/// Ordered threshold percentages. The percentages are cumulative steps
/// relative to the target, not independent magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub lowest: f64,
    pub middle: f64,
    pub higher: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lowest: 33.0,
            middle: 66.0,
            higher: 100.0,
        }
    }
}

/// One threshold with its cumulative step resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdStep {
    pub band: ThresholdBand,
    pub value: f64,
    pub step: f64,
}

impl Thresholds {
    #[must_use]
    pub const fn values(self) -> [f64; 3] {
        [self.lowest, self.middle, self.higher]
    }

    /// Resolves cumulative steps in declared order via the alternating
    /// prefix-sum subtraction: `sums_i = sum(values[0..i]) - sums_{i-1}`,
    /// `step_i = (value_i - sums_i) / 100`.
    ///
    /// Non-negative steps are a caller responsibility, not validated here.
    #[must_use]
    pub fn steps(self) -> [ThresholdStep; 3] {
        let bands = [
            ThresholdBand::Lowest,
            ThresholdBand::Middle,
            ThresholdBand::Higher,
        ];
        let values = self.values();
        let mut sums = 0.0;
        let mut steps = [ThresholdStep {
            band: ThresholdBand::Lowest,
            value: 0.0,
            step: 0.0,
        }; 3];
        for (index, (band, value)) in bands.into_iter().zip(values).enumerate() {
            let prefix: f64 = values[..index].iter().sum();
            sums = prefix - sums;
            steps[index] = ThresholdStep {
                band,
                value,
                step: (value - sums) / 100.0,
            };
        }
        steps
    }
}

/// One colored band segment of a row, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSegment {
    pub band: ThresholdBand,
    pub value: f64,
    pub width: f64,
    pub x: f64,
}

/// Per-row pixel geometry derived from raw measures.
///
/// Recomputed wholesale on every `set_data`; only `key` survives into the
/// next generation, via scene reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub key: String,
    pub current: f64,
    pub baseline: f64,
    pub target: f64,
    pub target_x: f64,
    /// Not clamped: negative or NaN measures keep their degenerate widths
    /// here; drawing clamps to >= 0.
    pub bar_width: f64,
    pub segments: SmallVec<[ThresholdSegment; 3]>,
    pub y: f64,
}

/// Outer pixel geometry resolved once from chart configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub label_width: f64,
    pub chart_width: f64,
    pub row_height: f64,
    pub row_margin_top: f64,
    pub margin_left: f64,
    pub axis_height: f64,
    pub inner_height: f64,
    pub inner_padding: f64,
    pub target_height: f64,
    pub target_width: f64,
    /// True when labels stack above each chart row, doubling row pitch.
    pub labels_on_top: bool,
}

impl ChartGeometry {
    #[must_use]
    pub fn resolve(
        width: f64,
        row_height: f64,
        row_margin_top: f64,
        margin_left: f64,
        axis_height: f64,
        label_beside: bool,
        labels_on_top: bool,
    ) -> Self {
        let (label_width, chart_width) = if label_beside {
            let label_width = (width * LABEL_WIDTH_RATIO).min(MAX_LABEL_WIDTH);
            (label_width, (width - label_width) * 0.95)
        } else {
            (width, width * 0.95)
        };

        let inner_height = row_height * INNER_HEIGHT_RATIO;
        Self {
            label_width,
            chart_width,
            row_height,
            row_margin_top,
            margin_left,
            axis_height,
            inner_height,
            inner_padding: (row_height - inner_height) / 2.0,
            target_height: inner_height * 2.0,
            target_width: TARGET_MARKER_WIDTH,
            labels_on_top,
        }
    }

    /// Vertical pitch of one row, doubled when labels stack above rows.
    #[must_use]
    pub fn row_pitch(self) -> f64 {
        let pitch = self.row_height + self.row_margin_top;
        if self.labels_on_top { pitch * 2.0 } else { pitch }
    }
}

/// Computes the shared linear scale and per-row pixel extents.
///
/// `buffer` widens the domain so the widest bar never clips; it is an
/// explicit input chosen by the caller (1.15 with multiple rows, 1.0 for a
/// single row). Malformed measures are not validated and propagate into
/// degenerate geometry.
#[must_use]
pub fn compute_layout(
    rows: &[Row],
    thresholds: Thresholds,
    target_percent: f64,
    buffer: f64,
    geometry: ChartGeometry,
) -> (LinearScale, Vec<RowLayout>) {
    let max_current = rows.iter().map(|row| row.current).fold(f64::NAN, f64::max);
    let max_baseline = rows
        .iter()
        .map(|row| row.baseline)
        .fold(f64::NAN, f64::max);
    let domain_max = max_current
        .max(max_baseline)
        .max(max_baseline * (thresholds.higher / 100.0))
        * buffer;

    let scale = LinearScale::new(domain_max, geometry.chart_width);
    let steps = thresholds.steps();
    let pitch = geometry.row_pitch();

    let layouts = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let target = row.baseline * (target_percent / 100.0);
            let mut segments: SmallVec<[ThresholdSegment; 3]> = SmallVec::new();
            for step in steps {
                let previous = segments.last().copied();
                let x = previous.map_or(0.0, |segment| segment.x + segment.width);
                segments.push(ThresholdSegment {
                    band: step.band,
                    value: step.value,
                    width: scale.scale(target * step.step),
                    x,
                });
            }
            RowLayout {
                key: row.key.clone(),
                current: row.current,
                baseline: row.baseline,
                target,
                target_x: remove_exponential(scale.scale(target)),
                bar_width: remove_exponential(scale.scale(row.current)),
                segments,
                y: pitch * index as f64,
            }
        })
        .collect();

    (scale, layouts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_follow_cumulative_subtraction() {
        let thresholds = Thresholds {
            lowest: 33.0,
            middle: 66.0,
            higher: 140.0,
        };
        let steps = thresholds.steps();
        assert_eq!(steps[0].step, 0.33);
        assert_eq!(steps[1].step, 0.33);
        assert_eq!(steps[2].step, 0.74);
    }

    #[test]
    fn label_column_is_capped_when_beside_rows() {
        let geometry = ChartGeometry::resolve(1000.0, 30.0, 10.0, 10.0, 20.0, true, false);
        assert_eq!(geometry.label_width, 150.0);
        assert_eq!(geometry.chart_width, (1000.0 - 150.0) * 0.95);
    }

    #[test]
    fn row_pitch_doubles_with_stacked_labels() {
        let flat = ChartGeometry::resolve(400.0, 30.0, 10.0, 10.0, 20.0, false, false);
        let stacked = ChartGeometry::resolve(400.0, 30.0, 10.0, 10.0, 20.0, false, true);
        assert_eq!(flat.row_pitch(), 40.0);
        assert_eq!(stacked.row_pitch(), 80.0);
    }
}
