use approx::abs_diff_eq;
use bullet_rs::core::{ChartGeometry, LinearScale, Row, Thresholds, compute_layout};
use proptest::prelude::*;

fn geometry() -> ChartGeometry {
    ChartGeometry::resolve(640.0, 30.0, 10.0, 10.0, 20.0, true, false)
}

proptest! {
    #[test]
    fn scale_is_monotonic_non_decreasing(
        domain_max in 1.0f64..1e9,
        low in 0.0f64..1.0,
        delta in 0.0f64..1.0
    ) {
        let scale = LinearScale::new(domain_max, 400.0);
        let a = low * domain_max;
        let b = (low + delta).min(1.0) * domain_max;
        prop_assert!(scale.scale(a) <= scale.scale(b) + 1e-9);
    }

    #[test]
    fn segments_stay_contiguous(
        currents in prop::collection::vec(0.0f64..1e6, 1..6),
        baselines in prop::collection::vec(1.0f64..1e6, 1..6),
        lowest in 1.0f64..50.0,
        middle_gap in 0.0f64..50.0,
        higher_gap in 0.0f64..100.0
    ) {
        let count = currents.len().min(baselines.len());
        let rows: Vec<Row> = (0..count)
            .map(|i| Row::new(format!("row-{i}"), currents[i], baselines[i]))
            .collect();
        let thresholds = Thresholds {
            lowest,
            middle: lowest + middle_gap,
            higher: lowest + middle_gap + higher_gap,
        };
        let buffer = if rows.len() > 1 { 1.15 } else { 1.0 };
        let (_, layouts) = compute_layout(&rows, thresholds, 100.0, buffer, geometry());

        for layout in &layouts {
            for pair in layout.segments.windows(2) {
                prop_assert!(abs_diff_eq!(pair[0].x + pair[0].width, pair[1].x, epsilon = 1e-9));
            }
        }
    }

    #[test]
    fn domain_dominates_measures(
        currents in prop::collection::vec(0.0f64..1e6, 2..6),
        baselines in prop::collection::vec(1.0f64..1e6, 2..6)
    ) {
        let count = currents.len().min(baselines.len());
        let rows: Vec<Row> = (0..count)
            .map(|i| Row::new(format!("row-{i}"), currents[i], baselines[i]))
            .collect();
        let (scale, layouts) =
            compute_layout(&rows, Thresholds::default(), 100.0, 1.15, geometry());

        let max_current = currents[..count].iter().cloned().fold(0.0, f64::max);
        let max_baseline = baselines[..count].iter().cloned().fold(0.0, f64::max);
        prop_assert!(scale.domain_max() >= max_current);
        prop_assert!(scale.domain_max() >= max_baseline);
        for layout in &layouts {
            prop_assert!(layout.bar_width <= scale.range_px() + 1e-9);
        }
    }

    #[test]
    fn target_x_tracks_scaled_target(
        baseline in 1.0f64..1e6,
        target_percent in 1.0f64..200.0
    ) {
        let rows = vec![Row::new("solo", baseline / 2.0, baseline)];
        let (scale, layouts) =
            compute_layout(&rows, Thresholds::default(), target_percent, 1.0, geometry());
        let expected = scale.scale(baseline * target_percent / 100.0);
        prop_assert!(abs_diff_eq!(layouts[0].target_x, expected, epsilon = 1e-9));
    }
}
