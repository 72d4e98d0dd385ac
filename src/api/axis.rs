use crate::core::LinearScale;

pub const AXIS_TICK_COUNT: usize = 4;

/// One axis tick: domain value plus its pixel offset along the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    pub x: f64,
}

/// Evenly stepped nice ticks over `[0, domain_max]`, roughly `count` of
/// them. Degenerate domains produce no ticks at all.
#[must_use]
pub fn axis_ticks(scale: LinearScale, count: usize) -> Vec<AxisTick> {
    let domain_max = scale.domain_max();
    if !domain_max.is_finite() || domain_max <= 0.0 || count == 0 {
        return Vec::new();
    }

    let step = nice_step(domain_max / count as f64);
    if step <= 0.0 {
        return Vec::new();
    }

    let mut ticks = Vec::new();
    let mut index = 0usize;
    loop {
        let value = step * index as f64;
        if value > domain_max * (1.0 + 1e-9) {
            break;
        }
        ticks.push(AxisTick {
            value,
            x: scale.scale(value),
        });
        index += 1;
    }
    ticks
}

/// Rounds a raw step onto the 1/2/5/10 ladder at its magnitude.
fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 0.0;
    }

    let magnitude = 10.0_f64.powf(raw_step.log10().floor());
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return raw_step;
    }

    let normalized = raw_step / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_monotonic_and_bounded() {
        let scale = LinearScale::new(230.0, 400.0);
        let ticks = axis_ticks(scale, AXIS_TICK_COUNT);
        assert!(ticks.len() >= 2);
        assert!(ticks.windows(2).all(|pair| pair[1].x > pair[0].x));
        assert!(ticks.iter().all(|tick| tick.value <= 230.0));
        assert_eq!(ticks[0].value, 0.0);
    }

    #[test]
    fn degenerate_domain_yields_no_ticks() {
        assert!(axis_ticks(LinearScale::new(f64::NAN, 400.0), 4).is_empty());
        assert!(axis_ticks(LinearScale::new(0.0, 400.0), 4).is_empty());
    }
}
