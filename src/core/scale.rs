/// Shared linear scale mapping `[0, domain_max]` onto `[0, range_px]`.
///
/// Degenerate domains (zero, NaN, infinite) are representable on purpose:
/// malformed measures must surface as degenerate geometry downstream, never
/// as an error from the scale itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_max: f64,
    range_px: f64,
}

impl LinearScale {
    #[must_use]
    pub fn new(domain_max: f64, range_px: f64) -> Self {
        Self {
            domain_max,
            range_px,
        }
    }

    #[must_use]
    pub fn domain_max(self) -> f64 {
        self.domain_max
    }

    #[must_use]
    pub fn range_px(self) -> f64 {
        self.range_px
    }

    /// Maps a domain value to pixel space. Monotonic non-decreasing over a
    /// valid domain; NaN in, NaN out.
    #[must_use]
    pub fn scale(self, value: f64) -> f64 {
        value / self.domain_max * self.range_px
    }
}

/// Drops any residual exponent from a value's decimal rendering.
///
/// Layout coordinates must read back as plain decimal strings. Values whose
/// default string form is exponential (magnitude >= 1e21, or non-zero below
/// 1e-6) collapse to their mantissa, so `1.2e-7` becomes `1.2`.
#[must_use]
pub fn remove_exponential(value: f64) -> f64 {
    let abs = value.abs();
    let exponential = abs >= 1e21 || (abs > 0.0 && abs < 1e-6);
    if !value.is_finite() || !exponential {
        return value;
    }
    let text = format!("{value:e}");
    match text.split('e').next() {
        Some(mantissa) => mantissa.parse().unwrap_or(value),
        None => value,
    }
}
