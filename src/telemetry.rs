//! Opt-in tracing bootstrap for hosts embedding `bullet-rs`.
//!
//! Nothing here runs implicitly. Hosts with their own `tracing` stack
//! should wire their subscriber as usual and ignore this module.

/// Installs a compact default `tracing` subscriber, honoring `RUST_LOG`
/// when set and falling back to `info` otherwise.
///
/// Returns `true` when the subscriber was installed. Returns `false` when
/// the `telemetry` feature is disabled or another global subscriber won
/// the race.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
