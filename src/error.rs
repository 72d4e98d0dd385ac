use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Failure modes surfaced by the engine and the host boundary.
///
/// Malformed measures are deliberately not an error anywhere: they flow
/// through layout as NaN and render as degenerate geometry. Errors are
/// reserved for configuration and contract violations.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("viewport must be non-zero, got {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("cannot parse color `{0}`, expected #RGB or #RRGGBB hex notation")]
    InvalidColor(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
