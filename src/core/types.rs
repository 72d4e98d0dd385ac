#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One chart entity: a group label plus its two raw measures.
///
/// `key` uniqueness among currently-rendered rows is a caller precondition;
/// it is the only identity that survives a `set_data` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    pub current: f64,
    pub baseline: f64,
}

impl Row {
    #[must_use]
    pub fn new(key: impl Into<String>, current: f64, baseline: f64) -> Self {
        Self {
            key: key.into(),
            current,
            baseline,
        }
    }
}

/// Nested shape produced by the host-side data pivot: one measure caption
/// plus the rows it groups.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedData {
    pub key: String,
    pub values: Vec<Row>,
}
