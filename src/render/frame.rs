use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Scene attribute a transition targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAttribute {
    RowY,
    BarWidth,
    TargetX,
    SegmentWidth(usize),
    SegmentX(usize),
}

/// Fire-and-forget attribute transition for backends that animate.
///
/// The scene already holds the end value; a backend may interpolate from
/// `from` to `to` or apply `to` immediately. Transitions are never emitted
/// for newly created rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSpec {
    pub row_key: String,
    pub attribute: SceneAttribute,
    pub from: f64,
    pub to: f64,
    pub delay_ms: f64,
    pub duration_ms: f64,
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub transitions: Vec<TransitionSpec>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
            transitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }
}
