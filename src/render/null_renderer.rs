use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer for tests and embedding without a backend.
///
/// Frames are validated and counted, never drawn, so suites can assert on
/// what the engine produced without a real drawing surface.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_rect_count: usize,
    pub last_line_count: usize,
    pub last_text_count: usize,
    pub last_transition_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_rect_count = frame.rects.len();
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        self.last_transition_count = frame.transitions.len();
        Ok(())
    }
}
