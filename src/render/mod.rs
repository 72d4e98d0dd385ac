mod frame;
mod null_renderer;
mod primitives;
mod scene;

pub use frame::{RenderFrame, SceneAttribute, TransitionSpec};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use scene::{RowNode, SceneDiff, SceneGraph};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
