use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{RowLayout, ThresholdSegment};
use crate::render::frame::{SceneAttribute, TransitionSpec};

const TRANSITION_DELAY_MS: f64 = 200.0;
const TRANSITION_DURATION_MS: f64 = 700.0;

/// Retained scene handle for one chart row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowNode {
    pub layout: RowLayout,
}

/// Outcome of one keyed reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub kept: Vec<String>,
    pub transitions: Vec<TransitionSpec>,
}

/// Retained-mode scene model: a mapping from row key to scene node, diffed
/// against the incoming dataset on every render pass. Kept nodes mutate in
/// place, removed nodes are destroyed, added nodes are created; map order
/// always matches dataset order, which is the visual stacking order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: IndexMap<String, RowNode>,
}

impl SceneGraph {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RowNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn node(&self, key: &str) -> Option<&RowNode> {
        self.nodes.get(key)
    }

    /// Reconciles the scene against `rows`, keyed by row key.
    ///
    /// When `animated` is set, attribute changes on kept nodes are reported
    /// as transitions; creations never animate.
    pub fn reconcile(&mut self, rows: &[RowLayout], animated: bool) -> SceneDiff {
        let mut previous = std::mem::take(&mut self.nodes);
        let mut diff = SceneDiff::default();

        for layout in rows {
            match previous.shift_remove(&layout.key) {
                Some(node) => {
                    if animated {
                        collect_transitions(&node.layout, layout, &mut diff.transitions);
                    }
                    diff.kept.push(layout.key.clone());
                    self.nodes.insert(
                        layout.key.clone(),
                        RowNode {
                            layout: layout.clone(),
                        },
                    );
                }
                None => {
                    diff.added.push(layout.key.clone());
                    self.nodes.insert(
                        layout.key.clone(),
                        RowNode {
                            layout: layout.clone(),
                        },
                    );
                }
            }
        }

        diff.removed = previous.keys().cloned().collect();
        trace!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            kept = diff.kept.len(),
            transitions = diff.transitions.len(),
            "reconciled bullet scene"
        );
        diff
    }
}

fn collect_transitions(old: &RowLayout, new: &RowLayout, transitions: &mut Vec<TransitionSpec>) {
    let mut changes: SmallVec<[(SceneAttribute, f64, f64); 8]> = SmallVec::new();
    push_change(&mut changes, SceneAttribute::RowY, old.y, new.y);
    push_change(
        &mut changes,
        SceneAttribute::BarWidth,
        old.bar_width,
        new.bar_width,
    );
    push_change(
        &mut changes,
        SceneAttribute::TargetX,
        old.target_x,
        new.target_x,
    );
    for (index, segment) in new.segments.iter().enumerate() {
        let previous = old
            .segments
            .get(index)
            .copied()
            .unwrap_or(ThresholdSegment {
                band: segment.band,
                value: 0.0,
                width: 0.0,
                x: 0.0,
            });
        push_change(
            &mut changes,
            SceneAttribute::SegmentWidth(index),
            previous.width,
            segment.width,
        );
        push_change(
            &mut changes,
            SceneAttribute::SegmentX(index),
            previous.x,
            segment.x,
        );
    }

    for (attribute, from, to) in changes {
        transitions.push(TransitionSpec {
            row_key: new.key.clone(),
            attribute,
            from,
            to,
            delay_ms: TRANSITION_DELAY_MS,
            duration_ms: TRANSITION_DURATION_MS,
        });
    }
}

fn push_change(
    changes: &mut SmallVec<[(SceneAttribute, f64, f64); 8]>,
    attribute: SceneAttribute,
    from: f64,
    to: f64,
) {
    if from.total_cmp(&to) != std::cmp::Ordering::Equal {
        changes.push((attribute, from, to));
    }
}
