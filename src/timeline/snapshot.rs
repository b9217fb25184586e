// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measured outline layout.
//!
//! An [`OutlineSnapshot`] records where each outline node was rendered in
//! the current frame, in pixels relative to the top of the outline
//! container. Nodes that were not rendered are simply absent; nodes that
//! were rendered with zero size count as hidden.

use crate::models::outline::{CollapseState, NodeKind, Outline};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Rendered box of one outline element, container-relative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    pub top: f32,
    pub height: f32,
    pub width: f32,
}

impl ElementRect {
    pub const HIDDEN: ElementRect = ElementRect {
        top: 0.0,
        height: 0.0,
        width: 0.0,
    };

    pub fn new(top: f32, height: f32, width: f32) -> Self {
        Self { top, height, width }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Zero-sized elements sit inside a collapsed ancestor.
    pub fn is_visible(&self) -> bool {
        self.height > 0.0 && self.width > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
struct MeasuredElement {
    kind: NodeKind,
    id: String,
    act_id: String,
    rect: ElementRect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineSnapshot {
    elements: Vec<MeasuredElement>,
    index: HashMap<(NodeKind, String), usize>,
    act_headers: HashMap<String, ElementRect>,
    /// Size of the outline container (width, height).
    pub container: (f32, f32),
}

impl OutlineSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measured element. Re-recording the same node replaces its rect.
    pub fn record(&mut self, kind: NodeKind, id: &str, act_id: &str, rect: ElementRect) {
        let key = (kind, id.to_string());
        match self.index.get(&key) {
            Some(&i) => self.elements[i].rect = rect,
            None => {
                self.index.insert(key, self.elements.len());
                self.elements.push(MeasuredElement {
                    kind,
                    id: id.to_string(),
                    act_id: act_id.to_string(),
                    rect,
                });
            }
        }
    }

    pub fn record_act_header(&mut self, act_id: &str, rect: ElementRect) {
        self.act_headers.insert(act_id.to_string(), rect);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, kind: NodeKind, id: &str) -> Option<ElementRect> {
        self.index
            .get(&(kind, id.to_string()))
            .map(|&i| self.elements[i].rect)
    }

    /// Rect of an element only if it is present and visible.
    pub fn visible(&self, kind: NodeKind, id: &str) -> Option<ElementRect> {
        self.get(kind, id).filter(ElementRect::is_visible)
    }

    pub fn act_header(&self, act_id: &str) -> Option<ElementRect> {
        self.act_headers
            .get(act_id)
            .copied()
            .filter(ElementRect::is_visible)
    }

    /// Whether any sequence of the act is currently visible.
    pub fn act_children_visible(&self, act_id: &str) -> bool {
        self.elements
            .iter()
            .any(|e| e.kind == NodeKind::Sequence && e.act_id == act_id && e.rect.is_visible())
    }

    /// Visible elements as (kind, id, rect), in recording order.
    pub fn visible_elements(&self) -> impl Iterator<Item = (NodeKind, &str, ElementRect)> {
        self.elements
            .iter()
            .filter(|e| e.rect.is_visible())
            .map(|e| (e.kind, e.id.as_str(), e.rect))
    }

    /// Topmost visible act.
    pub fn first_act(&self) -> Option<ElementRect> {
        self.visible_elements()
            .filter(|(kind, _, _)| *kind == NodeKind::Act)
            .map(|(_, _, rect)| rect)
            .min_by(|a, b| a.top.total_cmp(&b.top))
    }

    /// Hash of the visible geometry, used to detect layout mutations.
    ///
    /// Positions are quantized to half pixels so sub-pixel jitter does not
    /// count as a change.
    pub fn signature(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (kind, id, rect) in self.visible_elements() {
            kind.hash(&mut hasher);
            id.hash(&mut hasher);
            ((rect.top * 2.0).round() as i64).hash(&mut hasher);
            ((rect.height * 2.0).round() as i64).hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Lay out an outline by stacking fixed-height rows, honoring an explicit
    /// collapse state. Descendants of collapsed nodes are recorded as hidden.
    pub fn stack(outline: &Outline, collapse: &CollapseState, rows: &RowMetrics) -> Self {
        let mut snapshot = Self::new();
        let mut y = rows.top_padding;
        let width = rows.width;

        for act in &outline.acts {
            let act_top = y;
            snapshot.record_act_header(&act.id, ElementRect::new(y, rows.act_header, width));
            y += rows.act_header;
            let act_open = !collapse.is_collapsed(&act.id);

            for seq in &act.sequences {
                let seq_top = y;
                let seq_visible = act_open;
                if seq_visible {
                    y += rows.sequence_header;
                }
                let seq_open = seq_visible && !collapse.is_collapsed(&seq.id);

                for scene in &seq.scenes {
                    let scene_top = y;
                    if seq_open {
                        y += rows.scene_header;
                    }
                    let scene_open = seq_open && !collapse.is_collapsed(&scene.id);

                    for shot in &scene.shots {
                        if scene_open {
                            let rect = ElementRect::new(y, rows.shot, width);
                            snapshot.record(NodeKind::Shot, &shot.id, &act.id, rect);
                            y += rows.shot;
                        } else {
                            snapshot.record(NodeKind::Shot, &shot.id, &act.id, ElementRect::HIDDEN);
                        }
                    }
                    let rect = if seq_open {
                        ElementRect::new(scene_top, y - scene_top, width)
                    } else {
                        ElementRect::HIDDEN
                    };
                    snapshot.record(NodeKind::Scene, &scene.id, &act.id, rect);
                }
                let rect = if seq_visible {
                    ElementRect::new(seq_top, y - seq_top, width)
                } else {
                    ElementRect::HIDDEN
                };
                snapshot.record(NodeKind::Sequence, &seq.id, &act.id, rect);
            }

            snapshot.record(
                NodeKind::Act,
                &act.id,
                &act.id,
                ElementRect::new(act_top, y - act_top, width),
            );
            y += rows.act_gap;
        }

        snapshot.container = (width, y);
        snapshot
    }
}

/// Row heights used by [`OutlineSnapshot::stack`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    pub top_padding: f32,
    pub act_header: f32,
    pub sequence_header: f32,
    pub scene_header: f32,
    pub shot: f32,
    pub act_gap: f32,
    pub width: f32,
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            top_padding: 8.0,
            act_header: 32.0,
            sequence_header: 28.0,
            scene_header: 26.0,
            shot: 24.0,
            act_gap: 8.0,
            width: 320.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_expanded() {
        let outline = Outline::sample();
        let snapshot = OutlineSnapshot::stack(&outline, &CollapseState::default(), &RowMetrics::default());

        let act1 = snapshot.visible(NodeKind::Act, "act-1").unwrap();
        assert_eq!(act1.top, 8.0);
        let header = snapshot.act_header("act-1").unwrap();
        assert_eq!(header.top, act1.top);
        assert_eq!(header.height, 32.0);

        // Sequence starts right below the act header.
        let seq1 = snapshot.visible(NodeKind::Sequence, "seq-1").unwrap();
        assert_eq!(seq1.top, 40.0);
        assert!(snapshot.act_children_visible("act-1"));

        // Children nest inside their parents.
        let scene1 = snapshot.visible(NodeKind::Scene, "scene-1").unwrap();
        assert!(scene1.top >= seq1.top && scene1.bottom() <= seq1.bottom());
        assert!(seq1.bottom() <= act1.bottom());
    }

    #[test]
    fn test_stack_collapsed_act_hides_descendants() {
        let outline = Outline::sample();
        let mut collapse = CollapseState::default();
        collapse.collapse("act-2");
        let snapshot = OutlineSnapshot::stack(&outline, &collapse, &RowMetrics::default());

        let act2 = snapshot.visible(NodeKind::Act, "act-2").unwrap();
        assert_eq!(act2.height, 32.0);
        assert!(!snapshot.act_children_visible("act-2"));
        assert!(snapshot.get(NodeKind::Scene, "scene-4").is_some());
        assert!(snapshot.visible(NodeKind::Scene, "scene-4").is_none());
        assert!(snapshot.visible(NodeKind::Shot, "scene-5-shot-1").is_none());
    }

    #[test]
    fn test_first_act_and_signature() {
        let outline = Outline::sample();
        let rows = RowMetrics::default();
        let mut collapse = CollapseState::default();
        let open = OutlineSnapshot::stack(&outline, &collapse, &rows);
        assert_eq!(open.first_act().unwrap().top, 8.0);

        collapse.collapse("seq-3");
        let closed = OutlineSnapshot::stack(&outline, &collapse, &rows);
        assert_ne!(open.signature(), closed.signature());

        collapse.expand("seq-3");
        let reopened = OutlineSnapshot::stack(&outline, &collapse, &rows);
        assert_eq!(open.signature(), reopened.signature());
    }

    #[test]
    fn test_record_replaces_rect() {
        let mut snapshot = OutlineSnapshot::new();
        snapshot.record(NodeKind::Act, "a", "a", ElementRect::new(0.0, 10.0, 100.0));
        snapshot.record(NodeKind::Act, "a", "a", ElementRect::new(0.0, 50.0, 100.0));
        assert_eq!(snapshot.get(NodeKind::Act, "a").unwrap().height, 50.0);
        assert_eq!(snapshot.visible_elements().count(), 1);
    }
}
