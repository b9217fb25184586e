// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Beat data structures.
//!
//! A beat is a percentage span along the story timeline, optionally
//! anchored at either end to a node of the outline.

use crate::models::outline::NodeKind;
use crate::util::geometry::normalize_span;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional reference from one beat endpoint into the outline tree.
///
/// Anchors are hints: any subset may be present, and ids may be stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot: Option<String>,
}

impl Anchor {
    /// Anchor pinned to a single act.
    pub fn act(id: impl Into<String>) -> Self {
        Self {
            act: Some(id.into()),
            ..Default::default()
        }
    }

    /// Anchor pinned to a single scene.
    pub fn scene(id: impl Into<String>) -> Self {
        Self {
            scene: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.act.is_none() && self.sequence.is_none() && self.scene.is_none() && self.shot.is_none()
    }

    /// Present anchors ordered from most to least specific.
    pub fn candidates(&self) -> impl Iterator<Item = (NodeKind, &str)> {
        [
            (NodeKind::Shot, self.shot.as_deref()),
            (NodeKind::Scene, self.scene.as_deref()),
            (NodeKind::Sequence, self.sequence.as_deref()),
            (NodeKind::Act, self.act.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
    }

    /// Set the anchor slot for the given node kind.
    pub fn set(&mut self, kind: NodeKind, id: Option<String>) {
        match kind {
            NodeKind::Act => self.act = id,
            NodeKind::Sequence => self.sequence = id,
            NodeKind::Scene => self.scene = id,
            NodeKind::Shot => self.shot = id,
        }
    }
}

/// Start and end anchors of a beat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatAnchors {
    #[serde(default)]
    pub from: Anchor,
    #[serde(default)]
    pub to: Anchor,
}

impl BeatAnchors {
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}

/// A story beat on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub id: Uuid,
    pub label: String,
    /// Hex color, e.g. "#f97316".
    pub color: String,
    pub pct_from: f64,
    pub pct_to: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub template_abbr: String,
    #[serde(default)]
    pub anchors: BeatAnchors,
}

impl Beat {
    /// Create an unanchored beat with a fresh id.
    ///
    /// The span is normalized so that `0 <= pct_from < pct_to <= 100`.
    pub fn new(
        label: impl Into<String>,
        color: impl Into<String>,
        pct_from: f64,
        pct_to: f64,
        template_abbr: impl Into<String>,
        min_span: f64,
    ) -> Self {
        let (pct_from, pct_to) = normalize_span(pct_from, pct_to, min_span);
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            color: color.into(),
            pct_from,
            pct_to,
            notes: String::new(),
            template_abbr: template_abbr.into(),
            anchors: BeatAnchors::default(),
        }
    }

    /// Replace the span, keeping the ordering and range invariants.
    pub fn set_span(&mut self, pct_from: f64, pct_to: f64, min_span: f64) {
        let (from, to) = normalize_span(pct_from, pct_to, min_span);
        self.pct_from = from;
        self.pct_to = to;
    }

    pub fn span(&self) -> f64 {
        self.pct_to - self.pct_from
    }

    pub fn midpoint(&self) -> f64 {
        (self.pct_from + self.pct_to) / 2.0
    }

    pub fn has_anchors(&self) -> bool {
        !self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_most_specific_first() {
        let anchor = Anchor {
            act: Some("a1".into()),
            sequence: None,
            scene: Some("sc1".into()),
            shot: Some("sh1".into()),
        };
        let kinds: Vec<NodeKind> = anchor.candidates().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![NodeKind::Shot, NodeKind::Scene, NodeKind::Act]);
    }

    #[test]
    fn test_new_beat_normalizes_span() {
        let beat = Beat::new("Midpoint", "#fff", 60.0, 40.0, "STC", 1.0);
        assert!(beat.pct_from < beat.pct_to);
        assert!(beat.pct_from >= 0.0 && beat.pct_to <= 100.0);
        assert!(beat.span() >= 1.0 - 1e-9);
    }

    #[test]
    fn test_set_span_clamps_range() {
        let mut beat = Beat::new("Finale", "#fff", 90.0, 95.0, "STC", 1.0);
        beat.set_span(-10.0, 140.0, 1.0);
        assert_eq!(beat.pct_from, 0.0);
        assert_eq!(beat.pct_to, 100.0);
    }

    #[test]
    fn test_anchors_skip_absent_fields() {
        let mut beat = Beat::new("Hook", "#fff", 0.0, 2.0, "7PT", 1.0);
        beat.anchors.from = Anchor::scene("sc-1");
        let yaml = serde_yaml::to_string(&beat).unwrap();
        assert!(yaml.contains("scene: sc-1"));
        assert!(!yaml.contains("shot"));
    }
}
