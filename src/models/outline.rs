// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screenplay outline tree.
//!
//! The outline is owned by the host page; the timeline only reads it.
//! Ids are stable across collapse/expand and re-renders.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Level of a node in the outline hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Act,
    Sequence,
    Scene,
    Shot,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Act => "Act",
            NodeKind::Sequence => "Sequence",
            NodeKind::Scene => "Scene",
            NodeKind::Shot => "Shot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub shots: Vec<Shot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
}

/// A flattened view of one outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef<'a> {
    pub kind: NodeKind,
    pub id: &'a str,
    pub title: &'a str,
    pub act_id: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub acts: Vec<Act>,
}

impl Outline {
    /// All nodes in document order (pre-order).
    pub fn nodes(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::new();
        for act in &self.acts {
            out.push(NodeRef {
                kind: NodeKind::Act,
                id: &act.id,
                title: &act.title,
                act_id: &act.id,
            });
            for seq in &act.sequences {
                out.push(NodeRef {
                    kind: NodeKind::Sequence,
                    id: &seq.id,
                    title: &seq.title,
                    act_id: &act.id,
                });
                for scene in &seq.scenes {
                    out.push(NodeRef {
                        kind: NodeKind::Scene,
                        id: &scene.id,
                        title: &scene.title,
                        act_id: &act.id,
                    });
                    for shot in &scene.shots {
                        out.push(NodeRef {
                            kind: NodeKind::Shot,
                            id: &shot.id,
                            title: &shot.title,
                            act_id: &act.id,
                        });
                    }
                }
            }
        }
        out
    }

    /// Remove a scene (and its shots) by id. Returns true if one was removed.
    pub fn remove_scene(&mut self, scene_id: &str) -> bool {
        for act in &mut self.acts {
            for seq in &mut act.sequences {
                let before = seq.scenes.len();
                seq.scenes.retain(|s| s.id != scene_id);
                if seq.scenes.len() != before {
                    return true;
                }
            }
        }
        false
    }

    /// A small three-act outline used when no project is loaded.
    pub fn sample() -> Self {
        let scene = |id: &str, title: &str, shots: usize| Scene {
            id: id.to_string(),
            title: title.to_string(),
            shots: (1..=shots)
                .map(|n| Shot {
                    id: format!("{id}-shot-{n}"),
                    title: format!("Shot {n}"),
                })
                .collect(),
        };
        let sequence = |id: &str, title: &str, scenes: Vec<Scene>| Sequence {
            id: id.to_string(),
            title: title.to_string(),
            scenes,
        };
        Self {
            acts: vec![
                Act {
                    id: "act-1".into(),
                    title: "Act I".into(),
                    sequences: vec![
                        sequence(
                            "seq-1",
                            "Status quo",
                            vec![scene("scene-1", "Morning routine", 2), scene("scene-2", "The letter", 1)],
                        ),
                        sequence("seq-2", "Departure", vec![scene("scene-3", "Leaving town", 2)]),
                    ],
                },
                Act {
                    id: "act-2".into(),
                    title: "Act II".into(),
                    sequences: vec![
                        sequence(
                            "seq-3",
                            "New world",
                            vec![scene("scene-4", "Arrival", 1), scene("scene-5", "First test", 3)],
                        ),
                        sequence(
                            "seq-4",
                            "Complications",
                            vec![scene("scene-6", "Betrayal", 2), scene("scene-7", "Lowest point", 1)],
                        ),
                    ],
                },
                Act {
                    id: "act-3".into(),
                    title: "Act III".into(),
                    sequences: vec![sequence(
                        "seq-5",
                        "Showdown",
                        vec![scene("scene-8", "Confrontation", 2), scene("scene-9", "New normal", 1)],
                    )],
                },
            ],
        }
    }
}

/// Explicit collapse state of the outline, keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<String>,
}

impl CollapseState {
    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn collapse(&mut self, id: impl Into<String>) {
        self.collapsed.insert(id.into());
    }

    pub fn expand(&mut self, id: &str) {
        self.collapsed.remove(id);
    }

    /// Flip the collapse state of a node.
    pub fn toggle(&mut self, id: &str) {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_in_document_order() {
        let outline = Outline::sample();
        let nodes = outline.nodes();
        assert_eq!(nodes[0].kind, NodeKind::Act);
        assert_eq!(nodes[0].id, "act-1");
        assert_eq!(nodes[1].kind, NodeKind::Sequence);
        assert_eq!(nodes[2].id, "scene-1");
        assert_eq!(nodes[3].id, "scene-1-shot-1");
        assert!(nodes.iter().filter(|n| n.kind == NodeKind::Act).count() == 3);
        assert!(nodes.iter().all(|n| !n.act_id.is_empty()));
    }

    #[test]
    fn test_remove_scene() {
        let mut outline = Outline::sample();
        assert!(outline.remove_scene("scene-4"));
        assert!(!outline.remove_scene("scene-4"));
        assert!(outline.nodes().iter().all(|n| n.id != "scene-4"));
    }

    #[test]
    fn test_collapse_toggle() {
        let mut state = CollapseState::default();
        state.toggle("act-1");
        assert!(state.is_collapsed("act-1"));
        state.toggle("act-1");
        assert!(!state.is_collapsed("act-1"));
        state.collapse("seq-1");
        state.expand("seq-1");
        assert!(!state.is_collapsed("seq-1"));
    }
}
