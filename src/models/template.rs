// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Beat template registry.
//!
//! Static catalog of beat-sheet structures. Applying a template produces a
//! fresh set of beats with newly minted ids.

use crate::models::beat::Beat;

/// One beat of a template, as percentages of total story length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatSeed {
    pub label: &'static str,
    pub color: &'static str,
    pub pct_from: f64,
    pub pct_to: f64,
}

/// A named beat-sheet structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub abbr: &'static str,
    pub description: &'static str,
    /// Other ids this template is known by.
    pub aliases: &'static [&'static str],
    pub seeds: &'static [BeatSeed],
}

impl BeatTemplate {
    pub fn answers_to(&self, template_id: &str) -> bool {
        self.id == template_id || self.aliases.iter().any(|alias| *alias == template_id)
    }
}

/// Lightweight listing entry for template pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSummary {
    pub id: &'static str,
    pub label: &'static str,
    pub abbreviation: &'static str,
    pub description: &'static str,
}

pub const DEFAULT_TEMPLATE_ID: &str = "save-the-cat";

const fn seed(label: &'static str, color: &'static str, pct_from: f64, pct_to: f64) -> BeatSeed {
    BeatSeed {
        label,
        color,
        pct_from,
        pct_to,
    }
}

const SAVE_THE_CAT: &[BeatSeed] = &[
    seed("Opening Image", "#60a5fa", 0.0, 6.67),
    seed("Theme Stated", "#38bdf8", 6.67, 13.33),
    seed("Set-Up", "#22d3ee", 13.33, 20.0),
    seed("Catalyst", "#f97316", 20.0, 26.67),
    seed("Debate", "#fb923c", 26.67, 33.33),
    seed("Break into Two", "#ef4444", 33.33, 40.0),
    seed("B Story", "#a78bfa", 40.0, 46.67),
    seed("Fun and Games", "#34d399", 46.67, 53.33),
    seed("Midpoint", "#facc15", 53.33, 60.0),
    seed("Bad Guys Close In", "#f87171", 60.0, 66.67),
    seed("All Is Lost", "#dc2626", 66.67, 73.33),
    seed("Dark Night of the Soul", "#6b7280", 73.33, 80.0),
    seed("Break into Three", "#ef4444", 80.0, 86.67),
    seed("Finale", "#8b5cf6", 86.67, 93.33),
    seed("Final Image", "#60a5fa", 93.33, 100.0),
];

const SEVEN_POINT: &[BeatSeed] = &[
    seed("Hook", "#f59e0b", 0.0, 10.0),
    seed("Plot Turn 1", "#ef4444", 10.0, 25.0),
    seed("Pinch 1", "#a855f7", 25.0, 40.0),
    seed("Midpoint", "#facc15", 40.0, 55.0),
    seed("Pinch 2", "#a855f7", 55.0, 70.0),
    seed("Plot Turn 2", "#ef4444", 70.0, 85.0),
    seed("Resolution", "#22c55e", 85.0, 100.0),
];

const HEROS_JOURNEY: &[BeatSeed] = &[
    seed("Ordinary World", "#60a5fa", 0.0, 10.0),
    seed("Call to Adventure", "#f97316", 10.0, 15.0),
    seed("Refusal of the Call", "#fb923c", 15.0, 20.0),
    seed("Meeting the Mentor", "#a78bfa", 20.0, 25.0),
    seed("Crossing the Threshold", "#ef4444", 25.0, 30.0),
    seed("Tests, Allies, Enemies", "#34d399", 30.0, 45.0),
    seed("Approach", "#2dd4bf", 45.0, 50.0),
    seed("Ordeal", "#dc2626", 50.0, 60.0),
    seed("Reward", "#facc15", 60.0, 70.0),
    seed("The Road Back", "#f87171", 70.0, 80.0),
    seed("Resurrection", "#8b5cf6", 80.0, 90.0),
    seed("Return with the Elixir", "#22c55e", 90.0, 100.0),
];

// Plot points are moments; they get widened on instantiation.
const THREE_ACT: &[BeatSeed] = &[
    seed("Setup", "#60a5fa", 0.0, 23.0),
    seed("Plot Point One", "#ef4444", 23.0, 23.0),
    seed("Confrontation", "#f97316", 25.0, 73.0),
    seed("Plot Point Two", "#ef4444", 73.0, 73.0),
    seed("Resolution", "#22c55e", 75.0, 100.0),
];

const TEMPLATES: &[BeatTemplate] = &[
    BeatTemplate {
        id: "save-the-cat",
        aliases: &["15-point"],
        name: "Save the Cat",
        abbr: "STC",
        description: "Fifteen evenly paced beats from opening to final image.",
        seeds: SAVE_THE_CAT,
    },
    BeatTemplate {
        id: "seven-point",
        aliases: &["7-point"],
        name: "Seven-Point Structure",
        abbr: "7PT",
        description: "Hook, two plot turns, two pinches, midpoint and resolution.",
        seeds: SEVEN_POINT,
    },
    BeatTemplate {
        id: "heros-journey",
        aliases: &[],
        name: "Hero's Journey",
        abbr: "HJ",
        description: "Twelve stages of the monomyth.",
        seeds: HEROS_JOURNEY,
    },
    BeatTemplate {
        id: "three-act",
        aliases: &[],
        name: "Three-Act Structure",
        abbr: "3A",
        description: "Setup, confrontation and resolution split by two plot points.",
        seeds: THREE_ACT,
    },
];

/// All registered templates.
pub fn templates() -> &'static [BeatTemplate] {
    TEMPLATES
}

/// Summaries of all templates, in catalog order.
pub fn list_templates() -> Vec<TemplateSummary> {
    TEMPLATES
        .iter()
        .map(|t| TemplateSummary {
            id: t.id,
            label: t.name,
            abbreviation: t.abbr,
            description: t.description,
        })
        .collect()
}

/// Look up a template, falling back to the default one for unknown ids.
pub fn find(template_id: &str) -> &'static BeatTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.answers_to(template_id))
        .or_else(|| TEMPLATES.iter().find(|t| t.id == DEFAULT_TEMPLATE_ID))
        .unwrap_or(&TEMPLATES[0])
}

/// Generate fresh beats from a template.
///
/// Seeds whose span is below `min_span` are extended by `widen` percentage
/// points, clamped to 100.
pub fn instantiate(template_id: &str, min_span: f64, widen: f64) -> Vec<Beat> {
    let template = find(template_id);
    if !template.answers_to(template_id) {
        log::warn!(
            "Unknown template '{}', using '{}'",
            template_id,
            template.id
        );
    }

    template
        .seeds
        .iter()
        .map(|s| {
            let (from, to) = widen_seed(s.pct_from, s.pct_to, min_span, widen);
            Beat::new(s.label, s.color, from, to, template.abbr, min_span.min(widen))
        })
        .collect()
}

fn widen_seed(pct_from: f64, pct_to: f64, min_span: f64, widen: f64) -> (f64, f64) {
    let from = pct_from.clamp(0.0, 100.0);
    let to = pct_to.clamp(0.0, 100.0);
    if to - from >= min_span {
        return (from, to);
    }
    let to = (to.max(from) + widen).min(100.0);
    // A seed sitting at the very end grows backwards instead.
    let from = if to - from < min_span {
        (to - widen).max(0.0)
    } else {
        from
    };
    (from, to)
}
