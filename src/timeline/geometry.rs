// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry resolver.
//!
//! Converts between a beat's logical position (percentages, optionally
//! pinned by outline anchors) and pixel rects in the measured outline.
//! Every function here is pure over an [`OutlineSnapshot`]; the UI decides
//! when to call them.

use crate::config::TimelineConfig;
use crate::models::beat::{Anchor, Beat};
use crate::models::outline::NodeKind;
use crate::timeline::snapshot::{ElementRect, OutlineSnapshot};
use crate::util::geometry::{normalize_span, pct_to_px, px_to_pct};
use uuid::Uuid;

/// Smallest span a reflow write-back may produce. Kept well below the drag
/// minimum so collapsed-act markers keep their pixel height.
pub(crate) const RESOLVED_MIN_SPAN: f64 = 1e-3;

/// Slack when testing whether a position lies on an element edge.
const EDGE_EPS: f32 = 0.01;

/// Coordinate space beats are positioned in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentMetrics {
    /// Top of the first act, container-relative.
    pub origin: f32,
    /// Distance from `origin` to the lowest visible element bottom.
    pub height: f32,
}

impl ContentMetrics {
    pub fn bottom(&self) -> f32 {
        self.origin + self.height
    }

    /// Container-relative pixel position of a percentage.
    pub fn pct_to_y(&self, pct: f64) -> f32 {
        self.origin + pct_to_px(pct, self.height)
    }

    /// Percentage of a container-relative pixel position, clamped to [0, 100].
    pub fn y_to_pct(&self, y: f32) -> f64 {
        px_to_pct(y - self.origin, self.height)
    }
}

/// Measure the content height of the rendered outline.
///
/// Returns `None` while the outline is not rendered yet.
pub fn content_metrics(snapshot: &OutlineSnapshot) -> Option<ContentMetrics> {
    let first = snapshot.first_act()?;
    let lowest = snapshot
        .visible_elements()
        .map(|(_, _, rect)| rect.bottom())
        .fold(f32::NEG_INFINITY, f32::max);
    let height = lowest - first.top;
    if !height.is_finite() || height <= 0.0 {
        return None;
    }
    Some(ContentMetrics {
        origin: first.top,
        height,
    })
}

/// Pixel placement of one beat, container-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedBeat {
    pub id: Uuid,
    pub top: f32,
    pub height: f32,
}

impl PositionedBeat {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Place a beat by its stored percentages.
pub fn render_beat(beat: &Beat, metrics: &ContentMetrics, min_visible_px: f32) -> PositionedBeat {
    let mut top = metrics.pct_to_y(beat.pct_from);
    let height = pct_to_px(beat.pct_to - beat.pct_from, metrics.height).max(min_visible_px);
    if top + height > metrics.bottom() {
        top = (metrics.bottom() - height).max(metrics.origin);
    }
    PositionedBeat {
        id: beat.id,
        top,
        height,
    }
}

/// Place every beat against one shared measurement of the outline.
pub fn positions(
    beats: &[Beat],
    snapshot: &OutlineSnapshot,
    config: &TimelineConfig,
) -> Option<Vec<PositionedBeat>> {
    let metrics = content_metrics(snapshot)?;
    Some(
        beats
            .iter()
            .map(|beat| render_beat(beat, &metrics, config.min_visible_px))
            .collect(),
    )
}

/// An anchor endpoint matched to a rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub kind: NodeKind,
    pub id: String,
    pub rect: ElementRect,
    /// Resolved to the header of a collapsed act rather than the act itself.
    pub via_header: bool,
}

/// Resolve the most specific visible anchor of one endpoint.
///
/// Stale and hidden anchors are skipped in favor of less specific ones.
pub fn resolve_endpoint(snapshot: &OutlineSnapshot, anchor: &Anchor) -> Option<ResolvedEndpoint> {
    anchor.candidates().find_map(|(kind, id)| {
        let rect = snapshot.visible(kind, id)?;
        if kind == NodeKind::Act && !snapshot.act_children_visible(id) {
            if let Some(header) = snapshot.act_header(id) {
                return Some(ResolvedEndpoint {
                    kind,
                    id: id.to_string(),
                    rect: header,
                    via_header: true,
                });
            }
        }
        Some(ResolvedEndpoint {
            kind,
            id: id.to_string(),
            rect,
            via_header: false,
        })
    })
}

/// Result of resolving a beat's anchors against the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorResolution {
    /// The beat carries no anchors; its stored percentages stand.
    NoAnchors,
    /// None of the anchors matched a visible element.
    Unresolved,
    Resolved { pct_from: f64, pct_to: f64 },
}

/// Compute a beat's percentages from its anchors.
///
/// An endpoint that cannot be resolved keeps its stored percentage.
pub fn resolve_anchors(
    beat: &Beat,
    snapshot: &OutlineSnapshot,
    metrics: &ContentMetrics,
    config: &TimelineConfig,
) -> AnchorResolution {
    if !beat.has_anchors() {
        return AnchorResolution::NoAnchors;
    }

    let from = resolve_endpoint(snapshot, &beat.anchors.from);
    let to = resolve_endpoint(snapshot, &beat.anchors.to);

    let (from_y, to_y) = match (&from, &to) {
        (None, None) => return AnchorResolution::Unresolved,
        (Some(f), Some(t)) if f.via_header && t.via_header && f.id == t.id => {
            (f.rect.top, f.rect.top + config.collapsed_marker_px)
        }
        (f, t) => (
            f.as_ref()
                .map_or_else(|| metrics.pct_to_y(beat.pct_from), |f| f.rect.top),
            t.as_ref()
                .map_or_else(|| metrics.pct_to_y(beat.pct_to), |t| t.rect.bottom()),
        ),
    };

    let (pct_from, pct_to) = normalize_span(
        metrics.y_to_pct(from_y),
        metrics.y_to_pct(to_y),
        RESOLVED_MIN_SPAN,
    );
    AnchorResolution::Resolved { pct_from, pct_to }
}

/// Outcome of one recompute pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    /// The outline is not measurable yet; try again on the next trigger.
    NotReady,
    Applied {
        updated: Vec<Uuid>,
        unresolved: Vec<Uuid>,
    },
}

/// Re-pin every anchored beat to the current outline layout.
///
/// All beats are resolved against the same measurement. `skip` names a beat
/// that is owned by an active drag and must not be touched.
pub fn recompute(
    beats: &mut [Beat],
    snapshot: &OutlineSnapshot,
    config: &TimelineConfig,
    skip: Option<Uuid>,
) -> PassOutcome {
    let Some(metrics) = content_metrics(snapshot) else {
        log::debug!("Outline not measurable yet, skipping recompute");
        return PassOutcome::NotReady;
    };

    let mut updated = Vec::new();
    let mut unresolved = Vec::new();
    for beat in beats.iter_mut().filter(|b| Some(b.id) != skip) {
        match resolve_anchors(beat, snapshot, &metrics, config) {
            AnchorResolution::NoAnchors => {}
            AnchorResolution::Unresolved => {
                log::debug!("No anchor of beat '{}' resolves, keeping {:.2}-{:.2}",
                    beat.label, beat.pct_from, beat.pct_to);
                unresolved.push(beat.id);
            }
            AnchorResolution::Resolved { pct_from, pct_to } => {
                let moved = (pct_from - beat.pct_from).abs() > 1e-6
                    || (pct_to - beat.pct_to).abs() > 1e-6;
                if moved {
                    beat.pct_from = pct_from;
                    beat.pct_to = pct_to;
                    updated.push(beat.id);
                }
            }
        }
    }

    PassOutcome::Applied { updated, unresolved }
}

/// Which end of a beat a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

/// Anchor a percentage position to the visible elements that contain it.
///
/// A `From` position belongs to the element starting at or before it, a
/// `To` position to the element ending at or after it, so a span dropped
/// exactly on a boundary pins to the elements on its own side.
pub fn anchors_at(snapshot: &OutlineSnapshot, pct: f64, endpoint: Endpoint) -> Anchor {
    let mut anchor = Anchor::default();
    let Some(metrics) = content_metrics(snapshot) else {
        return anchor;
    };
    let y = metrics.pct_to_y(pct);
    let contains = |rect: &ElementRect| match endpoint {
        Endpoint::From => rect.top - EDGE_EPS <= y && y < rect.bottom() - EDGE_EPS,
        Endpoint::To => rect.top + EDGE_EPS < y && y <= rect.bottom() + EDGE_EPS,
    };

    for (kind, id, rect) in snapshot.visible_elements() {
        if contains(&rect) {
            anchor.set(kind, Some(id.to_string()));
        }
    }
    anchor
}

/// Legal drag range when beats are contained by acts: from the top of the
/// act holding `pct_from` to the bottom of the act holding `pct_to`.
pub fn act_bounds(snapshot: &OutlineSnapshot, pct_from: f64, pct_to: f64) -> (f64, f64) {
    let Some(metrics) = content_metrics(snapshot) else {
        return (0.0, 100.0);
    };
    let acts: Vec<ElementRect> = snapshot
        .visible_elements()
        .filter(|(kind, _, _)| *kind == NodeKind::Act)
        .map(|(_, _, rect)| rect)
        .collect();

    let from_y = metrics.pct_to_y(pct_from);
    let to_y = metrics.pct_to_y(pct_to);
    let min = acts
        .iter()
        .find(|r| r.top <= from_y && from_y < r.bottom())
        .map_or(0.0, |r| metrics.y_to_pct(r.top));
    let max = acts
        .iter()
        .find(|r| r.top < to_y && to_y <= r.bottom())
        .map_or(100.0, |r| metrics.y_to_pct(r.bottom()));
    (min, max)
}
