// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The beat collection of one timeline and every mutation applied to it.
//!
//! All writes go through [`BeatBoard`] so that the host can persist them:
//! each committed change is queued as a [`BeatChange`] and drained by the
//! host once per frame.

use crate::config::TimelineConfig;
use crate::models::beat::{Beat, BeatAnchors};
use crate::models::template;
use crate::timeline::geometry::{
    self, act_bounds, anchors_at, content_metrics, resolve_anchors, AnchorResolution, Endpoint, PassOutcome,
    PositionedBeat, RESOLVED_MIN_SPAN,
};
use crate::timeline::interaction::{centered_span, DragBounds, DragController, Handle};
use crate::timeline::snapshot::OutlineSnapshot;
use uuid::Uuid;

/// A committed change to the beat collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatChange {
    /// The whole collection was swapped (template applied, undo, load).
    Replaced,
    Added(Uuid),
    Updated(Uuid),
    Removed(Uuid),
}

#[derive(Debug, Clone)]
pub struct BeatBoard {
    beats: Vec<Beat>,
    drag: DragController,
    changes: Vec<BeatChange>,
}

impl BeatBoard {
    pub fn new(mut beats: Vec<Beat>, config: &TimelineConfig) -> Self {
        normalize_all(&mut beats);
        Self {
            beats,
            drag: DragController::new(config.min_span_pct),
            changes: Vec::new(),
        }
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn beat(&self, id: Uuid) -> Option<&Beat> {
        self.beats.iter().find(|b| b.id == id)
    }

    fn beat_mut(&mut self, id: Uuid) -> Option<&mut Beat> {
        self.beats.iter_mut().find(|b| b.id == id)
    }

    /// Swap the whole collection. Any drag in progress is abandoned.
    ///
    /// Spans are normalized on the way in, since loaded beats may carry
    /// inverted or out-of-range percentages.
    pub fn replace(&mut self, mut beats: Vec<Beat>) {
        self.drag.finish();
        normalize_all(&mut beats);
        self.beats = beats;
        self.changes.push(BeatChange::Replaced);
    }

    /// Discard all beats and regenerate them from a template.
    pub fn apply_template(&mut self, template_id: &str, config: &TimelineConfig) -> &'static str {
        let resolved = template::find(template_id).id;
        let beats = template::instantiate(
            template_id,
            config.template_min_span_pct,
            config.template_widen_pct,
        );
        log::info!("Applied template '{}' ({} beats)", resolved, beats.len());
        self.replace(beats);
        resolved
    }

    /// Pixel placement of every beat, or `None` while the outline is not ready.
    pub fn positions(&self, snapshot: &OutlineSnapshot, config: &TimelineConfig) -> Option<Vec<PositionedBeat>> {
        geometry::positions(&self.beats, snapshot, config)
    }

    /// Re-pin anchored beats to the current layout. The beat owned by an
    /// active drag is left alone.
    pub fn reflow(&mut self, snapshot: &OutlineSnapshot, config: &TimelineConfig) -> PassOutcome {
        let skip = self.dragging();
        let outcome = geometry::recompute(&mut self.beats, snapshot, config, skip);
        if let PassOutcome::Applied { updated, .. } = &outcome {
            self.changes
                .extend(updated.iter().copied().map(BeatChange::Updated));
        }
        outcome
    }

    /// Id of the beat currently being dragged.
    pub fn dragging(&self) -> Option<Uuid> {
        self.drag.active().map(|d| d.beat_id)
    }

    pub fn begin_drag(
        &mut self,
        id: Uuid,
        handle: Handle,
        start_y: f32,
        snapshot: &OutlineSnapshot,
        config: &TimelineConfig,
    ) -> bool {
        let Some(beat) = self.beat(id) else {
            return false;
        };
        let bounds = if config.act_containment {
            let (min, max) = act_bounds(snapshot, beat.pct_from, beat.pct_to);
            DragBounds { min, max }
        } else {
            DragBounds::default()
        };
        let beat = beat.clone();
        self.drag.begin(&beat, handle, start_y, bounds)
    }

    /// Track the pointer. The dragged beat follows live; nothing is reported
    /// to the host until the drag ends.
    pub fn drag_to(&mut self, current_y: f32, container_height: f32) {
        if let Some((id, from, to)) = self.drag.update(current_y, container_height) {
            if let Some(beat) = self.beat_mut(id) {
                beat.pct_from = from;
                beat.pct_to = to;
            }
        }
    }

    /// Commit the drag in progress.
    pub fn end_drag(&mut self, snapshot: &OutlineSnapshot, config: &TimelineConfig) -> Option<Uuid> {
        let commit = self.drag.finish()?;
        let metrics = content_metrics(snapshot);
        let beat = self.beat_mut(commit.beat_id)?;
        // The controller already clamped to the drag bounds; only guard the order.
        beat.set_span(commit.pct_from, commit.pct_to, RESOLVED_MIN_SPAN);

        if config.reanchor_on_drag {
            if matches!(commit.handle, Handle::Top | Handle::Body) {
                beat.anchors.from = anchors_at(snapshot, beat.pct_from, Endpoint::From);
            }
            if matches!(commit.handle, Handle::Bottom | Handle::Body) {
                beat.anchors.to = anchors_at(snapshot, beat.pct_to, Endpoint::To);
            }
            // Snap now, so the next pass over this layout leaves the beat where it is.
            if let Some(metrics) = metrics {
                if let AnchorResolution::Resolved { pct_from, pct_to } =
                    resolve_anchors(beat, snapshot, &metrics, config)
                {
                    beat.pct_from = pct_from;
                    beat.pct_to = pct_to;
                }
            }
        } else {
            // Stale anchors would pull the dropped span back on the next reflow.
            beat.anchors = BeatAnchors::default();
        }

        log::debug!("Committed '{}' at {:.2}-{:.2}", beat.label, beat.pct_from, beat.pct_to);
        self.changes.push(BeatChange::Updated(commit.beat_id));
        Some(commit.beat_id)
    }

    /// Move the hook beat so it is centered on `click_pct`, creating it if
    /// the timeline has none.
    pub fn jump_hook(&mut self, click_pct: f64, config: &TimelineConfig) -> Uuid {
        let (from, to) = centered_span(click_pct, config.hook_span_pct);
        let existing = self
            .beats
            .iter_mut()
            .find(|b| b.label.eq_ignore_ascii_case(&config.hook_label));

        let (id, change) = match existing {
            Some(hook) => {
                hook.pct_from = from;
                hook.pct_to = to;
                hook.anchors = BeatAnchors::default();
                (hook.id, BeatChange::Updated(hook.id))
            }
            None => {
                let hook = Beat::new(
                    config.hook_label.clone(),
                    config.hook_color.clone(),
                    from,
                    to,
                    "",
                    f64::EPSILON,
                );
                let id = hook.id;
                self.beats.insert(0, hook);
                (id, BeatChange::Added(id))
            }
        };

        log::info!("Hook moved to {:.2}%", click_pct);
        self.changes.push(change);
        id
    }

    pub fn set_notes(&mut self, id: Uuid, notes: String) -> bool {
        let Some(beat) = self.beat_mut(id) else {
            return false;
        };
        if beat.notes == notes {
            return false;
        }
        beat.notes = notes;
        self.changes.push(BeatChange::Updated(id));
        true
    }

    /// Pin both ends of a beat to the outline elements under them.
    pub fn pin_to_outline(&mut self, id: Uuid, snapshot: &OutlineSnapshot) -> bool {
        let Some(beat) = self.beat_mut(id) else {
            return false;
        };
        beat.anchors.from = anchors_at(snapshot, beat.pct_from, Endpoint::From);
        beat.anchors.to = anchors_at(snapshot, beat.pct_to, Endpoint::To);
        self.changes.push(BeatChange::Updated(id));
        true
    }

    pub fn clear_anchors(&mut self, id: Uuid) -> bool {
        let Some(beat) = self.beat_mut(id) else {
            return false;
        };
        beat.anchors = BeatAnchors::default();
        self.changes.push(BeatChange::Updated(id));
        true
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        if self.dragging() == Some(id) {
            self.drag.finish();
        }
        let before = self.beats.len();
        self.beats.retain(|b| b.id != id);
        let removed = self.beats.len() != before;
        if removed {
            self.changes.push(BeatChange::Removed(id));
        }
        removed
    }

    /// Take every change queued since the last call.
    pub fn drain_changes(&mut self) -> Vec<BeatChange> {
        std::mem::take(&mut self.changes)
    }
}

fn normalize_all(beats: &mut [Beat]) {
    for beat in beats {
        let (from, to) = (beat.pct_from, beat.pct_to);
        beat.set_span(from, to, RESOLVED_MIN_SPAN);
        if (beat.pct_from, beat.pct_to) != (from, to) {
            log::warn!(
                "Beat '{}' had an invalid span {}-{}, corrected to {:.2}-{:.2}",
                beat.label,
                from,
                to,
                beat.pct_from,
                beat.pct_to
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::beat::Anchor;
    use crate::models::outline::{CollapseState, NodeKind, Outline};
    use crate::timeline::snapshot::RowMetrics;

    fn snapshot() -> OutlineSnapshot {
        OutlineSnapshot::stack(&Outline::sample(), &CollapseState::default(), &RowMetrics::default())
    }

    fn board(template_id: &str) -> (BeatBoard, TimelineConfig) {
        let config = TimelineConfig::default();
        let mut board = BeatBoard::new(Vec::new(), &config);
        board.apply_template(template_id, &config);
        board.drain_changes();
        (board, config)
    }

    #[test]
    fn test_apply_template_replaces() {
        let (mut board, config) = board("seven-point");
        assert_eq!(board.beats().len(), 7);
        assert_eq!(board.apply_template("bogus", &config), "save-the-cat");
        assert_eq!(board.beats().len(), 15);
        assert_eq!(board.drain_changes(), vec![BeatChange::Replaced]);
        assert!(board.drain_changes().is_empty());
    }

    #[test]
    fn test_hook_jump_centers_existing_hook() {
        let (mut board, config) = board("seven-point");
        let hook_id = board.beats()[0].id;
        let id = board.jump_hook(47.0, &config);
        assert_eq!(id, hook_id);
        let hook = board.beat(id).unwrap();
        assert!((hook.midpoint() - 47.0).abs() < 1e-9);
        assert!((hook.span() - config.hook_span_pct).abs() < 1e-9);
        assert_eq!(board.drain_changes(), vec![BeatChange::Updated(id)]);
    }

    #[test]
    fn test_hook_jump_creates_missing_hook() {
        let (mut board, config) = board("save-the-cat");
        let id = board.jump_hook(120.0, &config);
        assert_eq!(board.beats().len(), 16);
        let hook = board.beat(id).unwrap();
        assert_eq!(hook.label, "Hook");
        assert_eq!(hook.pct_to, 100.0);
        assert_eq!(board.drain_changes(), vec![BeatChange::Added(id)]);
    }

    #[test]
    fn test_drag_reports_only_commit() {
        let (mut board, config) = board("seven-point");
        let snap = snapshot();
        let id = board.beats()[3].id;

        assert!(board.begin_drag(id, Handle::Bottom, 0.0, &snap, &config));
        board.drag_to(10.0, 100.0);
        board.drag_to(20.0, 100.0);
        assert!(board.drain_changes().is_empty());
        assert!((board.beat(id).unwrap().pct_to - 75.0).abs() < 1e-4);

        assert_eq!(board.end_drag(&snap, &config), Some(id));
        assert_eq!(board.drain_changes(), vec![BeatChange::Updated(id)]);
        assert!(!board.beat(id).unwrap().has_anchors());
    }

    #[test]
    fn test_reflow_skips_dragged_beat() {
        let (mut board, config) = board("seven-point");
        let snap = snapshot();
        let id = board.beats()[1].id;
        board.pin_to_outline(id, &snap);
        board.beat_mut(id).unwrap().anchors.from = Anchor::scene("scene-8");
        board.drain_changes();

        board.begin_drag(id, Handle::Top, 0.0, &snap, &config);
        let outcome = board.reflow(&snap, &config);
        assert_eq!(outcome, PassOutcome::Applied { updated: vec![], unresolved: vec![] });

        board.end_drag(&snap, &config);
        board.drain_changes();
        let outcome = board.reflow(&snap, &config);
        assert!(matches!(outcome, PassOutcome::Applied { .. }));
    }

    fn snapshot_with(collapse: &CollapseState) -> OutlineSnapshot {
        OutlineSnapshot::stack(&Outline::sample(), collapse, &RowMetrics::default())
    }

    fn assert_same_rect(a: PositionedBeat, b: PositionedBeat) {
        assert!((a.top - b.top).abs() < 0.01, "top {} != {}", a.top, b.top);
        assert!((a.height - b.height).abs() < 0.01, "height {} != {}", a.height, b.height);
    }

    #[test]
    fn test_committed_drag_survives_reflow_and_collapse_cycle() {
        let (mut board, config) = board("seven-point");
        assert!(!config.reanchor_on_drag);
        let open = snapshot();
        let metrics = content_metrics(&open).unwrap();
        let id = board.beats()[3].id;
        board.pin_to_outline(id, &open);
        board.reflow(&open, &config);

        board.begin_drag(id, Handle::Body, 0.0, &open, &config);
        board.drag_to(7.0, metrics.height);
        board.end_drag(&open, &config);
        assert!(!board.beat(id).unwrap().has_anchors());
        let committed = board.positions(&open, &config).unwrap()[3];

        board.reflow(&open, &config);
        assert_same_rect(board.positions(&open, &config).unwrap()[3], committed);

        let mut collapse = CollapseState::default();
        collapse.collapse("act-2");
        board.reflow(&snapshot_with(&collapse), &config);
        collapse.expand("act-2");
        let reopened = snapshot_with(&collapse);
        board.reflow(&reopened, &config);
        assert_same_rect(board.positions(&reopened, &config).unwrap()[3], committed);
    }

    #[test]
    fn test_reanchor_on_drag_commit_is_stable() {
        let (mut board, mut config) = board("seven-point");
        config.reanchor_on_drag = true;
        let open = snapshot();
        let metrics = content_metrics(&open).unwrap();
        let id = board.beats()[3].id;

        board.begin_drag(id, Handle::Body, 0.0, &open, &config);
        board.drag_to(7.0, metrics.height);
        board.end_drag(&open, &config);

        let beat = board.beat(id).unwrap();
        assert!(beat.anchors.from.act.is_some());
        assert!(beat.anchors.to.act.is_some());
        let committed = board.positions(&open, &config).unwrap()[3];

        assert_eq!(
            board.reflow(&open, &config),
            PassOutcome::Applied { updated: vec![], unresolved: vec![] }
        );

        let mut collapse = CollapseState::default();
        collapse.collapse("act-2");
        board.reflow(&snapshot_with(&collapse), &config);
        collapse.expand("act-2");
        let reopened = snapshot_with(&collapse);
        board.reflow(&reopened, &config);
        assert_same_rect(board.positions(&reopened, &config).unwrap()[3], committed);
    }

    #[test]
    fn test_short_beat_commit_stays_inside_act() {
        let (mut board, mut config) = board("seven-point");
        config.act_containment = true;
        let snap = snapshot();
        let metrics = content_metrics(&snap).unwrap();
        let act1 = snap.visible(NodeKind::Act, "act-1").unwrap();
        let act1_bottom = metrics.y_to_pct(act1.bottom());

        let id = board.beats()[0].id;
        board
            .beat_mut(id)
            .unwrap()
            .set_span(act1_bottom - 0.3, act1_bottom - 0.1, RESOLVED_MIN_SPAN);
        let start_from = board.beat(id).unwrap().pct_from;

        board.begin_drag(id, Handle::Bottom, 0.0, &snap, &config);
        board.drag_to(metrics.height, metrics.height);
        board.end_drag(&snap, &config);

        let beat = board.beat(id).unwrap();
        assert_eq!(beat.pct_from, start_from);
        assert!(beat.pct_to <= act1_bottom + 1e-9);
        assert!(beat.pct_to > beat.pct_from);
    }

    #[test]
    fn test_replace_normalizes_loaded_spans() {
        let (mut board, config) = board("seven-point");
        let mut inverted = Beat::new("Inverted", "#fff", 10.0, 20.0, "", 1.0);
        inverted.pct_from = 80.0;
        inverted.pct_to = 20.0;
        let mut overflowing = Beat::new("Overflowing", "#fff", 10.0, 20.0, "", 1.0);
        overflowing.pct_from = -5.0;
        overflowing.pct_to = 140.0;
        board.replace(vec![inverted, overflowing]);

        board.reflow(&snapshot(), &config);
        for beat in board.beats() {
            assert!(0.0 <= beat.pct_from, "{}", beat.label);
            assert!(beat.pct_from < beat.pct_to, "{}", beat.label);
            assert!(beat.pct_to <= 100.0, "{}", beat.label);
        }
        assert_eq!((board.beats()[1].pct_from, board.beats()[1].pct_to), (0.0, 100.0));
    }

    #[test]
    fn test_act_containment_bounds_drag() {
        let (mut board, mut config) = board("seven-point");
        config.act_containment = true;
        let snap = snapshot();
        let metrics = content_metrics(&snap).unwrap();
        let act1 = snap.visible(NodeKind::Act, "act-1").unwrap();
        let act1_bottom = metrics.y_to_pct(act1.bottom());

        // The hook (0-10%) sits inside act one.
        let id = board.beats()[0].id;
        assert!(board.beat(id).unwrap().pct_to < act1_bottom);
        board.begin_drag(id, Handle::Bottom, 0.0, &snap, &config);
        board.drag_to(10_000.0, metrics.height);
        board.end_drag(&snap, &config);
        assert!((board.beat(id).unwrap().pct_to - act1_bottom).abs() < 1e-6);
    }

    #[test]
    fn test_notes_and_delete() {
        let (mut board, _config) = board("seven-point");
        let id = board.beats()[4].id;
        assert!(board.set_notes(id, "Raise the stakes".into()));
        assert!(!board.set_notes(id, "Raise the stakes".into()));
        assert_eq!(board.beat(id).unwrap().notes, "Raise the stakes");

        assert!(board.delete(id));
        assert!(!board.delete(id));
        assert_eq!(
            board.drain_changes(),
            vec![BeatChange::Updated(id), BeatChange::Removed(id)]
        );
    }

    #[test]
    fn test_clear_anchors() {
        let (mut board, _config) = board("seven-point");
        let snap = snapshot();
        let id = board.beats()[0].id;
        board.pin_to_outline(id, &snap);
        assert!(board.beat(id).unwrap().has_anchors());
        board.clear_anchors(id);
        assert!(!board.beat(id).unwrap().has_anchors());
    }
}
