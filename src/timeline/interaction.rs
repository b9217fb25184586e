// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer-driven beat resizing and moving.
//!
//! One drag may be active at a time. Pointer movement is turned into a
//! percentage delta against the container height and applied to the
//! values captured when the drag began, so the result only depends on
//! the latest pointer position.

use crate::models::beat::Beat;
use crate::util::geometry::{clamp_between, clamp_pct};
use uuid::Uuid;

/// Which part of a beat card is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Top,
    Bottom,
    /// The card body: moves the whole span.
    Body,
}

/// Legal percentage range for a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for DragBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

/// State of the drag currently in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub beat_id: Uuid,
    pub handle: Handle,
    pub start_y: f32,
    pub start_from: f64,
    pub start_to: f64,
    pub bounds: DragBounds,
    pub pct_from: f64,
    pub pct_to: f64,
}

/// Final values of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCommit {
    pub beat_id: Uuid,
    pub handle: Handle,
    pub pct_from: f64,
    pub pct_to: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Active(ActiveDrag),
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    min_span: f64,
}

impl DragController {
    pub fn new(min_span: f64) -> Self {
        Self {
            state: DragState::Idle,
            min_span,
        }
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match &self.state {
            DragState::Active(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// Start dragging a handle of `beat`. Rejected while another drag is active.
    pub fn begin(&mut self, beat: &Beat, handle: Handle, start_y: f32, bounds: DragBounds) -> bool {
        if self.is_active() {
            log::debug!("Ignoring drag start on '{}', a drag is already active", beat.label);
            return false;
        }
        self.state = DragState::Active(ActiveDrag {
            beat_id: beat.id,
            handle,
            start_y,
            start_from: beat.pct_from,
            start_to: beat.pct_to,
            bounds,
            pct_from: beat.pct_from,
            pct_to: beat.pct_to,
        });
        true
    }

    /// Apply a pointer move. Returns the beat and its new span.
    pub fn update(&mut self, current_y: f32, container_height: f32) -> Option<(Uuid, f64, f64)> {
        let min_span = self.min_span;
        let DragState::Active(drag) = &mut self.state else {
            return None;
        };
        if container_height <= 0.0 {
            return None;
        }

        let delta = ((current_y - drag.start_y) / container_height * 100.0) as f64;
        // Bounds win over the minimum span for beats already shorter than it.
        let DragBounds { min, max } = drag.bounds;
        let (from, to) = match drag.handle {
            Handle::Top => (
                clamp_between(drag.start_from + delta, min, (drag.start_to - min_span).max(min)),
                drag.start_to,
            ),
            Handle::Bottom => (
                drag.start_from,
                clamp_between(drag.start_to + delta, (drag.start_from + min_span).min(max), max),
            ),
            Handle::Body => {
                let span = drag.start_to - drag.start_from;
                let from = clamp_between(drag.start_from + delta, min, max - span);
                (from, from + span)
            }
        };

        drag.pct_from = clamp_pct(from);
        drag.pct_to = clamp_pct(to);
        Some((drag.beat_id, drag.pct_from, drag.pct_to))
    }

    /// End the drag, committing the last computed values.
    pub fn finish(&mut self) -> Option<DragCommit> {
        match std::mem::take(&mut self.state) {
            DragState::Active(drag) => Some(DragCommit {
                beat_id: drag.beat_id,
                handle: drag.handle,
                pct_from: drag.pct_from,
                pct_to: drag.pct_to,
            }),
            DragState::Idle => None,
        }
    }
}

/// Span of a fixed-width beat centered at `click_pct`, shifted to stay
/// inside [0, 100].
pub fn centered_span(click_pct: f64, span: f64) -> (f64, f64) {
    let span = span.clamp(0.0, 100.0);
    let from = clamp_between(clamp_pct(click_pct) - span / 2.0, 0.0, 100.0 - span);
    (from, from + span)
}
