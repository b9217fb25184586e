// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! A single beat drawn at its computed rect, with resize handles.

use crate::models::beat::Beat;
use crate::timeline::interaction::Handle;
use crate::util::geometry::parse_hex_color;

const HANDLE_HEIGHT: f32 = 6.0;

/// Interaction reported by a beat card this frame.
pub enum CardEvent {
    None,
    Clicked,
    DragStarted(Handle, f32),
    Dragged(f32),
    DragStopped,
}

/// Resolve a beat's display color, falling back to gray.
pub fn beat_color(beat: &Beat) -> egui::Color32 {
    parse_hex_color(&beat.color)
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(egui::Color32::GRAY)
}

/// Draw a beat card and handle its pointer input.
pub fn show(ui: &mut egui::Ui, beat: &Beat, rect: egui::Rect, selected: bool, dragging: bool) -> CardEvent {
    let color = beat_color(beat);
    let painter = ui.painter_at(rect.expand(2.0));

    painter.rect_filled(rect, 4.0, color.gamma_multiply(0.35));
    painter.rect_filled(
        egui::Rect::from_min_size(rect.min, egui::vec2(4.0, rect.height())),
        2.0,
        color,
    );
    let stroke = if selected || dragging {
        egui::Stroke::new(2.0, egui::Color32::WHITE)
    } else {
        egui::Stroke::new(1.0, color)
    };
    painter.rect_stroke(rect, 4.0, stroke);

    if rect.height() >= 14.0 {
        let label = if beat.template_abbr.is_empty() {
            beat.label.clone()
        } else {
            format!("{} · {}", beat.label, beat.template_abbr)
        };
        painter.text(
            rect.min + egui::vec2(8.0, 2.0),
            egui::Align2::LEFT_TOP,
            label,
            egui::FontId::proportional(12.0),
            egui::Color32::from_gray(230),
        );
    }
    if rect.height() >= 34.0 && !beat.notes.is_empty() {
        let first_line = beat.notes.lines().next().unwrap_or_default();
        painter.text(
            rect.min + egui::vec2(8.0, 18.0),
            egui::Align2::LEFT_TOP,
            first_line,
            egui::FontId::proportional(10.0),
            egui::Color32::from_gray(170),
        );
    }

    // Handles are registered after the body so they take precedence.
    let body = ui.interact(rect, ui.id().with(("beat", beat.id)), egui::Sense::click_and_drag());
    let top_rect = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), HANDLE_HEIGHT));
    let bottom_rect = egui::Rect::from_min_size(
        egui::pos2(rect.left(), rect.bottom() - HANDLE_HEIGHT),
        egui::vec2(rect.width(), HANDLE_HEIGHT),
    );
    let top = ui
        .interact(top_rect, ui.id().with(("beat-top", beat.id)), egui::Sense::drag())
        .on_hover_cursor(egui::CursorIcon::ResizeVertical);
    let bottom = ui
        .interact(bottom_rect, ui.id().with(("beat-bottom", beat.id)), egui::Sense::drag())
        .on_hover_cursor(egui::CursorIcon::ResizeVertical);

    if selected {
        for handle in [top_rect, bottom_rect] {
            painter.rect_filled(handle.shrink2(egui::vec2(rect.width() * 0.35, 1.5)), 2.0, egui::Color32::WHITE);
        }
    }

    for (response, handle) in [(&top, Handle::Top), (&bottom, Handle::Bottom), (&body, Handle::Body)] {
        let pointer_y = response.interact_pointer_pos().map(|p| p.y);
        if response.drag_started() {
            if let Some(y) = pointer_y {
                return CardEvent::DragStarted(handle, y);
            }
        }
        if response.dragged() {
            if let Some(y) = pointer_y {
                return CardEvent::Dragged(y);
            }
        }
        if response.drag_stopped() {
            return CardEvent::DragStopped;
        }
    }

    if body.clicked() {
        return CardEvent::Clicked;
    }
    CardEvent::None
}
