// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The beat column drawn beside the outline.
//!
//! Beats are painted at the pixel rects computed by the geometry resolver.
//! Pointer positions are reported relative to the column top, which is
//! also the top of the outline container.

use crate::models::beat::Beat;
use crate::timeline::geometry::PositionedBeat;
use crate::timeline::interaction::Handle;
use crate::ui::{beat_card, hook_bar};
use uuid::Uuid;

pub const COLUMN_WIDTH: f32 = 180.0;

/// Result of beat column interaction.
pub enum ColumnAction {
    None,
    Select(Uuid),
    StartDrag(Uuid, Handle, f32),
    Drag(f32),
    StopDrag,
    /// Click on empty column space, container-relative y.
    JumpHook(f32),
}

/// State the column needs from the app to render.
pub struct ColumnView<'a> {
    pub beats: &'a [Beat],
    pub positions: &'a [PositionedBeat],
    pub selected: Option<Uuid>,
    pub dragging: Option<Uuid>,
    pub hook_label: &'a str,
}

/// Display the beat column inside `column` and handle its interactions.
pub fn show(ui: &mut egui::Ui, column: egui::Rect, view: &ColumnView<'_>) -> ColumnAction {
    let mut action = ColumnAction::None;

    let background = ui.interact(column, ui.id().with("beat_column"), egui::Sense::click());
    ui.painter().rect_filled(column, 4.0, egui::Color32::from_gray(28));

    let card_rect = |pos: &PositionedBeat| {
        egui::Rect::from_min_size(
            egui::pos2(column.left() + 4.0, column.top() + pos.top),
            egui::vec2(column.width() - 8.0, pos.height),
        )
    };

    for (beat, pos) in view.beats.iter().zip(view.positions) {
        let rect = card_rect(pos);
        let event = beat_card::show(
            ui,
            beat,
            rect,
            view.selected == Some(beat.id),
            view.dragging == Some(beat.id),
        );
        let to_local = |y: f32| y - column.top();
        match event {
            beat_card::CardEvent::Clicked => action = ColumnAction::Select(beat.id),
            beat_card::CardEvent::DragStarted(handle, y) => {
                action = ColumnAction::StartDrag(beat.id, handle, to_local(y));
            }
            beat_card::CardEvent::Dragged(y) => action = ColumnAction::Drag(to_local(y)),
            beat_card::CardEvent::DragStopped => action = ColumnAction::StopDrag,
            beat_card::CardEvent::None => {}
        }
    }

    if let Some((beat, pos)) = view
        .beats
        .iter()
        .zip(view.positions)
        .find(|(b, _)| b.label.eq_ignore_ascii_case(view.hook_label))
    {
        hook_bar::show(
            ui.painter(),
            column,
            pos.top + pos.height / 2.0,
            beat_card::beat_color(beat),
        );
    }

    if background.clicked() {
        if let Some(pointer) = background.interact_pointer_pos() {
            let on_card = view.positions.iter().any(|p| card_rect(p).contains(pointer));
            if !on_card {
                action = ColumnAction::JumpHook(pointer.y - column.top());
            }
        }
    }

    action
}
