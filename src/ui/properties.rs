// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Beat properties panel.
//!
//! This module provides the properties panel for browsing beats and
//! editing the selected beat's notes and outline anchors.

use crate::models::beat::{Anchor, Beat};
use uuid::Uuid;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    SelectBeat(Uuid),
    DeleteBeat(Uuid),
    /// Notes editing started; lets the app snapshot history once per edit.
    NotesFocused(Uuid),
    NotesChanged(Uuid, String),
    PinToOutline(Uuid),
    ClearAnchors(Uuid),
}

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, beats: &[Beat], selected: Option<Uuid>) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Beats");
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("beat_list")
        .max_height(240.0)
        .show(ui, |ui| {
            for beat in beats {
                let text = format!("{}  {:.1}–{:.1}%", beat.label, beat.pct_from, beat.pct_to);
                if ui.selectable_label(selected == Some(beat.id), text).clicked() {
                    action = PropertiesAction::SelectBeat(beat.id);
                }
            }
            if beats.is_empty() {
                ui.label(egui::RichText::new("No beats. Pick a template.").weak());
            }
        });

    ui.separator();

    let Some(beat) = selected.and_then(|id| beats.iter().find(|b| b.id == id)) else {
        ui.label(egui::RichText::new("Select a beat to edit it").italics().weak());
        return action;
    };

    ui.heading(&beat.label);
    egui::Grid::new("beat_properties").num_columns(2).show(ui, |ui| {
        ui.label("Template");
        ui.label(if beat.template_abbr.is_empty() { "-" } else { beat.template_abbr.as_str() });
        ui.end_row();
        ui.label("Span");
        ui.label(format!("{:.2}% – {:.2}%", beat.pct_from, beat.pct_to));
        ui.end_row();
        ui.label("From");
        ui.label(describe_anchor(&beat.anchors.from));
        ui.end_row();
        ui.label("To");
        ui.label(describe_anchor(&beat.anchors.to));
        ui.end_row();
    });

    ui.add_space(6.0);
    ui.label("Notes");
    let mut notes = beat.notes.clone();
    let response = ui.add(
        egui::TextEdit::multiline(&mut notes)
            .desired_rows(6)
            .desired_width(f32::INFINITY),
    );
    if response.gained_focus() {
        action = PropertiesAction::NotesFocused(beat.id);
    }
    if response.changed() {
        action = PropertiesAction::NotesChanged(beat.id, notes);
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        if ui.button("📌 Pin to outline").clicked() {
            action = PropertiesAction::PinToOutline(beat.id);
        }
        if ui
            .add_enabled(beat.has_anchors(), egui::Button::new("Clear anchors"))
            .clicked()
        {
            action = PropertiesAction::ClearAnchors(beat.id);
        }
    });
    if ui.button("🗑 Delete beat").clicked() {
        action = PropertiesAction::DeleteBeat(beat.id);
    }

    action
}

/// Short human-readable summary of an anchor, most specific level first.
fn describe_anchor(anchor: &Anchor) -> String {
    match anchor.candidates().next() {
        Some((kind, id)) => format!("{} {}", kind.label(), id),
        None => "unanchored".to_string(),
    }
}
