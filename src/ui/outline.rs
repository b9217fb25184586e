// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Collapsible outline panel.
//!
//! Renders Acts → Sequences → Scenes → Shots and measures every rendered
//! node into an [`OutlineSnapshot`]. Children of collapsed nodes are not
//! rendered, so they never appear in the snapshot.

use crate::models::outline::{CollapseState, NodeKind, Outline};
use crate::timeline::snapshot::{ElementRect, OutlineSnapshot};

/// Result of outline interaction.
pub enum OutlineAction {
    None,
    RemoveScene(String),
}

const INDENT: f32 = 14.0;

/// Display the outline and measure it relative to `origin_y`.
pub fn show(
    ui: &mut egui::Ui,
    outline: &Outline,
    collapse: &mut CollapseState,
    origin_y: f32,
) -> (OutlineSnapshot, OutlineAction) {
    let mut snapshot = OutlineSnapshot::new();
    let mut action = OutlineAction::None;
    let local = |rect: egui::Rect| ElementRect::new(rect.top() - origin_y, rect.height(), rect.width());

    if outline.acts.is_empty() {
        ui.label(egui::RichText::new("The outline is empty").weak());
        return (snapshot, action);
    }

    for act in &outline.acts {
        let act_response = ui.vertical(|ui| {
            let header = header_row(ui, 0.0, &act.title, collapse.is_collapsed(&act.id), true);
            snapshot.record_act_header(&act.id, local(header.rect));
            if header.clicked() {
                collapse.toggle(&act.id);
            }
            if collapse.is_collapsed(&act.id) {
                return;
            }

            for seq in &act.sequences {
                let seq_response = ui.vertical(|ui| {
                    let header = header_row(ui, INDENT, &seq.title, collapse.is_collapsed(&seq.id), false);
                    if header.clicked() {
                        collapse.toggle(&seq.id);
                    }
                    if collapse.is_collapsed(&seq.id) {
                        return;
                    }

                    for scene in &seq.scenes {
                        let scene_response = ui.vertical(|ui| {
                            let header = header_row(
                                ui,
                                INDENT * 2.0,
                                &scene.title,
                                collapse.is_collapsed(&scene.id),
                                false,
                            );
                            if header.clicked() {
                                collapse.toggle(&scene.id);
                            }
                            header.context_menu(|ui| {
                                if ui.button("Delete scene").clicked() {
                                    action = OutlineAction::RemoveScene(scene.id.clone());
                                    ui.close_menu();
                                }
                            });
                            if collapse.is_collapsed(&scene.id) {
                                return;
                            }

                            for shot in &scene.shots {
                                let row = ui.horizontal(|ui| {
                                    ui.add_space(INDENT * 3.0);
                                    ui.label(egui::RichText::new(&shot.title).small());
                                });
                                snapshot.record(NodeKind::Shot, &shot.id, &act.id, local(row.response.rect));
                            }
                        });
                        snapshot.record(NodeKind::Scene, &scene.id, &act.id, local(scene_response.response.rect));
                    }
                });
                snapshot.record(NodeKind::Sequence, &seq.id, &act.id, local(seq_response.response.rect));
            }
        });
        snapshot.record(NodeKind::Act, &act.id, &act.id, local(act_response.response.rect));
        ui.add_space(6.0);
    }

    (snapshot, action)
}

/// A clickable header row with a disclosure arrow.
fn header_row(ui: &mut egui::Ui, indent: f32, title: &str, collapsed: bool, strong: bool) -> egui::Response {
    let arrow = if collapsed { "▶" } else { "▼" };
    let mut text = egui::RichText::new(format!("{arrow} {title}"));
    if strong {
        text = text.strong();
    }
    ui.horizontal(|ui| {
        ui.add_space(indent);
        ui.add(egui::Label::new(text).sense(egui::Sense::click()))
    })
    .inner
}
