// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and template selection UI.
//!
//! This module provides the toolbar for picking a beat template and
//! applying it to the timeline.

use crate::models::template::list_templates;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    ApplyTemplate(String),
}

/// Display the toolbar with the template picker.
pub fn show(ui: &mut egui::Ui, template_id: &mut String, beat_count: usize) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let templates = list_templates();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Template:");

        let selected_label = templates
            .iter()
            .find(|t| t.id == template_id.as_str())
            .map_or("Choose…", |t| t.label);
        egui::ComboBox::from_id_source("template_picker")
            .selected_text(selected_label)
            .show_ui(ui, |ui| {
                for t in &templates {
                    ui.selectable_value(template_id, t.id.to_string(), format!("{} ({})", t.label, t.abbreviation))
                        .on_hover_text(t.description);
                }
            });

        if ui
            .button("Apply")
            .on_hover_text("Replace all beats with the selected template")
            .clicked()
        {
            action = ToolbarAction::ApplyTemplate(template_id.clone());
        }

        ui.separator();

        ui.label(
            egui::RichText::new(format!(
                "{} beats · click the column to place the hook, drag edges to resize",
                beat_count
            ))
            .italics()
            .weak(),
        );
    });

    action
}
