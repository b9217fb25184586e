// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It hosts the outline, measures it every frame,
//! and drives the timeline engine: reflow scheduling, beat drags, hook
//! placement and persistence of every committed beat change.

use crate::config::TimelineConfig;
use crate::models::{
    beat::Beat,
    outline::{CollapseState, Outline},
    project::ProjectData,
    template::list_templates,
};
use crate::timeline::{
    board::{BeatBoard, BeatChange},
    geometry::{content_metrics, PassOutcome},
    reflow::{LayoutObserver, ReflowSynchronizer},
    snapshot::OutlineSnapshot,
};
use crate::ui::{beat_column, outline, properties, toolbar};
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// History system for undo/redo functionality.
struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Vec<Beat>>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Vec<Beat>>,
    /// Maximum history size
    max_size: usize,
}

impl History {
    fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: 50, // Keep last 50 states
        }
    }

    /// Save current state before making a change
    fn push(&mut self, beats: Vec<Beat>) {
        self.undo_stack.push(beats);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // New action invalidates the redo chain
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    fn undo(&mut self, current: Vec<Beat>) -> Option<Vec<Beat>> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    fn redo(&mut self, current: Vec<Beat>) -> Option<Vec<Beat>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Main application state.
pub struct BeatlineApp {
    config: TimelineConfig,

    /// Project name shown in the window
    project_name: String,

    /// File the project was loaded from or last saved to
    project_path: Option<PathBuf>,

    /// Outline the beats are laid over
    outline: Outline,

    /// Which outline nodes are collapsed
    collapse: CollapseState,

    /// Beats and their interactions
    board: BeatBoard,

    /// Template selected in the toolbar
    template_id: String,

    selected_beat: Option<Uuid>,

    history: History,

    synchronizer: ReflowSynchronizer,
    observer: LayoutObserver,

    /// Outline layout measured during the last frame
    snapshot: OutlineSnapshot,

    /// Unsaved beat or outline changes
    dirty: bool,

    /// When the pending autosave fires
    autosave_at: Option<Instant>,
}

impl BeatlineApp {
    /// Create a new application instance over the sample outline.
    pub fn new(config: TimelineConfig) -> Self {
        let mut board = BeatBoard::new(Vec::new(), &config);
        let template_id = board.apply_template(&config.default_template, &config).to_string();
        board.drain_changes();

        let synchronizer =
            ReflowSynchronizer::new(config.mutation_debounce(), config.startup_retries());

        Self {
            project_name: "Untitled".to_string(),
            project_path: None,
            outline: Outline::sample(),
            collapse: CollapseState::default(),
            board,
            template_id,
            selected_beat: None,
            history: History::new(),
            synchronizer,
            observer: LayoutObserver::default(),
            snapshot: OutlineSnapshot::new(),
            dirty: false,
            autosave_at: None,
            config,
        }
    }

    /// Save beats to history before making a change
    fn save_to_history(&mut self) {
        self.history.push(self.board.beats().to_vec());
    }

    fn project_data(&self) -> ProjectData {
        ProjectData {
            name: self.project_name.clone(),
            template_id: self.template_id.clone(),
            outline: self.outline.clone(),
            beats: self.board.beats().to_vec(),
        }
    }

    /// Replace the whole session with a loaded project.
    fn load_project(&mut self, data: ProjectData, path: Option<PathBuf>) {
        log::info!("Loaded project '{}' with {} beats", data.name, data.beats.len());
        self.project_name = data.name;
        self.template_id = data.template_id;
        self.outline = data.outline;
        self.collapse = CollapseState::default();
        self.board.replace(data.beats);
        self.board.drain_changes();
        self.project_path = path;
        self.selected_beat = None;
        self.history.clear();
        self.dirty = false;
        self.autosave_at = None;

        // The outline was swapped out from under the timeline; start over.
        self.synchronizer.unmount();
        self.observer = LayoutObserver::default();
    }

    fn new_project(&mut self) {
        let mut data = ProjectData::new("Untitled".to_string(), Outline::sample());
        data.template_id = self.config.default_template.clone();
        data.beats = crate::models::template::instantiate(
            &data.template_id,
            self.config.template_min_span_pct,
            self.config.template_widen_pct,
        );
        self.load_project(data, None);
    }

    fn open_project(&mut self, path: PathBuf) {
        match crate::io::serialization::import(&path) {
            Ok(data) => self.load_project(data, Some(path)),
            Err(e) => log::error!("{:#}", e),
        }
    }

    /// Write the project to `path` and remember it for later saves.
    fn save_project(&mut self, path: PathBuf) {
        match crate::io::serialization::export(&self.project_data(), &path) {
            Ok(()) => {
                log::info!("Saved project to {}", path.display());
                self.project_path = Some(path);
                self.dirty = false;
                self.autosave_at = None;
            }
            Err(e) => log::error!("{:#}", e),
        }
    }

    fn apply_template(&mut self, template_id: &str) {
        self.save_to_history();
        self.template_id = self.board.apply_template(template_id, &self.config).to_string();
        self.selected_beat = None;
    }

    fn delete_beat(&mut self, id: Uuid) {
        if self.board.beat(id).is_none() {
            return;
        }
        self.save_to_history();
        if self.board.delete(id) {
            if self.selected_beat == Some(id) {
                self.selected_beat = None;
            }
            log::info!("Deleted beat, total: {}", self.board.beats().len());
        }
    }

    fn undo(&mut self) {
        let current = self.board.beats().to_vec();
        if let Some(previous) = self.history.undo(current) {
            self.board.replace(previous);
            self.selected_beat = None;
            log::info!("Undo");
        }
    }

    fn redo(&mut self) {
        let current = self.board.beats().to_vec();
        if let Some(next) = self.history.redo(current) {
            self.board.replace(next);
            self.selected_beat = None;
            log::info!("Redo");
        }
    }

    /// Forward committed beat changes to the persistence path.
    fn handle_changes(&mut self, now: Instant) {
        let changes = self.board.drain_changes();
        if changes.is_empty() {
            return;
        }
        for change in &changes {
            match change {
                BeatChange::Replaced => log::debug!("Beats replaced"),
                BeatChange::Added(id) => log::debug!("Beat {} added", id),
                BeatChange::Updated(id) => log::debug!("Beat {} updated", id),
                BeatChange::Removed(id) => log::debug!("Beat {} removed", id),
            }
        }
        self.mark_dirty(now);
    }

    fn mark_dirty(&mut self, now: Instant) {
        self.dirty = true;
        if self.project_path.is_some() {
            self.autosave_at = Some(now + self.config.autosave_debounce());
        }
    }

    fn run_autosave(&mut self, now: Instant) {
        if self.autosave_at.is_some_and(|t| now >= t) {
            if let Some(path) = self.project_path.clone() {
                log::info!("Autosaving");
                self.save_project(path);
            }
            self.autosave_at = None;
        }
    }

    /// Feed this frame's measurement to the synchronizer and run a pass if due.
    /// Returns true if any beat moved.
    fn sync_layout(&mut self, ctx: &egui::Context, now: Instant) -> bool {
        let window = ctx.screen_rect().size();
        for trigger in self.observer.observe(
            self.snapshot.signature(),
            self.snapshot.container,
            (window.x, window.y),
        ) {
            self.synchronizer.notify(trigger, now);
        }

        if !self.snapshot.is_empty() {
            self.synchronizer.mark_ready();
        }

        if !self.synchronizer.poll(now) {
            return false;
        }
        match self.board.reflow(&self.snapshot, &self.config) {
            PassOutcome::NotReady => {
                log::debug!("Reflow pass deferred, outline not ready");
                false
            }
            PassOutcome::Applied { updated, unresolved } => {
                if !updated.is_empty() || !unresolved.is_empty() {
                    log::debug!(
                        "Reflow pass: {} beats moved, {} unresolved",
                        updated.len(),
                        unresolved.len()
                    );
                }
                !updated.is_empty()
            }
        }
    }

    /// Render the beat column and the outline side by side.
    fn show_timeline(&mut self, ui: &mut egui::Ui) {
        let origin = ui.cursor().min;

        let outline_action = ui
            .horizontal_top(|ui| {
                ui.add_space(beat_column::COLUMN_WIDTH + 12.0);
                ui.vertical(|ui| {
                    let (snapshot, action) = outline::show(ui, &self.outline, &mut self.collapse, origin.y);
                    self.snapshot = snapshot;
                    action
                })
                .inner
            })
            .inner;

        let rendered = ui.min_rect();
        self.snapshot.container = (rendered.width(), rendered.bottom() - origin.y);

        if let outline::OutlineAction::RemoveScene(id) = outline_action {
            if self.outline.remove_scene(&id) {
                log::info!("Removed scene {}", id);
                self.mark_dirty(Instant::now());
            }
        }

        let (Some(metrics), Some(positions)) = (
            content_metrics(&self.snapshot),
            self.board.positions(&self.snapshot, &self.config),
        ) else {
            return;
        };

        let column = egui::Rect::from_min_size(
            origin,
            egui::vec2(beat_column::COLUMN_WIDTH, self.snapshot.container.1.max(metrics.bottom())),
        );
        let view = beat_column::ColumnView {
            beats: self.board.beats(),
            positions: &positions,
            selected: self.selected_beat,
            dragging: self.board.dragging(),
            hook_label: &self.config.hook_label,
        };

        match beat_column::show(ui, column, &view) {
            beat_column::ColumnAction::Select(id) => self.selected_beat = Some(id),
            beat_column::ColumnAction::StartDrag(id, handle, y) => {
                if self.board.dragging().is_none() {
                    self.save_to_history();
                }
                if self.board.begin_drag(id, handle, y, &self.snapshot, &self.config) {
                    self.selected_beat = Some(id);
                    log::debug!("Started {:?} drag", handle);
                }
            }
            beat_column::ColumnAction::Drag(y) => self.board.drag_to(y, metrics.height),
            beat_column::ColumnAction::StopDrag => {
                self.board.end_drag(&self.snapshot, &self.config);
            }
            beat_column::ColumnAction::JumpHook(y) => {
                self.save_to_history();
                let id = self.board.jump_hook(metrics.y_to_pct(y), &self.config);
                self.selected_beat = Some(id);
            }
            beat_column::ColumnAction::None => {}
        }
    }
}

impl eframe::App for BeatlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        if !self.synchronizer.is_mounted() {
            self.synchronizer.mount(now);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project").clicked() {
                        self.new_project();
                        ui.close_menu();
                    }
                    if ui.button("Open Project...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Projects", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.open_project(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    let save_label = if self.dirty { "Save *" } else { "Save" };
                    if ui
                        .add_enabled(self.project_path.is_some(), egui::Button::new(save_label))
                        .clicked()
                    {
                        if let Some(path) = self.project_path.clone() {
                            self.save_project(path);
                        }
                        ui.close_menu();
                    }
                    ui.menu_button("Save As", |ui| {
                        if ui.button("YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("beats.yaml")
                                .save_file()
                            {
                                self.save_project(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("beats.json")
                                .save_file()
                            {
                                self.save_project(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.history.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.history.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.redo();
                        ui.close_menu();
                    }

                    ui.separator();

                    let has_selection = self.selected_beat.is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        if let Some(id) = self.selected_beat {
                            self.delete_beat(id);
                        }
                        ui.close_menu();
                    }
                });

                ui.menu_button("Template", |ui| {
                    for t in list_templates() {
                        if ui.button(format!("{} ({})", t.label, t.abbreviation)).clicked() {
                            self.apply_template(t.id);
                            ui.close_menu();
                        }
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &mut self.template_id, self.board.beats().len()))
            .inner;
        if let toolbar::ToolbarAction::ApplyTemplate(id) = toolbar_action {
            self.apply_template(&id);
        }

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| properties::show(ui, self.board.beats(), self.selected_beat))
            .inner;

        match properties_action {
            properties::PropertiesAction::SelectBeat(id) => self.selected_beat = Some(id),
            properties::PropertiesAction::DeleteBeat(id) => self.delete_beat(id),
            properties::PropertiesAction::NotesFocused(_) => self.save_to_history(),
            properties::PropertiesAction::NotesChanged(id, notes) => {
                self.board.set_notes(id, notes);
            }
            properties::PropertiesAction::PinToOutline(id) => {
                self.save_to_history();
                self.board.pin_to_outline(id, &self.snapshot);
            }
            properties::PropertiesAction::ClearAnchors(id) => {
                self.save_to_history();
                self.board.clear_anchors(id);
            }
            properties::PropertiesAction::None => {}
        }

        // Handle keyboard events
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.selected_beat = None;
        }

        // Only process if no text field is focused (to avoid deleting while editing notes)
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
                if let Some(id) = self.selected_beat {
                    self.delete_beat(id);
                }
            }

            if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
                self.undo();
            }

            if ctx.input(|i| {
                (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (i.modifiers.command && i.key_pressed(egui::Key::Y))
            }) {
                self.redo();
            }
        }

        // Timeline (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_timeline(ui));
        });

        // A drag whose card vanished (e.g. outline emptied) still ends on release.
        if self.board.dragging().is_some() && !ctx.input(|i| i.pointer.any_down()) {
            self.board.end_drag(&self.snapshot, &self.config);
        }

        let moved = self.sync_layout(ctx, now);
        self.handle_changes(now);
        self.run_autosave(now);

        if moved || self.synchronizer.wants_frame() {
            ctx.request_repaint();
        } else if let Some(deadline) = [self.synchronizer.next_deadline(), self.autosave_at]
            .into_iter()
            .flatten()
            .min()
        {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beats(n: usize) -> Vec<Beat> {
        (0..n)
            .map(|i| Beat::new(format!("beat {i}"), "#ffffff", i as f64, i as f64 + 1.0, "", 1.0))
            .collect()
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::new();
        assert!(!history.can_undo());
        history.push(beats(1));
        assert!(history.can_undo());

        let restored = history.undo(beats(2)).unwrap();
        assert_eq!(restored.len(), 1);
        assert!(history.can_redo());

        let redone = history.redo(restored).unwrap();
        assert_eq!(redone.len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_push_clears_redo_and_caps() {
        let mut history = History::new();
        history.push(beats(1));
        history.undo(beats(2));
        history.push(beats(3));
        assert!(!history.can_redo());

        for _ in 0..60 {
            history.push(beats(1));
        }
        assert_eq!(history.undo_stack.len(), 50);
        history.clear();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_new_app_uses_default_template() {
        let app = BeatlineApp::new(TimelineConfig::default());
        assert_eq!(app.template_id, "save-the-cat");
        assert_eq!(app.board.beats().len(), 15);
        assert!(!app.dirty);
    }

    #[test]
    fn test_changes_mark_dirty_and_schedule_autosave() {
        let mut app = BeatlineApp::new(TimelineConfig::default());
        let now = Instant::now();
        app.apply_template("seven-point");
        app.handle_changes(now);
        assert!(app.dirty);
        assert!(app.autosave_at.is_none());

        app.project_path = Some(std::env::temp_dir().join("beatline-autosave-test.yaml"));
        app.board.jump_hook(30.0, &app.config);
        app.handle_changes(now);
        assert_eq!(app.autosave_at, Some(now + app.config.autosave_debounce()));
    }

    #[test]
    fn test_open_project_normalizes_bad_spans() {
        let mut inverted = Beat::new("Inverted", "#ffffff", 10.0, 20.0, "", 1.0);
        inverted.pct_from = 80.0;
        inverted.pct_to = 20.0;
        let mut overflowing = Beat::new("Overflowing", "#ffffff", 10.0, 20.0, "", 1.0);
        overflowing.pct_from = -5.0;
        overflowing.pct_to = 140.0;
        let mut data = ProjectData::new("Broken".to_string(), Outline::sample());
        data.beats = vec![inverted, overflowing];

        let path = std::env::temp_dir().join("beatline-bad-spans.json");
        crate::io::serialization::export(&data, &path).unwrap();
        let mut app = BeatlineApp::new(TimelineConfig::default());
        app.open_project(path.clone());
        std::fs::remove_file(&path).ok();

        assert_eq!(app.project_name, "Broken");
        assert_eq!(app.board.beats().len(), 2);
        for beat in app.board.beats() {
            assert!(0.0 <= beat.pct_from && beat.pct_from < beat.pct_to && beat.pct_to <= 100.0);
        }
    }

    #[test]
    fn test_undo_restores_template() {
        let mut app = BeatlineApp::new(TimelineConfig::default());
        app.apply_template("seven-point");
        assert_eq!(app.board.beats().len(), 7);
        app.undo();
        assert_eq!(app.board.beats().len(), 15);
        app.redo();
        assert_eq!(app.board.beats().len(), 7);
    }
}
