// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Beatline - story beat timeline
//!
//! A desktop tool for laying beat-sheet structures over a collapsible
//! screenplay outline. Beats stay aligned with the outline as acts,
//! sequences and scenes are collapsed, expanded, edited or resized.

mod app;
mod config;
mod io;
mod models;
mod timeline;
mod ui;
mod util;

use anyhow::Result;
use app::BeatlineApp;
use config::TimelineConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = TimelineConfig::load();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Beatline - Story Beat Timeline"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Beatline",
        options,
        Box::new(move |_cc| Ok(Box::new(BeatlineApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
