// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project bundles the outline the beats are laid over, the beats
//! themselves and the template they were generated from.

use super::{beat::Beat, outline::Outline, template::DEFAULT_TEMPLATE_ID};
use serde::{Deserialize, Serialize};

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub name: String,
    #[serde(default = "default_template_id")]
    pub template_id: String,
    #[serde(default)]
    pub outline: Outline,
    #[serde(default)]
    pub beats: Vec<Beat>,
}

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

impl ProjectData {
    /// Create an empty project over the given outline.
    pub fn new(name: String, outline: Outline) -> Self {
        Self {
            name,
            template_id: default_template_id(),
            outline,
            beats: Vec::new(),
        }
    }
}
