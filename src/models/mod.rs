// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: beats, outline, templates and projects.

pub mod beat;
pub mod outline;
pub mod project;
pub mod template;
