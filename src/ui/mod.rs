// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the beat timeline application.

pub mod beat_card;
pub mod beat_column;
pub mod hook_bar;
pub mod outline;
pub mod properties;
pub mod toolbar;
