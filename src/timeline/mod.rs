// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Beat timeline engine.
//!
//! Positions beats over a measured outline and keeps them aligned as the
//! outline reflows. Nothing in here depends on the UI toolkit.

pub mod board;
pub mod geometry;
pub mod interaction;
pub mod reflow;
pub mod snapshot;
