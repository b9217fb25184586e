// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides conversions between percentage positions on the
//! story timeline and pixel positions in the outline container, plus the
//! clamping rules every percentage write goes through.

/// Clamp `value` into `[lo, hi]`.
///
/// Unlike `f64::clamp` this tolerates `lo > hi`, in which case `hi` wins.
pub fn clamp_between(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Clamp a percentage to `[0, 100]`. NaN maps to 0.
pub fn clamp_pct(pct: f64) -> f64 {
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

/// Normalize a span so that `0 <= from < to <= 100` with at least
/// `min_span` between them. Valid spans are returned unchanged.
pub fn normalize_span(pct_from: f64, pct_to: f64, min_span: f64) -> (f64, f64) {
    let min_span = min_span.max(f64::EPSILON);
    let mut from = clamp_pct(pct_from);
    let mut to = clamp_pct(pct_to);
    if to - from < min_span {
        to = (from + min_span).min(100.0);
        if to - from < min_span {
            from = (to - min_span).max(0.0);
        }
    }
    (from, to)
}

/// Convert a pixel offset (relative to the content origin) to a percentage.
pub fn px_to_pct(offset_px: f32, content_height: f32) -> f64 {
    if content_height <= 0.0 {
        return 0.0;
    }
    clamp_pct(offset_px as f64 / content_height as f64 * 100.0)
}

/// Convert a percentage to a pixel offset from the content origin.
pub fn pct_to_px(pct: f64, content_height: f32) -> f32 {
    (pct / 100.0) as f32 * content_height
}

/// Parse a `#rrggbb` hex color into its components.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_px_roundtrip() {
        let height = 1080.0;
        let px = pct_to_px(37.5, height);
        let pct = px_to_pct(px, height);
        assert!((pct - 37.5).abs() < 0.0001);
    }

    #[test]
    fn test_px_to_pct_edges() {
        assert_eq!(px_to_pct(0.0, 500.0), 0.0);
        assert_eq!(px_to_pct(500.0, 500.0), 100.0);
        assert_eq!(px_to_pct(-20.0, 500.0), 0.0);
        assert_eq!(px_to_pct(900.0, 500.0), 100.0);
        assert_eq!(px_to_pct(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_clamp_between_inverted_bounds() {
        assert_eq!(clamp_between(5.0, 10.0, 2.0), 2.0);
        assert_eq!(clamp_between(5.0, 0.0, 10.0), 5.0);
    }

    #[test]
    fn test_normalize_span() {
        assert_eq!(normalize_span(10.0, 20.0, 1.0), (10.0, 20.0));
        assert_eq!(normalize_span(50.0, 50.0, 2.0), (50.0, 52.0));
        assert_eq!(normalize_span(99.5, 100.0, 2.0), (98.0, 100.0));
        assert_eq!(normalize_span(f64::NAN, 5.0, 1.0), (0.0, 5.0));
        let (from, to) = normalize_span(30.0, 10.0, 1.0);
        assert!(from < to);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#f97316"), Some([0xf9, 0x73, 0x16]));
        assert_eq!(parse_hex_color("f97316"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }
}
