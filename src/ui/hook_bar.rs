// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker showing where the hook beat sits on the column.

/// Draw the hook marker at container-relative height `y` inside `column`.
pub fn show(painter: &egui::Painter, column: egui::Rect, y: f32, color: egui::Color32) {
    let y = column.top() + y;
    painter.line_segment(
        [egui::pos2(column.left(), y), egui::pos2(column.right(), y)],
        egui::Stroke::new(1.0, color.gamma_multiply(0.8)),
    );
    let tip = egui::pos2(column.left(), y);
    painter.add(egui::Shape::convex_polygon(
        vec![tip + egui::vec2(0.0, -5.0), tip + egui::vec2(7.0, 0.0), tip + egui::vec2(0.0, 5.0)],
        color,
        egui::Stroke::NONE,
    ));
}
