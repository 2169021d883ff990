//! Formation slot layouts.
//!
//! A formation turns a probe count into that many goal points around a
//! center. Slot `i` goes to the `i`-th eligible probe in roster order.

use std::f64::consts::TAU;

use rubblerats_core::enums::FormationType;
use rubblerats_core::types::Point;

/// Compute `count` slots for `kind` around `center`, `spacing` apart.
pub fn slots(kind: FormationType, center: Point, spacing: f64, count: usize) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as f64;

    match kind {
        FormationType::Circle => {
            // Neighbors on the ring are roughly `spacing` apart.
            let radius = (spacing * n / TAU).max(spacing);
            (0..count)
                .map(|i| {
                    let angle = i as f64 * TAU / n;
                    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                })
                .collect()
        }
        FormationType::Square => {
            let cols = (n.sqrt().ceil() as usize).max(1);
            let rows = count.div_ceil(cols);
            let x0 = (cols - 1) as f64 / 2.0;
            let y0 = (rows - 1) as f64 / 2.0;
            (0..count)
                .map(|i| {
                    let col = (i % cols) as f64;
                    let row = (i / cols) as f64;
                    Point::new(center.x + (col - x0) * spacing, center.y + (row - y0) * spacing)
                })
                .collect()
        }
        FormationType::Line => {
            let x0 = (n - 1.0) / 2.0;
            (0..count)
                .map(|i| Point::new(center.x + (i as f64 - x0) * spacing, center.y))
                .collect()
        }
        FormationType::Wedge => {
            // Leader at the center, then alternating wings trailing in -x.
            (0..count)
                .map(|i| {
                    let rank = i.div_ceil(2) as f64;
                    let side = if i % 2 == 1 { -1.0 } else { 1.0 };
                    Point::new(center.x - rank * spacing, center.y + side * rank * spacing)
                })
                .collect()
        }
    }
}
