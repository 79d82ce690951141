//! Reading order for detected text regions.

use std::cmp::Ordering;

/// Regions whose top edges are closer than this many pixels share a line.
pub const ROW_HEIGHT: f64 = 20.0;

/// A recognized region: top-left corner and its text.
pub type Region = ((f64, f64), String);

/// Lay regions out as text: one output line per visual row, regions within a
/// row joined by a space from left to right, rows from top to bottom.
pub fn layout_text(mut regions: Vec<Region>) -> String {
    regions.sort_by(|((_, ay), _), ((_, by), _)| ay.partial_cmp(by).unwrap_or(Ordering::Equal));

    let mut rows: Vec<(f64, Vec<Region>)> = Vec::new();
    for region in regions {
        let y = (region.0).1;
        match rows.last_mut() {
            Some((top, row)) if y - *top < ROW_HEIGHT => row.push(region),
            _ => rows.push((y, vec![region])),
        }
    }

    rows.into_iter()
        .map(|(_, mut row)| {
            row.sort_by(|((ax, _), _), ((bx, _), _)| ax.partial_cmp(bx).unwrap_or(Ordering::Equal));
            row.into_iter()
                .map(|(_, text)| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
