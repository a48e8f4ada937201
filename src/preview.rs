//! Colored terminal preview of a palette.

use crossterm::style::{Color as TermColor, Stylize};

use crate::color::Color;
use crate::store::PaletteEntry;

const DEFAULT_COLUMNS: usize = 16;

/// Choose black or white text for readable labels on the given swatch.
fn contrast_fg(c: Color) -> TermColor {
    if c.relative_luminance() > 0.4 {
        TermColor::Black
    } else {
        TermColor::White
    }
}

/// Print a palette as a grid of labeled swatches, `columns` per row.
/// A column hint of 0 means "no preference" and falls back to 16.
pub fn print_swatches(entries: &[PaletteEntry], columns: usize) {
    let columns = if columns == 0 { DEFAULT_COLUMNS } else { columns };
    for row in entries.chunks(columns) {
        for entry in row {
            let Color { r, g, b, .. } = entry.color;
            let cell = format!(" {} ", entry.color.to_hex());
            print!(
                "{}",
                cell.with(contrast_fg(entry.color))
                    .on(TermColor::Rgb { r, g, b })
            );
        }
        println!();
    }
}
