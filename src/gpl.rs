//! GIMP `.gpl` palette files.
//!
//! The format is line-oriented text: a `GIMP Palette` magic line,
//! optional `Name:` and `Columns:` headers, `#` comment lines, then one
//! entry per line as three 0-255 components followed by the entry name.

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::color::Color;
use crate::store::PaletteEntry;

const MAGIC: &str = "GIMP Palette";

/// A palette as loaded from disk: entries plus display metadata.
/// `columns` is a layout hint (0 means "no preference") and is capped at
/// 256 as the original loader does.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteFile {
    pub name: String,
    pub columns: usize,
    pub entries: Vec<PaletteEntry>,
}

pub fn load(path: &Path) -> Result<PaletteFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read palette file: {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid palette file: {}", path.display()))
}

pub fn save(path: &Path, palette: &PaletteFile) -> Result<()> {
    std::fs::write(path, serialize(palette))
        .with_context(|| format!("failed to write palette file: {}", path.display()))?;
    Ok(())
}

pub fn parse(text: &str) -> Result<PaletteFile> {
    let mut lines = text.lines().enumerate();
    let magic = lines.next().map(|(_, line)| line.trim_end()).unwrap_or("");
    if magic != MAGIC {
        bail!("missing magic header {MAGIC:?}");
    }

    let mut name = String::new();
    let mut columns = 0;
    let mut entries = Vec::new();

    for (index, line) in lines {
        let line = line.trim_end();
        if let Some(rest) = line.strip_prefix("Name:") {
            name = rest.trim().to_string();
            continue;
        }
        if let Some(rest) = line.strip_prefix("Columns:") {
            // Out-of-range or unparseable column counts fall back to the
            // "no preference" default rather than failing the load.
            columns = match rest.trim().parse::<i64>() {
                Ok(c) if (0..=256).contains(&c) => c as usize,
                _ => 0,
            };
            continue;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        entries.push(parse_entry(line, index + 1)?);
    }

    Ok(PaletteFile {
        name,
        columns,
        entries,
    })
}

/// Parse one `R G B<whitespace>name` line. Components are clamped to
/// 0-255; the name keeps its interior whitespace and defaults to
/// `Untitled` when absent.
fn parse_entry(line: &str, linenum: usize) -> Result<PaletteEntry> {
    let mut rest = line;
    let mut components = [0u8; 3];
    for component in &mut components {
        rest = rest.trim_start();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        let value: i64 = token
            .parse()
            .with_context(|| format!("bad color component {token:?} on line {linenum}"))?;
        *component = value.clamp(0, 255) as u8;
        rest = tail;
    }

    let name = rest.trim();
    let name = if name.is_empty() { "Untitled" } else { name };
    Ok(PaletteEntry::new(
        name,
        Color::rgb(components[0], components[1], components[2]),
    ))
}

pub fn serialize(palette: &PaletteFile) -> String {
    let mut out = String::new();
    out.push_str(MAGIC);
    out.push('\n');
    if !palette.name.is_empty() {
        out.push_str(&format!("Name: {}\n", palette.name));
    }
    if palette.columns > 0 {
        out.push_str(&format!("Columns: {}\n", palette.columns));
    }
    out.push_str("#\n");
    for entry in &palette.entries {
        let c = entry.color;
        out.push_str(&format!("{:3} {:3} {:3}\t{}\n", c.r, c.g, c.b, entry.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "GIMP Palette\n\
                          Name: Bears\n\
                          Columns: 4\n\
                          # a comment\n\
                          \n\
                            8   8   8\tcarbon\n\
                          255 255 255\ttitanium white\n\
                          120  60  20 bear brown\n";

    #[test]
    fn parses_headers_and_entries() {
        let palette = parse(SAMPLE).unwrap();
        assert_eq!(palette.name, "Bears");
        assert_eq!(palette.columns, 4);
        assert_eq!(palette.entries.len(), 3);
        assert_eq!(palette.entries[0].name, "carbon");
        assert_eq!(palette.entries[0].color, Color::rgb(8, 8, 8));
    }

    #[test]
    fn entry_names_keep_interior_spaces() {
        let palette = parse(SAMPLE).unwrap();
        assert_eq!(palette.entries[1].name, "titanium white");
        assert_eq!(palette.entries[2].name, "bear brown");
    }

    #[test]
    fn missing_magic_fails() {
        let err = parse("Name: nope\n0 0 0\tblack\n").unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn headers_are_optional() {
        let palette = parse("GIMP Palette\n0 0 0\tblack\n").unwrap();
        assert_eq!(palette.name, "");
        assert_eq!(palette.columns, 0);
        assert_eq!(palette.entries.len(), 1);
    }

    #[test]
    fn out_of_range_columns_fall_back_to_zero() {
        let palette = parse("GIMP Palette\nColumns: 512\n0 0 0\tblack\n").unwrap();
        assert_eq!(palette.columns, 0);
        let palette = parse("GIMP Palette\nColumns: -2\n0 0 0\tblack\n").unwrap();
        assert_eq!(palette.columns, 0);
    }

    #[test]
    fn components_are_clamped() {
        let palette = parse("GIMP Palette\n300 -5 128\thot\n").unwrap();
        assert_eq!(palette.entries[0].color, Color::rgb(255, 0, 128));
    }

    #[test]
    fn nameless_entry_gets_default_name() {
        let palette = parse("GIMP Palette\n1 2 3\n").unwrap();
        assert_eq!(palette.entries[0].name, "Untitled");
    }

    #[test]
    fn non_numeric_component_fails_with_line_number() {
        let err = parse("GIMP Palette\n0 0 zero\tblack\n").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 2"), "unexpected error: {msg}");
    }

    #[test]
    fn serialize_round_trips() {
        let palette = parse(SAMPLE).unwrap();
        let reparsed = parse(&serialize(&palette)).unwrap();
        assert_eq!(reparsed, palette);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load(Path::new("/nonexistent/bears.gpl")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }
}
