//! horizontal bar meters, drawn at eighth-of-a-character resolution.
//!
//! the full blocks of a meter are tinted by their *position*: the first half of the meter is
//! green, the next quarter yellow, and the last quarter red, no matter the value being shown.
//! the partial block at the tip is tinted by the *value*, see [`Severity::classify`].

use {
    crate::severity::Severity,
    crossterm::{
        queue,
        style::{Print, ResetColor, SetForegroundColor},
    },
    std::io::{self, Write},
};

/// a horizontal meter, some number of character cells wide.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Meter {
    pub width: u16,
}

/// one character cell of a drawn meter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cell {
    pub glyph: char,
    /// the tier this cell is tinted as. `None` cells are drawn with the style reset.
    pub tint: Option<Severity>,
}

/// === impl Meter ===

impl Meter {
    /// each cell is divided into this many slices.
    pub const SUBDIVISIONS: u32 = 8;

    const FULL: char = '█';
    const BLANK: char = ' ';
    /// partial blocks, indexed by how many eighths are filled. the empty entry is never drawn.
    const PARTIAL: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

    pub const fn new(width: u16) -> Self {
        Self { width }
    }

    /// the number of slices in this meter.
    pub fn slices(&self) -> u32 {
        u32::from(self.width) * Self::SUBDIVISIONS
    }

    /// the number of slices a ratio fills, rounded to the nearest slice.
    pub fn quantize(&self, ratio: f64) -> u32 {
        assert!(
            (0.0..=1.0).contains(&ratio),
            "ratio {ratio} is outside of [0, 1]"
        );

        (ratio * self.slices() as f64).round() as u32
    }

    /// lays out the cells of a meter showing `ratio`.
    pub fn cells(&self, ratio: f64) -> Vec<Cell> {
        let filled = self.quantize(ratio);
        let (full, partial) = (filled / Self::SUBDIVISIONS, filled % Self::SUBDIVISIONS);

        let mut cells = Vec::with_capacity(usize::from(self.width));
        cells.extend((0..full).map(|index| Cell {
            glyph: Self::FULL,
            tint: Some(self.zone(index)),
        }));
        if partial != 0 {
            cells.push(Cell {
                glyph: Self::PARTIAL[partial as usize],
                tint: Some(Severity::classify(ratio)),
            });
        }
        cells.resize(
            usize::from(self.width),
            Cell {
                glyph: Self::BLANK,
                tint: None,
            },
        );

        cells
    }

    /// draws a meter showing `ratio`, leaving the style reset afterwards.
    pub fn draw(&self, ratio: f64, writer: &mut impl Write) -> io::Result<()> {
        let mut current = None;
        for Cell { glyph, tint } in self.cells(ratio) {
            if tint != current {
                match tint {
                    Some(tier) => queue!(writer, SetForegroundColor(tier.color()))?,
                    None => queue!(writer, ResetColor)?,
                }
                current = tint;
            }
            queue!(writer, Print(glyph))?;
        }

        queue!(writer, ResetColor)
    }

    /// the tier of the full block at `index`, by where it sits in the meter.
    fn zone(&self, index: u32) -> Severity {
        let slices = self.slices();
        let (half, quarter) = (slices / 2, slices / 4);
        let start = index * Self::SUBDIVISIONS;

        if start < half {
            Severity::Low
        } else if start < half + quarter {
            Severity::Elevated
        } else {
            Severity::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(cells: &[Cell]) -> String {
        cells.iter().map(|c| c.glyph).collect()
    }

    #[test]
    fn quantize_bounds() {
        let meter = Meter::new(4);
        assert_eq!(meter.quantize(0.0), 0);
        assert_eq!(meter.quantize(1.0), 32);
    }

    #[test]
    fn quantize_is_monotonic() {
        for width in [1, 3, 4, 16] {
            let meter = Meter::new(width);
            let mut last = 0;
            for step in 0..=997 {
                let slices = meter.quantize(step as f64 / 997.0);
                assert!(slices >= last);
                last = slices;
            }
        }
    }

    #[test]
    fn empty() {
        let cells = Meter::new(4).cells(0.0);
        assert_eq!(glyphs(&cells), "    ");
        assert!(cells.iter().all(|c| c.tint.is_none()));
    }

    #[test]
    fn full() {
        let cells = Meter::new(4).cells(1.0);
        assert_eq!(glyphs(&cells), "████");
    }

    #[test]
    fn half() {
        let cells = Meter::new(4).cells(0.5);
        assert_eq!(glyphs(&cells), "██  ");
        assert_eq!(cells[1].tint, Some(Severity::Low));
        assert_eq!(cells[2].tint, None);
    }

    #[test]
    fn partial_tip() {
        // 0.3 * 32 = 9.6, which rounds to 10 slices: one full block and a quarter.
        let cells = Meter::new(4).cells(0.3);
        assert_eq!(glyphs(&cells), "█▎  ");
        assert_eq!(cells[1].tint, Some(Severity::Low));
    }

    /// the tip is tinted by the value, not by where it sits.
    #[test]
    fn tip_tint_follows_value() {
        // 0.8 * 8 = 6.4, which rounds to 6 slices of the only cell.
        let cells = Meter::new(1).cells(0.8);
        assert_eq!(
            cells,
            [Cell {
                glyph: '▊',
                tint: Some(Severity::High)
            }]
        );
    }

    #[test]
    fn zones_follow_position() {
        let cells = Meter::new(8).cells(1.0);
        let tints = cells.iter().map(|c| c.tint.unwrap()).collect::<Vec<_>>();
        assert_eq!(
            tints,
            [
                Severity::Low,
                Severity::Low,
                Severity::Low,
                Severity::Low,
                Severity::Elevated,
                Severity::Elevated,
                Severity::High,
                Severity::High,
            ]
        );
    }

    #[test]
    fn odd_width_zones() {
        let cells = Meter::new(3).cells(1.0);
        let tints = cells.iter().map(|c| c.tint.unwrap()).collect::<Vec<_>>();
        assert_eq!(tints, [Severity::Low, Severity::Low, Severity::Elevated]);
    }

    #[test]
    fn draw_resets_style() {
        let mut out = Vec::new();
        Meter::new(4).draw(0.3, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("█"));
        assert!(out.contains("▎"));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn draw_full_never_resets_midway() {
        let mut out = Vec::new();
        Meter::new(2).draw(1.0, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("\x1b[0m").count(), 1);
    }

    #[test]
    #[should_panic]
    fn out_of_range() {
        Meter::new(4).cells(1.5);
    }
}
