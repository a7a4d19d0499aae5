use std::fmt;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

type Cells = [[u8; WIDTH]; HEIGHT];
const EMPTY: Cells = [[0; WIDTH]; HEIGHT];

/// The monochrome 64x32 screen. Every cell is either 0 or 1,
/// and is only ever changed by clearing or by XOR-ing a sprite onto it.
#[derive(Clone, PartialEq, Eq)]
pub struct Display {
    cells: Cells,
}

impl Display {

    pub fn new() -> Display {
        Display { cells: EMPTY }
    }

    /// Turn every cell off.
    pub fn clear(&mut self) {
        self.cells = EMPTY;
    }

    /// The state of the cell at (`x`, `y`). Coordinates wrap around the edges.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y % HEIGHT][x % WIDTH]
    }

    /// XOR a sprite onto the screen with its top left corner at (`x`, `y`).
    ///
    /// Every byte of `sprite` is one row, most significant bit leftmost.
    /// Pixels that fall outside the screen wrap around to the opposite edge.
    /// Returns `true` if any lit cell was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let cell = &mut self.cells[(y + row) % HEIGHT][(x + col) % WIDTH];
                if *cell == 1 {
                    collision = true;
                }
                *cell ^= 1;
            }
        }
        collision
    }

    /// The rows of the screen, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[u8; WIDTH]> {
        self.cells.iter()
    }

    /// Number of lit cells.
    pub fn lit(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c == 1).count()
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for c in row.iter() {
                write!(f, "{}", if *c == 1 { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Display ({} lit)", self.lit())?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sprite_is_drawn_msb_first() {
        let mut display = Display::new();
        let collision = display.draw_sprite(0, 0, &[0b1000_0001]);
        assert!(!collision);
        assert_eq!(display.get(0, 0), 1);
        assert_eq!(display.get(1, 0), 0);
        assert_eq!(display.get(7, 0), 1);
        assert_eq!(display.lit(), 2);
    }

    #[test]
    fn drawing_twice_restores_the_screen() {
        let mut display = Display::new();
        let glyph = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!display.draw_sprite(10, 5, &glyph));
        assert!(display.draw_sprite(10, 5, &glyph));
        assert_eq!(display, Display::new());
    }

    #[test]
    fn partial_overlap_is_a_collision() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0b1100_0000]);
        assert!(display.draw_sprite(1, 0, &[0b1000_0000]));
        assert_eq!(display.get(0, 0), 1);
        assert_eq!(display.get(1, 0), 0);
    }

    #[test]
    fn sprites_wrap_around_both_edges() {
        let mut display = Display::new();
        display.draw_sprite(62, 31, &[0xF0, 0xF0]);
        assert_eq!(display.get(62, 31), 1);
        assert_eq!(display.get(63, 31), 1);
        assert_eq!(display.get(0, 31), 1);
        assert_eq!(display.get(1, 31), 1);
        assert_eq!(display.get(62, 0), 1);
        assert_eq!(display.get(1, 0), 1);
        assert_eq!(display.lit(), 8);
    }

    #[test]
    fn clear_turns_every_cell_off() {
        let mut display = Display::new();
        display.draw_sprite(3, 3, &[0xFF; 15]);
        display.clear();
        assert_eq!(display.lit(), 0);
    }

    #[test]
    fn renders_as_text() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0b1010_0000]);
        let text = display.to_string();
        let first_line = text.lines().next().unwrap_or_default();
        assert_eq!(first_line, format!("# #{}", " ".repeat(WIDTH - 3)));
        assert_eq!(text.lines().count(), HEIGHT);
    }
}
