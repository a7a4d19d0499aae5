use chip8_vm::emulator::display::{Display, HEIGHT, WIDTH};
use chip8_vm::emulator::keypad::{Keypad, NUM_KEYS};

use super::key_manager::KeyManager;

use crossterm::event::KeyCode;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

/// Terminals only report presses, so a key counts as held for this long after one.
const HOLD: Duration = Duration::from_millis(200);

/// What the user asked the frontend to do, apart from pressing keypad keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Reset,
    Quit,
}

pub struct CrosstermInput<'a> {
    key_manager: &'a KeyManager,
    held_since: [Option<Instant>; NUM_KEYS],
}

impl CrosstermInput<'_> {
    pub fn new(key_manager: &KeyManager) -> CrosstermInput<'_> {
        CrosstermInput {
            key_manager,
            held_since: [None; NUM_KEYS],
        }
    }

    /// Write the current key states into `keypad`, and return any frontend commands.
    pub fn poll(&mut self, keypad: &mut Keypad) -> Vec<Command> {
        let now = Instant::now();
        let mut commands = Vec::new();
        for key in self.key_manager.keys() {
            if let Some(hex) = key_to_hex(key) {
                self.held_since[hex as usize] = Some(now);
            } else if let Some(command) = key_to_command(key) {
                commands.push(command);
            }
        }

        for (key, pressed) in self.held_since.iter().enumerate() {
            let held = pressed.map_or(false, |at| now.duration_since(at) < HOLD);
            keypad.set(key as u8, held);
        }

        commands
    }
}

pub struct CrosstermOutput {
    stdout: Stdout,
    cells: [[u8; WIDTH]; HEIGHT],
}

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        // Drop restores the terminal from here on
        let mut output = CrosstermOutput {
            stdout: stdout(),
            cells: [[0; WIDTH]; HEIGHT],
        };
        execute!(output.stdout, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        output.draw_frame()?;
        Ok(output)
    }

    /// Frame around the screen, two columns per cell
    fn draw_frame(&mut self) -> crossterm::Result<()> {
        let right = 2 * WIDTH as u16 + 1;
        let bottom = HEIGHT as u16 + 1;
        let horizontal = "━".repeat(2 * WIDTH);
        queue!(self.stdout, Clear(ClearType::All))?;
        queue!(self.stdout, cursor::MoveTo(0, 0), Print(format!("┏{}┓", horizontal)))?;
        for y in 1..bottom {
            queue!(self.stdout, cursor::MoveTo(0, y), Print('┃'), cursor::MoveTo(right, y), Print('┃'))?;
        }
        queue!(self.stdout, cursor::MoveTo(0, bottom), Print(format!("┗{}┛", horizontal)))?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Redraw the cells that changed since the last render.
    pub fn render(&mut self, display: &Display) -> crossterm::Result<()> {
        for (y, row) in display.rows().enumerate() {
            for (x, &state) in row.iter().enumerate() {
                if self.cells[y][x] != state {
                    self.cells[y][x] = state;
                    queue!(
                        self.stdout,
                        cursor::MoveTo(2 * x as u16 + 1, y as u16 + 1),
                        Print(if state == 1 { "██" } else { "  " })
                    )?;
                }
            }
        }
        self.stdout.flush()?;
        Ok(())
    }

    /// Show a line of text below the screen.
    pub fn status(&mut self, text: &str) -> crossterm::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, HEIGHT as u16 + 2),
            Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Ring the terminal bell.
    pub fn beep(&mut self) -> crossterm::Result<()> {
        queue!(self.stdout, Print('\x07'))?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, LeaveAlternateScreen, cursor::Show);
    }
}

/// The conventional layout of the hexadecimal keypad on a QWERTY keyboard:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  ->  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
pub fn key_to_hex(key: KeyCode) -> Option<u8> {
    let c = match key {
        KeyCode::Char(c) => c.to_ascii_lowercase(),
        _ => return None,
    };
    let hex = match c {
        '1' => 0x1, '2' => 0x2, '3' => 0x3, '4' => 0xC,
        'q' => 0x4, 'w' => 0x5, 'e' => 0x6, 'r' => 0xD,
        'a' => 0x7, 's' => 0x8, 'd' => 0x9, 'f' => 0xE,
        'z' => 0xA, 'x' => 0x0, 'c' => 0xB, 'v' => 0xF,
        _ => return None,
    };
    Some(hex)
}

fn key_to_command(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
        KeyCode::Enter => Some(Command::Reset),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn keypad_layout() {
        assert_eq!(key_to_hex(KeyCode::Char('1')), Some(0x1));
        assert_eq!(key_to_hex(KeyCode::Char('4')), Some(0xC));
        assert_eq!(key_to_hex(KeyCode::Char('x')), Some(0x0));
        assert_eq!(key_to_hex(KeyCode::Char('V')), Some(0xF));
        assert_eq!(key_to_hex(KeyCode::Char('p')), None);
        assert_eq!(key_to_hex(KeyCode::Enter), None);
    }

    #[test]
    fn every_hex_key_is_reachable() {
        let mut seen = [false; NUM_KEYS];
        for c in "1234qwerasdfzxcv".chars() {
            if let Some(hex) = key_to_hex(KeyCode::Char(c)) {
                seen[hex as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn control_keys() {
        assert_eq!(key_to_command(KeyCode::Char('p')), Some(Command::Pause));
        assert_eq!(key_to_command(KeyCode::Enter), Some(Command::Reset));
        assert_eq!(key_to_command(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(key_to_command(KeyCode::Char('q')), None);
    }
}
