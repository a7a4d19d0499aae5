/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

The library is only the machine. It does not open windows or read the keyboard;
instead it exposes a display buffer and a keypad that a host reads and writes
between cycles, and it leaves all pacing to the host.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use terminal host
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The keypad is mapped onto `1234`, `qwer`, `asdf` and `zxcv`.
Press `p` to pause, enter to restart the program and escape to quit.

# Library

The main way of running a program is to load it as bytes and step through it.

```rust
use chip8_vm::emulator::{Emulator, Status};
use chip8_vm::emulator::instruction::Instruction;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
emulator.load(&clear_display).unwrap();
let status = emulator.step().unwrap(); // Will now clear the display
assert_eq!(status, Status::Executed(Instruction::ClearScreen));
assert!(emulator.needs_redraw());
```

## Hosting the machine

A host typically runs a loop that feeds key states in, steps a number of cycles,
lets the 60 Hz timers see the elapsed time and then redraws if needed.

```rust
use std::time::Duration;
use chip8_vm::emulator::Emulator;
use chip8_vm::emulator::timer::Clock;

let mut emulator = Emulator::new();
emulator.load(&[0x60, 0x05, 0xF0, 0x15, 0x12, 0x04]).unwrap();

let mut cycles = Clock::from_hz(400);
let frame = Duration::from_millis(16);

emulator.keypad_mut().press(0x5);
for _ in 0..cycles.advance(frame) {
    emulator.step().unwrap();
}
emulator.tick_timers(frame);

if emulator.needs_redraw() {
    print!("{}", emulator.display());
    emulator.mark_drawn();
}
assert_eq!(emulator.delay_timer(), 5);
```

## Disassembling

Opcodes decode on their own too, which is handy for tracing a program.

```rust
use chip8_vm::emulator::instruction::Instruction;

let draw = Instruction::from_u16(0xD125).unwrap();
assert_eq!(draw.to_string(), "DRW V1, V2, 5");
assert_eq!(Instruction::from_u16(0x5121), None);
```
*/

pub mod emulator;
pub mod util;
