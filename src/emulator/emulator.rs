//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use std::path::Path;
use std::time::Duration;

use crate::emulator::display::Display;
use crate::emulator::error::{Fault, LoadError, StepError};
use crate::emulator::instruction::*;
use crate::emulator::keypad::Keypad;
use crate::emulator::timer::{Clock, Timers, TIMER_HZ};
use crate::util::bit_splitter::BitSplitter;

pub const MEM_SIZE: usize = 4096;
pub const STACK_SIZE: usize = 16;
pub const PC_START: u16 = 0x200;
/// The largest program that fits between `PC_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PC_START as usize;
const NUM_REGISTERS: usize = 16;
const ADDR_MASK: u16 = 0x0FFF;
const FLAG: usize = 0xF;
const GLYPH_SIZE: u16 = 5;
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// How the delay and sound timers are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Count down at 60 Hz of wall-clock time, fed through [`Emulator::tick_timers`].
    RealTime,
    /// Count down once after every cycle, regardless of elapsed time.
    PerCycle,
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::RealTime
    }
}

/// What a single call to [`Emulator::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Executed(Instruction),
    /// The opcode is not part of the instruction set and was skipped.
    Unknown(u16),
    /// `FX0A` is waiting for a key press and will run again next cycle.
    WaitingForKey,
    Paused,
}

pub struct Emulator {
    memory: [u8; MEM_SIZE],
    registers: [u8; NUM_REGISTERS],
    i: u16,
    program_counter: u16,
    stack_pointer: usize,
    stack: [u16; STACK_SIZE],
    timers: Timers,
    timer_clock: Clock,
    timer_mode: TimerMode,

    // Host-facing surfaces
    keypad: Keypad,
    display: Display,
    redraw_pending: bool,

    // Keys seen by the last cycle of an unfinished FX0A
    key_wait: Option<Keypad>,
    loaded: bool,
    running: bool,
    paused: bool,
    fault: Option<Fault>,
}

impl Emulator {

    /// Create an emulator with the font loaded and nothing else.
    pub fn new() -> Emulator {
        Emulator::with_timer_mode(TimerMode::default())
    }

    pub fn with_timer_mode(timer_mode: TimerMode) -> Emulator {
        let mut memory = [0; MEM_SIZE];
        memory[..FONT.len()].copy_from_slice(&FONT);

        Emulator {
            memory,
            registers: [0; NUM_REGISTERS],
            i: 0,
            program_counter: PC_START,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],
            timers: Timers::default(),
            timer_clock: Clock::from_hz(TIMER_HZ),
            timer_mode,

            keypad: Keypad::new(),
            display: Display::new(),
            redraw_pending: false,

            key_wait: None,
            loaded: false,
            running: true,
            paused: false,
            fault: None,
        }
    }

    /// Throw away all state, as if freshly created. A program must be loaded again.
    pub fn reset(&mut self) {
        log::debug!("Resetting machine");
        *self = Emulator::with_timer_mode(self.timer_mode);
    }

    /// Copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge { size: program.len(), max: MAX_PROGRAM_SIZE });
        }

        let start = PC_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        self.loaded = true;
        log::info!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Read a program from `path` and copy it into memory at 0x200.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let program = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(&program)
    }

    /// Perform a single fetch-decode-execute cycle.
    pub fn step(&mut self) -> Result<Status, StepError> {
        if let Some(fault) = self.fault {
            return Err(StepError::Halted(fault));
        }
        if !self.loaded {
            return Err(StepError::NotLoaded);
        }
        if self.paused {
            return Ok(Status::Paused);
        }

        // Each opcode is two bytes
        let address = self.program_counter;
        let (high, low) = (self.read(address), self.read(address.wrapping_add(1)));
        self.program_counter = address.wrapping_add(2);

        let status = match Instruction::from_two_u8(high, low) {
            Some(instruction) => {
                log::trace!("{:#05x}: {}", address, instruction);
                match self.execute_single(instruction) {
                    Ok(status) => status,
                    Err(fault) => {
                        log::error!("{}", fault);
                        self.fault = Some(fault);
                        return Err(fault.into());
                    }
                }
            }
            None => {
                let opcode = BitSplitter::new(high, low).as_u16();
                log::warn!("Unknown opcode {:#06x} at {:#05x}", opcode, address);
                Status::Unknown(opcode)
            }
        };

        if self.timer_mode == TimerMode::PerCycle {
            self.timers.decrement();
        }

        Ok(status)
    }

    /// Let `elapsed` wall-clock time pass for the 60 Hz timers.
    /// Does nothing while paused, or when the timers follow the cycles instead.
    pub fn tick_timers(&mut self, elapsed: Duration) {
        if self.paused || self.timer_mode != TimerMode::RealTime {
            return;
        }

        let ticks = self.timer_clock.advance(elapsed);
        for _ in 0..ticks.min(u32::from(u8::MAX) + 1) {
            self.timers.decrement();
        }
    }

    fn read(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = value;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    /// Address of the instruction being executed, the program counter having moved past it.
    fn current_address(&self) -> u16 {
        self.program_counter.wrapping_sub(2)
    }

    /// Execute a single instruction
    fn execute_single(&mut self, instruction: Instruction) -> Result<Status, Fault> {
        let v = &mut self.registers;
        match instruction {

            Instruction::ClearScreen => {
                self.display.clear();
                self.redraw_pending = true;
            }

            // Return to the previous call site via the stack.
            Instruction::Return => {
                if self.stack_pointer == 0 {
                    return Err(Fault::StackUnderflow { address: self.current_address() });
                }
                self.stack_pointer -= 1;
                self.program_counter = self.stack[self.stack_pointer];
            }

            // Machine code routines are not supported
            Instruction::Sys(_) => {}

            Instruction::Jump(Addr(addr)) => {
                self.program_counter = addr;
            }

            // Store the return address on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => {
                if self.stack_pointer == STACK_SIZE {
                    return Err(Fault::StackOverflow { address: self.current_address(), depth: STACK_SIZE });
                }
                self.stack[self.stack_pointer] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = addr;
            }

            Instruction::SkipIfEqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] == n;
                self.skip_if(condition);
            }

            Instruction::SkipIfNeqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] != n;
                self.skip_if(condition);
            }

            Instruction::SkipIfEqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] == v[y as usize];
                self.skip_if(condition);
            }

            Instruction::LoadConst(Reg(x), Const(n)) => {
                v[x as usize] = n;
            }

            // No carry flag
            Instruction::AddConst(Reg(x), Const(n)) => {
                v[x as usize] = v[x as usize].wrapping_add(n);
            }

            Instruction::LoadReg(Reg(x), Reg(y)) => {
                v[x as usize] = v[y as usize];
            }

            Instruction::Or(Reg(x), Reg(y)) => {
                v[x as usize] |= v[y as usize];
            }

            Instruction::And(Reg(x), Reg(y)) => {
                v[x as usize] &= v[y as usize];
            }

            Instruction::Xor(Reg(x), Reg(y)) => {
                v[x as usize] ^= v[y as usize];
            }

            // The flag is written before the result, so VX wins when X is F.
            Instruction::AddReg(Reg(x), Reg(y)) => {
                let (sum, carry) = v[x as usize].overflowing_add(v[y as usize]);
                v[FLAG] = carry as u8;
                v[x as usize] = sum;
            }

            // VF is 0 when there is a borrow, and 1 when there isn't.
            Instruction::SubReg(Reg(x), Reg(y)) => {
                let (diff, borrow) = v[x as usize].overflowing_sub(v[y as usize]);
                v[FLAG] = !borrow as u8;
                v[x as usize] = diff;
            }

            Instruction::ShiftRight(Reg(x), _) => {
                let value = v[x as usize];
                v[FLAG] = value & 1;
                v[x as usize] = value >> 1;
            }

            Instruction::SubReverse(Reg(x), Reg(y)) => {
                let (diff, borrow) = v[y as usize].overflowing_sub(v[x as usize]);
                v[FLAG] = !borrow as u8;
                v[x as usize] = diff;
            }

            Instruction::ShiftLeft(Reg(x), _) => {
                let value = v[x as usize];
                v[FLAG] = value >> 7;
                v[x as usize] = value << 1;
            }

            Instruction::SkipIfNeqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] != v[y as usize];
                self.skip_if(condition);
            }

            Instruction::LoadI(Addr(addr)) => {
                self.i = addr;
            }

            Instruction::JumpPlusV0(Addr(addr)) => {
                self.program_counter = addr + v[0] as u16;
            }

            Instruction::Random(Reg(x), Const(n)) => {
                v[x as usize] = rand::random::<u8>() & n;
            }

            Instruction::Draw(Reg(x), Reg(y), Const(height)) => {
                v[FLAG] = 0;
                let x_coord = v[x as usize] as usize;
                let y_coord = v[y as usize] as usize;

                // Each sprite row is one byte, at most 15 rows
                let mut sprite = [0u8; 15];
                for (row, byte) in sprite.iter_mut().enumerate().take(height as usize) {
                    *byte = self.read(self.i.wrapping_add(row as u16));
                }

                if self.display.draw_sprite(x_coord, y_coord, &sprite[..height as usize]) {
                    self.registers[FLAG] = 1;
                }
                self.redraw_pending = true;
            }

            Instruction::SkipIfKey(Reg(x)) => {
                let condition = self.keypad.is_pressed(v[x as usize]);
                self.skip_if(condition);
            }

            Instruction::SkipIfNotKey(Reg(x)) => {
                let condition = !self.keypad.is_pressed(v[x as usize]);
                self.skip_if(condition);
            }

            Instruction::LoadDelay(Reg(x)) => {
                v[x as usize] = self.timers.delay;
            }

            // Stay on this instruction until a key goes down
            Instruction::WaitKey(Reg(x)) => {
                let previous = self.key_wait.take().unwrap_or(self.keypad);
                match self.keypad.newly_pressed(&previous) {
                    Some(key) => {
                        log::debug!("Got key {:#x} for V{:X}", key, x);
                        v[x as usize] = key;
                    }
                    None => {
                        self.key_wait = Some(self.keypad);
                        self.program_counter = self.current_address();
                        return Ok(Status::WaitingForKey);
                    }
                }
            }

            Instruction::SetDelay(Reg(x)) => {
                self.timers.delay = v[x as usize];
            }

            Instruction::SetSound(Reg(x)) => {
                self.timers.sound = v[x as usize];
            }

            Instruction::AddI(Reg(x)) => {
                self.i = self.i.wrapping_add(v[x as usize] as u16);
            }

            // Each font glyph is 5 bytes, starting at address 0.
            Instruction::LoadGlyph(Reg(x)) => {
                self.i = GLYPH_SIZE * v[x as usize] as u16;
            }

            Instruction::StoreBcd(Reg(x)) => {
                let value = v[x as usize];
                let i = self.i;
                self.write(i, value / 100);
                self.write(i.wrapping_add(1), value / 10 % 10);
                self.write(i.wrapping_add(2), value % 10);
            }

            // Dump register values up to and including Vx
            Instruction::StoreRegs(Reg(x)) => {
                for reg_no in 0..=x as u16 {
                    let value = self.registers[reg_no as usize];
                    self.write(self.i.wrapping_add(reg_no), value);
                }
            }

            // Load register values up to and including Vx
            Instruction::LoadRegs(Reg(x)) => {
                for reg_no in 0..=x as u16 {
                    self.registers[reg_no as usize] = self.read(self.i.wrapping_add(reg_no));
                }
            }
        };

        Ok(Status::Executed(instruction))
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub fn memory(&self) -> &[u8; MEM_SIZE] {
        &self.memory
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    /// The address register `I`.
    pub fn index(&self) -> u16 {
        self.i
    }

    /// Number of return addresses on the stack.
    pub fn stack_depth(&self) -> usize {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn timer_mode(&self) -> TimerMode {
        self.timer_mode
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// Whether the display changed since the host last called [`Emulator::mark_drawn`].
    pub fn needs_redraw(&self) -> bool {
        self.redraw_pending
    }

    pub fn mark_drawn(&mut self) {
        self.redraw_pending = false;
    }

    /// Whether a sound should be playing right now.
    pub fn is_sound_playing(&self) -> bool {
        self.timers.sound > 0
    }

    /// Whether the sound timer ran out since the last call.
    pub fn take_buzzer(&mut self) -> bool {
        self.timers.take_buzzer()
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.key_wait.is_some()
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("Paused: {}", self.paused);
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
