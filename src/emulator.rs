//! The CHIP-8 machine: state, instruction set, timers and the surfaces a host talks to.

pub mod display;
pub mod emulator;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod timer;

pub use self::emulator::{Emulator, Status, TimerMode};
pub use self::error::{Fault, LoadError, StepError};
