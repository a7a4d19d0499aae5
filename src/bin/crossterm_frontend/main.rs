use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use structopt::StructOpt;

use chip8_vm::emulator::timer::Clock;
use chip8_vm::emulator::{Emulator, TimerMode};

mod crossterm_io;
mod key_buffer;
mod key_manager;
use crossterm_io::{Command, CrosstermInput, CrosstermOutput};
use key_manager::KeyManager;

const FRAME: Duration = Duration::from_millis(1_000 / 120);

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// Cycles executed per second
    #[structopt(long, default_value = "400")]
    hz: u32,

    /// Count the timers down once per cycle instead of at 60 Hz
    #[structopt(long)]
    per_cycle_timers: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

impl Opt {
    fn timer_mode(&self) -> TimerMode {
        if self.per_cycle_timers {
            TimerMode::PerCycle
        } else {
            TimerMode::RealTime
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {

    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_timer_mode(opt.timer_mode());
    emulator.load(&program)?;

    let key_manager = KeyManager::new();
    let mut input = CrosstermInput::new(&key_manager);
    let mut output = CrosstermOutput::new()?;
    output.status("p: pause   enter: restart   esc: quit")?;

    let mut cycles = Clock::from_hz(opt.hz);
    let mut last = Instant::now();

    // Start execution
    while emulator.is_running() {
        for command in input.poll(emulator.keypad_mut()) {
            match command {
                Command::Quit => emulator.stop(),
                Command::Pause => {
                    emulator.toggle_pause();
                    output.status(if emulator.is_paused() { "paused" } else { "running" })?;
                }
                Command::Reset => {
                    emulator.reset();
                    emulator.load(&program)?;
                    cycles.reset();
                    output.render(emulator.display())?;
                    output.status("restarted")?;
                }
            }
        }

        let now = Instant::now();
        let elapsed = now - last;
        last = now;

        if emulator.fault().is_none() {
            for _ in 0..cycles.advance(elapsed) {
                if let Err(error) = emulator.step() {
                    output.status(&format!("{} (enter to restart)", error))?;
                    break;
                }
            }
        }
        emulator.tick_timers(elapsed);

        if emulator.take_buzzer() {
            output.beep()?;
        }

        if emulator.needs_redraw() {
            output.render(emulator.display())?;
            emulator.mark_drawn();
        }

        std::thread::sleep(FRAME);
    }

    Ok(())
}
