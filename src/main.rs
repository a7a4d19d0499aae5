use std::error::Error;
use std::path::PathBuf;

use structopt::StructOpt;

use chip8_vm::emulator::timer::Clock;
use chip8_vm::emulator::{Emulator, Status, TimerMode};

/// Run a CHIP-8 program without a screen, then print what it drew.
#[derive(StructOpt, Debug)]
#[structopt(name = "chip-8")]
struct Opt {
    /// Number of cycles to execute
    #[structopt(short, long, default_value = "1000")]
    cycles: u64,

    /// Simulated cycles per second, which decides how fast the timers run
    #[structopt(long, default_value = "400")]
    hz: u32,

    /// Count the timers down once per cycle instead of at 60 Hz
    #[structopt(long)]
    per_cycle_timers: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Get configuration and load the program
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let timer_mode = if opt.per_cycle_timers { TimerMode::PerCycle } else { TimerMode::RealTime };
    let mut emulator = Emulator::with_timer_mode(timer_mode);
    emulator.load_file(&opt.input)?;

    // Time is simulated, so the output does not depend on the host
    let cycle_time = Clock::from_hz(opt.hz).period();
    let mut unknown = 0;
    for _ in 0..opt.cycles {
        if let Status::Unknown(_) = emulator.step()? {
            unknown += 1;
        }
        emulator.tick_timers(cycle_time);
    }

    print!("{}", emulator.display());
    if unknown > 0 {
        log::warn!("Skipped {} unknown opcodes", unknown);
    }

    Ok(())
}
