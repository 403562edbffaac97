use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::error;

use chip8::config::{Config, DEFAULT_INSTRUCTIONS_PER_SECOND};
use chip8::display::MonoTermDisplay;
use chip8::framebuffer::{CHIP8_SCREEN_HEIGHT, CHIP8_SCREEN_WIDTH};
use chip8::input::TermInput;
use chip8::instruction::disassemble;
use chip8::runner::Emulator;
use chip8::sound::{Mute, SimpleBeep, Sound};

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter for the terminal", long_about = None)]
struct Args {
    /// program image to load at 0x200
    rom: PathBuf,

    #[arg(
        short,
        long,
        default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND,
        help = "Instructions per second"
    )]
    ips: u32,

    #[arg(long, help = "Seed for the random number instruction")]
    seed: Option<u64>,

    #[arg(short, long, help = "Don't use the speaker")]
    mute: bool,

    #[arg(long, help = "Stop after this many instructions")]
    max_steps: Option<u64>,

    #[arg(short, long, help = "Print a listing of the program and exit")]
    disassemble: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.disassemble {
        let program = std::fs::read(&args.rom)?;
        for line in disassemble(&program) {
            println!("{line}");
        }
        return Ok(());
    }

    let config = Config {
        ips: args.ips,
        seed: args.seed,
        mute: args.mute,
        max_steps: args.max_steps,
    };

    // open before touching the terminal, so a missing rom just prints an error
    let mut f = File::open(&args.rom)?;
    let mut keys = TermInput::new()?;
    let mut display = MonoTermDisplay::new(CHIP8_SCREEN_WIDTH, CHIP8_SCREEN_HEIGHT)?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut emulator = Emulator::new(config, &mut display, &mut keys, sound.as_mut());
    emulator.interpreter_mut().load_program(&mut f)?;
    let result = emulator.run();

    drop(emulator);
    drop(display);
    drop(keys);
    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..2 {
        println!();
    }
    match result {
        Ok(summary) => {
            println!("{} instructions, {:?}", summary.steps, summary.reason);
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            Err(e.into())
        }
    }
}
