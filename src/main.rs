use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{error, info, warn};

use chipvm::{
    host::Audio,
    memory::read_font_file,
    rom,
    sound::{Mute, Sound},
    window::Window,
    Config, Emulator, Result, Runner,
};

#[derive(Parser)]
#[command(name = "chipvm", version)]
#[command(about = "A virtual machine for CHIP-8 programs")]
struct Args {
    #[arg(help = "ROM file to load, runs a built-in sample when omitted")]
    rom: Option<PathBuf>,

    #[arg(long, help = "Font resource, one hex byte per line")]
    font: Option<PathBuf>,

    #[arg(short, long, help = "Print per-cycle debug info")]
    verbose: bool,

    #[arg(long, default_value_t = 340, help = "Instructions per second")]
    cpu_hz: u32,

    #[arg(long, default_value_t = 60, help = "Timer decrements per second")]
    timer_hz: u32,

    #[arg(long, help = "Let the call stack grow past 16 entries")]
    unbounded_stack: bool,

    #[arg(long, help = "Stop on unknown opcodes instead of skipping them")]
    strict: bool,

    #[arg(long, help = "Seed for RND")]
    seed: Option<u64>,

    #[arg(long, default_value_t = 10, help = "Window pixels per VM pixel")]
    scale: usize,

    #[arg(long, help = "Disable sound")]
    mute: bool,
}

impl Args {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            cpu_hz: self.cpu_hz,
            timer_hz: self.timer_hz,
            stack_depth: if self.unbounded_stack {
                None
            } else {
                defaults.stack_depth
            },
            strict_opcodes: self.strict,
            seed: self.seed,
            scale: self.scale,
            verbose: self.verbose,
            mute: self.mute,
        }
    }
}

fn open_audio(config: &Config) -> Box<dyn Audio> {
    if config.mute {
        return Box::<Mute>::default();
    }
    match Sound::new() {
        Ok(sound) => Box::new(sound),
        Err(err) => {
            warn!("{err}, continuing without sound");
            Box::<Mute>::default()
        }
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let mut emu = Emulator::init(config);

    if let Some(path) = &args.font {
        emu.load_font(&read_font_file(path)?);
        info!("loaded font {}", path.display());
    }
    match &args.rom {
        Some(path) => emu.load_rom_by_file(path)?,
        None => {
            info!("no ROM given, running the built-in sample");
            emu.load_rom(&rom::SAMPLE)?;
        }
    }

    let mut window = Window::new("chipvm - ESC to exit", config.scale)?;
    let mut audio = open_audio(config);
    Runner::new(config).run(&mut emu, &mut window, audio.as_mut())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = args.config();

    let filter = if config.verbose {
        "chipvm=trace"
    } else {
        "chipvm=info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
