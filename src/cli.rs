//! Command line front end: load a program, run it for a number of frames
//! and print what ended up on the display.
//!
//! ```text
//! chip8 roms/maze.ch8 --frames 120 --press 30:w --lenient
//! ```

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::Parser;
use log::{error, info};

use plum8::Plum8;

use crate::context::HostContext;
use crate::driver::{
    Driver, DriverConfig, IllegalOpcodePolicy, DEFAULT_FRAME_RATE, DEFAULT_TICKS_PER_FRAME,
};
use crate::keymap::keymap;
use crate::logger::LevelFilter;
use crate::render::render;

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 program and print its display", long_about = None)]
pub struct Args {
    #[arg(help = "Path to the program image")]
    pub rom: PathBuf,

    #[arg(long, default_value_t = 600, help = "Number of frames to run")]
    pub frames: u64,

    #[arg(long, default_value_t = DEFAULT_TICKS_PER_FRAME, help = "Instructions per frame")]
    pub ticks_per_frame: usize,

    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, help = "Frames per second")]
    pub frame_rate: u32,

    #[arg(long, default_value_t = 1, help = "Characters per pixel in the printed display")]
    pub scale: usize,

    #[arg(long, help = "Skip illegal opcodes instead of halting")]
    pub lenient: bool,

    #[arg(long, help = "Pace frames to the frame rate")]
    pub realtime: bool,

    #[arg(
        long = "press",
        value_name = "FRAME:KEY",
        help = "Hold KEY (1234/qwer/asdf/zxcv layout) during FRAME, may be repeated"
    )]
    pub presses: Vec<Press>,

    #[arg(long, default_value_t = LevelFilter::Info, help = "Log level")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn config(&self) -> DriverConfig {
        DriverConfig {
            ticks_per_frame: self.ticks_per_frame,
            frame_rate: self.frame_rate,
            illegal_opcode: if self.lenient {
                IllegalOpcodePolicy::Skip
            } else {
                IllegalOpcodePolicy::Halt
            },
            realtime: self.realtime,
        }
    }
}

/// Scripted key press, logical `key` is held for the whole `frame`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Press {
    pub frame: u64,
    pub key: u8,
}

impl FromStr for Press {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, key) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FRAME:KEY, got `{}`", s))?;
        let frame = frame
            .parse()
            .map_err(|e| format!("bad frame `{}`: {}", frame, e))?;
        let mut chars = key.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => keymap(c).ok_or_else(|| format!("`{}` is not a keypad key", c))?,
            _ => return Err(format!("expected a single key, got `{}`", key)),
        };
        Ok(Self { frame, key })
    }
}

/// Apply the presses scheduled around `frame`, releasing last frame's keys first
pub fn apply_presses<C: plum8::Context>(presses: &[Press], frame: u64, chip: &mut Plum8<C>) {
    for press in presses.iter().filter(|p| p.frame + 1 == frame) {
        chip.keypress(press.key, false);
    }
    for press in presses.iter().filter(|p| p.frame == frame) {
        chip.keypress(press.key, true);
    }
}

/// Outcome of a run
#[derive(Debug)]
pub struct Report {
    /// Display at the end of the run
    pub screen: String,
    pub frames: u64,
    /// Error the run was stopped by
    pub fault: Option<plum8::Error>,
}

pub fn run(args: &Args) -> anyhow::Result<Report> {
    let image = fs::read(&args.rom)
        .with_context(|| format!("cannot read program image {}", args.rom.display()))?;

    let mut chip = Plum8::new(HostContext::new());
    chip.load(&image)
        .with_context(|| format!("cannot load {}", args.rom.display()))?;
    info!("loaded {} ({} bytes)", args.rom.display(), image.len());

    let mut driver = Driver::new(chip, args.config());
    let fault = driver
        .run(args.frames, |frame, chip| apply_presses(&args.presses, frame, chip))
        .err();
    if let Some(e) = fault {
        error!(
            "halted in frame {}, pc at {:#05x}: {}",
            driver.frames(),
            driver.chip().pc(),
            e
        );
    }
    if driver.skipped() > 0 {
        info!("skipped {} illegal opcodes", driver.skipped());
    }

    Ok(Report {
        screen: render(driver.chip(), args.scale),
        frames: driver.frames(),
        fault,
    })
}
