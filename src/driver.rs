//! The driving loop around `Plum8`.
//!
//! A frame is `ticks_per_frame` instructions followed by one timer tick,
//! frames are optionally paced to `frame_rate`. With the defaults of 5 and
//! 60Hz this is ~300 instructions per second and 60Hz timers.

use std::thread::sleep;
use std::time::{Duration, Instant};

use log::{debug, warn};

use plum8::{Context, Error, Plum8};

pub const DEFAULT_TICKS_PER_FRAME: usize = 5;
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// What to do when the interpreter runs into an undecodable word
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IllegalOpcodePolicy {
    /// Stop the run with the error
    Halt,
    /// Log it and carry on with the next instruction
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    pub ticks_per_frame: usize,
    pub frame_rate: u32,
    pub illegal_opcode: IllegalOpcodePolicy,
    /// Sleep between frames to keep `frame_rate`
    pub realtime: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ticks_per_frame: DEFAULT_TICKS_PER_FRAME,
            frame_rate: DEFAULT_FRAME_RATE,
            illegal_opcode: IllegalOpcodePolicy::Halt,
            realtime: false,
        }
    }
}

impl DriverConfig {
    pub fn frame_time(&self) -> Duration {
        Duration::from_nanos(1_000_000_000u64 / u64::from(self.frame_rate.max(1)))
    }
}

pub struct Driver<C: Context> {
    chip: Plum8<C>,
    config: DriverConfig,
    frames: u64,
    skipped: u64,
}

impl<C: Context> Driver<C> {
    pub fn new(chip: Plum8<C>, config: DriverConfig) -> Self {
        Self {
            chip,
            config,
            frames: 0,
            skipped: 0,
        }
    }

    pub fn chip(&self) -> &Plum8<C> {
        &self.chip
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Illegal opcodes stepped over under `IllegalOpcodePolicy::Skip`
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Run a single frame
    ///
    /// A pending wait for key ends the instruction part of the frame early,
    /// timers are ticked regardless.
    pub fn run_frame(&mut self) -> Result<(), Error> {
        for _ in 0..self.config.ticks_per_frame {
            match self.chip.tick() {
                Ok(()) => {}
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(Error::IllegalOpcode { opcode }))
                    if self.config.illegal_opcode == IllegalOpcodePolicy::Skip =>
                {
                    warn!(
                        "skipping illegal opcode {:#06x} at {:#05x}",
                        opcode,
                        self.chip.pc().wrapping_sub(2)
                    );
                    self.skipped += 1;
                }
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        self.chip.tick_timers();
        self.frames += 1;
        Ok(())
    }

    /// Run `frames` frames, `before_frame` gets the index of the upcoming frame
    /// and a chance to feed input
    pub fn run<F>(&mut self, frames: u64, mut before_frame: F) -> Result<(), Error>
    where
        F: FnMut(u64, &mut Plum8<C>),
    {
        let frame_time = self.config.frame_time();
        let mut last_frame = Instant::now();
        for _ in 0..frames {
            before_frame(self.frames, &mut self.chip);
            self.run_frame()?;

            if self.config.realtime {
                let elapsed = last_frame.elapsed();
                if frame_time > elapsed {
                    sleep(frame_time - elapsed);
                }
                last_frame = Instant::now();
            }
        }
        debug!("ran {} frames, pc at {:#05x}", self.frames, self.chip.pc());
        Ok(())
    }
}
