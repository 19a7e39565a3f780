//! `env_logger` set up for the host.
//!
//! Every record ends up on stderr as a single line:
//!
//! ```text
//! [INFO ][chip8_host::driver] halted after 120 frames
//! ```

use std::io::{self, Write};

use env_logger::{Builder, Target};
use log::{Record, SetLoggerError};

pub use log::LevelFilter;

/// Write `record` the way it's printed
pub fn write_line(out: &mut dyn Write, record: &Record) -> io::Result<()> {
    let modpath = record.module_path().unwrap_or_else(|| record.target());
    writeln!(out, "[{:<5}][{}] {}", record.level(), modpath, record.args())
}

/// Logger writing to stderr, `RUST_LOG` is not consulted
pub fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format(|buf, record| write_line(buf, record))
        .target(Target::Stderr);
    builder
}

/// Install the logger for the log facade, can succeed only once per process
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    builder(level).try_init()
}
