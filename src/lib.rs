//! Desktop host for the `plum8` interpreter: a stderr logger, the driving
//! loop, key mapping, text rendering and the command line front end.

pub mod cli;
pub mod context;
pub mod driver;
pub mod keymap;
pub mod logger;
pub mod render;

pub use context::HostContext;
pub use driver::{Driver, DriverConfig, IllegalOpcodePolicy};
