#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! A CHIP-8 interpreter core.
//!
//! `plum8` owns the whole machine state (memory, registers, stack, timers,
//! display and keypad) and exposes a small imperative surface to a driving
//! loop: [`Plum8::reset`], [`Plum8::load`], [`Plum8::tick`],
//! [`Plum8::tick_timers`], [`Plum8::keypress`] and [`Plum8::read_display`].
//!
//! ```
//! use plum8::{Context, Plum8};
//!
//! struct Silent;
//!
//! impl Context for Silent {
//!     fn gen_random(&mut self) -> u8 { 4 }
//!     fn sound_on(&mut self) {}
//!     fn sound_off(&mut self) {}
//! }
//!
//! let mut chip = Plum8::new(Silent);
//! chip.load(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]).unwrap();
//! for _ in 0..3 {
//!     chip.tick().unwrap();
//! }
//! assert_eq!(chip.v(0), 8);
//! ```
pub mod context;
pub mod error;
pub mod font;
pub mod frame;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod plum;
pub mod timer;

pub use context::Context;
pub use error::Error;
pub use frame::{Frame, FrameView, HEIGHT, WIDTH};
pub use opcode::OpCode;
pub use plum::Plum8;

#[cfg(feature = "embedded-graphics")]
pub use embedded_graphics;
