//! Context for accessing functionalities of platform that `Plum8` is
//! emulated on.
//!
//! Display and keypad are pushed into and pulled out of the interpreter by the
//! driving loop, the context only covers what the interpreter has to ask the
//! platform for in the middle of an instruction.

/// Trait aggregating platform functionalities
pub trait Context {
    /// Generate random 8-bit number
    ///
    /// Called by `tick` whenever requested by executing program
    fn gen_random(&mut self) -> u8;
    /// Turn sound on
    ///
    /// Called by `tick` when the program loads a nonzero sound timer
    fn sound_on(&mut self);
    /// Turn sound off
    ///
    /// Called by `tick_timers` when sound timer runs out
    fn sound_off(&mut self);
}
