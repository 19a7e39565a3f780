use std::time::{SystemTime, UNIX_EPOCH};

use log::info;
use nanorand::{rand::pcg64::Pcg64 as Rng, RNG};

use plum8::Context;

/// Platform side of the interpreter on a desktop host
///
/// There's no audio device, the beeper only ever shows up in the log.
pub struct HostContext {
    rng: Rng,
    beeping: bool,
}

impl HostContext {
    /// Seeded from the wall clock
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0x5EED);
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u128) -> Self {
        Self {
            rng: Rng::new_seed(seed),
            beeping: false,
        }
    }

    pub fn is_beeping(&self) -> bool {
        self.beeping
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for HostContext {
    fn gen_random(&mut self) -> u8 {
        self.rng.generate::<u8>()
    }

    fn sound_on(&mut self) {
        if !self.beeping {
            info!("beep on");
        }
        self.beeping = true;
    }

    fn sound_off(&mut self) {
        if self.beeping {
            info!("beep off");
        }
        self.beeping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_numbers() {
        let mut lhs = HostContext::with_seed(42);
        let mut rhs = HostContext::with_seed(42);
        let lhs: Vec<u8> = (0..32).map(|_| lhs.gen_random()).collect();
        let rhs: Vec<u8> = (0..32).map(|_| rhs.gen_random()).collect();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn beeper_follows_sound_calls() {
        let mut ctx = HostContext::with_seed(0);
        assert!(!ctx.is_beeping());
        ctx.sound_on();
        ctx.sound_on();
        assert!(ctx.is_beeping());
        ctx.sound_off();
        assert!(!ctx.is_beeping());
    }
}
