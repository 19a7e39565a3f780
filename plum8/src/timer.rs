//! 8-bit countdown timers, decremented by the driving loop at 60Hz.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerState {
    /// Still counting down
    On,
    /// Was already at zero, nothing happened
    Off,
    /// Reached zero on this decrement
    Finished,
}

#[derive(Debug, Default, Clone)]
pub struct Timer(u8);

impl Timer {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn store(&mut self, value: u8) {
        self.0 = value;
    }

    pub fn load(&self) -> u8 {
        self.0
    }

    /// Count down by one, saturating at zero
    pub fn decrement(&mut self) -> TimerState {
        match self.0 {
            0 => TimerState::Off,
            1 => {
                self.0 = 0;
                TimerState::Finished
            }
            _ => {
                self.0 -= 1;
                TimerState::On
            }
        }
    }
}
