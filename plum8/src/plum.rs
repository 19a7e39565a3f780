use core::convert::TryFrom;

use bitvec::prelude::*;
use heapless::{consts::U16, Vec};
use log::{debug, trace};

use crate::context::Context;
use crate::error::Error;
use crate::font;
use crate::frame::{Frame, FrameView};
use crate::keypad::Keypad;
use crate::memory::{Memory, MAX_IMAGE_LENGTH, PROGRAM_START};
use crate::opcode::OpCode;
use crate::timer::{Timer, TimerState};

const VF: usize = 0xF;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Running,
    /// `FX0A` executed, next key press goes to `Vx`
    AwaitingKey { x: u8 },
}

/// The interpreter, owner of the whole machine state
///
/// Nothing here is clocked. The driving loop decides how many times `tick`
/// is called per `tick_timers`, nominally 5 ticks per 60Hz frame.
pub struct Plum8<C: Context + Sized> {
    ctx: C,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: Vec<u16, U16>,
    memory: Memory,
    frame: Frame,
    keypad: Keypad,
    delay_timer: Timer,
    sound_timer: Timer,
    mode: Mode,
}

impl<C: Context + Sized> Plum8<C> {
    pub fn new(ctx: C) -> Self {
        Self {
            ctx,
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Vec::new(),
            memory: Memory::new(),
            frame: Frame::new(),
            keypad: Keypad::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
            mode: Mode::Running,
        }
    }

    /// Bring the machine back to the state right after construction
    ///
    /// Program memory is zeroed as well, the font is rewritten.
    pub fn reset(&mut self) {
        debug!("reset");
        if self.sound_timer.load() > 0 {
            self.ctx.sound_off();
        }
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.stack = Vec::new();
        self.memory.reset();
        self.frame.clear();
        self.keypad.reset();
        self.delay_timer.store(0);
        self.sound_timer.store(0);
        self.mode = Mode::Running;
    }

    /// Reset the machine and load program from slice of bytes to memory from 0x200
    ///
    /// An image that doesn't fit is rejected before anything gets touched.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Error> {
        if image.len() > MAX_IMAGE_LENGTH {
            return Err(Error::ImageTooLarge { size: image.len() });
        }
        self.reset();
        self.memory.load_image(image)?;
        debug!("loaded {} bytes at {:#05x}", image.len(), PROGRAM_START);
        Ok(())
    }

    /// Execute a single instruction
    ///
    /// While waiting for a key (`FX0A`) nothing is fetched, `WouldBlock` is
    /// returned until a key goes from released to pressed. The pc is already
    /// past the faulting word when `IllegalOpcode` is returned, so calling
    /// `tick` again skips it.
    pub fn tick(&mut self) -> nb::Result<(), Error> {
        if let Mode::AwaitingKey { x } = self.mode {
            return match self.keypad.take_latest_press() {
                Some(key) => {
                    debug!("key {:X} stored in V{:X}", key, x);
                    self.v[x as usize] = key;
                    self.pc += 2;
                    self.mode = Mode::Running;
                    Ok(())
                }
                None => Err(nb::Error::WouldBlock),
            };
        }

        let pc = self.pc;
        let raw = self.fetch()?;
        self.pc += 2;
        let opcode = OpCode::try_from(raw)?;
        trace!("{:#05x}: {:04X}  {}", pc, raw, opcode);
        self.execute(opcode)?;
        Ok(())
    }

    /// Decrement both timers, meant to be called at 60Hz
    pub fn tick_timers(&mut self) {
        self.delay_timer.decrement();
        if self.sound_timer.decrement() == TimerState::Finished {
            self.ctx.sound_off();
        }
    }

    /// Record state of logical key `0x0..=0xF`, anything else is ignored
    pub fn keypress(&mut self, key: u8, pressed: bool) {
        if !self.keypad.set(key, pressed) {
            trace!("ignoring unmapped key {:#x}", key);
        }
    }

    pub fn read_display(&self) -> FrameView<'_> {
        self.frame.view()
    }

    /// Rows of pixels, each of them repeated `scale` times in both directions
    pub fn draw_screen(
        &self,
        scale: usize,
    ) -> impl Iterator<Item = impl Iterator<Item = &bool>> + '_ {
        self.frame.view().iter_pixelwise_scaled(scale)
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    /// Value of register `Vx`, only the low nibble of `x` is used
    pub fn v(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.load()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.load()
    }

    /// Count of return addresses on the stack
    pub fn stack_pointer(&self) -> u8 {
        self.stack.len() as u8
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.mode, Mode::AwaitingKey { .. })
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_raw()
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    fn fetch(&self) -> Result<u16, Error> {
        self.memory.read_word(self.pc)
    }

    fn skip_if(&mut self, condition: bool) -> Result<(), Error> {
        if condition {
            self.pc += 2;
        }
        Ok(())
    }
}

// OpCodes impls
impl<C: Context + Sized> Plum8<C> {
    #[rustfmt::skip]
    fn execute(&mut self, opcode: OpCode) -> Result<(), Error> {
        match opcode {
            OpCode::_00E0             => self.clear_screen(),
            OpCode::_00EE             => self.subroutine_return(),
            OpCode::_1NNN { nnn }     => self.jump_to(nnn),
            OpCode::_2NNN { nnn }     => self.exec_subroutine_at(nnn),
            OpCode::_3XKK { x, kk }   => self.skip_if_vx_eq_kk(x, kk),
            OpCode::_4XKK { x, kk }   => self.skip_if_vx_ne_kk(x, kk),
            OpCode::_5XY0 { x, y }    => self.skip_if_vx_eq_vy(x, y),
            OpCode::_6XKK { x, kk }   => self.assign_vx_kk(x, kk),
            OpCode::_7XKK { x, kk }   => self.assign_add_vx_kk(x, kk),
            OpCode::_8XY0 { x, y }    => self.assign_vx_vy(x, y),
            OpCode::_8XY1 { x, y }    => self.assign_or_vx_vy(x, y),
            OpCode::_8XY2 { x, y }    => self.assign_and_vx_vy(x, y),
            OpCode::_8XY3 { x, y }    => self.assign_xor_vx_vy(x, y),
            OpCode::_8XY4 { x, y }    => self.assign_add_vx_vy(x, y),
            OpCode::_8XY5 { x, y }    => self.assign_sub_vx_vy(x, y),
            OpCode::_8XY6 { x, .. }   => self.assign_vx_shifted_r(x),
            OpCode::_8XY7 { x, y }    => self.assign_vx_vy_sub_vx(x, y),
            OpCode::_8XYE { x, .. }   => self.assign_vx_shifted_l(x),
            OpCode::_9XY0 { x, y }    => self.skip_if_vx_ne_vy(x, y),
            OpCode::_ANNN { nnn }     => self.assign_i_nnn(nnn),
            OpCode::_BNNN { nnn }     => self.jump_to_nnn_add_v0(nnn),
            OpCode::_CXKK { x, kk }   => self.assign_vx_random_and_kk(x, kk),
            OpCode::_DXYN { x, y, n } => self.draw_n_at_vx_vy(x, y, n),
            OpCode::_EX9E { x }       => self.skip_if_vx_in_keys(x),
            OpCode::_EXA1 { x }       => self.skip_if_vx_not_in_keys(x),
            OpCode::_FX07 { x }       => self.assign_vx_delay_t(x),
            OpCode::_FX0A { x }       => self.assign_vx_wait_for_key(x),
            OpCode::_FX15 { x }       => self.assign_delay_t_vx(x),
            OpCode::_FX18 { x }       => self.assign_sound_t_vx(x),
            OpCode::_FX1E { x }       => self.assign_add_i_vx(x),
            OpCode::_FX29 { x }       => self.assign_i_addr_of_sprite_vx(x),
            OpCode::_FX33 { x }       => self.assign_mem_at_i_bcd_of_vx(x),
            OpCode::_FX55 { x }       => self.assign_mem_at_i_v0_to_vx(x),
            OpCode::_FX65 { x }       => self.assign_v0_to_vx_mem_at_i(x),
        }
    }

    /// Blank the whole display
    /// 00E0
    fn clear_screen(&mut self) -> Result<(), Error> {
        self.frame.clear();
        Ok(())
    }

    /// Leave the current subroutine, pc is popped off the stack
    /// 00EE
    fn subroutine_return(&mut self) -> Result<(), Error> {
        let addr = self.stack.pop().ok_or(Error::StackUnderflow)?;
        debug!("return to {:#05x}", addr);
        self.pc = addr;
        Ok(())
    }

    /// Continue execution at NNN
    /// 1NNN { nnn }
    fn jump_to(&mut self, nnn: u16) -> Result<(), Error> {
        self.pc = nnn;
        Ok(())
    }

    /// Call the subroutine at NNN, the pushed address is the one after the call
    /// 2NNN { nnn }
    fn exec_subroutine_at(&mut self, nnn: u16) -> Result<(), Error> {
        self.stack
            .push(self.pc)
            .map_err(|_| Error::StackOverflow)?;
        debug!("call {:#05x}, depth {}", nnn, self.stack.len());
        self.pc = nnn;
        Ok(())
    }

    /// Skip over the next instruction when VX holds KK
    /// 3XKK { x, kk }
    fn skip_if_vx_eq_kk(&mut self, x: u8, kk: u8) -> Result<(), Error> {
        self.skip_if(self.v[x as usize] == kk)
    }

    /// Skip over the next instruction unless VX holds KK
    /// 4XKK { x, kk }
    fn skip_if_vx_ne_kk(&mut self, x: u8, kk: u8) -> Result<(), Error> {
        self.skip_if(self.v[x as usize] != kk)
    }

    /// Skip over the next instruction when VX and VY hold the same value
    /// 5XY0 { x, y }
    fn skip_if_vx_eq_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.skip_if(self.v[x as usize] == self.v[y as usize])
    }

    /// Load KK into VX
    /// 6XKK { x, kk }
    fn assign_vx_kk(&mut self, x: u8, kk: u8) -> Result<(), Error> {
        self.v[x as usize] = kk;
        Ok(())
    }

    /// Add KK to VX modulo 256, VF untouched
    /// 7XKK { x, kk }
    fn assign_add_vx_kk(&mut self, x: u8, kk: u8) -> Result<(), Error> {
        self.v[x as usize] = self.v[x as usize].wrapping_add(kk);
        Ok(())
    }

    /// Copy VY into VX
    /// 8XY0 { x, y }
    fn assign_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] = self.v[y as usize];
        Ok(())
    }

    /// Bitwise OR of VX and VY into VX
    /// 8XY1 { x, y }
    fn assign_or_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] |= self.v[y as usize];
        Ok(())
    }

    /// Bitwise AND of VX and VY into VX
    /// 8XY2 { x, y }
    fn assign_and_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] &= self.v[y as usize];
        Ok(())
    }

    /// Bitwise XOR of VX and VY into VX
    /// 8XY3 { x, y }
    fn assign_xor_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] ^= self.v[y as usize];
        Ok(())
    }

    // Flags below are written after the result, so with x = F the flag wins.

    /// Add VY to VX, VF is 1 on carry out of the byte
    /// 8XY4 { x, y }
    fn assign_add_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (value, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
        self.v[x as usize] = value;
        self.v[VF] = carry as u8;
        Ok(())
    }

    /// Subtract VY from VX, VF is 1 unless the subtraction borrowed
    /// 8XY5 { x, y }
    fn assign_sub_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (value, borrow) = self.v[x as usize].overflowing_sub(self.v[y as usize]);
        self.v[x as usize] = value;
        self.v[VF] = !borrow as u8;
        Ok(())
    }

    /// Shift VX one bit right, the dropped bit lands in VF
    /// 8XY6 { x, .. }, VY is ignored
    fn assign_vx_shifted_r(&mut self, x: u8) -> Result<(), Error> {
        let lsb = self.v[x as usize] & 1u8;
        self.v[x as usize] >>= 1;
        self.v[VF] = lsb;
        Ok(())
    }

    /// Store VY minus VX in VX, VF is 1 unless the subtraction borrowed
    /// 8XY7 { x, y }
    fn assign_vx_vy_sub_vx(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (value, borrow) = self.v[y as usize].overflowing_sub(self.v[x as usize]);
        self.v[x as usize] = value;
        self.v[VF] = !borrow as u8;
        Ok(())
    }

    /// Shift VX one bit left, the dropped bit lands in VF
    /// 8XYE { x, .. }, VY is ignored
    fn assign_vx_shifted_l(&mut self, x: u8) -> Result<(), Error> {
        let msb = self.v[x as usize] >> 7;
        self.v[x as usize] <<= 1;
        self.v[VF] = msb;
        Ok(())
    }

    /// Skip over the next instruction when VX and VY differ
    /// 9XY0 { x, y }
    fn skip_if_vx_ne_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.skip_if(self.v[x as usize] != self.v[y as usize])
    }

    /// Point I at NNN
    /// ANNN { nnn }
    fn assign_i_nnn(&mut self, nnn: u16) -> Result<(), Error> {
        self.i = nnn;
        Ok(())
    }

    /// Jump to NNN offset by V0, a target past the address space fails on the next fetch
    /// BNNN { nnn }
    fn jump_to_nnn_add_v0(&mut self, nnn: u16) -> Result<(), Error> {
        self.pc = nnn + self.v[0] as u16;
        Ok(())
    }

    /// Fill VX with a random byte masked by KK
    /// CXKK { x, kk }
    fn assign_vx_random_and_kk(&mut self, x: u8, kk: u8) -> Result<(), Error> {
        self.v[x as usize] = self.ctx.gen_random() & kk;
        Ok(())
    }

    /// XOR N sprite rows read from I onto the display at (VX, VY), VF is 1 when
    /// any lit pixel went dark
    /// DXYN { x, y, n }
    fn draw_n_at_vx_vy(&mut self, x: u8, y: u8, n: u8) -> Result<(), Error> {
        let (x0, y0) = (self.v[x as usize] as usize, self.v[y as usize] as usize);
        let sprite = self.memory.slice(self.i as usize, n as usize)?;
        let mut collision = false;
        for (row, bits) in sprite.view_bits::<Msb0>().chunks(8).enumerate() {
            for (col, bit) in bits.iter().enumerate() {
                collision |= self.frame.xor_bit(x0 + col, y0 + row, *bit);
            }
        }
        self.v[VF] = collision as u8;
        Ok(())
    }

    /// Skip over the next instruction while the key named by VX is held
    /// EX9E { x }
    fn skip_if_vx_in_keys(&mut self, x: u8) -> Result<(), Error> {
        self.skip_if(self.keypad.is_pressed(self.v[x as usize]))
    }

    /// Skip over the next instruction while the key named by VX is up
    /// EXA1 { x }
    fn skip_if_vx_not_in_keys(&mut self, x: u8) -> Result<(), Error> {
        self.skip_if(!self.keypad.is_pressed(self.v[x as usize]))
    }

    /// Read the delay timer into VX
    /// FX07 { x }
    fn assign_vx_delay_t(&mut self, x: u8) -> Result<(), Error> {
        self.v[x as usize] = self.delay_timer.load();
        Ok(())
    }

    /// Suspend until a key goes down and store it in VX, pc stays on this
    /// instruction until `tick` sees the press
    /// FX0A { x }
    fn assign_vx_wait_for_key(&mut self, x: u8) -> Result<(), Error> {
        debug!("waiting for key into V{:X}", x);
        self.pc -= 2;
        self.keypad.clear_latest_press();
        self.mode = Mode::AwaitingKey { x };
        Ok(())
    }

    /// Load VX into the delay timer
    /// FX15 { x }
    fn assign_delay_t_vx(&mut self, x: u8) -> Result<(), Error> {
        self.delay_timer.store(self.v[x as usize]);
        Ok(())
    }

    /// Load VX into the sound timer, switching the beeper on or off
    /// FX18 { x }
    fn assign_sound_t_vx(&mut self, x: u8) -> Result<(), Error> {
        let was_on = self.sound_timer.load() > 0;
        let value = self.v[x as usize];
        self.sound_timer.store(value);
        if value > 0 {
            self.ctx.sound_on();
        } else if was_on {
            self.ctx.sound_off();
        }
        Ok(())
    }

    /// Add VX to I as a plain 16-bit add, VF untouched
    /// FX1E { x }
    fn assign_add_i_vx(&mut self, x: u8) -> Result<(), Error> {
        self.i = self.i.wrapping_add(self.v[x as usize] as u16);
        Ok(())
    }

    /// Point I at the font glyph for the low digit of VX
    /// FX29 { x }
    fn assign_i_addr_of_sprite_vx(&mut self, x: u8) -> Result<(), Error> {
        self.i = font::glyph_addr(self.v[x as usize]);
        Ok(())
    }

    /// Write hundreds, tens and ones of VX to I, I+1 and I+2
    /// FX33 { x }
    fn assign_mem_at_i_bcd_of_vx(&mut self, x: u8) -> Result<(), Error> {
        let value = self.v[x as usize];
        self.memory
            .slice_mut(self.i as usize, 3)?
            .copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
        Ok(())
    }

    /// Dump V0 through VX to memory starting at I, I unchanged
    /// FX55 { x }
    fn assign_mem_at_i_v0_to_vx(&mut self, x: u8) -> Result<(), Error> {
        let len = x as usize + 1;
        self.memory
            .slice_mut(self.i as usize, len)?
            .copy_from_slice(&self.v[..len]);
        Ok(())
    }

    /// Fill V0 through VX from memory starting at I, I unchanged
    /// FX65 { x }
    fn assign_v0_to_vx_mem_at_i(&mut self, x: u8) -> Result<(), Error> {
        let len = x as usize + 1;
        let src = self.memory.slice(self.i as usize, len)?;
        self.v[..len].copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::TestingContext;

    fn chip_with(program: &[u8]) -> Plum8<TestingContext> {
        let mut chip = Plum8::new(TestingContext::new(0));
        chip.load(program).unwrap();
        chip
    }

    #[test]
    fn initial_state() {
        let chip = Plum8::new(TestingContext::new(0));
        assert_eq!(chip.pc(), 0x200);
        assert_eq!(chip.i(), 0);
        assert_eq!(chip.registers(), &[0; 16]);
        assert_eq!(chip.stack_pointer(), 0);
        assert_eq!(chip.read_display().count_ones(), 0);
        assert_eq!(&chip.memory()[..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(!chip.is_awaiting_key());
    }

    #[test]
    fn tick_advances_pc_before_execution() {
        let mut chip = chip_with(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]);
        chip.tick().unwrap();
        assert_eq!(chip.pc(), 0x202);
        chip.tick().unwrap();
        chip.tick().unwrap();
        assert_eq!(chip.v(0), 8);
        assert_eq!(chip.v(0xF), 0);
        assert_eq!(chip.pc(), 0x206);
    }

    #[test]
    fn fetch_out_of_address_space() {
        let mut chip = chip_with(&[0x1F, 0xFE]);
        chip.tick().unwrap();
        assert_eq!(chip.pc(), 0xFFE);
        // 0x0000 at 0xFFE is illegal, but the word is still fetched
        assert_eq!(
            chip.tick(),
            Err(nb::Error::Other(Error::IllegalOpcode { opcode: 0x0000 })),
        );
        assert_eq!(chip.pc(), 0x1000);
        assert_eq!(
            chip.tick(),
            Err(nb::Error::Other(Error::ProgramCounterOutOfRange { pc: 0x1000 })),
        );

        let mut chip = chip_with(&[0x1F, 0xFF]);
        chip.tick().unwrap();
        assert_eq!(
            chip.tick(),
            Err(nb::Error::Other(Error::ProgramCounterOutOfRange { pc: 0xFFF })),
        );
        assert_eq!(chip.pc(), 0xFFF);
    }

    #[test]
    fn illegal_opcode_is_surfaced_and_skippable() {
        let mut chip = chip_with(&[0x51, 0x21, 0x60, 0x07]);
        assert_eq!(
            chip.tick(),
            Err(nb::Error::Other(Error::IllegalOpcode { opcode: 0x5121 })),
        );
        assert_eq!(chip.pc(), 0x202);
        chip.tick().unwrap();
        assert_eq!(chip.v(0), 7);
    }

    #[test]
    fn load_rejects_oversized_image_untouched() {
        let mut chip = chip_with(&[0x60, 0x05]);
        chip.tick().unwrap();
        assert_eq!(
            chip.load(&[0; 3585]),
            Err(Error::ImageTooLarge { size: 3585 }),
        );
        assert_eq!(chip.v(0), 5);
        assert_eq!(chip.pc(), 0x202);

        assert_eq!(chip.load(&[0xAA; 3584]), Ok(()));
        assert_eq!(chip.memory()[0xFFF], 0xAA);
    }

    #[test]
    fn load_implies_reset() {
        let mut chip = chip_with(&[0x60, 0x05, 0xA3, 0x00, 0x22, 0x00]);
        chip.keypress(0x4, true);
        for _ in 0..3 {
            chip.tick().unwrap();
        }
        assert_eq!(chip.stack_pointer(), 1);

        chip.load(&[0x00, 0xE0]).unwrap();
        assert_eq!(chip.pc(), 0x200);
        assert_eq!(chip.i(), 0);
        assert_eq!(chip.registers(), &[0; 16]);
        assert_eq!(chip.stack_pointer(), 0);
        // stale program bytes don't survive
        assert_eq!(&chip.memory()[0x202..0x206], &[0, 0, 0, 0]);
        assert_eq!(chip.read_display().count_ones(), 0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut chip = chip_with(&[0xF0, 0x0A]);
        chip.tick().unwrap();
        assert!(chip.is_awaiting_key());

        chip.reset();
        let pc = chip.pc();
        let memory = chip.memory().to_vec();
        chip.reset();
        assert!(!chip.is_awaiting_key());
        assert_eq!(chip.pc(), pc);
        assert_eq!(chip.memory(), &memory[..]);
        assert!(chip.memory()[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn wait_for_key() {
        let mut chip = chip_with(&[0xF3, 0x0A, 0x60, 0x01]);
        // held before the wait starts, doesn't count
        chip.keypress(0x2, true);
        chip.tick().unwrap();
        assert!(chip.is_awaiting_key());
        assert_eq!(chip.pc(), 0x200);

        for _ in 0..3 {
            assert_eq!(chip.tick(), Err(nb::Error::WouldBlock));
            assert_eq!(chip.pc(), 0x200);
        }
        chip.keypress(0x2, true);
        chip.keypress(0x2, false);
        assert_eq!(chip.tick(), Err(nb::Error::WouldBlock));

        chip.keypress(0xC, true);
        chip.tick().unwrap();
        assert!(!chip.is_awaiting_key());
        assert_eq!(chip.v(3), 0xC);
        assert_eq!(chip.pc(), 0x202);

        chip.tick().unwrap();
        assert_eq!(chip.v(0), 1);
    }

    #[test]
    fn timers_decay() {
        let mut chip = chip_with(&[0x60, 0x03, 0xF0, 0x15, 0xF0, 0x18]);
        for _ in 0..3 {
            chip.tick().unwrap();
        }
        assert_eq!(chip.delay_timer(), 3);
        assert_eq!(chip.sound_timer(), 3);
        assert!(chip.context().is_sound_on());

        chip.tick_timers();
        assert_eq!(chip.delay_timer(), 2);
        assert!(chip.context().is_sound_on());
        chip.tick_timers();
        chip.tick_timers();
        assert_eq!(chip.delay_timer(), 0);
        assert_eq!(chip.sound_timer(), 0);
        assert!(!chip.context().is_sound_on());

        chip.tick_timers();
        assert_eq!(chip.delay_timer(), 0);
        assert_eq!(chip.context().sound_switches(), 2);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut chip = Plum8::new(TestingContext::new(0));
        chip.keypress(0x10, true);
        chip.keypress(0xFF, true);
        assert!(!chip.keypad.as_array().iter().any(|&k| k));
    }

    #[test]
    fn draws_font_glyphs() {
        use crate::utils::testing::ToMask;

        // F digit at (0, 0), 5 digit at (6, 1)
        let mut chip = chip_with(&[
            0x60, 0x0F, 0xF0, 0x29, 0xD1, 0x15,
            0x60, 0x05, 0xF0, 0x29, 0x61, 0x06, 0x62, 0x01, 0xD1, 0x25,
        ]);
        for _ in 0..8 {
            chip.tick().unwrap();
        }
        assert_eq!(chip.v(0xF), 0);
        assert_eq!(
            chip.read_display().to_mask(),
            "
                ####......
                #.....####
                ####..#...
                #.....####
                #........#
                ......####
            "
            .to_mask(),
        );
    }

    #[test]
    fn glyph_lands_where_pointed_at() {
        use crate::utils::testing::ToMask;

        let eight = "
            ####
            #..#
            ####
            #..#
            ####
        "
        .to_mask();
        for &(x, y) in &[(0u8, 0u8), (13, 7), (60, 27)] {
            let mut chip = chip_with(&[0x60, 0x08, 0xF0, 0x29, 0x61, x, 0x62, y, 0xD1, 0x25]);
            for _ in 0..5 {
                chip.tick().unwrap();
            }
            assert_eq!(
                chip.read_display().to_mask(),
                eight.offset(x as usize, y as usize),
                "glyph at ({}, {})",
                x,
                y
            );
        }
    }

    #[test]
    fn draw_screen_scales() {
        let mut chip = chip_with(&[0xD0, 0x01]);
        chip.tick().unwrap();
        // glyph 0 top row is 0xF0
        let rows: std::vec::Vec<std::vec::Vec<bool>> = chip
            .draw_screen(2)
            .map(|row| row.copied().collect())
            .collect();
        assert_eq!(rows.len(), 64);
        assert!(rows.iter().all(|row| row.len() == 128));
        assert!(rows[0][..8].iter().all(|&p| p));
        assert!(rows[1][..8].iter().all(|&p| p));
        assert!(!rows[0][8]);
        assert!(!rows[2][0]);
    }
}
