use core::convert::TryFrom;
use core::fmt;

use crate::error::Error;

/// Decoded CHIP-8 instruction, one variant per legal word pattern
///
/// Variant names spell the pattern, `x`/`y` are register indices, `kk` an
/// immediate byte, `nnn` an address and `n` a nibble.
///
/// ```
/// use core::convert::TryFrom;
/// use plum8::opcode::OpCode;
///
/// assert_eq!(
///     OpCode::try_from(0xD125u16),
///     Ok(OpCode::_DXYN { x: 0x1, y: 0x2, n: 0x5 }),
/// );
/// assert!(OpCode::try_from(0x0123u16).is_err());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpCode {
    /// CLS
    _00E0,
    /// RET, pops the return address
    _00EE,
    /// pc = nnn
    _1NNN { nnn: u16 },
    /// push pc, pc = nnn
    _2NNN { nnn: u16 },
    /// skip if Vx == kk
    _3XKK { x: u8, kk: u8 },
    /// skip if Vx != kk
    _4XKK { x: u8, kk: u8 },
    /// skip if Vx == Vy
    _5XY0 { x: u8, y: u8 },
    /// Vx = kk
    _6XKK { x: u8, kk: u8 },
    /// Vx += kk, wrapping, VF untouched
    _7XKK { x: u8, kk: u8 },
    /// Vx = Vy
    _8XY0 { x: u8, y: u8 },
    /// Vx |= Vy
    _8XY1 { x: u8, y: u8 },
    /// Vx &= Vy
    _8XY2 { x: u8, y: u8 },
    /// Vx ^= Vy
    _8XY3 { x: u8, y: u8 },
    /// Vx += Vy, VF = carry
    _8XY4 { x: u8, y: u8 },
    /// Vx -= Vy, VF = no borrow
    _8XY5 { x: u8, y: u8 },
    /// Vx >>= 1, VF = shifted out bit
    _8XY6 { x: u8, y: u8 },
    /// Vx = Vy - Vx, VF = no borrow
    _8XY7 { x: u8, y: u8 },
    /// Vx <<= 1, VF = shifted out bit
    _8XYE { x: u8, y: u8 },
    /// skip if Vx != Vy
    _9XY0 { x: u8, y: u8 },
    /// I = nnn
    _ANNN { nnn: u16 },
    /// pc = nnn + V0
    _BNNN { nnn: u16 },
    /// Vx = random & kk
    _CXKK { x: u8, kk: u8 },
    /// XOR an `n` rows tall sprite from I at (Vx, Vy), VF = collision
    _DXYN { x: u8, y: u8, n: u8 },
    /// skip if key Vx is down
    _EX9E { x: u8 },
    /// skip if key Vx is up
    _EXA1 { x: u8 },
    /// Vx = delay timer
    _FX07 { x: u8 },
    /// block until a key is pressed, Vx = key
    _FX0A { x: u8 },
    /// delay timer = Vx
    _FX15 { x: u8 },
    /// sound timer = Vx
    _FX18 { x: u8 },
    /// I += Vx
    _FX1E { x: u8 },
    /// I = address of font glyph Vx
    _FX29 { x: u8 },
    /// memory[I..I + 3] = decimal digits of Vx
    _FX33 { x: u8 },
    /// memory[I..=I + x] = V0..=Vx
    _FX55 { x: u8 },
    /// V0..=Vx = memory[I..=I + x]
    _FX65 { x: u8 },
}

/// A raw instruction word split into its four nibbles, most significant first
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Nibbles(u8, u8, u8, u8);

impl From<u16> for Nibbles {
    fn from(raw: u16) -> Self {
        let nibble = |shift: u16| ((raw >> shift) & 0xF) as u8;
        Nibbles(nibble(12), nibble(8), nibble(4), nibble(0))
    }
}

impl Nibbles {
    fn kk(self) -> u8 {
        self.2 << 4 | self.3
    }

    fn nnn(self) -> u16 {
        u16::from(self.1) << 8 | u16::from(self.kk())
    }
}

impl TryFrom<u16> for OpCode {
    type Error = Error;

    #[rustfmt::skip]
    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        use OpCode::*;

        let word = Nibbles::from(raw);
        let Nibbles(_, x, y, n) = word;
        let (kk, nnn) = (word.kk(), word.nnn());

        let opcode = match word {
            Nibbles(0x0, 0x0, 0xE, 0x0) => _00E0,
            Nibbles(0x0, 0x0, 0xE, 0xE) => _00EE,
            Nibbles(0x1, ..)            => _1NNN { nnn },
            Nibbles(0x2, ..)            => _2NNN { nnn },
            Nibbles(0x3, ..)            => _3XKK { x, kk },
            Nibbles(0x4, ..)            => _4XKK { x, kk },
            Nibbles(0x5, _, _, 0x0)     => _5XY0 { x, y },
            Nibbles(0x6, ..)            => _6XKK { x, kk },
            Nibbles(0x7, ..)            => _7XKK { x, kk },
            Nibbles(0x8, _, _, 0x0)     => _8XY0 { x, y },
            Nibbles(0x8, _, _, 0x1)     => _8XY1 { x, y },
            Nibbles(0x8, _, _, 0x2)     => _8XY2 { x, y },
            Nibbles(0x8, _, _, 0x3)     => _8XY3 { x, y },
            Nibbles(0x8, _, _, 0x4)     => _8XY4 { x, y },
            Nibbles(0x8, _, _, 0x5)     => _8XY5 { x, y },
            Nibbles(0x8, _, _, 0x6)     => _8XY6 { x, y },
            Nibbles(0x8, _, _, 0x7)     => _8XY7 { x, y },
            Nibbles(0x8, _, _, 0xE)     => _8XYE { x, y },
            Nibbles(0x9, _, _, 0x0)     => _9XY0 { x, y },
            Nibbles(0xA, ..)            => _ANNN { nnn },
            Nibbles(0xB, ..)            => _BNNN { nnn },
            Nibbles(0xC, ..)            => _CXKK { x, kk },
            Nibbles(0xD, ..)            => _DXYN { x, y, n },
            Nibbles(0xE, _, 0x9, 0xE)   => _EX9E { x },
            Nibbles(0xE, _, 0xA, 0x1)   => _EXA1 { x },
            Nibbles(0xF, _, 0x0, 0x7)   => _FX07 { x },
            Nibbles(0xF, _, 0x0, 0xA)   => _FX0A { x },
            Nibbles(0xF, _, 0x1, 0x5)   => _FX15 { x },
            Nibbles(0xF, _, 0x1, 0x8)   => _FX18 { x },
            Nibbles(0xF, _, 0x1, 0xE)   => _FX1E { x },
            Nibbles(0xF, _, 0x2, 0x9)   => _FX29 { x },
            Nibbles(0xF, _, 0x3, 0x3)   => _FX33 { x },
            Nibbles(0xF, _, 0x5, 0x5)   => _FX55 { x },
            Nibbles(0xF, _, 0x6, 0x5)   => _FX65 { x },
            _ => return Err(Error::IllegalOpcode { opcode: raw }),
        };
        Ok(opcode)
    }
}

/// Assembly-like mnemonic, used for tracing executed instructions
impl fmt::Display for OpCode {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use OpCode::*;
        match *self {
            _00E0             => write!(f, "CLS"),
            _00EE             => write!(f, "RET"),
            _1NNN { nnn }     => write!(f, "JP {:#05x}", nnn),
            _2NNN { nnn }     => write!(f, "CALL {:#05x}", nnn),
            _3XKK { x, kk }   => write!(f, "SE V{:X}, {:#04x}", x, kk),
            _4XKK { x, kk }   => write!(f, "SNE V{:X}, {:#04x}", x, kk),
            _5XY0 { x, y }    => write!(f, "SE V{:X}, V{:X}", x, y),
            _6XKK { x, kk }   => write!(f, "LD V{:X}, {:#04x}", x, kk),
            _7XKK { x, kk }   => write!(f, "ADD V{:X}, {:#04x}", x, kk),
            _8XY0 { x, y }    => write!(f, "LD V{:X}, V{:X}", x, y),
            _8XY1 { x, y }    => write!(f, "OR V{:X}, V{:X}", x, y),
            _8XY2 { x, y }    => write!(f, "AND V{:X}, V{:X}", x, y),
            _8XY3 { x, y }    => write!(f, "XOR V{:X}, V{:X}", x, y),
            _8XY4 { x, y }    => write!(f, "ADD V{:X}, V{:X}", x, y),
            _8XY5 { x, y }    => write!(f, "SUB V{:X}, V{:X}", x, y),
            _8XY6 { x, .. }   => write!(f, "SHR V{:X}", x),
            _8XY7 { x, y }    => write!(f, "SUBN V{:X}, V{:X}", x, y),
            _8XYE { x, .. }   => write!(f, "SHL V{:X}", x),
            _9XY0 { x, y }    => write!(f, "SNE V{:X}, V{:X}", x, y),
            _ANNN { nnn }     => write!(f, "LD I, {:#05x}", nnn),
            _BNNN { nnn }     => write!(f, "JP V0, {:#05x}", nnn),
            _CXKK { x, kk }   => write!(f, "RND V{:X}, {:#04x}", x, kk),
            _DXYN { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            _EX9E { x }       => write!(f, "SKP V{:X}", x),
            _EXA1 { x }       => write!(f, "SKNP V{:X}", x),
            _FX07 { x }       => write!(f, "LD V{:X}, DT", x),
            _FX0A { x }       => write!(f, "LD V{:X}, K", x),
            _FX15 { x }       => write!(f, "LD DT, V{:X}", x),
            _FX18 { x }       => write!(f, "LD ST, V{:X}", x),
            _FX1E { x }       => write!(f, "ADD I, V{:X}", x),
            _FX29 { x }       => write!(f, "LD F, V{:X}", x),
            _FX33 { x }       => write!(f, "LD B, V{:X}", x),
            _FX55 { x }       => write!(f, "LD [I], V{:X}", x),
            _FX65 { x }       => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OpCode::*;
    use super::*;

    #[test]
    fn splits_word_into_fields() {
        let word = Nibbles::from(0xBEEF);
        assert_eq!(word, Nibbles(0xB, 0xE, 0xE, 0xF));
        assert_eq!(word.kk(), 0xEF);
        assert_eq!(word.nnn(), 0xEEF);
        assert_eq!(Nibbles::from(0x0000), Nibbles(0, 0, 0, 0));
    }

    #[test]
    #[rustfmt::skip]
    fn decodes_every_instruction() {
        let table = [
            (0x00E0u16, _00E0),
            (0x00EE, _00EE),
            (0x1F00, _1NNN { nnn: 0xF00 }),
            (0x2345, _2NNN { nnn: 0x345 }),
            (0x3C7F, _3XKK { x: 0xC, kk: 0x7F }),
            (0x4001, _4XKK { x: 0x0, kk: 0x01 }),
            (0x5120, _5XY0 { x: 0x1, y: 0x2 }),
            (0x6FFF, _6XKK { x: 0xF, kk: 0xFF }),
            (0x7E10, _7XKK { x: 0xE, kk: 0x10 }),
            (0x8340, _8XY0 { x: 0x3, y: 0x4 }),
            (0x8341, _8XY1 { x: 0x3, y: 0x4 }),
            (0x8342, _8XY2 { x: 0x3, y: 0x4 }),
            (0x8343, _8XY3 { x: 0x3, y: 0x4 }),
            (0x8344, _8XY4 { x: 0x3, y: 0x4 }),
            (0x8345, _8XY5 { x: 0x3, y: 0x4 }),
            (0x8346, _8XY6 { x: 0x3, y: 0x4 }),
            (0x8347, _8XY7 { x: 0x3, y: 0x4 }),
            (0x834E, _8XYE { x: 0x3, y: 0x4 }),
            (0x9D50, _9XY0 { x: 0xD, y: 0x5 }),
            (0xA050, _ANNN { nnn: 0x050 }),
            (0xB300, _BNNN { nnn: 0x300 }),
            (0xC20F, _CXKK { x: 0x2, kk: 0x0F }),
            (0xD01F, _DXYN { x: 0x0, y: 0x1, n: 0xF }),
            (0xE59E, _EX9E { x: 0x5 }),
            (0xE6A1, _EXA1 { x: 0x6 }),
            (0xF707, _FX07 { x: 0x7 }),
            (0xF80A, _FX0A { x: 0x8 }),
            (0xF915, _FX15 { x: 0x9 }),
            (0xFA18, _FX18 { x: 0xA }),
            (0xFB1E, _FX1E { x: 0xB }),
            (0xFC29, _FX29 { x: 0xC }),
            (0xFD33, _FX33 { x: 0xD }),
            (0xFE55, _FX55 { x: 0xE }),
            (0xFF65, _FX65 { x: 0xF }),
        ];

        for &(raw, expected) in &table {
            assert_eq!(OpCode::try_from(raw), Ok(expected), "{:#06x}", raw);
        }
    }

    #[test]
    fn rejects_words_outside_the_table() {
        let illegal = [
            0x0000u16, 0x0123, 0x00E1, 0x00FF, 0x01E0,
            0x5AB1, 0x5ABF,
            0x8AB8, 0x8ABD, 0x8ABF,
            0x9AB1,
            0xEA9F, 0xEA00,
            0xFA00, 0xFA08, 0xFA30, 0xFAFF,
        ];

        for &raw in &illegal {
            assert_eq!(
                OpCode::try_from(raw),
                Err(Error::IllegalOpcode { opcode: raw }),
            );
        }
    }

    #[test]
    fn mnemonics() {
        assert_eq!(_00E0.to_string(), "CLS");
        assert_eq!(_6XKK { x: 0xA, kk: 0x05 }.to_string(), "LD VA, 0x05");
        assert_eq!(_1NNN { nnn: 0x200 }.to_string(), "JP 0x200");
        assert_eq!(_DXYN { x: 0, y: 1, n: 5 }.to_string(), "DRW V0, V1, 5");
        assert_eq!(_FX55 { x: 3 }.to_string(), "LD [I], V3");
    }
}
