use core::fmt;

/// Conditions surfaced by `Plum8` instead of undefined behaviour
///
/// None of them is recovered from inside the interpreter, it's up to the
/// driving loop to decide whether to halt, abort or (for `IllegalOpcode`)
/// carry on with the next instruction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// Fetch attempted at `pc` while `pc` or `pc + 1` lies outside of memory
    ProgramCounterOutOfRange { pc: u16 },
    /// Fetched word doesn't encode any known instruction
    IllegalOpcode { opcode: u16 },
    /// Subroutine call with 16 return addresses already on the stack
    StackOverflow,
    /// Subroutine return with an empty stack
    StackUnderflow,
    /// Program image doesn't fit between 0x200 and the end of memory
    ImageTooLarge { size: usize },
    /// Instruction touched memory outside of the address space
    AddressOutOfRange { address: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::ProgramCounterOutOfRange { pc } => {
                write!(f, "program counter out of address space: {:#06x}", pc)
            }
            Error::IllegalOpcode { opcode } => write!(f, "illegal opcode: {:#06x}", opcode),
            Error::StackOverflow => write!(f, "cannot enter subroutine, stack is full"),
            Error::StackUnderflow => write!(f, "cannot return, not in subroutine"),
            Error::ImageTooLarge { size } => {
                write!(f, "program image of {} bytes does not fit in memory", size)
            }
            Error::AddressOutOfRange { address } => {
                write!(f, "memory access out of address space: {:#06x}", address)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
