/// A two-byte opcode that can be viewed as a single `u16`,
/// as four nibbles, or as the address and constant fields
/// the CHIP-8 instruction formats use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {

    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    /// Combine two bytes fetched from memory, high byte first.
    pub fn new(high: u8, low: u8) -> BitSplitter {
        BitSplitter(high, low)
    }

    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// The four nibbles, most significant first.
    /// For most instructions this is `(family, X, Y, N)`.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.0 >> 4, self.0 & 0x0F, self.1 >> 4, self.1 & 0x0F)
    }

    /// The low byte, `NN`.
    pub fn nn(&self) -> u8 {
        self.1
    }

    /// The low 12 bits, `NNN`.
    pub fn nnn(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}
