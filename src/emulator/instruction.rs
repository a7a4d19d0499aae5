use crate::util::bit_splitter::BitSplitter;
use std::fmt;

/// A wrapper for 12-bit addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for register indices, 0x0 to 0xF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen, // 00E0
    Return, // 00EE
    Sys(Addr), // 0NNN
    Jump(Addr), // 1NNN
    Call(Addr), // 2NNN
    SkipIfEqConst(Reg, Const), // 3XNN
    SkipIfNeqConst(Reg, Const), // 4XNN
    SkipIfEqReg(Reg, Reg), // 5XY0
    LoadConst(Reg, Const), // 6XNN
    AddConst(Reg, Const), // 7XNN
    LoadReg(Reg, Reg), // 8XY0
    Or(Reg, Reg), // 8XY1
    And(Reg, Reg), // 8XY2
    Xor(Reg, Reg), // 8XY3
    AddReg(Reg, Reg), // 8XY4
    SubReg(Reg, Reg), // 8XY5
    ShiftRight(Reg, Reg), // 8XY6
    SubReverse(Reg, Reg), // 8XY7
    ShiftLeft(Reg, Reg), // 8XYE
    SkipIfNeqReg(Reg, Reg), // 9XY0
    LoadI(Addr), // ANNN
    JumpPlusV0(Addr), // BNNN
    Random(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    SkipIfKey(Reg), // EX9E
    SkipIfNotKey(Reg), // EXA1
    LoadDelay(Reg), // FX07
    WaitKey(Reg), // FX0A
    SetDelay(Reg), // FX15
    SetSound(Reg), // FX18
    AddI(Reg), // FX1E
    LoadGlyph(Reg), // FX29
    StoreBcd(Reg), // FX33
    StoreRegs(Reg), // FX55
    LoadRegs(Reg), // FX65
}

impl Instruction {

    pub fn from_u16(value: u16) -> Option<Instruction> {
        Self::decode(BitSplitter::from_u16(value))
    }

    /// Decode the opcode stored as `high`, `low` in memory.
    /// Returns `None` for opcodes outside the instruction set.
    pub fn from_two_u8(high: u8, low: u8) -> Option<Instruction> {
        Self::decode(BitSplitter::new(high, low))
    }

    fn decode(opcode: BitSplitter) -> Option<Instruction> {
        let addr = Addr(opcode.nnn());
        let nn = Const(opcode.nn());
        let instruction = match opcode.nibbles() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (0, _, _, _) => Instruction::Sys(addr),
            (1, _, _, _) => Instruction::Jump(addr),
            (2, _, _, _) => Instruction::Call(addr),
            (3, x, _, _) => Instruction::SkipIfEqConst(Reg(x), nn),
            (4, x, _, _) => Instruction::SkipIfNeqConst(Reg(x), nn),
            (5, x, y, 0) => Instruction::SkipIfEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::LoadConst(Reg(x), nn),
            (7, x, _, _) => Instruction::AddConst(Reg(x), nn),
            (8, x, y, 0) => Instruction::LoadReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::Or(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::And(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::Xor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::AddReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::SubReg(Reg(x), Reg(y)),
            (8, x, y, 6) => Instruction::ShiftRight(Reg(x), Reg(y)),
            (8, x, y, 7) => Instruction::SubReverse(Reg(x), Reg(y)),
            (8, x, y, 0xE) => Instruction::ShiftLeft(Reg(x), Reg(y)),
            (9, x, y, 0) => Instruction::SkipIfNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::LoadI(addr),
            (0xB, _, _, _) => Instruction::JumpPlusV0(addr),
            (0xC, x, _, _) => Instruction::Random(Reg(x), nn),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::SkipIfKey(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::SkipIfNotKey(Reg(x)),
            (0xF, x, 0, 7) => Instruction::LoadDelay(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::WaitKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelay(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSound(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddI(Reg(x)),
            (0xF, x, 2, 9) => Instruction::LoadGlyph(Reg(x)),
            (0xF, x, 3, 3) => Instruction::StoreBcd(Reg(x)),
            (0xF, x, 5, 5) => Instruction::StoreRegs(Reg(x)),
            (0xF, x, 6, 5) => Instruction::LoadRegs(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }
}

/// Assembly-like mnemonics, used when tracing execution.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Sys(Addr(a)) => write!(f, "SYS {:#05x}", a),
            Jump(Addr(a)) => write!(f, "JP {:#05x}", a),
            Call(Addr(a)) => write!(f, "CALL {:#05x}", a),
            SkipIfEqConst(Reg(x), Const(n)) => write!(f, "SE V{:X}, {:#04x}", x, n),
            SkipIfNeqConst(Reg(x), Const(n)) => write!(f, "SNE V{:X}, {:#04x}", x, n),
            SkipIfEqReg(Reg(x), Reg(y)) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadConst(Reg(x), Const(n)) => write!(f, "LD V{:X}, {:#04x}", x, n),
            AddConst(Reg(x), Const(n)) => write!(f, "ADD V{:X}, {:#04x}", x, n),
            LoadReg(Reg(x), Reg(y)) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(Reg(x), Reg(y)) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(Reg(x), Reg(y)) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(Reg(x), Reg(y)) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(Reg(x), Reg(y)) => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubReg(Reg(x), Reg(y)) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(Reg(x), Reg(y)) => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse(Reg(x), Reg(y)) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(Reg(x), Reg(y)) => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipIfNeqReg(Reg(x), Reg(y)) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI(Addr(a)) => write!(f, "LD I, {:#05x}", a),
            JumpPlusV0(Addr(a)) => write!(f, "JP V0, {:#05x}", a),
            Random(Reg(x), Const(n)) => write!(f, "RND V{:X}, {:#04x}", x, n),
            Draw(Reg(x), Reg(y), Const(n)) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipIfKey(Reg(x)) => write!(f, "SKP V{:X}", x),
            SkipIfNotKey(Reg(x)) => write!(f, "SKNP V{:X}", x),
            LoadDelay(Reg(x)) => write!(f, "LD V{:X}, DT", x),
            WaitKey(Reg(x)) => write!(f, "LD V{:X}, K", x),
            SetDelay(Reg(x)) => write!(f, "LD DT, V{:X}", x),
            SetSound(Reg(x)) => write!(f, "LD ST, V{:X}", x),
            AddI(Reg(x)) => write!(f, "ADD I, V{:X}", x),
            LoadGlyph(Reg(x)) => write!(f, "LD F, V{:X}", x),
            StoreBcd(Reg(x)) => write!(f, "LD B, V{:X}", x),
            StoreRegs(Reg(x)) => write!(f, "LD [I], V{:X}", x),
            LoadRegs(Reg(x)) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use test_case::test_case;

    #[test]
    fn opcodes_are_parsed_correctly() {
        assert_eq!(Some(Instruction::ClearScreen), Instruction::from_u16(0x00E0));
        assert_eq!(Some(Instruction::Return), Instruction::from_u16(0x00EE));
        assert_eq!(Some(Instruction::Sys(Addr(0x123))), Instruction::from_u16(0x0123));
        assert_eq!(Some(Instruction::Jump(Addr(0x25))), Instruction::from_u16(0x1025));
        assert_eq!(Some(Instruction::Call(Addr(0x37))), Instruction::from_u16(0x2037));
        assert_eq!(Some(Instruction::SkipIfEqConst(Reg(0xA), Const(8))), Instruction::from_u16(0x3A08));
        assert_eq!(Some(Instruction::SkipIfNeqConst(Reg(0xA), Const(8))), Instruction::from_u16(0x4A08));
        assert_eq!(Some(Instruction::SkipIfEqReg(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x5AB0));
        assert_eq!(Some(Instruction::LoadConst(Reg(0xB), Const(0x23))), Instruction::from_u16(0x6B23));
        assert_eq!(Some(Instruction::AddConst(Reg(0xC), Const(0xA1))), Instruction::from_u16(0x7CA1));
        assert_eq!(Some(Instruction::LoadReg(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x8AB0));
        assert_eq!(Some(Instruction::Or(Reg(0xD), Reg(0xE))), Instruction::from_u16(0x8DE1));
        assert_eq!(Some(Instruction::And(Reg(0xD), Reg(0xE))), Instruction::from_u16(0x8DE2));
        assert_eq!(Some(Instruction::Xor(Reg(0xD), Reg(0xE))), Instruction::from_u16(0x8DE3));
        assert_eq!(Some(Instruction::AddReg(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x8AB4));
        assert_eq!(Some(Instruction::SubReg(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x8AB5));
        assert_eq!(Some(Instruction::ShiftRight(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x8AB6));
        assert_eq!(Some(Instruction::SubReverse(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x8AB7));
        assert_eq!(Some(Instruction::ShiftLeft(Reg(0xA), Reg(0x0))), Instruction::from_u16(0x8A0E));
        assert_eq!(Some(Instruction::SkipIfNeqReg(Reg(0xA), Reg(0xB))), Instruction::from_u16(0x9AB0));
        assert_eq!(Some(Instruction::LoadI(Addr(0x25))), Instruction::from_u16(0xA025));
        assert_eq!(Some(Instruction::JumpPlusV0(Addr(0x25))), Instruction::from_u16(0xB025));
        assert_eq!(Some(Instruction::Random(Reg(0xA), Const(0x23))), Instruction::from_u16(0xCA23));
        assert_eq!(Some(Instruction::Draw(Reg(0xA), Reg(0xB), Const(0xC))), Instruction::from_u16(0xDABC));
        assert_eq!(Some(Instruction::SkipIfKey(Reg(0xA))), Instruction::from_u16(0xEA9E));
        assert_eq!(Some(Instruction::SkipIfNotKey(Reg(0xA))), Instruction::from_u16(0xEAA1));
        assert_eq!(Some(Instruction::LoadDelay(Reg(0xA))), Instruction::from_u16(0xFA07));
        assert_eq!(Some(Instruction::WaitKey(Reg(0xA))), Instruction::from_u16(0xFA0A));
        assert_eq!(Some(Instruction::SetDelay(Reg(0xA))), Instruction::from_u16(0xFA15));
        assert_eq!(Some(Instruction::SetSound(Reg(0xA))), Instruction::from_u16(0xFA18));
        assert_eq!(Some(Instruction::AddI(Reg(0xA))), Instruction::from_u16(0xFA1E));
        assert_eq!(Some(Instruction::LoadGlyph(Reg(0xA))), Instruction::from_u16(0xFA29));
        assert_eq!(Some(Instruction::StoreBcd(Reg(0xA))), Instruction::from_u16(0xFA33));
        assert_eq!(Some(Instruction::StoreRegs(Reg(0xA))), Instruction::from_u16(0xFA55));
        assert_eq!(Some(Instruction::LoadRegs(Reg(0xA))), Instruction::from_u16(0xFA65));
    }

    #[test_case(0x5001 ; "5XY0 with nonzero low nibble")]
    #[test_case(0x9AB1 ; "9XY0 with nonzero low nibble")]
    #[test_case(0x8AB8 ; "undefined arithmetic op")]
    #[test_case(0xEA00 ; "undefined key op")]
    #[test_case(0xFA00 ; "undefined misc op")]
    #[test_case(0xFFFF ; "all ones")]
    fn unknown_opcodes_are_rejected(opcode: u16) {
        assert_eq!(None, Instruction::from_u16(opcode));
    }

    #[test]
    fn from_two_u8_equals_from_u16() {
        assert_eq!(Instruction::from_two_u8(0x12, 0x34), Instruction::from_u16(0x1234));
        assert_eq!(Instruction::from_two_u8(0x2F, 0x2F), Instruction::from_u16(0x2F2F));
        assert_eq!(Instruction::from_two_u8(0x50, 0x01), Instruction::from_u16(0x5001));
    }

    #[test_case(0x00E0 => "CLS")]
    #[test_case(0x2ABC => "CALL 0xabc")]
    #[test_case(0x8AB4 => "ADD VA, VB")]
    #[test_case(0xD125 => "DRW V1, V2, 5")]
    #[test_case(0xF30A => "LD V3, K")]
    fn mnemonics(opcode: u16) -> String {
        Instruction::from_u16(opcode).map(|i| i.to_string()).unwrap_or_default()
    }
}
