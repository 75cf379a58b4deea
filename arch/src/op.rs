use bimap::BiMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
pub enum OpKind {
    NOP,
    HALT,
    INT,
    MOV,
    JMP,
    INC,
    DEC,
    ADD,
    SUB,
    MUL,
    DIV,
    SHOW,
    CMP,
    TEST,
    JZ,
    JNZ,
    JEQ,
    JNEQ,
    JGT,
    JNGT,
    JLT,
    JNLT,
    AND,
    OR,
    XOR,
    NOT,
    PUSH,
    POP,
    CALL,
    RET,
    PUTC,
}

static OPCODES: Lazy<BiMap<OpKind, u16>> =
    Lazy::new(|| OpKind::iter().map(|kind| (kind, kind.opcode())).collect());

impl OpKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Unknown mnemonic: {s}")),
        }
    }

    pub fn from_opcode(code: u16) -> Option<Self> {
        OPCODES.get_by_right(&code).copied()
    }

    pub fn opcode(self) -> u16 {
        use OpKind::*;
        match self {
            NOP => 0x0000,
            HALT => 0x0001,
            INT => 0x0002,
            MOV => 0x0003,
            JMP => 0x0004,
            INC => 0x0006,
            DEC => 0x0007,
            ADD => 0x000A,
            SUB => 0x000B,
            MUL => 0x000C,
            DIV => 0x000D,
            SHOW => 0x0010,
            CMP => 0x0020,
            TEST => 0x0022,
            JZ => 0x0024,
            JNZ => 0x0025,
            JEQ => 0x0026,
            JNEQ => 0x0027,
            JGT => 0x0028,
            JNGT => 0x0029,
            JLT => 0x002A,
            JNLT => 0x002B,
            AND => 0x0040,
            OR => 0x0041,
            XOR => 0x0042,
            NOT => 0x0043,
            PUSH => 0x0050,
            POP => 0x0051,
            CALL => 0x0060,
            RET => 0x0061,
            PUTC => 0x0070,
        }
    }

    /// Number of operands the mnemonic requires.
    pub fn arity(self) -> usize {
        use OpKind::*;
        match self {
            NOP | HALT | INT | RET => 0,
            JMP | INC | DEC | SHOW | TEST | JZ | JNZ | JEQ | JNEQ | JGT | JNGT | JLT | JNLT
            | NOT | PUSH | POP | CALL | PUTC => 1,
            MOV | ADD | SUB | MUL | DIV | CMP | AND | OR | XOR => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(OpKind::parse("mov"), Ok(OpKind::MOV));
        assert_eq!(OpKind::parse("Jnz"), Ok(OpKind::JNZ));
        assert!(OpKind::parse("FROB").is_err());
    }

    #[test]
    fn opcodes() {
        assert_eq!(OpKind::MOV.opcode(), 0x0003);
        assert_eq!(OpKind::PUTC.opcode(), 0x0070);
        assert_eq!(OpKind::from_opcode(0x0061), Some(OpKind::RET));
        assert_eq!(OpKind::from_opcode(0x0005), None);
    }

    #[test]
    fn opcodes_unique() {
        // A collision would drop an entry from the bimap.
        assert_eq!(OPCODES.len(), OpKind::iter().count());
    }

    #[test]
    fn arity() {
        assert_eq!(OpKind::NOP.arity(), 0);
        assert_eq!(OpKind::JMP.arity(), 1);
        assert_eq!(OpKind::MOV.arity(), 2);
    }
}
