use crate::{op::OpKind, reg::Reg, width::Width};
use color_print::cformat;

/// Every code instruction occupies a fixed 12-byte record.
pub const CODE_SIZE: u32 = 12;

// ----------------------------------------------------------------------------
// Operand

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Reg(Reg),
    Imm(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub deref: bool,
    pub width: Width,
}

impl Operand {
    /// Flags byte: bit3 = register, bit2 = dereferenced, bits1-0 = width-1.
    pub fn flags(&self) -> u8 {
        let reg = matches!(self.kind, OperandKind::Reg(_));
        (u8::from(reg) << 3) | (u8::from(self.deref) << 2) | (self.width as u8 - 1)
    }

    pub fn value(&self) -> u32 {
        match self.kind {
            OperandKind::Reg(r) => r.code() as u32,
            OperandKind::Imm(v) => v,
        }
    }

    /// Inverse of `flags`/`value`.
    pub fn unpack(flags: u8, value: u32) -> Result<Operand, String> {
        if flags & 0xF0 != 0 {
            return Err(format!("Invalid operand flags: {flags:#04X}"));
        }
        let width = Width::try_from((flags & 0b11) + 1)
            .map_err(|_| format!("Invalid width bits in flags: {flags:#04X}"))?;
        let deref = flags & 0b100 != 0;
        let kind = if flags & 0b1000 != 0 {
            let reg = Reg::try_from(value as u8)
                .map_err(|_| format!("Invalid register code: {value}"))?;
            OperandKind::Reg(reg)
        } else {
            OperandKind::Imm(value)
        };
        Ok(Operand { kind, deref, width })
    }

    pub fn cformat(&self) -> String {
        let inner = match self.kind {
            OperandKind::Reg(r) => cformat!("<blue>{}</>", r),
            OperandKind::Imm(v) => cformat!("<yellow>0x{:0>8X}</>", v),
        };
        if self.deref {
            format!("[{inner}]")
        } else {
            inner
        }
    }
}

// ----------------------------------------------------------------------------
// Instruction

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Code {
        kind: OpKind,
        op1: Option<Operand>,
        op2: Option<Operand>,
    },
    Data(Width),
}

impl Inst {
    /// Encoded size in bytes. Known before any symbol is resolved, which is
    /// what makes the two-pass layout possible.
    pub fn size(&self) -> u32 {
        match self {
            Inst::Code { .. } => CODE_SIZE,
            Inst::Data(w) => w.bytes(),
        }
    }

    /// Little-endian record: u16 opcode, u8 op1 flags, u8 op2 flags,
    /// u32 op1 value, u32 op2 value. Data directives are zero-filled.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Inst::Data(w) => vec![0; w.bytes() as usize],
            Inst::Code { kind, op1, op2 } => {
                let mut bytes = Vec::with_capacity(CODE_SIZE as usize);
                bytes.extend_from_slice(&kind.opcode().to_le_bytes());
                bytes.push(op1.map_or(0, |op| op.flags()));
                bytes.push(op2.map_or(0, |op| op.flags()));
                bytes.extend_from_slice(&op1.map_or(0, |op| op.value()).to_le_bytes());
                bytes.extend_from_slice(&op2.map_or(0, |op| op.value()).to_le_bytes());
                bytes
            }
        }
    }

    /// Decode one code record. The mnemonic's arity decides how many operand
    /// slots are live; absent slots must be all zero.
    pub fn decode(bytes: &[u8]) -> Result<Inst, String> {
        let bytes: &[u8; 12] = bytes
            .try_into()
            .map_err(|_| format!("Record must be 12 bytes, got {}", bytes.len()))?;
        let opcode = u16::from_le_bytes([bytes[0], bytes[1]]);
        let kind =
            OpKind::from_opcode(opcode).ok_or(format!("Unknown opcode: {opcode:#06X}"))?;
        let val1 = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let val2 = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let mut slots = [None, None];
        for (i, (flags, value)) in [(bytes[2], val1), (bytes[3], val2)].into_iter().enumerate() {
            if i < kind.arity() {
                slots[i] = Some(Operand::unpack(flags, value)?);
            } else if flags != 0 || value != 0 {
                return Err(format!("Stray operand {} on {kind}", i + 1));
            }
        }
        Ok(Inst::Code {
            kind,
            op1: slots[0],
            op2: slots[1],
        })
    }

    pub fn cformat(&self) -> String {
        match self {
            Inst::Data(w) => cformat!("<cyan>alloc {}</>", w.bytes()),
            Inst::Code { kind, op1, op2 } => {
                let ops = [op1, op2]
                    .into_iter()
                    .flatten()
                    .map(|op| op.cformat())
                    .collect::<Vec<_>>()
                    .join(", ");
                cformat!("<red>{:<6}</>{}", kind.to_string().to_lowercase(), ops)
            }
        }
    }
}
