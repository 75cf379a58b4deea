use arch::{
    inst::{self, Inst, OperandKind},
    op::OpKind,
    pseudo::Pseudo,
    reg::Reg,
    width::Width,
};
use std::num::ParseIntError;

use crate::{error::Error, label::Symbols};

// ----------------------------------------------------------------------------
// Label

/// Strip a leading `ident:` label. Returns the label (case preserved) and the
/// remainder of the line; a line that carries no label comes back untouched.
pub fn strip_label(line: &str) -> (Option<&str>, &str) {
    let trimmed = line.trim_start();
    match trimmed.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return (None, line),
    }
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    let (ident, rest) = trimmed.split_at(end);
    match rest.trim_start().strip_prefix(':') {
        Some(after) => (Some(ident), after),
        None => (None, line),
    }
}

// ----------------------------------------------------------------------------
// Lexer

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOperand {
    pub size: Option<Width>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub mnemonic: String,
    pub op1: Option<RawOperand>,
    pub op2: Option<RawOperand>,
}

/// Lex one line (label already stripped) into mnemonic and operand tokens.
/// `Ok(None)` means the line is blank or a comment.
pub fn tokenize(code: &str) -> Result<Option<Tokens>, Error> {
    let code = match code.find(['#', ';']) {
        Some(idx) => &code[..idx],
        None => code,
    };
    let code = code.trim();
    if code.is_empty() {
        return Ok(None);
    }

    let end = code
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(code.len());
    let (mnemonic, rest) = code.split_at(end);
    if mnemonic.is_empty() {
        return Err(Error::Syntax(format!("expected mnemonic at `{code}`")));
    }
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Err(Error::Syntax(format!("unexpected character at `{rest}`")));
    }

    let rest = rest.trim();
    let (op1, op2) = if rest.is_empty() {
        (None, None)
    } else {
        let mut parts = rest.split(',');
        let op1 = parts.next().map(raw_operand).transpose()?;
        let op2 = parts.next().map(raw_operand).transpose()?;
        if parts.next().is_some() {
            return Err(Error::Syntax(format!("too many operands at `{rest}`")));
        }
        (op1, op2)
    };

    Ok(Some(Tokens {
        mnemonic: mnemonic.to_string(),
        op1,
        op2,
    }))
}

/// One comma-separated operand field: `[size] text`.
fn raw_operand(part: &str) -> Result<RawOperand, Error> {
    let words: Vec<&str> = part.split_whitespace().collect();
    let (size, text) = match words.as_slice() {
        [text] => (None, *text),
        [size, text] => (Some(Width::parse(size).map_err(Error::Syntax)?), *text),
        [] => return Err(Error::Syntax("missing operand".to_string())),
        _ => return Err(Error::Syntax(format!("invalid operand `{}`", part.trim()))),
    };
    if !text
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '[' | ']'))
    {
        return Err(Error::Syntax(format!("bad operand at `{text}`")));
    }
    Ok(RawOperand {
        size,
        text: text.to_string(),
    })
}

// ----------------------------------------------------------------------------
// Operand

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Reg(Reg),
    Imm(u32),
    /// Unresolved until pass 2 replaces it with the label's address.
    Sym(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub value: Value,
    pub deref: bool,
    pub width: Width,
}

impl Operand {
    pub fn build(raw: &RawOperand) -> Result<Operand, Error> {
        let width = raw.size.unwrap_or_default();
        let (text, deref) = match raw.text.strip_prefix('[') {
            Some(inner) => match inner.strip_suffix(']') {
                Some(inner) => (inner, true),
                None => {
                    return Err(Error::Syntax(format!(
                        "unbalanced brackets in `{}`",
                        raw.text
                    )))
                }
            },
            None => (raw.text.as_str(), false),
        };
        if text.contains(['[', ']']) {
            return Err(Error::Syntax(format!("bad operand at `{}`", raw.text)));
        }
        Ok(Operand {
            value: Value::classify(text)?,
            deref,
            width,
        })
    }
}

impl Value {
    /// Register name, symbolic identifier, or integer literal, in that order.
    fn classify(text: &str) -> Result<Value, Error> {
        if let Ok(reg) = Reg::parse(text) {
            return Ok(Value::Reg(reg));
        }
        match text.chars().next() {
            None => Err(Error::Syntax("empty operand".to_string())),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(Value::Sym(text.to_string())),
            _ => match parse_with_prefix(text) {
                Ok(v) => Ok(Value::Imm(v)),
                Err(_) => Err(Error::Syntax(format!("bad operand at `{text}`"))),
            },
        }
    }

    pub fn resolve(&self, symbols: &Symbols) -> Result<OperandKind, Error> {
        match self {
            Value::Reg(r) => Ok(OperandKind::Reg(*r)),
            Value::Imm(v) => Ok(OperandKind::Imm(*v)),
            Value::Sym(name) => match symbols.get(name) {
                Some(addr) => Ok(OperandKind::Imm(addr)),
                None => Err(Error::Symbol(name.clone())),
            },
        }
    }
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Code {
        kind: OpKind,
        op1: Option<Operand>,
        op2: Option<Operand>,
    },
    Data(Width),
}

impl Stmt {
    pub fn build(tokens: &Tokens) -> Result<Stmt, Error> {
        // Data directives take no operands and skip the arity check.
        if let Ok(pseudo) = Pseudo::parse(&tokens.mnemonic) {
            return Ok(Stmt::Data(pseudo.width()));
        }
        let kind = OpKind::parse(&tokens.mnemonic)
            .map_err(|_| Error::Mnemonic(tokens.mnemonic.to_ascii_uppercase()))?;
        let actual = usize::from(tokens.op1.is_some()) + usize::from(tokens.op2.is_some());
        if kind.arity() != actual {
            return Err(Error::OperandCount {
                mnemonic: kind.to_string(),
                expected: kind.arity(),
                actual,
            });
        }
        let op1 = tokens.op1.as_ref().map(Operand::build).transpose()?;
        let op2 = tokens.op2.as_ref().map(Operand::build).transpose()?;
        Ok(Stmt::Code { kind, op1, op2 })
    }

    /// Encoded size, known during pass 1.
    pub fn size(&self) -> u32 {
        match self {
            Stmt::Code { .. } => inst::CODE_SIZE,
            Stmt::Data(w) => w.bytes(),
        }
    }

    /// Replace symbolic operands with addresses from the frozen table.
    pub fn resolve(&self, symbols: &Symbols) -> Result<Inst, Error> {
        match self {
            Stmt::Data(w) => Ok(Inst::Data(*w)),
            Stmt::Code { kind, op1, op2 } => {
                let resolve = |op: &Option<Operand>| -> Result<Option<inst::Operand>, Error> {
                    op.as_ref()
                        .map(|op| {
                            Ok(inst::Operand {
                                kind: op.value.resolve(symbols)?,
                                deref: op.deref,
                                width: op.width,
                            })
                        })
                        .transpose()
                };
                Ok(Inst::Code {
                    kind: *kind,
                    op1: resolve(op1)?,
                    op2: resolve(op2)?,
                })
            }
        }
    }
}

pub fn parse_with_prefix(s: &str) -> Result<u32, ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(oct) = s.strip_prefix("0o") {
        u32::from_str_radix(oct, 8)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u32::from_str_radix(bin, 2)
    } else {
        s.parse()
    }
}
