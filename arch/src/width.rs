use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operand width in bytes. Unsized operands default to LONG.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Width {
    BYTE = 1,
    SHORT = 2,
    #[default]
    LONG = 4,
}

impl Width {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(w) => Ok(w),
            Err(_) => Err(format!("Invalid size specifier: {s}")),
        }
    }

    pub fn bytes(self) -> u32 {
        self as u32
    }
}

#[test]
fn test() {
    assert_eq!(Width::parse("byte"), Ok(Width::BYTE));
    assert_eq!(Width::parse("Short"), Ok(Width::SHORT));
    assert_eq!(Width::default(), Width::LONG);
    assert_eq!(Width::LONG.bytes(), 4);
    assert!(Width::parse("word").is_err());
    assert!(Width::try_from(3u8).is_err());
}
