use crate::width::Width;
use strum::{Display, EnumString};

/// Data-reservation directives. They encode to zero bytes of their width
/// instead of an instruction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Pseudo {
    #[strum(serialize = "ALLOC_BYTE")]
    AllocByte,
    #[strum(serialize = "ALLOC_SHORT")]
    AllocShort,
    #[strum(serialize = "ALLOC_LONG")]
    AllocLong,
}

impl Pseudo {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(p) => Ok(p),
            Err(_) => Err(format!("Unknown directive: {s}")),
        }
    }

    pub fn width(self) -> Width {
        match self {
            Pseudo::AllocByte => Width::BYTE,
            Pseudo::AllocShort => Width::SHORT,
            Pseudo::AllocLong => Width::LONG,
        }
    }
}

#[test]
fn test() {
    assert_eq!(Pseudo::parse("alloc_byte"), Ok(Pseudo::AllocByte));
    assert_eq!(Pseudo::AllocShort.width(), Width::SHORT);
    assert_eq!(Pseudo::AllocLong.to_string(), "ALLOC_LONG");
    assert!(Pseudo::parse("ALLOC").is_err());
}
