use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
pub enum Reg {
    A = 1,
    B = 2,
    C = 3,
    D = 4,
    IP = 5,
    SP = 6,
    FLAGS = 7,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(r) => Ok(r),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn code(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("a"), Ok(Reg::A));
    assert_eq!(Reg::parse("Flags"), Ok(Reg::FLAGS));
    assert_eq!(Reg::SP.code(), 6);
    assert_eq!(Reg::try_from(7u8), Ok(Reg::FLAGS));
    assert!(Reg::parse("hoge").is_err());
    assert!(Reg::try_from(0u8).is_err());
}
