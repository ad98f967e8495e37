//! Core type definitions for generated programs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widest integer type the generator will seed arguments with.
pub const MAX_WIDTH: u32 = 6;

/// Signless integer type `iN`, the only kind of value `comb` operations touch.
///
/// Ordering is by width, which gives the value pool a stable bucket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Type {
    width: u32,
}

impl Type {
    /// The single-bit boolean type.
    pub const I1: Type = Type { width: 1 };

    pub fn integer(width: u32) -> Result<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(Error::Config(format!(
                "integer width {} is outside 1..={}",
                width, MAX_WIDTH
            )));
        }
        Ok(Self { width })
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl Default for Type {
    fn default() -> Self {
        Type::I1
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.width)
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .trim()
            .strip_prefix('i')
            .ok_or_else(|| Error::Parse(format!("expected a type like `i1`, got `{}`", s)))?;
        let width = digits
            .parse::<u32>()
            .map_err(|e| Error::Parse(format!("bad width in `{}`: {}", s, e)))?;
        Type::integer(width)
    }
}

impl TryFrom<String> for Type {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Type> for String {
    fn from(ty: Type) -> Self {
        ty.to_string()
    }
}
