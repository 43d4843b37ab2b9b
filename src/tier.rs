//! Difficulty tiers.
//!
//! The set is closed and its order is fixed. Each tier's identifier doubles as
//! its directory name under the store root and its name in the bundled source,
//! so `as_str` must stay stable across releases.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Tier {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    T,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tier '{0}' (expected one of A, B, C, D, E, F, G, H, J, T)")]
pub struct UnknownTier(pub String);

impl Tier {
    /// Every tier in catalog order.
    pub const ALL: [Tier; 10] = [
        Tier::A,
        Tier::B,
        Tier::C,
        Tier::D,
        Tier::E,
        Tier::F,
        Tier::G,
        Tier::H,
        Tier::J,
        Tier::T,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
            Tier::G => "G",
            Tier::H => "H",
            Tier::J => "J",
            Tier::T => "T",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTier(value.to_string()))
    }
}

impl TryFrom<&str> for Tier {
    type Error = UnknownTier;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
