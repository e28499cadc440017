use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Instrument track as numbered by the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(u16)]
pub enum Instrument {
    #[strum(serialize = "Lead Guitar")]
    LeadGuitar = 0,
    Bass = 1,
    Rhythm = 2,
    Keys = 3,
    Drums = 4,
    #[strum(serialize = "GH Live Guitar")]
    GhlGuitar = 5,
    #[strum(serialize = "GH Live Bass")]
    GhlBass = 6,
}

impl Instrument {
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Instrument parameter used by the online chart catalog's search URLs
    pub fn catalog_param(&self) -> &'static str {
        match self {
            Self::LeadGuitar => "guitar",
            Self::Bass => "bass",
            Self::Rhythm => "rhythm",
            Self::Keys => "keys",
            Self::Drums => "drums",
            Self::GhlGuitar => "guitarghl",
            Self::GhlBass => "bassghl",
        }
    }

    /// Display name for a raw enumerator, including ones this crate doesn't know
    pub fn label(value: u16) -> String {
        match Self::from_u16(value) {
            Some(instrument) => instrument.name().to_string(),
            None => format!("Unknown ({})", value),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
    Expert = 3,
}

impl Difficulty {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Single-letter form used in compact listings
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Easy => "E",
            Self::Medium => "M",
            Self::Hard => "H",
            Self::Expert => "X",
        }
    }

    pub fn label(value: u8) -> String {
        match Self::from_u8(value) {
            Some(difficulty) => difficulty.name().to_string(),
            None => format!("Unknown ({})", value),
        }
    }
}
