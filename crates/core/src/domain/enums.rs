//! Domain enumerations shared across the table.
//!
//! Discriminant values are embedded in composite key segments and are part
//! of the persisted-state contract: once data exists under them they must
//! never change. New variants may only be appended with fresh values.

use serde::{Deserialize, Serialize};

/// Sentinel year selecting the all-time ranking scope.
pub const YEAR_ALL: u16 = 0;

/// How a ranking's points were accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingType {
    Points = 1,
    BestResults = 2,
}

impl RankingType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Points),
            2 => Some(Self::BestResults),
            _ => None,
        }
    }
}

/// Competition discipline. `Overall` aggregates every discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discipline {
    Overall = 0,
    Trickline = 1,
    Speedline = 2,
    Highline = 3,
    Freestyle = 4,
}

impl Discipline {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Overall),
            1 => Some(Self::Trickline),
            2 => Some(Self::Speedline),
            3 => Some(Self::Highline),
            4 => Some(Self::Freestyle),
            _ => None,
        }
    }
}

/// Gender category. `All` is the combined scope, not an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    All = 0,
    Men = 1,
    Women = 2,
}

impl Gender {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::All),
            1 => Some(Self::Men),
            2 => Some(Self::Women),
            _ => None,
        }
    }
}

/// Age category. `All` is the combined scope, not an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    All = 0,
    Youth = 1,
    Junior = 2,
    Open = 3,
    Masters = 4,
}

impl AgeCategory {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::All),
            1 => Some(Self::Youth),
            2 => Some(Self::Junior),
            3 => Some(Self::Open),
            4 => Some(Self::Masters),
            _ => None,
        }
    }
}

/// Contest size class. Passthrough only, never key-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContestSize {
    Local = 1,
    National = 2,
    International = 3,
    WorldCup = 4,
}

impl ContestSize {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Local),
            2 => Some(Self::National),
            3 => Some(Self::International),
            4 => Some(Self::WorldCup),
            _ => None,
        }
    }
}
