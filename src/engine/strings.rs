//! The four open strings of the cello and the fifths between neighbours.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StringId {
    C2,
    G2,
    D3,
    A3,
}

impl StringId {
    pub fn as_str(self) -> &'static str {
        match self {
            StringId::C2 => "C2",
            StringId::G2 => "G2",
            StringId::D3 => "D3",
            StringId::A3 => "A3",
        }
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringDefinition {
    pub id: StringId,
    /// Semitone index; 69 is A4.
    pub pitch: u8,
    pub name: &'static str,
    pub label: &'static str,
}

/// A fifth between two neighbouring strings, by index into `CELLO_STRINGS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub low: usize,
    pub high: usize,
}

impl IntervalDefinition {
    pub fn low_string(&self) -> &'static StringDefinition {
        &CELLO_STRINGS[self.low]
    }

    pub fn high_string(&self) -> &'static StringDefinition {
        &CELLO_STRINGS[self.high]
    }
}

/// Open strings, lowest first.
pub static CELLO_STRINGS: [StringDefinition; 4] = [
    StringDefinition {
        id: StringId::C2,
        pitch: 36,
        name: "C (Do)",
        label: "C (Do) - lowest string",
    },
    StringDefinition {
        id: StringId::G2,
        pitch: 43,
        name: "G (Sol)",
        label: "G (Sol)",
    },
    StringDefinition {
        id: StringId::D3,
        pitch: 50,
        name: "D (Re)",
        label: "D (Re)",
    },
    StringDefinition {
        id: StringId::A3,
        pitch: 57,
        name: "A (La)",
        label: "A (La) - highest string",
    },
];

pub static CELLO_INTERVALS: [IntervalDefinition; 3] = [
    IntervalDefinition {
        id: "C-G",
        label: "C (Do) - G (Sol)",
        low: 0,
        high: 1,
    },
    IntervalDefinition {
        id: "G-D",
        label: "G (Sol) - D (Re)",
        low: 1,
        high: 2,
    },
    IntervalDefinition {
        id: "D-A",
        label: "D (Re) - A (La)",
        low: 2,
        high: 3,
    },
];

pub fn string_at(index: usize) -> Option<&'static StringDefinition> {
    CELLO_STRINGS.get(index)
}
