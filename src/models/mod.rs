use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::AppError;

pub mod destination;
pub mod gemini;

pub use destination::{Destination, SuggestedDestination, Weather};

/// Number of days every price estimate covers
pub const TRIP_DAYS: u32 = 5;

/// Travel-style category used as a search facet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Vibe {
    #[default]
    Tropical,
    Snowy,
    #[serde(rename = "Urban/City")]
    Urban,
    #[serde(rename = "Nature/Mountains")]
    Nature,
    #[serde(rename = "Historic/Cultural")]
    Historic,
    Adventure,
}

impl Vibe {
    /// All vibes in display order
    pub const ALL: [Vibe; 6] = [
        Vibe::Tropical,
        Vibe::Snowy,
        Vibe::Urban,
        Vibe::Nature,
        Vibe::Historic,
        Vibe::Adventure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Vibe::Tropical => "Tropical",
            Vibe::Snowy => "Snowy",
            Vibe::Urban => "Urban/City",
            Vibe::Nature => "Nature/Mountains",
            Vibe::Historic => "Historic/Cultural",
            Vibe::Adventure => "Adventure",
        }
    }
}

impl Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Total trip budget for a 5-day trip, in whole currency units
///
/// Only values in `[MIN, MAX]` that sit on a `STEP` boundary can be built,
/// mirroring the range slider that collects it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub struct Budget(u32);

impl Budget {
    pub const MIN: u32 = 500;
    pub const MAX: u32 = 10_000;
    pub const STEP: u32 = 100;
    pub const DEFAULT: u32 = 2_000;

    pub fn new(value: u32) -> Result<Self, AppError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(AppError::InvalidInput(format!(
                "Budget must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        if (value - Self::MIN) % Self::STEP != 0 {
            return Err(AppError::InvalidInput(format!(
                "Budget must be a multiple of {}, got {}",
                Self::STEP,
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Budget {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Budget::new(value)
    }
}

impl From<Budget> for u32 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

impl Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Criteria for one personalized search, built on form submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCriteria {
    pub origin: String,
    pub budget: Budget,
    pub vibe: Vibe,
}
