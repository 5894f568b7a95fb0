//! Hourly booking slots and the occupied-hours set.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of bookable slots in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Errors raised while parsing an hour slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HourSlotError {
    /// The hour was outside `0..24`.
    OutOfRange {
        /// Rejected hour.
        hour: u8,
    },
    /// The text was not of the form `H:00`.
    Malformed {
        /// Rejected input.
        raw: String,
    },
}

impl fmt::Display for HourSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { hour } => write!(f, "hour {hour} is outside 0..24"),
            Self::Malformed { raw } => write!(f, "`{raw}` is not an on-the-hour time"),
        }
    }
}

impl std::error::Error for HourSlotError {}

/// One bookable hour of the day.
///
/// The API encodes slots as `H:00` without zero padding (`9:00`, `14:00`).
///
/// # Examples
/// ```
/// use clinica_client::domain::HourSlot;
///
/// let slot: HourSlot = "9:00".parse().unwrap();
/// assert_eq!(slot.hour(), 9);
/// assert_eq!(slot.to_string(), "9:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HourSlot(u8);

impl HourSlot {
    /// Validate an hour in `0..24`.
    pub fn new(hour: u8) -> Result<Self, HourSlotError> {
        if hour >= HOURS_PER_DAY {
            return Err(HourSlotError::OutOfRange { hour });
        }
        Ok(Self(hour))
    }

    /// Hour of the day.
    pub fn hour(self) -> u8 {
        self.0
    }

    /// Every slot of the day in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..HOURS_PER_DAY).map(Self)
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

impl FromStr for HourSlot {
    type Err = HourSlotError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || HourSlotError::Malformed {
            raw: raw.to_owned(),
        };
        let trimmed = raw.trim();
        let (hour, minutes) = trimmed.split_once(':').unwrap_or((trimmed, "00"));
        if minutes != "00" {
            return Err(malformed());
        }
        let hour = hour.parse::<u8>().map_err(|_| malformed())?;
        Self::new(hour)
    }
}

impl From<HourSlot> for String {
    fn from(value: HourSlot) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for HourSlot {
    type Error = HourSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Slots already booked for one `(date, doctor)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupiedHours(BTreeSet<HourSlot>);

impl OccupiedHours {
    /// Empty set, used when a lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `slot` is taken.
    pub fn contains(&self, slot: HourSlot) -> bool {
        self.0.contains(&slot)
    }

    /// Mark `slot` as taken.
    pub fn insert(&mut self, slot: HourSlot) {
        self.0.insert(slot);
    }

    /// Number of taken slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no slot is taken.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Taken slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = HourSlot> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<HourSlot> for OccupiedHours {
    fn from_iter<I: IntoIterator<Item = HourSlot>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Slots the hour picker may offer: the complement of `occupied` in the day.
pub fn available_hours(occupied: &OccupiedHours) -> Vec<HourSlot> {
    HourSlot::all().filter(|slot| !occupied.contains(*slot)).collect()
}
