//! Appointments (citas): entity, hour slots, lifecycle rules, and calendar
//! projections.

mod calendar;
mod hours;
mod lifecycle;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{CitaId, SpecialtyId, UserId};

pub use self::calendar::{
    CalendarMark, CitaSections, calendar_marks, citas_for_patient, citas_on, partition_by_status,
};
pub use self::hours::{HOURS_PER_DAY, HourSlot, HourSlotError, OccupiedHours, available_hours};
pub use self::lifecycle::{
    CitaAction, CitaActionKind, Outcome, Transition, TransitionError, authorize_creation,
    available_actions, transition,
};

/// Lifecycle state of an appointment.
///
/// `Finalizado` and `Cancelado` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitaStatus {
    /// Requested by a patient or assistant, awaiting approval.
    Pendiente,
    /// Confirmed by an assistant or doctor.
    Aprobado,
    /// The consultation took place.
    Finalizado,
    /// Called off with a reason.
    Cancelado,
}

impl CitaStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pendiente,
        Self::Aprobado,
        Self::Finalizado,
        Self::Cancelado,
    ];

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finalizado | Self::Cancelado)
    }

    /// Wire name used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Aprobado => "aprobado",
            Self::Finalizado => "finalizado",
            Self::Cancelado => "cancelado",
        }
    }
}

impl fmt::Display for CitaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to another entity, with its display name when the API
/// populated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef<I> {
    pub id: I,
    pub name: Option<String>,
}

impl<I> NamedRef<I> {
    /// Reference without a display name.
    pub fn bare(id: I) -> Self {
        Self { id, name: None }
    }

    /// Display name, falling back to the given placeholder.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}

/// Accepts either a plain id or a populated `{ _id, name }` object.
impl<'de, I: Deserialize<'de>> Deserialize<'de> for NamedRef<I> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<J> {
            Id(J),
            Populated {
                #[serde(rename = "_id")]
                id: J,
                #[serde(default)]
                name: Option<String>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Id(id) => Self::bare(id),
            Repr::Populated { id, name } => Self { id, name },
        })
    }
}

/// Input payload for [`Cita::new`].
#[derive(Debug, Clone)]
pub struct CitaDraft {
    pub id: CitaId,
    pub date: NaiveDate,
    pub time: HourSlot,
    pub specialty: NamedRef<SpecialtyId>,
    pub doctor: NamedRef<UserId>,
    pub patient: NamedRef<UserId>,
    pub status: CitaStatus,
}

/// An appointment linking a patient, doctor, specialty, date and hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cita {
    id: CitaId,
    date: NaiveDate,
    time: HourSlot,
    specialty: NamedRef<SpecialtyId>,
    doctor: NamedRef<UserId>,
    patient: NamedRef<UserId>,
    status: CitaStatus,
}

impl Cita {
    /// Build an appointment from decoded parts.
    pub fn new(draft: CitaDraft) -> Self {
        let CitaDraft {
            id,
            date,
            time,
            specialty,
            doctor,
            patient,
            status,
        } = draft;
        Self {
            id,
            date,
            time,
            specialty,
            doctor,
            patient,
            status,
        }
    }

    /// Server identifier.
    pub fn id(&self) -> &CitaId {
        &self.id
    }

    /// Calendar date of the appointment.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Booked hour.
    pub fn time(&self) -> HourSlot {
        self.time
    }

    /// Specialty the appointment is booked under.
    pub fn specialty(&self) -> &NamedRef<SpecialtyId> {
        &self.specialty
    }

    /// Attending doctor.
    pub fn doctor(&self) -> &NamedRef<UserId> {
        &self.doctor
    }

    /// Patient the appointment is for.
    pub fn patient(&self) -> &NamedRef<UserId> {
        &self.patient
    }

    /// Current lifecycle state.
    pub fn status(&self) -> CitaStatus {
        self.status
    }

    /// Whether the appointment occupies `(date, time)` for its doctor.
    pub fn occupies(&self, date: NaiveDate, time: HourSlot) -> bool {
        self.date == date && self.time == time
    }
}

/// Body of `POST /api/citas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCita {
    pub date: NaiveDate,
    pub time: HourSlot,
    pub specialty: SpecialtyId,
    pub doctor: UserId,
    pub patient: UserId,
}

/// New date and hour chosen while approving an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    pub date: NaiveDate,
    pub time: HourSlot,
}

/// Body of `POST /api/citas/{id}`: a status change with optional edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitaUpdate {
    pub status: CitaStatus,
    pub reschedule: Option<Reschedule>,
}

/// Validation error for free-text notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyNote;

impl fmt::Display for EmptyNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("note text must not be empty")
    }
}

impl std::error::Error for EmptyNote {}

/// Non-blank reason required to cancel an approved appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReason(String);

impl CancelReason {
    /// Trim and validate a cancellation reason.
    pub fn new(reason: &str) -> Result<Self, EmptyNote> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(EmptyNote);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CancelReason {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
