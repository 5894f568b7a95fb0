//! Appointment state machine.
//!
//! Every status change a screen may request is validated here before a
//! gateway call is made. The server re-checks, but the client never offers
//! or sends a transition this table forbids.

use std::fmt;

use super::{CancelReason, CitaStatus, Reschedule};
use crate::domain::{Error, Role, UserId};

/// Kind of operation requested on an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CitaActionKind {
    /// Book a new appointment.
    Create,
    /// Confirm a pending appointment.
    Approve,
    /// Close an approved appointment after the consultation.
    Finish,
    /// Call off an approved appointment.
    Cancel,
    /// Withdraw a pending request.
    Delete,
}

impl CitaActionKind {
    /// Actions that apply to an existing appointment.
    pub const ON_EXISTING: [Self; 4] = [Self::Approve, Self::Finish, Self::Cancel, Self::Delete];

    fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Approve => "approve",
            Self::Finish => "finish",
            Self::Cancel => "cancel",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CitaActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A requested change with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitaAction {
    /// Approve, optionally moving the appointment to another slot.
    Approve { reschedule: Option<Reschedule> },
    /// Mark as finished.
    Finish,
    /// Cancel with a reason.
    Cancel { reason: CancelReason },
    /// Delete the pending request.
    Delete,
}

impl CitaAction {
    /// Build a cancel action from free text, rejecting blank reasons.
    pub fn cancel(reason: &str) -> Result<Self, TransitionError> {
        let reason = CancelReason::new(reason).map_err(|_| TransitionError::MissingReason)?;
        Ok(Self::Cancel { reason })
    }

    /// Payload-free kind of this action.
    pub fn kind(&self) -> CitaActionKind {
        match self {
            Self::Approve { .. } => CitaActionKind::Approve,
            Self::Finish => CitaActionKind::Finish,
            Self::Cancel { .. } => CitaActionKind::Cancel,
            Self::Delete => CitaActionKind::Delete,
        }
    }
}

/// Where a transition leaves the appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The appointment moves to a new status.
    Status(CitaStatus),
    /// The appointment is removed.
    Deleted,
}

/// A validated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    from: CitaStatus,
    action: CitaActionKind,
    outcome: Outcome,
}

impl Transition {
    /// Status before the transition.
    pub fn from(&self) -> CitaStatus {
        self.from
    }

    /// Action being applied.
    pub fn action(&self) -> CitaActionKind {
        self.action
    }

    /// Resulting state.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}

/// Reasons a transition is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The role may not perform the action.
    Forbidden { role: Role, action: CitaActionKind },
    /// The action does not apply from this status.
    InvalidFrom {
        from: CitaStatus,
        action: CitaActionKind,
    },
    /// The appointment is finished or cancelled.
    Terminal { status: CitaStatus },
    /// A cancellation was requested without a reason.
    MissingReason,
    /// An assistant booked without naming the patient.
    MissingPatient,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forbidden { role, action } => write!(f, "role {role} may not {action} citas"),
            Self::InvalidFrom { from, action } => {
                write!(f, "cannot {action} a cita that is {from}")
            }
            Self::Terminal { status } => write!(f, "cita is {status} and can no longer change"),
            Self::MissingReason => f.write_str("a cancellation reason is required"),
            Self::MissingPatient => f.write_str("a patient must be selected"),
        }
    }
}

impl std::error::Error for TransitionError {}

impl From<TransitionError> for Error {
    fn from(value: TransitionError) -> Self {
        let message = value.to_string();
        match value {
            TransitionError::Forbidden { .. } => Self::forbidden(message),
            TransitionError::InvalidFrom { .. } | TransitionError::Terminal { .. } => {
                Self::conflict(message)
            }
            TransitionError::MissingReason | TransitionError::MissingPatient => {
                Self::invalid_request(message)
            }
        }
    }
}

struct Rule {
    from: CitaStatus,
    actors: &'static [Role],
    outcome: Outcome,
}

fn rule(action: CitaActionKind) -> Option<Rule> {
    let rule = match action {
        CitaActionKind::Create => return None,
        CitaActionKind::Approve => Rule {
            from: CitaStatus::Pendiente,
            actors: &[Role::Asistente, Role::Doctor],
            outcome: Outcome::Status(CitaStatus::Aprobado),
        },
        CitaActionKind::Delete => Rule {
            from: CitaStatus::Pendiente,
            actors: &[Role::Paciente],
            outcome: Outcome::Deleted,
        },
        CitaActionKind::Finish => Rule {
            from: CitaStatus::Aprobado,
            actors: &[Role::Asistente, Role::Doctor],
            outcome: Outcome::Status(CitaStatus::Finalizado),
        },
        CitaActionKind::Cancel => Rule {
            from: CitaStatus::Aprobado,
            actors: &[Role::Paciente, Role::Doctor],
            outcome: Outcome::Status(CitaStatus::Cancelado),
        },
    };
    Some(rule)
}

fn check(role: Role, from: CitaStatus, action: CitaActionKind) -> Result<Transition, TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal { status: from });
    }
    let Some(rule) = rule(action) else {
        return Err(TransitionError::InvalidFrom { from, action });
    };
    if rule.from != from {
        return Err(TransitionError::InvalidFrom { from, action });
    }
    if !rule.actors.contains(&role) {
        return Err(TransitionError::Forbidden { role, action });
    }
    Ok(Transition {
        from,
        action,
        outcome: rule.outcome,
    })
}

/// Validate `action` by `role` on an appointment currently in `from`.
///
/// Terminal statuses are reported first, then a wrong source status, then
/// a role that may not act.
///
/// # Examples
/// ```
/// use clinica_client::domain::{CitaAction, CitaStatus, Outcome, Role, transition};
///
/// let step = transition(Role::Asistente, CitaStatus::Pendiente, &CitaAction::Finish);
/// assert!(step.is_err());
///
/// let step = transition(
///     Role::Doctor,
///     CitaStatus::Pendiente,
///     &CitaAction::Approve { reschedule: None },
/// )
/// .unwrap();
/// assert_eq!(step.outcome(), Outcome::Status(CitaStatus::Aprobado));
/// ```
pub fn transition(
    role: Role,
    from: CitaStatus,
    action: &CitaAction,
) -> Result<Transition, TransitionError> {
    check(role, from, action.kind())
}

/// Actions `role` may take on an appointment in `status`, in button order.
pub fn available_actions(role: Role, status: CitaStatus) -> Vec<CitaActionKind> {
    CitaActionKind::ON_EXISTING
        .into_iter()
        .filter(|action| check(role, status, *action).is_ok())
        .collect()
}

/// Resolve the patient a new booking is for.
///
/// Patients always book for themselves. Assistants must name the patient.
/// Doctors and admins cannot book.
pub fn authorize_creation(
    role: Role,
    actor: &UserId,
    patient: Option<&UserId>,
) -> Result<UserId, TransitionError> {
    match role {
        Role::Paciente => Ok(actor.clone()),
        Role::Asistente => patient.cloned().ok_or(TransitionError::MissingPatient),
        Role::Doctor | Role::Admin => Err(TransitionError::Forbidden {
            role,
            action: CitaActionKind::Create,
        }),
    }
}
