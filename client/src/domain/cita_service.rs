//! Appointment use-cases.
//!
//! Each operation validates the lifecycle rules locally, then performs the
//! gateway calls the screen needs. The server stays authoritative: its
//! rejections come back as [`Error`] values with the server's message.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::ports::{CitasGateway, GatewayError, or_empty};
use crate::domain::{
    CancelReason, Cita, CitaAction, CitaStatus, CitaUpdate, Description, Error, HourSlot, NewCita,
    NewDescription, OccupiedHours, Reschedule, Role, Session, SpecialtyId, TransitionError,
    UserId, authorize_creation, available_hours, transition,
};

/// Message shown when the requested hour is already taken.
pub const SLOT_TAKEN: &str = "Hora no disponible para esa fecha";

/// Form input for booking an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: HourSlot,
    pub specialty: SpecialtyId,
    pub doctor: UserId,
    /// Required when an assistant books; ignored for patients.
    pub patient: Option<UserId>,
}

/// Result of an approval: the updated appointment and, when it was moved,
/// the refreshed occupied hours for its new date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedCita {
    pub cita: Cita,
    pub occupied: Option<OccupiedHours>,
}

/// Appointment service over a [`CitasGateway`].
#[derive(Clone)]
pub struct CitaService {
    gateway: Arc<dyn CitasGateway>,
}

impl CitaService {
    /// Create a service backed by `gateway`.
    pub fn new(gateway: Arc<dyn CitasGateway>) -> Self {
        Self { gateway }
    }

    /// Appointments visible to the caller; a missing list is empty.
    pub async fn list(&self) -> Result<Vec<Cita>, Error> {
        or_empty(self.gateway.list().await).map_err(Error::from)
    }

    /// Hours already booked for `doctor` on `date`.
    pub async fn occupied_hours(
        &self,
        date: NaiveDate,
        doctor: &UserId,
    ) -> Result<OccupiedHours, Error> {
        match self.gateway.occupied_hours(date, doctor).await {
            Ok(hours) => Ok(hours),
            Err(err) if err.is_not_found() => Ok(OccupiedHours::empty()),
            Err(err) => Err(err.into()),
        }
    }

    /// Hours the picker may offer for `doctor` on `date`.
    pub async fn offered_hours(
        &self,
        date: NaiveDate,
        doctor: &UserId,
    ) -> Result<Vec<HourSlot>, Error> {
        let occupied = self.occupied_hours(date, doctor).await?;
        Ok(available_hours(&occupied))
    }

    /// Book a new appointment in `Pendiente`.
    ///
    /// Checks the freshly fetched occupied hours first. When that lookup
    /// fails for any reason but an expired token, the booking is sent anyway
    /// and the server decides. The server's own rejection is returned with
    /// its message unchanged; a bare 400 reads as [`SLOT_TAKEN`].
    pub async fn book(&self, session: &Session, request: BookingRequest) -> Result<Cita, Error> {
        let patient = authorize_creation(
            session.role(),
            session.user_id(),
            request.patient.as_ref(),
        )?;

        match self.occupied_hours(request.date, &request.doctor).await {
            Ok(occupied) if occupied.contains(request.time) => {
                return Err(Error::invalid_request(SLOT_TAKEN));
            }
            Ok(_) => {}
            Err(err) if err.is_unauthorized() => return Err(err),
            Err(err) => warn!(error = %err, "occupied hours unavailable; booking unchecked"),
        }

        let new_cita = NewCita {
            date: request.date,
            time: request.time,
            specialty: request.specialty,
            doctor: request.doctor,
            patient,
        };
        debug!(date = %new_cita.date, time = %new_cita.time, "booking cita");
        self.gateway
            .create(&new_cita)
            .await
            .map_err(|err| match err {
                GatewayError::Unexplained { status: 400, .. } => Error::invalid_request(SLOT_TAKEN),
                other => Error::from(other),
            })
    }

    /// Approve a pending appointment, optionally moving it.
    pub async fn approve(
        &self,
        session: &Session,
        cita: &Cita,
        reschedule: Option<Reschedule>,
    ) -> Result<ApprovedCita, Error> {
        transition(
            session.role(),
            cita.status(),
            &CitaAction::Approve { reschedule },
        )?;

        if let Some(target) = reschedule {
            let occupied = self
                .occupied_hours(target.date, &cita.doctor().id)
                .await?;
            if occupied.contains(target.time) && !cita.occupies(target.date, target.time) {
                return Err(Error::invalid_request(SLOT_TAKEN));
            }
        }

        let update = CitaUpdate {
            status: CitaStatus::Aprobado,
            reschedule,
        };
        let approved = self
            .gateway
            .update(cita.id(), &update)
            .await
            .map_err(Error::from)?;

        let occupied = match reschedule {
            Some(target) => Some(
                self.occupied_hours(target.date, &approved.doctor().id)
                    .await?,
            ),
            None => None,
        };
        Ok(ApprovedCita {
            cita: approved,
            occupied,
        })
    }

    /// Mark an approved appointment as finished.
    pub async fn finish(&self, session: &Session, cita: &Cita) -> Result<Cita, Error> {
        transition(session.role(), cita.status(), &CitaAction::Finish)?;
        let update = CitaUpdate {
            status: CitaStatus::Finalizado,
            reschedule: None,
        };
        self.gateway
            .update(cita.id(), &update)
            .await
            .map_err(Error::from)
    }

    /// Cancel an approved appointment with a non-blank reason.
    ///
    /// The API stores the reason as the appointment's description.
    pub async fn cancel(&self, session: &Session, cita: &Cita, reason: &str) -> Result<Cita, Error> {
        let reason = CancelReason::new(reason).map_err(|_| TransitionError::MissingReason)?;
        transition(
            session.role(),
            cita.status(),
            &CitaAction::Cancel {
                reason: reason.clone(),
            },
        )?;
        self.gateway
            .cancel(cita.id(), &reason)
            .await
            .map_err(Error::from)
    }

    /// Withdraw a pending request.
    pub async fn delete(&self, session: &Session, cita: &Cita) -> Result<(), Error> {
        transition(session.role(), cita.status(), &CitaAction::Delete)?;
        self.gateway.delete(cita.id()).await.map_err(Error::from)
    }

    /// Attach an observation note; staff only, not on cancelled citas.
    pub async fn add_observation(
        &self,
        session: &Session,
        cita: &Cita,
        text: &str,
    ) -> Result<(), Error> {
        if !matches!(session.role(), Role::Asistente | Role::Doctor) {
            return Err(Error::forbidden(format!(
                "role {} may not record observations",
                session.role()
            )));
        }
        if cita.status() == CitaStatus::Cancelado {
            return Err(Error::conflict("cita is cancelado and can no longer change"));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_request("observation text must not be empty"));
        }
        let note = NewDescription {
            cita: cita.id().clone(),
            description: text.to_owned(),
        };
        self.gateway
            .create_description(&note)
            .await
            .map_err(Error::from)
    }

    /// Note stored against an appointment, if any.
    pub async fn description_for(&self, cita: &Cita) -> Result<Option<Description>, Error> {
        match self.gateway.description_for(cita.id()).await {
            Ok(found) => Ok(found),
            Err(GatewayError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[path = "cita_service_tests.rs"]
mod tests;
