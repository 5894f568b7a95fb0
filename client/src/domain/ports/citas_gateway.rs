//! Driven port for appointment endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    CancelReason, Cita, CitaId, CitaUpdate, Description, NewCita, NewDescription, OccupiedHours,
    UserId,
};

use super::GatewayError;

/// Appointment operations exposed by the clinic API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CitasGateway: Send + Sync {
    /// `POST /api/citas`.
    async fn create(&self, cita: &NewCita) -> Result<Cita, GatewayError>;

    /// `GET /api/citas`; the server scopes the list to the caller.
    async fn list(&self) -> Result<Vec<Cita>, GatewayError>;

    /// `POST /api/citas/{id}` with a status and optional new slot.
    async fn update(&self, id: &CitaId, update: &CitaUpdate) -> Result<Cita, GatewayError>;

    /// `DELETE /api/citas/{id}`.
    async fn delete(&self, id: &CitaId) -> Result<(), GatewayError>;

    /// `PUT /api/citas/{id}/cancelar` with `{motivo}`.
    async fn cancel(&self, id: &CitaId, reason: &CancelReason) -> Result<Cita, GatewayError>;

    /// `GET /api/citas/hours?date&doctorId`.
    async fn occupied_hours(
        &self,
        date: NaiveDate,
        doctor: &UserId,
    ) -> Result<OccupiedHours, GatewayError>;

    /// `POST /api/description`.
    async fn create_description(&self, note: &NewDescription) -> Result<(), GatewayError>;

    /// `GET /api/description/byCita/{id}`; absent notes yield `None`.
    async fn description_for(&self, id: &CitaId) -> Result<Option<Description>, GatewayError>;
}
