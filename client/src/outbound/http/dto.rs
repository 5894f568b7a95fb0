//! DTOs for the clinic API's JSON bodies.
//!
//! Responses decode into these transport shapes first, then map into domain
//! types in one pass. Request bodies serialize straight from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::wire::{date, option_date};
use crate::domain::{
    CancelReason, Cita, CitaDraft, CitaId, CitaStatus, CitaUpdate, HourSlot, NamedRef, NewCita,
    Session, SpecialtyId, User, UserId,
};
use crate::domain::AuthToken;

/// Error body: `{ "msg": "..." }`.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default, alias = "message")]
    pub(super) msg: Option<String>,
}

/// Login response: the user document with its token alongside.
#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    pub(super) token: String,
    #[serde(flatten)]
    pub(super) user: User,
}

impl LoginResponseDto {
    pub(super) fn into_session(self) -> Result<Session, String> {
        let token = AuthToken::new(self.token).map_err(|err| err.to_string())?;
        Ok(Session::new(self.user, token))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CitaDto {
    #[serde(rename = "_id")]
    pub(super) id: CitaId,
    #[serde(with = "date")]
    pub(super) date: NaiveDate,
    pub(super) time: HourSlot,
    pub(super) specialty: NamedRef<SpecialtyId>,
    pub(super) doctor: NamedRef<UserId>,
    #[serde(default)]
    pub(super) paciente: Option<NamedRef<UserId>>,
    #[serde(default, rename = "idUser")]
    pub(super) id_user: Option<NamedRef<UserId>>,
    pub(super) status: CitaStatus,
}

impl CitaDto {
    pub(super) fn into_domain(self) -> Result<Cita, String> {
        let patient = self
            .paciente
            .or(self.id_user)
            .ok_or_else(|| format!("cita {} has no patient", self.id))?;
        Ok(Cita::new(CitaDraft {
            id: self.id,
            date: self.date,
            time: self.time,
            specialty: self.specialty,
            doctor: self.doctor,
            patient,
            status: self.status,
        }))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateCitaDto<'a> {
    #[serde(with = "date")]
    pub(super) date: NaiveDate,
    pub(super) time: HourSlot,
    pub(super) specialty: &'a SpecialtyId,
    pub(super) doctor: &'a UserId,
    #[serde(rename = "idUser")]
    pub(super) id_user: &'a UserId,
}

impl<'a> From<&'a NewCita> for CreateCitaDto<'a> {
    fn from(value: &'a NewCita) -> Self {
        Self {
            date: value.date,
            time: value.time,
            specialty: &value.specialty,
            doctor: &value.doctor,
            id_user: &value.patient,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateCitaDto {
    pub(super) status: CitaStatus,
    #[serde(with = "option_date", skip_serializing_if = "Option::is_none")]
    pub(super) date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) time: Option<HourSlot>,
}

impl From<&CitaUpdate> for UpdateCitaDto {
    fn from(value: &CitaUpdate) -> Self {
        Self {
            status: value.status,
            date: value.reschedule.map(|target| target.date),
            time: value.reschedule.map(|target| target.time),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CancelCitaDto<'a> {
    pub(super) motivo: &'a str,
}

impl<'a> From<&'a CancelReason> for CancelCitaDto<'a> {
    fn from(value: &'a CancelReason) -> Self {
        Self {
            motivo: value.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct QrCodeDto {
    #[serde(rename = "qrCode")]
    pub(super) qr_code: String,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordDto<'a> {
    pub(super) password: &'a str,
}
