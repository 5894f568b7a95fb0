//! Appointment and observation endpoints.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;

use super::dto::{CancelCitaDto, CitaDto, CreateCitaDto, UpdateCitaDto};
use super::gateway::{ApiGateway, decode, decode_optional};
use crate::domain::ports::{CitasGateway, GatewayError};
use crate::domain::wire::format_date;
use crate::domain::{
    CancelReason, Cita, CitaId, CitaUpdate, Description, NewCita, NewDescription, OccupiedHours,
    UserId,
};

fn into_cita(dto: CitaDto) -> Result<Cita, GatewayError> {
    dto.into_domain().map_err(GatewayError::decode)
}

#[async_trait]
impl CitasGateway for ApiGateway {
    async fn create(&self, cita: &NewCita) -> Result<Cita, GatewayError> {
        let dto: CitaDto = self
            .send_json(Method::POST, "api/citas", &CreateCitaDto::from(cita))
            .await?;
        into_cita(dto)
    }

    async fn list(&self) -> Result<Vec<Cita>, GatewayError> {
        let dtos: Vec<CitaDto> = self.get_json("api/citas").await?;
        dtos.into_iter().map(into_cita).collect()
    }

    async fn update(&self, id: &CitaId, update: &CitaUpdate) -> Result<Cita, GatewayError> {
        let dto: CitaDto = self
            .send_json(
                Method::POST,
                &format!("api/citas/{id}"),
                &UpdateCitaDto::from(update),
            )
            .await?;
        into_cita(dto)
    }

    async fn delete(&self, id: &CitaId) -> Result<(), GatewayError> {
        self.delete_path(&format!("api/citas/{id}")).await
    }

    async fn cancel(&self, id: &CitaId, reason: &CancelReason) -> Result<Cita, GatewayError> {
        let dto: CitaDto = self
            .send_json(
                Method::PUT,
                &format!("api/citas/{id}/cancelar"),
                &CancelCitaDto::from(reason),
            )
            .await?;
        into_cita(dto)
    }

    async fn occupied_hours(
        &self,
        date: NaiveDate,
        doctor: &UserId,
    ) -> Result<OccupiedHours, GatewayError> {
        let builder = self
            .request(Method::GET, "api/citas/hours")
            .await?
            .query(&[("date", format_date(date).as_str()), ("doctorId", doctor.as_ref())]);
        let body = self.execute(builder).await?;
        Ok(decode_optional(&body)?.unwrap_or_default())
    }

    async fn create_description(&self, note: &NewDescription) -> Result<(), GatewayError> {
        self.send_json_unit(Method::POST, "api/description", note)
            .await
    }

    async fn description_for(&self, id: &CitaId) -> Result<Option<Description>, GatewayError> {
        let path = format!("api/description/byCita/{id}");
        match self.get_bytes(&path).await {
            Ok(body) => decode_optional(&body),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
