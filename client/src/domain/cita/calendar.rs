//! Calendar and list projections over appointment collections.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Cita, CitaStatus};
use crate::domain::UserId;

/// A marked calendar day and how many appointments fall on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMark {
    pub date: NaiveDate,
    pub count: usize,
}

/// Mark every date holding at least one appointment, in date order.
pub fn calendar_marks(citas: &[Cita]) -> Vec<CalendarMark> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for cita in citas {
        *counts.entry(cita.date()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| CalendarMark { date, count })
        .collect()
}

/// Appointments falling on `date`, for the day view under the calendar.
pub fn citas_on(citas: &[Cita], date: NaiveDate) -> Vec<Cita> {
    citas
        .iter()
        .filter(|cita| cita.date() == date)
        .cloned()
        .collect()
}

/// Appointments booked for `patient`.
pub fn citas_for_patient(citas: &[Cita], patient: &UserId) -> Vec<Cita> {
    citas
        .iter()
        .filter(|cita| &cita.patient().id == patient)
        .cloned()
        .collect()
}

/// Appointments grouped the way list screens show them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitaSections {
    pub pendientes: Vec<Cita>,
    pub aprobadas: Vec<Cita>,
    pub finalizadas: Vec<Cita>,
    pub canceladas: Vec<Cita>,
}

impl CitaSections {
    /// Section holding appointments in `status`.
    pub fn section(&self, status: CitaStatus) -> &[Cita] {
        match status {
            CitaStatus::Pendiente => &self.pendientes,
            CitaStatus::Aprobado => &self.aprobadas,
            CitaStatus::Finalizado => &self.finalizadas,
            CitaStatus::Cancelado => &self.canceladas,
        }
    }
}

/// Split appointments by status, each section ordered by date then hour.
pub fn partition_by_status(citas: &[Cita]) -> CitaSections {
    let mut sorted = citas.to_vec();
    sorted.sort_by_key(|cita| (cita.date(), cita.time()));

    let mut sections = CitaSections::default();
    for cita in sorted {
        let bucket = match cita.status() {
            CitaStatus::Pendiente => &mut sections.pendientes,
            CitaStatus::Aprobado => &mut sections.aprobadas,
            CitaStatus::Finalizado => &mut sections.finalizadas,
            CitaStatus::Cancelado => &mut sections.canceladas,
        };
        bucket.push(cita);
    }
    sections
}
