//! Staff appointment list: approve, reschedule, finish.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use super::checked;
use crate::domain::{
    Cita, CitaId, CitaSections, CitaService, Error, OccupiedHours, Reschedule, SessionManager,
    UserId, partition_by_status,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the appointment list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitasView {
    pub sections: CitaSections,
    /// Occupied hours shown in the edit dialog, keyed by their date.
    pub occupied: Option<(NaiveDate, OccupiedHours)>,
}

/// Controller for the assistant "Citas" and doctor "Agenda" tabs.
pub struct CitasController {
    sessions: Arc<SessionManager>,
    citas: CitaService,
    view: ViewSlot<CitasView>,
}

impl CitasController {
    /// Create a controller with an empty list.
    pub fn new(sessions: Arc<SessionManager>, citas: CitaService) -> Self {
        Self {
            sessions,
            citas,
            view: ViewSlot::default(),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<CitasView> {
        &self.view
    }

    /// Reload the list; on failure the previous sections stay.
    pub async fn refresh(&self) -> Result<(), Toast> {
        let updater = self.view.updater();
        let citas = checked(
            &self.sessions,
            self.citas.list().await,
            "Error al cargar las citas",
        )
        .await?;
        updater.apply(|view| view.sections = partition_by_status(&citas));
        Ok(())
    }

    /// Find a listed appointment by id.
    pub fn find(&self, id: &CitaId) -> Option<Cita> {
        self.view.with(|view| {
            [
                &view.sections.pendientes,
                &view.sections.aprobadas,
                &view.sections.finalizadas,
                &view.sections.canceladas,
            ]
            .into_iter()
            .flatten()
            .find(|cita| cita.id() == id)
            .cloned()
        })
    }

    /// Load occupied hours for the edit dialog.
    pub async fn hours_for(&self, date: NaiveDate, doctor: &UserId) -> Result<(), Toast> {
        let updater = self.view.updater();
        let occupied = checked(
            &self.sessions,
            self.citas.occupied_hours(date, doctor).await,
            "Error al cargar las horas",
        )
        .await?;
        updater.apply(|view| view.occupied = Some((date, occupied)));
        Ok(())
    }

    /// Approve `cita`, optionally moving it to another slot.
    pub async fn approve(&self, cita: &Cita, reschedule: Option<Reschedule>) -> Toast {
        let (success, fallback) = match reschedule {
            Some(_) => ("Cita actualizada correctamente!", "Error al actualizar la cita!"),
            None => ("Cita aprobada correctamente!", "Error al aprobar la cita!"),
        };
        let result = match self.sessions.require() {
            Ok(session) => self.citas.approve(&session, cita, reschedule).await,
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, fallback).await {
            Ok(approved) => {
                if let Some(target) = reschedule {
                    let occupied = approved.occupied.unwrap_or_default();
                    self.view
                        .updater()
                        .apply(|view| view.occupied = Some((target.date, occupied)));
                }
                self.refresh_quietly().await;
                Toast::success(success)
            }
            Err(toast) => toast,
        }
    }

    /// Mark `cita` as finished.
    pub async fn finish(&self, cita: &Cita) -> Toast {
        let result = match self.sessions.require() {
            Ok(session) => self.citas.finish(&session, cita).await,
            Err(err) => Err::<Cita, Error>(err),
        };
        match checked(&self.sessions, result, "Error al finalizar la cita!").await {
            Ok(_) => {
                self.refresh_quietly().await;
                Toast::success("Cita finalizada correctamente!")
            }
            Err(toast) => toast,
        }
    }

    async fn refresh_quietly(&self) {
        if let Err(toast) = self.refresh().await {
            warn!(message = %toast.message, "list reload after update failed");
        }
    }
}
