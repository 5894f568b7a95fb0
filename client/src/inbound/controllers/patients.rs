//! Assistant patient directory and per-patient appointment history.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use super::checked;
use crate::domain::ports::{AuthGateway, or_empty};
use crate::domain::{
    Cita, CitaSections, CitaService, Error, Reschedule, Role, SessionManager, User, UserId,
    citas_for_patient, citas_on, partition_by_status, users_with_role,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the "Pacientes" tab and its patient detail screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientsView {
    pub patients: Vec<User>,
    /// Patient whose detail screen is open.
    pub selected: Option<User>,
    /// Every appointment of the selected patient.
    pub citas: Vec<Cita>,
    /// Day the history is narrowed to.
    pub day: Option<NaiveDate>,
    /// The shown appointments, grouped by status.
    pub sections: CitaSections,
}

impl PatientsView {
    fn regroup(&mut self) {
        self.sections = match self.day {
            Some(day) => partition_by_status(&citas_on(&self.citas, day)),
            None => partition_by_status(&self.citas),
        };
    }
}

/// Controller for the assistant "Pacientes" tab.
pub struct PatientsController {
    sessions: Arc<SessionManager>,
    citas: CitaService,
    auth: Arc<dyn AuthGateway>,
    view: ViewSlot<PatientsView>,
}

impl PatientsController {
    /// Create a controller with an empty directory.
    pub fn new(sessions: Arc<SessionManager>, citas: CitaService, auth: Arc<dyn AuthGateway>) -> Self {
        Self {
            sessions,
            citas,
            auth,
            view: ViewSlot::default(),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<PatientsView> {
        &self.view
    }

    /// Reload the patient directory; on failure the previous one stays.
    pub async fn load(&self) -> Result<(), Toast> {
        let updater = self.view.updater();
        let users = or_empty(self.auth.list_users().await).map_err(Error::from);
        let users = checked(&self.sessions, users, "Error al cargar los pacientes").await?;
        updater.apply(|view| view.patients = users_with_role(&users, Role::Paciente));
        Ok(())
    }

    /// Open the detail screen of a listed patient.
    pub async fn open(&self, patient: &UserId) -> Result<(), Toast> {
        let found = self.view.with(|view| {
            view.patients
                .iter()
                .find(|user| user.id() == patient)
                .cloned()
        });
        let Some(found) = found else {
            return Err(Toast::error("Paciente no encontrado"));
        };
        self.view.updater().apply(|view| {
            view.selected = Some(found);
            view.citas.clear();
            view.day = None;
            view.regroup();
        });
        self.reload_citas().await
    }

    /// Narrow the history to `day`, or show all of it.
    pub fn show_day(&self, day: Option<NaiveDate>) {
        self.view.updater().apply(|view| {
            view.day = day;
            view.regroup();
        });
    }

    /// Approve one of the patient's appointments, optionally moving it.
    pub async fn approve(&self, cita: &Cita, reschedule: Option<Reschedule>) -> Toast {
        let result = match self.sessions.require() {
            Ok(session) => self
                .citas
                .approve(&session, cita, reschedule)
                .await
                .map(|_| ()),
            Err(err) => Err(err),
        };
        self.after_update(result, "Cita aprobada correctamente!", "Error al aprobar la cita!")
            .await
    }

    /// Mark one of the patient's appointments as finished.
    pub async fn finish(&self, cita: &Cita) -> Toast {
        let result = match self.sessions.require() {
            Ok(session) => self.citas.finish(&session, cita).await.map(|_| ()),
            Err(err) => Err(err),
        };
        self.after_update(
            result,
            "Cita finalizada correctamente!",
            "Error al finalizar la cita!",
        )
        .await
    }

    async fn after_update(&self, result: Result<(), Error>, success: &str, fallback: &str) -> Toast {
        match checked(&self.sessions, result, fallback).await {
            Ok(()) => {
                if let Err(toast) = self.reload_citas().await {
                    warn!(message = %toast.message, "patient history reload failed");
                }
                Toast::success(success)
            }
            Err(toast) => toast,
        }
    }

    async fn reload_citas(&self) -> Result<(), Toast> {
        let Some(patient) = self
            .view
            .with(|view| view.selected.as_ref().map(|user| user.id().clone()))
        else {
            return Ok(());
        };
        let updater = self.view.updater();
        let citas = checked(
            &self.sessions,
            self.citas.list().await,
            "Error al cargar las citas",
        )
        .await?;
        let mine = citas_for_patient(&citas, &patient);
        updater.apply(|view| {
            if view.selected.as_ref().map(User::id) == Some(&patient) {
                view.citas = mine;
                view.regroup();
            }
        });
        Ok(())
    }
}
