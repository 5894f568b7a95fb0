//! Appointment detail: cancel, delete, observations, and documents.

use std::sync::Arc;

use tracing::warn;

use super::checked;
use crate::domain::ports::{RecordsGateway, or_empty};
use crate::domain::{
    Cita, CitaAction, CitaActionKind, CitaService, Description, Document, Error, SessionManager,
    Upload, available_actions, documents_for_cita,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the appointment detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitaDetailView {
    pub cita: Cita,
    pub description: Option<Description>,
    pub documents: Vec<Document>,
    /// Actions the current role may take on the appointment.
    pub actions: Vec<CitaActionKind>,
    /// Set once the appointment was deleted; the screen should close.
    pub closed: bool,
}

/// Controller for one appointment's detail screen.
pub struct CitaDetailController {
    sessions: Arc<SessionManager>,
    citas: CitaService,
    records: Arc<dyn RecordsGateway>,
    view: ViewSlot<CitaDetailView>,
}

impl CitaDetailController {
    /// Open the detail screen on `cita`.
    pub fn new(
        sessions: Arc<SessionManager>,
        citas: CitaService,
        records: Arc<dyn RecordsGateway>,
        cita: Cita,
    ) -> Self {
        let actions = sessions
            .current()
            .map(|session| available_actions(session.role(), cita.status()))
            .unwrap_or_default();
        Self {
            sessions,
            citas,
            records,
            view: ViewSlot::new(CitaDetailView {
                cita,
                description: None,
                documents: Vec::new(),
                actions,
                closed: false,
            }),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<CitaDetailView> {
        &self.view
    }

    fn cita(&self) -> Cita {
        self.view.with(|view| view.cita.clone())
    }

    /// Fetch the stored note and attached documents concurrently.
    pub async fn load(&self) {
        let cita = self.cita();
        let updater = self.view.updater();
        let (description, documents) = tokio::join!(
            self.citas.description_for(&cita),
            self.records.list_documents(),
        );

        match self.sessions.check(description).await {
            Ok(description) => {
                updater.apply(|view| view.description = description);
            }
            Err(err) => warn!(error = %err, "could not load cita description"),
        }
        let documents = or_empty(documents).map_err(Error::from);
        match self.sessions.check(documents).await {
            Ok(documents) => {
                let attached = documents_for_cita(documents, cita.id());
                updater.apply(|view| view.documents = attached);
            }
            Err(err) => warn!(error = %err, "could not load documents"),
        }
    }

    fn show(&self, cita: Cita) {
        self.view.updater().apply(|view| {
            view.actions = self
                .sessions
                .current()
                .map(|session| available_actions(session.role(), cita.status()))
                .unwrap_or_default();
            view.cita = cita;
        });
    }

    /// Cancel with `reason`; the reason is kept as the appointment's note.
    pub async fn cancel(&self, reason: &str) -> Toast {
        let cita = self.cita();
        let result = match self.sessions.require() {
            Ok(session) => self.citas.cancel(&session, &cita, reason).await,
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, "Error al cancelar la cita!").await {
            Ok(cancelled) => {
                self.show(cancelled);
                self.load().await;
                Toast::success("Cita cancelada correctamente!")
            }
            Err(toast) => toast,
        }
    }

    /// Withdraw the pending request and close the screen.
    pub async fn delete(&self) -> Toast {
        let cita = self.cita();
        let result = match self.sessions.require() {
            Ok(session) => self.citas.delete(&session, &cita).await,
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, "Error al eliminar la cita!").await {
            Ok(()) => {
                self.view.updater().apply(|view| {
                    view.closed = true;
                    view.actions.clear();
                });
                Toast::success("Cita eliminada correctamente!")
            }
            Err(toast) => toast,
        }
    }

    /// Save an observation note.
    pub async fn add_observation(&self, text: &str) -> Toast {
        let cita = self.cita();
        let result = match self.sessions.require() {
            Ok(session) => self.citas.add_observation(&session, &cita, text).await,
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, "Error al guardar la descripción!").await {
            Ok(()) => {
                self.load().await;
                Toast::success("Descripción guardada correctamente!")
            }
            Err(toast) => toast,
        }
    }

    /// Attach a photo or scan to the appointment.
    pub async fn upload_document(&self, file: &Upload) -> Toast {
        let cita = self.cita();
        let result = match self.sessions.require() {
            Ok(_) => self
                .records
                .upload_document(cita.id(), file)
                .await
                .map_err(Error::from),
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, "Error al subir el documento!").await {
            Ok(()) => {
                self.load().await;
                Toast::success("Documento subido correctamente!")
            }
            Err(toast) => toast,
        }
    }

    /// Whether the current role may take `kind` on this appointment.
    pub fn allows(&self, kind: CitaActionKind) -> bool {
        self.view.with(|view| view.actions.contains(&kind))
    }

    /// Build the cancel action for `reason`, rejecting a blank one.
    pub fn cancel_action(reason: &str) -> Result<CitaAction, Toast> {
        CitaAction::cancel(reason)
            .map_err(|err| Toast::failure(&Error::from(err), "Error al cancelar la cita!"))
    }
}
