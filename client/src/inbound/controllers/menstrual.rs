//! Menstrual control: recorded cycles and the entry form.

use std::sync::Arc;

use tracing::debug;

use super::checked;
use crate::domain::ports::{RecordsGateway, or_empty};
use crate::domain::{
    Error, MenstrualControl, MenstrualControlId, MenstrualEntry, SessionManager, UserId,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the menstrual control screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenstrualView {
    pub controls: Vec<MenstrualControl>,
}

/// Controller for the patient "Control" tab.
pub struct MenstrualController {
    sessions: Arc<SessionManager>,
    records: Arc<dyn RecordsGateway>,
    view: ViewSlot<MenstrualView>,
}

impl MenstrualController {
    /// Create a controller with no records loaded.
    pub fn new(sessions: Arc<SessionManager>, records: Arc<dyn RecordsGateway>) -> Self {
        Self {
            sessions,
            records,
            view: ViewSlot::default(),
        }
    }

    pub fn view(&self) -> &ViewSlot<MenstrualView> {
        &self.view
    }

    /// Reload the recorded cycles.
    pub async fn refresh(&self) -> Result<(), Toast> {
        let updater = self.view.updater();
        let result = match self.sessions.require() {
            Ok(session) => or_empty(self.records.menstrual_for_user(session.user_id()).await)
                .map_err(Error::from),
            Err(err) => Err(err),
        };
        let controls = checked(&self.sessions, result, "Error al cargar los registros").await?;
        updater.apply(|view| view.controls = controls);
        Ok(())
    }

    /// Save the form: updates `editing` when set, otherwise creates a record.
    ///
    /// The entry is always recorded for the logged-in patient.
    pub async fn save(
        &self,
        editing: Option<&MenstrualControlId>,
        mut entry: MenstrualEntry,
    ) -> Toast {
        let result = async {
            let session = self.sessions.require()?;
            entry.user_id = UserId::clone(session.user_id());
            let saved = match editing {
                Some(id) => self.records.update_menstrual(id, &entry).await,
                None => self.records.create_menstrual(&entry).await,
            };
            saved.map_err(Error::from)
        }
        .await;
        match checked(&self.sessions, result, "Error al guardar el registro").await {
            Ok(()) => {
                if let Err(toast) = self.refresh().await {
                    debug!(message = %toast.message, "reload after save failed");
                }
                Toast::success("Registro guardado correctamente!")
            }
            Err(toast) => toast,
        }
    }
}
