//! Doctor signature: upload a handwritten signature and sign PDFs with it.

use std::sync::Arc;

use tracing::debug;

use super::checked;
use crate::domain::ports::RecordsGateway;
use crate::domain::{Error, Firma, SessionManager, SignPdfRequest, Upload};
use crate::inbound::{Toast, ViewSlot};

/// State of the signature screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureView {
    pub firma: Option<Firma>,
    /// Last signed PDF downloaded from the server.
    pub signed_pdf: Option<Vec<u8>>,
}

/// Controller for the doctor "Firma" tab.
pub struct SignatureController {
    sessions: Arc<SessionManager>,
    records: Arc<dyn RecordsGateway>,
    view: ViewSlot<SignatureView>,
}

impl SignatureController {
    pub fn new(sessions: Arc<SessionManager>, records: Arc<dyn RecordsGateway>) -> Self {
        Self {
            sessions,
            records,
            view: ViewSlot::default(),
        }
    }

    pub fn view(&self) -> &ViewSlot<SignatureView> {
        &self.view
    }

    /// Fetch the stored signature, if any.
    pub async fn load(&self) -> Result<(), Toast> {
        let updater = self.view.updater();
        let result = match self.sessions.require() {
            Ok(session) => self
                .records
                .signature_for(session.user_id())
                .await
                .map_err(Error::from),
            Err(err) => Err(err),
        };
        let firma = checked(&self.sessions, result, "No se pudo cargar la firma").await?;
        updater.apply(|view| view.firma = firma);
        Ok(())
    }

    /// Send a new signature image for the logged-in doctor.
    pub async fn upload(&self, file: &Upload) -> Toast {
        let result = match self.sessions.require() {
            Ok(session) => self
                .records
                .upload_signature(session.user_id(), file)
                .await
                .map_err(Error::from),
            Err(err) => Err(err),
        };
        match checked(&self.sessions, result, "No se pudo enviar la firma").await {
            Ok(()) => {
                if let Err(toast) = self.load().await {
                    debug!(message = %toast.message, "reload after signature upload failed");
                }
                Toast::success("Firma procesada")
            }
            Err(toast) => toast,
        }
    }

    /// Ask the server to sign the pending PDF and download the result.
    pub async fn sign_pdf(&self) -> Toast {
        let updater = self.view.updater();
        let result = async {
            let session = self.sessions.require()?;
            let request = SignPdfRequest {
                user: session.user_id().clone(),
            };
            self.records.sign_pdf(&request).await.map_err(Error::from)?;
            let firma = match self.view.with(|view| view.firma.clone()) {
                Some(firma) => Some(firma),
                None => self
                    .records
                    .signature_for(session.user_id())
                    .await
                    .map_err(Error::from)?,
            };
            let firma = firma.ok_or_else(|| Error::not_found("No hay firma registrada"))?;
            let bytes = self
                .records
                .download_signed(&firma.id)
                .await
                .map_err(Error::from)?;
            Ok::<_, Error>((firma, bytes))
        }
        .await;
        match checked(&self.sessions, result, "No se pudo firmar el PDF").await {
            Ok((firma, bytes)) => {
                updater.apply(|view| {
                    view.firma = Some(firma);
                    view.signed_pdf = Some(bytes);
                });
                Toast::success("PDF firmado con éxito")
            }
            Err(toast) => toast,
        }
    }
}
