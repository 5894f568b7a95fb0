//! QR codes: generation for the admin, scanning and uploads for staff.

use std::sync::Arc;

use tracing::warn;

use super::checked;
use crate::domain::ports::RecordsGateway;
use crate::domain::{Error, QrDocument, SessionManager, Upload};
use crate::inbound::{Toast, ViewSlot};

const SCAN_FAILED: &str =
    "No se pudo leer el código QR. Asegúrese de que el formato sea correcto.";

/// State of the QR screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrView {
    /// Payload returned by the last generation, as sent by the server.
    pub qr_code: Option<String>,
    /// Document decoded from the last scan.
    pub scanned: Option<QrDocument>,
}

/// Controller for the "Generar QR" and "Escanear QR" tabs.
pub struct QrController {
    sessions: Arc<SessionManager>,
    records: Arc<dyn RecordsGateway>,
    view: ViewSlot<QrView>,
}

impl QrController {
    pub fn new(sessions: Arc<SessionManager>, records: Arc<dyn RecordsGateway>) -> Self {
        Self {
            sessions,
            records,
            view: ViewSlot::default(),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<QrView> {
        &self.view
    }

    /// Generate the QR payload for the document typed as `kind` and `id`.
    pub async fn generate(&self, kind: &str, id: &str) -> Toast {
        const FAILED: &str = "Error al generar el código QR";
        let document = match QrDocument::from_parts(kind, id) {
            Ok(document) => document,
            Err(err) => return Toast::failure(&Error::invalid_request(err.to_string()), FAILED),
        };
        let updater = self.view.updater();
        let result = self.records.qr_code(&document).await.map_err(Error::from);
        match checked(&self.sessions, result, FAILED).await {
            Ok(code) => {
                updater.apply(|view| view.qr_code = Some(code));
                Toast::success("Código QR generado correctamente!")
            }
            Err(toast) => toast,
        }
    }

    /// Decode a scanned payload and remember the document it names.
    pub fn scan(&self, payload: &str) -> Toast {
        match QrDocument::from_scan(payload) {
            Ok(document) => {
                self.view.updater().apply(|view| view.scanned = Some(document));
                Toast::success("Código QR escaneado correctamente")
            }
            Err(err) => {
                warn!(error = %err, "unusable QR payload");
                Toast::error(SCAN_FAILED)
            }
        }
    }

    /// Upload a scanned copy of the last scanned document.
    pub async fn upload(&self, file: &Upload) -> Toast {
        let Some(document) = self.view.with(|view| view.scanned.clone()) else {
            return Toast::error("Escanee un código QR primero");
        };
        let result = match self.sessions.require() {
            Ok(session) => {
                let uploader = session.user_id();
                let sent = match &document {
                    QrDocument::Receta(id) => self.records.upload_receta(id, uploader, file).await,
                    QrDocument::Factura(id) => {
                        self.records.upload_factura(id, uploader, file).await
                    }
                };
                sent.map_err(Error::from)
            }
            Err(err) => Err(err),
        };
        let fallback = format!("Error al subir el {}", document.kind());
        match checked(&self.sessions, result, &fallback).await {
            Ok(()) => match document {
                QrDocument::Receta(_) => Toast::success("Receta subida correctamente!"),
                QrDocument::Factura(_) => Toast::success("Factura subida correctamente!"),
            },
            Err(toast) => toast,
        }
    }
}
