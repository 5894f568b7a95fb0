//! Driven port for clinical record endpoints: documents, signatures,
//! prescriptions, invoices, QR codes, and menstrual control.

use async_trait::async_trait;

use crate::domain::{
    CitaId, Document, Factura, FacturaId, Firma, FirmaId, MenstrualControl, MenstrualControlId,
    MenstrualEntry, NewReceta, QrDocument, Receta, RecetaId, SignPdfRequest, Upload, UserId,
};

use super::GatewayError;

/// Record operations exposed by the clinic API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordsGateway: Send + Sync {
    /// `POST /api/documents/{cita}` as multipart.
    async fn upload_document(&self, cita: &CitaId, file: &Upload) -> Result<(), GatewayError>;

    /// `GET /api/documents`.
    async fn list_documents(&self) -> Result<Vec<Document>, GatewayError>;

    /// `POST /api/firma` as multipart.
    async fn upload_signature(&self, user: &UserId, file: &Upload) -> Result<(), GatewayError>;

    /// `GET /api/firma/{user}`.
    async fn signature_for(&self, user: &UserId) -> Result<Option<Firma>, GatewayError>;

    /// `POST /api/firma/sign-pdf`.
    async fn sign_pdf(&self, request: &SignPdfRequest) -> Result<(), GatewayError>;

    /// `GET /api/firma/download/{id}`; raw PDF bytes.
    async fn download_signed(&self, id: &FirmaId) -> Result<Vec<u8>, GatewayError>;

    /// `POST /api/recetas`.
    async fn create_receta(&self, receta: &NewReceta) -> Result<(), GatewayError>;

    /// `GET /api/recetas/user/{id}`.
    async fn recetas_for_user(&self, user: &UserId) -> Result<Vec<Receta>, GatewayError>;

    /// `POST /api/recetas/upload/{id}` as multipart.
    async fn upload_receta(
        &self,
        id: &RecetaId,
        uploader: &UserId,
        file: &Upload,
    ) -> Result<(), GatewayError>;

    /// `GET /api/facturas/user/{id}`.
    async fn facturas_for_user(&self, user: &UserId) -> Result<Vec<Factura>, GatewayError>;

    /// `POST /api/facturas/upload/{id}` as multipart.
    async fn upload_factura(
        &self,
        id: &FacturaId,
        uploader: &UserId,
        file: &Upload,
    ) -> Result<(), GatewayError>;

    /// `GET /api/{recetas|facturas}/generate-qr/{id}`; the `qrCode` field.
    async fn qr_code(&self, document: &QrDocument) -> Result<String, GatewayError>;

    /// `POST /api/menstrual-control`.
    async fn create_menstrual(&self, entry: &MenstrualEntry) -> Result<(), GatewayError>;

    /// `GET /api/menstrual-control/user/{id}`.
    async fn menstrual_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<MenstrualControl>, GatewayError>;

    /// `PUT /api/menstrual-control/{id}`.
    async fn update_menstrual(
        &self,
        id: &MenstrualControlId,
        entry: &MenstrualEntry,
    ) -> Result<(), GatewayError>;
}
