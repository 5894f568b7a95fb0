//! Clinical record endpoints: documents, signatures, prescriptions, invoices,
//! QR codes, and menstrual control.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::Form;

use super::dto::QrCodeDto;
use super::gateway::{ApiGateway, decode_optional, file_part};
use crate::domain::ports::{GatewayError, RecordsGateway};
use crate::domain::{
    CitaId, Document, Factura, FacturaId, Firma, FirmaId, MenstrualControl, MenstrualControlId,
    MenstrualEntry, NewReceta, QrDocument, Receta, RecetaId, SignPdfRequest, Upload, UserId,
};

/// Path of the QR endpoint for `document`.
fn qr_path(document: &QrDocument) -> String {
    let collection = match document {
        QrDocument::Receta(_) => "recetas",
        QrDocument::Factura(_) => "facturas",
    };
    format!("api/{collection}/generate-qr/{}", document.id())
}

/// Multipart body for a scanned receta or factura upload.
fn scanned_upload_form(
    document: &QrDocument,
    uploader: &UserId,
    file: &Upload,
) -> Result<Form, GatewayError> {
    let id_field = match document {
        QrDocument::Receta(_) => "recetaId",
        QrDocument::Factura(_) => "facturaId",
    };
    Ok(Form::new()
        .text("tipo", document.kind())
        .text(id_field, document.id().to_owned())
        .text("userId", uploader.as_ref().to_owned())
        .part("file", file_part(file)?))
}

#[async_trait]
impl RecordsGateway for ApiGateway {
    async fn upload_document(&self, cita: &CitaId, file: &Upload) -> Result<(), GatewayError> {
        let form = Form::new().part("image", file_part(file)?);
        self.post_multipart(&format!("api/documents/{cita}"), form)
            .await
            .map(drop)
    }

    async fn list_documents(&self) -> Result<Vec<Document>, GatewayError> {
        self.get_json("api/documents").await
    }

    async fn upload_signature(&self, user: &UserId, file: &Upload) -> Result<(), GatewayError> {
        let form = Form::new()
            .part("image", file_part(file)?)
            .text("idUser", user.as_ref().to_owned());
        self.post_multipart("api/firma", form).await.map(drop)
    }

    async fn signature_for(&self, user: &UserId) -> Result<Option<Firma>, GatewayError> {
        match self.get_bytes(&format!("api/firma/{user}")).await {
            Ok(body) => decode_optional(&body),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn sign_pdf(&self, request: &SignPdfRequest) -> Result<(), GatewayError> {
        self.send_json_unit(Method::POST, "api/firma/sign-pdf", request)
            .await
    }

    async fn download_signed(&self, id: &FirmaId) -> Result<Vec<u8>, GatewayError> {
        self.get_bytes(&format!("api/firma/download/{id}")).await
    }

    async fn create_receta(&self, receta: &NewReceta) -> Result<(), GatewayError> {
        self.send_json_unit(Method::POST, "api/recetas", receta)
            .await
    }

    async fn recetas_for_user(&self, user: &UserId) -> Result<Vec<Receta>, GatewayError> {
        self.get_json(&format!("api/recetas/user/{user}")).await
    }

    async fn upload_receta(
        &self,
        id: &RecetaId,
        uploader: &UserId,
        file: &Upload,
    ) -> Result<(), GatewayError> {
        let form = scanned_upload_form(&QrDocument::Receta(id.clone()), uploader, file)?;
        self.post_multipart(&format!("api/recetas/upload/{id}"), form)
            .await
            .map(drop)
    }

    async fn facturas_for_user(&self, user: &UserId) -> Result<Vec<Factura>, GatewayError> {
        self.get_json(&format!("api/facturas/user/{user}")).await
    }

    async fn upload_factura(
        &self,
        id: &FacturaId,
        uploader: &UserId,
        file: &Upload,
    ) -> Result<(), GatewayError> {
        let form = scanned_upload_form(&QrDocument::Factura(id.clone()), uploader, file)?;
        self.post_multipart(&format!("api/facturas/upload/{id}"), form)
            .await
            .map(drop)
    }

    async fn qr_code(&self, document: &QrDocument) -> Result<String, GatewayError> {
        let response: QrCodeDto = self.get_json(&qr_path(document)).await?;
        Ok(response.qr_code)
    }

    async fn create_menstrual(&self, entry: &MenstrualEntry) -> Result<(), GatewayError> {
        self.send_json_unit(Method::POST, "api/menstrual-control", entry)
            .await
    }

    async fn menstrual_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<MenstrualControl>, GatewayError> {
        self.get_json(&format!("api/menstrual-control/user/{user}"))
            .await
    }

    async fn update_menstrual(
        &self,
        id: &MenstrualControlId,
        entry: &MenstrualEntry,
    ) -> Result<(), GatewayError> {
        self.send_json_unit(Method::PUT, &format!("api/menstrual-control/{id}"), entry)
            .await
    }
}
