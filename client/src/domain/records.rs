//! Clinical records hanging off users and appointments: specialties,
//! documents, observation notes, prescriptions, invoices, signatures, QR
//! payloads, and menstrual-cycle entries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::wire::{date, date_list, option_date};
use super::{
    CitaId, DescriptionId, DocumentId, FacturaId, FirmaId, MenstrualControlId, NamedRef, RecetaId,
    Role, SpecialtyId, UserId,
};

/// Medical specialty offered by the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    #[serde(rename = "_id")]
    pub id: SpecialtyId,
    #[serde(default)]
    pub name: String,
}

/// Image or file attached to an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub cita: CitaId,
    #[serde(default)]
    pub image: String,
}

/// Documents belonging to one appointment.
///
/// The API only lists every document, so detail screens filter locally.
pub fn documents_for_cita(documents: Vec<Document>, cita: &CitaId) -> Vec<Document> {
    documents.into_iter().filter(|doc| &doc.cita == cita).collect()
}

/// Free-text note recorded against an appointment: an observation or the
/// reason it was cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Description {
    #[serde(rename = "_id")]
    pub id: DescriptionId,
    pub cita: CitaId,
    pub description: String,
}

/// Body of `POST /api/description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDescription {
    pub cita: CitaId,
    pub description: String,
}

/// One prescribed medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicamento {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub dosis: String,
    #[serde(default)]
    pub frecuencia: String,
}

/// A prescription issued to a patient.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Receta {
    #[serde(rename = "_id")]
    pub id: RecetaId,
    #[serde(default, alias = "doctorId")]
    pub doctor: Option<NamedRef<UserId>>,
    #[serde(default, with = "option_date")]
    pub fecha: Option<NaiveDate>,
    #[serde(default)]
    pub medicamentos: Vec<Medicamento>,
    #[serde(default)]
    pub instrucciones: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body of `POST /api/recetas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReceta {
    pub user_id: UserId,
    pub doctor_id: UserId,
    #[serde(with = "date")]
    pub fecha: NaiveDate,
    pub medicamentos: Vec<Medicamento>,
    pub instrucciones: String,
}

/// An invoice issued to a patient.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Factura {
    #[serde(rename = "_id")]
    pub id: FacturaId,
    #[serde(default, with = "option_date")]
    pub fecha: Option<NaiveDate>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A stored handwritten signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Firma {
    #[serde(rename = "_id")]
    pub id: FirmaId,
    #[serde(default)]
    pub image: String,
}

/// Body of `POST /api/firma/sign-pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignPdfRequest {
    #[serde(rename = "idUser")]
    pub user: UserId,
}

/// Document a QR code can be generated for or scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrDocument {
    Receta(RecetaId),
    Factura(FacturaId),
}

impl QrDocument {
    /// Parse the `tipo` typed on the QR screen together with an id.
    pub fn from_parts(kind: &str, id: &str) -> Result<Self, QrPayloadError> {
        let bad_id = |_| QrPayloadError::MissingId;
        match kind.trim().to_lowercase().as_str() {
            "receta" => RecetaId::new(id).map(Self::Receta).map_err(bad_id),
            "factura" => FacturaId::new(id).map(Self::Factura).map_err(bad_id),
            other => Err(QrPayloadError::UnknownKind(other.to_owned())),
        }
    }

    /// Decode the JSON payload embedded in a scanned QR code.
    ///
    /// # Examples
    /// ```
    /// use clinica_client::domain::QrDocument;
    ///
    /// let doc = QrDocument::from_scan(r#"{"tipo":"receta","recetaId":"r1"}"#).unwrap();
    /// assert_eq!(doc.kind(), "receta");
    /// ```
    pub fn from_scan(payload: &str) -> Result<Self, QrPayloadError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Scanned {
            tipo: String,
            receta_id: Option<String>,
            factura_id: Option<String>,
        }

        let scanned: Scanned =
            serde_json::from_str(payload).map_err(|_| QrPayloadError::Unreadable)?;
        let id = match scanned.tipo.as_str() {
            "receta" => scanned.receta_id,
            _ => scanned.factura_id,
        };
        Self::from_parts(&scanned.tipo, id.as_deref().unwrap_or_default())
    }

    /// Wire name of the document type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Receta(_) => "receta",
            Self::Factura(_) => "factura",
        }
    }

    /// Identifier of the document.
    pub fn id(&self) -> &str {
        match self {
            Self::Receta(id) => id.as_ref(),
            Self::Factura(id) => id.as_ref(),
        }
    }
}

/// Reasons a QR payload cannot be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrPayloadError {
    /// The payload is not the expected JSON.
    Unreadable,
    /// `tipo` is neither `receta` nor `factura`.
    UnknownKind(String),
    /// The document id is missing or blank.
    MissingId,
}

impl fmt::Display for QrPayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable => f.write_str("QR payload is not readable"),
            Self::UnknownKind(kind) => write!(f, "unknown document type `{kind}`"),
            Self::MissingId => f.write_str("QR payload has no document id"),
        }
    }
}

impl std::error::Error for QrPayloadError {}

/// Default cycle length offered by the menstrual-control form.
pub const DEFAULT_CYCLE_DAYS: u8 = 28;

fn default_cycle() -> u8 {
    DEFAULT_CYCLE_DAYS
}

/// A recorded menstrual cycle with the server's fertility estimate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenstrualControl {
    #[serde(rename = "_id")]
    pub id: MenstrualControlId,
    #[serde(with = "option_date", default)]
    pub fecha_inicial_periodo: Option<NaiveDate>,
    #[serde(default)]
    pub fluido: String,
    #[serde(default)]
    pub notas: String,
    #[serde(default = "default_cycle")]
    pub ciclo: u8,
    #[serde(with = "option_date", default)]
    pub fecha_ovulacion: Option<NaiveDate>,
    #[serde(with = "date_list", default)]
    pub dias_fertiles: Vec<NaiveDate>,
}

/// Body of menstrual-control create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenstrualEntry {
    pub user_id: UserId,
    #[serde(with = "date")]
    pub fecha_inicial_periodo: NaiveDate,
    pub fluido: String,
    pub notas: String,
    pub ciclo: u8,
}

/// A file picked for a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Wrap file contents, guessing an image content type from the extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = match file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
            Some(ext) if ext == "pdf" => "application/pdf".to_owned(),
            Some(ext) if !ext.is_empty() => format!("image/{ext}"),
            _ => "application/octet-stream".to_owned(),
        };
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

/// Account created by an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialty: Option<SpecialtyId>,
    pub image: Option<Upload>,
}

/// Partial profile edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<Upload>,
}

impl ProfileUpdate {
    /// Whether the edit would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn filters_documents_by_cita() {
        let docs: Vec<Document> = serde_json::from_value(json!([
            { "_id": "d1", "cita": "c1", "image": "uploads/a.png" },
            { "_id": "d2", "cita": "c2", "image": "uploads/b.png" },
            { "_id": "d3", "cita": "c1" }
        ]))
        .expect("documents decode");

        let cita = CitaId::new("c1").expect("id");
        let kept: Vec<_> = documents_for_cita(docs, &cita)
            .into_iter()
            .map(|doc| doc.id.to_string())
            .collect();
        assert_eq!(kept, vec!["d1", "d3"]);
    }

    #[test]
    fn decodes_receta_with_populated_doctor() {
        let receta: Receta = serde_json::from_value(json!({
            "_id": "r1",
            "doctor": { "_id": "d1", "name": "Dr. Vega" },
            "fecha": "2024-07-08T00:00:00.000Z",
            "medicamentos": [{ "nombre": "Ibuprofeno", "dosis": "400mg", "frecuencia": "8h" }],
            "instrucciones": "Con comida"
        }))
        .expect("receta decodes");

        assert_eq!(
            receta.doctor.as_ref().and_then(|d| d.name.as_deref()),
            Some("Dr. Vega")
        );
        assert_eq!(receta.fecha, NaiveDate::from_ymd_opt(2024, 7, 8));
        assert_eq!(receta.medicamentos.len(), 1);
    }

    #[test]
    fn menstrual_control_defaults_cycle_length() {
        let control: MenstrualControl = serde_json::from_value(json!({
            "_id": "m1",
            "fechaInicialPeriodo": "2024-07-01",
            "diasFertiles": ["2024-07-10", "2024-07-11"],
            "fechaOvulacion": "2024-07-14"
        }))
        .expect("control decodes");

        assert_eq!(control.ciclo, DEFAULT_CYCLE_DAYS);
        assert_eq!(control.dias_fertiles.len(), 2);
        assert_eq!(control.fecha_ovulacion, NaiveDate::from_ymd_opt(2024, 7, 14));
    }

    #[rstest]
    #[case(r#"{"tipo":"receta","recetaId":"r1"}"#, QrDocument::Receta(RecetaId::new("r1").expect("id")))]
    #[case(r#"{"tipo":"factura","facturaId":"f9","monto":20}"#, QrDocument::Factura(FacturaId::new("f9").expect("id")))]
    fn decodes_scanned_payloads(#[case] payload: &str, #[case] expected: QrDocument) {
        assert_eq!(QrDocument::from_scan(payload).expect("payload decodes"), expected);
    }

    #[rstest]
    #[case("not json", QrPayloadError::Unreadable)]
    #[case(r#"{"tipo":"receta"}"#, QrPayloadError::MissingId)]
    #[case(r#"{"tipo":"orden","recetaId":"r1"}"#, QrPayloadError::UnknownKind("orden".to_owned()))]
    fn rejects_unusable_payloads(#[case] payload: &str, #[case] expected: QrPayloadError) {
        assert_eq!(QrDocument::from_scan(payload).expect_err("bad payload"), expected);
    }

    #[rstest]
    #[case("firma.png", "image/png")]
    #[case("scan.PDF", "application/pdf")]
    #[case("noext", "application/octet-stream")]
    fn upload_guesses_content_type(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(Upload::new(name, Vec::new()).content_type, expected);
    }
}
