//! In-memory clinic API shared by the behaviour suites.
//!
//! `FakeClinic` implements every gateway port over one mutex-guarded state,
//! answering the way the clinic server does: bookings on a taken hour are
//! rejected with a 400 message, cancelling stores the reason as the
//! appointment's description, and revoked tokens fail with 401.

pub mod world;

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use clinica_client::domain::ports::{
    AuthGateway, CitasGateway, GatewayError, NotificationsGateway, RecordsGateway,
};
use clinica_client::domain::{
    AuthToken, CancelReason, Cita, CitaDraft, CitaId, CitaStatus, CitaUpdate, Description,
    DescriptionId, Document, Factura, FacturaId, Firma, FirmaId, HourSlot, LoginCredentials,
    MenstrualControl, MenstrualControlId, MenstrualEntry, NamedRef, NewCita, NewDescription,
    NewNotification, NewProfile, NewReceta, Notification, NotificationId, OccupiedHours,
    PasswordReset, ProfileUpdate, QrDocument, Receta, RecetaId, Role, Session, SignPdfRequest,
    Specialty, SpecialtyId, Upload, User, UserDraft, UserId,
};

pub const SLOT_TAKEN: &str = "Hora no disponible para esa fecha";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
struct ClinicState {
    accounts: Vec<User>,
    citas: Vec<Cita>,
    descriptions: Vec<Description>,
    notifications: Vec<Notification>,
    stale_hours: bool,
    revoked: bool,
    next_id: usize,
    hour_lookups: Vec<(NaiveDate, UserId)>,
    notification_fetches: Vec<UserId>,
}

impl ClinicState {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn occupied(&self, date: NaiveDate, doctor: &UserId) -> OccupiedHours {
        self.citas
            .iter()
            .filter(|cita| &cita.doctor().id == doctor && cita.date() == date)
            .filter(|cita| !matches!(cita.status(), CitaStatus::Cancelado))
            .map(Cita::time)
            .collect()
    }

    fn guard(&self) -> Result<(), GatewayError> {
        if self.revoked {
            return Err(GatewayError::unauthorized("Token no válido"));
        }
        Ok(())
    }

    fn position(&self, id: &CitaId) -> Result<usize, GatewayError> {
        self.citas
            .iter()
            .position(|cita| cita.id() == id)
            .ok_or_else(|| GatewayError::not_found("Cita no encontrada"))
    }
}

/// Clinic API double; clones share state.
#[derive(Clone, Default)]
pub struct FakeClinic {
    state: Arc<Mutex<ClinicState>>,
}

pub fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, d).expect("valid date")
}

pub fn hour(h: u8) -> HourSlot {
    HourSlot::new(h).expect("valid hour")
}

impl FakeClinic {
    fn lock(&self) -> MutexGuard<'_, ClinicState> {
        self.state.lock().expect("clinic state lock")
    }

    /// Register an account whose password is [`PASSWORD`].
    pub fn add_account(&self, id: &str, name: &str, role: Role) -> User {
        let user = User::new(UserDraft {
            id: user_id(id),
            name: name.to_owned(),
            email: format!("{id}@clinica.test"),
            role,
            confirmado: true,
            image: None,
        });
        self.lock().accounts.push(user.clone());
        user
    }

    /// Seed an appointment with doctor `d1` in specialty `s1`.
    pub fn add_cita(
        &self,
        id: &str,
        patient: &str,
        date: NaiveDate,
        time: HourSlot,
        status: CitaStatus,
    ) -> Cita {
        let cita = Cita::new(CitaDraft {
            id: CitaId::new(id).expect("valid cita id"),
            date,
            time,
            specialty: NamedRef::bare(SpecialtyId::new("s1").expect("valid specialty id")),
            doctor: NamedRef::bare(user_id("d1")),
            patient: NamedRef::bare(user_id(patient)),
            status,
        });
        self.lock().citas.push(cita.clone());
        cita
    }

    pub fn add_notification(&self, user: &str, text: &str, read: bool) {
        let mut state = self.lock();
        let id = state.fresh_id("n");
        state.notifications.push(Notification::new(
            NotificationId::new(id).expect("valid notification id"),
            user_id(user),
            text,
            read,
        ));
    }

    /// Make the occupied-hours lookup answer as if nothing were booked.
    pub fn lag_hour_lookups(&self) {
        self.lock().stale_hours = true;
    }

    /// Reject every later request with 401.
    pub fn revoke_tokens(&self) {
        self.lock().revoked = true;
    }

    pub fn cita(&self, id: &str) -> Option<Cita> {
        self.lock()
            .citas
            .iter()
            .find(|cita| cita.id().as_ref() == id)
            .cloned()
    }

    pub fn citas(&self) -> Vec<Cita> {
        self.lock().citas.clone()
    }

    pub fn hour_lookups(&self) -> Vec<(NaiveDate, UserId)> {
        self.lock().hour_lookups.clone()
    }

    pub fn notification_fetches(&self) -> Vec<UserId> {
        self.lock().notification_fetches.clone()
    }
}

#[async_trait]
impl AuthGateway for FakeClinic {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, GatewayError> {
        let state = self.lock();
        let user = state
            .accounts
            .iter()
            .find(|user| user.email() == credentials.email())
            .filter(|_| credentials.password() == PASSWORD)
            .cloned()
            .ok_or_else(|| GatewayError::rejected(400_u16, "Usuario o contraseña incorrectos"))?;
        let token = AuthToken::new(format!("token-{}", user.id()))
            .map_err(|err| GatewayError::decode(err.to_string()))?;
        Ok(Session::new(user, token))
    }

    async fn create_profile(&self, profile: &NewProfile) -> Result<User, GatewayError> {
        let mut state = self.lock();
        let id = state.fresh_id("u");
        let user = User::new(UserDraft {
            id: user_id(&id),
            name: profile.name.clone(),
            email: profile.email.clone(),
            role: profile.role,
            confirmado: false,
            image: None,
        });
        state.accounts.push(user.clone());
        Ok(user)
    }

    async fn edit_profile(
        &self,
        id: &UserId,
        _update: &ProfileUpdate,
    ) -> Result<User, GatewayError> {
        let state = self.lock();
        state.guard()?;
        state
            .accounts
            .iter()
            .find(|user| user.id() == id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found("Usuario no encontrado"))
    }

    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        let state = self.lock();
        state.guard()?;
        Ok(state.accounts.clone())
    }

    async fn list_specialties(&self) -> Result<Vec<Specialty>, GatewayError> {
        Ok(vec![Specialty {
            id: SpecialtyId::new("s1").expect("valid specialty id"),
            name: "Ginecología".to_owned(),
        }])
    }

    async fn change_password(&self, _reset: &PasswordReset) -> Result<(), GatewayError> {
        self.lock().guard()
    }
}

#[async_trait]
impl CitasGateway for FakeClinic {
    async fn create(&self, cita: &NewCita) -> Result<Cita, GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        if state.occupied(cita.date, &cita.doctor).contains(cita.time) {
            return Err(GatewayError::rejected(400_u16, SLOT_TAKEN));
        }
        let id = state.fresh_id("c");
        let created = Cita::new(CitaDraft {
            id: CitaId::new(id).expect("valid cita id"),
            date: cita.date,
            time: cita.time,
            specialty: NamedRef::bare(cita.specialty.clone()),
            doctor: NamedRef::bare(cita.doctor.clone()),
            patient: NamedRef::bare(cita.patient.clone()),
            status: CitaStatus::Pendiente,
        });
        state.citas.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Cita>, GatewayError> {
        let state = self.lock();
        state.guard()?;
        Ok(state.citas.clone())
    }

    async fn update(&self, id: &CitaId, update: &CitaUpdate) -> Result<Cita, GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        let index = state.position(id)?;
        let current = &state.citas[index];
        let (date, time) = update
            .reschedule
            .map_or((current.date(), current.time()), |target| {
                (target.date, target.time)
            });
        let updated = Cita::new(CitaDraft {
            id: current.id().clone(),
            date,
            time,
            specialty: current.specialty().clone(),
            doctor: current.doctor().clone(),
            patient: current.patient().clone(),
            status: update.status,
        });
        state.citas[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &CitaId) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        let index = state.position(id)?;
        state.citas.remove(index);
        Ok(())
    }

    async fn cancel(&self, id: &CitaId, reason: &CancelReason) -> Result<Cita, GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        let index = state.position(id)?;
        let current = &state.citas[index];
        let cancelled = Cita::new(CitaDraft {
            id: current.id().clone(),
            date: current.date(),
            time: current.time(),
            specialty: current.specialty().clone(),
            doctor: current.doctor().clone(),
            patient: current.patient().clone(),
            status: CitaStatus::Cancelado,
        });
        state.citas[index] = cancelled.clone();
        let note_id = state.fresh_id("desc");
        state.descriptions.push(Description {
            id: DescriptionId::new(note_id).expect("valid description id"),
            cita: id.clone(),
            description: reason.as_ref().to_owned(),
        });
        Ok(cancelled)
    }

    async fn occupied_hours(
        &self,
        date: NaiveDate,
        doctor: &UserId,
    ) -> Result<OccupiedHours, GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        state.hour_lookups.push((date, doctor.clone()));
        if state.stale_hours {
            return Ok(OccupiedHours::empty());
        }
        Ok(state.occupied(date, doctor))
    }

    async fn create_description(&self, note: &NewDescription) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        let id = state.fresh_id("desc");
        state.descriptions.push(Description {
            id: DescriptionId::new(id).expect("valid description id"),
            cita: note.cita.clone(),
            description: note.description.clone(),
        });
        Ok(())
    }

    async fn description_for(&self, id: &CitaId) -> Result<Option<Description>, GatewayError> {
        let state = self.lock();
        state.guard()?;
        Ok(state
            .descriptions
            .iter()
            .rev()
            .find(|note| &note.cita == id)
            .cloned())
    }
}

#[async_trait]
impl NotificationsGateway for FakeClinic {
    async fn create(&self, notification: &NewNotification) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        let id = state.fresh_id("n");
        state.notifications.push(Notification::new(
            NotificationId::new(id).expect("valid notification id"),
            notification.user.clone(),
            notification.description.clone(),
            false,
        ));
        Ok(())
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Notification>, GatewayError> {
        let mut state = self.lock();
        state.notification_fetches.push(user.clone());
        state.guard()?;
        Ok(state
            .notifications
            .iter()
            .filter(|notification| notification.recipient() == user)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &NotificationId) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.guard()?;
        state.notifications.retain(|notification| notification.id() != id);
        Ok(())
    }
}

#[async_trait]
impl RecordsGateway for FakeClinic {
    async fn upload_document(&self, _cita: &CitaId, _file: &Upload) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn list_documents(&self) -> Result<Vec<Document>, GatewayError> {
        self.lock().guard()?;
        Ok(Vec::new())
    }

    async fn upload_signature(&self, _user: &UserId, _file: &Upload) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn signature_for(&self, _user: &UserId) -> Result<Option<Firma>, GatewayError> {
        self.lock().guard()?;
        Ok(None)
    }

    async fn sign_pdf(&self, _request: &SignPdfRequest) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn download_signed(&self, _id: &FirmaId) -> Result<Vec<u8>, GatewayError> {
        Err(GatewayError::not_found("Firma no encontrada"))
    }

    async fn create_receta(&self, _receta: &NewReceta) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn recetas_for_user(&self, _user: &UserId) -> Result<Vec<Receta>, GatewayError> {
        self.lock().guard()?;
        Ok(Vec::new())
    }

    async fn upload_receta(
        &self,
        _id: &RecetaId,
        _uploader: &UserId,
        _file: &Upload,
    ) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn facturas_for_user(&self, _user: &UserId) -> Result<Vec<Factura>, GatewayError> {
        self.lock().guard()?;
        Ok(Vec::new())
    }

    async fn upload_factura(
        &self,
        _id: &FacturaId,
        _uploader: &UserId,
        _file: &Upload,
    ) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn qr_code(&self, document: &QrDocument) -> Result<String, GatewayError> {
        self.lock().guard()?;
        Ok(format!("qr:{}:{}", document.kind(), document.id()))
    }

    async fn create_menstrual(&self, _entry: &MenstrualEntry) -> Result<(), GatewayError> {
        self.lock().guard()
    }

    async fn menstrual_for_user(
        &self,
        _user: &UserId,
    ) -> Result<Vec<MenstrualControl>, GatewayError> {
        self.lock().guard()?;
        Ok(Vec::new())
    }

    async fn update_menstrual(
        &self,
        _id: &MenstrualControlId,
        _entry: &MenstrualEntry,
    ) -> Result<(), GatewayError> {
        self.lock().guard()
    }
}
