//! Booking calendar: marked days, hour picker, and the booking form.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use super::checked;
use crate::domain::ports::{AuthGateway, or_empty};
use crate::domain::{
    BookingRequest, CalendarMark, Cita, CitaService, Error, HourSlot, OccupiedHours, Role,
    SessionManager, Specialty, User, UserId, available_hours, calendar_marks, users_with_role,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the calendar screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarView {
    pub citas: Vec<Cita>,
    pub marks: Vec<CalendarMark>,
    pub doctors: Vec<User>,
    pub patients: Vec<User>,
    pub specialties: Vec<Specialty>,
    pub selected: Option<NaiveDate>,
    /// Doctor whose free hours the picker shows.
    pub doctor: Option<UserId>,
    pub offered: Vec<HourSlot>,
    /// Whether the booking form is showing.
    pub form_open: bool,
}

/// Controller for the patient "Agendar" and assistant "Crear cita" tabs.
pub struct CalendarController {
    sessions: Arc<SessionManager>,
    citas: CitaService,
    auth: Arc<dyn AuthGateway>,
    view: ViewSlot<CalendarView>,
}

impl CalendarController {
    /// Create a controller with an empty view.
    pub fn new(sessions: Arc<SessionManager>, citas: CitaService, auth: Arc<dyn AuthGateway>) -> Self {
        Self {
            sessions,
            citas,
            auth,
            view: ViewSlot::default(),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<CalendarView> {
        &self.view
    }

    /// Load appointments, doctors, patients, and specialties together.
    ///
    /// Pickers that fail to load stay empty; a failed appointment fetch keeps
    /// the previous calendar. The first doctor is picked when none is.
    pub async fn load(&self) -> Result<(), Toast> {
        let updater = self.view.updater();
        let (citas, users, specialties) = tokio::join!(
            self.citas.list(),
            self.auth.list_users(),
            self.auth.list_specialties(),
        );

        let users = or_empty(users).unwrap_or_else(|err| {
            warn!(error = %err, "could not load users for pickers");
            Vec::new()
        });
        let specialties = or_empty(specialties).unwrap_or_else(|err| {
            warn!(error = %err, "could not load specialties");
            Vec::new()
        });
        updater.apply(|view| {
            view.doctors = users_with_role(&users, Role::Doctor);
            if view.doctor.is_none() {
                view.doctor = view.doctors.first().map(|doctor| doctor.id().clone());
            }
            view.patients = users_with_role(&users, Role::Paciente);
            view.specialties = specialties;
        });

        let citas = checked(&self.sessions, citas, "Error al cargar las citas").await?;
        updater.apply(|view| {
            view.marks = calendar_marks(&citas);
            view.citas = citas;
        });
        Ok(())
    }

    /// Open the booking form on `date` and refresh the hour picker for the
    /// current doctor.
    pub async fn open_form(&self, date: NaiveDate) {
        self.view.updater().apply(|view| {
            view.selected = Some(date);
            view.offered.clear();
            view.form_open = true;
        });
        self.refresh_hours().await;
    }

    /// Close the form without booking.
    pub fn close_form(&self) {
        self.view.updater().apply(|view| view.form_open = false);
    }

    /// Select `doctor` and refresh the hour picker for the selected date.
    pub async fn pick_doctor(&self, doctor: &UserId) {
        self.view
            .updater()
            .apply(|view| view.doctor = Some(doctor.clone()));
        self.refresh_hours().await;
    }

    /// Recompute the offered hours for the selected date and doctor.
    ///
    /// When occupied hours cannot be fetched every hour is offered and the
    /// server decides at booking time.
    async fn refresh_hours(&self) {
        let Some((date, doctor)) = self
            .view
            .with(|view| view.selected.zip(view.doctor.clone()))
        else {
            return;
        };
        let updater = self.view.updater();
        let result = self.citas.offered_hours(date, &doctor).await;
        let offered = match self.sessions.check(result).await {
            Ok(offered) => offered,
            Err(err) => {
                warn!(error = %err, "could not load occupied hours");
                available_hours(&OccupiedHours::empty())
            }
        };
        updater.apply(|view| {
            if view.selected == Some(date) && view.doctor.as_ref() == Some(&doctor) {
                view.offered = offered;
            }
        });
    }

    /// Submit the booking form.
    ///
    /// On success the form closes, the calendar reloads, and the hour picker
    /// is refreshed. On failure the form stays open; a taken hour shows the
    /// server's message.
    pub async fn book(&self, request: BookingRequest) -> Toast {
        let result = match self.sessions.require() {
            Ok(session) => self.citas.book(&session, request).await,
            Err(err) => Err::<Cita, Error>(err),
        };
        match checked(&self.sessions, result, "Error al registrar la cita").await {
            Ok(_) => {
                self.close_form();
                if let Err(toast) = self.load().await {
                    warn!(message = %toast.message, "calendar reload after booking failed");
                }
                self.refresh_hours().await;
                Toast::success("Cita registrada correctamente!")
            }
            Err(toast) => toast,
        }
    }
}
