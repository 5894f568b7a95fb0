//! `clinica` command line: each subcommand drives one screen controller.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cap_std::{ambient_authority, fs::Dir};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::app::AppState;
use crate::domain::{
    BookingRequest, Cita, CitaId, CitaSections, CitaStatus, HourSlot, IdValidationError,
    Medicamento, NewReceta, NotificationId, Reschedule, SpecialtyId, Upload, UserId,
    available_hours,
};
use crate::inbound::Toast;
use crate::inbound::controllers::CitasController;

/// Command-line client for the clinic appointment API.
#[derive(Debug, Parser)]
#[command(name = "clinica", version, about)]
pub struct Cli {
    /// API root; overrides `CLINICA_BASE_URL`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session for later commands.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the session, its tabs, and the unread badge.
    Whoami,
    /// Change the password of the logged-in user.
    Password { new_password: String },
    /// Appointments.
    #[command(subcommand)]
    Citas(CitasCommand),
    /// Patient directory and histories, for assistants.
    #[command(subcommand)]
    Patients(PatientsCommand),
    /// Notifications of the logged-in user.
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Prescriptions of the logged-in user.
    #[command(subcommand)]
    Recetas(RecetasCommand),
    /// Prescription and invoice QR codes.
    #[command(subcommand)]
    Qr(QrCommand),
}

#[derive(Debug, Subcommand)]
pub enum CitasCommand {
    /// List appointments grouped by status.
    List,
    /// Show the free hours of a doctor on a date.
    Hours {
        date: NaiveDate,
        #[arg(value_parser = user_id)]
        doctor: UserId,
    },
    /// Request an appointment.
    Create {
        date: NaiveDate,
        hour: HourSlot,
        #[arg(long, value_parser = specialty_id)]
        specialty: SpecialtyId,
        #[arg(long, value_parser = user_id)]
        doctor: UserId,
        /// Patient to book for; required for assistants.
        #[arg(long, value_parser = user_id)]
        patient: Option<UserId>,
    },
    /// Approve a pending appointment, optionally moving it.
    Approve {
        #[arg(value_parser = cita_id)]
        id: CitaId,
        #[arg(long, requires = "hour")]
        date: Option<NaiveDate>,
        #[arg(long, requires = "date")]
        hour: Option<HourSlot>,
    },
    /// Mark an approved appointment as finished.
    Finish {
        #[arg(value_parser = cita_id)]
        id: CitaId,
    },
    /// Cancel an approved appointment.
    Cancel {
        #[arg(value_parser = cita_id)]
        id: CitaId,
        reason: String,
    },
    /// Withdraw a pending request.
    Delete {
        #[arg(value_parser = cita_id)]
        id: CitaId,
    },
}

#[derive(Debug, Subcommand)]
pub enum PatientsCommand {
    /// List registered patients.
    List,
    /// Show the appointments of one patient.
    Show {
        #[arg(value_parser = user_id)]
        id: UserId,
        /// Only show appointments on this day.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecetasCommand {
    List,
    /// Record a prescription for the logged-in user.
    Create {
        #[arg(long, value_parser = user_id)]
        doctor: UserId,
        #[arg(long)]
        fecha: NaiveDate,
        /// `nombre:dosis:frecuencia`; repeat for each medicine.
        #[arg(long = "medicamento", value_parser = medicamento, required = true)]
        medicamentos: Vec<Medicamento>,
        #[arg(long, default_value = "")]
        instrucciones: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    List,
    /// Send a notification to another user.
    Send {
        #[arg(value_parser = user_id)]
        user: UserId,
        description: String,
    },
    Delete {
        #[arg(value_parser = notification_id)]
        id: NotificationId,
    },
}

#[derive(Debug, Subcommand)]
pub enum QrCommand {
    /// Generate the QR payload of a `receta` or `factura`.
    Generate { kind: String, id: String },
    /// Decode a scanned payload, optionally uploading a scan of the document.
    Scan {
        payload: String,
        #[arg(long)]
        upload: Option<PathBuf>,
    },
}

fn user_id(raw: &str) -> Result<UserId, IdValidationError> {
    UserId::new(raw)
}

fn cita_id(raw: &str) -> Result<CitaId, IdValidationError> {
    CitaId::new(raw)
}

fn specialty_id(raw: &str) -> Result<SpecialtyId, IdValidationError> {
    SpecialtyId::new(raw)
}

fn medicamento(raw: &str) -> Result<Medicamento, String> {
    let mut parts = raw.splitn(3, ':').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(nombre), Some(dosis), Some(frecuencia)) if !nombre.is_empty() => Ok(Medicamento {
            nombre: nombre.to_owned(),
            dosis: dosis.to_owned(),
            frecuencia: frecuencia.to_owned(),
        }),
        _ => Err(format!("expected nombre:dosis:frecuencia, got `{raw}`")),
    }
}

fn notification_id(raw: &str) -> Result<NotificationId, IdValidationError> {
    NotificationId::new(raw)
}

/// Run `command` against `state`, writing results and the final toast to
/// `out`.
///
/// The persisted session is restored first. The exit code reflects whether
/// the command ended with an error toast.
///
/// # Errors
///
/// Only failures writing to `out` are returned.
pub async fn run(state: &AppState, command: Command, out: &mut dyn Write) -> io::Result<ExitCode> {
    state.session_controller().restore().await;
    let toast = match command {
        Command::Login { email, password } => login(state, &email, &password, out).await?,
        Command::Logout => Some(state.session_controller().logout().await),
        Command::Whoami => {
            write_whoami(state, out).await?;
            None
        }
        Command::Password { new_password } => {
            Some(state.session_controller().change_password(&new_password).await)
        }
        Command::Citas(command) => citas(state, command, out).await?,
        Command::Patients(command) => patients(state, command, out).await?,
        Command::Notifications(command) => notifications(state, command, out).await?,
        Command::Recetas(command) => recetas(state, command, out).await?,
        Command::Qr(command) => qr(state, command, out).await?,
    };
    match toast {
        Some(toast) => {
            writeln!(out, "{toast}")?;
            Ok(if toast.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

async fn login(
    state: &AppState,
    email: &str,
    password: &str,
    out: &mut dyn Write,
) -> io::Result<Option<Toast>> {
    let toast = state.session_controller().login(email, password).await;
    if !toast.is_error() {
        writeln!(out, "{toast}")?;
        write_whoami(state, out).await?;
        return Ok(None);
    }
    Ok(Some(toast))
}

async fn write_whoami(state: &AppState, out: &mut dyn Write) -> io::Result<()> {
    let navigation = state.router().current().await;
    match state.sessions().current() {
        Some(session) => {
            let user = session.user();
            writeln!(out, "{} <{}> ({})", user.name(), user.email(), user.role())?;
            if !session.is_confirmed() {
                writeln!(out, "Cuenta pendiente de confirmación")?;
            }
        }
        None => writeln!(out, "Sin sesión")?,
    }
    let labels: Vec<&str> = navigation.tree.tabs().iter().map(|tab| tab.label).collect();
    writeln!(out, "Pestañas: {}", labels.join(" | "))?;
    if navigation.tree.shows_badge() {
        writeln!(out, "Notificaciones sin leer: {}", navigation.unread)?;
    }
    Ok(())
}

async fn citas(
    state: &AppState,
    command: CitasCommand,
    out: &mut dyn Write,
) -> io::Result<Option<Toast>> {
    let controller = state.citas();
    match command {
        CitasCommand::List => {
            if let Err(toast) = controller.refresh().await {
                return Ok(Some(toast));
            }
            let sections = controller.view().snapshot().sections;
            write_sections(out, &sections)?;
            Ok(None)
        }
        CitasCommand::Hours { date, doctor } => {
            if let Err(toast) = controller.hours_for(date, &doctor).await {
                return Ok(Some(toast));
            }
            let occupied = controller
                .view()
                .snapshot()
                .occupied
                .map(|(_, occupied)| occupied)
                .unwrap_or_default();
            let hours: Vec<String> = available_hours(&occupied)
                .iter()
                .map(ToString::to_string)
                .collect();
            writeln!(out, "{date}: {}", hours.join(" "))?;
            Ok(None)
        }
        CitasCommand::Create {
            date,
            hour,
            specialty,
            doctor,
            patient,
        } => {
            let calendar = state.calendar();
            calendar.open_form(date).await;
            let request = BookingRequest {
                date,
                time: hour,
                specialty,
                doctor,
                patient,
            };
            Ok(Some(calendar.book(request).await))
        }
        CitasCommand::Approve { id, date, hour } => {
            let cita = match find_cita(&controller, &id).await {
                Ok(cita) => cita,
                Err(toast) => return Ok(Some(toast)),
            };
            let reschedule = date.zip(hour).map(|(date, time)| Reschedule { date, time });
            let toast = controller.approve(&cita, reschedule).await;
            if let Some((day, occupied)) = controller.view().snapshot().occupied {
                let hours: Vec<String> = occupied.iter().map(|slot| slot.to_string()).collect();
                writeln!(out, "Horas ocupadas {day}: {}", hours.join(" "))?;
            }
            Ok(Some(toast))
        }
        CitasCommand::Finish { id } => match find_cita(&controller, &id).await {
            Ok(cita) => Ok(Some(controller.finish(&cita).await)),
            Err(toast) => Ok(Some(toast)),
        },
        CitasCommand::Cancel { id, reason } => {
            let cita = match find_cita(&controller, &id).await {
                Ok(cita) => cita,
                Err(toast) => return Ok(Some(toast)),
            };
            let detail = state.cita_detail(cita);
            let toast = detail.cancel(&reason).await;
            if let Some(note) = detail.view().snapshot().description {
                writeln!(out, "Motivo: {}", note.description)?;
            }
            Ok(Some(toast))
        }
        CitasCommand::Delete { id } => match find_cita(&controller, &id).await {
            Ok(cita) => Ok(Some(state.cita_detail(cita).delete().await)),
            Err(toast) => Ok(Some(toast)),
        },
    }
}

async fn find_cita(
    controller: &CitasController,
    id: &CitaId,
) -> Result<Cita, Toast> {
    controller.refresh().await?;
    controller
        .find(id)
        .ok_or_else(|| Toast::error("Cita no encontrada"))
}

fn write_sections(out: &mut dyn Write, sections: &CitaSections) -> io::Result<()> {
    for status in [
        CitaStatus::Pendiente,
        CitaStatus::Aprobado,
        CitaStatus::Finalizado,
        CitaStatus::Cancelado,
    ] {
        let section = sections.section(status);
        writeln!(out, "{status} ({})", section.len())?;
        for cita in section {
            write_cita(out, cita)?;
        }
    }
    Ok(())
}

fn write_cita(out: &mut dyn Write, cita: &Cita) -> io::Result<()> {
    let doctor = cita.doctor();
    let patient = cita.patient();
    writeln!(
        out,
        "  {}  {} {}  {}  Dr. {} / {}",
        cita.id(),
        cita.date(),
        cita.time(),
        cita.specialty().name_or(cita.specialty().id.as_ref()),
        doctor.name_or(doctor.id.as_ref()),
        patient.name_or(patient.id.as_ref()),
    )
}

async fn patients(
    state: &AppState,
    command: PatientsCommand,
    out: &mut dyn Write,
) -> io::Result<Option<Toast>> {
    let controller = state.patients();
    if let Err(toast) = controller.load().await {
        return Ok(Some(toast));
    }
    match command {
        PatientsCommand::List => {
            for patient in controller.view().snapshot().patients {
                writeln!(out, "  {}  {} <{}>", patient.id(), patient.name(), patient.email())?;
            }
            Ok(None)
        }
        PatientsCommand::Show { id, date } => {
            if let Err(toast) = controller.open(&id).await {
                return Ok(Some(toast));
            }
            controller.show_day(date);
            let view = controller.view().snapshot();
            if let Some(patient) = &view.selected {
                writeln!(out, "{} <{}>", patient.name(), patient.email())?;
            }
            write_sections(out, &view.sections)?;
            Ok(None)
        }
    }
}

async fn notifications(
    state: &AppState,
    command: NotificationsCommand,
    out: &mut dyn Write,
) -> io::Result<Option<Toast>> {
    let controller = state.notifications();
    match command {
        NotificationsCommand::List => {
            if let Err(toast) = controller.refresh().await {
                return Ok(Some(toast));
            }
            let view = controller.view().snapshot();
            for item in &view.items {
                let marker = if item.is_read() { ' ' } else { '*' };
                writeln!(out, "{marker} {}  {}", item.id(), item.description())?;
            }
            writeln!(out, "Sin leer: {}", view.unread)?;
            Ok(None)
        }
        NotificationsCommand::Send { user, description } => {
            Ok(Some(controller.send(&user, &description).await))
        }
        NotificationsCommand::Delete { id } => {
            let toast = controller.delete(&id).await;
            if !toast.is_error() {
                writeln!(out, "Sin leer: {}", controller.view().snapshot().unread)?;
            }
            Ok(Some(toast))
        }
    }
}

async fn recetas(
    state: &AppState,
    command: RecetasCommand,
    out: &mut dyn Write,
) -> io::Result<Option<Toast>> {
    let controller = state.profile();
    match command {
        RecetasCommand::List => {
            if let Err(toast) = controller.load().await {
                return Ok(Some(toast));
            }
            for receta in controller.view().snapshot().recetas {
                let fecha = receta
                    .fecha
                    .map_or_else(|| "sin fecha".to_owned(), |fecha| fecha.to_string());
                writeln!(out, "  {}  {fecha}  {}", receta.id, receta.instrucciones)?;
                for med in &receta.medicamentos {
                    writeln!(out, "    - {}: {} ({})", med.nombre, med.dosis, med.frecuencia)?;
                }
            }
            Ok(None)
        }
        RecetasCommand::Create {
            doctor,
            fecha,
            medicamentos,
            instrucciones,
        } => {
            let Some(session) = state.sessions().current() else {
                return Ok(Some(Toast::error("Sin sesión")));
            };
            let receta = NewReceta {
                user_id: session.user_id().clone(),
                doctor_id: doctor,
                fecha,
                medicamentos,
                instrucciones,
            };
            Ok(Some(controller.create_receta(&receta).await))
        }
    }
}

async fn qr(state: &AppState, command: QrCommand, out: &mut dyn Write) -> io::Result<Option<Toast>> {
    let controller = state.qr();
    match command {
        QrCommand::Generate { kind, id } => {
            let toast = controller.generate(&kind, &id).await;
            if let Some(code) = controller.view().snapshot().qr_code {
                writeln!(out, "{code}")?;
            }
            Ok(Some(toast))
        }
        QrCommand::Scan { payload, upload } => {
            let scanned = controller.scan(&payload);
            let Some(path) = upload.filter(|_| !scanned.is_error()) else {
                return Ok(Some(scanned));
            };
            writeln!(out, "{scanned}")?;
            match read_upload(&path) {
                Ok(file) => Ok(Some(controller.upload(&file).await)),
                Err(err) => Ok(Some(Toast::error(format!(
                    "No se pudo leer {}: {err}",
                    path.display()
                )))),
            }
        }
    }
}

fn read_upload(path: &Path) -> io::Result<Upload> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a file path"))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    let bytes = dir.read(name)?;
    Ok(Upload::new(name.to_string_lossy(), bytes))
}
