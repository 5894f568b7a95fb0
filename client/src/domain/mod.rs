//! Domain primitives, rules, and services.
//!
//! Purpose: Define strongly typed entities for the clinic API and the rules
//! the client enforces before talking to it. Nothing here performs I/O
//! directly; services reach the outside world through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode - transport-agnostic failure taxonomy.
//! - Session, User, Role - who is logged in and what they may do.
//! - Cita and friends - appointments, hour slots, the lifecycle state machine.
//! - NavigationTree - role-based tab trees.
//! - SessionManager, CitaService, BadgeService, NavigationRouter - services.

pub mod auth;
pub mod badge_service;
pub mod cita;
pub mod cita_service;
pub mod error;
pub mod ids;
pub mod navigation;
pub mod navigation_router;
pub mod notification;
pub mod ports;
pub mod records;
pub mod session;
pub mod session_service;
pub mod user;
pub mod wire;

pub use self::auth::{AuthToken, LoginCredentials, LoginValidationError, PasswordReset};
pub use self::badge_service::BadgeService;
pub use self::cita::{
    CalendarMark, CancelReason, Cita, CitaAction, CitaActionKind, CitaDraft, CitaSections,
    CitaStatus, CitaUpdate, EmptyNote, HOURS_PER_DAY, HourSlot, HourSlotError, NamedRef, NewCita,
    OccupiedHours, Outcome, Reschedule, Transition, TransitionError, authorize_creation,
    available_actions, available_hours, calendar_marks, citas_for_patient, citas_on,
    partition_by_status, transition,
};
pub use self::cita_service::{ApprovedCita, BookingRequest, CitaService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{
    CitaId, DescriptionId, DocumentId, FacturaId, FirmaId, IdValidationError, MenstrualControlId,
    NotificationId, RecetaId, SpecialtyId, UserId,
};
pub use self::navigation::{NavigationTree, Screen, Tab, tree_for};
pub use self::navigation_router::{NavigationRouter, NavigationState};
pub use self::notification::{NewNotification, Notification, unread_count};
pub use self::records::{
    DEFAULT_CYCLE_DAYS, Description, Document, Factura, Firma, Medicamento, MenstrualControl,
    MenstrualEntry, NewDescription, NewProfile, NewReceta, ProfileUpdate, QrDocument,
    QrPayloadError, Receta, SignPdfRequest, Specialty, Upload, documents_for_cita,
};
pub use self::session::Session;
pub use self::session_service::SessionManager;
pub use self::user::{Role, UnknownRole, User, UserDraft, UserValidationError, users_with_role};

/// Convenient client result alias.
///
/// # Examples
/// ```
/// use clinica_client::domain::{ClientResult, Error};
///
/// fn guard() -> ClientResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ClientResult<T> = Result<T, Error>;
