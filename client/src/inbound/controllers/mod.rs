//! Screen controllers.
//!
//! A controller owns the [`ViewSlot`](super::ViewSlot) of one screen, calls
//! domain services, and turns every failure into a [`Toast`]. Errors never
//! travel past this layer. Authorization failures also expire the session
//! through [`SessionManager::check`].

mod calendar;
mod cita_detail;
mod citas;
mod menstrual;
mod notifications;
mod patients;
mod profile;
mod qr;
mod session;
mod signature;

pub use calendar::{CalendarController, CalendarView};
pub use cita_detail::{CitaDetailController, CitaDetailView};
pub use citas::{CitasController, CitasView};
pub use menstrual::{MenstrualController, MenstrualView};
pub use notifications::{NotificationsController, NotificationsView};
pub use patients::{PatientsController, PatientsView};
pub use profile::{ProfileController, ProfileView};
pub use qr::{QrController, QrView};
pub use session::SessionController;
pub use signature::{SignatureController, SignatureView};

use tracing::warn;

use super::Toast;
use crate::domain::{Error, SessionManager};

/// Route `result` through the session check and map failures to a toast.
pub(crate) async fn checked<T>(
    sessions: &SessionManager,
    result: Result<T, Error>,
    fallback: &str,
) -> Result<T, Toast> {
    sessions.check(result).await.map_err(|err| {
        warn!(code = ?err.code(), error = %err, "action failed");
        Toast::failure(&err, fallback)
    })
}
