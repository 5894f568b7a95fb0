//! Role-based navigation policy.
//!
//! Each role sees its own tab bar. The mapping from session to tree is total:
//! no session always yields the login/register tree.

use super::{Role, Session};

/// Every screen the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Home,
    CitaDetail,
    Notifications,
    Calendar,
    MenstrualControl,
    Profile,
    Citas,
    Patients,
    PatientDetail,
    ScanQr,
    Agenda,
    Signature,
    CreateUser,
    GenerateQr,
}

/// A tab bar entry and the screens stacked beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub screen: Screen,
    pub label: &'static str,
    pub nested: &'static [Screen],
}

const fn tab(screen: Screen, label: &'static str) -> Tab {
    Tab {
        screen,
        label,
        nested: &[],
    }
}

const UNAUTHENTICATED: &[Tab] = &[
    tab(Screen::Login, "Iniciar sesión"),
    tab(Screen::Register, "Registro"),
];

const PATIENT: &[Tab] = &[
    Tab {
        screen: Screen::Home,
        label: "Home",
        nested: &[Screen::CitaDetail],
    },
    tab(Screen::Notifications, "Alertas"),
    tab(Screen::Calendar, "Agendar"),
    tab(Screen::MenstrualControl, "Control"),
    tab(Screen::Profile, "Perfil"),
];

const ASSISTANT: &[Tab] = &[
    Tab {
        screen: Screen::Citas,
        label: "Citas",
        nested: &[Screen::CitaDetail],
    },
    tab(Screen::Notifications, "Alertas"),
    Tab {
        screen: Screen::Patients,
        label: "Pacientes",
        nested: &[Screen::PatientDetail, Screen::CitaDetail],
    },
    tab(Screen::Calendar, "Crear cita"),
    tab(Screen::ScanQr, "Subir"),
    tab(Screen::Profile, "Perfil"),
];

const DOCTOR: &[Tab] = &[
    Tab {
        screen: Screen::Agenda,
        label: "Agenda",
        nested: &[Screen::CitaDetail],
    },
    tab(Screen::Notifications, "Alertas"),
    tab(Screen::Signature, "Firmar"),
    tab(Screen::ScanQr, "Cargar"),
    tab(Screen::Profile, "Perfil"),
];

const ADMIN: &[Tab] = &[
    tab(Screen::CreateUser, "Crear usuario"),
    tab(Screen::GenerateQr, "Generador QR"),
    tab(Screen::Profile, "Perfil"),
];

/// The tab tree shown for a session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationTree {
    Unauthenticated,
    Patient,
    Assistant,
    Doctor,
    Admin,
}

impl NavigationTree {
    /// Tree for a role.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Paciente => Self::Patient,
            Role::Asistente => Self::Assistant,
            Role::Doctor => Self::Doctor,
            Role::Admin => Self::Admin,
        }
    }

    /// Tabs in display order.
    pub fn tabs(self) -> &'static [Tab] {
        match self {
            Self::Unauthenticated => UNAUTHENTICATED,
            Self::Patient => PATIENT,
            Self::Assistant => ASSISTANT,
            Self::Doctor => DOCTOR,
            Self::Admin => ADMIN,
        }
    }

    /// Whether `screen` is reachable in this tree, as a tab or nested.
    pub fn allows(self, screen: Screen) -> bool {
        self.tabs()
            .iter()
            .any(|tab| tab.screen == screen || tab.nested.contains(&screen))
    }

    /// Whether the tree shows the unread-notification badge.
    pub fn shows_badge(self) -> bool {
        self.allows(Screen::Notifications)
    }

    /// Screen opened first.
    pub fn initial_screen(self) -> Screen {
        self.tabs()
            .first()
            .map_or(Screen::Login, |tab| tab.screen)
    }
}

/// Navigation tree for the current session, or the login tree without one.
///
/// # Examples
/// ```
/// use clinica_client::domain::{NavigationTree, tree_for};
///
/// assert_eq!(tree_for(None), NavigationTree::Unauthenticated);
/// ```
pub fn tree_for(session: Option<&Session>) -> NavigationTree {
    session.map_or(NavigationTree::Unauthenticated, |session| {
        NavigationTree::for_role(session.role())
    })
}
