//! Shared world for the behaviour suites.
//!
//! The world owns a current-thread Tokio runtime and an [`AppState`] wired
//! to a [`FakeClinic`] and an in-memory token store. Steps are synchronous,
//! so each one drives the controllers with [`ClinicWorld::block_on`].

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use clinica_client::AppState;
use clinica_client::domain::ports::{InMemoryTokenStore, TokenStore};
use clinica_client::domain::{NavigationRouter, NavigationState, Role, Session};
use clinica_client::inbound::Toast;
use clinica_client::inbound::controllers::{
    CalendarController, CitaDetailController, CitasController, NotificationsController,
};
use tokio::runtime::{Builder, Runtime};

use super::{FakeClinic, PASSWORD};

pub struct ClinicWorld {
    pub runtime: Runtime,
    pub clinic: FakeClinic,
    pub tokens: Arc<InMemoryTokenStore>,
    pub app: AppState,
    pub router: Option<NavigationRouter>,
    pub navigation: Option<NavigationState>,
    pub calendar: Option<CalendarController>,
    pub citas: Option<CitasController>,
    pub detail: Option<CitaDetailController>,
    pub notifications: Option<NotificationsController>,
    pub last_toast: Option<Toast>,
}

pub type SharedWorld = Rc<RefCell<ClinicWorld>>;

pub struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

/// Fresh world with an empty clinic and no session.
pub fn world() -> WorldFixture {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let clinic = FakeClinic::default();
    let tokens = Arc::new(InMemoryTokenStore::default());
    let app = AppState::with_ports(
        Arc::new(clinic.clone()),
        Arc::new(clinic.clone()),
        Arc::new(clinic.clone()),
        Arc::new(clinic.clone()),
        Arc::clone(&tokens) as Arc<dyn TokenStore>,
    );
    WorldFixture {
        world: Rc::new(RefCell::new(ClinicWorld {
            runtime,
            clinic,
            tokens,
            app,
            router: None,
            navigation: None,
            calendar: None,
            citas: None,
            detail: None,
            notifications: None,
            last_toast: None,
        })),
    }
}

impl ClinicWorld {
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Seed the accounts every scenario starts from.
    pub fn seed_accounts(&self) {
        self.clinic.add_account("d1", "Dra. Ana Ruiz", Role::Doctor);
        self.clinic.add_account("a1", "Marta Díaz", Role::Asistente);
        self.clinic.add_account("p1", "Lucía Gómez", Role::Paciente);
        self.clinic.add_account("p2", "Sofía Pérez", Role::Paciente);
    }

    /// Log in as `id` through the session controller.
    pub fn log_in(&self, id: &str, password: &str) -> Toast {
        let email = format!("{id}@clinica.test");
        self.block_on(self.app.session_controller().login(&email, password))
    }

    pub fn log_in_with_default_password(&self, id: &str) -> Toast {
        let toast = self.log_in(id, PASSWORD);
        assert!(!toast.is_error(), "login failed: {toast}");
        toast
    }

    pub fn current_session(&self) -> Option<Session> {
        self.app.sessions().current()
    }

    pub fn stored_session(&self) -> Option<Session> {
        self.block_on(self.tokens.load()).expect("token store load")
    }

    /// Start following session changes from the current state.
    pub fn watch_navigation(&mut self) {
        let mut router = self.app.router();
        let state = self.runtime.block_on(router.current());
        self.navigation = Some(state);
        self.router = Some(router);
    }

    /// Apply the next session change seen by the router.
    pub fn advance_navigation(&mut self) -> NavigationState {
        let Self {
            runtime,
            router,
            navigation,
            ..
        } = self;
        let router = router.as_mut().expect("router is watching");
        let state = runtime
            .block_on(router.next())
            .expect("session manager alive");
        *navigation = Some(state);
        state
    }
}
