//! Process wiring: adapters, services, and the controllers built on them.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{ClientSettings, ConfigError};
use crate::domain::ports::{
    AuthGateway, CitasGateway, NotificationsGateway, RecordsGateway, TokenStore, TokenStoreError,
};
use crate::domain::{BadgeService, Cita, CitaService, NavigationRouter, SessionManager};
use crate::inbound::controllers::{
    CalendarController, CitaDetailController, CitasController, MenstrualController,
    NotificationsController, PatientsController, ProfileController, QrController,
    SessionController, SignatureController,
};
use crate::outbound::{ApiGateway, FileTokenStore};

/// Failures while assembling the client.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
    #[error("could not build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Shared services every controller is built from.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<SessionManager>,
    auth: Arc<dyn AuthGateway>,
    citas: CitaService,
    badges: BadgeService,
    records: Arc<dyn RecordsGateway>,
}

impl AppState {
    /// Wire the HTTP gateway and file token store described by `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, StartupError> {
        let base_url = settings.base_url()?;
        let timeout = settings.request_timeout()?;
        let token_dir = settings.token_dir();
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::open(&token_dir)?);
        let gateway = Arc::new(ApiGateway::new(
            base_url,
            timeout,
            Arc::clone(&tokens),
        )?);
        info!(
            base_url = %gateway.base_url(),
            token_dir = %token_dir.display(),
            "client configured"
        );
        Ok(Self::with_ports(
            Arc::clone(&gateway) as Arc<dyn AuthGateway>,
            Arc::clone(&gateway) as Arc<dyn CitasGateway>,
            Arc::clone(&gateway) as Arc<dyn NotificationsGateway>,
            gateway as Arc<dyn RecordsGateway>,
            tokens,
        ))
    }

    /// Wire services over arbitrary port implementations.
    pub fn with_ports(
        auth: Arc<dyn AuthGateway>,
        citas: Arc<dyn CitasGateway>,
        notifications: Arc<dyn NotificationsGateway>,
        records: Arc<dyn RecordsGateway>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(Arc::clone(&auth), tokens)),
            auth,
            citas: CitaService::new(citas),
            badges: BadgeService::new(notifications),
            records,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Router following session changes.
    pub fn router(&self) -> NavigationRouter {
        NavigationRouter::new(&self.sessions, self.badges.clone())
    }

    pub fn session_controller(&self) -> SessionController {
        SessionController::new(Arc::clone(&self.sessions), Arc::clone(&self.auth))
    }

    pub fn calendar(&self) -> CalendarController {
        CalendarController::new(
            Arc::clone(&self.sessions),
            self.citas.clone(),
            Arc::clone(&self.auth),
        )
    }

    pub fn citas(&self) -> CitasController {
        CitasController::new(Arc::clone(&self.sessions), self.citas.clone())
    }

    pub fn patients(&self) -> PatientsController {
        PatientsController::new(
            Arc::clone(&self.sessions),
            self.citas.clone(),
            Arc::clone(&self.auth),
        )
    }

    /// Detail screen opened on `cita`.
    pub fn cita_detail(&self, cita: Cita) -> CitaDetailController {
        CitaDetailController::new(
            Arc::clone(&self.sessions),
            self.citas.clone(),
            Arc::clone(&self.records),
            cita,
        )
    }

    pub fn notifications(&self) -> NotificationsController {
        NotificationsController::new(Arc::clone(&self.sessions), self.badges.clone())
    }

    pub fn profile(&self) -> ProfileController {
        ProfileController::new(
            Arc::clone(&self.sessions),
            Arc::clone(&self.auth),
            Arc::clone(&self.records),
        )
    }

    pub fn menstrual(&self) -> MenstrualController {
        MenstrualController::new(Arc::clone(&self.sessions), Arc::clone(&self.records))
    }

    pub fn signature(&self) -> SignatureController {
        SignatureController::new(Arc::clone(&self.sessions), Arc::clone(&self.records))
    }

    pub fn qr(&self) -> QrController {
        QrController::new(Arc::clone(&self.sessions), Arc::clone(&self.records))
    }
}
