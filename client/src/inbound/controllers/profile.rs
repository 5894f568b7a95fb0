//! Profile screen: own data, prescriptions, invoices, and admin user creation.

use std::sync::Arc;

use tracing::warn;

use super::checked;
use crate::domain::ports::{AuthGateway, RecordsGateway, or_empty};
use crate::domain::{
    Error, Factura, NewProfile, NewReceta, ProfileUpdate, Receta, SessionManager, User,
};
use crate::inbound::{Toast, ViewSlot};

/// State of the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileView {
    pub user: Option<User>,
    pub recetas: Vec<Receta>,
    pub facturas: Vec<Factura>,
}

/// Controller for the "Perfil" and "Crear usuario" tabs.
pub struct ProfileController {
    sessions: Arc<SessionManager>,
    auth: Arc<dyn AuthGateway>,
    records: Arc<dyn RecordsGateway>,
    view: ViewSlot<ProfileView>,
}

impl ProfileController {
    /// Create a controller over the logged-in user.
    pub fn new(
        sessions: Arc<SessionManager>,
        auth: Arc<dyn AuthGateway>,
        records: Arc<dyn RecordsGateway>,
    ) -> Self {
        let user = sessions.current().map(|session| session.user().clone());
        Self {
            sessions,
            auth,
            records,
            view: ViewSlot::new(ProfileView {
                user,
                ..ProfileView::default()
            }),
        }
    }

    /// The screen state.
    pub fn view(&self) -> &ViewSlot<ProfileView> {
        &self.view
    }

    /// Fetch prescriptions and invoices concurrently.
    ///
    /// Each list that fails to load is shown empty.
    pub async fn load(&self) -> Result<(), Toast> {
        let session = checked(&self.sessions, self.sessions.require(), "Error al cargar el perfil")
            .await?;
        let updater = self.view.updater();
        let user = session.user_id();
        let (recetas, facturas) = tokio::join!(
            self.records.recetas_for_user(user),
            self.records.facturas_for_user(user),
        );

        let recetas = self
            .sessions
            .check(or_empty(recetas).map_err(Error::from))
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "could not load recetas");
                Vec::new()
            });
        let facturas = self
            .sessions
            .check(or_empty(facturas).map_err(Error::from))
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "could not load facturas");
                Vec::new()
            });
        updater.apply(|view| {
            view.user = Some(session.user().clone());
            view.recetas = recetas;
            view.facturas = facturas;
        });
        Ok(())
    }

    /// Save profile edits and refresh the stored session's user.
    pub async fn edit(&self, update: &ProfileUpdate) -> Toast {
        const FAILED: &str = "Error al actualizar el perfil";
        if update.is_empty() {
            return Toast::error("No hay cambios para guardar");
        }
        let result = async {
            let session = self.sessions.require()?;
            let user = self
                .auth
                .edit_profile(session.user_id(), update)
                .await
                .map_err(Error::from)?;
            self.sessions.replace_user(user.clone()).await?;
            Ok::<User, Error>(user)
        }
        .await;
        match checked(&self.sessions, result, FAILED).await {
            Ok(user) => {
                self.view.updater().apply(|view| view.user = Some(user));
                Toast::success("Perfil actualizado correctamente!")
            }
            Err(toast) => toast,
        }
    }

    /// Save a prescription and reload the list.
    ///
    /// At least one medicine must be named.
    pub async fn create_receta(&self, receta: &NewReceta) -> Toast {
        if receta
            .medicamentos
            .iter()
            .all(|medicamento| medicamento.nombre.trim().is_empty())
        {
            return Toast::error("Agrega al menos un medicamento");
        }
        let result = match self.sessions.require() {
            Ok(_) => self.records.create_receta(receta).await.map_err(Error::from),
            Err(err) => Err(err),
        };
        if let Err(toast) = checked(&self.sessions, result, "Error al crear la receta").await {
            return toast;
        }
        if let Err(toast) = self.load().await {
            warn!(message = %toast.message, "receta list reload failed");
        }
        Toast::success("Receta creada correctamente!")
    }

    /// Create an account from the admin form or the register screen.
    pub async fn create_user(&self, profile: &NewProfile) -> Toast {
        let result = self.auth.create_profile(profile).await.map_err(Error::from);
        match checked(&self.sessions, result, "Error al crear el usuario").await {
            Ok(_) => Toast::success("Usuario creado correctamente!"),
            Err(toast) => toast,
        }
    }
}
