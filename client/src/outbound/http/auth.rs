//! Account endpoints.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::Form;

use super::dto::{LoginResponseDto, PasswordDto};
use super::gateway::{ApiGateway, decode, file_part};
use crate::domain::ports::{AuthGateway, GatewayError};
use crate::domain::{
    LoginCredentials, NewProfile, PasswordReset, ProfileUpdate, Session, Specialty, User, UserId,
};

#[async_trait]
impl AuthGateway for ApiGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, GatewayError> {
        let body = serde_json::json!({
            "email": credentials.email(),
            "password": credentials.password(),
        });
        let response: LoginResponseDto =
            self.send_json(Method::POST, "api/users/login", &body).await?;
        response.into_session().map_err(GatewayError::decode)
    }

    async fn create_profile(&self, profile: &NewProfile) -> Result<User, GatewayError> {
        let form = new_profile_form(profile)?;
        decode(&self.post_multipart("api/users", form).await?)
    }

    async fn edit_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, GatewayError> {
        let form = profile_update_form(update)?;
        decode(&self.post_multipart(&format!("api/users/perfil/{id}"), form).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        self.get_json("api/users").await
    }

    async fn list_specialties(&self) -> Result<Vec<Specialty>, GatewayError> {
        self.get_json("api/specialty").await
    }

    async fn change_password(&self, reset: &PasswordReset) -> Result<(), GatewayError> {
        let path = format!("api/users/recovered-password/{}", reset.recovery_token());
        let body = PasswordDto {
            password: reset.password(),
        };
        self.send_json_unit(Method::POST, &path, &body).await
    }
}

fn new_profile_form(profile: &NewProfile) -> Result<Form, GatewayError> {
    let mut form = Form::new()
        .text("name", profile.name.clone())
        .text("email", profile.email.clone())
        .text("password", profile.password.as_str().to_owned())
        .text("rol", profile.role.as_str());
    form = optional_text(form, "phone", profile.phone.as_deref());
    form = optional_text(form, "address", profile.address.as_deref());
    form = optional_text(form, "specialty", profile.specialty.as_ref().map(AsRef::as_ref));
    if let Some(image) = &profile.image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}

fn profile_update_form(update: &ProfileUpdate) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    form = optional_text(form, "name", update.name.as_deref());
    form = optional_text(form, "email", update.email.as_deref());
    form = optional_text(form, "phone", update.phone.as_deref());
    form = optional_text(form, "address", update.address.as_deref());
    if let Some(image) = &update.image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}

fn optional_text(form: Form, name: &'static str, value: Option<&str>) -> Form {
    match value {
        Some(value) => form.text(name, value.to_owned()),
        None => form,
    }
}
