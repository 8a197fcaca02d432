// ============================================================================
// AUTH SERVICE - Sesión por cookie (Laravel Sanctum)
// ============================================================================

use crate::error::ApiError;
use crate::models::api::MaybeEnveloped;
use crate::models::{LoginResponse, SessionUser};
use crate::services::api_client::{ApiClient, HttpMethod};
use crate::utils::constants::CSRF_COOKIE_PATH;
use serde::Serialize;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Operaciones de sesión que usa el `SessionViewModel`
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    /// `GET /api/v1/me`
    async fn fetch_me(&self) -> Result<SessionUser, ApiError>;
    /// Cookie CSRF + `POST /api/v1/login`
    async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError>;
    /// `POST /api/v1/logout`
    async fn logout(&self) -> Result<(), ApiError>;
}

impl SessionApi for ApiClient {
    async fn fetch_me(&self) -> Result<SessionUser, ApiError> {
        let user = self
            .get_json::<MaybeEnveloped<SessionUser>>("/me", None)
            .await?
            .into_inner();
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        log::info!("🔐 [AUTH] Solicitando cookie CSRF");
        self.touch(CSRF_COOKIE_PATH).await?;

        let response: LoginResponse = self
            .send_json(HttpMethod::Post, "/login", &LoginRequest { email, password })
            .await?;
        Ok(response.user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.api_url("/logout");
        self.send_empty(HttpMethod::Post, &url).await
    }
}
