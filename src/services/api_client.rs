// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP.
// Todas las llamadas van con `credentials: include` y `Accept: application/json`;
// las que modifican datos llevan además el header anti-CSRF.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::{AbortSignal, FormData, RequestCredentials};

use crate::config::{CsrfConfig, CONFIG};
use crate::error::{ApiError, ApiErrorBody};
use crate::services::csrf::read_csrf_token;
use crate::utils::constants::API_PREFIX;

/// Verbo HTTP de una llamada
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    csrf: CsrfConfig,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.api_base_url.clone(),
            csrf: CONFIG.csrf.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL absoluta de un recurso bajo `/api/v1`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// URL absoluta fuera de `/api/v1` (p.ej. `/sanctum/csrf-cookie`)
    pub fn root_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: HttpMethod, url: &str) -> RequestBuilder {
        let builder = match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Patch => Request::patch(url),
            HttpMethod::Delete => Request::delete(url),
        }
        .credentials(RequestCredentials::Include)
        .header("Accept", "application/json");

        if method.is_mutating() {
            builder.header(&self.csrf.header_name, &read_csrf_token(&self.csrf.cookie_name))
        } else {
            builder
        }
    }

    /// Convierte respuestas no-2xx en `ApiError::Http` con el mensaje del backend
    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let message = match response.text().await {
            Ok(text) => ApiErrorBody::parse(&text),
            Err(_) => None,
        };
        log::warn!("⚠️ [API] {} -> HTTP {}", response.url(), status);
        Err(ApiError::Http { status, message })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// GET de un recurso JSON, cancelable con `signal`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<T, ApiError> {
        let url = self.api_url(path);
        log::debug!("🌐 [API] GET {}", url);
        let response = self
            .builder(HttpMethod::Get, &url)
            .abort_signal(signal)
            .send()
            .await?;
        Self::parse(Self::check(response).await?).await
    }

    /// Petición con cuerpo JSON y respuesta JSON
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send_json_raw(method, path, body).await?;
        Self::parse(response).await
    }

    /// Igual que `send_json` pero descartando el cuerpo de la respuesta
    pub async fn send_json_ignore<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_json_raw(method, path, body).await.map(|_| ())
    }

    async fn send_json_raw<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        let url = self.api_url(path);
        log::debug!("🌐 [API] {:?} {}", method, url);
        let request = self
            .builder(method, &url)
            .json(body)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let response = request.send().await?;
        Self::check(response).await
    }

    /// Petición sin cuerpo (PATCH de estado, DELETE, logout)
    pub async fn send_empty(&self, method: HttpMethod, url: &str) -> Result<(), ApiError> {
        log::debug!("🌐 [API] {:?} {}", method, url);
        let response = self.builder(method, url).send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// Petición multipart (`FormData`); el navegador pone el boundary
    pub async fn send_form(
        &self,
        method: HttpMethod,
        path: &str,
        form: FormData,
    ) -> Result<(), ApiError> {
        let url = self.api_url(path);
        log::debug!("🌐 [API] {:?} {} (multipart)", method, url);
        let request = self
            .builder(method, &url)
            .body(form)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let response = request.send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// GET fuera de `/api/v1` sin leer el cuerpo
    pub async fn touch(&self, path: &str) -> Result<(), ApiError> {
        let url = self.root_url(path);
        let response = self.builder(HttpMethod::Get, &url).send().await?;
        Self::check(response).await.map(|_| ())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
