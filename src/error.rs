// ============================================================================
// ERRORES DE API - Tipos explícitos para cada fallo de comunicación
// ============================================================================

use serde::Deserialize;
use std::collections::BTreeMap;

/// Error devuelto por cualquier llamada al backend
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Error de red: {0}")]
    Network(String),
    #[error("Solicitud cancelada")]
    Aborted,
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("sin detalle"))]
    Http { status: u16, message: Option<String> },
    #[error("Respuesta inválida: {0}")]
    Parse(String),
    #[error("Error serializando la solicitud: {0}")]
    Serialization(String),
    #[error("Error del navegador: {0}")]
    Browser(String),
}

impl ApiError {
    /// Mensaje para el usuario: el del servidor si existe, si no `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::JsError(js) if js.name == "AbortError" => ApiError::Aborted,
            gloo_net::Error::JsError(js) => ApiError::Network(js.message),
            gloo_net::Error::SerdeError(e) => ApiError::Parse(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

/// Cuerpo de error del backend (`{message, errors: {campo: [..]}}`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiErrorBody {
    /// `message` primero; si no hay, todos los errores de validación unidos
    pub fn flatten(&self) -> Option<String> {
        if let Some(message) = self.message.as_ref().filter(|m| !m.trim().is_empty()) {
            return Some(message.clone());
        }
        let joined = self
            .errors
            .values()
            .flatten()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// Intenta leer el cuerpo de error; un cuerpo no-JSON se ignora
    pub fn parse(text: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(text).ok()?.flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefiere_mensaje_del_servidor() {
        let err = ApiError::Http { status: 422, message: Some("El email ya existe".into()) };
        assert_eq!(err.user_message("Error al guardar"), "El email ya existe");

        let err = ApiError::Http { status: 500, message: None };
        assert_eq!(err.user_message("Error al guardar"), "Error al guardar");

        let err = ApiError::Network("offline".into());
        assert_eq!(err.user_message("Error inesperado"), "Error inesperado");
    }

    #[test]
    fn test_cuerpo_de_error_con_validaciones() {
        let body = r#"{"errors":{"email":["Email inválido."],"name":["Nombre requerido."]}}"#;
        assert_eq!(
            ApiErrorBody::parse(body).as_deref(),
            Some("Email inválido. Nombre requerido.")
        );

        let body = r#"{"message":"No autorizado","errors":{"x":["y"]}}"#;
        assert_eq!(ApiErrorBody::parse(body).as_deref(), Some("No autorizado"));

        assert_eq!(ApiErrorBody::parse("<html>"), None);
        assert_eq!(ApiErrorBody::parse("{}"), None);
    }

    #[test]
    fn test_not_found() {
        assert!(ApiError::Http { status: 404, message: None }.is_not_found());
        assert!(!ApiError::Aborted.is_not_found());
        assert!(ApiError::Aborted.is_aborted());
    }
}
