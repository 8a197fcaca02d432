use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub search_debounce_ms: u32,
    pub toast_duration_ms: u32,
    pub csrf: CsrfConfig,
    pub default_authenticated_route: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            search_debounce_ms: 300,
            toast_duration_ms: 3500,
            csrf: CsrfConfig::default(),
            default_authenticated_route: "/register-patient".to_string(),
        }
    }
}

/// Nombres de la cookie y del header anti-CSRF (Laravel Sanctum)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfConfig {
    pub cookie_name: String,
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: "XSRF-TOKEN".to_string(),
            header_name: "X-XSRF-TOKEN".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: normalize_base_url(
                option_env!("API_BASE_URL").unwrap_or(&defaults.api_base_url),
            ),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            search_debounce_ms: option_env!("SEARCH_DEBOUNCE_MS")
                .unwrap_or("300").parse().unwrap_or(defaults.search_debounce_ms),
            toast_duration_ms: option_env!("TOAST_DURATION_MS")
                .unwrap_or("3500").parse().unwrap_or(defaults.toast_duration_ms),
            csrf: CsrfConfig {
                cookie_name: option_env!("CSRF_COOKIE_NAME")
                    .unwrap_or("XSRF-TOKEN").to_string(),
                header_name: option_env!("CSRF_HEADER_NAME")
                    .unwrap_or("X-XSRF-TOKEN").to_string(),
            },
            default_authenticated_route: option_env!("DEFAULT_AUTHENTICATED_ROUTE")
                .unwrap_or("/register-patient").to_string(),
        }
    }

    /// URL absoluta para una ruta del backend (`path` empieza por `/`)
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Quita las barras finales de la URL base
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_pierde_barras_finales() {
        assert_eq!(normalize_base_url("http://api.local:8000///"), "http://api.local:8000");
        assert_eq!(normalize_base_url(" https://x.co "), "https://x.co");
    }

    #[test]
    fn test_api_url_concatena_ruta() {
        let config = AppConfig::default();
        assert_eq!(config.api_url("/api/v1/me"), "http://localhost:8000/api/v1/me");
        assert!(!config.is_production());
    }
}
