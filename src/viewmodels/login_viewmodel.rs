// ============================================================================
// LOGIN VIEWMODEL - Formulario de acceso
// ============================================================================

use crate::config::CONFIG;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginViewModel {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LoginViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_string();
    }

    pub fn set_password(&mut self, value: &str) {
        self.password = value.to_string();
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn password_input_type(&self) -> &'static str {
        if self.show_password {
            "text"
        } else {
            "password"
        }
    }

    /// `false` si ya hay un intento en curso
    pub fn begin(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.is_loading = true;
        self.error = None;
        true
    }

    pub fn finish(&mut self, result: Result<(), String>) {
        self.is_loading = false;
        if let Err(message) = result {
            self.error = Some(message);
        } else {
            self.password.clear();
        }
    }
}

/// Destino tras el login: `next` si es una ruta interna, si no la ruta por defecto
pub fn post_login_target(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => CONFIG.default_authenticated_route.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ciclo_de_envio() {
        let mut vm = LoginViewModel::new();
        vm.set_email("admin@clinica.co");
        vm.set_password("x");
        assert!(vm.begin());
        assert!(!vm.begin());
        vm.finish(Err("No se pudo iniciar sesión.".into()));
        assert_eq!(vm.error.as_deref(), Some("No se pudo iniciar sesión."));
        assert!(!vm.is_loading);

        assert!(vm.begin());
        assert!(vm.error.is_none());
        vm.finish(Ok(()));
        assert!(vm.password.is_empty());
    }

    #[test]
    fn test_mostrar_password() {
        let mut vm = LoginViewModel::new();
        assert_eq!(vm.password_input_type(), "password");
        vm.toggle_password();
        assert_eq!(vm.password_input_type(), "text");
    }

    #[test]
    fn test_destino_tras_login() {
        assert_eq!(post_login_target(Some("/patients")), "/patients");
        assert_eq!(post_login_target(Some("//evil.com")), CONFIG.default_authenticated_route);
        assert_eq!(post_login_target(Some("https://x.co")), CONFIG.default_authenticated_route);
        assert_eq!(post_login_target(None), CONFIG.default_authenticated_route);
    }
}
