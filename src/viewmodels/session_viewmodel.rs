// ============================================================================
// SESSION VIEWMODEL - LÓGICA DE SESIÓN
// ============================================================================
// Chequeo inicial (/me), login y logout contra un `SessionApi`.
// El resultado se escribe en el `SessionState` compartido.
// ============================================================================

use crate::error::ApiError;
use crate::services::SessionApi;
use crate::state::SessionState;
use crate::utils::constants::{MSG_LOGIN_FAILED, MSG_SERVER_UNREACHABLE};

/// ViewModel de sesión - SOLO lógica de negocio
pub struct SessionViewModel<A: SessionApi> {
    api: A,
}

impl<A: SessionApi> SessionViewModel<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Pregunta al backend quién es el usuario; cualquier fallo es "sin usuario"
    pub async fn check_session(&self, session: &SessionState) {
        match self.api.fetch_me().await {
            Ok(user) => {
                log::info!("✅ [AUTH] Sesión activa: {} ({})", user.email, user.role.as_str());
                session.set_user(Some(user));
            }
            Err(err) => {
                log::info!("🔒 [AUTH] Sin sesión: {}", err);
                session.set_user(None);
            }
        }
        session.mark_checked();
    }

    /// Login; devuelve el mensaje a mostrar si falla
    pub async fn login(&self, session: &SessionState, email: &str, password: &str) -> Result<(), String> {
        log::info!("🔐 [AUTH] Iniciando sesión para {}", email);
        match self.api.login(email.trim(), password).await {
            Ok(user) => {
                log::info!("✅ [AUTH] Login correcto: {}", user.email);
                session.set_user(Some(user));
                Ok(())
            }
            Err(err) => {
                log::error!("❌ [AUTH] Login fallido: {}", err);
                Err(login_error_message(&err))
            }
        }
    }

    /// Cierra sesión; el usuario se limpia aunque el backend falle.
    /// `is_logging_out` queda activo hasta que el llamador termine de navegar.
    pub async fn logout(&self, session: &SessionState) {
        session.set_logging_out(true);
        if let Err(err) = self.api.logout().await {
            log::error!("❌ [AUTH] Error en logout: {}", err);
        }
        session.set_user(None);
        log::info!("👋 [AUTH] Sesión cerrada");
    }
}

/// Mensaje del servidor si lo hay; fallo de red -> error de conexión
pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Network(_) | ApiError::Browser(_) => MSG_SERVER_UNREACHABLE.to_string(),
        other => other.user_message(MSG_LOGIN_FAILED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SessionUser, UserStatus};
    use std::cell::{Cell, RefCell};

    fn admin() -> SessionUser {
        SessionUser {
            id: 1,
            name: "Admin".into(),
            email: "admin@clinica.co".into(),
            role: Role::Admin,
            status: UserStatus::Active,
        }
    }

    #[derive(Default)]
    struct MockApi {
        me: RefCell<Option<Result<SessionUser, ApiError>>>,
        login: RefCell<Option<Result<SessionUser, ApiError>>>,
        logout_result: RefCell<Option<Result<(), ApiError>>>,
        logout_calls: Cell<u32>,
    }

    impl SessionApi for MockApi {
        async fn fetch_me(&self) -> Result<SessionUser, ApiError> {
            self.me.borrow_mut().take().unwrap_or(Err(ApiError::Network("sin mock".into())))
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<SessionUser, ApiError> {
            self.login.borrow_mut().take().unwrap_or(Err(ApiError::Network("sin mock".into())))
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.logout_calls.set(self.logout_calls.get() + 1);
            self.logout_result.borrow_mut().take().unwrap_or(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_check_session_con_usuario() {
        let api = MockApi::default();
        *api.me.borrow_mut() = Some(Ok(admin()));
        let session = SessionState::new();
        SessionViewModel::new(api).check_session(&session).await;

        let snap = session.snapshot();
        assert!(snap.auth_checked);
        assert_eq!(snap.user, Some(admin()));
    }

    #[tokio::test]
    async fn test_check_session_401_marca_chequeado_sin_usuario() {
        let api = MockApi::default();
        *api.me.borrow_mut() = Some(Err(ApiError::Http { status: 401, message: None }));
        let session = SessionState::new();
        SessionViewModel::new(api).check_session(&session).await;

        let snap = session.snapshot();
        assert!(snap.auth_checked);
        assert!(snap.user.is_none());
        assert!(snap.is_logged_out());
    }

    #[tokio::test]
    async fn test_logout_limpia_usuario_aunque_falle() {
        let api = MockApi::default();
        *api.logout_result.borrow_mut() = Some(Err(ApiError::Http { status: 500, message: None }));
        let session = SessionState::new();
        session.set_user(Some(admin()));

        let vm = SessionViewModel::new(api);
        vm.logout(&session).await;

        let snap = session.snapshot();
        assert!(snap.user.is_none());
        assert!(snap.is_logging_out);
        assert!(!snap.is_logged_out());
        assert_eq!(vm.api.logout_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_login_guarda_usuario_y_mensajes_de_error() {
        let api = MockApi::default();
        *api.login.borrow_mut() = Some(Ok(admin()));
        let session = SessionState::new();
        let vm = SessionViewModel::new(api);
        assert!(vm.login(&session, "admin@clinica.co", "secreto").await.is_ok());
        assert!(session.snapshot().auth_checked);

        *vm.api.login.borrow_mut() = Some(Err(ApiError::Http {
            status: 422,
            message: Some("Credenciales inválidas".into()),
        }));
        assert_eq!(vm.login(&session, "x", "y").await, Err("Credenciales inválidas".to_string()));

        *vm.api.login.borrow_mut() = Some(Err(ApiError::Http { status: 500, message: None }));
        assert_eq!(vm.login(&session, "x", "y").await, Err(MSG_LOGIN_FAILED.to_string()));

        *vm.api.login.borrow_mut() = Some(Err(ApiError::Network("offline".into())));
        assert_eq!(vm.login(&session, "x", "y").await, Err(MSG_SERVER_UNREACHABLE.to_string()));
    }
}
