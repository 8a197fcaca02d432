// ============================================================================
// SESSION STATE - Usuario actual, chequeo inicial y logout en curso
// ============================================================================

use crate::models::{Role, SessionUser};
use crate::state::reactivity::ReactiveState;

/// Foto inmutable de la sesión que reciben las guardas y las vistas
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<SessionUser>,
    pub auth_checked: bool,
    pub is_logging_out: bool,
}

impl SessionSnapshot {
    /// "No logueado" definitivo: ya se chequeó, no hay usuario y no se está saliendo
    pub fn is_logged_out(&self) -> bool {
        self.user.is_none() && self.auth_checked && !self.is_logging_out
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// Store de sesión compartido por toda la app
#[derive(Clone)]
pub struct SessionState {
    inner: ReactiveState<SessionSnapshot>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            inner: ReactiveState::new(SessionSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.get()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.inner.with(|s| s.user.clone())
    }

    /// Un usuario no nulo implica sesión chequeada
    pub fn set_user(&self, user: Option<SessionUser>) {
        self.inner.update(|s| {
            if user.is_some() {
                s.auth_checked = true;
            }
            s.user = user;
        });
    }

    pub fn mark_checked(&self) {
        self.inner.update(|s| s.auth_checked = true);
    }

    pub fn set_logging_out(&self, logging_out: bool) {
        self.inner.update(|s| s.is_logging_out = logging_out);
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.inner.subscribe(callback);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserStatus;

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: 1,
            name: "Dra. Ruiz".into(),
            email: "ruiz@clinica.co".into(),
            role,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn test_usuario_implica_chequeado() {
        let session = SessionState::new();
        assert!(!session.snapshot().auth_checked);
        session.set_user(Some(user(Role::Admin)));
        let snap = session.snapshot();
        assert!(snap.auth_checked);
        assert_eq!(snap.role(), Some(Role::Admin));
    }

    #[test]
    fn test_logged_out_definitivo() {
        let mut snap = SessionSnapshot::default();
        assert!(!snap.is_logged_out());
        snap.auth_checked = true;
        assert!(snap.is_logged_out());
        snap.is_logging_out = true;
        assert!(!snap.is_logged_out());
    }
}
