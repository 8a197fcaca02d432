// ============================================================================
// GUARDS - Decisiones de acceso (sin DOM)
// ============================================================================
// Cada guarda recibe la foto de la sesión y devuelve qué renderizar y qué
// efectos ejecutar. La vista ejecuta los efectos; aquí solo se recuerda si la
// alerta y la redirección ya se dispararon para no repetirlas.
// ============================================================================

use crate::models::Role;
use crate::state::SessionSnapshot;
use crate::utils::constants::MSG_UNAUTHORIZED;

/// Qué debe pintar la vista protegida
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateView {
    /// Todavía no hay decisión (o se está saliendo)
    Nothing,
    /// Pantalla "Acceso Restringido"
    Restricted,
    Children,
}

/// Efecto que ejecuta la capa de vista
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateEffect {
    Alert(&'static str),
    /// `history.replaceState` a la ruta indicada
    Redirect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateOutcome {
    pub view: GateView,
    pub effects: Vec<GateEffect>,
}

impl GateOutcome {
    fn render(view: GateView) -> Self {
        Self { view, effects: Vec::new() }
    }

    pub fn allows_children(&self) -> bool {
        self.view == GateView::Children
    }
}

/// Alerta y redirección de un solo disparo
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct OneShot {
    alert_shown: bool,
    redirected: bool,
}

impl OneShot {
    fn alert(&mut self, effects: &mut Vec<GateEffect>, msg: &'static str) {
        if !self.alert_shown {
            self.alert_shown = true;
            effects.push(GateEffect::Alert(msg));
        }
    }

    fn redirect(&mut self, effects: &mut Vec<GateEffect>, to: &str) {
        if !self.redirected {
            self.redirected = true;
            effects.push(GateEffect::Redirect(to.to_string()));
        }
    }
}

/// Exige una sesión con usuario
#[derive(Clone, Debug, Default)]
pub struct AuthGate {
    fired: OneShot,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, session: &SessionSnapshot) -> GateOutcome {
        if !session.auth_checked {
            return GateOutcome::render(GateView::Nothing);
        }
        if session.user.is_some() {
            return GateOutcome::render(GateView::Children);
        }
        if !session.is_logged_out() {
            return GateOutcome::render(GateView::Nothing);
        }

        let mut effects = Vec::new();
        self.fired.alert(&mut effects, MSG_UNAUTHORIZED);
        self.fired.redirect(&mut effects, "/");
        GateOutcome { view: GateView::Restricted, effects }
    }

    /// Al cambiar de ruta la guarda vuelve a poder avisar
    pub fn reset(&mut self) {
        self.fired = OneShot::default();
    }
}

/// Lista de roles permitidos encima de `AuthGate`
#[derive(Clone, Debug)]
pub struct RoleGate {
    allow: Vec<Role>,
    fallback_route: String,
    fired: OneShot,
}

impl RoleGate {
    pub fn new(allow: &[Role], fallback_route: impl Into<String>) -> Self {
        Self {
            allow: allow.to_vec(),
            fallback_route: fallback_route.into(),
            fired: OneShot::default(),
        }
    }

    pub fn set_allow(&mut self, allow: &[Role]) {
        self.allow = allow.to_vec();
    }

    pub fn evaluate(&mut self, session: &SessionSnapshot) -> GateOutcome {
        if !session.auth_checked {
            return GateOutcome::render(GateView::Nothing);
        }
        if session.role().is_some_and(|role| self.allow.contains(&role)) {
            return GateOutcome::render(GateView::Children);
        }
        // Durante el logout no se avisa ni se redirige
        if session.is_logging_out {
            return GateOutcome::render(GateView::Nothing);
        }

        let mut effects = Vec::new();
        if session.role().is_none() {
            self.fired.redirect(&mut effects, "/");
            return GateOutcome { view: GateView::Nothing, effects };
        }

        self.fired.alert(&mut effects, MSG_UNAUTHORIZED);
        let fallback = self.fallback_route.clone();
        self.fired.redirect(&mut effects, &fallback);
        GateOutcome { view: GateView::Nothing, effects }
    }

    pub fn reset(&mut self) {
        self.fired = OneShot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionUser, UserStatus};

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: 7,
            name: "Usuario".into(),
            email: "u@clinica.co".into(),
            role,
            status: UserStatus::Active,
        }
    }

    fn checked(user: Option<SessionUser>) -> SessionSnapshot {
        SessionSnapshot { user, auth_checked: true, is_logging_out: false }
    }

    #[test]
    fn test_auth_gate_no_pinta_nada_mientras_chequea() {
        let mut gate = AuthGate::new();
        let outcome = gate.evaluate(&SessionSnapshot::default());
        assert_eq!(outcome.view, GateView::Nothing);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_auth_gate_alerta_y_redirige_una_sola_vez() {
        let mut gate = AuthGate::new();
        let session = checked(None);

        let first = gate.evaluate(&session);
        assert_eq!(first.view, GateView::Restricted);
        assert_eq!(
            first.effects,
            vec![GateEffect::Alert(MSG_UNAUTHORIZED), GateEffect::Redirect("/".into())]
        );

        for _ in 0..5 {
            let again = gate.evaluate(&session);
            assert_eq!(again.view, GateView::Restricted);
            assert!(again.effects.is_empty());
        }
    }

    #[test]
    fn test_auth_gate_sin_redireccion_durante_logout() {
        let mut gate = AuthGate::new();
        let session = SessionSnapshot { user: None, auth_checked: true, is_logging_out: true };
        let outcome = gate.evaluate(&session);
        assert!(outcome.effects.is_empty());
        assert!(!outcome.allows_children());

        // Al terminar el logout la guarda sí actúa
        let outcome = gate.evaluate(&checked(None));
        assert_eq!(outcome.effects.len(), 2);
    }

    #[test]
    fn test_auth_gate_logout_con_usuario_aun_presente() {
        let mut gate = AuthGate::new();
        let session = SessionSnapshot {
            user: Some(user(Role::Admin)),
            auth_checked: true,
            is_logging_out: true,
        };
        let outcome = gate.evaluate(&session);
        assert_eq!(outcome.view, GateView::Children);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_auth_gate_con_usuario_pinta_hijos() {
        let mut gate = AuthGate::new();
        let outcome = gate.evaluate(&checked(Some(user(Role::Remitente))));
        assert!(outcome.allows_children());
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_role_gate_remitente_nunca_ve_pagina_admin() {
        let mut gate = RoleGate::new(&[Role::Admin], "/register-patient");
        let session = checked(Some(user(Role::Remitente)));

        let first = gate.evaluate(&session);
        assert_eq!(first.view, GateView::Nothing);
        assert_eq!(
            first.effects,
            vec![
                GateEffect::Alert(MSG_UNAUTHORIZED),
                GateEffect::Redirect("/register-patient".into())
            ]
        );

        for _ in 0..3 {
            let again = gate.evaluate(&session);
            assert!(!again.allows_children());
            assert!(again.effects.is_empty());
        }
    }

    #[test]
    fn test_role_gate_sin_usuario_redirige_sin_alerta() {
        let mut gate = RoleGate::new(&[Role::Admin], "/register-patient");
        let outcome = gate.evaluate(&checked(None));
        assert_eq!(outcome.view, GateView::Nothing);
        assert_eq!(outcome.effects, vec![GateEffect::Redirect("/".into())]);
    }

    #[test]
    fn test_role_gate_permitido_y_logout() {
        let mut gate = RoleGate::new(&[Role::Admin], "/register-patient");
        assert!(gate.evaluate(&checked(Some(user(Role::Admin)))).allows_children());

        let leaving = SessionSnapshot { user: None, auth_checked: true, is_logging_out: true };
        assert!(gate.evaluate(&leaving).effects.is_empty());
    }

    #[test]
    fn test_role_gate_logout_con_usuario_permitido_sigue_pintando() {
        let mut gate = RoleGate::new(&[Role::Admin], "/register-patient");
        let leaving = SessionSnapshot {
            user: Some(user(Role::Admin)),
            auth_checked: true,
            is_logging_out: true,
        };
        let outcome = gate.evaluate(&leaving);
        assert_eq!(outcome.view, GateView::Children);
        assert!(outcome.effects.is_empty());

        let denied = SessionSnapshot {
            user: Some(user(Role::Remitente)),
            auth_checked: true,
            is_logging_out: true,
        };
        let outcome = gate.evaluate(&denied);
        assert_eq!(outcome.view, GateView::Nothing);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_reset_permite_volver_a_avisar() {
        let mut gate = AuthGate::new();
        let session = checked(None);
        gate.evaluate(&session);
        gate.reset();
        assert_eq!(gate.evaluate(&session).effects.len(), 2);
    }
}
