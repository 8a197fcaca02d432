// ============================================================================
// TOAST STATE - Cola de avisos flotantes
// ============================================================================
// La vista agenda el cierre automático con `gloo_timers`; aquí solo vive la cola.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::error::ApiError;
use crate::state::reactivity::ReactiveState;
use crate::utils::constants::MSG_UNEXPECTED;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
        }
    }
}

/// Aviso producido por un viewmodel, todavía sin id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastMessage {
    pub kind: ToastKind,
    pub message: String,
}

impl ToastMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Error, message: message.into() }
    }

    /// Mensaje del servidor o `fallback`; sin respuesta HTTP -> "Error inesperado"
    pub fn from_api_error(err: &ApiError, fallback: &str) -> Self {
        let message = match err {
            ApiError::Http { .. } => err.user_message(fallback),
            _ => MSG_UNEXPECTED.to_string(),
        };
        Self::error(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone)]
pub struct ToastState {
    toasts: ReactiveState<Vec<Toast>>,
    next_id: Rc<Cell<u32>>,
}

impl ToastState {
    pub fn new() -> Self {
        Self {
            toasts: ReactiveState::new(Vec::new()),
            next_id: Rc::new(Cell::new(1)),
        }
    }

    /// Encola y devuelve el id para poder cerrarlo luego
    pub fn push(&self, toast: ToastMessage) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        match toast.kind {
            ToastKind::Success => log::info!("🔔 [TOAST] {}", toast.message),
            ToastKind::Error => log::warn!("🔔 [TOAST] {}", toast.message),
        }
        self.toasts.update(|list| {
            list.push(Toast { id, kind: toast.kind, message: toast.message });
        });
        id
    }

    pub fn dismiss(&self, id: u32) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }

    pub fn list(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.toasts.subscribe(callback);
    }
}

impl Default for ToastState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cola_y_cierre() {
        let toasts = ToastState::new();
        let a = toasts.push(ToastMessage::success("Remitente creado"));
        let b = toasts.push(ToastMessage::error("Error al guardar"));
        assert_ne!(a, b);
        assert_eq!(toasts.list().len(), 2);

        toasts.dismiss(a);
        let rest = toasts.list();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].kind, ToastKind::Error);
        assert_eq!(rest[0].message, "Error al guardar");
    }

    #[test]
    fn test_toast_desde_error() {
        let http = ApiError::Http { status: 422, message: Some("Email duplicado".into()) };
        assert_eq!(ToastMessage::from_api_error(&http, "Error al guardar").message, "Email duplicado");
        let bare = ApiError::Http { status: 500, message: None };
        assert_eq!(ToastMessage::from_api_error(&bare, "Error al guardar").message, "Error al guardar");
        let net = ApiError::Network("offline".into());
        assert_eq!(ToastMessage::from_api_error(&net, "Error al guardar").message, MSG_UNEXPECTED);
    }
}
