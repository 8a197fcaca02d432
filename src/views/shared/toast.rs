// ============================================================================
// TOASTS - Contenedor fijo y auto-cierre
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::{AppState, ToastMessage};

pub const TOAST_CONTAINER_ID: &str = "toast-container";

/// Encola un toast y programa su cierre
pub fn show_toast(state: &AppState, toast: ToastMessage) {
    let id = state.toasts.push(toast);
    let toasts = state.toasts.clone();
    Timeout::new(CONFIG.toast_duration_ms, move || toasts.dismiss(id)).forget();
}

pub fn render_toast_container(state: &AppState) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?
        .id(TOAST_CONTAINER_ID)?
        .class("toast-container")
        .attr("aria-live", "polite")?
        .build();
    fill_toasts(state, &container)?;
    Ok(container)
}

/// Pinta la cola actual dentro del contenedor (vacío previamente)
pub fn fill_toasts(state: &AppState, container: &Element) -> Result<(), JsValue> {
    for toast in state.toasts.list() {
        let item = ElementBuilder::new("div")?
            .class(&format!("toast {}", toast.kind.css_class()))
            .child(ElementBuilder::new("span")?.class("toast-icon").text(toast.kind.icon()).build())?
            .child(ElementBuilder::new("span")?.class("toast-message").text(&toast.message).build())?
            .build();
        let close = ElementBuilder::new("button")?
            .attr("type", "button")?
            .attr("aria-label", "Cerrar")?
            .class("toast-close")
            .text("×")
            .build();
        let toasts = state.toasts.clone();
        let id = toast.id;
        on_click(&close, move |_| toasts.dismiss(id))?;
        append_child(&item, &close)?;
        append_child(container, &item)?;
    }
    Ok(())
}
