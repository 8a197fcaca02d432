// ============================================================================
// HOME - Pantalla pública de entrada
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{on_click, ElementBuilder};
use crate::state::AppState;
use crate::views::shared::button;

pub fn render_home(state: &AppState) -> Result<Element, JsValue> {
    let logged_in = state.session.snapshot().user.is_some();

    let action = if logged_in {
        let btn = button("btn-primary", "Ir al panel")?;
        on_click(&btn, |_| crate::navigate(&CONFIG.default_authenticated_route))?;
        btn
    } else {
        let btn = button("btn-primary", "Iniciar sesión")?;
        on_click(&btn, |_| crate::navigate("/login"))?;
        btn
    };

    Ok(ElementBuilder::new("div")?
        .class("home-screen")
        .child(ElementBuilder::new("h1")?.text("Coldesthetic").build())?
        .child(
            ElementBuilder::new("p")?
                .text("Sistema de gestión clínica")
                .build(),
        )?
        .child(action)?
        .build())
}

/// Ruta desconocida
pub fn render_not_found() -> Result<Element, JsValue> {
    let back = button("btn-secondary", "Volver al inicio")?;
    on_click(&back, |_| crate::navigate("/"))?;
    Ok(ElementBuilder::new("div")?
        .class("home-screen")
        .child(ElementBuilder::new("h1")?.text("Página no encontrada").build())?
        .child(back)?
        .build())
}
