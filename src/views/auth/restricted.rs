// ============================================================================
// RESTRICTED - Pantalla para visitantes sin sesión
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{on_click, ElementBuilder};
use crate::views::shared::button;

pub fn render_restricted() -> Result<Element, JsValue> {
    let login_btn = button("btn-primary", "Iniciar sesión")?;
    on_click(&login_btn, |_| crate::navigate("/login"))?;

    Ok(ElementBuilder::new("div")?
        .class("restricted-screen")
        .child(ElementBuilder::new("div")?.class("restricted-icon").text("🔒").build())?
        .child(ElementBuilder::new("h1")?.text("Acceso Restringido").build())?
        .child(
            ElementBuilder::new("p")?
                .text("Debes iniciar sesión para ver esta página.")
                .build(),
        )?
        .child(login_btn)?
        .build())
}
