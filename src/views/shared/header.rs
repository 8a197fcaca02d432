// ============================================================================
// HEADER - Barra superior con navegación y logout
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_click, set_disabled, set_text_content, ElementBuilder};
use crate::router::{NavTab, Route};
use crate::services::ApiClient;
use crate::state::AppState;
use crate::viewmodels::SessionViewModel;

pub fn render_header(state: &AppState, route: &Route) -> Result<Element, JsValue> {
    let session = state.session.snapshot();
    let role = session.role();
    let active_tab = route.tab();

    let header = ElementBuilder::new("header")?.class("app-header").build();

    let brand = ElementBuilder::new("div")?
        .class("app-brand")
        .text("Coldesthetic")
        .build();
    append_child(&header, &brand)?;

    let nav = ElementBuilder::new("nav")?.class("app-nav").build();
    for tab in NavTab::ALL.iter().filter(|t| t.visible_for(role)) {
        let class = if Some(*tab) == active_tab { "nav-btn active" } else { "nav-btn" };
        let button = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class(class)
            .text(tab.label())
            .build();
        let path = tab.path();
        on_click(&button, move |_| crate::navigate(path))?;
        append_child(&nav, &button)?;
    }
    append_child(&header, &nav)?;

    let user_box = ElementBuilder::new("div")?.class("app-user").build();
    if let Some(user) = &session.user {
        let name = ElementBuilder::new("span")?
            .class("app-user-name")
            .text(&user.name)
            .build();
        append_child(&user_box, &name)?;
    }

    let logout_btn = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-logout")
        .text(if session.is_logging_out { "Saliendo..." } else { "Cerrar sesión" })
        .flag("disabled", session.is_logging_out)?
        .build();
    {
        let state = state.clone();
        let button = logout_btn.clone();
        on_click(&logout_btn, move |_| {
            set_disabled(&button, true);
            set_text_content(&button, "Saliendo...");
            let state = state.clone();
            spawn_local(async move {
                SessionViewModel::new(ApiClient::new()).logout(&state.session).await;
                // Primero se navega; la guarda no debe ver "sin usuario" antes
                crate::navigate_with("/", true);
                state.session.set_logging_out(false);
            });
        })?;
    }
    append_child(&user_box, &logout_btn)?;
    append_child(&header, &user_box)?;

    Ok(header)
}
