// ============================================================================
// LOGIN VIEW - Formulario de acceso
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_click, on_input, on_submit, set_attribute, ElementBuilder};
use crate::services::ApiClient;
use crate::state::AppState;
use crate::viewmodels::login_viewmodel::post_login_target;
use crate::viewmodels::SessionViewModel;
use crate::views::shared::{form_alert, text_field};

/// Renderizar vista de login
pub fn render_login(state: &AppState, next: Option<&str>) -> Result<Element, JsValue> {
    let vm = state.login.borrow().clone();

    let screen = ElementBuilder::new("div")?.class("login-screen").build();
    let card = ElementBuilder::new("div")?.class("login-container").build();

    let header = ElementBuilder::new("div")?
        .class("login-header")
        .child(ElementBuilder::new("h1")?.text("Coldesthetic").build())?
        .child(ElementBuilder::new("p")?.text("Ingresa con tu cuenta").build())?
        .build();
    append_child(&card, &header)?;

    let form = ElementBuilder::new("form")?.class("login-form").build();

    let email = text_field("Correo electrónico", "login-email", "email", &vm.email, "correo@clinica.com")?;
    set_attribute(&email.control, "autocomplete", "username")?;
    {
        let state = state.clone();
        on_input(&email.control, move |value| state.login.borrow_mut().set_email(&value))?;
    }
    append_child(&form, &email.group)?;

    let password = text_field(
        "Contraseña",
        "login-password",
        vm.password_input_type(),
        &vm.password,
        "••••••••",
    )?;
    set_attribute(&password.control, "autocomplete", "current-password")?;
    {
        let state = state.clone();
        on_input(&password.control, move |value| state.login.borrow_mut().set_password(&value))?;
    }
    let toggle = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-toggle-password")
        .text(if vm.show_password { "Ocultar" } else { "Mostrar" })
        .build();
    {
        let state = state.clone();
        on_click(&toggle, move |_| {
            state.login.borrow_mut().toggle_password();
            state.notify_subscribers();
        })?;
    }
    append_child(&password.group, &toggle)?;
    append_child(&form, &password.group)?;

    append_child(&form, &form_alert("login-error", "error", vm.error.as_deref())?)?;

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn-login")
        .flag("disabled", vm.is_loading)?
        .text(if vm.is_loading { "Ingresando..." } else { "Iniciar sesión" })
        .build();
    append_child(&form, &submit)?;

    {
        let state = state.clone();
        let target = post_login_target(next);
        on_submit(&form, move || {
            let (email, password) = {
                let mut vm = state.login.borrow_mut();
                if !vm.begin() {
                    return;
                }
                (vm.email.clone(), vm.password.clone())
            };
            state.notify_subscribers();

            let state = state.clone();
            let target = target.clone();
            spawn_local(async move {
                let result = SessionViewModel::new(ApiClient::new())
                    .login(&state.session, &email, &password)
                    .await;
                let ok = result.is_ok();
                state.login.borrow_mut().finish(result);
                if ok {
                    crate::navigate_with(&target, true);
                } else {
                    state.notify_subscribers();
                }
            });
        })?;
    }

    append_child(&card, &form)?;
    append_child(&screen, &card)?;
    Ok(screen)
}
