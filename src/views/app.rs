// ============================================================================
// APP VIEW - Layout, guardas y página según la ruta
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::router::{Route, RouteAccess};
use crate::state::{AppState, SessionSnapshot};
use crate::viewmodels::{GateEffect, GateOutcome, GateView};
use crate::views::admin::{clinical_images, remitentes, stats};
use crate::views::auth::{render_login, render_restricted};
use crate::views::home::{render_home, render_not_found};
use crate::views::patients::{patient_history, patient_list, record_detail};
use crate::views::register::render_wizard;
use crate::views::shared::{render_header, render_toast_container};

/// Resultado de un render completo
pub struct AppView {
    pub root: Element,
    /// Efectos de las guardas que `App` ejecuta después de pintar
    pub effects: Vec<GateEffect>,
    /// La página quedó visible y puede pedir sus datos
    pub page_ready: bool,
}

/// Auth gate y, para rutas con roles, role gate encima
fn evaluate_access(state: &AppState, route: &Route, session: &SessionSnapshot) -> GateOutcome {
    match route.access() {
        RouteAccess::Public => GateOutcome {
            view: GateView::Children,
            effects: Vec::new(),
        },
        RouteAccess::Authenticated => state.auth_gate.borrow_mut().evaluate(session),
        RouteAccess::Roles(allow) => {
            let auth = state.auth_gate.borrow_mut().evaluate(session);
            if !auth.allows_children() {
                return auth;
            }
            let mut role_gate = state.role_gate.borrow_mut();
            role_gate.set_allow(allow);
            role_gate.evaluate(session)
        }
    }
}

pub fn render_app(state: &AppState) -> Result<AppView, JsValue> {
    let route = state.current_route();
    let session = state.session.snapshot();
    let outcome = evaluate_access(state, &route, &session);

    let shell = ElementBuilder::new("div")?.class("app-shell").build();

    let is_private = route.access() != RouteAccess::Public;
    if is_private && session.user.is_some() {
        append_child(&shell, &render_header(state, &route)?)?;
    }

    let main = ElementBuilder::new("main")?.id("page")?.class("app-main").build();
    match outcome.view {
        GateView::Nothing => {}
        GateView::Restricted => append_child(&main, &render_restricted()?)?,
        GateView::Children => append_child(&main, &render_page(state, &route)?)?,
    }
    append_child(&shell, &main)?;
    append_child(&shell, &render_toast_container(state)?)?;

    Ok(AppView {
        root: shell,
        page_ready: outcome.allows_children(),
        effects: outcome.effects,
    })
}

fn render_page(state: &AppState, route: &Route) -> Result<Element, JsValue> {
    match route {
        Route::Home => render_home(state),
        Route::Login { next } => render_login(state, next.as_deref()),
        Route::RegisterPatient => render_wizard(state),
        Route::Patients => patient_list::render_patients(state),
        Route::PatientHistory { .. } => patient_history::render_patient_history(state),
        Route::RecordDetail { .. } => record_detail::render_record_detail(state),
        Route::ControlImages => clinical_images::render_clinical_images(state),
        Route::Stats => stats::render_stats(state),
        Route::Remitentes => remitentes::render_remitentes(state),
        Route::NotFound => render_not_found(),
    }
}

/// Fetch-on-mount: cada página pide sus datos la primera vez que se ve
pub fn load_route_data(state: &AppState) {
    match state.current_route() {
        Route::Patients => patient_list::load_initial(state),
        Route::PatientHistory { .. } => patient_history::load_history(state),
        Route::RecordDetail { .. } => record_detail::load_record(state),
        Route::ControlImages => clinical_images::load_images(state),
        Route::Stats => stats::load_stats(state),
        Route::Remitentes => remitentes::load_remitentes(state),
        _ => {}
    }
}
