// ============================================================================
// COLDESTHETIC WEB - BACK-OFFICE MVVM ESTRICTO (RUST PURO)
// ============================================================================
// Arquitectura MVVM estricta:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación API
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

mod config;
mod error;
mod models;
mod services;
mod viewmodels;
mod state;
mod router;
mod dom;
mod views;
mod utils;
mod app;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;
use crate::router::Route;
use crate::services::ApiClient;
use crate::state::{AppState, UpdateType};
use crate::viewmodels::SessionViewModel;

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.is_logging_enabled() {
        let level = if CONFIG.is_production() { log::Level::Info } else { log::Level::Debug };
        wasm_logger::init(Config::new(level));
    }
    log::info!("🚀 Coldesthetic - Rust Puro + MVVM ({})", CONFIG.environment);

    let mut app = App::new()?;
    app.render()?;
    let state = app.state().clone();

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    // Atrás/adelante del navegador; listener global registrado UNA sola vez
    router::listen_popstate(|| {
        if let Some(state) = app_state() {
            enter_current_route(&state);
        }
        rerender_app();
    })?;

    // Chequeo de sesión: exactamente una vez por carga
    spawn_local(async move {
        SessionViewModel::new(ApiClient::new())
            .check_session(&state.session)
            .await;
    });

    Ok(())
}

/// Copia del estado global (comparte los `Rc`)
pub(crate) fn app_state() -> Option<AppState> {
    APP.with(|app_cell| app_cell.borrow().as_ref().map(|app| app.state().clone()))
}

/// Navegación interna con `pushState`
pub(crate) fn navigate(path: &str) {
    navigate_with(path, false);
}

/// `replace = true` no deja entrada en el historial (redirecciones)
pub(crate) fn navigate_with(path: &str, replace: bool) {
    if let Err(e) = router::set_location(path, replace) {
        log::error!("❌ [ROUTER] No se pudo navegar a {}: {:?}", path, e);
        return;
    }
    if let Some(state) = app_state() {
        enter_current_route(&state);
    }
    rerender_app();
}

/// Aplica la ruta de la URL; al dejar /patients su búsqueda muere con la página
fn enter_current_route(state: &AppState) {
    let leaving_patients = state.current_route() == Route::Patients;
    if state.enter_route(router::current_route()) && leaving_patients {
        views::patients::patient_list::cancel_search();
    }
}

/// Función pública para re-renderizar la app (re-render completo)
pub fn rerender_app() {
    rerender_app_with_type(UpdateType::FullRender);
}

/// Función pública para actualizar la app con tipo específico
pub fn rerender_app_with_type(update_type: UpdateType) {
    APP.with(|app_cell| match update_type {
        UpdateType::Incremental(inc_type) => {
            log::debug!("🔄 [UPDATE] Actualización incremental: {:?}", inc_type);
            let needs_full_render = match app_cell.try_borrow() {
                Ok(app) => match app.as_ref() {
                    Some(app) => match app.update_incremental(inc_type) {
                        Ok(()) => false,
                        Err(e) => {
                            log::warn!("⚠️ [UPDATE] Incremental falló, re-render completo: {:?}", e);
                            true
                        }
                    },
                    None => {
                        log::warn!("⚠️ [UPDATE] App no está inicializada");
                        false
                    }
                },
                Err(_) => {
                    log::warn!("⚠️ [UPDATE] App ocupada, se omite {:?}", inc_type);
                    false
                }
            };
            if needs_full_render {
                full_render(app_cell);
            }
        }
        UpdateType::FullRender => full_render(app_cell),
    });
}

fn full_render(app_cell: &RefCell<Option<App>>) {
    match app_cell.try_borrow_mut() {
        Ok(mut app) => match app.as_mut() {
            Some(app) => {
                if let Err(e) = app.render() {
                    log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
                }
            }
            None => log::warn!("⚠️ [RERENDER] App no está inicializada"),
        },
        Err(_) => log::warn!("⚠️ [RERENDER] Render en curso, se omite"),
    }
}
