// ============================================================================
// APP - Aplicación principal
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{alert, get_element_by_id, replace_children};
use crate::dom::incremental::{update_patients_results, update_toasts, update_wizard};
use crate::router;
use crate::state::{AppState, IncrementalUpdate, UpdateType};
use crate::viewmodels::GateEffect;
use crate::views::{load_route_data, render_app};

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Option<Element>,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new(router::current_route());

        // Cambios generales: re-render completo batcheado con Timeout(0)
        state.subscribe_to_changes(|| {
            Timeout::new(0, crate::rerender_app).forget();
        });

        // La sesión cambia el header, las guardas y la página
        {
            let state_for_session = state.clone();
            state.session.subscribe(move || state_for_session.notify_subscribers());
        }

        // Los toasts solo tocan su contenedor
        state.toasts.subscribe(|| {
            Timeout::new(0, || {
                crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::Toasts));
            })
            .forget();
        });

        Ok(Self {
            state,
            root: Some(root),
        })
    }

    /// Renderizar aplicación
    pub fn render(&mut self) -> Result<(), JsValue> {
        let Some(root) = &self.root else {
            return Ok(());
        };

        let view = render_app(&self.state)?;
        replace_children(root, &view.root)?;

        // Efectos de las guardas fuera del render (alert bloquea y navegar re-renderiza)
        if !view.effects.is_empty() {
            let effects = view.effects;
            Timeout::new(0, move || run_gate_effects(effects)).forget();
        }

        if view.page_ready {
            load_route_data(&self.state);
        }
        Ok(())
    }

    /// Obtener referencia al estado
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Actualización incremental del DOM (solo elementos específicos)
    pub fn update_incremental(&self, update_type: IncrementalUpdate) -> Result<(), JsValue> {
        match update_type {
            IncrementalUpdate::Toasts => update_toasts(&self.state),
            IncrementalUpdate::Wizard => update_wizard(&self.state),
            IncrementalUpdate::PatientsResults => update_patients_results(&self.state),
        }
    }
}

fn run_gate_effects(effects: Vec<GateEffect>) {
    for effect in effects {
        match effect {
            GateEffect::Alert(message) => alert(message),
            GateEffect::Redirect(path) => {
                log::info!("↪️ [GATE] Redirigiendo a {}", path);
                crate::navigate_with(&path, true);
            }
        }
    }
}
