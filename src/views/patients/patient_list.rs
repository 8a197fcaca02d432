// ============================================================================
// PATIENTS VIEW - Listado con búsqueda (debounce + abort + generación)
// ============================================================================

use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{AbortController, Element};

use crate::config::CONFIG;
use crate::dom::{append_child, on_click, on_input, set_control_value, ElementBuilder};
use crate::state::{AppState, IncrementalUpdate, UpdateType};
use crate::services::ApiClient;
use crate::viewmodels::LoadState;
use crate::views::shared::{empty_block, error_block, loading_block, page_header};

pub const RESULTS_ID: &str = "patients-results";
pub const COUNT_ID: &str = "patients-count";

/// Timer del debounce y controlador del fetch en vuelo
#[derive(Default)]
struct SearchHandles {
    debounce: Option<Timeout>,
    controller: Option<AbortController>,
}

thread_local! {
    static SEARCH: RefCell<SearchHandles> = RefCell::new(SearchHandles::default());
}

pub fn render_patients(state: &AppState) -> Result<Element, JsValue> {
    let vm = state.patients.borrow().clone();

    let page = ElementBuilder::new("div")?.class("page page-patients").build();
    append_child(&page, &page_header("Pacientes", "Busca por nombre, apellido, celular o cédula")?)?;

    let search = ElementBuilder::new("input")?
        .id("patients-search")?
        .class("form-input search-input")
        .attr("type", "search")?
        .attr("placeholder", "Buscar paciente...")?
        .build();
    set_control_value(&search, &vm.query);
    {
        let state = state.clone();
        on_input(&search, move |value| schedule_search(&state, &value))?;
    }

    let toolbar = ElementBuilder::new("div")?
        .class("list-toolbar")
        .child(search)?
        .child(ElementBuilder::new("span")?.id(COUNT_ID)?.class("list-count").text(&vm.count_label()).build())?
        .build();
    append_child(&page, &toolbar)?;

    let results = ElementBuilder::new("div")?.id(RESULTS_ID)?.class("list-results").build();
    append_child(&results, &render_patients_table(state)?)?;
    append_child(&page, &results)?;
    Ok(page)
}

/// Tabla (o estado de carga/error/vacío) según el viewmodel
pub fn render_patients_table(state: &AppState) -> Result<Element, JsValue> {
    let vm = state.patients.borrow();
    match &vm.state {
        LoadState::Idle | LoadState::Loading => loading_block("Cargando pacientes..."),
        LoadState::Failed(message) => error_block(message),
        LoadState::Loaded(rows) if rows.is_empty() => empty_block("No se encontraron pacientes"),
        LoadState::Loaded(_) => {
            let table = ElementBuilder::new("table")?.class("data-table").build();
            let head = ElementBuilder::new("tr")?.build();
            for title in ["Nombre", "Cédula", "Celular", "Creado", ""] {
                append_child(&head, &ElementBuilder::new("th")?.text(title).build())?;
            }
            append_child(&table, &ElementBuilder::new("thead")?.child(head)?.build())?;

            let body = ElementBuilder::new("tbody")?.build();
            for row in vm.rows() {
                let tr = ElementBuilder::new("tr")?.build();
                for cell in [&row.name, &row.cedula, &row.cellphone, &row.created] {
                    append_child(&tr, &ElementBuilder::new("td")?.text(cell).build())?;
                }
                let link = ElementBuilder::new("button")?
                    .attr("type", "button")?
                    .class("btn-link")
                    .text("Ver historial")
                    .build();
                let path = format!("/patients/{}/history", row.id);
                on_click(&link, move |_| crate::navigate(&path))?;
                append_child(&tr, &ElementBuilder::new("td")?.child(link)?.build())?;
                append_child(&body, &tr)?;
            }
            append_child(&table, &body)?;
            Ok(table)
        }
    }
}

/// Suelta el debounce pendiente y aborta el fetch en vuelo (al salir de la página)
pub fn cancel_search() {
    SEARCH.with(|handles| {
        let mut handles = handles.borrow_mut();
        handles.debounce = None;
        if let Some(controller) = handles.controller.take() {
            log::debug!("🔎 [PATIENTS] Búsqueda en vuelo abortada");
            controller.abort();
        }
    });
}

/// Primera carga al montar (búsqueda vacía)
pub fn load_initial(state: &AppState) {
    let generation = {
        let vm = state.patients.borrow();
        if !vm.state.is_idle() {
            return;
        }
        vm.generation()
    };
    fetch_patients(state, generation);
}

/// Reinicia el debounce con la nueva búsqueda
fn schedule_search(state: &AppState, query: &str) {
    let generation = state.patients.borrow_mut().set_query(query);
    let state_for_timer = state.clone();
    let timer = Timeout::new(CONFIG.search_debounce_ms, move || {
        fetch_patients(&state_for_timer, generation);
    });
    // Soltar el Timeout anterior lo cancela
    SEARCH.with(|handles| handles.borrow_mut().debounce = Some(timer));
}

fn fetch_patients(state: &AppState, generation: u64) {
    let query = {
        let mut vm = state.patients.borrow_mut();
        if !vm.begin_load(generation) {
            return;
        }
        vm.effective_query().to_string()
    };

    let controller = AbortController::new().ok();
    let signal = controller.as_ref().map(|c| c.signal());
    SEARCH.with(|handles| {
        let mut handles = handles.borrow_mut();
        if let Some(previous) = handles.controller.take() {
            previous.abort();
        }
        handles.controller = controller;
    });
    crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::PatientsResults));

    log::info!("🔎 [PATIENTS] Buscando '{}' (gen {})", query, generation);
    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().search_patients(&query, signal.as_ref()).await;
        let applied = state.patients.borrow_mut().apply_result(generation, result);
        if applied {
            crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::PatientsResults));
        }
    });
}
