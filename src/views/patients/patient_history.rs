// ============================================================================
// PATIENT HISTORY VIEW - Ficha del paciente y sus registros clínicos
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::router::go_back;
use crate::services::{ApiClient, InFlightGuard};
use crate::state::AppState;
use crate::utils::dates::today_iso;
use crate::viewmodels::patient_history_viewmodel::{PatientHistoryViewModel, MSG_NO_RECORDS};
use crate::viewmodels::LoadState;
use crate::views::patients::new_record_modal::render_new_record_modal;
use crate::views::shared::{button, empty_block, error_block, loading_block};

pub fn render_patient_history(state: &AppState) -> Result<Element, JsValue> {
    let Some(vm) = state.history.borrow().clone() else {
        return empty_block("Paciente no disponible");
    };

    let page = ElementBuilder::new("div")?.class("page page-history").build();

    let back = button("btn-link", "← Volver")?;
    on_click(&back, |_| go_back())?;
    append_child(&page, &back)?;

    match &vm.patient {
        LoadState::Idle | LoadState::Loading => {
            append_child(&page, &loading_block("Cargando paciente...")?)?;
            return Ok(page);
        }
        LoadState::Failed(message) => {
            append_child(&page, &error_block(message)?)?;
            return Ok(page);
        }
        LoadState::Loaded(_) => {}
    }

    append_child(&page, &render_info_card(&vm)?)?;
    append_child(&page, &render_records(state, &vm)?)?;

    if state.new_record.borrow().is_some() {
        append_child(&page, &render_new_record_modal(state)?)?;
    }
    Ok(page)
}

fn render_info_card(vm: &PatientHistoryViewModel) -> Result<Element, JsValue> {
    let name = vm.patient.data().map(|p| p.full_name()).unwrap_or_default();
    let card = ElementBuilder::new("section")?
        .class("info-card")
        .child(ElementBuilder::new("h1")?.text(&name).build())?
        .child(
            ElementBuilder::new("span")?
                .class("info-id")
                .text(&format!("ID #{}", vm.patient_id))
                .build(),
        )?
        .build();

    let grid = ElementBuilder::new("dl")?.class("info-grid").build();
    for field in vm.info_fields() {
        append_child(&grid, &ElementBuilder::new("dt")?.text(field.label).build())?;
        append_child(&grid, &ElementBuilder::new("dd")?.text(&field.value).build())?;
    }
    append_child(&card, &grid)?;
    Ok(card)
}

fn render_records(state: &AppState, vm: &PatientHistoryViewModel) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("section")?.class("records-section").build();

    let new_btn = button("btn-primary", "+ Nuevo registro")?;
    {
        let state = state.clone();
        on_click(&new_btn, move |_| {
            let modal = state.history.borrow().as_ref().map(|h| h.new_record(&today_iso()));
            *state.new_record.borrow_mut() = modal;
            state.notify_subscribers();
        })?;
    }
    let header = ElementBuilder::new("div")?
        .class("section-header")
        .child(ElementBuilder::new("h2")?.text("Registros clínicos").build())?
        .child(new_btn)?
        .build();
    append_child(&section, &header)?;

    if vm.evaluations.is_loading() {
        append_child(&section, &loading_block("Cargando registros...")?)?;
        return Ok(section);
    }
    let records = vm.records();
    if records.is_empty() {
        append_child(&section, &empty_block(MSG_NO_RECORDS)?)?;
        return Ok(section);
    }

    let list = ElementBuilder::new("ul")?.class("record-list").build();
    for record in records {
        let item = ElementBuilder::new("li")?
            .class("record-item")
            .child(ElementBuilder::new("span")?.class("record-date").text(&record.date).build())?
            .child(ElementBuilder::new("span")?.class("record-referrer").text(&record.referrer).build())?
            .child(
                ElementBuilder::new("span")?
                    .class(&format!("badge {}", record.status.badge_class()))
                    .text(record.status.label())
                    .build(),
            )?
            .build();
        let detail = button("btn-link", "Ver detalle")?;
        let path = record.detail_path.clone();
        on_click(&detail, move |_| crate::navigate(&path))?;
        append_child(&item, &detail)?;
        append_child(&list, &item)?;
    }
    append_child(&section, &list)?;
    Ok(section)
}

/// Paciente y valoraciones en paralelo al montar
pub fn load_history(state: &AppState) {
    let patient_id = {
        let mut history = state.history.borrow_mut();
        let Some(vm) = history.as_mut() else {
            return;
        };
        if !vm.patient.is_idle() {
            return;
        }
        vm.begin_load();
        vm.patient_id
    };

    if let Some(guard) = InFlightGuard::acquire(format!("patient:{}", patient_id)) {
        let state = state.clone();
        spawn_local(async move {
            let _guard = guard;
            let result = ApiClient::new().get_patient(patient_id).await;
            if let Some(vm) = state.history.borrow_mut().as_mut() {
                vm.apply_patient(result);
            }
            state.notify_subscribers();
        });
    }
    refresh_evaluations(state, patient_id);
}

/// Recarga solo la lista de registros (tras crear uno nuevo)
pub fn refresh_evaluations(state: &AppState, patient_id: i64) {
    let Some(guard) = InFlightGuard::acquire(format!("evaluations:{}", patient_id)) else {
        return;
    };
    let state = state.clone();
    spawn_local(async move {
        let _guard = guard;
        let result = ApiClient::new().patient_evaluations(patient_id).await;
        if let Some(vm) = state.history.borrow_mut().as_mut() {
            if vm.patient_id == patient_id {
                vm.apply_evaluations(result);
            }
        }
        state.notify_subscribers();
    });
}
