// ============================================================================
// RECORD DETAIL VIEW - Valoración, cambio de estado y edición
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, confirm, on_click, on_input, set_attribute, set_text_by_id, ElementBuilder};
use crate::models::{EvaluationStatus, MedicalEvaluation, Procedure};
use crate::services::{ApiClient, InFlightGuard};
use crate::state::AppState;
use crate::utils::dates::display_date;
use crate::utils::format::{format_cop, plain_number};
use crate::viewmodels::record_detail_viewmodel::RecordDetailViewModel;
use crate::viewmodels::LoadState;
use crate::views::patients::new_record_modal::bmi_text;
use crate::views::shared::{
    button, error_block, loading_block, modal_shell, show_toast, text_field, textarea_field,
};

const EVAL_BMI_ID: &str = "eval-edit-bmi";
const PROC_TOTAL_ID: &str = "proc-edit-total";

pub fn render_record_detail(state: &AppState) -> Result<Element, JsValue> {
    let Some(vm) = state.record.borrow().clone() else {
        return error_block("Registro no disponible");
    };

    let page = ElementBuilder::new("div")?.class("page page-record").build();

    let back = button("btn-link", "← Volver al historial")?;
    {
        let path = format!("/patients/{}/history", vm.patient_id);
        on_click(&back, move |_| crate::navigate(&path))?;
    }
    append_child(&page, &back)?;

    let evaluation = match &vm.evaluation {
        LoadState::Idle | LoadState::Loading => {
            append_child(&page, &loading_block("Cargando registro...")?)?;
            return Ok(page);
        }
        LoadState::Failed(message) => {
            append_child(&page, &error_block(message)?)?;
            return Ok(page);
        }
        LoadState::Loaded(evaluation) => evaluation,
    };

    append_child(&page, &render_summary(state, &vm, evaluation)?)?;
    append_child(&page, &render_procedures(state, &vm, evaluation)?)?;

    if vm.eval_form.is_some() {
        append_child(&page, &render_eval_modal(state, &vm)?)?;
    }
    if vm.proc_form.is_some() {
        append_child(&page, &render_proc_modal(state, &vm)?)?;
    }
    Ok(page)
}

// ============================================================================
// VALORACIÓN
// ============================================================================

fn data_row(dl: &Element, term: &str, value: &str) -> Result<(), JsValue> {
    append_child(dl, &ElementBuilder::new("dt")?.text(term).build())?;
    append_child(dl, &ElementBuilder::new("dd")?.text(value).build())
}

fn render_summary(
    state: &AppState,
    vm: &RecordDetailViewModel,
    evaluation: &MedicalEvaluation,
) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("section")?.class("info-card").build();

    let title = evaluation
        .patient
        .as_ref()
        .map(|p| p.full_name())
        .unwrap_or_else(|| format!("Registro #{}", evaluation.id));
    let heading = ElementBuilder::new("div")?
        .class("info-card-heading")
        .child(ElementBuilder::new("h1")?.text(&title).build())?
        .child(
            ElementBuilder::new("span")?
                .class(evaluation.status.badge_class())
                .text(evaluation.status.label())
                .build(),
        )?
        .build();
    append_child(&card, &heading)?;

    let dl = ElementBuilder::new("dl")?.class("info-grid").build();
    data_row(&dl, "Fecha", &display_date(&evaluation.created_date()))?;
    data_row(&dl, "Peso", &format!("{} kg", plain_number(evaluation.weight)))?;
    data_row(&dl, "Altura", &format!("{} m", plain_number(evaluation.height)))?;
    let bmi = match (evaluation.bmi, evaluation.bmi_status.as_deref()) {
        (Some(value), Some(band)) => format!("{} · {}", plain_number(value), band),
        (Some(value), None) => plain_number(value),
        _ => "—".to_string(),
    };
    data_row(&dl, "IMC", &bmi)?;
    if let Some(age) = evaluation.patient_age_at_evaluation {
        data_row(&dl, "Edad en la valoración", &format!("{} años", age))?;
    }
    data_row(&dl, "Remitente", evaluation.referrer_name.as_deref().unwrap_or("—"))?;
    data_row(&dl, "Antecedentes", &evaluation.medical_background)?;
    append_child(&card, &dl)?;

    let actions = ElementBuilder::new("div")?.class("record-actions").build();
    if vm.can_confirm() {
        let confirm_btn = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class("btn-success")
            .flag("disabled", vm.is_changing_status)?
            .text("Confirmar")
            .build();
        let state = state.clone();
        on_click(&confirm_btn, move |_| change_status(&state, EvaluationStatus::Confirmado))?;
        append_child(&actions, &confirm_btn)?;
    }
    if vm.can_cancel() {
        let cancel_btn = ElementBuilder::new("button")?
            .attr("type", "button")?
            .class("btn-danger")
            .flag("disabled", vm.is_changing_status)?
            .text("Cancelar")
            .build();
        let state = state.clone();
        on_click(&cancel_btn, move |_| change_status(&state, EvaluationStatus::Cancelado))?;
        append_child(&actions, &cancel_btn)?;
    }
    if vm.can_edit_evaluation() {
        let edit = button("btn-secondary", "Editar valoración")?;
        let state = state.clone();
        on_click(&edit, move |_| {
            if let Some(vm) = state.record.borrow_mut().as_mut() {
                vm.open_eval_edit();
            }
            state.notify_subscribers();
        })?;
        append_child(&actions, &edit)?;
    }
    append_child(&card, &actions)?;
    Ok(card)
}

fn change_status(state: &AppState, target: EvaluationStatus) {
    let question = match target {
        EvaluationStatus::Confirmado => "¿Confirmar esta valoración?",
        _ => "¿Cancelar esta valoración?",
    };
    if !confirm(question) {
        return;
    }
    let evaluation_id = {
        let mut record = state.record.borrow_mut();
        let Some(vm) = record.as_mut() else {
            return;
        };
        if !vm.begin_status_change(target) {
            return;
        }
        vm.evaluation_id
    };
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().change_evaluation_status(evaluation_id, target).await;
        let toast = state
            .record
            .borrow_mut()
            .as_mut()
            .map(|vm| vm.finish_status_change(target, result));
        if let Some(toast) = toast {
            show_toast(&state, toast);
        }
        reload_record(&state);
    });
}

// ============================================================================
// PROCEDIMIENTOS
// ============================================================================

fn render_procedures(
    state: &AppState,
    vm: &RecordDetailViewModel,
    evaluation: &MedicalEvaluation,
) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("section")?
        .class("procedures-section")
        .child(ElementBuilder::new("h2")?.text("Procedimientos").build())?
        .build();

    if evaluation.procedures.is_empty() {
        append_child(
            &section,
            &ElementBuilder::new("p")?.class("muted").text("Sin procedimientos registrados").build(),
        )?;
    }
    for procedure in &evaluation.procedures {
        append_child(&section, &render_procedure_card(state, procedure)?)?;
    }

    append_child(
        &section,
        &ElementBuilder::new("div")?
            .class("procedures-total")
            .text(&format!("Total: {}", vm.total_label()))
            .build(),
    )?;
    Ok(section)
}

fn render_procedure_card(state: &AppState, procedure: &Procedure) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("article")?.class("procedure-card").build();

    let header = ElementBuilder::new("div")?
        .class("procedure-card-header")
        .child(ElementBuilder::new("strong")?.text(&display_date(&procedure.date())).build())?
        .build();
    let edit = button("btn-link", "Editar")?;
    {
        let state = state.clone();
        let procedure_id = procedure.id;
        on_click(&edit, move |_| {
            if let Some(vm) = state.record.borrow_mut().as_mut() {
                vm.open_proc_edit(procedure_id);
            }
            state.notify_subscribers();
        })?;
    }
    append_child(&header, &edit)?;
    append_child(&card, &header)?;

    if let Some(notes) = procedure.notes.as_deref().filter(|n| !n.is_empty()) {
        append_child(&card, &ElementBuilder::new("p")?.class("procedure-notes").text(notes).build())?;
    }

    let list = ElementBuilder::new("ul")?.class("procedure-items").build();
    for item in &procedure.items {
        let li = ElementBuilder::new("li")?
            .child(ElementBuilder::new("span")?.text(&item.item_name).build())?
            .child(ElementBuilder::new("span")?.class("price").text(&format_cop(item.price)).build())?
            .build();
        append_child(&list, &li)?;
    }
    append_child(&card, &list)?;

    append_child(
        &card,
        &ElementBuilder::new("div")?
            .class("procedure-total")
            .text(&format!("Subtotal: {}", format_cop(procedure.total())))
            .build(),
    )?;
    Ok(card)
}

// ============================================================================
// MODALES DE EDICIÓN
// ============================================================================

fn render_eval_modal(state: &AppState, vm: &RecordDetailViewModel) -> Result<Element, JsValue> {
    let form = vm.eval_form.clone().unwrap_or_default();
    let (backdrop, modal) = modal_shell("Editar valoración")?;

    let weight = text_field("Peso (kg)", "eval-edit-weight", "text", &form.weight, "")?;
    let height = text_field("Altura (m)", "eval-edit-height", "text", &form.height, "")?;
    let background = textarea_field("Antecedentes médicos", "eval-edit-background", &form.medical_background, "")?;

    for (field, control) in [(0u8, &weight.control), (1, &height.control), (2, &background.control)] {
        let state = state.clone();
        on_input(control, move |value| {
            let preview = state.record.borrow_mut().as_mut().and_then(|vm| {
                let form = vm.eval_form.as_mut()?;
                match field {
                    0 => form.weight = value,
                    1 => form.height = value,
                    _ => form.medical_background = value,
                }
                Some(form.bmi_preview())
            });
            if field < 2 {
                set_text_by_id(EVAL_BMI_ID, &bmi_text(preview.flatten()));
            }
        })?;
    }

    append_child(&modal, &weight.group)?;
    append_child(&modal, &height.group)?;
    append_child(
        &modal,
        &ElementBuilder::new("div")?
            .id(EVAL_BMI_ID)?
            .class("bmi-preview")
            .text(&bmi_text(form.bmi_preview()))
            .build(),
    )?;
    append_child(&modal, &background.group)?;

    let actions = ElementBuilder::new("div")?.class("modal-actions").build();
    let cancel = button("btn-secondary", "Cancelar")?;
    {
        let state = state.clone();
        on_click(&cancel, move |_| {
            if let Some(vm) = state.record.borrow_mut().as_mut() {
                vm.close_eval_edit();
            }
            state.notify_subscribers();
        })?;
    }
    append_child(&actions, &cancel)?;

    let save = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .flag("disabled", vm.is_saving_eval)?
        .text(if vm.is_saving_eval { "Guardando..." } else { "Guardar" })
        .build();
    {
        let state = state.clone();
        on_click(&save, move |_| save_evaluation(&state))?;
    }
    append_child(&actions, &save)?;
    append_child(&modal, &actions)?;
    Ok(backdrop)
}

fn save_evaluation(state: &AppState) {
    let prepared = state
        .record
        .borrow_mut()
        .as_mut()
        .map(|vm| (vm.evaluation_id, vm.prepare_eval_save()));
    let (evaluation_id, update) = match prepared {
        Some((id, Ok(update))) => (id, update),
        Some((_, Err(toast))) => {
            show_toast(state, toast);
            return;
        }
        None => return,
    };
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().update_evaluation(evaluation_id, &update).await;
        let ok = result.is_ok();
        let toast = state.record.borrow_mut().as_mut().map(|vm| vm.finish_eval_save(result));
        if let Some(toast) = toast {
            show_toast(&state, toast);
        }
        if ok {
            reload_record(&state);
        } else {
            state.notify_subscribers();
        }
    });
}

fn render_proc_modal(state: &AppState, vm: &RecordDetailViewModel) -> Result<Element, JsValue> {
    let form = vm.proc_form.clone().unwrap_or_default();
    let (backdrop, modal) = modal_shell("Editar procedimiento")?;

    let date = text_field("Fecha", "proc-edit-date", "date", &form.procedure_date, "")?;
    {
        let state = state.clone();
        on_input(&date.control, move |value| {
            if let Some(form) = state.record.borrow_mut().as_mut().and_then(|vm| vm.proc_form_mut()) {
                form.procedure_date = value;
            }
        })?;
    }
    append_child(&modal, &date.group)?;

    let notes = textarea_field("Notas", "proc-edit-notes", &form.notes, "")?;
    {
        let state = state.clone();
        on_input(&notes.control, move |value| {
            if let Some(form) = state.record.borrow_mut().as_mut().and_then(|vm| vm.proc_form_mut()) {
                form.notes = value;
            }
        })?;
    }
    append_child(&modal, &notes.group)?;

    let items = ElementBuilder::new("div")?.class("free-items").build();
    for (index, item) in form.items.iter().enumerate() {
        let row = ElementBuilder::new("div")?.class("free-item-row").build();

        let name = ElementBuilder::new("input")?
            .class("form-input")
            .attr("type", "text")?
            .attr("value", &item.item_name)?
            .build();
        {
            let state = state.clone();
            on_input(&name, move |value| {
                if let Some(form) = state.record.borrow_mut().as_mut().and_then(|vm| vm.proc_form_mut()) {
                    if let Some(item) = form.items.get_mut(index) {
                        item.item_name = value;
                    }
                }
            })?;
        }
        append_child(&row, &name)?;

        let price = ElementBuilder::new("input")?
            .class("form-input price-input")
            .attr("type", "text")?
            .attr("inputmode", "decimal")?
            .attr("value", &item.price)?
            .build();
        {
            let state = state.clone();
            on_input(&price, move |value| {
                let total = state
                    .record
                    .borrow_mut()
                    .as_mut()
                    .and_then(|vm| vm.proc_form_mut())
                    .map(|form| {
                        if let Some(item) = form.items.get_mut(index) {
                            item.price = value;
                        }
                        form.live_total()
                    });
                if let Some(total) = total {
                    set_text_by_id(PROC_TOTAL_ID, &format!("Total: {}", format_cop(total)));
                }
            })?;
        }
        append_child(&row, &price)?;

        let remove = button("btn-icon", "✕")?;
        set_attribute(&remove, "aria-label", "Quitar ítem")?;
        {
            let state = state.clone();
            on_click(&remove, move |_| {
                if let Some(form) = state.record.borrow_mut().as_mut().and_then(|vm| vm.proc_form_mut()) {
                    if index < form.items.len() {
                        form.items.remove(index);
                    }
                }
                state.notify_subscribers();
            })?;
        }
        append_child(&row, &remove)?;
        append_child(&items, &row)?;
    }
    append_child(&modal, &items)?;

    let add = button("btn-link", "+ Agregar ítem")?;
    {
        let state = state.clone();
        on_click(&add, move |_| {
            if let Some(form) = state.record.borrow_mut().as_mut().and_then(|vm| vm.proc_form_mut()) {
                form.items.push(Default::default());
            }
            state.notify_subscribers();
        })?;
    }
    append_child(&modal, &add)?;

    append_child(
        &modal,
        &ElementBuilder::new("div")?
            .id(PROC_TOTAL_ID)?
            .class("procedures-total")
            .text(&format!("Total: {}", format_cop(form.live_total())))
            .build(),
    )?;

    let actions = ElementBuilder::new("div")?.class("modal-actions").build();
    let cancel = button("btn-secondary", "Cancelar")?;
    {
        let state = state.clone();
        on_click(&cancel, move |_| {
            if let Some(vm) = state.record.borrow_mut().as_mut() {
                vm.close_proc_edit();
            }
            state.notify_subscribers();
        })?;
    }
    append_child(&actions, &cancel)?;

    let save = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .flag("disabled", vm.is_saving_proc)?
        .text(if vm.is_saving_proc { "Guardando..." } else { "Guardar" })
        .build();
    {
        let state = state.clone();
        on_click(&save, move |_| save_procedure(&state))?;
    }
    append_child(&actions, &save)?;
    append_child(&modal, &actions)?;
    Ok(backdrop)
}

fn save_procedure(state: &AppState) {
    let prepared = state.record.borrow_mut().as_mut().map(|vm| vm.prepare_proc_save());
    let (procedure_id, body) = match prepared {
        Some(Ok(plan)) => plan,
        Some(Err(toast)) => {
            show_toast(state, toast);
            return;
        }
        None => return,
    };
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().update_procedure(procedure_id, &body).await;
        let ok = result.is_ok();
        let toast = state.record.borrow_mut().as_mut().map(|vm| vm.finish_proc_save(result));
        if let Some(toast) = toast {
            show_toast(&state, toast);
        }
        if ok {
            reload_record(&state);
        } else {
            state.notify_subscribers();
        }
    });
}

// ============================================================================
// CARGA
// ============================================================================

/// Primera carga al entrar en la ruta
pub fn load_record(state: &AppState) {
    let idle = state
        .record
        .borrow()
        .as_ref()
        .map_or(false, |vm| vm.evaluation.is_idle());
    if idle {
        reload_record(state);
    }
}

/// Vuelve a pedir la valoración; conserva lo mostrado mientras tanto
fn reload_record(state: &AppState) {
    let evaluation_id = {
        let mut record = state.record.borrow_mut();
        let Some(vm) = record.as_mut() else {
            return;
        };
        vm.begin_load();
        vm.evaluation_id
    };
    state.notify_subscribers();

    let Some(guard) = InFlightGuard::acquire(format!("evaluation:{}", evaluation_id)) else {
        return;
    };
    let state = state.clone();
    spawn_local(async move {
        let _guard = guard;
        let result = ApiClient::new().get_evaluation(evaluation_id).await;
        if let Some(vm) = state.record.borrow_mut().as_mut() {
            if vm.evaluation_id == evaluation_id {
                vm.apply_evaluation(result);
            }
        }
        state.notify_subscribers();
    });
}
