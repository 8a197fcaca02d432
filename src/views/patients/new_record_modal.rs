// ============================================================================
// NEW RECORD MODAL - Valoración + procedimiento para un paciente existente
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_click, on_input, set_attribute, set_text_by_id, ElementBuilder};
use crate::services::ApiClient;
use crate::state::AppState;
use crate::utils::clinical::BmiPreview;
use crate::viewmodels::new_record_viewmodel::{
    run_new_record, submit_outcome, ModalStep, NewRecordViewModel, RecordField,
};
use crate::views::patients::patient_history::refresh_evaluations;
use crate::views::shared::{button, modal_shell, show_toast, text_field, textarea_field};

const BMI_ID: &str = "record-bmi";

pub fn bmi_text(preview: Option<BmiPreview>) -> String {
    match preview {
        Some(p) => format!("IMC: {} · {}", p.display_value(), p.band),
        None => "IMC: —".to_string(),
    }
}

pub fn render_new_record_modal(state: &AppState) -> Result<Element, JsValue> {
    let Some(vm) = state.new_record.borrow().clone() else {
        return ElementBuilder::new("div").map(|b| b.build());
    };

    let (backdrop, modal) = modal_shell("Nuevo registro clínico")?;

    let progress = ElementBuilder::new("div")?
        .class("modal-progress")
        .child(
            ElementBuilder::new("span")?
                .text(&format!("Paso {} de 2 · {}", vm.step.number(), vm.step.title()))
                .build(),
        )?
        .child(
            ElementBuilder::new("div")?
                .class("progress-bar")
                .attr("style", &format!("width: {}%", vm.step.progress_percent()))?
                .build(),
        )?
        .build();
    append_child(&modal, &progress)?;

    let body = match vm.step {
        ModalStep::Evaluation => render_evaluation_step(state, &vm)?,
        ModalStep::Procedure => render_procedure_step(state, &vm)?,
    };
    append_child(&modal, &body)?;
    append_child(&modal, &render_actions(state, &vm)?)?;
    Ok(backdrop)
}

fn bind(state: &AppState, control: &Element, field: RecordField) -> Result<(), JsValue> {
    let state = state.clone();
    on_input(control, move |value| {
        let preview = state.new_record.borrow_mut().as_mut().map(|vm| {
            vm.set_field(field, &value);
            vm.bmi_preview()
        });
        if matches!(field, RecordField::Weight | RecordField::Height) {
            set_text_by_id(BMI_ID, &bmi_text(preview.flatten()));
        }
    })
}

fn render_evaluation_step(state: &AppState, vm: &NewRecordViewModel) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("div")?.class("modal-body form-grid").build();

    let weight = text_field("Peso (kg)", "record-weight", "text", &vm.weight, "65.5")?;
    bind(state, &weight.control, RecordField::Weight)?;
    append_child(&body, &weight.group)?;

    let height = text_field("Altura (m)", "record-height", "text", &vm.height, "1.65")?;
    bind(state, &height.control, RecordField::Height)?;
    append_child(&body, &height.group)?;

    append_child(
        &body,
        &ElementBuilder::new("div")?
            .id(BMI_ID)?
            .class("bmi-preview")
            .text(&bmi_text(vm.bmi_preview()))
            .build(),
    )?;

    let background = textarea_field("Antecedentes médicos", "record-background", &vm.medical_background, "")?;
    bind(state, &background.control, RecordField::MedicalBackground)?;
    append_child(&body, &background.group)?;
    Ok(body)
}

fn render_procedure_step(state: &AppState, vm: &NewRecordViewModel) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("div")?.class("modal-body").build();

    let date = text_field("Fecha del procedimiento", "record-date", "date", &vm.procedure_date, "")?;
    bind(state, &date.control, RecordField::ProcedureDate)?;
    append_child(&body, &date.group)?;

    let notes = textarea_field("Notas", "record-notes", &vm.notes, "")?;
    bind(state, &notes.control, RecordField::Notes)?;
    append_child(&body, &notes.group)?;

    let items = ElementBuilder::new("div")?.class("free-items").build();
    for (index, item) in vm.items.iter().enumerate() {
        let row = ElementBuilder::new("div")?.class("free-item-row").build();

        let name = ElementBuilder::new("input")?
            .class("form-input")
            .attr("type", "text")?
            .attr("placeholder", "Procedimiento")?
            .attr("value", &item.item_name)?
            .build();
        {
            let state = state.clone();
            on_input(&name, move |value| {
                if let Some(vm) = state.new_record.borrow_mut().as_mut() {
                    vm.set_item_name(index, &value);
                }
            })?;
        }
        append_child(&row, &name)?;

        let price = ElementBuilder::new("input")?
            .class("form-input price-input")
            .attr("type", "text")?
            .attr("inputmode", "decimal")?
            .attr("placeholder", "Precio")?
            .attr("value", &item.price)?
            .build();
        {
            let state = state.clone();
            on_input(&price, move |value| {
                if let Some(vm) = state.new_record.borrow_mut().as_mut() {
                    vm.set_item_price(index, &value);
                }
            })?;
        }
        append_child(&row, &price)?;

        if vm.can_remove_items() {
            let remove = button("btn-icon", "✕")?;
            set_attribute(&remove, "aria-label", "Quitar ítem")?;
            let state = state.clone();
            on_click(&remove, move |_| {
                if let Some(vm) = state.new_record.borrow_mut().as_mut() {
                    vm.remove_item(index);
                }
                state.notify_subscribers();
            })?;
            append_child(&row, &remove)?;
        }
        append_child(&items, &row)?;
    }
    append_child(&body, &items)?;

    let add = button("btn-link", "+ Agregar ítem")?;
    {
        let state = state.clone();
        on_click(&add, move |_| {
            if let Some(vm) = state.new_record.borrow_mut().as_mut() {
                vm.add_item();
            }
            state.notify_subscribers();
        })?;
    }
    append_child(&body, &add)?;
    Ok(body)
}

fn render_actions(state: &AppState, vm: &NewRecordViewModel) -> Result<Element, JsValue> {
    let actions = ElementBuilder::new("div")?.class("modal-actions").build();

    let cancel = button("btn-secondary", "Cancelar")?;
    {
        let state = state.clone();
        on_click(&cancel, move |_| {
            *state.new_record.borrow_mut() = None;
            state.notify_subscribers();
        })?;
    }
    append_child(&actions, &cancel)?;

    match vm.step {
        ModalStep::Evaluation => {
            let next = button("btn-primary", "Siguiente")?;
            let state = state.clone();
            on_click(&next, move |_| {
                let result = state.new_record.borrow_mut().as_mut().map(|vm| vm.next());
                if let Some(Err(toast)) = result {
                    show_toast(&state, toast);
                }
                state.notify_subscribers();
            })?;
            append_child(&actions, &next)?;
        }
        ModalStep::Procedure => {
            let back = button("btn-secondary", "Atrás")?;
            {
                let state = state.clone();
                on_click(&back, move |_| {
                    if let Some(vm) = state.new_record.borrow_mut().as_mut() {
                        vm.back();
                    }
                    state.notify_subscribers();
                })?;
            }
            append_child(&actions, &back)?;

            let save = ElementBuilder::new("button")?
                .attr("type", "button")?
                .class("btn-primary")
                .flag("disabled", vm.is_submitting)?
                .text(if vm.is_submitting { "Guardando..." } else { "Guardar registro" })
                .build();
            let state = state.clone();
            on_click(&save, move |_| submit_new_record(&state))?;
            append_child(&actions, &save)?;
        }
    }
    Ok(actions)
}

/// Valoración -> procedimiento; al terminar cierra el modal y refresca la lista
fn submit_new_record(state: &AppState) {
    let plan = match state.new_record.borrow_mut().as_mut().map(|vm| vm.prepare_submit()) {
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
        let result = run_new_record(&ApiClient::new(), &plan).await;
        if let Some(vm) = state.new_record.borrow_mut().as_mut() {
            vm.finish_submit();
        }
        match submit_outcome(result) {
            Ok(toast) => {
                show_toast(&state, toast);
                *state.new_record.borrow_mut() = None;
                refresh_evaluations(&state, plan.evaluation.patient_id);
            }
            Err(toast) => show_toast(&state, toast),
        }
        state.notify_subscribers();
    });
}
