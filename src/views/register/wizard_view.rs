// ============================================================================
// WIZARD VIEW - Registro de paciente en tres pasos
// ============================================================================
// Las teclas solo actualizan el viewmodel y los valores derivados por id
// (IncrementalUpdate::Wizard). Cambiar de paso o de selección re-renderiza.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_change, on_click, on_input, set_attribute, set_control_value, ElementBuilder};
use crate::services::ApiClient;
use crate::state::{AppState, IncrementalUpdate, ToastMessage, UpdateType};
use crate::utils::constants::MSG_SUBMIT_FAILED_TOAST;
use crate::utils::dates::{is_age_out_of_range, today};
use crate::utils::format::format_cop;
use crate::viewmodels::wizard_viewmodel::{
    run_submission, SubmitOutcome, WizardField, WizardViewModel, SEX_OPTIONS, STEP_COUNT, STEP_LABELS,
};
use crate::views::register::procedure_selector::render_procedure_selector;
use crate::views::shared::{button, form_alert, page_header, select_field, show_toast, text_field, textarea_field};

// ============================================================================
// TEXTOS DERIVADOS (compartidos con la actualización incremental)
// ============================================================================

pub fn step_class(vm: &WizardViewModel, step: usize) -> String {
    let mut class = String::from("wizard-step");
    if vm.draft.step_complete(step) {
        class.push_str(" completed");
    }
    if vm.current_step == step {
        class.push_str(" active");
    }
    class
}

pub fn age_label(vm: &WizardViewModel) -> String {
    match vm.draft.age(today()) {
        Some(age) => format!("Edad: {} años", age),
        None => String::new(),
    }
}

pub fn age_warning(vm: &WizardViewModel) -> Option<&'static str> {
    vm.draft
        .age(today())
        .filter(|age| is_age_out_of_range(*age))
        .map(|_| "La edad debe estar entre 14 y 120 años")
}

pub fn bmi_label(vm: &WizardViewModel) -> (String, String) {
    match vm.draft.bmi_preview() {
        Some(preview) => (format!("IMC: {}", preview.display_value()), preview.band.to_string()),
        None => ("IMC: —".to_string(), "Ingrese peso y altura".to_string()),
    }
}

pub fn selection_label(vm: &WizardViewModel) -> String {
    format!("{} procedimiento(s) seleccionado(s)", vm.draft.selected_count())
}

pub fn total_label(vm: &WizardViewModel) -> String {
    format!("Total: {}", format_cop(vm.draft.total() as f64))
}

// ============================================================================
// RENDER
// ============================================================================

pub fn render_wizard(state: &AppState) -> Result<Element, JsValue> {
    let vm = state.wizard.borrow().clone();

    let page = ElementBuilder::new("div")?.class("page page-register").build();
    append_child(&page, &page_header("Registro de paciente", "Datos, valoración y procedimientos")?)?;

    let layout = ElementBuilder::new("div")?.class("wizard").build();
    append_child(&layout, &render_sidebar(state, &vm)?)?;

    let content = ElementBuilder::new("section")?.class("wizard-content").build();
    let step = match vm.current_step {
        0 => render_patient_step(state, &vm)?,
        1 => render_evaluation_step(state, &vm)?,
        _ => render_procedure_step(state, &vm)?,
    };
    append_child(&content, &step)?;

    append_child(&content, &form_alert("wizard-validation", "warning", vm.validation_error.as_deref())?)?;
    append_child(&content, &form_alert("wizard-submit-error", "error", vm.submit_error.as_deref())?)?;
    append_child(&content, &form_alert("wizard-success", "success", vm.success_message.as_deref())?)?;
    append_child(&content, &render_navigation(state, &vm)?)?;
    append_child(&layout, &content)?;
    append_child(&page, &layout)?;

    if vm.is_last_step() {
        let bar = ElementBuilder::new("div")?
            .class("wizard-sticky-bar")
            .child(ElementBuilder::new("span")?.id("wizard-count")?.text(&selection_label(&vm)).build())?
            .child(ElementBuilder::new("strong")?.id("wizard-total")?.text(&total_label(&vm)).build())?
            .build();
        append_child(&page, &bar)?;
    }

    Ok(page)
}

fn render_sidebar(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let sidebar = ElementBuilder::new("aside")?.class("wizard-sidebar").build();
    for step in 0..STEP_COUNT {
        let item = ElementBuilder::new("button")?
            .attr("type", "button")?
            .id(&format!("wizard-step-{}", step))?
            .class(&step_class(vm, step))
            .child(ElementBuilder::new("span")?.class("wizard-step-number").text(&(step + 1).to_string()).build())?
            .child(ElementBuilder::new("span")?.class("wizard-step-label").text(STEP_LABELS[step]).build())?
            .build();
        let state = state.clone();
        on_click(&item, move |_| {
            state.wizard.borrow_mut().go_to(step);
            state.notify_subscribers();
        })?;
        append_child(&sidebar, &item)?;
    }
    Ok(sidebar)
}

/// Conecta un control a un campo del borrador
fn bind_field(state: &AppState, control: &Element, field: WizardField) -> Result<(), JsValue> {
    let state = state.clone();
    let target = control.clone();
    on_input(control, move |value| {
        let normalized = state.wizard.borrow_mut().set_field(field, &value);
        set_control_value(&target, &normalized);
        crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::Wizard));
    })
}

fn render_patient_step(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let step = ElementBuilder::new("div")?.class("wizard-step-body form-grid").build();

    let inputs: [(&str, &str, &str, WizardField, &str); 6] = [
        ("Nombres *", "wizard-first-name", "text", WizardField::FirstName, "Nombres"),
        ("Apellidos *", "wizard-last-name", "text", WizardField::LastName, "Apellidos"),
        ("Fecha de nacimiento *", "wizard-dob", "date", WizardField::DateOfBirth, ""),
        ("Celular *", "wizard-cellphone", "tel", WizardField::Cellphone, "300 123 4567"),
        ("Cédula", "wizard-cedula", "text", WizardField::Cedula, "Número de documento"),
        ("Remitente", "wizard-referrer", "text", WizardField::ReferrerName, "Nombre de quien remite"),
    ];
    for (label, id, kind, field, placeholder) in inputs {
        let input = text_field(label, id, kind, vm.field(field), placeholder)?;
        match field {
            WizardField::Cellphone => {
                set_attribute(&input.control, "inputmode", "numeric")?;
                set_attribute(&input.control, "maxlength", "12")?;
            }
            WizardField::Cedula => set_attribute(
                &input.control,
                "maxlength",
                &crate::viewmodels::wizard_viewmodel::CEDULA_MAX_LEN.to_string(),
            )?,
            _ => {}
        }
        bind_field(state, &input.control, field)?;
        if field == WizardField::DateOfBirth {
            append_child(
                &input.group,
                &ElementBuilder::new("small")?.id("wizard-age")?.class("field-hint").text(&age_label(vm)).build(),
            )?;
            append_child(&input.group, &form_alert("wizard-age-warning", "warning", age_warning(vm))?)?;
        }
        append_child(&step, &input.group)?;
    }

    let sex = select_field(
        "Sexo biológico *",
        "wizard-sex",
        &SEX_OPTIONS,
        vm.field(WizardField::BiologicalSex),
    )?;
    {
        let state = state.clone();
        let control = sex.control.clone();
        on_change(&sex.control, move |_| {
            let value = crate::dom::control_value(&control);
            state.wizard.borrow_mut().set_field(WizardField::BiologicalSex, &value);
            crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::Wizard));
        })?;
    }
    append_child(&step, &sex.group)?;
    Ok(step)
}

fn render_evaluation_step(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let step = ElementBuilder::new("div")?.class("wizard-step-body form-grid").build();

    let weight = text_field("Peso (kg) *", "wizard-weight", "text", vm.field(WizardField::Weight), "65.5")?;
    set_attribute(&weight.control, "inputmode", "decimal")?;
    bind_field(state, &weight.control, WizardField::Weight)?;
    append_child(&step, &weight.group)?;

    let height = text_field("Altura (m) *", "wizard-height", "text", vm.field(WizardField::Height), "1.65")?;
    set_attribute(&height.control, "inputmode", "decimal")?;
    bind_field(state, &height.control, WizardField::Height)?;
    append_child(&step, &height.group)?;

    let (value, band) = bmi_label(vm);
    let bmi = ElementBuilder::new("div")?
        .class("bmi-preview")
        .child(ElementBuilder::new("strong")?.id("wizard-bmi-value")?.text(&value).build())?
        .child(ElementBuilder::new("span")?.id("wizard-bmi-band")?.text(&band).build())?
        .build();
    append_child(&step, &bmi)?;

    let background = textarea_field(
        "Antecedentes médicos *",
        "wizard-background",
        vm.field(WizardField::MedicalBackground),
        "Alergias, cirugías previas, medicamentos...",
    )?;
    bind_field(state, &background.control, WizardField::MedicalBackground)?;
    append_child(&step, &background.group)?;
    Ok(step)
}

fn render_procedure_step(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let step = ElementBuilder::new("div")?.class("wizard-step-body").build();
    append_child(&step, &render_procedure_selector(state, vm)?)?;

    let notes = textarea_field(
        "Notas *",
        "wizard-notes",
        vm.field(WizardField::Notes),
        "Indicaciones y observaciones del procedimiento",
    )?;
    bind_field(state, &notes.control, WizardField::Notes)?;
    append_child(&step, &notes.group)?;
    Ok(step)
}

fn render_navigation(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let nav = ElementBuilder::new("div")?.class("wizard-nav").build();

    let prev = ElementBuilder::new("button")?
        .attr("type", "button")?
        .id("wizard-prev")?
        .class("btn-secondary")
        .flag("disabled", !vm.can_go_previous())?
        .text("Anterior")
        .build();
    {
        let state = state.clone();
        on_click(&prev, move |_| {
            state.wizard.borrow_mut().previous();
            state.notify_subscribers();
        })?;
    }
    append_child(&nav, &prev)?;

    if vm.is_last_step() {
        let save = ElementBuilder::new("button")?
            .attr("type", "button")?
            .id("wizard-save")?
            .class("btn-primary")
            .flag("disabled", vm.is_submitting)?
            .text(if vm.is_submitting { "Guardando..." } else { "Guardar registro" })
            .build();
        let state = state.clone();
        on_click(&save, move |_| submit_wizard(&state))?;
        append_child(&nav, &save)?;
    } else {
        let next = button("btn-primary", "Siguiente")?;
        let state = state.clone();
        on_click(&next, move |_| {
            state.wizard.borrow_mut().next();
            state.notify_subscribers();
        })?;
        append_child(&nav, &next)?;
    }
    Ok(nav)
}

/// Paciente -> valoración -> procedimiento, sin borrow durante los `await`
fn submit_wizard(state: &AppState) {
    let plan = state.wizard.borrow_mut().prepare_submit(today());
    let Some(plan) = plan else {
        crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::Wizard));
        return;
    };
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let result = run_submission(&ApiClient::new(), &plan).await;
        let outcome = state.wizard.borrow_mut().finish_submit(result);
        if outcome == SubmitOutcome::Failed {
            show_toast(&state, ToastMessage::error(MSG_SUBMIT_FAILED_TOAST));
        }
        state.notify_subscribers();
    });
}
