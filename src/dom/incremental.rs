// ============================================================================
// INCREMENTAL DOM UPDATES - Actualización incremental del DOM
// ============================================================================
// Solo actualiza elementos específicos que cambiaron, sin re-renderizar todo.
// Devuelve Err si el contenedor no está montado: el llamador hace un render completo.
// ============================================================================

use wasm_bindgen::prelude::*;

use crate::dom::{get_element_by_id, replace_children, set_class_name, set_disabled, set_flag, set_text_by_id, set_text_content};
use crate::models::catalog::PROCEDURE_GROUPS;
use crate::state::AppState;
use crate::views::patients::patient_list::{render_patients_table, COUNT_ID, RESULTS_ID};
use crate::views::register::procedure_selector::{group_count_id, group_count_label, price_input_id};
use crate::views::register::wizard_view::{age_label, age_warning, bmi_label, selection_label, step_class, total_label};
use crate::views::shared::toast::{fill_toasts, TOAST_CONTAINER_ID};
use crate::viewmodels::wizard_viewmodel::STEP_COUNT;

fn missing(id: &str) -> JsValue {
    JsValue::from_str(&format!("#{} no está en el DOM", id))
}

/// Contenedor de toasts
pub fn update_toasts(state: &AppState) -> Result<(), JsValue> {
    let container = get_element_by_id(TOAST_CONTAINER_ID).ok_or_else(|| missing(TOAST_CONTAINER_ID))?;
    set_text_content(&container, "");
    fill_toasts(state, &container)
}

/// Aviso de formulario: texto + visibilidad
fn update_alert(id: &str, text: Option<&str>) -> Result<(), JsValue> {
    match get_element_by_id(id) {
        Some(el) => {
            set_text_content(&el, text.unwrap_or_default());
            set_flag(&el, "hidden", text.is_none())
        }
        None => Ok(()),
    }
}

/// Valores derivados del wizard (edad, IMC, avisos, totales, precios)
pub fn update_wizard(state: &AppState) -> Result<(), JsValue> {
    if get_element_by_id("wizard-step-0").is_none() {
        return Err(missing("wizard-step-0"));
    }
    let vm = state.wizard.borrow();

    for step in 0..STEP_COUNT {
        if let Some(el) = get_element_by_id(&format!("wizard-step-{}", step)) {
            set_class_name(&el, &step_class(&vm, step));
        }
    }

    set_text_by_id("wizard-age", &age_label(&vm));
    update_alert("wizard-age-warning", age_warning(&vm))?;

    let (bmi_value, bmi_band) = bmi_label(&vm);
    set_text_by_id("wizard-bmi-value", &bmi_value);
    set_text_by_id("wizard-bmi-band", &bmi_band);

    update_alert("wizard-validation", vm.validation_error.as_deref())?;
    update_alert("wizard-submit-error", vm.submit_error.as_deref())?;
    update_alert("wizard-success", vm.success_message.as_deref())?;

    set_text_by_id("wizard-count", &selection_label(&vm));
    set_text_by_id("wizard-total", &total_label(&vm));

    for group in PROCEDURE_GROUPS {
        set_text_by_id(&group_count_id(group), &group_count_label(&vm, group));
        for procedure in group.procedures() {
            if let Some(input) = get_element_by_id(&price_input_id(procedure)) {
                set_disabled(&input, !vm.draft.price_enabled(procedure));
            }
        }
    }

    if let Some(prev) = get_element_by_id("wizard-prev") {
        set_disabled(&prev, !vm.can_go_previous());
    }
    Ok(())
}

/// Tabla y contador de la búsqueda de pacientes
pub fn update_patients_results(state: &AppState) -> Result<(), JsValue> {
    let results = get_element_by_id(RESULTS_ID).ok_or_else(|| missing(RESULTS_ID))?;
    let count = state.patients.borrow().count_label();
    set_text_by_id(COUNT_ID, &count);
    let table = render_patients_table(state)?;
    replace_children(&results, &table)
}
