// ============================================================================
// PROCEDURE SELECTOR - Catálogo agrupado con precios (paso 3)
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, control_value, get_element_by_id, is_checked, on_change, on_input, set_control_value, ElementBuilder};
use crate::models::catalog::{CatalogProcedure, ProcedureGroup, FAJA_ID, PIERNA_ID, PROCEDURE_GROUPS};
use crate::state::{AppState, IncrementalUpdate, UpdateType};
use crate::utils::procedure_notes::{faja_size, pierna_sides, FAJA_SIZES};
use crate::viewmodels::wizard_viewmodel::WizardViewModel;

pub fn price_input_id(procedure: &CatalogProcedure) -> String {
    format!("wizard-price-{}", procedure.id)
}

pub fn group_count_id(group: &ProcedureGroup) -> String {
    format!("wizard-group-count-{}", group.id)
}

pub fn group_count_label(vm: &WizardViewModel, group: &ProcedureGroup) -> String {
    format!("{} seleccionado(s)", vm.draft.group_count(group))
}

pub fn render_procedure_selector(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("procedure-selector").build();

    for group in PROCEDURE_GROUPS {
        let section = ElementBuilder::new("details")?
            .class("procedure-group")
            .flag("open", true)?
            .build();
        let summary = ElementBuilder::new("summary")?
            .class("procedure-group-header")
            .child(ElementBuilder::new("span")?.text(group.label).build())?
            .child(
                ElementBuilder::new("span")?
                    .id(&group_count_id(group))?
                    .class("procedure-group-count")
                    .text(&group_count_label(vm, group))
                    .build(),
            )?
            .build();
        append_child(&section, &summary)?;

        for procedure in group.procedures() {
            append_child(&section, &render_procedure_row(state, vm, procedure)?)?;
        }
        append_child(&container, &section)?;
    }
    Ok(container)
}

fn render_procedure_row(
    state: &AppState,
    vm: &WizardViewModel,
    procedure: &'static CatalogProcedure,
) -> Result<Element, JsValue> {
    let selected = vm.draft.is_selected(procedure.label);
    let row = ElementBuilder::new("div")?
        .class(if selected { "procedure-row selected" } else { "procedure-row" })
        .build();

    let checkbox_id = format!("wizard-proc-{}", procedure.id);
    let checkbox = ElementBuilder::new("input")?
        .id(&checkbox_id)?
        .attr("type", "checkbox")?
        .flag("checked", selected)?
        .build();
    {
        let state = state.clone();
        on_change(&checkbox, move |_| {
            state.wizard.borrow_mut().toggle_procedure(procedure);
            state.notify_subscribers();
        })?;
    }
    let label = ElementBuilder::new("label")?
        .class("procedure-label")
        .attr("for", &checkbox_id)?
        .child(checkbox)?
        .child(ElementBuilder::new("span")?.text(procedure.label).build())?
        .build();
    append_child(&row, &label)?;

    if !selected {
        return Ok(row);
    }

    if procedure.id == FAJA_ID {
        append_child(&row, &render_faja_size(state, vm)?)?;
    }
    if procedure.id == PIERNA_ID {
        append_child(&row, &render_pierna_sides(state, vm)?)?;
    }

    let price = ElementBuilder::new("input")?
        .id(&price_input_id(procedure))?
        .class("form-input price-input")
        .attr("type", "text")?
        .attr("inputmode", "numeric")?
        .attr("placeholder", "Precio")?
        .flag("disabled", !vm.draft.price_enabled(procedure))?
        .build();
    set_control_value(&price, &vm.draft.price_of(procedure.label));
    {
        let state = state.clone();
        let target = price.clone();
        on_input(&price, move |value| {
            let formatted = state.wizard.borrow_mut().set_price(procedure.label, &value);
            set_control_value(&target, &formatted);
            crate::rerender_app_with_type(UpdateType::Incremental(IncrementalUpdate::Wizard));
        })?;
    }
    append_child(&row, &price)?;
    Ok(row)
}

fn render_faja_size(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let current = faja_size(&vm.draft.notes).unwrap_or_default().to_string();
    let select = ElementBuilder::new("select")?
        .id("wizard-faja-size")?
        .class("form-select")
        .child(ElementBuilder::new("option")?.attr("value", "")?.text("Talla...").build())?
        .build();
    for size in FAJA_SIZES {
        let option = ElementBuilder::new("option")?
            .attr("value", size)?
            .flag("selected", size == current)?
            .text(size)
            .build();
        append_child(&select, &option)?;
    }
    let state = state.clone();
    let control = select.clone();
    on_change(&select, move |_| {
        let size = control_value(&control);
        if size.is_empty() {
            return;
        }
        state.wizard.borrow_mut().set_faja_size(&size);
        state.notify_subscribers();
    })?;
    Ok(select)
}

fn render_pierna_sides(state: &AppState, vm: &WizardViewModel) -> Result<Element, JsValue> {
    let (interna, externa) = pierna_sides(&vm.draft.notes);
    let wrapper = ElementBuilder::new("div")?.class("pierna-sides").build();

    for (id, text, checked) in [
        ("wizard-pierna-interna", "Interna", interna),
        ("wizard-pierna-externa", "Externa", externa),
    ] {
        let checkbox = ElementBuilder::new("input")?
            .id(id)?
            .attr("type", "checkbox")?
            .flag("checked", checked)?
            .build();
        let state = state.clone();
        on_change(&checkbox, move |_| {
            let side = |id: &str| get_element_by_id(id).map(|el| is_checked(&el)).unwrap_or(false);
            let (interna, externa) = (side("wizard-pierna-interna"), side("wizard-pierna-externa"));
            state.wizard.borrow_mut().set_pierna_sides(interna, externa);
            state.notify_subscribers();
        })?;
        let label = ElementBuilder::new("label")?
            .child(checkbox)?
            .child(ElementBuilder::new("span")?.text(text).build())?
            .build();
        append_child(&wrapper, &label)?;
    }
    Ok(wrapper)
}
