// ============================================================================
// REMITENTES VIEW - Administración de remitentes (solo ADMIN)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, confirm, on_click, on_input, ElementBuilder};
use crate::models::{Remitente, RemitenteAction};
use crate::services::{ApiClient, InFlightGuard};
use crate::state::AppState;
use crate::utils::dates::display_date;
use crate::viewmodels::remitentes_viewmodel::{
    RemitenteEditor, RemitenteField, RemitentesViewModel, MSG_REMITENTES_EMPTY,
};
use crate::viewmodels::LoadState;
use crate::views::shared::{
    button, empty_block, error_block, loading_block, modal_shell, page_header, show_toast, text_field,
};

pub fn render_remitentes(state: &AppState) -> Result<Element, JsValue> {
    let vm = state.remitentes.borrow().clone();
    let page = ElementBuilder::new("div")?.class("page page-remitentes").build();

    let header = page_header("Remitentes", "Gestiona los remitentes de la clínica")?;
    let create = button("btn-primary", "+ Nuevo remitente")?;
    {
        let state = state.clone();
        on_click(&create, move |_| {
            state.remitentes.borrow_mut().open_create();
            state.notify_subscribers();
        })?;
    }
    append_child(&header, &create)?;
    append_child(&page, &header)?;

    let counts = vm.counts();
    let summary = ElementBuilder::new("div")?
        .class("status-counts")
        .child(count_chip("Activos", counts.active, "badge-success")?)?
        .child(count_chip("Inactivos", counts.inactive, "badge-warning")?)?
        .child(count_chip("Despedidos", counts.fired, "badge-danger")?)?
        .build();
    append_child(&page, &summary)?;

    match &vm.remitentes {
        LoadState::Idle | LoadState::Loading => append_child(&page, &loading_block("Cargando remitentes...")?)?,
        LoadState::Failed(message) => append_child(&page, &error_block(message)?)?,
        LoadState::Loaded(rows) if rows.is_empty() => append_child(&page, &empty_block(MSG_REMITENTES_EMPTY)?)?,
        LoadState::Loaded(rows) => append_child(&page, &render_table(state, rows)?)?,
    }

    if let Some(editor) = &vm.editor {
        append_child(&page, &render_editor(state, &vm, editor)?)?;
    }
    Ok(page)
}

fn count_chip(label: &str, count: usize, class: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("span")?
        .class(&format!("badge {}", class))
        .text(&format!("{}: {}", label, count))
        .build())
}

fn render_table(state: &AppState, rows: &[Remitente]) -> Result<Element, JsValue> {
    let table = ElementBuilder::new("table")?.class("data-table").build();
    let head = ElementBuilder::new("tr")?.build();
    for title in ["Nombre", "Usuario", "Correo", "Celular", "Estado", "Creado", "Acciones"] {
        append_child(&head, &ElementBuilder::new("th")?.text(title).build())?;
    }
    append_child(&table, &ElementBuilder::new("thead")?.child(head)?.build())?;

    let body = ElementBuilder::new("tbody")?.build();
    for remitente in rows {
        let row = ElementBuilder::new("tr")?
            .child(ElementBuilder::new("td")?.text(&remitente.full_name()).build())?
            .child(ElementBuilder::new("td")?.text(&remitente.name).build())?
            .child(ElementBuilder::new("td")?.text(&remitente.email).build())?
            .child(ElementBuilder::new("td")?.text(&remitente.cellphone).build())?
            .child(
                ElementBuilder::new("td")?
                    .child(
                        ElementBuilder::new("span")?
                            .class(&format!("badge status-{}", remitente.status.as_str()))
                            .text(remitente.status.label())
                            .build(),
                    )?
                    .build(),
            )?
            .child(
                ElementBuilder::new("td")?
                    .text(&display_date(remitente.created_at.as_deref().unwrap_or_default()))
                    .build(),
            )?
            .build();

        let actions = ElementBuilder::new("td")?.class("row-actions").build();
        let edit = button("btn-link", "Editar")?;
        {
            let state = state.clone();
            let id = remitente.id;
            on_click(&edit, move |_| {
                state.remitentes.borrow_mut().open_edit(id);
                state.notify_subscribers();
            })?;
        }
        append_child(&actions, &edit)?;

        for action in remitente.available_actions() {
            let btn = button(&format!("btn-link action-{}", action.path_segment()), action.label())?;
            let state = state.clone();
            let id = remitente.id;
            on_click(&btn, move |_| change_status(&state, id, action))?;
            append_child(&actions, &btn)?;
        }
        append_child(&row, &actions)?;
        append_child(&body, &row)?;
    }
    append_child(&table, &body)?;
    Ok(table)
}

fn change_status(state: &AppState, id: i64, action: RemitenteAction) {
    if !confirm(&action.confirm_message()) {
        return;
    }
    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().change_remitente_status(id, action).await;
        show_toast(&state, RemitentesViewModel::status_toast(action, result));
        reload_remitentes(&state);
    });
}

fn render_editor(state: &AppState, vm: &RemitentesViewModel, editor: &RemitenteEditor) -> Result<Element, JsValue> {
    let (backdrop, modal) = modal_shell(editor.title())?;
    let form = &editor.form;

    let fields = [
        (RemitenteField::Name, "Usuario", "remitente-name", "text", form.name.as_str(), ""),
        (RemitenteField::FirstName, "Nombre", "remitente-first-name", "text", form.first_name.as_str(), ""),
        (RemitenteField::LastName, "Apellido", "remitente-last-name", "text", form.last_name.as_str(), ""),
        (RemitenteField::Email, "Correo", "remitente-email", "email", form.email.as_str(), ""),
        (RemitenteField::Cellphone, "Celular", "remitente-cellphone", "tel", form.cellphone.as_str(), ""),
        (
            RemitenteField::Password,
            "Contraseña",
            "remitente-password",
            "password",
            form.password.as_str(),
            editor.password_hint(),
        ),
    ];
    for (field, label, id, input_type, value, placeholder) in fields {
        let input = text_field(label, id, input_type, value, placeholder)?;
        let state = state.clone();
        on_input(&input.control, move |value| {
            state.remitentes.borrow_mut().set_field(field, &value);
        })?;
        append_child(&modal, &input.group)?;
    }

    let actions = ElementBuilder::new("div")?.class("modal-actions").build();
    let cancel = button("btn-secondary", "Cancelar")?;
    {
        let state = state.clone();
        on_click(&cancel, move |_| {
            state.remitentes.borrow_mut().close_editor();
            state.notify_subscribers();
        })?;
    }
    append_child(&actions, &cancel)?;

    let save = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .flag("disabled", vm.is_saving)?
        .text(if vm.is_saving { "Guardando..." } else { "Guardar" })
        .build();
    {
        let state = state.clone();
        on_click(&save, move |_| save_remitente(&state))?;
    }
    append_child(&actions, &save)?;
    append_child(&modal, &actions)?;
    Ok(backdrop)
}

fn save_remitente(state: &AppState) {
    let prepared = state.remitentes.borrow_mut().prepare_save();
    let (editing_id, form) = match prepared {
        Ok(plan) => plan,
        Err(toast) => {
            show_toast(state, toast);
            return;
        }
    };
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().save_remitente(editing_id, &form).await;
        let ok = result.is_ok();
        let toast = state.remitentes.borrow_mut().finish_save(editing_id, result);
        show_toast(&state, toast);
        if ok {
            reload_remitentes(&state);
        } else {
            state.notify_subscribers();
        }
    });
}

/// Primera carga al entrar en la ruta
pub fn load_remitentes(state: &AppState) {
    if state.remitentes.borrow().remitentes.is_idle() {
        reload_remitentes(state);
    }
}

fn reload_remitentes(state: &AppState) {
    let Some(guard) = InFlightGuard::acquire("remitentes") else {
        return;
    };
    state.remitentes.borrow_mut().begin_load();
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let _guard = guard;
        let result = ApiClient::new().list_remitentes().await;
        state.remitentes.borrow_mut().apply_list(result);
        state.notify_subscribers();
    });
}
