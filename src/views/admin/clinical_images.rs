// ============================================================================
// CLINICAL IMAGES VIEW - Galería antes/después con alta y edición
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, confirm, get_element_by_id, on_change, on_click, on_input, selected_file, set_attribute,
    ElementBuilder,
};
use crate::services::{ApiClient, ImageUpload, InFlightGuard};
use crate::state::AppState;
use crate::viewmodels::clinical_images_viewmodel::{
    ClinicalImagesViewModel, GalleryCard, MSG_IMAGES_EMPTY, MSG_IMAGE_DELETE_CONFIRM,
};
use crate::viewmodels::LoadState;
use crate::views::shared::{
    button, empty_block, error_block, loading_block, page_header, show_toast, text_field, textarea_field,
};

const BEFORE_INPUT_ID: &str = "image-before";
const AFTER_INPUT_ID: &str = "image-after";

pub fn render_clinical_images(state: &AppState) -> Result<Element, JsValue> {
    let vm = state.images.borrow().clone();
    let page = ElementBuilder::new("div")?.class("page page-images").build();

    let header = page_header("Imágenes clínicas", "Resultados antes y después")?;
    let toggle = button(if vm.show_form { "btn-secondary" } else { "btn-primary" }, vm.toggle_label())?;
    {
        let state = state.clone();
        on_click(&toggle, move |_| {
            state.images.borrow_mut().toggle_form();
            state.notify_subscribers();
        })?;
    }
    append_child(&header, &toggle)?;
    append_child(&page, &header)?;

    if vm.show_form {
        append_child(&page, &render_form(state, &vm)?)?;
    }

    match &vm.images {
        LoadState::Idle | LoadState::Loading => append_child(&page, &loading_block("Cargando imágenes...")?)?,
        LoadState::Failed(message) => append_child(&page, &error_block(message)?)?,
        LoadState::Loaded(rows) if rows.is_empty() => append_child(&page, &empty_block(MSG_IMAGES_EMPTY)?)?,
        LoadState::Loaded(_) => {
            let gallery = ElementBuilder::new("div")?.class("gallery").build();
            for card in vm.cards(ApiClient::new().base_url()) {
                append_child(&gallery, &render_card(state, &card)?)?;
            }
            append_child(&page, &gallery)?;
        }
    }
    Ok(page)
}

fn render_form(state: &AppState, vm: &ClinicalImagesViewModel) -> Result<Element, JsValue> {
    let form = ElementBuilder::new("section")?.class("image-form card").build();
    let heading = if vm.editing_id.is_some() { "Editar imagen" } else { "Nueva imagen" };
    append_child(&form, &ElementBuilder::new("h2")?.text(heading).build())?;

    let title = text_field("Título", "image-title", "text", &vm.form.title, "")?;
    {
        let state = state.clone();
        on_input(&title.control, move |value| state.images.borrow_mut().set_title(&value))?;
    }
    append_child(&form, &title.group)?;

    let description = textarea_field("Descripción", "image-description", &vm.form.description, "")?;
    {
        let state = state.clone();
        on_input(&description.control, move |value| state.images.borrow_mut().set_description(&value))?;
    }
    append_child(&form, &description.group)?;

    let files = ElementBuilder::new("div")?.class("file-inputs").build();
    for (label, id) in [("Imagen antes", BEFORE_INPUT_ID), ("Imagen después", AFTER_INPUT_ID)] {
        let input = text_field(label, id, "file", "", "")?;
        set_attribute(&input.control, "accept", "image/*")?;
        let state = state.clone();
        on_change(&input.control, move |_| {
            let has_before = file_from(BEFORE_INPUT_ID).is_some();
            let has_after = file_from(AFTER_INPUT_ID).is_some();
            state.images.borrow_mut().set_files(has_before, has_after);
        })?;
        append_child(&files, &input.group)?;
    }
    append_child(&form, &files)?;

    let save = ElementBuilder::new("button")?
        .attr("type", "button")?
        .class("btn-primary")
        .flag("disabled", vm.is_uploading)?
        .text(if vm.is_uploading { "Subiendo..." } else { "Guardar" })
        .build();
    {
        let state = state.clone();
        on_click(&save, move |_| upload_image(&state))?;
    }
    append_child(&form, &save)?;
    Ok(form)
}

fn file_from(id: &str) -> Option<web_sys::File> {
    get_element_by_id(id).and_then(|el| selected_file(&el))
}

fn render_card(state: &AppState, card: &GalleryCard) -> Result<Element, JsValue> {
    let figure = |src: &str, caption: &str| -> Result<Element, JsValue> {
        Ok(ElementBuilder::new("figure")?
            .child(
                ElementBuilder::new("img")?
                    .attr("src", src)?
                    .attr("alt", caption)?
                    .attr("loading", "lazy")?
                    .build(),
            )?
            .child(ElementBuilder::new("figcaption")?.text(caption).build())?
            .build())
    };

    let article = ElementBuilder::new("article")?
        .class("gallery-card")
        .child(
            ElementBuilder::new("div")?
                .class("gallery-pair")
                .child(figure(&card.before_url, "Antes")?)?
                .child(figure(&card.after_url, "Después")?)?
                .build(),
        )?
        .child(ElementBuilder::new("h3")?.text(&card.title).build())?
        .build();
    if !card.description.is_empty() {
        append_child(&article, &ElementBuilder::new("p")?.text(&card.description).build())?;
    }

    let actions = ElementBuilder::new("div")?.class("card-actions").build();
    let edit = button("btn-link", "Editar")?;
    {
        let state = state.clone();
        let id = card.id;
        on_click(&edit, move |_| {
            state.images.borrow_mut().start_edit(id);
            state.notify_subscribers();
        })?;
    }
    append_child(&actions, &edit)?;

    let delete = button("btn-link btn-danger-link", "Eliminar")?;
    {
        let state = state.clone();
        let id = card.id;
        on_click(&delete, move |_| delete_image(&state, id))?;
    }
    append_child(&actions, &delete)?;
    append_child(&article, &actions)?;
    Ok(article)
}

fn upload_image(state: &AppState) {
    let editing_id = match state.images.borrow_mut().begin_upload() {
        Ok(id) => id,
        Err(toast) => {
            show_toast(state, toast);
            return;
        }
    };
    // Los archivos se leen del DOM antes de re-renderizar el formulario
    let upload = {
        let vm = state.images.borrow();
        ImageUpload {
            title: vm.form.title.clone(),
            description: vm.form.description.clone(),
            before_image: file_from(BEFORE_INPUT_ID),
            after_image: file_from(AFTER_INPUT_ID),
        }
    };
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().save_clinical_image(editing_id, &upload).await;
        let ok = result.is_ok();
        let toast = state.images.borrow_mut().finish_upload(result);
        show_toast(&state, toast);
        if ok {
            reload_images(&state);
        } else {
            state.notify_subscribers();
        }
    });
}

fn delete_image(state: &AppState, id: i64) {
    if !confirm(MSG_IMAGE_DELETE_CONFIRM) {
        return;
    }
    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().delete_clinical_image(id).await;
        show_toast(&state, ClinicalImagesViewModel::delete_toast(result));
        reload_images(&state);
    });
}

/// Primera carga al entrar en la ruta
pub fn load_images(state: &AppState) {
    if state.images.borrow().images.is_idle() {
        reload_images(state);
    }
}

fn reload_images(state: &AppState) {
    let Some(guard) = InFlightGuard::acquire("clinical-images") else {
        return;
    };
    state.images.borrow_mut().begin_load();
    state.notify_subscribers();

    let state = state.clone();
    spawn_local(async move {
        let _guard = guard;
        let result = ApiClient::new().list_clinical_images().await;
        state.images.borrow_mut().apply_list(result);
        state.notify_subscribers();
    });
}
