// ============================================================================
// ELEMENT HELPERS - Funciones básicas para manipular DOM
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, Window,
};

/// Obtener window global
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Obtener document
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Obtener elemento por ID
pub fn get_element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Crear elemento
pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document()
        .ok_or_else(|| JsValue::from_str("No document"))
        .and_then(|doc| doc.create_element(tag))
}

/// Establecer class name (reemplaza todas las clases)
pub fn set_class_name(element: &Element, class: &str) {
    element.set_class_name(class);
}

pub fn set_text_content(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

/// Establecer inner HTML
pub fn set_inner_html(element: &Element, html: &str) {
    element.set_inner_html(html);
}

pub fn append_child(parent: &Element, child: &Element) -> Result<(), JsValue> {
    parent.append_child(child).map(|_| ())
}

/// Vacía el elemento y agrega un único hijo
pub fn replace_children(parent: &Element, child: &Element) -> Result<(), JsValue> {
    set_inner_html(parent, "");
    append_child(parent, child)
}

pub fn set_attribute(element: &Element, name: &str, value: &str) -> Result<(), JsValue> {
    element.set_attribute(name, value)
}

pub fn remove_attribute(element: &Element, name: &str) -> Result<(), JsValue> {
    element.remove_attribute(name)
}

/// Atributo booleano (`disabled`, `checked`, `hidden`...)
pub fn set_flag(element: &Element, name: &str, on: bool) -> Result<(), JsValue> {
    if on {
        set_attribute(element, name, "")
    } else {
        remove_attribute(element, name)
    }
}

/// Texto de un elemento por id; no hace nada si no existe
pub fn set_text_by_id(id: &str, text: &str) {
    if let Some(element) = get_element_by_id(id) {
        set_text_content(&element, text);
    }
}

// ============================================================================
// CONTROLES DE FORMULARIO
// ============================================================================

/// Valor de input, textarea o select
pub fn control_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

/// Escribe el valor solo si cambió (no mueve el cursor al teclear)
pub fn set_control_value(element: &Element, value: &str) {
    if control_value(element) == value {
        return;
    }
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    }
}

pub fn is_checked(element: &Element) -> bool {
    element
        .dyn_ref::<HtmlInputElement>()
        .map(|input| input.checked())
        .unwrap_or(false)
}

pub fn set_disabled(element: &Element, disabled: bool) {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_disabled(disabled);
    } else if let Some(button) = element.dyn_ref::<HtmlButtonElement>() {
        button.set_disabled(disabled);
    } else if let Err(e) = set_flag(element, "disabled", disabled) {
        log::warn!("⚠️ [DOM] No se pudo cambiar disabled: {:?}", e);
    }
}

/// Primer archivo elegido en un `<input type="file">`
pub fn selected_file(element: &Element) -> Option<web_sys::File> {
    element
        .dyn_ref::<HtmlInputElement>()
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
}

// ============================================================================
// DIÁLOGOS NATIVOS
// ============================================================================

pub fn alert(message: &str) {
    if let Some(Err(e)) = window().map(|w| w.alert_with_message(message)) {
        log::warn!("⚠️ [DOM] alert falló: {:?}", e);
    }
}

/// `window.confirm`; sin window se toma como cancelado
pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
