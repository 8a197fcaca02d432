// ============================================================================
// FORM PIECES - Campos, avisos y bloques de estado reutilizables
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, set_control_value, ElementBuilder};

/// Etiqueta + control dentro de un `div.form-group`
pub struct Field {
    pub group: Element,
    pub control: Element,
}

fn group(label: &str, id: &str, control: Element) -> Result<Field, JsValue> {
    let group = ElementBuilder::new("div")?.class("form-group").build();
    let label_el = ElementBuilder::new("label")?
        .attr("for", id)?
        .text(label)
        .build();
    append_child(&group, &label_el)?;
    append_child(&group, &control)?;
    Ok(Field { group, control })
}

pub fn text_field(label: &str, id: &str, input_type: &str, value: &str, placeholder: &str) -> Result<Field, JsValue> {
    let input = ElementBuilder::new("input")?
        .id(id)?
        .class("form-input")
        .attr("type", input_type)?
        .attr("placeholder", placeholder)?
        .build();
    set_control_value(&input, value);
    group(label, id, input)
}

pub fn textarea_field(label: &str, id: &str, value: &str, placeholder: &str) -> Result<Field, JsValue> {
    let area = ElementBuilder::new("textarea")?
        .id(id)?
        .class("form-textarea")
        .attr("rows", "4")?
        .attr("placeholder", placeholder)?
        .build();
    set_control_value(&area, value);
    group(label, id, area)
}

/// Select con opción vacía inicial
pub fn select_field(label: &str, id: &str, options: &[&str], selected: &str) -> Result<Field, JsValue> {
    let select = ElementBuilder::new("select")?.id(id)?.class("form-select").build();
    let placeholder = ElementBuilder::new("option")?
        .attr("value", "")?
        .text("Seleccione...")
        .build();
    append_child(&select, &placeholder)?;
    for option in options {
        let opt = ElementBuilder::new("option")?
            .attr("value", option)?
            .flag("selected", *option == selected)?
            .text(option)
            .build();
        append_child(&select, &opt)?;
    }
    group(label, id, select)
}

pub fn button(class: &str, text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("button")?
        .attr("type", "button")?
        .class(class)
        .text(text)
        .build())
}

/// Aviso de formulario; oculto si no hay texto
pub fn form_alert(id: &str, kind: &str, text: Option<&str>) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .id(id)?
        .class(&format!("form-alert form-alert-{}", kind))
        .flag("hidden", text.is_none())?
        .text(text.unwrap_or_default())
        .build())
}

pub fn loading_block(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("state-block state-loading")
        .child(ElementBuilder::new("div")?.class("spinner").build())?
        .child(ElementBuilder::new("p")?.text(text).build())?
        .build())
}

pub fn empty_block(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("state-block state-empty")
        .text(text)
        .build())
}

pub fn error_block(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("state-block state-error")
        .text(text)
        .build())
}

/// Modal sobre backdrop; devuelve (backdrop, cuerpo del modal)
pub fn modal_shell(title: &str) -> Result<(Element, Element), JsValue> {
    let backdrop = ElementBuilder::new("div")?.class("modal-backdrop").build();
    let modal = ElementBuilder::new("div")?
        .class("modal")
        .attr("role", "dialog")?
        .child(ElementBuilder::new("h2")?.class("modal-title").text(title).build())?
        .build();
    append_child(&backdrop, &modal)?;
    Ok((backdrop, modal))
}

/// Encabezado de página con título y subtítulo
pub fn page_header(title: &str, subtitle: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("page-header")
        .child(ElementBuilder::new("h1")?.text(title).build())?
        .child(ElementBuilder::new("p")?.class("page-subtitle").text(subtitle).build())?
        .build())
}
