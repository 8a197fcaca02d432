// ============================================================================
// STATS VIEW - Panel de estadísticas (solo ADMIN)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, on_click, ElementBuilder};
use crate::services::{ApiClient, InFlightGuard};
use crate::state::AppState;
use crate::utils::dates::today;
use crate::viewmodels::stats_viewmodel::{BarRow, StatCard, StatsViewModel, Variation};
use crate::viewmodels::LoadState;
use crate::views::shared::{button, empty_block, error_block, loading_block, page_header};

pub fn render_stats(state: &AppState) -> Result<Element, JsValue> {
    let vm = state.stats.borrow().clone();
    let page = ElementBuilder::new("div")?.class("page page-stats").build();

    let header = page_header("Estadísticas", &StatsViewModel::period(today()))?;
    let refresh = button("btn-secondary", "Actualizar")?;
    {
        let state = state.clone();
        on_click(&refresh, move |_| reload_stats(&state))?;
    }
    append_child(&header, &refresh)?;
    append_child(&page, &header)?;

    append_child(&page, &render_cards(&vm)?)?;
    append_child(&page, &render_referrers(&vm)?)?;
    append_child(
        &page,
        &render_bars("Ingresos por procedimiento", &vm.by_procedure, vm.procedure_bars(), "horizontal")?,
    )?;
    append_child(
        &page,
        &render_bars("Ingresos mensuales", &vm.monthly, vm.monthly_bars(), "vertical")?,
    )?;
    append_child(
        &page,
        &render_bars("Ingresos de la semana", &vm.weekly, vm.weekly_bars(), "vertical")?,
    )?;
    Ok(page)
}

/// Bloque de carga/error común; `None` si hay datos
fn pending_block<T>(load: &LoadState<T>) -> Result<Option<Element>, JsValue> {
    match load {
        LoadState::Idle | LoadState::Loading => loading_block("Cargando...").map(Some),
        LoadState::Failed(message) => error_block(message).map(Some),
        LoadState::Loaded(_) => Ok(None),
    }
}

fn render_cards(vm: &StatsViewModel) -> Result<Element, JsValue> {
    let grid = ElementBuilder::new("section")?.class("stat-cards").build();
    if let Some(block) = pending_block(&vm.summary)? {
        append_child(&grid, &block)?;
        return Ok(grid);
    }
    for card in vm.cards() {
        append_child(&grid, &render_card(&card)?)?;
    }
    Ok(grid)
}

fn render_card(card: &StatCard) -> Result<Element, JsValue> {
    let el = ElementBuilder::new("article")?
        .class("stat-card")
        .child(ElementBuilder::new("span")?.class("stat-label").text(card.label).build())?
        .child(ElementBuilder::new("strong")?.class("stat-value").text(&card.value).build())?
        .build();
    match &card.variation {
        Some(Variation::Change { text, positive }) => {
            let class = if *positive { "stat-variation up" } else { "stat-variation down" };
            append_child(&el, &ElementBuilder::new("span")?.class(class).text(text).build())?;
        }
        Some(Variation::NoData) => {
            append_child(
                &el,
                &ElementBuilder::new("span")?.class("stat-variation muted").text("Sin datos del mes anterior").build(),
            )?;
        }
        None => {}
    }
    Ok(el)
}

fn render_referrers(vm: &StatsViewModel) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("section")?
        .class("stats-section")
        .child(ElementBuilder::new("h2")?.text("Remitentes del mes").build())?
        .build();
    if let Some(block) = pending_block(&vm.referrers)? {
        append_child(&section, &block)?;
        return Ok(section);
    }
    let rows = vm.referrer_rows();
    if rows.is_empty() {
        append_child(&section, &empty_block("Sin datos para este periodo")?)?;
        return Ok(section);
    }

    let table = ElementBuilder::new("table")?.class("data-table").build();
    let head = ElementBuilder::new("tr")?.build();
    for title in ["Remitente", "Pacientes", "Confirmados", "Cancelados", "Ingresos mes", "Ingresos año"] {
        append_child(&head, &ElementBuilder::new("th")?.text(title).build())?;
    }
    append_child(&table, &ElementBuilder::new("thead")?.child(head)?.build())?;

    let body = ElementBuilder::new("tbody")?.build();
    for row in rows {
        let tr = ElementBuilder::new("tr")?.build();
        for cell in [&row.name, &row.patients, &row.confirmed, &row.canceled, &row.income_month, &row.income_year] {
            append_child(&tr, &ElementBuilder::new("td")?.text(cell).build())?;
        }
        append_child(&body, &tr)?;
    }
    append_child(&table, &body)?;
    append_child(&section, &table)?;
    Ok(section)
}

fn render_bars<T>(title: &str, load: &LoadState<T>, bars: Vec<BarRow>, orientation: &str) -> Result<Element, JsValue> {
    let section = ElementBuilder::new("section")?
        .class("stats-section")
        .child(ElementBuilder::new("h2")?.text(title).build())?
        .build();
    if let Some(block) = pending_block(load)? {
        append_child(&section, &block)?;
        return Ok(section);
    }
    if bars.is_empty() {
        append_child(&section, &empty_block("Sin datos para este periodo")?)?;
        return Ok(section);
    }

    let chart = ElementBuilder::new("div")?
        .class(&format!("bar-chart bar-chart-{}", orientation))
        .build();
    let dimension = if orientation == "vertical" { "height" } else { "width" };
    for bar in bars {
        let item = ElementBuilder::new("div")?
            .class("bar-item")
            .attr("title", &bar.amount)?
            .child(ElementBuilder::new("span")?.class("bar-label").text(&bar.label).build())?
            .child(
                ElementBuilder::new("div")?
                    .class("bar-track")
                    .child(
                        ElementBuilder::new("div")?
                            .class("bar-fill")
                            .attr("style", &format!("{}: {:.1}%", dimension, bar.percent))?
                            .build(),
                    )?
                    .build(),
            )?
            .child(ElementBuilder::new("span")?.class("bar-amount").text(&bar.amount).build())?
            .build();
        append_child(&chart, &item)?;
    }
    append_child(&section, &chart)?;
    Ok(section)
}

// ============================================================================
// CARGA
// ============================================================================

pub fn load_stats(state: &AppState) {
    if state.stats.borrow().summary.is_idle() {
        reload_stats(state);
    }
}

/// Cinco peticiones en paralelo; cada una actualiza su bloque
fn reload_stats(state: &AppState) {
    let Some(guard) = InFlightGuard::acquire("stats") else {
        return;
    };
    state.stats.borrow_mut().begin_load();
    state.notify_subscribers();
    // La clave se libera cuando termina la última de las cinco
    let guard = std::rc::Rc::new(guard);

    {
        let state = state.clone();
        let guard = guard.clone();
        spawn_local(async move {
            let result = ApiClient::new().stats_summary().await;
            state.stats.borrow_mut().apply_summary(result);
            state.notify_subscribers();
            drop(guard);
        });
    }
    {
        let state = state.clone();
        let guard = guard.clone();
        spawn_local(async move {
            let result = ApiClient::new().stats_referrers().await;
            state.stats.borrow_mut().apply_referrers(result);
            state.notify_subscribers();
            drop(guard);
        });
    }
    {
        let state = state.clone();
        let guard = guard.clone();
        spawn_local(async move {
            let result = ApiClient::new().stats_income_by_procedure().await;
            state.stats.borrow_mut().apply_by_procedure(result);
            state.notify_subscribers();
            drop(guard);
        });
    }
    {
        let state = state.clone();
        let guard = guard.clone();
        spawn_local(async move {
            let result = ApiClient::new().stats_monthly_income().await;
            state.stats.borrow_mut().apply_monthly(result);
            state.notify_subscribers();
            drop(guard);
        });
    }
    let state = state.clone();
    spawn_local(async move {
        let result = ApiClient::new().stats_weekly_income().await;
        state.stats.borrow_mut().apply_weekly(result);
        state.notify_subscribers();
        drop(guard);
    });
}
