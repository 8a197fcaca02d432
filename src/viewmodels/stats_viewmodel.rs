// ============================================================================
// STATS VIEWMODEL - Tarjetas de resumen, remitentes y gráficos de barras
// ============================================================================
// Cada bloque carga por separado; un fallo en uno no tumba los demás.
// ============================================================================

use chrono::NaiveDate;

use crate::error::ApiError;
use crate::models::{MonthlyIncomeRow, ProcedureIncomeRow, ReferrerStatsRow, StatsSummary, WeeklyIncomeRow};
use crate::utils::dates::{month_abbrev, period_label, weekday_abbrev};
use crate::utils::format::{bar_percent, format_cop, format_number, plain_number};
use crate::viewmodels::load_state::LoadState;

pub const TOP_PROCEDURES: usize = 10;
pub const MONTHS_SHOWN: usize = 12;
/// Altura mínima visible de las barras verticales
pub const MIN_BAR_PERCENT: f64 = 2.0;
const BALANCE_LABEL: &str = "Balance Total";

#[derive(Clone, Debug, PartialEq)]
pub enum Variation {
    NoData,
    Change { text: String, positive: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    /// `None` en "Balance Total"
    pub variation: Option<Variation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReferrerRow {
    pub name: String,
    pub patients: String,
    pub confirmed: String,
    pub canceled: String,
    pub income_month: String,
    pub income_year: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarRow {
    pub label: String,
    pub amount: String,
    pub percent: f64,
}

fn variation(value: Option<f64>) -> Variation {
    match value {
        None => Variation::NoData,
        Some(v) => Variation::Change {
            text: format!("{}% vs mes anterior", plain_number(v)),
            positive: v > 0.0,
        },
    }
}

fn bars<I>(rows: I, min_percent: f64) -> Vec<BarRow>
where
    I: Iterator<Item = (String, f64)> + Clone,
{
    let max = rows.clone().map(|(_, v)| v).fold(1.0_f64, f64::max);
    rows.map(|(label, value)| BarRow {
        label,
        amount: format!("${}", format_number(value)),
        percent: bar_percent(value, max, min_percent),
    })
    .collect()
}

fn settle<T>(area: &str, result: Result<T, ApiError>, failure: &str) -> LoadState<T> {
    match result {
        Ok(data) => LoadState::Loaded(data),
        Err(err) => {
            log::error!("❌ [STATS] {}: {}", area, err);
            LoadState::Failed(failure.to_string())
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsViewModel {
    pub summary: LoadState<StatsSummary>,
    pub referrers: LoadState<Vec<ReferrerStatsRow>>,
    pub by_procedure: LoadState<Vec<ProcedureIncomeRow>>,
    pub monthly: LoadState<Vec<MonthlyIncomeRow>>,
    pub weekly: LoadState<Vec<WeeklyIncomeRow>>,
}

impl StatsViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        *self = Self {
            summary: LoadState::Loading,
            referrers: LoadState::Loading,
            by_procedure: LoadState::Loading,
            monthly: LoadState::Loading,
            weekly: LoadState::Loading,
        };
    }

    pub fn apply_summary(&mut self, result: Result<StatsSummary, ApiError>) {
        self.summary = settle("resumen", result, "Error al cargar estadísticas.");
    }

    pub fn apply_referrers(&mut self, result: Result<Vec<ReferrerStatsRow>, ApiError>) {
        self.referrers = settle("remitentes", result, "Error al cargar remitentes.");
    }

    pub fn apply_by_procedure(&mut self, result: Result<Vec<ProcedureIncomeRow>, ApiError>) {
        self.by_procedure = settle("por procedimiento", result, "Error al cargar.");
    }

    pub fn apply_monthly(&mut self, result: Result<Vec<MonthlyIncomeRow>, ApiError>) {
        self.monthly = settle("mensual", result, "Error al cargar.");
    }

    pub fn apply_weekly(&mut self, result: Result<Vec<WeeklyIncomeRow>, ApiError>) {
        self.weekly = settle("semanal", result, "Error al cargar.");
    }

    /// Encabezado "Octubre de 2026"
    pub fn period(today: NaiveDate) -> String {
        period_label(today)
    }

    pub fn cards(&self) -> Vec<StatCard> {
        let Some(s) = self.summary.data() else {
            return Vec::new();
        };
        vec![
            StatCard {
                label: "Ingresos Periodo Actual",
                value: format_cop(s.this_month_income),
                variation: Some(variation(s.income_variation)),
            },
            StatCard {
                label: "Nuevos Pacientes",
                value: plain_number(s.this_month_patients),
                variation: Some(variation(s.patients_variation)),
            },
            StatCard {
                label: "Regis. Clínicos Confirmados",
                value: plain_number(s.this_month_sessions),
                variation: Some(variation(s.sessions_variation)),
            },
            StatCard {
                label: "Procedimientos",
                value: plain_number(s.this_month_procedures),
                variation: Some(variation(s.procedures_variation)),
            },
            StatCard {
                label: BALANCE_LABEL,
                value: format_cop(s.total_income),
                variation: None,
            },
        ]
    }

    pub fn referrer_rows(&self) -> Vec<ReferrerRow> {
        self.referrers
            .rows()
            .iter()
            .map(|r| ReferrerRow {
                name: if r.referrer_name.trim().is_empty() {
                    "—".to_string()
                } else {
                    r.referrer_name.clone()
                },
                patients: plain_number(r.total_patients_month),
                confirmed: plain_number(r.total_confirmed_month),
                canceled: plain_number(r.total_canceled_month),
                income_month: format_cop(r.confirmed_income_month),
                income_year: format_cop(r.confirmed_income_year),
            })
            .collect()
    }

    /// Los diez primeros, sin altura mínima
    pub fn procedure_bars(&self) -> Vec<BarRow> {
        let rows = self
            .by_procedure
            .rows()
            .iter()
            .take(TOP_PROCEDURES)
            .map(|r| (r.item_name.clone(), r.total_income));
        bars(rows, 0.0)
    }

    /// Últimos doce meses
    pub fn monthly_bars(&self) -> Vec<BarRow> {
        let rows = self.monthly.rows();
        let start = rows.len().saturating_sub(MONTHS_SHOWN);
        let rows = rows[start..]
            .iter()
            .map(|r| (month_abbrev(r.month).to_string(), r.total_income));
        bars(rows, MIN_BAR_PERCENT)
    }

    pub fn weekly_bars(&self) -> Vec<BarRow> {
        let rows = self
            .weekly
            .rows()
            .iter()
            .map(|r| (weekday_abbrev(&r.date), r.total_income));
        bars(rows, MIN_BAR_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tarjetas_y_variacion() {
        let mut vm = StatsViewModel::new();
        vm.begin_load();
        vm.apply_summary(Ok(StatsSummary {
            this_month_income: 2_500_000.0,
            income_variation: Some(12.5),
            this_month_patients: 4.0,
            patients_variation: None,
            this_month_sessions: 3.0,
            sessions_variation: Some(-10.0),
            this_month_procedures: 6.0,
            procedures_variation: Some(0.0),
            total_income: 9_000_000.0,
        }));
        let cards = vm.cards();
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].value, "$ 2.500.000");
        assert_eq!(
            cards[0].variation,
            Some(Variation::Change { text: "12.5% vs mes anterior".into(), positive: true })
        );
        assert_eq!(cards[1].variation, Some(Variation::NoData));
        assert_eq!(
            cards[2].variation,
            Some(Variation::Change { text: "-10% vs mes anterior".into(), positive: false })
        );
        assert_eq!(cards[4].label, "Balance Total");
        assert_eq!(cards[4].variation, None);
    }

    #[test]
    fn test_top_diez_procedimientos() {
        let mut vm = StatsViewModel::new();
        let rows = (1..=12)
            .map(|i| ProcedureIncomeRow { item_name: format!("P{}", i), total_income: (13 - i) as f64 * 100.0 })
            .collect();
        vm.apply_by_procedure(Ok(rows));
        let bars = vm.procedure_bars();
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0].percent, 100.0);
        assert_eq!(bars[9].label, "P10");
        assert_eq!(bars[9].percent, 25.0);
        assert_eq!(bars[0].amount, "$1.200");
    }

    #[test]
    fn test_ultimos_doce_meses_con_minimo() {
        let mut vm = StatsViewModel::new();
        let mut rows: Vec<MonthlyIncomeRow> = (1..=12)
            .map(|m| MonthlyIncomeRow { year: 2025, month: m, total_income: 1_000.0 })
            .collect();
        rows.push(MonthlyIncomeRow { year: 2026, month: 1, total_income: 0.0 });
        vm.apply_monthly(Ok(rows));
        let bars = vm.monthly_bars();
        assert_eq!(bars.len(), 12);
        assert_eq!(bars[0].label, "Feb");
        assert_eq!(bars[11].label, "Ene");
        assert_eq!(bars[11].percent, MIN_BAR_PERCENT);
    }

    #[test]
    fn test_semana_y_errores_independientes() {
        let mut vm = StatsViewModel::new();
        vm.begin_load();
        vm.apply_weekly(Ok(vec![
            WeeklyIncomeRow { date: "2026-10-12".into(), total_income: 0.0 },
            WeeklyIncomeRow { date: "2026-10-13".into(), total_income: 0.0 },
        ]));
        let bars = vm.weekly_bars();
        assert_eq!(bars[0].label, "lun");
        assert_eq!(bars[1].percent, MIN_BAR_PERCENT);

        vm.apply_referrers(Err(ApiError::Http { status: 403, message: None }));
        assert_eq!(vm.referrers.error(), Some("Error al cargar remitentes."));
        assert!(vm.summary.is_loading());
    }
}
