use serde::{Deserialize, Serialize};
use super::api::{lenient_f64, lenient_opt_f64};

/// `GET /api/v1/stats/summary`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub this_month_income: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub income_variation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub this_month_patients: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub patients_variation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub this_month_sessions: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub sessions_variation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub this_month_procedures: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub procedures_variation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_income: f64,
}

/// Fila de `GET /api/v1/stats/referrers`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferrerStatsRow {
    pub referrer_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_patients_month: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_confirmed_month: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_canceled_month: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confirmed_income_month: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confirmed_income_year: f64,
}

/// Fila de `GET /api/v1/stats/income-by-procedure`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcedureIncomeRow {
    pub item_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_income: f64,
}

/// Fila de `GET /api/v1/stats/monthly-income`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncomeRow {
    pub year: i32,
    pub month: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_income: f64,
}

/// Fila de `GET /api/v1/stats/weekly-income`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyIncomeRow {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_income: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumen_con_variacion_nula() {
        let json = r#"{"this_month_income":"2500000","income_variation":12.5,
                       "this_month_patients":4,"patients_variation":null,
                       "this_month_sessions":3,"this_month_procedures":6,
                       "total_income":"9000000"}"#;
        let summary: StatsSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.this_month_income, 2_500_000.0);
        assert_eq!(summary.income_variation, Some(12.5));
        assert_eq!(summary.patients_variation, None);
        assert_eq!(summary.sessions_variation, None);
        assert_eq!(summary.total_income, 9_000_000.0);
    }
}
