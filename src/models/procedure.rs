use serde::{Deserialize, Serialize};
use super::api::{lenient_f64, lenient_opt_f64};

/// Ítem facturado de un procedimiento
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcedureItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub item_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
}

/// Procedimiento asociado a una valoración
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: i64,
    #[serde(default)]
    pub medical_evaluation_id: Option<i64>,
    #[serde(default)]
    pub procedure_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub items: Vec<ProcedureItem>,
}

impl Procedure {
    /// `total_amount` del backend, o la suma de los ítems si no viene
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.items.iter().map(|i| i.price).sum())
    }

    pub fn date(&self) -> String {
        self.procedure_date
            .as_deref()
            .map(|s| s.chars().take(10).collect())
            .unwrap_or_default()
    }
}

/// Ítem en el cuerpo de creación/edición
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcedureItemInput {
    pub item_name: String,
    pub price: f64,
}

/// Cuerpo de `POST /api/v1/procedures` (y de `PUT` sin `medical_evaluation_id`)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewProcedure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_evaluation_id: Option<i64>,
    pub procedure_date: String,
    pub notes: String,
    pub items: Vec<ProcedureItemInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_usa_backend_o_suma() {
        let with_total: Procedure = serde_json::from_str(
            r#"{"id":1,"total_amount":"90000","items":[{"item_name":"A","price":1}]}"#,
        ).unwrap();
        assert_eq!(with_total.total(), 90_000.0);

        let without: Procedure = serde_json::from_str(
            r#"{"id":2,"items":[{"item_name":"A","price":"1000"},{"item_name":"B","price":500}]}"#,
        ).unwrap();
        assert_eq!(without.total(), 1500.0);
    }

    #[test]
    fn test_put_omite_evaluacion() {
        let body = NewProcedure {
            medical_evaluation_id: None,
            procedure_date: "2025-01-02".into(),
            notes: "x".into(),
            items: vec![],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("medical_evaluation_id").is_none());
    }
}
