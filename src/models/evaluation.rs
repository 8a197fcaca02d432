use serde::{Deserialize, Serialize};
use super::api::{lenient_f64, lenient_opt_f64};
use super::patient::Patient;
use super::procedure::Procedure;

/// Estado de una valoración clínica
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationStatus {
    #[serde(rename = "EN_ESPERA")]
    EnEspera,
    #[serde(rename = "CONFIRMADO")]
    Confirmado,
    #[serde(rename = "CANCELADO")]
    Cancelado,
}

impl EvaluationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationStatus::EnEspera => "En espera",
            EvaluationStatus::Confirmado => "Confirmado",
            EvaluationStatus::Cancelado => "Cancelado",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            EvaluationStatus::EnEspera => "badge badge-waiting",
            EvaluationStatus::Confirmado => "badge badge-confirmed",
            EvaluationStatus::Cancelado => "badge badge-canceled",
        }
    }
}

impl Default for EvaluationStatus {
    fn default() -> Self {
        EvaluationStatus::EnEspera
    }
}

/// Valoración clínica (listado por paciente y detalle)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalEvaluation {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub bmi_status: Option<String>,
    #[serde(default)]
    pub medical_background: String,
    #[serde(default)]
    pub referrer_name: Option<String>,
    #[serde(default)]
    pub status: EvaluationStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub patient_age_at_evaluation: Option<i64>,
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

impl MedicalEvaluation {
    pub fn created_date(&self) -> String {
        self.created_at
            .as_deref()
            .map(|s| s.chars().take(10).collect())
            .unwrap_or_default()
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == EvaluationStatus::Confirmado
    }

    /// Suma de los totales de todos los procedimientos
    pub fn procedures_total(&self) -> f64 {
        self.procedures.iter().map(|p| p.total()).sum()
    }
}

/// Cuerpo de `POST /api/v1/medical-evaluations`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewEvaluation {
    pub patient_id: i64,
    pub weight: f64,
    pub height: f64,
    pub medical_background: String,
}

/// Cuerpo de `PUT /api/v1/medical-evaluations/:id`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationUpdate {
    pub weight: f64,
    pub height: f64,
    pub medical_background: String,
}

/// `{ data: { id } }` devuelto al crear un registro
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CreatedRecord {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detalle_con_procedimientos() {
        let json = r#"{
            "id": 9, "weight": "62.5", "height": 1.65, "bmi": "22.96",
            "bmi_status": "Peso normal", "medical_background": "Ninguno",
            "status": "CONFIRMADO", "created_at": "2025-02-01T09:30:00Z",
            "procedures": [
                {"id": 1, "procedure_date": "2025-02-01", "notes": "n",
                 "items": [{"id": 1, "item_name": "Lipo", "price": "1500000.00"},
                           {"id": 2, "item_name": "Faja", "price": 200000}]}
            ]
        }"#;
        let eval: MedicalEvaluation = serde_json::from_str(json).unwrap();
        assert_eq!(eval.weight, 62.5);
        assert_eq!(eval.bmi, Some(22.96));
        assert!(eval.is_confirmed());
        assert_eq!(eval.status.label(), "Confirmado");
        assert_eq!(eval.procedures_total(), 1_700_000.0);
        assert_eq!(eval.created_date(), "2025-02-01");
    }

    #[test]
    fn test_estado_ausente_es_en_espera() {
        let eval: MedicalEvaluation = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert_eq!(eval.status, EvaluationStatus::EnEspera);
        assert_eq!(eval.status.label(), "En espera");
    }
}
