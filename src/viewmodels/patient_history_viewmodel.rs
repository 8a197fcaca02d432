// ============================================================================
// PATIENT HISTORY VIEWMODEL - Ficha del paciente y sus valoraciones
// ============================================================================

use crate::error::ApiError;
use crate::models::{EvaluationStatus, MedicalEvaluation, Patient};
use crate::utils::dates::display_date;
use crate::viewmodels::load_state::LoadState;
use crate::viewmodels::new_record_viewmodel::NewRecordViewModel;

pub const MSG_PATIENT_LOAD_FAILED: &str = "Error al cargar paciente";
pub const MSG_RECORDS_LOAD_FAILED: &str = "Error al cargar registros";
pub const MSG_NO_RECORDS: &str = "Este paciente no tiene registros clínicos.";

/// Dato de la ficha; "—" cuando falta
#[derive(Clone, Debug, PartialEq)]
pub struct InfoField {
    pub label: &'static str,
    pub value: String,
}

/// Fila del historial
#[derive(Clone, Debug, PartialEq)]
pub struct RecordRow {
    pub evaluation_id: i64,
    pub date: String,
    pub referrer: String,
    pub status: EvaluationStatus,
    pub detail_path: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatientHistoryViewModel {
    pub patient_id: i64,
    pub patient: LoadState<Patient>,
    pub evaluations: LoadState<Vec<MedicalEvaluation>>,
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "—".to_string()
    } else {
        value.to_string()
    }
}

impl PatientHistoryViewModel {
    pub fn new(patient_id: i64) -> Self {
        Self {
            patient_id,
            patient: LoadState::Idle,
            evaluations: LoadState::Idle,
        }
    }

    pub fn begin_load(&mut self) {
        self.patient = LoadState::Loading;
        self.evaluations = LoadState::Loading;
    }

    pub fn apply_patient(&mut self, result: Result<Patient, ApiError>) {
        self.patient = match result {
            Ok(patient) => LoadState::Loaded(patient),
            Err(err) => {
                log::error!("❌ [HISTORY] Paciente {}: {}", self.patient_id, err);
                LoadState::Failed(MSG_PATIENT_LOAD_FAILED.to_string())
            }
        };
    }

    /// Un fallo al cargar registros deja la lista vacía (se registra en log)
    pub fn apply_evaluations(&mut self, result: Result<Vec<MedicalEvaluation>, ApiError>) {
        self.evaluations = match result {
            Ok(rows) => LoadState::Loaded(rows),
            Err(err) => {
                log::error!("❌ [HISTORY] {}: {}", MSG_RECORDS_LOAD_FAILED, err);
                LoadState::Loaded(Vec::new())
            }
        };
    }

    pub fn info_fields(&self) -> Vec<InfoField> {
        let Some(p) = self.patient.data() else {
            return Vec::new();
        };
        vec![
            InfoField { label: "Cédula", value: or_dash(&p.cedula) },
            InfoField { label: "Fecha de nacimiento", value: or_dash(&display_date(&p.birth_date())) },
            InfoField {
                label: "Sexo biológico",
                value: or_dash(p.biological_sex.as_deref().unwrap_or("")),
            },
            InfoField { label: "Celular", value: or_dash(&p.cellphone) },
        ]
    }

    pub fn records(&self) -> Vec<RecordRow> {
        self.evaluations
            .rows()
            .iter()
            .map(|e| RecordRow {
                evaluation_id: e.id,
                date: display_date(e.created_at.as_deref().unwrap_or("")),
                referrer: or_dash(e.referrer_name.as_deref().unwrap_or("")),
                status: e.status,
                detail_path: format!("/patients/{}/records/{}", self.patient_id, e.id),
            })
            .collect()
    }

    /// Modal de nuevo registro para este paciente
    pub fn new_record(&self, today_iso: &str) -> NewRecordViewModel {
        NewRecordViewModel::new(self.patient_id, today_iso)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(id: i64, status: EvaluationStatus) -> MedicalEvaluation {
        let referrer: Option<&str> = if id == 1 { None } else { Some("Dr. Pérez") };
        let status = match status {
            EvaluationStatus::EnEspera => "EN_ESPERA",
            EvaluationStatus::Confirmado => "CONFIRMADO",
            EvaluationStatus::Cancelado => "CANCELADO",
        };
        serde_json::from_value(serde_json::json!({
            "id": id,
            "referrer_name": referrer,
            "status": status,
            "created_at": "2026-10-02T08:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_filas_del_historial() {
        let mut vm = PatientHistoryViewModel::new(4);
        vm.begin_load();
        vm.apply_evaluations(Ok(vec![
            evaluation(1, EvaluationStatus::EnEspera),
            evaluation(2, EvaluationStatus::Confirmado),
        ]));
        let rows = vm.records();
        assert_eq!(rows[0].referrer, "—");
        assert_eq!(rows[1].referrer, "Dr. Pérez");
        assert_eq!(rows[1].date, "02 Oct 2026");
        assert_eq!(rows[1].detail_path, "/patients/4/records/2");
    }

    #[test]
    fn test_error_de_registros_es_lista_vacia() {
        let mut vm = PatientHistoryViewModel::new(4);
        vm.apply_evaluations(Err(ApiError::Http { status: 500, message: None }));
        assert!(vm.evaluations.is_empty());

        vm.apply_patient(Err(ApiError::Network("x".into())));
        assert_eq!(vm.patient.error(), Some(MSG_PATIENT_LOAD_FAILED));
        assert!(vm.info_fields().is_empty());
    }

    #[test]
    fn test_ficha_con_guiones() {
        let mut vm = PatientHistoryViewModel::new(4);
        let patient: Patient = serde_json::from_str(
            r#"{"id":4,"first_name":"Ana","cedula":"","cellphone":3001234567,"date_of_birth":"1990-05-20"}"#,
        )
        .unwrap();
        vm.apply_patient(Ok(patient));
        let fields = vm.info_fields();
        assert_eq!(fields[0].value, "—");
        assert_eq!(fields[1].value, "20 May 1990");
        assert_eq!(fields[2].value, "—");
        assert_eq!(fields[3].value, "3001234567");

        assert_eq!(vm.new_record("2026-10-16").patient_id, 4);
    }
}
