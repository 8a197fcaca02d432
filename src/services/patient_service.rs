// ============================================================================
// PATIENT SERVICE - Pacientes y valoraciones por paciente
// ============================================================================

use web_sys::AbortSignal;

use crate::error::ApiError;
use crate::models::{ListPayload, MedicalEvaluation, Patient};
use crate::models::api::MaybeEnveloped;
use crate::services::api_client::ApiClient;

/// Query string de búsqueda (`?search=` codificado)
pub fn search_path(query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        "/patients".to_string()
    } else {
        let encoded: String = js_sys::encode_uri_component(query).into();
        format!("/patients?search={}", encoded)
    }
}

impl ApiClient {
    /// `GET /api/v1/patients?search=`
    pub async fn search_patients(
        &self,
        query: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<Patient>, ApiError> {
        let payload: ListPayload<Patient> = self.get_json(&search_path(query), signal).await?;
        Ok(payload.into_vec())
    }

    /// `GET /api/v1/patients/:id`
    pub async fn get_patient(&self, id: i64) -> Result<Patient, ApiError> {
        let patient: MaybeEnveloped<Patient> = self.get_json(&format!("/patients/{}", id), None).await?;
        Ok(patient.into_inner())
    }

    /// `GET /api/v1/medical-evaluation/patient/:id`; un 404 es historial vacío
    pub async fn patient_evaluations(&self, patient_id: i64) -> Result<Vec<MedicalEvaluation>, ApiError> {
        let path = format!("/medical-evaluation/patient/{}", patient_id);
        match self.get_json::<ListPayload<MedicalEvaluation>>(&path, None).await {
            Ok(payload) => Ok(payload.into_vec()),
            Err(err) if err.is_not_found() => {
                log::info!("📋 [PATIENTS] Paciente {} sin valoraciones", patient_id);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
