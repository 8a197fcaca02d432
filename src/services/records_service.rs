// ============================================================================
// RECORDS SERVICE - Paciente, valoración y procedimiento
// ============================================================================

use crate::error::ApiError;
use crate::models::{
    CreatedRecord, DataEnvelope, EvaluationStatus, EvaluationUpdate, MedicalEvaluation,
    NewEvaluation, NewPatient, NewProcedure,
};
use crate::models::api::MaybeEnveloped;
use crate::services::api_client::{ApiClient, HttpMethod};

/// Creación de registros clínicos (wizard y modal de nuevo registro)
#[allow(async_fn_in_trait)]
pub trait RecordsApi {
    /// Devuelve el id del paciente creado
    async fn create_patient(&self, patient: &NewPatient) -> Result<i64, ApiError>;
    /// Devuelve el id de la valoración creada
    async fn create_evaluation(&self, evaluation: &NewEvaluation) -> Result<i64, ApiError>;
    async fn create_procedure(&self, procedure: &NewProcedure) -> Result<(), ApiError>;
}

impl RecordsApi for ApiClient {
    async fn create_patient(&self, patient: &NewPatient) -> Result<i64, ApiError> {
        let created: DataEnvelope<CreatedRecord> =
            self.send_json(HttpMethod::Post, "/patients", patient).await?;
        Ok(created.data.id)
    }

    async fn create_evaluation(&self, evaluation: &NewEvaluation) -> Result<i64, ApiError> {
        let created: DataEnvelope<CreatedRecord> =
            self.send_json(HttpMethod::Post, "/medical-evaluations", evaluation).await?;
        Ok(created.data.id)
    }

    async fn create_procedure(&self, procedure: &NewProcedure) -> Result<(), ApiError> {
        self.send_json_ignore(HttpMethod::Post, "/procedures", procedure).await
    }
}

/// Acción de cambio de estado de una valoración
pub fn status_action(target: EvaluationStatus) -> Option<&'static str> {
    match target {
        EvaluationStatus::Confirmado => Some("confirmar"),
        EvaluationStatus::Cancelado => Some("cancelar"),
        EvaluationStatus::EnEspera => None,
    }
}

impl ApiClient {
    /// `GET /api/v1/medical-evaluations/:id` (con paciente y procedimientos)
    pub async fn get_evaluation(&self, id: i64) -> Result<MedicalEvaluation, ApiError> {
        let evaluation: MaybeEnveloped<MedicalEvaluation> =
            self.get_json(&format!("/medical-evaluations/{}", id), None).await?;
        Ok(evaluation.into_inner())
    }

    /// `PUT /api/v1/medical-evaluations/:id`
    pub async fn update_evaluation(&self, id: i64, update: &EvaluationUpdate) -> Result<(), ApiError> {
        self.send_json_ignore(HttpMethod::Put, &format!("/medical-evaluations/{}", id), update)
            .await
    }

    /// `PATCH /api/v1/medical-evaluations/:id/{confirmar|cancelar}`
    pub async fn change_evaluation_status(
        &self,
        id: i64,
        target: EvaluationStatus,
    ) -> Result<(), ApiError> {
        let action = status_action(target)
            .ok_or_else(|| ApiError::Serialization("estado no permitido".to_string()))?;
        let url = self.api_url(&format!("/medical-evaluations/{}/{}", id, action));
        self.send_empty(HttpMethod::Patch, &url).await
    }

    /// `PUT /api/v1/procedures/:id`
    pub async fn update_procedure(&self, id: i64, procedure: &NewProcedure) -> Result<(), ApiError> {
        self.send_json_ignore(HttpMethod::Put, &format!("/procedures/{}", id), procedure)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acciones_de_estado() {
        assert_eq!(status_action(EvaluationStatus::Confirmado), Some("confirmar"));
        assert_eq!(status_action(EvaluationStatus::Cancelado), Some("cancelar"));
        assert_eq!(status_action(EvaluationStatus::EnEspera), None);
    }
}
