// ============================================================================
// ADMIN SERVICE - Remitentes, imágenes clínicas y estadísticas
// ============================================================================

use web_sys::{File, FormData};
use wasm_bindgen::JsValue;

use crate::error::ApiError;
use crate::models::{
    ClinicalImage, ListPayload, MonthlyIncomeRow, ProcedureIncomeRow, ReferrerStatsRow, Remitente,
    RemitenteAction, RemitenteForm, StatsSummary, WeeklyIncomeRow,
};
use crate::models::api::MaybeEnveloped;
use crate::services::api_client::{ApiClient, HttpMethod};

/// Archivos elegidos en el formulario de imágenes
pub struct ImageUpload {
    pub title: String,
    pub description: String,
    pub before_image: Option<File>,
    pub after_image: Option<File>,
}

impl ImageUpload {
    fn to_form_data(&self) -> Result<FormData, JsValue> {
        let form = FormData::new()?;
        form.append_with_str("title", &self.title)?;
        if !self.description.is_empty() {
            form.append_with_str("description", &self.description)?;
        }
        if let Some(file) = &self.before_image {
            form.append_with_blob("before_image", file)?;
        }
        if let Some(file) = &self.after_image {
            form.append_with_blob("after_image", file)?;
        }
        Ok(form)
    }
}

fn browser_error(err: JsValue) -> ApiError {
    ApiError::Browser(format!("{:?}", err))
}

impl ApiClient {
    // ------------------------------------------------------------------
    // Remitentes
    // ------------------------------------------------------------------

    pub async fn list_remitentes(&self) -> Result<Vec<Remitente>, ApiError> {
        let payload: ListPayload<Remitente> = self.get_json("/remitentes", None).await?;
        Ok(payload.into_vec())
    }

    /// `POST /api/v1/remitentes` o `PUT /api/v1/remitentes/:id`
    pub async fn save_remitente(&self, id: Option<i64>, form: &RemitenteForm) -> Result<(), ApiError> {
        match id {
            Some(id) => {
                self.send_json_ignore(HttpMethod::Put, &format!("/remitentes/{}", id), form)
                    .await
            }
            None => self.send_json_ignore(HttpMethod::Post, "/remitentes", form).await,
        }
    }

    pub async fn change_remitente_status(&self, id: i64, action: RemitenteAction) -> Result<(), ApiError> {
        let url = self.api_url(&format!("/remitentes/{}/{}", id, action.path_segment()));
        self.send_empty(HttpMethod::Patch, &url).await
    }

    // ------------------------------------------------------------------
    // Imágenes clínicas
    // ------------------------------------------------------------------

    pub async fn list_clinical_images(&self) -> Result<Vec<ClinicalImage>, ApiError> {
        let payload: ListPayload<ClinicalImage> = self.get_json("/clinical-images", None).await?;
        Ok(payload.into_vec())
    }

    /// Multipart: alta (`POST`) o edición (`PUT /:id`)
    pub async fn save_clinical_image(&self, id: Option<i64>, upload: &ImageUpload) -> Result<(), ApiError> {
        let form = upload.to_form_data().map_err(browser_error)?;
        match id {
            Some(id) => {
                self.send_form(HttpMethod::Put, &format!("/clinical-images/{}", id), form)
                    .await
            }
            None => self.send_form(HttpMethod::Post, "/clinical-images", form).await,
        }
    }

    pub async fn delete_clinical_image(&self, id: i64) -> Result<(), ApiError> {
        let url = self.api_url(&format!("/clinical-images/{}", id));
        self.send_empty(HttpMethod::Delete, &url).await
    }

    // ------------------------------------------------------------------
    // Estadísticas
    // ------------------------------------------------------------------

    pub async fn stats_summary(&self) -> Result<StatsSummary, ApiError> {
        let summary: MaybeEnveloped<StatsSummary> = self.get_json("/stats/summary", None).await?;
        Ok(summary.into_inner())
    }

    pub async fn stats_referrers(&self) -> Result<Vec<ReferrerStatsRow>, ApiError> {
        let payload: ListPayload<ReferrerStatsRow> = self.get_json("/stats/referrers", None).await?;
        Ok(payload.into_vec())
    }

    pub async fn stats_income_by_procedure(&self) -> Result<Vec<ProcedureIncomeRow>, ApiError> {
        let payload: ListPayload<ProcedureIncomeRow> =
            self.get_json("/stats/income-by-procedure", None).await?;
        Ok(payload.into_vec())
    }

    pub async fn stats_monthly_income(&self) -> Result<Vec<MonthlyIncomeRow>, ApiError> {
        let payload: ListPayload<MonthlyIncomeRow> =
            self.get_json("/stats/monthly-income", None).await?;
        Ok(payload.into_vec())
    }

    pub async fn stats_weekly_income(&self) -> Result<Vec<WeeklyIncomeRow>, ApiError> {
        let payload: ListPayload<WeeklyIncomeRow> =
            self.get_json("/stats/weekly-income", None).await?;
        Ok(payload.into_vec())
    }
}
