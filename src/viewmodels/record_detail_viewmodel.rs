// ============================================================================
// RECORD DETAIL VIEWMODEL - Valoración, estado y edición de procedimientos
// ============================================================================

use crate::error::ApiError;
use crate::models::{EvaluationStatus, EvaluationUpdate, MedicalEvaluation, NewProcedure, Procedure, ProcedureItemInput};
use crate::state::ToastMessage;
use crate::utils::clinical::{parse_measure, BmiPreview};
use crate::utils::constants::MSG_SAVE_FAILED;
use crate::utils::format::{format_number, plain_number};
use crate::viewmodels::load_state::LoadState;
use crate::viewmodels::new_record_viewmodel::FreeItem;

pub const MSG_DETAIL_LOAD_FAILED: &str = "Error al cargar datos del paciente.";
pub const MSG_STATUS_FAILED: &str = "Error al cambiar estado";
pub const MSG_EVAL_INCOMPLETE: &str = "Completa todos los campos";
pub const MSG_EVAL_UPDATED: &str = "Evaluacion actualizada";
pub const MSG_PROC_INCOMPLETE: &str = "Completa la fecha y al menos un item";
pub const MSG_PROC_UPDATED: &str = "Procedimiento actualizado";

/// Precio escrito a número; inválido cuenta como 0
fn loose_price(raw: &str) -> f64 {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationForm {
    pub weight: String,
    pub height: String,
    pub medical_background: String,
}

impl EvaluationForm {
    pub fn bmi_preview(&self) -> Option<BmiPreview> {
        BmiPreview::from_inputs(&self.weight, &self.height)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcedureForm {
    pub procedure_id: i64,
    pub procedure_date: String,
    pub notes: String,
    pub items: Vec<FreeItem>,
}

impl ProcedureForm {
    fn from_procedure(proc: &Procedure) -> Self {
        Self {
            procedure_id: proc.id,
            procedure_date: proc.date(),
            notes: proc.notes.clone().unwrap_or_default(),
            items: proc
                .items
                .iter()
                .map(|item| FreeItem {
                    item_name: item.item_name.clone(),
                    price: plain_number(item.price),
                })
                .collect(),
        }
    }

    /// Total en vivo mientras se edita
    pub fn live_total(&self) -> f64 {
        self.items.iter().map(|i| loose_price(&i.price)).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordDetailViewModel {
    pub patient_id: i64,
    pub evaluation_id: i64,
    pub evaluation: LoadState<MedicalEvaluation>,
    pub is_changing_status: bool,
    pub eval_form: Option<EvaluationForm>,
    pub is_saving_eval: bool,
    pub proc_form: Option<ProcedureForm>,
    pub is_saving_proc: bool,
}

impl RecordDetailViewModel {
    pub fn new(patient_id: i64, evaluation_id: i64) -> Self {
        Self {
            patient_id,
            evaluation_id,
            evaluation: LoadState::Idle,
            is_changing_status: false,
            eval_form: None,
            is_saving_eval: false,
            proc_form: None,
            is_saving_proc: false,
        }
    }

    pub fn begin_load(&mut self) {
        // Un refresco conserva los datos ya mostrados
        if self.evaluation.data().is_none() {
            self.evaluation = LoadState::Loading;
        }
    }

    pub fn apply_evaluation(&mut self, result: Result<MedicalEvaluation, ApiError>) {
        self.evaluation = match result {
            Ok(evaluation) => LoadState::Loaded(evaluation),
            Err(err) => {
                log::error!("❌ [RECORD] Valoración {}: {}", self.evaluation_id, err);
                LoadState::Failed(MSG_DETAIL_LOAD_FAILED.to_string())
            }
        };
    }

    pub fn status(&self) -> EvaluationStatus {
        self.evaluation.data().map(|e| e.status).unwrap_or_default()
    }

    pub fn can_confirm(&self) -> bool {
        self.status() != EvaluationStatus::Confirmado
    }

    pub fn can_cancel(&self) -> bool {
        self.status() != EvaluationStatus::Cancelado
    }

    /// La valoración confirmada ya no se edita
    pub fn can_edit_evaluation(&self) -> bool {
        self.evaluation.data().map_or(false, |e| !e.is_confirmed())
    }

    pub fn total_label(&self) -> String {
        let total = self.evaluation.data().map_or(0.0, |e| e.procedures_total());
        format!("${}", format_number(total))
    }

    // ------------------------------------------------------------------
    // Estado
    // ------------------------------------------------------------------

    pub fn begin_status_change(&mut self, target: EvaluationStatus) -> bool {
        let allowed = match target {
            EvaluationStatus::Confirmado => self.can_confirm(),
            EvaluationStatus::Cancelado => self.can_cancel(),
            EvaluationStatus::EnEspera => false,
        };
        if !allowed || self.is_changing_status {
            return false;
        }
        self.is_changing_status = true;
        true
    }

    pub fn finish_status_change(&mut self, target: EvaluationStatus, result: Result<(), ApiError>) -> ToastMessage {
        self.is_changing_status = false;
        match result {
            Ok(()) if target == EvaluationStatus::Confirmado => ToastMessage::success("Valoracion confirmada"),
            Ok(()) => ToastMessage::success("Valoracion cancelada"),
            Err(err) => ToastMessage::from_api_error(&err, MSG_STATUS_FAILED),
        }
    }

    // ------------------------------------------------------------------
    // Edición de la valoración
    // ------------------------------------------------------------------

    pub fn open_eval_edit(&mut self) {
        if let Some(e) = self.evaluation.data() {
            self.eval_form = Some(EvaluationForm {
                weight: plain_number(e.weight),
                height: plain_number(e.height),
                medical_background: e.medical_background.clone(),
            });
        }
    }

    pub fn close_eval_edit(&mut self) {
        self.eval_form = None;
    }

    pub fn prepare_eval_save(&mut self) -> Result<EvaluationUpdate, ToastMessage> {
        let Some(form) = &self.eval_form else {
            return Err(ToastMessage::error(MSG_EVAL_INCOMPLETE));
        };
        if form.weight.trim().is_empty() || form.height.trim().is_empty() || form.medical_background.is_empty() {
            return Err(ToastMessage::error(MSG_EVAL_INCOMPLETE));
        }
        let update = EvaluationUpdate {
            weight: parse_measure(&form.weight).unwrap_or(0.0),
            height: parse_measure(&form.height).unwrap_or(0.0),
            medical_background: form.medical_background.clone(),
        };
        self.is_saving_eval = true;
        Ok(update)
    }

    pub fn finish_eval_save(&mut self, result: Result<(), ApiError>) -> ToastMessage {
        self.is_saving_eval = false;
        match result {
            Ok(()) => {
                self.eval_form = None;
                ToastMessage::success(MSG_EVAL_UPDATED)
            }
            Err(err) => ToastMessage::from_api_error(&err, MSG_SAVE_FAILED),
        }
    }

    // ------------------------------------------------------------------
    // Edición de procedimientos
    // ------------------------------------------------------------------

    pub fn open_proc_edit(&mut self, procedure_id: i64) {
        let found = self
            .evaluation
            .data()
            .and_then(|e| e.procedures.iter().find(|p| p.id == procedure_id));
        if let Some(proc) = found {
            self.proc_form = Some(ProcedureForm::from_procedure(proc));
        }
    }

    pub fn close_proc_edit(&mut self) {
        self.proc_form = None;
    }

    pub fn proc_form_mut(&mut self) -> Option<&mut ProcedureForm> {
        self.proc_form.as_mut()
    }

    /// Devuelve el id del procedimiento y el cuerpo del PUT
    pub fn prepare_proc_save(&mut self) -> Result<(i64, NewProcedure), ToastMessage> {
        let Some(form) = &self.proc_form else {
            return Err(ToastMessage::error(MSG_PROC_INCOMPLETE));
        };
        if form.procedure_date.is_empty() || form.items.is_empty() {
            return Err(ToastMessage::error(MSG_PROC_INCOMPLETE));
        }
        let body = NewProcedure {
            medical_evaluation_id: None,
            procedure_date: form.procedure_date.clone(),
            notes: form.notes.clone(),
            items: form
                .items
                .iter()
                .map(|item| ProcedureItemInput {
                    item_name: item.item_name.clone(),
                    price: loose_price(&item.price),
                })
                .collect(),
        };
        self.is_saving_proc = true;
        Ok((form.procedure_id, body))
    }

    pub fn finish_proc_save(&mut self, result: Result<(), ApiError>) -> ToastMessage {
        self.is_saving_proc = false;
        match result {
            Ok(()) => {
                self.proc_form = None;
                ToastMessage::success(MSG_PROC_UPDATED)
            }
            Err(err) => ToastMessage::from_api_error(&err, MSG_SAVE_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(status: &str) -> RecordDetailViewModel {
        let evaluation: MedicalEvaluation = serde_json::from_value(serde_json::json!({
            "id": 9,
            "weight": "62.5",
            "height": 1.65,
            "medical_background": "Ninguno",
            "status": status,
            "procedures": [{
                "id": 3,
                "procedure_date": "2026-10-01T00:00:00Z",
                "notes": "Control",
                "total_amount": "1700000",
                "items": [
                    {"id": 1, "item_name": "Lipo", "price": "1500000.00"},
                    {"id": 2, "item_name": "Faja", "price": 200000}
                ]
            }]
        }))
        .unwrap();
        let mut vm = RecordDetailViewModel::new(4, 9);
        vm.begin_load();
        vm.apply_evaluation(Ok(evaluation));
        vm
    }

    #[test]
    fn test_acciones_segun_estado() {
        let vm = loaded("EN_ESPERA");
        assert!(vm.can_confirm() && vm.can_cancel() && vm.can_edit_evaluation());
        assert_eq!(vm.total_label(), "$1.700.000");

        let vm = loaded("CONFIRMADO");
        assert!(!vm.can_confirm());
        assert!(vm.can_cancel());
        assert!(!vm.can_edit_evaluation());

        let mut vm = loaded("CANCELADO");
        assert!(!vm.can_cancel());
        assert!(!vm.begin_status_change(EvaluationStatus::Cancelado));
        assert!(vm.begin_status_change(EvaluationStatus::Confirmado));
        assert!(!vm.begin_status_change(EvaluationStatus::Confirmado));
        let toast = vm.finish_status_change(EvaluationStatus::Confirmado, Ok(()));
        assert_eq!(toast, ToastMessage::success("Valoracion confirmada"));
        assert!(!vm.is_changing_status);
    }

    #[test]
    fn test_error_de_estado() {
        let mut vm = loaded("EN_ESPERA");
        vm.begin_status_change(EvaluationStatus::Cancelado);
        let toast = vm.finish_status_change(
            EvaluationStatus::Cancelado,
            Err(ApiError::Http { status: 409, message: None }),
        );
        assert_eq!(toast, ToastMessage::error(MSG_STATUS_FAILED));
    }

    #[test]
    fn test_editar_valoracion() {
        let mut vm = loaded("EN_ESPERA");
        vm.open_eval_edit();
        let form = vm.eval_form.as_ref().unwrap();
        assert_eq!(form.weight, "62.5");
        assert_eq!(form.bmi_preview().unwrap().display_value(), "22.96");

        vm.eval_form.as_mut().unwrap().medical_background.clear();
        assert_eq!(vm.prepare_eval_save(), Err(ToastMessage::error(MSG_EVAL_INCOMPLETE)));
        assert!(!vm.is_saving_eval);

        vm.eval_form.as_mut().unwrap().medical_background = "Alergia".into();
        let update = vm.prepare_eval_save().unwrap();
        assert_eq!(update.weight, 62.5);
        assert!(vm.is_saving_eval);
        assert_eq!(vm.finish_eval_save(Ok(())), ToastMessage::success(MSG_EVAL_UPDATED));
        assert!(vm.eval_form.is_none());
    }

    #[test]
    fn test_editar_procedimiento() {
        let mut vm = loaded("EN_ESPERA");
        vm.open_proc_edit(3);
        {
            let form = vm.proc_form_mut().unwrap();
            assert_eq!(form.procedure_date, "2026-10-01");
            assert_eq!(form.items[0].price, "1500000");
            form.items.push(FreeItem { item_name: "Drenaje".into(), price: "abc".into() });
            assert_eq!(form.live_total(), 1_700_000.0);
        }
        let (id, body) = vm.prepare_proc_save().unwrap();
        assert_eq!(id, 3);
        assert_eq!(body.medical_evaluation_id, None);
        assert_eq!(body.items[2].price, 0.0);

        let toast = vm.finish_proc_save(Err(ApiError::Http { status: 500, message: None }));
        assert_eq!(toast, ToastMessage::error(MSG_SAVE_FAILED));
        assert!(vm.proc_form.is_some());

        vm.proc_form_mut().unwrap().items.clear();
        assert_eq!(vm.prepare_proc_save(), Err(ToastMessage::error(MSG_PROC_INCOMPLETE)));
    }

    #[test]
    fn test_error_de_carga() {
        let mut vm = RecordDetailViewModel::new(4, 9);
        vm.begin_load();
        assert!(vm.evaluation.is_loading());
        vm.apply_evaluation(Err(ApiError::Http { status: 404, message: None }));
        assert_eq!(vm.evaluation.error(), Some(MSG_DETAIL_LOAD_FAILED));
        assert!(!vm.can_edit_evaluation());
    }
}
