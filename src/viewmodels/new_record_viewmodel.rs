// ============================================================================
// NEW RECORD VIEWMODEL - Modal de nuevo registro para un paciente existente
// ============================================================================
// Paso 1: valoración clínica · Paso 2: procedimiento con ítems libres.
// Guardar crea la valoración y luego el procedimiento.
// ============================================================================

use crate::error::ApiError;
use crate::models::{NewEvaluation, NewProcedure, ProcedureItemInput};
use crate::services::RecordsApi;
use crate::state::ToastMessage;
use crate::utils::clinical::{parse_measure, BmiPreview};
use crate::utils::constants::MSG_UNEXPECTED;
use crate::utils::format::parse_decimal_price;

pub const MSG_EVALUATION_INCOMPLETE: &str = "Completa los campos de evaluación clínica";
pub const MSG_PROCEDURE_INCOMPLETE: &str = "Completa todos los campos del procedimiento";
pub const MSG_RECORD_CREATED: &str = "Registro clínico creado correctamente";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalStep {
    Evaluation,
    Procedure,
}

impl ModalStep {
    pub fn number(&self) -> u8 {
        match self {
            ModalStep::Evaluation => 1,
            ModalStep::Procedure => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModalStep::Evaluation => "Evaluación clínica",
            ModalStep::Procedure => "Procedimiento y precios",
        }
    }

    pub fn progress_percent(&self) -> u8 {
        match self {
            ModalStep::Evaluation => 50,
            ModalStep::Procedure => 100,
        }
    }
}

/// Ítem libre: nombre y precio como se escribió
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FreeItem {
    pub item_name: String,
    pub price: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    Weight,
    Height,
    MedicalBackground,
    ProcedureDate,
    Notes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewRecordViewModel {
    pub patient_id: i64,
    pub step: ModalStep,
    pub weight: String,
    pub height: String,
    pub medical_background: String,
    pub procedure_date: String,
    pub notes: String,
    pub items: Vec<FreeItem>,
    pub is_submitting: bool,
}

/// Cuerpos listos para enviar
#[derive(Clone, Debug, PartialEq)]
pub struct NewRecordPlan {
    pub evaluation: NewEvaluation,
    pub procedure_date: String,
    pub notes: String,
    pub items: Vec<ProcedureItemInput>,
}

impl NewRecordViewModel {
    /// Modal abierto con la fecha de hoy y un ítem vacío
    pub fn new(patient_id: i64, today_iso: &str) -> Self {
        Self {
            patient_id,
            step: ModalStep::Evaluation,
            weight: String::new(),
            height: String::new(),
            medical_background: String::new(),
            procedure_date: today_iso.to_string(),
            notes: String::new(),
            items: vec![FreeItem::default()],
            is_submitting: false,
        }
    }

    pub fn set_field(&mut self, field: RecordField, value: &str) {
        let slot = match field {
            RecordField::Weight => &mut self.weight,
            RecordField::Height => &mut self.height,
            RecordField::MedicalBackground => &mut self.medical_background,
            RecordField::ProcedureDate => &mut self.procedure_date,
            RecordField::Notes => &mut self.notes,
        };
        *slot = value.to_string();
    }

    pub fn bmi_preview(&self) -> Option<BmiPreview> {
        BmiPreview::from_inputs(&self.weight, &self.height)
    }

    pub fn add_item(&mut self) {
        self.items.push(FreeItem::default());
    }

    /// Siempre queda al menos un ítem
    pub fn remove_item(&mut self, index: usize) {
        if self.items.len() > 1 && index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn can_remove_items(&self) -> bool {
        self.items.len() > 1
    }

    pub fn set_item_name(&mut self, index: usize, value: &str) {
        if let Some(item) = self.items.get_mut(index) {
            item.item_name = value.to_string();
        }
    }

    pub fn set_item_price(&mut self, index: usize, value: &str) {
        if let Some(item) = self.items.get_mut(index) {
            item.price = value.to_string();
        }
    }

    fn evaluation_complete(&self) -> bool {
        parse_measure(&self.weight).map_or(false, |w| w > 0.0)
            && parse_measure(&self.height).map_or(false, |h| h > 0.0)
            && !self.medical_background.trim().is_empty()
    }

    /// Avanza al paso 2; devuelve el aviso si faltan datos
    pub fn next(&mut self) -> Result<(), ToastMessage> {
        if !self.evaluation_complete() {
            return Err(ToastMessage::error(MSG_EVALUATION_INCOMPLETE));
        }
        self.step = ModalStep::Procedure;
        Ok(())
    }

    pub fn back(&mut self) {
        self.step = ModalStep::Evaluation;
    }

    /// Valida el paso 2 y arma los cuerpos
    pub fn prepare_submit(&mut self) -> Result<NewRecordPlan, ToastMessage> {
        if self.is_submitting {
            return Err(ToastMessage::error(MSG_PROCEDURE_INCOMPLETE));
        }
        let prices: Option<Vec<f64>> = self
            .items
            .iter()
            .map(|item| {
                if item.item_name.trim().is_empty() {
                    None
                } else {
                    parse_decimal_price(&item.price)
                }
            })
            .collect();
        let prices = match prices {
            Some(prices) if !self.notes.trim().is_empty() && !self.procedure_date.is_empty() => prices,
            _ => return Err(ToastMessage::error(MSG_PROCEDURE_INCOMPLETE)),
        };

        self.is_submitting = true;
        Ok(NewRecordPlan {
            evaluation: NewEvaluation {
                patient_id: self.patient_id,
                weight: parse_measure(&self.weight).unwrap_or(0.0),
                height: parse_measure(&self.height).unwrap_or(0.0),
                medical_background: self.medical_background.clone(),
            },
            procedure_date: self.procedure_date.clone(),
            notes: self.notes.clone(),
            items: self
                .items
                .iter()
                .zip(prices)
                .map(|(item, price)| ProcedureItemInput {
                    item_name: item.item_name.trim().to_string(),
                    price,
                })
                .collect(),
        })
    }

    pub fn finish_submit(&mut self) {
        self.is_submitting = false;
    }
}

/// Valoración y luego procedimiento
pub async fn run_new_record<A: RecordsApi>(api: &A, plan: &NewRecordPlan) -> Result<(), ApiError> {
    let evaluation_id = api.create_evaluation(&plan.evaluation).await?;
    api.create_procedure(&NewProcedure {
        medical_evaluation_id: Some(evaluation_id),
        procedure_date: plan.procedure_date.clone(),
        notes: plan.notes.clone(),
        items: plan.items.clone(),
    })
    .await?;
    log::info!("🩺 [RECORDS] Registro {} creado para paciente {}", evaluation_id, plan.evaluation.patient_id);
    Ok(())
}

/// Toast del guardado: `Ok` cierra el modal y refresca el historial
pub fn submit_outcome(result: Result<(), ApiError>) -> Result<ToastMessage, ToastMessage> {
    match result {
        Ok(()) => Ok(ToastMessage::success(MSG_RECORD_CREATED)),
        Err(err) => {
            log::error!("❌ [RECORDS] Error creando registro: {}", err);
            Err(ToastMessage::from_api_error(&err, MSG_UNEXPECTED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPatient;
    use std::cell::RefCell;

    /// Mismo orden que sigue la vista del historial
    async fn submit_new_record<A: RecordsApi>(
        vm: &RefCell<NewRecordViewModel>,
        api: &A,
    ) -> Result<ToastMessage, ToastMessage> {
        let plan = vm.borrow_mut().prepare_submit()?;
        let result = run_new_record(api, &plan).await;
        vm.borrow_mut().finish_submit();
        submit_outcome(result)
    }

    #[derive(Default)]
    struct MockRecords {
        calls: RefCell<Vec<String>>,
        procedure: RefCell<Option<NewProcedure>>,
        fail_procedure: bool,
    }

    impl RecordsApi for MockRecords {
        async fn create_patient(&self, _patient: &NewPatient) -> Result<i64, ApiError> {
            self.calls.borrow_mut().push("patient".into());
            Ok(1)
        }

        async fn create_evaluation(&self, evaluation: &NewEvaluation) -> Result<i64, ApiError> {
            self.calls.borrow_mut().push(format!("evaluation:{}", evaluation.patient_id));
            Ok(90)
        }

        async fn create_procedure(&self, procedure: &NewProcedure) -> Result<(), ApiError> {
            self.calls.borrow_mut().push("procedure".into());
            *self.procedure.borrow_mut() = Some(procedure.clone());
            if self.fail_procedure {
                return Err(ApiError::Http {
                    status: 422,
                    message: Some("El precio es inválido".into()),
                });
            }
            Ok(())
        }
    }

    fn ready_vm() -> NewRecordViewModel {
        let mut vm = NewRecordViewModel::new(5, "2026-10-16");
        vm.set_field(RecordField::Weight, "70,5");
        vm.set_field(RecordField::Height, "1.65");
        vm.set_field(RecordField::MedicalBackground, "HTA controlada");
        vm.next().unwrap();
        vm.set_field(RecordField::Notes, "Sin complicaciones");
        vm.set_item_name(0, " Drenaje ");
        vm.set_item_price(0, "1.200.000,50");
        vm
    }

    #[test]
    fn test_paso_1_exige_valoracion() {
        let mut vm = NewRecordViewModel::new(5, "2026-10-16");
        vm.set_field(RecordField::Weight, "70");
        assert_eq!(vm.next(), Err(ToastMessage::error(MSG_EVALUATION_INCOMPLETE)));
        assert_eq!(vm.step, ModalStep::Evaluation);

        vm.set_field(RecordField::Height, "1.70");
        vm.set_field(RecordField::MedicalBackground, "Ninguno");
        assert!(vm.next().is_ok());
        assert_eq!(vm.step.number(), 2);
        assert_eq!(vm.bmi_preview().unwrap().display_value(), "24.22");
    }

    #[test]
    fn test_items_minimo_uno() {
        let mut vm = NewRecordViewModel::new(5, "2026-10-16");
        assert!(!vm.can_remove_items());
        vm.remove_item(0);
        assert_eq!(vm.items.len(), 1);
        vm.add_item();
        vm.remove_item(0);
        assert_eq!(vm.items.len(), 1);
    }

    #[tokio::test]
    async fn test_paso_2_incompleto_no_llama() {
        let mut inner = ready_vm();
        inner.add_item();
        let vm = RefCell::new(inner);
        let api = MockRecords::default();

        let result = submit_new_record(&vm, &api).await;
        assert_eq!(result, Err(ToastMessage::error(MSG_PROCEDURE_INCOMPLETE)));
        assert!(api.calls.borrow().is_empty());
        assert!(!vm.borrow().is_submitting);
    }

    #[tokio::test]
    async fn test_guardado_crea_valoracion_y_procedimiento() {
        let vm = RefCell::new(ready_vm());
        let api = MockRecords::default();

        let result = submit_new_record(&vm, &api).await;
        assert_eq!(result, Ok(ToastMessage::success(MSG_RECORD_CREATED)));
        assert_eq!(*api.calls.borrow(), vec!["evaluation:5", "procedure"]);

        let procedure = api.procedure.borrow().clone().unwrap();
        assert_eq!(procedure.medical_evaluation_id, Some(90));
        assert_eq!(procedure.procedure_date, "2026-10-16");
        assert_eq!(procedure.items[0].item_name, "Drenaje");
        assert_eq!(procedure.items[0].price, 1_200_000.5);
    }

    #[tokio::test]
    async fn test_error_del_servidor_en_toast() {
        let vm = RefCell::new(ready_vm());
        let api = MockRecords { fail_procedure: true, ..Default::default() };
        let result = submit_new_record(&vm, &api).await;
        assert_eq!(result, Err(ToastMessage::error("El precio es inválido")));
        assert!(!vm.borrow().is_submitting);
    }
}
