// ============================================================================
// WIZARD VIEWMODEL - Registro de paciente en tres pasos
// ============================================================================
// Paso 0: datos del paciente · Paso 1: valoración clínica · Paso 2: procedimientos
// Los valores derivados (edad, IMC, totales, pasos completos) se calculan
// siempre desde el borrador; nunca se guardan.
// ============================================================================

use chrono::NaiveDate;

use crate::error::ApiError;
use crate::models::catalog::{CatalogProcedure, ProcedureGroup, FAJA_ID, PIERNA_ID};
use crate::models::{NewEvaluation, NewPatient, NewProcedure, ProcedureItemInput};
use crate::services::RecordsApi;
use crate::utils::clinical::{parse_measure, BmiPreview};
use crate::utils::constants::{MSG_SUBMIT_FAILED, MSG_WIZARD_INCOMPLETE};
use crate::utils::dates::age_on;
use crate::utils::format::{digits_only, format_cellphone, format_price_input, parse_price};
use crate::utils::procedure_notes::{
    apply_faja_size, apply_pierna_sides, has_faja_detail, has_pierna_detail, strip_faja_note,
    strip_pierna_note,
};

pub const STEP_COUNT: usize = 3;
pub const LAST_STEP: usize = STEP_COUNT - 1;
pub const CEDULA_MAX_LEN: usize = 15;

pub const STEP_LABELS: [&str; STEP_COUNT] = [
    "Datos del paciente",
    "Valoración clínica",
    "Procedimientos",
];

pub const SEX_OPTIONS: [&str; 3] = ["Femenino", "Masculino", "Otro"];

/// Campos de texto editables del wizard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardField {
    FirstName,
    LastName,
    DateOfBirth,
    Cellphone,
    Cedula,
    BiologicalSex,
    ReferrerName,
    Weight,
    Height,
    MedicalBackground,
    Notes,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientBasics {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    /// Tal como se muestra ("300 123 4567")
    pub cellphone: String,
    pub cedula: String,
    pub biological_sex: String,
    pub referrer_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationDraft {
    pub weight: String,
    pub height: String,
    pub medical_background: String,
}

/// Línea de procedimiento con el precio formateado para mostrar
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcedureLine {
    pub item_name: String,
    pub price: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardDraft {
    pub basics: PatientBasics,
    pub evaluation: EvaluationDraft,
    pub items: Vec<ProcedureLine>,
    pub notes: String,
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

impl WizardDraft {
    pub fn step_complete(&self, step: usize) -> bool {
        match step {
            0 => {
                let b = &self.basics;
                filled(&b.first_name)
                    && filled(&b.last_name)
                    && filled(&b.date_of_birth)
                    && filled(&b.cellphone)
                    && filled(&b.biological_sex)
            }
            1 => {
                let e = &self.evaluation;
                parse_measure(&e.weight).map_or(false, |w| w > 0.0)
                    && parse_measure(&e.height).map_or(false, |h| h > 0.0)
                    && filled(&e.medical_background)
            }
            2 => !self.items.is_empty() && filled(&self.notes),
            _ => false,
        }
    }

    pub fn bmi_preview(&self) -> Option<BmiPreview> {
        BmiPreview::from_inputs(&self.evaluation.weight, &self.evaluation.height)
    }

    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        age_on(&self.basics.date_of_birth, today)
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.items.iter().any(|item| item.item_name == label)
    }

    pub fn price_of(&self, label: &str) -> String {
        self.items
            .iter()
            .find(|item| item.item_name == label)
            .map(|item| item.price.clone())
            .unwrap_or_default()
    }

    pub fn selected_count(&self) -> usize {
        self.items.len()
    }

    /// Total en pesos de los precios capturados
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .map(|item| parse_price(&item.price))
            .fold(0, u64::saturating_add)
    }

    /// Seleccionados dentro de un grupo del catálogo
    pub fn group_count(&self, group: &ProcedureGroup) -> usize {
        group.procedures().filter(|p| self.is_selected(p.label)).count()
    }

    /// El precio de faja/pierna se habilita solo con el detalle indicado
    pub fn price_enabled(&self, procedure: &CatalogProcedure) -> bool {
        match procedure.id {
            FAJA_ID => has_faja_detail(&self.notes),
            PIERNA_ID => has_pierna_detail(&self.notes),
            _ => true,
        }
    }
}

/// Datos listos para enviar, capturados al validar
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionPlan {
    pub patient: NewPatient,
    pub weight: f64,
    pub height: f64,
    pub medical_background: String,
    pub procedure_date: String,
    pub notes: String,
    pub items: Vec<ProcedureItemInput>,
}

/// Paciente -> valoración -> procedimiento; el primer fallo corta la cadena
pub async fn run_submission<A: RecordsApi>(api: &A, plan: &SubmissionPlan) -> Result<(), ApiError> {
    let patient_id = api.create_patient(&plan.patient).await?;
    log::info!("🧾 [WIZARD] Paciente creado: {}", patient_id);

    let evaluation_id = api
        .create_evaluation(&NewEvaluation {
            patient_id,
            weight: plan.weight,
            height: plan.height,
            medical_background: plan.medical_background.clone(),
        })
        .await?;
    log::info!("🩺 [WIZARD] Valoración creada: {}", evaluation_id);

    api.create_procedure(&NewProcedure {
        medical_evaluation_id: Some(evaluation_id),
        procedure_date: plan.procedure_date.clone(),
        notes: plan.notes.clone(),
        items: plan.items.clone(),
    })
    .await?;
    log::info!("💉 [WIZARD] Procedimiento creado para valoración {}", evaluation_id);
    Ok(())
}

/// Resultado visible de un envío
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validación local fallida, no se llamó al backend
    Blocked,
    Saved,
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardViewModel {
    pub draft: WizardDraft,
    pub current_step: usize,
    pub is_submitting: bool,
    pub validation_error: Option<String>,
    pub submit_error: Option<String>,
    pub success_message: Option<String>,
}

impl WizardViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Edición
    // ------------------------------------------------------------------

    fn touched(&mut self) {
        self.submit_error = None;
        self.success_message = None;
        self.refresh_validation();
    }

    pub fn field(&self, field: WizardField) -> &str {
        let d = &self.draft;
        match field {
            WizardField::FirstName => &d.basics.first_name,
            WizardField::LastName => &d.basics.last_name,
            WizardField::DateOfBirth => &d.basics.date_of_birth,
            WizardField::Cellphone => &d.basics.cellphone,
            WizardField::Cedula => &d.basics.cedula,
            WizardField::BiologicalSex => &d.basics.biological_sex,
            WizardField::ReferrerName => &d.basics.referrer_name,
            WizardField::Weight => &d.evaluation.weight,
            WizardField::Height => &d.evaluation.height,
            WizardField::MedicalBackground => &d.evaluation.medical_background,
            WizardField::Notes => &d.notes,
        }
    }

    /// Aplica una edición; devuelve el valor normalizado que debe mostrar el input
    pub fn set_field(&mut self, field: WizardField, value: &str) -> String {
        let d = &mut self.draft;
        let normalized = match field {
            WizardField::Cellphone => format_cellphone(value),
            WizardField::Cedula => value.chars().take(CEDULA_MAX_LEN).collect(),
            _ => value.to_string(),
        };
        let slot = match field {
            WizardField::FirstName => &mut d.basics.first_name,
            WizardField::LastName => &mut d.basics.last_name,
            WizardField::DateOfBirth => &mut d.basics.date_of_birth,
            WizardField::Cellphone => &mut d.basics.cellphone,
            WizardField::Cedula => &mut d.basics.cedula,
            WizardField::BiologicalSex => &mut d.basics.biological_sex,
            WizardField::ReferrerName => &mut d.basics.referrer_name,
            WizardField::Weight => &mut d.evaluation.weight,
            WizardField::Height => &mut d.evaluation.height,
            WizardField::MedicalBackground => &mut d.evaluation.medical_background,
            WizardField::Notes => &mut d.notes,
        };
        *slot = normalized.clone();
        self.touched();
        normalized
    }

    /// Marca o desmarca un procedimiento; al desmarcar faja/pierna se quitan sus notas
    pub fn toggle_procedure(&mut self, procedure: &CatalogProcedure) {
        if self.draft.is_selected(procedure.label) {
            self.draft.items.retain(|item| item.item_name != procedure.label);
            if procedure.id == FAJA_ID {
                self.draft.notes = strip_faja_note(&self.draft.notes);
            }
            if procedure.id == PIERNA_ID {
                self.draft.notes = strip_pierna_note(&self.draft.notes);
            }
        } else {
            self.draft.items.push(ProcedureLine {
                item_name: procedure.label.to_string(),
                price: String::new(),
            });
        }
        self.touched();
    }

    pub fn set_faja_size(&mut self, size: &str) {
        self.draft.notes = apply_faja_size(&self.draft.notes, size);
        self.touched();
    }

    pub fn set_pierna_sides(&mut self, interna: bool, externa: bool) {
        self.draft.notes = apply_pierna_sides(&self.draft.notes, interna, externa);
        self.touched();
    }

    /// Solo dígitos, mostrados con separador de miles; devuelve lo que se muestra
    pub fn set_price(&mut self, label: &str, raw: &str) -> String {
        let formatted = format_price_input(raw);
        if let Some(item) = self.draft.items.iter_mut().find(|i| i.item_name == label) {
            item.price = formatted.clone();
        }
        self.touched();
        formatted
    }

    // ------------------------------------------------------------------
    // Navegación
    // ------------------------------------------------------------------

    pub fn go_to(&mut self, step: usize) {
        if step < STEP_COUNT {
            self.current_step = step;
            self.refresh_validation();
        }
    }

    pub fn next(&mut self) {
        self.go_to((self.current_step + 1).min(LAST_STEP));
    }

    pub fn previous(&mut self) {
        self.go_to(self.current_step.saturating_sub(1));
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_step > 0 && !self.is_submitting
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == LAST_STEP
    }

    /// Aviso del paso 3 visible mientras esté incompleto
    fn refresh_validation(&mut self) {
        self.validation_error = if self.current_step == LAST_STEP && !self.draft.step_complete(LAST_STEP) {
            Some(MSG_WIZARD_INCOMPLETE.to_string())
        } else {
            None
        };
    }

    // ------------------------------------------------------------------
    // Envío
    // ------------------------------------------------------------------

    /// Valida el paso 3 y arma el plan; `None` si no se debe llamar al backend
    pub fn prepare_submit(&mut self, today: NaiveDate) -> Option<SubmissionPlan> {
        if !self.is_last_step() || self.is_submitting {
            return None;
        }
        if !self.draft.step_complete(LAST_STEP) {
            self.validation_error = Some(MSG_WIZARD_INCOMPLETE.to_string());
            return None;
        }

        let d = &self.draft;
        let plan = SubmissionPlan {
            patient: NewPatient {
                first_name: d.basics.first_name.trim().to_string(),
                last_name: d.basics.last_name.trim().to_string(),
                date_of_birth: d.basics.date_of_birth.clone(),
                age: d.age(today).and_then(|a| u32::try_from(a).ok()),
                cellphone: digits_only(&d.basics.cellphone),
                cedula: d.basics.cedula.trim().to_string(),
                biological_sex: d.basics.biological_sex.clone(),
                referrer_name: d.basics.referrer_name.trim().to_string(),
            },
            weight: parse_measure(&d.evaluation.weight).unwrap_or(0.0),
            height: parse_measure(&d.evaluation.height).unwrap_or(0.0),
            medical_background: d.evaluation.medical_background.clone(),
            procedure_date: today.format("%Y-%m-%d").to_string(),
            notes: d.notes.clone(),
            items: d
                .items
                .iter()
                .map(|item| ProcedureItemInput {
                    item_name: item.item_name.clone(),
                    price: parse_price(&item.price) as f64,
                })
                .collect(),
        };

        self.is_submitting = true;
        self.submit_error = None;
        self.success_message = None;
        Some(plan)
    }

    /// Aplica el resultado del envío
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> SubmitOutcome {
        self.is_submitting = false;
        match result {
            Ok(()) => {
                *self = Self {
                    success_message: Some(crate::utils::constants::MSG_SUBMIT_OK.to_string()),
                    ..Self::default()
                };
                SubmitOutcome::Saved
            }
            Err(err) => {
                log::error!("❌ [WIZARD] Error guardando registro: {}", err);
                self.submit_error = Some(MSG_SUBMIT_FAILED.to_string());
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{find_procedure, PROCEDURE_GROUPS};
    use std::cell::{Cell, RefCell};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    /// Las tres fases como las encadena la vista
    async fn submit<A: RecordsApi>(
        vm: &RefCell<WizardViewModel>,
        api: &A,
        today: NaiveDate,
    ) -> SubmitOutcome {
        let plan = vm.borrow_mut().prepare_submit(today);
        let Some(plan) = plan else {
            return SubmitOutcome::Blocked;
        };
        let result = run_submission(api, &plan).await;
        vm.borrow_mut().finish_submit(result)
    }

    fn filled_vm() -> WizardViewModel {
        let mut vm = WizardViewModel::new();
        vm.set_field(WizardField::FirstName, "Laura");
        vm.set_field(WizardField::LastName, "Gómez");
        vm.set_field(WizardField::DateOfBirth, "1990-05-20");
        vm.set_field(WizardField::Cellphone, "3001234567");
        vm.set_field(WizardField::Cedula, "1020304050");
        vm.set_field(WizardField::BiologicalSex, "Femenino");
        vm.set_field(WizardField::ReferrerName, "Clínica Norte");
        vm.set_field(WizardField::Weight, "50");
        vm.set_field(WizardField::Height, "1.6");
        vm.set_field(WizardField::MedicalBackground, "Sin antecedentes");
        vm
    }

    #[derive(Default)]
    struct MockRecords {
        calls: RefCell<Vec<String>>,
        fail_evaluation: Cell<bool>,
        last_procedure: RefCell<Option<NewProcedure>>,
        last_patient: RefCell<Option<NewPatient>>,
    }

    impl RecordsApi for MockRecords {
        async fn create_patient(&self, patient: &NewPatient) -> Result<i64, ApiError> {
            self.calls.borrow_mut().push("patient".into());
            *self.last_patient.borrow_mut() = Some(patient.clone());
            Ok(11)
        }

        async fn create_evaluation(&self, evaluation: &NewEvaluation) -> Result<i64, ApiError> {
            self.calls.borrow_mut().push(format!("evaluation:{}", evaluation.patient_id));
            if self.fail_evaluation.get() {
                return Err(ApiError::Http { status: 500, message: None });
            }
            Ok(22)
        }

        async fn create_procedure(&self, procedure: &NewProcedure) -> Result<(), ApiError> {
            self.calls.borrow_mut().push("procedure".into());
            *self.last_procedure.borrow_mut() = Some(procedure.clone());
            Ok(())
        }
    }

    #[test]
    fn test_pasos_completos() {
        let mut vm = filled_vm();
        assert!(vm.draft.step_complete(0) && vm.draft.step_complete(1));
        assert!(!vm.draft.step_complete(2));

        vm.set_field(WizardField::Cellphone, "");
        assert!(!vm.draft.step_complete(0));

        vm.set_field(WizardField::Weight, "0");
        assert!(!vm.draft.step_complete(1));
    }

    #[test]
    fn test_imc_en_vivo() {
        let vm = filled_vm();
        let preview = vm.draft.bmi_preview().unwrap();
        assert_eq!(preview.value, 19.53);
        assert_eq!(preview.band, "Peso normal (18.5–24.9)");
        assert_eq!(vm.draft.age(today()), Some(36));
    }

    #[test]
    fn test_celular_y_cedula_normalizados() {
        let mut vm = WizardViewModel::new();
        assert_eq!(vm.set_field(WizardField::Cellphone, "300-123-4567-89"), "300 123 4567");
        let shown = vm.set_field(WizardField::Cedula, "12345678901234567890");
        assert_eq!(shown.len(), CEDULA_MAX_LEN);
    }

    #[test]
    fn test_aviso_reactivo_solo_en_paso_3() {
        let mut vm = filled_vm();
        assert!(vm.validation_error.is_none());
        vm.go_to(2);
        assert_eq!(vm.validation_error.as_deref(), Some(MSG_WIZARD_INCOMPLETE));

        let lipo = find_procedure("liposuccion").unwrap();
        vm.toggle_procedure(lipo);
        vm.set_field(WizardField::Notes, "Control en 8 días");
        assert!(vm.validation_error.is_none());

        vm.toggle_procedure(lipo);
        assert!(vm.validation_error.is_some());
        vm.previous();
        assert!(vm.validation_error.is_none());
    }

    #[test]
    fn test_navegacion() {
        let mut vm = WizardViewModel::new();
        assert!(!vm.can_go_previous());
        vm.next();
        vm.next();
        vm.next();
        assert_eq!(vm.current_step, 2);
        assert!(vm.can_go_previous());
        vm.is_submitting = true;
        assert!(!vm.can_go_previous());
        vm.go_to(7);
        assert_eq!(vm.current_step, 2);
    }

    #[test]
    fn test_faja_y_pierna_habilitan_precio() {
        let mut vm = filled_vm();
        let faja = find_procedure(FAJA_ID).unwrap();
        let pierna = find_procedure(PIERNA_ID).unwrap();
        vm.set_field(WizardField::Notes, "Observaciones");

        vm.toggle_procedure(faja);
        vm.toggle_procedure(pierna);
        assert!(!vm.draft.price_enabled(faja));
        assert!(!vm.draft.price_enabled(pierna));

        vm.set_faja_size("M");
        vm.set_pierna_sides(true, false);
        assert!(vm.draft.price_enabled(faja));
        assert!(vm.draft.price_enabled(pierna));
        assert_eq!(vm.draft.notes, "Pierna: interna\n\nFaja talla: M\n\nObservaciones");

        vm.toggle_procedure(faja);
        assert_eq!(vm.draft.notes, "Pierna: interna\n\nObservaciones");
        vm.toggle_procedure(pierna);
        assert_eq!(vm.draft.notes, "Observaciones");

        let corporales = &PROCEDURE_GROUPS[0];
        assert_eq!(vm.draft.group_count(corporales), 0);
    }

    #[test]
    fn test_precios_y_total() {
        let mut vm = filled_vm();
        let lipo = find_procedure("liposuccion").unwrap();
        let faja = find_procedure(FAJA_ID).unwrap();
        vm.toggle_procedure(lipo);
        vm.toggle_procedure(faja);
        assert_eq!(vm.set_price(lipo.label, "1500000"), "1.500.000");
        vm.set_price(faja.label, "$ 250.000");
        assert_eq!(vm.draft.price_of(faja.label), "250.000");
        assert_eq!(vm.draft.total(), 1_750_000);
        assert_eq!(vm.draft.selected_count(), 2);
        assert_eq!(vm.draft.group_count(&PROCEDURE_GROUPS[0]), 1);
    }

    #[test]
    fn test_precios_enormes_no_desbordan_el_total() {
        let mut vm = filled_vm();
        let lipo = find_procedure("liposuccion").unwrap();
        let faja = find_procedure(FAJA_ID).unwrap();
        vm.toggle_procedure(lipo);
        vm.toggle_procedure(faja);
        assert_eq!(vm.set_price(lipo.label, "999999999999999999999"), "999.999.999.999");
        vm.set_price(faja.label, "18446744073709551615");
        assert_eq!(vm.draft.total(), 999_999_999_999 + 184_467_440_737);

        vm.draft.items[0].price = u64::MAX.to_string();
        vm.draft.items[1].price = u64::MAX.to_string();
        assert_eq!(vm.draft.total(), 2 * 184_467_440_737);
    }

    #[test]
    fn test_edicion_limpia_error_de_envio() {
        let mut vm = filled_vm();
        vm.submit_error = Some(MSG_SUBMIT_FAILED.into());
        vm.set_field(WizardField::FirstName, "Lau");
        assert!(vm.submit_error.is_none());
    }

    #[tokio::test]
    async fn test_envio_bloqueado_no_llama_al_backend() {
        let mut inner = filled_vm();
        inner.go_to(2);
        let vm = RefCell::new(inner);
        let api = MockRecords::default();

        let outcome = submit(&vm, &api, today()).await;
        assert_eq!(outcome, SubmitOutcome::Blocked);
        assert!(api.calls.borrow().is_empty());
        assert_eq!(vm.borrow().validation_error.as_deref(), Some(MSG_WIZARD_INCOMPLETE));
        assert!(!vm.borrow().is_submitting);
    }

    #[tokio::test]
    async fn test_envio_fuera_del_ultimo_paso_se_ignora() {
        let vm = RefCell::new(filled_vm());
        let api = MockRecords::default();
        assert_eq!(submit(&vm, &api, today()).await, SubmitOutcome::Blocked);
        assert!(api.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_envio_secuencial_correcto() {
        let mut inner = filled_vm();
        inner.go_to(2);
        let lipo = find_procedure("liposuccion").unwrap();
        inner.toggle_procedure(lipo);
        inner.set_price(lipo.label, "1.500.000");
        inner.set_field(WizardField::Notes, "Control en 8 días");
        let vm = RefCell::new(inner);
        let api = MockRecords::default();

        assert_eq!(submit(&vm, &api, today()).await, SubmitOutcome::Saved);
        assert_eq!(*api.calls.borrow(), vec!["patient", "evaluation:11", "procedure"]);

        let procedure = api.last_procedure.borrow().clone().unwrap();
        assert_eq!(procedure.medical_evaluation_id, Some(22));
        assert_eq!(procedure.procedure_date, "2026-10-16");
        assert_eq!(procedure.items[0].price, 1_500_000.0);

        let patient = api.last_patient.borrow().clone().unwrap();
        assert_eq!(patient.cellphone, "3001234567");
        assert_eq!(patient.age, Some(36));

        let vm = vm.borrow();
        assert_eq!(vm.draft, WizardDraft::default());
        assert_eq!(vm.success_message.as_deref(), Some(crate::utils::constants::MSG_SUBMIT_OK));
    }

    #[tokio::test]
    async fn test_fallo_intermedio_corta_la_cadena() {
        let mut inner = filled_vm();
        inner.go_to(2);
        inner.toggle_procedure(find_procedure("rinoplastia").unwrap());
        inner.set_field(WizardField::Notes, "n");
        let vm = RefCell::new(inner);
        let api = MockRecords::default();
        api.fail_evaluation.set(true);

        assert_eq!(submit(&vm, &api, today()).await, SubmitOutcome::Failed);
        assert_eq!(*api.calls.borrow(), vec!["patient", "evaluation:11"]);
        let vm = vm.borrow();
        assert_eq!(vm.submit_error.as_deref(), Some(MSG_SUBMIT_FAILED));
        assert!(!vm.is_submitting);
        assert!(!vm.draft.items.is_empty());
    }
}
