// ============================================================================
// PATIENTS VIEWMODEL - Listado con búsqueda
// ============================================================================
// Cada cambio de búsqueda abre una generación nueva. Solo la respuesta de la
// generación vigente se aplica; las anteriores se descartan aunque lleguen
// tarde (además la vista aborta su fetch).
// ============================================================================

use crate::error::ApiError;
use crate::models::Patient;
use crate::utils::constants::{MSG_PATIENTS_LOAD_FAILED, MSG_PATIENTS_NETWORK};
use crate::viewmodels::load_state::LoadState;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientsViewModel {
    pub query: String,
    pub state: LoadState<Vec<Patient>>,
    generation: u64,
}

/// Fila lista para pintar
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRow {
    pub id: i64,
    pub name: String,
    pub cedula: String,
    pub cellphone: String,
    pub created: String,
}

impl PatientsViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Página limpia que sigue la numeración de generaciones, así las
    /// respuestas de la visita anterior ya no son vigentes
    pub fn reopened(&self) -> Self {
        Self { generation: self.generation + 1, ..Self::default() }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Nuevo texto de búsqueda; devuelve la generación que debe cargarse
    pub fn set_query(&mut self, query: &str) -> u64 {
        self.query = query.to_string();
        self.generation += 1;
        self.generation
    }

    /// Query normalizada que se envía
    pub fn effective_query(&self) -> &str {
        self.query.trim()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Marca la carga como iniciada si la generación sigue vigente
    pub fn begin_load(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Aplica una respuesta; `false` si se descartó
    pub fn apply_result(&mut self, generation: u64, result: Result<Vec<Patient>, ApiError>) -> bool {
        if !self.is_current(generation) {
            log::debug!("🔎 [PATIENTS] Respuesta descartada (gen {} != {})", generation, self.generation);
            return false;
        }
        self.state = match result {
            Ok(rows) => LoadState::Loaded(rows),
            Err(err) if err.is_aborted() => return false,
            // Cuerpo ilegible: se trata como listado vacío
            Err(ApiError::Parse(_)) => LoadState::Loaded(Vec::new()),
            Err(ApiError::Http { .. }) => LoadState::Failed(MSG_PATIENTS_LOAD_FAILED.to_string()),
            Err(_) => LoadState::Failed(MSG_PATIENTS_NETWORK.to_string()),
        };
        true
    }

    pub fn count_label(&self) -> String {
        if self.state.is_loading() {
            "Cargando...".to_string()
        } else {
            format!("{} resultado(s)", self.state.rows().len())
        }
    }

    pub fn rows(&self) -> Vec<PatientRow> {
        self.state
            .rows()
            .iter()
            .map(|p| PatientRow {
                id: p.id,
                name: p.full_name(),
                cedula: p.cedula.clone(),
                cellphone: p.cellphone.clone(),
                created: p.created_date(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: i64, first: Option<&str>) -> Patient {
        Patient {
            id,
            first_name: first.map(String::from),
            last_name: None,
            cedula: "123".into(),
            cellphone: "3001234567".into(),
            date_of_birth: None,
            biological_sex: None,
            referrer_name: None,
            created_at: Some("2026-09-01T10:00:00.000000Z".into()),
        }
    }

    #[test]
    fn test_respuesta_vieja_se_descarta() {
        let mut vm = PatientsViewModel::new();
        let first = vm.set_query("ana");
        assert!(vm.begin_load(first));
        let second = vm.set_query("ana m");
        assert!(vm.begin_load(second));

        assert!(!vm.apply_result(first, Ok(vec![patient(1, Some("Ana"))])));
        assert!(vm.state.is_loading());

        assert!(vm.apply_result(second, Ok(vec![patient(2, None)])));
        let rows = vm.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "(sin nombre)");
        assert_eq!(rows[0].created, "2026-09-01");
        assert_eq!(vm.count_label(), "1 resultado(s)");
    }

    #[test]
    fn test_reabrir_invalida_generaciones_previas() {
        let mut vm = PatientsViewModel::new();
        let pending = vm.set_query("ana");
        let mut fresh = vm.reopened();
        assert!(fresh.query.is_empty());
        assert!(fresh.state.is_idle());
        assert!(!fresh.begin_load(pending));
        assert!(!fresh.apply_result(pending, Ok(vec![patient(1, Some("Ana"))])));
        assert!(fresh.state.is_idle());
        assert!(fresh.begin_load(fresh.generation()));
    }

    #[test]
    fn test_errores() {
        let mut vm = PatientsViewModel::new();
        let gen = vm.set_query("");
        vm.begin_load(gen);
        assert_eq!(vm.count_label(), "Cargando...");

        assert!(!vm.apply_result(gen, Err(ApiError::Aborted)));
        vm.apply_result(gen, Err(ApiError::Http { status: 500, message: None }));
        assert_eq!(vm.state.error(), Some(MSG_PATIENTS_LOAD_FAILED));

        vm.apply_result(gen, Err(ApiError::Network("offline".into())));
        assert_eq!(vm.state.error(), Some(MSG_PATIENTS_NETWORK));

        vm.apply_result(gen, Err(ApiError::Parse("x".into())));
        assert!(vm.state.is_empty());
    }

    #[test]
    fn test_query_normalizada() {
        let mut vm = PatientsViewModel::new();
        vm.set_query("  300 ");
        assert_eq!(vm.effective_query(), "300");
    }
}
