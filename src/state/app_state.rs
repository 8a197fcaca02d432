// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// La sesión es lo único compartido entre páginas. Los viewmodels de cada
// página viven aquí pero se reinician al cambiar de ruta.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::router::{Route, ADMIN_ONLY};
use crate::state::{SessionState, ToastState};
use crate::viewmodels::{
    AuthGate, ClinicalImagesViewModel, LoginViewModel, NewRecordViewModel, PatientHistoryViewModel,
    PatientsViewModel, RecordDetailViewModel, RemitentesViewModel, RoleGate, StatsViewModel,
    WizardViewModel,
};

/// Tipo de actualización del DOM
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateType {
    /// Actualización incremental (solo elementos específicos)
    Incremental(IncrementalUpdate),
    /// Re-render completo (cambio de ruta, sesión, modales)
    FullRender,
}

/// Zonas que se actualizan sin reconstruir la página
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementalUpdate {
    /// Contenedor de toasts
    Toasts,
    /// Valores derivados del wizard (IMC, edad, pasos, totales, avisos)
    Wizard,
    /// Tabla y contador de pacientes
    PatientsResults,
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub toasts: ToastState,
    pub route: Rc<RefCell<Route>>,

    // Guardas (recuerdan si ya avisaron en esta ruta)
    pub auth_gate: Rc<RefCell<AuthGate>>,
    pub role_gate: Rc<RefCell<RoleGate>>,

    // ViewModels por página
    pub login: Rc<RefCell<LoginViewModel>>,
    pub wizard: Rc<RefCell<WizardViewModel>>,
    pub patients: Rc<RefCell<PatientsViewModel>>,
    pub history: Rc<RefCell<Option<PatientHistoryViewModel>>>,
    pub new_record: Rc<RefCell<Option<NewRecordViewModel>>>,
    pub record: Rc<RefCell<Option<RecordDetailViewModel>>>,
    pub remitentes: Rc<RefCell<RemitentesViewModel>>,
    pub images: Rc<RefCell<ClinicalImagesViewModel>>,
    pub stats: Rc<RefCell<StatsViewModel>>,

    // Reactividad: callbacks para notificar cambios
    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new(initial_route: Route) -> Self {
        let state = Self {
            session: SessionState::new(),
            toasts: ToastState::new(),
            route: Rc::new(RefCell::new(initial_route.clone())),

            auth_gate: Rc::new(RefCell::new(AuthGate::new())),
            role_gate: Rc::new(RefCell::new(RoleGate::new(
                ADMIN_ONLY,
                CONFIG.default_authenticated_route.clone(),
            ))),

            login: Rc::new(RefCell::new(LoginViewModel::new())),
            wizard: Rc::new(RefCell::new(WizardViewModel::new())),
            patients: Rc::new(RefCell::new(PatientsViewModel::new())),
            history: Rc::new(RefCell::new(None)),
            new_record: Rc::new(RefCell::new(None)),
            record: Rc::new(RefCell::new(None)),
            remitentes: Rc::new(RefCell::new(RemitentesViewModel::new())),
            images: Rc::new(RefCell::new(ClinicalImagesViewModel::new())),
            stats: Rc::new(RefCell::new(StatsViewModel::new())),

            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        };
        state.reset_pages(&initial_route);
        state
    }

    pub fn current_route(&self) -> Route {
        self.route.borrow().clone()
    }

    /// Cambia de ruta; `true` si realmente cambió.
    /// Las guardas vuelven a poder avisar y las páginas arrancan limpias.
    pub fn enter_route(&self, route: Route) -> bool {
        if *self.route.borrow() == route {
            return false;
        }
        log::info!("🧭 [STATE] {:?} -> {:?}", self.route.borrow(), route);

        self.auth_gate.borrow_mut().reset();
        self.role_gate.borrow_mut().reset();

        self.reset_pages(&route);
        *self.route.borrow_mut() = route;
        true
    }

    /// Viewmodels limpios para la ruta indicada
    fn reset_pages(&self, route: &Route) {
        *self.login.borrow_mut() = LoginViewModel::new();
        *self.wizard.borrow_mut() = WizardViewModel::new();
        let patients = self.patients.borrow().reopened();
        *self.patients.borrow_mut() = patients;
        *self.new_record.borrow_mut() = None;
        *self.remitentes.borrow_mut() = RemitentesViewModel::new();
        *self.images.borrow_mut() = ClinicalImagesViewModel::new();
        *self.stats.borrow_mut() = StatsViewModel::new();

        *self.history.borrow_mut() = match route {
            Route::PatientHistory { patient_id } => Some(PatientHistoryViewModel::new(*patient_id)),
            _ => None,
        };
        *self.record.borrow_mut() = match route {
            Route::RecordDetail { patient_id, evaluation_id } => {
                Some(RecordDetailViewModel::new(*patient_id, *evaluation_id))
            }
            _ => None,
        };
    }

    /// Suscribirse a cambios de estado
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().iter().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodels::wizard_viewmodel::WizardField;
    use std::cell::Cell;

    #[test]
    fn test_cambio_de_ruta_reinicia_paginas() {
        let state = AppState::new(Route::RegisterPatient);
        state.wizard.borrow_mut().set_field(WizardField::FirstName, "Ana");
        state.patients.borrow_mut().set_query("ana");

        assert!(!state.enter_route(Route::RegisterPatient));
        assert_eq!(state.wizard.borrow().draft.basics.first_name, "Ana");

        assert!(state.enter_route(Route::PatientHistory { patient_id: 8 }));
        assert!(state.wizard.borrow().draft.basics.first_name.is_empty());
        assert!(state.patients.borrow().query.is_empty());
        assert_eq!(state.history.borrow().as_ref().map(|h| h.patient_id), Some(8));
        assert!(state.record.borrow().is_none());

        state.enter_route(Route::RecordDetail { patient_id: 8, evaluation_id: 3 });
        assert!(state.history.borrow().is_none());
        assert_eq!(state.record.borrow().as_ref().map(|r| r.evaluation_id), Some(3));
    }

    #[test]
    fn test_salir_de_pacientes_descarta_busqueda_pendiente() {
        let state = AppState::new(Route::Patients);
        let pending = state.patients.borrow_mut().set_query("ana");

        assert!(state.enter_route(Route::Stats));
        assert!(!state.patients.borrow_mut().begin_load(pending));
        assert!(!state.patients.borrow().is_current(pending));
    }

    #[test]
    fn test_subscribers() {
        let state = AppState::new(Route::Home);
        let hits = Rc::new(Cell::new(0));
        let hits_cb = hits.clone();
        state.subscribe_to_changes(move || hits_cb.set(hits_cb.get() + 1));
        state.clone().notify_subscribers();
        assert_eq!(hits.get(), 1);
    }
}
