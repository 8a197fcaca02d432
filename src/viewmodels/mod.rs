// ============================================================================
// VIEWMODELS - Lógica de UI pura (sin DOM)
// ============================================================================

pub mod load_state;
pub mod guard;
pub mod session_viewmodel;
pub mod login_viewmodel;
pub mod wizard_viewmodel;
pub mod patients_viewmodel;
pub mod new_record_viewmodel;
pub mod patient_history_viewmodel;
pub mod record_detail_viewmodel;
pub mod remitentes_viewmodel;
pub mod clinical_images_viewmodel;
pub mod stats_viewmodel;

pub use load_state::LoadState;
pub use guard::{AuthGate, GateEffect, GateOutcome, GateView, RoleGate};
pub use session_viewmodel::SessionViewModel;
pub use login_viewmodel::LoginViewModel;
pub use wizard_viewmodel::WizardViewModel;
pub use patients_viewmodel::PatientsViewModel;
pub use new_record_viewmodel::NewRecordViewModel;
pub use patient_history_viewmodel::PatientHistoryViewModel;
pub use record_detail_viewmodel::RecordDetailViewModel;
pub use remitentes_viewmodel::RemitentesViewModel;
pub use clinical_images_viewmodel::ClinicalImagesViewModel;
pub use stats_viewmodel::StatsViewModel;
