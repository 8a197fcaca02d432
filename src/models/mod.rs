pub mod api;
pub mod user;
pub mod patient;
pub mod evaluation;
pub mod procedure;
pub mod clinical_image;
pub mod remitente;
pub mod stats;
pub mod catalog;

pub use api::{ListPayload, DataEnvelope};
pub use user::{SessionUser, Role, UserStatus, LoginResponse};
pub use patient::{Patient, NewPatient};
pub use evaluation::{MedicalEvaluation, EvaluationStatus, NewEvaluation, EvaluationUpdate, CreatedRecord};
pub use procedure::{Procedure, NewProcedure, ProcedureItemInput};
pub use clinical_image::{ClinicalImage, ClinicalImageForm};
pub use remitente::{Remitente, RemitenteAction, RemitenteForm};
pub use stats::{StatsSummary, ReferrerStatsRow, ProcedureIncomeRow, MonthlyIncomeRow, WeeklyIncomeRow};
