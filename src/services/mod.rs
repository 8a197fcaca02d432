pub mod api_client;
pub mod csrf;
pub mod inflight;
pub mod auth_service;
pub mod patient_service;
pub mod records_service;
pub mod admin_service;

pub use api_client::ApiClient;
pub use auth_service::SessionApi;
pub use records_service::RecordsApi;
pub use admin_service::ImageUpload;
pub use inflight::InFlightGuard;
