pub mod reactivity;
pub mod session_state;
pub mod toast_state;
pub mod app_state;

pub use session_state::{SessionSnapshot, SessionState};
pub use toast_state::{ToastMessage, ToastState};
pub use app_state::{AppState, IncrementalUpdate, UpdateType};
