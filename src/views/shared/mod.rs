pub mod form;
pub mod header;
pub mod toast;

pub use form::*;
pub use header::render_header;
pub use toast::{render_toast_container, show_toast};
