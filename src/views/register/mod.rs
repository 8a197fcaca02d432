pub mod wizard_view;
pub mod procedure_selector;

pub use wizard_view::render_wizard;
