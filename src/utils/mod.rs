// Utils compartidos

pub mod constants;
pub mod format;
pub mod clinical;
pub mod dates;
pub mod procedure_notes;
