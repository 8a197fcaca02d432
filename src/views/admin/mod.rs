pub mod remitentes;
pub mod clinical_images;
pub mod stats;
