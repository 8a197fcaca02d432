// ============================================================================
// CLINICAL IMAGES VIEWMODEL - Galería antes/después
// ============================================================================
// Los `File` elegidos viven en la vista; aquí solo se sabe si hay archivo.
// ============================================================================

use crate::error::ApiError;
use crate::models::{ClinicalImage, ClinicalImageForm};
use crate::state::ToastMessage;
use crate::viewmodels::load_state::LoadState;

pub const MSG_IMAGES_LOAD_FAILED: &str = "Error al cargar las imágenes.";
pub const MSG_IMAGES_EMPTY: &str = "No hay imágenes registradas";
pub const MSG_IMAGE_REQUIRED: &str = "Por favor completa todos los campos requeridos";
pub const MSG_IMAGE_SAVE_FAILED: &str = "Error al procesar la solicitud";
pub const MSG_IMAGE_DELETE_CONFIRM: &str = "¿Seguro que deseas eliminar esta imagen?";
pub const MSG_IMAGE_DELETE_FAILED: &str = "Error al eliminar";

/// Tarjeta de la galería con URLs ya resueltas
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub before_url: String,
    pub after_url: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClinicalImagesViewModel {
    pub images: LoadState<Vec<ClinicalImage>>,
    pub show_form: bool,
    pub editing_id: Option<i64>,
    pub form: ClinicalImageForm,
    pub is_uploading: bool,
}

impl ClinicalImagesViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        if self.images.data().is_none() {
            self.images = LoadState::Loading;
        }
    }

    pub fn apply_list(&mut self, result: Result<Vec<ClinicalImage>, ApiError>) {
        self.images = match result {
            Ok(rows) => LoadState::Loaded(rows),
            Err(err) => {
                log::error!("❌ [IMAGES] {}", err);
                LoadState::Failed(MSG_IMAGES_LOAD_FAILED.to_string())
            }
        };
    }

    pub fn cards(&self, api_base_url: &str) -> Vec<GalleryCard> {
        self.images
            .rows()
            .iter()
            .map(|img| GalleryCard {
                id: img.id,
                title: img.title.clone(),
                description: img.description.clone().unwrap_or_default(),
                before_url: img.before_url(api_base_url),
                after_url: img.after_url(api_base_url),
            })
            .collect()
    }

    /// Botón "Nueva Imagen" / "Cancelar"
    pub fn toggle_form(&mut self) {
        if self.show_form {
            self.reset_form();
        } else {
            self.show_form = true;
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.show_form {
            "Cancelar"
        } else {
            "Nueva Imagen"
        }
    }

    pub fn reset_form(&mut self) {
        self.form = ClinicalImageForm::default();
        self.editing_id = None;
        self.show_form = false;
    }

    pub fn start_edit(&mut self, id: i64) {
        if let Some(img) = self.images.rows().iter().find(|i| i.id == id) {
            self.editing_id = Some(id);
            self.form = ClinicalImageForm {
                title: img.title.clone(),
                description: img.description.clone().unwrap_or_default(),
                has_before_image: false,
                has_after_image: false,
            };
            self.show_form = true;
        }
    }

    pub fn set_title(&mut self, value: &str) {
        self.form.title = value.to_string();
    }

    pub fn set_description(&mut self, value: &str) {
        self.form.description = value.to_string();
    }

    pub fn set_files(&mut self, has_before: bool, has_after: bool) {
        self.form.has_before_image = has_before;
        self.form.has_after_image = has_after;
    }

    /// Título siempre; ambos archivos solo en el alta
    pub fn validate(&self) -> Result<(), ToastMessage> {
        let missing_files = self.editing_id.is_none()
            && !(self.form.has_before_image && self.form.has_after_image);
        if self.form.title.is_empty() || missing_files {
            return Err(ToastMessage::error(MSG_IMAGE_REQUIRED));
        }
        Ok(())
    }

    pub fn begin_upload(&mut self) -> Result<Option<i64>, ToastMessage> {
        self.validate()?;
        self.is_uploading = true;
        Ok(self.editing_id)
    }

    pub fn finish_upload(&mut self, result: Result<(), ApiError>) -> ToastMessage {
        self.is_uploading = false;
        match result {
            Ok(()) => {
                let toast = if self.editing_id.is_some() {
                    ToastMessage::success("Imagen actualizada")
                } else {
                    ToastMessage::success("Imagen creada")
                };
                self.reset_form();
                toast
            }
            Err(err) => {
                log::error!("❌ [IMAGES] Error guardando imagen: {}", err);
                ToastMessage::error(MSG_IMAGE_SAVE_FAILED)
            }
        }
    }

    pub fn delete_toast(result: Result<(), ApiError>) -> ToastMessage {
        match result {
            Ok(()) => ToastMessage::success("Imagen eliminada"),
            Err(err) => {
                log::error!("❌ [IMAGES] Error eliminando imagen: {}", err);
                ToastMessage::error(MSG_IMAGE_DELETE_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: i64) -> ClinicalImage {
        ClinicalImage {
            id,
            title: "Lipo abdomen".into(),
            description: None,
            before_image: "clinical/antes.jpg".into(),
            after_image: "https://cdn.clinica.co/despues.jpg".into(),
            created_at: None,
        }
    }

    #[test]
    fn test_alta_exige_ambos_archivos() {
        let mut vm = ClinicalImagesViewModel::new();
        vm.toggle_form();
        assert_eq!(vm.toggle_label(), "Cancelar");
        vm.set_title("Rinoplastia");
        vm.set_files(true, false);
        assert_eq!(vm.begin_upload(), Err(ToastMessage::error(MSG_IMAGE_REQUIRED)));
        assert!(!vm.is_uploading);

        vm.set_files(true, true);
        assert_eq!(vm.begin_upload(), Ok(None));
        assert_eq!(vm.finish_upload(Ok(())), ToastMessage::success("Imagen creada"));
        assert!(!vm.show_form);
    }

    #[test]
    fn test_edicion_sin_archivos() {
        let mut vm = ClinicalImagesViewModel::new();
        vm.apply_list(Ok(vec![image(7)]));
        vm.start_edit(7);
        assert_eq!(vm.form.title, "Lipo abdomen");
        assert_eq!(vm.begin_upload(), Ok(Some(7)));

        let toast = vm.finish_upload(Err(ApiError::Http { status: 500, message: None }));
        assert_eq!(toast, ToastMessage::error(MSG_IMAGE_SAVE_FAILED));
        assert_eq!(vm.editing_id, Some(7));

        vm.set_title("");
        assert!(vm.validate().is_err());
    }

    #[test]
    fn test_urls_de_galeria() {
        let mut vm = ClinicalImagesViewModel::new();
        vm.apply_list(Ok(vec![image(1)]));
        let cards = vm.cards("http://localhost:8000");
        assert_eq!(cards[0].before_url, "http://localhost:8000/storage/clinical/antes.jpg");
        assert_eq!(cards[0].after_url, "https://cdn.clinica.co/despues.jpg");
    }
}
