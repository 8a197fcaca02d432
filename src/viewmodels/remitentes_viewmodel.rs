// ============================================================================
// REMITENTES VIEWMODEL - Administración de cuentas remitentes
// ============================================================================

use crate::error::ApiError;
use crate::models::{Remitente, RemitenteAction, RemitenteForm, UserStatus};
use crate::state::ToastMessage;
use crate::utils::constants::MSG_SAVE_FAILED;
use crate::viewmodels::load_state::LoadState;

pub const MSG_REMITENTES_LOAD_FAILED: &str = "Error al cargar los remitentes.";
pub const MSG_REMITENTES_EMPTY: &str = "Aún no hay remitentes";
pub const MSG_REQUIRED_FIELDS: &str = "Completa todos los campos obligatorios";
pub const MSG_PASSWORD_REQUIRED: &str = "La contraseña es obligatoria para nuevos remitentes";
pub const MSG_STATUS_FAILED: &str = "Error al cambiar estado";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemitenteField {
    Name,
    FirstName,
    LastName,
    Email,
    Cellphone,
    Password,
}

/// Contadores de la cabecera
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: usize,
    pub inactive: usize,
    pub fired: usize,
}

/// Modal de alta/edición
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemitenteEditor {
    /// `None` = alta
    pub editing_id: Option<i64>,
    pub form: RemitenteForm,
}

impl RemitenteEditor {
    pub fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Editar remitente"
        } else {
            "Nuevo remitente"
        }
    }

    pub fn password_hint(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Déjala vacía para conservar la actual"
        } else {
            "Obligatoria"
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemitentesViewModel {
    pub remitentes: LoadState<Vec<Remitente>>,
    pub editor: Option<RemitenteEditor>,
    pub is_saving: bool,
}

impl RemitentesViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        if self.remitentes.data().is_none() {
            self.remitentes = LoadState::Loading;
        }
    }

    pub fn apply_list(&mut self, result: Result<Vec<Remitente>, ApiError>) {
        self.remitentes = match result {
            Ok(rows) => LoadState::Loaded(rows),
            Err(err) => {
                log::error!("❌ [REMITENTES] {}", err);
                LoadState::Failed(MSG_REMITENTES_LOAD_FAILED.to_string())
            }
        };
    }

    pub fn counts(&self) -> StatusCounts {
        self.remitentes
            .rows()
            .iter()
            .fold(StatusCounts::default(), |mut acc, r| {
                match r.status {
                    UserStatus::Active => acc.active += 1,
                    UserStatus::Inactive => acc.inactive += 1,
                    UserStatus::Fired => acc.fired += 1,
                }
                acc
            })
    }

    pub fn open_create(&mut self) {
        self.editor = Some(RemitenteEditor::default());
    }

    pub fn open_edit(&mut self, id: i64) {
        if let Some(r) = self.remitentes.rows().iter().find(|r| r.id == id) {
            self.editor = Some(RemitenteEditor {
                editing_id: Some(id),
                form: RemitenteForm::from_remitente(r),
            });
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn set_field(&mut self, field: RemitenteField, value: &str) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let form = &mut editor.form;
        let slot = match field {
            RemitenteField::Name => &mut form.name,
            RemitenteField::FirstName => &mut form.first_name,
            RemitenteField::LastName => &mut form.last_name,
            RemitenteField::Email => &mut form.email,
            RemitenteField::Cellphone => &mut form.cellphone,
            RemitenteField::Password => &mut form.password,
        };
        *slot = value.to_string();
    }

    /// Valida y devuelve `(id, cuerpo)` para POST o PUT
    pub fn prepare_save(&mut self) -> Result<(Option<i64>, RemitenteForm), ToastMessage> {
        let Some(editor) = &self.editor else {
            return Err(ToastMessage::error(MSG_REQUIRED_FIELDS));
        };
        let f = &editor.form;
        let required = [&f.name, &f.first_name, &f.last_name, &f.email, &f.cellphone];
        if required.iter().any(|v| v.is_empty()) {
            return Err(ToastMessage::error(MSG_REQUIRED_FIELDS));
        }
        if editor.editing_id.is_none() && f.password.is_empty() {
            return Err(ToastMessage::error(MSG_PASSWORD_REQUIRED));
        }
        self.is_saving = true;
        Ok((editor.editing_id, f.clone()))
    }

    pub fn finish_save(&mut self, editing_id: Option<i64>, result: Result<(), ApiError>) -> ToastMessage {
        self.is_saving = false;
        match result {
            Ok(()) => {
                self.editor = None;
                if editing_id.is_some() {
                    ToastMessage::success("Remitente actualizado")
                } else {
                    ToastMessage::success("Remitente creado")
                }
            }
            Err(err) => ToastMessage::from_api_error(&err, MSG_SAVE_FAILED),
        }
    }

    pub fn status_toast(action: RemitenteAction, result: Result<(), ApiError>) -> ToastMessage {
        match result {
            Ok(()) => ToastMessage::success(action.success_message()),
            Err(err) => ToastMessage::from_api_error(&err, MSG_STATUS_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remitente(id: i64, status: UserStatus) -> Remitente {
        Remitente {
            id,
            name: format!("rem{}", id),
            first_name: "Carlos".into(),
            last_name: "Ríos".into(),
            email: format!("rem{}@clinica.co", id),
            cellphone: "3100000000".into(),
            status,
            created_at: None,
        }
    }

    fn loaded() -> RemitentesViewModel {
        let mut vm = RemitentesViewModel::new();
        vm.begin_load();
        vm.apply_list(Ok(vec![
            remitente(1, UserStatus::Active),
            remitente(2, UserStatus::Active),
            remitente(3, UserStatus::Inactive),
            remitente(4, UserStatus::Fired),
        ]));
        vm
    }

    #[test]
    fn test_contadores() {
        let vm = loaded();
        assert_eq!(vm.counts(), StatusCounts { active: 2, inactive: 1, fired: 1 });
    }

    #[test]
    fn test_alta_exige_password() {
        let mut vm = loaded();
        vm.open_create();
        assert_eq!(vm.prepare_save(), Err(ToastMessage::error(MSG_REQUIRED_FIELDS)));

        vm.set_field(RemitenteField::Name, "nuevo");
        vm.set_field(RemitenteField::FirstName, "Ana");
        vm.set_field(RemitenteField::LastName, "Mora");
        vm.set_field(RemitenteField::Email, "ana@clinica.co");
        vm.set_field(RemitenteField::Cellphone, "3001112233");
        assert_eq!(vm.prepare_save(), Err(ToastMessage::error(MSG_PASSWORD_REQUIRED)));

        vm.set_field(RemitenteField::Password, "secreto123");
        let (id, body) = vm.prepare_save().unwrap();
        assert_eq!(id, None);
        assert_eq!(body.password, "secreto123");
        assert_eq!(vm.finish_save(id, Ok(())), ToastMessage::success("Remitente creado"));
        assert!(vm.editor.is_none());
    }

    #[test]
    fn test_edicion_omite_password_vacio() {
        let mut vm = loaded();
        vm.open_edit(3);
        let (id, body) = vm.prepare_save().unwrap();
        assert_eq!(id, Some(3));
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["first_name"], "Carlos");

        let toast = vm.finish_save(
            id,
            Err(ApiError::Http { status: 422, message: Some("El email ya existe".into()) }),
        );
        assert_eq!(toast, ToastMessage::error("El email ya existe"));
        assert!(vm.editor.is_some());
        assert!(!vm.is_saving);
    }

    #[test]
    fn test_toast_de_estado() {
        let ok = RemitentesViewModel::status_toast(RemitenteAction::Despedir, Ok(()));
        assert_eq!(ok, ToastMessage::success("Remitente despedir correctamente"));
        let err = RemitentesViewModel::status_toast(
            RemitenteAction::Activar,
            Err(ApiError::Http { status: 500, message: None }),
        );
        assert_eq!(err, ToastMessage::error(MSG_STATUS_FAILED));
    }
}
