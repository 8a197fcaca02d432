use serde::{Deserialize, Serialize};
use super::api::lenient_string;
use super::user::UserStatus;

/// Cuenta de remitente administrada desde `/admin/remitentes`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Remitente {
    pub id: i64,
    /// Nombre de usuario (se muestra como `@name`)
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cellphone: String,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Remitente {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Acciones de estado disponibles para este remitente
    pub fn available_actions(&self) -> Vec<RemitenteAction> {
        let mut actions = Vec::new();
        if self.status != UserStatus::Active {
            actions.push(RemitenteAction::Activar);
        }
        if self.status == UserStatus::Active {
            actions.push(RemitenteAction::Inactivar);
        }
        if self.status != UserStatus::Fired {
            actions.push(RemitenteAction::Despedir);
        }
        actions
    }
}

/// `PATCH /api/v1/remitentes/:id/{accion}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemitenteAction {
    Activar,
    Inactivar,
    Despedir,
}

impl RemitenteAction {
    pub fn path_segment(&self) -> &'static str {
        match self {
            RemitenteAction::Activar => "activar",
            RemitenteAction::Inactivar => "inactivar",
            RemitenteAction::Despedir => "despedir",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RemitenteAction::Activar => "Activar",
            RemitenteAction::Inactivar => "Inactivar",
            RemitenteAction::Despedir => "Despedir",
        }
    }

    pub fn confirm_message(&self) -> String {
        format!("¿Seguro que deseas {} a este remitente?", self.label().to_lowercase())
    }

    pub fn success_message(&self) -> String {
        format!("Remitente {} correctamente", self.label().to_lowercase())
    }
}

/// Formulario de alta/edición; `password` vacío no se envía
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RemitenteForm {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cellphone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl RemitenteForm {
    pub fn from_remitente(r: &Remitente) -> Self {
        Self {
            name: r.name.clone(),
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            email: r.email.clone(),
            cellphone: r.cellphone.clone(),
            password: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remitente(status: UserStatus) -> Remitente {
        Remitente {
            id: 1,
            name: "clinica_norte".into(),
            first_name: "Sara".into(),
            last_name: "Ríos".into(),
            email: "s@x.co".into(),
            cellphone: "3000000000".into(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_acciones_segun_estado() {
        use RemitenteAction::*;
        assert_eq!(remitente(UserStatus::Active).available_actions(), vec![Inactivar, Despedir]);
        assert_eq!(remitente(UserStatus::Inactive).available_actions(), vec![Activar, Despedir]);
        assert_eq!(remitente(UserStatus::Fired).available_actions(), vec![Activar]);
    }

    #[test]
    fn test_mensajes_de_accion() {
        assert_eq!(
            RemitenteAction::Despedir.confirm_message(),
            "¿Seguro que deseas despedir a este remitente?"
        );
        assert_eq!(RemitenteAction::Activar.success_message(), "Remitente activar correctamente");
    }

    #[test]
    fn test_password_vacio_no_se_envia() {
        let form = RemitenteForm::from_remitente(&remitente(UserStatus::Active));
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["name"], "clinica_norte");
    }
}
