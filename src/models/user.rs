use serde::{Deserialize, Serialize};

/// Rol del usuario autenticado
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "REMITENTE")]
    Remitente,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Remitente => "REMITENTE",
        }
    }
}

/// Estado de la cuenta (también el de los remitentes)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Fired,
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Activo",
            UserStatus::Inactive => "Inactivo",
            UserStatus::Fired => "Despedido",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Fired => "fired",
        }
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

/// Usuario devuelto por `/api/v1/me` y `/api/v1/login`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
}

/// Respuesta de login: `{ user: {...} }`
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializa_usuario() {
        let json = r#"{"id":3,"name":"Ana","email":"ana@x.co","role":"REMITENTE","status":"inactive"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Remitente);
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn test_estado_por_defecto_activo() {
        let json = r#"{"id":1,"name":"Root","email":"r@x.co","role":"ADMIN"}"#;
        let user: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.status.label(), "Activo");
    }
}
