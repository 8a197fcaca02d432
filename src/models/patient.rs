use serde::{Deserialize, Serialize};
use super::api::lenient_string;

/// Paciente tal como lo devuelve el backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cedula: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cellphone: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub biological_sex: Option<String>,
    #[serde(default)]
    pub referrer_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Patient {
    /// "Nombre Apellido", o "(sin nombre)" si ambos faltan
    pub fn full_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            "(sin nombre)".to_string()
        } else {
            name
        }
    }

    /// Fecha de creación en formato YYYY-MM-DD
    pub fn created_date(&self) -> String {
        self.created_at
            .as_deref()
            .map(|s| s.chars().take(10).collect())
            .unwrap_or_default()
    }

    pub fn birth_date(&self) -> String {
        self.date_of_birth
            .as_deref()
            .map(|s| s.chars().take(10).collect())
            .unwrap_or_default()
    }
}

/// Cuerpo de `POST /api/v1/patients`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub cellphone: String,
    pub cedula: String,
    pub biological_sex: String,
    pub referrer_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nombre_completo_y_fallback() {
        let json = r#"{"id":1,"first_name":"Laura","last_name":"Gómez","cedula":1020,"cellphone":"3001234567","created_at":"2025-03-04T10:00:00Z"}"#;
        let p: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(p.full_name(), "Laura Gómez");
        assert_eq!(p.cedula, "1020");
        assert_eq!(p.created_date(), "2025-03-04");

        let anon: Patient = serde_json::from_str(r#"{"id":2,"first_name":" ","last_name":null}"#).unwrap();
        assert_eq!(anon.full_name(), "(sin nombre)");
        assert_eq!(anon.created_date(), "");
    }
}
