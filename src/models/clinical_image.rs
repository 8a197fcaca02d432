use serde::{Deserialize, Serialize};

/// Par antes/después de la galería clínica
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClinicalImage {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub before_image: String,
    pub after_image: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ClinicalImage {
    pub fn before_url(&self, api_base_url: &str) -> String {
        resolve_storage_url(api_base_url, &self.before_image)
    }

    pub fn after_url(&self, api_base_url: &str) -> String {
        resolve_storage_url(api_base_url, &self.after_image)
    }
}

/// Rutas relativas se sirven desde `{base}/storage/{path}`
pub fn resolve_storage_url(api_base_url: &str, path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}/storage/{}", api_base_url, path.trim_start_matches('/'))
    }
}

/// Campos de texto del formulario (los archivos viajan aparte como `File`)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClinicalImageForm {
    pub title: String,
    pub description: String,
    pub has_before_image: bool,
    pub has_after_image: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_de_storage() {
        assert_eq!(
            resolve_storage_url("http://api.local", "clinical/a.jpg"),
            "http://api.local/storage/clinical/a.jpg"
        );
        assert_eq!(
            resolve_storage_url("http://api.local", "https://cdn.x.co/a.jpg"),
            "https://cdn.x.co/a.jpg"
        );
    }
}
