// ============================================================================
// ROUTER - Rutas de la app sobre la History API
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::models::Role;
use crate::services::csrf::percent_decode;

/// Roles de las páginas de administración
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login { next: Option<String> },
    RegisterPatient,
    Patients,
    PatientHistory { patient_id: i64 },
    RecordDetail { patient_id: i64, evaluation_id: i64 },
    ControlImages,
    Stats,
    Remitentes,
    NotFound,
}

/// Qué guarda protege cada ruta
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

/// Pestañas de la barra superior
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTab {
    Register,
    Patients,
    Images,
    Stats,
    Remitentes,
}

impl NavTab {
    pub const ALL: [NavTab; 5] = [
        NavTab::Register,
        NavTab::Patients,
        NavTab::Images,
        NavTab::Stats,
        NavTab::Remitentes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NavTab::Register => "Registro",
            NavTab::Patients => "Pacientes",
            NavTab::Images => "Imágenes",
            NavTab::Stats => "Estadísticas",
            NavTab::Remitentes => "Remitentes",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            NavTab::Register => "/register-patient",
            NavTab::Patients => "/patients",
            NavTab::Images => "/control-images",
            NavTab::Stats => "/stats",
            NavTab::Remitentes => "/admin/remitentes",
        }
    }

    /// Estadísticas y remitentes solo se muestran a ADMIN
    pub fn visible_for(&self, role: Option<Role>) -> bool {
        match self {
            NavTab::Stats | NavTab::Remitentes => role == Some(Role::Admin),
            _ => true,
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| percent_decode(&v.replace('+', " ")))
        .filter(|v| !v.is_empty())
}

impl Route {
    /// `pathname` + `search` -> ruta
    pub fn parse(path: &str, query: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login { next: query_param(query, "next") },
            ["register-patient"] => Route::RegisterPatient,
            ["patients"] => Route::Patients,
            ["patients", id, "history"] => match id.parse() {
                Ok(patient_id) => Route::PatientHistory { patient_id },
                Err(_) => Route::NotFound,
            },
            ["patients", id, "records", eid] => match (id.parse(), eid.parse()) {
                (Ok(patient_id), Ok(evaluation_id)) => Route::RecordDetail { patient_id, evaluation_id },
                _ => Route::NotFound,
            },
            ["control-images"] => Route::ControlImages,
            ["stats"] => Route::Stats,
            ["admin", "remitentes"] => Route::Remitentes,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login { next: None } => "/login".to_string(),
            Route::Login { next: Some(next) } => {
                let encoded: String = js_sys::encode_uri_component(next).into();
                format!("/login?next={}", encoded)
            }
            Route::RegisterPatient => "/register-patient".to_string(),
            Route::Patients => "/patients".to_string(),
            Route::PatientHistory { patient_id } => format!("/patients/{}/history", patient_id),
            Route::RecordDetail { patient_id, evaluation_id } => {
                format!("/patients/{}/records/{}", patient_id, evaluation_id)
            }
            Route::ControlImages => "/control-images".to_string(),
            Route::Stats => "/stats".to_string(),
            Route::Remitentes => "/admin/remitentes".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Home | Route::Login { .. } | Route::NotFound => RouteAccess::Public,
            Route::Stats | Route::Remitentes => RouteAccess::Roles(ADMIN_ONLY),
            _ => RouteAccess::Authenticated,
        }
    }

    pub fn tab(&self) -> Option<NavTab> {
        match self {
            Route::RegisterPatient => Some(NavTab::Register),
            Route::Patients | Route::PatientHistory { .. } | Route::RecordDetail { .. } => {
                Some(NavTab::Patients)
            }
            Route::ControlImages => Some(NavTab::Images),
            Route::Stats => Some(NavTab::Stats),
            Route::Remitentes => Some(NavTab::Remitentes),
            _ => None,
        }
    }
}

// ============================================================================
// NAVEGADOR
// ============================================================================

/// Ruta actual según `window.location`
pub fn current_route() -> Route {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return Route::Home;
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let query = location.search().unwrap_or_default();
    Route::parse(&path, &query)
}

/// `pushState` o `replaceState`; no dispara `popstate`, el llamador re-renderiza
pub fn set_location(path: &str, replace: bool) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("sin window"))?;
    let history = window.history()?;
    if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))?;
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))?;
    }
    log::info!("🧭 [ROUTER] {} {}", if replace { "replace" } else { "push" }, path);
    Ok(())
}

/// Atrás del navegador
pub fn go_back() {
    if let Some(Err(err)) = web_sys::window().and_then(|w| w.history().ok()).map(|h| h.back()) {
        log::warn!("⚠️ [ROUTER] history.back falló: {:?}", err);
    }
}

/// Listener de `popstate`; se registra una sola vez al arrancar
pub fn listen_popstate<F>(on_change: F) -> Result<(), JsValue>
where
    F: Fn() + 'static,
{
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("sin window"))?;
    let closure = Closure::wrap(Box::new(move |_e: web_sys::PopStateEvent| {
        on_change();
    }) as Box<dyn FnMut(web_sys::PopStateEvent)>);
    window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rutas() {
        assert_eq!(Route::parse("/", ""), Route::Home);
        assert_eq!(Route::parse("/patients/", ""), Route::Patients);
        assert_eq!(
            Route::parse("/patients/12/history", ""),
            Route::PatientHistory { patient_id: 12 }
        );
        assert_eq!(
            Route::parse("/patients/12/records/40", ""),
            Route::RecordDetail { patient_id: 12, evaluation_id: 40 }
        );
        assert_eq!(Route::parse("/patients/abc/history", ""), Route::NotFound);
        assert_eq!(Route::parse("/admin/remitentes", ""), Route::Remitentes);
        assert_eq!(Route::parse("/nada", ""), Route::NotFound);
    }

    #[test]
    fn test_login_con_next() {
        assert_eq!(
            Route::parse("/login", "?next=%2Fpatients%2F3%2Fhistory"),
            Route::Login { next: Some("/patients/3/history".into()) }
        );
        assert_eq!(Route::parse("/login", "?next="), Route::Login { next: None });
        assert_eq!(Route::parse("/login", ""), Route::Login { next: None });
    }

    #[test]
    fn test_acceso_y_pestanas() {
        assert_eq!(Route::Stats.access(), RouteAccess::Roles(ADMIN_ONLY));
        assert_eq!(Route::Remitentes.access(), RouteAccess::Roles(ADMIN_ONLY));
        assert_eq!(Route::Patients.access(), RouteAccess::Authenticated);
        assert_eq!(Route::Home.access(), RouteAccess::Public);
        assert_eq!(
            Route::RecordDetail { patient_id: 1, evaluation_id: 2 }.tab(),
            Some(NavTab::Patients)
        );
        assert!(!NavTab::Stats.visible_for(Some(Role::Remitente)));
        assert!(NavTab::Stats.visible_for(Some(Role::Admin)));
        assert!(NavTab::Images.visible_for(Some(Role::Remitente)));
    }
}
