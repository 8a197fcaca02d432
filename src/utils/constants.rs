// ============================================================================
// CONSTANTES - Rutas del backend y mensajes fijos de la interfaz
// ============================================================================

/// Prefijo de la API versionada
pub const API_PREFIX: &str = "/api/v1";

pub const CSRF_COOKIE_PATH: &str = "/sanctum/csrf-cookie";

// Autenticación
pub const MSG_UNAUTHORIZED: &str = "🚫 Solo personas autorizadas pueden acceder.";
pub const MSG_LOGIN_FAILED: &str = "No se pudo iniciar sesión.";
pub const MSG_SERVER_UNREACHABLE: &str = "Error de conexión con el servidor.";

// Registro de pacientes
pub const MSG_WIZARD_INCOMPLETE: &str = "⚠️\u{200b} Complete todos los pasos antes de guardar el registro.";
pub const MSG_SUBMIT_FAILED: &str = "No se pudo guardar el registro.";
pub const MSG_SUBMIT_FAILED_TOAST: &str = "Hubo un error al guardar el registro";
pub const MSG_SUBMIT_OK: &str = "Registro guardado correctamente";

// Pacientes
pub const MSG_PATIENTS_LOAD_FAILED: &str = "No se pudo cargar el listado de pacientes.";
pub const MSG_PATIENTS_NETWORK: &str = "Error de red cargando pacientes.";

// Genéricos
pub const MSG_UNEXPECTED: &str = "Error inesperado";
pub const MSG_SAVE_FAILED: &str = "Error al guardar";
