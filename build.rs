use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Cargar variables de entorno desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // KEY=VALUE (las comillas alrededor del valor se descartan)
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    // Las variables del entorno real tienen prioridad sobre el .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No se encontró .env. Se usan valores por defecto (ver .env.example).");
    }

    for key in [
        "API_BASE_URL",
        "ENVIRONMENT",
        "ENABLE_LOGGING",
        "SEARCH_DEBOUNCE_MS",
        "TOAST_DURATION_MS",
        "CSRF_COOKIE_NAME",
        "CSRF_HEADER_NAME",
        "DEFAULT_AUTHENTICATED_ROUTE",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}
