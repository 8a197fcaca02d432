// ============================================================================
// CSRF - Lectura del token XSRF desde document.cookie
// ============================================================================

use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

/// Valor de la cookie `name` ya decodificado (Laravel lo manda URL-encoded)
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode(value))
}

/// Decodifica `%XX`; si el resultado no es UTF-8 válido se deja el valor crudo
pub fn percent_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Token CSRF actual del navegador; cadena vacía si no hay cookie
pub fn read_csrf_token(cookie_name: &str) -> String {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
        .and_then(|d| d.cookie().ok())
        .and_then(|cookies| cookie_value(&cookies, cookie_name))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lee_cookie_decodificada() {
        let header = "laravel_session=abc; XSRF-TOKEN=eyJpdiI6Ik1%3D%3D; other=1";
        assert_eq!(cookie_value(header, "XSRF-TOKEN").as_deref(), Some("eyJpdiI6Ik1=="));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_cookie_con_utf8_invalido_queda_cruda() {
        let header = "XSRF-TOKEN=abc%FF%FE";
        assert_eq!(cookie_value(header, "XSRF-TOKEN").as_deref(), Some("abc%FF%FE"));
    }
}
