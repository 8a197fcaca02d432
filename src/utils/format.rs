// ============================================================================
// FORMATO - Números es-CO, precios y celulares
// ============================================================================

/// Deja solo los dígitos ASCII
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Agrupa miles con "." ("1500000" -> "1.500.000")
pub fn group_thousands(digits: &str) -> String {
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return "0".to_string();
    }
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Máximo de dígitos aceptados en un precio
pub const MAX_PRICE_DIGITS: usize = 12;

/// Entrada de precio tal como se muestra mientras se escribe
///
/// Se descarta todo lo que no sea dígito y se corta en `MAX_PRICE_DIGITS`;
/// una entrada sin dígitos queda vacía.
pub fn format_price_input(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(MAX_PRICE_DIGITS).collect();
    if digits.is_empty() {
        String::new()
    } else {
        group_thousands(&digits)
    }
}

/// Precio mostrado -> entero para el backend ("1.500.000" -> 1500000)
pub fn parse_price(display: &str) -> u64 {
    let digits: String = digits_only(display).chars().take(MAX_PRICE_DIGITS).collect();
    digits.parse().unwrap_or(0)
}

/// Precio con decimales "es-CO" ("1.500,50" -> 1500.5); vacío o inválido -> None
pub fn parse_decimal_price(display: &str) -> Option<f64> {
    let normalized = display.trim().replace('.', "").replacen(',', ".", 1);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Entero con separador de miles, redondeado
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&format!("{:.0}", rounded.abs())))
}

/// Moneda COP sin decimales ("$ 1.500.000")
pub fn format_cop(value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 {
        format!("-$ {}", format_number(rounded.abs()))
    } else {
        format!("$ {}", format_number(rounded))
    }
}

/// Celular: solo dígitos, máximo 10, mostrado como "300 123 4567"
///
/// Con menos de seis dígitos se deja sin espacios.
pub fn format_cellphone(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(10).collect();
    if digits.len() < 6 {
        return digits;
    }
    let (first, rest) = digits.split_at(3);
    let (second, third) = rest.split_at(3);
    if third.is_empty() {
        format!("{} {}", first, second)
    } else {
        format!("{} {} {}", first, second, third)
    }
}

/// Número sin separadores ni ceros sobrantes (1500000.0 -> "1500000", 12.5 -> "12.5")
pub fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Porcentaje de una barra respecto al máximo, con un mínimo visible
pub fn bar_percent(value: f64, max: f64, min_percent: f64) -> f64 {
    let max = if max > 0.0 { max } else { 1.0 };
    ((value / max) * 100.0).clamp(min_percent, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precio_ida_y_vuelta() {
        assert_eq!(format_price_input("1500000"), "1.500.000");
        assert_eq!(parse_price("1.500.000"), 1_500_000);
        assert_eq!(format_price_input("$1.5a00"), "1.500");
        assert_eq!(format_price_input("abc"), "");
        assert_eq!(format_price_input("000"), "0");
        assert_eq!(parse_price(""), 0);
    }

    #[test]
    fn test_precio_se_corta_en_doce_digitos() {
        assert_eq!(format_price_input("999999999999999999999"), "999.999.999.999");
        assert_eq!(parse_price("999.999.999.999.999.999.999"), 999_999_999_999);
        assert_eq!(parse_price("18446744073709551616"), 184_467_440_737);
    }

    #[test]
    fn test_precio_decimal() {
        assert_eq!(parse_decimal_price("1.500,50"), Some(1500.5));
        assert_eq!(parse_decimal_price("200000"), Some(200000.0));
        assert_eq!(parse_decimal_price(""), None);
        assert_eq!(parse_decimal_price("abc"), None);
    }

    #[test]
    fn test_numero_plano() {
        assert_eq!(plain_number(1_500_000.0), "1500000");
        assert_eq!(plain_number(12.5), "12.5");
        assert_eq!(plain_number(-3.0), "-3");
    }

    #[test]
    fn test_moneda_cop() {
        assert_eq!(format_cop(1_500_000.0), "$ 1.500.000");
        assert_eq!(format_cop(999.6), "$ 1.000");
        assert_eq!(format_cop(0.0), "$ 0");
        assert_eq!(format_number(12_345.0), "12.345");
    }

    #[test]
    fn test_celular() {
        assert_eq!(format_cellphone("3001234567"), "300 123 4567");
        assert_eq!(format_cellphone("300-123-45679999"), "300 123 4567");
        assert_eq!(format_cellphone("300123"), "300 123");
        assert_eq!(format_cellphone("30012"), "30012");
        assert_eq!(digits_only("300 123 4567"), "3001234567");
    }

    #[test]
    fn test_barras() {
        assert_eq!(bar_percent(50.0, 100.0, 2.0), 50.0);
        assert_eq!(bar_percent(0.0, 100.0, 2.0), 2.0);
        assert_eq!(bar_percent(10.0, 0.0, 0.0), 100.0);
    }
}
