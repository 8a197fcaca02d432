// ============================================================================
// FECHAS - Edad, fecha de hoy y nombres de mes
// ============================================================================

use chrono::{Datelike, Local, NaiveDate};

pub const MIN_PATIENT_AGE: i32 = 14;
pub const MAX_PATIENT_AGE: i32 = 120;

pub const MONTH_NAMES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

const FULL_MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto",
    "Septiembre", "Octubre", "Noviembre", "Diciembre",
];

const WEEKDAY_NAMES: [&str; 7] = ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"];

/// Fecha local de hoy (con `wasmbind` usa el reloj del navegador)
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Hoy en formato YYYY-MM-DD
pub fn today_iso() -> String {
    today().format("%Y-%m-%d").to_string()
}

/// Lee "YYYY-MM-DD" (ignora una posible parte horaria)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part: String = raw.trim().chars().take(10).collect();
    NaiveDate::parse_from_str(&date_part, "%Y-%m-%d").ok()
}

/// Años cumplidos a `today`; `None` si la fecha no es válida o es futura
pub fn age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let birth = parse_date(date_of_birth)?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    if age >= 0 {
        Some(age)
    } else {
        None
    }
}

pub fn is_age_out_of_range(age: i32) -> bool {
    age < MIN_PATIENT_AGE || age > MAX_PATIENT_AGE
}

/// Abreviatura del mes (1 = "Ene")
pub fn month_abbrev(month: u32) -> &'static str {
    MONTH_NAMES[((month as usize).saturating_sub(1)) % 12]
}

/// "Octubre de 2026"
pub fn period_label(date: NaiveDate) -> String {
    format!("{} de {}", FULL_MONTH_NAMES[date.month0() as usize], date.year())
}

/// Día de la semana abreviado de una fecha "YYYY-MM-DD"
pub fn weekday_abbrev(raw: &str) -> String {
    parse_date(raw)
        .map(|d| WEEKDAY_NAMES[d.weekday().num_days_from_monday() as usize].to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// "16 Oct 2026"; si no es una fecha se devuelve tal cual
pub fn display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(d) => format!("{:02} {} {}", d.day(), month_abbrev(d.month()), d.year()),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_edad_antes_y_despues_del_cumpleanos() {
        let today = date(2026, 10, 16);
        assert_eq!(age_on("1990-10-16", today), Some(36));
        assert_eq!(age_on("1990-10-17", today), Some(35));
        assert_eq!(age_on("2026-12-01", today), None);
        assert_eq!(age_on("no-es-fecha", today), None);
        assert_eq!(age_on("1990-01-05T00:00:00.000000Z", today), Some(36));
    }

    #[test]
    fn test_rango_de_edad() {
        assert!(is_age_out_of_range(13));
        assert!(!is_age_out_of_range(14));
        assert!(!is_age_out_of_range(120));
        assert!(is_age_out_of_range(121));
    }

    #[test]
    fn test_nombres() {
        assert_eq!(month_abbrev(1), "Ene");
        assert_eq!(month_abbrev(12), "Dic");
        assert_eq!(period_label(date(2026, 10, 16)), "Octubre de 2026");
        assert_eq!(weekday_abbrev("2026-10-16"), "vie");
        assert_eq!(display_date("2026-03-05T14:00:00.000000Z"), "05 Mar 2026");
        assert_eq!(display_date("—"), "—");
    }
}
