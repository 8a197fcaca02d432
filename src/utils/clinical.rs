// ============================================================================
// CÁLCULOS CLÍNICOS - IMC y clasificación
// ============================================================================

/// IMC redondeado a dos decimales; `None` si peso o talla no son positivos
pub fn bmi(weight_kg: f64, height_m: f64) -> Option<f64> {
    if !(weight_kg > 0.0) || !(height_m > 0.0) {
        return None;
    }
    let raw = weight_kg / (height_m * height_m);
    if !raw.is_finite() {
        return None;
    }
    Some((raw * 100.0).round() / 100.0)
}

/// Banda de la clasificación OMS para un IMC ya redondeado
pub fn bmi_band(bmi: f64) -> &'static str {
    if bmi < 16.0 {
        "Delgadez severa (< 16.0)"
    } else if bmi < 17.0 {
        "Delgadez moderada (16.0–16.9)"
    } else if bmi < 18.5 {
        "Delgadez leve (17.0–18.4)"
    } else if bmi < 25.0 {
        "Peso normal (18.5–24.9)"
    } else if bmi < 30.0 {
        "Sobrepeso (25.0–29.9)"
    } else if bmi < 35.0 {
        "Obesidad grado I (30.0–34.9)"
    } else if bmi < 40.0 {
        "Obesidad grado II (35.0–39.9)"
    } else {
        "Obesidad grado III (≥ 40)"
    }
}

/// Vista previa a partir de los textos del formulario
#[derive(Clone, Debug, PartialEq)]
pub struct BmiPreview {
    pub value: f64,
    pub band: &'static str,
}

impl BmiPreview {
    pub fn from_inputs(weight: &str, height: &str) -> Option<Self> {
        let weight = parse_measure(weight)?;
        let height = parse_measure(height)?;
        let value = bmi(weight, height)?;
        Some(Self { value, band: bmi_band(value) })
    }

    pub fn display_value(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Medida escrita con punto o coma decimal
pub fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imc_redondeado() {
        assert_eq!(bmi(50.0, 1.6), Some(19.53));
        assert_eq!(bmi_band(19.53), "Peso normal (18.5–24.9)");
        assert_eq!(bmi(0.0, 1.6), None);
        assert_eq!(bmi(70.0, 0.0), None);
        assert_eq!(bmi(-3.0, 1.7), None);
    }

    #[test]
    fn test_bandas_en_los_limites() {
        let cases = [
            (15.99, "Delgadez severa (< 16.0)"),
            (16.0, "Delgadez moderada (16.0–16.9)"),
            (17.0, "Delgadez leve (17.0–18.4)"),
            (18.5, "Peso normal (18.5–24.9)"),
            (24.99, "Peso normal (18.5–24.9)"),
            (25.0, "Sobrepeso (25.0–29.9)"),
            (30.0, "Obesidad grado I (30.0–34.9)"),
            (35.0, "Obesidad grado II (35.0–39.9)"),
            (40.0, "Obesidad grado III (≥ 40)"),
        ];
        for (value, band) in cases {
            assert_eq!(bmi_band(value), band, "IMC {}", value);
        }
    }

    #[test]
    fn test_clasifica_con_el_valor_redondeado() {
        // 18.4996 se muestra como 18.50 y debe caer en la banda normal
        let preview = BmiPreview::from_inputs("46.1825", "1.58").unwrap();
        assert_eq!(preview.display_value(), "18.50");
        assert_eq!(preview.band, "Peso normal (18.5–24.9)");
    }

    #[test]
    fn test_vista_previa_desde_texto() {
        let preview = BmiPreview::from_inputs("62,5", "1.65").unwrap();
        assert_eq!(preview.value, 22.96);
        assert!(BmiPreview::from_inputs("", "1.65").is_none());
        assert!(BmiPreview::from_inputs("abc", "1.65").is_none());
    }
}
