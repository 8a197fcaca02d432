// ============================================================================
// NOTAS AUTOMÁTICAS - Detalles de faja y pierna al inicio de las notas
// ============================================================================

pub const FAJA_PREFIX: &str = "Faja talla:";
pub const PIERNA_PREFIX: &str = "Pierna:";

pub const FAJA_SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];

/// Quita la primera línea que empieza en `prefix` (hasta el salto de línea)
/// junto con el "\n\n" que la separa del resto
fn strip_note(notes: &str, prefix: &str) -> String {
    let Some(start) = notes.find(prefix) else {
        return notes.to_string();
    };
    let line_end = notes[start..]
        .find('\n')
        .map(|offset| start + offset)
        .unwrap_or(notes.len());
    let end = if notes[line_end..].starts_with("\n\n") {
        line_end + 2
    } else {
        line_end
    };
    format!("{}{}", &notes[..start], &notes[end..])
}

fn prepend_note(note: &str, rest: &str) -> String {
    if note.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        note.to_string()
    } else {
        format!("{}\n\n{}", note, rest)
    }
}

pub fn strip_faja_note(notes: &str) -> String {
    strip_note(notes, FAJA_PREFIX)
}

pub fn strip_pierna_note(notes: &str) -> String {
    strip_note(notes, PIERNA_PREFIX)
}

/// Reemplaza (o añade) "Faja talla: X" al inicio de las notas
pub fn apply_faja_size(notes: &str, size: &str) -> String {
    let clean = strip_faja_note(notes);
    prepend_note(&format!("{} {}", FAJA_PREFIX, size), &clean)
}

/// Texto de la nota de pierna; vacío si no se marcó ninguna cara
pub fn pierna_note(interna: bool, externa: bool) -> &'static str {
    match (interna, externa) {
        (true, true) => "Pierna: interna y externa",
        (true, false) => "Pierna: interna",
        (false, true) => "Pierna: externa",
        (false, false) => "",
    }
}

pub fn apply_pierna_sides(notes: &str, interna: bool, externa: bool) -> String {
    let clean = strip_pierna_note(notes);
    prepend_note(pierna_note(interna, externa), &clean)
}

/// Talla escrita en "Faja talla: X", si existe
pub fn faja_size(notes: &str) -> Option<&str> {
    let start = notes.find(FAJA_PREFIX)? + FAJA_PREFIX.len();
    let size = notes[start..].lines().next()?.trim();
    if size.is_empty() {
        None
    } else {
        Some(size)
    }
}

pub fn has_faja_detail(notes: &str) -> bool {
    notes.contains(FAJA_PREFIX)
}

/// (interna, externa) marcadas según las notas actuales
pub fn pierna_sides(notes: &str) -> (bool, bool) {
    let both = notes.contains("Pierna: interna y externa");
    let interna = both || notes.contains("Pierna: interna");
    let externa = both || notes.contains("Pierna: externa");
    (interna, externa)
}

pub fn has_pierna_detail(notes: &str) -> bool {
    let (interna, externa) = pierna_sides(notes);
    interna || externa
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faja_size_lee_la_talla() {
        assert_eq!(faja_size("Faja talla: XL\n\nControl en 8 días"), Some("XL"));
        assert_eq!(faja_size("Sin faja"), None);
        assert_eq!(faja_size(&apply_faja_size("nota", "S")), Some("S"));
    }

    #[test]
    fn test_talla_de_faja_va_al_inicio() {
        assert_eq!(apply_faja_size("", "M"), "Faja talla: M");
        assert_eq!(apply_faja_size("Paciente estable", "M"), "Faja talla: M\n\nPaciente estable");
        assert_eq!(
            apply_faja_size("Faja talla: S\n\nPaciente estable", "L"),
            "Faja talla: L\n\nPaciente estable"
        );
    }

    #[test]
    fn test_pierna_combina_y_limpia() {
        let notes = apply_pierna_sides("Control en 8 días", true, true);
        assert_eq!(notes, "Pierna: interna y externa\n\nControl en 8 días");
        assert_eq!(pierna_sides(&notes), (true, true));

        let notes = apply_pierna_sides(&notes, false, true);
        assert_eq!(notes, "Pierna: externa\n\nControl en 8 días");
        assert_eq!(pierna_sides(&notes), (false, true));

        let notes = apply_pierna_sides(&notes, false, false);
        assert_eq!(notes, "Control en 8 días");
        assert!(!has_pierna_detail(&notes));
    }

    #[test]
    fn test_quitar_nota_conserva_el_resto() {
        let notes = "Pierna: interna\n\nFaja talla: M\n\nObservaciones";
        assert_eq!(strip_faja_note(notes), "Pierna: interna\n\nObservaciones");
        assert_eq!(strip_pierna_note(notes), "Faja talla: M\n\nObservaciones");
        assert_eq!(strip_faja_note("sin detalle"), "sin detalle");
        assert!(has_faja_detail(notes));
    }
}
