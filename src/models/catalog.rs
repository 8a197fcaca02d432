// ============================================================================
// CATÁLOGO DE PROCEDIMIENTOS - Grupos que se muestran en el paso 3 del registro
// ============================================================================

/// Procedimiento seleccionable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogProcedure {
    pub id: &'static str,
    pub label: &'static str,
}

/// Grupo plegable con sus procedimientos
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcedureGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub procedure_ids: &'static [&'static str],
}

/// Requiere talla antes de poder poner precio
pub const FAJA_ID: &str = "faja_postoperatoria";
/// Requiere indicar interna/externa antes de poder poner precio
pub const PIERNA_ID: &str = "pierna";

pub const PROCEDURES: &[CatalogProcedure] = &[
    CatalogProcedure { id: "liposuccion", label: "Liposucción" },
    CatalogProcedure { id: "lipoescultura", label: "Lipoescultura" },
    CatalogProcedure { id: "abdominoplastia", label: "Abdominoplastia" },
    CatalogProcedure { id: "lipotransferencia_gluteos", label: "Lipotransferencia a glúteos" },
    CatalogProcedure { id: "pierna", label: "Lipo Pierna" },
    CatalogProcedure { id: "brazos", label: "Lipo de brazos" },
    CatalogProcedure { id: "mamoplastia_aumento", label: "Mamoplastia de aumento" },
    CatalogProcedure { id: "mastopexia", label: "Mastopexia" },
    CatalogProcedure { id: "reduccion_mamaria", label: "Reducción mamaria" },
    CatalogProcedure { id: "rinoplastia", label: "Rinoplastia" },
    CatalogProcedure { id: "blefaroplastia", label: "Blefaroplastia" },
    CatalogProcedure { id: "bichectomia", label: "Bichectomía" },
    CatalogProcedure { id: "toxina_botulinica", label: "Toxina botulínica" },
    CatalogProcedure { id: "acido_hialuronico", label: "Ácido hialurónico" },
    CatalogProcedure { id: "faja_postoperatoria", label: "Faja postoperatoria" },
    CatalogProcedure { id: "drenaje_linfatico", label: "Drenaje linfático" },
    CatalogProcedure { id: "camara_hiperbarica", label: "Cámara hiperbárica" },
    CatalogProcedure { id: "valoracion", label: "Valoración médica" },
];

pub const PROCEDURE_GROUPS: &[ProcedureGroup] = &[
    ProcedureGroup {
        id: "corporales",
        label: "Procedimientos corporales",
        procedure_ids: &[
            "liposuccion",
            "lipoescultura",
            "abdominoplastia",
            "lipotransferencia_gluteos",
            "pierna",
            "brazos",
        ],
    },
    ProcedureGroup {
        id: "mamarios",
        label: "Cirugía mamaria",
        procedure_ids: &["mamoplastia_aumento", "mastopexia", "reduccion_mamaria"],
    },
    ProcedureGroup {
        id: "faciales",
        label: "Procedimientos faciales",
        procedure_ids: &[
            "rinoplastia",
            "blefaroplastia",
            "bichectomia",
            "toxina_botulinica",
            "acido_hialuronico",
        ],
    },
    ProcedureGroup {
        id: "postoperatorio",
        label: "Postoperatorio y otros",
        procedure_ids: &[
            "faja_postoperatoria",
            "drenaje_linfatico",
            "camara_hiperbarica",
            "valoracion",
        ],
    },
];

pub fn find_procedure(id: &str) -> Option<&'static CatalogProcedure> {
    PROCEDURES.iter().find(|p| p.id == id)
}

impl ProcedureGroup {
    pub fn procedures(&self) -> impl Iterator<Item = &'static CatalogProcedure> + '_ {
        self.procedure_ids.iter().filter_map(|id| find_procedure(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todos_los_ids_de_grupo_existen() {
        for group in PROCEDURE_GROUPS {
            assert_eq!(group.procedures().count(), group.procedure_ids.len(), "{}", group.id);
        }
    }

    #[test]
    fn test_procedimientos_con_detalle() {
        assert!(find_procedure(FAJA_ID).unwrap().label.contains("Faja"));
        assert!(find_procedure(PIERNA_ID).unwrap().label.contains("Pierna"));
    }
}
