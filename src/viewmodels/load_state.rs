// ============================================================================
// LOAD STATE - Ciclo cargando / error / datos de las vistas de listado
// ============================================================================

/// Estado de una carga remota
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    /// Nunca se pidió: la vista debe lanzar la carga
    pub fn is_idle(&self) -> bool {
        matches!(self, LoadState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// Cargado pero sin filas
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadState::Loaded(rows) if rows.is_empty())
    }

    pub fn rows(&self) -> &[T] {
        match self {
            LoadState::Loaded(rows) => rows,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estados() {
        let state: LoadState<Vec<i32>> = LoadState::default();
        assert!(state.is_idle());
        assert!(state.rows().is_empty());

        let state = LoadState::Loaded(Vec::<i32>::new());
        assert!(state.is_empty());

        let state: LoadState<Vec<i32>> = LoadState::Failed("x".into());
        assert_eq!(state.error(), Some("x"));
        assert!(!state.is_empty());
    }
}
