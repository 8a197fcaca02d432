// ============================================================================
// IN-FLIGHT - Una sola petición en vuelo por clave de recurso
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    static IN_FLIGHT: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Marca una clave como "en vuelo" mientras vive; se libera en `Drop`
#[derive(Debug)]
pub struct InFlightGuard {
    key: String,
}

impl InFlightGuard {
    /// `None` si ya hay una petición en vuelo con la misma clave
    pub fn acquire(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let inserted = IN_FLIGHT.with(|set| set.borrow_mut().insert(key.clone()));
        if inserted {
            Some(Self { key })
        } else {
            log::debug!("⏭️ [INFLIGHT] {} ya está en curso, se omite", key);
            None
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        IN_FLIGHT.with(|set| {
            set.borrow_mut().remove(&self.key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segunda_peticion_igual_se_omite() {
        let first = InFlightGuard::acquire("patients:ana");
        assert!(first.is_some());
        assert!(InFlightGuard::acquire("patients:ana").is_none());
        assert!(InFlightGuard::acquire("patients:luis").is_some());

        drop(first);
        assert!(InFlightGuard::acquire("patients:ana").is_some());
    }
}
