// ============================================================================
// REACTIVITY - Valor compartido con notificación a subscribers
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Estado reactivo: los clones comparten valor y subscribers
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl<T: Clone> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Copia del valor actual
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Lee sin clonar
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Actualiza con una closure y notifica
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// El borrow del valor ya está liberado cuando corren los callbacks
    fn notify(&self) {
        let callbacks: Vec<Callback> = self.subscribers.borrow().iter().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_clones_comparten_subscribers() {
        let state = ReactiveState::new(0);
        let hits = Rc::new(Cell::new(0));
        let hits_cb = hits.clone();
        state.subscribe(move || hits_cb.set(hits_cb.get() + 1));

        let other = state.clone();
        other.set(5);
        state.update(|v| *v += 1);

        assert_eq!(state.get(), 6);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_callback_puede_leer_el_valor() {
        let state = ReactiveState::new(String::from("a"));
        let reader = state.clone();
        let seen = Rc::new(RefCell::new(String::new()));
        let seen_cb = seen.clone();
        state.subscribe(move || *seen_cb.borrow_mut() = reader.get());
        state.set("b".into());
        assert_eq!(*seen.borrow(), "b");
    }
}
