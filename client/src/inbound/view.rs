//! View state holders that tolerate late async responses.
//!
//! A screen owns a [`ViewSlot`]; async work receives a [`ViewUpdater`]
//! holding only a weak reference. When the screen goes away the slot is
//! dropped and later updates become no-ops.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// State of one on-screen view.
#[derive(Debug, Default)]
pub struct ViewSlot<T> {
    state: Arc<Mutex<T>>,
}

impl<T> ViewSlot<T> {
    /// Create a slot holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
        }
    }

    /// Handle for async work that must not keep the view alive.
    pub fn updater(&self) -> ViewUpdater<T> {
        ViewUpdater {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Run `read` against the current state.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&lock(&self.state))
    }
}

impl<T: Clone> ViewSlot<T> {
    /// Copy of the current state.
    pub fn snapshot(&self) -> T {
        self.with(T::clone)
    }
}

/// Weak handle applying updates to a [`ViewSlot`] while it is alive.
#[derive(Debug)]
pub struct ViewUpdater<T> {
    state: Weak<Mutex<T>>,
}

impl<T> Clone for ViewUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<T> ViewUpdater<T> {
    /// Apply `update` if the view still exists.
    ///
    /// Returns `false` when the view was already dropped.
    pub fn apply(&self, update: impl FnOnce(&mut T)) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        update(&mut lock(&state));
        true
    }

    /// Replace the state wholesale if the view still exists.
    pub fn set(&self, value: T) -> bool {
        self.apply(|state| *state = value)
    }

    /// Whether the view has gone away.
    pub fn is_detached(&self) -> bool {
        self.state.strong_count() == 0
    }
}

// A panic inside an update leaves the previous state readable.
fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn updates_reach_live_view() {
        let slot = ViewSlot::new(Vec::<u8>::new());
        let updater = slot.updater();

        assert!(updater.apply(|items| items.push(1)));
        assert!(updater.set(vec![7, 8]));
        assert_eq!(slot.snapshot(), vec![7, 8]);
    }

    #[test]
    fn late_updates_are_ignored() {
        let slot = ViewSlot::new(0_u32);
        let updater = slot.updater();
        drop(slot);

        assert!(updater.is_detached());
        assert!(!updater.apply(|value| *value += 1));
    }

    #[tokio::test]
    async fn response_after_navigation_away_is_dropped() {
        let slot = ViewSlot::new(String::from("cargando"));
        let updater = slot.updater();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            wait.await.expect("released");
            updater.set(String::from("listo"))
        });
        drop(slot);
        release.send(()).expect("task waiting");

        assert!(!task.await.expect("task joins"));
    }
}
