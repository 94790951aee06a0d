//! Change observer registry.
//!
//! # Responsibility
//! - Track observers registered against locators.
//! - Fan a payload-free change signal out to matching observers.
//!
//! # Invariants
//! - Observers are held weakly; dead entries are dropped on the next
//!   register, count or notify.
//! - Observers are never called while the registry lock is held.
//! - Notifying `L` reaches observers on `L`, on any locator below `L`, and on
//!   locators above `L` that asked for descendant changes.

use crate::locator::Locator;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Receiver of change signals.
pub trait ChangeObserver: Send + Sync {
    /// Data reachable through `locator` may have changed. Re-query to see it.
    fn on_change(&self, locator: &Locator);
}

/// Handle returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

struct Registration {
    handle: ObserverHandle,
    locator: Locator,
    notify_for_descendants: bool,
    observer: Weak<dyn ChangeObserver>,
}

impl Registration {
    fn wants(&self, changed: &Locator) -> bool {
        self.locator.same_resource(changed)
            || changed.is_ancestor_of(&self.locator)
            || (self.notify_for_descendants && self.locator.is_ancestor_of(changed))
    }
}

#[derive(Default)]
struct RegistryState {
    next_handle: u64,
    registrations: Vec<Registration>,
}

/// Observer registry owned by a provider and shared with its callers.
#[derive(Default)]
pub struct ObserverRegistry {
    state: Mutex<RegistryState>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` for changes at `locator`.
    ///
    /// With `notify_for_descendants`, changes to locators below `locator`
    /// (for example one entry under the collection) are delivered too.
    pub fn register<O>(
        &self,
        locator: Locator,
        notify_for_descendants: bool,
        observer: &Arc<O>,
    ) -> ObserverHandle
    where
        O: ChangeObserver + 'static,
    {
        let observer: Arc<dyn ChangeObserver> = observer.clone();
        let mut state = self.lock();
        prune(&mut state);
        let handle = ObserverHandle(state.next_handle);
        state.next_handle += 1;
        state.registrations.push(Registration {
            handle,
            locator,
            notify_for_descendants,
            observer: Arc::downgrade(&observer),
        });
        handle
    }

    /// Removes one registration. Returns `false` when it was already gone.
    pub fn unregister(&self, handle: ObserverHandle) -> bool {
        let mut state = self.lock();
        let before = state.registrations.len();
        state
            .registrations
            .retain(|registration| registration.handle != handle);
        state.registrations.len() != before
    }

    /// Number of registrations whose observer is still alive.
    pub fn len(&self) -> usize {
        let mut state = self.lock();
        prune(&mut state);
        state.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signals every matching live observer. Returns how many were called.
    pub fn notify_change(&self, locator: &Locator) -> usize {
        let targets: Vec<Arc<dyn ChangeObserver>> = {
            let mut state = self.lock();
            prune(&mut state);
            state
                .registrations
                .iter()
                .filter(|registration| registration.wants(locator))
                .filter_map(|registration| registration.observer.upgrade())
                .collect()
        };

        for observer in &targets {
            observer.on_change(locator);
        }

        debug!(
            "event=notify_change module=provider status=ok observers={} locator={}",
            targets.len(),
            locator
        );
        targets.len()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn prune(state: &mut RegistryState) {
    state
        .registrations
        .retain(|registration| registration.observer.strong_count() > 0);
}
