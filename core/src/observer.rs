use core::fmt;
use smallvec::SmallVec;
use std::rc::{Rc, Weak};

use crate::*;

/// Receives state changes of a [`GameEngine`].
///
/// Callbacks run synchronously while the engine is mid-move, so they only get shared access to it.
pub trait GameObserver {
    /// A tile changed status, `tile` is its state after the change.
    fn tile_status_changed(&self, _game: &GameEngine, _tile: Tile, _location: Location) {}

    /// Every empty tile has been revealed.
    fn game_won(&self, _game: &GameEngine) {}

    /// A mine was revealed.
    fn game_lost(&self, _game: &GameEngine) {}
}

/// Registration-ordered set of observers that does not keep them alive.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<Weak<dyn GameObserver>>,
}

impl ObserverRegistry {
    /// Returns `false` if the observer was already registered.
    pub(crate) fn add(&mut self, observer: Weak<dyn GameObserver>) -> bool {
        self.prune();
        if self.position(&observer).is_some() {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Returns `false` if the observer was not registered.
    pub(crate) fn remove(&mut self, observer: &Weak<dyn GameObserver>) -> bool {
        self.prune();
        match self.position(observer) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }

    /// Strong handles to the observers still alive, in registration order.
    pub(crate) fn live(&self) -> SmallVec<[Rc<dyn GameObserver>; 4]> {
        self.observers.iter().filter_map(Weak::upgrade).collect()
    }

    fn position(&self, observer: &Weak<dyn GameObserver>) -> Option<usize> {
        self.observers
            .iter()
            .position(|registered| Weak::ptr_eq(registered, observer))
    }

    fn prune(&mut self) {
        self.observers.retain(|observer| observer.strong_count() > 0);
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("live", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl GameObserver for Silent {}

    fn weak(observer: &Rc<Silent>) -> Weak<dyn GameObserver> {
        Rc::downgrade(observer) as Weak<dyn GameObserver>
    }

    #[test]
    fn registers_by_identity() {
        let mut registry = ObserverRegistry::default();
        let first = Rc::new(Silent);
        let second = Rc::new(Silent);

        assert!(registry.add(weak(&first)));
        assert!(!registry.add(weak(&first)));
        assert!(registry.add(weak(&second)));
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(&weak(&first)));
        assert!(!registry.remove(&weak(&first)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn does_not_keep_observers_alive() {
        let mut registry = ObserverRegistry::default();
        let observer = Rc::new(Silent);

        registry.add(weak(&observer));
        assert_eq!(Rc::strong_count(&observer), 1);

        drop(observer);
        assert_eq!(registry.len(), 0);
        assert!(registry.live().is_empty());
    }
}
