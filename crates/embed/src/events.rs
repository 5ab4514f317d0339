use html::Id;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Click,
    Tap,
    KeyDown(Key),
}

impl UiEvent {
    /// Click, tap, or Enter/Space on a focused control.
    pub fn is_activation(self) -> bool {
        matches!(
            self,
            UiEvent::Click | UiEvent::Tap | UiEvent::KeyDown(Key::Enter | Key::Space)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Activation listeners registered on document elements.
#[derive(Debug, Default)]
pub struct Listeners {
    next: u64,
    active: BTreeMap<ListenerId, Id>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: Id) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.active.insert(id, target);
        id
    }

    /// Returns false if the listener was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.active.remove(&id).is_some()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn for_target(&self, target: Id) -> impl Iterator<Item = ListenerId> + '_ {
        self.active
            .iter()
            .filter(move |(_, t)| **t == target)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_events() {
        assert!(UiEvent::Click.is_activation());
        assert!(UiEvent::Tap.is_activation());
        assert!(UiEvent::KeyDown(Key::Enter).is_activation());
        assert!(UiEvent::KeyDown(Key::Space).is_activation());
        assert!(!UiEvent::KeyDown(Key::Other).is_activation());
    }

    #[test]
    fn listeners_are_removed_once() {
        let mut listeners = Listeners::new();
        let a = listeners.add(Id(3));
        let b = listeners.add(Id(4));
        assert_ne!(a, b);
        assert_eq!(listeners.for_target(Id(3)).collect::<Vec<_>>(), vec![a]);
        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert!(!listeners.is_registered(a));
        assert_eq!(listeners.len(), 1);
    }
}
