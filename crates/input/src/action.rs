use std::collections::BTreeSet;

/// A logical viewer action produced by whatever key is bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBackward,
    MoveUp,
    MoveDown,
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
}

/// Set of actions whose keys are currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldActions {
    held: BTreeSet<Action>,
}

impl HeldActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    /// Drop every held action, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<Action> for HeldActions {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut held = HeldActions::new();
        held.press(Action::MoveForward);
        assert!(held.is_held(Action::MoveForward));
        assert!(!held.is_held(Action::MoveBackward));
        held.release(Action::MoveForward);
        assert!(held.is_empty());
    }

    #[test]
    fn repeated_press_is_idempotent() {
        let mut held = HeldActions::new();
        held.press(Action::LookUp);
        held.press(Action::LookUp);
        held.release(Action::LookUp);
        assert!(!held.is_held(Action::LookUp));
    }

    #[test]
    fn clear_drops_everything() {
        let mut held: HeldActions = [Action::MoveLeft, Action::LookDown].into_iter().collect();
        assert!(held.is_held(Action::MoveLeft));
        held.clear();
        assert!(held.is_empty());
    }
}
