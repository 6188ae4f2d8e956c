use crate::model::{FocusState, Selection};
use serde::Serialize;
use std::fmt;

/// Interaction mode derived from the current selection.
///
/// - `Touch`: nothing selected.
/// - `Navigate`: one node selected and focused.
/// - `Create`: one node selected and being edited.
/// - `Invalid`: anything else; mode actions do nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Touch,
    Navigate,
    Create,
    Invalid,
}

impl Mode {
    pub fn classify(sel: &Selection) -> Mode {
        if sel.is_empty() {
            return Mode::Touch;
        }
        match sel.single().map(|n| n.state) {
            Some(FocusState::Focused) => Mode::Navigate,
            Some(FocusState::Editing) => Mode::Create,
            _ => Mode::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Touch => "touch",
            Mode::Navigate => "navigate",
            Mode::Create => "create",
            Mode::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    #[test]
    fn classify_by_cardinality_and_state() {
        let a = Node::new("a", 0.0, 0.0, 10.0, 10.0);
        let b = Node::new("b", 20.0, 0.0, 10.0, 10.0);
        assert_eq!(Mode::classify(&Selection::default()), Mode::Touch);
        assert_eq!(Mode::classify(&Selection::new(vec![a.clone().with_state(FocusState::Focused)])), Mode::Navigate);
        assert_eq!(Mode::classify(&Selection::new(vec![a.clone().with_state(FocusState::Editing)])), Mode::Create);
        assert_eq!(Mode::classify(&Selection::new(vec![a.clone()])), Mode::Invalid);
        assert_eq!(Mode::classify(&Selection::new(vec![a, b])), Mode::Invalid);
    }
}
