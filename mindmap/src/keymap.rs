use crate::model::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, alt: false, ctrl: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ..Modifiers::NONE };
    pub const ALT: Modifiers = Modifiers { alt: true, ..Modifiers::NONE };
    pub const META: Modifiers = Modifiers { meta: true, ..Modifiers::NONE };

    /// Parse the host's comma-separated modifier list, e.g. `"Alt"` or `"Meta,Shift"`.
    /// Unknown names are ignored.
    pub fn parse(s: &str) -> Modifiers {
        let mut m = Modifiers::NONE;
        for part in s.split(',').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "shift" => m.shift = true,
                "alt" | "option" => m.alt = true,
                "ctrl" | "control" => m.ctrl = true,
                "meta" | "cmd" | "command" => m.meta = true,
                _ => {}
            }
        }
        m
    }

    /// Host modifier names in canonical order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.ctrl { out.push("Ctrl"); }
        if self.meta { out.push("Meta"); }
        if self.alt { out.push("Alt"); }
        if self.shift { out.push("Shift"); }
        out
    }
}

/// A modifier set plus a key name. Keys compare ASCII-case-insensitively.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Chord {
    pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Chord {
        Chord { modifiers, key: key.into() }
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.modifiers == other.modifiers && self.key.eq_ignore_ascii_case(&other.key)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in self.modifiers.names() {
            write!(f, "{}+", m)?;
        }
        f.write_str(&self.key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    CreateChild,
    CreateSibling(Placement),
    Navigate(Direction),
    /// Touch -> Navigate -> Create.
    Advance,
    /// Create -> Navigate -> Touch.
    Retreat,
}

/// Canvas-mutating operations that share one debounce window regardless of the
/// action's argument: Enter and Shift+Enter are both `CreateSibling`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateChild,
    CreateSibling,
    Navigate,
}

impl Action {
    /// The debounced operation behind this action; mode changes are never debounced.
    pub fn operation(self) -> Option<Operation> {
        match self {
            Action::CreateChild => Some(Operation::CreateChild),
            Action::CreateSibling(_) => Some(Operation::CreateSibling),
            Action::Navigate(_) => Some(Operation::Navigate),
            Action::Advance | Action::Retreat => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub chord: Chord,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keymap {
    pub bindings: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        let b = |modifiers, key: &str, action| Binding { chord: Chord::new(modifiers, key), action };
        Keymap {
            bindings: vec![
                b(Modifiers::NONE, "f", Action::Advance),
                b(Modifiers::META, "Escape", Action::Retreat),
                b(Modifiers::NONE, "Tab", Action::CreateChild),
                b(Modifiers::NONE, "Enter", Action::CreateSibling(Placement::Below)),
                b(Modifiers::SHIFT, "Enter", Action::CreateSibling(Placement::Above)),
                b(Modifiers::ALT, "ArrowLeft", Action::Navigate(Direction::Left)),
                b(Modifiers::ALT, "ArrowRight", Action::Navigate(Direction::Right)),
                b(Modifiers::ALT, "ArrowUp", Action::Navigate(Direction::Up)),
                b(Modifiers::ALT, "ArrowDown", Action::Navigate(Direction::Down)),
            ],
        }
    }
}

impl Keymap {
    pub fn resolve(&self, chord: &Chord) -> Option<Action> {
        self.bindings.iter().find(|b| b.chord == *chord).map(|b| b.action)
    }

    pub fn chords(&self) -> impl Iterator<Item = &Chord> {
        self.bindings.iter().map(|b| &b.chord)
    }
}
