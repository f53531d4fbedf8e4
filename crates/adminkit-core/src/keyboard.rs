#![forbid(unsafe_code)]

//! Global keyboard shortcuts as an ordered command table.
//!
//! Each [`Binding`] pairs a [`Trigger`] and a [`FocusScope`] with a
//! [`ShortcutAction`] and a [`PreventDefault`] policy. The table is scanned
//! in order and the first binding whose trigger and scope both accept the
//! key wins; later bindings are never consulted for that event.
//!
//! | Key | Scope | Action | Default prevented |
//! |-----|-------|--------|-------------------|
//! | `/` | outside typing fields | focus search | always |
//! | Ctrl/Cmd+K | anywhere | focus search | always |
//! | `n` / `N` | outside typing fields | open "add" link | when the link exists |
//! | `Escape` | anywhere | collapse filters | never |
//!
//! "Plain" keys (`/`, `n`) reject Ctrl, Alt and Super but accept Shift, since
//! several keyboard layouts need Shift to type `/`.
//!
//! Resolving a key is pure; running the action is the orchestrator's job.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Meta / Command / Windows key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// One key-down as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// `KeyboardEvent.key` value, e.g. `"/"`, `"k"`, `"Escape"`.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// No Ctrl, Alt or Super held. Shift is allowed because some layouts
    /// need it to produce `/`.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !self
            .modifiers
            .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER)
    }
}

/// What a matched shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Focus the list search input and select its text.
    FocusSearch,
    /// Navigate to the "add object" link.
    AddObject,
    /// Hide the filter panel on compact viewports.
    CollapseFilters,
}

/// Key pattern of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Any of `keys`, exactly, with no Ctrl/Alt/Super.
    Plain(&'static [&'static str]),
    /// `key` (case-insensitive) with Ctrl or Super.
    Chord(&'static str),
    /// A named key regardless of modifiers.
    Named(&'static str),
}

impl Trigger {
    #[must_use]
    pub fn matches(self, input: &KeyInput) -> bool {
        match self {
            Self::Plain(keys) => input.is_plain() && keys.iter().any(|key| *key == input.key),
            Self::Chord(key) => {
                input
                    .modifiers
                    .intersects(Modifiers::CTRL | Modifiers::SUPER)
                    && input.key.eq_ignore_ascii_case(key)
            }
            Self::Named(name) => input.key == name,
        }
    }
}

/// Focus contexts in which a binding is eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusScope {
    /// Only when focus is not inside a typing field.
    OutsideTyping,
    /// Regardless of focus.
    Anywhere,
}

impl FocusScope {
    #[must_use]
    pub const fn admits(self, typing: bool) -> bool {
        match self {
            Self::OutsideTyping => !typing,
            Self::Anywhere => true,
        }
    }
}

/// When a matched binding suppresses the browser's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreventDefault {
    Always,
    /// Only if the action found its target element.
    WhenHandled,
    Never,
}

impl PreventDefault {
    #[must_use]
    pub const fn resolve(self, handled: bool) -> bool {
        match self {
            Self::Always => true,
            Self::WhenHandled => handled,
            Self::Never => false,
        }
    }
}

/// One row of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub name: &'static str,
    pub trigger: Trigger,
    pub scope: FocusScope,
    pub action: ShortcutAction,
    pub prevent: PreventDefault,
}

/// Ordered, first-match-wins shortcut table.
#[derive(Debug, Clone)]
pub struct ShortcutTable {
    bindings: Vec<Binding>,
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::new(vec![
            Binding {
                name: "slash-search",
                trigger: Trigger::Plain(&["/"]),
                scope: FocusScope::OutsideTyping,
                action: ShortcutAction::FocusSearch,
                prevent: PreventDefault::Always,
            },
            Binding {
                name: "chord-search",
                trigger: Trigger::Chord("k"),
                scope: FocusScope::Anywhere,
                action: ShortcutAction::FocusSearch,
                prevent: PreventDefault::Always,
            },
            Binding {
                name: "add-object",
                trigger: Trigger::Plain(&["n", "N"]),
                scope: FocusScope::OutsideTyping,
                action: ShortcutAction::AddObject,
                prevent: PreventDefault::WhenHandled,
            },
            Binding {
                name: "collapse-filters",
                trigger: Trigger::Named("Escape"),
                scope: FocusScope::Anywhere,
                action: ShortcutAction::CollapseFilters,
                prevent: PreventDefault::Never,
            },
        ])
    }
}

impl ShortcutTable {
    #[must_use]
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// First binding accepting `input` in the given focus context.
    #[must_use]
    pub fn resolve(&self, input: &KeyInput, typing: bool) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|binding| binding.scope.admits(typing) && binding.trigger.matches(input))
    }
}

/// Whether a focused element with this tag name swallows typed characters.
#[must_use]
pub fn is_typing_tag(tag: &str) -> bool {
    ["INPUT", "TEXTAREA", "SELECT"]
        .iter()
        .any(|typing| tag.eq_ignore_ascii_case(typing))
}

/// Result of dispatching one key-down, reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// Action of the matched binding, if any.
    pub action: Option<ShortcutAction>,
    /// The action found its target and ran.
    pub handled: bool,
    /// The host must call `preventDefault` on the event.
    pub prevent_default: bool,
}

impl KeyOutcome {
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            action: None,
            handled: false,
            prevent_default: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn action(table: &ShortcutTable, input: &KeyInput, typing: bool) -> Option<ShortcutAction> {
        table.resolve(input, typing).map(|binding| binding.action)
    }

    #[test]
    fn slash_only_outside_typing() {
        let table = ShortcutTable::default();
        let slash = KeyInput::new("/");
        assert_eq!(action(&table, &slash, false), Some(ShortcutAction::FocusSearch));
        assert_eq!(action(&table, &slash, true), None);
        // Layouts that need Shift for '/' still work.
        let shifted = KeyInput::new("/").with_modifiers(Modifiers::SHIFT);
        assert_eq!(action(&table, &shifted, false), Some(ShortcutAction::FocusSearch));
        let ctrl_slash = KeyInput::new("/").with_modifiers(Modifiers::CTRL);
        assert_eq!(action(&table, &ctrl_slash, false), None);
    }

    #[test]
    fn chord_works_in_typing_fields() {
        let table = ShortcutTable::default();
        for (key, mods) in [
            ("k", Modifiers::CTRL),
            ("K", Modifiers::CTRL | Modifiers::SHIFT),
            ("k", Modifiers::SUPER),
        ] {
            let input = KeyInput::new(key).with_modifiers(mods);
            let binding = table.resolve(&input, true).expect("chord should match");
            assert_eq!(binding.name, "chord-search");
            assert!(binding.prevent.resolve(false));
        }
        assert_eq!(action(&table, &KeyInput::new("k"), false), None);
        let alt_k = KeyInput::new("k").with_modifiers(Modifiers::ALT);
        assert_eq!(action(&table, &alt_k, false), None);
    }

    #[test]
    fn add_object_needs_plain_n_outside_typing() {
        let table = ShortcutTable::default();
        assert_eq!(action(&table, &KeyInput::new("n"), false), Some(ShortcutAction::AddObject));
        assert_eq!(action(&table, &KeyInput::new("N"), false), Some(ShortcutAction::AddObject));
        assert_eq!(action(&table, &KeyInput::new("n"), true), None);
        let ctrl_n = KeyInput::new("n").with_modifiers(Modifiers::CTRL);
        assert_eq!(action(&table, &ctrl_n, false), None);
    }

    #[test]
    fn escape_matches_everywhere_and_never_prevents() {
        let table = ShortcutTable::default();
        for typing in [false, true] {
            let binding = table.resolve(&KeyInput::new("Escape"), typing).unwrap();
            assert_eq!(binding.action, ShortcutAction::CollapseFilters);
            assert!(!binding.prevent.resolve(true));
        }
    }

    #[test]
    fn first_match_wins() {
        let table = ShortcutTable::new(vec![
            Binding {
                name: "first",
                trigger: Trigger::Named("x"),
                scope: FocusScope::Anywhere,
                action: ShortcutAction::AddObject,
                prevent: PreventDefault::Never,
            },
            Binding {
                name: "second",
                trigger: Trigger::Plain(&["x"]),
                scope: FocusScope::Anywhere,
                action: ShortcutAction::FocusSearch,
                prevent: PreventDefault::Always,
            },
        ]);
        assert_eq!(table.resolve(&KeyInput::new("x"), false).unwrap().name, "first");
    }

    #[test]
    fn typing_tags_are_case_insensitive() {
        assert!(is_typing_tag("INPUT"));
        assert!(is_typing_tag("textarea"));
        assert!(is_typing_tag("Select"));
        assert!(!is_typing_tag("BUTTON"));
        assert!(!is_typing_tag("A"));
    }

    #[test]
    fn when_handled_follows_target_presence() {
        assert!(PreventDefault::WhenHandled.resolve(true));
        assert!(!PreventDefault::WhenHandled.resolve(false));
        assert_eq!(KeyOutcome::ignored(), KeyOutcome::default());
    }
}
