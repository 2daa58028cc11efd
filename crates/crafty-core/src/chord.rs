#![forbid(unsafe_code)]

//! Declarative chord bindings.
//!
//! A chord binds a required set of [`Modifiers`] plus a [`Trigger`] to a
//! command. The trigger is either a mouse gesture or an ordered sequence of
//! key steps, where every key of a step must be down together before the
//! step is released.
//!
//! ```
//! use crafty_core::chord::{Chord, MouseButton};
//! use crafty_core::event::Enacted;
//! use crafty_core::keys::{Key, Modifiers, Platform};
//!
//! let pick: Chord<()> = Chord::on_click(MouseButton::Left, "pick", "Pick", |_, _| {
//!     Enacted::handled()
//! })
//! .with_modifiers(Modifiers::CTRL_CMD);
//! assert_eq!(pick.binding().help_message(Platform::Windows), "[Ctrl + Left Click] Pick");
//!
//! let flip: Chord<()> = Chord::on_keys("flip", "Flip", [[Key::Char('F')]], |_, _| {
//!     Enacted::handled()
//! })
//! .unwrap();
//! assert_eq!(flip.binding().help_message(Platform::Mac), "[F] Flip");
//! ```

use std::fmt;

use smallvec::SmallVec;

use crate::error::ChordError;
use crate::event::{Activation, Enacted};
use crate::keys::{Key, Modifiers, Platform};
use crate::state::DownKeys;

/// Mouse buttons that can trigger a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    fn label(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// Keys that must be held together for one step of a sequence.
///
/// Keys keep their declaration order (for help text); duplicates are dropped.
pub type KeyStep = SmallVec<[Key; 2]>;

/// What completes a chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A click with the given button.
    Click(MouseButton),
    /// A drag with the given button.
    Drag(MouseButton),
    /// An ordered sequence of key steps.
    Keys(Vec<KeyStep>),
}

impl Trigger {
    /// A key sequence trigger from nested key lists.
    pub fn keys<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Key>,
    {
        Self::Keys(
            steps
                .into_iter()
                .map(|step| {
                    let mut out = KeyStep::new();
                    for key in step {
                        if !out.contains(&key) {
                            out.push(key);
                        }
                    }
                    out
                })
                .collect(),
        )
    }

    /// A single key pressed and released on its own.
    #[must_use]
    pub fn key(key: Key) -> Self {
        Self::keys([[key]])
    }

    /// The key steps of a sequence trigger; empty for mouse triggers.
    #[must_use]
    pub fn sequence(&self) -> &[KeyStep] {
        match self {
            Self::Keys(steps) => steps,
            Self::Click(_) | Self::Drag(_) => &[],
        }
    }

    fn validate(&self, cmd: &str) -> Result<(), ChordError> {
        if let Self::Keys(steps) = self {
            if steps.is_empty() {
                return Err(ChordError::EmptySequence { cmd: cmd.to_owned() });
            }
            if let Some(step) = steps.iter().position(|s| s.is_empty()) {
                return Err(ChordError::EmptyStep {
                    cmd: cmd.to_owned(),
                    step,
                });
            }
        }
        Ok(())
    }
}

/// Render the help line for a chord.
///
/// Modifier names (fixed order Ctrl/Cmd, Alt/Option, Shift) and the trigger
/// are joined with `" + "` inside brackets, followed by the help text. Key
/// sequence steps are separated with `", "`.
#[must_use]
pub fn create_help_message(
    help: &str,
    modifiers: Modifiers,
    trigger: &Trigger,
    platform: Platform,
) -> String {
    let mut parts: Vec<String> = platform
        .modifier_labels(modifiers)
        .map(str::to_owned)
        .collect();
    let input = match trigger {
        Trigger::Click(button) => format!("{} Click", button.label()),
        Trigger::Drag(button) => format!("{} Drag", button.label()),
        Trigger::Keys(steps) => steps
            .iter()
            .map(|step| {
                step.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" + ")
            })
            .collect::<Vec<_>>()
            .join(", "),
    };
    parts.push(input);
    format!("[{}] {help}", parts.join(" + "))
}

/// The declarative part of a chord: everything except its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordBinding {
    cmd: String,
    help: String,
    modifiers: Modifiers,
    trigger: Trigger,
    enabled: bool,
}

impl ChordBinding {
    /// The command name.
    #[must_use]
    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    /// The free-text help.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Modifiers that must be down, exactly.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Modifiers whose presence disqualifies this chord.
    #[must_use]
    pub fn antimodifiers(&self) -> Modifiers {
        !self.modifiers
    }

    #[must_use]
    pub const fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether exactly `current` modifiers satisfy this chord.
    #[inline]
    #[must_use]
    pub fn accepts_modifiers(&self, current: Modifiers) -> bool {
        !current.intersects(self.antimodifiers()) && current == self.modifiers
    }

    /// Whether `down` could still be completing step `index` of this chord.
    ///
    /// Requires an enabled key chord, exact modifiers, an existing step, and
    /// `down` to hold only keys of that step.
    #[must_use]
    pub fn accepts_step(&self, current: Modifiers, down: &DownKeys, index: usize) -> bool {
        if !self.enabled || !self.accepts_modifiers(current) {
            return false;
        }
        match self.trigger.sequence().get(index) {
            Some(step) => down.iter().all(|k| step.contains(k)),
            None => false,
        }
    }

    /// Whether releasing `down` at step `index` completes this chord.
    ///
    /// True iff the modifiers match exactly, `index` is the final step, and
    /// every key of `down` belongs to that step.
    #[must_use]
    pub fn matches(&self, current: Modifiers, down: &DownKeys, index: usize) -> bool {
        let steps = self.trigger.sequence();
        current == self.modifiers
            && index + 1 == steps.len()
            && down.iter().all(|k| steps[index].contains(k))
    }

    /// Whether a click or drag with `trigger` completes this chord.
    #[must_use]
    pub fn matches_pointer(&self, current: Modifiers, trigger: &Trigger) -> bool {
        self.enabled && self.accepts_modifiers(current) && &self.trigger == trigger
    }

    /// Help line for status displays.
    #[must_use]
    pub fn help_message(&self, platform: Platform) -> String {
        create_help_message(&self.help, self.modifiers, &self.trigger, platform)
    }
}

/// Callback invoked when a chord completes.
pub type Handler<T> = Box<dyn FnMut(&ChordBinding, &Activation) -> Enacted<T>>;

/// A chord binding together with its handler.
pub struct Chord<T> {
    binding: ChordBinding,
    handler: Handler<T>,
}

impl<T> fmt::Debug for Chord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chord")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl<T> Chord<T> {
    /// Create an enabled chord with no modifiers.
    ///
    /// Fails if `trigger` is a key sequence with no steps or an empty step.
    pub fn new<F>(
        cmd: impl Into<String>,
        help: impl Into<String>,
        trigger: Trigger,
        handler: F,
    ) -> Result<Self, ChordError>
    where
        F: FnMut(&ChordBinding, &Activation) -> Enacted<T> + 'static,
    {
        let cmd = cmd.into();
        trigger.validate(&cmd)?;
        Ok(Self {
            binding: ChordBinding {
                cmd,
                help: help.into(),
                modifiers: Modifiers::NONE,
                trigger,
                enabled: true,
            },
            handler: Box::new(handler),
        })
    }

    /// A chord completed by clicking `button`.
    pub fn on_click<F>(
        button: MouseButton,
        cmd: impl Into<String>,
        help: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: FnMut(&ChordBinding, &Activation) -> Enacted<T> + 'static,
    {
        Self::pointer(Trigger::Click(button), cmd.into(), help.into(), handler)
    }

    /// A chord completed by dragging with `button`.
    pub fn on_drag<F>(
        button: MouseButton,
        cmd: impl Into<String>,
        help: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: FnMut(&ChordBinding, &Activation) -> Enacted<T> + 'static,
    {
        Self::pointer(Trigger::Drag(button), cmd.into(), help.into(), handler)
    }

    /// A chord completed by a key sequence.
    pub fn on_keys<I, S, F>(
        cmd: impl Into<String>,
        help: impl Into<String>,
        steps: I,
        handler: F,
    ) -> Result<Self, ChordError>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = Key>,
        F: FnMut(&ChordBinding, &Activation) -> Enacted<T> + 'static,
    {
        Self::new(cmd, help, Trigger::keys(steps), handler)
    }

    fn pointer<F>(trigger: Trigger, cmd: String, help: String, handler: F) -> Self
    where
        F: FnMut(&ChordBinding, &Activation) -> Enacted<T> + 'static,
    {
        Self {
            binding: ChordBinding {
                cmd,
                help,
                modifiers: Modifiers::NONE,
                trigger,
                enabled: true,
            },
            handler: Box::new(handler),
        }
    }

    /// Require exactly `modifiers` to be down.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.binding.modifiers = modifiers;
        self
    }

    /// Start out disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.binding.enabled = false;
        self
    }

    #[must_use]
    pub fn binding(&self) -> &ChordBinding {
        &self.binding
    }

    /// Invoke the handler.
    pub fn enact(&mut self, activation: &Activation) -> Enacted<T> {
        (self.handler)(&self.binding, activation)
    }

    pub(crate) fn into_parts(self) -> (ChordBinding, Handler<T>) {
        (self.binding, self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop<T>() -> impl FnMut(&ChordBinding, &Activation) -> Enacted<T> {
        |_, _| Enacted::handled()
    }

    fn down(keys: &[char]) -> DownKeys {
        keys.iter().map(|&c| Key::Char(c)).collect()
    }

    #[test]
    fn help_for_modified_click() {
        let chord: Chord<()> =
            Chord::on_click(MouseButton::Left, "pick", "Pick", noop()).with_modifiers(Modifiers::CTRL_CMD);
        assert_eq!(
            chord.binding().help_message(Platform::Windows),
            "[Ctrl + Left Click] Pick"
        );
        assert_eq!(
            chord.binding().help_message(Platform::Mac),
            "[⌘ + Left Click] Pick"
        );
    }

    #[test]
    fn help_for_key_sequence() {
        let trigger = Trigger::keys([vec![Key::Char('A'), Key::Char('B')], vec![Key::Tab]]);
        let msg = create_help_message(
            "Cycle",
            Modifiers::SHIFT | Modifiers::ALT_OPTION,
            &trigger,
            Platform::Windows,
        );
        assert_eq!(msg, "[Alt + Shift + A + B, Tab] Cycle");
    }

    #[test]
    fn help_for_right_click_and_drag() {
        let plain = create_help_message("Menu", Modifiers::NONE, &Trigger::Click(MouseButton::Right), Platform::Windows);
        assert_eq!(plain, "[Right Click] Menu");
        let drag = create_help_message("Box select", Modifiers::NONE, &Trigger::Drag(MouseButton::Left), Platform::Windows);
        assert_eq!(drag, "[Left Drag] Box select");
    }

    #[test]
    fn empty_sequences_are_rejected() {
        let empty: Vec<Vec<Key>> = Vec::new();
        let err = Chord::<()>::on_keys("none", "", empty, noop()).unwrap_err();
        assert_eq!(err, ChordError::EmptySequence { cmd: "none".into() });

        let err = Chord::<()>::on_keys("gap", "", [vec![Key::Tab], vec![]], noop()).unwrap_err();
        assert_eq!(err, ChordError::EmptyStep { cmd: "gap".into(), step: 1 });
    }

    #[test]
    fn duplicate_keys_in_a_step_collapse() {
        let trigger = Trigger::keys([[Key::Char('A'), Key::Char('A'), Key::Char('B')]]);
        assert_eq!(trigger.sequence()[0].as_slice(), &[Key::Char('A'), Key::Char('B')]);
    }

    #[test]
    fn antimodifiers_complement_modifiers() {
        let chord: Chord<()> = Chord::on_click(MouseButton::Left, "c", "", noop()).with_modifiers(Modifiers::CTRL_CMD);
        assert_eq!(chord.binding().antimodifiers(), Modifiers::ALT_OPTION | Modifiers::SHIFT);
        assert!(chord.binding().accepts_modifiers(Modifiers::CTRL_CMD));
        assert!(!chord.binding().accepts_modifiers(Modifiers::CTRL_CMD | Modifiers::SHIFT));
        assert!(!chord.binding().accepts_modifiers(Modifiers::NONE));
    }

    #[test]
    fn matches_requires_final_step_and_subset() {
        let chord: Chord<()> = Chord::on_keys(
            "seq",
            "",
            [vec![Key::Char('A')], vec![Key::Char('B'), Key::Char('C')]],
            noop(),
        )
        .unwrap();
        let b = chord.binding();
        assert!(!b.matches(Modifiers::NONE, &down(&['A']), 0));
        assert!(b.matches(Modifiers::NONE, &down(&['B']), 1));
        assert!(b.matches(Modifiers::NONE, &down(&['B', 'C']), 1));
        assert!(!b.matches(Modifiers::NONE, &down(&['B', 'D']), 1));
        assert!(!b.matches(Modifiers::SHIFT, &down(&['B']), 1));
    }

    #[test]
    fn accepts_step_skips_disabled_and_pointer_chords() {
        let keys: Chord<()> = Chord::on_keys("k", "", [[Key::Char('K')]], noop()).unwrap().disabled();
        assert!(!keys.binding().accepts_step(Modifiers::NONE, &down(&['K']), 0));

        let click: Chord<()> = Chord::on_click(MouseButton::Left, "c", "", noop());
        assert!(!click.binding().accepts_step(Modifiers::NONE, &DownKeys::new(), 0));
    }

    #[test]
    fn enact_calls_handler_with_binding() {
        let mut chord: Chord<String> =
            Chord::on_click(MouseButton::Right, "ctx", "Context", |binding, _| {
                Enacted::transition(binding.cmd().to_owned())
            });
        let out = chord.enact(&Activation::KeyPress);
        assert_eq!(out.transition.as_deref(), Some("ctx"));
    }
}
