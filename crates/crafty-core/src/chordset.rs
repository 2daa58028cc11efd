#![forbid(unsafe_code)]

//! A list of chords plus the state needed to recognize them.
//!
//! [`Chordset`] receives raw host key codes and mouse events, keeps the live
//! [`Modifiers`] mask, drives the [`ChordsetState`] machine and runs the
//! handlers of every chord the machine reports as completed.
//!
//! # Firing
//!
//! When several chords complete on the same input they all fire, in list
//! order. Their [`Enacted`] results are merged: `handled` is true if any of
//! them consumed the input and the last requested transition wins. When no
//! chord fires, `handled` reports whether the input moved the state machine.
//!
//! ```
//! use crafty_core::chord::{Chord, MouseButton};
//! use crafty_core::chordset::Chordset;
//! use crafty_core::event::Enacted;
//! use crafty_core::geometry::Point;
//! use crafty_core::keys::Platform;
//!
//! let mut set = Chordset::for_platform(
//!     Platform::Windows,
//!     [Chord::on_click(MouseButton::Left, "pick", "Pick", |_, _| Enacted::transition("picked"))],
//! );
//! let out = set.on_click(MouseButton::Left, Point::new(3.0, 4.0));
//! assert_eq!(out.transition, Some("picked"));
//! assert_eq!(set.status(), "[Left Click] Pick");
//! ```

use std::fmt;

use crate::chord::{Chord, ChordBinding, Handler, MouseButton};
use crate::event::{Activation, Enacted};
use crate::geometry::Point;
use crate::keys::{Key, KeyInput, KeyNormalizer, Modifiers, Platform};
use crate::state::{ChordsetState, Transition};

/// Separator between chord help lines in [`Chordset::status`].
pub const HELP_SEPARATOR: &str = " // ";

/// Chords plus the input-tracking state that recognizes them.
pub struct Chordset<T> {
    platform: Platform,
    normalizer: &'static KeyNormalizer,
    bindings: Vec<ChordBinding>,
    handlers: Vec<Handler<T>>,
    modifiers: Modifiers,
    state: ChordsetState,
}

impl<T> fmt::Debug for Chordset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chordset")
            .field("platform", &self.platform)
            .field("bindings", &self.bindings)
            .field("modifiers", &self.modifiers)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Chordset<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Chordset<T> {
    /// A chordset for the platform this process runs on.
    pub fn new(chords: impl IntoIterator<Item = Chord<T>>) -> Self {
        Self::for_platform(Platform::current(), chords)
    }

    /// A chordset using the key tables and modifier names of `platform`.
    pub fn for_platform(platform: Platform, chords: impl IntoIterator<Item = Chord<T>>) -> Self {
        let (bindings, handlers) = chords.into_iter().map(Chord::into_parts).unzip();
        Self {
            platform,
            normalizer: KeyNormalizer::for_platform(platform),
            bindings,
            handlers,
            modifiers: Modifiers::NONE,
            state: ChordsetState::Idle,
        }
    }

    /// A chordset with no chords. Tracks modifiers and keys but never fires.
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Append a chord.
    pub fn push(&mut self, chord: Chord<T>) {
        let (binding, handler) = chord.into_parts();
        self.bindings.push(binding);
        self.handlers.push(handler);
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_chord(mut self, chord: Chord<T>) -> Self {
        self.push(chord);
        self
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub const fn state(&self) -> &ChordsetState {
        &self.state
    }

    /// The live modifier mask.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Bindings in list order.
    #[must_use]
    pub fn chords(&self) -> &[ChordBinding] {
        &self.bindings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Help for every chord still reachable, joined with [`HELP_SEPARATOR`].
    #[must_use]
    pub fn status(&self) -> String {
        self.state
            .reachable(&self.bindings)
            .into_iter()
            .map(|i| self.bindings[i].help_message(self.platform))
            .collect::<Vec<_>>()
            .join(HELP_SEPARATOR)
    }

    /// Forget held modifiers and any partial sequence.
    pub fn reset(&mut self) {
        self.modifiers = Modifiers::NONE;
        self.state = ChordsetState::Idle;
    }

    /// Enable every chord named `cmd`. Returns whether any chord matched.
    pub fn enable(&mut self, cmd: &str) -> bool {
        self.set_enabled(cmd, true)
    }

    /// Disable every chord named `cmd`. Returns whether any chord matched.
    pub fn disable(&mut self, cmd: &str) -> bool {
        self.set_enabled(cmd, false)
    }

    fn set_enabled(&mut self, cmd: &str, enabled: bool) -> bool {
        let mut found = false;
        for binding in self.bindings.iter_mut().filter(|b| b.cmd() == cmd) {
            binding.set_enabled(enabled);
            found = true;
        }
        found
    }

    /// Feed a raw host key-press code. Returns whether the input was consumed.
    ///
    /// Key presses never fire chords.
    pub fn on_key_down(&mut self, code: u32) -> bool {
        match self.normalizer.classify(code) {
            KeyInput::Modifier(m) => self.modifier_down(m),
            KeyInput::Key(key) => self.key_down(key),
        }
    }

    /// Feed a raw host key-release code.
    pub fn on_key_up(&mut self, code: u32) -> Enacted<T> {
        match self.normalizer.classify(code) {
            KeyInput::Modifier(m) => Enacted::unhandled().with_handled(self.modifier_up(m)),
            KeyInput::Key(key) => self.key_up(key),
        }
    }

    /// Press an already-normalized key.
    pub fn key_down(&mut self, key: Key) -> bool {
        tracing::trace!(target: "crafty.chord", %key, modifiers = ?self.modifiers, "key down");
        let state = std::mem::take(&mut self.state);
        let next = state.clone().accept_key_down(key, self.modifiers, &self.bindings);
        self.settle(state, next)
    }

    /// Release an already-normalized key, firing any chords it completes.
    pub fn key_up(&mut self, key: Key) -> Enacted<T> {
        tracing::trace!(target: "crafty.chord", %key, modifiers = ?self.modifiers, "key up");
        let state = std::mem::take(&mut self.state);
        let step = state.clone().accept_key_up(key, self.modifiers, &self.bindings);
        self.apply(state, step, &Activation::KeyPress)
    }

    /// Record a modifier press. Never fires.
    pub fn modifier_down(&mut self, modifiers: Modifiers) -> bool {
        self.set_modifiers(self.modifiers | modifiers)
    }

    /// Record a modifier release. Never fires.
    pub fn modifier_up(&mut self, modifiers: Modifiers) -> bool {
        self.set_modifiers(self.modifiers - modifiers)
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) -> bool {
        if modifiers == self.modifiers {
            return false;
        }
        tracing::trace!(target: "crafty.chord", from = ?self.modifiers, to = ?modifiers, "modifiers changed");
        self.modifiers = modifiers;
        let state = std::mem::take(&mut self.state);
        let next = state.clone().accept_modifier_change(modifiers, &self.bindings);
        self.settle(state, next)
    }

    /// A click with `button` at `point`.
    pub fn on_click(&mut self, button: MouseButton, point: Point) -> Enacted<T> {
        tracing::trace!(target: "crafty.chord", ?button, x = point.x, y = point.y, "click");
        let state = std::mem::take(&mut self.state);
        let step = state.clone().accept_click(button, self.modifiers, &self.bindings);
        self.apply(state, step, &Activation::Click { point })
    }

    /// A completed drag with `button` from `start` to `end`.
    pub fn on_drag(&mut self, button: MouseButton, start: Point, end: Point) -> Enacted<T> {
        tracing::trace!(
            target: "crafty.chord",
            ?button,
            start_x = start.x,
            start_y = start.y,
            end_x = end.x,
            end_y = end.y,
            "drag"
        );
        let state = std::mem::take(&mut self.state);
        let step = state.clone().accept_drag(button, self.modifiers, &self.bindings);
        self.apply(state, step, &Activation::drag(start, end))
    }

    fn settle(&mut self, before: ChordsetState, next: ChordsetState) -> bool {
        let changed = before != next;
        if changed {
            tracing::debug!(
                target: "crafty.chord",
                from = before.name(),
                to = next.name(),
                "chordset transition"
            );
        }
        self.state = next;
        changed
    }

    fn apply(&mut self, before: ChordsetState, step: Transition, activation: &Activation) -> Enacted<T> {
        let changed = self.settle(before, step.state);
        if step.fire.is_empty() {
            return Enacted::unhandled().with_handled(changed);
        }
        let mut out = Enacted::unhandled();
        for i in step.fire {
            let binding = &self.bindings[i];
            tracing::debug!(target: "crafty.chord", cmd = binding.cmd(), "chord fired");
            let result = (self.handlers[i])(binding, activation);
            out = out.merge(result);
        }
        out
    }
}
