#![forbid(unsafe_code)]

//! The chordset input state machine.
//!
//! [`ChordsetState`] tracks partially matched key sequences between discrete
//! key and mouse events. Every transition is a pure function of the current
//! state, the input, the live modifier mask, and the chord bindings; firing
//! is reported back as chord indices so the owner can run the handlers.
//!
//! # State Machine
//!
//! ```text
//!             key (prefix of a chord)            key up (keys remain)
//!   ┌──────┐ ───────────────────────▶ ┌──────────────┐ ───────────▶ ┌────────────┐
//!   │ Idle │                          │ KeychordDown │              │ KeychordUp │
//!   └──────┘ ◀─────────────────────────────────────────────────────── └────────────┘
//!     ▲  │        last key up, ≥1 chord matched (fire)                 │       │
//!     │  │ key (no prefix)                           key, nothing held │       │
//!     │  ▼                                       (next sequence step)  │       │
//!   ┌─────────┐ ◀──── click / unexpected key / no reachable chord ─────┘       │
//!   │ DeadEnd │                                                                │
//!   └─────────┘  all keys up and no modifiers ──▶ Idle                         │
//!                                            KeychordDown ◀────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. Modifier changes never fire a chord; they only re-filter reachability.
//! 2. A click while a key chord is in progress always aborts to `DeadEnd`.
//! 3. Key chords fire on release of the last held key, and every matching
//!    chord fires, not only the first.
//! 4. `DeadEnd` is left only once no keys are held and no modifiers are
//!    down. A dead end entered with that condition already met collapses
//!    to `Idle` immediately.

use std::collections::BTreeSet;

use crate::chord::{ChordBinding, MouseButton, Trigger};
use crate::keys::{Key, Modifiers};

/// The set of non-modifier keys currently held.
pub type DownKeys = BTreeSet<Key>;

/// Input-tracking state of a chordset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChordsetState {
    /// No keys held; the resting state.
    #[default]
    Idle,

    /// Keys held that are a valid prefix of step `index` of the
    /// `reachable` chords.
    KeychordDown {
        down: DownKeys,
        reachable: Vec<usize>,
        index: usize,
    },

    /// Some keys of step `index` were released. `initial` is the full set
    /// that was held; `down` what remains.
    KeychordUp {
        initial: DownKeys,
        down: DownKeys,
        reachable: Vec<usize>,
        index: usize,
    },

    /// No chord can match; absorbs input until everything is released.
    DeadEnd { down: DownKeys },
}

/// A state transition that may complete chords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next state.
    pub state: ChordsetState,
    /// Indices of the chords to fire, in list order.
    pub fire: Vec<usize>,
}

impl From<ChordsetState> for Transition {
    fn from(state: ChordsetState) -> Self {
        Self {
            state,
            fire: Vec::new(),
        }
    }
}

impl ChordsetState {
    /// Short state name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::KeychordDown { .. } => "KeychordDown",
            Self::KeychordUp { .. } => "KeychordUp",
            Self::DeadEnd { .. } => "DeadEnd",
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_dead_end(&self) -> bool {
        matches!(self, Self::DeadEnd { .. })
    }

    /// Keys currently tracked as held.
    #[must_use]
    pub fn down_keys(&self) -> Option<&DownKeys> {
        match self {
            Self::Idle => None,
            Self::KeychordDown { down, .. }
            | Self::KeychordUp { down, .. }
            | Self::DeadEnd { down } => Some(down),
        }
    }

    /// Indices of the chords still reachable with further input.
    ///
    /// In `Idle` every enabled chord is reachable; in `DeadEnd` none are.
    #[must_use]
    pub fn reachable(&self, chords: &[ChordBinding]) -> Vec<usize> {
        match self {
            Self::Idle => chords
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_enabled())
                .map(|(i, _)| i)
                .collect(),
            Self::KeychordDown { reachable, .. } | Self::KeychordUp { reachable, .. } => {
                reachable.clone()
            }
            Self::DeadEnd { .. } => Vec::new(),
        }
    }

    /// Process a non-modifier key press.
    #[must_use]
    pub fn accept_key_down(
        self,
        key: Key,
        modifiers: Modifiers,
        chords: &[ChordBinding],
    ) -> ChordsetState {
        match self {
            Self::Idle => from_down_keys(0..chords.len(), chords, modifiers, [key].into(), 0),
            Self::KeychordDown {
                mut down,
                reachable,
                index,
            } => {
                down.insert(key);
                from_down_keys(reachable, chords, modifiers, down, index)
            }
            Self::KeychordUp {
                mut down,
                reachable,
                index,
                ..
            } => {
                if down.is_empty() {
                    // Start of the next step of a multi-step sequence.
                    from_down_keys(reachable, chords, modifiers, [key].into(), index + 1)
                } else {
                    down.insert(key);
                    dead_end(down, modifiers)
                }
            }
            Self::DeadEnd { mut down } => {
                down.insert(key);
                Self::DeadEnd { down }
            }
        }
    }

    /// Process a non-modifier key release.
    #[must_use]
    pub fn accept_key_up(
        self,
        key: Key,
        modifiers: Modifiers,
        chords: &[ChordBinding],
    ) -> Transition {
        match self {
            Self::Idle => Self::Idle.into(),
            Self::KeychordDown {
                mut down,
                reachable,
                index,
            } => {
                if !down.contains(&key) {
                    return dead_end(down, modifiers).into();
                }
                let initial = down.clone();
                down.remove(&key);
                Self::KeychordUp {
                    initial,
                    down,
                    reachable,
                    index,
                }
                .settle_release(modifiers, chords)
            }
            Self::KeychordUp {
                initial,
                mut down,
                reachable,
                index,
            } => {
                if !down.remove(&key) {
                    return dead_end(down, modifiers).into();
                }
                Self::KeychordUp {
                    initial,
                    down,
                    reachable,
                    index,
                }
                .settle_release(modifiers, chords)
            }
            Self::DeadEnd { mut down } => {
                down.remove(&key);
                dead_end(down, modifiers).into()
            }
        }
    }

    /// Process a plain click.
    ///
    /// In `Idle`, every enabled chord bound to `button` with exactly the
    /// current modifiers fires. A click during a key chord aborts it.
    #[must_use]
    pub fn accept_click(
        self,
        button: MouseButton,
        modifiers: Modifiers,
        chords: &[ChordBinding],
    ) -> Transition {
        self.accept_pointer(&Trigger::Click(button), modifiers, chords)
    }

    /// Process a completed drag. Same rules as [`accept_click`](Self::accept_click).
    #[must_use]
    pub fn accept_drag(
        self,
        button: MouseButton,
        modifiers: Modifiers,
        chords: &[ChordBinding],
    ) -> Transition {
        self.accept_pointer(&Trigger::Drag(button), modifiers, chords)
    }

    fn accept_pointer(
        self,
        trigger: &Trigger,
        modifiers: Modifiers,
        chords: &[ChordBinding],
    ) -> Transition {
        match self {
            Self::Idle => Transition {
                state: Self::Idle,
                fire: chords
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.matches_pointer(modifiers, trigger))
                    .map(|(i, _)| i)
                    .collect(),
            },
            Self::KeychordDown { down, .. } | Self::KeychordUp { down, .. } => {
                dead_end(down, modifiers).into()
            }
            Self::DeadEnd { .. } => self.into(),
        }
    }

    /// Re-evaluate after the modifier mask changed to `modifiers`.
    #[must_use]
    pub fn accept_modifier_change(
        self,
        modifiers: Modifiers,
        chords: &[ChordBinding],
    ) -> ChordsetState {
        match self {
            Self::Idle => Self::Idle,
            Self::KeychordDown {
                down,
                reachable,
                index,
            } => from_down_keys(reachable, chords, modifiers, down, index),
            Self::KeychordUp {
                initial,
                down,
                reachable,
                index,
            } => {
                let reachable: Vec<usize> = reachable
                    .into_iter()
                    .filter(|&i| chords[i].accepts_step(modifiers, &initial, index))
                    .collect();
                if reachable.is_empty() {
                    dead_end(down, modifiers)
                } else {
                    Self::KeychordUp {
                        initial,
                        down,
                        reachable,
                        index,
                    }
                }
            }
            Self::DeadEnd { down } => dead_end(down, modifiers),
        }
    }

    /// Fire matching chords once every key of a `KeychordUp` is released.
    fn settle_release(self, modifiers: Modifiers, chords: &[ChordBinding]) -> Transition {
        let Self::KeychordUp {
            initial,
            down,
            reachable,
            index,
        } = self
        else {
            return self.into();
        };
        if !down.is_empty() {
            return Self::KeychordUp {
                initial,
                down,
                reachable,
                index,
            }
            .into();
        }
        let fire: Vec<usize> = reachable
            .iter()
            .copied()
            .filter(|&i| chords[i].is_enabled() && chords[i].matches(modifiers, &initial, index))
            .collect();
        if fire.is_empty() {
            // Wait for the next step of a longer sequence.
            Self::KeychordUp {
                initial,
                down,
                reachable,
                index,
            }
            .into()
        } else {
            Transition {
                state: Self::Idle,
                fire,
            }
        }
    }
}

/// Enter `KeychordDown` for the candidates still reachable with `down` held
/// at step `index`, or `DeadEnd` if there are none.
fn from_down_keys(
    candidates: impl IntoIterator<Item = usize>,
    chords: &[ChordBinding],
    modifiers: Modifiers,
    down: DownKeys,
    index: usize,
) -> ChordsetState {
    let reachable: Vec<usize> = candidates
        .into_iter()
        .filter(|&i| chords[i].accepts_step(modifiers, &down, index))
        .collect();
    if reachable.is_empty() {
        dead_end(down, modifiers)
    } else {
        ChordsetState::KeychordDown {
            down,
            reachable,
            index,
        }
    }
}

fn dead_end(down: DownKeys, modifiers: Modifiers) -> ChordsetState {
    if down.is_empty() && modifiers.is_empty() {
        ChordsetState::Idle
    } else {
        ChordsetState::DeadEnd { down }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::Chord;
    use crate::event::Enacted;

    const A: Key = Key::Char('A');
    const B: Key = Key::Char('B');
    const C: Key = Key::Char('C');

    fn keys(cmd: &str, steps: Vec<Vec<Key>>, modifiers: Modifiers) -> ChordBinding {
        Chord::<()>::on_keys(cmd, cmd, steps, |_, _| Enacted::handled())
            .unwrap()
            .with_modifiers(modifiers)
            .binding()
            .clone()
    }

    fn click(cmd: &str, button: MouseButton, modifiers: Modifiers) -> ChordBinding {
        Chord::<()>::on_click(button, cmd, cmd, |_, _| Enacted::handled())
            .with_modifiers(modifiers)
            .binding()
            .clone()
    }

    #[test]
    fn single_key_fires_on_release() {
        let chords = [keys("a", vec![vec![A]], Modifiers::NONE)];
        let s = ChordsetState::Idle.accept_key_down(A, Modifiers::NONE, &chords);
        assert_eq!(s.name(), "KeychordDown");
        let t = s.accept_key_up(A, Modifiers::NONE, &chords);
        assert_eq!(t.state, ChordsetState::Idle);
        assert_eq!(t.fire, vec![0]);
    }

    #[test]
    fn unknown_key_dead_ends_until_released() {
        let chords = [keys("a", vec![vec![A]], Modifiers::NONE)];
        let s = ChordsetState::Idle.accept_key_down(B, Modifiers::NONE, &chords);
        assert!(s.is_dead_end());
        let s = s.accept_key_down(A, Modifiers::NONE, &chords);
        let t = s.accept_key_up(B, Modifiers::NONE, &chords);
        assert!(t.state.is_dead_end());
        assert!(t.fire.is_empty());
        let t = t.state.accept_key_up(A, Modifiers::NONE, &chords);
        assert!(t.state.is_idle());
        assert!(t.fire.is_empty());
    }

    #[test]
    fn dead_end_waits_for_modifiers() {
        let chords = [keys("a", vec![vec![A]], Modifiers::NONE)];
        let s = ChordsetState::Idle.accept_key_down(A, Modifiers::SHIFT, &chords);
        assert!(s.is_dead_end());
        let t = s.accept_key_up(A, Modifiers::SHIFT, &chords);
        assert!(t.state.is_dead_end());
        let s = t.state.accept_modifier_change(Modifiers::NONE, &chords);
        assert!(s.is_idle());
    }

    #[test]
    fn two_key_chord_requires_both_then_fires_on_last_release() {
        let chords = [keys("ab", vec![vec![A, B]], Modifiers::NONE)];
        let m = Modifiers::NONE;
        let s = ChordsetState::Idle
            .accept_key_down(A, m, &chords)
            .accept_key_down(B, m, &chords);
        let t = s.accept_key_up(A, m, &chords);
        assert_eq!(t.state.name(), "KeychordUp");
        assert!(t.fire.is_empty());
        let t = t.state.accept_key_up(B, m, &chords);
        assert!(t.state.is_idle());
        assert_eq!(t.fire, vec![0]);
    }

    #[test]
    fn extra_key_breaks_the_chord() {
        let chords = [keys("ab", vec![vec![A, B]], Modifiers::NONE)];
        let m = Modifiers::NONE;
        let s = ChordsetState::Idle
            .accept_key_down(A, m, &chords)
            .accept_key_down(C, m, &chords);
        assert!(s.is_dead_end());
    }

    #[test]
    fn sequence_advances_through_steps() {
        let chords = [keys("seq", vec![vec![A], vec![B]], Modifiers::NONE)];
        let m = Modifiers::NONE;
        let s = ChordsetState::Idle.accept_key_down(A, m, &chords);
        let t = s.accept_key_up(A, m, &chords);
        assert!(t.fire.is_empty());
        assert_eq!(t.state.name(), "KeychordUp");
        let s = t.state.accept_key_down(B, m, &chords);
        assert!(matches!(s, ChordsetState::KeychordDown { index: 1, .. }));
        let t = s.accept_key_up(B, m, &chords);
        assert_eq!(t.fire, vec![0]);
        assert!(t.state.is_idle());
    }

    #[test]
    fn key_pressed_while_releasing_dead_ends() {
        let chords = [keys("ab", vec![vec![A, B]], Modifiers::NONE)];
        let m = Modifiers::NONE;
        let t = ChordsetState::Idle
            .accept_key_down(A, m, &chords)
            .accept_key_down(B, m, &chords)
            .accept_key_up(A, m, &chords);
        let s = t.state.accept_key_down(A, m, &chords);
        assert_eq!(
            s,
            ChordsetState::DeadEnd {
                down: [A, B].into()
            }
        );
    }

    #[test]
    fn click_during_key_chord_dead_ends() {
        let chords = [
            keys("a", vec![vec![A]], Modifiers::NONE),
            click("pick", MouseButton::Left, Modifiers::NONE),
        ];
        let m = Modifiers::NONE;
        let s = ChordsetState::Idle.accept_key_down(A, m, &chords);
        let t = s.accept_click(MouseButton::Left, m, &chords);
        assert!(t.state.is_dead_end());
        assert!(t.fire.is_empty());
    }

    #[test]
    fn idle_click_fires_all_matching_in_order() {
        let chords = [
            click("one", MouseButton::Left, Modifiers::NONE),
            click("ctrl", MouseButton::Left, Modifiers::CTRL_CMD),
            click("right", MouseButton::Right, Modifiers::NONE),
            click("two", MouseButton::Left, Modifiers::NONE),
        ];
        let t = ChordsetState::Idle.accept_click(MouseButton::Left, Modifiers::NONE, &chords);
        assert_eq!(t.fire, vec![0, 3]);
        let t = ChordsetState::Idle.accept_click(MouseButton::Left, Modifiers::CTRL_CMD, &chords);
        assert_eq!(t.fire, vec![1]);
    }

    #[test]
    fn modifier_release_mid_chord_dead_ends() {
        let chords = [keys("ctrl-a", vec![vec![A]], Modifiers::CTRL_CMD)];
        let s = ChordsetState::Idle.accept_key_down(A, Modifiers::CTRL_CMD, &chords);
        assert_eq!(s.name(), "KeychordDown");
        let s = s.accept_modifier_change(Modifiers::NONE, &chords);
        assert!(s.is_dead_end());
        let t = s.accept_key_up(A, Modifiers::NONE, &chords);
        assert!(t.state.is_idle());
        assert!(t.fire.is_empty());
    }

    #[test]
    fn reachable_lists() {
        let mut disabled = keys("b", vec![vec![B]], Modifiers::NONE);
        disabled.set_enabled(false);
        let chords = [keys("a", vec![vec![A]], Modifiers::NONE), disabled];
        assert_eq!(ChordsetState::Idle.reachable(&chords), vec![0]);
        let s = ChordsetState::Idle.accept_key_down(A, Modifiers::NONE, &chords);
        assert_eq!(s.reachable(&chords), vec![0]);
        let dead = ChordsetState::DeadEnd { down: [C].into() };
        assert!(dead.reachable(&chords).is_empty());
    }
}
