#![forbid(unsafe_code)]

//! Interaction modes.
//!
//! A [`Mode`] is one step of a tool's workflow (pick a face, pick a
//! thickness, pick an offset). The [`Tool`](crate::tool::Tool) owns exactly
//! one current mode and swaps it whenever a callback or chord answers with
//! a [`Transition`].
//!
//! # Lifecycle
//!
//! ```text
//! activate_mode(previous) ──▶ callbacks … ──▶ deactivate_mode(next)
//! ```
//!
//! `activate_mode` runs once when a mode becomes current, receiving the
//! outgoing mode (`None` for the first mode of a session). `deactivate_mode`
//! runs once when it is superseded, receiving the incoming mode (`None` when
//! the session ends).

use std::fmt;

use crafty_core::chordset::Chordset;
use crafty_core::config::InputConfig;
use crafty_core::geometry::Extents;

use crate::view::View;

/// Chordset type owned by modes. Handlers answer with a [`Transition`].
pub type ModeChordset = Chordset<Transition>;

/// What the tool should do after a mode callback.
pub enum Transition {
    /// Keep the current mode.
    Stay,
    /// Replace the current mode.
    To(Box<dyn Mode>),
    /// Keep the current mode and beep: the input was refused.
    Reject,
    /// End the interactive session and release the tool.
    EndOfOperation,
}

impl Transition {
    /// Shorthand for `Transition::To(Box::new(mode))`.
    pub fn to(mode: impl Mode + 'static) -> Self {
        Self::To(Box::new(mode))
    }

    #[must_use]
    pub const fn is_stay(&self) -> bool {
        matches!(self, Self::Stay)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stay => f.write_str("Stay"),
            Self::To(mode) => f.debug_tuple("To").field(&mode.name()).finish(),
            Self::Reject => f.write_str("Reject"),
            Self::EndOfOperation => f.write_str("EndOfOperation"),
        }
    }
}

/// Measurement box state requested by a mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VcbState {
    /// Whether the box accepts typed input.
    pub enabled: bool,
    pub label: String,
    pub value: String,
}

impl VcbState {
    /// Disabled and blank.
    pub const NULL: Self = Self {
        enabled: false,
        label: String::new(),
        value: String::new(),
    };

    /// Disabled, showing `label` with no value.
    #[must_use]
    pub fn disabled(label: impl Into<String>) -> Self {
        Self {
            enabled: false,
            label: label.into(),
            value: String::new(),
        }
    }

    /// Accepting input, showing `label` and `value`.
    #[must_use]
    pub fn enabled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: true,
            label: label.into(),
            value: value.into(),
        }
    }
}

/// State owned by the tool that modes may read and update.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Region of interest, used by the host to frame the viewport.
    pub extents: Extents,
    pub config: InputConfig,
}

impl ToolContext {
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            extents: Extents::new(),
            config,
        }
    }
}

/// One step of an interactive tool.
///
/// Every method has a default: no chords, no status, a null measurement
/// box, and callbacks that keep the current mode.
#[allow(unused_variables)]
pub trait Mode {
    /// Name used in logs: the type name without its path or generic
    /// arguments.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Chords applicable to this mode. `None` behaves as an empty chordset.
    fn chordset(&self) -> Option<&ModeChordset> {
        None
    }

    fn chordset_mut(&mut self) -> Option<&mut ModeChordset> {
        None
    }

    /// When `true`, a plain left click calls [`on_return`](Self::on_return)
    /// instead of going through the chordset.
    fn return_on_l_click(&self) -> bool {
        false
    }

    /// Status bar message.
    fn status(&self) -> Option<String> {
        None
    }

    fn vcb(&self) -> VcbState {
        VcbState::NULL
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, previous: Option<&dyn Mode>, view: &mut dyn View) {}

    fn deactivate_mode(&mut self, ctx: &mut ToolContext, next: Option<&dyn Mode>, view: &mut dyn View) {}

    fn on_suspend(&mut self, ctx: &mut ToolContext, view: &mut dyn View) -> Transition {
        Transition::Stay
    }

    fn on_resume(&mut self, ctx: &mut ToolContext, view: &mut dyn View) -> Transition {
        Transition::Stay
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext, x: f64, y: f64, view: &mut dyn View) -> Transition {
        Transition::Stay
    }

    /// Confirm the current input (Enter, or a left click when
    /// [`return_on_l_click`](Self::return_on_l_click) is set).
    fn on_return(&mut self, ctx: &mut ToolContext, view: &mut dyn View) -> Transition {
        Transition::Stay
    }

    /// Text typed into the measurement box.
    fn on_value(&mut self, ctx: &mut ToolContext, text: &str, view: &mut dyn View) -> Transition {
        Transition::Stay
    }

    fn draw(&self, ctx: &ToolContext, view: &mut dyn View) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Mode for Plain {}

    #[test]
    fn default_name_is_the_type_name() {
        assert_eq!(Plain.name(), "Plain");
    }

    struct Wrapper<T>(std::marker::PhantomData<T>);
    impl<T> Mode for Wrapper<T> {}

    #[test]
    fn default_name_drops_generic_arguments() {
        let mode = Wrapper::<std::collections::HashMap<String, Vec<u8>>>(std::marker::PhantomData);
        assert_eq!(mode.name(), "Wrapper");
    }

    #[test]
    fn defaults_are_inert() {
        let mode = Plain;
        assert!(mode.chordset().is_none());
        assert!(!mode.return_on_l_click());
        assert_eq!(mode.vcb(), VcbState::NULL);
        assert!(mode.status().is_none());
    }

    #[test]
    fn transition_debug_names_the_mode() {
        assert_eq!(format!("{:?}", Transition::to(Plain)), "To(\"Plain\")");
        assert_eq!(format!("{:?}", Transition::EndOfOperation), "EndOfOperation");
        assert_eq!(format!("{:?}", Transition::Reject), "Reject");
    }

    #[test]
    fn only_stay_is_stay() {
        assert!(Transition::Stay.is_stay());
        assert!(!Transition::Reject.is_stay());
        assert!(!Transition::to(Plain).is_stay());
        assert!(!Transition::EndOfOperation.is_stay());
    }
}
