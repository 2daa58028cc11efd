#![forbid(unsafe_code)]

//! The tool driver.
//!
//! [`Tool`] is the single long-lived object the host calls into. It routes
//! every host callback to the current [`Mode`] or its chordset, applies the
//! resulting [`Transition`], and keeps the status bar and measurement box in
//! sync with the mode.
//!
//! # Clicks and drags
//!
//! Button presses only record their origin. On release, a pointer within
//! the click slop distance of the press is a click: it goes to
//! [`Mode::on_return`] when the mode returns on left click, otherwise to the
//! chordset. A release farther away completes a drag, which fires drag
//! chords unless the mode returns on left click. While a button is held,
//! mouse moves within the slop distance still reach the mode; farther moves
//! only track the drag rectangle.
//!
//! # Sessions
//!
//! [`Tool::activate`] starts a session with the mode built by the activator.
//! [`Transition::EndOfOperation`] or a host cancel ends it: the mode is
//! deactivated, status and measurement box are cleared, and the tool is
//! released. Events arriving between sessions are ignored.

use std::fmt;

use crafty_core::chord::MouseButton;
use crafty_core::chordset::Chordset;
use crafty_core::config::InputConfig;
use crafty_core::event::Enacted;
use crafty_core::geometry::{Bounds2, Extents, Point};

use crate::mode::{Mode, ModeChordset, ToolContext, Transition, VcbState};
use crate::view::{CancelReason, LineStyle, Primitive, Stipple, View};

type Activator = Box<dyn FnMut(&mut ToolContext) -> Box<dyn Mode>>;

/// Drives one interactive tool.
pub struct Tool {
    activator: Activator,
    mode: Option<Box<dyn Mode>>,
    ctx: ToolContext,
    empty_chordset: ModeChordset,
    vcb: VcbState,
    status_text: String,
    l_down: Option<Point>,
    r_down: Option<Point>,
    drag_rect: Option<Bounds2>,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("mode", &self.mode.as_ref().map(|m| m.name()))
            .field("ctx", &self.ctx)
            .field("vcb", &self.vcb)
            .field("status_text", &self.status_text)
            .field("drag_rect", &self.drag_rect)
            .finish_non_exhaustive()
    }
}

impl Tool {
    /// Create a tool whose sessions start with the mode `activator` builds.
    pub fn new<F>(config: InputConfig, activator: F) -> Self
    where
        F: FnMut(&mut ToolContext) -> Box<dyn Mode> + 'static,
    {
        let empty_chordset = Chordset::for_platform(config.platform, std::iter::empty());
        Self {
            activator: Box::new(activator),
            mode: None,
            ctx: ToolContext::new(config),
            empty_chordset,
            vcb: VcbState::NULL,
            status_text: String::new(),
            l_down: None,
            r_down: None,
            drag_rect: None,
        }
    }

    /// Whether a session is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    /// The current mode, if a session is in progress.
    #[must_use]
    pub fn mode(&self) -> Option<&dyn Mode> {
        self.mode.as_deref()
    }

    #[must_use]
    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    /// Bounds of interest for viewport framing.
    #[must_use]
    pub fn extents(&self) -> &Extents {
        &self.ctx.extents
    }

    /// Whether the measurement box should accept input.
    #[must_use]
    pub fn vcb_enabled(&self) -> bool {
        self.vcb.enabled
    }

    /// The status text last pushed to the host.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The drag rectangle being tracked, if any.
    #[must_use]
    pub fn drag_rect(&self) -> Option<Bounds2> {
        self.drag_rect
    }

    /// Start a session. An active session is ended first.
    pub fn activate(&mut self, view: &mut dyn View) {
        if self.mode.is_some() {
            self.end_session(view);
        }
        let mut mode = (self.activator)(&mut self.ctx);
        tracing::info!(target: "crafty.tool", mode = mode.name(), "tool session started");
        mode.activate_mode(&mut self.ctx, None, view);
        self.mode = Some(mode);
        self.update_ui(view, true);
    }

    /// The host deactivated the tool.
    pub fn deactivate(&mut self, view: &mut dyn View) {
        self.on_cancel(None, view);
        view.invalidate();
    }

    /// The host cancelled the tool.
    pub fn on_cancel(&mut self, reason: Option<CancelReason>, view: &mut dyn View) {
        if self.mode.is_some() {
            tracing::debug!(target: "crafty.tool", ?reason, "tool cancelled");
        }
        self.apply(Transition::EndOfOperation, view);
    }

    /// The host suspended the tool (e.g. for a view-navigation tool).
    pub fn suspend(&mut self, view: &mut dyn View) {
        let Some(mode) = self.mode.as_mut() else {
            return;
        };
        active_chordset(mode, &mut self.empty_chordset).reset();
        let next = mode.on_suspend(&mut self.ctx, view);
        self.apply(next, view);
        view.invalidate();
    }

    /// The host resumed the tool.
    pub fn resume(&mut self, view: &mut dyn View) {
        let Some(mode) = self.mode.as_mut() else {
            return;
        };
        active_chordset(mode, &mut self.empty_chordset).reset();
        let next = mode.on_resume(&mut self.ctx, view);
        self.apply(next, view);
        self.update_ui(view, true);
        view.invalidate();
    }

    pub fn on_l_button_down(&mut self, x: f64, y: f64) {
        if self.mode.is_some() {
            self.l_down = Some(Point::new(x, y));
        }
    }

    pub fn on_r_button_down(&mut self, x: f64, y: f64) {
        if self.mode.is_some() {
            self.r_down = Some(Point::new(x, y));
        }
    }

    pub fn on_l_button_up(&mut self, x: f64, y: f64, view: &mut dyn View) {
        let Some(start) = self.l_down.take() else {
            return;
        };
        self.clear_drag_rect(view);
        let Some(mode) = self.mode.as_mut() else {
            return;
        };
        let end = Point::new(x, y);
        let is_click = end.distance(start) <= self.ctx.config.click_slop_distance;
        let next = if mode.return_on_l_click() {
            if is_click {
                mode.on_return(&mut self.ctx, view)
            } else {
                Transition::Stay
            }
        } else {
            let chordset = active_chordset(mode, &mut self.empty_chordset);
            let out = if is_click {
                chordset.on_click(MouseButton::Left, start)
            } else {
                chordset.on_drag(MouseButton::Left, start, end)
            };
            into_transition(out)
        };
        self.apply(next, view);
    }

    pub fn on_r_button_up(&mut self, x: f64, y: f64, view: &mut dyn View) {
        let Some(start) = self.r_down.take() else {
            return;
        };
        self.clear_drag_rect(view);
        let Some(mode) = self.mode.as_mut() else {
            return;
        };
        let end = Point::new(x, y);
        let chordset = active_chordset(mode, &mut self.empty_chordset);
        let out = if end.distance(start) <= self.ctx.config.click_slop_distance {
            chordset.on_click(MouseButton::Right, start)
        } else {
            chordset.on_drag(MouseButton::Right, start, end)
        };
        self.apply(into_transition(out), view);
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64, view: &mut dyn View) {
        if self.mode.is_none() {
            return;
        }
        let cur = Point::new(x, y);
        let dragging_from = self
            .l_down
            .or(self.r_down)
            .filter(|start| cur.distance(*start) > self.ctx.config.click_slop_distance);
        match dragging_from {
            Some(start) => {
                self.drag_rect = Some(Bounds2::from_points(start, cur));
                view.invalidate();
            }
            None => {
                self.clear_drag_rect(view);
                let Some(mode) = self.mode.as_mut() else {
                    return;
                };
                let next = mode.on_mouse_move(&mut self.ctx, x, y, view);
                self.apply(next, view);
            }
        }
    }

    /// Returns whether the key was consumed. Auto-repeats are ignored.
    pub fn on_key_down(&mut self, code: u32, repeat: u32, view: &mut dyn View) -> bool {
        if repeat > 1 {
            return false;
        }
        let Some(mode) = self.mode.as_mut() else {
            return false;
        };
        let handled = active_chordset(mode, &mut self.empty_chordset).on_key_down(code);
        self.update_ui(view, false);
        handled
    }

    /// Returns whether the key was consumed. Auto-repeats are ignored.
    pub fn on_key_up(&mut self, code: u32, repeat: u32, view: &mut dyn View) -> bool {
        if repeat > 1 {
            return false;
        }
        let Some(mode) = self.mode.as_mut() else {
            return false;
        };
        let out = active_chordset(mode, &mut self.empty_chordset).on_key_up(code);
        let handled = out.handled;
        self.apply(into_transition(out), view);
        handled
    }

    /// Enter pressed with nothing typed.
    pub fn on_return(&mut self, view: &mut dyn View) {
        let Some(mode) = self.mode.as_mut() else {
            return;
        };
        let next = mode.on_return(&mut self.ctx, view);
        self.apply(next, view);
    }

    /// Text confirmed in the measurement box.
    pub fn on_user_text(&mut self, text: &str, view: &mut dyn View) {
        let Some(mode) = self.mode.as_mut() else {
            return;
        };
        let next = mode.on_value(&mut self.ctx, text, view);
        self.apply(next, view);
    }

    pub fn draw(&self, view: &mut dyn View) {
        match (self.drag_rect, self.mode.as_deref()) {
            (Some(rect), _) => {
                let style = LineStyle::default().with_stipple(Stipple::LongDashed);
                view.draw_2d(Primitive::LineLoop, &rect.corners(), &style);
            }
            (None, Some(mode)) => mode.draw(&self.ctx, view),
            (None, None) => {}
        }
    }

    /// Apply a transition requested by a mode or chord.
    pub fn apply(&mut self, transition: Transition, view: &mut dyn View) {
        match transition {
            Transition::Stay => self.update_ui(view, false),
            Transition::Reject => {
                view.beep();
                self.update_ui(view, false);
            }
            Transition::To(next) => self.switch_to(next, view),
            Transition::EndOfOperation => self.end_session(view),
        }
    }

    fn switch_to(&mut self, mut next: Box<dyn Mode>, view: &mut dyn View) {
        let Some(mut current) = self.mode.take() else {
            return;
        };
        current.deactivate_mode(&mut self.ctx, Some(next.as_ref()), view);
        next.activate_mode(&mut self.ctx, Some(current.as_ref()), view);
        tracing::debug!(
            target: "crafty.tool",
            from = current.name(),
            to = next.name(),
            "mode transition"
        );
        self.mode = Some(next);
        self.update_ui(view, false);
    }

    fn end_session(&mut self, view: &mut dyn View) {
        let Some(mut current) = self.mode.take() else {
            return;
        };
        current.deactivate_mode(&mut self.ctx, None, view);
        tracing::info!(target: "crafty.tool", mode = current.name(), "tool session ended");
        self.l_down = None;
        self.r_down = None;
        self.drag_rect = None;
        self.vcb = VcbState::NULL;
        self.status_text.clear();
        self.empty_chordset.reset();
        view.set_status_text(None);
        view.set_vcb_label(None);
        view.set_vcb_value(None);
        view.release_tool();
    }

    fn update_ui(&mut self, view: &mut dyn View, force: bool) {
        let Some(mode) = self.mode.as_deref() else {
            return;
        };
        let vcb = mode.vcb();
        if force || vcb != self.vcb {
            view.set_vcb_label(Some(&vcb.label));
            view.set_vcb_value(Some(&vcb.value));
            self.vcb = vcb;
        }

        let chord_help = mode
            .chordset()
            .unwrap_or(&self.empty_chordset)
            .status();
        let status = [mode.status().unwrap_or_default(), chord_help]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(self.ctx.config.status_separator.as_str());
        if force || status != self.status_text {
            view.set_status_text(Some(&status));
            self.status_text = status;
        }
    }

    fn clear_drag_rect(&mut self, view: &mut dyn View) {
        if self.drag_rect.take().is_some() {
            view.invalidate();
        }
    }
}

fn active_chordset<'a>(
    mode: &'a mut Box<dyn Mode>,
    empty: &'a mut ModeChordset,
) -> &'a mut ModeChordset {
    match mode.chordset_mut() {
        Some(chordset) => chordset,
        None => empty,
    }
}

fn into_transition(out: Enacted<Transition>) -> Transition {
    out.transition.unwrap_or(Transition::Stay)
}
