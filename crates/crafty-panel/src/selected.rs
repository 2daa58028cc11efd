#![forbid(unsafe_code)]

//! Second step: choose the panel thickness.
//!
//! The thickness is measured from the face center along the face normal,
//! either by pointing or by typing it. Typed values grow the panel into the
//! solid, so a positive entry is stored as a negative thickness.

use crafty_core::chord::Chord;
use crafty_core::event::Enacted;
use crafty_core::geometry::Vector3;
use crafty_core::keys::Key;
use crafty_tool::{
    Color, LineStyle, Mode, ModeChordset, Primitive, Stipple, ToolContext, Transition, VcbState,
    View, draw_outline,
};

use crate::kernel::{FaceInfo, ModelingKernel, PanelSession};
use crate::length::{LengthUnit, format_inches, parse_length};
use crate::targeting::Targeting;
use crate::unselected::Unselected;

pub const STATUS: &str = "Select a point to indicate panel thickness";
pub const VCB_LABEL: &str = "Thickness";

/// Tracks the thickness under the cursor for a chosen face.
pub struct Selected<K: ModelingKernel> {
    session: PanelSession<K>,
    face: FaceInfo<K::Face>,
    thickness: Option<f64>,
    chords: ModeChordset,
}

impl<K: ModelingKernel + 'static> Selected<K> {
    #[must_use]
    pub fn new(session: PanelSession<K>, face: FaceInfo<K::Face>) -> Self {
        Self {
            session,
            face,
            thickness: None,
            chords: ModeChordset::empty(),
        }
    }

    /// Signed thickness along the face normal, if one has been chosen.
    #[must_use]
    pub fn thickness(&self) -> Option<f64> {
        self.thickness
    }

    #[must_use]
    pub fn face(&self) -> &FaceInfo<K::Face> {
        &self.face
    }

    fn offset(&self) -> Option<Vector3> {
        self.thickness
            .filter(|t| *t != 0.0)
            .map(|t| self.face.along_normal(t))
    }

    fn apply_bounds(&self, ctx: &mut ToolContext) {
        ctx.extents = self.face.extents_with_offset(self.offset());
    }

    fn build_chords(&mut self, ctx: &ToolContext) {
        let session = self.session.clone();
        let back = Chord::on_keys("reselect", "Pick another face", [[Key::Escape]], move |_, _| {
            Enacted::transition(Transition::to(Unselected::new(session.clone())))
        });
        match back {
            Ok(chord) => self.chords = ModeChordset::for_platform(ctx.config.platform, [chord]),
            Err(err) => tracing::error!(target: "crafty.panel", %err, "failed to bind Escape"),
        }
    }
}

impl<K: ModelingKernel + 'static> Mode for Selected<K> {
    fn name(&self) -> &'static str {
        "Selected"
    }

    fn chordset(&self) -> Option<&ModeChordset> {
        Some(&self.chords)
    }

    fn chordset_mut(&mut self) -> Option<&mut ModeChordset> {
        Some(&mut self.chords)
    }

    fn return_on_l_click(&self) -> bool {
        true
    }

    fn status(&self) -> Option<String> {
        Some(STATUS.to_owned())
    }

    fn vcb(&self) -> VcbState {
        match self.thickness {
            Some(t) => VcbState::enabled(VCB_LABEL, format_inches(t.abs())),
            None => VcbState::disabled(VCB_LABEL),
        }
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, _previous: Option<&dyn Mode>, view: &mut dyn View) {
        self.build_chords(ctx);
        self.thickness = self.session.sticky().last_thickness.filter(|t| *t != 0.0);
        self.apply_bounds(ctx);
        view.invalidate();
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext, x: f64, y: f64, view: &mut dyn View) -> Transition {
        let projected = self.session.kernel().project_to_normal(&self.face.face, x, y);
        if let Some(point) = projected {
            self.thickness = Some(self.face.distance_along_normal(point));
            self.apply_bounds(ctx);
            view.invalidate();
        }
        Transition::Stay
    }

    fn on_value(&mut self, ctx: &mut ToolContext, text: &str, view: &mut dyn View) -> Transition {
        match parse_length(text, LengthUnit::Inches) {
            Ok(thickness) => {
                self.thickness = Some(if thickness > 0.0 { -thickness } else { thickness });
                self.on_return(ctx, view)
            }
            Err(err) => {
                tracing::debug!(target: "crafty.panel", %err, text, "rejected thickness");
                view.set_tooltip(Some("Invalid thickness"));
                view.beep();
                Transition::Stay
            }
        }
    }

    fn on_return(&mut self, _ctx: &mut ToolContext, view: &mut dyn View) -> Transition {
        match self.thickness.filter(|t| *t != 0.0) {
            Some(thickness) => {
                self.session.remember_thickness(thickness);
                Transition::to(Targeting::new(self.session.clone(), self.face.clone(), thickness))
            }
            None => {
                view.beep();
                Transition::Stay
            }
        }
    }

    fn draw(&self, _ctx: &ToolContext, view: &mut dyn View) {
        let center = LineStyle::default().with_color(Color::BLUE).with_width(10);
        view.draw_3d(Primitive::Points, &[self.face.center], &center);

        let face = LineStyle::default().with_color(Color::RED).with_width(3);
        draw_outline(view, &self.face.outline, Vector3::ZERO, &face);

        if let Some(offset) = self.offset() {
            let preview = LineStyle::default()
                .with_color(Color::BLUE)
                .with_width(5)
                .with_stipple(Stipple::Dashed);
            draw_outline(view, &self.face.outline, offset, &preview);

            let guide = LineStyle::default().with_stipple(Stipple::Dotted);
            let tip = self.face.center.offset(offset);
            view.draw_3d(Primitive::Lines, &[self.face.center, tip], &guide);
        }
    }
}
