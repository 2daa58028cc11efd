#![forbid(unsafe_code)]

//! Final step: place the panel and create it.

use crafty_core::geometry::{Point3, Vector3};
use crafty_tool::operation::wrap_with_undo;
use crafty_tool::{
    Color, LineStyle, Mode, Primitive, Stipple, ToolContext, Transition, VcbState, View,
    draw_outline,
};

use crate::kernel::{FaceInfo, ModelingKernel, PanelSession};
use crate::length::{LengthUnit, format_inches, parse_length};
use crate::unselected::Unselected;

pub const STATUS: &str = "Select a location for the panel's center point.";
pub const VCB_LABEL: &str = "Distance";
/// Undo step name for panel creation.
pub const OPERATION_NAME: &str = "Face to Panel";

/// Moves a preview of the panel with the cursor until a click places it.
pub struct Targeting<K: ModelingKernel> {
    session: PanelSession<K>,
    face: FaceInfo<K::Face>,
    thickness: f64,
    offset: Option<Vector3>,
}

impl<K: ModelingKernel + 'static> Targeting<K> {
    #[must_use]
    pub fn new(session: PanelSession<K>, face: FaceInfo<K::Face>, thickness: f64) -> Self {
        Self {
            session,
            face,
            thickness,
            offset: None,
        }
    }

    /// Offset of the panel from the face, if one has been chosen.
    #[must_use]
    pub fn offset(&self) -> Option<Vector3> {
        self.offset
    }

    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    fn apply_bounds(&self, ctx: &mut ToolContext) {
        ctx.extents = self.face.extents_with_offset(self.offset);
    }

    fn target(&self) -> Option<Point3> {
        self.offset.map(|offset| self.face.center.offset(offset))
    }
}

impl<K: ModelingKernel + 'static> Mode for Targeting<K> {
    fn name(&self) -> &'static str {
        "Targeting"
    }

    fn return_on_l_click(&self) -> bool {
        true
    }

    fn status(&self) -> Option<String> {
        Some(STATUS.to_owned())
    }

    fn vcb(&self) -> VcbState {
        match self.offset {
            Some(offset) => VcbState::enabled(VCB_LABEL, format_inches(offset.length())),
            None => VcbState::disabled(VCB_LABEL),
        }
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, _previous: Option<&dyn Mode>, view: &mut dyn View) {
        let last = self.session.sticky().last_offset;
        self.offset = (!last.is_zero()).then_some(last);
        self.apply_bounds(ctx);
        view.invalidate();
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext, x: f64, y: f64, view: &mut dyn View) -> Transition {
        let picked = self.session.kernel().pick_point(x, y);
        if let Some(point) = picked {
            self.offset = Some(self.face.center.vector_to(point));
            self.apply_bounds(ctx);
            view.invalidate();
        }
        Transition::Stay
    }

    /// A typed distance keeps the current direction, or the face normal
    /// when no direction has been chosen yet.
    fn on_value(&mut self, ctx: &mut ToolContext, text: &str, view: &mut dyn View) -> Transition {
        let distance = match parse_length(text, LengthUnit::Inches) {
            Ok(distance) => distance,
            Err(err) => {
                tracing::debug!(target: "crafty.panel", %err, text, "rejected distance");
                view.set_tooltip(Some("Invalid length"));
                view.beep();
                return Transition::Stay;
            }
        };
        let direction = self
            .offset
            .filter(|v| !v.is_zero())
            .unwrap_or(self.face.normal);
        match direction.with_length(distance) {
            Some(offset) => {
                self.offset = Some(offset);
                self.apply_bounds(ctx);
                view.invalidate();
            }
            None => view.beep(),
        }
        Transition::Stay
    }

    fn on_return(&mut self, _ctx: &mut ToolContext, view: &mut dyn View) -> Transition {
        let offset = self.offset.unwrap_or(Vector3::ZERO);
        let created = {
            let mut kernel = self.session.kernel();
            wrap_with_undo(&mut *kernel, OPERATION_NAME, false, |k| {
                k.create_panel(&self.face.face, self.thickness, offset)
            })
        };
        match created {
            Ok(()) => {
                tracing::info!(
                    target: "crafty.panel",
                    thickness = self.thickness,
                    offset = ?offset,
                    "panel created"
                );
                self.session.remember_offset(offset);
                Transition::to(Unselected::new(self.session.clone()))
            }
            Err(err) => {
                tracing::error!(target: "crafty.panel", %err, "panel creation failed");
                view.beep();
                Transition::Stay
            }
        }
    }

    fn draw(&self, _ctx: &ToolContext, view: &mut dyn View) {
        let Some(offset) = self.offset else {
            return;
        };
        let near = LineStyle::default().with_color(Color::GREEN).with_width(2);
        draw_outline(view, &self.face.outline, offset, &near);
        let far = LineStyle::default().with_color(Color::GREEN);
        draw_outline(view, &self.face.outline, offset + self.face.along_normal(self.thickness), &far);

        if let Some(target) = self.target() {
            let guide = LineStyle::default().with_stipple(Stipple::Dotted);
            view.draw_3d(Primitive::Lines, &[self.face.center, target], &guide);
        }
    }
}
