#![forbid(unsafe_code)]

//! First step: pick the face to turn into a panel.

use crafty_core::geometry::Vector3;
use crafty_tool::{Color, LineStyle, Mode, ToolContext, Transition, View, draw_outline};

use crate::kernel::{FaceInfo, ModelingKernel, PanelSession};
use crate::selected::Selected;

pub const STATUS: &str = "Select the face to make into a panel";

/// Highlights the face under the cursor until a click confirms it.
pub struct Unselected<K: ModelingKernel> {
    session: PanelSession<K>,
    hovered: Option<FaceInfo<K::Face>>,
}

impl<K: ModelingKernel> Unselected<K> {
    #[must_use]
    pub fn new(session: PanelSession<K>) -> Self {
        Self {
            session,
            hovered: None,
        }
    }

    /// The face a click would confirm.
    #[must_use]
    pub fn hovered(&self) -> Option<&FaceInfo<K::Face>> {
        self.hovered.as_ref()
    }
}

impl<K: ModelingKernel + 'static> Mode for Unselected<K> {
    fn name(&self) -> &'static str {
        "Unselected"
    }

    fn return_on_l_click(&self) -> bool {
        true
    }

    fn status(&self) -> Option<String> {
        Some(STATUS.to_owned())
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, _previous: Option<&dyn Mode>, _view: &mut dyn View) {
        ctx.extents.clear();
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext, x: f64, y: f64, view: &mut dyn View) -> Transition {
        let picked = self.session.kernel().pick_face(x, y);
        self.hovered = picked.map(|face| self.session.describe(face));
        match &self.hovered {
            Some(info) => {
                view.set_tooltip(Some(&format!("Face in {}", info.label)));
                ctx.extents.clear().add(&info.extents);
            }
            None => view.set_tooltip(None),
        }
        view.invalidate();
        Transition::Stay
    }

    fn on_return(&mut self, _ctx: &mut ToolContext, _view: &mut dyn View) -> Transition {
        match self.hovered.take() {
            Some(info) => Transition::to(Selected::new(self.session.clone(), info)),
            None => Transition::EndOfOperation,
        }
    }

    fn draw(&self, _ctx: &ToolContext, view: &mut dyn View) {
        if let Some(info) = &self.hovered {
            let style = LineStyle::default().with_color(Color::RED).with_width(5);
            draw_outline(view, &info.outline, Vector3::ZERO, &style);
        }
    }
}
