#![forbid(unsafe_code)]

//! Project to plane: copy selected edges, flattened onto a plane, into a
//! new `Projection` group.
//!
//! ```text
//! DefinePlanePt1 ◀──Tab──▶ SelectFace ──click face──▶ projected: end
//!      │
//!      └─click point──▶ DefinePlanePt2
//! ```
//!
//! The plane is either taken from a face of the model ([`SelectFace`]) or
//! defined by picking points ([`DefinePlanePt1`]). Both modes are driven by
//! chords: `Tab` switches between them and a left click selects.

use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crafty_core::chord::{Chord, MouseButton, Trigger};
use crafty_core::config::InputConfig;
use crafty_core::event::Enacted;
use crafty_core::geometry::{Extents, Plane, Point3, Vector3};
use crafty_core::keys::Key;
use crafty_tool::operation::{OperationError, wrap_with_undo};
use crafty_tool::{
    Color, LineStyle, Mode, ModeChordset, Primitive, Stipple, Tool, ToolContext, Transition,
    VcbState, View, draw_outline,
};

use crate::kernel::{FaceInfo, ModelingKernel};
use crate::length::format_inches;

pub const OPERATION_NAME: &str = "Project to Plane";
pub const SELECT_FACE_STATUS: &str = "Select the face defining the plane to project to.";
pub const PT1_STATUS: &str = "Select the first point defining the plane";
pub const PT2_STATUS: &str = "Select the second point defining the plane";
pub const VCB_LABEL: &str = "Distance";

/// Host geometry services for projecting edges.
pub trait ProjectionKernel: ModelingKernel {
    /// Handle to an edge in the model.
    type Edge: Clone + 'static;

    /// The edges bounding `face`.
    fn face_edges(&self, face: &Self::Face) -> Vec<Self::Edge>;

    fn edge_extents(&self, edge: &Self::Edge) -> Extents;

    /// Add a `Projection` group holding a copy of every edge in `edges`
    /// flattened onto `plane`.
    fn project_edges(&mut self, edges: &[Self::Edge], plane: &Plane) -> Result<(), Self::Error>;
}

/// Why the tool could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("select at least one edge first")]
    NothingSelected,
}

/// Kernel handle plus the edges to project, shared by every mode.
pub struct ProjectionSession<K: ProjectionKernel> {
    kernel: Rc<RefCell<K>>,
    edges: Rc<[K::Edge]>,
    center: Point3,
}

impl<K: ProjectionKernel> Clone for ProjectionSession<K> {
    fn clone(&self) -> Self {
        Self {
            kernel: Rc::clone(&self.kernel),
            edges: Rc::clone(&self.edges),
            center: self.center,
        }
    }
}

impl<K: ProjectionKernel> fmt::Debug for ProjectionSession<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionSession")
            .field("edges", &self.edges.len())
            .field("center", &self.center)
            .finish_non_exhaustive()
    }
}

impl<K: ProjectionKernel> ProjectionSession<K> {
    /// Collect the edges to project: `edges`, or the edges of `faces` when
    /// no edge is given.
    pub fn new(kernel: Rc<RefCell<K>>, edges: Vec<K::Edge>, faces: &[K::Face]) -> Result<Self, ProjectionError> {
        let edges = if edges.is_empty() {
            let k = kernel.borrow();
            faces.iter().flat_map(|face| k.face_edges(face)).collect()
        } else {
            edges
        };
        if edges.is_empty() {
            return Err(ProjectionError::NothingSelected);
        }
        let center = {
            let k = kernel.borrow();
            let mut extents = Extents::new();
            for edge in &edges {
                extents.add(&k.edge_extents(edge));
            }
            extents.center().unwrap_or_default()
        };
        Ok(Self {
            kernel,
            edges: edges.into(),
            center,
        })
    }

    /// Borrow the kernel. Do not hold the guard across calls into another
    /// mode.
    pub fn kernel(&self) -> RefMut<'_, K> {
        self.kernel.borrow_mut()
    }

    #[must_use]
    pub fn edges(&self) -> &[K::Edge] {
        &self.edges
    }

    /// Center of the edges' bounding box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Project every edge onto `plane` inside one undo operation.
    pub fn project(&self, plane: &Plane) -> Result<(), OperationError<K::Error>> {
        let mut kernel = self.kernel.borrow_mut();
        wrap_with_undo(&mut *kernel, OPERATION_NAME, false, |k| {
            k.project_edges(&self.edges, plane)
        })
    }
}

fn bind_tab(help: &str, mut on_tab: impl FnMut() -> Transition + 'static) -> Option<Chord<Transition>> {
    match Chord::new("switch", help, Trigger::key(Key::Tab), move |_, _| {
        Enacted::transition(on_tab())
    }) {
        Ok(chord) => Some(chord),
        Err(err) => {
            tracing::error!(target: "crafty.projection", %err, "failed to bind Tab");
            None
        }
    }
}

/// Takes the plane from the face under the cursor.
pub struct SelectFace<K: ProjectionKernel> {
    session: ProjectionSession<K>,
    hovered: Rc<RefCell<Option<FaceInfo<K::Face>>>>,
    chords: ModeChordset,
}

impl<K: ProjectionKernel + 'static> SelectFace<K> {
    #[must_use]
    pub fn new(session: ProjectionSession<K>) -> Self {
        Self {
            session,
            hovered: Rc::default(),
            chords: ModeChordset::empty(),
        }
    }

    fn build_chords(&mut self, ctx: &ToolContext) {
        let session = self.session.clone();
        let hovered = Rc::clone(&self.hovered);
        let select = Chord::on_click(MouseButton::Left, "select", "Select Face", move |_, _| {
            let plane = hovered.borrow().as_ref().and_then(FaceInfo::plane);
            let Some(plane) = plane else {
                return Enacted::transition(Transition::Reject);
            };
            match session.project(&plane) {
                Ok(()) => {
                    tracing::info!(
                        target: "crafty.projection",
                        edges = session.edges().len(),
                        ?plane,
                        "edges projected"
                    );
                    Enacted::transition(Transition::EndOfOperation)
                }
                Err(err) => {
                    tracing::error!(target: "crafty.projection", %err, "projection failed");
                    Enacted::transition(Transition::Reject)
                }
            }
        });

        let session = self.session.clone();
        let switch = bind_tab("Define Plane Manually", move || {
            Transition::to(DefinePlanePt1::new(session.clone()))
        });
        let chords = std::iter::once(select).chain(switch);
        self.chords = ModeChordset::for_platform(ctx.config.platform, chords);
    }
}

impl<K: ProjectionKernel + 'static> Mode for SelectFace<K> {
    fn chordset(&self) -> Option<&ModeChordset> {
        Some(&self.chords)
    }

    fn chordset_mut(&mut self) -> Option<&mut ModeChordset> {
        Some(&mut self.chords)
    }

    fn status(&self) -> Option<String> {
        Some(SELECT_FACE_STATUS.to_owned())
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, _previous: Option<&dyn Mode>, view: &mut dyn View) {
        self.build_chords(ctx);
        ctx.extents.clear().add_point(self.session.center());
        view.invalidate();
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext, x: f64, y: f64, view: &mut dyn View) -> Transition {
        let picked = self.session.kernel().pick_face(x, y);
        let info = picked.map(|face| FaceInfo::capture(&*self.session.kernel(), face));
        if let Some(info) = &info {
            ctx.extents.add(&info.extents);
        }
        *self.hovered.borrow_mut() = info;
        view.invalidate();
        Transition::Stay
    }

    fn draw(&self, _ctx: &ToolContext, view: &mut dyn View) {
        if let Some(info) = &*self.hovered.borrow() {
            let style = LineStyle::default().with_color(Color::RED).with_width(5);
            draw_outline(view, &info.outline, Vector3::ZERO, &style);
        }
    }
}

/// Picks the first point of a manually defined plane.
pub struct DefinePlanePt1<K: ProjectionKernel> {
    session: ProjectionSession<K>,
    picked: Rc<Cell<Option<Point3>>>,
    chords: ModeChordset,
}

impl<K: ProjectionKernel + 'static> DefinePlanePt1<K> {
    #[must_use]
    pub fn new(session: ProjectionSession<K>) -> Self {
        Self {
            session,
            picked: Rc::default(),
            chords: ModeChordset::empty(),
        }
    }

    /// Vector from the selection center to the picked point.
    #[must_use]
    pub fn vector(&self) -> Option<Vector3> {
        self.picked.get().map(|p| self.session.center().vector_to(p))
    }

    fn build_chords(&mut self, ctx: &ToolContext) {
        let session = self.session.clone();
        let switch = bind_tab("Define Plane With Face", move || {
            Transition::to(SelectFace::new(session.clone()))
        });

        let picked = Rc::clone(&self.picked);
        let select = Chord::on_click(MouseButton::Left, "select", "Select Point", move |_, _| {
            match picked.get() {
                Some(point) => Enacted::transition(Transition::to(DefinePlanePt2::new(point))),
                None => Enacted::transition(Transition::Reject),
            }
        });
        let chords = switch.into_iter().chain(std::iter::once(select));
        self.chords = ModeChordset::for_platform(ctx.config.platform, chords);
    }
}

impl<K: ProjectionKernel + 'static> Mode for DefinePlanePt1<K> {
    fn chordset(&self) -> Option<&ModeChordset> {
        Some(&self.chords)
    }

    fn chordset_mut(&mut self) -> Option<&mut ModeChordset> {
        Some(&mut self.chords)
    }

    fn status(&self) -> Option<String> {
        Some(PT1_STATUS.to_owned())
    }

    fn vcb(&self) -> VcbState {
        match self.vector() {
            Some(v) => VcbState::enabled(VCB_LABEL, format_inches(v.length())),
            None => VcbState::disabled(VCB_LABEL),
        }
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, _previous: Option<&dyn Mode>, view: &mut dyn View) {
        self.build_chords(ctx);
        self.picked.set(None);
        ctx.extents.clear().add_point(self.session.center());
        view.invalidate();
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext, x: f64, y: f64, view: &mut dyn View) -> Transition {
        let picked = self.session.kernel().pick_point(x, y);
        if let Some(point) = picked {
            ctx.extents.add_point(point);
        }
        self.picked.set(picked);
        view.invalidate();
        Transition::Stay
    }

    fn draw(&self, _ctx: &ToolContext, view: &mut dyn View) {
        let center = self.session.center();
        let marker = LineStyle::default().with_color(Color::BLUE).with_width(12);
        view.draw_3d(Primitive::Points, &[center], &marker);

        if let Some(point) = self.picked.get() {
            let picked = LineStyle::default().with_width(8);
            view.draw_3d(Primitive::Points, &[point], &picked);
            let guide = LineStyle::default().with_stipple(Stipple::Dotted);
            view.draw_3d(Primitive::Lines, &[center, point], &guide);
        }
    }
}

/// Second point of a manually defined plane. Only shows guidance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefinePlanePt2 {
    first: Point3,
}

impl DefinePlanePt2 {
    #[must_use]
    pub fn new(first: Point3) -> Self {
        Self { first }
    }

    #[must_use]
    pub fn first_point(&self) -> Point3 {
        self.first
    }
}

impl Mode for DefinePlanePt2 {
    fn status(&self) -> Option<String> {
        Some(PT2_STATUS.to_owned())
    }

    fn activate_mode(&mut self, ctx: &mut ToolContext, _previous: Option<&dyn Mode>, view: &mut dyn View) {
        ctx.extents.add_point(self.first);
        view.invalidate();
    }

    fn draw(&self, _ctx: &ToolContext, view: &mut dyn View) {
        let marker = LineStyle::default().with_color(Color::BLUE).with_width(12);
        view.draw_3d(Primitive::Points, &[self.first], &marker);
    }
}

/// Build the project-to-plane tool for `edges`, or for the edges of
/// `faces` when `edges` is empty.
///
/// Every session starts in [`DefinePlanePt1`].
pub fn project_to_plane_tool<K>(
    kernel: Rc<RefCell<K>>,
    config: InputConfig,
    edges: Vec<K::Edge>,
    faces: &[K::Face],
) -> Result<Tool, ProjectionError>
where
    K: ProjectionKernel + 'static,
{
    let session = ProjectionSession::new(kernel, edges, faces)?;
    Ok(Tool::new(config, move |_ctx| -> Box<dyn Mode> {
        Box::new(DefinePlanePt1::new(session.clone()))
    }))
}
