#![forbid(unsafe_code)]

//! The modeling kernel collaborator and per-tool session state.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crafty_core::geometry::{Extents, Plane, Point3, Vector3};
use crafty_tool::operation::UndoHost;

/// Host geometry services used by the face-to-panel workflow.
///
/// Screen coordinates are view pixels, as passed to
/// [`Mode::on_mouse_move`](crafty_tool::Mode::on_mouse_move). Model lengths
/// are inches.
pub trait ModelingKernel: UndoHost {
    /// Handle to a face in the model.
    type Face: Clone + 'static;

    /// Failure reported by [`create_panel`](Self::create_panel).
    type Error: std::error::Error + 'static;

    /// The face under the cursor, if any.
    fn pick_face(&mut self, x: f64, y: f64) -> Option<Self::Face>;

    /// Name of the entity containing `face` (`"model"` at the top level).
    fn face_label(&self, face: &Self::Face) -> String;

    fn face_extents(&self, face: &Self::Face) -> Extents;

    /// Closed outer loop of `face`, without repeating the first vertex.
    fn face_outline(&self, face: &Self::Face) -> Vec<Point3>;

    /// Center of the face's bounding box.
    fn face_center(&self, face: &Self::Face) -> Point3 {
        self.face_extents(face).center().unwrap_or_default()
    }

    fn face_normal(&self, face: &Self::Face) -> Vector3;

    /// The point on the line through the face center along its normal that
    /// lies under the cursor, if the cursor can be projected onto it.
    fn project_to_normal(&mut self, face: &Self::Face, x: f64, y: f64) -> Option<Point3>;

    /// The model point under the cursor, with inference.
    fn pick_point(&mut self, x: f64, y: f64) -> Option<Point3>;

    /// Copy `face` translated by `offset` into a new `Panel` group and
    /// extrude it by `thickness` along its normal.
    fn create_panel(&mut self, face: &Self::Face, thickness: f64, offset: Vector3) -> Result<(), Self::Error>;
}

/// Everything the modes need to know about a chosen face, captured once.
#[derive(Debug, Clone)]
pub struct FaceInfo<F> {
    pub face: F,
    pub label: String,
    pub extents: Extents,
    pub outline: Vec<Point3>,
    pub center: Point3,
    /// Unit normal. Zero for a degenerate face.
    pub normal: Vector3,
}

impl<F: Clone> FaceInfo<F> {
    /// Query the kernel for `face`.
    pub fn capture<K>(kernel: &K, face: F) -> Self
    where
        K: ModelingKernel<Face = F> + ?Sized,
    {
        let normal = kernel.face_normal(&face);
        Self {
            label: kernel.face_label(&face),
            extents: kernel.face_extents(&face),
            outline: kernel.face_outline(&face),
            center: kernel.face_center(&face),
            normal: normal.with_length(1.0).unwrap_or(Vector3::ZERO),
            face,
        }
    }

    /// Vector along the normal with signed length `distance`.
    #[must_use]
    pub fn along_normal(&self, distance: f64) -> Vector3 {
        self.normal.scaled(distance)
    }

    /// Signed distance of `point` from the face center, measured along the
    /// normal.
    #[must_use]
    pub fn distance_along_normal(&self, point: Point3) -> f64 {
        self.center.vector_to(point).dot(self.normal)
    }

    /// The plane the face lies in, anchored at its first vertex. `None` for
    /// a degenerate face.
    #[must_use]
    pub fn plane(&self) -> Option<Plane> {
        let origin = self.outline.first().copied().unwrap_or(self.center);
        Plane::through(origin, self.normal)
    }

    /// The face's extents grown to include a copy translated by `offset`.
    #[must_use]
    pub fn extents_with_offset(&self, offset: Option<Vector3>) -> Extents {
        let mut extents = self.extents;
        if let Some(offset) = offset {
            extents.add(&self.extents.translated(offset));
        }
        extents
    }
}

/// Values remembered from the last completed step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sticky {
    /// Signed thickness along the face normal. `None` before the first
    /// confirmed thickness.
    pub last_thickness: Option<f64>,
    pub last_offset: Vector3,
}

/// Kernel handle plus sticky values, shared by every mode of one tool.
pub struct PanelSession<K> {
    kernel: Rc<RefCell<K>>,
    sticky: Rc<RefCell<Sticky>>,
}

impl<K> Clone for PanelSession<K> {
    fn clone(&self) -> Self {
        Self {
            kernel: Rc::clone(&self.kernel),
            sticky: Rc::clone(&self.sticky),
        }
    }
}

impl<K> fmt::Debug for PanelSession<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelSession")
            .field("sticky", &*self.sticky.borrow())
            .finish_non_exhaustive()
    }
}

impl<K: ModelingKernel> PanelSession<K> {
    #[must_use]
    pub fn new(kernel: Rc<RefCell<K>>) -> Self {
        Self {
            kernel,
            sticky: Rc::default(),
        }
    }

    /// Borrow the kernel. Do not hold the guard across calls into another
    /// mode.
    pub fn kernel(&self) -> RefMut<'_, K> {
        self.kernel.borrow_mut()
    }

    /// Capture the kernel's view of `face`.
    pub fn describe(&self, face: K::Face) -> FaceInfo<K::Face> {
        FaceInfo::capture(&*self.kernel.borrow(), face)
    }

    #[must_use]
    pub fn sticky(&self) -> Sticky {
        *self.sticky.borrow()
    }

    pub fn remember_thickness(&self, thickness: f64) {
        self.sticky.borrow_mut().last_thickness = Some(thickness);
    }

    pub fn remember_offset(&self, offset: Vector3) {
        self.sticky.borrow_mut().last_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_info_measures_along_normal() {
        let mut extents = Extents::new();
        extents
            .add_point(Point3::new(0.0, 0.0, 0.0))
            .add_point(Point3::new(10.0, 4.0, 0.0));
        let info = FaceInfo {
            face: (),
            label: "model".into(),
            extents,
            outline: Vec::new(),
            center: Point3::new(5.0, 2.0, 0.0),
            normal: Vector3::new(0.0, 0.0, 1.0),
        };
        assert_eq!(info.distance_along_normal(Point3::new(1.0, 1.0, -0.75)), -0.75);
        assert_eq!(info.along_normal(-0.75), Vector3::new(0.0, 0.0, -0.75));

        let grown = info.extents_with_offset(Some(info.along_normal(-0.75)));
        assert_eq!(grown.min(), Some(Point3::new(0.0, 0.0, -0.75)));
        assert_eq!(grown.max(), Some(Point3::new(10.0, 4.0, 0.0)));
        assert_eq!(info.extents_with_offset(None), extents);
    }

    #[test]
    fn face_plane_is_anchored_on_a_vertex() {
        let mut info = FaceInfo {
            face: (),
            label: "model".into(),
            extents: Extents::new(),
            outline: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 1.0), Point3::new(0.0, 1.0, 1.0)],
            center: Point3::new(0.5, 0.5, 0.5),
            normal: Vector3::new(-1.0, -1.0, 1.0),
        };
        // The bounding-box center is off the tilted plane.
        let plane = info.plane().unwrap();
        assert_eq!(plane.origin, Point3::new(0.0, 0.0, 0.0));

        info.normal = Vector3::ZERO;
        assert!(info.plane().is_none());
    }
}
