//! The project-to-plane workflow driven through the tool, against a
//! scripted modeling kernel.

use std::cell::RefCell;
use std::rc::Rc;

use crafty_core::config::InputConfig;
use crafty_core::geometry::{Extents, Plane, Point3, Vector3};
use crafty_core::keys::Platform;
use crafty_panel::project_to_plane::{self, ProjectionError, ProjectionKernel};
use crafty_panel::{ModelingKernel, project_to_plane_tool};
use crafty_tool::Tool;
use crafty_tool::operation::UndoHost;
use crafty_tool::testing::RecordingView;

const VK_TAB: u32 = 0x09;

#[derive(Debug, thiserror::Error)]
#[error("kernel refused the projection")]
struct Refused;

/// One 10 x 4 face at z = 0 with a +Z normal, pickable left of x = 100.
///
/// Edge `n` runs from `(n - 10, 0, 5)` to `(n - 9, 0, 5)`. Point picks
/// land at `(1 + x, 0, 5)` for `x >= 0` and miss otherwise.
#[derive(Debug, Default)]
struct FakeKernel {
    undo: Vec<String>,
    projected: Vec<(Vec<u32>, Plane)>,
    fail: bool,
}

impl UndoHost for FakeKernel {
    fn start_operation(&mut self, name: &str) {
        self.undo.push(format!("start {name}"));
    }
    fn commit_operation(&mut self) {
        self.undo.push("commit".into());
    }
    fn abort_operation(&mut self) {
        self.undo.push("abort".into());
    }
}

impl ModelingKernel for FakeKernel {
    type Face = u32;
    type Error = Refused;

    fn pick_face(&mut self, x: f64, _y: f64) -> Option<u32> {
        (x < 100.0).then_some(1)
    }

    fn face_label(&self, _face: &u32) -> String {
        "model".into()
    }

    fn face_extents(&self, _face: &u32) -> Extents {
        let mut extents = Extents::new();
        extents
            .add_point(Point3::new(0.0, 0.0, 0.0))
            .add_point(Point3::new(10.0, 4.0, 0.0));
        extents
    }

    fn face_outline(&self, _face: &u32) -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ]
    }

    fn face_normal(&self, _face: &u32) -> Vector3 {
        Vector3::new(0.0, 0.0, 2.0)
    }

    fn project_to_normal(&mut self, _face: &u32, _x: f64, _y: f64) -> Option<Point3> {
        None
    }

    fn pick_point(&mut self, x: f64, _y: f64) -> Option<Point3> {
        (x >= 0.0).then(|| Point3::new(1.0 + x, 0.0, 5.0))
    }

    fn create_panel(&mut self, _face: &u32, _thickness: f64, _offset: Vector3) -> Result<(), Refused> {
        Err(Refused)
    }
}

impl ProjectionKernel for FakeKernel {
    type Edge = u32;

    fn face_edges(&self, _face: &u32) -> Vec<u32> {
        vec![10, 11, 12, 13]
    }

    fn edge_extents(&self, edge: &u32) -> Extents {
        let start = f64::from(*edge) - 10.0;
        let mut extents = Extents::new();
        extents
            .add_point(Point3::new(start, 0.0, 5.0))
            .add_point(Point3::new(start + 1.0, 0.0, 5.0));
        extents
    }

    fn project_edges(&mut self, edges: &[u32], plane: &Plane) -> Result<(), Refused> {
        if self.fail {
            return Err(Refused);
        }
        self.projected.push((edges.to_vec(), *plane));
        Ok(())
    }
}

struct Harness {
    kernel: Rc<RefCell<FakeKernel>>,
    tool: Tool,
    view: RecordingView,
}

impl Harness {
    fn new(edges: Vec<u32>, faces: &[u32]) -> Self {
        let kernel = Rc::new(RefCell::new(FakeKernel::default()));
        let config = InputConfig::default().with_platform(Platform::Windows);
        let tool = project_to_plane_tool(Rc::clone(&kernel), config, edges, faces)
            .expect("selection is not empty");
        let mut harness = Self {
            kernel,
            tool,
            view: RecordingView::new(),
        };
        harness.tool.activate(&mut harness.view);
        harness
    }

    fn mode(&self) -> Option<&'static str> {
        self.tool.mode().map(|m| m.name())
    }

    fn hover(&mut self, x: f64, y: f64) {
        self.tool.on_mouse_move(x, y, &mut self.view);
    }

    fn click(&mut self, x: f64, y: f64) {
        self.tool.on_l_button_down(x, y);
        self.tool.on_l_button_up(x, y, &mut self.view);
    }

    fn tab(&mut self) {
        assert!(self.tool.on_key_down(VK_TAB, 1, &mut self.view));
        assert!(self.tool.on_key_up(VK_TAB, 1, &mut self.view));
    }
}

#[test]
fn tab_switches_between_point_and_face_modes() {
    let mut h = Harness::new(vec![10, 11], &[]);
    assert_eq!(h.mode(), Some("DefinePlanePt1"));
    assert_eq!(
        h.tool.status_text(),
        format!(
            "{}    |||    [Tab] Define Plane With Face // [Left Click] Select Point",
            project_to_plane::PT1_STATUS
        )
    );

    h.tab();
    assert_eq!(h.mode(), Some("SelectFace"));
    assert_eq!(
        h.tool.status_text(),
        format!(
            "{}    |||    [Left Click] Select Face // [Tab] Define Plane Manually",
            project_to_plane::SELECT_FACE_STATUS
        )
    );

    h.tab();
    assert_eq!(h.mode(), Some("DefinePlanePt1"));
    assert!(h.kernel.borrow().projected.is_empty());
}

#[test]
fn clicking_a_face_projects_onto_its_plane_and_ends() {
    let mut h = Harness::new(vec![10, 11], &[]);
    h.tab();
    h.hover(10.0, 10.0);
    h.click(10.0, 10.0);

    assert!(!h.tool.is_active());
    assert!(h.view.released());
    let kernel = h.kernel.borrow();
    let plane = Plane::through(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
    assert_eq!(kernel.projected, [(vec![10, 11], plane)]);
    assert_eq!(kernel.undo, ["start Project to Plane", "commit"]);
}

#[test]
fn selecting_with_no_face_under_the_cursor_beeps() {
    let mut h = Harness::new(vec![10], &[]);
    h.tab();
    h.hover(500.0, 0.0);
    h.click(500.0, 0.0);
    assert_eq!(h.mode(), Some("SelectFace"));
    assert_eq!(h.view.beeps(), 1);
    assert!(h.kernel.borrow().undo.is_empty());
}

#[test]
fn failed_projection_is_aborted_and_keeps_the_mode() {
    let mut h = Harness::new(vec![10], &[]);
    h.kernel.borrow_mut().fail = true;
    h.tab();
    h.hover(10.0, 10.0);
    h.click(10.0, 10.0);
    assert_eq!(h.mode(), Some("SelectFace"));
    assert_eq!(h.view.beeps(), 1);
    assert_eq!(h.kernel.borrow().undo, ["start Project to Plane", "abort"]);
}

#[test]
fn first_point_tracks_distance_from_selection_center() {
    let mut h = Harness::new(vec![10, 11], &[]);
    // Edges span x = 0..2, so the center is (1, 0, 5).
    assert_eq!(h.tool.extents().center(), Some(Point3::new(1.0, 0.0, 5.0)));
    assert_eq!(h.view.last_vcb(), (Some("Distance".into()), Some(String::new())));
    assert!(!h.tool.vcb_enabled());

    // Nothing picked yet.
    h.click(-5.0, 0.0);
    assert_eq!(h.view.beeps(), 1);
    assert_eq!(h.mode(), Some("DefinePlanePt1"));

    h.hover(3.0, 0.0);
    assert_eq!(h.view.last_vcb(), (Some("Distance".into()), Some("3\"".into())));
    assert!(h.tool.vcb_enabled());
    assert_eq!(h.tool.extents().max(), Some(Point3::new(4.0, 0.0, 5.0)));

    h.click(3.0, 0.0);
    assert_eq!(h.mode(), Some("DefinePlanePt2"));
    assert_eq!(h.tool.status_text(), project_to_plane::PT2_STATUS);
    assert!(!h.tool.vcb_enabled());
}

#[test]
fn pointer_leaving_the_model_clears_the_first_point() {
    let mut h = Harness::new(vec![10], &[]);
    h.hover(3.0, 0.0);
    h.hover(-1.0, 0.0);
    assert!(!h.tool.vcb_enabled());
    h.click(-1.0, 0.0);
    assert_eq!(h.mode(), Some("DefinePlanePt1"));
    assert_eq!(h.view.beeps(), 1);
}

#[test]
fn faces_supply_the_edges_when_none_are_selected() {
    let mut h = Harness::new(Vec::new(), &[1]);
    h.tab();
    h.hover(10.0, 10.0);
    h.click(10.0, 10.0);
    let kernel = h.kernel.borrow();
    assert_eq!(kernel.projected.len(), 1);
    assert_eq!(kernel.projected[0].0, [10, 11, 12, 13]);
}

#[test]
fn empty_selection_is_refused() {
    let kernel = Rc::new(RefCell::new(FakeKernel::default()));
    let err = project_to_plane_tool(kernel, InputConfig::default(), Vec::new(), &[]).unwrap_err();
    assert_eq!(err, ProjectionError::NothingSelected);
    assert_eq!(err.to_string(), "select at least one edge first");
}
