#![forbid(unsafe_code)]

//! Test doubles for the host collaborators.

use crafty_core::geometry::{Point, Point3};

use crate::view::{LineStyle, Primitive, View};

/// One call made on a [`RecordingView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Invalidate,
    Tooltip(Option<String>),
    Beep,
    Status(Option<String>),
    VcbLabel(Option<String>),
    VcbValue(Option<String>),
    ReleaseTool,
    Draw2d {
        primitive: Primitive,
        points: Vec<Point>,
        style: LineStyle,
    },
    Draw3d {
        primitive: Primitive,
        points: Vec<Point3>,
        style: LineStyle,
    },
}

/// A [`View`] that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    calls: Vec<ViewCall>,
}

impl RecordingView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[ViewCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<ViewCall> {
        std::mem::take(&mut self.calls)
    }

    /// The most recent status text, if it was ever set.
    #[must_use]
    pub fn last_status(&self) -> Option<String> {
        self.calls.iter().rev().find_map(|c| match c {
            ViewCall::Status(s) => Some(s.clone()),
            _ => None,
        })?
    }

    /// The most recent tooltip, if it was ever set.
    #[must_use]
    pub fn last_tooltip(&self) -> Option<String> {
        self.calls.iter().rev().find_map(|c| match c {
            ViewCall::Tooltip(s) => Some(s.clone()),
            _ => None,
        })?
    }

    /// The most recent measurement box `(label, value)`.
    #[must_use]
    pub fn last_vcb(&self) -> (Option<String>, Option<String>) {
        let label = self.calls.iter().rev().find_map(|c| match c {
            ViewCall::VcbLabel(s) => Some(s.clone()),
            _ => None,
        });
        let value = self.calls.iter().rev().find_map(|c| match c {
            ViewCall::VcbValue(s) => Some(s.clone()),
            _ => None,
        });
        (label.flatten(), value.flatten())
    }

    #[must_use]
    pub fn beeps(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, ViewCall::Beep)).count()
    }

    /// Whether the tool was released at any point.
    #[must_use]
    pub fn released(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, ViewCall::ReleaseTool))
    }

    /// Model-space draw calls, oldest first.
    pub fn draws_3d(&self) -> impl Iterator<Item = (&Primitive, &[Point3], &LineStyle)> {
        self.calls.iter().filter_map(|c| match c {
            ViewCall::Draw3d {
                primitive,
                points,
                style,
            } => Some((primitive, points.as_slice(), style)),
            _ => None,
        })
    }
}

impl View for RecordingView {
    fn invalidate(&mut self) {
        self.calls.push(ViewCall::Invalidate);
    }

    fn set_tooltip(&mut self, text: Option<&str>) {
        self.calls.push(ViewCall::Tooltip(text.map(str::to_owned)));
    }

    fn beep(&mut self) {
        self.calls.push(ViewCall::Beep);
    }

    fn set_status_text(&mut self, text: Option<&str>) {
        self.calls.push(ViewCall::Status(text.map(str::to_owned)));
    }

    fn set_vcb_label(&mut self, label: Option<&str>) {
        self.calls.push(ViewCall::VcbLabel(label.map(str::to_owned)));
    }

    fn set_vcb_value(&mut self, value: Option<&str>) {
        self.calls.push(ViewCall::VcbValue(value.map(str::to_owned)));
    }

    fn release_tool(&mut self) {
        self.calls.push(ViewCall::ReleaseTool);
    }

    fn draw_2d(&mut self, primitive: Primitive, points: &[Point], style: &LineStyle) {
        self.calls.push(ViewCall::Draw2d {
            primitive,
            points: points.to_vec(),
            style: *style,
        });
    }

    fn draw_3d(&mut self, primitive: Primitive, points: &[Point3], style: &LineStyle) {
        self.calls.push(ViewCall::Draw3d {
            primitive,
            points: points.to_vec(),
            style: *style,
        });
    }
}
