#![forbid(unsafe_code)]

//! The host view collaborator.
//!
//! Modes and the tool driver never talk to the host UI directly; they call
//! through [`View`], which the embedding application implements over its
//! own drawing surface, status bar, and measurement box.

use crafty_core::geometry::{Point, Point3, Vector3};

/// Line stipple patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stipple {
    #[default]
    Solid,
    Dotted,
    Dashed,
    LongDashed,
    DashDot,
}

impl Stipple {
    /// The conventional pattern string (`""`, `"."`, `"-"`, `"_"`, `"-.-"`).
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Solid => "",
            Self::Dotted => ".",
            Self::Dashed => "-",
            Self::LongDashed => "_",
            Self::DashDot => "-.-",
        }
    }
}

/// An opaque RGB drawing color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Pen settings for one draw call.
///
/// The host restores its own defaults after every call, so styles never
/// leak between draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineStyle {
    pub color: Color,
    /// Width in pixels.
    pub width: u32,
    pub stipple: Stipple,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1,
            stipple: Stipple::Solid,
        }
    }
}

impl LineStyle {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_stipple(mut self, stipple: Stipple) -> Self {
        self.stipple = stipple;
        self
    }
}

/// How a point list is interpreted by a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Independent segments from consecutive point pairs.
    Lines,
    /// One connected polyline.
    LineStrip,
    /// A polyline closed back to its first point.
    LineLoop,
    /// Isolated points.
    Points,
}

/// Why the host cancelled the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// The user pressed Escape.
    Escape,
    /// The tool was selected again while active.
    Reselected,
    /// The user invoked undo.
    Undo,
    /// A host-specific code.
    Other(u32),
}

impl CancelReason {
    /// Map the host's numeric cancel reason.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Escape,
            1 => Self::Reselected,
            2 => Self::Undo,
            other => Self::Other(other),
        }
    }
}

/// Host UI services available to modes and the tool driver.
pub trait View {
    /// Request a redraw.
    fn invalidate(&mut self);

    /// Show (`Some`) or clear (`None`) the cursor tooltip.
    fn set_tooltip(&mut self, text: Option<&str>);

    /// Audible alert.
    fn beep(&mut self);

    /// Set or clear the status bar text.
    fn set_status_text(&mut self, text: Option<&str>);

    /// Set or clear the measurement box label.
    fn set_vcb_label(&mut self, label: Option<&str>);

    /// Set or clear the measurement box value.
    fn set_vcb_value(&mut self, value: Option<&str>);

    /// Detach the active tool from the host.
    fn release_tool(&mut self);

    /// Draw in screen space.
    fn draw_2d(&mut self, primitive: Primitive, points: &[Point], style: &LineStyle);

    /// Draw in model space.
    fn draw_3d(&mut self, primitive: Primitive, points: &[Point3], style: &LineStyle);
}

/// Draw a closed model-space outline, translated by `offset`.
pub fn draw_outline(view: &mut dyn View, outline: &[Point3], offset: Vector3, style: &LineStyle) {
    if outline.is_empty() {
        return;
    }
    let points: Vec<Point3> = outline.iter().map(|p| p.offset(offset)).collect();
    view.draw_3d(Primitive::LineLoop, &points, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stipple_patterns() {
        assert_eq!(Stipple::default().pattern(), "");
        assert_eq!(Stipple::LongDashed.pattern(), "_");
        assert_eq!(Stipple::DashDot.pattern(), "-.-");
    }

    #[test]
    fn cancel_reason_codes() {
        assert_eq!(CancelReason::from_code(0), CancelReason::Escape);
        assert_eq!(CancelReason::from_code(2), CancelReason::Undo);
        assert_eq!(CancelReason::from_code(9), CancelReason::Other(9));
    }

    #[test]
    fn line_style_builders() {
        let style = LineStyle::default()
            .with_color(Color::BLUE)
            .with_width(5)
            .with_stipple(Stipple::Dashed);
        assert_eq!(style.color, Color::BLUE);
        assert_eq!(style.width, 5);
        assert_eq!(style.stipple, Stipple::Dashed);
    }
}
