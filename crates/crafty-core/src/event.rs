#![forbid(unsafe_code)]

//! Chord activations and their results.
//!
//! A chord handler receives an [`Activation`] describing the input that
//! completed the chord and answers with an [`Enacted`] value. Several chords
//! may complete on the same input; their results are folded together with
//! [`Enacted::merge`], so the last handler that requests a transition wins.

use crate::geometry::{Bounds2, Point};

/// The input gesture that completed a chord.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    /// A plain mouse click at `point`.
    Click {
        /// Where the button was pressed.
        point: Point,
    },
    /// A press, move beyond the click slop, and release.
    Drag {
        /// Rectangle spanned by the press and release points.
        bounds: Bounds2,
        /// Horizontal direction of the drag.
        direction: DragDirection,
    },
    /// A released key chord.
    KeyPress,
}

impl Activation {
    /// Build a drag activation from its press and release points.
    #[must_use]
    pub fn drag(start: Point, end: Point) -> Self {
        Self::Drag {
            bounds: Bounds2::from_points(start, end),
            direction: DragDirection::between(start, end),
        }
    }
}

/// Horizontal direction of a drag rectangle.
///
/// Selection tools conventionally treat left-to-right as "fully inside" and
/// right-to-left as "crossing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragDirection {
    LeftToRight,
    RightToLeft,
}

impl DragDirection {
    /// Direction of a drag from `start` to `end`.
    #[must_use]
    pub fn between(start: Point, end: Point) -> Self {
        if end.x >= start.x {
            Self::LeftToRight
        } else {
            Self::RightToLeft
        }
    }
}

/// Result of enacting one or more chords.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Enacted<T> {
    /// Whether the input was consumed. `false` asks the host to apply its
    /// own default handling as well.
    pub handled: bool,
    /// A requested transition, if any.
    pub transition: Option<T>,
}

impl<T> Default for Enacted<T> {
    fn default() -> Self {
        Self::unhandled()
    }
}

impl<T> Enacted<T> {
    /// Consumed, no transition.
    pub const fn handled() -> Self {
        Self {
            handled: true,
            transition: None,
        }
    }

    /// Not consumed, no transition.
    pub const fn unhandled() -> Self {
        Self {
            handled: false,
            transition: None,
        }
    }

    /// Consumed, requesting `transition`.
    pub fn transition(transition: T) -> Self {
        Self {
            handled: true,
            transition: Some(transition),
        }
    }

    /// Mark whether the input was consumed.
    pub fn with_handled(mut self, handled: bool) -> Self {
        self.handled = handled;
        self
    }

    /// Fold a later result into this one.
    ///
    /// `handled` is sticky; a later transition replaces an earlier one.
    pub fn merge(self, later: Enacted<T>) -> Self {
        Self {
            handled: self.handled || later.handled,
            transition: later.transition.or(self.transition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_direction_follows_x() {
        let a = Point::new(10.0, 10.0);
        let b = Point::new(2.0, 30.0);
        assert_eq!(DragDirection::between(a, b), DragDirection::RightToLeft);
        assert_eq!(DragDirection::between(b, a), DragDirection::LeftToRight);
        assert_eq!(DragDirection::between(a, a), DragDirection::LeftToRight);
    }

    #[test]
    fn drag_activation_normalizes_bounds() {
        let Activation::Drag { bounds, direction } =
            Activation::drag(Point::new(8.0, 1.0), Point::new(2.0, 5.0))
        else {
            panic!("expected a drag activation");
        };
        assert_eq!(bounds.upper_left, Point::new(2.0, 1.0));
        assert_eq!(direction, DragDirection::RightToLeft);
    }

    #[test]
    fn merge_keeps_last_transition() {
        let merged = Enacted::transition(1)
            .merge(Enacted::unhandled())
            .merge(Enacted::transition(2))
            .merge(Enacted::handled());
        assert_eq!(merged.transition, Some(2));
        assert!(merged.handled);

        let none: Enacted<u8> = Enacted::unhandled().merge(Enacted::unhandled());
        assert!(!none.handled);
        assert_eq!(none.transition, None);
    }
}
