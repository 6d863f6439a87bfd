/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Trapezoidal membership sets and the geometry collaborator that queries them.
//!
//! - [`MembershipSet`]: a named, coloured fuzzy set with a mutable `height`. On the
//!   defuzzification the height is the target inference results are written into.
//! - [`MembershipGeometry`]: the degree-of-membership seam. The engine only ever asks
//!   "what degree does this crisp value have in this set"; the shape formula lives
//!   behind the trait.
//! - [`TrapezoidGeometry`]: the default piecewise-linear implementation.
//!
//! # Invariants
//!
//! - **FLS-MS-001** — `height` is 1.0 (fully open) after creation and after `initialize()`.
//! - **FLS-MS-002** — Geometry queries are pure: same inputs, same degree, no side effects.

use alloc::string::String;
use alloc::vec::Vec;

use crate::id::Id;
use crate::variable::Variable;

// ─── Trapezoid shape ────────────────────────────────────────────────────────

/// The four break points of a trapezoid over one axis.
///
/// ```text
///        shoulder_left ____ shoulder_right
///                     /    \
///                    /      \
///   ________________/        \________________
///           foot_left        foot_right
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapezoidShape {
    /// Left end of the support (degree 0).
    pub foot_left: f32,
    /// Left end of the core (degree 1).
    pub shoulder_left: f32,
    /// Right end of the core (degree 1).
    pub shoulder_right: f32,
    /// Right end of the support (degree 0).
    pub foot_right: f32,
}

impl TrapezoidShape {
    /// Construct a shape from its four break points, left to right.
    pub fn new(foot_left: f32, shoulder_left: f32, shoulder_right: f32, foot_right: f32) -> Self {
        Self {
            foot_left,
            shoulder_left,
            shoulder_right,
            foot_right,
        }
    }

    /// A triangle: both shoulders at `peak`.
    pub fn triangle(foot_left: f32, peak: f32, foot_right: f32) -> Self {
        Self::new(foot_left, peak, peak, foot_right)
    }
}

impl Default for TrapezoidShape {
    fn default() -> Self {
        Self::new(0.0, 0.25, 0.75, 1.0)
    }
}

// ─── Membership set ─────────────────────────────────────────────────────────

/// A trapezoidal fuzzy set owned by exactly one [`Variable`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MembershipSet {
    id: Id,
    /// Display name. `None` displays as `Trapezoid<index>`.
    pub name: Option<String>,
    /// Break points over the owning variable's axis.
    pub shape: TrapezoidShape,
    /// RGBA display colour.
    pub color: [u8; 4],
    /// Current height (constraint level). Inference results land here on the
    /// defuzzification.
    pub height: f32,
    /// Clamp geometry degrees to [0.0, 1.0].
    pub clamp_to_unit_interval: bool,
}

impl MembershipSet {
    /// A fresh, fully open set with the default shape.
    pub fn new(id: Id) -> Self {
        Self {
            id,
            name: None,
            shape: TrapezoidShape::default(),
            color: [255, 255, 255, 255],
            height: 1.0,
            clamp_to_unit_interval: true,
        }
    }

    /// This set's identifier.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Display label: the name when set and non-blank, otherwise `Trapezoid<index>`.
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => String::from(name),
            _ => alloc::format!("Trapezoid{}", index),
        }
    }

    /// Neutral state: height 1, clamping on.
    pub(crate) fn reset(&mut self) {
        self.height = 1.0;
        self.clamp_to_unit_interval = true;
    }
}

// ─── Geometry collaborator ──────────────────────────────────────────────────

/// Degree-of-membership queries against a set's shape.
///
/// Implementations must be pure. The engine calls [`membership_at`] once per
/// resolved input per evaluation and never caches across passes.
///
/// [`membership_at`]: MembershipGeometry::membership_at
pub trait MembershipGeometry {
    /// Degree of `crisp` in `set`.
    fn membership_at(&self, set: &MembershipSet, crisp: f32) -> f32;

    /// Every set of `variable` the baseline at `crisp` intersects, with its degree.
    ///
    /// Sets with a zero degree are omitted.
    fn intersection_with_baseline(&self, variable: &Variable, crisp: f32) -> Vec<(Id, f32)> {
        variable
            .sets()
            .iter()
            .filter_map(|set| {
                let degree = self.membership_at(set, crisp);
                if degree > 0.0 {
                    Some((set.id().clone(), degree))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Piecewise-linear trapezoid geometry.
///
/// - Zero outside `[foot_left, foot_right]`.
/// - One on `[shoulder_left, shoulder_right]`.
/// - Linear ramps in between; a zero-width ramp is a vertical edge.
/// - NaN input has degree zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrapezoidGeometry;

impl MembershipGeometry for TrapezoidGeometry {
    fn membership_at(&self, set: &MembershipSet, crisp: f32) -> f32 {
        let s = &set.shape;
        if crisp.is_nan() || crisp < s.foot_left || crisp > s.foot_right {
            return 0.0;
        }
        let degree = if crisp >= s.shoulder_left && crisp <= s.shoulder_right {
            1.0
        } else if crisp < s.shoulder_left {
            // foot_left <= crisp < shoulder_left, so the ramp has width
            (crisp - s.foot_left) / (s.shoulder_left - s.foot_left)
        } else {
            (s.foot_right - crisp) / (s.foot_right - s.shoulder_right)
        };
        if set.clamp_to_unit_interval {
            degree.clamp(0.0, 1.0)
        } else {
            degree
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(shape: TrapezoidShape) -> MembershipSet {
        let mut set = MembershipSet::new(Id::from("s"));
        set.shape = shape;
        set
    }

    #[test]
    fn test_new_set_is_fully_open() {
        let set = MembershipSet::new(Id::from("s"));
        assert_eq!(set.height, 1.0);
        assert!(set.clamp_to_unit_interval);
        assert_eq!(set.name, None);
    }

    #[test]
    fn test_label_falls_back_to_index() {
        let mut set = MembershipSet::new(Id::from("s"));
        assert_eq!(set.label(3), "Trapezoid3");
        set.name = Some(String::from("   "));
        assert_eq!(set.label(0), "Trapezoid0");
        set.name = Some(String::from("Warm"));
        assert_eq!(set.label(0), "Warm");
    }

    #[test]
    fn test_trapezoid_regions() {
        let set = set_with(TrapezoidShape::new(0.0, 2.0, 4.0, 6.0));
        let g = TrapezoidGeometry;
        assert_eq!(g.membership_at(&set, -1.0), 0.0);
        assert!((g.membership_at(&set, 1.0) - 0.5).abs() < 1e-6);
        assert_eq!(g.membership_at(&set, 3.0), 1.0);
        assert!((g.membership_at(&set, 5.5) - 0.25).abs() < 1e-6);
        assert_eq!(g.membership_at(&set, 7.0), 0.0);
    }

    #[test]
    fn test_zero_width_ramp_is_vertical_edge() {
        let set = set_with(TrapezoidShape::new(1.0, 1.0, 2.0, 2.0));
        let g = TrapezoidGeometry;
        assert_eq!(g.membership_at(&set, 1.0), 1.0);
        assert_eq!(g.membership_at(&set, 2.0), 1.0);
        assert_eq!(g.membership_at(&set, 0.999), 0.0);
    }

    #[test]
    fn test_nan_input_has_zero_degree() {
        let set = set_with(TrapezoidShape::default());
        assert_eq!(TrapezoidGeometry.membership_at(&set, f32::NAN), 0.0);
    }

    #[test]
    fn test_triangle_peak() {
        let set = set_with(TrapezoidShape::triangle(0.0, 0.5, 1.0));
        let g = TrapezoidGeometry;
        assert_eq!(g.membership_at(&set, 0.5), 1.0);
        assert!((g.membership_at(&set, 0.25) - 0.5).abs() < 1e-6);
    }
}
