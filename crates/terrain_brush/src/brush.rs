//! The `Brush` trait: one terrain-editing operation.

use crate::params::{ParamDef, ResolvedParams};
use crate::stroke::BrushStroke;

/// A terrain brush.
///
/// `apply` must be a pure function of its arguments: it never mutates the
/// stroke's height slice and always returns a freshly allocated vector
/// (hosts detect change by reference identity). Bad input — a degenerate
/// grid, a non-positive radius — degrades to an unchanged copy, never an
/// error; interactive editing must not be able to crash the session.
pub trait Brush: Send + Sync {
    /// Unique registry key, e.g. `"raise"`.
    fn id(&self) -> &str;

    /// Human-readable name for UIs.
    fn label(&self) -> &str;

    /// Declarative schema for the brush's extra parameters. Empty for
    /// brushes driven entirely by radius/strength.
    fn param_defs(&self) -> &[ParamDef] {
        &[]
    }

    /// Apply one stroke, returning the new height array.
    ///
    /// `params` has already been validated against [`Brush::param_defs`].
    fn apply(&self, stroke: &BrushStroke, params: &ResolvedParams) -> Vec<f32>;
}
