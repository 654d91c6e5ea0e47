use thiserror::Error;

/// Result type alias using [`HullError`].
pub type Result<T> = std::result::Result<T, HullError>;

/// The way in which a point set fails to span a volume.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// All points are (approximately) the same point.
    #[error("coincident")]
    Coincident,
    /// All points lie (approximately) on one line.
    #[error("collinear")]
    Collinear,
    /// All points lie (approximately) on one plane.
    #[error("coplanar")]
    Coplanar,
}

/// Errors reported by [`ConvexHull::try_from_points`](crate::ConvexHull::try_from_points).
///
/// The lenient constructors never fail; they leave the hull empty instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HullError {
    /// Fewer than four points were supplied.
    #[error("convex hull needs at least 4 points, got {count}")]
    InsufficientPoints {
        /// Number of points supplied.
        count: usize,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Index of the offending point in the input.
        index: usize,
    },

    /// The points do not enclose any volume.
    #[error("point set is degenerate ({0})")]
    Degenerate(Degeneracy),

    /// A [`HullConfig`](crate::HullConfig) field holds a value that would
    /// leave input points outside the hull.
    #[error("invalid hull config: {name} = {value} ({reason})")]
    InvalidConfig {
        /// Field name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value is rejected.
        reason: &'static str,
    },

    /// The configured insertion cap was reached before the hull was complete.
    #[error("hull construction stopped after {iterations} iterations")]
    IterationLimit {
        /// Number of vertices inserted before stopping.
        iterations: usize,
    },
}

impl HullError {
    pub(crate) fn invalid_config<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        HullError::InvalidConfig {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
