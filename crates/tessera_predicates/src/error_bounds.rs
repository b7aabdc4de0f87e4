//! Error bound constants and one-time initialization for the adaptive
//! predicate filters.
//!
//! Each filtered kernel evaluates its determinant in plain f64 and pairs
//! the result with a rigorous upper bound on the accumulated roundoff:
//! a constant from this module times a sum of intermediate magnitudes.
//! A result whose magnitude clears the bound has a certified sign; one
//! that does not is recomputed by the exact expansion kernel.

use std::sync::OnceLock;

/// Unit round-off for IEEE 754 double precision: 2^-53, half the spacing
/// between 1.0 and the next representable double.
///
/// This is the `epsilon` of Shewchuk's error analysis; note that it is
/// half of `f64::EPSILON`.
pub const EPSILON: f64 = f64::EPSILON / 2.0;

/// Veltkamp splitter constant, 2^27 + 1.
///
/// Multiplying by `SPLITTER` and subtracting splits a double into 26- and
/// 27-bit halves whose partial products are exact; see
/// [`split`](crate::expansion::split).
pub const SPLITTER: f64 = 134_217_729.0;

/// Filter bound coefficient for `orient2d`: 3-epsilon first order.
///
/// Applied to the sum of the two product magnitudes of the 2x2
/// determinant.
pub const ORIENT2D_ERRBOUND: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;

/// Filter bound coefficient for `orient3d`: 7-epsilon first order.
///
/// Applied to the permanent of the 3x3 determinant (products replaced by
/// their magnitudes).
pub const ORIENT3D_ERRBOUND: f64 = (7.0 + 56.0 * EPSILON) * EPSILON;

/// Filter bound coefficient for `bisect2d`, applied to
/// `|d(a,c)^2| + |d(b,c)^2|`.
pub const BISECT2D_ERRBOUND: f64 = 5.0 * EPSILON;

/// Filter bound coefficient for `bisect2w`; one more epsilon than the
/// unweighted bound for the weight subtraction.
pub const BISECT2W_ERRBOUND: f64 = 6.0 * EPSILON;

/// Filter bound coefficient for `bisect3d`.
pub const BISECT3D_ERRBOUND: f64 = 6.0 * EPSILON;

/// Filter bound coefficient for `bisect3w`.
pub const BISECT3W_ERRBOUND: f64 = 7.0 * EPSILON;

/// Filter bound coefficient for `inball2d`, applied to the permanent of
/// the lifted 3x3 determinant.
pub const INBALL2D_ERRBOUND: f64 = (10.0 + 96.0 * EPSILON) * EPSILON;

/// Filter bound coefficient for `inball2w`; the power lift adds a weight
/// difference and one more subtraction per row over `inball2d`.
pub const INBALL2W_ERRBOUND: f64 = (13.0 + 128.0 * EPSILON) * EPSILON;

/// Filter bound coefficient for `inball3d`, applied to the permanent of
/// the lifted 4x4 determinant.
pub const INBALL3D_ERRBOUND: f64 = (16.0 + 224.0 * EPSILON) * EPSILON;

/// Filter bound coefficient for `inball3w`.
pub const INBALL3W_ERRBOUND: f64 = (20.0 + 288.0 * EPSILON) * EPSILON;

static DERIVED: OnceLock<(f64, f64)> = OnceLock::new();

/// One-time library initialization.
///
/// Derives the machine epsilon and the Veltkamp splitter by the portable
/// bisection and caches the pair; repeated calls are no-ops that observe
/// the same values. The predicate kernels read the compile-time
/// [`EPSILON`] and [`SPLITTER`] constants, which this derivation
/// reproduces bit-for-bit on any IEEE 754 double target, so calling
/// `init` is a correctness check rather than a prerequisite. Callers
/// porting code that required an explicit initialization step may keep
/// calling it once at startup.
pub fn init() {
    let (epsilon, splitter) = *DERIVED.get_or_init(derive_constants);
    debug_assert_eq!(epsilon, EPSILON);
    debug_assert_eq!(splitter, SPLITTER);
}

/// Finds the machine constants by bisection: halve `epsilon` until
/// `1 + epsilon` rounds to 1 or stops changing, doubling the splitter on
/// every other iteration.
fn derive_constants() -> (f64, f64) {
    let mut epsilon: f64 = 1.0;
    let mut splitter: f64 = 1.0;
    let mut alternate = true;
    let mut check: f64 = 1.0;

    loop {
        let lastcheck = check;
        epsilon *= 0.5;
        if alternate {
            splitter *= 2.0;
        }
        alternate = !alternate;
        check = 1.0 + epsilon;
        if check == 1.0 || check == lastcheck {
            break;
        }
    }
    splitter += 1.0;

    (epsilon, splitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_value() {
        // Unit round-off is half of f64::EPSILON
        assert_eq!(EPSILON, 2.0f64.powi(-53));
        assert_eq!(2.0 * EPSILON, f64::EPSILON);

        // 1 + 2eps is the next double after 1; 1 + eps ties back to 1
        assert_ne!(1.0 + 2.0 * EPSILON, 1.0);
        assert_eq!(1.0 + EPSILON, 1.0);
    }

    #[test]
    fn test_splitter_value() {
        assert_eq!(SPLITTER, 2.0f64.powi(27) + 1.0);
    }

    #[test]
    fn test_derivation_matches_constants() {
        let (epsilon, splitter) = derive_constants();
        assert_eq!(epsilon, EPSILON);
        assert_eq!(splitter, SPLITTER);
    }

    #[test]
    fn test_init_idempotent() {
        init();
        init();
        let first = derive_constants();
        let second = derive_constants();
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_bounds_positive_and_finite() {
        for &bound in &[
            ORIENT2D_ERRBOUND,
            ORIENT3D_ERRBOUND,
            BISECT2D_ERRBOUND,
            BISECT2W_ERRBOUND,
            BISECT3D_ERRBOUND,
            BISECT3W_ERRBOUND,
            INBALL2D_ERRBOUND,
            INBALL2W_ERRBOUND,
            INBALL3D_ERRBOUND,
            INBALL3W_ERRBOUND,
        ] {
            assert!(bound > 0.0);
            assert!(bound.is_finite());
            assert!(bound < 1e-14);
        }
    }

    #[test]
    fn test_error_bounds_ordering() {
        // Deeper expressions carry larger bounds
        assert!(ORIENT2D_ERRBOUND < ORIENT3D_ERRBOUND);
        assert!(BISECT2D_ERRBOUND < BISECT2W_ERRBOUND);
        assert!(BISECT3D_ERRBOUND < BISECT3W_ERRBOUND);
        assert!(INBALL2D_ERRBOUND < INBALL2W_ERRBOUND);
        assert!(INBALL3D_ERRBOUND < INBALL3W_ERRBOUND);
        assert!(INBALL2D_ERRBOUND < INBALL3D_ERRBOUND);
    }
}
