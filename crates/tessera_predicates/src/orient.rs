//! Orientation predicates in E^2 and E^3.
//!
//! Each predicate runs a filtered f64 kernel first and falls back to the
//! exact expansion kernel only when the filter cannot certify the sign.

use wide::f64x4;

use crate::error_bounds::{ORIENT2D_ERRBOUND, ORIENT3D_ERRBOUND};
use crate::expansion::Expansion;

/// 2D orientation test.
///
/// Returns a positive value if `pc` lies strictly to the left of the
/// directed line `pa -> pb` (the triangle `pa, pb, pc` winds
/// counterclockwise), a negative value if it lies to the right, and
/// exactly `0.0` if the three points are collinear.
///
/// The sign is exact for all finite, non-overflowing inputs; only the
/// magnitude of a nonzero result is approximate.
///
/// # Algorithm
///
/// Computes the sign of the determinant:
/// ```text
/// | pa.x - pc.x   pa.y - pc.y |
/// | pb.x - pc.x   pb.y - pc.y |
/// ```
///
/// The filtered kernel evaluates the determinant in plain f64 together
/// with a roundoff bound; when the result does not clear the bound (or
/// is not a normal double), the determinant is re-evaluated in expansion
/// arithmetic and the sign of the leading component is returned.
///
/// # Examples
///
/// ```
/// # use tessera_predicates::orient2d;
/// assert!(orient2d([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]) > 0.0);
/// assert!(orient2d([0.0, 0.0], [0.0, 1.0], [1.0, 0.0]) < 0.0);
/// assert_eq!(orient2d([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]), 0.0);
/// ```
///
/// # References
///
/// Shewchuk, J. R. (1997). Adaptive Precision Floating-Point Arithmetic
/// and Fast Robust Geometric Predicates. Discrete & Computational
/// Geometry, 18(3), 305-363.
pub fn orient2d(pa: [f64; 2], pb: [f64; 2], pc: [f64; 2]) -> f64 {
    let (det, errbound) = orient2d_filter(pa, pb, pc);
    if (det > errbound || -det > errbound) && det.is_normal() {
        return det;
    }
    orient2d_exact(pa, pb, pc)
}

/// Filtered orient2d kernel: the f64 determinant and its roundoff bound.
fn orient2d_filter(pa: [f64; 2], pb: [f64; 2], pc: [f64; 2]) -> (f64, f64) {
    let detleft = (pa[0] - pc[0]) * (pb[1] - pc[1]);
    let detright = (pa[1] - pc[1]) * (pb[0] - pc[0]);
    let det = detleft - detright;

    let detsum = detleft.abs() + detright.abs();
    (det, ORIENT2D_ERRBOUND * detsum)
}

/// Exact orient2d kernel.
///
/// Lifts the four coordinate differences into length-2 expansions and
/// evaluates the determinant exactly; the leading component carries the
/// sign.
fn orient2d_exact(pa: [f64; 2], pb: [f64; 2], pc: [f64; 2]) -> f64 {
    let acx = Expansion::from_diff(pa[0], pc[0]);
    let acy = Expansion::from_diff(pa[1], pc[1]);
    let bcx = Expansion::from_diff(pb[0], pc[0]);
    let bcy = Expansion::from_diff(pb[1], pc[1]);

    let det = acx.mul(&bcy).sub(&acy.mul(&bcx));
    det.leading()
}

/// 3D orientation test.
///
/// Returns a positive value if `pd` lies below the plane through
/// `pa, pb, pc` (oriented so that the triangle winds counterclockwise
/// seen from above), a negative value if it lies above, and exactly
/// `0.0` if the four points are coplanar.
///
/// # Examples
///
/// ```
/// # use tessera_predicates::orient3d;
/// let below = orient3d([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]);
/// assert!(below > 0.0);
/// let coplanar = orient3d([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.5, 0.5, 0.0]);
/// assert_eq!(coplanar, 0.0);
/// ```
pub fn orient3d(pa: [f64; 3], pb: [f64; 3], pc: [f64; 3], pd: [f64; 3]) -> f64 {
    let (det, errbound) = orient3d_filter(pa, pb, pc, pd);
    if (det > errbound || -det > errbound) && det.is_normal() {
        return det;
    }
    orient3d_exact(pa, pb, pc, pd)
}

/// Filtered orient3d kernel: the f64 determinant and its roundoff bound.
fn orient3d_filter(pa: [f64; 3], pb: [f64; 3], pc: [f64; 3], pd: [f64; 3]) -> (f64, f64) {
    let adx = pa[0] - pd[0];
    let bdx = pb[0] - pd[0];
    let cdx = pc[0] - pd[0];
    let ady = pa[1] - pd[1];
    let bdy = pb[1] - pd[1];
    let cdy = pc[1] - pd[1];
    let adz = pa[2] - pd[2];
    let bdz = pb[2] - pd[2];
    let cdz = pc[2] - pd[2];

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;

    let det = adz * (bdxcdy - cdxbdy) + bdz * (cdxady - adxcdy) + cdz * (adxbdy - bdxady);

    let v1 = f64x4::from([bdxcdy, cdxady, adxbdy, 0.0]);
    let v2 = f64x4::from([cdxbdy, adxcdy, bdxady, 0.0]);
    let v_factors = f64x4::from([adz, bdz, cdz, 0.0]);

    let permanent = ((v1.abs() + v2.abs()) * v_factors.abs()).reduce_add();
    (det, ORIENT3D_ERRBOUND * permanent)
}

/// Exact orient3d kernel.
///
/// The three 2x2 minors and the three z-differences are built as
/// expansions and combined exactly.
fn orient3d_exact(pa: [f64; 3], pb: [f64; 3], pc: [f64; 3], pd: [f64; 3]) -> f64 {
    let adx = Expansion::from_diff(pa[0], pd[0]);
    let bdx = Expansion::from_diff(pb[0], pd[0]);
    let cdx = Expansion::from_diff(pc[0], pd[0]);
    let ady = Expansion::from_diff(pa[1], pd[1]);
    let bdy = Expansion::from_diff(pb[1], pd[1]);
    let cdy = Expansion::from_diff(pc[1], pd[1]);
    let adz = Expansion::from_diff(pa[2], pd[2]);
    let bdz = Expansion::from_diff(pb[2], pd[2]);
    let cdz = Expansion::from_diff(pc[2], pd[2]);

    let bc = bdx.mul(&cdy).sub(&cdx.mul(&bdy));
    let ca = cdx.mul(&ady).sub(&adx.mul(&cdy));
    let ab = adx.mul(&bdy).sub(&bdx.mul(&ady));

    let det = bc.mul(&adz).add(&ca.mul(&bdz)).add(&ab.mul(&cdz));
    det.leading()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sign(x: f64) -> i32 {
        if x > 0.0 {
            1
        } else if x < 0.0 {
            -1
        } else {
            0
        }
    }

    #[test]
    fn test_orient2d_collinear_on_axis() {
        assert_eq!(orient2d([0.0, 0.0], [1.0, 0.0], [0.5, 0.0]), 0.0);
    }

    #[test]
    fn test_orient2d_tiny_perturbation() {
        // A 1e-300 offset off the x-axis still has a definite sign
        let r = orient2d([0.0, 0.0], [1.0, 0.0], [0.5, 1e-300]);
        assert!(r > 0.0, "got {}", r);
        let r = orient2d([0.0, 0.0], [1.0, 0.0], [0.5, -1e-300]);
        assert!(r < 0.0, "got {}", r);
    }

    #[test]
    fn test_orient2d_exact_matches_filter_on_easy_input() {
        let pa = [0.1, 0.2];
        let pb = [3.5, -1.25];
        let pc = [-2.0, 4.75];
        let (det, bound) = orient2d_filter(pa, pb, pc);
        assert!(det.abs() > bound);
        assert_eq!(sign(det), sign(orient2d_exact(pa, pb, pc)));
    }

    #[test]
    fn test_orient3d_coplanar() {
        let r = orient3d(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 0.0],
        );
        assert_eq!(r, 0.0);
    }

    #[test]
    fn test_orient3d_exact_degenerate_is_zero() {
        // All four points on the z = x + y plane, coordinates exactly
        // representable
        let r = orient3d_exact(
            [0.5, 0.25, 0.75],
            [1.0, 2.0, 3.0],
            [-1.5, 0.5, -1.0],
            [0.25, 0.125, 0.375],
        );
        assert_eq!(r, 0.0);
    }

    fn coord() -> impl Strategy<Value = f64> {
        prop_oneof![-1000.0..1000.0, -1.0..1.0, -1e-6..1e-6]
    }

    fn point3() -> impl Strategy<Value = [f64; 3]> {
        prop::array::uniform3(coord())
    }

    fn nearly_collinear() -> impl Strategy<Value = ([f64; 2], [f64; 2], [f64; 2])> {
        (coord(), coord(), -1.0..1.0f64, -1e-12..1e-12f64).prop_map(|(x, y, t, eps)| {
            let p1 = [x, y];
            let p2 = [x + 1.0, y + 1.0];
            let p3 = [x + t, y + t + eps];
            (p1, p2, p3)
        })
    }

    proptest! {
        /// A filtered result that clears its bound has the exact sign.
        #[test]
        fn prop_orient2d_filter_sound(
            ax in coord(), ay in coord(),
            bx in coord(), by in coord(),
            cx in coord(), cy in coord(),
        ) {
            let pa = [ax, ay];
            let pb = [bx, by];
            let pc = [cx, cy];
            let (det, bound) = orient2d_filter(pa, pb, pc);
            if det > bound || -det > bound {
                prop_assert_eq!(sign(det), sign(orient2d_exact(pa, pb, pc)));
            }
        }

        /// The same, driven with inputs that sit near the filter's edge.
        #[test]
        fn prop_orient2d_filter_sound_near_collinear(
            (pa, pb, pc) in nearly_collinear()
        ) {
            let (det, bound) = orient2d_filter(pa, pb, pc);
            if det > bound || -det > bound {
                prop_assert_eq!(sign(det), sign(orient2d_exact(pa, pb, pc)));
            }
        }

        #[test]
        fn prop_orient3d_filter_sound(
            pa in point3(),
            pb in point3(),
            pc in point3(),
            pd in point3(),
        ) {
            let (det, bound) = orient3d_filter(pa, pb, pc, pd);
            if det > bound || -det > bound {
                prop_assert_eq!(sign(det), sign(orient3d_exact(pa, pb, pc, pd)));
            }
        }
    }
}
