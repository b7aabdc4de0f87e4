//! # Tessera Predicates
//!
//! Robust geometric predicates for Delaunay triangulation, mesh
//! generation, and power-diagram construction.
//!
//! A geometric predicate answers a sign question -- "is this point above
//! the plane?", "is this point inside the circumscribing ball?" --
//! whose naive floating-point evaluation can return the wrong sign near
//! degeneracies. Every predicate in this crate returns an f64 whose
//! **sign is exact** for all finite, non-overflowing inputs; the
//! magnitude of a nonzero result is only indicative. Exactly-degenerate
//! configurations return `+0.0`.
//!
//! Internally each predicate is a two-stage filter: a plain f64 kernel
//! paired with a rigorous roundoff bound handles the overwhelming
//! majority of inputs, and a multi-precision expansion kernel (Shewchuk
//! 1997) decides the rest exactly.
//!
//! ## Predicates
//!
//! | Function | Question |
//! |----------|----------|
//! | [`orient2d`] | Sign of the signed area of triangle (a, b, c) |
//! | [`orient3d`] | Sign of the signed volume of tetrahedron (a, b, c, d) |
//! | [`bisect2d`] / [`bisect3d`] | Which of two sites is closer to a query |
//! | [`bisect2w`] / [`bisect3w`] | Power-distance comparison of two weighted sites |
//! | [`inball2d`] / [`inball3d`] | Is the query inside the simplex's circumball? |
//! | [`inball2w`] / [`inball3w`] | Is the query inside the weighted simplex's orthoball? |
//!
//! Weighted points append their weight after the coordinates (index `d`
//! for dimension `d`).
//!
//! ## Floating-point requirements
//!
//! The error-free transformations require strict IEEE 754 f64 semantics:
//! round-to-nearest-even and no excess precision. Rust guarantees both
//! on every supported target (x86-64 uses SSE2 scalar arithmetic, never
//! x87 temporaries) and never reassociates or contracts float
//! expressions, so no special build flags are needed. NaN and infinite
//! inputs are the caller's responsibility to exclude.
//!
//! ## Initialization
//!
//! [`init`] derives the machine constants at run time and checks them
//! against the compile-time values the kernels use. Calling it once at
//! startup is customary but not required; it is idempotent and the
//! predicates are fully reentrant afterwards (and before).

pub mod bisect;
pub mod error_bounds;
pub mod expansion;
pub mod inball;
pub mod orient;

pub use bisect::{bisect2d, bisect2w, bisect3d, bisect3w};
pub use error_bounds::{init, EPSILON, SPLITTER};
pub use expansion::{
    expansion_dot, fast_two_diff, fast_two_sum, split, two_diff, two_one_diff, two_one_sum,
    two_product, two_product_presplit, two_square, two_sum, two_two_diff, two_two_sum, Expansion,
};
pub use inball::{inball2d, inball2w, inball3d, inball3w};
pub use orient::{orient2d, orient3d};
