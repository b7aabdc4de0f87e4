//! Multi-precision floating-point expansion arithmetic.
//!
//! Represents exact real values as sums of non-overlapping f64 terms and
//! provides the error-free transformations (EFTs) that build and combine
//! them. These are the building blocks for the exact predicate kernels.

use smallvec::SmallVec;

use crate::error_bounds::SPLITTER;

/// Error-free transformation for addition.
///
/// Computes the sum `s = a + b` and the roundoff error `e` such that
/// `a + b = s + e` exactly. Works for arbitrary operands.
///
/// # Algorithm
///
/// Uses the Knuth two-sum algorithm:
/// 1. Compute the sum: `s = a + b`
/// 2. Compute the virtual operand: `v = s - a`
/// 3. Compute the roundoff error: `e = (a - (s - v)) + (b - v)`
///
/// # Examples
///
/// ```
/// # use tessera_predicates::two_sum;
/// let (sum, error) = two_sum(1.0, 1e-20);
/// assert_eq!(sum, 1.0);
/// assert_eq!(error, 1e-20);
/// ```
///
/// # References
///
/// - Knuth, D. E. (1997). The Art of Computer Programming, Volume 2.
/// - Shewchuk, J. R. (1997). Adaptive Precision Floating-Point Arithmetic
///   and Fast Robust Geometric Predicates.
#[inline(always)]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let v = s - a;
    let e = (a - (s - v)) + (b - v);
    (s, e)
}

/// Error-free addition for operands with `|a| >= |b|`.
///
/// Three operations instead of six; the precondition is the caller's
/// responsibility.
#[inline(always)]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let e = b - (s - a);
    (s, e)
}

/// Error-free transformation for subtraction.
///
/// Computes `d = a - b` and the roundoff error `e` such that
/// `a - b = d + e` exactly, for arbitrary operands.
#[inline(always)]
pub fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let d = a - b;
    let bvirt = a - d;
    let avirt = d + bvirt;
    let bround = bvirt - b;
    let around = a - avirt;
    (d, around + bround)
}

/// Error-free subtraction for operands with `|a| >= |b|`.
#[inline(always)]
pub fn fast_two_diff(a: f64, b: f64) -> (f64, f64) {
    let d = a - b;
    let e = (a - d) - b;
    (d, e)
}

/// Veltkamp split of a double into high and low halves.
///
/// Returns `(hi, lo)` with `hi + lo = a` exactly, each half narrow
/// enough (26 significant bits) that products of halves incur no
/// roundoff, which is what [`two_product`] relies on.
#[inline(always)]
pub fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let abig = c - a;
    let hi = c - abig;
    let lo = a - hi;
    (hi, lo)
}

/// Error-free transformation for multiplication.
///
/// Computes the product `p = a * b` and the roundoff error `e` such that
/// `a * b = p + e` exactly.
///
/// # Algorithm
///
/// Splits both operands with [`split`] and reconstructs the low part from
/// the partial products:
///
/// ```text
/// p   = fl(a * b)
/// e   = a_lo * b_lo - (((p - a_hi * b_hi) - a_lo * b_hi) - a_hi * b_lo)
/// ```
///
/// Each partial product of split halves is exact, so the subtraction
/// chain recovers the roundoff of `p` without error.
///
/// # Examples
///
/// ```
/// # use tessera_predicates::two_product;
/// let (p, e) = two_product(2.0, 3.0);
/// assert_eq!(p, 6.0);
/// assert_eq!(e, 0.0);
/// ```
///
/// # References
///
/// - Dekker, T. J. (1971). A floating-point technique for extending the
///   available precision.
/// - Shewchuk, J. R. (1997). Adaptive Precision Floating-Point Arithmetic
///   and Fast Robust Geometric Predicates.
#[inline(always)]
pub fn two_product(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let (ah, al) = split(a);
    let (bh, bl) = split(b);
    let err1 = p - ah * bh;
    let err2 = err1 - al * bh;
    let err3 = err2 - ah * bl;
    (p, al * bl - err3)
}

/// [`two_product`] with a pre-split second operand.
///
/// Saves one split when the same `b` multiplies several terms, as in
/// [`Expansion::scale`].
#[inline(always)]
pub fn two_product_presplit(a: f64, b: f64, bh: f64, bl: f64) -> (f64, f64) {
    let p = a * b;
    let (ah, al) = split(a);
    let err1 = p - ah * bh;
    let err2 = err1 - al * bh;
    let err3 = err2 - ah * bl;
    (p, al * bl - err3)
}

/// Error-free squaring, a specialization of [`two_product`].
#[inline(always)]
pub fn two_square(a: f64) -> (f64, f64) {
    let q = a * a;
    let (ah, al) = split(a);
    let err1 = q - ah * ah;
    let err3 = err1 - (ah + ah) * al;
    (q, al * al - err3)
}

/// Exact sum of a two-term expansion and a double.
///
/// Returns the three output terms in increasing order of magnitude.
#[inline(always)]
pub fn two_one_sum(a1: f64, a0: f64, b: f64) -> [f64; 3] {
    let (t, x0) = two_sum(a0, b);
    let (x2, x1) = two_sum(a1, t);
    [x0, x1, x2]
}

/// Exact difference of a two-term expansion and a double.
#[inline(always)]
pub fn two_one_diff(a1: f64, a0: f64, b: f64) -> [f64; 3] {
    let (t, x0) = two_diff(a0, b);
    let (x2, x1) = two_sum(a1, t);
    [x0, x1, x2]
}

/// Exact sum of two two-term expansions, in increasing order of magnitude.
#[inline(always)]
pub fn two_two_sum(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let [x0, t0, t1] = two_one_sum(a1, a0, b0);
    let [x1, x2, x3] = two_one_sum(t1, t0, b1);
    [x0, x1, x2, x3]
}

/// Exact difference of two two-term expansions.
#[inline(always)]
pub fn two_two_diff(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let [x0, t0, t1] = two_one_diff(a1, a0, b0);
    let [x1, x2, x3] = two_one_diff(t1, t0, b1);
    [x0, x1, x2, x3]
}

/// Multi-precision floating-point expansion.
///
/// Represents an exact real value as a sum of f64 terms stored in
/// increasing order of magnitude.
///
/// # Invariants
///
/// - All terms are non-overlapping (no two terms share significand bits)
/// - Terms are stored in increasing order of magnitude
/// - No term is zero; the zero expansion has no terms
///
/// The last term is the *leading* component and carries the sign of the
/// exact value, which is what the exact predicate kernels read.
///
/// # Examples
///
/// ```
/// # use tessera_predicates::Expansion;
/// let e = Expansion::from_f64(1.0).add(&Expansion::from_f64(1e-20));
/// assert_eq!(e.len(), 2);
/// assert!(e.leading() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Expansion {
    terms: SmallVec<[f64; 32]>,
}

impl Expansion {
    /// Creates an expansion from a single f64 value.
    pub fn from_f64(value: f64) -> Self {
        if value == 0.0 {
            Self {
                terms: SmallVec::new(),
            }
        } else {
            let mut terms = SmallVec::new();
            terms.push(value);
            Self { terms }
        }
    }

    /// Creates the exact expansion of `a - b`, at most two terms.
    ///
    /// This is how the exact kernels lift coordinate differences:
    /// the subtraction itself contributes no rounding error.
    pub fn from_diff(a: f64, b: f64) -> Self {
        let (d, e) = two_diff(a, b);
        Self::from_parts(d, e)
    }

    /// Creates the exact expansion of `a * b`, at most two terms.
    pub fn from_product(a: f64, b: f64) -> Self {
        let (p, e) = two_product(a, b);
        Self::from_parts(p, e)
    }

    fn from_parts(hi: f64, lo: f64) -> Self {
        let mut terms = SmallVec::new();
        if lo != 0.0 {
            terms.push(lo);
        }
        if hi != 0.0 {
            terms.push(hi);
        }
        Self { terms }
    }

    /// Returns an approximation of the expansion as a single f64.
    ///
    /// Sums the terms in increasing magnitude order; for long expansions
    /// the result is rounded, so it is an estimate, not the exact value.
    pub fn estimate(&self) -> f64 {
        self.terms.iter().sum()
    }

    /// Returns the leading (largest-magnitude) component, or `0.0` for
    /// the zero expansion.
    ///
    /// The sign of the leading component is the sign of the exact value.
    pub fn leading(&self) -> f64 {
        self.terms.last().copied().unwrap_or(0.0)
    }

    /// Returns the number of terms in the expansion.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the expansion has no terms (represents zero).
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the terms in increasing order of magnitude.
    pub fn terms(&self) -> &[f64] {
        &self.terms
    }

    /// Adds a single f64 value to this expansion (Grow-Expansion).
    ///
    /// Sweeps `b` through the terms with a [`two_sum`] chain, emitting
    /// each roundoff term and carrying the sum upward. Zero terms are
    /// eliminated on the way out.
    fn grow(&self, b: f64) -> Self {
        if b == 0.0 {
            return self.clone();
        }
        if self.is_empty() {
            return Self::from_f64(b);
        }

        let mut result = SmallVec::with_capacity(self.len() + 1);
        let mut q = b;

        for &e in &self.terms {
            let (sum, err) = two_sum(q, e);
            if err != 0.0 {
                result.push(err);
            }
            q = sum;
        }

        if q != 0.0 {
            result.push(q);
        }

        Self { terms: result }
    }

    /// Adds two expansions together.
    ///
    /// Grows this expansion by each term of `other`; every intermediate
    /// is itself a valid expansion, so the invariants are preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tessera_predicates::Expansion;
    /// let e1 = Expansion::from_f64(1.0);
    /// let e2 = Expansion::from_f64(2.0);
    /// assert_eq!(e1.add(&e2).estimate(), 3.0);
    /// ```
    pub fn add(&self, other: &Expansion) -> Expansion {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let mut result = self.clone();
        for &term in &other.terms {
            result = result.grow(term);
        }
        result
    }

    /// Subtracts another expansion from this one.
    ///
    /// Implemented as addition with negation: `a - b = a + (-b)`.
    /// Negating every term of an expansion is exact.
    pub fn sub(&self, other: &Expansion) -> Expansion {
        if other.is_empty() {
            return self.clone();
        }

        let mut negated = other.clone();
        for term in &mut negated.terms {
            *term = -*term;
        }
        self.add(&negated)
    }

    /// Scales an expansion by a scalar (Scale-Expansion).
    ///
    /// Splits the scalar once, multiplies each term with
    /// [`two_product_presplit`], and interleaves the partial products
    /// with [`two_sum`]/[`fast_two_sum`] so that every roundoff lands in
    /// its own output term. At most `2 * len` terms.
    pub fn scale(&self, b: f64) -> Expansion {
        if b == 0.0 || self.is_empty() {
            return Self {
                terms: SmallVec::new(),
            };
        }

        let (bh, bl) = split(b);
        let mut result = SmallVec::with_capacity(self.len() * 2);

        let (mut q, h) = two_product_presplit(self.terms[0], b, bh, bl);
        if h != 0.0 {
            result.push(h);
        }

        for &e in &self.terms[1..] {
            let (t1, t0) = two_product_presplit(e, b, bh, bl);
            let (sum, h) = two_sum(q, t0);
            if h != 0.0 {
                result.push(h);
            }
            let (carry, h) = fast_two_sum(t1, sum);
            if h != 0.0 {
                result.push(h);
            }
            q = carry;
        }

        if q != 0.0 {
            result.push(q);
        }

        Self { terms: result }
    }

    /// Multiplies two expansions together.
    ///
    /// Scales this expansion by each term of `other` and accumulates.
    pub fn mul(&self, other: &Expansion) -> Expansion {
        if self.is_empty() || other.is_empty() {
            return Self {
                terms: SmallVec::new(),
            };
        }

        let mut result = Self {
            terms: SmallVec::new(),
        };

        for &term in &other.terms {
            let scaled = self.scale(term);
            result = result.add(&scaled);
        }

        result
    }
}

/// Evaluates the dot product of two expansion vectors exactly.
///
/// Computes `sum(u[i] * v[i])` as an expansion. The squared-distance
/// terms of the bisect and in-ball kernels are dot products of
/// coordinate-difference expansions with themselves.
pub fn expansion_dot(u: &[Expansion], v: &[Expansion]) -> Expansion {
    debug_assert_eq!(u.len(), v.len());

    let mut result = Expansion::from_f64(0.0);
    for (ui, vi) in u.iter().zip(v) {
        result = result.add(&ui.mul(vi));
    }
    result
}
