//! The `G20` multivector and its lock protocol.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use super::solve::solve4;
use super::{AlgebraError, AlgebraResult};

/// Default tolerance for [`G20::equals`].
pub const EPSILON: f64 = 1e-4;

/// Lengths below this are treated as zero when building rotors and normals.
const ZERO_LENGTH: f64 = 1e-12;

const UNLOCKED: u64 = 0;

/// Lock word no token can open: shared constants and clones produced by
/// operating on a locked value.
const FROZEN: u64 = u64::MAX;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Token handed out by [`G20::lock`]. Only the same token unlocks the value.
#[derive(Debug, PartialEq, Eq)]
pub struct LockToken(u64);

/// A multivector of the geometric algebra G(2,0).
///
/// Components are stored against the basis `{1, e1, e2, I = e1e2}`:
/// `x`, `y` form the vector part, `a` is the scalar and `b` the bivector
/// (pseudoscalar) coefficient.
///
/// Operations such as [`add`](Self::add) or [`mul`](Self::mul) treat the
/// value as a working register: the result is written into `self` and a copy
/// is returned. A [locked](Self::lock) value is never written; the operation
/// runs on a copy instead and that copy comes back permanently locked. Raw
/// assignments ([`set_x`](Self::set_x), [`copy_from`](Self::copy_from), ...)
/// on a locked value fail with [`AlgebraError::LockViolation`].
///
/// `PartialEq` compares components exactly and is what change detection
/// uses. Geometric comparisons should go through [`equals`](Self::equals),
/// which tolerates accumulated floating point error.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct G20 {
    x: f64,
    y: f64,
    a: f64,
    b: f64,
    #[serde(skip)]
    lock: u64,
}

fn geometric(l: &G20, r: &G20) -> G20 {
    G20::new(
        l.a * r.x + l.x * r.a - l.y * r.b + l.b * r.y,
        l.a * r.y + l.x * r.b + l.y * r.a - l.b * r.x,
        l.a * r.a + l.x * r.x + l.y * r.y - l.b * r.b,
        l.a * r.b + l.x * r.y - l.y * r.x + l.b * r.a,
    )
}

fn outer(l: &G20, r: &G20) -> G20 {
    G20::new(
        l.a * r.x + l.x * r.a,
        l.a * r.y + l.y * r.a,
        l.a * r.a,
        l.a * r.b + l.x * r.y - l.y * r.x + l.b * r.a,
    )
}

fn scalar_part(l: &G20, r: &G20) -> f64 {
    l.a * r.a + l.x * r.x + l.y * r.y - l.b * r.b
}

fn left_contraction(l: &G20, r: &G20) -> G20 {
    G20::new(
        l.a * r.x - l.y * r.b,
        l.a * r.y + l.x * r.b,
        scalar_part(l, r),
        l.a * r.b,
    )
}

fn right_contraction(l: &G20, r: &G20) -> G20 {
    G20::new(
        l.x * r.a + l.b * r.y,
        l.y * r.a - l.b * r.x,
        scalar_part(l, r),
        l.b * r.a,
    )
}

impl G20 {
    /// Create a multivector from its vector, scalar and bivector components.
    pub const fn new(x: f64, y: f64, a: f64, b: f64) -> Self {
        Self {
            x,
            y,
            a,
            b,
            lock: UNLOCKED,
        }
    }

    /// A pure scalar.
    pub const fn scalar(a: f64) -> Self {
        Self::new(0.0, 0.0, a, 0.0)
    }

    /// A pure vector.
    pub const fn vector(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// A pure bivector.
    pub const fn bivector(b: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, b)
    }

    /// An even-grade element (scalar + bivector), the shape of a rotor.
    pub const fn spinor(a: f64, b: f64) -> Self {
        Self::new(0.0, 0.0, a, b)
    }

    /// The additive identity, locked.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0).frozen()
    }

    /// The multiplicative identity, locked.
    pub const fn one() -> Self {
        Self::scalar(1.0).frozen()
    }

    /// The first basis vector, locked.
    pub const fn e1() -> Self {
        Self::vector(1.0, 0.0).frozen()
    }

    /// The second basis vector, locked.
    pub const fn e2() -> Self {
        Self::vector(0.0, 1.0).frozen()
    }

    /// The unit pseudoscalar `e1e2`, locked.
    #[allow(non_snake_case)]
    pub const fn I() -> Self {
        Self::bivector(1.0).frozen()
    }

    /// Rotor that turns vectors counter-clockwise by `angle` radians when
    /// applied as `R v R~`.
    pub fn rotor_from_angle(angle: f64) -> Self {
        let half = angle / 2.0;
        Self::spinor(half.cos(), -half.sin())
    }

    /// Rotor that turns the direction of `a` onto the direction of `b`.
    ///
    /// Only the vector parts are read. Antiparallel directions yield the
    /// half-turn rotor.
    pub fn rotor_from_directions(a: &G20, b: &G20) -> AlgebraResult<Self> {
        let ma = a.x.hypot(a.y);
        let mb = b.x.hypot(b.y);
        if !(ma > ZERO_LENGTH && mb > ZERO_LENGTH) {
            return Err(AlgebraError::UndefinedRotor);
        }
        let va = Self::vector(a.x, a.y);
        let vb = Self::vector(b.x, b.y);
        let ba = geometric(&vb, &va);
        let w = mb * ma + scalar_part(&vb, &va);
        if w < ZERO_LENGTH * ma * mb {
            return Ok(Self::rotor_from_angle(std::f64::consts::PI));
        }
        let denom = (2.0 * mb * ma * w).sqrt();
        Ok(Self::spinor((mb * ma + ba.a) / denom, ba.b / denom))
    }

    // -- Components --

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn set_x(&mut self, x: f64) -> AlgebraResult<&mut Self> {
        self.check_unlocked()?;
        self.x = x;
        Ok(self)
    }

    pub fn set_y(&mut self, y: f64) -> AlgebraResult<&mut Self> {
        self.check_unlocked()?;
        self.y = y;
        Ok(self)
    }

    pub fn set_a(&mut self, a: f64) -> AlgebraResult<&mut Self> {
        self.check_unlocked()?;
        self.a = a;
        Ok(self)
    }

    pub fn set_b(&mut self, b: f64) -> AlgebraResult<&mut Self> {
        self.check_unlocked()?;
        self.b = b;
        Ok(self)
    }

    /// Overwrite every component with those of `other`.
    pub fn copy_from(&mut self, other: &G20) -> AlgebraResult<&mut Self> {
        self.check_unlocked()?;
        self.x = other.x;
        self.y = other.y;
        self.a = other.a;
        self.b = other.b;
        Ok(self)
    }

    // -- Locking --

    /// Whether the value is locked.
    pub fn is_locked(&self) -> bool {
        self.lock != UNLOCKED
    }

    /// Lock the value, returning the token needed to unlock it.
    pub fn lock(&mut self) -> AlgebraResult<LockToken> {
        self.check_unlocked()?;
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        self.lock = token;
        Ok(LockToken(token))
    }

    /// Unlock a value previously locked with `token`.
    pub fn unlock(&mut self, token: &LockToken) -> AlgebraResult<()> {
        if self.lock == UNLOCKED || self.lock != token.0 {
            return Err(AlgebraError::LockViolation);
        }
        self.lock = UNLOCKED;
        Ok(())
    }

    /// An unlocked copy of this value.
    pub fn to_mutable(&self) -> Self {
        Self { lock: UNLOCKED, ..*self }
    }

    const fn frozen(self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            a: self.a,
            b: self.b,
            lock: FROZEN,
        }
    }

    fn check_unlocked(&self) -> AlgebraResult<()> {
        if self.is_locked() {
            Err(AlgebraError::LockViolation)
        } else {
            Ok(())
        }
    }

    /// Write `out` into the register, or hand back a frozen copy when locked.
    fn commit(&mut self, out: G20) -> G20 {
        if self.is_locked() {
            return out.frozen();
        }
        self.x = out.x;
        self.y = out.y;
        self.a = out.a;
        self.b = out.b;
        *self
    }

    // -- Register operations --

    pub fn add(&mut self, rhs: &G20) -> G20 {
        let out = G20::new(self.x + rhs.x, self.y + rhs.y, self.a + rhs.a, self.b + rhs.b);
        self.commit(out)
    }

    pub fn sub(&mut self, rhs: &G20) -> G20 {
        let out = G20::new(self.x - rhs.x, self.y - rhs.y, self.a - rhs.a, self.b - rhs.b);
        self.commit(out)
    }

    /// Geometric product `self * rhs`.
    pub fn mul(&mut self, rhs: &G20) -> G20 {
        let out = geometric(self, rhs);
        self.commit(out)
    }

    /// `self * rhs⁻¹`.
    pub fn div(&mut self, rhs: &G20) -> AlgebraResult<G20> {
        let inv = rhs.inverse()?;
        let out = geometric(self, &inv);
        Ok(self.commit(out))
    }

    /// Outer (wedge) product `self ∧ rhs`.
    pub fn ext(&mut self, rhs: &G20) -> G20 {
        let out = outer(self, rhs);
        self.commit(out)
    }

    /// Left contraction `self ⌋ rhs`.
    pub fn lco(&mut self, rhs: &G20) -> G20 {
        let out = left_contraction(self, rhs);
        self.commit(out)
    }

    /// Right contraction `self ⌊ rhs`.
    pub fn rco(&mut self, rhs: &G20) -> G20 {
        let out = right_contraction(self, rhs);
        self.commit(out)
    }

    /// Scalar product; leaves only the scalar part.
    pub fn scp(&mut self, rhs: &G20) -> G20 {
        let out = G20::scalar(scalar_part(self, rhs));
        self.commit(out)
    }

    pub fn neg(&mut self) -> G20 {
        let out = G20::new(-self.x, -self.y, -self.a, -self.b);
        self.commit(out)
    }

    /// Reversion: flips the sign of the bivector part.
    pub fn rev(&mut self) -> G20 {
        let out = self.reversed();
        self.commit(out)
    }

    /// Clifford conjugate: flips the vector and bivector parts.
    pub fn cc(&mut self) -> G20 {
        let out = G20::new(-self.x, -self.y, self.a, -self.b);
        self.commit(out)
    }

    /// Grade involution: flips the vector part.
    pub fn grade_involution(&mut self) -> G20 {
        let out = G20::new(-self.x, -self.y, self.a, self.b);
        self.commit(out)
    }

    /// Replace the value with its inverse.
    pub fn inv(&mut self) -> AlgebraResult<G20> {
        let out = self.inverse()?;
        Ok(self.commit(out))
    }

    /// Exponential of the even part: `exp(a + bI) = eᵃ(cos|b| + (b/|b|) sin|b| I)`.
    ///
    /// The vector part does not take part and is cleared.
    pub fn exp(&mut self) -> G20 {
        let scale = self.a.exp();
        let phi = self.b.abs();
        let sinc = if phi == 0.0 { 1.0 } else { phi.sin() / phi };
        let out = G20::spinor(scale * phi.cos(), scale * self.b * sinc);
        self.commit(out)
    }

    /// Scale to unit magnitude.
    pub fn normalize(&mut self) -> AlgebraResult<G20> {
        let m = self.magnitude();
        if m <= ZERO_LENGTH {
            return Err(AlgebraError::Singular(*self));
        }
        let out = G20::new(self.x / m, self.y / m, self.a / m, self.b / m);
        Ok(self.commit(out))
    }

    /// Multiply every component by `alpha`.
    pub fn scale(&mut self, alpha: f64) -> G20 {
        let out = G20::new(self.x * alpha, self.y * alpha, self.a * alpha, self.b * alpha);
        self.commit(out)
    }

    /// Scale the vector part component-wise by the vector part of `sigma`.
    pub fn stress(&mut self, sigma: &G20) -> G20 {
        let out = G20::new(self.x * sigma.x, self.y * sigma.y, self.a, self.b);
        self.commit(out)
    }

    /// Apply the rotor `r` as `r * self * r~`.
    pub fn rotate(&mut self, r: &G20) -> G20 {
        let out = geometric(&geometric(r, self), &r.reversed());
        self.commit(out)
    }

    /// Reflect in the line through the origin orthogonal to `normal`.
    ///
    /// The vector part is mirrored and the orientation of the bivector part
    /// flips; the scalar part is untouched.
    pub fn reflect(&mut self, normal: &G20) -> AlgebraResult<G20> {
        let nn = normal.x * normal.x + normal.y * normal.y;
        if nn <= ZERO_LENGTH {
            return Err(AlgebraError::Singular(*normal));
        }
        let k = 2.0 * (self.x * normal.x + self.y * normal.y) / nn;
        let out = G20::new(self.x - k * normal.x, self.y - k * normal.y, self.a, -self.b);
        Ok(self.commit(out))
    }

    /// Move towards `target` by the fraction `t`.
    pub fn lerp(&mut self, target: &G20, t: f64) -> G20 {
        let out = G20::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
            self.a + (target.a - self.a) * t,
            self.b + (target.b - self.b) * t,
        );
        self.commit(out)
    }

    // -- Queries --

    /// The inverse, found by solving `self * X = 1`.
    pub fn inverse(&self) -> AlgebraResult<G20> {
        // Columns follow the unknowns [Xa, Xx, Xy, Xb]; rows the result
        // components [a, x, y, b] of the geometric product.
        let m = [
            [self.a, self.x, self.y, -self.b],
            [self.x, self.a, self.b, -self.y],
            [self.y, -self.b, self.a, self.x],
            [self.b, -self.y, self.x, self.a],
        ];
        match solve4(m, [1.0, 0.0, 0.0, 0.0]) {
            Some([a, x, y, b]) => Ok(G20::new(x, y, a, b)),
            None => Err(AlgebraError::Singular(*self)),
        }
    }

    /// Reversed copy, unlocked.
    pub fn reversed(&self) -> G20 {
        G20::new(self.x, self.y, self.a, -self.b)
    }

    /// Sum of squared components, `⟨M M~⟩₀`.
    pub fn squared_norm(&self) -> f64 {
        self.a * self.a + self.x * self.x + self.y * self.y + self.b * self.b
    }

    pub fn magnitude(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Euclidean distance between the two component tuples.
    pub fn distance_to(&self, other: &G20) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dx * dx + dy * dy + da * da + db * db).sqrt()
    }

    /// Equality within [`EPSILON`].
    pub fn equals(&self, other: &G20) -> bool {
        self.approx_eq(other, EPSILON)
    }

    /// Equality within `epsilon`.
    pub fn approx_eq(&self, other: &G20, epsilon: f64) -> bool {
        self.distance_to(other) < epsilon
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.a == 0.0 && self.b == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Rotation angle of a rotor built by [`rotor_from_angle`](Self::rotor_from_angle).
    pub fn angle(&self) -> f64 {
        2.0 * (-self.b).atan2(self.a)
    }

    /// The vector part as a kurbo vector.
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The vector part as a kurbo point.
    pub fn to_point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl PartialEq for G20 {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.a == other.a && self.b == other.b
    }
}

impl fmt::Debug for G20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("G20")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("a", &self.a)
            .field("b", &self.b)
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl fmt::Display for G20 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}e1 + {}e2 + {}I", self.a, self.x, self.y, self.b)
    }
}

impl From<Vec2> for G20 {
    fn from(v: Vec2) -> Self {
        G20::vector(v.x, v.y)
    }
}

impl From<Point> for G20 {
    fn from(p: Point) -> Self {
        G20::vector(p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn sample() -> G20 {
        G20::new(2.0, -3.0, 1.5, 0.75)
    }

    #[test]
    fn test_basis_products() {
        let e1 = G20::e1();
        let e2 = G20::e2();
        assert!((e1 * e1).equals(&G20::one()));
        assert!((e1 * e2).equals(&G20::I()));
        assert!((e2 * e1).equals(&-G20::I()));
        assert!((G20::I() * G20::I()).equals(&G20::scalar(-1.0)));
    }

    /// General, vector, bivector, even, scalar and rotor values.
    fn invertible_samples() -> Vec<G20> {
        vec![
            sample(),
            G20::vector(2.0, -1.0),
            G20::bivector(3.0),
            G20::bivector(-0.25),
            G20::spinor(2.0, 1.0),
            G20::scalar(4.0),
            G20::rotor_from_angle(0.3),
            G20::rotor_from_angle(2.5),
            G20::rotor_from_angle(-PI + 0.1),
        ]
    }

    #[test]
    fn test_reversion_is_involution() {
        for original in invertible_samples() {
            let mut m = original;
            m.rev();
            m.rev();
            assert!(m.equals(&original), "rev(rev({original:?})) = {m:?}");
        }
    }

    #[test]
    fn test_inverse() {
        for m in invertible_samples() {
            let inv = m.inverse().unwrap();
            assert!((m * inv).equals(&G20::one()), "{m:?} * inv");
            assert!((inv * m).equals(&G20::one()), "inv * {m:?}");
        }
    }

    #[test]
    fn test_rotor_inverse_is_reverse() {
        for angle in [0.3, 1.7, -2.9] {
            let r = G20::rotor_from_angle(angle);
            let mut reversed = r;
            reversed.rev();
            assert!(r.inverse().unwrap().equals(&reversed));
        }
    }

    #[test]
    fn test_inverse_singular() {
        assert_eq!(
            G20::zero().inverse(),
            Err(AlgebraError::Singular(G20::zero()))
        );
        // 1 + e1 is a zero divisor: (1 + e1)(1 - e1) = 0.
        assert!(G20::new(1.0, 0.0, 1.0, 0.0).inverse().is_err());
    }

    #[test]
    fn test_div() {
        let mut m = sample();
        let divisor = G20::new(0.5, 1.0, 2.0, -1.0);
        let q = m.div(&divisor).unwrap();
        assert!((q * divisor).equals(&sample()));
    }

    #[test]
    fn test_rotor_preserves_magnitude() {
        let r = G20::rotor_from_angle(0.7);
        assert!((r.magnitude() - 1.0).abs() < 1e-12);
        let v = G20::vector(3.0, -4.0);
        let mut rotated = v;
        rotated.rotate(&r);
        assert!((rotated.magnitude() - v.magnitude()).abs() < EPSILON);
    }

    #[test]
    fn test_rotor_from_angle_turns_counter_clockwise() {
        let mut v = G20::vector(1.0, 0.0);
        v.rotate(&G20::rotor_from_angle(FRAC_PI_2));
        assert!(v.equals(&G20::vector(0.0, 1.0)));
        assert!((G20::rotor_from_angle(0.5).angle() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_exp_builds_rotor() {
        let mut w = G20::bivector(-PI / 4.0);
        let r = w.exp();
        assert!(r.equals(&G20::rotor_from_angle(FRAC_PI_2)));

        let mut zero = G20::scalar(0.0);
        assert!(zero.exp().equals(&G20::one()));
    }

    #[test]
    fn test_rotor_from_directions() {
        let a = G20::vector(2.0, 0.0);
        let b = G20::vector(0.0, 5.0);
        let r = G20::rotor_from_directions(&a, &b).unwrap();
        let mut v = a;
        v.rotate(&r);
        assert!(v.equals(&G20::vector(0.0, 2.0)));

        let back = G20::rotor_from_directions(&a, &G20::vector(-1.0, 0.0)).unwrap();
        let mut w = a;
        w.rotate(&back);
        assert!(w.equals(&G20::vector(-2.0, 0.0)));
    }

    #[test]
    fn test_rotor_from_identical_directions_is_identity() {
        for v in [G20::vector(1.0, 0.0), G20::vector(-3.0, 4.0), G20::vector(0.0, -0.5)] {
            let r = G20::rotor_from_directions(&v, &v).unwrap();
            assert!(r.equals(&G20::one()), "{v:?} -> {r:?}");
        }
        // Same direction, different length.
        let r = G20::rotor_from_directions(&G20::vector(1.0, 1.0), &G20::vector(5.0, 5.0)).unwrap();
        assert!(r.equals(&G20::one()));
    }

    #[test]
    fn test_rotor_from_opposite_directions_turns_half_way() {
        let pairs = [
            (G20::vector(1.0, 0.0), G20::vector(-1.0, 0.0)),
            (G20::vector(1.0, 1.0), G20::vector(-3.0, -3.0)),
            (G20::vector(0.0, 2.0), G20::vector(0.0, -7.0)),
        ];
        for (a, b) in pairs {
            let r = G20::rotor_from_directions(&a, &b).unwrap();
            assert!((r.magnitude() - 1.0).abs() < 1e-12);
            let mut v = a;
            v.rotate(&r);
            assert!(v.equals(&G20::new(-a.x(), -a.y(), 0.0, 0.0)), "{a:?} -> {v:?}");
        }
    }

    #[test]
    fn test_rotor_from_zero_direction() {
        let result = G20::rotor_from_directions(&G20::vector(0.0, 0.0), &G20::e1());
        assert_eq!(result, Err(AlgebraError::UndefinedRotor));
    }

    #[test]
    fn test_contractions() {
        let mut e1 = G20::vector(1.0, 0.0);
        assert!(e1.lco(&G20::I()).equals(&G20::vector(0.0, 1.0)));
        let mut i = G20::bivector(1.0);
        assert!(i.rco(&G20::e1()).equals(&G20::vector(0.0, -1.0)));
        let mut v = G20::vector(1.0, 2.0);
        assert!(v.ext(&G20::vector(3.0, 4.0)).equals(&G20::bivector(-2.0)));
        let mut s = G20::vector(1.0, 2.0);
        assert!(s.scp(&G20::vector(3.0, 4.0)).equals(&G20::scalar(11.0)));
    }

    #[test]
    fn test_locked_operations_return_frozen_clone() {
        let mut m = G20::vector(1.0, 2.0);
        let _token = m.lock().unwrap();
        let sum = m.add(&G20::vector(1.0, 1.0));
        assert!(sum.equals(&G20::vector(2.0, 3.0)));
        assert!(sum.is_locked());
        assert!(m.equals(&G20::vector(1.0, 2.0)));
        assert_eq!(m.set_x(5.0).err(), Some(AlgebraError::LockViolation));
    }

    #[test]
    fn test_unlock_requires_matching_token() {
        let mut m = G20::vector(1.0, 2.0);
        let token = m.lock().unwrap();
        let mut other = G20::scalar(1.0);
        let wrong = other.lock().unwrap();
        assert_eq!(m.unlock(&wrong), Err(AlgebraError::LockViolation));
        assert!(m.is_locked());
        m.unlock(&token).unwrap();
        assert!(!m.is_locked());
        m.add(&G20::vector(1.0, 1.0));
        assert!(m.equals(&G20::vector(2.0, 3.0)));
    }

    #[test]
    fn test_constants_cannot_be_mutated() {
        let mut zero = G20::zero();
        assert!(zero.is_locked());
        assert_eq!(zero.lock().err(), Some(AlgebraError::LockViolation));
        let moved = zero.add(&G20::e1());
        assert!(zero.is_zero());
        assert!(moved.equals(&G20::e1()));
    }

    #[test]
    fn test_reflect() {
        let mut v = G20::vector(1.0, 1.0);
        let r = v.reflect(&G20::vector(0.0, 2.0)).unwrap();
        assert!(r.equals(&G20::vector(1.0, -1.0)));
        assert!(v.reflect(&G20::zero()).is_err());
    }

    #[test]
    fn test_normalize() {
        let mut v = G20::vector(3.0, 4.0);
        assert!(v.normalize().unwrap().equals(&G20::vector(0.6, 0.8)));
        assert!(G20::scalar(0.0).normalize().is_err());
    }

    #[test]
    fn test_serde_skips_lock() {
        let json = serde_json::to_string(&G20::e2()).unwrap();
        let back: G20 = serde_json::from_str(&json).unwrap();
        assert!(!back.is_locked());
        assert_eq!(back, G20::e2());
    }
}
