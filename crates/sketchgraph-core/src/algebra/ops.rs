//! Operator overloads for expression-style use of [`G20`].
//!
//! Operators never touch their operands and always produce unlocked values,
//! so they work the same on locked constants and on working registers.
//!
//! | operator | product |
//! |----------|---------|
//! | `*`      | geometric |
//! | `^`      | outer |
//! | `<<`     | left contraction |
//! | `>>`     | right contraction |

use std::ops::{Add, BitXor, Mul, Neg, Shl, Shr, Sub};

use super::G20;

impl Add for G20 {
    type Output = G20;

    fn add(self, rhs: G20) -> G20 {
        G20::add(&mut self.to_mutable(), &rhs)
    }
}

impl Sub for G20 {
    type Output = G20;

    fn sub(self, rhs: G20) -> G20 {
        G20::sub(&mut self.to_mutable(), &rhs)
    }
}

impl Mul for G20 {
    type Output = G20;

    fn mul(self, rhs: G20) -> G20 {
        G20::mul(&mut self.to_mutable(), &rhs)
    }
}

impl Mul<f64> for G20 {
    type Output = G20;

    fn mul(self, alpha: f64) -> G20 {
        G20::scale(&mut self.to_mutable(), alpha)
    }
}

impl BitXor for G20 {
    type Output = G20;

    fn bitxor(self, rhs: G20) -> G20 {
        G20::ext(&mut self.to_mutable(), &rhs)
    }
}

impl Shl for G20 {
    type Output = G20;

    fn shl(self, rhs: G20) -> G20 {
        G20::lco(&mut self.to_mutable(), &rhs)
    }
}

impl Shr for G20 {
    type Output = G20;

    fn shr(self, rhs: G20) -> G20 {
        G20::rco(&mut self.to_mutable(), &rhs)
    }
}

impl Neg for G20 {
    type Output = G20;

    fn neg(self) -> G20 {
        G20::neg(&mut self.to_mutable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_leave_constants_alone() {
        let sum = G20::e1() + G20::e2();
        assert!(!sum.is_locked());
        assert!(sum.equals(&G20::vector(1.0, 1.0)));
        assert!(G20::e1().equals(&G20::vector(1.0, 0.0)));
    }

    #[test]
    fn test_operator_products_match_register_products() {
        let l = G20::new(1.0, 2.0, 3.0, 4.0);
        let r = G20::new(-1.0, 0.5, 2.0, 1.0);
        // Inherent methods are named explicitly: the operator traits are in scope here.
        assert_eq!(l * r, G20::mul(&mut l.to_mutable(), &r));
        assert_eq!(l ^ r, G20::ext(&mut l.to_mutable(), &r));
        assert_eq!(l << r, G20::lco(&mut l.to_mutable(), &r));
        assert_eq!(l >> r, G20::rco(&mut l.to_mutable(), &r));
        assert!((l * 2.0).equals(&G20::new(2.0, 4.0, 6.0, 8.0)));
        assert!((l - l).is_zero());
    }
}
