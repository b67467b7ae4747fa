//! Local transforms and their composition into world space.

use kurbo::Affine;

use crate::algebra::G20;
use crate::dirty::DirtyFlags;
use crate::element::assign;
use crate::error::{SceneError, SceneResult};
use crate::observable::{Observable, Signal};

/// Position, attitude and scale, either local to the parent or composed
/// into world space.
///
/// `attitude` is a rotor; `scale` is a vector holding the x and y factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: G20,
    pub attitude: G20,
    pub scale: G20,
}

impl Placement {
    pub const IDENTITY: Self = Self {
        position: G20::vector(0.0, 0.0),
        attitude: G20::scalar(1.0),
        scale: G20::vector(1.0, 1.0),
    };

    /// Map a point from this placement's local space to its parent's space.
    ///
    /// Scale first, then rotate, then translate.
    pub fn apply(&self, point: &G20) -> G20 {
        let mut p = point.to_mutable();
        p.stress(&self.scale);
        p.rotate(&self.attitude);
        p.add(&self.position);
        p
    }

    /// The placement of `child`, given in this placement's local space.
    pub fn compose(&self, child: &Placement) -> Placement {
        let mut attitude = self.attitude.to_mutable();
        attitude.mul(&child.attitude);
        Placement {
            position: self.apply(&child.position),
            attitude,
            scale: G20::vector(
                self.scale.x() * child.scale.x(),
                self.scale.y() * child.scale.y(),
            ),
        }
    }

    pub fn rotation(&self) -> f64 {
        self.attitude.angle()
    }

    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation())
            * Affine::scale_non_uniform(self.scale.x(), self.scale.y())
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node's local transform. Each part is observable on its own.
///
/// Writes closer than `epsilon` to the stored value are ignored, so they
/// neither notify nor raise `TRANSFORM`.
#[derive(Debug)]
pub struct Transform {
    position: Observable<G20>,
    attitude: Observable<G20>,
    scale: Observable<G20>,
    epsilon: f64,
}

impl Transform {
    pub(crate) fn new(epsilon: f64) -> Self {
        Self {
            position: Observable::new(Placement::IDENTITY.position),
            attitude: Observable::new(Placement::IDENTITY.attitude),
            scale: Observable::new(Placement::IDENTITY.scale),
            epsilon,
        }
    }

    pub fn position(&self) -> G20 {
        self.position.get()
    }

    pub fn attitude(&self) -> G20 {
        self.attitude.get()
    }

    pub fn scale(&self) -> G20 {
        self.scale.get()
    }

    /// Rotation angle of the attitude, counter-clockwise in radians.
    pub fn rotation(&self) -> f64 {
        self.attitude.with(G20::angle)
    }

    pub fn position_signal(&self) -> Signal<G20> {
        self.position.signal()
    }

    pub fn attitude_signal(&self) -> Signal<G20> {
        self.attitude.signal()
    }

    pub fn scale_signal(&self) -> Signal<G20> {
        self.scale.signal()
    }

    /// Snapshot of the three parts.
    pub fn placement(&self) -> Placement {
        Placement {
            position: self.position(),
            attitude: self.attitude(),
            scale: self.scale(),
        }
    }

    pub(crate) fn set_position(
        &self,
        flags: &Observable<DirtyFlags>,
        position: G20,
    ) -> SceneResult<bool> {
        let position = checked("position", position)?;
        Ok(self.write(flags, &self.position, position))
    }

    pub(crate) fn set_attitude(
        &self,
        flags: &Observable<DirtyFlags>,
        attitude: G20,
    ) -> SceneResult<bool> {
        let attitude = checked("attitude", attitude)?;
        Ok(self.write(flags, &self.attitude, attitude))
    }

    pub(crate) fn set_scale(&self, flags: &Observable<DirtyFlags>, scale: G20) -> SceneResult<bool> {
        let scale = checked("scale", scale)?;
        Ok(self.write(flags, &self.scale, scale))
    }

    fn write(&self, flags: &Observable<DirtyFlags>, part: &Observable<G20>, value: G20) -> bool {
        if part.with(|current| current.approx_eq(&value, self.epsilon)) {
            return false;
        }
        assign(flags, part, DirtyFlags::TRANSFORM, value)
    }

    /// Detached write access, for callbacks that outlive a borrow of the scene.
    pub(crate) fn writer(&self, flags: &Observable<DirtyFlags>) -> TransformWriter {
        TransformWriter {
            flags: flags.clone(),
            transform: Transform {
                position: self.position.clone(),
                attitude: self.attitude.clone(),
                scale: self.scale.clone(),
                epsilon: self.epsilon,
            },
        }
    }
}

/// Shared handles onto one node's transform and flags.
#[derive(Debug)]
pub(crate) struct TransformWriter {
    flags: Observable<DirtyFlags>,
    transform: Transform,
}

impl TransformWriter {
    pub(crate) fn set_position(&self, position: G20) -> SceneResult<bool> {
        self.transform.set_position(&self.flags, position)
    }

    pub(crate) fn set_scale(&self, scale: G20) -> SceneResult<bool> {
        self.transform.set_scale(&self.flags, scale)
    }
}

/// Stored parts are never locked, so callers may pass the locked constants.
fn checked(property: &'static str, value: G20) -> SceneResult<G20> {
    if !value.is_finite() {
        return Err(SceneError::InvalidValue {
            property,
            value: f64::NAN,
        });
    }
    Ok(value.to_mutable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::EPSILON;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: &G20, b: &G20) -> bool {
        a.approx_eq(b, 1e-9)
    }

    #[test]
    fn test_identity_apply() {
        let p = G20::vector(3.0, -2.0);
        assert!(close(&Placement::IDENTITY.apply(&p), &p));
    }

    #[test]
    fn test_apply_scales_rotates_translates() {
        let placement = Placement {
            position: G20::vector(10.0, 0.0),
            attitude: G20::rotor_from_angle(FRAC_PI_2),
            scale: G20::vector(2.0, 2.0),
        };
        let p = placement.apply(&G20::vector(1.0, 0.0));
        assert!(close(&p, &G20::vector(10.0, 2.0)));
    }

    #[test]
    fn test_compose_matches_nested_apply() {
        let parent = Placement {
            position: G20::vector(5.0, 5.0),
            attitude: G20::rotor_from_angle(0.3),
            scale: G20::vector(2.0, 0.5),
        };
        let child = Placement {
            position: G20::vector(1.0, 2.0),
            attitude: G20::rotor_from_angle(-1.1),
            scale: G20::vector(1.0, 1.0),
        };
        let world = parent.compose(&child);
        let local = G20::vector(0.0, 0.0);
        assert!(close(&world.apply(&local), &parent.apply(&child.apply(&local))));
        assert!((world.rotation() - (0.3 - 1.1)).abs() < 1e-9);
    }

    #[test]
    fn test_affine_agrees_with_apply() {
        let placement = Placement {
            position: G20::vector(-4.0, 7.0),
            attitude: G20::rotor_from_angle(0.7),
            scale: G20::vector(3.0, 3.0),
        };
        let p = G20::vector(2.0, 1.0);
        let via_affine = placement.to_affine() * p.to_point();
        let via_apply = placement.apply(&p).to_point();
        assert!((via_affine - via_apply).hypot() < 1e-9);
    }

    #[test]
    fn test_setters_mark_transform() {
        let flags = Observable::new(DirtyFlags::EMPTY);
        let transform = Transform::new(EPSILON);

        assert!(!transform.set_position(&flags, G20::zero()).unwrap());
        assert!(flags.get().is_empty());

        assert!(transform.set_position(&flags, G20::vector(1.0, 2.0)).unwrap());
        assert_eq!(flags.get(), DirtyFlags::TRANSFORM);
        assert!(!transform.position().is_locked());

        let bad = G20::vector(f64::INFINITY, 0.0);
        assert!(transform.set_scale(&flags, bad).is_err());
    }

    #[test]
    fn test_writes_within_epsilon_are_ignored() {
        let flags = Observable::new(DirtyFlags::EMPTY);
        let transform = Transform::new(0.5);

        assert!(!transform.set_position(&flags, G20::vector(0.3, 0.0)).unwrap());
        assert!(!transform.set_attitude(&flags, G20::rotor_from_angle(0.1)).unwrap());
        assert!(flags.get().is_empty());
        assert_eq!(transform.position(), G20::zero());

        assert!(transform.set_position(&flags, G20::vector(0.6, 0.0)).unwrap());
        assert_eq!(flags.get(), DirtyFlags::TRANSFORM);
    }
}
