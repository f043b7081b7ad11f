use crate::errors::SculptError;
use crate::numerical::geometry::Point3;
use log::debug;

/// Bounds how far a dragged marker may move away from its position on the unmodified base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementClamp {
    max_delta: f64,
}

impl DisplacementClamp {
    pub fn new(max_delta: f64) -> Result<Self, SculptError> {
        if !(max_delta > 0.0 && max_delta.is_finite()) {
            return Err(SculptError::InvalidConfig(format!(
                "clamp radius must be positive, got {}",
                max_delta
            )));
        }
        Ok(DisplacementClamp { max_delta })
    }

    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// `proposed` if it lies within `max_delta` of `base`, otherwise the point at distance
    /// exactly `max_delta` from `base` in the same direction
    pub fn clamp(&self, base: Point3, proposed: Point3) -> Point3 {
        let d = proposed - base;
        let length = d.norm();
        if length <= self.max_delta {
            return proposed;
        }
        debug!("displacement {:.4} clamped to {}", length, self.max_delta);
        base + d * (self.max_delta / length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_displacement_passes_through() {
        let clamp = DisplacementClamp::new(1.0).unwrap();
        let base = Point3::new(1.0, 1.0, 1.0);
        for proposed in [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.5, 1.0, 1.5),
            Point3::new(2.0, 1.0, 1.0),
        ] {
            assert_eq!(clamp.clamp(base, proposed), proposed);
        }
    }

    #[test]
    fn test_long_displacement_is_rescaled() {
        let clamp = DisplacementClamp::new(0.5).unwrap();
        let base = Point3::new(0.0, 1.0, -1.0);
        let proposed = Point3::new(3.0, 5.0, -1.0);
        let clamped = clamp.clamp(base, proposed);
        let d = clamped - base;
        assert_relative_eq!(d.norm(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(d.x / d.norm(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(d.y / d.norm(), 0.8, epsilon = 1e-12);
        assert_eq!(d.z, 0.0);
        // clamping twice changes nothing
        let again = clamp.clamp(base, clamped);
        assert_relative_eq!((again - clamped).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_radius_must_be_positive() {
        assert!(DisplacementClamp::new(0.0).is_err());
        assert!(DisplacementClamp::new(-2.0).is_err());
        assert!(DisplacementClamp::new(f64::INFINITY).is_err());
    }
}
