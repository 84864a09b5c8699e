//! Unit-length four component semantic vectors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed deviation of `|v|` from 1.0 for a vector to count as normalized.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Errors raised when constructing a [`SemanticVector`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    #[error("vector component is not finite: {0:?}")]
    NonFinite([f64; 4]),

    #[error("vector has zero length")]
    ZeroLength,
}

/// A point on the unit 3-sphere describing an encoded intent or a plan.
///
/// Values are immutable once built: every constructor normalizes, and every
/// operation returns a fresh vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComponents", into = "RawComponents")]
pub struct SemanticVector {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl SemanticVector {
    /// Neutral point used for fresh profiles and degenerate intents.
    pub const NEUTRAL: SemanticVector = SemanticVector {
        w: 0.5,
        x: 0.5,
        y: 0.5,
        z: 0.5,
    };

    /// Build a normalized vector from raw components.
    pub fn try_new(w: f64, x: f64, y: f64, z: f64) -> Result<Self, VectorError> {
        Self::try_from_array([w, x, y, z])
    }

    /// Build a normalized vector from an array of raw components.
    pub fn try_from_array(components: [f64; 4]) -> Result<Self, VectorError> {
        if components.iter().any(|c| !c.is_finite()) {
            return Err(VectorError::NonFinite(components));
        }

        let norm = components.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm <= f64::EPSILON {
            return Err(VectorError::ZeroLength);
        }

        Ok(Self {
            w: components[0] / norm,
            x: components[1] / norm,
            y: components[2] / norm,
            z: components[3] / norm,
        })
    }

    /// Normalize `components`, falling back to `fallback` when they cannot be.
    pub fn normalized_or(components: [f64; 4], fallback: SemanticVector) -> Self {
        Self::try_from_array(components).unwrap_or(fallback)
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Euclidean length; `1.0 ± NORM_TOLERANCE` for every constructed value.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm() - 1.0).abs() <= NORM_TOLERANCE
    }

    pub fn dot(&self, other: &SemanticVector) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cosine similarity. Both operands are unit vectors, so this is the dot
    /// product clamped against rounding drift.
    pub fn similarity(&self, other: &SemanticVector) -> f64 {
        self.dot(other).clamp(-1.0, 1.0)
    }

    /// Linear blend `self·(1−α) + other·α`, renormalized.
    ///
    /// Antipodal inputs at `α = 0.5` cancel out; `self` is returned then.
    pub fn blend(&self, other: &SemanticVector, alpha: f64) -> SemanticVector {
        let alpha = alpha.clamp(0.0, 1.0);
        let a = self.as_array();
        let b = other.as_array();
        let mut mixed = [0.0; 4];
        for i in 0..4 {
            mixed[i] = a[i] * (1.0 - alpha) + b[i] * alpha;
        }
        Self::normalized_or(mixed, *self)
    }

    /// Spherical interpolation toward `other` by `t` in `[0, 1]`.
    pub fn slerp(&self, other: &SemanticVector, t: f64) -> SemanticVector {
        let t = t.clamp(0.0, 1.0);
        let cos = self.similarity(other);
        let theta = cos.acos();
        if theta.abs() < 1e-6 {
            return *self;
        }
        // Nearly antipodal: the great circle is undefined, fall back to a blend.
        if (std::f64::consts::PI - theta).abs() < 1e-6 {
            return self.blend(other, t);
        }

        let sin = theta.sin();
        let a = ((1.0 - t) * theta).sin() / sin;
        let b = (t * theta).sin() / sin;
        let lhs = self.as_array();
        let rhs = other.as_array();
        let mut out = [0.0; 4];
        for i in 0..4 {
            out[i] = lhs[i] * a + rhs[i] * b;
        }
        Self::normalized_or(out, *self)
    }

    /// Multiply one component by `factor` and renormalize.
    pub fn scaled_component(&self, index: usize, factor: f64) -> SemanticVector {
        let mut components = self.as_array();
        if let Some(c) = components.get_mut(index) {
            *c *= factor;
        }
        Self::normalized_or(components, *self)
    }

    /// Add an offset to every component and renormalize.
    pub fn offset(&self, delta: [f64; 4]) -> SemanticVector {
        let mut components = self.as_array();
        for (c, d) in components.iter_mut().zip(delta) {
            *c += d;
        }
        Self::normalized_or(components, *self)
    }

    /// Stable 64-bit fingerprint of the exact component bits.
    pub fn fingerprint(&self) -> u64 {
        self.as_array()
            .iter()
            .fold(0xcbf2_9ce4_8422_2325_u64, |acc, c| {
                (acc ^ c.to_bits()).wrapping_mul(0x0000_0100_0000_01b3)
            })
    }
}

/// Wire form of a vector; renormalized on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawComponents {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl TryFrom<RawComponents> for SemanticVector {
    type Error = VectorError;

    fn try_from(raw: RawComponents) -> Result<Self, Self::Error> {
        Self::try_new(raw.w, raw.x, raw.y, raw.z)
    }
}

impl From<SemanticVector> for RawComponents {
    fn from(v: SemanticVector) -> Self {
        Self {
            w: v.w,
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl Default for SemanticVector {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl std::fmt::Display for SemanticVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}, {:.4}, {:.4})",
            self.w, self.x, self.y, self.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn component() -> impl Strategy<Value = f64> {
        -10.0f64..10.0
    }

    fn unit_vector() -> impl Strategy<Value = SemanticVector> {
        (component(), component(), component(), component())
            .prop_filter_map("zero length", |(w, x, y, z)| {
                SemanticVector::try_new(w, x, y, z).ok()
            })
    }

    #[test]
    fn test_neutral_is_normalized() {
        assert!(SemanticVector::NEUTRAL.is_normalized());
        assert_eq!(SemanticVector::default(), SemanticVector::NEUTRAL);
    }

    #[test]
    fn test_zero_and_non_finite_rejected() {
        assert_eq!(
            SemanticVector::try_new(0.0, 0.0, 0.0, 0.0),
            Err(VectorError::ZeroLength)
        );
        assert!(matches!(
            SemanticVector::try_new(f64::NAN, 1.0, 0.0, 0.0),
            Err(VectorError::NonFinite(_))
        ));
        let fallback = SemanticVector::normalized_or([0.0; 4], SemanticVector::NEUTRAL);
        assert_eq!(fallback, SemanticVector::NEUTRAL);
    }

    #[test]
    fn test_blend_moves_toward_target() {
        let a = SemanticVector::try_new(1.0, 0.0, 0.0, 0.0).unwrap();
        let b = SemanticVector::try_new(0.0, 1.0, 0.0, 0.0).unwrap();
        let mid = a.blend(&b, 0.1);
        assert!(mid.is_normalized());
        assert!(mid.similarity(&b) > a.similarity(&b));
        assert!(mid.similarity(&a) > mid.similarity(&b));
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = SemanticVector::try_new(1.0, 0.0, 0.0, 0.0).unwrap();
        let b = SemanticVector::try_new(0.0, 0.0, 1.0, 0.0).unwrap();
        assert!((a.slerp(&b, 0.0).similarity(&a) - 1.0).abs() < 1e-9);
        assert!((a.slerp(&b, 1.0).similarity(&b) - 1.0).abs() < 1e-9);
        let half = a.slerp(&b, 0.5);
        assert!((half.similarity(&a) - half.similarity(&b)).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_component_changes_direction() {
        let v = SemanticVector::NEUTRAL.scaled_component(2, 1.5);
        assert!(v.is_normalized());
        assert!(v.z() > v.y());
        assert!(v.similarity(&SemanticVector::NEUTRAL) > 0.95);
    }

    #[test]
    fn test_deserialize_renormalizes() {
        let v: SemanticVector = serde_json::from_str(r#"{"w":2.0,"x":0.0,"y":0.0,"z":0.0}"#).unwrap();
        assert!(v.is_normalized());
        assert_eq!(v.w(), 1.0);
        assert!(serde_json::from_str::<SemanticVector>(r#"{"w":0,"x":0,"y":0,"z":0}"#).is_err());
    }

    proptest! {
        #[test]
        fn property_constructed_vectors_are_unit(v in unit_vector()) {
            prop_assert!(v.is_normalized());
        }

        #[test]
        fn property_self_similarity_is_one(v in unit_vector()) {
            prop_assert!((v.similarity(&v) - 1.0).abs() < 1e-9);
        }

        #[test]
        fn property_similarity_is_symmetric(a in unit_vector(), b in unit_vector()) {
            prop_assert_eq!(a.similarity(&b), b.similarity(&a));
        }

        #[test]
        fn property_slerp_stays_on_sphere(a in unit_vector(), b in unit_vector(), t in 0.0f64..1.0) {
            prop_assert!(a.slerp(&b, t).is_normalized());
            prop_assert!(a.blend(&b, t).is_normalized());
        }
    }
}
