//! Geometry and random sampling helpers.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Heading of something falling straight down.
pub const HEADING_DOWN: f32 = -FRAC_PI_2;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Rect {
    /// Creates a rectangle from two corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Returns true if `point` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns true if the rectangle has non-negative extent on both axes.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    /// Uniform random point inside the rectangle.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            sample_between(rng, self.min.x, self.max.x),
            sample_between(rng, self.min.y, self.max.y),
        )
    }
}

/// Heading from `from` toward `to`, in radians.
#[must_use]
pub fn heading_towards(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Uniform float in `[lo, hi]`. The bounds may be given in either order.
pub fn sample_between<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if lo == hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Uniform integer in `[lo, hi)`, or `lo` when the range is empty.
pub fn sample_count<R: Rng + ?Sized>(rng: &mut R, lo: u32, hi: u32) -> u32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(2.0, 1.0));
        assert!(rect.contains(Vec2::new(2.0, 1.0)));
        assert!(rect.contains(Vec2::ZERO));
        assert!(!rect.contains(Vec2::new(2.1, 0.5)));
        assert!(!rect.contains(Vec2::new(1.0, -0.1)));
    }

    #[test]
    fn inverted_rect_is_invalid() {
        assert!(!Rect::new(Vec2::ONE, Vec2::ZERO).is_valid());
        assert!(Rect::new(Vec2::ZERO, Vec2::ZERO).is_valid());
    }

    #[test]
    fn samples_stay_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rect = Rect::new(Vec2::new(-3.0, 5.0), Vec2::new(3.0, 6.0));
        for _ in 0..200 {
            assert!(rect.contains(rect.sample(&mut rng)));
        }
    }

    #[test]
    fn degenerate_ranges_return_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((sample_between(&mut rng, 0.5, 0.5) - 0.5).abs() < f32::EPSILON);
        assert_eq!(sample_count(&mut rng, 4, 4), 4);
        assert_eq!(sample_count(&mut rng, 5, 2), 5);
    }

    #[test]
    fn count_excludes_upper_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let n = sample_count(&mut rng, 2, 5);
            assert!((2..5).contains(&n));
        }
    }

    #[test]
    fn swapped_float_bounds_are_accepted() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let v = sample_between(&mut rng, 1.0, -1.0);
        assert!((-1.0..=1.0).contains(&v));
    }

    #[test]
    fn heading_towards_cardinals() {
        assert!(heading_towards(Vec2::ZERO, Vec2::X).abs() < 1e-6);
        assert!((heading_towards(Vec2::ZERO, Vec2::NEG_Y) - HEADING_DOWN).abs() < 1e-6);
    }
}
