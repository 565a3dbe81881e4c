//! Small deterministic RNG for spawn positions and speeds.

/// Simple LCG (Linear Congruential Generator) RNG.
/// Uses constants from Numerical Recipes.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed.
    pub const fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32.
    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Generate random value in range [0, max). Returns 0 when `max` is 0.
    pub const fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are the better-distributed ones.
        (self.next_u32() >> 8) % max
    }

    /// Generate a value in `[low, high)`.
    pub fn next_between(&mut self, low: f64, high: f64) -> f64 {
        let unit = f64::from(self.next_u32() >> 8) / f64::from(1u32 << 24);
        (high - low).mul_add(unit, low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_rng_ranges() {
        let mut rng = SimpleRng::new(7);
        assert_eq!(rng.next_range(0), 0);
        for _ in 0..1000 {
            assert!(rng.next_range(10) < 10);
            let v = rng.next_between(0.5, 1.5);
            assert!((0.5..1.5).contains(&v));
        }
    }
}
