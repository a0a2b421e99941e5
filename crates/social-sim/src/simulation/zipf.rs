//! Zipf-distributed choice of engine index.
//!
//! `P(k) ∝ (v + k)^-s` for `k` in `0..n`, so index 0 is the hot engine and
//! the tail thins out polynomially.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Zipf {
    index: WeightedIndex<f64>,
}

impl Zipf {
    pub fn new(n: usize, exponent: f64, offset: f64) -> Result<Self, WeightedError> {
        let weights = (0..n).map(|k| (offset + k as f64).powf(-exponent));
        Ok(Self {
            index: WeightedIndex::new(weights)?,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_low_indices_are_hot() {
        let zipf = Zipf::new(10, 1.1, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts = [0usize; 10];
        for _ in 0..20_000 {
            counts[zipf.sample(&mut rng)] += 1;
        }

        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[4]);
        assert!(counts[4] > counts[9]);
        assert!(counts.iter().all(|&c| c > 0));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let zipf = Zipf::new(5, 1.1, 1.0).unwrap();
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..50).map(|_| zipf.sample(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn test_empty_range_is_rejected() {
        assert!(Zipf::new(0, 1.1, 1.0).is_err());
    }
}
