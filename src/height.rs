//! Selection of a freshly created knot's tower height.

use rand::{Rng, SeedableRng};

use crate::MAX_HEIGHT;

// Using StdRng notably increases code size, but gives some protection
// against an attacker crafting inputs to force worst-case (linear-chain)
// skip lists. See the crate's ddos_protection feature.
#[cfg(feature = "ddos_protection")]
pub(crate) type RopeRng = rand::rngs::StdRng;
#[cfg(not(feature = "ddos_protection"))]
pub(crate) type RopeRng = rand::rngs::SmallRng;

pub(crate) fn new_rng() -> RopeRng {
    RopeRng::from_entropy()
}

pub(crate) fn rng_from_seed(seed: u64) -> RopeRng {
    RopeRng::seed_from_u64(seed)
}

/// Draws a knot height in `[1, MAX_HEIGHT - 1]`. Starting at 1, the height
/// grows by one level for as long as a draw from a uniform `[0, 100)` source
/// stays under `bias`.
pub(crate) fn random_height(rng: &mut RopeRng, bias: u8) -> u8 {
    let mut h: u8 = 1;
    while (h as usize) < MAX_HEIGHT - 1 && rng.gen_range(0..100u8) < bias {
        h += 1;
    }
    h
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn height_is_bounded() {
        let mut rng = rng_from_seed(42);
        for _ in 0..10_000 {
            let h = random_height(&mut rng, 90);
            assert!(h >= 1 && (h as usize) <= MAX_HEIGHT - 1);
        }
    }

    #[test]
    fn zero_bias_never_grows() {
        let mut rng = rng_from_seed(7);
        for _ in 0..100 {
            assert_eq!(random_height(&mut rng, 0), 1);
        }
    }
}
