use rand::{Rng as _, SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Seeded piece stream using the 7-bag randomization algorithm.
///
/// # 7-Bag System
///
/// 1. Put all 7 piece types in a bag
/// 2. Shuffle the bag with the seeded generator
/// 3. Deal pieces from the bag
/// 4. Refill with a freshly shuffled bag once it runs empty
///
/// Every aligned run of 7 pieces is therefore a permutation of the 7 types.
///
/// # Look-ahead
///
/// [`Self::peek`] works on value copies of the generator and the bag, so it
/// never disturbs the real stream: peeking `n` pieces and then drawing `n`
/// pieces yields the same sequence.
///
/// # Example
///
/// ```
/// use tetrust_engine::SevenBagRandomizer;
///
/// let mut randomizer = SevenBagRandomizer::new(7);
/// let upcoming = randomizer.peek(5);
/// let drawn: Vec<_> = (0..5).map(|_| randomizer.next_piece()).collect();
/// assert_eq!(upcoming, drawn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SevenBagRandomizer {
    seed: u64,
    rng: Pcg32,
    bag: Vec<PieceKind>,
}

impl SevenBagRandomizer {
    /// Creates a randomizer with a deterministic seed.
    ///
    /// The bag is immediately filled with the first shuffled set of 7 pieces.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut this = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bag: Vec::with_capacity(PieceKind::LEN),
        };
        this.fill_bag();
        this
    }

    /// Like [`Self::new`], but with a seed drawn from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    /// Reinitializes the stream as if freshly created with `seed`.
    pub fn reset(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn fill_bag(&mut self) {
        fill_bag(&mut self.rng, &mut self.bag);
    }

    /// Draws the next piece, refilling the bag first when it is empty.
    pub fn next_piece(&mut self) -> PieceKind {
        draw(&mut self.rng, &mut self.bag)
    }

    /// Returns the next `count` pieces without consuming them.
    #[must_use]
    pub fn peek(&self, count: usize) -> Vec<PieceKind> {
        let mut rng = self.rng.clone();
        let mut bag = self.bag.clone();
        (0..count).map(|_| draw(&mut rng, &mut bag)).collect()
    }
}

/// Pieces are dealt from the end of the bag.
fn draw(rng: &mut Pcg32, bag: &mut Vec<PieceKind>) -> PieceKind {
    loop {
        if let Some(piece) = bag.pop() {
            return piece;
        }
        fill_bag(rng, bag);
    }
}

fn fill_bag(rng: &mut Pcg32, bag: &mut Vec<PieceKind>) {
    if bag.is_empty() {
        let mut new_bag = PieceKind::ALL;
        new_bag.shuffle(rng);
        bag.extend(new_bag);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_deterministic_piece_generation() {
        let mut randomizer1 = SevenBagRandomizer::new(0x1234_5678);
        let mut randomizer2 = SevenBagRandomizer::new(0x1234_5678);

        for _ in 0..50 {
            assert_eq!(randomizer1.next_piece(), randomizer2.next_piece());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a: Vec<_> = SevenBagRandomizer::new(1).peek(28);
        let b: Vec<_> = SevenBagRandomizer::new(2).peek(28);
        assert_ne!(a, b);
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let randomizer = SevenBagRandomizer::new(99);
        let before = randomizer.clone();
        let _ = randomizer.peek(20);
        assert_eq!(randomizer, before);
    }

    #[test]
    fn test_peek_zero_is_empty() {
        assert!(SevenBagRandomizer::new(3).peek(0).is_empty());
    }

    #[test]
    fn test_reset_restarts_stream() {
        let mut randomizer = SevenBagRandomizer::new(5);
        let first: Vec<_> = (0..10).map(|_| randomizer.next_piece()).collect();
        randomizer.reset(5);
        let again: Vec<_> = (0..10).map(|_| randomizer.next_piece()).collect();
        assert_eq!(first, again);
        assert_eq!(randomizer.seed(), 5);
    }

    proptest! {
        #[test]
        fn bag_runs_are_permutations(seed in any::<u64>(), bags in 1usize..12) {
            let mut randomizer = SevenBagRandomizer::new(seed);
            for _ in 0..bags {
                let run: HashSet<_> = (0..PieceKind::LEN).map(|_| randomizer.next_piece()).collect();
                prop_assert_eq!(run.len(), PieceKind::LEN);
            }
        }

        #[test]
        fn peek_matches_subsequent_draws(seed in any::<u64>(), skip in 0usize..10, count in 0usize..30) {
            let mut randomizer = SevenBagRandomizer::new(seed);
            for _ in 0..skip {
                randomizer.next_piece();
            }
            let peeked = randomizer.peek(count);
            let drawn: Vec<_> = (0..count).map(|_| randomizer.next_piece()).collect();
            prop_assert_eq!(peeked, drawn);
        }
    }
}
