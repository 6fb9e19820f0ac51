//! Shuffle pick
//!
//! Shuffle mode does not pre-shuffle the queue. Each advance picks a fresh
//! random position, only guaranteeing it differs from the current one. Full
//! coverage of the queue before a repeat is not guaranteed.

use rand::Rng;

/// Pick a uniformly random queue position different from `current`
///
/// Returns `None` for an empty queue. With a single track the only position
/// is returned even though it equals `current`.
pub fn pick_shuffle_index<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    current: Option<usize>,
) -> Option<usize> {
    match (len, current) {
        (0, _) => None,
        (1, _) => Some(0),
        (_, Some(current)) if current < len => {
            // Draw from the other len - 1 positions and step over `current`
            let pick = rng.gen_range(0..len - 1);
            Some(if pick >= current { pick + 1 } else { pick })
        }
        _ => Some(rng.gen_range(0..len)),
    }
}
