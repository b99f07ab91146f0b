use std::collections::HashSet;

use log::warn;
use rand::Rng;

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of random draws tried for each candidate length
pub const MAX_ATTEMPTS_PER_LENGTH: usize = 100;

/// Shortest random short name tried before growing towards the maximum size
pub const MIN_RANDOM_LENGTH: usize = 3;

/// Generates a random alphanumeric (base62) string of the given length
pub fn generate_short_id<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Picks a random upper-case short name that is not in `taken`.
///
/// Lengths from `min(max_size, 3)` up to `max_size` each get a bounded number
/// of draws. When every draw collides, one last unchecked draw of `max_size`
/// characters is returned, so this always terminates.
pub fn random_short_name<R: Rng>(
    rng: &mut R,
    max_size: usize,
    taken: &HashSet<String>,
) -> String {
    for length in max_size.min(MIN_RANDOM_LENGTH)..=max_size {
        for _ in 0..MAX_ATTEMPTS_PER_LENGTH {
            let candidate = generate_short_id(rng, length).to_ascii_uppercase();
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    warn!(
        "Random short name space exhausted for max size {} ({} names taken), returning unchecked draw",
        max_size,
        taken.len()
    );
    generate_short_id(rng, max_size).to_ascii_uppercase()
}
