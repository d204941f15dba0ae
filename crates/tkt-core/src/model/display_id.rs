//! Human-readable ticket identifiers.
//!
//! Format: `TKT-<14-digit UTC timestamp>-<4 uppercase letters>`, e.g.
//! `TKT-20260823141503-QRZM`. Generated exactly once per ticket at
//! creation time. Collisions are vanishingly rare; the `display_id`
//! column's uniqueness constraint turns one into a creation failure
//! instead of retrying.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Fixed prefix shared by every display identifier.
pub const PREFIX: &str = "TKT";

const SUFFIX_LEN: usize = 4;

/// Generate a display identifier for a ticket created at `now`.
///
/// The timestamp half uses the same UTC instant persisted as the ticket's
/// creation time, so the identifier sorts consistently with `created_at`.
#[must_use]
pub fn generate(now: DateTime<Utc>) -> String {
    generate_with(now, &mut rand::thread_rng())
}

fn generate_with<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> String {
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(char::from(rng.gen_range(b'A'..=b'Z')));
    }
    format!("{PREFIX}-{}-{suffix}", now.format("%Y%m%d%H%M%S"))
}

/// Whether `candidate` has the exact shape of a display identifier.
#[must_use]
pub fn is_well_formed(candidate: &str) -> bool {
    let Some(rest) = candidate.strip_prefix("TKT-") else {
        return false;
    };
    let Some((timestamp, suffix)) = rest.split_once('-') else {
        return false;
    };
    timestamp.len() == 14
        && timestamp.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::{generate, generate_with, is_well_formed};
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_ids_are_well_formed() {
        let now = Utc.with_ymd_and_hms(2026, 8, 23, 14, 15, 3).unwrap();
        let id = generate(now);
        assert!(is_well_formed(&id), "malformed id: {id}");
        assert!(id.starts_with("TKT-20260823141503-"));
        assert_eq!(id.len(), "TKT-".len() + 14 + 1 + 4);
    }

    #[test]
    fn suffix_comes_from_the_rng() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let a = generate_with(now, &mut StdRng::seed_from_u64(1));
        let b = generate_with(now, &mut StdRng::seed_from_u64(2));
        assert_ne!(a, b, "different rng streams must yield different suffixes");
    }

    #[test]
    fn well_formed_rejects_near_misses() {
        assert!(is_well_formed("TKT-20260823141503-ABCD"));
        assert!(!is_well_formed("PRB-20260823141503-ABCD"));
        assert!(!is_well_formed("TKT-2026082314150-ABCD"));
        assert!(!is_well_formed("TKT-20260823141503-abcd"));
        assert!(!is_well_formed("TKT-20260823141503-ABC"));
        assert!(!is_well_formed("TKT-20260823141503ABCD"));
        assert!(!is_well_formed(""));
    }
}
