//! Deterministic seed derivation for variant streams.
//!
//! A master `seed: u64` comes from the descriptor (or a time-derived value
//! when absent). Substreams are derived by hashing the master seed together
//! with the substream coordinates using SipHash-1-3 with fixed zero keys,
//! which is stable across platforms. Question selection uses the
//! `(seed, variant_index)` stream; each question's answer permutation uses
//! the `(seed, variant_index, question_id)` stream so shuffles are
//! uncorrelated across questions and variants.

use std::hash::Hasher;

use rand::SeedableRng;
use rand::rngs::StdRng;
use siphasher::sip::SipHasher13;

/// RNG for the question order of one variant.
pub(crate) fn question_stream(master_seed: u64, variant_index: u32) -> StdRng {
    StdRng::seed_from_u64(question_stream_seed(master_seed, variant_index))
}

/// RNG for the answer order of one question within one variant.
pub(crate) fn answer_stream(master_seed: u64, variant_index: u32, question_id: &str) -> StdRng {
    StdRng::seed_from_u64(answer_stream_seed(master_seed, variant_index, question_id))
}

fn question_stream_seed(master_seed: u64, variant_index: u32) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(variant_index as u64);
    hasher.finish()
}

fn answer_stream_seed(master_seed: u64, variant_index: u32, question_id: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(variant_index as u64);
    hasher.write(question_id.as_bytes());
    hasher.finish()
}
