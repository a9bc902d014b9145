//! Variant selection: one ordered question-and-answer arrangement per exam.
//!
//! A [`Variant`] references questions by index into the bank and carries a
//! permutation of each question's choice order. It is the single source of
//! truth for ordering: both the renderer and the answer key emitter derive
//! question numbers and choice labels purely from final positions here.

mod rng;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::bank::QuestionBank;
use crate::descriptor::ExamDescriptor;
use crate::error::{Error, Result};

/// One concrete exam arrangement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// 1-based variant index; also used in output file names.
    pub index: u32,
    pub items: Vec<VariantItem>,
}

/// One question slot within a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantItem {
    /// Index of the question in the bank.
    pub question: usize,
    /// Permutation of the question's choice indices, in rendered order.
    /// Empty for fill-blank bodies.
    pub choice_order: Vec<usize>,
}

/// Produce the requested number of variants from the bank.
///
/// With an explicit descriptor seed, the result is byte-identical across
/// runs; without one, a time-derived seed is used and no determinism is
/// promised. A variant count of zero yields an empty sequence.
pub fn select(bank: &QuestionBank, descriptor: &ExamDescriptor) -> Result<Vec<Variant>> {
    let total = bank.len();
    let per_variant = descriptor.question_count(bank);
    if per_variant > total {
        return Err(Error::InsufficientQuestions {
            requested: per_variant,
            available: total,
        });
    }

    let master_seed = descriptor
        .seed
        .unwrap_or_else(crate::util::time_seed_nanos);

    let mut variants = Vec::with_capacity(descriptor.variant_count as usize);
    for index in 1..=descriptor.variant_count {
        let mut question_rng = rng::question_stream(master_seed, index);

        // Subset selection is random even when question order is preserved.
        let mut order: Vec<usize> = if per_variant < total {
            rand::seq::index::sample(&mut question_rng, total, per_variant).into_vec()
        } else {
            (0..total).collect()
        };
        if descriptor.shuffle.questions {
            order.shuffle(&mut question_rng);
        } else {
            order.sort_unstable();
        }

        let items = order
            .into_iter()
            .map(|qi| {
                let question = &bank.questions[qi];
                let mut choice_order: Vec<usize> = (0..question.body.choice_count()).collect();
                if descriptor.shuffle.answers && !choice_order.is_empty() {
                    let mut answer_rng = rng::answer_stream(master_seed, index, &question.id);
                    choice_order.shuffle(&mut answer_rng);
                }
                VariantItem {
                    question: qi,
                    choice_order,
                }
            })
            .collect();

        debug!(variant = index, questions = per_variant, "selected variant");
        variants.push(Variant { index, items });
    }

    Ok(variants)
}

/// Positional label for a 1-based position: 1 -> "A", 2 -> "B", 27 -> "AA".
///
/// Labels depend only on final rendered position, never on a choice's
/// authored identity, so the answer key stays consistent with the typeset
/// output.
pub fn position_label(position: usize) -> String {
    debug_assert!(position >= 1);
    let mut n = position;
    let mut label = String::new();
    while n > 0 {
        n -= 1;
        label.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    label
}
