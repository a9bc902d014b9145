//! Property tests for the determinism and scale contracts.

use std::collections::HashSet;

use proptest::prelude::*;

use izpit::{
    AnswerChoice, ExamDescriptor, KeyAnswer, Question, QuestionBank, QuestionBody,
    TemplateLibrary, assemble, emit_keys, select,
};

fn synthetic_bank(size: usize) -> QuestionBank {
    let mut bank = QuestionBank::new();
    for i in 0..size {
        let correct = i % 4;
        let choices = (0..4)
            .map(|c| {
                let choice = AnswerChoice::new(format!("c{c}"), format!("answer {c} to {i}"));
                if c == correct {
                    AnswerChoice {
                        correct: true,
                        ..choice
                    }
                } else {
                    choice
                }
            })
            .collect();
        bank.add_question(Question::new(
            format!("q{i}"),
            format!("Synthetic question {i}?"),
            QuestionBody::SingleChoice(choices),
        ));
    }
    bank
}

fn descriptor_strategy() -> impl Strategy<Value = (usize, usize, u32, u64, bool, bool)> {
    (2usize..10)
        .prop_flat_map(|n| (Just(n), 1..=n))
        .prop_flat_map(|(n, k)| {
            (
                Just(n),
                Just(k),
                0u32..5,
                any::<u64>(),
                any::<bool>(),
                any::<bool>(),
            )
        })
}

proptest! {
    #[test]
    fn seeded_select_is_deterministic(
        (n, k, variants, seed, shuffle_q, shuffle_a) in descriptor_strategy()
    ) {
        let bank = synthetic_bank(n);
        let descriptor = ExamDescriptor::new("T")
            .with_variants(variants)
            .with_question_count(k)
            .with_seed(seed)
            .with_shuffle(shuffle_q, shuffle_a);

        let first = select(&bank, &descriptor).unwrap();
        let second = select(&bank, &descriptor).unwrap();
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn select_produces_exact_scale(
        (n, k, variants, seed, shuffle_q, shuffle_a) in descriptor_strategy()
    ) {
        let bank = synthetic_bank(n);
        let descriptor = ExamDescriptor::new("T")
            .with_variants(variants)
            .with_question_count(k)
            .with_seed(seed)
            .with_shuffle(shuffle_q, shuffle_a);

        let selected = select(&bank, &descriptor).unwrap();
        prop_assert_eq!(selected.len(), variants as usize);

        for variant in &selected {
            prop_assert_eq!(variant.items.len(), k);

            // Selection is without replacement.
            let distinct: HashSet<usize> =
                variant.items.iter().map(|item| item.question).collect();
            prop_assert_eq!(distinct.len(), k);

            // Every choice order is a permutation of the question's choices.
            for item in &variant.items {
                let mut order = item.choice_order.clone();
                order.sort_unstable();
                prop_assert_eq!(order, (0..4).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn every_key_entry_has_a_correct_answer(
        (n, k, variants, seed, shuffle_q, shuffle_a) in descriptor_strategy()
    ) {
        let bank = synthetic_bank(n);
        let descriptor = ExamDescriptor::new("T")
            .with_variants(variants)
            .with_question_count(k)
            .with_seed(seed)
            .with_shuffle(shuffle_q, shuffle_a);

        let selected = select(&bank, &descriptor).unwrap();
        let key = emit_keys(&bank, &selected);
        prop_assert_eq!(key.variants.len(), selected.len());

        for variant_key in &key.variants {
            for entry in &variant_key.questions {
                match &entry.answer {
                    KeyAnswer::Choices { labels } => prop_assert!(!labels.is_empty()),
                    KeyAnswer::Text { .. } => {}
                }
            }
        }
    }

    #[test]
    fn seeded_assembly_is_byte_identical(seed in any::<u64>()) {
        let bank = synthetic_bank(6);
        let descriptor = ExamDescriptor::new("T")
            .with_variants(2)
            .with_question_count(4)
            .with_seed(seed);
        let library = TemplateLibrary::builtin();

        let first = assemble(&bank, &descriptor, &library).unwrap();
        let second = assemble(&bank, &descriptor, &library).unwrap();

        for (a, b) in first.rendered.iter().zip(&second.rendered) {
            prop_assert_eq!(&a.source, &b.source);
            prop_assert_eq!(&a.answers_source, &b.answers_source);
            prop_assert_eq!(&a.fingerprint, &b.fingerprint);
        }
        prop_assert_eq!(first.key, second.key);
    }
}
