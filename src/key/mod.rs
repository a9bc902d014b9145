//! Answer key derivation.
//!
//! A key entry records, for every question position in a variant, where the
//! correct answers ended up after shuffling. Positions and labels are
//! derived from the [`Variant`](crate::variant::Variant) structure with the
//! same convention the renderer uses, never from rendered text.

use serde::{Deserialize, Serialize};

use crate::bank::{QuestionBank, QuestionBody};
use crate::variant::{Variant, position_label};

/// The full answer key for a run, one entry per variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerKey {
    pub variants: Vec<VariantKey>,
}

/// Correct answers for one variant, in question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantKey {
    /// 1-based variant index, matching the rendered header and file names.
    pub variant: u32,
    pub questions: Vec<QuestionKey>,
}

/// Correct answer record for one question slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionKey {
    /// 1-based position of the question in the variant.
    pub position: usize,
    /// Authored question id, for traceability back to the bank.
    pub question: String,
    pub answer: KeyAnswer,
}

/// What counts as correct for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAnswer {
    /// Positional labels (A, B, ...) of the correct choices, in rendered
    /// order.
    Choices { labels: Vec<String> },
    /// Expected fill-in text, if the author supplied one.
    Text { expected: Option<String> },
}

/// Derive the answer key entry for one variant.
pub fn emit_key(bank: &QuestionBank, variant: &Variant) -> VariantKey {
    let questions = variant
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let question = &bank.questions[item.question];
            let answer = match &question.body {
                QuestionBody::SingleChoice(choices) | QuestionBody::MultipleChoice(choices) => {
                    let labels = item
                        .choice_order
                        .iter()
                        .enumerate()
                        .filter(|&(_, &original)| choices[original].correct)
                        .map(|(position, _)| position_label(position + 1))
                        .collect();
                    KeyAnswer::Choices { labels }
                }
                QuestionBody::FillBlank(blank) => KeyAnswer::Text {
                    expected: blank.expected.clone(),
                },
            };
            QuestionKey {
                position: index + 1,
                question: question.id.clone(),
                answer,
            }
        })
        .collect();

    VariantKey {
        variant: variant.index,
        questions,
    }
}

/// Derive the answer key for a whole run.
pub fn emit_keys(bank: &QuestionBank, variants: &[Variant]) -> AnswerKey {
    AnswerKey {
        variants: variants.iter().map(|v| emit_key(bank, v)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{AnswerChoice, FillBlank, Question, QuestionBank};
    use crate::variant::VariantItem;

    fn two_question_bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.add_question(Question::new(
            "q1",
            "First?",
            QuestionBody::SingleChoice(vec![
                AnswerChoice::correct("a", "yes"),
                AnswerChoice::new("b", "no"),
                AnswerChoice::new("c", "maybe"),
            ]),
        ));
        bank.add_question(Question::new(
            "q2",
            "Second?",
            QuestionBody::FillBlank(FillBlank::new(2.0).with_expected("42")),
        ));
        bank
    }

    #[test]
    fn test_emit_key_follows_permutation() {
        let bank = two_question_bank();
        // Correct choice (index 0) rendered last.
        let variant = Variant {
            index: 1,
            items: vec![
                VariantItem {
                    question: 0,
                    choice_order: vec![2, 1, 0],
                },
                VariantItem {
                    question: 1,
                    choice_order: vec![],
                },
            ],
        };

        let key = emit_key(&bank, &variant);
        assert_eq!(key.variant, 1);
        assert_eq!(key.questions.len(), 2);
        assert_eq!(key.questions[0].position, 1);
        assert_eq!(key.questions[0].question, "q1");
        assert_eq!(
            key.questions[0].answer,
            KeyAnswer::Choices {
                labels: vec!["C".to_string()]
            }
        );
        assert_eq!(
            key.questions[1].answer,
            KeyAnswer::Text {
                expected: Some("42".to_string())
            }
        );
    }

    #[test]
    fn test_key_serializes_to_json() {
        let bank = two_question_bank();
        let variant = Variant {
            index: 1,
            items: vec![VariantItem {
                question: 0,
                choice_order: vec![0, 1, 2],
            }],
        };
        let key = emit_keys(&bank, &[variant]);

        let json = serde_json::to_string(&key).unwrap();
        let back: AnswerKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
