//! In-memory question bank model.
//!
//! Format-agnostic structure built once by the descriptor parser and shared
//! read-only by the variant selector, the renderer, and the answer key
//! emitter. Prompt and choice text are raw LaTeX by contract; only metadata
//! fields (title, course name, variant label) are escaped at render time.

/// An ordered collection of questions, immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

/// A single exam question.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Unique identifier within the bank.
    pub id: String,
    /// Prompt text (raw LaTeX).
    pub prompt: String,
    /// Optional point value, rendered as `\question[n]`.
    pub points: Option<f32>,
    pub body: QuestionBody,
}

/// The answerable part of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionBody {
    /// Exactly one choice is correct; rendered as a `choices` environment.
    SingleChoice(Vec<AnswerChoice>),
    /// One or more choices are correct; rendered as a `checkboxes` environment.
    MultipleChoice(Vec<AnswerChoice>),
    /// A fill-in line; rendered as `\fillin`.
    FillBlank(FillBlank),
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerChoice {
    /// Identifier unique within its question.
    pub id: String,
    /// Display text (raw LaTeX).
    pub text: String,
    pub correct: bool,
}

/// A fill-in-the-blank body.
#[derive(Debug, Clone, PartialEq)]
pub struct FillBlank {
    /// Expected answer, shown only when the `answers` class option is active.
    pub expected: Option<String>,
    /// Blank width in inches.
    pub length_in: f32,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a question to the bank.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Get a question by id.
    pub fn get_question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl Question {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, body: QuestionBody) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            points: None,
            body,
        }
    }

    pub fn with_points(mut self, points: f32) -> Self {
        self.points = Some(points);
        self
    }
}

impl QuestionBody {
    /// The choice list, if this body has one.
    pub fn choices(&self) -> Option<&[AnswerChoice]> {
        match self {
            QuestionBody::SingleChoice(choices) | QuestionBody::MultipleChoice(choices) => {
                Some(choices)
            }
            QuestionBody::FillBlank(_) => None,
        }
    }

    /// Number of choices (zero for fill-blank bodies).
    pub fn choice_count(&self) -> usize {
        self.choices().map(|c| c.len()).unwrap_or(0)
    }
}

impl AnswerChoice {
    /// An incorrect choice.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            correct: false,
        }
    }

    /// A correct choice.
    pub fn correct(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            correct: true,
            ..Self::new(id, text)
        }
    }
}

impl FillBlank {
    pub fn new(length_in: f32) -> Self {
        Self {
            expected: None,
            length_in,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}
