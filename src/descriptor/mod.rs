//! Exam descriptor parsing (single-document XML schema).
//!
//! The descriptor carries exam-level parameters (title, language, variant
//! count, shuffle policy, optional seed) and the question bank in one XML
//! document. Parsing validates the whole structure eagerly, so every
//! structural error surfaces before any variant is selected or rendered.

mod parser;

use std::path::Path;

use tracing::debug;

use crate::bank::QuestionBank;
use crate::error::Result;

pub use parser::parse_exam;

/// Exam-level parameters, decoupled from the question bank.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamDescriptor {
    /// Exam title, shown in the page header.
    pub title: String,
    /// Course or institution name, shown in the page header.
    pub name: String,
    /// Variant label prefix (e.g. "var"); combined with the variant index
    /// in the rendered header.
    pub variant_label: String,
    /// Language tag used to look up a template set.
    pub language: String,
    /// Number of variants to generate; zero is allowed and yields no output.
    pub variant_count: u32,
    /// Questions per variant; `None` means the full bank.
    pub questions_per_variant: Option<usize>,
    pub shuffle: ShufflePolicy,
    /// Master seed. Absent means non-reproducible randomness.
    pub seed: Option<u64>,
    /// Whether to also render, per variant, an edition with the `answers`
    /// class option enabled.
    pub answer_edition: bool,
}

/// What gets shuffled when a variant is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShufflePolicy {
    pub questions: bool,
    pub answers: bool,
}

impl Default for ShufflePolicy {
    /// Shuffle everything, matching the historical generator behavior.
    fn default() -> Self {
        Self {
            questions: true,
            answers: true,
        }
    }
}

impl ExamDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: String::new(),
            variant_label: "var".to_string(),
            language: "english".to_string(),
            variant_count: 1,
            questions_per_variant: None,
            shuffle: ShufflePolicy::default(),
            seed: None,
            answer_edition: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_variant_label(mut self, label: impl Into<String>) -> Self {
        self.variant_label = label.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_variants(mut self, count: u32) -> Self {
        self.variant_count = count;
        self
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.questions_per_variant = Some(count);
        self
    }

    pub fn with_shuffle(mut self, questions: bool, answers: bool) -> Self {
        self.shuffle = ShufflePolicy { questions, answers };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_answer_edition(mut self, enabled: bool) -> Self {
        self.answer_edition = enabled;
        self
    }

    /// Effective per-variant question count for the given bank.
    pub fn question_count(&self, bank: &QuestionBank) -> usize {
        self.questions_per_variant.unwrap_or(bank.len())
    }
}

/// Read an exam descriptor file from disk.
///
/// Decodes the bytes (UTF-8 with BOM handling, declared-encoding hint,
/// Windows-1251 fallback) before parsing.
///
/// # Example
///
/// ```no_run
/// use izpit::read_exam;
///
/// let (bank, descriptor) = read_exam("exam.xml")?;
/// println!("{}: {} questions", descriptor.title, bank.len());
/// # Ok::<(), izpit::Error>(())
/// ```
pub fn read_exam<P: AsRef<Path>>(path: P) -> Result<(QuestionBank, ExamDescriptor)> {
    let bytes = std::fs::read(path)?;
    parse_exam_bytes(&bytes)
}

/// Parse an exam descriptor from raw bytes.
///
/// Useful for reading from memory buffers; see [`read_exam`] for the
/// decoding rules.
pub fn parse_exam_bytes(bytes: &[u8]) -> Result<(QuestionBank, ExamDescriptor)> {
    let hint = crate::util::extract_xml_encoding(bytes);
    if let Some(hint) = hint {
        debug!(encoding = hint, "descriptor declares an encoding");
    }
    let content = crate::util::decode_text(bytes, hint);
    parse_exam(&content)
}
