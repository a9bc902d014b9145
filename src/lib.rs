//! # izpit
//!
//! A fast, lightweight library for assembling randomized exam variants and
//! rendering them as LaTeX (`exam` document class) sources with derived
//! answer keys.
//!
//! ## Features
//!
//! - Parse an XML exam descriptor (metadata + question bank) with eager
//!   structural validation
//! - Deterministic, seedable question and answer shuffling per variant
//! - Render student and answers editions per variant via per-language
//!   templates (Bulgarian and English built in)
//! - Positional answer keys that always match the typeset output, plus
//!   SHA-512 source fingerprints for traceability
//!
//! ## Quick Start
//!
//! ```no_run
//! use izpit::{TemplateLibrary, assemble, read_exam, write_outputs};
//!
//! // Parse the descriptor, assemble all variants, write .tex + key files.
//! let (bank, descriptor) = read_exam("exam.xml").unwrap();
//! let set = assemble(&bank, &descriptor, &TemplateLibrary::builtin()).unwrap();
//! write_outputs(&set, "out").unwrap();
//! ```
//!
//! Compiling the written sources to PDF is the caller's job (typically
//! `latexmk`, which also resolves the `\numpages` footer reference by
//! rerunning).
//!
//! ## Working with Banks
//!
//! The [`QuestionBank`] and [`ExamDescriptor`] types can also be built
//! programmatically:
//!
//! ```
//! use izpit::{
//!     AnswerChoice, ExamDescriptor, Question, QuestionBank, QuestionBody, TemplateLibrary,
//! };
//!
//! let mut bank = QuestionBank::new();
//! bank.add_question(Question::new(
//!     "ohm",
//!     r"What does Ohm's law state?",
//!     QuestionBody::SingleChoice(vec![
//!         AnswerChoice::correct("a", r"$V = IR$"),
//!         AnswerChoice::new("b", r"$V = I/R$"),
//!         AnswerChoice::new("c", r"$V = I^2 R$"),
//!     ]),
//! ));
//!
//! let descriptor = ExamDescriptor::new("Physics")
//!     .with_language("english")
//!     .with_variants(2)
//!     .with_seed(42);
//!
//! let set = izpit::assemble(&bank, &descriptor, &TemplateLibrary::builtin()).unwrap();
//! assert_eq!(set.rendered.len(), 2);
//! assert!(set.rendered[0].source.contains(r"\begin{questions}"));
//! assert!(set.rendered[0].answers_source.is_some());
//! ```

pub mod bank;
pub mod descriptor;
pub mod error;
pub mod export;
pub mod key;
pub mod latex;
pub mod variant;
pub(crate) mod util;

pub use bank::{AnswerChoice, FillBlank, Question, QuestionBank, QuestionBody};
pub use descriptor::{ExamDescriptor, ShufflePolicy, parse_exam, parse_exam_bytes, read_exam};
pub use error::{Error, Result};
pub use export::{ExamSet, RenderedVariant, assemble, fingerprint, write_outputs};
pub use key::{AnswerKey, KeyAnswer, QuestionKey, VariantKey, emit_key, emit_keys};
pub use latex::{Edition, Slot, TemplateLibrary, TemplateSet, render, render_edition};
pub use variant::{Variant, VariantItem, position_label, select};
