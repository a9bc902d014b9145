//! Assembly orchestration and output writing.
//!
//! [`assemble`] runs the whole pipeline for a parsed exam: select variants,
//! render each edition, fingerprint the sources, and derive the answer key.
//! [`write_outputs`] is the only place in the crate that writes to disk on
//! the output side; compiling the written `.tex` sources is the caller's
//! job.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha512};
use tracing::{debug, info};

use crate::bank::QuestionBank;
use crate::descriptor::ExamDescriptor;
use crate::error::Result;
use crate::key::{AnswerKey, emit_key};
use crate::latex::{Edition, TemplateLibrary, render_edition};
use crate::variant::select;

/// Everything produced for one run: rendered sources plus the answer key.
#[derive(Debug, Clone)]
pub struct ExamSet {
    pub rendered: Vec<RenderedVariant>,
    pub key: AnswerKey,
}

/// Rendered output for one variant.
#[derive(Debug, Clone)]
pub struct RenderedVariant {
    /// 1-based variant index.
    pub index: u32,
    /// Student-edition LaTeX source.
    pub source: String,
    /// Answers-edition source, when the descriptor asks for one.
    pub answers_source: Option<String>,
    /// SHA-512 hex digest of the student edition, for tracing a printed
    /// exam back to its answer key.
    pub fingerprint: String,
}

/// Assemble an exam set: select, render, fingerprint, and key every variant.
///
/// Fails before producing any output when the language has no template set,
/// when the bank is too small, or when a required template slot is missing;
/// no partially-rendered set is ever returned.
///
/// # Example
///
/// ```no_run
/// use izpit::{TemplateLibrary, assemble, read_exam, write_outputs};
///
/// let (bank, descriptor) = read_exam("exam.xml")?;
/// let set = assemble(&bank, &descriptor, &TemplateLibrary::builtin())?;
/// write_outputs(&set, "out")?;
/// # Ok::<(), izpit::Error>(())
/// ```
pub fn assemble(
    bank: &QuestionBank,
    descriptor: &ExamDescriptor,
    library: &TemplateLibrary,
) -> Result<ExamSet> {
    let templates = library.get(&descriptor.language)?;
    let variants = select(bank, descriptor)?;

    let mut rendered = Vec::with_capacity(variants.len());
    let mut keys = Vec::with_capacity(variants.len());
    for variant in &variants {
        let source = render_edition(bank, variant, descriptor, templates, Edition::Student)?;
        let answers_source = if descriptor.answer_edition {
            Some(render_edition(
                bank,
                variant,
                descriptor,
                templates,
                Edition::Answers,
            )?)
        } else {
            None
        };
        let fingerprint = fingerprint(&source);
        debug!(variant = variant.index, %fingerprint, "rendered variant");

        keys.push(emit_key(bank, variant));
        rendered.push(RenderedVariant {
            index: variant.index,
            source,
            answers_source,
            fingerprint,
        });
    }

    info!(variants = rendered.len(), "assembled exam set");
    Ok(ExamSet {
        rendered,
        key: AnswerKey { variants: keys },
    })
}

/// SHA-512 hex digest of a rendered source.
pub fn fingerprint(source: &str) -> String {
    let digest = Sha512::digest(source.as_bytes());
    format!("{digest:x}")
}

/// Write an exam set into a directory, creating it if needed.
///
/// Emits `exam_vNN.tex` per variant, `exam_vNN_answers.tex` when the
/// answers edition was rendered, and `answer_key.json`. Returns the written
/// paths.
pub fn write_outputs<P: AsRef<Path>>(set: &ExamSet, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for variant in &set.rendered {
        let path = dir.join(format!("exam_v{:02}.tex", variant.index));
        std::fs::write(&path, &variant.source)?;
        written.push(path);

        if let Some(answers) = &variant.answers_source {
            let path = dir.join(format!("exam_v{:02}_answers.tex", variant.index));
            std::fs::write(&path, answers)?;
            written.push(path);
        }
    }

    let key_path = dir.join("answer_key.json");
    std::fs::write(&key_path, serde_json::to_string_pretty(&set.key)?)?;
    written.push(key_path);

    info!(files = written.len(), dir = %dir.display(), "wrote exam outputs");
    Ok(written)
}
