//! LaTeX document-source generation from a selected variant.
//!
//! This module provides pure rendering logic only: a variant plus a
//! per-language template set in, a `.tex` source string out. No I/O is
//! performed here; the export layer handles writing to disk, and invoking
//! the LaTeX compiler is the caller's business entirely. Cross-reference
//! resolution (`\numpages`) is delegated to the compiler's usual rerun
//! convention, so the emitted source is stable across passes.
//!
//! - [`escape`]: pure string escaping for metadata fields
//! - [`render`]: variant → LaTeX source rendering
//!
//! Templates use `{{placeholder}}` markers substituted textually; anything
//! else, including single LaTeX braces, passes through untouched.

mod escape;
mod render;

use std::collections::HashMap;

use crate::error::{Error, Result};

pub use escape::escape_latex;
pub use render::{Edition, render, render_edition};

/// Semantic slot within a document template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Preamble through `\begin{questions}`. Placeholders: `{{answers}}`,
    /// `{{name}}`, `{{title}}`, `{{variant}}`.
    Header,
    /// One question. Placeholders: `{{number}}`, `{{points}}`, `{{prompt}}`,
    /// `{{body}}`.
    QuestionBlock,
    /// Wrapper for single-answer choice lists. Placeholder: `{{items}}`.
    ChoiceList,
    /// Wrapper for multiple-answer choice lists. Placeholder: `{{items}}`.
    CheckboxList,
    /// One incorrect choice. Placeholders: `{{label}}`, `{{text}}`.
    Choice,
    /// One correct choice. Placeholders: `{{label}}`, `{{text}}`.
    CorrectChoice,
    /// A fill-in line. Placeholders: `{{expected}}`, `{{length}}`.
    FillBlank,
    /// `\end{questions}` through `\end{document}`.
    Footer,
}

/// Template texts for one language.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    language: String,
    slots: HashMap<Slot, String>,
}

impl TemplateSet {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            slots: HashMap::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn with_slot(mut self, slot: Slot, template: impl Into<String>) -> Self {
        self.slots.insert(slot, template.into());
        self
    }

    pub fn set_slot(&mut self, slot: Slot, template: impl Into<String>) {
        self.slots.insert(slot, template.into());
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    /// Get a slot's template, failing if it was never registered.
    pub fn require(&self, slot: Slot) -> Result<&str> {
        self.get(slot).ok_or_else(|| Error::MissingTemplateSlot {
            slot,
            language: self.language.clone(),
        })
    }

    /// Built-in Bulgarian template set (`exam` class, T2A fontenc, babel).
    pub fn bulgarian() -> Self {
        Self::builtin("bulgarian", HEADER_BULGARIAN)
    }

    /// Built-in English template set.
    pub fn english() -> Self {
        Self::builtin("english", HEADER_ENGLISH)
    }

    fn builtin(language: &str, header: &str) -> Self {
        Self::new(language)
            .with_slot(Slot::Header, header)
            .with_slot(Slot::QuestionBlock, QUESTION_BLOCK)
            .with_slot(Slot::ChoiceList, CHOICE_LIST)
            .with_slot(Slot::CheckboxList, CHECKBOX_LIST)
            .with_slot(Slot::Choice, CHOICE)
            .with_slot(Slot::CorrectChoice, CORRECT_CHOICE)
            .with_slot(Slot::FillBlank, FILL_BLANK)
            .with_slot(Slot::Footer, FOOTER)
    }
}

/// Per-language registry of template sets.
///
/// Lookup by an unregistered language tag fails with
/// [`Error::UnsupportedLanguage`]; the caller may catch that and retry with
/// a default language, but no silent substitution happens here.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    sets: HashMap<String, TemplateSet>,
}

impl TemplateLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// A library holding the built-in languages (`bulgarian`, `english`).
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.register(TemplateSet::bulgarian());
        library.register(TemplateSet::english());
        library
    }

    /// Register a template set under its language tag, replacing any
    /// previous set for that tag.
    pub fn register(&mut self, set: TemplateSet) {
        self.sets.insert(set.language.clone(), set);
    }

    pub fn get(&self, language: &str) -> Result<&TemplateSet> {
        self.sets.get(language).ok_or_else(|| Error::UnsupportedLanguage {
            language: language.to_string(),
        })
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}

/// Substitute `{{key}}` placeholders in a template.
///
/// Single pass over the template: only the provided keys are replaced,
/// substituted values are never rescanned, and unknown placeholders and
/// literal LaTeX braces pass through untouched.
pub fn fill(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let replaced = after.find("}}").and_then(|end| {
            let key = &after[..end];
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (value, end))
        });

        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                // Not one of ours; emit one brace and keep scanning, so
                // nested forms like `{{{key}}}` still resolve.
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// ----------------------------------------------------------------------------
// Built-in templates
// ----------------------------------------------------------------------------

const HEADER_BULGARIAN: &str = r"\documentclass[a4paper{{answers}}]{exam}

\usepackage[T2A]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage[bulgarian]{babel}
\selectlanguage{bulgarian}
\usepackage{minted}

\usepackage{color}

\pagestyle{headandfoot}

\runningheadrule
\runningfootrule

\firstpageheadrule
\firstpagefootrule

\firstpageheader{{{name}}}{{{title}}}{{{variant}}}
\runningheader{{{name}}}{{{title}}}{{{variant}}}

\firstpagefooter{}{\thepage\ / \numpages}{}
\runningfooter{}{\thepage\ / \numpages}{}

\begin{document}

\begin{questions}
";

const HEADER_ENGLISH: &str = r"\documentclass[a4paper{{answers}}]{exam}

\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage[english]{babel}
\selectlanguage{english}
\usepackage{minted}

\usepackage{color}

\pagestyle{headandfoot}

\runningheadrule
\runningfootrule

\firstpageheadrule
\firstpagefootrule

\firstpageheader{{{name}}}{{{title}}}{{{variant}}}
\runningheader{{{name}}}{{{title}}}{{{variant}}}

\firstpagefooter{}{\thepage\ / \numpages}{}
\runningfooter{}{\thepage\ / \numpages}{}

\begin{document}

\begin{questions}
";

const QUESTION_BLOCK: &str = r"
\question{{points}}
{{prompt}}
{{body}}
";

const CHOICE_LIST: &str = r"\begin{choices}
{{items}}\end{choices}
";

const CHECKBOX_LIST: &str = r"\begin{checkboxes}
{{items}}\end{checkboxes}
";

const CHOICE: &str = r"\choice {{text}}";

const CORRECT_CHOICE: &str = r"\CorrectChoice {{text}}";

const FILL_BLANK: &str = r"\fillin{{expected}}[{{length}}in]";

const FOOTER: &str = r"
\end{questions}
\end{document}
";
