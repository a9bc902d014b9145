//! Variant → LaTeX source rendering.
//!
//! Pure string accumulation, no I/O. Question numbers and choice labels are
//! assigned by final post-shuffle position only, the same convention the
//! answer key emitter uses, so a key entry always points at the right spot
//! in the typeset document.

use crate::bank::{AnswerChoice, Question, QuestionBank, QuestionBody};
use crate::descriptor::ExamDescriptor;
use crate::error::Result;
use crate::variant::{Variant, VariantItem, position_label};

use super::{Slot, TemplateSet, escape_latex, fill};

/// Which edition of a variant to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edition {
    #[default]
    Student,
    /// Same body as [`Edition::Student`] with the `answers` class option
    /// enabled, so the compiled PDF shows correct choices and fill-in
    /// answers.
    Answers,
}

/// Render the student edition of a variant.
///
/// Idempotent: identical inputs produce identical output. Any two-pass
/// cross-reference convention (`\numpages`) is the LaTeX toolchain's rerun,
/// not a second call here.
pub fn render(
    bank: &QuestionBank,
    variant: &Variant,
    descriptor: &ExamDescriptor,
    templates: &TemplateSet,
) -> Result<String> {
    render_edition(bank, variant, descriptor, templates, Edition::Student)
}

/// Render a specific edition of a variant.
pub fn render_edition(
    bank: &QuestionBank,
    variant: &Variant,
    descriptor: &ExamDescriptor,
    templates: &TemplateSet,
    edition: Edition,
) -> Result<String> {
    RenderContext::new(bank, variant, descriptor, templates, edition).render()
}

/// Context for rendering one variant (pure string accumulation).
struct RenderContext<'a> {
    bank: &'a QuestionBank,
    variant: &'a Variant,
    descriptor: &'a ExamDescriptor,
    templates: &'a TemplateSet,
    edition: Edition,
    output: String,
}

impl<'a> RenderContext<'a> {
    fn new(
        bank: &'a QuestionBank,
        variant: &'a Variant,
        descriptor: &'a ExamDescriptor,
        templates: &'a TemplateSet,
        edition: Edition,
    ) -> Self {
        Self {
            bank,
            variant,
            descriptor,
            templates,
            edition,
            output: String::new(),
        }
    }

    /// Render the variant, consuming the context and returning the source.
    fn render(mut self) -> Result<String> {
        self.write_header()?;
        for position in 1..=self.variant.items.len() {
            self.write_question(position)?;
        }
        self.write_footer()?;
        Ok(self.output)
    }

    fn write_header(&mut self) -> Result<()> {
        let template = self.templates.require(Slot::Header)?;
        let answers = match self.edition {
            Edition::Student => "",
            Edition::Answers => ",answers",
        };
        let variant_ref = format!(
            "{} {}",
            escape_latex(&self.descriptor.variant_label),
            self.variant.index
        );
        let header = fill(
            template,
            &[
                ("answers", answers),
                ("name", &escape_latex(&self.descriptor.name)),
                ("title", &escape_latex(&self.descriptor.title)),
                ("variant", &variant_ref),
            ],
        );
        self.output.push_str(&header);
        Ok(())
    }

    fn write_question(&mut self, position: usize) -> Result<()> {
        let bank = self.bank;
        let variant = self.variant;
        let item = &variant.items[position - 1];
        let question = &bank.questions[item.question];

        let body = self.render_body(question, item)?;
        let points = match question.points {
            Some(points) => format!("[{points}]"),
            None => String::new(),
        };
        let template = self.templates.require(Slot::QuestionBlock)?;
        let block = fill(
            template,
            &[
                ("number", &position.to_string()),
                ("points", &points),
                ("prompt", &question.prompt),
                ("body", &body),
            ],
        );
        self.output.push_str(&block);
        Ok(())
    }

    fn render_body(&self, question: &Question, item: &VariantItem) -> Result<String> {
        match &question.body {
            QuestionBody::SingleChoice(choices) => {
                self.render_choice_list(Slot::ChoiceList, choices, item)
            }
            QuestionBody::MultipleChoice(choices) => {
                self.render_choice_list(Slot::CheckboxList, choices, item)
            }
            QuestionBody::FillBlank(blank) => {
                let template = self.templates.require(Slot::FillBlank)?;
                let expected = blank
                    .expected
                    .as_ref()
                    .map(|text| format!("[{text}]"))
                    .unwrap_or_default();
                Ok(fill(
                    template,
                    &[
                        ("expected", &expected),
                        ("length", &blank.length_in.to_string()),
                    ],
                ))
            }
        }
    }

    fn render_choice_list(
        &self,
        list_slot: Slot,
        choices: &[AnswerChoice],
        item: &VariantItem,
    ) -> Result<String> {
        let mut items = String::new();
        for (position, &original) in item.choice_order.iter().enumerate() {
            let choice = &choices[original];
            let slot = if choice.correct {
                Slot::CorrectChoice
            } else {
                Slot::Choice
            };
            let template = self.templates.require(slot)?;
            items.push_str(&fill(
                template,
                &[
                    ("label", &position_label(position + 1)),
                    ("text", &choice.text),
                ],
            ));
            items.push('\n');
        }

        let template = self.templates.require(list_slot)?;
        Ok(fill(template, &[("items", &items)]))
    }

    fn write_footer(&mut self) -> Result<()> {
        let template = self.templates.require(Slot::Footer)?;
        self.output.push_str(template);
        Ok(())
    }
}
