//! Pull parser for the exam descriptor schema.

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::bank::{AnswerChoice, FillBlank, Question, QuestionBank, QuestionBody};
use crate::descriptor::{ExamDescriptor, ShufflePolicy};
use crate::error::{Error, Result};

/// A question under construction.
struct QuestionDraft {
    id: String,
    points: Option<f32>,
    prompt: Option<String>,
    body: Option<QuestionBody>,
}

enum GroupKind {
    Single,
    Multiple,
}

/// Parse an exam descriptor document.
///
/// The document carries the exam metadata and the question bank in a single
/// `<exam>` element; see the crate documentation for the schema. All
/// structural validation happens here, before any variant is selected.
///
/// # Example
///
/// ```
/// use izpit::parse_exam;
///
/// let doc = r#"<exam>
///   <title>Physics</title>
///   <language>english</language>
///   <variants>2</variants>
///   <questions>
///     <question id="q1">
///       <text>Pick one.</text>
///       <choose-single>
///         <correct-choice>right</correct-choice>
///         <choice>wrong</choice>
///       </choose-single>
///     </question>
///   </questions>
/// </exam>"#;
///
/// let (bank, descriptor) = parse_exam(doc)?;
/// assert_eq!(bank.len(), 1);
/// assert_eq!(descriptor.variant_count, 2);
/// # Ok::<(), izpit::Error>(())
/// ```
pub fn parse_exam(content: &str) -> Result<(QuestionBank, ExamDescriptor)> {
    let mut reader = Reader::from_str(content);

    // Exam-level metadata
    let mut title: Option<String> = None;
    let mut name = String::new();
    let mut variant_label = "var".to_string();
    let mut language: Option<String> = None;
    let mut variant_count: Option<u32> = None;
    let mut questions_per_variant: Option<usize> = None;
    let mut shuffle = ShufflePolicy::default();
    let mut seed: Option<u64> = None;
    let mut answer_edition = true;

    // Question bank under construction
    let mut bank = QuestionBank::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    // Parser state
    let mut saw_root = false;
    let mut in_questions = false;
    let mut question: Option<QuestionDraft> = None;
    let mut group: Option<(GroupKind, Vec<AnswerChoice>)> = None;
    let mut blank: Option<FillBlank> = None;
    let mut choice_correct = false;
    let mut choice_id: Option<String> = None;
    let mut collecting = false;
    let mut buf_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_bytes = e.name();
                match name_bytes.as_ref() {
                    b"exam" if !saw_root => saw_root = true,
                    _ if !saw_root => {
                        return Err(unexpected_element(&e));
                    }
                    b"questions" if question.is_none() && !in_questions => in_questions = true,
                    b"question" if in_questions && question.is_none() => {
                        let id = attr_string(&e, b"id").ok_or_else(|| {
                            Error::MalformedDescriptor("question missing id attribute".to_string())
                        })?;
                        let points = attr_string(&e, b"points")
                            .map(|v| parse_number::<f32>(&v, "points attribute"))
                            .transpose()?;
                        question = Some(QuestionDraft {
                            id,
                            points,
                            prompt: None,
                            body: None,
                        });
                    }
                    b"text" if question.is_some() && group.is_none() && blank.is_none() => {
                        collecting = true;
                        buf_text.clear();
                    }
                    b"choose-single" | b"choose-multiple"
                        if question.is_some() && group.is_none() && blank.is_none() =>
                    {
                        let kind = if name_bytes.as_ref() == b"choose-single" {
                            GroupKind::Single
                        } else {
                            GroupKind::Multiple
                        };
                        group = Some((kind, Vec::new()));
                    }
                    b"choice" | b"correct-choice" if group.is_some() => {
                        choice_correct = name_bytes.as_ref() == b"correct-choice";
                        choice_id = attr_string(&e, b"id");
                        collecting = true;
                        buf_text.clear();
                    }
                    b"fill-blank" if question.is_some() && group.is_none() && blank.is_none() => {
                        blank = Some(parse_fill_blank(&e)?);
                    }
                    b"correct-text" if blank.is_some() => {
                        collecting = true;
                        buf_text.clear();
                    }
                    b"shuffle" if !in_questions && question.is_none() => {
                        parse_shuffle_attrs(&e, &mut shuffle)?;
                    }
                    b"title" | b"name" | b"variant" | b"language" | b"variants"
                    | b"questions-per-variant" | b"seed" | b"answer-edition"
                        if !in_questions && question.is_none() =>
                    {
                        collecting = true;
                        buf_text.clear();
                    }
                    _ => return Err(unexpected_element(&e)),
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"shuffle" if !in_questions && question.is_none() => {
                    parse_shuffle_attrs(&e, &mut shuffle)?;
                }
                b"fill-blank" if question.is_some() && group.is_none() && blank.is_none() => {
                    set_body(&mut question, QuestionBody::FillBlank(parse_fill_blank(&e)?))?;
                }
                // Historical quirk: a bare <answer-edition/> disables the edition.
                b"answer-edition" if !in_questions && question.is_none() => {
                    answer_edition = false;
                }
                _ => return Err(unexpected_element(&e)),
            },
            Ok(Event::Text(e)) => {
                if collecting {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::CData(e)) => {
                if collecting {
                    buf_text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if collecting {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let Some(resolved) = resolve_entity(&entity) {
                        buf_text.push_str(&resolved);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let text = buf_text.trim().to_string();
                collecting = false;
                match e.name().as_ref() {
                    b"text" => {
                        if let Some(q) = question.as_mut() {
                            q.prompt = Some(text);
                        }
                    }
                    b"correct-text" => {
                        if let Some(b) = blank.as_mut() {
                            b.expected = Some(text);
                        }
                    }
                    b"choice" | b"correct-choice" => {
                        if let Some((_, choices)) = group.as_mut() {
                            let id = choice_id
                                .take()
                                .unwrap_or_else(|| format!("c{}", choices.len() + 1));
                            choices.push(AnswerChoice {
                                id,
                                text,
                                correct: choice_correct,
                            });
                        }
                    }
                    b"choose-single" | b"choose-multiple" => {
                        if let Some((kind, choices)) = group.take() {
                            let body = match kind {
                                GroupKind::Single => QuestionBody::SingleChoice(choices),
                                GroupKind::Multiple => QuestionBody::MultipleChoice(choices),
                            };
                            set_body(&mut question, body)?;
                        }
                    }
                    b"fill-blank" => {
                        if let Some(b) = blank.take() {
                            set_body(&mut question, QuestionBody::FillBlank(b))?;
                        }
                    }
                    b"question" => {
                        if let Some(draft) = question.take() {
                            let finished = finish_question(draft)?;
                            if !seen_ids.insert(finished.id.clone()) {
                                return Err(Error::MalformedDescriptor(format!(
                                    "duplicate question id '{}'",
                                    finished.id
                                )));
                            }
                            bank.add_question(finished);
                        }
                    }
                    b"questions" => in_questions = false,
                    b"title" => title = Some(text),
                    b"name" => name = text,
                    b"variant" => variant_label = text,
                    b"language" => language = Some(text),
                    b"variants" => variant_count = Some(parse_number(&text, "variants")?),
                    b"questions-per-variant" => {
                        questions_per_variant =
                            Some(parse_number(&text, "questions-per-variant")?);
                    }
                    b"seed" => seed = Some(parse_number(&text, "seed")?),
                    b"answer-edition" => answer_edition = parse_flag(&text, "answer-edition")?,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return Err(Error::MalformedDescriptor("missing <title>".to_string())),
    };
    let language = match language {
        Some(l) if !l.is_empty() => l,
        _ => return Err(Error::MalformedDescriptor("missing <language>".to_string())),
    };
    let variant_count = variant_count
        .ok_or_else(|| Error::MalformedDescriptor("missing <variants>".to_string()))?;

    if bank.is_empty() {
        return Err(Error::MalformedDescriptor(
            "descriptor contains no questions".to_string(),
        ));
    }
    if let Some(count) = questions_per_variant {
        if count == 0 {
            return Err(Error::MalformedDescriptor(
                "questions-per-variant must be at least 1".to_string(),
            ));
        }
        if count > bank.len() {
            return Err(Error::MalformedDescriptor(format!(
                "{count} questions per variant requested but the bank holds only {}",
                bank.len()
            )));
        }
    }

    let descriptor = ExamDescriptor {
        title,
        name,
        variant_label,
        language,
        variant_count,
        questions_per_variant,
        shuffle,
        seed,
        answer_edition,
    };

    debug!(
        questions = bank.len(),
        language = %descriptor.language,
        variants = descriptor.variant_count,
        "parsed exam descriptor"
    );

    Ok((bank, descriptor))
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn unexpected_element(e: &BytesStart) -> Error {
    Error::MalformedDescriptor(format!(
        "unexpected element <{}>",
        String::from_utf8_lossy(e.name().as_ref())
    ))
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::MalformedDescriptor(format!("invalid {what} value '{}'", value.trim()))
    })
}

fn parse_flag(value: &str, what: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        other => Err(Error::MalformedDescriptor(format!(
            "invalid {what} flag '{other}'"
        ))),
    }
}

fn parse_shuffle_attrs(e: &BytesStart, shuffle: &mut ShufflePolicy) -> Result<()> {
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.as_ref() {
            b"questions" => shuffle.questions = parse_flag(&value, "shuffle questions")?,
            b"answers" => shuffle.answers = parse_flag(&value, "shuffle answers")?,
            _ => {}
        }
    }
    Ok(())
}

fn parse_fill_blank(e: &BytesStart) -> Result<FillBlank> {
    let length_in = match attr_string(e, b"length") {
        Some(v) => parse_number::<f32>(&v, "length attribute")?,
        None => 2.0,
    };
    Ok(FillBlank::new(length_in))
}

fn set_body(question: &mut Option<QuestionDraft>, body: QuestionBody) -> Result<()> {
    let Some(q) = question.as_mut() else {
        return Err(Error::MalformedDescriptor(
            "answer body outside a question".to_string(),
        ));
    };
    if q.body.is_some() {
        return Err(Error::MalformedDescriptor(format!(
            "question '{}' has more than one answer body",
            q.id
        )));
    }
    q.body = Some(body);
    Ok(())
}

fn finish_question(draft: QuestionDraft) -> Result<Question> {
    let prompt = draft.prompt.filter(|p| !p.is_empty()).ok_or_else(|| {
        Error::MalformedDescriptor(format!("question '{}' is missing <text>", draft.id))
    })?;
    let body = draft.body.ok_or_else(|| {
        Error::MalformedDescriptor(format!("question '{}' has no answer body", draft.id))
    })?;

    if let Some(choices) = body.choices() {
        if choices.len() < 2 {
            return Err(Error::MalformedDescriptor(format!(
                "question '{}' has fewer than two choices",
                draft.id
            )));
        }
        let correct = choices.iter().filter(|c| c.correct).count();
        if correct == 0 {
            return Err(Error::MalformedDescriptor(format!(
                "question '{}' has no correct choice",
                draft.id
            )));
        }
        if matches!(body, QuestionBody::SingleChoice(_)) && correct != 1 {
            return Err(Error::MalformedDescriptor(format!(
                "single-answer question '{}' marks {correct} choices correct",
                draft.id
            )));
        }
    }

    let mut question = Question::new(draft.id, prompt, body);
    question.points = draft.points;
    Ok(question)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"<exam>
  <title>Physics</title>
  <language>english</language>
  <variants>1</variants>
  <questions>
    <question id="q1">
      <text>Pick one.</text>
      <choose-single>
        <correct-choice>right</correct-choice>
        <choice>wrong</choice>
      </choose-single>
    </question>
  </questions>
</exam>"#;

    #[test]
    fn test_parse_minimal() {
        let (bank, descriptor) = parse_exam(MINIMAL).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(descriptor.title, "Physics");
        assert_eq!(descriptor.language, "english");
        assert_eq!(descriptor.variant_count, 1);
        assert_eq!(descriptor.questions_per_variant, None);
        assert_eq!(descriptor.seed, None);
        // Shuffling defaults on, matching the historical generator.
        assert!(descriptor.shuffle.questions);
        assert!(descriptor.shuffle.answers);
        assert!(descriptor.answer_edition);

        let question = &bank.questions[0];
        assert_eq!(question.id, "q1");
        assert_eq!(question.prompt, "Pick one.");
        let choices = question.body.choices().unwrap();
        assert_eq!(choices.len(), 2);
        assert!(choices[0].correct);
        assert!(!choices[1].correct);
    }

    #[test]
    fn test_parse_entities_in_prompt() {
        let doc = MINIMAL.replace("Pick one.", "Current &amp; voltage &#x3a9;");
        let (bank, _) = parse_exam(&doc).unwrap();
        assert_eq!(bank.questions[0].prompt, "Current & voltage Ω");
    }

    #[test]
    fn test_parse_cdata_prompt() {
        let doc = MINIMAL.replace("Pick one.", "<![CDATA[if (a < b) { return; }]]>");
        let (bank, _) = parse_exam(&doc).unwrap();
        assert_eq!(bank.questions[0].prompt, "if (a < b) { return; }");
    }

    #[test]
    fn test_reject_missing_title() {
        let doc = MINIMAL.replace("<title>Physics</title>", "");
        let err = parse_exam(&doc).unwrap_err();
        assert!(err.to_string().contains("<title>"), "got: {err}");
    }

    #[test]
    fn test_reject_no_correct_choice() {
        let doc = MINIMAL.replace("correct-choice>right</correct-choice", "choice>right</choice");
        let err = parse_exam(&doc).unwrap_err();
        assert!(err.to_string().contains("no correct choice"), "got: {err}");
    }

    #[test]
    fn test_reject_unknown_element() {
        let doc = MINIMAL.replace("<variants>1</variants>", "<variants>1</variants><retries>3</retries>");
        let err = parse_exam(&doc).unwrap_err();
        assert!(err.to_string().contains("<retries>"), "got: {err}");
    }

    #[test]
    fn test_parse_flag_values() {
        assert!(parse_flag("yes", "x").unwrap());
        assert!(parse_flag("TRUE", "x").unwrap());
        assert!(parse_flag("1", "x").unwrap());
        assert!(!parse_flag("no", "x").unwrap());
        assert!(!parse_flag("false", "x").unwrap());
        assert!(parse_flag("maybe", "x").is_err());
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some("&".to_string()));
        assert_eq!(resolve_entity("#65"), Some("A".to_string()));
        assert_eq!(resolve_entity("#x41"), Some("A".to_string()));
        assert_eq!(resolve_entity("nbsp"), None);
    }
}
