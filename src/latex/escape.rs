//! Pure LaTeX escaping utilities.
//!
//! Only metadata fields (title, course name, variant label) are escaped;
//! prompt and choice bodies are raw LaTeX by contract, since question
//! authors routinely embed math and `minted` code blocks.

/// Escape special LaTeX characters in plain text.
///
/// # Examples
///
/// ```
/// use izpit::latex::escape_latex;
///
/// assert_eq!(escape_latex("50% off"), "50\\% off");
/// assert_eq!(escape_latex("C&A"), "C\\&A");
/// assert_eq!(escape_latex("x_1"), "x\\_1");
/// ```
pub fn escape_latex(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\textbackslash{}"),
            '~' => result.push_str("\\textasciitilde{}"),
            '^' => result.push_str("\\textasciicircum{}"),
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_latex_specials() {
        assert_eq!(escape_latex("a#b"), "a\\#b");
        assert_eq!(escape_latex("$5"), "\\$5");
        assert_eq!(escape_latex("50%"), "50\\%");
        assert_eq!(escape_latex("C&A"), "C\\&A");
        assert_eq!(escape_latex("x_1"), "x\\_1");
        assert_eq!(escape_latex("{x}"), "\\{x\\}");
        assert_eq!(escape_latex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_latex("a~b"), "a\\textasciitilde{}b");
        assert_eq!(escape_latex("a^b"), "a\\textasciicircum{}b");
    }

    #[test]
    fn test_escape_latex_passthrough() {
        assert_eq!(escape_latex("Физика II"), "Физика II");
        assert_eq!(escape_latex("plain text"), "plain text");
        assert_eq!(escape_latex(""), "");
    }
}
