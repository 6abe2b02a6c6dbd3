//! Wikilink markup scanner.
//!
//! Splits text into literal runs and `[[...]]` tokens in a single
//! left-to-right pass. A token is `[[` followed by at least one
//! character other than `]`, closed by `]]`. A `!` immediately before
//! the opening brackets marks an image embed. Anything that breaks
//! those rules stays literal text, and a failed candidate restarts the
//! search one character further along so overlapping brackets still
//! find the real token.

/// One scanned span of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text to carry through unchanged.
    Literal(&'a str),

    /// `[[target]]` or `[[target|label]]`.
    Link { source: &'a str, target: &'a str, label: Option<&'a str> },

    /// `![[name]]` or `![[name|size]]`.
    Image { source: &'a str, name: &'a str, size: Option<&'a str> },
}

impl<'a> Token<'a> {
    /// The exact input slice this token covers.
    pub fn source(&self) -> &'a str {
        match self {
            Token::Literal(text) => text,
            Token::Link { source, .. } | Token::Image { source, .. } => source,
        }
    }
}

/// Cheap pre-check for text that cannot contain any token.
#[inline]
pub fn has_markup(text: &str) -> bool {
    text.contains("[[")
}

/// Tokenize a text run.
///
/// The concatenated [`Token::source`] slices always reproduce the input
/// exactly.
pub fn scan(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(found) = text[pos..].find("[[") {
        let open = pos + found;
        match parse_token_at(text, open) {
            Some((token, start, end)) => {
                if start > literal_start {
                    tokens.push(Token::Literal(&text[literal_start..start]));
                }
                tokens.push(token);
                literal_start = end;
                pos = end;
            }
            None => pos = open + 1,
        }
    }

    if literal_start < text.len() {
        tokens.push(Token::Literal(&text[literal_start..]));
    }
    tokens
}

/// Try to read one token whose `[[` sits at byte offset `open`.
///
/// Returns the token with its start and end offsets; the start moves
/// one byte left of `open` when a `!` prefix claims the token as an
/// image.
fn parse_token_at(text: &str, open: usize) -> Option<(Token<'_>, usize, usize)> {
    let bytes = text.as_bytes();
    let content_start = open + 2;

    // Content is a non-empty run of anything but `]`
    let mut end = content_start;
    while end < bytes.len() && bytes[end] != b']' {
        end += 1;
    }
    if end == content_start || !text[end..].starts_with("]]") {
        return None;
    }

    let content = &text[content_start..end];
    let close = end + 2;
    let (first, second) = split_content(content);

    if open > 0 && bytes[open - 1] == b'!' {
        let start = open - 1;
        Some((Token::Image { source: &text[start..close], name: first, size: second }, start, close))
    } else {
        Some((Token::Link { source: &text[open..close], target: first, label: second }, open, close))
    }
}

/// Split token content on the first `|`. Segments past the second are
/// dropped.
fn split_content(content: &str) -> (&str, Option<&str>) {
    let mut parts = content.split('|');
    let first = parts.next().unwrap_or(content);
    (first, parts.next())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn link<'a>(source: &'a str, target: &'a str, label: Option<&'a str>) -> Token<'a> {
        Token::Link { source, target, label }
    }

    fn image<'a>(source: &'a str, name: &'a str, size: Option<&'a str>) -> Token<'a> {
        Token::Image { source, name, size }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(scan("no markup here"), [Token::Literal("no markup here")]);
    }

    #[test]
    fn test_link_between_literals() {
        assert_eq!(
            scan("see [[Foo Bar]] now"),
            [
                Token::Literal("see "),
                link("[[Foo Bar]]", "Foo Bar", None),
                Token::Literal(" now"),
            ]
        );
    }

    #[test]
    fn test_link_with_label() {
        assert_eq!(
            scan("[[Foo_Bar|Custom Label]]"),
            [link("[[Foo_Bar|Custom Label]]", "Foo_Bar", Some("Custom Label"))]
        );
    }

    #[test]
    fn test_image_tokens() {
        assert_eq!(
            scan("![[diagram.png]]"),
            [image("![[diagram.png]]", "diagram.png", None)]
        );
        assert_eq!(
            scan("![[diagram.png|300px]]"),
            [image("![[diagram.png|300px]]", "diagram.png", Some("300px"))]
        );
    }

    #[test]
    fn test_bang_must_touch_brackets() {
        assert_eq!(
            scan("! [[x]]"),
            [Token::Literal("! "), link("[[x]]", "x", None)]
        );
    }

    #[test]
    fn test_double_bang_keeps_first_literal() {
        assert_eq!(
            scan("!![[x]]"),
            [Token::Literal("!"), image("![[x]]", "x", None)]
        );
    }

    #[test]
    fn test_triple_brackets() {
        // Content absorbs the extra `[`, the extra `]` stays literal
        assert_eq!(
            scan("[[[x]]]"),
            [link("[[[x]]", "[x", None), Token::Literal("]")]
        );
    }

    #[test]
    fn test_inner_bracket_in_content() {
        assert_eq!(scan("[[ [[x]]"), [link("[[ [[x]]", " [[x", None)]);
    }

    #[test]
    fn test_single_close_bracket_breaks_token() {
        assert_eq!(scan("[[a]b]]"), [Token::Literal("[[a]b]]")]);
    }

    #[test]
    fn test_failed_candidate_resumes_scan() {
        assert_eq!(
            scan("[[a][[b]]"),
            [Token::Literal("[[a]"), link("[[b]]", "b", None)]
        );
    }

    #[test]
    fn test_empty_and_unterminated() {
        assert_eq!(scan("[[]]"), [Token::Literal("[[]]")]);
        assert_eq!(scan("[[x"), [Token::Literal("[[x")]);
        assert_eq!(scan("x]]"), [Token::Literal("x]]")]);
    }

    #[test]
    fn test_mixed_tokens() {
        assert_eq!(
            scan("a [[x]] b ![[y.png]] c"),
            [
                Token::Literal("a "),
                link("[[x]]", "x", None),
                Token::Literal(" b "),
                image("![[y.png]]", "y.png", None),
                Token::Literal(" c"),
            ]
        );
    }

    #[test]
    fn test_pipe_segments() {
        assert_eq!(scan("[[a|b|c]]"), [link("[[a|b|c]]", "a", Some("b"))]);
        assert_eq!(scan("[[a|]]"), [link("[[a|]]", "a", Some(""))]);
        assert_eq!(scan("[[|b]]"), [link("[[|b]]", "", Some("b"))]);
    }

    #[test]
    fn test_sources_reconstruct_input() {
        let inputs = [
            "see [[Foo Bar]] now",
            "!![[x]] and [[[y]]] plus [[a][[b]] end",
            "![[img.png|300px]] tail [[unclosed",
            "unicode: héllo [[wörld]] ✓",
        ];
        for input in inputs {
            let rebuilt: String = scan(input).iter().map(Token::source).collect();
            assert_eq!(rebuilt, input);
        }
    }

    #[test]
    fn test_has_markup() {
        assert!(has_markup("a [[b]]"));
        assert!(has_markup("[["));
        assert!(!has_markup("plain [x] text"));
    }
}
