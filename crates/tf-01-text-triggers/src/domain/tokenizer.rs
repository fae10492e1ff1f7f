//! Markup-aware streaming tokenizer
//!
//! Turns raw text or HTML into a lazy token stream in a single left-to-right
//! pass with no backtracking. Word tokens are lowercase runs of
//! `[a-z0-9.-]`; every other byte is either a structural token (`<tag`,
//! `</tag>`, `>`, quote) or a silent separator.
//!
//! Only ASCII bytes are ever token boundaries, so every slice taken from the
//! input stays on a UTF-8 character boundary.

use std::borrow::Cow;

/// One token of the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Lowercased run of `[a-z0-9.-]`.
    Word(Cow<'a, str>),
    /// `<name` of an opening tag; the name is lowercased and may be empty.
    TagOpen(Cow<'a, str>),
    /// A whole closing tag `</name>`; carries the lowercased name.
    TagClose(Cow<'a, str>),
    /// The literal `>`.
    TagEnd,
    /// `"` or `'`.
    Quote(char),
}

impl<'a> Token<'a> {
    /// The word text, if this is a word token.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }
}

/// Restartable token iterator over one input string.
///
/// Cloning the iterator (or calling [`Tokenizer::new`] again) restarts the
/// sequence from the same position.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn take_while_word(&self, mut end: usize) -> usize {
        let bytes = self.input.as_bytes();
        while end < bytes.len() && is_word_byte(bytes[end]) {
            end += 1;
        }
        end
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();
        let len = bytes.len();

        while self.pos < len {
            let b = bytes[self.pos];
            match b {
                b'<' => {
                    let start = self.pos + 1;

                    if bytes.get(start) == Some(&b'/') {
                        let name_start = start + 1;
                        let end = bytes[name_start.min(len)..]
                            .iter()
                            .position(|&c| c == b'>')
                            .map(|off| name_start + off);

                        let (name_end, next) = match end {
                            Some(e) => (e, e + 1),
                            None => (len, len),
                        };
                        self.pos = next;
                        let name = self.input[name_start.min(len)..name_end].trim();
                        return Some(Token::TagClose(lowercase(name)));
                    }

                    let mut name_end = start;
                    if matches!(bytes.get(name_end), Some(b'!') | Some(b'?')) {
                        name_end += 1;
                    }
                    let name_end = self.take_while_word(name_end);
                    self.pos = name_end;
                    return Some(Token::TagOpen(lowercase(&self.input[start..name_end])));
                }
                b'>' => {
                    self.pos += 1;
                    return Some(Token::TagEnd);
                }
                b'"' | b'\'' => {
                    self.pos += 1;
                    return Some(Token::Quote(b as char));
                }
                _ if is_word_byte(b) => {
                    let start = self.pos;
                    let end = self.take_while_word(start);
                    self.pos = end;
                    return Some(Token::Word(lowercase(&self.input[start..end])));
                }
                _ => self.pos += 1,
            }
        }

        None
    }
}

/// Tokenize `input`.
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Only the word tokens of `input`, in order.
pub fn words(input: &str) -> impl Iterator<Item = Cow<'_, str>> + '_ {
    Tokenizer::new(input).filter_map(|t| match t {
        Token::Word(w) => Some(w),
        _ => None,
    })
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'-'
}

fn lowercase(s: &str) -> Cow<'_, str> {
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(s.to_ascii_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn word(s: &str) -> Token<'static> {
        Token::Word(Cow::Owned(s.to_string()))
    }

    #[test]
    fn test_plain_text_lowercases_and_splits() {
        let tokens: Vec<_> = tokenize("This is a BadWord, test!").collect();
        assert_eq!(
            tokens,
            vec![word("this"), word("is"), word("a"), word("badword"), word("test")]
        );
    }

    #[test]
    fn test_dots_and_dashes_stay_in_words() {
        let tokens: Vec<_> = words("visit x-rated.example.com now").collect();
        assert_eq!(tokens, vec!["visit", "x-rated.example.com", "now"]);
    }

    #[test]
    fn test_markup_tokens() {
        let tokens: Vec<_> = tokenize("kill <B>the</b> president").collect();
        assert_eq!(
            tokens,
            vec![
                word("kill"),
                Token::TagOpen(Cow::Borrowed("b")),
                Token::TagEnd,
                word("the"),
                Token::TagClose(Cow::Borrowed("b")),
                word("president"),
            ]
        );
    }

    #[test]
    fn test_closing_tag_captured_whole() {
        let tokens: Vec<_> = tokenize("</SCRIPT >after").collect();
        assert_eq!(
            tokens,
            vec![Token::TagClose(Cow::Borrowed("script")), word("after")]
        );
    }

    #[test]
    fn test_unterminated_closing_tag_runs_to_end() {
        let tokens: Vec<_> = tokenize("x </div").collect();
        assert_eq!(tokens, vec![word("x"), Token::TagClose(Cow::Borrowed("div"))]);
    }

    #[test]
    fn test_attribute_quotes() {
        let tokens: Vec<_> = tokenize(r#"<img alt="Bad Word">"#).collect();
        assert_eq!(
            tokens,
            vec![
                Token::TagOpen(Cow::Borrowed("img")),
                word("alt"),
                Token::Quote('"'),
                word("bad"),
                word("word"),
                Token::Quote('"'),
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn test_bare_less_than_is_empty_tag_open() {
        let tokens: Vec<_> = tokenize("a < b").collect();
        assert_eq!(
            tokens,
            vec![word("a"), Token::TagOpen(Cow::Borrowed("")), word("b")]
        );
    }

    #[test]
    fn test_doctype_and_comment_names() {
        let tokens: Vec<_> = tokenize("<!DOCTYPE html>").collect();
        assert_eq!(tokens[0], Token::TagOpen(Cow::Borrowed("!doctype")));
    }

    #[test]
    fn test_non_ascii_is_separator() {
        let tokens: Vec<_> = words("naïve café").collect();
        assert_eq!(tokens, vec!["na", "ve", "caf"]);
    }

    #[test]
    fn test_borrowed_when_already_lowercase() {
        match tokenize("lower").next() {
            Some(Token::Word(Cow::Borrowed(w))) => assert_eq!(w, "lower"),
            other => panic!("expected borrowed word, got {:?}", other),
        }
    }

    #[test]
    fn test_restartable() {
        let tokenizer = tokenize("one <i>two</i> three");
        let first: Vec<_> = tokenizer.clone().collect();
        let second: Vec<_> = tokenizer.collect();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_token_count_bounded_by_input(input in ".{0,200}") {
            let count = tokenize(&input).count();
            prop_assert!(count <= input.len());
        }

        #[test]
        fn prop_words_are_normalised(input in ".{0,200}") {
            for w in words(&input) {
                prop_assert!(!w.is_empty());
                prop_assert!(w.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-'));
            }
        }
    }
}
