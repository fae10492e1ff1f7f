//! Markup state for the matching scan
//!
//! Decides, token by token, which words are page text worth matching.
//! Tag internals are skipped except for the values of `alt`, `title` and
//! `href`; everything between `<script>`/`<style>` and their closing tags
//! is skipped outright.

use super::tokenizer::Token;

/// Attributes whose values users see and that therefore get scanned.
const IMPORTANT_ATTRIBUTES: [&str; 3] = ["alt", "title", "href"];

fn is_raw_text_element(name: &str) -> bool {
    name == "script" || name == "style"
}

#[derive(Clone, Debug, Default)]
pub struct MarkupState {
    in_tag: bool,
    /// Quote character that opened the current attribute value.
    open_quote: Option<char>,
    collecting_important: bool,
    in_raw_text: bool,
}

impl MarkupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state for `token`; returns the word if it should be matched.
    pub fn accept<'t>(&mut self, token: &'t Token<'_>) -> Option<&'t str> {
        match token {
            Token::TagOpen(name) => {
                if is_raw_text_element(name) {
                    self.in_raw_text = true;
                }
                if !name.is_empty() {
                    self.enter_tag();
                }
                None
            }
            Token::TagClose(name) => {
                if is_raw_text_element(name) {
                    self.in_raw_text = false;
                }
                self.leave_tag();
                None
            }
            Token::TagEnd => {
                self.leave_tag();
                None
            }
            Token::Quote(quote) => {
                if self.in_tag {
                    match self.open_quote {
                        Some(open) if open == *quote => {
                            self.open_quote = None;
                            self.collecting_important = false;
                        }
                        // the other quote char is part of the value
                        Some(_) => {}
                        None => self.open_quote = Some(*quote),
                    }
                }
                None
            }
            Token::Word(word) => self.accept_word(word),
        }
    }

    fn accept_word<'t>(&mut self, word: &'t str) -> Option<&'t str> {
        if self.in_raw_text {
            return None;
        }
        if !self.in_tag {
            return Some(word);
        }

        if self.open_quote.is_some() {
            return self.collecting_important.then_some(word);
        }

        if IMPORTANT_ATTRIBUTES.contains(&word) {
            self.collecting_important = true;
            None
        } else if self.collecting_important {
            // unquoted value: one token
            self.collecting_important = false;
            Some(word)
        } else {
            None
        }
    }

    fn enter_tag(&mut self) {
        self.in_tag = true;
        self.open_quote = None;
        self.collecting_important = false;
    }

    fn leave_tag(&mut self) {
        self.in_tag = false;
        self.open_quote = None;
        self.collecting_important = false;
    }
}
