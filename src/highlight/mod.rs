//! JSON syntax highlighting.
//!
//! Converts a JSON value into an ordered sequence of styled tokens for
//! rich display. The value is first pretty-printed with the canonical
//! 2-space indentation; the tokenizer then scans that string left to
//! right, character class by character class.
//!
//! The one hard invariant: concatenating the emitted token texts in
//! order reproduces the pretty-printed string exactly. Rendering may
//! style tokens however it likes, but it can never drop or add a
//! character.

use serde_json::Value;

/// Style category of one highlighted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStyle {
    /// String value (including its quotes).
    Str,
    /// Numeric literal.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// Object key (a string followed by a colon).
    Key,
    /// Structural character: `{ } [ ] , :`.
    Bracket,
    /// Whitespace and anything unrecognized.
    Plain,
}

/// One fragment of a highlighted JSON rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Verbatim text of the fragment.
    pub text: String,
    /// Style category.
    pub style: TokenStyle,
}

impl Token {
    fn new(text: impl Into<String>, style: TokenStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Canonical pretty-printed form of a JSON value (2-space indent).
#[must_use]
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).expect("serializing serde_json::Value cannot fail")
}

/// Highlight a JSON value as an ordered token sequence.
#[must_use]
pub fn highlight(value: &Value) -> Vec<Token> {
    tokenize(&pretty(value))
}

/// Tokenize serialized JSON text.
///
/// At each position, recognition is attempted in this order: quoted
/// string (tagged Key when a colon follows), numeric literal, keyword
/// (`true`/`false`/`null`), structural character, then a single plain
/// character.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            let start = i;
            i += 1;
            while i < chars.len() {
                match chars[i] {
                    // Escaped character: the next char is interior content.
                    '\\' => i += 2,
                    '"' => {
                        i += 1;
                        break;
                    }
                    _ => i += 1,
                }
            }
            i = i.min(chars.len());
            let text: String = chars[start..i].iter().collect();

            // A string immediately followed by a colon (spaces allowed)
            // is an object key.
            let mut ahead = i;
            while ahead < chars.len() && chars[ahead] == ' ' {
                ahead += 1;
            }
            let style = if chars.get(ahead) == Some(&':') {
                TokenStyle::Key
            } else {
                TokenStyle::Str
            };
            tokens.push(Token::new(text, style));
        } else if c.is_ascii_digit() || c == '-' {
            let start = i;
            while i < chars.len()
                && matches!(chars[i], '0'..='9' | '-' | '+' | '.' | 'e' | 'E')
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::new(text, TokenStyle::Number));
        } else if matches_keyword(&chars, i, "true") {
            tokens.push(Token::new("true", TokenStyle::Boolean));
            i += 4;
        } else if matches_keyword(&chars, i, "false") {
            tokens.push(Token::new("false", TokenStyle::Boolean));
            i += 5;
        } else if matches_keyword(&chars, i, "null") {
            tokens.push(Token::new("null", TokenStyle::Null));
            i += 4;
        } else if matches!(c, '{' | '}' | '[' | ']' | ',' | ':') {
            tokens.push(Token::new(c.to_string(), TokenStyle::Bracket));
            i += 1;
        } else {
            tokens.push(Token::new(c.to_string(), TokenStyle::Plain));
            i += 1;
        }
    }

    tokens
}

/// Fixed-length lookahead match for a literal keyword.
fn matches_keyword(chars: &[char], at: usize, keyword: &str) -> bool {
    chars[at..].iter().take(keyword.len()).copied().eq(keyword.chars())
}
