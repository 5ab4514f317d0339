//! Simplified HTML tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`.
//! Attribute names use the same ASCII character class. Tag and attribute names are lowercased.
//!
//! Known limitations:
//! - Not an HTML5 state machine (no parse-error recovery beyond skipping stray bytes).
//! - `script` and `style` bodies are rawtext; every other element's text is entity-decoded.
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>`.
use crate::entities::decode_entities;
use crate::types::{Attribute, Token};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub(crate) fn is_rawtext_element(name: &str) -> bool {
    name == "script" || name == "style"
}

/// Finds `</name` followed by optional whitespace and `>`, case-insensitively.
/// Returns `(start_of_close_tag, end_after_gt)`.
fn find_rawtext_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let name = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        let after_slash = i + 2;
        let after_name = after_slash + name.len();
        if bytes.get(i + 1) == Some(&b'/')
            && bytes
                .get(after_slash..after_name)
                .is_some_and(|s| s.eq_ignore_ascii_case(name))
        {
            let mut k = after_name;
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if bytes.get(k) == Some(&b'>') {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    // Slice endpoints only ever land on ASCII structural bytes, so they stay on UTF-8 boundaries.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        debug_assert!(self.input.is_char_boundary(start));
        debug_assert!(self.input.is_char_boundary(self.pos));
        &self.input[start..self.pos]
    }
}

/// Tokenizes `input` into a flat token list.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut cur = Cursor::new(input);

    while !cur.at_end() {
        if cur.peek() != Some(b'<') {
            let text = cur.take_while(|b| b != b'<');
            out.push(Token::Text(decode_entities(text)));
            continue;
        }

        let rest = cur.rest();
        if let Some(body) = rest.strip_prefix(HTML_COMMENT_START) {
            match body.find(HTML_COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(body[..end].to_string()));
                    cur.pos += HTML_COMMENT_START.len() + end + HTML_COMMENT_END.len();
                }
                None => {
                    out.push(Token::Comment(body.to_string()));
                    cur.pos = input.len();
                }
            }
            continue;
        }

        if rest.len() >= 9 && rest.as_bytes()[..9].eq_ignore_ascii_case(b"<!doctype") {
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[2..end].trim().to_string()));
            cur.pos += end + 1;
            continue;
        }

        if rest.as_bytes().get(1) == Some(&b'/') {
            cur.pos += 2;
            let name = cur.take_while(is_name_char).to_ascii_lowercase();
            cur.take_while(|b| b != b'>');
            if !cur.at_end() {
                cur.pos += 1;
            }
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            continue;
        }

        cur.pos += 1;
        let name = cur.take_while(is_name_char).to_ascii_lowercase();
        if name.is_empty() {
            // A lone `<` is text.
            out.push(Token::Text("<".to_string()));
            continue;
        }
        let (attributes, mut self_closing) = read_attributes(&mut cur);
        if is_void_element(&name) {
            self_closing = true;
        }
        let rawtext = is_rawtext_element(&name) && !self_closing;
        log::trace!(target: "html.tokenizer", "start tag <{name}> ({} attributes)", attributes.len());
        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        if rawtext {
            let body = cur.rest();
            match find_rawtext_close_tag(body, &name) {
                Some((start, end)) => {
                    if start > 0 {
                        out.push(Token::Text(body[..start].to_string()));
                    }
                    cur.pos += end;
                }
                None => {
                    // Missing close tag: the remainder is rawtext content.
                    if !body.is_empty() {
                        out.push(Token::Text(body.to_string()));
                    }
                    cur.pos = input.len();
                }
            }
            out.push(Token::EndTag(name));
        }
    }

    merge_adjacent_text(out)
}

fn read_attributes(cur: &mut Cursor<'_>) -> (Vec<Attribute>, bool) {
    let mut attributes: Vec<Attribute> = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => return (attributes, false),
            Some(b'>') => {
                cur.pos += 1;
                return (attributes, false);
            }
            Some(b'/') => {
                cur.pos += 1;
                if cur.peek() == Some(b'>') {
                    cur.pos += 1;
                    return (attributes, true);
                }
                continue;
            }
            Some(_) => {}
        }

        let key = cur.take_while(is_name_char).to_ascii_lowercase();
        if key.is_empty() {
            // Stray byte inside a tag; skip the whole UTF-8 sequence.
            let skip = cur.rest().chars().next().map_or(1, char::len_utf8);
            cur.pos += skip;
            continue;
        }

        cur.skip_whitespace();
        let value = if cur.peek() == Some(b'=') {
            cur.pos += 1;
            cur.skip_whitespace();
            Some(read_attribute_value(cur))
        } else {
            None
        };

        // First occurrence wins, as in browsers.
        if !attributes.iter().any(|(k, _)| *k == key) {
            attributes.push((key, value));
        }
    }
}

fn read_attribute_value(cur: &mut Cursor<'_>) -> String {
    match cur.peek() {
        Some(quote @ (b'"' | b'\'')) => {
            cur.pos += 1;
            let raw = cur.take_while(|b| b != quote);
            if !cur.at_end() {
                cur.pos += 1;
            }
            decode_entities(raw)
        }
        _ => {
            let start = cur.pos;
            while let Some(b) = cur.peek() {
                if b.is_ascii_whitespace()
                    || b == b'>'
                    || (b == b'/' && cur.bytes.get(cur.pos + 1) == Some(&b'>'))
                {
                    break;
                }
                cur.pos += 1;
            }
            decode_entities(&cur.input[start..cur.pos])
        }
    }
}

fn merge_adjacent_text(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (out.last_mut(), token) {
            (Some(Token::Text(prev)), Token::Text(next)) => prev.push_str(&next),
            (_, Token::Text(t)) if t.is_empty() => {}
            (_, token) => out.push(token),
        }
    }
    out
}
