/// Decode a small, fixed set of HTML character references.
///
/// Contract:
/// - Named references: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
/// - Numeric references only when semicolon-terminated: `&#38;` and `&#x26;`.
/// - Anything else (unknown names, missing semicolons, invalid scalars) passes through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    const NAMED: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{00A0}'),
    ];
    // 0x10FFFF / 1114111
    const MAX_HEX_DIGITS: usize = 6;
    const MAX_DEC_DIGITS: usize = 7;

    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        if let Some((pat, ch)) = NAMED.iter().find(|(pat, _)| tail.starts_with(pat)) {
            out.push(*ch);
            rest = &tail[pat.len()..];
            continue;
        }

        let numeric = if let Some(hex) = tail
            .strip_prefix("&#x")
            .or_else(|| tail.strip_prefix("&#X"))
        {
            decode_numeric(hex, 16, MAX_HEX_DIGITS).map(|(ch, used)| (ch, used + 3))
        } else if let Some(dec) = tail.strip_prefix("&#") {
            decode_numeric(dec, 10, MAX_DEC_DIGITS).map(|(ch, used)| (ch, used + 2))
        } else {
            None
        };

        match numeric {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parses `digits;` and returns the character plus the number of bytes consumed (including `;`).
fn decode_numeric(input: &str, radix: u32, max_digits: usize) -> Option<(char, usize)> {
    let end = input.find(';')?;
    let digits = &input[..end];
    if digits.is_empty()
        || digits.len() > max_digits
        || !digits.chars().all(|c| c.is_digit(radix))
    {
        return None;
    }
    let ch = u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)?;
    Some((ch, end + 1))
}

/// Escape for a double-quoted attribute value.
pub fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Escape for text content. Rawtext elements (`style`, `script`) are not escaped by callers.
pub fn escape_text(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
