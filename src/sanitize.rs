//! # HTML Sanitization
//!
//! Whitelist filter for user-supplied article text.
//!
//! - Formatting tags on the allow list are kept, with attributes reduced
//!   to a per-tag allow list. Event handlers such as `onerror` never are.
//! - URL attributes must use a safe scheme or be relative, judged after
//!   character references are decoded.
//! - Every other tag is escaped so it renders as inert text.
//! - Comments are dropped.

use regex::Regex;
use std::sync::OnceLock;

const LINK_ATTRIBUTES: &[&str] = &["href", "title", "target"];
const IMAGE_ATTRIBUTES: &[&str] = &["src", "alt", "title", "width", "height"];
const TABLE_CELL_ATTRIBUTES: &[&str] = &["colspan", "rowspan", "align"];
const NO_ATTRIBUTES: &[&str] = &[];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp"];

/// Attributes allowed on `tag`, or `None` when the tag itself is not allowed.
fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    match tag {
        "a" => Some(LINK_ATTRIBUTES),
        "img" => Some(IMAGE_ATTRIBUTES),
        "td" | "th" => Some(TABLE_CELL_ATTRIBUTES),
        "abbr" | "b" | "blockquote" | "br" | "caption" | "cite" | "code" | "del" | "div"
        | "em" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "hr" | "i" | "ins" | "li" | "mark"
        | "ol" | "p" | "pre" | "s" | "small" | "span" | "strong" | "sub" | "sup" | "table"
        | "tbody" | "thead" | "tfoot" | "tr" | "u" | "ul" => Some(NO_ATTRIBUTES),
        _ => None,
    }
}

static ATTRIBUTE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn attribute_pattern() -> &'static Regex {
    ATTRIBUTE_PATTERN.get_or_init(|| {
        Regex::new(
            r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
        )
        .expect("attribute pattern is valid")
    })
}

/// Neutralize executable markup in `input` while keeping benign formatting.
///
/// # Examples
///
/// ```
/// use blogful::sanitize::sanitize;
///
/// assert_eq!(
///     sanitize(r#"<script>alert("xss");</script>"#),
///     r#"&lt;script&gt;alert("xss");&lt;/script&gt;"#
/// );
/// assert_eq!(
///     sanitize(r#"<img src="a.png" onerror="alert(1)"> <strong>ok</strong>"#),
///     r#"<img src="a.png"> <strong>ok</strong>"#
/// );
/// ```
pub fn sanitize(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len());
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if input[i..].starts_with("<!--") {
            push_text(&mut output, &input[text_start..i]);
            i = match input[i + 4..].find("-->") {
                Some(offset) => i + 4 + offset + 3,
                None => bytes.len(),
            };
            text_start = i;
            continue;
        }

        match find_tag_end(bytes, i) {
            Some(end) => {
                push_text(&mut output, &input[text_start..i]);
                push_tag(&mut output, &input[i..=end]);
                i = end + 1;
                text_start = i;
            }
            None => i += 1,
        }
    }

    push_text(&mut output, &input[text_start..]);
    output
}

/// Index of the `>` closing the tag that opens at `start`, honoring quoted
/// attribute values. `None` when `start` does not open a tag.
fn find_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let name_start = match bytes.get(start + 1) {
        Some(b'/') => start + 2,
        Some(_) => start + 1,
        None => return None,
    };
    if !bytes.get(name_start)?.is_ascii_alphabetic() {
        return None;
    }

    let mut quote: Option<u8> = None;
    for (offset, &b) in bytes[name_start..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(name_start + offset),
                b'<' => return None,
                _ => {}
            },
        }
    }
    None
}

fn push_text(output: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

fn push_tag(output: &mut String, raw: &str) {
    let inner = &raw[1..raw.len() - 1];
    let (closing, body) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_len].to_ascii_lowercase();

    let Some(allowed) = allowed_attributes(&name) else {
        push_text(output, raw);
        return;
    };

    if closing {
        output.push_str("</");
        output.push_str(&name);
        output.push('>');
        return;
    }

    let attributes = body[name_len..].trim_end();
    let (attributes, self_closing) = match attributes.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (attributes, false),
    };

    output.push('<');
    output.push_str(&name);
    for captures in attribute_pattern().captures_iter(attributes) {
        let attr = captures[1].to_ascii_lowercase();
        if !allowed.contains(&attr.as_str()) {
            continue;
        }

        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .or_else(|| captures.get(4))
            .map(|m| m.as_str());

        match value {
            Some(value) => {
                if URL_ATTRIBUTES.contains(&attr.as_str()) && !is_safe_url(value) {
                    continue;
                }
                output.push(' ');
                output.push_str(&attr);
                output.push_str("=\"");
                push_attribute_value(output, value);
                output.push('"');
            }
            None => {
                output.push(' ');
                output.push_str(&attr);
            }
        }
    }
    if self_closing {
        output.push_str(" /");
    }
    output.push('>');
}

fn push_attribute_value(output: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

/// Relative URLs and anchors are safe; absolute URLs must use an allowed scheme.
/// The scheme is read the way a browser reads it, after character references
/// are decoded.
fn is_safe_url(url: &str) -> bool {
    let normalized: String = decode_character_references(url)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let scheme_end = normalized.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(pos) if normalized[pos..].starts_with(':') => {
            SAFE_SCHEMES.contains(&&normalized[..pos])
        }
        _ => true,
    }
}

/// Decode numeric references and the named ones that can spell a scheme.
/// Anything else is left as written.
fn decode_character_references(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(pos) = rest.find('&') {
        decoded.push_str(&rest[..pos]);
        let reference = &rest[pos + 1..];
        match decode_reference(reference) {
            Some((c, consumed)) => {
                decoded.push(c);
                rest = &reference[consumed..];
            }
            None => {
                decoded.push('&');
                rest = reference;
            }
        }
    }

    decoded.push_str(rest);
    decoded
}

/// Decode the reference at the start of `s` (the text after `&`). Returns
/// the character and how many bytes of `s` it spans. The `;` is optional.
fn decode_reference(s: &str) -> Option<(char, usize)> {
    let (c, len) = match s.strip_prefix('#') {
        Some(number) => {
            let hex = number.strip_prefix(|c: char| c == 'x' || c == 'X');
            let (digits, radix, marker) = match hex {
                Some(hex) => (hex, 16, 2),
                None => (number, 10, 1),
            };
            let len = digits
                .find(|c: char| !c.is_digit(radix))
                .unwrap_or(digits.len());
            if len == 0 {
                return None;
            }
            let c = u32::from_str_radix(&digits[..len], radix)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            (c, marker + len)
        }
        None => {
            let len = s
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(s.len());
            let c = match s[..len].to_ascii_lowercase().as_str() {
                "colon" => ':',
                "tab" => '\t',
                "newline" => '\n',
                _ => return None,
            };
            (c, len)
        }
    };

    let consumed = if s[len..].starts_with(';') { len + 1 } else { len };
    Some((c, consumed))
}
