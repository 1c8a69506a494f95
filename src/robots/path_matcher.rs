use std::borrow::Cow;

/// Pattern that matches every path.
pub const WILDCARD: &str = "*";

/// Trailing marker that pins a pattern to the end of the path.
pub const END_ANCHOR: &str = "$";

/// Returns true if the rule `pattern` applies to `path`.
///
/// Both sides are normalized first, so `%3A` and `:` compare equal. A
/// `*` in the pattern matches any run of characters, and a pattern that
/// ends in `$` must consume the whole path.
pub fn matches(pattern: &str, path: &str) -> bool {
    if pattern == WILDCARD {
        return true;
    }

    let candidate = normalize_path(path);
    if candidate.is_empty() || pattern.is_empty() {
        return candidate.is_empty() && pattern.is_empty();
    }

    let pattern = normalize_pattern(pattern);
    let pattern = pattern.as_ref();
    let strict_end = has_strict_end(pattern);

    if pattern.starts_with(candidate.as_str()) {
        return true;
    }

    if strict_end && pattern.strip_suffix(END_ANCHOR) == Some(candidate.as_str()) {
        return true;
    }

    if !strict_end && candidate.starts_with(pattern) {
        return true;
    }

    if !pattern.contains(WILDCARD) {
        return false;
    }

    glob_matches(pattern, &candidate, strict_end)
}

/// Percent-decodes `path`. A `%` not followed by two hex digits, or escapes
/// that do not decode to UTF-8, yield an empty string.
///
/// Decoding is path-style: `+` stays `+` and is not turned into a space.
pub fn decode_path(path: &str) -> String {
    if !has_valid_escapes(path) {
        return String::new();
    }
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::new(),
    }
}

/// Decodes `path` and re-encodes every character that may not appear
/// verbatim in a URL path or query.
pub fn normalize_path(path: &str) -> String {
    let decoded = decode_path(path);
    let mut normalized = String::with_capacity(decoded.len());
    let mut buf = [0u8; 4];
    for c in decoded.chars() {
        if is_path_char(c) {
            normalized.push(c);
        } else {
            normalized.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    normalized
}

fn has_valid_escapes(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.iter().enumerate().all(|(index, &byte)| {
        byte != b'%'
            || matches!(
                bytes.get(index + 1..index + 3),
                Some([high, low]) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit()
            )
    })
}

fn normalize_pattern(pattern: &str) -> Cow<'_, str> {
    let normalized = normalize_path(pattern);
    if normalized.is_empty() {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(normalized)
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ','
                | ';' | '=' | ':' | '@' | '/' | '?' | '%'
        )
}

/// The anchor only counts when it is the one and only `$`, in last position.
fn has_strict_end(pattern: &str) -> bool {
    match pattern.find(END_ANCHOR) {
        Some(index) => index > 0 && index == pattern.len() - END_ANCHOR.len(),
        None => false,
    }
}

fn glob_matches(pattern: &str, candidate: &str, strict_end: bool) -> bool {
    let mut remainder = format!("{candidate}{END_ANCHOR}");

    for segment in pattern.split(WILDCARD) {
        let Some(found) = remainder.find(segment) else {
            return false;
        };
        remainder = remainder.split_off(found + segment.len());

        // keep `*`-separated segments aligned on path boundaries
        if !remainder.is_empty() && !remainder.starts_with('/') {
            remainder.insert(0, '/');
        }
    }

    !(strict_end && !remainder.is_empty())
}
