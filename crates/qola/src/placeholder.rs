//! `?` placeholder scanning.
//!
//! Statements carry generic `?` placeholders. A `?` is not a placeholder when it
//! appears inside:
//!
//! - a single-quoted string literal (`'why?'`, `'it''s?'`), including escape strings
//!   where a backslash escapes the next character (`E'it\'s?'`)
//! - a double-quoted identifier (`"odd?col"`)
//! - a dollar-quoted body (`$$ ... $$`, `$fn$ ... $fn$`)
//! - a `--` line comment or a `/* ... */` block comment
//!
//! Operators spelled with a question mark (the JSONB `?`, `?|` and `?&` operators)
//! cannot be told apart from placeholders. Write them doubled (`??`, `??|`, `??&`);
//! a doubled `?` is emitted as a single literal `?` and binds nothing.

/// Count the placeholders in `sql`.
pub fn count(sql: &str) -> usize {
    scan(sql, |_, out| out.push('?')).1
}

/// Rewrite `?` placeholders into PostgreSQL's numbered form (`$1`, `$2`, ...).
///
/// ```rust
/// assert_eq!(
///     qola::placeholder::to_numbered("a = ? AND b = '?' AND tags ?? c"),
///     "a = $1 AND b = '?' AND tags ? c"
/// );
/// ```
pub fn to_numbered(sql: &str) -> String {
    scan(sql, |idx, out| {
        out.push('$');
        out.push_str(&idx.to_string());
    })
    .0
}

fn scan(sql: &str, mut on_placeholder: impl FnMut(usize, &mut String)) -> (String, usize) {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut count = 0;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();
        let end = match ch {
            '\'' => {
                let escapes = i > 0
                    && matches!(chars[i - 1], 'E' | 'e')
                    && !chars[..i - 1].last().is_some_and(|c| is_ident(*c));
                quoted(&chars, i, '\'', escapes)
            }
            '"' => quoted(&chars, i, '"', false),
            '-' if next == Some('-') => line_comment(&chars, i),
            '/' if next == Some('*') => block_comment(&chars, i),
            '$' => dollar_quoted(&chars, i).unwrap_or(i + 1),
            '?' if next == Some('?') => {
                out.push('?');
                i += 2;
                continue;
            }
            '?' => {
                count += 1;
                on_placeholder(count, &mut out);
                i += 1;
                continue;
            }
            _ => i + 1,
        };
        out.extend(&chars[i..end]);
        i = end;
    }

    (out, count)
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// End (exclusive) of the quoted span opened at `start`.
///
/// A doubled quote closes and immediately reopens, which keeps `'it''s'` intact.
fn quoted(chars: &[char], start: usize, quote: char, escapes: bool) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' if escapes => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn line_comment(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|c| *c == '\n')
        .map_or(chars.len(), |p| start + p + 1)
}

fn block_comment(chars: &[char], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

/// End of a `$tag$ ... $tag$` body opened at `start`, if `start` opens one.
///
/// Positional parameters (`$1`) and `$` inside identifiers are not openers.
fn dollar_quoted(chars: &[char], start: usize) -> Option<usize> {
    if start > 0 && is_ident(chars[start - 1]) {
        return None;
    }
    let tag_len = chars[start + 1..].iter().position(|c| *c == '$')?;
    let tag = &chars[start + 1..start + 1 + tag_len];
    if tag.first().is_some_and(|c| c.is_ascii_digit()) || !tag.iter().all(|c| is_ident(*c)) {
        return None;
    }

    let delimiter = &chars[start..start + tag_len + 2];
    let body = start + delimiter.len();
    let close = chars[body..]
        .windows(delimiter.len())
        .position(|w| w == delimiter)
        .map_or(chars.len(), |p| body + p + delimiter.len());
    Some(close)
}
