//! Comparison keys for deduplicating titles and queries

/// Longest key kept, in characters
pub const SLUG_MAX_LEN: usize = 128;

/// Normalize free text into a filename-safe comparison key
///
/// Trims, lowercases, turns each whitespace run into a single `-`, drops every
/// character that is not alphanumeric, `-` or `_`, and truncates to
/// [`SLUG_MAX_LEN`] characters. `"My Note"` and `"my-note"` share a key.
/// Letters outside ASCII are kept so titles in other scripts stay distinct.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_whitespace = false;
    let mut len = 0;

    for c in text.trim().chars() {
        if len == SLUG_MAX_LEN {
            break;
        }

        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                len += 1;
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;

        if c.is_alphanumeric() || c == '-' || c == '_' {
            for lower in c.to_lowercase() {
                if len == SLUG_MAX_LEN {
                    break;
                }
                slug.push(lower);
                len += 1;
            }
        }
    }

    slug
}
