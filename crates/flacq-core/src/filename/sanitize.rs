//! Component sanitization for output filenames.

/// Characters rejected by at least one mainstream filesystem.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitizes one filename component.
///
/// - Replaces `< > : " / \ | ? *` and control characters with a space
/// - Collapses whitespace runs to a single space
/// - Trims leading/trailing whitespace
pub fn sanitize_component(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    // Start as if a space was just written so leading whitespace is dropped.
    let mut prev_space = true;

    for c in name.chars() {
        let replacement = if FORBIDDEN.contains(&c) || c.is_control() || c.is_whitespace() {
            ' '
        } else {
            c
        };

        if replacement == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(replacement);
            prev_space = false;
        }
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out
}
