//! Whole-line utilities.

/// Split `text` on `\r\n`, `\r` or `\n`.
///
/// Always yields at least one (possibly empty) line, and a trailing
/// terminator yields a final empty line, matching [`crate::LineIndex`].
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&text[start..]);

    lines
}

/// Delete the given 0-based lines and join the rest with `\n`.
///
/// `removed` may be unsorted and contain duplicates or out-of-range lines.
pub fn strip_lines(text: &str, removed: &[u32]) -> String {
    split_lines(text)
        .into_iter()
        .enumerate()
        .filter(|(line, _)| !removed.contains(&(*line as u32)))
        .map(|(_, content)| content)
        .collect::<Vec<_>>()
        .join("\n")
}
