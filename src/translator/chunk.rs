/// Largest piece of text sent to the backend in one request.
pub const MAX_CHUNK_CHARS: usize = 5000;

/// Splits `text` into consecutive pieces of at most `max_chars` characters.
/// Counts Unicode scalar values, so multi-byte text is never cut mid-character.
pub fn split_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::with_capacity(text.len() / max_chars + 1);
    let mut rest = text;

    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_fixed_chunks() {
        let text = "x".repeat(12_000);
        let lengths: Vec<usize> = split_text(&text, MAX_CHUNK_CHARS)
            .iter()
            .map(|c| c.chars().count())
            .collect();
        assert_eq!(lengths, vec![5000, 5000, 2000]);
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text("hello", MAX_CHUNK_CHARS), vec!["hello"]);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let text = "y".repeat(10_000);
        assert_eq!(split_text(&text, MAX_CHUNK_CHARS).len(), 2);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_text("", MAX_CHUNK_CHARS).is_empty());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "日本語のテキスト";
        let chunks = split_text(text, 3);
        assert_eq!(chunks, vec!["日本語", "のテキ", "スト"]);
        assert_eq!(chunks.concat(), text);
    }
}
