//! Word-boundary text chunking for fitting large inputs into prompts.

/// Split `text` into whitespace-normalized chunks of at most `chunk_size`
/// word-length units.
///
/// A word costs its character count plus one separator. Words are appended
/// greedily; the first word that would overflow the remaining space starts a
/// new chunk. A single word longer than `chunk_size` still becomes its own
/// chunk and exceeds the nominal budget, so downstream token budgeting is the
/// real guard.
///
/// Empty or all-whitespace input yields one empty chunk, so callers always
/// get at least one element.
pub fn split_text(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    let mut current = String::new();
    let mut remaining = chunk_size;

    for word in text.split_whitespace() {
        let word_length = word.chars().count() + 1; // +1 for the separator

        if word_length <= remaining {
            current.push_str(word);
            current.push(' ');
            remaining -= word_length;
        } else {
            chunks.push(current.trim().to_string());
            current = format!("{word} ");
            remaining = chunk_size.saturating_sub(word_length);
        }
    }

    chunks.push(current.trim().to_string());
    chunks
}
