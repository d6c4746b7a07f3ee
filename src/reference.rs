//! Quote- and punctuation-aware reference tokenizer used for scoring.
//!
//! Never consulted during training; the evaluator compares segmenter output
//! against the token sequence produced here.

/// Opening quotes and brackets peeled from the front of a word.
const HEAD_DELIMITERS: &str = "'\"{[(";
/// Quotes, closing brackets, and punctuation peeled from the back of a word.
const TAIL_DELIMITERS: &str = "'\":,;.!?}])";

/// Peels leading delimiter characters off a word.
///
/// Returns the peeled delimiters in order and the remaining text, or `None`
/// when the whole word consisted of delimiters.
#[must_use]
pub fn detach_head(text: &str) -> (Vec<String>, Option<&str>) {
    let mut tokens = Vec::new();
    for (idx, ch) in text.char_indices() {
        if HEAD_DELIMITERS.contains(ch) {
            tokens.push(ch.to_string());
        } else {
            return (tokens, Some(&text[idx..]));
        }
    }
    (tokens, None)
}

/// Peels trailing delimiter characters off a word.
///
/// The peeled delimiters are returned in text order, together with the
/// remaining text, or `None` when the whole word consisted of delimiters.
#[must_use]
pub fn detach_tail(text: &str) -> (Vec<String>, Option<&str>) {
    let mut tokens = Vec::new();
    for (idx, ch) in text.char_indices().rev() {
        if TAIL_DELIMITERS.contains(ch) {
            tokens.push(ch.to_string());
        } else {
            tokens.reverse();
            return (tokens, Some(&text[..idx + ch.len_utf8()]));
        }
    }
    tokens.reverse();
    (tokens, None)
}

/// Splits a text into reference tokens: words, single-space separators, and
/// peeled quote/punctuation characters, in text order.
#[must_use]
pub fn reference_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for split in text.split(' ') {
        if !tokens.is_empty() {
            tokens.push(" ".to_owned());
        }
        let (head, rest) = detach_head(split);
        tokens.extend(head);
        if let Some(word) = rest.filter(|word| !word.is_empty()) {
            let (tail, core) = detach_tail(word);
            if let Some(core) = core.filter(|core| !core.is_empty()) {
                tokens.push(core.to_owned());
            }
            tokens.extend(tail);
        }
    }
    tokens
}
