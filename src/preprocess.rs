//! Text normalization applied before units are extracted.

/// Normalizes raw text into the form both training and evaluation operate on.
///
/// Lowercases, trims, and collapses every whitespace run into a single space.
/// The function is deterministic and idempotent, so it is safe to apply at any
/// stage of the pipeline.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Hello\t\n WORLD  "), "hello world");
    }

    #[test]
    fn empty_and_blank_inputs_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n"), "");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize("Ding  Dong");
        assert_eq!(normalize(&once), once);
    }
}
