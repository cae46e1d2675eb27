//! Locating content hashes inside loosely structured text.
//!
//! Request URIs and `Referer` headers carry a root hash somewhere in their
//! text (`/<hash>/docs/index.html`, `http://host/<hash>/`, ...). The scanner
//! finds the leftmost run of [`HASH_HEX_LEN`] lowercase hex characters. A run
//! longer than that yields its first 64 characters.

use crate::hash::{ContentHash, HASH_HEX_LEN};

/// A hash token found in a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashToken {
    /// Byte offset of the first hex character.
    pub offset: usize,
    pub hash: ContentHash,
}

impl HashToken {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.offset + HASH_HEX_LEN
    }
}

fn is_token_char(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

/// Find the first hash token in `text`.
pub fn find_hash_token(text: &str) -> Option<HashToken> {
    let bytes = text.as_bytes();
    let mut run_start = 0;
    let mut run_len = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if !is_token_char(b) {
            run_len = 0;
            continue;
        }
        if run_len == 0 {
            run_start = i;
        }
        run_len += 1;
        if run_len == HASH_HEX_LEN {
            let token = &text[run_start..run_start + HASH_HEX_LEN];
            return ContentHash::from_hex(token).ok().map(|hash| HashToken {
                offset: run_start,
                hash,
            });
        }
    }
    None
}

/// Returns `Some` only when the whole of `text` is a single hash token.
pub fn parse_exact_hash(text: &str) -> Option<ContentHash> {
    if text.len() != HASH_HEX_LEN || !text.bytes().all(is_token_char) {
        return None;
    }
    ContentHash::from_hex(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> ContentHash {
        ContentHash::from_bytes(b"sample")
    }

    #[test]
    fn finds_token_in_path() {
        let hash = sample();
        let uri = format!("/{hash}/docs/index.html");
        let token = find_hash_token(&uri).unwrap();
        assert_eq!(token.offset, 1);
        assert_eq!(token.hash, hash);
        assert_eq!(&uri[token.end()..], "/docs/index.html");
    }

    #[test]
    fn finds_token_in_full_url() {
        let hash = sample();
        let referer = format!("http://localhost:8080/{hash}/sub/");
        assert_eq!(find_hash_token(&referer).unwrap().hash, hash);
    }

    #[test]
    fn short_runs_are_ignored() {
        assert!(find_hash_token("/deadbeef/cafe").is_none());
        assert!(find_hash_token("").is_none());
    }

    #[test]
    fn uppercase_hex_is_not_a_token() {
        let upper = sample().to_hex().to_uppercase();
        assert!(find_hash_token(&upper).is_none());
    }

    #[test]
    fn long_run_yields_first_64_chars() {
        let hex = sample().to_hex();
        let text = format!("{hex}abc");
        let token = find_hash_token(&text).unwrap();
        assert_eq!(token.offset, 0);
        assert_eq!(token.hash, sample());
    }

    #[test]
    fn leftmost_token_wins() {
        let first = ContentHash::from_bytes(b"first");
        let second = ContentHash::from_bytes(b"second");
        let text = format!("/{first}/x/{second}");
        assert_eq!(find_hash_token(&text).unwrap().hash, first);
    }

    #[test]
    fn exact_hash_parsing() {
        let hex = sample().to_hex();
        assert_eq!(parse_exact_hash(&hex), Some(sample()));
        assert_eq!(parse_exact_hash(&format!("{hex} ")), None);
        assert_eq!(parse_exact_hash("./site"), None);
        assert_eq!(parse_exact_hash(&hex.to_uppercase()), None);
    }

    proptest! {
        #[test]
        fn embedded_token_is_found(prefix in "[g-z/._-]{0,20}", suffix in "[g-z/._-]{0,20}", seed in any::<u64>()) {
            let hash = ContentHash::from_bytes(&seed.to_le_bytes());
            let text = format!("{prefix}{hash}{suffix}");
            let token = find_hash_token(&text).unwrap();
            prop_assert_eq!(token.offset, prefix.len());
            prop_assert_eq!(token.hash, hash);
        }

        #[test]
        fn text_without_long_runs_has_no_token(text in "([0-9a-f]{0,63}[g-z/])*") {
            prop_assert!(find_hash_token(&text).is_none());
        }
    }
}
