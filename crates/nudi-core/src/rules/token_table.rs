use std::collections::HashMap;

/// Token → output mapping, bucketed by key length in characters.
///
/// The tokenizer probes one length at a time with a slice of the input, so
/// a lookup never allocates and lengths with no keys are skipped outright.
#[derive(Debug, Default)]
pub struct TokenTable {
    /// `buckets[n]` holds the keys that are exactly `n` characters long.
    buckets: Vec<HashMap<String, String>>,
    len: usize,
}

impl TokenTable {
    pub fn new(map: HashMap<String, String>) -> Self {
        let mut buckets: Vec<HashMap<String, String>> = Vec::new();
        let mut len = 0;
        for (key, value) in map {
            let n = key.chars().count();
            if n == 0 {
                tracing::warn!("skipping empty token key");
                continue;
            }
            if buckets.len() <= n {
                buckets.resize_with(n + 1, HashMap::new);
            }
            buckets[n].insert(key, value);
            len += 1;
        }
        Self { buckets, len }
    }

    /// Look up `key` whose character count the caller already knows.
    pub fn get_with_len(&self, key: &str, char_len: usize) -> Option<&str> {
        self.buckets
            .get(char_len)
            .and_then(|b| b.get(key))
            .map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_with_len(key, key.chars().count())
    }

    /// Whether any key is exactly `char_len` characters long.
    pub fn has_len(&self, char_len: usize) -> bool {
        self.buckets.get(char_len).is_some_and(|b| !b.is_empty())
    }

    /// Length in characters of the longest key.
    pub fn max_key_len(&self) -> usize {
        self.buckets.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> TokenTable {
        TokenTable::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_bucketed_lookup() {
        let t = table(&[("P", "ಕ"), ("PÀ", "ಕ"), ("ªÀÄ", "ಮ")]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("P"), Some("ಕ"));
        assert_eq!(t.get("ªÀÄ"), Some("ಮ"));
        assert_eq!(t.get_with_len("PÀ", 2), Some("ಕ"));
        // Wrong length bucket never matches.
        assert_eq!(t.get_with_len("PÀ", 3), None);
        assert_eq!(t.get("x"), None);
    }

    #[test]
    fn test_lengths() {
        let t = table(&[("a", "1"), ("abcd", "2")]);
        assert!(t.has_len(1));
        assert!(!t.has_len(2));
        assert!(!t.has_len(3));
        assert!(t.has_len(4));
        assert!(!t.has_len(9));
        assert_eq!(t.max_key_len(), 4);
    }

    #[test]
    fn test_empty_key_skipped() {
        let t = table(&[("", "x"), ("a", "y")]);
        assert_eq!(t.len(), 1);
        assert!(!t.has_len(0));
    }

    #[test]
    fn test_empty_table() {
        let t = TokenTable::default();
        assert!(t.is_empty());
        assert_eq!(t.max_key_len(), 0);
    }
}
