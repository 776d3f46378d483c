use std::collections::{HashMap, HashSet};

/// Split text into lowercase whitespace-delimited tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

/// Inverted index from lowercase label words to the ids whose label
/// contains that word.
///
/// Built once as items are added. Labels never change, so entries are never
/// removed.
#[derive(Debug, Default, Clone)]
pub struct WordIndex {
    words: HashMap<String, HashSet<String>>,
}

impl WordIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every word of `label` under `id`.
    pub fn insert(&mut self, id: &str, label: &str) {
        for word in tokenize(label) {
            self.words.entry(word).or_default().insert(id.to_string());
        }
    }

    /// Number of distinct indexed words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Ids having at least one indexed word that contains `token`.
    #[must_use]
    pub fn matching(&self, token: &str) -> HashSet<&str> {
        self.words
            .iter()
            .filter(|(word, _)| word.contains(token))
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect()
    }

    /// Ids matching every token of `query`.
    ///
    /// Returns `None` when the query has no tokens, meaning no filter applies.
    #[must_use]
    pub fn search(&self, query: &str) -> Option<HashSet<&str>> {
        let mut tokens = tokenize(query);
        let first = tokens.next()?;
        let mut matches = self.matching(&first);
        for token in tokens {
            if matches.is_empty() {
                break;
            }
            let next = self.matching(&token);
            matches.retain(|id| next.contains(id));
        }
        Some(matches)
    }
}
