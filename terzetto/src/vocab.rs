use std::io::{BufRead, Write};

use crate::errors::Result;
use crate::sentence::Sentence;
use crate::utils::{CountTable, Indexer};

/// Replacement token for words that are missing from the vocabulary.
pub const UNKNOWN_WORD: &str = "<unk>";

/// Set of words that are frequent enough to keep their own statistics.
///
/// Words outside the vocabulary are mapped to [`UNKNOWN_WORD`] before
/// counting and before decoding, so both sides agree on how rare words are
/// handled.
///
/// # Examples
///
/// ```
/// use terzetto::Vocabulary;
///
/// let mut vocab = Vocabulary::new();
/// vocab.insert("dog");
///
/// assert_eq!("dog", vocab.normalize("dog"));
/// assert_eq!("<unk>", vocab.normalize("cat"));
/// ```
#[derive(Debug, PartialEq)]
pub struct Vocabulary {
    words: Indexer<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            words: Indexer::new(),
        }
    }

    /// Adds `word` to the vocabulary. Adding a known word has no effect.
    pub fn insert(&mut self, word: &str) {
        self.words.get_id(word);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.get(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns `word` if it is in the vocabulary, [`UNKNOWN_WORD`] otherwise.
    pub fn normalize<'a>(&self, word: &'a str) -> &'a str {
        if self.contains(word) {
            word
        } else {
            UNKNOWN_WORD
        }
    }

    /// Reads a vocabulary stored as one word per line. Blank lines are
    /// skipped.
    ///
    /// # Errors
    ///
    /// When the reader raises an IO error.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut words = Indexer::new();
        let mut line = String::new();
        loop {
            line.clear();
            if rdr.read_line(&mut line)? == 0 {
                break;
            }
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            words.get_id(word);
        }
        Ok(Self { words })
    }

    /// Writes the vocabulary as one word per line, in insertion order.
    ///
    /// # Errors
    ///
    /// When the writer raises an IO error.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        for word in self.words.keys() {
            writeln!(wtr, "{word}")?;
        }
        Ok(())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates word frequencies over a corpus to build a [`Vocabulary`].
pub struct VocabularyCounter {
    counts: CountTable<String>,
    n_tokens: u64,
}

impl VocabularyCounter {
    pub fn new() -> Self {
        Self {
            counts: CountTable::new(),
            n_tokens: 0,
        }
    }

    /// Counts every word of `sentence`.
    pub fn push_sentence(&mut self, sentence: &Sentence) {
        for word in sentence.words() {
            self.counts.add(word.clone(), 1);
            self.n_tokens += 1;
        }
    }

    /// Number of distinct words seen so far.
    pub fn n_distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total number of word occurrences seen so far.
    pub fn n_tokens(&self) -> u64 {
        self.n_tokens
    }

    /// Builds the vocabulary of words seen at least `min_count` times,
    /// keeping the order of first occurrence.
    pub fn build(self, min_count: u64) -> Vocabulary {
        let mut vocab = Vocabulary::new();
        for (word, count) in self.counts.iter() {
            if count >= min_count {
                vocab.insert(word);
            }
        }
        vocab
    }
}

impl Default for VocabularyCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(words: &[&str]) -> Sentence {
        Sentence::from_words(words.iter().map(|w| w.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_build_drops_rare_words() {
        let mut counter = VocabularyCounter::new();
        counter.push_sentence(&raw(&["the", "dog", "saw", "the", "cat"]));

        assert_eq!(4, counter.n_distinct());
        assert_eq!(5, counter.n_tokens());

        let vocab = counter.build(2);
        assert!(vocab.contains("the"));
        assert!(!vocab.contains("dog"));
        assert!(!vocab.contains("saw"));
        assert!(!vocab.contains("cat"));
        assert_eq!(1, vocab.len());
    }

    #[test]
    fn test_default_threshold_needs_two_occurrences() {
        let mut counter = VocabularyCounter::new();
        counter.push_sentence(&raw(&["dog"]));
        assert!(counter.build(2).is_empty());

        let mut counter = VocabularyCounter::new();
        counter.push_sentence(&raw(&["dog"]));
        counter.push_sentence(&raw(&["dog"]));
        assert!(counter.build(2).contains("dog"));
    }

    #[test]
    fn test_build_min_count_one_keeps_everything() {
        let mut counter = VocabularyCounter::new();
        counter.push_sentence(&raw(&["b", "a", "b"]));

        assert_eq!(2, counter.n_distinct());
        assert_eq!(3, counter.n_tokens());

        let vocab = counter.build(1);
        assert_eq!(2, vocab.len());
        assert!(vocab.contains("a"));
        assert!(vocab.contains("b"));
    }

    #[test]
    fn test_normalize_unknown_word() {
        let mut counter = VocabularyCounter::new();
        counter.push_sentence(&raw(&["dog", "dog"]));
        let vocab = counter.build(2);

        assert_eq!("dog", vocab.normalize("dog"));
        assert_eq!(UNKNOWN_WORD, vocab.normalize("aardvark"));
    }

    #[test]
    fn test_read_write_round_trip() {
        let mut vocab = Vocabulary::new();
        vocab.insert("dog");
        vocab.insert("cat");

        let mut buf = vec![];
        vocab.write(&mut buf).unwrap();
        assert_eq!("dog\ncat\n", std::str::from_utf8(&buf).unwrap());

        let reread = Vocabulary::read(&mut buf.as_slice()).unwrap();
        assert_eq!(vocab, reread);
    }

    #[test]
    fn test_read_skips_blank_lines() {
        let text = "dog\n\ncat\n";
        let vocab = Vocabulary::read(&mut text.as_bytes()).unwrap();

        assert_eq!(2, vocab.len());
        assert!(vocab.contains("dog"));
        assert!(vocab.contains("cat"));
    }
}
