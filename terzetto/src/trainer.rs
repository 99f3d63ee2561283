use std::io::Write;

use crate::errors::{Result, TerzettoError};
use crate::model::{START_TAG, STOP_TAG};
use crate::sentence::Sentence;
use crate::utils::CountTable;
use crate::vocab::Vocabulary;

/// Estimates emission and tag n-gram counts from a labeled corpus.
///
/// Each sentence is padded with `n - 1` start symbols and one stop symbol,
/// and every length-`n` window over the padded tag sequence contributes one
/// count to each of its tag suffixes. Words are normalized through the
/// vocabulary first, so rare words are counted as [`UNKNOWN_WORD`].
///
/// [`UNKNOWN_WORD`]: crate::UNKNOWN_WORD
///
/// # Examples
///
/// ```
/// use terzetto::{Sentence, Trainer, Vocabulary};
///
/// let mut vocab = Vocabulary::new();
/// vocab.insert("dog");
///
/// let mut trainer = Trainer::new(vocab, 3).unwrap();
/// let s = Sentence::new(
///     vec!["dog".to_string()],
///     vec![Some("NOUN".to_string())],
/// ).unwrap();
/// trainer.push_sentence(&s).unwrap();
///
/// let mut counts = vec![];
/// trainer.write_counts(&mut counts).unwrap();
/// let counts = String::from_utf8(counts).unwrap();
/// assert!(counts.contains("1 WORDTAG NOUN dog"));
/// assert!(counts.contains("1 3-GRAM * * NOUN"));
/// ```
pub struct Trainer {
    ngram_size: usize,
    vocab: Vocabulary,
    emission_counts: CountTable<(String, String)>,
    ngram_counts: Vec<CountTable<Vec<String>>>,
    n_sentences: usize,
}

impl Trainer {
    /// Creates a new trainer counting tag n-grams up to `ngram_size`.
    ///
    /// # Arguments
    ///
    /// * `vocab` - Words to keep; everything else becomes the unknown word.
    /// * `ngram_size` - Maximum n-gram length. The standard model uses 3.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidArgument`] when `ngram_size` is less than 2.
    pub fn new(vocab: Vocabulary, ngram_size: usize) -> Result<Self> {
        if ngram_size < 2 {
            return Err(TerzettoError::invalid_argument(
                "ngram_size",
                "must be at least 2",
            ));
        }
        Ok(Self {
            ngram_size,
            vocab,
            emission_counts: CountTable::new(),
            ngram_counts: (0..ngram_size).map(|_| CountTable::new()).collect(),
            n_sentences: 0,
        })
    }

    /// Adds the counts of one labeled sentence.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidArgument`] when the sentence contains an
    /// untagged token or uses a reserved tag. A failed call leaves the
    /// counts unchanged.
    pub fn push_sentence(&mut self, s: &Sentence) -> Result<()> {
        let n = self.ngram_size;
        let mut aug: Vec<(Option<&str>, &str)> = Vec::with_capacity(s.len() + n);
        for _ in 1..n {
            aug.push((None, START_TAG));
        }
        for (word, tag) in s.words().iter().zip(s.tags()) {
            let tag = tag.as_deref().ok_or_else(|| {
                TerzettoError::invalid_argument(
                    "s",
                    format!("sentence contains an untagged token: {word}"),
                )
            })?;
            if tag == START_TAG || tag == STOP_TAG {
                return Err(TerzettoError::invalid_argument(
                    "s",
                    format!("tag '{tag}' is reserved"),
                ));
            }
            aug.push((Some(self.vocab.normalize(word)), tag));
        }
        aug.push((None, STOP_TAG));
        for window in aug.windows(n) {
            for k in 2..=n {
                let ngram = window[n - k..]
                    .iter()
                    .map(|&(_, tag)| tag.to_string())
                    .collect();
                self.ngram_counts[k - 1].add(ngram, 1);
            }
            let (word, tag) = window[n - 1];
            if let Some(word) = word {
                self.ngram_counts[0].add(vec![tag.to_string()], 1);
                self.emission_counts
                    .add((tag.to_string(), word.to_string()), 1);
            }
            if window[n - 2].0.is_none() {
                self.ngram_counts[n - 2].add(vec![START_TAG.to_string(); n - 1], 1);
            }
        }
        self.n_sentences += 1;
        Ok(())
    }

    /// Number of sentences pushed so far.
    pub fn n_sentences(&self) -> usize {
        self.n_sentences
    }

    /// Number of distinct tag n-grams counted so far, over all lengths.
    pub fn n_ngrams(&self) -> usize {
        self.ngram_counts.iter().map(|counts| counts.len()).sum()
    }

    /// Number of distinct word and tag pairs counted so far.
    pub fn n_emissions(&self) -> usize {
        self.emission_counts.len()
    }

    /// Writes all accumulated counts in the counts file format: emission
    /// records first, then n-gram records of each length in ascending
    /// order. Records keep the order in which they were first counted.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidFormat`] when no sentences have been pushed,
    /// and [`TerzettoError::IOError`] when the writer fails.
    pub fn write_counts<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        if self.n_sentences == 0 {
            return Err(TerzettoError::invalid_format(
                "the corpus contains no sentences",
            ));
        }
        for ((tag, word), count) in self.emission_counts.iter() {
            writeln!(wtr, "{count} WORDTAG {tag} {word}")?;
        }
        for (k, counts) in self.ngram_counts.iter().enumerate() {
            let k = k + 1;
            for (ngram, count) in counts.iter() {
                writeln!(wtr, "{count} {k}-GRAM {}", ngram.join(" "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(pairs: &[(&str, &str)]) -> Sentence {
        Sentence::new(
            pairs.iter().map(|&(word, _)| word.to_string()).collect(),
            pairs
                .iter()
                .map(|&(_, tag)| Some(tag.to_string()))
                .collect(),
        )
        .unwrap()
    }

    fn vocab_of(words: &[&str]) -> Vocabulary {
        let mut vocab = Vocabulary::new();
        for word in words {
            vocab.insert(word);
        }
        vocab
    }

    fn counts_string(trainer: &Trainer) -> String {
        let mut buf = vec![];
        trainer.write_counts(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_counts_trigram() {
        let vocab = vocab_of(&["the", "dog", "barks"]);
        let mut trainer = Trainer::new(vocab, 3).unwrap();
        trainer
            .push_sentence(&labeled(&[
                ("the", "DET"),
                ("dog", "NOUN"),
                ("barks", "VERB"),
            ]))
            .unwrap();

        let expected = "\
1 WORDTAG DET the
1 WORDTAG NOUN dog
1 WORDTAG VERB barks
1 1-GRAM DET
1 1-GRAM NOUN
1 1-GRAM VERB
1 2-GRAM * DET
1 2-GRAM * *
1 2-GRAM DET NOUN
1 2-GRAM NOUN VERB
1 2-GRAM VERB STOP
1 3-GRAM * * DET
1 3-GRAM * DET NOUN
1 3-GRAM DET NOUN VERB
1 3-GRAM NOUN VERB STOP
";
        assert_eq!(expected, counts_string(&trainer));
    }

    #[test]
    fn test_write_counts_bigram() {
        let vocab = vocab_of(&["the", "dog"]);
        let mut trainer = Trainer::new(vocab, 2).unwrap();
        trainer
            .push_sentence(&labeled(&[("the", "DET"), ("dog", "NOUN")]))
            .unwrap();

        let expected = "\
1 WORDTAG DET the
1 WORDTAG NOUN dog
1 1-GRAM DET
1 1-GRAM *
1 1-GRAM NOUN
1 2-GRAM * DET
1 2-GRAM DET NOUN
1 2-GRAM NOUN STOP
";
        assert_eq!(expected, counts_string(&trainer));
    }

    #[test]
    fn test_emission_counts_sum_to_unigram_counts() {
        let vocab = vocab_of(&["the", "dog", "cat", "barks"]);
        let mut trainer = Trainer::new(vocab, 3).unwrap();
        trainer
            .push_sentence(&labeled(&[("the", "DET"), ("dog", "NOUN")]))
            .unwrap();
        trainer
            .push_sentence(&labeled(&[("the", "DET"), ("cat", "NOUN")]))
            .unwrap();
        trainer
            .push_sentence(&labeled(&[("dog", "NOUN"), ("barks", "VERB")]))
            .unwrap();

        let counts = counts_string(&trainer);
        assert!(counts.contains("2 WORDTAG DET the\n"));
        assert!(counts.contains("2 WORDTAG NOUN dog\n"));
        assert!(counts.contains("1 WORDTAG NOUN cat\n"));
        assert!(counts.contains("1 WORDTAG VERB barks\n"));
        assert!(counts.contains("2 1-GRAM DET\n"));
        assert!(counts.contains("3 1-GRAM NOUN\n"));
        assert!(counts.contains("1 1-GRAM VERB\n"));
    }

    #[test]
    fn test_start_bigram_counts_sentences() {
        let vocab = vocab_of(&["dog"]);
        let mut trainer = Trainer::new(vocab, 3).unwrap();
        for _ in 0..3 {
            trainer.push_sentence(&labeled(&[("dog", "NOUN")])).unwrap();
        }

        assert_eq!(3, trainer.n_sentences());
        assert!(counts_string(&trainer).contains("3 2-GRAM * *\n"));
    }

    #[test]
    fn test_unknown_words_substituted() {
        let vocab = vocab_of(&["the"]);
        let mut trainer = Trainer::new(vocab, 3).unwrap();
        trainer
            .push_sentence(&labeled(&[("the", "DET"), ("dog", "NOUN")]))
            .unwrap();

        let counts = counts_string(&trainer);
        assert!(counts.contains("1 WORDTAG NOUN <unk>\n"));
        assert!(!counts.contains("dog"));
    }

    #[test]
    fn test_stop_is_never_emitted() {
        let vocab = vocab_of(&["dog"]);
        let mut trainer = Trainer::new(vocab, 3).unwrap();
        trainer.push_sentence(&labeled(&[("dog", "NOUN")])).unwrap();

        let counts = counts_string(&trainer);
        assert!(!counts.contains("WORDTAG STOP"));
        assert!(!counts.contains("1-GRAM STOP"));
        assert!(!counts.contains("1-GRAM *"));
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let trainer = Trainer::new(Vocabulary::new(), 3).unwrap();
        let result = trainer.write_counts(&mut vec![]);

        assert!(matches!(result, Err(TerzettoError::InvalidFormat(_))));
    }

    #[test]
    fn test_ngram_size_too_small() {
        let result = Trainer::new(Vocabulary::new(), 1);

        assert!(matches!(result, Err(TerzettoError::InvalidArgument(_))));
    }

    #[test]
    fn test_reserved_tags_rejected() {
        let mut trainer = Trainer::new(vocab_of(&["dog"]), 3).unwrap();

        for tag in ["*", "STOP"] {
            let result = trainer.push_sentence(&labeled(&[("dog", tag)]));
            assert!(matches!(result, Err(TerzettoError::InvalidArgument(_))));
        }
        assert_eq!(0, trainer.n_sentences());
    }

    #[test]
    fn test_untagged_token_rejected() {
        let mut trainer = Trainer::new(vocab_of(&["dog"]), 3).unwrap();
        let s = Sentence::from_words(vec!["dog".to_string()]).unwrap();

        let result = trainer.push_sentence(&s);
        assert!(matches!(result, Err(TerzettoError::InvalidArgument(_))));
    }
}
