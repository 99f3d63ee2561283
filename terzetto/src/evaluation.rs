use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{Result, TerzettoError};
use crate::sentence::Sentence;

#[derive(Debug, Default)]
struct TagCount {
    n_correct: u64,
    n_total: u64,
}

/// Compares predicted tags against gold tags and accumulates accuracy.
///
/// # Examples
///
/// ```
/// use terzetto::{Evaluator, Sentence};
///
/// let gold = Sentence::new(
///     vec!["the".to_string(), "dog".to_string()],
///     vec![Some("DET".to_string()), Some("NOUN".to_string())],
/// ).unwrap();
/// let predicted = Sentence::new(
///     vec!["the".to_string(), "dog".to_string()],
///     vec![Some("DET".to_string()), Some("VERB".to_string())],
/// ).unwrap();
///
/// let mut evaluator = Evaluator::new();
/// evaluator.push(&gold, &predicted).unwrap();
///
/// assert_eq!(0.5, evaluator.accuracy());
/// ```
#[derive(Debug, Default)]
pub struct Evaluator {
    n_correct: u64,
    n_total: u64,
    per_tag: BTreeMap<String, TagCount>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores one sentence pair token by token.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::Alignment`] when the sentences have different
    /// lengths or disagree on a word, and [`TerzettoError::InvalidArgument`]
    /// when either side contains an untagged token. A failed call leaves
    /// the totals unchanged.
    pub fn push(&mut self, gold: &Sentence, predicted: &Sentence) -> Result<()> {
        if gold.len() != predicted.len() {
            return Err(TerzettoError::alignment(
                format!("{} tokens", gold.len()),
                format!("{} tokens", predicted.len()),
            ));
        }
        let mut pairs = Vec::with_capacity(gold.len());
        for (i, (gold_word, pred_word)) in
            gold.words().iter().zip(predicted.words()).enumerate()
        {
            if gold_word != pred_word {
                return Err(TerzettoError::alignment(gold_word, pred_word));
            }
            let gold_tag = gold.tags()[i].as_deref().ok_or_else(|| {
                TerzettoError::invalid_argument(
                    "gold",
                    format!("sentence contains an untagged token: {gold_word}"),
                )
            })?;
            let pred_tag = predicted.tags()[i].as_deref().ok_or_else(|| {
                TerzettoError::invalid_argument(
                    "predicted",
                    format!("sentence contains an untagged token: {pred_word}"),
                )
            })?;
            pairs.push((gold_tag, pred_tag));
        }
        for (gold_tag, pred_tag) in pairs {
            self.n_total += 1;
            let entry = self.per_tag.entry(gold_tag.to_string()).or_default();
            entry.n_total += 1;
            if gold_tag == pred_tag {
                self.n_correct += 1;
                entry.n_correct += 1;
            }
        }
        Ok(())
    }

    /// Fraction of tokens tagged correctly, or zero before any push.
    pub fn accuracy(&self) -> f64 {
        if self.n_total == 0 {
            return 0.0;
        }
        self.n_correct as f64 / self.n_total as f64
    }

    pub fn n_correct(&self) -> u64 {
        self.n_correct
    }

    pub fn n_total(&self) -> u64 {
        self.n_total
    }
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (tag, count) in &self.per_tag {
            writeln!(
                f,
                "{}: {:.4} ({}/{})",
                tag,
                count.n_correct as f64 / count.n_total as f64,
                count.n_correct,
                count.n_total,
            )?;
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

    #[test]
    fn test_accuracy() {
        let mut evaluator = Evaluator::new();
        evaluator
            .push(
                &labeled(&[("the", "DET"), ("dog", "NOUN")]),
                &labeled(&[("the", "DET"), ("dog", "VERB")]),
            )
            .unwrap();

        assert_eq!(0.5, evaluator.accuracy());
        assert_eq!(1, evaluator.n_correct());
        assert_eq!(2, evaluator.n_total());
    }

    #[test]
    fn test_accuracy_without_tokens() {
        assert_eq!(0.0, Evaluator::new().accuracy());
    }

    #[test]
    fn test_word_mismatch() {
        let mut evaluator = Evaluator::new();
        let result = evaluator.push(
            &labeled(&[("dog", "NOUN")]),
            &labeled(&[("cat", "NOUN")]),
        );

        assert!(matches!(result, Err(TerzettoError::Alignment(_))));
        assert_eq!(0, evaluator.n_total());
    }

    #[test]
    fn test_length_mismatch() {
        let mut evaluator = Evaluator::new();
        let result = evaluator.push(
            &labeled(&[("the", "DET"), ("dog", "NOUN")]),
            &labeled(&[("the", "DET")]),
        );

        assert!(matches!(result, Err(TerzettoError::Alignment(_))));
    }

    #[test]
    fn test_untagged_token() {
        let mut evaluator = Evaluator::new();
        let raw = Sentence::from_words(vec!["dog".to_string()]).unwrap();
        let result = evaluator.push(&labeled(&[("dog", "NOUN")]), &raw);

        assert!(matches!(result, Err(TerzettoError::InvalidArgument(_))));
        assert_eq!(0, evaluator.n_total());
    }

    #[test]
    fn test_display_lists_tags_in_order() {
        let mut evaluator = Evaluator::new();
        evaluator
            .push(
                &labeled(&[("the", "DET"), ("dog", "NOUN")]),
                &labeled(&[("the", "DET"), ("dog", "VERB")]),
            )
            .unwrap();

        assert_eq!(
            "DET: 1.0000 (1/1)\nNOUN: 0.0000 (0/1)\n",
            evaluator.to_string()
        );
    }
}
