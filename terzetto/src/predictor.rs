#[cfg(feature = "multithreading")]
use std::sync::Arc;
#[cfg(feature = "multithreading")]
use std::thread;

#[cfg(feature = "multithreading")]
use crossbeam_channel::{Receiver, Sender};

use crate::errors::{Result, TerzettoError};
use crate::model::Model;
use crate::sentence::Sentence;
use crate::vocab::Vocabulary;

/// Predictor assigning the most likely tag sequence to each sentence.
///
/// The decoder runs the Viterbi algorithm over the trigram model: the score
/// of a sentence is the product of one transition probability per tag
/// (conditioned on the two previous tags) and one emission probability per
/// word, closed by a transition into the stop symbol.
///
/// # Examples
///
/// ```
/// use terzetto::{Model, Predictor, Sentence, Vocabulary};
///
/// let counts = "\
/// 2 WORDTAG DET the
/// 2 WORDTAG NOUN dog
/// 2 WORDTAG VERB barks
/// 2 2-GRAM * *
/// 2 2-GRAM * DET
/// 2 2-GRAM DET NOUN
/// 2 2-GRAM NOUN VERB
/// 2 3-GRAM * * DET
/// 2 3-GRAM * DET NOUN
/// 2 3-GRAM DET NOUN VERB
/// 2 3-GRAM NOUN VERB STOP
/// ";
/// let model = Model::read(&mut counts.as_bytes()).unwrap();
/// let mut vocab = Vocabulary::new();
/// for word in ["the", "dog", "barks"] {
///     vocab.insert(word);
/// }
/// let predictor = Predictor::new(model, vocab).unwrap();
///
/// let s = Sentence::from_words(
///     vec!["the".to_string(), "dog".to_string(), "barks".to_string()],
/// ).unwrap();
/// let s = predictor.predict(s);
///
/// assert_eq!("the\tDET\ndog\tNOUN\nbarks\tVERB", s.to_labeled_string().unwrap());
/// ```
pub struct Predictor {
    model: Model,
    vocab: Vocabulary,
}

impl Predictor {
    /// Creates a new predictor.
    ///
    /// # Arguments
    ///
    /// * `model` - A trained model.
    /// * `vocab` - The vocabulary the model was trained with.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidModel`] when the model contains no tags.
    pub fn new(model: Model, vocab: Vocabulary) -> Result<Self> {
        if model.n_tags() == 0 {
            return Err(TerzettoError::invalid_model(
                "the model contains no emission records",
            ));
        }
        Ok(Self { model, vocab })
    }

    /// Predicts tags for a sentence.
    ///
    /// Words are normalized through the vocabulary before scoring, but the
    /// returned sentence keeps the original words. Every token receives a
    /// tag, even when all candidate sequences have probability zero.
    ///
    /// # Arguments
    ///
    /// * `sentence` - A sentence.
    ///
    /// # Returns
    ///
    /// A sentence with tags filled in.
    pub fn predict(&self, mut sentence: Sentence) -> Sentence {
        let positions = {
            let words: Vec<_> = sentence
                .words()
                .iter()
                .map(|word| self.vocab.normalize(word))
                .collect();
            self.decode(&words)
        };
        sentence.tags = positions
            .into_iter()
            .map(|pos| Some(self.model.tag_str(self.model.states()[pos]).to_string()))
            .collect();
        sentence
    }

    /// Runs the Viterbi recurrence and returns one state position per word.
    ///
    /// Layers are keyed by the pair of the two latest tags. The first layer
    /// only pairs the start symbol with each state, and a one-word sentence
    /// is closed directly from it. Deeper layers keep a backpointer to the
    /// best predecessor; the search prefers the latest state on equal
    /// scores, while the final pair takes the earliest maximum.
    fn decode(&self, words: &[&str]) -> Vec<usize> {
        let model = &self.model;
        let states = model.states();
        let n = states.len();
        let start = model.start_id();
        let stop = model.stop_id();

        let mut first = Vec::with_capacity(n);
        for &v in states {
            first.push(model.transition_by_id(start, start, v) * model.emission_by_id(words[0], v));
        }
        if words.len() == 1 {
            let mut best_score = f64::NEG_INFINITY;
            let mut best_vi = 0;
            for (vi, &v) in states.iter().enumerate() {
                let score = first[vi] * model.transition_by_id(start, v, stop);
                if score > best_score {
                    best_score = score;
                    best_vi = vi;
                }
            }
            return vec![best_vi];
        }

        let mut prev = vec![0.0; n * n];
        for (ui, &u) in states.iter().enumerate() {
            for (vi, &v) in states.iter().enumerate() {
                prev[ui * n + vi] = first[ui]
                    * model.transition_by_id(start, u, v)
                    * model.emission_by_id(words[1], v);
            }
        }

        let mut backs = Vec::with_capacity(words.len() - 2);
        let mut cur = vec![0.0; n * n];
        for &word in &words[2..] {
            let emissions: Vec<_> = states
                .iter()
                .map(|&v| model.emission_by_id(word, v))
                .collect();
            let mut back = vec![0; n * n];
            for (ui, &u) in states.iter().enumerate() {
                for (vi, &v) in states.iter().enumerate() {
                    let mut best_score = 0.0;
                    let mut best_wi = 0;
                    for (wi, &w) in states.iter().enumerate() {
                        let score =
                            prev[wi * n + ui] * model.transition_by_id(w, u, v) * emissions[vi];
                        if score >= best_score {
                            best_score = score;
                            best_wi = wi;
                        }
                    }
                    cur[ui * n + vi] = best_score;
                    back[ui * n + vi] = best_wi;
                }
            }
            backs.push(back);
            std::mem::swap(&mut prev, &mut cur);
        }

        let mut best_score = f64::NEG_INFINITY;
        let mut best_ui = 0;
        let mut best_vi = 0;
        for (ui, &u) in states.iter().enumerate() {
            for (vi, &v) in states.iter().enumerate() {
                let score = prev[ui * n + vi] * model.transition_by_id(u, v, stop);
                if score > best_score {
                    best_score = score;
                    best_ui = ui;
                    best_vi = vi;
                }
            }
        }

        let mut result = vec![0; words.len()];
        result[words.len() - 1] = best_vi;
        result[words.len() - 2] = best_ui;
        for idx in (0..words.len() - 2).rev() {
            result[idx] = backs[idx][result[idx + 1] * n + result[idx + 2]];
        }
        result
    }

    /// Creates a multithreading predictor. This function is the alias of
    /// [`MultithreadPredictor::new()`].
    ///
    /// # Arguments
    ///
    /// * `n_threads` - The number of threads.
    ///
    /// # Returns
    ///
    /// A multithread predictor.
    #[cfg(feature = "multithreading")]
    #[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
    pub fn multithreading(self, n_threads: usize) -> MultithreadPredictor {
        MultithreadPredictor::new(self, n_threads)
    }
}

/// Predictor for multithreading.
#[cfg(feature = "multithreading")]
#[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
pub struct MultithreadPredictor {
    task_tx: Sender<(usize, Sentence)>,
    result_rx: Receiver<(usize, Sentence)>,
}

#[cfg(feature = "multithreading")]
impl MultithreadPredictor {
    /// Creates a multithreading predictor.
    ///
    /// # Arguments
    ///
    /// * `predictor` - A normal predictor.
    /// * `n_threads` - The number of threads.
    ///
    /// # Returns
    ///
    /// A multithread predictor.
    pub fn new(predictor: Predictor, n_threads: usize) -> Self {
        let predictor = Arc::new(predictor);

        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<(usize, Sentence)>();
        for _ in 0..n_threads.max(1) {
            let predictor = Arc::clone(&predictor);
            let result_tx = result_tx.clone();
            let task_rx = task_rx.clone();
            thread::spawn(move || {
                for (i, sentence) in task_rx {
                    result_tx.send((i, predictor.predict(sentence))).unwrap();
                }
            });
        }

        Self { task_tx, result_rx }
    }

    /// Predicts tags for a batch of sentences.
    ///
    /// # Arguments
    ///
    /// * `sentences` - A batch of sentences.
    ///
    /// # Returns
    ///
    /// Tagged sentences in the order of the input.
    pub fn predict(&self, sentences: Vec<Sentence>) -> Vec<Sentence> {
        let n_sentences = sentences.len();
        for task in sentences.into_iter().enumerate() {
            self.task_tx.send(task).unwrap();
        }
        let mut results = vec![None; n_sentences];
        for _ in 0..n_sentences {
            let (i, sentence) = self.result_rx.recv().unwrap();
            results[i] = Some(sentence);
        }
        results.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_COUNTS: &str = "\
2 WORDTAG DET the
2 WORDTAG NOUN dog
2 WORDTAG VERB barks
2 1-GRAM DET
2 1-GRAM NOUN
2 1-GRAM VERB
2 2-GRAM * *
2 2-GRAM * DET
2 2-GRAM DET NOUN
2 2-GRAM NOUN VERB
2 3-GRAM * * DET
2 3-GRAM * DET NOUN
2 3-GRAM DET NOUN VERB
2 3-GRAM NOUN VERB STOP
";

    fn predictor(counts: &str, words: &[&str]) -> Predictor {
        let model = Model::read(&mut counts.as_bytes()).unwrap();
        let mut vocab = Vocabulary::new();
        for word in words {
            vocab.insert(word);
        }
        Predictor::new(model, vocab).unwrap()
    }

    fn raw(words: &[&str]) -> Sentence {
        Sentence::from_words(words.iter().map(|w| w.to_string()).collect()).unwrap()
    }

    fn tags_of(s: &Sentence) -> Vec<&str> {
        s.tags().iter().map(|tag| tag.as_deref().unwrap()).collect()
    }

    #[test]
    fn test_predict_simple_sentence() {
        let predictor = predictor(SIMPLE_COUNTS, &["the", "dog", "barks"]);

        let s = predictor.predict(raw(&["the", "dog", "barks"]));
        assert_eq!(vec!["DET", "NOUN", "VERB"], tags_of(&s));
        assert_eq!(&["the".to_string(), "dog".to_string(), "barks".to_string()], s.words());
    }

    #[test]
    fn test_predict_single_token() {
        let counts = "\
3 WORDTAG NOUN dog
2 WORDTAG NOUN cat
5 1-GRAM NOUN
2 2-GRAM * *
2 2-GRAM * NOUN
2 3-GRAM * * NOUN
2 3-GRAM * NOUN STOP
";
        let predictor = predictor(counts, &["dog", "cat"]);

        let s = predictor.predict(raw(&["dog"]));
        assert_eq!(vec!["NOUN"], tags_of(&s));
    }

    #[test]
    fn test_predict_two_tokens() {
        let counts = "\
2 WORDTAG DET the
2 WORDTAG NOUN dog
2 2-GRAM * *
2 2-GRAM * DET
2 2-GRAM DET NOUN
2 3-GRAM * * DET
2 3-GRAM * DET NOUN
2 3-GRAM DET NOUN STOP
";
        let predictor = predictor(counts, &["the", "dog"]);

        let s = predictor.predict(raw(&["the", "dog"]));
        assert_eq!(vec!["DET", "NOUN"], tags_of(&s));
    }

    #[test]
    fn test_equal_scores_prefer_later_state() {
        // A and B both emit the first word with the same probability and
        // lead to the same tail, so the backpointer decides the winner.
        let counts = "\
2 WORDTAG A x
2 WORDTAG B x
2 WORDTAG C y
2 WORDTAG D z
2 2-GRAM * *
1 3-GRAM * * A
1 3-GRAM * * B
1 2-GRAM * A
1 2-GRAM * B
1 3-GRAM * A C
1 3-GRAM * B C
1 2-GRAM A C
1 2-GRAM B C
1 3-GRAM A C D
1 3-GRAM B C D
1 2-GRAM C D
1 3-GRAM C D STOP
";
        let predictor = predictor(counts, &["x", "y", "z"]);

        let s = predictor.predict(raw(&["x", "y", "z"]));
        assert_eq!(vec!["B", "C", "D"], tags_of(&s));
    }

    #[test]
    fn test_unknown_words_still_get_tags() {
        let predictor = predictor(SIMPLE_COUNTS, &["the", "dog", "barks"]);

        // Every path scores zero, so the first state pair in enumeration
        // order wins and the output still covers every token.
        let s = predictor.predict(raw(&["qqq", "zzz"]));
        assert_eq!(vec!["DET", "DET"], tags_of(&s));
    }

    #[test]
    fn test_single_unseen_token_takes_first_tag() {
        let predictor = predictor(SIMPLE_COUNTS, &["the", "dog", "barks"]);

        let s = predictor.predict(raw(&["qqq"]));
        assert_eq!(vec!["DET"], tags_of(&s));
    }

    #[test]
    fn test_model_without_tags_rejected() {
        let model = Model::read(&mut "2 2-GRAM * *\n".as_bytes()).unwrap();

        let result = Predictor::new(model, Vocabulary::new());
        assert!(matches!(result, Err(TerzettoError::InvalidModel(_))));
    }

    #[cfg(feature = "multithreading")]
    #[test]
    fn test_multithreading_keeps_order() {
        let predictor = predictor(SIMPLE_COUNTS, &["the", "dog", "barks"]);
        let expected: Vec<_> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    predictor.predict(raw(&["the", "dog", "barks"]))
                } else {
                    predictor.predict(raw(&["dog"]))
                }
            })
            .collect();

        let sentences: Vec<_> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    raw(&["the", "dog", "barks"])
                } else {
                    raw(&["dog"])
                }
            })
            .collect();
        let results = predictor
            .multithreading(4)
            .predict(sentences);

        assert_eq!(expected, results);
    }
}
