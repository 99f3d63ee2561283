#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Terzetto
//!
//! Terzetto is a lightweight trigram hidden Markov model tagger.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{stdin, BufReader};
//!
//! use terzetto::{Model, Predictor, SentenceReader, Vocabulary};
//!
//! let mut f = BufReader::new(File::open("model.counts").unwrap());
//! let model = Model::read(&mut f).unwrap();
//! let mut f = BufReader::new(File::open("model.vocab").unwrap());
//! let vocab = Vocabulary::read(&mut f).unwrap();
//! let predictor = Predictor::new(model, vocab).unwrap();
//!
//! for sentence in SentenceReader::raw(stdin().lock()) {
//!     let sentence = predictor.predict(sentence.unwrap());
//!     println!("{}", sentence.to_labeled_string().unwrap());
//!     println!();
//! }
//! ```
//!
//! Counts files and vocabularies are produced with [`Trainer`] and
//! [`VocabularyCounter`].

pub mod errors;

mod corpus;
mod evaluation;
mod model;
mod predictor;
mod sentence;
mod trainer;
mod utils;
mod vocab;

pub use corpus::SentenceReader;
pub use evaluation::Evaluator;
pub use model::{Model, START_TAG, STOP_TAG};
pub use predictor::Predictor;
pub use sentence::Sentence;
pub use trainer::Trainer;
pub use vocab::{Vocabulary, VocabularyCounter, UNKNOWN_WORD};

#[cfg(feature = "multithreading")]
pub use predictor::MultithreadPredictor;
