use std::io::BufRead;

use hashbrown::HashMap;

use crate::errors::{Result, TerzettoError};
use crate::utils::Indexer;

/// Boundary tag padding the left context of every sentence.
pub const START_TAG: &str = "*";

/// Boundary tag closing every sentence.
pub const STOP_TAG: &str = "STOP";

/// Count tables of a trained trigram model.
///
/// A model is loaded from a counts file and answers maximum likelihood
/// probability queries. Emission probabilities divide a word and tag count
/// by the total count of the tag, and transition probabilities divide a tag
/// trigram count by the count of its leading bigram. Queries over missing
/// counts return zero instead of failing.
///
/// # Examples
///
/// ```
/// use terzetto::Model;
///
/// let counts = "\
/// 3 WORDTAG NOUN dog
/// 2 WORDTAG NOUN cat
/// 5 1-GRAM NOUN
/// 2 2-GRAM * *
/// 2 2-GRAM * NOUN
/// 2 3-GRAM * * NOUN
/// ";
/// let model = Model::read(&mut counts.as_bytes()).unwrap();
///
/// assert_eq!(0.6, model.emission("dog", "NOUN"));
/// assert_eq!(1.0, model.transition("*", "*", "NOUN"));
/// ```
#[derive(Debug, PartialEq)]
pub struct Model {
    symbols: Indexer<String>,
    start_id: usize,
    stop_id: usize,
    states: Vec<usize>,
    tag_totals: Vec<u64>,
    emissions: HashMap<String, Vec<(usize, u64)>>,
    bigrams: HashMap<[usize; 2], u64>,
    trigrams: HashMap<[usize; 3], u64>,
}

fn intern(symbols: &mut Indexer<String>, tag_totals: &mut Vec<u64>, tag: &str) -> usize {
    let id = symbols.get_id(tag);
    if tag_totals.len() <= id {
        tag_totals.push(0);
    }
    id
}

impl Model {
    /// Reads a model from a counts file.
    ///
    /// Emission records may repeat; their counts are summed. A repeated
    /// n-gram record replaces the previous one. Records of lengths other
    /// than 2 and 3 are validated and skipped. The set of tags a sentence
    /// can be labeled with is the set of tags appearing in emission
    /// records, in order of first appearance.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidModel`] when a record is malformed, and
    /// [`TerzettoError::IOError`] when the reader fails.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut symbols = Indexer::new();
        let mut tag_totals = vec![];
        let start_id = intern(&mut symbols, &mut tag_totals, START_TAG);
        let stop_id = intern(&mut symbols, &mut tag_totals, STOP_TAG);
        let mut states = vec![];
        let mut emissions: HashMap<String, Vec<(usize, u64)>> = HashMap::new();
        let mut bigrams = HashMap::new();
        let mut trigrams = HashMap::new();

        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            if rdr.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            let content = line.trim();
            if content.is_empty() {
                continue;
            }
            let fields: Vec<_> = content.split(' ').collect();
            if fields.len() < 3 {
                return Err(TerzettoError::invalid_model(format!(
                    "line {line_no}: malformed record: {content}"
                )));
            }
            let count: u64 = fields[0].parse().map_err(|_| {
                TerzettoError::invalid_model(format!("line {line_no}: invalid count: {content}"))
            })?;
            if fields[1] == "WORDTAG" {
                if fields.len() != 4 || fields[2].is_empty() || fields[3].is_empty() {
                    return Err(TerzettoError::invalid_model(format!(
                        "line {line_no}: malformed emission record: {content}"
                    )));
                }
                let tag_id = intern(&mut symbols, &mut tag_totals, fields[2]);
                if !states.contains(&tag_id) {
                    states.push(tag_id);
                }
                tag_totals[tag_id] += count;
                let entry = emissions.entry(fields[3].to_string()).or_default();
                if let Some((_, c)) = entry.iter_mut().find(|&&mut (id, _)| id == tag_id) {
                    *c += count;
                } else {
                    entry.push((tag_id, count));
                }
            } else if let Some(k) = fields[1]
                .strip_suffix("-GRAM")
                .and_then(|prefix| prefix.parse::<usize>().ok())
                .filter(|&k| k > 0)
            {
                if fields.len() != 2 + k || fields[2..].iter().any(|field| field.is_empty()) {
                    return Err(TerzettoError::invalid_model(format!(
                        "line {line_no}: malformed {k}-gram record: {content}"
                    )));
                }
                match k {
                    2 => {
                        let key = [
                            intern(&mut symbols, &mut tag_totals, fields[2]),
                            intern(&mut symbols, &mut tag_totals, fields[3]),
                        ];
                        bigrams.insert(key, count);
                    }
                    3 => {
                        let key = [
                            intern(&mut symbols, &mut tag_totals, fields[2]),
                            intern(&mut symbols, &mut tag_totals, fields[3]),
                            intern(&mut symbols, &mut tag_totals, fields[4]),
                        ];
                        trigrams.insert(key, count);
                    }
                    _ => (),
                }
            } else {
                return Err(TerzettoError::invalid_model(format!(
                    "line {line_no}: unrecognized record: {content}"
                )));
            }
        }
        Ok(Self {
            symbols,
            start_id,
            stop_id,
            states,
            tag_totals,
            emissions,
            bigrams,
            trigrams,
        })
    }

    /// Maximum likelihood probability of `word` being emitted by `tag`.
    ///
    /// Returns zero when the pair was never seen or the tag is unknown.
    pub fn emission(&self, word: &str, tag: &str) -> f64 {
        self.symbols
            .get(tag)
            .map_or(0.0, |tag_id| self.emission_by_id(word, tag_id))
    }

    /// Maximum likelihood probability of `t3` following the tags `t1 t2`.
    ///
    /// Returns zero when the trigram or its leading bigram was never seen.
    pub fn transition(&self, t1: &str, t2: &str, t3: &str) -> f64 {
        match (
            self.symbols.get(t1),
            self.symbols.get(t2),
            self.symbols.get(t3),
        ) {
            (Some(a), Some(b), Some(c)) => self.transition_by_id(a, b, c),
            _ => 0.0,
        }
    }

    /// Number of distinct tags seen in emission records.
    pub fn n_tags(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn emission_by_id(&self, word: &str, tag_id: usize) -> f64 {
        let count = self
            .emissions
            .get(word)
            .and_then(|entry| entry.iter().find(|&&(id, _)| id == tag_id))
            .map_or(0, |&(_, count)| count);
        if count == 0 {
            return 0.0;
        }
        let total = self.tag_totals[tag_id];
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64
    }

    pub(crate) fn transition_by_id(&self, t1: usize, t2: usize, t3: usize) -> f64 {
        let tri = self.trigrams.get(&[t1, t2, t3]).copied().unwrap_or(0);
        if tri == 0 {
            return 0.0;
        }
        let bi = self.bigrams.get(&[t1, t2]).copied().unwrap_or(0);
        if bi == 0 {
            return 0.0;
        }
        tri as f64 / bi as f64
    }

    pub(crate) fn states(&self) -> &[usize] {
        &self.states
    }

    pub(crate) fn start_id(&self) -> usize {
        self.start_id
    }

    pub(crate) fn stop_id(&self) -> usize {
        self.stop_id
    }

    pub(crate) fn tag_str(&self, id: usize) -> &str {
        &self.symbols.keys()[id]
    }
}
