use std::io::BufRead;

use crate::errors::{Result, TerzettoError};
use crate::sentence::Sentence;

/// Iterator over blank-line-separated sentences in a corpus stream.
///
/// Each non-blank line holds one token, optionally followed by a TAB and a
/// tag; tokens and tags must not contain whitespace, and malformed lines are
/// reported with their line number. Blank lines close the current sentence;
/// consecutive blank lines are collapsed, so the reader never yields an empty
/// sentence. A final sentence without a trailing blank line is yielded at end
/// of input.
///
/// # Examples
///
/// ```
/// use terzetto::SentenceReader;
///
/// let text = "dog\tNOUN\nbarks\tVERB\n\ncat\tNOUN\n";
/// let mut reader = SentenceReader::labeled(text.as_bytes());
///
/// assert_eq!(2, reader.next().unwrap().unwrap().len());
/// assert_eq!(1, reader.next().unwrap().unwrap().len());
/// assert!(reader.next().is_none());
/// ```
pub struct SentenceReader<R> {
    rdr: R,
    has_tags: bool,
    line_no: usize,
}

impl<R> SentenceReader<R>
where
    R: BufRead,
{
    /// Creates a reader for a labeled corpus; every line must hold exactly
    /// `token<TAB>tag`.
    pub fn labeled(rdr: R) -> Self {
        Self {
            rdr,
            has_tags: true,
            line_no: 0,
        }
    }

    /// Creates a reader for a raw corpus; only the first TAB field of each
    /// line is taken and tags are left unset.
    pub fn raw(rdr: R) -> Self {
        Self {
            rdr,
            has_tags: false,
            line_no: 0,
        }
    }
}

impl<R> Iterator for SentenceReader<R>
where
    R: BufRead,
{
    type Item = Result<Sentence>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut words = vec![];
        let mut tags = vec![];
        let mut line = String::new();
        loop {
            line.clear();
            match self.rdr.read_line(&mut line) {
                Ok(0) => {
                    if words.is_empty() {
                        return None;
                    }
                    return Some(Sentence::new(words, tags));
                }
                Ok(_) => (),
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            let content = line.trim();
            if content.is_empty() {
                if words.is_empty() {
                    continue;
                }
                return Some(Sentence::new(words, tags));
            }
            if self.has_tags {
                let (word, tag) = match content.split_once('\t') {
                    Some((word, tag)) if !tag.contains('\t') => (word, tag),
                    Some(_) => {
                        return Some(Err(TerzettoError::invalid_format(format!(
                            "line {}: too many fields: {content}",
                            self.line_no
                        ))))
                    }
                    None => {
                        return Some(Err(TerzettoError::invalid_format(format!(
                            "line {}: expected <token><TAB><tag>, found: {content}",
                            self.line_no
                        ))))
                    }
                };
                if word.chars().any(char::is_whitespace) {
                    return Some(Err(TerzettoError::invalid_format(format!(
                        "line {}: token contains whitespace: {word}",
                        self.line_no
                    ))));
                }
                if tag.chars().any(char::is_whitespace) {
                    return Some(Err(TerzettoError::invalid_format(format!(
                        "line {}: tag contains whitespace: {tag}",
                        self.line_no
                    ))));
                }
                words.push(word.to_string());
                tags.push(Some(tag.to_string()));
            } else {
                let word = content.split_once('\t').map_or(content, |(word, _)| word);
                if word.chars().any(char::is_whitespace) {
                    return Some(Err(TerzettoError::invalid_format(format!(
                        "line {}: token contains whitespace: {word}",
                        self.line_no
                    ))));
                }
                words.push(word.to_string());
                tags.push(None);
            }
        }
    }
}
