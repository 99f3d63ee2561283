use crate::errors::{Result, TerzettoError};

/// An ordered sequence of tokens with per-token optional tags.
///
/// Sentences are never empty, and tokens and tags never contain whitespace
/// since they serve as field values in the corpus and counts formats.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub(crate) words: Vec<String>,
    pub(crate) tags: Vec<Option<String>>,
}

impl Sentence {
    /// Creates a new [`Sentence`] from tokens and per-token tags.
    ///
    /// # Arguments
    ///
    /// * `words` - Tokens of the sentence.
    /// * `tags` - Tags aligned with `words`; `None` marks an untagged token.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidArgument`] will be returned when `words` is
    /// empty, when the lengths differ, or when a token or tag is empty or
    /// contains whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use terzetto::Sentence;
    ///
    /// let s = Sentence::new(
    ///     vec!["dog".to_string(), "barks".to_string()],
    ///     vec![Some("NOUN".to_string()), Some("VERB".to_string())],
    /// ).unwrap();
    ///
    /// assert_eq!(2, s.len());
    /// ```
    pub fn new(words: Vec<String>, tags: Vec<Option<String>>) -> Result<Self> {
        if words.is_empty() {
            return Err(TerzettoError::invalid_argument(
                "words",
                "must not be empty",
            ));
        }
        if words.len() != tags.len() {
            return Err(TerzettoError::invalid_argument(
                "tags",
                "must have the same length as words",
            ));
        }
        for word in &words {
            validate_value("words", word)?;
        }
        for tag in tags.iter().flatten() {
            validate_value("tags", tag)?;
        }
        Ok(Self { words, tags })
    }

    /// Creates a new [`Sentence`] from tokens, leaving every token untagged.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidArgument`] will be returned when `words` is
    /// empty or when a token is empty or contains whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use terzetto::Sentence;
    ///
    /// let s = Sentence::from_words(vec!["dog".to_string()]).unwrap();
    ///
    /// assert_eq!(&[None], s.tags());
    /// ```
    pub fn from_words(words: Vec<String>) -> Result<Self> {
        let tags = vec![None; words.len()];
        Self::new(words, tags)
    }

    /// Returns the tokens of the sentence.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the tags of the sentence, aligned with [`Self::words()`].
    pub fn tags(&self) -> &[Option<String>] {
        &self.tags
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Renders the sentence as `token<TAB>tag` lines.
    ///
    /// # Errors
    ///
    /// [`TerzettoError::InvalidArgument`] will be returned when the sentence
    /// contains an untagged token.
    ///
    /// # Examples
    ///
    /// ```
    /// use terzetto::Sentence;
    ///
    /// let s = Sentence::new(
    ///     vec!["dog".to_string(), "barks".to_string()],
    ///     vec![Some("NOUN".to_string()), Some("VERB".to_string())],
    /// ).unwrap();
    ///
    /// assert_eq!("dog\tNOUN\nbarks\tVERB", s.to_labeled_string().unwrap());
    /// ```
    pub fn to_labeled_string(&self) -> Result<String> {
        let mut result = String::new();
        for (word, tag) in self.words.iter().zip(&self.tags) {
            let tag = tag.as_deref().ok_or_else(|| {
                TerzettoError::invalid_argument(
                    "self",
                    format!("sentence contains an untagged token: {word}"),
                )
            })?;
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(word);
            result.push('\t');
            result.push_str(tag);
        }
        Ok(result)
    }
}

fn validate_value(arg: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TerzettoError::invalid_argument(
            arg,
            "must not contain empty values",
        ));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(TerzettoError::invalid_argument(
            arg,
            format!("must not contain whitespace: {value}"),
        ));
    }
    Ok(())
}
