//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = TerzettoError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum TerzettoError {
    InvalidModel(InvalidModelError),
    InvalidFormat(InvalidFormatError),
    InvalidArgument(InvalidArgumentError),
    Alignment(AlignmentError),
    IOError(std::io::Error),
}

impl TerzettoError {
    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_format<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn alignment<S, T>(expected: S, found: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self::Alignment(AlignmentError {
            expected: expected.into(),
            found: found.into(),
        })
    }
}

impl fmt::Display for TerzettoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidModel(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::Alignment(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for TerzettoError {}

/// Error used when the counts file is invalid.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

/// Error used when corpus or vocabulary text is malformed.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}", self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when gold and predicted streams disagree.
#[derive(Debug)]
pub struct AlignmentError {
    /// The value on the gold side.
    pub(crate) expected: String,

    /// The value on the predicted side.
    pub(crate) found: String,
}

impl fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "AlignmentError: expected '{}', found '{}'",
            self.expected, self.found
        )
    }
}

impl Error for AlignmentError {}

impl From<std::io::Error> for TerzettoError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
