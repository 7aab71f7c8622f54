use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Shape related errors
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    UninitializedNetwork(String),
    InvalidLayerConfiguration(String),

    // Training related errors
    EmptyDataset,

    // File operations
    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>),
    CsvError(csv::Error),
    PlotError(String),
}

impl NNError {
    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(NNError::DimensionMismatch { what, expected, actual });
        }
        Ok(())
    }
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::DimensionMismatch { what, expected, actual } => write!(
                f,
                "Dimension mismatch: {} has length {}, expected {}",
                what, actual, expected
            ),
            NNError::UninitializedNetwork(msg) => write!(f, "Uninitialized network: {}", msg),
            NNError::InvalidLayerConfiguration(msg) => write!(f, "Invalid layer configuration: {}", msg),
            NNError::EmptyDataset => write!(f, "Dataset has no samples"),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::SerializationError(err) => write!(f, "Serialization error: {}", err),
            NNError::CsvError(err) => write!(f, "CSV error: {}", err),
            NNError::PlotError(msg) => write!(f, "Plot error: {}", msg),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NNError {
    fn from(err: Box<bincode::ErrorKind>) -> NNError {
        NNError::SerializationError(err)
    }
}

impl From<csv::Error> for NNError {
    fn from(err: csv::Error) -> NNError {
        NNError::CsvError(err)
    }
}

impl Error for NNError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NNError::IoError(err) => Some(err),
            NNError::SerializationError(err) => Some(err.as_ref()),
            NNError::CsvError(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NNError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_len_accepts_equal_lengths() {
        assert!(NNError::check_len("input", 3, 3).is_ok());
    }

    #[test]
    fn check_len_reports_both_lengths() {
        let err = NNError::check_len("input", 2, 5).unwrap_err();
        assert!(matches!(
            err,
            NNError::DimensionMismatch { what: "input", expected: 2, actual: 5 }
        ));
        assert_eq!(err.to_string(), "Dimension mismatch: input has length 5, expected 2");
    }
}
