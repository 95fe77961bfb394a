use std::{fmt, io};

#[derive(Debug)]
pub enum CliError {
    InvalidArgument(String),
    Imaginarium(imaginarium::Error),
    Io(io::Error),
    LoadErrors(usize),
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<imaginarium::Error> for CliError {
    fn from(e: imaginarium::Error) -> Self {
        Self::Imaginarium(e)
    }
}

impl From<imaginarium::ParserError> for CliError {
    fn from(e: imaginarium::ParserError) -> Self {
        Self::Imaginarium(e.into())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::InvalidArgument(a) => write!(f, "invalid argument: {}", a),
            CliError::Imaginarium(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "io error: {}", e),
            CliError::LoadErrors(n) => write!(f, "{} statements failed to load", n),
        }
    }
}
