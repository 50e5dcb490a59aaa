use crate::ec2::{Ec2SnapshotId, Ec2VolumeId};
use std::{fmt, result};
use thiserror::Error;

pub type Ec2Result<T> = result::Result<T, Ec2Error>;

#[derive(Debug, Error)]
pub enum Ec2Error {
    #[error(transparent)]
    Service(#[from] Ec2ServiceError),

    #[error("No such snapshot: {0}")]
    NoSuchSnapshot(Ec2SnapshotId),

    #[error("No such volume: {0}")]
    NoSuchVolume(Ec2VolumeId),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Ec2Error {
    pub fn kind(&self) -> Ec2ErrorKind {
        match self {
            Self::Service(err) => err.kind(),
            Self::NoSuchSnapshot(_) | Self::NoSuchVolume(_) => Ec2ErrorKind::NotFound,
            Self::Other(_) => Ec2ErrorKind::Other,
        }
    }
}

#[cfg(test)]
impl PartialEq<Ec2Error> for Ec2Error {
    fn eq(&self, other: &Ec2Error) -> bool {
        self.to_string() == other.to_string()
    }
}

/// An error reported by EC2 itself (as opposed to e.g. a failure to launch
/// the `aws` executable).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{operation} failed with `{code}`: {message}")]
pub struct Ec2ServiceError {
    pub operation: String,
    pub code: String,
    pub message: String,
    pub status_code: Option<u16>,
    pub request_id: Option<String>,
}

impl Ec2ServiceError {
    pub fn new(operation: impl AsRef<str>, code: impl AsRef<str>, message: impl AsRef<str>) -> Self {
        Self {
            operation: operation.as_ref().into(),
            code: code.as_ref().into(),
            message: message.as_ref().into(),
            status_code: None,
            request_id: None,
        }
    }

    pub fn kind(&self) -> Ec2ErrorKind {
        Ec2ErrorKind::from_code(&self.code)
    }

    /// Extracts the error out of aws-cli's stderr, which looks like:
    ///
    /// ```text
    /// An error occurred (AuthFailure) when calling the CreateSnapshot operation: AWS was not able to validate the provided access credentials
    /// ```
    ///
    /// (when retries got exhausted, the operation's name is followed by
    /// `(reached max retries: 4)`.)
    pub fn parse(stderr: &str) -> Option<Self> {
        let line = stderr
            .lines()
            .find(|line| line.contains("An error occurred ("))?;

        let (_, rest) = line.split_once("An error occurred (")?;
        let (code, rest) = rest.split_once(')')?;

        let (operation, tail) = match rest.split_once("when calling the ") {
            Some((_, rest)) => rest.split_once(" operation").unwrap_or((rest, "")),
            None => ("unknown", rest),
        };

        let tail = match tail.trim_start().strip_prefix('(') {
            Some(tail) => tail.split_once(')').map_or(tail, |(_, tail)| tail),
            None => tail,
        };

        let message = tail.trim_start().strip_prefix(':').unwrap_or(tail).trim();

        Some(Self::new(operation, code, message))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ec2ErrorKind {
    /// Throttling and server-side hiccups; trying again later might help.
    Transient,
    Authentication,
    NotFound,
    Other,
}

impl Ec2ErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "AuthFailure"
            | "UnauthorizedOperation"
            | "InvalidClientTokenId"
            | "ExpiredToken"
            | "RequestExpired"
            | "SignatureDoesNotMatch"
            | "MissingAuthenticationToken"
            | "OptInRequired"
            | "Blocked"
            | "NoCredentials" => Self::Authentication,

            "RequestLimitExceeded"
            | "Throttling"
            | "ThrottlingException"
            | "SnapshotCreationPerVolumeRateExceeded"
            | "InternalError"
            | "InternalFailure"
            | "ServiceUnavailable"
            | "Unavailable"
            | "RequestTimeout"
            | "RequestTimeoutException" => Self::Transient,

            code if code.ends_with(".NotFound") => Self::NotFound,

            _ => Self::Other,
        }
    }
}

impl fmt::Display for Ec2ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            Self::Transient => "transient",
            Self::Authentication => "authentication",
            Self::NotFound => "not-found",
            Self::Other => "other",
        };

        write!(f, "{}", kind)
    }
}
