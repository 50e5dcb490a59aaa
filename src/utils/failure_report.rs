use crate::ec2::{Ec2Error, Ec2ErrorKind, Ec2ServiceError};
use anyhow::Error;
use colored::Colorize;
use itertools::Itertools;
use std::fmt;

/// Explains to the user why the run failed.
///
/// Errors coming from EC2 itself get a structured description; everything
/// else is printed along with its chain of causes.
pub struct FailureReport<'a> {
    err: &'a Error,
}

impl<'a> FailureReport<'a> {
    pub fn new(err: &'a Error) -> Self {
        Self { err }
    }

    fn service_error(&self) -> Option<&'a Ec2ServiceError> {
        self.err.chain().find_map(|err| match err.downcast_ref::<Ec2Error>() {
            Some(Ec2Error::Service(err)) => Some(err),
            _ => None,
        })
    }
}

impl fmt::Display for FailureReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(service_err) = self.service_error() else {
            return writeln!(f, "{} {:?}", "error:".red(), self.err);
        };

        // Service errors describe themselves below, so only the steps that led
        // to them are printed here
        let steps = self
            .err
            .chain()
            .take_while(|err| !err.is::<Ec2Error>())
            .map(|err| err.to_string())
            .join(": ");

        writeln!(f, "{} {}", "error:".red(), steps)?;
        writeln!(f)?;

        if service_err.kind() == Ec2ErrorKind::Authentication {
            return writeln!(f, "  Authentication error, verify your access keys.");
        }

        let status_code = service_err
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "n/a".into());

        let request_id = service_err.request_id.as_deref().unwrap_or("n/a");

        writeln!(f, "  message: {}", service_err.message)?;
        writeln!(f, "  status code: {}", status_code)?;
        writeln!(f, "  error code: {}", service_err.code)?;
        writeln!(f, "  error type: {}", service_err.kind())?;
        writeln!(f, "  request id: {}", request_id)?;

        Ok(())
    }
}
