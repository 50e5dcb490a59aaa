mod failure_report;
mod summary;

pub use self::{failure_report::*, summary::*};
