mod aws;
mod wait_policy;

pub use self::{aws::*, wait_policy::*};

/// Everything the workflow needs to know besides what to back up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub aws: AwsConfig,
    pub wait: WaitPolicy,
}
