use std::path::PathBuf;

/// How to reach EC2; anything left empty is resolved by the `aws` executable
/// itself (environment variables, `~/.aws/config` and so on).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AwsConfig {
    pub path: Option<PathBuf>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub page_size: u64,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            path: None,
            region: None,
            profile: None,
            endpoint_url: None,
            page_size: 1000,
        }
    }
}
