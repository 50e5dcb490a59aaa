use crate::config::AwsConfig;
use crate::ec2::*;
use anyhow::{anyhow, Context};
use pathsearch::find_executable_in_path;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Talks to EC2 through the `aws` executable, leaving credentials and
/// endpoint resolution up to it.
pub struct Ec2ProcessClient {
    aws: PathBuf,
    config: AwsConfig,
}

impl Ec2ProcessClient {
    pub fn new(aws: impl AsRef<Path>, config: AwsConfig) -> Ec2Result<Self> {
        let aws = aws.as_ref();

        if !aws.exists() {
            return Err(Ec2Error::Other(anyhow!(
                "Couldn't find the `aws` executable: {}",
                aws.display()
            )));
        }

        Ok(Self {
            aws: aws.into(),
            config,
        })
    }

    pub fn find(config: AwsConfig) -> Ec2Result<Self> {
        let aws = find_executable_in_path("aws")
            .ok_or_else(|| anyhow!("Couldn't find the `aws` executable in your `PATH` - please try specifying exact location with `--aws-path`"))?;

        Self::new(aws, config)
    }

    fn execute(
        &mut self,
        operation: &str,
        callback: impl FnOnce(&mut Command),
    ) -> Ec2Result<String> {
        let mut command = Command::new(&self.aws);

        command.arg("ec2");
        callback(&mut command);
        command.arg("--output").arg("json");

        if let Some(region) = &self.config.region {
            command.arg("--region").arg(region);
        }

        if let Some(profile) = &self.config.profile {
            command.arg("--profile").arg(profile);
        }

        if let Some(endpoint_url) = &self.config.endpoint_url {
            command.arg("--endpoint-url").arg(endpoint_url);
        }

        let output = command
            .output()
            .context("Couldn't launch the `aws` executable")?;

        if output.status.success() {
            let stdout = String::from_utf8(output.stdout).context("Couldn't read aws' stdout")?;

            Ok(stdout)
        } else {
            let stderr = String::from_utf8(output.stderr)
                .context("Couldn't read aws' stderr")?
                .trim()
                .to_string();

            Err(Self::error(operation, stderr))
        }
    }

    fn error(operation: &str, stderr: String) -> Ec2Error {
        if let Some(err) = Ec2ServiceError::parse(&stderr) {
            return Ec2Error::Service(err);
        }

        if stderr.contains("Unable to locate credentials") {
            return Ec2Error::Service(Ec2ServiceError::new(operation, "NoCredentials", stderr));
        }

        Ec2Error::Other(anyhow!(
            "aws returned a non-zero status code and said: {}",
            stderr,
        ))
    }

    fn parse<T>(out: String) -> Ec2Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&out)
            .context("Couldn't parse aws' stdout")
            .map_err(Ec2Error::Other)
    }
}

impl Ec2Client for Ec2ProcessClient {
    fn create_snapshot(
        &mut self,
        volume: &Ec2VolumeId,
        description: &str,
    ) -> Ec2Result<Ec2Snapshot> {
        let out = self.execute("CreateSnapshot", |command| {
            command
                .arg("create-snapshot")
                .arg("--volume-id")
                .arg(volume.as_str())
                .arg("--description")
                .arg(description);
        })?;

        Self::parse(out)
    }

    fn create_tags(&mut self, snapshot: &Ec2SnapshotId, tags: &[Ec2Tag]) -> Ec2Result<()> {
        // Passed as JSON, since the shorthand syntax chokes on commas
        let tags = serde_json::to_string(tags).context("Couldn't serialize tags")?;

        self.execute("CreateTags", |command| {
            command
                .arg("create-tags")
                .arg("--resources")
                .arg(snapshot.as_str())
                .arg("--tags")
                .arg(tags);
        })?;

        Ok(())
    }

    fn describe_snapshots(
        &mut self,
        filter: &Ec2SnapshotFilter,
        next_token: Option<&str>,
    ) -> Ec2Result<Ec2SnapshotPage> {
        let page_size = self.config.page_size;

        let out = self.execute("DescribeSnapshots", |command| {
            command
                .arg("describe-snapshots")
                .arg("--owner-ids")
                .arg("self");

            match filter {
                Ec2SnapshotFilter::Ids(ids) => {
                    command
                        .arg("--snapshot-ids")
                        .args(ids.iter().map(|id| id.as_str()));
                }

                Ec2SnapshotFilter::TagKey(key) => {
                    let filters = json!([{ "Name": format!("tag:{}", key), "Values": ["*"] }]);

                    command.arg("--filters").arg(filters.to_string());
                }
            }

            command.arg("--max-items").arg(page_size.to_string());

            if let Some(next_token) = next_token {
                command.arg("--starting-token").arg(next_token);
            }
        })?;

        Self::parse(out)
    }

    fn delete_snapshot(&mut self, snapshot: &Ec2SnapshotId) -> Ec2Result<()> {
        self.execute("DeleteSnapshot", |command| {
            command
                .arg("delete-snapshot")
                .arg("--snapshot-id")
                .arg(snapshot.as_str());
        })?;

        Ok(())
    }
}
