mod backup_date;
mod commands;
mod config;
mod ec2;
mod environment;
mod job;
mod retention;
mod utils;


mod prelude {
    pub use crate::{
        backup_date::*, commands::*, config::*, ec2::*, environment::*, job::*, retention::*,
        utils::*,
    };
    pub use anyhow::{bail, Context, Result};
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use colored::Colorize;
    pub use itertools::Itertools;
    pub use std::io::Write;

    #[cfg(test)]
    pub use pretty_assertions as pa;
}

use self::prelude::*;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::stdout;
use std::ops::DerefMut;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

const AFTER_HELP: &str = "\
Example:
  ebs-snapper vol-e331af9a 14 \"Exchange Store Backup\"

This would back up volume vol-e331af9a, name the snapshot `Exchange Store
Backup` and delete all of the volume's snapshots created by ebs-snapper that
are older than 14 days.";

/// EBS snapshots, automated
#[derive(Debug, Parser)]
#[command(version, after_help = AFTER_HELP)]
pub struct Args {
    /// Volume to back up
    volume_id: String,

    /// Snapshots of this volume dated more than this many days ago get
    /// deleted; anything that's not a number counts as zero
    #[arg(allow_negative_numbers = true)]
    days_to_hold: String,

    /// Description and `Name` tag of the new snapshot
    snapshot_name: String,

    /// Region to operate in; by default it's resolved by the `aws` executable
    #[arg(long)]
    region: Option<String>,

    /// Named profile to take credentials from
    #[arg(long)]
    profile: Option<String>,

    /// Overrides the EC2 endpoint
    #[arg(long)]
    endpoint_url: Option<String>,

    /// By default, ebs-snapper tries to locate the `aws` executable inside
    /// your PATH variable - when this fails for you, using this parameter you
    /// can provide location of the `aws` executable by hand
    #[arg(long)]
    aws_path: Option<PathBuf>,

    /// How long to wait before checking the new snapshot's status again; the
    /// delay doubles after each check
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    poll_interval: Duration,

    /// Upper bound for the delay between status checks
    #[arg(long, default_value = "1m", value_parser = humantime::parse_duration)]
    max_poll_interval: Duration,

    /// How long to wait for the new snapshot to complete before giving up
    #[arg(long, default_value = "2h", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// How many snapshots to fetch per request when looking for expired ones
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (job, config) = match init(&args) {
        Ok(init) => init,
        Err(err) => Args::command().error(ErrorKind::ValueValidation, err).exit(),
    };

    let stdout = &mut stdout();

    match run(stdout, &job, &config) {
        Ok(()) => ExitCode::SUCCESS,

        Err(err) => {
            _ = writeln!(stdout);
            _ = write!(stdout, "{}", FailureReport::new(&err));

            ExitCode::FAILURE
        }
    }
}

fn init(args: &Args) -> Result<(Job, Config)> {
    let job = Job::new(&args.volume_id, &args.days_to_hold, &args.snapshot_name)?;

    let wait = WaitPolicy::new(args.poll_interval, args.max_poll_interval, args.timeout)?;

    let aws = AwsConfig {
        path: args.aws_path.clone(),
        region: args.region.clone(),
        profile: args.profile.clone(),
        endpoint_url: args.endpoint_url.clone(),
        page_size: args.page_size,
    };

    Ok((job, Config { aws, wait }))
}

fn run(stdout: &mut dyn Write, job: &Job, config: &Config) -> Result<()> {
    let mut ec2 = init_ec2(config)?;
    let mut env = Environment::new(stdout, config, ec2.deref_mut());

    BackupAndPrune::new(&mut env, job).run()
}

fn init_ec2(config: &Config) -> Result<Box<dyn Ec2Client>> {
    let ec2 = if let Some(aws) = &config.aws.path {
        Ec2ProcessClient::new(aws, config.aws.clone())
    } else {
        Ec2ProcessClient::find(config.aws.clone())
    };

    let ec2 = ec2.context("Couldn't initialize EC2 client")?;

    Ok(Box::new(ec2))
}
