use crate::ec2::*;
use std::collections::BTreeMap;
use std::fmt;

/// In-memory EC2, used by tests.
#[derive(Debug)]
pub struct Ec2FakeClient {
    volumes: Vec<Ec2VolumeId>,
    snapshots: BTreeMap<Ec2SnapshotId, Ec2FakeSnapshotState>,
    next_id: usize,
    polls_until_completed: usize,
    page_size: usize,
    errors: Vec<(Ec2FakeError<'static>, Ec2ServiceError)>,
    calls: Vec<String>,
}

#[derive(Debug)]
struct Ec2FakeSnapshotState {
    snapshot: Ec2Snapshot,
    remaining_polls: usize,
}

impl Ec2FakeClient {
    pub fn add_volume(&mut self, volume: &str) {
        self.volumes.push(Ec2VolumeId::new(volume));
    }

    pub fn add(&mut self, snapshot: Ec2Snapshot) {
        if !self.volumes.contains(&snapshot.volume_id) {
            self.volumes.push(snapshot.volume_id.clone());
        }

        self.snapshots.insert(
            snapshot.snapshot_id.clone(),
            Ec2FakeSnapshotState {
                snapshot,
                remaining_polls: 0,
            },
        );
    }

    /// Makes newly created snapshots report `pending` for given number of
    /// `describe_snapshots()` calls before becoming `completed`.
    pub fn set_polls_until_completed(&mut self, polls: usize) {
        self.polls_until_completed = polls;
    }

    /// Overrides state of an existing snapshot.
    pub fn set_state(&mut self, snapshot: &str, state: Ec2SnapshotState) {
        if let Some(entry) = self.snapshots.get_mut(&Ec2SnapshotId::new(snapshot)) {
            entry.snapshot.state = state;
            entry.remaining_polls = 0;
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }

    pub fn inject_error(&mut self, on: Ec2FakeError<'static>, error: Ec2ServiceError) {
        self.errors.push((on, error));
    }

    /// Returns names of the operations invoked so far, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    fn injected_error(&mut self, on: Ec2FakeError<'_>) -> Ec2Result<()> {
        let idx = self.errors.iter().position(|(error_on, _)| error_on == &on);

        match idx {
            // Each injected error fires once, so that retries can be tested
            Some(idx) => Err(Ec2Error::Service(self.errors.remove(idx).1)),
            None => Ok(()),
        }
    }

    fn get_mut(&mut self, snapshot: &Ec2SnapshotId) -> Ec2Result<&mut Ec2FakeSnapshotState> {
        self.snapshots
            .get_mut(snapshot)
            .ok_or_else(|| Ec2Error::NoSuchSnapshot(snapshot.to_owned()))
    }
}

impl Default for Ec2FakeClient {
    fn default() -> Self {
        Self {
            volumes: Default::default(),
            snapshots: Default::default(),
            next_id: 1,
            polls_until_completed: 0,
            page_size: 1000,
            errors: Default::default(),
            calls: Default::default(),
        }
    }
}

impl Ec2Client for Ec2FakeClient {
    fn create_snapshot(
        &mut self,
        volume: &Ec2VolumeId,
        description: &str,
    ) -> Ec2Result<Ec2Snapshot> {
        self.calls.push(format!("CreateSnapshot({})", volume));

        self.injected_error(Ec2FakeError::OnCreateSnapshot {
            volume: volume.as_str(),
        })?;

        if !self.volumes.contains(volume) {
            return Err(Ec2Error::NoSuchVolume(volume.to_owned()));
        }

        let snapshot = Ec2Snapshot {
            snapshot_id: Ec2SnapshotId::new(format!("snap-{:04}", self.next_id)),
            volume_id: volume.to_owned(),
            state: Ec2SnapshotState::Pending,
            description: description.into(),
            tags: Default::default(),
        };

        self.next_id += 1;

        self.snapshots.insert(
            snapshot.snapshot_id.clone(),
            Ec2FakeSnapshotState {
                snapshot: snapshot.clone(),
                remaining_polls: self.polls_until_completed,
            },
        );

        Ok(snapshot)
    }

    fn create_tags(&mut self, snapshot: &Ec2SnapshotId, tags: &[Ec2Tag]) -> Ec2Result<()> {
        self.calls.push(format!("CreateTags({})", snapshot));

        self.injected_error(Ec2FakeError::OnCreateTags {
            snapshot: snapshot.as_str(),
        })?;

        let entry = self.get_mut(snapshot)?;

        for tag in tags {
            entry.snapshot.tags.retain(|existing| existing.key != tag.key);
            entry.snapshot.tags.push(tag.to_owned());
        }

        Ok(())
    }

    fn describe_snapshots(
        &mut self,
        filter: &Ec2SnapshotFilter,
        next_token: Option<&str>,
    ) -> Ec2Result<Ec2SnapshotPage> {
        self.calls.push("DescribeSnapshots".into());

        self.injected_error(Ec2FakeError::OnDescribeSnapshots)?;

        let matching: Vec<_> = match filter {
            Ec2SnapshotFilter::Ids(ids) => {
                if let Some(id) = ids.iter().find(|id| !self.snapshots.contains_key(*id)) {
                    return Err(Ec2Error::NoSuchSnapshot(id.to_owned()));
                }

                ids.iter().cloned().collect()
            }

            Ec2SnapshotFilter::TagKey(key) => self
                .snapshots
                .values()
                .filter(|entry| entry.snapshot.tags.iter().any(|tag| &tag.key == key))
                .map(|entry| entry.snapshot.snapshot_id.clone())
                .collect(),
        };

        let offset: usize = match next_token {
            Some(token) => token.parse().map_err(|_| {
                Ec2ServiceError::new(
                    "DescribeSnapshots",
                    "InvalidParameterValue",
                    "Invalid next token",
                )
            })?,
            None => 0,
        };

        let mut snapshots = Vec::new();

        for id in matching.iter().skip(offset).take(self.page_size) {
            let entry = self.get_mut(id)?;

            // Each look at a pending snapshot brings it closer to completion
            if entry.snapshot.state == Ec2SnapshotState::Pending {
                if entry.remaining_polls == 0 {
                    entry.snapshot.state = Ec2SnapshotState::Completed;
                } else {
                    entry.remaining_polls -= 1;
                }
            }

            snapshots.push(entry.snapshot.clone());
        }

        let next_token = if offset + self.page_size < matching.len() {
            Some((offset + self.page_size).to_string())
        } else {
            None
        };

        Ok(Ec2SnapshotPage {
            snapshots,
            next_token,
        })
    }

    fn delete_snapshot(&mut self, snapshot: &Ec2SnapshotId) -> Ec2Result<()> {
        self.calls.push(format!("DeleteSnapshot({})", snapshot));

        self.injected_error(Ec2FakeError::OnDeleteSnapshot {
            snapshot: snapshot.as_str(),
        })?;

        self.snapshots
            .remove(snapshot)
            .ok_or_else(|| Ec2Error::NoSuchSnapshot(snapshot.to_owned()))?;

        Ok(())
    }
}

impl fmt::Display for Ec2FakeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.snapshots.values().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }

            let snapshot = &entry.snapshot;

            writeln!(
                f,
                "{} on {} ({})",
                snapshot.snapshot_id, snapshot.volume_id, snapshot.state
            )?;

            for tag in &snapshot.tags {
                writeln!(f, "-> {}", tag)?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ec2FakeError<'a> {
    OnCreateSnapshot { volume: &'a str },
    OnCreateTags { snapshot: &'a str },
    OnDescribeSnapshots,
    OnDeleteSnapshot { snapshot: &'a str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec2::utils::*;
    use pretty_assertions as pa;

    fn client() -> Ec2FakeClient {
        let mut client = Ec2FakeClient::default();

        client.add(snapshot("snap-a", "vol-1", Some("2012-08-01")));
        client.add(snapshot("snap-b", "vol-1", None));
        client.add(snapshot("snap-c", "vol-2", Some("2012-08-02")));

        client
    }

    mod create_snapshot {
        use super::*;

        #[test]
        fn ok() {
            let mut client = client();

            let actual = client.create_snapshot(&volume_id("vol-2"), "Daily").unwrap();

            assert_eq!("snap-0001", actual.snapshot_id.as_str());
            assert_eq!(Ec2SnapshotState::Pending, actual.state);

            let actual = client.create_snapshot(&volume_id("vol-2"), "Daily").unwrap();

            assert_eq!("snap-0002", actual.snapshot_id.as_str());
        }

        #[test]
        fn given_unknown_volume() {
            let actual = client()
                .create_snapshot(&volume_id("vol-unknown"), "Daily")
                .unwrap_err();

            pa::assert_eq!(Ec2Error::NoSuchVolume(volume_id("vol-unknown")), actual);
        }
    }

    mod create_tags {
        use super::*;

        #[test]
        fn replaces_existing_keys() {
            let mut client = client();

            client
                .create_tags(
                    &snapshot_id("snap-b"),
                    &[
                        Ec2Tag::new(Ec2Tag::NAME, "Weekly"),
                        Ec2Tag::new(Ec2Tag::BACKUP_DATE, "2012-08-24"),
                    ],
                )
                .unwrap();

            let page = client
                .describe_snapshots(&Ec2SnapshotFilter::Ids(vec![snapshot_id("snap-b")]), None)
                .unwrap();

            pa::assert_eq!(
                vec![
                    Ec2Tag::new(Ec2Tag::NAME, "Weekly"),
                    Ec2Tag::new(Ec2Tag::BACKUP_DATE, "2012-08-24"),
                ],
                page.snapshots[0].tags
            );
        }

        #[test]
        fn given_unknown_snapshot() {
            let actual = client()
                .create_tags(&snapshot_id("snap-x"), &[])
                .unwrap_err();

            pa::assert_eq!(Ec2Error::NoSuchSnapshot(snapshot_id("snap-x")), actual);
        }
    }

    mod describe_snapshots {
        use super::*;

        #[test]
        fn by_tag_key() {
            let actual = client()
                .describe_snapshots(&Ec2SnapshotFilter::TagKey(Ec2Tag::BACKUP_DATE.into()), None)
                .unwrap();

            let expected = Ec2SnapshotPage {
                snapshots: vec![
                    snapshot("snap-a", "vol-1", Some("2012-08-01")),
                    snapshot("snap-c", "vol-2", Some("2012-08-02")),
                ],
                next_token: None,
            };

            pa::assert_eq!(expected, actual);
        }

        #[test]
        fn by_unknown_id() {
            let actual = client()
                .describe_snapshots(&Ec2SnapshotFilter::Ids(vec![snapshot_id("snap-x")]), None)
                .unwrap_err();

            assert_eq!(Ec2ErrorKind::NotFound, actual.kind());
        }

        #[test]
        fn paginated() {
            let mut client = client();

            client.set_page_size(1);

            let filter = Ec2SnapshotFilter::TagKey(Ec2Tag::BACKUP_DATE.into());

            let page = client.describe_snapshots(&filter, None).unwrap();

            assert_eq!(1, page.snapshots.len());
            assert_eq!("snap-a", page.snapshots[0].snapshot_id.as_str());
            assert_eq!(Some("1"), page.next_token.as_deref());

            let page = client
                .describe_snapshots(&filter, page.next_token.as_deref())
                .unwrap();

            assert_eq!(1, page.snapshots.len());
            assert_eq!("snap-c", page.snapshots[0].snapshot_id.as_str());
            assert_eq!(None, page.next_token);
        }

        #[test]
        fn completes_pending_snapshots_after_configured_polls() {
            let mut client = client();

            client.set_polls_until_completed(2);

            let id = client
                .create_snapshot(&volume_id("vol-1"), "Daily")
                .unwrap()
                .snapshot_id;

            let filter = Ec2SnapshotFilter::Ids(vec![id]);

            let states: Vec<_> = (0..4)
                .map(|_| client.describe_snapshots(&filter, None).unwrap().snapshots[0].state)
                .collect();

            pa::assert_eq!(
                vec![
                    Ec2SnapshotState::Pending,
                    Ec2SnapshotState::Pending,
                    Ec2SnapshotState::Completed,
                    Ec2SnapshotState::Completed,
                ],
                states
            );
        }
    }

    mod delete_snapshot {
        use super::*;

        #[test]
        fn ok() {
            let mut client = client();

            client.delete_snapshot(&snapshot_id("snap-a")).unwrap();

            pa::assert_eq!(
                indoc::indoc!(
                    r#"
                    snap-b on vol-1 (completed)
                    -> Name=Daily

                    snap-c on vol-2 (completed)
                    -> Name=Daily
                    -> BackupDate=2012-08-02
                    "#
                ),
                client.to_string()
            );
        }

        #[test]
        fn given_unknown_snapshot() {
            let actual = client()
                .delete_snapshot(&snapshot_id("snap-x"))
                .unwrap_err();

            pa::assert_eq!(Ec2Error::NoSuchSnapshot(snapshot_id("snap-x")), actual);
        }

        #[test]
        fn given_injected_error() {
            let mut client = client();

            client.inject_error(
                Ec2FakeError::OnDeleteSnapshot { snapshot: "snap-a" },
                Ec2ServiceError::new("DeleteSnapshot", "AuthFailure", "Nope"),
            );

            let actual = client.delete_snapshot(&snapshot_id("snap-a")).unwrap_err();

            assert_eq!(Ec2ErrorKind::Authentication, actual.kind());

            // Injected errors fire only once
            client.delete_snapshot(&snapshot_id("snap-a")).unwrap();
        }
    }
}
