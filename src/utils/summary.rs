use colored::Colorize;
use std::fmt;

const TITLE: &str = "Summary";

#[derive(Default)]
pub struct Summary {
    created_snapshots: usize,
    deleted_snapshots: usize,
    kept_snapshots: usize,
    skipped_snapshots: usize,
    errors: usize,
}

impl Summary {
    pub fn add_created_snapshot(&mut self) {
        self.created_snapshots += 1;
    }

    pub fn add_deleted_snapshot(&mut self) {
        self.deleted_snapshots += 1;
    }

    pub fn add_kept_snapshot(&mut self) {
        self.kept_snapshots += 1;
    }

    pub fn add_skipped_snapshot(&mut self) {
        self.skipped_snapshots += 1;
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    #[cfg(test)]
    pub fn errors(&self) -> usize {
        self.errors
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", TITLE.bold())?;
        writeln!(f, "{}", "-".repeat(TITLE.len()))?;
        writeln!(f, "  created snapshots: {}", self.created_snapshots)?;
        writeln!(f, "  deleted snapshots: {}", self.deleted_snapshots)?;
        writeln!(f, "  kept snapshots: {}", self.kept_snapshots)?;

        if self.skipped_snapshots > 0 {
            writeln!(f, "  skipped snapshots: {}", self.skipped_snapshots)?;
        }

        if self.errors > 0 {
            writeln!(f, "  errors: {}", self.errors)?;
        }

        Ok(())
    }
}
