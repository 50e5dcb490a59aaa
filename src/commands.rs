mod backup;
mod backup_and_prune;
mod prune;

pub use self::{backup::*, backup_and_prune::*, prune::*};
