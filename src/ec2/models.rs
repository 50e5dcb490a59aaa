mod serde;
mod snapshot;
mod snapshot_filter;
mod snapshot_id;
mod snapshot_page;
mod snapshot_state;
mod tag;
mod volume_id;

pub use self::{
    snapshot::*, snapshot_filter::*, snapshot_id::*, snapshot_page::*, snapshot_state::*, tag::*,
    volume_id::*,
};
