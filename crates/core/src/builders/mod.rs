//! Per-request collaborators that aggregate errors, tallies and info
//! messages and write them onto transactions.

mod errors;
mod info;
mod notices;

pub use errors::ErrorBuilder;
pub use info::InfoBuilder;
pub use notices::{NoticeBuilder, Tally};
