//! Small filesystem helpers shared by module discovery and locale listing.
pub mod fs;

pub use fs::{find_subdirectories, subdirectory_names};
