use thiserror::Error;

use crate::dashboard::entries::ContainerKind;

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    /// A reorder was asked to move an entry out of a different kind of container
    #[error("Reordering expects an origin of kind '{expected}'. Got '{actual}' instead")]
    InvalidOrigin {
        expected: ContainerKind,
        actual: ContainerKind,
    },

    /// Lookup of an entry that is not in the collection
    #[error("Trying to retrieve invalid dashboard entry \"{0}\"")]
    UnknownEntry(String),
}
