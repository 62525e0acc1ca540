//! # Dashboard
//!
//! Priority-ordered collections of dashboard widgets.
//!
//! - **[`entries`]**: [`DashboardEntries`] and the [`Sortable`] reordering protocol.
//! - **[`widget`]**: [`Dashboard`] holds homes, a [`DashboardHome`] holds panes and
//!   a [`Pane`] holds dashlets.
//! - **[`model`]**: [`SystemDashlet`] records.
pub mod entries;
pub mod error;
pub mod model;
pub mod widget;

pub use entries::{ContainerKind, DashboardEntries, DashboardEntry, Origin, Sortable};
pub use error::DashboardError;
pub use model::{Model, SystemDashlet};
pub use widget::{Dashboard, DashboardHome, Dashlet, Pane};

#[cfg(test)]
mod tests;
