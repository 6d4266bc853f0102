//! Workspace service: the write path for the initial setup

mod client;
mod model;
mod traits;

pub use client::FileWorkspaceClient;
pub use model::{Workspace, WorkspaceError};
pub use traits::WorkspaceService;

#[cfg(test)]
pub use traits::MockWorkspaceService;
