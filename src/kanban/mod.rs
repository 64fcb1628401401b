//! Board rules that do not touch the store: column positions, the client
//! board session with drag reconciliation, task filtering and status folds.

pub mod analytics;
pub mod filters;
pub mod position;
pub mod session;
