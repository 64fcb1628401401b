pub mod analytics;
pub mod boards;
pub mod export;
pub mod extract;
pub mod labels;
pub mod subtasks;
pub mod tasks;
