pub mod boards;
pub mod labels;
pub mod subtasks;
pub mod tasks;
