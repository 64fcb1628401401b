use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubtaskRequest {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubtaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub position: Option<i32>,
}
