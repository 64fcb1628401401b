pub mod api;
pub mod app;
pub mod dto;
pub mod error;
pub mod kanban;
pub mod models;
pub mod repositories;
pub mod telemetry;
pub mod usecases;
