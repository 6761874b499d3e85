//! Labmentix desktop client: chat with the AI assistant, sign in and out,
//! browse chat history.

pub mod api;
pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod forms;
pub mod nav;
pub mod storage;
pub mod ui;
pub mod utils;
