pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod reminder;
pub mod state;
