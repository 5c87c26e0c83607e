pub mod api_utils;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod gateway;
pub mod list_utils;
pub mod patch;
pub mod state;
