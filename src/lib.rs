pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod engine;
pub mod global;
pub mod lists;
pub mod matcher;
pub mod normalizer;
pub mod session;
pub mod store;
