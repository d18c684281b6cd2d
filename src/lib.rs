pub mod cache;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod ops;
pub mod output;
pub mod paths;
pub mod store;
pub mod tui;
pub mod validate;
pub mod views;
pub mod watch;
pub mod web;
