pub mod config;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod feed;
pub mod input;
pub mod market;
pub mod model;
pub mod store;
pub mod telemetry;
pub mod ui;
