pub mod api;
pub mod app;
pub mod chart;
pub mod config;
pub mod error;
pub mod event;
pub mod polling;
pub mod reconcile;
pub mod session;
pub mod ui;
pub mod util;
pub mod view_model;
