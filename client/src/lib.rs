#![warn(clippy::all, rust_2018_idioms)]
mod app;
mod widget;

pub use app::TimeoutDemoApp;
pub use widget::TimeoutEdit;
