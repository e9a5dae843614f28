//! Wiring between the pure core and the outside world: the application
//! runner owning the terminal, the API service and the update loop.

pub mod app_runner;

pub use app_runner::AppRunner;
