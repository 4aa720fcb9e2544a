mod app;
pub mod config;
mod dom;
pub mod error;
pub mod input;
pub mod net;
pub mod render;
pub mod state;
pub mod ws;

pub use app::run;
