mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
