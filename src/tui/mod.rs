mod app;
mod markdown;
mod theme;
mod ui;
mod wrap;

pub use app::run;
