pub mod app;
pub mod debounce;
pub mod input;
pub mod last_saved;
pub mod navigation;
pub mod render;
pub mod theme;

pub use app::run;
