pub mod config_io;
pub mod logging;
pub mod sample;
pub mod state;
pub mod store;

pub use store::{JsonStore, SceneData, SceneStore, StoreError};
