pub mod config;
pub mod dropdown;
pub mod hierarchy;
pub mod shot;

pub use config::*;
pub use dropdown::*;
pub use hierarchy::*;
pub use shot::*;
