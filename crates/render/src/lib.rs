pub mod assemble;
pub mod config;
pub mod error;
pub mod legend;
pub mod map;
pub mod tiles;

pub use assemble::assemble;
pub use config::MapConfig;
pub use error::{RenderError, Result};
pub use map::LeafletMap;
