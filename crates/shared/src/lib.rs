pub mod error;
pub mod grouping;
pub mod html;
pub mod marker;
pub mod models;
pub mod table;

pub use error::{Error, Result};
