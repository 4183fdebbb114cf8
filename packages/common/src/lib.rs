pub mod block;
pub mod catalog;
pub mod config;
pub mod error;
pub mod field_path;
pub mod id_generator;
pub mod integrity;
pub mod visitor;

pub use block::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use field_path::*;
pub use id_generator::*;
pub use integrity::*;
pub use visitor::*;
