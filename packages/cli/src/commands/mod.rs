pub mod check;
pub mod document;
pub mod new;
pub mod replay;

pub use check::{check, CheckArgs};
pub use new::{new_block, NewArgs};
pub use replay::{replay, ReplayArgs};
