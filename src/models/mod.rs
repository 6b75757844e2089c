pub mod common;
pub mod draw;
pub mod participant;
pub mod prize;

pub use common::*;
pub use draw::*;
pub use participant::*;
pub use prize::*;
