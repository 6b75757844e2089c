pub mod draw_service;
pub mod event_broadcaster;
pub mod participant_service;
pub mod prize_service;

pub use draw_service::*;
pub use event_broadcaster::*;
pub use participant_service::*;
pub use prize_service::*;
