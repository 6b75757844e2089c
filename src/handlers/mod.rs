pub mod events;
pub mod game;
pub mod participant;
pub mod prize;

pub use events::events_config;
pub use game::game_config;
pub use participant::participant_config;
pub use prize::prize_config;
