pub mod csv_import;

pub use csv_import::{ParsedRoster, ParticipantRow, parse_participant_csv};
