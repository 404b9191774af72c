pub mod admin;
pub mod backup;
pub mod draw;
pub mod participants;

pub use admin::{handle_admin_command, AdminCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use draw::{handle_draw_command, DrawArgs};
pub use participants::{handle_participant_command, ParticipantCommands};
