pub mod account;
pub mod finance;
pub mod init;
pub mod misc;
pub mod notes;
pub mod tasks;
