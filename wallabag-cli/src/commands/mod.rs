pub mod init;
pub mod reset;
pub mod status;
pub mod sync;
