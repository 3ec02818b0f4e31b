pub mod alert;
pub mod config;
pub mod init;
pub mod session;
pub mod turn;
