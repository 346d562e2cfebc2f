pub mod file_server;
pub mod scripted;
