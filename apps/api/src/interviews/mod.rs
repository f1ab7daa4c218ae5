pub mod handlers;
pub mod readers;
