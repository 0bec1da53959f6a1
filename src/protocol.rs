pub mod message;
pub mod state;
pub mod transcript;
