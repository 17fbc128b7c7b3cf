pub mod bot;
pub mod http;
pub mod state;
pub mod telegram;
