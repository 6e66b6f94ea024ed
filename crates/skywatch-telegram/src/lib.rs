mod api;
mod client;
mod listener;

pub use api::{Chat, Message, Update};
pub use client::{TelegramClient, TelegramConfig};
pub use listener::{is_info_command, CommandListener};
