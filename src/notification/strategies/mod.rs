//! Built-in per-channel strategies.

mod discord;
mod email;
mod instagram;
mod twitter;
mod whatsapp;

pub use discord::DiscordStrategy;
pub use email::EmailStrategy;
pub use instagram::InstagramStrategy;
pub use twitter::TwitterStrategy;
pub use whatsapp::WhatsappStrategy;
