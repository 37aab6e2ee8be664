//! Discord webhook notifications.

mod notifier;
pub mod payload;

pub use notifier::DiscordNotifier;
