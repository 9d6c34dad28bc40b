pub mod client;
pub mod entry;
pub mod rate_card;
pub mod staff;
pub mod sync;
pub mod user;
