mod client;
pub mod domain;
mod everhour_url;
mod token;
pub mod time_format;

pub(crate) use everhour_url::*;
pub use everhour_url::DEFAULT_API_URL;

pub use client::*;
pub use token::*;
