//! Social media link entities.

pub mod model;
pub mod platform;

pub use model::{NewSocialLink, SocialLink, UpdateSocialLink, is_valid_username};
pub use platform::SocialPlatform;
