//! Directory settings: public links and QR rendering.

use serde::{Deserialize, Serialize};

/// Settings specific to business listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Origin of the public site; profile links are `{base}/business-profile/{slug}`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Location assigned to businesses provisioned without one.
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Minimum edge length of rendered QR codes in pixels.
    #[serde(default = "default_qr_size")]
    pub qr_size_px: u32,
    /// Quiet zone around QR codes, in modules.
    #[serde(default = "default_qr_margin")]
    pub qr_margin: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            default_location: default_location(),
            qr_size_px: default_qr_size(),
            qr_margin: default_qr_margin(),
        }
    }
}

impl DirectoryConfig {
    /// Canonical public profile URL for a business slug.
    pub fn profile_url(&self, slug: &str) -> String {
        format!(
            "{}/business-profile/{slug}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

fn default_public_base_url() -> String {
    "https://my956.com".to_string()
}

fn default_location() -> String {
    "mcallen".to_string()
}

fn default_qr_size() -> u32 {
    300
}

fn default_qr_margin() -> u32 {
    2
}
