use std::fmt;

/// A supported social-media source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    TikTok,
    Instagram,
    Threads,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::TikTok, Self::Instagram, Self::Threads];

    /// Look up a platform by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "tiktok" => Some(Self::TikTok),
            "instagram" => Some(Self::Instagram),
            "threads" => Some(Self::Threads),
            _ => None,
        }
    }

    /// Registry name, also the name of the platform's table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TikTok => "tiktok",
            Self::Instagram => "instagram",
            Self::Threads => "threads",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
