//! Banner ad types for bhub.

/// A banner ad with a display window and rotation priority.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Banner {
    /// Banner ID.
    pub id: i64,
    /// Internal title.
    pub title: String,
    /// Image URL.
    pub image_url: String,
    /// Click-through target URL.
    pub target_url: Option<String>,
    /// Placement slot (e.g. "header", "sidebar", "footer").
    pub position: String,
    /// Start of the display window (storage format).
    pub starts_at: String,
    /// End of the display window (storage format).
    pub ends_at: String,
    /// Rotation priority (higher first).
    pub priority: i32,
    /// Number of recorded clicks.
    pub click_count: i64,
    /// Whether the banner participates in rotation.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// New banner for creation.
#[derive(Debug, Clone)]
pub struct NewBanner {
    /// Internal title.
    pub title: String,
    /// Image URL.
    pub image_url: String,
    /// Click-through target URL.
    pub target_url: Option<String>,
    /// Placement slot.
    pub position: String,
    /// Start of the display window.
    pub starts_at: String,
    /// End of the display window.
    pub ends_at: String,
    /// Rotation priority.
    pub priority: i32,
}

impl NewBanner {
    /// Create a new banner.
    pub fn new(
        title: impl Into<String>,
        image_url: impl Into<String>,
        position: impl Into<String>,
        starts_at: impl Into<String>,
        ends_at: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
            target_url: None,
            position: position.into(),
            starts_at: starts_at.into(),
            ends_at: ends_at.into(),
            priority: 0,
        }
    }

    /// Set the click-through target.
    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    /// Set the rotation priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Banner update request.
#[derive(Debug, Clone, Default)]
pub struct BannerUpdate {
    /// New title.
    pub title: Option<String>,
    /// New image URL.
    pub image_url: Option<String>,
    /// New target URL.
    pub target_url: Option<Option<String>>,
    /// New placement slot.
    pub position: Option<String>,
    /// New display window start.
    pub starts_at: Option<String>,
    /// New display window end.
    pub ends_at: Option<String>,
    /// New priority.
    pub priority: Option<i32>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl BannerUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the update is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.target_url.is_none()
            && self.position.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.priority.is_none()
            && self.is_active.is_none()
    }
}
