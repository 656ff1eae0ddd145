#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(&self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Image URL for a numeric cover id; `None` tells the caller to hide the image.
pub fn cover_url(covers_base_url: &str, cover_id: Option<i64>, size: CoverSize) -> Option<String> {
    cover_id.filter(|id| *id > 0).map(|id| {
        format!(
            "{}/b/id/{id}-{}.jpg",
            covers_base_url.trim_end_matches('/'),
            size.suffix()
        )
    })
}
