mod normalize;

pub use normalize::{classify_and_normalize, UrlKind};

use crate::constants::{
    EXTERNAL_VIDEO_LABEL, IMAGE_UNAVAILABLE, MEDIA_UNAVAILABLE, VIDEO_PLACEHOLDER_LABEL,
    VIDEO_TITLE_FALLBACK,
};
use crate::core::MediaRecord;
use crate::utils::{alt_text, non_empty};

/// A renderable form of one record's media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaDescriptor {
    Image { src: String, alt: String },
    VideoEmbed { embed_url: String, title: String },
    VideoFile { src: String, title: String },
    ExternalLink { href: String, label: String },
    /// Generic "watch video" tile for videos without a preview image.
    VideoPlaceholder { label: String },
    Unavailable { message: String },
}

/// Card-sized media. Video records are always flagged so the card can carry
/// a badge, whether or not a preview image exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub media: MediaDescriptor,
    pub is_video: bool,
}

pub fn render_thumbnail(record: &MediaRecord) -> Thumbnail {
    if record.is_video() {
        let media = match non_empty(record.thumbnail_url.as_deref()) {
            Some(preview) => MediaDescriptor::Image {
                src: preview.to_string(),
                alt: alt_text(record, true),
            },
            None => MediaDescriptor::VideoPlaceholder {
                label: VIDEO_PLACEHOLDER_LABEL.to_string(),
            },
        };
        return Thumbnail {
            media,
            is_video: true,
        };
    }

    let media = match non_empty(record.url.as_deref()) {
        Some(src) => MediaDescriptor::Image {
            src: src.to_string(),
            alt: alt_text(record, false),
        },
        None => MediaDescriptor::Unavailable {
            message: IMAGE_UNAVAILABLE.to_string(),
        },
    };
    Thumbnail {
        media,
        is_video: false,
    }
}

pub fn render_detail(record: &MediaRecord) -> MediaDescriptor {
    if record.is_video() {
        return video_detail(record);
    }

    let source = non_empty(record.hdurl.as_deref()).or_else(|| non_empty(record.url.as_deref()));
    match source {
        Some(src) => MediaDescriptor::Image {
            src: src.to_string(),
            alt: alt_text(record, false),
        },
        None => MediaDescriptor::Unavailable {
            message: IMAGE_UNAVAILABLE.to_string(),
        },
    }
}

fn video_detail(record: &MediaRecord) -> MediaDescriptor {
    let raw = record.url.as_deref().unwrap_or_default();
    let title = non_empty(record.title.as_deref())
        .unwrap_or(VIDEO_TITLE_FALLBACK)
        .to_string();
    let normalized = classify_and_normalize(raw);
    match normalized.kind {
        UrlKind::Embeddable => MediaDescriptor::VideoEmbed {
            embed_url: normalized.url,
            title,
        },
        UrlKind::File => MediaDescriptor::VideoFile {
            src: raw.to_string(),
            title,
        },
        UrlKind::Link => MediaDescriptor::ExternalLink {
            href: raw.to_string(),
            label: EXTERNAL_VIDEO_LABEL.to_string(),
        },
        UrlKind::Empty => MediaDescriptor::Unavailable {
            message: MEDIA_UNAVAILABLE.to_string(),
        },
    }
}
