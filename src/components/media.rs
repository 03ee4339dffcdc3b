//! Avatars and the post media gallery.

use maud::{html, Markup, Render};

use crate::models::{MediaKind, PostMedia};

/// Round profile picture.
#[derive(Debug, Clone)]
pub struct Avatar<'a> {
    /// Already resolved to an absolute URL
    pub src: &'a str,
    pub alt: &'a str,
    pub large: bool,
}

impl<'a> Avatar<'a> {
    #[must_use]
    pub const fn new(src: &'a str, alt: &'a str) -> Self {
        Self {
            src,
            alt,
            large: false,
        }
    }

    #[must_use]
    pub const fn large(mut self) -> Self {
        self.large = true;
        self
    }
}

impl Render for Avatar<'_> {
    fn render(&self) -> Markup {
        let class = if self.large { "avatar avatar-lg" } else { "avatar" };
        html! {
            img class=(class) src=(self.src) alt=(self.alt) loading="lazy";
        }
    }
}

/// Media attached to a post. Videos get player controls, images link to
/// the full-size file.
#[derive(Debug, Clone)]
pub struct MediaGallery<'a> {
    pub items: &'a [PostMedia],
    /// Host that relative media paths live on
    pub media_base: &'a str,
}

impl<'a> MediaGallery<'a> {
    #[must_use]
    pub fn new(items: &'a [PostMedia], media_base: &'a str) -> Self {
        Self { items, media_base }
    }
}

fn resolve_media(raw: &str, base: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            raw.trim_start_matches('/')
        )
    }
}

impl Render for MediaGallery<'_> {
    fn render(&self) -> Markup {
        html! {
            @if self.items.is_empty() {
                p class="empty-state" { "No media attached." }
            } @else {
                div class="media-gallery" {
                    @for (index, item) in self.items.iter().enumerate() {
                        @let src = resolve_media(&item.media_url, self.media_base);
                        @match item.media_type {
                            MediaKind::Video => {
                                div class="video-wrapper" {
                                    video controls preload="metadata" {
                                        source src=(src);
                                        "Your browser does not support the video tag."
                                    }
                                }
                            }
                            MediaKind::Image => {
                                a href=(src) target="_blank" rel="noopener noreferrer" {
                                    img src=(src) alt=(format!("Post media {}", index + 1)) loading="lazy";
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media(url: &str, kind: &str) -> PostMedia {
        serde_json::from_value(json!({"id": 1, "mediaUrl": url, "mediaType": kind})).unwrap()
    }

    #[test]
    fn test_gallery_video_and_image() {
        let items = vec![
            media("v/clip.mp4", "video"),
            media("https://other.example/pic.jpg", "image"),
        ];
        let html = MediaGallery::new(&items, "https://cdn.example/")
            .render()
            .into_string();

        assert!(html.contains("<video controls"));
        assert!(html.contains("src=\"https://cdn.example/v/clip.mp4\""));
        assert!(html.contains("href=\"https://other.example/pic.jpg\""));
        assert!(html.contains("alt=\"Post media 2\""));
    }

    #[test]
    fn test_empty_gallery() {
        let html = MediaGallery::new(&[], "https://cdn.example")
            .render()
            .into_string();
        assert!(html.contains("No media attached."));
    }

    #[test]
    fn test_avatar() {
        let html = Avatar::new("https://cdn.example/a.png", "ana")
            .large()
            .render()
            .into_string();
        assert!(html.contains("class=\"avatar avatar-lg\""));
    }
}
