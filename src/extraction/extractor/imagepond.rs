use scraper::{Html, Selector};

use crate::extraction::sanitize::sanitize;
use crate::extraction::types::{Extraction, MediaItem};

const UNTITLED: &str = "imagepond_media";

pub fn extract(doc: &Html) -> Extraction {
    let raw_title = page_title(doc).unwrap_or_else(|| UNTITLED.to_string());
    let title = sanitize(&raw_title, UNTITLED);

    let mut items = Vec::new();
    let video = meta_content(doc, "meta[property=\"og:video\"]");
    let thumb = meta_content(doc, "meta[property=\"og:image\"]");
    if let (Some(video), Some(thumb)) = (video, thumb) {
        if !video.is_empty() && !thumb.is_empty() { items.push(MediaItem::video(video, thumb)); }
    }
    Extraction { title, items }
}

fn page_title(doc: &Html) -> Option<String> {
    let sel = Selector::parse("title").ok()?;
    let node = doc.select(&sel).next()?;
    Some(node.text().collect::<String>().trim().to_string())
}

fn meta_content(doc: &Html, sel_str: &str) -> Option<String> {
    let sel = Selector::parse(sel_str).ok()?;
    let node = doc.select(&sel).next()?;
    Some(node.value().attr("content")?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::types::MediaKind;

    fn run(html: &str) -> Extraction { extract(&Html::parse_document(html)) }

    #[test]
    fn video_and_image_meta_give_one_video() {
        let got = run(r#"<html><head>
            <title>Sunset clip - ImagePond</title>
            <meta property="og:video" content="http://x/v.mp4">
            <meta property="og:image" content="http://x/v.jpg">
        </head></html>"#);
        assert_eq!(got.title, "Sunset clip");
        assert_eq!(got.items, vec![MediaItem::video("http://x/v.mp4", "http://x/v.jpg")]);
        assert_eq!(got.items[0].kind, MediaKind::Video);
    }

    #[test]
    fn missing_either_meta_gives_nothing() {
        let only_video = run(r#"<head><meta property="og:video" content="http://x/v.mp4"></head>"#);
        assert!(only_video.items.is_empty());
        let only_image = run(r#"<head><meta property="og:image" content="http://x/v.jpg"></head>"#);
        assert!(only_image.items.is_empty());
    }

    #[test]
    fn empty_meta_content_gives_nothing() {
        let got = run(r#"<head>
            <meta property="og:video" content="">
            <meta property="og:image" content="http://x/v.jpg">
        </head>"#);
        assert!(got.items.is_empty());
        let no_attr = run(r#"<head><meta property="og:video"><meta property="og:image" content="http://x/v.jpg"></head>"#);
        assert!(no_attr.items.is_empty());
    }

    #[test]
    fn meta_content_is_kept_verbatim() {
        let got = run(r#"<head>
            <meta property="og:video" content=" http://x/v.mp4 ">
            <meta property="og:image" content=" ">
        </head>"#);
        assert_eq!(got.items, vec![MediaItem::video(" http://x/v.mp4 ", " ")]);
    }

    #[test]
    fn title_fallbacks() {
        assert_eq!(run("<html><body></body></html>").title, "imagepond_media");
        assert_eq!(run("<html><head><title> - ImagePond </title></head></html>").title, "imagepond_media");
    }
}
