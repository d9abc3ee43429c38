use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extraction::sanitize::sanitize;
use crate::extraction::types::{Extraction, MediaItem};

const UNTITLED: &str = "album_sem_titulo";
const MISSING_TITLE: &str = "erome_album";

pub fn extract(doc: &Html) -> Extraction {
    let raw_title = meta_content(doc, "meta[property=\"og:title\"]").unwrap_or_else(|| MISSING_TITLE.to_string());
    let title = sanitize(&raw_title, UNTITLED);

    let mut items = Vec::new();
    let Ok(item_sel) = Selector::parse("div.item") else { return Extraction { title, items } };
    for container in doc.select(&item_sel) {
        if let Some(item) = media_from_container(container) { items.push(item); }
    }
    Extraction { title, items }
}

fn media_from_container(container: ElementRef<'_>) -> Option<MediaItem> {
    let video_sel = Selector::parse("video").ok()?;
    if container.select(&video_sel).next().is_some() {
        let source_sel = Selector::parse("source").ok()?;
        let src = container.select(&source_sel).next()?.value().attr("src")?;
        if src.is_empty() { return None; }
        let thumb = poster_thumbnail(container).unwrap_or_default();
        return Some(MediaItem::video(src, thumb));
    }

    // lazy-loaded image; prefer the full-size back layer when the page has one
    let img_sel = Selector::parse("img.img-back, img[data-src]").ok()?;
    let imgs: Vec<ElementRef<'_>> = container.select(&img_sel).collect();
    let img = imgs
        .iter()
        .find(|e| e.value().classes().any(|c| c == "img-back"))
        .or_else(|| imgs.iter().find(|e| e.value().attr("data-src").is_some()))?;
    let src = img.value().attr("data-src")?;
    if src.is_empty() { None } else { Some(MediaItem::image(src)) }
}

// The player poster sits next to the item container, not inside it.
fn poster_thumbnail(container: ElementRef<'_>) -> Option<String> {
    let poster = container
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "div" && e.value().classes().any(|c| c == "vjs-poster"))?;
    let style = poster.value().attr("style")?;
    style_url(style)
}

fn style_url(style: &str) -> Option<String> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"url\("?(.+?)"?\)"#).ok()).as_ref()?;
    let caps = re.captures(style)?;
    Some(caps.get(1)?.as_str().to_string())
}

fn meta_content(doc: &Html, sel_str: &str) -> Option<String> {
    let sel = Selector::parse(sel_str).ok()?;
    let node = doc.select(&sel).next()?;
    Some(node.value().attr("content")?.to_string())
}
