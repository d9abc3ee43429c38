use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind { Image, Video }

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub media_url: String,
    #[serde(rename = "thumb_url")]
    pub thumbnail_url: String,
}

impl MediaItem {
    pub fn image(media_url: impl Into<String>) -> Self {
        MediaItem { kind: MediaKind::Image, media_url: media_url.into(), thumbnail_url: String::new() }
    }

    pub fn video(media_url: impl Into<String>, thumbnail_url: impl Into<String>) -> Self {
        MediaItem { kind: MediaKind::Video, media_url: media_url.into(), thumbnail_url: thumbnail_url.into() }
    }
}

/// What a site extractor pulls out of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub title: String,
    pub items: Vec<MediaItem>,
}

/// Outcome for a single submitted URL. Serialized the way the web client expects:
/// `{"status":"success","url":..,"title":..,"items":[..]}` or `{"status":"error","url":..,"reason":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionResult {
    Success {
        #[serde(rename = "url")]
        source_url: String,
        title: String,
        items: Vec<MediaItem>,
    },
    #[serde(rename = "error")]
    Failure {
        #[serde(rename = "url")]
        source_url: String,
        #[serde(rename = "reason")]
        failure_reason: String,
    },
}

impl ExtractionResult {
    pub fn success(source_url: impl Into<String>, extraction: Extraction) -> Self {
        ExtractionResult::Success { source_url: source_url.into(), title: extraction.title, items: extraction.items }
    }

    pub fn failure(source_url: impl Into<String>, reason: impl Into<String>) -> Self {
        ExtractionResult::Failure { source_url: source_url.into(), failure_reason: reason.into() }
    }

    pub fn source_url(&self) -> &str {
        match self {
            ExtractionResult::Success { source_url, .. } | ExtractionResult::Failure { source_url, .. } => source_url,
        }
    }

    pub fn is_success(&self) -> bool { matches!(self, ExtractionResult::Success { .. }) }
}

/// One result per requested URL, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub results: Vec<ExtractionResult>,
}

impl BatchResult {
    pub fn len(&self) -> usize { self.results.len() }
    pub fn is_empty(&self) -> bool { self.results.is_empty() }

    pub fn totals(&self) -> BatchTotals {
        let mut t = BatchTotals::default();
        for r in &self.results {
            match r {
                ExtractionResult::Success { items, .. } => { t.succeeded += 1; t.items += items.len(); }
                ExtractionResult::Failure { .. } => t.failed += 1,
            }
        }
        t
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals { pub succeeded: usize, pub failed: usize, pub items: usize }

// Plan envelope types
#[derive(Serialize)]
pub struct PlannedUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct ExtractPlan { pub urls: usize, pub supported: usize, pub concurrency: usize, pub timeout_secs: u64, pub sample_urls: Vec<PlannedUrl> }
