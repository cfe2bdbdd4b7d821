//! Field extraction for recu.me video pages
//!
//! The page format is not under our control, so every field is looked up
//! independently and a missing or malformed element only drops that field.

use crate::extractor::models::VideoRecord;
use crate::extractor::traits::Extractor;
use chrono::{Local, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

static PERFORMER: Lazy<Selector> = Lazy::new(|| css("a.performer"));
static TITLE: Lazy<Selector> = Lazy::new(|| css("div.title"));
static INFO_CONTAINER: Lazy<Selector> = Lazy::new(|| css("div.video-info-sub"));
static VIEWS: Lazy<Selector> = Lazy::new(|| css("span.video-views"));
static DATE_ICON: Lazy<Selector> = Lazy::new(|| css("i.fa-regular.fa-calendar"));
static DURATION_ICON: Lazy<Selector> = Lazy::new(|| css("i.fa-regular.fa-clock"));
static LIKES: Lazy<Selector> = Lazy::new(|| css("span#likes_percent"));
static BOOKMARKS: Lazy<Selector> = Lazy::new(|| css("span.video-bookmark-counter"));
static THUMBNAIL: Lazy<Selector> = Lazy::new(|| css(r#"img[id^="thumb_"]"#));
static VIDEO_TAG: Lazy<Selector> = Lazy::new(|| css("video"));
static SCRIPT: Lazy<Selector> = Lazy::new(|| css("script"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern"));
static STYLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(\s*['"]([^'"]+)['"]\s*\)"#).expect("style url pattern"));
static VIDEO_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/video/(\d+)/").expect("video id pattern"));
static SCRIPT_VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"videoUrl\s*=\s*['"]([^'"]+)['"]"#).expect("videoUrl pattern")
});

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

/// Extractor for recu.me video pages
#[derive(Debug, Default, Clone, Copy)]
pub struct RecuMeExtractor;

impl RecuMeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse with an explicit extraction timestamp
    pub fn parse_with_timestamp(&self, markup: &str, source_url: &str, timestamp: String) -> VideoRecord {
        let document = Html::parse_document(markup);
        let mut record = VideoRecord::new(source_url, timestamp);

        record.performer = first_text(&document, &PERFORMER);
        record.title = first_text(&document, &TITLE);

        if let Some(container) = document.select(&INFO_CONTAINER).next() {
            record.views = container
                .select(&VIEWS)
                .next()
                .and_then(|el| first_number(&element_text(el)));
            record.date = container
                .select(&DATE_ICON)
                .next()
                .and_then(|icon| text_after(&document, icon));
            record.duration = container
                .select(&DURATION_ICON)
                .next()
                .and_then(|icon| text_after(&document, icon));
            record.likes_percentage = container.select(&LIKES).next().map(element_text);
            record.bookmarks = container
                .select(&BOOKMARKS)
                .next()
                .and_then(|el| element_text(el).parse().ok());
        } else {
            debug!("No video-info-sub container on page");
        }

        record.thumbnail_url = thumbnail_url(&document);
        record.video_id = video_id_from_url(source_url);
        record.video_url = video_url(&document);

        debug!(
            "Extracted record for {}: performer={:?} title={:?} video_url={:?}",
            source_url, record.performer, record.title, record.video_url
        );
        record
    }
}

impl Extractor for RecuMeExtractor {
    fn id(&self) -> &'static str {
        "recume"
    }

    fn supports(&self, url: &str) -> bool {
        reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h == "recu.me" || h.ends_with(".recu.me")))
            .unwrap_or(false)
    }

    fn parse(&self, markup: &str, source_url: &str) -> VideoRecord {
        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        self.parse_with_timestamp(markup, source_url, timestamp)
    }
}

/// Trimmed concatenated text of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

/// First run of digits in `text`, parsed
fn first_number(text: &str) -> Option<u64> {
    DIGITS.find(text)?.as_str().parse().ok()
}

/// First non-blank text node following `marker` in document order.
///
/// Icon elements are usually empty, so the label sits in the next sibling
/// text node (`<i class="fa-calendar"></i> 12-05-2024`).
fn text_after(document: &Html, marker: ElementRef<'_>) -> Option<String> {
    let marker_id = (*marker).id();
    document
        .tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != marker_id)
        .skip(1)
        .find_map(|node| match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        })
}

fn thumbnail_url(document: &Html) -> Option<String> {
    let style = document.select(&THUMBNAIL).next()?.value().attr("style")?;
    let url = STYLE_URL.captures(style)?.get(1)?.as_str();
    Some(url.to_string())
}

/// Numeric id from a `/video/<digits>/` path segment of the request URL
pub fn video_id_from_url(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// `<video src>` first, then a `videoUrl = "..."` assignment in inline scripts
fn video_url(document: &Html) -> Option<String> {
    let from_tag = document
        .select(&VIDEO_TAG)
        .next()
        .and_then(|video| video.value().attr("src"))
        .filter(|src| !src.is_empty());
    if let Some(src) = from_tag {
        return Some(src.to_string());
    }

    document.select(&SCRIPT).find_map(|script| {
        let body = script.text().collect::<String>();
        if !body.contains("videoUrl") {
            return None;
        }
        SCRIPT_VIDEO_URL
            .captures(&body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://recu.me/jane/video/12345/play";

    const FULL_PAGE: &str = r#"
        <html><head><title>x</title></head><body>
          <a class="performer" href="/jane"> Jane </a>
          <div class="title">
             Evening stream
          </div>
          <div class="video-info-sub">
            <span class="video-views"><i class="fa-regular fa-eye"></i> 1234 views</span>
            <span><i class="fa-regular fa-calendar"></i> 12-05-2024 </span>
            <span><i class="fa-regular fa-clock"></i>
                01:02:03</span>
            <span id="likes_percent"> 87% </span>
            <span class="video-bookmark-counter"> 42 </span>
          </div>
          <img id="thumb_12345" style="background-image: url('https://img.recu.me/t/12345.jpg');">
          <video src="https://cdn.recu.me/v/12345.mp4"></video>
          <script>var videoUrl = "https://cdn.recu.me/other.mp4";</script>
        </body></html>
    "#;

    fn parse(markup: &str) -> VideoRecord {
        RecuMeExtractor::new().parse_with_timestamp(markup, PAGE_URL, "2024-05-12T10:00:00".into())
    }

    #[test]
    fn test_full_page_extracts_all_fields() {
        let record = parse(FULL_PAGE);

        assert_eq!(record.performer.as_deref(), Some("Jane"));
        assert_eq!(record.title.as_deref(), Some("Evening stream"));
        assert_eq!(record.views, Some(1234));
        assert_eq!(record.date.as_deref(), Some("12-05-2024"));
        assert_eq!(record.duration.as_deref(), Some("01:02:03"));
        assert_eq!(record.likes_percentage.as_deref(), Some("87%"));
        assert_eq!(record.bookmarks, Some(42));
        assert_eq!(
            record.thumbnail_url.as_deref(),
            Some("https://img.recu.me/t/12345.jpg")
        );
        assert_eq!(record.video_id.as_deref(), Some("12345"));
        assert_eq!(record.video_url.as_deref(), Some("https://cdn.recu.me/v/12345.mp4"));
        assert_eq!(record.url, PAGE_URL);
        assert_eq!(record.timestamp, "2024-05-12T10:00:00");
    }

    #[test]
    fn test_missing_performer_is_absent_not_error() {
        let record = parse(r#"<div class="title">Only a title</div>"#);
        assert_eq!(record.performer, None);
        assert_eq!(record.title.as_deref(), Some("Only a title"));

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("performer").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_video_tag_wins_over_script() {
        let record = parse(
            r#"<video src="X"></video><script>videoUrl = "Y";</script>"#,
        );
        assert_eq!(record.video_url.as_deref(), Some("X"));
    }

    #[test]
    fn test_script_fallback_single_quotes() {
        let record = parse(r#"<script>var videoUrl = 'Z';</script>"#);
        assert_eq!(record.video_url.as_deref(), Some("Z"));
    }

    #[test]
    fn test_empty_video_src_falls_back_to_script() {
        let record = parse(
            r#"<video src=""></video><script>player.init(); videoUrl="https://cdn/a.mp4"</script>"#,
        );
        assert_eq!(record.video_url.as_deref(), Some("https://cdn/a.mp4"));
    }

    #[test]
    fn test_first_matching_script_wins() {
        let record = parse(
            r#"<script>var other = 1;</script>
               <script>videoUrl = 'first';</script>
               <script>videoUrl = 'second';</script>"#,
        );
        assert_eq!(record.video_url.as_deref(), Some("first"));
    }

    #[test]
    fn test_no_video_url_anywhere() {
        let record = parse("<p>nothing here</p><script>var x = 1;</script>");
        assert_eq!(record.video_url, None);
    }

    #[test]
    fn test_video_id_comes_from_request_url() {
        assert_eq!(
            video_id_from_url("https://recu.me/a/video/12345/play").as_deref(),
            Some("12345")
        );
        assert_eq!(video_id_from_url("https://recu.me/a/video/abc/play"), None);
        assert_eq!(video_id_from_url("https://recu.me/a/video/12345"), None);

        let record = RecuMeExtractor::new().parse_with_timestamp(
            "<p>/video/999/ in the page body</p>",
            "https://recu.me/a/b",
            "t".into(),
        );
        assert_eq!(record.video_id, None);
    }

    #[test]
    fn test_views_take_first_digit_run() {
        let record = parse(
            r#"<div class="video-info-sub"><span class="video-views">1,234 views</span></div>"#,
        );
        assert_eq!(record.views, Some(1));
    }

    #[test]
    fn test_views_without_digits_is_absent() {
        let record = parse(
            r#"<div class="video-info-sub"><span class="video-views">many</span></div>"#,
        );
        assert_eq!(record.views, None);
    }

    #[test]
    fn test_bad_bookmarks_does_not_abort_other_fields() {
        let record = parse(
            r#"<div class="video-info-sub">
                 <span class="video-bookmark-counter">1.2k</span>
                 <span id="likes_percent">50%</span>
               </div>"#,
        );
        assert_eq!(record.bookmarks, None);
        assert_eq!(record.likes_percentage.as_deref(), Some("50%"));
    }

    #[test]
    fn test_metadata_fields_need_container() {
        let record = parse(r#"<span id="likes_percent">50%</span>"#);
        assert_eq!(record.likes_percentage, None);
    }

    #[test]
    fn test_date_skips_blank_text_nodes() {
        let record = parse(
            r#"<div class="video-info-sub"><i class="fa-regular fa-calendar"></i>
                 <span>2024-01-31</span></div>"#,
        );
        assert_eq!(record.date.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn test_thumbnail_requires_style_and_prefix() {
        let no_style = parse(r#"<img id="thumb_1" src="a.jpg">"#);
        assert_eq!(no_style.thumbnail_url, None);

        let wrong_id = parse(r#"<img id="cover_1" style="background: url('a.jpg')">"#);
        assert_eq!(wrong_id.thumbnail_url, None);

        let double_quoted = parse(r#"<img id="thumb_1" style='background: url("b.jpg")'>"#);
        assert_eq!(double_quoted.thumbnail_url.as_deref(), Some("b.jpg"));
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let record = parse(r#"<a class="performer">Jane</b></i><div class="title">T</span>"#);
        assert_eq!(record.performer.as_deref(), Some("Jane"));
        assert_eq!(record.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_supports_recume_hosts_only() {
        let extractor = RecuMeExtractor::new();
        assert!(extractor.supports("https://recu.me/jane/video/1/play"));
        assert!(extractor.supports("https://www.recu.me/x"));
        assert!(!extractor.supports("https://example.com/video/1/"));
        assert!(!extractor.supports("not a url"));
    }

    #[test]
    fn test_parse_stamps_iso_timestamp() {
        let record = RecuMeExtractor::new().parse("", PAGE_URL);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
        assert_eq!(record.url, PAGE_URL);
    }
}
