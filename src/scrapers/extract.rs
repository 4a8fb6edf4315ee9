//! Read both row streams out of one listing page.
//!
//! Every field is read as optional. A malformed row shows up later as an
//! incomplete record instead of failing extraction.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::models::{ListingPage, RawDateRecord, RawItemRecord};
use crate::utils::truncate_for_log;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static ITEM_ROW: Lazy<Selector> = Lazy::new(|| selector(".athing"));
static TITLE_LINE: Lazy<Selector> = Lazy::new(|| selector(".titleline"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector(".titleline > a"));
static AGE: Lazy<Selector> = Lazy::new(|| selector(".age"));
static AGE_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
/// The "load more" control of the listing.
static MORE_LINK: Lazy<Selector> = Lazy::new(|| selector(".morelink"));

fn normalized_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join("");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

fn item_record(row: ElementRef<'_>) -> RawItemRecord {
    RawItemRecord {
        identifier: row.value().id().unwrap_or_default().to_string(),
        title: row.select(&TITLE_LINE).next().and_then(normalized_text),
        link: row
            .select(&TITLE_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(non_blank),
    }
}

fn date_record(age: ElementRef<'_>) -> RawDateRecord {
    RawDateRecord {
        display_date: age.value().attr("title").and_then(non_blank),
        comment_link: age
            .select(&AGE_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(non_blank),
    }
}

/// Extract article rows and date rows from a parsed listing document.
pub fn extract_document(document: &Html) -> ListingPage {
    let items: Vec<RawItemRecord> = document.select(&ITEM_ROW).map(item_record).collect();
    let dates: Vec<RawDateRecord> = document.select(&AGE).map(date_record).collect();
    ListingPage { items, dates }
}

/// Extract article rows and date rows from listing markup.
#[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
pub fn extract_page(html: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let page = extract_document(&document);
    debug!(
        items = page.items.len(),
        dates = page.dates.len(),
        first_title = %page
            .items
            .first()
            .and_then(|i| i.title.as_deref())
            .map(|t| truncate_for_log(t, 80))
            .unwrap_or_default(),
        "Extracted listing page"
    );
    page
}

/// `href` of the first "load more" control, if the page has one.
pub fn next_page_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&MORE_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
