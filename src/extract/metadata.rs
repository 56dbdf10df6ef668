//! One-pass DOM extraction.
//!
//! `scraper::Html` is not `Send`, so everything the rest of the pipeline
//! needs is pulled out of the parse tree in a single synchronous pass and
//! returned as owned data; the tree never crosses an await point.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

/// Social networks whose profile links are collected.
pub const SOCIAL_DOMAINS: [&str; 5] = [
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "pinterest.com",
];

static OG_SITE_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:site_name"]"#).expect("selector is valid")
});

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("selector is valid"));

static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("selector is valid")
});

static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"]"#).expect("selector is valid")
});

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("selector is valid"));

static LOGO_IMG: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"img[src*="logo"], img[src*="Logo"]"#).expect("selector is valid")
});

/// Everything the pipeline needs from the parsed page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub business_name: String,
    pub description: String,
    /// Social links in first-seen order, exact-string deduplicated.
    pub socials: Vec<String>,
    /// `src` of the first logo-ish `<img>`, for the logo resolver.
    pub logo_src: Option<String>,
}

/// Extract business metadata from serialized HTML.
pub fn extract(html: &str) -> PageContent {
    let doc = Html::parse_document(html);

    let business_name = meta_content(&doc, &OG_SITE_NAME)
        .or_else(|| {
            doc.select(&TITLE)
                .next()
                .map(|title| title.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_default();

    let description = meta_content(&doc, &META_DESCRIPTION)
        .or_else(|| meta_content(&doc, &OG_DESCRIPTION))
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut socials = Vec::new();
    for anchor in doc.select(&ANCHORS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if SOCIAL_DOMAINS.iter().any(|domain| href.contains(domain))
            && seen.insert(href.to_string())
        {
            socials.push(href.to_string());
        }
    }

    let logo_src = doc
        .select(&LOGO_IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    PageContent {
        business_name,
        description,
        socials,
        logo_src,
    }
}

fn meta_content(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_site_name_wins_over_title() {
        let content = extract(
            r#"<html><head>
                <meta property="og:site_name" content="Acme Inc">
                <title>Acme - Home</title>
            </head><body></body></html>"#,
        );
        assert_eq!(content.business_name, "Acme Inc");
    }

    #[test]
    fn title_is_the_name_fallback() {
        let content = extract("<html><head><title>  Acme - Home  </title></head></html>");
        assert_eq!(content.business_name, "Acme - Home");
    }

    #[test]
    fn name_defaults_to_empty() {
        let content = extract("<html><head></head><body><p>hi</p></body></html>");
        assert_eq!(content.business_name, "");
    }

    #[test]
    fn meta_description_wins_over_og_description() {
        let content = extract(
            r#"<html><head>
                <meta name="description" content="We make anvils.">
                <meta property="og:description" content="Anvils and more.">
            </head></html>"#,
        );
        assert_eq!(content.description, "We make anvils.");
    }

    #[test]
    fn og_description_is_the_fallback() {
        let content = extract(
            r#"<html><head>
                <meta name="description" content="  ">
                <meta property="og:description" content="Anvils and more.">
            </head></html>"#,
        );
        assert_eq!(content.description, "Anvils and more.");
    }

    #[test]
    fn social_links_are_filtered_and_deduplicated() {
        let content = extract(
            r#"<html><body>
                <a href="https://facebook.com/x">f</a>
                <a href="https://random.com/y">r</a>
                <a href="https://instagram.com/z">i</a>
                <a href="https://facebook.com/x">f again</a>
            </body></html>"#,
        );
        let expected: Vec<String> = vec![
            "https://facebook.com/x".to_string(),
            "https://instagram.com/z".to_string(),
        ];
        assert_eq!(content.socials, expected);
    }

    #[test]
    fn first_logoish_image_is_reported() {
        let content = extract(
            r#"<html><body>
                <img src="/img/hero.png">
                <img src="/assets/Logo-dark.svg">
                <img src="/assets/logo-light.svg">
            </body></html>"#,
        );
        assert_eq!(content.logo_src.as_deref(), Some("/assets/Logo-dark.svg"));
    }

    #[test]
    fn missing_logo_image_is_none() {
        let content = extract(r#"<html><body><img src="/img/hero.png"></body></html>"#);
        assert!(content.logo_src.is_none());
    }
}
