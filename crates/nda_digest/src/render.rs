use askama::Template;
use chrono::NaiveDate;
use nda_core::{Error, Result};

use crate::date::format_digest_date;
use crate::fields::DigestArticle;

/// Static header title used when the caller supplies no tagline.
pub const DEFAULT_HEADLINE: &str = "Dein News Digest";

/// Company logo, inlined as a data URI so email clients need no remote
/// fetch to show the header.
const LOGO_DATA_URI: &str = "data:image/svg+xml;base64,PD94bWwgdmVyc2lvbj0iMS4wIiBlbmNvZGluZz0iaXNvLTg4NTktMSI/Pg0KPCEtLSBHZW5lcmF0b3I6IEFkb2JlIElsbHVzdHJhdG9yIDE2LjAuNCwgU1ZHIEV4cG9ydCBQbHVnLUluIC4gU1ZHIFZlcnNpb246IDYuMDAgQnVpbGQgMCkgIC0tPg0KPCFET0NUWVBFIHN2ZyBQVUJMSUMgIi0vL1czQy8vRFREIFNWRyAxLjEvL0VOIiAiaHR0cDovL3d3dy53My5vcmcvR3JhcGhpY3MvU1ZHLzEuMS9EVEQvc3ZnMTEuZHRkIj4NCjxzdmcgdmVyc2lvbj0iMS4xIiB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHhtbG5zOnhsaW5rPSJodHRwOi8vd3d3LnczLm9yZy8xOTk5L3hsaW5rIiB4PSIwcHgiIHk9IjBweCIgd2lkdGg9IjEwMDBweCINCgkgaGVpZ2h0PSIxNTlweCIgdmlld0JveD0iMCAwIDEwMDAgMTU5IiBzdHlsZT0iZW5hYmxlLWJhY2tncm91bmQ6bmV3IDAgMCAxMDAwIDE1OTsiIHhtbDpzcGFjZT0icHJlc2VydmUiPg0KPGcgaWQ9IkJvdW5kaW5nQm94Ij4NCgk8cG9seWdvbiBzdHlsZT0iZmlsbDpub25lOyIgcG9pbnRzPSIwLDE1OSAxMDAwLDE1OSAxMDAwLDAgMCwwIDAsMCAJIi8+DQo8L2c+DQo8ZyBpZD0iU0lFTUVOUyI+DQoJPGc+DQoJCTxwYXRoIHN0eWxlPSJmaWxsLXJ1bGU6ZXZlbm9kZDtjbGlwLXJ1bGU6ZXZlbm9kZDtmaWxsOiMwMDk5OTk7IiBkPSJNMy4wODYsMTUyLjUzN1YxMjIuNDYNCgkJCWMxNy4xMTksNS4zODgsMzIuMjY3LDguMDgyLDQ1LjQ0NCw4LjA4MmMxOC4xOTMsMCwyNy4yOTEtNC44MDksMjcuMjkxLTE0LjQyYzAtMy41ODMtMS4zMjQtNi41OTQtMy45NzgtOS4wMzINCgkJCWMtMi43MTQtMi41ODYtOS42NjUtNi4xNzEtMjAuODM1LTEwLjc2NGMtMjAuMDQyLTguMjQxLTMzLjExMS0xNS4yNjktMzkuMTktMjEuMDgyQzMuOTM5LDY3LjU3MSwwLDU3Ljg5NSwwLDQ2LjIwMg0KCQkJQzAsMzEuMTQ0LDUuNzQsMTkuNjY3LDE3LjIxMiwxMS43OEMyOC41NTcsMy45NjIsNDMuMzMsMC4wNTcsNjEuNTU0LDAuMDU3YzEwLjA0MSwwLDI0LjU3NCwxLjg0OCw0My41ODMsNS41NDl2MjguOTMzDQoJCQljLTE0LjE0NC01LjY1LTI3LjI3My04LjQ2OS0zOS40MDMtOC40NjljLTE3LjA4MSwwLTI1LjYyMSw0LjY5LTI1LjYyMSwxNC4wOTFjMCwzLjUxNCwxLjcyLDYuMzgsNS4xNjUsOC42MDINCgkJCWMyLjg2NSwxLjc5OCwxMC43NTksNS41OTYsMjMuNjY1LDExLjQwNmMxOC41ODMsOC4yNTMsMzAuOTU0LDE1LjQyNywzNy4xMTgsMjEuNTI5YzcuMzE0LDcuMjM4LDEwLjk3OCwxNi42MDQsMTAuOTc4LDI4LjA4NA0KCQkJYzAsMTYuNTAxLTcuMTc3LDI5LjA4OC0yMS41MjEsMzcuNzYxYy0xMS42MjEsNy4wMzMtMjYuNjksMTAuNTM1LTQ1LjE5OCwxMC41MzVDMzQuNjksMTU4LjA3OCwxOC45NDIsMTU2LjIzNywzLjA4NiwxNTIuNTM3DQoJCQlMMy4wODYsMTUyLjUzN3oiLz4NCgkJPHBvbHlnb24gc3R5bGU9ImZpbGwtcnVsZTpldmVub2RkO2NsaXAtcnVsZTpldmVub2RkO2ZpbGw6IzAwOTk5OTsiIHBvaW50cz0iMTQxLjA2MywyLjcwNCAxNDEuMDYzLDIuNzA0IDE4My42MDMsMi43MDQgDQoJCQkxODMuNjAzLDE1NS4wMDEgMTQxLjA2MywxNTUuMDAxIAkJIi8+DQoJCTxwb2x5Z29uIHN0eWxlPSJmaWxsLXJ1bGU6ZXZlbm9kZDtjbGlwLXJ1bGU6ZXZlbm9kZDtmaWxsOiMwMDk5OTk7IiBwb2ludHM9IjIyMi42MTYsMTU1LjAwMSAyMjIuNjE2LDIuNzA0IDMzMS43MjEsMi43MDQgDQoJCQkzMzEuNzIxLDMwLjI1IDI2My42MTYsMzAuMjUgMjYzLjYxNiw2NC42MzkgMzIyLjg5OCw2NC42MzkgMzIyLjg5OCw4OS43NjUgMjYzLjYxNiw4OS43NjUgMjYzLjYxNiwxMjUuOTA2IDMzMy40NzYsMTI1LjkwNiANCgkJCTMzMy40NzYsMTU1LjAwMSAyMjIuNjE2LDE1NS4wMDEgCQkiLz4NCgkJPHBvbHlnb24gc3R5bGU9ImZpbGwtcnVsZTpldmVub2RkO2NsaXAtcnVsZTpldmVub2RkO2ZpbGw6IzAwOTk5OTsiIHBvaW50cz0iMzYxLjI0NywxNTUuMDAxIDM2MS4yNDcsMi43MDQgNDE2LjQwMiwyLjcwNCANCgkJCTQ1NC43MjEsMTAwLjAxNSA0OTQuMDAxLDIuNzA0IDU0Ni4zOSwyLjcwNCA1NDYuMzksMTU1LjAwMSA1MDYuMDU2LDE1NS4wMDEgNTA2LjA1Niw0Ny4xNzEgNDYxLjM5MiwxNTYuNTQ3IDQzNS4wMjMsMTU2LjU0NyANCgkJCTM5MS4yMTksNDcuMTcxIDM5MS4yMTksMTU1LjAwMSAzNjEuMjQ3LDE1NS4wMDEgCQkiLz4NCgkJPHBvbHlnb24gc3R5bGU9ImZpbGwtcnVsZTpldmVub2RkO2NsaXAtcnVsZTpldmVub2RkO2ZpbGw6IzAwOTk5OTsiIHBvaW50cz0iNTg1LjQxMSwxNTUuMDAxIDU4NS40MTEsMi43MDQgNjk0LjUxNCwyLjcwNCANCgkJCTY5NC41MTQsMzAuMjUgNjI2LjQxNSwzMC4yNSA2MjYuNDE1LDY0LjYzOSA2ODUuNjk1LDY0LjYzOSA2ODUuNjk1LDg5Ljc2NSA2MjYuNDE1LDg5Ljc2NSA2MjYuNDE1LDEyNS45MDYgNjk2LjI4LDEyNS45MDYgDQoJCQk2OTYuMjgsMTU1LjAwMSA1ODUuNDExLDE1NS4wMDEgCQkiLz4NCgkJPHBvbHlnb24gc3R5bGU9ImZpbGwtcnVsZTpldmVub2RkO2NsaXAtcnVsZTpldmVub2RkO2ZpbGw6IzAwOTk5OTsiIHBvaW50cz0iNzI0LjI3MSwxNTUuMDAxIDcyNC4yNzEsMi43MDQgNzczLjU3NSwyLjcwNCANCgkJCTgyNS44ODMsMTA0LjY1NSA4MjUuODgzLDIuNzA0IDg1NS44NDcsMi43MDQgODU1Ljg0NywxNTUuMDAxIDgwNy45NDMsMTU1LjAwMSA3NTQuMjQ3LDUxLjY3OCA3NTQuMjQ3LDE1NS4wMDEgNzI0LjI3MSwxNTUuMDAxIAkJDQoJCQkiLz4NCgkJPHBhdGggc3R5bGU9ImZpbGwtcnVsZTpldmVub2RkO2NsaXAtcnVsZTpldmVub2RkO2ZpbGw6IzAwOTk5OTsiIGQ9Ik04ODYuMDQ3LDE1Mi41MzdWMTIyLjQ2DQoJCQljMTYuOTc0LDUuMzg4LDMyLjEyLDguMDgyLDQ1LjQ1Miw4LjA4MmMxOC4xOTUsMCwyNy4yODItNC44MDksMjcuMjgyLTE0LjQyYzAtMy41ODMtMS4yODktNi41OTQtMy44NTQtOS4wMzINCgkJCWMtMi43MjgtMi41ODYtOS43MDgtNi4xNzEtMjAuOTQ1LTEwLjc2NGMtMTkuOTgyLTguMTczLTMzLjA2NC0xNS4xOTgtMzkuMTk5LTIxLjA4MmMtNy44NzUtNy42MDUtMTEuODA3LTE3LjMxNy0xMS44MDctMjkuMTQ2DQoJCQljMC0xNC45OTMsNS43MjYtMjYuNDMyLDE3LjIxLTM0LjMxOWMxMS4zMjgtNy44MTgsMjYuMTE4LTExLjcyMyw0NC4zNDQtMTEuNzIzYzEwLjI0NywwLDIzLjUyNSwxLjYyNywzOS44MSw0Ljg5NmwzLjc2MSwwLjY1Mw0KCQkJdjI4LjkzM2MtMTQuMTQ2LTUuNjUtMjcuMzEzLTguNDY5LTM5LjUwOC04LjQ2OWMtMTcuMDE2LDAtMjUuNTAzLDQuNjktMjUuNTAzLDE0LjA5MWMwLDMuNTE0LDEuNzExLDYuMzgsNS4xNDcsOC42MDINCgkJCWMyLjczLDEuNzI5LDEwLjY1Niw1LjUyOSwyMy43NzgsMTEuNDA2YzE4LjQ0Miw4LjI1MywzMC43ODcsMTUuNDI3LDM3LjAwNSwyMS41MjljNy4zMjUsNy4yMzgsMTAuOTgsMTYuNjA0LDEwLjk4LDI4LjA4NA0KCQkJYzAsMTYuNTAxLTcuMTM1LDI5LjA4OC0yMS40MDYsMzcuNzYxYy0xMS42ODksNy4wMzMtMjYuNzk2LDEwLjUzNS00NS4zMDEsMTAuNTM1DQoJCQlDOTE3LjY0NiwxNTguMDc4LDkwMS44OTEsMTU2LjIzNyw4ODYuMDQ3LDE1Mi41MzdMODg2LjA0NywxNTIuNTM3eiIvPg0KCTwvZz4NCjwvZz4NCjwvc3ZnPg0K";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Size of the candidate pool the batch was curated from. Callers
    /// default this to the article count when they have nothing better.
    pub total_candidates: usize,
    /// AI-generated header line; empty falls back to [`DEFAULT_HEADLINE`].
    pub tagline: String,
    /// Render date, injected so output is reproducible in tests.
    pub date: NaiveDate,
}

/// One article card, pre-flattened for the template: fallbacks already
/// applied, presence decisions reduced to booleans. Escaping happens in the
/// template, which runs askama's html escaper over every interpolation.
struct Card {
    title: String,
    url: String,
    source: String,
    summary: String,
    published: String,
    category: String,
    has_category: bool,
    tags: Vec<String>,
    has_tags: bool,
    image_url: String,
    has_image: bool,
}

impl Card {
    fn from_article(article: &DigestArticle) -> Self {
        let category = article.display_category().to_string();
        let tags = article.display_tags();
        let image_url = article
            .resolved_image_url()
            .map(str::to_string)
            .unwrap_or_default();
        Self {
            title: article.display_title().to_string(),
            url: article.display_url().to_string(),
            source: article.display_source().to_string(),
            summary: article.display_summary().to_string(),
            published: article.display_published(),
            has_category: !category.is_empty(),
            category,
            has_tags: !tags.is_empty(),
            tags,
            has_image: !image_url.is_empty(),
            image_url,
        }
    }
}

#[derive(Template)]
#[template(path = "digest.html")]
struct DigestTemplate<'a> {
    logo: &'a str,
    date: &'a str,
    headline: &'a str,
    article_count: usize,
    total_candidates: usize,
    cards: Vec<Card>,
}

/// Renders the complete digest document. Article order is preserved
/// exactly as given; the zero-article case renders a distinct placeholder
/// block instead of cards. Output is byte-identical for identical inputs.
pub fn render_digest(articles: &[DigestArticle], opts: &RenderOptions) -> Result<String> {
    let date = format_digest_date(opts.date);
    let tagline = opts.tagline.trim();
    let headline = if tagline.is_empty() {
        DEFAULT_HEADLINE
    } else {
        tagline
    };

    let template = DigestTemplate {
        logo: LOGO_DATA_URI,
        date: &date,
        headline,
        article_count: articles.len(),
        total_candidates: opts.total_candidates,
        cards: articles.iter().map(Card::from_article).collect(),
    };

    template.render().map_err(|e| Error::Render(e.to_string()))
}

/// Subject line for the digest email, derived from the same date formatter
/// the document header uses so the two can never drift.
pub fn subject_line(date: NaiveDate, article_count: usize) -> String {
    format!(
        "News Digest - {} ({} kuratierte Artikel)",
        format_digest_date(date),
        article_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::PublishedAt;
    use chrono::TimeZone;

    fn opts() -> RenderOptions {
        RenderOptions {
            total_candidates: 10,
            tagline: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 8, 24).unwrap(),
        }
    }

    fn full_article(title: &str) -> DigestArticle {
        DigestArticle {
            id: Some("00000000-0000-0000-0000-000000000001".to_string()),
            title: Some(title.to_string()),
            source: Some("Testquelle".to_string()),
            summary: Some("Eine Zusammenfassung.".to_string()),
            url: Some("https://example.com/artikel".to_string()),
            published_at: Some(PublishedAt::Timestamp(
                chrono::Utc.with_ymd_and_hms(2025, 8, 20, 6, 0, 0).unwrap(),
            )),
            ..Default::default()
        }
    }

    #[test]
    fn empty_batch_renders_placeholder_and_no_cards() {
        let html = render_digest(&[], &opts()).unwrap();
        assert!(html.contains("Keine Artikel zum Anzeigen."));
        assert!(html.contains(
            "Es gibt aktuell keine ungesendeten Artikel mit Zusammenfassungen."
        ));
        assert!(!html.contains("object-fit: cover"));
        assert!(!html.contains("<h2"));
    }

    #[test]
    fn article_order_is_preserved() {
        let articles = vec![
            full_article("Erster"),
            full_article("Zweiter"),
            full_article("Dritter"),
        ];
        let html = render_digest(&articles, &opts()).unwrap();
        let first = html.find("Erster").unwrap();
        let second = html.find("Zweiter").unwrap();
        let third = html.find("Dritter").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn sparse_article_renders_with_all_fallbacks() {
        let article = DigestArticle {
            id: Some("00000000-0000-0000-0000-000000000002".to_string()),
            url: Some("https://example.com/nur-url".to_string()),
            ..Default::default()
        };
        let html = render_digest(&[article], &opts()).unwrap();
        assert!(html.contains("Kein Titel"));
        assert!(html.contains("Unbekannte Quelle"));
        assert!(html.contains("Keine Zusammenfassung verfügbar"));
        assert!(html.contains("Datum unbekannt"));
        assert!(html.contains("https://example.com/nur-url"));
    }

    #[test]
    fn untrusted_title_is_escaped() {
        let mut article = full_article("x");
        article.title = Some("<script>alert('x')</script>".to_string());
        let html = render_digest(&[article], &opts()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn image_block_present_only_with_resolved_url() {
        let mut with_image = full_article("Mit Bild");
        with_image.image_url = Some("https://img.example.com/a.jpg".to_string());
        let html = render_digest(&[with_image], &opts()).unwrap();
        assert!(html.contains("https://img.example.com/a.jpg"));
        assert!(html.contains("object-fit: cover"));

        let without_image = full_article("Ohne Bild");
        let html = render_digest(&[without_image], &opts()).unwrap();
        assert!(!html.contains("object-fit: cover"));
        // The fixed header logo is the only image reference left.
        assert_eq!(html.matches("<img").count(), 1);
    }

    #[test]
    fn tag_chips_are_truncated_to_five_in_order() {
        let mut article = full_article("Tags");
        article.topics = vec!["t1".into(), "t2".into(), "t3".into(), "t4".into()];
        article.keywords = vec!["k1".into(), "k2".into(), "k3".into(), "k4".into()];
        let html = render_digest(&[article], &opts()).unwrap();
        for tag in ["t1", "t2", "t3", "t4", "k1"] {
            assert!(html.contains(tag), "missing tag chip {}", tag);
        }
        assert!(!html.contains("k2"));
        let t4 = html.find("t4").unwrap();
        let k1 = html.find("k1").unwrap();
        assert!(t4 < k1);
    }

    #[test]
    fn tagline_overrides_default_headline() {
        let mut options = opts();
        options.tagline = "KI verändert alles".to_string();
        let html = render_digest(&[], &options).unwrap();
        assert!(html.contains("KI verändert alles"));
        assert!(!html.contains(DEFAULT_HEADLINE));

        let html = render_digest(&[], &opts()).unwrap();
        assert!(html.contains(DEFAULT_HEADLINE));
    }

    #[test]
    fn header_date_and_subject_use_the_same_formatting() {
        let html = render_digest(&[], &opts()).unwrap();
        assert!(html.contains("Sonntag, 24. August 2025"));
        assert_eq!(
            subject_line(opts().date, 3),
            "News Digest - Sonntag, 24. August 2025 (3 kuratierte Artikel)"
        );
    }

    #[test]
    fn whole_card_is_wrapped_in_anchor() {
        let html = render_digest(&[full_article("Karte")], &opts()).unwrap();
        assert!(html.contains(r#"<a href="https://example.com/artikel""#));
        // No separate read-more link.
        assert!(!html.contains("Weiterlesen"));
    }

    #[test]
    fn output_is_deterministic() {
        let articles = vec![full_article("Eins"), full_article("Zwei")];
        let a = render_digest(&articles, &opts()).unwrap();
        let b = render_digest(&articles, &opts()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn footer_carries_fixed_attribution() {
        let html = render_digest(&[], &opts()).unwrap();
        assert!(html.contains("Dieser Digest wurde automatisch von deinem AI News Agent generiert."));
    }
}
