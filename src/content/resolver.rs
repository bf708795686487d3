use serde_json::Value;

use crate::models::content::{DefaultContentBlock, PageContentBlock, ResolvedContent};

/// Resolve one section of a page.
///
/// The first block whose `section_key` matches wins. Each renderable field is
/// taken from that block when it is non-empty, otherwise from `fallback`, so a
/// half-filled block never blanks out a default. Stored `metadata` replaces the
/// fallback metadata wholesale. With no matching block the fallback is returned
/// as-is.
///
/// `blocks` must already be limited to active rows of one page, in fetch order.
pub fn resolve(
    blocks: &[PageContentBlock],
    section_key: &str,
    fallback: &DefaultContentBlock,
) -> ResolvedContent {
    let mut matches = blocks.iter().filter(|b| b.section_key == section_key);

    let stored = match matches.next() {
        Some(b) => b,
        None => return ResolvedContent::from(fallback),
    };

    let extra = matches.count();
    if extra > 0 {
        log::warn!(
            "[content] section '{}' has {} duplicate block(s); using id {}",
            section_key,
            extra,
            stored.id
        );
    }

    ResolvedContent {
        section_key: section_key.to_string(),
        content_type: if stored.content_type.is_empty() {
            fallback.content_type.clone()
        } else {
            stored.content_type.clone()
        },
        title: pick(&stored.title, &fallback.title),
        subtitle: pick(&stored.subtitle, &fallback.subtitle),
        content_text: pick(&stored.content_text, &fallback.content_text),
        image_url: pick(&stored.image_url, &fallback.image_url),
        button_text: pick(&stored.button_text, &fallback.button_text),
        button_link: pick(&stored.button_link, &fallback.button_link),
        metadata: match &stored.metadata {
            Some(Value::Null) | None => fallback.metadata.clone(),
            Some(m) => Some(m.clone()),
        },
    }
}

fn pick(stored: &Option<String>, fallback: &Option<String>) -> Option<String> {
    match stored {
        Some(s) if !s.is_empty() => Some(s.clone()),
        _ => fallback.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(section: &str) -> PageContentBlock {
        PageContentBlock {
            id: format!("id-{}", section),
            section_key: section.to_string(),
            content_type: String::new(),
            title: None,
            subtitle: None,
            content_text: None,
            image_url: None,
            button_text: None,
            button_link: None,
            order_position: 0,
            metadata: None,
            active: true,
        }
    }

    fn full_fallback() -> DefaultContentBlock {
        DefaultContentBlock::new("hero", "hero")
            .title("Default Hero")
            .subtitle("Default subtitle")
            .text("Default body")
            .image("/static/hero.jpg")
            .button("Book now", "/contact")
            .metadata(json!({"a": 1, "b": 2}))
    }

    #[test]
    fn missing_section_returns_fallback_unchanged() {
        let blocks = vec![block("intro"), block("cta")];
        let fb = full_fallback();
        let out = resolve(&blocks, "hero", &fb);
        assert_eq!(out, ResolvedContent::from(&fb));
    }

    #[test]
    fn empty_list_returns_fallback() {
        let fb = full_fallback();
        assert_eq!(resolve(&[], "hero", &fb), ResolvedContent::from(&fb));
    }

    #[test]
    fn stored_title_overrides_only_title() {
        let mut b = block("hero");
        b.title = Some("Custom Hero".into());
        let out = resolve(&[b], "hero", &full_fallback());
        assert_eq!(out.title.as_deref(), Some("Custom Hero"));
        assert_eq!(out.subtitle.as_deref(), Some("Default subtitle"));
        assert_eq!(out.content_text.as_deref(), Some("Default body"));
        assert_eq!(out.image_url.as_deref(), Some("/static/hero.jpg"));
        assert_eq!(out.button_text.as_deref(), Some("Book now"));
        assert_eq!(out.button_link.as_deref(), Some("/contact"));
        assert_eq!(out.content_type, "hero");
    }

    #[test]
    fn empty_stored_string_does_not_blank_fallback() {
        let mut b = block("hero");
        b.title = Some(String::new());
        b.subtitle = Some("New subtitle".into());
        let out = resolve(&[b], "hero", &full_fallback());
        assert_eq!(out.title.as_deref(), Some("Default Hero"));
        assert_eq!(out.subtitle.as_deref(), Some("New subtitle"));
    }

    #[test]
    fn metadata_replaces_instead_of_merging() {
        let mut b = block("hero");
        b.metadata = Some(json!({"a": 1}));
        let out = resolve(&[b], "hero", &full_fallback());
        assert_eq!(out.metadata, Some(json!({"a": 1})));
    }

    #[test]
    fn null_metadata_falls_back() {
        let mut b = block("hero");
        b.metadata = Some(Value::Null);
        let out = resolve(&[b], "hero", &full_fallback());
        assert_eq!(out.metadata, Some(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn first_duplicate_wins() {
        let mut first = block("hero");
        first.title = Some("First".into());
        let mut second = block("hero");
        second.title = Some("Second".into());
        let out = resolve(&[first, second], "hero", &full_fallback());
        assert_eq!(out.title.as_deref(), Some("First"));
    }

    #[test]
    fn hero_scenario() {
        let mut b = block("hero");
        b.title = Some("Custom Hero".into());
        let fb = DefaultContentBlock::new("hero", "hero")
            .title("Default Hero")
            .text("Default body");
        let out = resolve(&[b], "hero", &fb);
        assert_eq!(out.title.as_deref(), Some("Custom Hero"));
        assert_eq!(out.content_text.as_deref(), Some("Default body"));
        assert_eq!(out.subtitle, None);
    }
}
