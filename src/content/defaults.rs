use serde_json::json;

use crate::models::content::DefaultContentBlock;
use crate::models::page::Page;

/// Ordered section keys rendered on each page.
pub fn sections(page: Page) -> &'static [&'static str] {
    match page {
        Page::Home => &["hero", "intro", "features", "cta"],
        Page::About => &["hero", "story", "safety"],
        Page::Equipment => &["hero", "intro", "delivery"],
        Page::Gallery => &["hero", "intro"],
        Page::Faq => &["hero", "questions"],
        Page::Contact => &["hero", "details", "hours"],
    }
}

/// Hand-authored copy for a section when nothing is stored (or a stored
/// block leaves fields empty). Unknown sections get a bare text block.
pub fn for_section(page: Page, section_key: &str) -> DefaultContentBlock {
    match (page, section_key) {
        (Page::Home, "hero") => DefaultContentBlock::new("hero", "hero")
            .title("Bouncy Castles & Soft Play Hire")
            .subtitle("Making every party unforgettable")
            .text("Safe, clean and fully insured play equipment delivered and set up for you.")
            .image("/static/img/hero-home.jpg")
            .button("Check Availability", "/contact"),
        (Page::Home, "intro") => DefaultContentBlock::new("intro", "text")
            .title("Welcome")
            .text("We are a family-run hire company bringing the fun to birthdays, school fairs and community events."),
        (Page::Home, "features") => DefaultContentBlock::new("features", "features")
            .title("Why families choose us")
            .metadata(json!({
                "items": [
                    "Delivery, setup and collection included",
                    "Every unit cleaned after each hire",
                    "PIPA tested and fully insured"
                ]
            })),
        (Page::Home, "cta") => DefaultContentBlock::new("cta", "cta")
            .title("Ready to bounce?")
            .text("Dates fill up fast in summer. Get in touch to reserve yours.")
            .button("Get a Quote", "/contact"),

        (Page::About, "hero") => DefaultContentBlock::new("hero", "hero")
            .title("About Us")
            .subtitle("Party people since day one"),
        (Page::About, "story") => DefaultContentBlock::new("story", "text")
            .title("Our Story")
            .text("What started with a single castle in the back garden has grown into a full range of inflatables and soft play."),
        (Page::About, "safety") => DefaultContentBlock::new("safety", "text")
            .title("Safety First")
            .text("All equipment is inspected before every hire and our team are trained in safe setup."),

        (Page::Equipment, "hero") => DefaultContentBlock::new("hero", "hero")
            .title("Our Equipment")
            .subtitle("Castles, slides, soft play and more"),
        (Page::Equipment, "intro") => DefaultContentBlock::new("intro", "text")
            .text("Browse our range below. Every hire includes delivery within our local area."),
        (Page::Equipment, "delivery") => DefaultContentBlock::new("delivery", "text")
            .title("Delivery & Setup")
            .text("We arrive early, set up, run a safety check and collect at the end of the day."),

        (Page::Gallery, "hero") => DefaultContentBlock::new("hero", "hero")
            .title("Gallery")
            .subtitle("Smiles from recent parties"),
        (Page::Gallery, "intro") => DefaultContentBlock::new("intro", "text")
            .text("A few snapshots from events we have been part of."),

        (Page::Faq, "hero") => DefaultContentBlock::new("hero", "hero")
            .title("Frequently Asked Questions"),
        (Page::Faq, "questions") => DefaultContentBlock::new("questions", "faq")
            .metadata(json!({
                "items": [
                    {"q": "How much space do I need?", "a": "Each listing shows the footprint plus a one metre safety zone."},
                    {"q": "What if it rains?", "a": "Most units can be used in light rain; we will advise on the day."}
                ]
            })),

        (Page::Contact, "hero") => DefaultContentBlock::new("hero", "hero")
            .title("Contact Us")
            .subtitle("We usually reply within a few hours"),
        (Page::Contact, "details") => DefaultContentBlock::new("details", "text")
            .title("Get in touch")
            .text("Call, email or send us a message with your date and postcode."),
        (Page::Contact, "hours") => DefaultContentBlock::new("hours", "text")
            .title("Opening Hours")
            .text("Monday to Saturday, 8am to 6pm."),

        (_, key) => DefaultContentBlock::new(key, "text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_section_has_authored_copy() {
        for page in Page::ALL {
            for key in sections(page) {
                let d = for_section(page, key);
                assert_eq!(d.section_key, *key);
                assert!(
                    d.title.is_some() || d.content_text.is_some() || d.metadata.is_some(),
                    "{}:{} has no default copy",
                    page,
                    key
                );
            }
        }
    }

    #[test]
    fn unknown_section_is_bare() {
        let d = for_section(Page::Home, "nope");
        assert_eq!(d.section_key, "nope");
        assert!(d.title.is_none());
    }
}
