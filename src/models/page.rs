use serde::{Deserialize, Serialize};

/// Logical pages of the public site. Each page owns one content collection
/// and one background-color setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    About,
    Equipment,
    Gallery,
    Faq,
    Contact,
}

impl Page {
    /// Navigation order.
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::About,
        Page::Equipment,
        Page::Gallery,
        Page::Faq,
        Page::Contact,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::About => "about",
            Page::Equipment => "equipment",
            Page::Gallery => "gallery",
            Page::Faq => "faq",
            Page::Contact => "contact",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Page::ALL.into_iter().find(|p| p.slug() == slug)
    }

    pub fn path(&self) -> String {
        match self {
            Page::Home => "/".to_string(),
            other => format!("/{}", other.slug()),
        }
    }

    /// Display label used in the navigation bar. Menu graphics bind to this.
    pub fn nav_label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About Us",
            Page::Equipment => "Equipment",
            Page::Gallery => "Gallery",
            Page::Faq => "FAQ",
            Page::Contact => "Contact",
        }
    }

    /// Backend collection holding this page's content blocks.
    pub fn collection(&self) -> String {
        format!("{}_page_content", self.slug())
    }

    pub fn background_key(&self) -> String {
        format!("{}_background_color", self.slug())
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
