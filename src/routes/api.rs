use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;
use std::sync::Arc;

use crate::models::content::ResolvedContent;
use crate::models::page::Page;
use crate::models::settings::SiteSettings;
use crate::store::Store;
use crate::theme::ThemeTokens;
use crate::view::{NavEntry, PageView};

// ── Resolved page view ─────────────────────────────────

/// Everything the page renderer uses, for clients that draw it themselves.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub page: Page,
    pub path: String,
    pub loading: bool,
    pub settings: SiteSettings,
    pub theme: ThemeTokens,
    pub nav: Vec<NavEntry>,
    pub sections: Vec<ResolvedContent>,
    pub styles: Vec<StyleEntry>,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StyleEntry {
    pub id: &'static str,
    pub css: String,
}

#[get("/page/<slug>")]
pub async fn page_view(slug: &str, store: &State<Arc<dyn Store>>) -> Option<Json<PageResponse>> {
    let page = Page::from_slug(slug)?;
    let mut view = PageView::new(page, store.inner().clone());
    view.load().await;

    let (theme, graphics) = view.compile_styles();
    let styles = [crate::styles::THEME_SLOT, crate::styles::MENU_GRAPHICS_SLOT]
        .into_iter()
        .filter_map(|id| view.sheet().get(id).map(|css| StyleEntry { id, css }))
        .collect();

    Some(Json(PageResponse {
        page,
        path: page.path(),
        loading: view.is_loading(),
        settings: view.site_settings(),
        theme,
        nav: view.nav(&graphics),
        sections: view.sections(),
        styles,
        notices: view.notices(),
    }))
}
