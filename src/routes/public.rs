use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;
use std::sync::Arc;

use crate::models::page::Page;
use crate::render;
use crate::store::Store;
use crate::view::PageView;

async fn render_view(page: Page, store: Arc<dyn Store>) -> String {
    let mut view = PageView::new(page, store);
    view.load().await;
    render::render_page(&mut view)
}

// ── Pages ──────────────────────────────────────────────

#[get("/")]
pub async fn home(store: &State<Arc<dyn Store>>) -> RawHtml<String> {
    RawHtml(render_view(Page::Home, store.inner().clone()).await)
}

#[get("/home")]
pub fn home_alias() -> Redirect {
    Redirect::permanent("/")
}

#[get("/<slug>", rank = 5)]
pub async fn page(slug: &str, store: &State<Arc<dyn Store>>) -> Option<RawHtml<String>> {
    let page = Page::from_slug(slug)?;
    Some(RawHtml(render_view(page, store.inner().clone()).await))
}
