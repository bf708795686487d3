use rocket::tokio;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::accessor::{self, Accessor, ViewScope};
use crate::content::{defaults, resolve};
use crate::menu_graphics::{MenuGraphics, NavRenderMode};
use crate::models::asset::{AssetType, SiteAsset};
use crate::models::content::{PageContentBlock, ResolvedContent};
use crate::models::page::Page;
use crate::models::settings::SiteSettings;
use crate::store::Store;
use crate::styles::{StyleSheet, StyleSlot};
use crate::theme::{self, ThemeTokens};

/// One navigation entry with its resolved drawing mode.
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    pub label: &'static str,
    pub href: String,
    pub current: bool,
    #[serde(flatten)]
    pub mode: NavRenderMode,
}

/// Everything a single page render needs, owned for the lifetime of the
/// view. Dropping the view cancels in-flight fetches and releases its
/// style slots.
pub struct PageView {
    page: Page,
    #[cfg(test)]
    store: Arc<dyn Store>,
    scope: ViewScope,
    sheet: StyleSheet,
    settings: Accessor<HashMap<String, String>>,
    assets: Accessor<Vec<SiteAsset>>,
    content: Accessor<Vec<PageContentBlock>>,
    theme_slot: Option<StyleSlot>,
    menu_slot: Option<StyleSlot>,
}

impl PageView {
    pub fn new(page: Page, store: Arc<dyn Store>) -> Self {
        let scope = ViewScope::new();
        PageView {
            page,
            settings: accessor::settings(store.clone(), scope.clone()),
            assets: accessor::assets(store.clone(), scope.clone(), None),
            content: accessor::page_content(store.clone(), scope.clone(), page),
            #[cfg(test)]
            store,
            scope,
            sheet: StyleSheet::new(),
            theme_slot: None,
            menu_slot: None,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    #[cfg(test)]
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fire all three fetches at once; each settles independently.
    pub async fn load(&self) {
        tokio::join!(self.settings.load(), self.assets.load(), self.content.load());
    }

    pub fn is_loading(&self) -> bool {
        self.settings.snapshot().loading
            || self.assets.snapshot().loading
            || self.content.snapshot().loading
    }

    #[cfg(test)]
    pub fn raw_settings(&self) -> HashMap<String, String> {
        self.settings.snapshot().data
    }

    pub fn site_settings(&self) -> SiteSettings {
        SiteSettings::from_map(&self.settings.snapshot().data)
    }

    pub fn assets_of(&self, kind: &AssetType) -> Vec<SiteAsset> {
        self.assets
            .snapshot()
            .data
            .into_iter()
            .filter(|a| &a.asset_type == kind)
            .collect()
    }

    #[cfg(test)]
    pub fn blocks(&self) -> Vec<PageContentBlock> {
        self.content.snapshot().data
    }

    pub fn section(&self, section_key: &str) -> ResolvedContent {
        resolve(
            &self.content.snapshot().data,
            section_key,
            &defaults::for_section(self.page, section_key),
        )
    }

    pub fn sections(&self) -> Vec<ResolvedContent> {
        defaults::sections(self.page)
            .iter()
            .map(|key| self.section(key))
            .collect()
    }

    pub fn menu_graphics(&self) -> MenuGraphics {
        let settings = self.site_settings();
        MenuGraphics::compile(
            &self.assets_of(&AssetType::MenuGraphic),
            settings.menu_graphic_size,
        )
    }

    /// Run both compilers and (re)fill the theme and menu-graphics slots.
    pub fn compile_styles(&mut self) -> (ThemeTokens, MenuGraphics) {
        let settings = self.site_settings();
        let (tokens, theme_slot) = theme::apply(self.page, &settings, &self.sheet);
        let graphics = self.menu_graphics();
        let menu_slot = graphics.apply(&self.sheet);
        // assigning drops the superseded guards, which leave the new content alone
        self.theme_slot = Some(theme_slot);
        self.menu_slot = Some(menu_slot);
        (tokens, graphics)
    }

    pub fn nav(&self, graphics: &MenuGraphics) -> Vec<NavEntry> {
        let enabled = self.site_settings().menu_graphics_enabled;
        Page::ALL
            .iter()
            .map(|p| NavEntry {
                label: p.nav_label(),
                href: p.path(),
                current: *p == self.page,
                mode: graphics.render_mode(p.nav_label(), enabled),
            })
            .collect()
    }

    /// Fetch failures worth an inline notice. Missing configuration stays silent.
    pub fn notices(&self) -> Vec<String> {
        let not_configured = crate::store::StoreError::NotConfigured.to_string();
        [
            ("settings", self.settings.snapshot().error),
            ("assets", self.assets.snapshot().error),
            ("content", self.content.snapshot().error),
        ]
        .into_iter()
        .filter_map(|(what, err)| {
            err.filter(|e| *e != not_configured)
                .map(|e| format!("Some {} could not be loaded ({}).", what, e))
        })
        .collect()
    }

    /// Client-side style navigation: swap the page, reload its content and
    /// settings, and recompile into the same two slots.
    #[cfg(test)]
    pub async fn navigate(&mut self, page: Page) -> (ThemeTokens, MenuGraphics) {
        self.page = page;
        self.content = accessor::page_content(self.store.clone(), self.scope.clone(), page);
        tokio::join!(self.settings.refetch(), self.content.load());
        self.compile_styles()
    }
}

impl Drop for PageView {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::{SettingForm, SettingType};
    use crate::store::sqlite::tests::{asset_form, block_form, test_store};
    use crate::styles::{MENU_GRAPHICS_SLOT, THEME_SLOT};

    #[rocket::async_test]
    async fn navigation_replaces_styles_instead_of_appending() {
        let store = test_store();
        store
            .setting_set(&SettingForm {
                key: "about_background_color".into(),
                value: "#FFFFFF".into(),
                setting_type: SettingType::Color,
                description: None,
            })
            .unwrap();
        let mut view = PageView::new(Page::Home, Arc::new(store));
        view.load().await;
        view.compile_styles();
        assert_eq!(view.sheet().len(), 2);

        let (tokens, _) = view.navigate(Page::About).await;
        assert_eq!(tokens.background_color, "#FFFFFF");
        assert_eq!(view.sheet().len(), 2);
        assert!(view.sheet().get(THEME_SLOT).unwrap().contains("#FFFFFF"));

        view.navigate(Page::Faq).await;
        view.navigate(Page::Home).await;
        assert_eq!(view.sheet().len(), 2);
    }

    #[rocket::async_test]
    async fn dropping_view_cancels_and_clears_styles() {
        let mut view = PageView::new(Page::Home, Arc::new(test_store()));
        view.load().await;
        view.compile_styles();
        let sheet = view.sheet().clone();
        let scope = view.scope().clone();
        assert!(sheet.get(MENU_GRAPHICS_SLOT).is_some());
        drop(view);
        assert!(scope.is_cancelled());
        assert!(sheet.is_empty());
    }

    #[rocket::async_test]
    async fn sections_fall_back_per_field() {
        let store = test_store();
        let mut form = block_form("hero", 0);
        form.title = Some("Summer Specials".into());
        store.content_create(Page::Home, &form).unwrap();

        let view = PageView::new(Page::Home, Arc::new(store));
        view.load().await;
        let hero = view.section("hero");
        assert_eq!(hero.title.as_deref(), Some("Summer Specials"));
        assert_eq!(
            hero.button_link.as_deref(),
            Some("/contact"),
            "button should come from the compiled default"
        );
        assert_eq!(view.sections().len(), defaults::sections(Page::Home).len());
    }

    #[rocket::async_test]
    async fn nav_uses_graphics_when_enabled() {
        let store = test_store();
        store
            .setting_set(&SettingForm {
                key: "menu_graphics_enabled".into(),
                value: "true".into(),
                setting_type: SettingType::Text,
                description: None,
            })
            .unwrap();
        store
            .asset_create(&asset_form(AssetType::MenuGraphic, "About Us", "x.png"))
            .unwrap();
        let mut view = PageView::new(Page::Home, Arc::new(store));
        view.load().await;
        let (_, graphics) = view.compile_styles();
        let nav = view.nav(&graphics);
        let about = nav.iter().find(|n| n.label == "About Us").unwrap();
        assert_eq!(
            about.mode,
            NavRenderMode::Graphic {
                class: "menu-about-us".into()
            }
        );
        let home = nav.iter().find(|n| n.label == "Home").unwrap();
        assert_eq!(home.mode, NavRenderMode::Placeholder { initial: 'H' });
        assert!(home.current);
    }

    #[rocket::async_test]
    async fn unconfigured_backend_renders_defaults_without_notices() {
        let view = PageView::new(Page::Contact, Arc::new(crate::store::UnconfiguredStore));
        view.load().await;
        assert!(!view.is_loading());
        assert!(view.notices().is_empty());
        assert_eq!(view.section("hero").title.as_deref(), Some("Contact Us"));
    }
}
