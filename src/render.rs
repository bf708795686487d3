use serde_json::Value;

use crate::menu_graphics::NavRenderMode;
use crate::models::asset::{AssetType, SiteAsset};
use crate::models::content::ResolvedContent;
use crate::models::settings::SiteSettings;
use crate::view::{NavEntry, PageView};

/// Render a loaded page view to a complete HTML document. Compiles the
/// view's styles as a side effect.
pub fn render_page(view: &mut PageView) -> String {
    let (tokens, graphics) = view.compile_styles();
    let settings = view.site_settings();
    let nav = view.nav(&graphics);
    let logos = view.assets_of(&AssetType::Logo);
    let footer_images = view.assets_of(&AssetType::FooterImage);

    let mut sections_html = String::new();
    for section in view.sections() {
        sections_html.push_str(&render_section(&section));
    }

    let notices: String = view
        .notices()
        .iter()
        .map(|n| format!("<div class=\"notice\" role=\"status\">{}</div>", html_escape(n)))
        .collect();

    let page_title = if view.page() == crate::models::page::Page::Home {
        html_escape(&settings.site_name)
    } else {
        format!(
            "{} | {}",
            html_escape(view.page().nav_label()),
            html_escape(&settings.site_name)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{page_title}</title>
    <meta name="theme-color" content="{theme_color}">
    <style>{base_css}</style>
{styles}</head>
<body class="page-{page_slug} themed-bg themed-text">
    <header class="site-header">
        {logo}
        <nav class="site-nav">{nav}</nav>
        {phone}
    </header>
    {notices}
    <main>
{sections}
    </main>
    {footer}
</body>
</html>"#,
        page_title = page_title,
        theme_color = tokens.background_color,
        base_css = BASE_CSS,
        styles = view.sheet().render(),
        page_slug = view.page().slug(),
        logo = build_logo_html(&logos, &settings),
        nav = build_nav_html(&nav),
        phone = build_phone_html(&settings),
        notices = notices,
        sections = sections_html,
        footer = build_footer_html(&footer_images, &settings),
    )
}

fn build_logo_html(logos: &[SiteAsset], settings: &SiteSettings) -> String {
    let name = html_escape(&settings.site_name);
    match logos.iter().max_by_key(|a| a.z_index) {
        Some(logo) => {
            let size = match (logo.width, logo.height) {
                (Some(w), Some(h)) => format!(" width=\"{}\" height=\"{}\"", w, h),
                _ => String::new(),
            };
            format!(
                r#"<a href="/" class="site-logo"><img src="{}" alt="{}"{}></a>"#,
                html_escape(&logo.image_url),
                name,
                size
            )
        }
        None => format!(r#"<a href="/" class="site-logo site-name">{}</a>"#, name),
    }
}

pub(crate) fn build_nav_html(entries: &[NavEntry]) -> String {
    let mut html = String::new();
    for entry in entries {
        let current = if entry.current { " aria-current=\"page\"" } else { "" };
        let label = html_escape(entry.label);
        match &entry.mode {
            NavRenderMode::Graphic { class } => html.push_str(&format!(
                r#"<a href="{href}" class="nav-graphic {class}" title="{label}"{current}><span class="sr-only">{label}</span></a>"#,
                href = entry.href,
                class = class,
                label = label,
                current = current,
            )),
            NavRenderMode::Placeholder { initial } => html.push_str(&format!(
                r#"<a href="{href}" class="nav-placeholder themed-border" title="{label}"{current}>{initial}</a>"#,
                href = entry.href,
                label = label,
                current = current,
                initial = html_escape(&initial.to_string()),
            )),
            NavRenderMode::Text => html.push_str(&format!(
                r#"<a href="{href}" class="nav-pill"{current}>{label}</a>"#,
                href = entry.href,
                label = label,
                current = current,
            )),
        }
    }
    html
}

fn build_phone_html(settings: &SiteSettings) -> String {
    if settings.contact_phone.is_empty() {
        return String::new();
    }
    let tel: String = settings
        .contact_phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!(
        r#"<a href="tel:{}" class="header-phone themed-accent">{}</a>"#,
        tel,
        html_escape(&settings.contact_phone)
    )
}

fn build_footer_html(images: &[SiteAsset], settings: &SiteSettings) -> String {
    let mut imgs = String::new();
    for img in images {
        imgs.push_str(&format!(
            r#"<img src="{}" alt="" class="footer-image" loading="lazy">"#,
            html_escape(&img.image_url)
        ));
    }
    let mut contact = Vec::new();
    if !settings.contact_email.is_empty() {
        let email = html_escape(&settings.contact_email);
        contact.push(format!(r#"<a href="mailto:{0}">{0}</a>"#, email));
    }
    if !settings.contact_phone.is_empty() {
        contact.push(html_escape(&settings.contact_phone));
    }
    format!(
        r#"<footer class="site-footer themed-border">
        <div class="footer-images">{imgs}</div>
        <p class="footer-contact">{contact}</p>
        <p>{footer_text}</p>
        <p>&copy; {year} {name}</p>
    </footer>"#,
        imgs = imgs,
        contact = contact.join(" &middot; "),
        footer_text = html_escape(&settings.footer_text),
        year = chrono::Utc::now().format("%Y"),
        name = html_escape(&settings.site_name),
    )
}

pub(crate) fn render_section(section: &ResolvedContent) -> String {
    let mut inner = String::new();

    if let Some(img) = &section.image_url {
        inner.push_str(&format!(
            r#"<img src="{}" alt="" class="section-image">"#,
            html_escape(img)
        ));
    }
    let heading = if section.content_type == "hero" { "h1" } else { "h2" };
    if let Some(title) = &section.title {
        inner.push_str(&format!("<{h}>{}</{h}>", html_escape(title), h = heading));
    }
    if let Some(sub) = &section.subtitle {
        inner.push_str(&format!(
            "<p class=\"subtitle themed-accent\">{}</p>",
            html_escape(sub)
        ));
    }
    if let Some(text) = &section.content_text {
        for para in text.split("\n\n").filter(|p| !p.trim().is_empty()) {
            inner.push_str(&format!("<p>{}</p>", html_escape(para.trim())));
        }
    }
    if let Some(meta) = &section.metadata {
        inner.push_str(&render_metadata_items(meta));
    }
    if let (Some(text), Some(link)) = (&section.button_text, &section.button_link) {
        inner.push_str(&format!(
            r#"<a href="{}" class="button themed-border themed-accent">{}</a>"#,
            html_escape(link),
            html_escape(text)
        ));
    }

    format!(
        "        <section class=\"section section-{} type-{}\">{}</section>\n",
        css_token(&section.section_key),
        css_token(&section.content_type),
        inner
    )
}

/// `metadata.items` as a list: plain strings, or `{q, a}` pairs for FAQs.
fn render_metadata_items(meta: &Value) -> String {
    let items = match meta.get("items").and_then(|v| v.as_array()) {
        Some(items) if !items.is_empty() => items,
        _ => return String::new(),
    };
    let mut html = String::from("<ul class=\"items\">");
    for item in items {
        match item {
            Value::String(s) => html.push_str(&format!("<li>{}</li>", html_escape(s))),
            Value::Object(_) => {
                let q = item.get("q").and_then(|v| v.as_str()).unwrap_or("");
                let a = item.get("a").and_then(|v| v.as_str()).unwrap_or("");
                html.push_str(&format!(
                    "<li><details><summary>{}</summary><p>{}</p></details></li>",
                    html_escape(q),
                    html_escape(a)
                ));
            }
            _ => {}
        }
    }
    html.push_str("</ul>");
    html
}

fn css_token(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const BASE_CSS: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: 'Nunito', system-ui, sans-serif; line-height: 1.6; min-height: 100vh; }
.site-header { display: flex; align-items: center; gap: 24px; padding: 16px 32px; flex-wrap: wrap; }
.site-logo img { max-height: 72px; width: auto; }
.site-name { font-size: 24px; font-weight: 800; color: inherit; text-decoration: none; }
.site-nav { display: flex; gap: 12px; flex-wrap: wrap; align-items: center; }
.nav-pill { padding: 8px 18px; border-radius: 999px; background: rgba(255,255,255,0.18); color: inherit; text-decoration: none; font-weight: 700; }
.nav-pill[aria-current] { background: var(--page-accent-color); color: var(--page-bg-color); }
.nav-graphic { display: inline-block; }
.nav-placeholder { display: inline-flex; align-items: center; justify-content: center; width: 48px; height: 48px; border: 2px dashed; border-radius: 12px; color: inherit; text-decoration: none; font-weight: 800; }
.sr-only { position: absolute; width: 1px; height: 1px; overflow: hidden; clip: rect(0 0 0 0); }
.header-phone { margin-left: auto; font-weight: 700; text-decoration: none; }
.notice { margin: 12px 32px; padding: 10px 14px; border-radius: 8px; background: rgba(0,0,0,0.2); font-size: 14px; }
main { max-width: 1080px; margin: 0 auto; padding: 24px 32px 64px; }
.section { padding: 32px 0; }
.section h1 { font-size: 44px; line-height: 1.15; }
.section h2 { font-size: 28px; margin-bottom: 8px; }
.section p { margin-top: 8px; }
.section-image { max-width: 100%; border-radius: 16px; margin-bottom: 16px; }
.subtitle { font-size: 20px; font-weight: 700; }
.items { margin: 12px 0 0 20px; }
.button { display: inline-block; margin-top: 16px; padding: 12px 28px; border: 3px solid; border-radius: 999px; font-weight: 800; text-decoration: none; }
.site-footer { border-top: 3px solid; padding: 32px; text-align: center; font-size: 14px; }
.footer-images img { max-height: 80px; margin: 0 8px; }
.site-footer a { color: inherit; }
"#;
