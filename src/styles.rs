use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const THEME_SLOT: &str = "theme-styles";
pub const MENU_GRAPHICS_SLOT: &str = "menu-graphics";

#[derive(Debug, Default)]
struct Entry {
    generation: u64,
    css: String,
}

#[derive(Debug, Default)]
struct Inner {
    next_generation: u64,
    slots: BTreeMap<String, Entry>,
}

/// The document head of one page view: a set of named `<style>` slots.
/// Writing to an existing slot replaces it, so repeated compiles never grow
/// the sheet.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    inner: Arc<Mutex<Inner>>,
}

/// Ownership of one slot's current content. Dropping it removes the slot,
/// unless a newer injection into the same slot has superseded it.
#[derive(Debug)]
pub struct StyleSlot {
    sheet: StyleSheet,
    id: String,
    generation: u64,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned sheet still holds valid strings.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn inject(&self, id: &str, css: String) -> StyleSlot {
        let mut inner = self.lock();
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner
            .slots
            .insert(id.to_string(), Entry { generation, css });
        StyleSlot {
            sheet: self.clone(),
            id: id.to_string(),
            generation,
        }
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.lock().slots.get(id).map(|e| e.css.clone())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `<style>` elements for every live slot, ready for the page head.
    pub fn render(&self) -> String {
        let inner = self.lock();
        let mut html = String::new();
        for (id, entry) in &inner.slots {
            html.push_str(&format!(
                "<style id=\"{}\">\n{}\n</style>\n",
                id,
                entry.css.replace("</", "<\\/")
            ));
        }
        html
    }
}

#[cfg(test)]
impl StyleSlot {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this guard still owns the slot's content.
    pub fn is_current(&self) -> bool {
        self.sheet
            .lock()
            .slots
            .get(&self.id)
            .map(|e| e.generation == self.generation)
            .unwrap_or(false)
    }
}

impl Drop for StyleSlot {
    fn drop(&mut self) {
        let mut inner = self.sheet.lock();
        let owned = inner
            .slots
            .get(&self.id)
            .map(|e| e.generation == self.generation)
            .unwrap_or(false);
        if owned {
            inner.slots.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_replaces_rather_than_appends() {
        let sheet = StyleSheet::new();
        let _a = sheet.inject(THEME_SLOT, "a{}".into());
        let _b = sheet.inject(THEME_SLOT, "b{}".into());
        let _c = sheet.inject(THEME_SLOT, "c{}".into());
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.get(THEME_SLOT).as_deref(), Some("c{}"));
    }

    #[test]
    fn dropping_current_guard_removes_slot() {
        let sheet = StyleSheet::new();
        let slot = sheet.inject(MENU_GRAPHICS_SLOT, ".x{}".into());
        assert!(slot.is_current());
        drop(slot);
        assert!(sheet.is_empty());
    }

    #[test]
    fn dropping_superseded_guard_keeps_newer_content() {
        let sheet = StyleSheet::new();
        let old = sheet.inject(THEME_SLOT, "old".into());
        let new = sheet.inject(THEME_SLOT, "new".into());
        assert!(!old.is_current());
        drop(old);
        assert_eq!(sheet.get(THEME_SLOT).as_deref(), Some("new"));
        drop(new);
        assert!(sheet.is_empty());
    }

    #[test]
    fn render_emits_one_element_per_slot() {
        let sheet = StyleSheet::new();
        let _t = sheet.inject(THEME_SLOT, ":root{}".into());
        let _m = sheet.inject(MENU_GRAPHICS_SLOT, ".menu-a{}".into());
        let html = sheet.render();
        assert_eq!(html.matches("<style").count(), 2);
        assert!(html.contains("id=\"theme-styles\""));
        assert!(html.contains("id=\"menu-graphics\""));
    }

    #[test]
    fn render_cannot_close_style_element_early() {
        let sheet = StyleSheet::new();
        let _t = sheet.inject(THEME_SLOT, "</style><script>".into());
        assert_eq!(sheet.render().matches("</style>").count(), 1);
    }
}
