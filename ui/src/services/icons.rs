//! App icon store: app id to raw SVG markup

use std::collections::HashMap;

use reqwest::Client;

use crate::{console_debug, console_warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconStore {
    icons: HashMap<String, String>,
}

impl IconStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, app_id: &str) -> Option<&str> {
        self.icons.get(app_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Stores `markup` when it looks like an SVG document
    pub fn insert(&mut self, app_id: &str, markup: String) -> bool {
        let trimmed = markup.trim_start();
        if !(trimmed.starts_with("<svg") || trimmed.starts_with("<?xml")) {
            console_warn!("[Icons] Ignoring non-SVG icon for {}", app_id);
            return false;
        }
        self.icons.insert(app_id.to_string(), markup);
        true
    }

    /// Fetches `{base_url}/{app_id}.svg` for every id not loaded yet. Missing
    /// icons are skipped; the UI falls back to the ticker.
    pub async fn load_initial_icons(&mut self, base_url: &str, app_ids: &[String]) {
        let client = Client::new();

        for app_id in app_ids {
            if self.icons.contains_key(app_id) {
                continue;
            }

            let url = format!("{}/{}.svg", base_url.trim_end_matches('/'), app_id);
            match client.get(&url).send().await {
                Ok(response) if response.status().is_success() => match response.text().await {
                    Ok(markup) => {
                        if self.insert(app_id, markup) {
                            console_debug!("[Icons] Loaded icon for {}", app_id);
                        }
                    }
                    Err(e) => console_warn!("[Icons] Failed to read icon {}: {}", app_id, e),
                },
                Ok(response) => {
                    console_warn!("[Icons] Icon {} answered {}", app_id, response.status())
                }
                Err(e) => console_warn!("[Icons] Failed to fetch icon {}: {}", app_id, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_accepts_svg_only() {
        let mut store = IconStore::new();
        assert!(store.insert("kusama", "<svg viewBox=\"0 0 1 1\"></svg>".to_string()));
        assert!(!store.insert("acala", "<html>404</html>".to_string()));

        assert_eq!(store.len(), 1);
        assert!(store.get("kusama").unwrap().starts_with("<svg"));
        assert!(store.get("acala").is_none());
    }
}
