//! Browser entry point.
//!
//! The generated pages are static HTML. This module attaches the
//! interactive widgets to the placeholder elements the generator emits.

use folio_ui::{ReadingProgress, ThemeProvider, ThemeSwitch, theme::document_theme, video};
use leptos::prelude::*;
use wasm_bindgen::{JsCast, prelude::wasm_bindgen};

/// Placeholder for the theme switch, present on every page.
const THEME_SWITCH_ID: &str = "theme-switch";

/// Placeholder for the reading progress bar, present on post pages.
const READING_PROGRESS_ID: &str = "reading-progress";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed.
    console_log::init_with_level(log::Level::Info).ok();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("no document, skipping widget mount");
        return;
    };

    publish_video_support(&document);

    if let Some(target) = mount_target(&document, THEME_SWITCH_ID) {
        // Start from the configured default the page was rendered with.
        let initial = document_theme().unwrap_or_default();
        leptos::mount::mount_to(target, move || {
            view! {
              <ThemeProvider initial=initial>
                <ThemeSwitch />
              </ThemeProvider>
            }
        })
        .forget();
    }

    if let Some(target) = mount_target(&document, READING_PROGRESS_ID) {
        leptos::mount::mount_to(target, ReadingProgress).forget();
    }
}

fn mount_target(document: &web_sys::Document, id: &str) -> Option<web_sys::HtmlElement> {
    let element = document.get_element_by_id(id)?;
    match element.dyn_into() {
        Ok(element) => Some(element),
        Err(_) => {
            log::warn!("#{id} is not an HTML element");
            None
        }
    }
}

fn publish_video_support(document: &web_sys::Document) {
    let formats = video::supported_formats();
    log::debug!("playable video formats: {formats:?}");

    let Some(root) = document.document_element() else {
        return;
    };
    if let Err(err) = root.set_attribute(video::SUPPORT_ATTRIBUTE, &video::support_attribute(&formats)) {
        log::warn!("failed to publish video support: {err:?}");
    }
}
