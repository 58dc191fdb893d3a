//! Light/dark theme selection.
//!
//! The chosen theme is persisted in a `theme` cookie and mirrored into the
//! `data-theme` attribute of the root `<html>` element, which the
//! stylesheet keys its color variables on.

use std::{fmt, str::FromStr};

use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsCast;

/// Cookie holding the selected theme.
pub const THEME_COOKIE: &str = "theme";

/// Cookie lifetime in seconds (one year).
pub const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Color scheme of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Name used in cookies and the `data-theme` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite theme.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A theme name other than `light` or `dark`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

/// Find the theme in a `document.cookie` string.
///
/// Returns `None` when the cookie is absent or holds an unknown value.
pub fn theme_from_cookies(cookies: &str) -> Option<Theme> {
    cookies
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == THEME_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

/// Cookie assignment persisting `theme` for a year across the whole site.
pub fn theme_cookie(theme: Theme) -> String {
    format!("{THEME_COOKIE}={theme}; path=/; max-age={COOKIE_MAX_AGE}; SameSite=Lax")
}

/// Theme the generated page was rendered with, read from `<html data-theme>`.
///
/// Returns `None` outside a browser or when the attribute is missing or unknown.
pub fn document_theme() -> Option<Theme> {
    web_sys::window()?
        .document()?
        .document_element()?
        .get_attribute("data-theme")?
        .parse()
        .ok()
}

fn html_document() -> Option<web_sys::HtmlDocument> {
    web_sys::window()?.document()?.dyn_into().ok()
}

fn read_saved_theme() -> Option<Theme> {
    let document = html_document()?;
    match document.cookie() {
        Ok(cookies) => theme_from_cookies(&cookies),
        Err(err) => {
            log::warn!("failed to read cookies: {err:?}");
            None
        }
    }
}

fn save_theme(theme: Theme) {
    let Some(document) = html_document() else {
        return;
    };
    if let Err(err) = document.set_cookie(&theme_cookie(theme)) {
        log::warn!("failed to persist theme: {err:?}");
    }
}

fn apply_theme(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if let Err(err) = root.set_attribute("data-theme", theme.as_str()) {
        log::warn!("failed to apply theme: {err:?}");
    }
}

/// Handle to the current theme, shared through Leptos context.
#[derive(Debug, Clone, Copy)]
pub struct ThemeContext {
    theme: RwSignal<Theme>,
}

impl ThemeContext {
    /// Create a context starting at `initial`.
    pub fn new(initial: Theme) -> Self {
        Self {
            theme: RwSignal::new(initial),
        }
    }

    /// Current theme (tracked).
    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// Read-only signal of the theme.
    pub fn signal(&self) -> ReadSignal<Theme> {
        self.theme.read_only()
    }

    /// Persist `theme` and make it current.
    pub fn set(&self, theme: Theme) {
        save_theme(theme);
        self.theme.set(theme);
    }

    /// Switch to the opposite theme.
    pub fn toggle(&self) {
        self.set(self.theme.get_untracked().toggled());
    }
}

/// Provide a [`ThemeContext`] to descendants.
///
/// A theme saved in the cookie replaces `initial` once mounted, and every
/// change is written to `<html data-theme>`.
pub fn provide_theme_context(initial: Theme) -> ThemeContext {
    let ctx = ThemeContext::new(initial);
    provide_context(ctx);

    Effect::new(move |_| {
        if let Some(saved) = read_saved_theme() {
            ctx.theme.set(saved);
        }
    });

    Effect::new(move |_| apply_theme(ctx.theme.get()));

    ctx
}

/// The theme context provided by an ancestor [`ThemeProvider`].
///
/// # Panics
///
/// Panics when called outside a [`ThemeProvider`].
pub fn use_theme() -> ThemeContext {
    expect_context::<ThemeContext>()
}

/// Provides the theme context to its children.
#[component]
pub fn ThemeProvider(
    /// Theme used until the saved cookie is read.
    #[prop(optional)]
    initial: Theme,
    children: Children,
) -> impl IntoView {
    provide_theme_context(initial);
    children()
}

/// Button switching between light and dark.
#[component]
pub fn ThemeSwitch() -> impl IntoView {
    let ctx = use_theme();
    let is_dark = move || ctx.theme() == Theme::Dark;
    let label = move || format!("Switch to {} theme", ctx.theme().toggled());

    view! {
      <button
        type="button"
        class="folio-theme-switch"
        aria-pressed=move || is_dark().to_string()
        aria-label=label
        title=label
        on:click=move |_| ctx.toggle()
      >
        <span class="folio-theme-switch-icon" aria-hidden="true">
          {move || if is_dark() { "☾" } else { "☀" }}
        </span>
      </button>
    }
}
