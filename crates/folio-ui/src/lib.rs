//! Folio UI Components
//!
//! Leptos components and browser utilities for the Folio frontend.
//!
//! # Components
//!
//! ## Reading progress
//! - [`ReadingProgress`] - Fixed bar tracking how far a post has been read
//! - [`ScrollObserver`] - Scroll/resize listener reporting normalized progress
//!
//! ## Theme
//! - [`ThemeProvider`] - Provides the light/dark theme context
//! - [`ThemeSwitch`] - Button toggling the theme
//!
//! ## Video
//! - [`supported_formats`] - Video formats the browser can play
//!
//! # Example
//!
//! ```ignore
//! use folio_ui::{ScrollObserver, WindowHost};
//!
//! let host = WindowHost::new().expect("browser window");
//! let mut observer = ScrollObserver::new(host, |x, y| {
//!     log::info!("scrolled to {x:.2}, {y:.2}");
//! });
//!
//! // later, when the page goes away
//! observer.destroy();
//! ```

pub mod progress_bar;
pub mod scroll_progress;
pub mod theme;
pub mod video;

pub use progress_bar::ReadingProgress;
pub use scroll_progress::{
    ObserverState, Progress, ScrollObserver, ViewportEvent, ViewportHost, ViewportMetrics,
    WindowHost,
};
pub use theme::{Theme, ThemeContext, ThemeProvider, ThemeSwitch, provide_theme_context, use_theme};
pub use video::{VideoFormat, supported_formats, supports_video_type};
