//! Reading progress indicator for post pages.

use leptos::prelude::*;

use crate::scroll_progress::{ScrollObserver, WindowHost};

/// Convert a progress fraction into a bar width percentage in `[0, 100]`.
pub fn percent(progress: f64) -> f64 {
    if progress.is_nan() {
        return 0.0;
    }
    (progress * 100.0).clamp(0.0, 100.0)
}

/// Fixed bar whose width follows the vertical scroll position.
///
/// The observer is created once the component is mounted and destroyed
/// when it is cleaned up.
#[component]
pub fn ReadingProgress() -> impl IntoView {
    let progress = RwSignal::new(0.0_f64);
    let observer = StoredValue::new_local(None::<ScrollObserver<WindowHost>>);

    Effect::new(move |_| {
        if observer.with_value(Option::is_some) {
            return;
        }

        let Some(host) = WindowHost::new() else {
            log::warn!("no browser window, reading progress disabled");
            return;
        };

        let created = ScrollObserver::new(host, move |_, y| progress.set(y));
        observer.set_value(Some(created));
    });

    on_cleanup(move || {
        observer.update_value(|slot| {
            if let Some(mut active) = slot.take() {
                active.destroy();
            }
        });
    });

    let width = move || format!("width: {:.2}%", percent(progress.get()));
    let value_now = move || format!("{:.0}", percent(progress.get()));

    view! {
      <div
        class="folio-reading-progress"
        role="progressbar"
        aria-label="Reading progress"
        aria-valuemin="0"
        aria-valuemax="100"
        aria-valuenow=value_now
      >
        <div class="folio-reading-progress-bar" style=width></div>
      </div>
    }
}
