//! Scroll progress tracking.
//!
//! [`ScrollObserver`] listens for scroll and resize events on a
//! [`ViewportHost`] and reports the normalized scroll position on both
//! axes. It drives the reading progress bar on post pages.
//!
//! The host is a trait so the observer runs against the browser window
//! through [`WindowHost`] and against an in-memory host in tests.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use web_sys::AddEventListenerOptions;

/// Host events the observer subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportEvent {
    /// The document was scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
}

impl ViewportEvent {
    /// DOM event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        }
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Current scroll position in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    /// Create a new scroll offset.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The environment a [`ScrollObserver`] reads dimensions from and
/// registers its listeners on.
pub trait ViewportHost {
    /// Handle returned by [`listen`](Self::listen), needed to unregister.
    type Listener;

    /// Full scrollable size of the document.
    fn document_size(&self) -> Size;

    /// Size of the visible viewport.
    fn viewport_size(&self) -> Size;

    /// Current scroll position.
    fn scroll_offset(&self) -> ScrollOffset;

    /// Register `handler` for `event`.
    fn listen(&self, event: ViewportEvent, handler: Rc<dyn Fn()>) -> Self::Listener;

    /// Remove a listener previously returned by [`listen`](Self::listen).
    fn unlisten(&self, event: ViewportEvent, listener: Self::Listener);
}

/// Scrollable extent along each axis: document size minus viewport size.
///
/// Not clamped; a document smaller than the viewport yields a negative extent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportMetrics {
    pub scrollable_height: f64,
    pub scrollable_width: f64,
}

impl ViewportMetrics {
    /// Compute metrics from document and viewport sizes.
    pub fn new(document: Size, viewport: Size) -> Self {
        Self {
            scrollable_height: document.height - viewport.height,
            scrollable_width: document.width - viewport.width,
        }
    }

    /// Measure the host's current dimensions.
    pub fn measure<H: ViewportHost + ?Sized>(host: &H) -> Self {
        Self::new(host.document_size(), host.viewport_size())
    }
}

/// Normalized scroll position, each axis in `[0, 1]` while the offset
/// stays inside the scrollable extent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    pub x: f64,
    pub y: f64,
}

impl Progress {
    /// Normalize `offset` against `metrics`. An axis with zero extent reports `0`.
    pub fn compute(metrics: ViewportMetrics, offset: ScrollOffset) -> Self {
        Self {
            x: ratio(offset.x, metrics.scrollable_width),
            y: ratio(offset.y, metrics.scrollable_height),
        }
    }
}

fn ratio(offset: f64, extent: f64) -> f64 {
    if extent == 0.0 { 0.0 } else { offset / extent }
}

/// Callback receiving `(x, y)` progress.
pub type ProgressCallback = Rc<dyn Fn(f64, f64)>;

/// Lifecycle of a [`ScrollObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// Listeners are attached.
    Active,
    /// Listeners are detached and the callback is cleared.
    Destroyed,
}

/// State shared between the observer and its event handlers.
struct Tracker {
    metrics: ViewportMetrics,
    progress: Progress,
    callback: Option<ProgressCallback>,
}

impl Tracker {
    /// Invoke the callback with the stored progress.
    ///
    /// The borrow is released before the callback runs so a callback that
    /// panics or calls back into the observer leaves the state usable.
    fn notify(tracker: &RefCell<Self>) {
        let pending = {
            let state = tracker.borrow();
            state
                .callback
                .clone()
                .map(|callback| (callback, state.progress))
        };

        if let Some((callback, progress)) = pending {
            callback(progress.x, progress.y);
        }
    }

    fn on_scroll<H: ViewportHost + ?Sized>(host: &H, tracker: &RefCell<Self>) {
        {
            let mut state = tracker.borrow_mut();
            let metrics = state.metrics;
            state.progress = Progress::compute(metrics, host.scroll_offset());
        }
        Self::notify(tracker);
    }

    fn on_resize<H: ViewportHost + ?Sized>(host: &H, tracker: &RefCell<Self>) {
        {
            let mut state = tracker.borrow_mut();
            let metrics = ViewportMetrics::measure(host);
            state.metrics = metrics;
            state.progress = Progress::compute(metrics, host.scroll_offset());
        }
        Self::notify(tracker);
    }
}

struct Listeners<L> {
    scroll: L,
    resize: L,
}

/// Tracks normalized scroll progress and reports it to a callback.
///
/// Construction measures the host, calls the callback once with the
/// initial progress and registers `scroll` and `resize` listeners.
/// [`destroy`](Self::destroy) (or dropping the observer) removes them.
pub struct ScrollObserver<H: ViewportHost> {
    host: Rc<H>,
    tracker: Rc<RefCell<Tracker>>,
    listeners: Option<Listeners<H::Listener>>,
}

impl<H: ViewportHost + 'static> ScrollObserver<H> {
    /// Start observing `host`, reporting progress to `callback`.
    pub fn new(host: H, callback: impl Fn(f64, f64) + 'static) -> Self {
        Self::with_callback(host, Rc::new(callback))
    }

    /// Start observing `host` without a consumer.
    ///
    /// Progress is still tracked and available through [`progress`](Self::progress).
    pub fn without_callback(host: H) -> Self {
        Self::with_callback(host, Rc::new(|_, _| {}))
    }

    fn with_callback(host: H, callback: ProgressCallback) -> Self {
        let host = Rc::new(host);
        let metrics = ViewportMetrics::measure(host.as_ref());
        let progress = Progress::compute(metrics, host.scroll_offset());

        let tracker = Rc::new(RefCell::new(Tracker {
            metrics,
            progress,
            callback: Some(callback),
        }));

        Tracker::notify(&tracker);

        let scroll = handler(&host, &tracker, Tracker::on_scroll::<H>);
        let resize = handler(&host, &tracker, Tracker::on_resize::<H>);
        let listeners = Listeners {
            scroll: host.listen(ViewportEvent::Scroll, scroll),
            resize: host.listen(ViewportEvent::Resize, resize),
        };

        Self {
            host,
            tracker,
            listeners: Some(listeners),
        }
    }
}

impl<H: ViewportHost> ScrollObserver<H> {
    /// Call the callback again with the last computed progress.
    ///
    /// Nothing is re-measured. Does nothing once destroyed.
    pub fn trigger(&self) {
        Tracker::notify(&self.tracker);
    }

    /// Remove both listeners and clear the callback. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(listeners) = self.listeners.take() {
            self.host.unlisten(ViewportEvent::Scroll, listeners.scroll);
            self.host.unlisten(ViewportEvent::Resize, listeners.resize);
        }
        self.tracker.borrow_mut().callback = None;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ObserverState {
        if self.listeners.is_some() {
            ObserverState::Active
        } else {
            ObserverState::Destroyed
        }
    }

    /// Last computed progress.
    pub fn progress(&self) -> Progress {
        self.tracker.borrow().progress
    }

    /// Last measured viewport metrics.
    pub fn metrics(&self) -> ViewportMetrics {
        self.tracker.borrow().metrics
    }
}

impl<H: ViewportHost> Drop for ScrollObserver<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<H: ViewportHost> fmt::Debug for ScrollObserver<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollObserver")
            .field("state", &self.state())
            .field("metrics", &self.metrics())
            .field("progress", &self.progress())
            .finish()
    }
}

/// Build an event handler holding weak references, so handlers left
/// registered on a host never keep the observer alive.
fn handler<H: ViewportHost + 'static>(
    host: &Rc<H>,
    tracker: &Rc<RefCell<Tracker>>,
    on_event: fn(&H, &RefCell<Tracker>),
) -> Rc<dyn Fn()> {
    let host: Weak<H> = Rc::downgrade(host);
    let tracker = Rc::downgrade(tracker);
    Rc::new(move || {
        if let (Some(host), Some(tracker)) = (host.upgrade(), tracker.upgrade()) {
            on_event(&host, &tracker);
        }
    })
}

/// [`ViewportHost`] backed by the browser window.
#[derive(Debug, Clone)]
pub struct WindowHost {
    window: web_sys::Window,
}

impl WindowHost {
    /// Wrap the global window, if there is one.
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl ViewportHost for WindowHost {
    type Listener = Closure<dyn Fn()>;

    fn document_size(&self) -> Size {
        let Some(document) = self.window.document() else {
            return Size::default();
        };

        let element: Option<web_sys::Element> = document
            .body()
            .map(Into::into)
            .or_else(|| document.document_element());

        element
            .map(|el| Size::new(f64::from(el.scroll_width()), f64::from(el.scroll_height())))
            .unwrap_or_default()
    }

    fn viewport_size(&self) -> Size {
        Size::new(
            js_number(self.window.inner_width()),
            js_number(self.window.inner_height()),
        )
    }

    fn scroll_offset(&self) -> ScrollOffset {
        let x = self
            .window
            .scroll_x()
            .or_else(|_| self.window.page_x_offset())
            .unwrap_or(0.0);
        let y = self
            .window
            .scroll_y()
            .or_else(|_| self.window.page_y_offset())
            .unwrap_or(0.0);
        ScrollOffset::new(x, y)
    }

    fn listen(&self, event: ViewportEvent, handler: Rc<dyn Fn()>) -> Self::Listener {
        let closure = Closure::<dyn Fn()>::new(move || handler());

        let options = AddEventListenerOptions::new();
        options.set_passive(true);

        if let Err(err) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                event.as_str(),
                closure.as_ref().unchecked_ref(),
                &options,
            )
        {
            log::warn!("failed to add {} listener: {err:?}", event.as_str());
        }

        closure
    }

    fn unlisten(&self, event: ViewportEvent, listener: Self::Listener) {
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback(event.as_str(), listener.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {err:?}", event.as_str());
        }
    }
}

fn js_number(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}


#[cfg(test)]
mod tests {
    use super::{testing::FakeHost, *};

    type Calls = Rc<RefCell<Vec<(f64, f64)>>>;

    fn recorder() -> (Calls, impl Fn(f64, f64) + 'static) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |x, y| sink.borrow_mut().push((x, y)))
    }

    fn article_host() -> FakeHost {
        FakeHost::new(Size::new(1000.0, 2000.0), Size::new(1000.0, 1000.0))
    }

    #[test]
    fn test_metrics_and_progress() {
        let metrics = ViewportMetrics::new(Size::new(1200.0, 2000.0), Size::new(1000.0, 1000.0));
        assert_eq!(metrics.scrollable_height, 1000.0);
        assert_eq!(metrics.scrollable_width, 200.0);

        let progress = Progress::compute(metrics, ScrollOffset::new(50.0, 250.0));
        assert_eq!(progress, Progress { x: 0.25, y: 0.25 });
    }

    #[test]
    fn test_zero_extent_reports_zero() {
        let metrics = ViewportMetrics::new(Size::new(800.0, 900.0), Size::new(800.0, 900.0));
        for offset in [0.0, 10.0, 500.0] {
            let progress = Progress::compute(metrics, ScrollOffset::new(offset, offset));
            assert_eq!(progress, Progress::default());
        }
    }

    #[test]
    fn test_progress_stays_in_unit_range() {
        let metrics = ViewportMetrics::new(Size::new(1500.0, 3000.0), Size::new(1000.0, 700.0));
        for step in 0..=20 {
            let fraction = f64::from(step) / 20.0;
            let offset = ScrollOffset::new(
                fraction * metrics.scrollable_width,
                fraction * metrics.scrollable_height,
            );
            let progress = Progress::compute(metrics, offset);
            assert!((0.0..=1.0).contains(&progress.x), "x = {}", progress.x);
            assert!((0.0..=1.0).contains(&progress.y), "y = {}", progress.y);
        }
    }

    #[test]
    fn test_construction_reports_once() {
        let host = article_host();
        host.set_offset(0.0, 500.0);
        let (calls, callback) = recorder();

        let observer = ScrollObserver::new(host.clone(), callback);

        assert_eq!(*calls.borrow(), vec![(0.0, 0.5)]);
        assert_eq!(observer.state(), ObserverState::Active);
        assert_eq!(host.listener_count(), 2);
    }

    #[test]
    fn test_scroll_scenario() {
        let host = article_host();
        let (calls, callback) = recorder();
        let observer = ScrollObserver::new(host.clone(), callback);

        assert_eq!(observer.metrics().scrollable_height, 1000.0);

        host.scroll_to(0.0, 250.0);
        assert_eq!(observer.progress().y, 0.25);

        host.scroll_to(0.0, 1000.0);
        assert_eq!(observer.progress().y, 1.0);

        let ys: Vec<f64> = calls.borrow().iter().map(|(_, y)| *y).collect();
        assert_eq!(ys, vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_document_fits_viewport() {
        let host = FakeHost::new(Size::new(1000.0, 1000.0), Size::new(1000.0, 1000.0));
        let (calls, callback) = recorder();
        let _observer = ScrollObserver::new(host.clone(), callback);

        host.scroll_to(0.0, 300.0);

        assert!(calls.borrow().iter().all(|&(_, y)| y == 0.0));
    }

    #[test]
    fn test_scroll_does_not_remeasure() {
        let host = article_host();
        let (calls, callback) = recorder();
        let _observer = ScrollObserver::new(host.clone(), callback);

        host.set_document(Size::new(1000.0, 3000.0));
        host.scroll_to(0.0, 500.0);

        assert_eq!(calls.borrow().last(), Some(&(0.0, 0.5)));
    }

    #[test]
    fn test_resize_remeasures() {
        let host = article_host();
        let (calls, callback) = recorder();
        let observer = ScrollObserver::new(host.clone(), callback);

        host.set_offset(0.0, 500.0);
        host.set_viewport(Size::new(1000.0, 1500.0));
        host.dispatch(ViewportEvent::Resize);

        assert_eq!(observer.metrics().scrollable_height, 500.0);
        assert_eq!(calls.borrow().last(), Some(&(0.0, 1.0)));
    }

    #[test]
    fn test_trigger_repeats_last_progress() {
        let host = article_host();
        let (calls, callback) = recorder();
        let observer = ScrollObserver::new(host.clone(), callback);

        host.scroll_to(0.0, 250.0);
        host.set_document(Size::new(1000.0, 5000.0));
        host.set_offset(0.0, 900.0);
        observer.trigger();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], calls[1]);
        assert_eq!(calls[2], (0.0, 0.25));
    }

    #[test]
    fn test_destroy_stops_notifications() {
        let host = article_host();
        let (calls, callback) = recorder();
        let mut observer = ScrollObserver::new(host.clone(), callback);

        observer.destroy();
        host.scroll_to(0.0, 500.0);
        host.dispatch(ViewportEvent::Resize);
        observer.trigger();

        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(observer.state(), ObserverState::Destroyed);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_double_destroy_is_noop() {
        let host = article_host();
        let mut observer = ScrollObserver::without_callback(host.clone());

        observer.destroy();
        observer.destroy();

        assert_eq!(observer.state(), ObserverState::Destroyed);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_without_callback_still_tracks() {
        let host = article_host();
        let observer = ScrollObserver::without_callback(host.clone());

        host.scroll_to(0.0, 750.0);
        observer.trigger();

        assert_eq!(observer.progress().y, 0.75);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let host = article_host();
        let (calls, callback) = recorder();
        {
            let _observer = ScrollObserver::new(host.clone(), callback);
            assert_eq!(host.listener_count(), 2);
        }

        assert_eq!(host.listener_count(), 0);
        host.scroll_to(0.0, 100.0);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_panicking_callback_leaves_observer_usable() {
        let host = article_host();
        let seen: Calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let observer = ScrollObserver::new(host.clone(), move |x, y| {
            sink.borrow_mut().push((x, y));
            if y > 0.9 {
                panic!("progress bar exploded");
            }
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            host.scroll_to(0.0, 1000.0);
        }));
        assert!(result.is_err());

        host.scroll_to(0.0, 100.0);
        assert_eq!(observer.progress().y, 0.1);
        assert_eq!(seen.borrow().last(), Some(&(0.0, 0.1)));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ViewportEvent::Scroll.as_str(), "scroll");
        assert_eq!(ViewportEvent::Resize.as_str(), "resize");
    }
}
