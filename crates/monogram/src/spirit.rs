//! Lifecycle adapter binding fallback avatars to a hosted image element.
//!
//! The host (a DOM binding, a UI toolkit widget, a test double) implements [`ImageHost`] and
//! forwards its configure, load/error and attribute-change notifications to [`ImageSpirit`].
//!
//! ```text
//! Unloaded -> Loading -> Loaded
//! Unloaded -> Loading -> Errored -> FallbackDisplayed
//! Unloaded -> FallbackDisplayed            (no `src` at all)
//! ```

use monogram_core::AvatarGenerator;
use std::sync::Arc;

pub const ATTR_SRC: &str = "src";
pub const ATTR_ALT: &str = "alt";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_WIDTH: &str = "width";
pub const ATTR_HEIGHT: &str = "height";

/// Class added once the element has something to show.
pub const LOADED_CLASS: &str = "ts-loaded";
/// Action dispatched after [`LOADED_CLASS`] is added.
pub const ACTION_DID_LOAD: &str = "ts-action-did-load";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageEvent {
    Load,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Errored,
    FallbackDisplayed,
}

/// The element an [`ImageSpirit`] controls.
pub trait ImageHost {
    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&mut self, name: &str, value: &str);

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Intrinsic width of the decoded image; non-zero once the image is loaded.
    fn natural_width(&self) -> u32;

    fn set_source(&mut self, src: &str);

    fn add_class(&mut self, class: &str);

    /// One-shot subscription; the spirit unsubscribes as soon as the event fires.
    fn subscribe(&mut self, event: ImageEvent);

    fn unsubscribe(&mut self, event: ImageEvent);

    fn dispatch_action(&mut self, action: &str);
}

pub struct ImageSpirit<H> {
    host: H,
    generator: Arc<AvatarGenerator>,
    state: LoadState,
    watching_alt: bool,
}

impl<H: ImageHost> ImageSpirit<H> {
    pub fn new(host: H, generator: Arc<AvatarGenerator>) -> Self {
        Self {
            host,
            generator,
            state: LoadState::Unloaded,
            watching_alt: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn on_configure(&mut self) {
        let src = non_empty(self.host.attribute(ATTR_SRC));
        let alt = non_empty(self.host.attribute(ATTR_ALT));

        if src.is_some() {
            if self.host.natural_width() > 0 {
                self.on_load();
            } else {
                self.state = LoadState::Loading;
                self.host.subscribe(ImageEvent::Load);
                self.host.subscribe(ImageEvent::Error);
            }
            if let Some(alt) = alt {
                if self.lacks_title() {
                    self.host.set_attribute(ATTR_TITLE, &alt);
                }
            }
        } else {
            self.host.subscribe(ImageEvent::Load);
            self.watch_alt();
        }
    }

    pub fn on_event(&mut self, event: ImageEvent) {
        match event {
            ImageEvent::Load => {
                self.host.unsubscribe(ImageEvent::Load);
                self.on_load();
            }
            ImageEvent::Error => {
                self.host.unsubscribe(ImageEvent::Error);
                tracing::debug!("image failed to load; switching to fallback avatar");
                self.state = LoadState::Errored;
                self.watch_alt();
            }
        }
    }

    /// Attribute change notification. Only `alt` is acted on, and only once the spirit watches it.
    pub fn on_att(&mut self, name: &str, value: &str) {
        if name != ATTR_ALT || !self.watching_alt {
            return;
        }
        if value.contains('{') {
            // Unresolved template placeholder; wait for the real value.
            tracing::trace!(value, "skipping fallback for templated alt");
            return;
        }
        if self.lacks_title() {
            self.host.set_attribute(ATTR_TITLE, value);
        }
        if !self.generator.capabilities().base64 {
            tracing::warn!("base64 encoding unavailable; fallback avatar skipped");
            return;
        }
        let src = self.compute_source(value);
        self.host.set_source(&src);
        self.state = LoadState::FallbackDisplayed;
    }

    /// An empty `title` counts as missing.
    fn lacks_title(&self) -> bool {
        non_empty(self.host.attribute(ATTR_TITLE)).is_none()
    }

    fn watch_alt(&mut self) {
        self.watching_alt = true;
        if let Some(alt) = self.host.attribute(ATTR_ALT) {
            self.on_att(ATTR_ALT, &alt);
        }
    }

    fn on_load(&mut self) {
        self.host.add_class(LOADED_CLASS);
        self.host.dispatch_action(ACTION_DID_LOAD);
        if self.state != LoadState::FallbackDisplayed {
            self.state = LoadState::Loaded;
        }
    }

    fn compute_source(&self, name: &str) -> Arc<str> {
        let w = self.host.attribute(ATTR_WIDTH);
        let h = self.host.attribute(ATTR_HEIGHT);
        if (w.is_some() || h.is_some()) && w != h {
            tracing::warn!(
                width = w.as_deref().unwrap_or(""),
                height = h.as_deref().unwrap_or(""),
                "image height must match its width"
            );
        }
        self.generator
            .source(name, parse_px(w.as_deref()), parse_px(h.as_deref()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_px(value: Option<&str>) -> Option<u32> {
    let raw = value?.trim();
    let raw = raw.strip_suffix("px").unwrap_or(raw).trim_end();
    match raw.parse::<u32>() {
        Ok(v) => Some(v),
        Err(_) => {
            if !raw.is_empty() {
                tracing::debug!(value = raw, "ignoring non-numeric image dimension");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_px;

    #[test]
    fn parse_px_accepts_plain_and_px() {
        assert_eq!(parse_px(Some("44")), Some(44));
        assert_eq!(parse_px(Some(" 32px ")), Some(32));
        assert_eq!(parse_px(Some("auto")), None);
        assert_eq!(parse_px(Some("")), None);
        assert_eq!(parse_px(None), None);
    }
}
