use tracing::debug;

use crate::core::{FetchResponse, Fetcher, Focus, Key, PointerTarget};
use crate::fetch::FetchError;
use crate::gallery::{card_activation, Activation, CardInput, Gallery};
use crate::modal::{Modal, ModalEvent};
use crate::surface::Surface;

/// Follow-up work the host loop must perform after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartFetch,
    /// Space reached the page without being consumed by a control.
    ScrollPage,
}

/// Wires the gallery and the single modal to one render surface.
pub struct App {
    pub gallery: Gallery,
    pub modal: Modal,
    pub surface: Surface,
}

impl App {
    pub fn new(gallery: Gallery, banner: Option<String>) -> Self {
        let surface = Surface::new(gallery.trigger_label(), banner);
        Self {
            gallery,
            modal: Modal::new(),
            surface,
        }
    }

    pub fn data_url(&self) -> &str {
        self.gallery.data_url()
    }

    /// Activates the trigger control. Returns `Some` when a fetch must be
    /// issued; a disabled trigger does nothing.
    pub fn press_trigger(&mut self) -> Option<Command> {
        if !self.surface.trigger.enabled {
            debug!("trigger disabled");
            return None;
        }
        let effects = self.gallery.begin_fetch()?;
        self.surface.apply_gallery(effects);
        Some(Command::StartFetch)
    }

    pub fn fetch_completed(&mut self, result: Result<FetchResponse, FetchError>) {
        let effects = self.gallery.complete_fetch(result);
        self.surface.apply_gallery(effects);
    }

    /// Full fetch round trip without a host loop.
    pub async fn refresh<F: Fetcher>(&mut self, fetcher: &F) {
        if !self.surface.trigger.enabled {
            return;
        }
        let effects = self.gallery.trigger_fetch(fetcher).await;
        self.surface.apply_gallery(effects);
    }

    pub fn activate_card(&mut self, index: usize, input: CardInput) -> Activation {
        let activation = card_activation(input);
        if !activation.open {
            return activation;
        }
        if let Some(record) = self.gallery.record(index).cloned() {
            let effects = self.modal.show(record, self.surface.focused());
            self.surface.apply_modal(effects);
        }
        activation
    }

    pub fn pointer(&mut self, target: PointerTarget) -> Option<Command> {
        if self.modal.is_open() {
            let effects = self
                .modal
                .handle(ModalEvent::Pointer(target), self.surface.focused());
            self.surface.apply_modal(effects);
            return None;
        }
        match target {
            PointerTarget::Trigger => {
                self.surface.set_focus(Focus::Trigger);
                self.press_trigger()
            }
            PointerTarget::Card(index) => {
                self.surface.set_focus(Focus::Card(index));
                self.activate_card(index, CardInput::Pointer);
                None
            }
            _ => None,
        }
    }

    pub fn key(&mut self, key: Key) -> Option<Command> {
        if key == Key::Escape {
            let effects = self
                .modal
                .handle(ModalEvent::Key(Key::Escape), self.surface.focused());
            self.surface.apply_modal(effects);
            return None;
        }
        if !matches!(key, Key::Enter | Key::Space) {
            return None;
        }
        match self.surface.focused() {
            Some(Focus::Close) if self.modal.is_open() => {
                let effects = self.modal.close();
                self.surface.apply_modal(effects);
                None
            }
            Some(Focus::Trigger) if !self.modal.is_open() => self.press_trigger(),
            Some(Focus::Card(index)) if !self.modal.is_open() => {
                let activation = self.activate_card(index, CardInput::Key(key));
                if activation.prevent_default {
                    None
                } else {
                    Some(Command::ScrollPage)
                }
            }
            _ if key == Key::Space && !self.modal.is_open() => Some(Command::ScrollPage),
            _ => None,
        }
    }

    /// Tab order: trigger, then cards. Focus stays on the close control while
    /// the overlay is up.
    pub fn focus_next(&mut self, forward: bool) {
        if self.modal.is_open() {
            self.surface.set_focus(Focus::Close);
            return;
        }
        let stops = self.surface.card_count() + 1;
        let current = match self.surface.focused() {
            Some(Focus::Card(index)) => index + 1,
            Some(Focus::Trigger) => 0,
            _ => {
                self.surface.set_focus(Focus::Trigger);
                return;
            }
        };
        let next = if forward {
            (current + 1) % stops
        } else {
            (current + stops - 1) % stops
        };
        let target = if next == 0 {
            Focus::Trigger
        } else {
            Focus::Card(next - 1)
        };
        self.surface.set_focus(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::tests::FakeFetcher;
    use crate::gallery::{GalleryState, Placeholder};
    use crate::surface::GalleryPane;

    const RECORDS: &str = r#"[
        {"title": "Orion", "date": "2024-06-01", "media_type": "image", "url": "a.jpg"},
        {"title": "Launch", "date": "2024-06-02", "media_type": "video", "url": "https://youtu.be/abc123?t=5"}
    ]"#;

    fn app() -> App {
        App::new(Gallery::new("https://data.test/data.json", "Fetch Space Images"), None)
    }

    #[tokio::test]
    async fn server_error_restores_trigger_and_leaves_modal_alone() {
        let mut app = app();
        app.refresh(&FakeFetcher::ok(500, "")).await;
        assert_eq!(app.gallery.state(), &GalleryState::Error);
        assert_eq!(
            app.surface.gallery,
            GalleryPane::Placeholder(Placeholder::Error)
        );
        assert!(app.surface.trigger.enabled);
        assert_eq!(app.surface.trigger.label, "Fetch Space Images");
        assert!(!app.modal.is_open());
        assert!(!app.surface.overlay.visible);
    }

    #[tokio::test]
    async fn empty_body_shows_empty_placeholder() {
        let mut app = app();
        app.refresh(&FakeFetcher::ok(200, "[]")).await;
        assert_eq!(app.gallery.state(), &GalleryState::Empty);
        assert_eq!(
            app.surface.gallery,
            GalleryPane::Placeholder(Placeholder::Empty)
        );
    }

    #[tokio::test]
    async fn escape_returns_focus_to_activated_card() {
        let mut app = app();
        app.refresh(&FakeFetcher::ok(200, RECORDS)).await;
        app.focus_next(true);
        app.focus_next(true);
        assert_eq!(app.surface.focused(), Some(Focus::Card(1)));

        assert_eq!(app.key(Key::Enter), None);
        assert!(app.modal.is_open());
        assert!(app.surface.modal_open);
        assert_eq!(app.surface.focused(), Some(Focus::Close));
        assert_eq!(app.surface.overlay.title, "Launch");

        app.key(Key::Escape);
        assert!(!app.modal.is_open());
        assert!(!app.surface.overlay.visible);
        assert!(app.surface.overlay.media.is_none());
        assert_eq!(app.surface.focused(), Some(Focus::Card(1)));
    }

    #[tokio::test]
    async fn clicking_a_card_then_backdrop() {
        let mut app = app();
        app.refresh(&FakeFetcher::ok(200, RECORDS)).await;
        app.pointer(PointerTarget::Card(0));
        assert!(app.modal.is_open());
        app.pointer(PointerTarget::Window);
        assert!(app.modal.is_open());
        app.pointer(PointerTarget::Backdrop);
        assert!(!app.modal.is_open());
        assert_eq!(app.surface.focused(), Some(Focus::Card(0)));
    }

    #[test]
    fn trigger_cannot_reenter_while_loading() {
        let mut app = app();
        assert_eq!(app.press_trigger(), Some(Command::StartFetch));
        assert!(!app.surface.trigger.enabled);
        assert_eq!(app.surface.trigger.label, "Loading...");
        assert_eq!(app.press_trigger(), None);
        assert_eq!(app.pointer(PointerTarget::Trigger), None);

        app.fetch_completed(Err(FetchError::Network("offline".into())));
        assert!(app.surface.trigger.enabled);
        assert_eq!(app.press_trigger(), Some(Command::StartFetch));
    }

    #[tokio::test]
    async fn space_without_a_focused_control_scrolls() {
        let mut app = app();
        app.refresh(&FakeFetcher::ok(200, RECORDS)).await;
        app.focus_next(true);
        assert_eq!(app.surface.focused(), Some(Focus::Card(0)));
        app.refresh(&FakeFetcher::ok(200, "[]")).await;
        assert_eq!(app.surface.focused(), None);
        assert_eq!(app.key(Key::Space), Some(Command::ScrollPage));
        assert_eq!(app.key(Key::Enter), None);
    }

    #[test]
    fn tab_order_wraps_over_trigger_and_cards() {
        let mut app = app();
        app.focus_next(true);
        assert_eq!(app.surface.focused(), Some(Focus::Trigger));
        app.focus_next(false);
        assert_eq!(app.surface.focused(), Some(Focus::Trigger));
    }
}
