use crate::core::Focus;
use crate::gallery::{CardDescriptor, GalleryEffect, Placeholder};
use crate::modal::{ModalContent, ModalEffect, ModalMedia};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryPane {
    #[default]
    Blank,
    Placeholder(Placeholder),
    Cards(Vec<CardDescriptor>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerControl {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Overlay {
    pub visible: bool,
    pub title: String,
    pub date: String,
    pub text: String,
    pub media: Option<ModalMedia>,
}

/// In-memory stand-in for the document: everything the controllers can
/// change, and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub banner: Option<String>,
    pub trigger: TriggerControl,
    pub gallery: GalleryPane,
    pub overlay: Overlay,
    pub modal_open: bool,
    focus: Option<Focus>,
}

impl Surface {
    pub fn new(trigger_label: &str, banner: Option<String>) -> Self {
        Self {
            banner,
            trigger: TriggerControl {
                enabled: true,
                label: trigger_label.to_string(),
            },
            gallery: GalleryPane::Blank,
            overlay: Overlay::default(),
            modal_open: false,
            focus: Some(Focus::Trigger),
        }
    }

    pub fn focused(&self) -> Option<Focus> {
        self.focus
    }

    pub fn card_count(&self) -> usize {
        match &self.gallery {
            GalleryPane::Cards(cards) => cards.len(),
            _ => 0,
        }
    }

    /// Moves focus to `target` if it currently exists on the surface.
    pub fn set_focus(&mut self, target: Focus) -> bool {
        let exists = match target {
            Focus::Trigger => true,
            Focus::Card(index) => index < self.card_count(),
            Focus::Close => self.overlay.visible,
        };
        if exists {
            self.focus = Some(target);
        }
        exists
    }

    pub fn apply_gallery(&mut self, effects: Vec<GalleryEffect>) {
        for effect in effects {
            match effect {
                GalleryEffect::ShowPlaceholder(placeholder) => {
                    self.gallery = GalleryPane::Placeholder(placeholder);
                }
                GalleryEffect::RenderCards(cards) => {
                    self.gallery = GalleryPane::Cards(cards);
                }
                GalleryEffect::SetTrigger { enabled, label } => {
                    self.trigger = TriggerControl { enabled, label };
                }
            }
            self.drop_stale_focus();
        }
    }

    pub fn apply_modal(&mut self, effects: Vec<ModalEffect>) {
        for effect in effects {
            match effect {
                ModalEffect::ClearMedia => self.overlay.media = None,
                ModalEffect::SetContent(ModalContent {
                    title,
                    date,
                    text,
                    media,
                }) => {
                    self.overlay.title = title;
                    self.overlay.date = date;
                    self.overlay.text = text;
                    self.overlay.media = Some(media);
                }
                ModalEffect::SetOverlayVisible(visible) => {
                    self.overlay.visible = visible;
                    self.drop_stale_focus();
                }
                ModalEffect::SetBodyMarker(on) => self.modal_open = on,
                ModalEffect::MoveFocus(target) => {
                    self.set_focus(target);
                }
            }
        }
    }

    fn drop_stale_focus(&mut self) {
        let stale = match self.focus {
            Some(Focus::Card(index)) => index >= self.card_count(),
            Some(Focus::Close) => !self.overlay.visible,
            _ => false,
        };
        if stale {
            self.focus = None;
        }
    }
}
