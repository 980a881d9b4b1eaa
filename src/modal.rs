use tracing::debug;

use crate::constants::{EXPLANATION_FALLBACK, MODAL_TITLE_FALLBACK};
use crate::core::{Focus, Key, MediaRecord, PointerTarget};
use crate::media::{render_detail, MediaDescriptor};
use crate::utils::{format_date, non_empty};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        record: MediaRecord,
        prior_focus: Option<Focus>,
    },
}

/// What fills the overlay's media slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMedia {
    Node(MediaDescriptor),
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub date: String,
    pub text: String,
    pub media: ModalMedia,
}

impl ModalContent {
    pub fn build(record: &MediaRecord) -> Self {
        let media = match render_detail(record) {
            MediaDescriptor::Unavailable { message } => ModalMedia::Message(message),
            descriptor => ModalMedia::Node(descriptor),
        };
        Self {
            title: non_empty(record.title.as_deref())
                .unwrap_or(MODAL_TITLE_FALLBACK)
                .to_string(),
            date: format_date(record.date.as_deref()),
            text: non_empty(record.explanation.as_deref())
                .unwrap_or(EXPLANATION_FALLBACK)
                .to_string(),
            media,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ModalEvent {
    Show(MediaRecord),
    Close,
    Pointer(PointerTarget),
    Key(Key),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEffect {
    ClearMedia,
    SetContent(ModalContent),
    SetOverlayVisible(bool),
    SetBodyMarker(bool),
    MoveFocus(Focus),
}

/// Pure modal transition. `focused` is whatever holds keyboard focus when the
/// event arrives.
pub fn transition(
    state: ModalState,
    event: ModalEvent,
    focused: Option<Focus>,
) -> (ModalState, Vec<ModalEffect>) {
    match event {
        ModalEvent::Show(record) => {
            // Re-showing keeps the focus captured when the overlay first opened.
            let prior_focus = match state {
                ModalState::Open { prior_focus, .. } => prior_focus,
                ModalState::Closed => focused,
            };
            let effects = vec![
                ModalEffect::ClearMedia,
                ModalEffect::SetContent(ModalContent::build(&record)),
                ModalEffect::SetOverlayVisible(true),
                ModalEffect::SetBodyMarker(true),
                ModalEffect::MoveFocus(Focus::Close),
            ];
            debug!(title = ?record.title, "modal opened");
            (
                ModalState::Open {
                    record,
                    prior_focus,
                },
                effects,
            )
        }
        ModalEvent::Close => close(state),
        ModalEvent::Pointer(
            PointerTarget::Close | PointerTarget::Backdrop | PointerTarget::OverlayRoot,
        ) => close(state),
        ModalEvent::Key(Key::Escape) if matches!(state, ModalState::Open { .. }) => close(state),
        ModalEvent::Pointer(_) | ModalEvent::Key(_) => (state, Vec::new()),
    }
}

fn close(state: ModalState) -> (ModalState, Vec<ModalEffect>) {
    let prior_focus = match state {
        ModalState::Closed => return (ModalState::Closed, Vec::new()),
        ModalState::Open { prior_focus, .. } => prior_focus,
    };
    let mut effects = vec![
        ModalEffect::SetOverlayVisible(false),
        ModalEffect::SetBodyMarker(false),
        ModalEffect::ClearMedia,
    ];
    if let Some(target) = prior_focus {
        effects.push(ModalEffect::MoveFocus(target));
    }
    debug!("modal closed");
    (ModalState::Closed, effects)
}

/// The single detail overlay. Built once at start-up and passed to whoever
/// needs to open it.
#[derive(Debug, Default)]
pub struct Modal {
    state: ModalState,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn handle(&mut self, event: ModalEvent, focused: Option<Focus>) -> Vec<ModalEffect> {
        let current = std::mem::take(&mut self.state);
        let (next, effects) = transition(current, event, focused);
        self.state = next;
        effects
    }

    pub fn show(&mut self, record: MediaRecord, focused: Option<Focus>) -> Vec<ModalEffect> {
        self.handle(ModalEvent::Show(record), focused)
    }

    pub fn close(&mut self) -> Vec<ModalEffect> {
        self.handle(ModalEvent::Close, None)
    }
}
