use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::constants::{
    CARD_TITLE_FALLBACK, EMPTY_MESSAGE, ERROR_MESSAGE, LOADING_MESSAGE, LOADING_TRIGGER_LABEL,
};
use crate::core::{FetchResponse, Fetcher, Key, MediaRecord};
use crate::fetch::FetchError;
use crate::media::{render_thumbnail, Thumbnail};
use crate::utils::{accessible_label, format_date, non_empty};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("payload contains no records")]
    Empty,
}

/// Parses the response body into records, keeping input order.
pub fn parse_payload(body: &str) -> Result<Vec<MediaRecord>, PayloadError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| PayloadError::Malformed(err.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(PayloadError::Malformed(format!(
                "expected array, found {}",
                json_kind(&other)
            )))
        }
    };
    if items.is_empty() {
        return Err(PayloadError::Empty);
    }
    if let Some((index, item)) = items
        .iter()
        .enumerate()
        .find(|(_, item)| !item.is_object())
    {
        return Err(PayloadError::Malformed(format!(
            "element {index} is {}, expected object",
            json_kind(item)
        )));
    }
    Ok(items.iter().map(MediaRecord::from_value).collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDescriptor {
    pub index: usize,
    pub label: String,
    pub title: String,
    pub date: String,
    pub thumbnail: Thumbnail,
}

impl CardDescriptor {
    pub fn build(index: usize, record: &MediaRecord) -> Self {
        Self {
            index,
            label: accessible_label(record),
            title: non_empty(record.title.as_deref())
                .unwrap_or(CARD_TITLE_FALLBACK)
                .to_string(),
            date: format_date(record.date.as_deref()),
            thumbnail: render_thumbnail(record),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    Empty,
    Error,
}

impl Placeholder {
    pub fn message(&self) -> &'static str {
        match self {
            Placeholder::Loading => LOADING_MESSAGE,
            Placeholder::Empty => EMPTY_MESSAGE,
            Placeholder::Error => ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GalleryState {
    #[default]
    Idle,
    Loading,
    Rendered {
        records: Vec<MediaRecord>,
        cards: Vec<CardDescriptor>,
    },
    Empty,
    Error,
}

impl GalleryState {
    pub fn name(&self) -> &'static str {
        match self {
            GalleryState::Idle => "idle",
            GalleryState::Loading => "loading",
            GalleryState::Rendered { .. } => "rendered",
            GalleryState::Empty => "empty",
            GalleryState::Error => "error",
        }
    }
}

#[derive(Debug)]
pub enum GalleryEvent {
    TriggerActivated,
    FetchCompleted(Result<FetchResponse, FetchError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEffect {
    ShowPlaceholder(Placeholder),
    RenderCards(Vec<CardDescriptor>),
    SetTrigger { enabled: bool, label: String },
}

/// Pure gallery transition. `default_label` is the trigger text restored once
/// a fetch attempt settles, whatever its outcome.
pub fn transition(
    state: GalleryState,
    event: GalleryEvent,
    default_label: &str,
) -> (GalleryState, Vec<GalleryEffect>) {
    match (state, event) {
        (GalleryState::Loading, GalleryEvent::TriggerActivated) => {
            debug!("trigger ignored while a fetch is outstanding");
            (GalleryState::Loading, Vec::new())
        }
        (_, GalleryEvent::TriggerActivated) => (
            GalleryState::Loading,
            vec![
                GalleryEffect::ShowPlaceholder(Placeholder::Loading),
                GalleryEffect::SetTrigger {
                    enabled: false,
                    label: LOADING_TRIGGER_LABEL.to_string(),
                },
            ],
        ),
        (GalleryState::Loading, GalleryEvent::FetchCompleted(result)) => {
            let (next, content) = settle(result);
            let effects = vec![
                content,
                GalleryEffect::SetTrigger {
                    enabled: true,
                    label: default_label.to_string(),
                },
            ];
            (next, effects)
        }
        (other, GalleryEvent::FetchCompleted(_)) => {
            warn!(state = other.name(), "fetch completion without a pending fetch");
            (other, Vec::new())
        }
    }
}

fn settle(result: Result<FetchResponse, FetchError>) -> (GalleryState, GalleryEffect) {
    let response = match result.and_then(|response| {
        if response.is_success() {
            Ok(response)
        } else {
            Err(FetchError::Status(response.status))
        }
    }) {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "unable to load media records");
            return (
                GalleryState::Error,
                GalleryEffect::ShowPlaceholder(Placeholder::Error),
            );
        }
    };

    // Malformed bodies land in the empty state alongside `[]`.
    match parse_payload(&response.body) {
        Ok(records) => {
            let cards: Vec<_> = records
                .iter()
                .enumerate()
                .map(|(index, record)| CardDescriptor::build(index, record))
                .collect();
            debug!(cards = cards.len(), "gallery rendered");
            (
                GalleryState::Rendered {
                    records,
                    cards: cards.clone(),
                },
                GalleryEffect::RenderCards(cards),
            )
        }
        Err(err) => {
            match &err {
                PayloadError::Malformed(reason) => warn!(%reason, "malformed media payload"),
                PayloadError::Empty => debug!("media payload is empty"),
            }
            (
                GalleryState::Empty,
                GalleryEffect::ShowPlaceholder(Placeholder::Empty),
            )
        }
    }
}

/// Owns the fetch lifecycle and the trigger control's default label.
pub struct Gallery {
    data_url: String,
    trigger_label: String,
    state: GalleryState,
}

impl Gallery {
    pub fn new(data_url: impl Into<String>, trigger_label: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
            trigger_label: trigger_label.into(),
            state: GalleryState::Idle,
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn trigger_label(&self) -> &str {
        &self.trigger_label
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, GalleryState::Loading)
    }

    pub fn cards(&self) -> &[CardDescriptor] {
        match &self.state {
            GalleryState::Rendered { cards, .. } => cards,
            _ => &[],
        }
    }

    /// The record behind card `index` of the current render.
    pub fn record(&self, index: usize) -> Option<&MediaRecord> {
        match &self.state {
            GalleryState::Rendered { records, .. } => records.get(index),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: GalleryEvent) -> Vec<GalleryEffect> {
        let current = std::mem::take(&mut self.state);
        let (next, effects) = transition(current, event, &self.trigger_label);
        self.state = next;
        effects
    }

    /// Starts a fetch. Returns `None` when one is already outstanding.
    pub fn begin_fetch(&mut self) -> Option<Vec<GalleryEffect>> {
        if self.is_loading() {
            debug!("fetch already in flight");
            return None;
        }
        Some(self.handle(GalleryEvent::TriggerActivated))
    }

    pub fn complete_fetch(
        &mut self,
        result: Result<FetchResponse, FetchError>,
    ) -> Vec<GalleryEffect> {
        self.handle(GalleryEvent::FetchCompleted(result))
    }

    /// Runs a whole fetch attempt, returning the loading effects followed by
    /// the settling ones.
    pub async fn trigger_fetch<F: Fetcher>(&mut self, fetcher: &F) -> Vec<GalleryEffect> {
        let Some(mut effects) = self.begin_fetch() else {
            return Vec::new();
        };
        debug!(url = %self.data_url, "fetching media records");
        let result = fetcher.get(&self.data_url).await;
        effects.extend(self.complete_fetch(result));
        effects
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardInput {
    Pointer,
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Activation {
    pub open: bool,
    pub prevent_default: bool,
}

/// Cards open on a primary click, or on Enter/Space while focused. Space also
/// suppresses its default scroll.
pub fn card_activation(input: CardInput) -> Activation {
    match input {
        CardInput::Pointer => Activation {
            open: true,
            prevent_default: false,
        },
        CardInput::Key(Key::Enter) | CardInput::Key(Key::Space) => Activation {
            open: true,
            prevent_default: true,
        },
        CardInput::Key(_) => Activation::default(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::MediaType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct FakeFetcher {
        pub response: Result<(u16, String), String>,
        pub calls: AtomicUsize,
    }

    impl FakeFetcher {
        pub(crate) fn ok(status: u16, body: &str) -> Self {
            Self {
                response: Ok((status, body.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(reason: &str) -> Self {
            Self {
                response: Err(reason.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Fetcher for FakeFetcher {
        async fn get(&self, _url: &str) -> Result<FetchResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok((status, body)) => Ok(FetchResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Err(reason) => Err(FetchError::Network(reason.clone())),
            }
        }
    }

    const THREE: &str = r#"[
        {"title": "Horsehead", "date": "2024-06-01", "media_type": "image", "url": "a.jpg"},
        {"date": "2024-06-02", "media_type": "video", "url": "https://youtu.be/x"},
        {"title": "Pillars", "date": "mid June", "media_type": "image", "url": "c.jpg"}
    ]"#;

    fn restored(effects: &[GalleryEffect]) -> bool {
        matches!(
            effects.last(),
            Some(GalleryEffect::SetTrigger { enabled: true, label }) if label == "Fetch"
        )
    }

    #[tokio::test]
    async fn renders_one_card_per_record_in_order() {
        let fetcher = FakeFetcher::ok(200, THREE);
        let mut gallery = Gallery::new("https://data.test/data.json", "Fetch");
        let effects = gallery.trigger_fetch(&fetcher).await;

        assert_eq!(
            effects[0],
            GalleryEffect::ShowPlaceholder(Placeholder::Loading)
        );
        assert_eq!(
            effects[1],
            GalleryEffect::SetTrigger {
                enabled: false,
                label: "Loading...".into()
            }
        );
        let cards = match &effects[2] {
            GalleryEffect::RenderCards(cards) => cards,
            other => panic!("unexpected effect {other:?}"),
        };
        let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Horsehead", "Untitled Space Image", "Pillars"]);
        assert_eq!(cards[1].index, 1);
        assert!(cards[1].thumbnail.is_video);
        assert!(restored(&effects));
        assert_eq!(gallery.cards().len(), 3);
        assert_eq!(
            gallery.record(2).and_then(|r| r.title.as_deref()),
            Some("Pillars")
        );
    }

    #[tokio::test]
    async fn missing_titles_use_fallback_text() {
        let fetcher = FakeFetcher::ok(200, THREE);
        let mut gallery = Gallery::new("u", "Fetch");
        gallery.trigger_fetch(&fetcher).await;
        let card = &gallery.cards()[1];
        assert_eq!(card.label, "View details for NASA media from June 2, 2024.");
        assert!(!card.title.is_empty());
    }

    #[tokio::test]
    async fn unparseable_dates_are_shown_verbatim() {
        let fetcher = FakeFetcher::ok(200, THREE);
        let mut gallery = Gallery::new("u", "Fetch");
        gallery.trigger_fetch(&fetcher).await;
        assert_eq!(gallery.cards()[2].date, "mid June");
        assert_eq!(gallery.cards()[0].date, "June 1, 2024");
    }

    #[tokio::test]
    async fn server_errors_end_in_error_state() {
        let fetcher = FakeFetcher::ok(500, "oops");
        let mut gallery = Gallery::new("u", "Fetch");
        let effects = gallery.trigger_fetch(&fetcher).await;
        assert_eq!(gallery.state(), &GalleryState::Error);
        assert!(effects.contains(&GalleryEffect::ShowPlaceholder(Placeholder::Error)));
        assert!(restored(&effects));
    }

    #[tokio::test]
    async fn network_failures_end_in_error_state() {
        let fetcher = FakeFetcher::failing("connection refused");
        let mut gallery = Gallery::new("u", "Fetch");
        let effects = gallery.trigger_fetch(&fetcher).await;
        assert_eq!(gallery.state(), &GalleryState::Error);
        assert!(restored(&effects));
    }

    #[tokio::test]
    async fn empty_and_malformed_payloads_end_in_empty_state() {
        for body in ["[]", "{\"title\": 1}", "not json", "null"] {
            let fetcher = FakeFetcher::ok(200, body);
            let mut gallery = Gallery::new("u", "Fetch");
            let effects = gallery.trigger_fetch(&fetcher).await;
            assert_eq!(gallery.state(), &GalleryState::Empty, "body {body}");
            assert!(effects.contains(&GalleryEffect::ShowPlaceholder(Placeholder::Empty)));
            assert!(restored(&effects));
        }
    }

    #[tokio::test]
    async fn refetch_discards_previous_cards() {
        let mut gallery = Gallery::new("u", "Fetch");
        gallery.trigger_fetch(&FakeFetcher::ok(200, THREE)).await;
        assert_eq!(gallery.cards().len(), 3);
        gallery.trigger_fetch(&FakeFetcher::ok(404, "")).await;
        assert!(gallery.cards().is_empty());
        assert!(gallery.record(0).is_none());
    }

    #[test]
    fn trigger_is_ignored_while_loading() {
        let mut gallery = Gallery::new("u", "Fetch");
        assert!(gallery.begin_fetch().is_some());
        assert!(gallery.is_loading());
        assert!(gallery.begin_fetch().is_none());
        assert!(gallery.handle(GalleryEvent::TriggerActivated).is_empty());
        assert!(gallery.is_loading());
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut gallery = Gallery::new("u", "Fetch");
        let effects = gallery.complete_fetch(Ok(FetchResponse {
            status: 200,
            body: THREE.into(),
        }));
        assert!(effects.is_empty());
        assert_eq!(gallery.state(), &GalleryState::Idle);
    }

    #[test]
    fn payload_parsing_distinguishes_errors() {
        assert_eq!(parse_payload("[]"), Err(PayloadError::Empty));
        assert!(matches!(
            parse_payload("{}"),
            Err(PayloadError::Malformed(_))
        ));
        let records = parse_payload(r#"[{"media_type": "video"}, {}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].media_type, MediaType::Video);
    }

    #[test]
    fn non_object_elements_are_malformed() {
        assert!(matches!(
            parse_payload("[null, 3]"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            parse_payload(r#"[{"title": "Orion"}, "x"]"#),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn non_object_elements_end_in_empty_state() {
        let fetcher = FakeFetcher::ok(200, r#"[null, 3, "x"]"#);
        let mut gallery = Gallery::new("u", "Fetch");
        let effects = gallery.trigger_fetch(&fetcher).await;
        assert_eq!(gallery.state(), &GalleryState::Empty);
        assert!(gallery.cards().is_empty());
        assert!(effects.contains(&GalleryEffect::ShowPlaceholder(Placeholder::Empty)));
        assert!(restored(&effects));
    }

    #[test]
    fn card_keyboard_activation() {
        assert_eq!(
            card_activation(CardInput::Key(Key::Space)),
            Activation {
                open: true,
                prevent_default: true
            }
        );
        assert!(card_activation(CardInput::Key(Key::Enter)).open);
        assert!(card_activation(CardInput::Pointer).open);
        assert!(!card_activation(CardInput::Key(Key::Escape)).open);
        assert!(!card_activation(CardInput::Key(Key::Other)).open);
    }
}
