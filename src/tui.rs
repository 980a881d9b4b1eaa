use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{App, Command};
use crate::constants::{FACT_HEADING, VIDEO_BADGE};
use crate::core::{FetchResponse, Fetcher, Focus, Key, PointerTarget};
use crate::fetch::FetchError;
use crate::gallery::CardDescriptor;
use crate::media::MediaDescriptor;
use crate::modal::ModalMedia;
use crate::surface::GalleryPane;

const CARD_HEIGHT: u16 = 4;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

const COLOR_ACCENT: Color = Color::Rgb(137, 180, 250);
const COLOR_MUTED: Color = Color::Rgb(127, 132, 156);
const COLOR_BADGE: Color = Color::Rgb(243, 139, 168);

/// Text lines describing a media descriptor, shared with the plain printer.
pub fn media_lines(media: &MediaDescriptor) -> Vec<String> {
    match media {
        MediaDescriptor::Image { src, alt } => vec![format!("Image: {alt}"), src.clone()],
        MediaDescriptor::VideoEmbed { embed_url, title } => {
            vec![format!("Embedded player: {title}"), embed_url.clone()]
        }
        MediaDescriptor::VideoFile { src, title } => {
            vec![format!("Video file: {title}"), src.clone()]
        }
        MediaDescriptor::ExternalLink { href, label } => vec![label.clone(), href.clone()],
        MediaDescriptor::VideoPlaceholder { label } => vec![format!("\u{25b6} {label}")],
        MediaDescriptor::Unavailable { message } => vec![message.clone()],
    }
}

pub fn modal_media_lines(media: &ModalMedia) -> Vec<String> {
    match media {
        ModalMedia::Node(descriptor) => media_lines(descriptor),
        ModalMedia::Message(message) => vec![message.clone()],
    }
}

/// Hit-test rectangles from the most recent frame.
#[derive(Default)]
struct Regions {
    trigger: Rect,
    cards: Vec<(usize, Rect)>,
    overlay: Option<Rect>,
    window: Option<Rect>,
    close: Option<Rect>,
}

impl Regions {
    fn hit(&self, column: u16, row: u16) -> PointerTarget {
        if let Some(window) = self.window {
            if self.close.is_some_and(|close| contains(close, column, row)) {
                return PointerTarget::Close;
            }
            if contains(window, column, row) {
                return PointerTarget::Window;
            }
            let ring = grow(window, 1);
            if contains(ring, column, row) {
                return PointerTarget::OverlayRoot;
            }
            if self.overlay.is_some_and(|overlay| contains(overlay, column, row)) {
                return PointerTarget::Backdrop;
            }
        }
        if contains(self.trigger, column, row) {
            return PointerTarget::Trigger;
        }
        self.cards
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(index, _)| PointerTarget::Card(*index))
            .unwrap_or(PointerTarget::Elsewhere)
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn grow(rect: Rect, by: u16) -> Rect {
    Rect::new(
        rect.x.saturating_sub(by),
        rect.y.saturating_sub(by),
        rect.width.saturating_add(by * 2),
        rect.height.saturating_add(by * 2),
    )
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let scale =
        |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

struct View {
    regions: Regions,
    scroll: usize,
    visible_cards: usize,
}

impl View {
    fn new() -> Self {
        Self {
            regions: Regions::default(),
            scroll: 0,
            visible_cards: 1,
        }
    }

    fn follow_focus(&mut self, focus: Option<Focus>, count: usize) {
        if let Some(Focus::Card(index)) = focus {
            if index < self.scroll {
                self.scroll = index;
            } else if index >= self.scroll + self.visible_cards {
                self.scroll = index + 1 - self.visible_cards;
            }
        }
        self.scroll = self.scroll.min(count.saturating_sub(1));
    }

    fn scroll_page(&mut self, count: usize) {
        let last = count.saturating_sub(self.visible_cards);
        self.scroll = (self.scroll + self.visible_cards).min(last);
    }
}

pub async fn run_tui<F>(mut app: App, fetcher: F) -> anyhow::Result<()>
where
    F: Fetcher + Clone + 'static,
{
    enable_raw_mode().context("enabling raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = event_loop(&mut terminal, &mut app, fetcher).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

async fn event_loop<F>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    fetcher: F,
) -> anyhow::Result<()>
where
    F: Fetcher + Clone + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Result<FetchResponse, FetchError>>();
    let mut view = View::new();

    loop {
        while let Ok(result) = rx.try_recv() {
            app.fetch_completed(result);
        }

        view.follow_focus(app.surface.focused(), app.surface.card_count());
        terminal.draw(|frame| draw(frame, app, &mut view))?;

        if !event::poll(Duration::ZERO)? {
            tokio::time::sleep(FRAME_INTERVAL).await;
            continue;
        }

        let command = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if is_quit(&key) {
                    break;
                }
                match key.code {
                    KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                        app.focus_next(true);
                        None
                    }
                    KeyCode::BackTab | KeyCode::Up | KeyCode::Left => {
                        app.focus_next(false);
                        None
                    }
                    code => app.key(map_key(code)),
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => app.pointer(view.regions.hit(column, row)),
            _ => None,
        };

        match command {
            Some(Command::StartFetch) => {
                let fetcher = fetcher.clone();
                let url = app.data_url().to_string();
                let tx = tx.clone();
                debug!(%url, "spawning fetch");
                tokio::spawn(async move {
                    let result = fetcher.get(&url).await;
                    tx.send(result).ok();
                });
            }
            Some(Command::ScrollPage) => view.scroll_page(app.surface.card_count()),
            None => {}
        }
    }
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    }
}

fn draw(frame: &mut Frame, app: &App, view: &mut View) {
    let area = frame.size();
    let surface = &app.surface;
    let banner_height = if surface.banner.is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    if let Some(fact) = &surface.banner {
        let banner = Paragraph::new(fact.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(FACT_HEADING)
                    .border_style(Style::default().fg(COLOR_ACCENT)),
            );
        frame.render_widget(banner, chunks[0]);
    }

    let mut regions = Regions::default();
    let trigger_width = (surface.trigger.label.chars().count() as u16 + 6).min(chunks[1].width);
    regions.trigger = Rect::new(
        chunks[1].x,
        chunks[1].y,
        trigger_width,
        chunks[1].height.min(3),
    );
    let mut trigger_style = Style::default();
    if !surface.trigger.enabled {
        trigger_style = trigger_style.fg(COLOR_MUTED);
    } else if surface.focused() == Some(Focus::Trigger) && !surface.overlay.visible {
        trigger_style = trigger_style.fg(COLOR_ACCENT).add_modifier(Modifier::BOLD);
    }
    let trigger = Paragraph::new(surface.trigger.label.as_str())
        .style(trigger_style)
        .block(Block::default().borders(Borders::ALL).border_style(trigger_style));
    frame.render_widget(trigger, regions.trigger);

    let gallery_area = chunks[2];
    match &surface.gallery {
        GalleryPane::Blank => {}
        GalleryPane::Placeholder(placeholder) => {
            let text = Paragraph::new(placeholder.message())
                .style(Style::default().fg(COLOR_MUTED))
                .wrap(Wrap { trim: true });
            frame.render_widget(text, gallery_area);
        }
        GalleryPane::Cards(cards) => {
            view.visible_cards = ((gallery_area.height / CARD_HEIGHT) as usize).max(1);
            for (slot, card) in cards
                .iter()
                .skip(view.scroll)
                .take(view.visible_cards)
                .enumerate()
            {
                let rect = Rect::new(
                    gallery_area.x,
                    gallery_area.y + slot as u16 * CARD_HEIGHT,
                    gallery_area.width,
                    CARD_HEIGHT,
                );
                let focused = surface.focused() == Some(Focus::Card(card.index));
                draw_card(frame, card, rect, focused);
                regions.cards.push((card.index, rect));
            }
        }
    }

    let help = Paragraph::new(Line::from(Span::styled(
        "tab/arrows move  enter/space open  esc close  q quit",
        Style::default().fg(COLOR_MUTED),
    )));
    frame.render_widget(help, chunks[3]);

    if surface.overlay.visible {
        draw_overlay(frame, app, area, &mut regions);
    }
    view.regions = regions;
}

fn draw_card(frame: &mut Frame, card: &CardDescriptor, rect: Rect, focused: bool) {
    let border = if focused {
        Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut media = vec![Span::raw(
        media_lines(&card.thumbnail.media)
            .into_iter()
            .next()
            .unwrap_or_default(),
    )];
    if card.thumbnail.is_video {
        media.insert(
            0,
            Span::styled(format!("[{VIDEO_BADGE}] "), Style::default().fg(COLOR_BADGE)),
        );
    }
    let body = vec![
        Line::from(Span::styled(
            card.date.as_str(),
            Style::default().fg(COLOR_MUTED),
        )),
        Line::from(media),
    ];
    let widget = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(card.title.as_str()),
    );
    frame.render_widget(widget, rect);
}

fn draw_overlay(frame: &mut Frame, app: &App, area: Rect, regions: &mut Regions) {
    let overlay = &app.surface.overlay;
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(17, 17, 27))),
        area,
    );

    let window = centered(area, 80, 80);
    frame.render_widget(Clear, window);

    let mut lines = vec![
        Line::from(Span::styled(
            overlay.date.as_str(),
            Style::default().fg(COLOR_MUTED),
        )),
        Line::default(),
    ];
    if let Some(media) = &overlay.media {
        for line in modal_media_lines(media) {
            lines.push(Line::from(Span::styled(line, Style::default().fg(COLOR_ACCENT))));
        }
        lines.push(Line::default());
    }
    lines.push(Line::from(overlay.text.as_str()));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(overlay.title.as_str()),
    );
    frame.render_widget(body, window);

    let close = Rect::new(
        (window.x + window.width).saturating_sub(6),
        window.y,
        5.min(window.width),
        1,
    );
    let close_style = if app.surface.focused() == Some(Focus::Close) {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new("[ x ]").style(close_style), close);

    regions.overlay = Some(area);
    regions.window = Some(window);
    regions.close = Some(close);
}
