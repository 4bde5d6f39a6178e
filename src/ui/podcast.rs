//! Podcast preview view
//!
//! `build_tree` turns a `ViewState` into a display tree with no side effects;
//! `PodcastView::render` draws that tree with ratatui. Only the expanded
//! season's episodes are drawn, so the list rows line up with
//! `App::rows()` one for one.

use ratatui::{
    prelude::*,
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, ListState as WidgetListState,
        Paragraph, Wrap,
    },
};

use crate::app::{App, InputMode, ViewState};
use crate::models::{Episode, Season};
use crate::ui::Theme;

pub const LOADING_TEXT: &str = "Loading Selected Podcast...";
pub const NO_DATA_TEXT: &str = "No data found for this podcast.";
pub const NO_SEASONS_TEXT: &str = "No seasons found for this podcast.";

// =============================================================================
// Display Tree
// =============================================================================

/// What the view shows for a given state
#[derive(Debug, PartialEq)]
pub enum DisplayTree<'a> {
    /// Fetch pending; nothing else is shown
    Loading,
    /// Fetch settled without a podcast
    NoData,
    Podcast(PodcastNode<'a>),
}

#[derive(Debug, PartialEq)]
pub struct PodcastNode<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub seasons: SeasonsNode<'a>,
}

#[derive(Debug, PartialEq)]
pub enum SeasonsNode<'a> {
    NoSeasons,
    List(Vec<SeasonNode<'a>>),
}

/// A season toggle and its episode list
#[derive(Debug, PartialEq)]
pub struct SeasonNode<'a> {
    pub index: usize,
    pub season: &'a Season,
    pub expanded: bool,
    pub episodes: Vec<EpisodeNode<'a>>,
}

#[derive(Debug, PartialEq)]
pub struct EpisodeNode<'a> {
    pub episode: &'a Episode,
    /// Hidden unless the owning season is expanded
    pub visible: bool,
}

impl DisplayTree<'_> {
    /// Number of season toggles
    pub fn season_count(&self) -> usize {
        match self {
            DisplayTree::Podcast(PodcastNode {
                seasons: SeasonsNode::List(seasons),
                ..
            }) => seasons.len(),
            _ => 0,
        }
    }

    /// Number of episodes that are not hidden
    pub fn visible_episode_count(&self) -> usize {
        match self {
            DisplayTree::Podcast(PodcastNode {
                seasons: SeasonsNode::List(seasons),
                ..
            }) => seasons
                .iter()
                .flat_map(|s| &s.episodes)
                .filter(|e| e.visible)
                .count(),
            _ => 0,
        }
    }

    /// The placeholder message shown instead of content, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DisplayTree::Loading => Some(LOADING_TEXT),
            DisplayTree::NoData => Some(NO_DATA_TEXT),
            DisplayTree::Podcast(PodcastNode {
                seasons: SeasonsNode::NoSeasons,
                ..
            }) => Some(NO_SEASONS_TEXT),
            DisplayTree::Podcast(_) => None,
        }
    }
}

/// Build the display tree for a state
pub fn build_tree(state: &ViewState) -> DisplayTree<'_> {
    if state.loading {
        return DisplayTree::Loading;
    }
    let Some(podcast) = &state.podcast else {
        return DisplayTree::NoData;
    };

    let seasons = if podcast.seasons.is_empty() {
        SeasonsNode::NoSeasons
    } else {
        SeasonsNode::List(
            podcast
                .seasons
                .iter()
                .enumerate()
                .map(|(index, season)| {
                    let expanded = state.expanded_season == Some(index);
                    SeasonNode {
                        index,
                        season,
                        expanded,
                        episodes: season
                            .episodes
                            .iter()
                            .map(|episode| EpisodeNode {
                                episode,
                                visible: expanded,
                            })
                            .collect(),
                    }
                })
                .collect(),
        )
    };

    DisplayTree::Podcast(PodcastNode {
        title: &podcast.title,
        description: &podcast.description,
        seasons,
    })
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders an `App` into a frame
pub struct PodcastView;

impl PodcastView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(" PREVIEW PODCAST ", Theme::title()))
            .title_bottom(Line::from(vec![
                Span::styled(" ← Esc ", Theme::keybind()),
                Span::styled("back ", Theme::dimmed()),
            ]));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        match build_tree(app.state()) {
            DisplayTree::Loading => Self::render_message(frame, inner, LOADING_TEXT, Theme::loading()),
            DisplayTree::NoData => Self::render_message(frame, inner, NO_DATA_TEXT, Theme::dimmed()),
            DisplayTree::Podcast(node) => Self::render_podcast(frame, inner, app, &node),
        }

        if app.input_mode == InputMode::EditingId {
            Self::render_prompt(frame, area, &app.id_input);
        }
        if let Some(error) = &app.error {
            Self::render_error(frame, area, error);
        }
    }

    fn render_message(frame: &mut Frame, area: Rect, text: &str, style: Style) {
        let paragraph = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_podcast(frame: &mut Frame, area: Rect, app: &App, node: &PodcastNode) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(35), Constraint::Min(3)])
            .split(area);

        Self::render_info(frame, chunks[0], app, node);
        Self::render_seasons(frame, chunks[1], app, &node.seasons);
    }

    /// Title, genres and description
    fn render_info(frame: &mut Frame, area: Rect, app: &App, node: &PodcastNode) {
        let mut lines = vec![Line::from(vec![
            Span::styled("▶ ", Theme::accent()),
            Span::styled(node.title.to_string(), Theme::title()),
        ])];

        if let Some(podcast) = app.podcast() {
            let mut meta = Vec::new();
            if !podcast.genres.is_empty() {
                meta.push(Span::styled(podcast.genres.join(", "), Theme::secondary()));
            }
            if let Some(updated) = podcast.updated.as_deref() {
                if !meta.is_empty() {
                    meta.push(Span::styled(" │ ", Theme::dimmed()));
                }
                // Keep the date part of an ISO timestamp
                let date = updated.split('T').next().unwrap_or(updated);
                meta.push(Span::styled(format!("updated {}", date), Theme::dimmed()));
            }
            if !meta.is_empty() {
                lines.push(Line::from(meta));
            }
        }

        lines.push(Line::from(""));
        for line in node.description.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), Theme::text())));
        }

        let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_seasons(frame: &mut Frame, area: Rect, app: &App, seasons: &SeasonsNode) {
        let count = match seasons {
            SeasonsNode::NoSeasons => 0,
            SeasonsNode::List(list) => list.len(),
        };
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border_focused())
            .title(Span::styled(format!(" SEASONS ({}) ", count), Theme::title()));

        let SeasonsNode::List(seasons) = seasons else {
            let empty = Paragraph::new(NO_SEASONS_TEXT)
                .style(Theme::dimmed())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        };

        let mut items = Vec::new();
        for season in seasons {
            items.push(Self::season_item(season));
            for (j, episode) in season.episodes.iter().enumerate() {
                if !episode.visible {
                    continue;
                }
                let playing = app
                    .now_playing
                    .as_ref()
                    .is_some_and(|p| p.season == season.index && p.episode == j);
                items.push(Self::episode_item(episode.episode, playing));
            }
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Theme::row_selected());
        let mut state = WidgetListState::default().with_selected(Some(app.list.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Toggle row: ordinal, title and artwork URL
    fn season_item(node: &SeasonNode) -> ListItem<'static> {
        let marker = if node.expanded { "▾ " } else { "▸ " };
        let season = node.season;
        ListItem::new(vec![
            Line::from(vec![
                Span::styled(marker, Theme::accent()),
                Span::styled(format!("Season: {}", season.season), Theme::title()),
                Span::styled("  ", Theme::dimmed()),
                Span::styled(format!("Title: {}", season.title), Theme::text()),
                Span::styled(format!("  ({} eps)", season.episodes.len()), Theme::dimmed()),
            ]),
            Line::from(Span::styled(format!("    {}", season.image), Theme::dimmed())),
        ])
    }

    /// Episode row: title, description, play and favorite controls
    fn episode_item(episode: &Episode, playing: bool) -> ListItem<'static> {
        let (icon, icon_style) = if playing {
            ("  ▶ ", Theme::success())
        } else {
            ("  ♪ ", Theme::secondary())
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(icon, icon_style),
            Span::styled(episode.title.clone(), Theme::text()),
            Span::styled("  [Enter]", Theme::keybind()),
            Span::styled(" play ", Theme::dimmed()),
            Span::styled("[f]", Theme::keybind()),
            Span::styled(" favorite", Theme::dimmed()),
        ])];
        if !episode.description.is_empty() {
            let description: String = episode.description.chars().take(120).collect();
            lines.push(Line::from(Span::styled(
                format!("      {}", description),
                Theme::dimmed(),
            )));
        }
        ListItem::new(lines)
    }

    fn render_prompt(frame: &mut Frame, area: Rect, input: &str) {
        let popup = centered_rect(40, 3, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused())
            .title(Span::styled(" PODCAST ID ", Theme::title()));
        let paragraph = Paragraph::new(Line::from(vec![
            Span::styled(input.to_string(), Theme::input()),
            Span::styled("█", Theme::keybind()),
        ]))
        .block(block);
        frame.render_widget(paragraph, popup);
    }

    fn render_error(frame: &mut Frame, area: Rect, error: &str) {
        let popup = centered_rect(60, 5, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::error())
            .title(Span::styled(" ERROR ", Theme::error()));
        let paragraph = Paragraph::new(error.to_string())
            .style(Theme::text())
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, popup);
    }
}

/// A rect `width` columns wide (capped at `area`) and `height` rows tall, centered
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
