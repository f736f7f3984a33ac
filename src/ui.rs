//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, CatalogueState};
use crate::catalogue::{ItemId, RenderedItem};
use crate::config::UiSettings;
use crate::player::{LoadStatus, PlaybackHandle, WaveformStyle, bar_levels};

const CONTROLS: [(&str, &str); 10] = [
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter/space/p", "play/pause"),
    ("s/S", "sort field"),
    ("o", "sort order"),
    ("f/F", "filter"),
    ("a", "show all"),
    ("K", "metadata"),
    ("d", "download"),
    ("q", "quit"),
];

/// Eighth-block glyphs, indexed by fill level.
const BAR_GLYPHS: [&str; 9] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(key, action)| format!("[{key}] {action}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn status_text<H: PlaybackHandle>(app: &App<H>) -> String {
    let mut parts: Vec<String> = Vec::new();

    match &app.catalogue {
        CatalogueState::Loading => parts.push("Fetching catalogue...".to_string()),
        CatalogueState::Unavailable(reason) => {
            parts.push(format!("Catalogue unavailable: {reason}"));
        }
        CatalogueState::Ready => {
            parts.push(format!(
                "SORT: {} {}",
                app.view.sort_key.label(),
                app.view.sort_order.arrow()
            ));
            parts.push(format!("FILTER: {}", app.view.filter.label()));

            match app.now_playing() {
                Some(item) => {
                    let handle = item.handle();
                    let state = if handle.is_playing() { "Playing" } else { "Paused" };
                    let time = match handle.duration() {
                        Some(total) => format!(
                            "{}/{}",
                            format_mmss(handle.position()),
                            format_mmss(total)
                        ),
                        None => format_mmss(handle.position()),
                    };
                    parts.push(format!("{state}: {} [{time}]", item.record().title));
                }
                None => parts.push("Stopped".to_string()),
            }

            let loading = app.loading_count();
            if loading > 0 {
                parts.push(format!("Loading {loading}"));
            }
        }
    }

    parts.push(format!("Source: {}", app.source_label));
    if let Some(message) = &app.status_message {
        parts.push(message.clone());
    }
    parts.join(" • ")
}

fn item_line<H: PlaybackHandle>(item: &RenderedItem<H>) -> Line<'static> {
    let marker = match item.handle().status() {
        _ if item.is_indicated() => "▶ ",
        LoadStatus::Loading => "… ",
        LoadStatus::Failed(_) => "✗ ",
        LoadStatus::Ready => "  ",
    };
    let record = item.record();
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::raw(marker), Span::raw(record.title.clone())];
    let tags: Vec<&str> = [&record.category, &record.fit, &record.mood, &record.tempo]
        .into_iter()
        .map(String::as_str)
        .filter(|tag| !tag.trim().is_empty())
        .collect();
    if !tags.is_empty() {
        spans.push(Span::styled(format!("  [{}]", tags.join(" · ")), dim));
    }
    if !item.can_play() {
        for span in spans.iter_mut().skip(1) {
            span.style = span.style.add_modifier(Modifier::DIM);
        }
    }
    Line::from(spans)
}

/// Waveform rows (top first) for `peaks` across `width` cells.
///
/// Bars left of `progress` (a fraction of the track) use the progress colors.
fn waveform_lines(peaks: &[f32], style: &WaveformStyle, width: u16, progress: f32) -> Vec<Line<'static>> {
    let rows = style.height.max(1);
    let bar_width = usize::from(style.bar_width.max(1));
    let bars = usize::from(width) / bar_width;
    if bars == 0 || peaks.is_empty() {
        return Vec::new();
    }

    let levels = bar_levels(peaks, bars, rows);
    let played_bars = (progress.clamp(0.0, 1.0) * bars as f32).round() as usize;
    let fill_cells = if bar_width > 1 { bar_width - 1 } else { 1 };

    (0..rows)
        .map(|row| {
            let eighths_below = (rows - 1 - row) * 8;
            let spans: Vec<Span<'static>> = levels
                .iter()
                .enumerate()
                .flat_map(|(bar, &level)| {
                    let fill = usize::from(level.saturating_sub(eighths_below).min(8));
                    let color = style.color_at(row, rows, bar < played_bars);
                    let mut cells = vec![Span::styled(
                        BAR_GLYPHS[fill].repeat(fill_cells),
                        Style::default().fg(color),
                    )];
                    if bar_width > 1 {
                        cells.push(Span::raw(" "));
                    }
                    cells
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn draw_waveform<H: PlaybackHandle>(frame: &mut Frame, app: &App<H>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" waveform ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(item) = app.selected_item() else {
        return;
    };
    let handle = item.handle();
    let lines = match handle.status() {
        LoadStatus::Loading => vec![Line::from("loading...")],
        LoadStatus::Failed(reason) => vec![Line::from(format!("unavailable: {reason}"))],
        LoadStatus::Ready => {
            let progress = match handle.duration() {
                Some(total) if !total.is_zero() => {
                    handle.position().as_secs_f32() / total.as_secs_f32()
                }
                _ => 0.0,
            };
            waveform_lines(handle.peaks(), handle.style(), inner.width, progress)
        }
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<H: PlaybackHandle>(
    frame: &mut Frame,
    app: &App<H>,
    display: &[ItemId],
    ui_settings: &UiSettings,
    waveform_rows: u16,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(waveform_rows.saturating_add(2)),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" zensync ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Main list
    {
        // Center the selected item when possible; only build ListItems for the visible window.
        let total = display.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = display[start..end]
            .iter()
            .map(|&i| ListItem::new(item_line(&app.items[i])))
            .collect();

        let hidden = app.hidden_count();
        let title = if ui_settings.show_hidden_count && hidden > 0 {
            format!(" tracks ({hidden} hidden) ")
        } else {
            " tracks ".to_string()
        };

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    draw_waveform(frame, app, chunks[3]);

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let meta = match app.selected_item() {
            Some(item) => {
                let record = item.record();
                let status = match item.handle().status() {
                    LoadStatus::Loading => "loading".to_string(),
                    LoadStatus::Ready => "ready".to_string(),
                    LoadStatus::Failed(reason) => format!("failed: {reason}"),
                };
                format!(
                    "Title: {}\nCategory: {}\nFit: {}\nMood: {}\nTempo: {}\nDuration: {}\nFile: {}\nStatus: {}",
                    or_dash(&record.title),
                    or_dash(&record.category),
                    or_dash(&record.fit),
                    or_dash(&record.mood),
                    or_dash(&record.tempo),
                    format_duration_mmss_ceil(item.handle().duration()),
                    or_dash(&record.file_ref),
                    status
                )
            }
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}
