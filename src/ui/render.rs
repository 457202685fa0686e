//! Render functions for the browse view.
//!
//! Everything here is a pure projection of the committed `ViewState` plus
//! the cursor/scroll presentation state; no pane ever shows data the
//! coordinator has not committed.

use super::UiState;
use crate::model::{ArticleDetail, FilterStatus, ListState, ViewState};
use crate::util::{html_to_text, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

/// Minimum terminal dimensions required for normal operation.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 8;

pub(super) fn render(f: &mut Frame, view: &ViewState, ui: &UiState) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = Paragraph::new(format!(
            "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
            MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        ))
        .alignment(Alignment::Center);
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // filter bar
            Constraint::Min(1),    // panes
            Constraint::Length(1), // status line
        ])
        .split(area);

    render_filter_bar(f, view, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    render_list(f, view, ui, panes[0]);
    render_detail(f, view, ui, panes[1]);
    render_status(f, view, rows[2]);
}

fn render_filter_bar(f: &mut Frame, view: &ViewState, area: Rect) {
    let titles: Vec<Line> = FilterStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| Line::from(format!("{} {}", i + 1, filter.label())))
        .collect();
    let selected = FilterStatus::ALL
        .iter()
        .position(|filter| *filter == view.filter)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

fn render_list(f: &mut Frame, view: &ViewState, ui: &UiState, area: Rect) {
    let title = format!("Articles - {}", view.filter.label());
    let block = Block::default().borders(Borders::ALL).title(title);

    match &view.list {
        ListState::Loading => {
            let msg = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(msg, area);
        }
        ListState::Ready(items) if items.is_empty() => {
            let msg = Paragraph::new("No articles")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(msg, area);
        }
        ListState::Ready(items) => {
            let inner_width = area.width.saturating_sub(2) as usize;
            let rows: Vec<ListItem> = items
                .iter()
                .map(|article| {
                    let is_open = view.selection.as_deref() == Some(article.id.as_str());
                    let marker = if is_open { "▸ " } else { "  " };
                    let time = format_date(article.fetched_at);
                    // Leave room for the marker and the date column.
                    let title_width = inner_width.saturating_sub(2 + time.len() + 2);
                    let title = truncate_to_width(&article.title, title_width).into_owned();

                    let title_style = if is_open {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };

                    let mut spans = vec![
                        Span::styled(marker, Style::default().fg(Color::Cyan)),
                        Span::styled(title, title_style),
                    ];
                    if !time.is_empty() {
                        spans.push(Span::styled(
                            format!("  {}", time),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let list = List::new(rows)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

            let mut list_state = ratatui::widgets::ListState::default();
            list_state.select(Some(ui.cursor.min(items.len().saturating_sub(1))));
            f.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn render_detail(f: &mut Frame, view: &ViewState, ui: &UiState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Article");

    match &view.detail {
        None => {
            // Covers both "nothing selected" and a failed detail fetch:
            // absent detail renders as the same empty pane.
            let msg = Paragraph::new("Select an article to read")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(msg, area);
        }
        Some(detail) => {
            let lines = detail_lines(detail);
            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((ui.detail_scroll, 0));
            f.render_widget(paragraph, area);
        }
    }
}

fn detail_lines(detail: &ArticleDetail) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        detail.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let mut byline = detail.source_name.clone().unwrap_or_default();
    if let Some(published) = detail.published_at {
        if !byline.is_empty() {
            byline.push_str(" · ");
        }
        byline.push_str(&published.format("%Y-%m-%d %H:%M").to_string());
    }
    if !byline.is_empty() {
        lines.push(Line::from(Span::styled(
            byline,
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::default());

    for line in html_to_text(&detail.content).lines() {
        lines.push(Line::from(line.to_string()));
    }
    lines
}

fn render_status(f: &mut Frame, view: &ViewState, area: Rect) {
    let (text, style) = match &view.last_error {
        Some(err) => (
            format!("! {}", err),
            Style::default().fg(Color::Yellow),
        ),
        None => (
            "j/k move · Enter open · Esc close · Tab/1-4 filter · r refresh · q quit".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Compact date column for list rows; empty when the server sent none.
fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).unwrap();
        assert_eq!(format_date(Some(ts)), "Jan 15");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_detail_lines_header() {
        let detail = ArticleDetail {
            id: "1".to_string(),
            title: "Title".to_string(),
            content: "<p>Body</p>".to_string(),
            source_name: Some("Source".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2026, 1, 14, 12, 0, 0).unwrap()),
        };
        let lines = detail_lines(&detail);
        // Title, byline, blank separator, then content.
        assert!(lines.len() >= 4);
        assert_eq!(lines[0].spans[0].content, "Title");
        assert!(lines[1].spans[0].content.contains("Source"));
        assert!(lines[1].spans[0].content.contains("2026-01-14"));
    }

    #[test]
    fn test_detail_lines_without_byline() {
        let detail = ArticleDetail {
            id: "1".to_string(),
            title: "Title".to_string(),
            content: "text".to_string(),
            source_name: None,
            published_at: None,
        };
        let lines = detail_lines(&detail);
        assert_eq!(lines[0].spans[0].content, "Title");
        // No byline line: title, blank, content.
        assert_eq!(lines.len(), 3);
    }
}
