use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::domain::Article;
use crate::feed::FeedView;
use crate::tui::app::{ActivePane, Detail, InputMode, TuiApp};

pub fn render(frame: &mut Frame, app: &mut TuiApp, view: &FeedView<'_>, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(5),    // Articles and preview
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0], colors);

    if app.maximized {
        render_preview_pane(frame, app, view, chunks[1], colors);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        render_articles_pane(frame, app, view, body[0], colors);
        render_preview_pane(frame, app, view, body[1], colors);
    }

    render_status_bar(frame, app, view, chunks[2], colors);
}

fn render_tabs(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let title = match &app.search {
        Some(search) => format!(" {} ", search.label()),
        None => " scoop ".to_string(),
    };

    let tabs = Tabs::new(app.tab_titles())
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.inactive_border)),
        )
        .select(app.tab_index)
        .style(Style::default().fg(colors.tab_inactive))
        .highlight_style(
            Style::default()
                .fg(colors.tab_active)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn border_style(app: &TuiApp, pane: ActivePane, colors: &ColorConfig) -> Style {
    if app.active_pane == pane {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn render_articles_pane(
    frame: &mut Frame,
    app: &mut TuiApp,
    view: &FeedView<'_>,
    area: Rect,
    colors: &ColorConfig,
) {
    let heading = app.current_identity().label();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Articles, colors));

    let message = match view {
        FeedView::LoadingEmpty => Some(Text::from("Loading latest news...")),
        FeedView::Empty => Some(Text::from("No articles found")),
        FeedView::Error { failure } => {
            let mut lines = vec![Line::from(Span::styled(
                failure.to_string(),
                Style::default().fg(colors.error),
            ))];
            lines.push(Line::from(""));
            if failure.is_unauthenticated() {
                lines.push(Line::from("Log in with `scoop login` to see this feed."));
            } else {
                lines.push(Line::from("Press R to retry."));
            }
            Some(Text::from(lines))
        }
        FeedView::Populated { .. } => None,
    };

    if let Some(message) = message {
        let paragraph = Paragraph::new(message)
            .block(block.title(format!(" {} ", heading)))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    let FeedView::Populated {
        items,
        is_loading_more,
        has_more,
    } = *view
    else {
        return;
    };

    let mut list_items: Vec<ListItem> = items
        .iter()
        .map(|article| {
            let date = article
                .timestamp()
                .map(|d| d.format("%m/%d").to_string())
                .unwrap_or_else(|| "     ".to_string());
            let line = Line::from(vec![
                Span::styled(date, Style::default().fg(colors.metadata_date)),
                Span::raw(" "),
                Span::raw(article.display_title().to_string()),
            ]);
            ListItem::new(line)
        })
        .collect();

    if is_loading_more {
        list_items.push(ListItem::new("Loading more...").style(dim()));
    } else if !has_more {
        list_items.push(ListItem::new("End of feed").style(dim()));
    }

    let title = format!(
        " {} [{}/{}] ",
        heading,
        (app.item_index + 1).min(items.len()),
        items.len()
    );

    let highlight_style = Style::default()
        .bg(colors.selection_bg)
        .fg(colors.selection_fg)
        .add_modifier(Modifier::BOLD);

    let list = List::new(list_items)
        .block(block.title(title))
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_preview_pane(
    frame: &mut Frame,
    app: &TuiApp,
    view: &FeedView<'_>,
    area: Rect,
    colors: &ColorConfig,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Preview, colors));

    let Some(article) = view.items().get(app.item_index) else {
        let paragraph = Paragraph::new("No article selected").block(block.title(" Preview "));
        frame.render_widget(paragraph, area);
        return;
    };

    let title = if article.source.is_empty() {
        " Preview ".to_string()
    } else {
        format!(" {} ", article.source)
    };
    let content = preview_text(article, app.detail_for(article), area.width, colors);
    let paragraph = Paragraph::new(content)
        .block(block.title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn preview_text<'a>(
    article: &'a Article,
    detail: Option<&'a Detail>,
    width: u16,
    colors: &ColorConfig,
) -> Text<'a> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        article.display_title(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let byline = article.byline();
    if !byline.is_empty() {
        lines.push(Line::from(Span::styled(
            byline,
            Style::default().fg(colors.metadata_source),
        )));
    }
    if let Some(date) = article.timestamp() {
        lines.push(Line::from(Span::styled(
            format!("Date: {}", date.format("%Y-%m-%d %H:%M")),
            Style::default().fg(colors.metadata_date),
        )));
    }
    if !article.category.is_empty() {
        lines.push(Line::from(format!("Category: {}", article.category)));
    }
    lines.push(Line::from(Span::styled(
        format!("Link: {}", article.link),
        Style::default().fg(colors.metadata_link),
    )));
    lines.push(Line::from(""));

    match detail {
        Some(Detail::Loading(_)) => {
            lines.push(Line::from(Span::styled("Loading AI summary...", dim())));
            lines.push(Line::from(""));
        }
        Some(Detail::Loaded(full)) => {
            if let Some(summary) = &full.ai_summary {
                lines.push(Line::from(Span::styled(
                    "AI Summary",
                    Style::default()
                        .fg(colors.ai_summary)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in summary.lines() {
                    lines.push(Line::from(Span::styled(
                        line.to_string(),
                        Style::default().fg(colors.ai_summary),
                    )));
                }
                lines.push(Line::from(""));
            }
        }
        Some(Detail::Failed(_, failure)) => {
            lines.push(Line::from(Span::styled(
                failure.to_string(),
                Style::default().fg(colors.error),
            )));
            lines.push(Line::from(""));
        }
        None => {}
    }

    lines.push(Line::from("─".repeat(width.saturating_sub(2) as usize)));
    lines.push(Line::from(""));

    let summary = strip_html(&article.display_summary());
    for line in summary.lines() {
        lines.push(Line::from(line.to_string()));
    }

    Text::from(lines)
}

fn render_status_bar(
    frame: &mut Frame,
    app: &TuiApp,
    view: &FeedView<'_>,
    area: Rect,
    colors: &ColorConfig,
) {
    let status = if app.input_mode == InputMode::Search {
        format!("Search: {}_   (Enter to search, Esc to cancel)", app.search_input)
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if app.maximized {
        format!("{}  |  j/k:Scroll  n/p:Page  m:Exit maximize  q:Quit", view.summary())
    } else {
        format!(
            "{}  |  j/k:Nav  Tab:Feed  /:Search  Enter:AI summary  o:Open  R:Refresh  m:Max  q:Quit",
            view.summary()
        )
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Collapse markup and runs of whitespace left in RSS summaries.
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut last_was_space = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                if c.is_whitespace() {
                    if !last_was_space {
                        result.push(' ');
                        last_was_space = true;
                    }
                } else {
                    result.push(c);
                    last_was_space = false;
                }
            }
            _ => {}
        }
    }

    result.trim().to_string()
}
