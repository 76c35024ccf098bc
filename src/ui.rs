//! The UI renders the application state into something visible.
//!
//! The draw function lays out a header, the active tab (tree or JSON), a progress gauge while an
//! extraction is in flight, the last error, and a help or command bar. The tree tab draws the
//! rows produced by `tree_view` using box-drawing characters.

use crate::app_state::{AppState, Tab, View};
use crate::tree_view::{visible_rows, RowKind, TreeRow};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

#[derive(Clone, Copy)]
/// Colours for one palette.
struct Theme {
    fg: Color,
    bg: Color,
    accent: Color,
    muted: Color,
    error: Color,
}

impl Theme {
    fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                fg: Color::Gray,
                bg: Color::Black,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                error: Color::LightRed,
            }
        } else {
            Self {
                fg: Color::Black,
                bg: Color::White,
                accent: Color::Blue,
                muted: Color::DarkGray,
                error: Color::Red,
            }
        }
    }

    fn base(self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }
}

/// Renders the whole screen from the current application state.
pub fn draw(f: &mut Frame, app: &AppState) {
    let theme = Theme::for_mode(app.dark_mode);

    let mut constraints = vec![Constraint::Length(3), Constraint::Min(0)];
    if app.is_processing {
        constraints.push(Constraint::Length(3));
    }
    if app.error.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    f.render_widget(Block::default().style(theme.base()), f.area());

    draw_header(f, app, theme, chunks[0]);
    match app.active_tab {
        Tab::Tree => draw_tree(f, app, theme, chunks[1]),
        Tab::Json => draw_json(f, app, theme, chunks[1]),
    }

    let mut next = 2;
    if app.is_processing {
        draw_progress(f, app, theme, chunks[next]);
        next += 1;
    }
    if let Some(ref error) = app.error {
        let error_widget = Paragraph::new(error.as_str())
            .style(theme.base().fg(theme.error))
            .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(error_widget, chunks[next]);
        next += 1;
    }
    draw_help(f, app, theme, chunks[next]);
}

fn draw_header(f: &mut Frame, app: &AppState, theme: Theme, area: Rect) {
    let file_info = app.selected_file.as_ref().map_or_else(
        || Span::styled("No file selected (:e <path>)", Style::default().fg(theme.muted)),
        |file| Span::raw(format!("{} ({:.2} MB)", file.file_name, file.size_mib())),
    );

    let mut spans = vec![
        Span::styled(
            "DocTree ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        file_info,
    ];

    // Breadcrumb navigation
    if let Some(crumbs) = app
        .hierarchy
        .as_ref()
        .and_then(|root| root.path_to(app.current_section))
    {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            crumbs.join(" > "),
            Style::default().fg(theme.muted),
        ));
    }

    let line = Line::from(spans);

    let header = Paragraph::new(line)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title("Upload Document"));
    f.render_widget(header, area);
}

fn tab_title(app: &AppState, theme: Theme) -> Line<'static> {
    let active = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let inactive = Style::default().fg(theme.muted);
    let (tree, json) = match app.active_tab {
        Tab::Tree => (active, inactive),
        Tab::Json => (inactive, active),
    };

    let mut spans = vec![
        Span::raw(" Document Hierarchy: "),
        Span::styled("Tree View", tree),
        Span::raw(" │ "),
        Span::styled("JSON Output", json),
        Span::raw(" "),
    ];

    if let Some(ref summary) = app.summary {
        let mut facts = vec![format!("{} sections", summary.section_count.saturating_sub(1))];
        if let Some(pages) = summary.total_pages {
            facts.push(format!("{pages} pages"));
        }
        if let Some(blocks) = summary.total_blocks {
            facts.push(format!("{blocks} blocks"));
        }
        spans.push(Span::styled(
            format!("({}) ", facts.join(", ")),
            Style::default().fg(theme.muted),
        ));
    }

    Line::from(spans)
}

fn draw_empty(f: &mut Frame, app: &AppState, theme: Theme, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "No Document Processed",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Upload and process a PDF to see its hierarchical structure",
            Style::default().fg(theme.muted),
        )),
    ];
    let empty = Paragraph::new(text)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title(tab_title(app, theme)));
    f.render_widget(empty, area);
}

fn row_line(row: &TreeRow<'_>, theme: Theme) -> Line<'static> {
    match row.kind {
        RowKind::Heading => {
            let affordance = match (row.has_children, row.expanded) {
                (false, _) => "  ",
                (true, true) => "▾ ",
                (true, false) => "▸ ",
            };
            Line::from(vec![
                Span::raw(row.prefix.clone()),
                Span::styled(affordance, Style::default().fg(theme.muted)),
                Span::styled(
                    row.text.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("p.{}", row.page_number),
                    Style::default().fg(theme.accent),
                ),
            ])
        }
        RowKind::Content => Line::from(vec![
            Span::raw(row.prefix.clone()),
            Span::styled(row.text.to_string(), Style::default().fg(theme.muted)),
        ]),
    }
}

fn draw_tree(f: &mut Frame, app: &AppState, theme: Theme, area: Rect) {
    let Some(ref root) = app.hierarchy else {
        draw_empty(f, app, theme, area);
        return;
    };

    let rows = visible_rows(root, &app.expansion);
    let selected = rows
        .iter()
        .position(|row| row.navigable && row.section_id == app.current_section);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| ListItem::new(row_line(row, theme)))
        .collect();

    let list = List::new(items)
        .style(theme.base())
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(tab_title(app, theme)));

    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_json(f: &mut Frame, app: &AppState, theme: Theme, area: Rect) {
    let Some(ref json) = app.json_output else {
        draw_empty(f, app, theme, area);
        return;
    };

    let json_widget = Paragraph::new(json.as_str())
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((app.json_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(tab_title(app, theme)));
    f.render_widget(json_widget, area);
}

fn draw_progress(f: &mut Frame, app: &AppState, theme: Theme, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Processing"))
        .gauge_style(Style::default().fg(theme.accent).bg(theme.bg))
        .percent(u16::from(app.progress))
        .label(format!(
            "Analyzing document structure... {}%",
            app.progress
        ));
    f.render_widget(gauge, area);
}

fn draw_help(f: &mut Frame, app: &AppState, theme: Theme, area: Rect) {
    let (text, title) = if app.current_view == View::Command {
        (format!(":{}", app.command_buffer), "Command")
    } else if let Some(ref msg) = app.message {
        (msg.clone(), "")
    } else {
        let help = match app.active_tab {
            Tab::Tree => {
                "↑/↓: Navigate | ←/→: Collapse/Expand | Enter: Toggle | Tab: JSON | p: Process | :e <path> | d: Theme | q: Quit"
            }
            Tab::Json => {
                "↑/↓/PgUp/PgDn: Scroll | Tab: Tree | :w [path] Save | p: Process | d: Theme | q: Quit"
            }
        };
        (help.to_string(), "")
    };

    let help_widget = Paragraph::new(text)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(help_widget, area);
}
