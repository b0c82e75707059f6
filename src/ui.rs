use crate::app::state_batch_delete::CONFIRMATION_PHRASE;
use crate::app::App;
use crate::document::{DocStatus, DocumentRef};
use crate::notification::NotificationLevel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn status_style(status: DocStatus) -> Style {
    let color = match status {
        DocStatus::Processed => Color::Green,
        DocStatus::Processing => Color::Blue,
        DocStatus::Pending => Color::Yellow,
        DocStatus::Failed => Color::Red,
    };
    Style::default().fg(color)
}

pub fn ui(f: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // server + status
            Constraint::Min(0),    // document list
            Constraint::Length(1), // footer help
        ])
        .split(f.area());

    draw_header(f, app, main_layout[0]);
    draw_document_list(f, app, main_layout[1]);
    draw_footer_help(f, app, main_layout[2]);

    // Modals last so they stay on top
    if app.single_delete.is_open {
        draw_single_delete_dialog(f, app);
    }
    if app.batch_delete.is_open {
        draw_batch_delete_dialog(f, app);
    }
    draw_notifications(f, app);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let title = format!("{} ({})", app.profile_name, app.server_url);
    let paragraph = Paragraph::new(app.connection_status.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn document_line<'a>(doc: &'a DocumentRef, marked: bool) -> Line<'a> {
    Line::from(vec![
        Span::raw(if marked { "[x] " } else { "[ ] " }),
        Span::styled(format!("{:<11}", doc.status.label()), status_style(doc.status)),
        Span::raw(" "),
        Span::styled(doc.display_name(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", doc.id), Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_document_list(f: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible_documents();

    let mut title = format!("Documents ({})", app.documents.len());
    if app.search_state.is_filtering() || app.search_state.is_active {
        title = format!(
            "Documents ({}/{}) filter: {}",
            visible.len(),
            app.documents.len(),
            app.search_state.query
        );
        if app.search_state.is_active {
            title.push('_');
        }
    }
    if !app.marked_ids.is_empty() {
        title.push_str(&format!(" [{} marked]", app.marked_ids.len()));
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|doc| ListItem::new(document_line(doc, app.marked_ids.contains(&doc.id))))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    if !visible.is_empty() && app.selected_index < visible.len() {
        list_state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_footer_help(f: &mut Frame, app: &App, area: Rect) {
    let key = |s: &'static str| Span::styled(s, Style::default().fg(Color::Yellow));
    let help_spans = if app.single_delete.is_open {
        vec![
            Span::styled(
                "Confirm Deletion: ",
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            ),
            Span::styled("[Y]es", Style::default().fg(Color::Green)),
            Span::raw(" / "),
            Span::styled("[N]o (Esc)", Style::default().fg(Color::Red)),
        ]
    } else if app.batch_delete.is_open {
        vec![
            Span::styled(
                "Type DELETE, ",
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            ),
            Span::styled("Enter: delete", Style::default().fg(Color::Green)),
            Span::raw(" / "),
            Span::styled("Esc: cancel", Style::default().fg(Color::Red)),
        ]
    } else if app.search_state.is_active {
        vec![
            Span::styled("Enter: apply filter", Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled("Esc: clear filter", Style::default().fg(Color::Cyan)),
        ]
    } else {
        vec![
            key("q: quit"),
            Span::raw(" | "),
            key("j/k/↑/↓: nav"),
            Span::raw(" | "),
            key("Space: mark"),
            Span::raw(" | "),
            key("a: mark all"),
            Span::raw(" | "),
            key("d: delete"),
            Span::raw(" | "),
            key("D: delete marked"),
            Span::raw(" | "),
            key("/: filter"),
            Span::raw(" | "),
            key("r: refresh"),
            Span::raw(" | "),
            key("y: copy id"),
        ]
    };

    let footer = Paragraph::new(Line::from(help_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_single_delete_dialog(f: &mut Frame, app: &App) {
    let Some(doc) = app.single_delete.document.as_ref() else {
        return;
    };
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let deleting = app.is_deleting();
    let action = if deleting {
        Line::from(Span::styled(
            "Deleting...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("[Y]es", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" or "),
            Span::styled(
                "[N]o (Esc)",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let text = vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this document?",
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(vec![
            Span::raw("File Name:   "),
            Span::styled(doc.display_name(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![Span::raw("Document ID: "), Span::raw(doc.id.as_str())]),
        Line::from(vec![
            Span::raw("Status:      "),
            Span::styled(doc.status.label(), status_style(doc.status)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Warning: this permanently deletes the document and all associated data \
             from the knowledge graph.",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        action.alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title("Delete Document")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_batch_delete_dialog(f: &mut Frame, app: &App) {
    let dialog = &app.batch_delete;
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title("Batch Delete Documents")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (shown, more) = dialog.preview();
    let preview_height = shown.len() as u16 + u16::from(more > 0) + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // question
            Constraint::Length(preview_height), // preview
            Constraint::Length(3),              // warning
            Constraint::Length(3),              // confirmation input
            Constraint::Length(1),              // progress
            Constraint::Min(0),
            Constraint::Length(1), // action hint
        ])
        .split(inner);

    let question = Paragraph::new(format!(
        "Are you sure you want to delete {} documents?",
        dialog.documents.len()
    ))
    .style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD));
    f.render_widget(question, chunks[0]);

    let mut preview_lines: Vec<Line> = shown
        .iter()
        .map(|doc| {
            Line::from(vec![
                Span::raw(doc.display_name()),
                Span::raw("  "),
                Span::styled(doc.status.label(), status_style(doc.status)),
            ])
        })
        .collect();
    if more > 0 {
        preview_lines.push(Line::from(Span::styled(
            format!("And {} more documents...", more),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    f.render_widget(
        Paragraph::new(preview_lines).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let warning = Paragraph::new(
        "This action will permanently delete all selected documents and their associated data \
         from the knowledge graph. This cannot be undone.",
    )
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: true });
    f.render_widget(warning, chunks[2]);

    let mismatch = !dialog.confirmation_text.is_empty() && !dialog.is_confirmation_valid();
    let input_style = if mismatch {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let input = Paragraph::new(dialog.confirmation_text.as_str()).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Type \"{}\" to confirm this action", CONFIRMATION_PHRASE))
            .border_style(input_style),
    );
    f.render_widget(input, chunks[3]);

    let deleting = app.is_deleting();
    if deleting {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Red))
            .percent(u16::from(dialog.progress))
            .label(format!("Deleting documents... {}%", dialog.progress));
        f.render_widget(gauge, chunks[4]);
    }

    let hint = if deleting {
        Span::styled("Deleting...", Style::default().fg(Color::Yellow))
    } else if dialog.is_confirmation_valid() {
        Span::styled(
            format!("Enter: Delete {} Documents", dialog.documents.len()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("Enter: Delete {} Documents", dialog.documents.len()),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![hint, Span::raw("   Esc: Cancel")]))
            .alignment(Alignment::Center),
        chunks[6],
    );
}

fn draw_notifications(f: &mut Frame, app: &App) {
    if app.notifications.is_empty() {
        return;
    }
    let screen = f.area();
    let width = (screen.width / 2).max(30).min(screen.width);
    let height = (app.notifications.len() as u16 + 2).min(screen.height);
    let area = Rect {
        x: screen.x + screen.width - width,
        y: screen.y + screen.height.saturating_sub(height + 1),
        width,
        height,
    };
    f.render_widget(Clear, area);

    let lines: Vec<Line> = app
        .notifications
        .visible()
        .map(|n| {
            let color = match n.level {
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Warning => Color::Yellow,
                NotificationLevel::Error => Color::Red,
            };
            Line::from(Span::styled(n.message.as_str(), Style::default().fg(color)))
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Notifications"))
            .wrap(Wrap { trim: true }),
        area,
    );
}
