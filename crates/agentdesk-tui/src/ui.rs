use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use agentdesk_core::{ChatRole, CONTACT_INFO};
use crate::app::{App, Field};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut bold = false;

    for (i, part) in text.split("**").enumerate() {
        if i > 0 {
            bold = !bold;
        }
        if part.is_empty() {
            continue;
        }
        let style = if bold {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(part.to_string(), style));
    }

    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    // Two columns, 8/4 like the web page
    let [agent_area, side_area] = Layout::horizontal([
        Constraint::Ratio(2, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(body_area);

    render_agent_panel(app, frame, agent_area);
    render_side_panel(app, frame, side_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " How can Fleetworthy Help your Business? ",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let subtitle = Line::from(Span::styled(
        " Ask our AI Sales Agent!",
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![title, subtitle]).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::White);

    let enter_label = match app.focus {
        Field::Question => " ask  ",
        Field::Website | Field::Description | Field::Document => " next  ",
        _ => " submit demo  ",
    };

    let mut spans = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(enter_label, label_style),
        Span::styled(" Tab ", key_style),
        Span::styled(" field  ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll  ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit  ", label_style),
    ];

    let status = if app.is_busy() {
        Span::styled(
            format!(" {} ", app.form.stage().label()),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        )
    } else {
        Span::styled(" ready ", Style::default().bg(Color::Blue).fg(Color::White))
    };
    spans.push(status);
    spans.push(Span::styled(
        format!(" {}", app.endpoint),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_agent_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, question_area, website_area, description_area, document_area] =
        Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .areas(area);

    render_chat(app, frame, chat_area);
    render_input(app, frame, Field::Question, question_area);
    render_input(app, frame, Field::Website, website_area);
    render_input(app, frame, Field::Description, description_area);
    render_input(app, frame, Field::Document, document_area);
}

/// Transcript lines as the chat log shows them, before wrapping.
fn chat_text(app: &App) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in app.conversation.messages() {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(msg.content.clone()));
            }
            ChatRole::Agent => {
                lines.push(Line::from(Span::styled(
                    "Agent:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in msg.content.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.is_busy() {
        lines.push(Line::from(Span::styled(
            "Agent:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Text::from(lines)
}

/// Rows the transcript occupies once word-wrapped to `width` columns.
pub fn chat_line_count(app: &App, width: u16) -> usize {
    Paragraph::new(chat_text(app))
        .wrap(Wrap { trim: true })
        .line_count(width)
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area for mouse hit-testing and scroll calculations (inner size minus borders)
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);
    if app.chat_follow {
        app.scroll_chat_to_bottom();
    }

    let border_color = if app.is_busy() { Color::Yellow } else { Color::DarkGray };
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Chat Log ");

    let chat = Paragraph::new(chat_text(app))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, field: Field, area: Rect) {
    let focused = app.focus == field;
    let locked = field.is_ask_field() && app.is_busy();

    let border_color = match (focused, locked) {
        (_, true) => Color::DarkGray,
        (true, false) => Color::Cyan,
        (false, false) => Color::Gray,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", field.title()));

    let input = app.input(field);
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_col) = input.window(inner_width);

    let content = if input.value().is_empty() && !focused {
        Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(visible)
    };

    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if focused && !locked {
        frame.set_cursor_position((area.x + 1 + cursor_col as u16, area.y + 1));
    }
}

fn render_side_panel(app: &App, frame: &mut Frame, area: Rect) {
    let [contact_area, demo_title_area, name_area, email_area, company_area, message_area, status_area] =
        Layout::vertical([
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(area);

    render_contact_info(frame, contact_area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            " Request a Demo:",
            Style::default().fg(Color::Magenta).bold(),
        )),
        demo_title_area,
    );
    render_input(app, frame, Field::DemoName, name_area);
    render_input(app, frame, Field::DemoEmail, email_area);
    render_input(app, frame, Field::DemoCompany, company_area);
    render_input(app, frame, Field::DemoMessage, message_area);

    if let Some(status) = &app.demo_status {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", status),
                Style::default().fg(Color::Green),
            ))
            .wrap(Wrap { trim: true }),
            status_area,
        );
    }
}

fn render_contact_info(frame: &mut Frame, area: Rect) {
    let label = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![Span::styled("Phone: ", label), Span::raw(CONTACT_INFO.phone)]),
        Line::from(vec![Span::styled("Email: ", label), Span::raw(CONTACT_INFO.email)]),
        Line::from(vec![Span::styled("Address: ", label), Span::raw(CONTACT_INFO.address)]),
        Line::default(),
        Line::from(Span::styled(CONTACT_INFO.note, Style::default().fg(Color::Gray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Fleetworthy Contact Info ");

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_core::{Agent, AgentError, AgentReply, AskPayload};
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct IdleAgent;

    #[async_trait]
    impl Agent for IdleAgent {
        async fn ask(&self, _payload: &AskPayload) -> Result<AgentReply, AgentError> {
            Ok(AgentReply::default())
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A long reply whose word lengths make word wrapping need noticeably
    /// more rows than a plain character count suggests.
    fn long_reply() -> String {
        let words = ["refrigerated", "trailers", "on", "interstate", "routes", "a", "compliance"];
        let mut reply: Vec<&str> = words.iter().cycle().take(119).copied().collect();
        reply.push("FINALMARK");
        reply.join(" ")
    }

    #[test]
    fn test_auto_scroll_shows_end_of_long_reply() {
        let mut app = App::new(Arc::new(IdleAgent), "http://localhost:8000/api/chat");
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        app.conversation.append_message(long_reply(), ChatRole::Agent);
        app.scroll_chat_to_bottom();
        let rows = chat_line_count(&app, app.chat_width);
        assert_eq!(app.chat_scroll as usize, rows - app.chat_height as usize);

        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("FINALMARK"));
    }

    #[test]
    fn test_manual_scroll_survives_redraw() {
        let mut app = App::new(Arc::new(IdleAgent), "http://localhost:8000/api/chat");
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        app.conversation.append_message(long_reply(), ChatRole::Agent);
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        let bottom = app.chat_scroll;
        assert!(bottom > 0);

        app.scroll_chat_up(3);
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert_eq!(app.chat_scroll, bottom - 3);
        assert!(!screen_text(&terminal).contains("FINALMARK"));
    }

    #[test]
    fn test_short_transcript_needs_no_scroll() {
        let mut app = App::new(Arc::new(IdleAgent), "http://localhost:8000/api/chat");
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert_eq!(app.chat_scroll, 0);
        assert!(screen_text(&terminal).contains("Welcome!"));
    }

    #[test]
    fn test_parse_markdown_line_bolds_marked_text() {
        let line = parse_markdown_line("Plans start at **$30** per truck");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "$30");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }
}
