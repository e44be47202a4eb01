use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, Field};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => {
            if let Some(input) = app.editable_input() {
                input.insert_str(&text);
            }
        }
        AppEvent::Resize => app.scroll_chat_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any field
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => app.scroll_chat_up(1),
        KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => app.scroll_chat_down(1),
        KeyCode::PageUp => app.scroll_chat_up(app.chat_height.max(1)),
        KeyCode::PageDown => app.scroll_chat_down(app.chat_height.max(1)),
        KeyCode::Enter => handle_enter(app),
        _ => handle_editing(app, key),
    }
}

fn handle_enter(app: &mut App) {
    match app.focus {
        // Disabled while a request is in flight
        Field::Question => {
            if !app.is_busy() {
                app.submit_question();
            }
        }
        Field::Website | Field::Description | Field::Document => app.focus_next(),
        Field::DemoName | Field::DemoEmail | Field::DemoCompany | Field::DemoMessage => {
            app.submit_demo_request();
        }
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) {
    let Some(input) = app.editable_input() else {
        return;
    };

    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_chat_down(3),
        MouseEventKind::ScrollUp => app.scroll_chat_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_core::{AgentError, AgentReply, AskPayload, Agent, ChatRole};
    use async_trait::async_trait;
    use crossterm::event::KeyEventKind;
    use std::sync::Arc;

    struct SilentAgent;

    #[async_trait]
    impl Agent for SilentAgent {
        async fn ask(&self, _payload: &AskPayload) -> Result<AgentReply, AgentError> {
            Ok(AgentReply::default())
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(key.kind, KeyEventKind::Press);
        handle_event(app, AppEvent::Key(key)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_enter_on_blank_question_only_advises() {
        let mut app = App::new(Arc::new(SilentAgent), "http://localhost:8000/api/chat");
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert!(app.ask_task.is_none());
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.conversation.last().unwrap().role, ChatRole::Agent);
        assert!(!app.is_busy());
    }

    #[tokio::test]
    async fn test_typing_is_blocked_while_busy() {
        let mut app = App::new(Arc::new(SilentAgent), "http://localhost:8000/api/chat");
        type_text(&mut app, "Hi");
        press(&mut app, KeyCode::Enter);
        assert!(app.is_busy());

        type_text(&mut app, "more");
        assert!(app.question.value().is_empty());
        press(&mut app, KeyCode::Enter);
        // Still one user entry: the second Enter was ignored
        let user_entries = app
            .conversation
            .messages()
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count();
        assert_eq!(user_entries, 1);

        // The demo form stays editable
        app.focus = Field::DemoName;
        type_text(&mut app, "Lee");
        assert_eq!(app.demo_name.value(), "Lee");
    }

    #[test]
    fn test_resize_follows_newest_message_again() {
        let mut app = App::new(Arc::new(SilentAgent), "http://localhost:8000/api/chat");
        app.scroll_chat_up(1);
        assert!(!app.chat_follow);

        handle_event(&mut app, AppEvent::Resize).unwrap();
        assert!(app.chat_follow);
    }

    #[test]
    fn test_tab_moves_focus() {
        let mut app = App::new(Arc::new(SilentAgent), "http://localhost:8000/api/chat");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Field::Website);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Field::Question);
    }
}
