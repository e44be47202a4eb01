use std::sync::Arc;

use agentdesk_core::{
    begin_ask, complete_ask, Agent, AgentError, AgentReply, AskForm, Conversation, DemoRequest,
};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;

use crate::ui;

/// Every focusable input, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Question,
    Website,
    Description,
    Document,
    DemoName,
    DemoEmail,
    DemoCompany,
    DemoMessage,
}

impl Field {
    const ORDER: [Field; 8] = [
        Field::Question,
        Field::Website,
        Field::Description,
        Field::Document,
        Field::DemoName,
        Field::DemoEmail,
        Field::DemoCompany,
        Field::DemoMessage,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Field {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Field {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Field::Question => "Your Question",
            Field::Website => "Company Website URL",
            Field::Description => "About Your Company (Operations, Challenges, Goals)",
            Field::Document => "Company Document (PDF, TXT, DOC, DOCX - max 5 MB)",
            Field::DemoName => "Your Name",
            Field::DemoEmail => "Your Email",
            Field::DemoCompany => "Your Company",
            Field::DemoMessage => "Message (optional)",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Question => "e.g., How can Fleetworthy help reduce my fuel costs?",
            Field::Website => "e.g., https://www.yourcompany.com",
            Field::Description => "Your trucking operations, current challenges, goals...",
            Field::Document => "Path to a file, e.g. ~/Documents/fleet-overview.pdf",
            _ => "",
        }
    }

    pub fn is_ask_field(&self) -> bool {
        matches!(
            self,
            Field::Question | Field::Website | Field::Description | Field::Document
        )
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text box with a character cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        // Pasted newlines would break the single-line box
        for c in text.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// The part of the text that fits in `width` columns, keeping the cursor
    /// visible, plus the cursor's column within that window.
    pub fn window(&self, width: usize) -> (String, usize) {
        let width = width.max(1);
        let start = (self.cursor + 1).saturating_sub(width);
        let visible = self.value.chars().skip(start).take(width).collect();
        (visible, self.cursor - start)
    }
}

pub struct App {
    pub should_quit: bool,
    pub focus: Field,

    // Ask inputs
    pub question: TextInput,
    pub website: TextInput,
    pub description: TextInput,
    pub document: TextInput,

    // Demo request inputs
    pub demo_name: TextInput,
    pub demo_email: TextInput,
    pub demo_company: TextInput,
    pub demo_message: TextInput,
    pub demo_status: Option<String>,

    // Conversation state
    pub conversation: Conversation,
    pub form: AskForm,
    pub ask_task: Option<JoinHandle<Result<AgentReply, AgentError>>>,
    pub agent: Arc<dyn Agent>,
    pub endpoint: String,

    // Chat view
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub chat_area: Option<Rect>,
    /// Keep the newest message in view across redraws and resizes.
    pub chat_follow: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(agent: Arc<dyn Agent>, endpoint: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            focus: Field::Question,

            question: TextInput::default(),
            website: TextInput::default(),
            description: TextInput::default(),
            document: TextInput::default(),

            demo_name: TextInput::default(),
            demo_email: TextInput::default(),
            demo_company: TextInput::default(),
            demo_message: TextInput::default(),
            demo_status: None,

            conversation: Conversation::with_greeting(),
            form: AskForm::new(),
            ask_task: None,
            agent,
            endpoint: endpoint.into(),

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,
            chat_follow: true,

            animation_frame: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    pub fn input(&self, field: Field) -> &TextInput {
        match field {
            Field::Question => &self.question,
            Field::Website => &self.website,
            Field::Description => &self.description,
            Field::Document => &self.document,
            Field::DemoName => &self.demo_name,
            Field::DemoEmail => &self.demo_email,
            Field::DemoCompany => &self.demo_company,
            Field::DemoMessage => &self.demo_message,
        }
    }

    /// The focused input, unless it is an ask field locked by a pending request.
    pub fn editable_input(&mut self) -> Option<&mut TextInput> {
        if self.focus.is_ask_field() && self.is_busy() {
            return None;
        }
        Some(match self.focus {
            Field::Question => &mut self.question,
            Field::Website => &mut self.website,
            Field::Description => &mut self.description,
            Field::Document => &mut self.document,
            Field::DemoName => &mut self.demo_name,
            Field::DemoEmail => &mut self.demo_email,
            Field::DemoCompany => &mut self.demo_company,
            Field::DemoMessage => &mut self.demo_message,
        })
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Start an ask cycle from the current inputs. The request itself runs on
    /// a background task; `poll_ask_task` collects the answer.
    pub fn submit_question(&mut self) {
        if self.ask_task.is_some() {
            return;
        }

        self.form.question = self.question.value().to_string();
        self.form.company_website = self.website.value().to_string();
        self.form.company_description = self.description.value().to_string();
        let document = self.document.value().trim();
        if document.is_empty() {
            self.form.clear_file();
        } else {
            self.form.select_file(expand_home(document));
        }

        let payload = begin_ask(&mut self.conversation, &mut self.form);

        // Reflect what the cycle consumed or rejected back into the inputs
        if self.form.question.is_empty() {
            self.question.clear();
        }
        if self.form.attachment.is_none() {
            self.document.clear();
        }

        if let Some(payload) = payload {
            let agent = Arc::clone(&self.agent);
            self.ask_task = Some(tokio::spawn(async move { agent.ask(&payload).await }));
        }

        // Scroll to bottom so "Thinking..." is visible
        self.scroll_chat_to_bottom();
    }

    /// Feed a finished request back into the conversation.
    pub async fn poll_ask_task(&mut self) {
        let finished = self
            .ask_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.ask_task.take() {
            let result = task
                .await
                .unwrap_or_else(|e| Err(AgentError::Task(e.to_string())));
            complete_ask(&mut self.conversation, &mut self.form, result);
            self.scroll_chat_to_bottom();
        }
    }

    pub fn submit_demo_request(&mut self) {
        let mut request = DemoRequest {
            name: self.demo_name.value().to_string(),
            email: self.demo_email.value().to_string(),
            company: self.demo_company.value().to_string(),
            message: self.demo_message.value().to_string(),
        };

        match request.submit() {
            Ok(()) => {
                self.demo_name.clear();
                self.demo_email.clear();
                self.demo_company.clear();
                self.demo_message.clear();
                self.focus = Field::DemoName;
                self.demo_status = Some("Demo request submitted!".to_string());
            }
            Err(e) => {
                self.demo_status = Some(e.to_string());
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.chat_follow = false;
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    /// Scroll chat to bottom so the newest message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width
        } else {
            50
        };

        // Rows after word wrapping, counted on the same text the chat renders
        let total_lines = u16::try_from(ui::chat_line_count(self, wrap_width)).unwrap_or(u16::MAX);

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
        self.chat_follow = true;
    }
}

/// Expand a leading `~/` the way a shell would.
fn expand_home(path: &str) -> std::path::PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => std::path::PathBuf::from(path),
    }
}
