//! Keyboard handling for the App.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::form::{contact_options, FormKind};
use super::App;
use crate::auth::AuthSubmission;

/// Rows moved by PageUp/PageDown.
const PAGE_STEP: usize = 10;

impl App {
    /// Route a key press to the prompt, the shell or the gate's form.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.mark_dirty();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.path_prompt.is_some() {
            self.handle_prompt_key(key);
        } else if self.gate.may_render_children() {
            self.handle_shell_key(key);
        } else {
            self.handle_form_key(key, ctrl);
        }
    }

    /// Bracketed paste: goes into the path prompt or the focused form field.
    pub fn handle_paste(&mut self, text: &str) {
        self.mark_dirty();
        let text = text.trim_end_matches(['\r', '\n']);
        if let Some(prompt) = self.path_prompt.as_mut() {
            prompt.push_str(text);
        } else if !self.gate.may_render_children() {
            text.chars()
                .filter(|c| !c.is_control())
                .for_each(|c| self.form.insert_char(c));
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.path_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.path_prompt = None,
            KeyCode::Backspace => {
                prompt.pop();
            }
            KeyCode::Char(c) => prompt.push(c),
            KeyCode::Enter => {
                if let Some(path) = self.path_prompt.take() {
                    self.navigate(&path);
                }
            }
            _ => {}
        }
    }

    fn handle_shell_key(&mut self, key: KeyEvent) {
        let last = self.routes.routes().len().saturating_sub(1);
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Up => self.sidebar_index = self.sidebar_index.saturating_sub(1),
            KeyCode::Down => self.sidebar_index = (self.sidebar_index + 1).min(last),
            KeyCode::Enter => {
                if let Some(route) = self.routes.routes().get(self.sidebar_index) {
                    self.navigate(route.path);
                }
            }
            KeyCode::Char('/') => self.path_prompt = Some(self.nav.current().to_string()),
            KeyCode::Backspace => self.go_back(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('o') => self.sign_out(),
            KeyCode::PageDown => self.page_scroll = self.page_scroll.saturating_add(PAGE_STEP),
            KeyCode::PageUp => self.page_scroll = self.page_scroll.saturating_sub(PAGE_STEP),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctrl: bool) {
        let kind = self.form.kind();
        let options = contact_options(self.gate.state()).len();

        match key.code {
            KeyCode::Esc if kind.can_go_back() => self.submit_auth(AuthSubmission::Back),
            KeyCode::Char('r') if ctrl && kind == FormKind::SignIn => {
                self.submit_auth(AuthSubmission::RequestReset)
            }
            KeyCode::Char('s') if ctrl && kind.can_skip() => {
                self.submit_auth(AuthSubmission::SkipVerification)
            }
            KeyCode::Enter => match self.form.submission(self.gate.state()) {
                Some(submission) => self.submit_auth(submission),
                None => self.status = Some("Please wait...".to_string()),
            },
            KeyCode::Tab | KeyCode::Down => self.form.next(options),
            KeyCode::BackTab | KeyCode::Up => self.form.prev(options),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) if !ctrl => self.form.insert_char(c),
            _ => {}
        }
    }
}
