//! The authentication gate's forms.
//!
//! Drawn instead of the shell whenever the gate is not `Authenticated`.
//! Only these forms consume [`Theme`].

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::helpers::{centered_rect, mask, spinner};
use super::theme::{Theme, THEME};
use crate::app::{contact_options, App, FormKind};
use crate::auth::{AuthState, CodeDelivery, ResetStep, VerifyStep};

const FORM_WIDTH: u16 = 56;

pub fn render_auth_form(frame: &mut Frame, app: &App) {
    let theme = &THEME;
    let state = app.gate.state();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled(title(state), theme.heading));
    lines.push(Line::default());
    lines.extend(intro(state, app.tick_count, theme));

    let kind = app.form.kind();
    for (i, field) in kind.fields().iter().enumerate() {
        let value = app.form.values().get(i).map(String::as_str).unwrap_or("");
        let shown = if field.masked { mask(value) } else { value.to_string() };
        let focused = i == app.form.focus();
        let style = if focused { theme.input_focused } else { theme.input };
        let marker = if focused { "▸ " } else { "  " };
        lines.push(Line::styled(format!("{}{}", marker, field.label), theme.hint));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!(" {:<width$}", shown, width = 40), style),
        ]));
    }

    if kind == FormKind::ChooseContact {
        for (i, attribute) in contact_options(state).iter().enumerate() {
            let selected = i == app.form.choice();
            let marker = if selected { "(•) " } else { "( ) " };
            let style = if selected { theme.input_focused } else { theme.input };
            lines.push(Line::styled(format!("  {}{}", marker, attribute.label()), style));
        }
    }

    if let Some(label) = button_label(kind) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(format!(" {} ", label), theme.button)));
    }

    if let Some(message) = &app.form.message {
        lines.push(Line::default());
        lines.push(Line::styled(message.clone(), theme.error));
    }

    lines.push(Line::default());
    lines.push(Line::styled(hints(kind, state), theme.hint));

    let height = (lines.len() as u16).saturating_add(2);
    let area = centered_rect(FORM_WIDTH, height, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.container)
        .title(" cloudinv ");

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn title(state: &AuthState) -> &'static str {
    match state {
        AuthState::Loading { .. } => "Please wait",
        AuthState::Unauthenticated { .. } => "Sign in to your account",
        AuthState::ConfirmingSignIn(_) => "Confirm sign in",
        AuthState::RequiringNewPassword(_) => "Change password",
        AuthState::ResettingPassword(_) => "Reset your password",
        AuthState::VerifyingContact(_) => "Verify contact information",
        AuthState::Authenticated(_) => "",
        AuthState::Error { .. } => "Something went wrong",
    }
}

fn intro<'a>(state: &'a AuthState, tick: u64, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = match state {
        AuthState::Loading { operation, .. } => {
            vec![Line::from(format!("{} {}", spinner(tick), operation.label()))]
        }
        AuthState::Unauthenticated { notice: Some(notice) } => {
            vec![Line::styled(notice.as_str(), theme.error)]
        }
        AuthState::ConfirmingSignIn(challenge) => {
            let to = challenge
                .destination
                .as_deref()
                .map(|d| format!(" sent to {}", d))
                .unwrap_or_default();
            vec![Line::from(format!("Enter the {}{}.", challenge.kind, to))]
        }
        AuthState::RequiringNewPassword(challenge) => vec![Line::from(format!(
            "{} must choose a new password.",
            challenge.username
        ))],
        AuthState::ResettingPassword(ResetStep::SubmitCode { delivery, .. }) => {
            vec![Line::from(delivered(delivery))]
        }
        AuthState::VerifyingContact(VerifyStep::Choose { .. }) => vec![Line::from(
            "Account recovery requires verified contact information.",
        )],
        AuthState::VerifyingContact(VerifyStep::SubmitCode {
            attribute, delivery, ..
        }) => vec![Line::from(format!(
            "Verify your {}. {}",
            attribute.label().to_lowercase(),
            delivered(delivery)
        ))],
        AuthState::Error { code, reason } => vec![
            Line::styled(reason.as_str(), theme.error),
            Line::styled(format!("({})", code), theme.hint),
        ],
        _ => Vec::new(),
    };
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines
}

fn delivered(delivery: &CodeDelivery) -> String {
    match &delivery.destination {
        Some(destination) => format!("A code was sent to {}.", destination),
        None => "A code was sent.".to_string(),
    }
}

fn button_label(kind: FormKind) -> Option<&'static str> {
    match kind {
        FormKind::SignIn => Some("Sign In"),
        FormKind::ConfirmCode | FormKind::ContactCode => Some("Confirm"),
        FormKind::NewPassword => Some("Change"),
        FormKind::ResetRequest => Some("Send Code"),
        FormKind::ResetConfirm => Some("Submit"),
        FormKind::ChooseContact => Some("Verify"),
        FormKind::Error => Some("Try Again"),
        FormKind::Waiting | FormKind::Hidden => None,
    }
}

fn hints(kind: FormKind, state: &AuthState) -> String {
    let mut parts: Vec<&str> = Vec::new();
    match kind {
        FormKind::SignIn => parts.extend(["[Tab] Next", "[Enter] Sign in", "[Ctrl-R] Forgot password"]),
        FormKind::ChooseContact => parts.extend(["[↑/↓] Choose", "[Enter] Send code", "[Ctrl-S] Skip"]),
        FormKind::ContactCode => parts.extend(["[Enter] Verify", "[Ctrl-S] Skip"]),
        FormKind::Error => parts.push("[Enter] Try again"),
        FormKind::Waiting => {}
        _ => parts.extend(["[Tab] Next", "[Enter] Submit"]),
    }
    let abandonable = matches!(state, AuthState::Loading { operation, .. } if operation.is_abandonable());
    if kind.can_go_back() && (kind != FormKind::Waiting || abandonable) {
        parts.push("[Esc] Back");
    }
    parts.push("[Ctrl-C] Quit");
    parts.join("  ")
}
