//! Editable state behind the authentication forms.
//!
//! The gate owns *which* form is showing; this module owns what the user has
//! typed into it and turns that into an [`AuthSubmission`].

use crate::auth::{AuthState, AuthSubmission, ContactAttribute, ResetStep, VerifyStep};

/// One text input on a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub masked: bool,
}

const fn text(label: &'static str) -> FormField {
    FormField { label, masked: false }
}

const fn secret(label: &'static str) -> FormField {
    FormField { label, masked: true }
}

const SIGN_IN_FIELDS: &[FormField] = &[text("Username"), secret("Password")];
const CODE_FIELDS: &[FormField] = &[text("Code")];
const NEW_PASSWORD_FIELDS: &[FormField] = &[secret("New password")];
const RESET_REQUEST_FIELDS: &[FormField] = &[text("Username")];
const RESET_CONFIRM_FIELDS: &[FormField] = &[text("Code"), secret("New password")];

/// Which form the gate is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormKind {
    SignIn,
    ConfirmCode,
    NewPassword,
    ResetRequest,
    ResetConfirm,
    ChooseContact,
    ContactCode,
    Error,
    #[default]
    Waiting,
    /// Authenticated; no form.
    Hidden,
}

impl FormKind {
    pub fn for_state(state: &AuthState) -> Self {
        match state {
            AuthState::Loading { .. } => FormKind::Waiting,
            AuthState::Unauthenticated { .. } => FormKind::SignIn,
            AuthState::ConfirmingSignIn(_) => FormKind::ConfirmCode,
            AuthState::RequiringNewPassword(_) => FormKind::NewPassword,
            AuthState::ResettingPassword(ResetStep::RequestCode) => FormKind::ResetRequest,
            AuthState::ResettingPassword(ResetStep::SubmitCode { .. }) => FormKind::ResetConfirm,
            AuthState::VerifyingContact(VerifyStep::Choose { .. }) => FormKind::ChooseContact,
            AuthState::VerifyingContact(VerifyStep::SubmitCode { .. }) => FormKind::ContactCode,
            AuthState::Error { .. } => FormKind::Error,
            AuthState::Authenticated(_) => FormKind::Hidden,
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        match self {
            FormKind::SignIn => SIGN_IN_FIELDS,
            FormKind::ConfirmCode | FormKind::ContactCode => CODE_FIELDS,
            FormKind::NewPassword => NEW_PASSWORD_FIELDS,
            FormKind::ResetRequest => RESET_REQUEST_FIELDS,
            FormKind::ResetConfirm => RESET_CONFIRM_FIELDS,
            FormKind::ChooseContact | FormKind::Error | FormKind::Waiting | FormKind::Hidden => &[],
        }
    }

    /// Whether Esc maps to "back" on this form.
    pub fn can_go_back(&self) -> bool {
        !matches!(self, FormKind::SignIn | FormKind::Hidden)
    }

    pub fn can_skip(&self) -> bool {
        matches!(self, FormKind::ChooseContact | FormKind::ContactCode)
    }
}

/// Values typed into the current form.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    kind: FormKind,
    values: Vec<String>,
    focus: usize,
    choice: usize,
    /// Validation message from the last rejected submission.
    pub message: Option<String>,
}

impl FormState {
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn choice(&self) -> usize {
        self.choice
    }

    /// Follow the gate. A different form starts empty; the same form keeps
    /// its input.
    pub fn sync(&mut self, state: &AuthState) {
        let kind = FormKind::for_state(state);
        if kind == self.kind {
            return;
        }
        self.kind = kind;
        self.values = vec![String::new(); kind.fields().len()];
        self.focus = 0;
        self.choice = 0;
        self.message = None;
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.push(c);
            self.message = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }

    /// Tab: next field, or next contact option on the choose form.
    pub fn next(&mut self, options: usize) {
        if self.kind == FormKind::ChooseContact {
            if options > 0 {
                self.choice = (self.choice + 1) % options;
            }
        } else if !self.values.is_empty() {
            self.focus = (self.focus + 1) % self.values.len();
        }
    }

    pub fn prev(&mut self, options: usize) {
        if self.kind == FormKind::ChooseContact {
            if options > 0 {
                self.choice = (self.choice + options - 1) % options;
            }
        } else if !self.values.is_empty() {
            self.focus = (self.focus + self.values.len() - 1) % self.values.len();
        }
    }

    /// What Enter submits on this form, if anything.
    pub fn submission(&self, state: &AuthState) -> Option<AuthSubmission> {
        let value = |i: usize| self.values.get(i).cloned().unwrap_or_default();
        match self.kind {
            FormKind::SignIn => Some(AuthSubmission::Credentials {
                username: value(0),
                password: value(1),
            }),
            FormKind::ConfirmCode => Some(AuthSubmission::MfaCode { code: value(0) }),
            FormKind::NewPassword => Some(AuthSubmission::NewPassword { password: value(0) }),
            FormKind::ResetRequest => Some(AuthSubmission::ResetUsername { username: value(0) }),
            FormKind::ResetConfirm => Some(AuthSubmission::ResetConfirm {
                code: value(0),
                new_password: value(1),
            }),
            FormKind::ChooseContact => contact_options(state)
                .get(self.choice)
                .map(|attribute| AuthSubmission::ChooseContact { attribute: *attribute }),
            FormKind::ContactCode => Some(AuthSubmission::ContactCode { code: value(0) }),
            FormKind::Error => Some(AuthSubmission::Retry),
            FormKind::Waiting | FormKind::Hidden => None,
        }
    }
}

/// Attributes offered on the choose-contact form.
pub fn contact_options(state: &AuthState) -> &[ContactAttribute] {
    match state {
        AuthState::VerifyingContact(VerifyStep::Choose { attributes, .. }) => attributes,
        _ => &[],
    }
}
