use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::form::{render_form, FormEvent, FormField, FormState};
use super::read_key;

const USERNAME: usize = 0;
const PASSWORD: usize = 1;

pub enum LoginAction {
    Quit,
    Submit { username: String, password: String },
}

pub struct LoginState {
    form: FormState,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            form: FormState::new(
                "Realty Manager - Sign in",
                vec![FormField::text("Username", ""), FormField::secret("Password")],
            ),
        }
    }

    /// Keep the username, clear the password and show why login failed.
    pub fn failed(username: &str, message: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.form.set_text(USERNAME, username);
        state.form.set_error(message);
        state
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &LoginState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut LoginState, key: KeyCode) -> Option<LoginAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(LoginAction::Quit),
        FormEvent::Submit => {
            let username = state.form.text(USERNAME).trim().to_string();
            let password = state.form.text(PASSWORD).to_string();
            if username.is_empty() || password.is_empty() {
                state.form.set_error("Username and password are required");
                return None;
            }
            Some(LoginAction::Submit { username, password })
        }
    }
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(state: &mut LoginState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn empty_credentials_are_refused_locally() {
        let mut state = LoginState::new();
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.form.error(), Some("Username and password are required"));
    }

    #[test]
    fn submits_trimmed_username_and_raw_password() {
        let mut state = LoginState::new();
        type_into(&mut state, " admin ");
        handle_key(&mut state, KeyCode::Down);
        type_into(&mut state, "p w");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(LoginAction::Submit { username, password }) => {
                assert_eq!(username, "admin");
                assert_eq!(password, "p w");
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn failed_login_keeps_username() {
        let state = LoginState::failed("admin", "Invalid username or password");
        assert_eq!(state.form.text(USERNAME), "admin");
        assert_eq!(state.form.text(PASSWORD), "");
        assert_eq!(state.form.error(), Some("Invalid username or password"));
    }
}
