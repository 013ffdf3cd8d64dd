use crate::repository::Repository;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::{AuthResponse, LoginRequest};
use crate::validate::{email_error, password_error};

use super::{unplaced_message, ActionState, FieldAliases};

pub const INVALID_CREDENTIALS: &str = "Email or password is incorrect";

const EMAIL: FieldAliases = FieldAliases { names: &["email"] };
const PASSWORD: FieldAliases = FieldAliases { names: &["password"] };

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignInErrors {
    pub fn has_errors(&self) -> bool {
        self.email.is_some() || self.password.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInUiState {
    pub email: String,
    pub password: String,
    pub is_password_visible: bool,
    pub errors: SignInErrors,
}

#[derive(Debug, Default)]
pub struct SignInScreen {
    ui: SignInUiState,
    action: ActionState,
}

impl SignInScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> &SignInUiState {
        &self.ui
    }

    pub fn action(&self) -> &ActionState {
        &self.action
    }

    pub fn on_email_change(&mut self, email: &str) {
        self.ui = SignInUiState {
            email: email.to_string(),
            errors: SignInErrors {
                email: None,
                ..self.ui.errors.clone()
            },
            ..self.ui.clone()
        };
    }

    pub fn on_password_change(&mut self, password: &str) {
        self.ui = SignInUiState {
            password: password.to_string(),
            errors: SignInErrors {
                password: None,
                ..self.ui.errors.clone()
            },
            ..self.ui.clone()
        };
    }

    pub fn toggle_password_visibility(&mut self) {
        self.ui = SignInUiState {
            is_password_visible: !self.ui.is_password_visible,
            ..self.ui.clone()
        };
    }

    fn set_errors(&mut self, errors: SignInErrors) {
        self.ui = SignInUiState {
            errors,
            ..self.ui.clone()
        };
    }

    fn validate(&self) -> SignInErrors {
        SignInErrors {
            email: email_error(&self.ui.email).map(str::to_string),
            password: password_error(&self.ui.password).map(str::to_string),
        }
    }

    /// Validate and enter the submitting state.
    pub fn begin_login(&mut self) -> Option<LoginRequest> {
        if self.action.is_loading {
            return None;
        }
        let errors = self.validate();
        if errors.has_errors() {
            self.set_errors(errors);
            return None;
        }
        self.set_errors(SignInErrors::default());
        self.action = ActionState::loading();
        Some(LoginRequest {
            email: self.ui.email.trim().to_string(),
            password: self.ui.password.clone(),
        })
    }

    pub fn finish_login(&mut self, result: Resource<AuthResponse>) {
        self.action = match result {
            Resource::Success(_) => ActionState::success(),
            Resource::Loading => ActionState::loading(),
            Resource::Error(failure) if failure.unauthorized => {
                ActionState::failed(Some(INVALID_CREDENTIALS.to_string()))
            }
            Resource::Error(failure) => {
                self.set_errors(SignInErrors {
                    email: EMAIL.pick(&failure),
                    password: PASSWORD.pick(&failure),
                });
                ActionState::failed(unplaced_message(&failure, &[&EMAIL, &PASSWORD]))
            }
        };
    }

    /// Run the whole submit against `repo`. Credentials are saved by the
    /// repository on success.
    pub fn login<T: Transport>(&mut self, repo: &Repository<T>) {
        if let Some(request) = self.begin_login() {
            let result = repo.login(&request);
            self.finish_login(result);
        }
    }
}
