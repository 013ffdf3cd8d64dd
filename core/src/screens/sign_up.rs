use crate::repository::Repository;
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::{AuthResponse, RegisterRequest};
use crate::validate::{email_error, password_error, required, FIRST_NAME_EMPTY, LAST_NAME_EMPTY};

use super::{unplaced_message, ActionState, FieldAliases};

const FIRST_NAME: FieldAliases = FieldAliases {
    names: &["first_name", "firstName"],
};
const LAST_NAME: FieldAliases = FieldAliases {
    names: &["last_name", "lastName"],
};
const EMAIL: FieldAliases = FieldAliases { names: &["email"] };
const PASSWORD: FieldAliases = FieldAliases { names: &["password"] };

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignUpErrors {
    pub fn has_errors(&self) -> bool {
        self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
            || self.password.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpUiState {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub is_password_visible: bool,
    pub errors: SignUpErrors,
}

#[derive(Debug, Default)]
pub struct SignUpScreen {
    ui: SignUpUiState,
    action: ActionState,
}

impl SignUpScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> &SignUpUiState {
        &self.ui
    }

    pub fn action(&self) -> &ActionState {
        &self.action
    }

    pub fn on_first_name_change(&mut self, value: &str) {
        self.ui = SignUpUiState {
            first_name: value.to_string(),
            errors: SignUpErrors {
                first_name: None,
                ..self.ui.errors.clone()
            },
            ..self.ui.clone()
        };
    }

    pub fn on_last_name_change(&mut self, value: &str) {
        self.ui = SignUpUiState {
            last_name: value.to_string(),
            errors: SignUpErrors {
                last_name: None,
                ..self.ui.errors.clone()
            },
            ..self.ui.clone()
        };
    }

    pub fn on_email_change(&mut self, value: &str) {
        self.ui = SignUpUiState {
            email: value.to_string(),
            errors: SignUpErrors {
                email: None,
                ..self.ui.errors.clone()
            },
            ..self.ui.clone()
        };
    }

    pub fn on_password_change(&mut self, value: &str) {
        self.ui = SignUpUiState {
            password: value.to_string(),
            errors: SignUpErrors {
                password: None,
                ..self.ui.errors.clone()
            },
            ..self.ui.clone()
        };
    }

    pub fn toggle_password_visibility(&mut self) {
        self.ui = SignUpUiState {
            is_password_visible: !self.ui.is_password_visible,
            ..self.ui.clone()
        };
    }

    fn set_errors(&mut self, errors: SignUpErrors) {
        self.ui = SignUpUiState {
            errors,
            ..self.ui.clone()
        };
    }

    fn validate(&self) -> SignUpErrors {
        SignUpErrors {
            first_name: required(&self.ui.first_name, FIRST_NAME_EMPTY).map(str::to_string),
            last_name: required(&self.ui.last_name, LAST_NAME_EMPTY).map(str::to_string),
            email: email_error(&self.ui.email).map(str::to_string),
            password: password_error(&self.ui.password).map(str::to_string),
        }
    }

    pub fn begin_register(&mut self) -> Option<RegisterRequest> {
        if self.action.is_loading {
            return None;
        }
        let errors = self.validate();
        if errors.has_errors() {
            self.set_errors(errors);
            return None;
        }
        self.set_errors(SignUpErrors::default());
        self.action = ActionState::loading();
        Some(RegisterRequest {
            first_name: self.ui.first_name.trim().to_string(),
            last_name: self.ui.last_name.trim().to_string(),
            email: self.ui.email.trim().to_string(),
            password: self.ui.password.clone(),
        })
    }

    pub fn finish_register(&mut self, result: Resource<AuthResponse>) {
        self.action = match result {
            Resource::Success(_) => ActionState::success(),
            Resource::Loading => ActionState::loading(),
            Resource::Error(failure) => {
                self.set_errors(SignUpErrors {
                    first_name: FIRST_NAME.pick(&failure),
                    last_name: LAST_NAME.pick(&failure),
                    email: EMAIL.pick(&failure),
                    password: PASSWORD.pick(&failure),
                });
                ActionState::failed(unplaced_message(
                    &failure,
                    &[&FIRST_NAME, &LAST_NAME, &EMAIL, &PASSWORD],
                ))
            }
        };
    }

    pub fn register<T: Transport>(&mut self, repo: &Repository<T>) {
        if let Some(request) = self.begin_register() {
            let result = repo.register(&request);
            self.finish_register(result);
        }
    }
}
