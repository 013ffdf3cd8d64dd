//! One method per backend call, with the session side effects applied.
//!
//! # Design
//! `Repository` glues the stateless `MoodClient`, the `CredentialStore` and
//! a `Transport`. Every call follows the same path: build, authorize,
//! execute, parse, settle. Settling is where a 401 clears the stored
//! credentials; it is also exposed as a free function for hosts that do
//! their own I/O (the FFI layer).

use std::sync::Arc;

use tracing::{error, warn};

use crate::auth::authorize;
use crate::client::MoodClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::{Failure, Resource};
use crate::store::CredentialStore;
use crate::transport::Transport;
use crate::types::{AdviceEntry, AuthResponse, LoginRequest, MoodEntry, MoodRequest, RegisterRequest};

/// Shown when the session could not be persisted after a successful auth call.
pub const SESSION_SAVE_FAILED: &str = "Signed in, but the session could not be saved";

/// Attach the stored bearer token to `request`.
pub fn prepare(store: &CredentialStore, request: HttpRequest) -> HttpRequest {
    let token = store.token();
    authorize(request, token.as_deref())
}

/// Turn a parse result into a `Resource`, clearing the store on 401.
pub fn settle<R>(store: &CredentialStore, result: Result<R, ApiError>) -> Resource<R> {
    if let Err(ApiError::Unauthorized) = &result {
        warn!("server rejected stored credentials, clearing session");
        if let Err(e) = store.clear() {
            error!(error = %e, "failed to clear credentials after 401");
        }
    }
    result.into()
}

/// Persist the credentials carried by a successful auth response.
pub fn remember(store: &CredentialStore, resource: Resource<AuthResponse>) -> Resource<AuthResponse> {
    let Resource::Success(auth) = resource else {
        return resource;
    };
    match auth.credentials() {
        Some(credentials) => match store.save(&credentials) {
            Ok(()) => Resource::Success(auth),
            Err(e) => {
                error!(error = %e, "failed to persist credentials");
                Resource::Error(Failure::message(SESSION_SAVE_FAILED))
            }
        },
        None => Resource::Success(auth),
    }
}

pub struct Repository<T> {
    client: MoodClient,
    store: Arc<CredentialStore>,
    transport: T,
}

impl<T: Transport> Repository<T> {
    pub fn new(client: MoodClient, store: Arc<CredentialStore>, transport: T) -> Self {
        Self {
            client,
            store,
            transport,
        }
    }

    pub fn client(&self) -> &MoodClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register; a response carrying a token also signs the user in.
    pub fn register(&self, input: &RegisterRequest) -> Resource<AuthResponse> {
        let resource = self.call(self.client.build_register(input), MoodClient::parse_register);
        remember(&self.store, resource)
    }

    pub fn login(&self, input: &LoginRequest) -> Resource<AuthResponse> {
        let resource = self.call(self.client.build_login(input), MoodClient::parse_login);
        remember(&self.store, resource)
    }

    pub fn add_mood(&self, input: &MoodRequest) -> Resource<MoodEntry> {
        self.call(self.client.build_add_mood(input), MoodClient::parse_add_mood)
    }

    pub fn update_mood(&self, id: i64, input: &MoodRequest) -> Resource<MoodEntry> {
        self.call(self.client.build_update_mood(id, input), MoodClient::parse_update_mood)
    }

    pub fn delete_mood(&self, id: i64) -> Resource<()> {
        self.call(Ok(self.client.build_delete_mood(id)), MoodClient::parse_delete_mood)
    }

    pub fn list_moods(&self) -> Resource<Vec<MoodEntry>> {
        self.call(Ok(self.client.build_list_moods()), MoodClient::parse_list_moods)
    }

    pub fn generate_advice(&self) -> Resource<AdviceEntry> {
        self.call(Ok(self.client.build_generate_advice()), MoodClient::parse_generate_advice)
    }

    pub fn latest_advice(&self) -> Resource<AdviceEntry> {
        self.call(Ok(self.client.build_latest_advice()), MoodClient::parse_latest_advice)
    }

    fn call<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: fn(&MoodClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Resource<R> {
        let result = request
            .map(|req| prepare(&self.store, req))
            .and_then(|req| self.transport.execute(req))
            .and_then(|resp| parse(&self.client, resp));
        settle(&self.store, result)
    }
}

#[cfg(feature = "ureq")]
impl Repository<crate::transport::UreqTransport> {
    /// Blocking repository wired from `config`.
    pub fn from_config(config: &crate::config::ClientConfig) -> crate::error::StoreResult<Self> {
        Ok(Self::new(
            MoodClient::new(&config.base_url),
            Arc::new(config.open_store()?),
            crate::transport::UreqTransport::new(config.timeout),
        ))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport shared by the screen tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        pub requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(ApiError::Transport(message.to_string())));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<HttpRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    pub fn repo(transport: ScriptedTransport) -> Repository<ScriptedTransport> {
        Repository::new(
            MoodClient::new("http://api.test"),
            Arc::new(CredentialStore::in_memory()),
            transport,
        )
    }

    pub fn signed_in_repo(transport: ScriptedTransport) -> Repository<ScriptedTransport> {
        let repo = repo(transport);
        repo.store()
            .save(&crate::types::Credentials {
                token: "tok".to_string(),
                user_id: 5,
                email: "grace@example.com".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            })
            .unwrap();
        repo
    }

    pub const MOOD_JSON: &str = r#"{"id":3,"emoji":"😄","score":8,"note":"walked by the sea","entryDate":"2024-05-02T10:00:00","createdAt":"2024-05-02T10:00:05"}"#;
}
