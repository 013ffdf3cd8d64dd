//! Full session lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the repository and
//! the screen holders over real HTTP with the ureq transport. Validates that
//! request building, bearer handling, response mapping and the credential
//! store work end-to-end with the actual server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use moodmate_core::screens::{
    AddMoodScreen, HomeScreen, MoodDetailsScreen, MoodHistoryScreen, ProfileScreen, SignInScreen,
    SignUpScreen,
};
use moodmate_core::screens::{start_destination, Destination};
use moodmate_core::{
    ApiError, ClientConfig, CredentialStore, FilePreferences, HttpResponse, LoginRequest, MoodClient,
    MoodRequest, Repository, Transport, UreqTransport,
};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn repository(addr: SocketAddr, store: Arc<CredentialStore>) -> Repository<UreqTransport> {
    Repository::new(
        MoodClient::new(&format!("http://{addr}/")),
        store,
        UreqTransport::new(Duration::from_secs(5)),
    )
}

fn mood(emoji: &str, score: u8, note: &str, entry_date: &str) -> MoodRequest {
    MoodRequest {
        emoji: emoji.to_string(),
        score,
        note: note.to_string(),
        entry_date: entry_date.to_string(),
    }
}

#[test]
fn session_lifecycle() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CredentialStore::open(FilePreferences::in_dir(dir.path())).unwrap());
    let repo = repository(addr, Arc::clone(&store));
    assert_eq!(start_destination(&store), Destination::SignIn);

    // Step 1: sign up through the screen; the token signs the user in.
    let mut sign_up = SignUpScreen::new();
    sign_up.on_first_name_change("Ada");
    sign_up.on_last_name_change("Lovelace");
    sign_up.on_email_change("ada@example.com");
    sign_up.on_password_change("engine1");
    sign_up.register(&repo);
    assert!(sign_up.action().is_success, "{:?}", sign_up.action());
    assert!(store.is_logged_in());

    // Step 2: registering the same email again is a conflict with a message.
    let mut again = SignUpScreen::new();
    again.on_first_name_change("Ada");
    again.on_last_name_change("Lovelace");
    again.on_email_change("ada@example.com");
    again.on_password_change("engine1");
    again.register(&repo);
    assert_eq!(again.action().error.as_deref(), Some("Email already registered"));

    // Step 3: log out, then sign back in; profile comes from the store.
    let mut profile = ProfileScreen::new(Arc::clone(&store));
    assert_eq!(profile.full_name(), "Ada Lovelace");
    profile.logout().unwrap();
    assert!(profile.ui().should_navigate_to_login);
    assert!(!store.is_logged_in());

    let mut sign_in = SignInScreen::new();
    sign_in.on_email_change("ada@example.com");
    sign_in.on_password_change("engine1");
    sign_in.login(&repo);
    assert!(sign_in.action().is_success, "{:?}", sign_in.action());
    assert!(profile.refresh());
    assert_eq!(profile.full_name(), "Ada Lovelace");
    assert_eq!(start_destination(&store), Destination::Home);

    // Step 4: the session survives reopening the file store.
    let reopened = CredentialStore::open(FilePreferences::in_dir(dir.path())).unwrap();
    assert_eq!(reopened.credentials(), store.credentials());

    // Step 5: add moods; one through the screen.
    assert!(repo
        .add_mood(&mood("😔", 3, "rainy and slow", "2024-05-01T08:00:00"))
        .is_success());
    assert!(repo
        .add_mood(&mood("😌", 6, "quiet beach evening", "2024-05-02T21:00:00"))
        .is_success());
    let mut add = AddMoodScreen::new();
    add.on_mood_selected(0);
    add.on_rating_selected(9);
    add.on_note_change("Beach day with friends");
    add.save(&repo);
    assert!(add.action().is_success, "{:?}", add.action());

    // Step 6: out-of-range scores are refused by the server too.
    let rejected = repo.add_mood(&mood("😄", 11, "too much", "2024-05-02T21:00:00"));
    let failure = rejected.failure().unwrap();
    assert!(failure.field_error("score").is_some());

    // Step 7: history lists everything and filters locally.
    let mut history = MoodHistoryScreen::new(chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
    history.load(&repo);
    assert_eq!(history.ui().moods.len(), 3);
    history.on_search_change("BEACH");
    assert_eq!(history.ui().moods.len(), 2);
    history.pick_date(chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    history.confirm_date();
    assert_eq!(history.ui().moods.len(), 1);
    let evening = history.ui().moods[0].clone();
    assert_eq!(evening.note, "quiet beach evening");

    // Step 8: edit the evening entry, then check details refresh.
    let mut edit = AddMoodScreen::editing(evening.id);
    edit.set_initial_data(&evening);
    edit.on_rating_selected(7);
    edit.save(&repo);
    assert!(edit.action().is_success, "{:?}", edit.action());

    let mut details = MoodDetailsScreen::new(evening.clone());
    details.refresh(&repo);
    assert_eq!(details.ui().mood.score, 7);

    // Step 9: home shows the newest three and advice can be generated.
    let mut home = HomeScreen::new();
    home.load(&repo);
    assert_eq!(home.ui().moods.len(), 3);
    assert!(home.advice().advice.is_none());
    home.generate_advice(&repo);
    assert!(home.advice().advice.is_some(), "{:?}", home.advice());
    let latest = repo.latest_advice();
    assert_eq!(latest.data().map(|a| a.advice.clone()), home.advice().advice);

    // Step 10: delete through the details screen.
    details.show_delete_dialog();
    details.delete(&repo);
    assert!(details.ui().delete_success);
    assert_eq!(repo.list_moods().data().map(Vec::len), Some(2));

    // Step 11: a rejected token clears the session.
    let stale = Arc::new(CredentialStore::in_memory());
    let mut forged = store.credentials().unwrap();
    forged.token = "expired".to_string();
    stale.save(&forged).unwrap();
    let stale_repo = repository(addr, Arc::clone(&stale));
    let mut stale_home = HomeScreen::new();
    stale_home.load(&stale_repo);
    assert!(stale_home.should_navigate_to_login());
    assert!(!stale.is_logged_in());
    assert!(store.is_logged_in());
}

#[test]
fn transport_errors_surface_as_api_errors() {
    // Nothing listens on a port we just released.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = MoodClient::new(&format!("http://{addr}"));
    let transport = UreqTransport::new(Duration::from_secs(2));

    let err = transport.execute(client.build_list_moods()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn unauthorized_status_comes_back_as_data() {
    let addr = start_server();
    let client = MoodClient::new(&format!("http://{addr}"));
    let transport = UreqTransport::new(Duration::from_secs(5));

    let response: HttpResponse = transport.execute(client.build_list_moods()).unwrap();
    assert_eq!(response.status, 401);
    assert!(matches!(client.parse_list_moods(response), Err(ApiError::Unauthorized)));
}

#[test]
fn repository_from_config_persists_session() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let prefs = dir.path().join("prefs.json");
    let url = format!("http://{addr}");
    let prefs_str = prefs.to_str().unwrap().to_string();
    let config = ClientConfig::from_lookup(|name| match name {
        "MOODMATE_API_URL" => Some(url.clone()),
        "MOODMATE_PREFS_PATH" => Some(prefs_str.clone()),
        "MOODMATE_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .unwrap();

    let repo = Repository::from_config(&config).unwrap();
    let login = LoginRequest {
        email: "nobody@example.com".to_string(),
        password: "secret1".to_string(),
    };
    assert!(!repo.login(&login).is_success());
    assert!(!repo.store().is_logged_in());

    let mut sign_up = moodmate_core::screens::SignUpScreen::new();
    sign_up.on_first_name_change("Grace");
    sign_up.on_last_name_change("Hopper");
    sign_up.on_email_change("grace@example.com");
    sign_up.on_password_change("cobol59");
    sign_up.register(&repo);
    assert!(sign_up.action().is_success, "{:?}", sign_up.action());

    let reopened = Repository::from_config(&config).unwrap();
    assert_eq!(
        reopened.store().profile().map(|p| p.full_name()),
        Some("Grace Hopper".to_string())
    );
}
