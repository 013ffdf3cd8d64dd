use crate::store::CredentialStore;

/// Where the app opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    SignIn,
}

/// A stored token is enough to skip sign-in; the server decides later
/// whether it is still valid.
pub fn is_user_logged_in(store: &CredentialStore) -> bool {
    store.token().is_some()
}

pub fn start_destination(store: &CredentialStore) -> Destination {
    if is_user_logged_in(store) {
        Destination::Home
    } else {
        Destination::SignIn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryPreferences, FIRST_NAME_KEY, TOKEN_KEY};
    use crate::types::Credentials;
    use serde_json::{json, Map};

    #[test]
    fn empty_store_opens_sign_in() {
        assert_eq!(start_destination(&CredentialStore::in_memory()), Destination::SignIn);
    }

    #[test]
    fn saved_session_opens_home() {
        let store = CredentialStore::in_memory();
        store
            .save(&Credentials {
                token: "t".into(),
                user_id: 1,
                email: "a@b.co".into(),
                first_name: "A".into(),
                last_name: "B".into(),
            })
            .unwrap();
        assert!(is_user_logged_in(&store));
        assert_eq!(start_destination(&store), Destination::Home);
    }

    #[test]
    fn partial_record_is_not_a_session() {
        let mut entries = Map::new();
        entries.insert(TOKEN_KEY.to_string(), json!("t"));
        entries.insert(FIRST_NAME_KEY.to_string(), json!("A"));
        let store = CredentialStore::open(MemoryPreferences::with_entries(entries)).unwrap();
        assert_eq!(start_destination(&store), Destination::SignIn);
    }
}
