//! C-ABI wrapper around `moodmate-core`.
//!
//! # Overview
//! Exposes the MoodMate API through `extern "C"` functions so a mobile host
//! can build requests, run them on its own HTTP stack, and hand responses
//! back without linking to Rust's async runtime or serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - The handle owns the credential store: builds attach the bearer token,
//!   parses clear the store on 401 and save credentials after auth.
//! - A single `FfiMoodResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `mood_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use moodmate_core::error::ApiError;
use moodmate_core::format::{format_entry_date, now_entry_timestamp};
use moodmate_core::repository::{prepare, remember, settle};
use moodmate_core::validate::mood_request_error;
use moodmate_core::{
    AuthResponse, CredentialStore, FilePreferences, HttpRequest, HttpResponse, LoginRequest,
    MoodClient, MoodRequest, RegisterRequest, Resource,
};

use types::*;

/// Read a caller string. Null and invalid UTF-8 read as `None`.
fn read_str(s: *const c_char) -> Option<String> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok().map(str::to_string)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// With a non-null `prefs_dir` the session is persisted as a JSON file in
/// that directory and restored on the next call; otherwise it lives in
/// memory. Returns null if `base_url` is null, the saved session cannot be
/// read, or an internal panic occurs.
/// The caller must free the returned pointer with `mood_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn mood_client_new(
    base_url: *const c_char,
    prefs_dir: *const c_char,
) -> *mut FfiMoodClient {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return ptr::null_mut();
        };
        let store = match read_str(prefs_dir) {
            Some(dir) => match CredentialStore::open(FilePreferences::in_dir(dir)) {
                Ok(store) => store,
                Err(_) => return ptr::null_mut(),
            },
            None => CredentialStore::in_memory(),
        };
        Box::into_raw(Box::new(FfiMoodClient {
            client: MoodClient::new(&url),
            store,
        }))
    })
    .unwrap_or(ptr::null_mut())
}

/// Free a client created by `mood_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mood_client_free(client: *mut FfiMoodClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Run `build` against the handle and attach the stored bearer token.
fn build_with(
    client: *const FfiMoodClient,
    build: impl FnOnce(&MoodClient) -> Option<HttpRequest>,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return ptr::null_mut();
        }
        let handle = unsafe { &*client };
        match build(&handle.client) {
            Some(req) => FfiHttpRequest::from_core(prepare(&handle.store, req)),
            None => ptr::null_mut(),
        }
    }))
    .unwrap_or(ptr::null_mut())
}

/// Assemble a mood request. A null `entry_date` means now.
fn mood_input(
    emoji: *const c_char,
    score: u8,
    note: *const c_char,
    entry_date: *const c_char,
) -> Option<MoodRequest> {
    let request = MoodRequest {
        emoji: read_str(emoji)?,
        score,
        note: read_str(note)?.trim().to_string(),
        entry_date: read_str(entry_date).unwrap_or_else(now_entry_timestamp),
    };
    match mood_request_error(&request) {
        Some(_) => None,
        None => Some(request),
    }
}

/// Build a register request.
///
/// Returns null if `client` or any field is null, or if serialization fails.
/// The caller must free the returned pointer with `mood_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn mood_build_register(
    client: *const FfiMoodClient,
    first_name: *const c_char,
    last_name: *const c_char,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let input = RegisterRequest {
            first_name: read_str(first_name)?,
            last_name: read_str(last_name)?,
            email: read_str(email)?,
            password: read_str(password)?,
        };
        c.build_register(&input).ok()
    })
}

/// Build a login request.
///
/// Returns null if `client`, `email` or `password` is null.
#[unsafe(no_mangle)]
pub extern "C" fn mood_build_login(
    client: *const FfiMoodClient,
    email: *const c_char,
    password: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let input = LoginRequest {
            email: read_str(email)?,
            password: read_str(password)?,
        };
        c.build_login(&input).ok()
    })
}

/// Build a request adding a mood entry.
///
/// Returns null if the entry fails `mood_validate_entry`, so an invalid
/// entry never reaches the network. `entry_date` may be null (now).
#[unsafe(no_mangle)]
pub extern "C" fn mood_build_add_mood(
    client: *const FfiMoodClient,
    emoji: *const c_char,
    score: u8,
    note: *const c_char,
    entry_date: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let input = mood_input(emoji, score, note, entry_date)?;
        c.build_add_mood(&input).ok()
    })
}

/// Build a request replacing mood entry `id`. Same rules as
/// `mood_build_add_mood`.
#[unsafe(no_mangle)]
pub extern "C" fn mood_build_update_mood(
    client: *const FfiMoodClient,
    id: i64,
    emoji: *const c_char,
    score: u8,
    note: *const c_char,
    entry_date: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let input = mood_input(emoji, score, note, entry_date)?;
        c.build_update_mood(id, &input).ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn mood_build_delete_mood(client: *const FfiMoodClient, id: i64) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_delete_mood(id)))
}

#[unsafe(no_mangle)]
pub extern "C" fn mood_build_list_moods(client: *const FfiMoodClient) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_list_moods()))
}

#[unsafe(no_mangle)]
pub extern "C" fn mood_build_generate_advice(client: *const FfiMoodClient) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_generate_advice()))
}

#[unsafe(no_mangle)]
pub extern "C" fn mood_build_latest_advice(client: *const FfiMoodClient) -> *mut FfiHttpRequest {
    build_with(client, |c| Some(c.build_latest_advice()))
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_str(resp.body).unwrap_or_default())
}

/// Error code and status of a failed parse, taken before `settle` consumes it.
fn describe<R>(result: &Result<R, ApiError>) -> (FfiErrorCode, u16) {
    match result {
        Ok(_) => (FfiErrorCode::Ok, 0),
        Err(e) => (FfiErrorCode::from(e), e.status().unwrap_or(0)),
    }
}

/// Parse through the core, apply the session side effects, and wrap the
/// outcome. `auth` responses also save the credentials they carry.
fn parse_with<R>(
    name: &str,
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&FfiMoodClient, HttpResponse) -> (FfiErrorCode, u16, Resource<R>),
    ok: impl FnOnce(R) -> *mut FfiMoodResult,
) -> *mut FfiMoodResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiMoodResult::null_arg("client");
        }
        if response.is_null() {
            return FfiMoodResult::null_arg("response");
        }
        let handle = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        match parse(handle, resp) {
            (_, _, Resource::Success(value)) => ok(value),
            (code, status, resource) => FfiMoodResult::from_failure(code, status, resource.failure()),
        }
    }))
    .unwrap_or_else(|_| FfiMoodResult::panic(&format!("panic in {name}")))
}

fn settled<R>(
    handle: &FfiMoodClient,
    result: Result<R, ApiError>,
) -> (FfiErrorCode, u16, Resource<R>) {
    let (code, status) = describe(&result);
    (code, status, settle(&handle.store, result))
}

fn signed_in(
    handle: &FfiMoodClient,
    result: Result<AuthResponse, ApiError>,
) -> (FfiErrorCode, u16, Resource<AuthResponse>) {
    let (code, status, resource) = settled(handle, result);
    let resource = remember(&handle.store, resource);
    // A parse that succeeded but could not be persisted.
    let code = if code == FfiErrorCode::Ok && !resource.is_success() {
        FfiErrorCode::Store
    } else {
        code
    };
    (code, status, resource)
}

/// Parse a register response; a token in it signs the user in.
///
/// Returns a result with `data_tag = Auth` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_register(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_register",
        client,
        response,
        |h, r| signed_in(h, h.client.parse_register(r)),
        FfiMoodResult::ok_auth,
    )
}

/// Parse a login response and save the session.
///
/// Returns a result with `data_tag = Auth` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_login(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_login",
        client,
        response,
        |h, r| signed_in(h, h.client.parse_login(r)),
        FfiMoodResult::ok_auth,
    )
}

/// Returns a result with `data_tag = Mood` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_add_mood(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_add_mood",
        client,
        response,
        |h, r| settled(h, h.client.parse_add_mood(r)),
        FfiMoodResult::ok_mood,
    )
}

/// Returns a result with `data_tag = Mood` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_update_mood(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_update_mood",
        client,
        response,
        |h, r| settled(h, h.client.parse_update_mood(r)),
        FfiMoodResult::ok_mood,
    )
}

/// Returns a result with `data_tag = None` on success; an empty body is fine.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_delete_mood(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_delete_mood",
        client,
        response,
        |h, r| settled(h, h.client.parse_delete_mood(r)),
        |()| FfiMoodResult::ok_empty(),
    )
}

/// Returns a result with `data_tag = MoodList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_list_moods(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_list_moods",
        client,
        response,
        |h, r| settled(h, h.client.parse_list_moods(r)),
        FfiMoodResult::ok_mood_list,
    )
}

/// Returns a result with `data_tag = Advice` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_generate_advice(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_generate_advice",
        client,
        response,
        |h, r| settled(h, h.client.parse_generate_advice(r)),
        FfiMoodResult::ok_advice,
    )
}

/// Returns a result with `data_tag = Advice` on success.
#[unsafe(no_mangle)]
pub extern "C" fn mood_parse_latest_advice(
    client: *const FfiMoodClient,
    response: *const FfiHttpResponse,
) -> *mut FfiMoodResult {
    parse_with(
        "mood_parse_latest_advice",
        client,
        response,
        |h, r| settled(h, h.client.parse_latest_advice(r)),
        FfiMoodResult::ok_advice,
    )
}

// ---------------------------------------------------------------------------
// Local checks and formatting
// ---------------------------------------------------------------------------

/// Check a mood entry before building a request.
///
/// Returns null when the entry is valid, otherwise the message to show.
/// Free a non-null result with `mood_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn mood_validate_entry(
    emoji: *const c_char,
    score: u8,
    note: *const c_char,
) -> *mut c_char {
    catch_unwind(|| {
        let request = MoodRequest {
            emoji: read_str(emoji).unwrap_or_default(),
            score,
            note: read_str(note).unwrap_or_default(),
            entry_date: String::new(),
        };
        mood_request_error(&request).map_or(ptr::null_mut(), c_string)
    })
    .unwrap_or(ptr::null_mut())
}

/// Render an ISO entry date for display; unparsable input comes back as is.
#[unsafe(no_mangle)]
pub extern "C" fn mood_format_entry_date(iso: *const c_char) -> *mut c_char {
    catch_unwind(|| match read_str(iso) {
        Some(iso) => c_string(&format_entry_date(&iso)),
        None => ptr::null_mut(),
    })
    .unwrap_or(ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Credential store
// ---------------------------------------------------------------------------

fn with_handle<R>(client: *const FfiMoodClient, fallback: R, f: impl FnOnce(&FfiMoodClient) -> R) -> R {
    if client.is_null() {
        return fallback;
    }
    let handle = unsafe { &*client };
    match catch_unwind(AssertUnwindSafe(|| f(handle))) {
        Ok(value) => value,
        Err(_) => fallback,
    }
}

/// True when a token is stored; this decides the start screen.
#[unsafe(no_mangle)]
pub extern "C" fn mood_store_is_logged_in(client: *const FfiMoodClient) -> bool {
    with_handle(client, false, |h| h.store.token().is_some())
}

/// The stored bearer token, or null. Free with `mood_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn mood_store_token(client: *const FfiMoodClient) -> *mut c_char {
    with_handle(client, ptr::null_mut(), |h| {
        h.store.token().as_deref().map_or(ptr::null_mut(), c_string)
    })
}

/// Snapshot of the signed-in profile, or null. Free with `mood_free_profile`.
#[unsafe(no_mangle)]
pub extern "C" fn mood_store_profile(client: *const FfiMoodClient) -> *mut FfiProfile {
    with_handle(client, ptr::null_mut(), |h| {
        h.store
            .profile()
            .as_ref()
            .map_or(ptr::null_mut(), FfiProfile::from_core)
    })
}

/// Clear every stored credential field. Returns false if the prefs could
/// not be rewritten; the session is signed out either way.
#[unsafe(no_mangle)]
pub extern "C" fn mood_store_logout(client: *const FfiMoodClient) -> bool {
    with_handle(client, false, |h| h.store.clear().is_ok())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Take back an array handed out by `types::into_raw_parts`.
unsafe fn take_array<T>(items: *mut T, len: u32) -> Box<[T]> {
    if items.is_null() || len == 0 {
        return Box::new([]);
    }
    unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(items, len as usize)) }
}

fn free_mood_fields(entry: &FfiMoodEntry) {
    free_c_string(entry.emoji);
    free_c_string(entry.note);
    free_c_string(entry.entry_date);
    free_c_string(entry.created_at);
}

/// Free an `FfiHttpRequest` returned by any `mood_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mood_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        for h in unsafe { take_array(req.headers, req.headers_len) }.iter() {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    });
}

/// Free an `FfiMoodResult` returned by any `mood_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn mood_free_result(result: *mut FfiMoodResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        for f in unsafe { take_array(result.field_errors, result.field_errors_len) }.iter() {
            free_c_string(f.field);
            free_c_string(f.message);
        }
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Mood => {
                let entry = unsafe { Box::from_raw(result.data as *mut FfiMoodEntry) };
                free_mood_fields(&entry);
            }
            FfiDataTag::MoodList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiMoodList) };
                for entry in unsafe { take_array(list.items, list.len) }.iter() {
                    free_mood_fields(entry);
                }
            }
            FfiDataTag::Advice => {
                let advice = unsafe { Box::from_raw(result.data as *mut FfiAdvice) };
                free_c_string(advice.advice);
                free_c_string(advice.created_at);
            }
            FfiDataTag::Auth => {
                let auth = unsafe { Box::from_raw(result.data as *mut FfiAuth) };
                free_c_string(auth.token);
                free_c_string(auth.email);
                free_c_string(auth.first_name);
                free_c_string(auth.last_name);
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a profile returned by `mood_store_profile`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mood_free_profile(profile: *mut FfiProfile) {
    if profile.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let profile = unsafe { Box::from_raw(profile) };
        free_c_string(profile.first_name);
        free_c_string(profile.last_name);
        free_c_string(profile.email);
        free_c_string(profile.full_name);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn mood_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
