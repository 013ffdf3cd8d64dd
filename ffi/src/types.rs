//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use moodmate_core::error::{ApiError, UNKNOWN_ERROR};
use moodmate_core::http::HttpMethod;
use moodmate_core::{AdviceEntry, AuthResponse, CredentialStore, Failure, MoodClient, MoodEntry, Profile};

/// Opaque handle holding the client and the credential store. C callers
/// receive a pointer to this and pass it back into every FFI function.
pub struct FfiMoodClient {
    pub(crate) client: MoodClient,
    pub(crate) store: CredentialStore,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs are
/// dropped rather than failing the whole call.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "")).unwrap_or_default().into_raw()
}

/// Hand a vector to C as pointer + length. Empty vectors become null.
fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut items = items.into_boxed_slice();
    let len = items.len() as u32;
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `mood_build_*` functions with the bearer token already
/// attached. The C caller executes the request and passes the response
/// back through the matching `mood_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: moodmate_core::HttpRequest) -> *mut Self {
        let headers = req
            .headers
            .iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(&req.path),
            headers,
            headers_len,
            body: req.body.as_deref().map_or(std::ptr::null_mut(), c_string),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request and
/// passes a pointer to a `mood_parse_*` function. The FFI layer reads but
/// does not free these fields. A null body reads as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

#[repr(C)]
pub struct FfiMoodEntry {
    pub id: i64,
    pub emoji: *mut c_char,
    pub score: u8,
    pub note: *mut c_char,
    pub entry_date: *mut c_char,
    pub created_at: *mut c_char,
}

impl FfiMoodEntry {
    fn from_core(entry: MoodEntry) -> Self {
        FfiMoodEntry {
            id: entry.id,
            emoji: c_string(&entry.emoji),
            score: entry.score,
            note: c_string(&entry.note),
            entry_date: c_string(&entry.entry_date),
            created_at: c_string(&entry.created_at),
        }
    }
}

#[repr(C)]
pub struct FfiMoodList {
    pub items: *mut FfiMoodEntry,
    pub len: u32,
}

#[repr(C)]
pub struct FfiAdvice {
    pub advice: *mut c_char,
    pub created_at: *mut c_char,
}

/// Auth response. `token` is null when the server issued none.
#[repr(C)]
pub struct FfiAuth {
    pub token: *mut c_char,
    pub user_id: i64,
    pub email: *mut c_char,
    pub first_name: *mut c_char,
    pub last_name: *mut c_char,
}

#[repr(C)]
pub struct FfiProfile {
    pub id: i64,
    pub first_name: *mut c_char,
    pub last_name: *mut c_char,
    pub email: *mut c_char,
    pub full_name: *mut c_char,
}

impl FfiProfile {
    pub(crate) fn from_core(profile: &Profile) -> *mut Self {
        Box::into_raw(Box::new(FfiProfile {
            id: profile.id,
            first_name: c_string(&profile.first_name),
            last_name: c_string(&profile.last_name),
            email: c_string(&profile.email),
            full_name: c_string(&profile.full_name()),
        }))
    }
}

/// One server-side validation message tied to a named input.
#[repr(C)]
pub struct FfiFieldError {
    pub field: *mut c_char,
    pub message: *mut c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiMoodResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    EmptyResponse = 1,
    Unauthorized = 2,
    Validation = 3,
    Server = 4,
    Transport = 5,
    Serialization = 6,
    Deserialization = 7,
    Store = 8,
    Panic = 9,
    NullArg = 10,
}

impl From<&ApiError> for FfiErrorCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::EmptyResponse => FfiErrorCode::EmptyResponse,
            ApiError::Unauthorized => FfiErrorCode::Unauthorized,
            ApiError::Validation { .. } => FfiErrorCode::Validation,
            ApiError::Server { .. } => FfiErrorCode::Server,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
        }
    }
}

/// Tag that tells `mood_free_result` what `FfiMoodResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Mood = 1,
    MoodList = 2,
    Advice = 3,
    Auth = 4,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag`. On failure `error_message`
/// is the user-readable text, `unauthorized` says the session was cleared,
/// and `field_errors` carries per-input messages from a 400.
#[repr(C)]
pub struct FfiMoodResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub unauthorized: bool,
    pub field_errors: *mut FfiFieldError,
    pub field_errors_len: u32,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiMoodResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiMoodResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            unauthorized: false,
            field_errors: std::ptr::null_mut(),
            field_errors_len: 0,
            data_tag,
            data,
        }))
    }

    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    pub(crate) fn ok_mood(entry: MoodEntry) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiMoodEntry::from_core(entry)));
        Self::ok(FfiDataTag::Mood, data as *mut c_void)
    }

    pub(crate) fn ok_mood_list(entries: Vec<MoodEntry>) -> *mut Self {
        let items = entries.into_iter().map(FfiMoodEntry::from_core).collect();
        let (items, len) = into_raw_parts(items);
        let data = Box::into_raw(Box::new(FfiMoodList { items, len }));
        Self::ok(FfiDataTag::MoodList, data as *mut c_void)
    }

    pub(crate) fn ok_advice(advice: AdviceEntry) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiAdvice {
            advice: c_string(&advice.advice),
            created_at: c_string(&advice.created_at),
        }));
        Self::ok(FfiDataTag::Advice, data as *mut c_void)
    }

    pub(crate) fn ok_auth(auth: AuthResponse) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiAuth {
            token: auth.token.as_deref().map_or(std::ptr::null_mut(), c_string),
            user_id: auth.user_id,
            email: c_string(&auth.email),
            first_name: c_string(&auth.first_name),
            last_name: c_string(&auth.last_name),
        }));
        Self::ok(FfiDataTag::Auth, data as *mut c_void)
    }

    /// Build an error result. `failure` is `None` only when the core
    /// produced no failure to describe.
    pub(crate) fn from_failure(
        error_code: FfiErrorCode,
        http_status: u16,
        failure: Option<&Failure>,
    ) -> *mut Self {
        let message = failure.map_or(UNKNOWN_ERROR, |f| f.message.as_str());
        let fields = failure
            .and_then(|f| f.field_errors.as_ref())
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, message)| FfiFieldError {
                        field: c_string(field),
                        message: c_string(message),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let (field_errors, field_errors_len) = into_raw_parts(fields);

        Box::into_raw(Box::new(FfiMoodResult {
            error_code,
            error_message: c_string(message),
            http_status,
            unauthorized: failure.is_some_and(|f| f.unauthorized),
            field_errors,
            field_errors_len,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let failure = Failure::message(format!("null argument: {name}"));
        Self::from_failure(FfiErrorCode::NullArg, 0, Some(&failure))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::from_failure(FfiErrorCode::Panic, 0, Some(&Failure::message(msg)))
    }
}
