//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::collections::BTreeMap;

use moodmate_core::{
    AdviceEntry, ApiError, AuthResponse, HttpMethod, HttpRequest, HttpResponse, LoginRequest,
    MoodClient, MoodEntry, MoodRequest, RegisterRequest,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

fn client() -> MoodClient {
    MoodClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Compare method, path, headers and JSON body against `expected`.
fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .map(|headers| {
            headers
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert_eq!(req.body, None, "{name}: body"),
    }
}

fn vectors(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[test]
fn register_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/auth.json"));
    let c = client();
    for case in vectors["register"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: RegisterRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_register(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let auth = c.parse_register(simulated(case)).unwrap();
        let expected: AuthResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(auth, expected, "{name}: parsed result");
        assert!(auth.credentials().is_some(), "{name}: credentials");
    }
}

#[test]
fn login_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/auth.json"));
    let c = client();
    for case in vectors["login"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: LoginRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_login(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let auth = c.parse_login(simulated(case)).unwrap();
        let expected: AuthResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(auth, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Moods
// ---------------------------------------------------------------------------

#[test]
fn add_mood_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/moods.json"));
    let c = client();
    for case in vectors["add"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: MoodRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_add_mood(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let entry = c.parse_add_mood(simulated(case)).unwrap();
        let expected: MoodEntry = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(entry, expected, "{name}: parsed result");
    }
}

#[test]
fn update_mood_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/moods.json"));
    let c = client();
    for case in vectors["update"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["id"].as_i64().unwrap();
        let input: MoodRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_mood(id, &input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let entry = c.parse_update_mood(simulated(case)).unwrap();
        let expected: MoodEntry = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(entry, expected, "{name}: parsed result");
    }
}

#[test]
fn delete_mood_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/moods.json"));
    let c = client();
    for case in vectors["delete"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["id"].as_i64().unwrap();

        let req = c.build_delete_mood(id);
        assert_eq!(req.method, HttpMethod::Delete, "{name}: method");
        assert_eq!(
            req.path,
            format!("{BASE_URL}{}", case["expected_path"].as_str().unwrap()),
            "{name}: path"
        );
        assert!(req.body.is_none(), "{name}: body");

        c.parse_delete_mood(simulated(case)).unwrap();
    }
}

#[test]
fn list_moods_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/moods.json"));
    let c = client();

    let req = c.build_list_moods();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.path, format!("{BASE_URL}/api/moods"));

    for case in vectors["list"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let moods = c.parse_list_moods(simulated(case)).unwrap();
        let expected: Vec<MoodEntry> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(moods, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Advice
// ---------------------------------------------------------------------------

#[test]
fn advice_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/advice.json"));
    let c = client();

    let generate = &vectors["generate"];
    check_request("generate", &c.build_generate_advice(), &generate["expected_request"]);
    let advice = c.parse_generate_advice(simulated(generate)).unwrap();
    let expected: AdviceEntry = serde_json::from_value(generate["expected_result"].clone()).unwrap();
    assert_eq!(advice, expected);

    let latest = &vectors["latest"];
    check_request("latest", &c.build_latest_advice(), &latest["expected_request"]);
    let advice = c.parse_latest_advice(simulated(latest)).unwrap();
    let expected: AdviceEntry = serde_json::from_value(latest["expected_result"].clone()).unwrap();
    assert_eq!(advice, expected);
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let vectors = vectors(include_str!("../../test-vectors/errors.json"));
    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::new(
            case["status"].as_u64().unwrap() as u16,
            case["body"].as_str().unwrap(),
        );
        let err = c.parse_list_moods(response).unwrap_err();
        let expected = &case["expected_error"];

        match (expected["kind"].as_str().unwrap(), &err) {
            ("empty_response", ApiError::EmptyResponse) => {}
            ("unauthorized", ApiError::Unauthorized) => {}
            ("deserialization", ApiError::Deserialization(_)) => {}
            ("validation", ApiError::Validation { fields }) => {
                let want: BTreeMap<String, String> =
                    serde_json::from_value(expected["fields"].clone()).unwrap();
                assert_eq!(fields, &want, "{name}: fields");
            }
            ("server", ApiError::Server { status, message }) => {
                assert_eq!(u64::from(*status), expected["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
            }
            (kind, other) => panic!("{name}: expected {kind}, got {other:?}"),
        }
    }
}
