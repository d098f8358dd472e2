//! Integration tests for the bear facts skill
//!
//! These tests drive the skill through its public surface: the dispatch
//! pipeline, content loaded from disk, and the HTTP endpoint on a live
//! listener.

use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

use bear_facts_skill::{
    config::Config,
    error::{ConfigError, HandlerFault},
    facts::{FactProvider, ENGLISH_FACTS, SPANISH_FACTS},
    i18n::{strings, LocaleBundle, Translator},
    server::{self, AppState},
    skill::{
        handlers, EnvelopeVerifier, HandlerEntry, LocalizationInterceptor, Matcher, Request,
        RequestContext, RequestEnvelope, RequestKind, Response, Skill,
    },
};

// ==================== Test Helpers ====================

fn bundle() -> Arc<LocaleBundle> {
    Arc::new(LocaleBundle::builtin("en").expect("built-in bundle is valid"))
}

fn facts() -> Arc<FactProvider> {
    Arc::new(FactProvider::builtin("en").expect("built-in facts are valid"))
}

fn skill() -> Skill {
    Skill::bear_facts(bundle(), facts(), Some("bear-facts-test/0.1".to_string()))
        .expect("bear facts skill builds")
}

fn envelope_json(request: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "session": {
            "sessionId": "amzn1.echo-api.session.test",
            "new": true,
            "application": { "applicationId": "amzn1.ask.skill.test" }
        },
        "request": request
    })
}

fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        port: 0,
        default_locale: "en".to_string(),
        locale_bundle_path: Some(temp_dir.path().join("bundle.json")),
        facts_path: Some(temp_dir.path().join("facts.json")),
        skill_id: None,
        timestamp_tolerance_secs: 0,
        user_agent: "bear-facts-test/0.1".to_string(),
    }
}

fn is_english_fact(fact: &str) -> bool {
    ENGLISH_FACTS.iter().any(|f| *f == fact)
}

fn is_spanish_fact(fact: &str) -> bool {
    SPANISH_FACTS.iter().any(|f| *f == fact)
}

// ==================== Dispatch Tests ====================

#[test]
fn test_launch_english() {
    let response = skill().handle(&Request::launch("en-US"));
    assert!(response.speech_text().starts_with("Hello!"));
    assert_eq!(response.reprompt_text(), Some(response.speech_text()));
    assert!(!response.should_end_session());
}

#[test]
fn test_fact_intent_spanish_region() {
    let response = skill().handle(&Request::intent(handlers::FACT_INTENT, "es-MX"));
    let fact = response
        .speech_text()
        .strip_prefix("Aquí te va un dato... ")
        .expect("Spanish lead-in");
    assert!(is_spanish_fact(fact));
    assert!(!response.should_end_session());
}

#[test]
fn test_stop_intent_spanish() {
    let response = skill().handle(&Request::intent(handlers::STOP_INTENT, "es-ES"));
    assert_eq!(response.speech_text(), "¡Adiós popó!");
    assert_eq!(response.reprompt_text(), None);
    assert!(response.should_end_session());
}

#[test]
fn test_unknown_intent_reflected() {
    let response = skill().handle(&Request::intent("WeatherIntent", "en-US"));
    assert_eq!(response.speech_text(), "You just triggered WeatherIntent");
}

#[test]
fn test_navigate_home_reaches_reflector() {
    let response = skill().handle(&Request::intent(handlers::NAVIGATE_HOME_INTENT, "en-US"));
    assert_eq!(
        response.speech_text(),
        format!("You just triggered {}", handlers::NAVIGATE_HOME_INTENT)
    );
}

#[test]
fn test_unsupported_locale_falls_back_to_default() {
    let response = skill().handle(&Request::intent(handlers::CANCEL_INTENT, "fr-FR"));
    assert_eq!(response.speech_text(), "Goodbye!");
}

#[test]
fn test_session_ended_empty() {
    let response = skill().handle(&Request::session_ended("en-US"));
    assert_eq!(response, Response::empty());
}

#[test]
fn test_handler_fault_recovered_with_localized_apology() {
    let skill = Skill::builder(bundle())
        .add_request_handler(HandlerEntry::new(
            "Launch",
            Matcher::Kind(RequestKind::Launch),
            |_: &Request, _: &RequestContext| Ok(Response::speak("hi")),
        ))
        .add_request_handler(HandlerEntry::new(
            "Broken",
            Matcher::AnyIntent,
            |_: &Request, _: &RequestContext| -> Result<Response, HandlerFault> { panic!("boom") },
        ))
        .add_request_handler(HandlerEntry::new(
            "Ended",
            Matcher::Kind(RequestKind::SessionEnded),
            |_: &Request, _: &RequestContext| Ok(Response::empty()),
        ))
        .error_handler(handlers::error_handler)
        .add_request_interceptor(LocalizationInterceptor::new(bundle()))
        .build()
        .expect("skill builds");

    let response = skill.handle(&Request::intent("AnyIntent", "es-MX"));
    assert!(response.speech_text().starts_with("Lo siento"));
    assert!(!response.should_end_session());
    assert_eq!(skill.metrics().errors(), 1);
}

#[test]
fn test_missing_coverage_rejected_at_build() {
    let result = Skill::builder(bundle())
        .add_request_handler(HandlerEntry::new(
            "Launch",
            Matcher::Kind(RequestKind::Launch),
            |_: &Request, _: &RequestContext| Ok(Response::speak("hi")),
        ))
        .build();

    assert!(matches!(result, Err(ConfigError::UncoveredRequestKind(_))));
}

// ==================== Envelope Tests ====================

#[test]
fn test_envelope_round_trip_through_skill() {
    let envelope: RequestEnvelope = serde_json::from_value(envelope_json(serde_json::json!({
        "type": "IntentRequest",
        "requestId": "amzn1.echo-api.request.1",
        "timestamp": "2024-05-01T12:00:00Z",
        "locale": "en-GB",
        "intent": { "name": "AMAZON.HelpIntent", "confirmationStatus": "NONE" }
    })))
    .expect("valid envelope");

    let json = serde_json::to_value(skill().handle_envelope(&envelope)).unwrap();
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["userAgent"], "bear-facts-test/0.1");
    assert_eq!(json["response"]["outputSpeech"]["type"], "PlainText");
    assert!(json["response"]["outputSpeech"]["text"]
        .as_str()
        .unwrap()
        .starts_with("You can say"));
    assert_eq!(json["response"]["shouldEndSession"], false);
}

#[test]
fn test_envelope_unsupported_type_answered() {
    let envelope: RequestEnvelope = serde_json::from_value(envelope_json(serde_json::json!({
        "type": "CanFulfillIntentRequest",
        "locale": "es-US"
    })))
    .expect("valid envelope");

    let skill = skill();
    let json = serde_json::to_value(skill.handle_envelope(&envelope)).unwrap();
    assert!(json["response"]["outputSpeech"]["text"]
        .as_str()
        .unwrap()
        .starts_with("Lo siento"));
    assert_eq!(skill.metrics().errors(), 1);
}

// ==================== Content Loading Tests ====================

#[test]
fn test_skill_from_config_loads_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);

    let mut bundle = serde_json::Map::new();
    for (locale, table) in strings::builtin_locales() {
        bundle.insert(locale, serde_json::json!({ "translation": table }));
    }
    std::fs::write(
        temp_dir.path().join("bundle.json"),
        serde_json::to_string(&bundle).unwrap(),
    )
    .expect("Failed to write bundle");
    std::fs::write(
        temp_dir.path().join("facts.json"),
        r#"{ "en": ["Only fact."], "es": ["Único dato."] }"#,
    )
    .expect("Failed to write facts");

    let skill = Skill::from_config(&config).expect("skill loads from files");

    let response = skill.handle(&Request::intent(handlers::FACT_INTENT, "en-AU"));
    assert_eq!(response.speech_text(), "A fun fact is... Only fact.");
    let response = skill.handle(&Request::intent(handlers::FACT_INTENT, "es-419"));
    assert_eq!(response.speech_text(), "Aquí te va un dato... Único dato.");
}

#[test]
fn test_skill_from_config_rejects_incomplete_bundle() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);

    std::fs::write(
        temp_dir.path().join("bundle.json"),
        r#"{ "en": { "translation": { "WELCOME_MSG": "Hi" } } }"#,
    )
    .expect("Failed to write bundle");
    std::fs::write(temp_dir.path().join("facts.json"), r#"{ "en": ["fact"] }"#)
        .expect("Failed to write facts");

    let err = Skill::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey { .. }));
}

#[test]
fn test_skill_from_config_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);

    let err = Skill::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Load { .. }));
}

#[test]
fn test_empty_fact_list_rejected() {
    let err = FactProvider::from_json_str("en", r#"{ "en": [] }"#).unwrap_err();
    assert_eq!(err, ConfigError::EmptyFacts("en".to_string()));
}

// ==================== Property Tests ====================

proptest! {
    #[test]
    fn prop_region_resolves_like_primary(
        region in "[A-Z]{2}",
        key_index in 0..strings::REQUIRED_KEYS.len(),
    ) {
        let bundle = bundle();
        let key = strings::REQUIRED_KEYS[key_index];
        let args: &[&str] = if key == strings::REFLECTOR_MSG { &["X"] } else { &[] };

        for primary in ["en", "es"] {
            let tag = format!("{}-{}", primary, region);
            prop_assert_eq!(
                bundle.resolve(&tag, key, args).unwrap(),
                bundle.resolve(primary, key, args).unwrap()
            );
        }
    }

    #[test]
    fn prop_unknown_primary_resolves_like_default(primary in "[f-z]{2}", region in "[A-Z]{2}") {
        let bundle = bundle();
        let translator = Translator::new(Arc::clone(&bundle), format!("{}-{}", primary, region));
        prop_assert_eq!(translator.locale(), "en");
        prop_assert_eq!(
            translator.t(strings::GOODBYE_MSG).unwrap(),
            bundle.resolve("en", strings::GOODBYE_MSG, &[]).unwrap()
        );
    }

    #[test]
    fn prop_pick_returns_member(region in "[A-Z]{2}", spanish in any::<bool>()) {
        let facts = facts();
        let tag = format!("{}-{}", if spanish { "es" } else { "en" }, region);
        let fact = facts.pick(&tag);
        if spanish {
            prop_assert!(is_spanish_fact(fact));
        } else {
            prop_assert!(is_english_fact(fact));
        }
    }

    #[test]
    fn prop_reflector_names_any_intent(name in "[A-Z][A-Za-z]{0,20}Intent") {
        prop_assume!(!handlers::DECLARED_INTENTS.iter().any(|declared| *declared == name));
        let response = skill().handle(&Request::intent(&name, "en-US"));
        prop_assert_eq!(response.speech_text(), format!("You just triggered {}", name));
    }
}

// ==================== HTTP Endpoint Tests ====================

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn_server(verifier: EnvelopeVerifier) -> String {
    let state = Arc::new(AppState::new(skill(), verifier));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, server::router(state))
            .await
            .expect("server runs");
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_http_launch_request() {
    let base_url = spawn_server(EnvelopeVerifier::permissive()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/", base_url))
        .json(&envelope_json(serde_json::json!({
            "type": "LaunchRequest",
            "locale": "es-ES"
        })))
        .send()
        .await
        .expect("request sent");

    assert_eq!(response.status(), 200);
    let json: serde_json::Value = response.json().await.expect("json body");
    assert!(json["response"]["outputSpeech"]["text"]
        .as_str()
        .unwrap()
        .starts_with("¡Hola!"));
    assert_eq!(json["response"]["shouldEndSession"], false);
}

#[tokio::test]
async fn test_http_rejects_wrong_skill_id() {
    let base_url =
        spawn_server(EnvelopeVerifier::permissive().with_skill_id("amzn1.ask.skill.other")).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/", base_url))
        .json(&envelope_json(serde_json::json!({
            "type": "LaunchRequest",
            "locale": "en-US"
        })))
        .send()
        .await
        .expect("request sent");
    assert_eq!(response.status(), 400);

    let metrics: serde_json::Value = client
        .get(format!("{}/metrics", base_url))
        .send()
        .await
        .expect("request sent")
        .json()
        .await
        .expect("json body");
    assert_eq!(metrics["rejected"], 1);
    assert_eq!(metrics["requests"], 0);
}

#[tokio::test]
async fn test_http_timestamp_checked() {
    let base_url = spawn_server(EnvelopeVerifier::permissive().with_timestamp_tolerance(150)).await;
    let client = reqwest::Client::new();

    let fresh = client
        .post(format!("{}/", base_url))
        .json(&envelope_json(serde_json::json!({
            "type": "SessionEndedRequest",
            "locale": "en-US",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "reason": "USER_INITIATED"
        })))
        .send()
        .await
        .expect("request sent");
    assert_eq!(fresh.status(), 200);

    let stale = client
        .post(format!("{}/", base_url))
        .json(&envelope_json(serde_json::json!({
            "type": "SessionEndedRequest",
            "locale": "en-US",
            "timestamp": "2020-01-01T00:00:00Z"
        })))
        .send()
        .await
        .expect("request sent");
    assert_eq!(stale.status(), 400);
}

#[tokio::test]
async fn test_http_malformed_body() {
    let base_url = spawn_server(EnvelopeVerifier::permissive()).await;
    let response = reqwest::Client::new()
        .post(format!("{}/", base_url))
        .body("{ not json")
        .send()
        .await
        .expect("request sent");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_http_health_and_metrics() {
    let base_url = spawn_server(EnvelopeVerifier::permissive()).await;
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("request sent");
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");

    client
        .post(format!("{}/", base_url))
        .json(&envelope_json(serde_json::json!({
            "type": "IntentRequest",
            "locale": "en-US",
            "intent": { "name": "FrasesIntent" }
        })))
        .send()
        .await
        .expect("request sent");

    let metrics: serde_json::Value = client
        .get(format!("{}/metrics", base_url))
        .send()
        .await
        .expect("request sent")
        .json()
        .await
        .expect("json body");
    assert_eq!(metrics["requests"], 1);
    assert_eq!(metrics["handled"], 1);
    assert_eq!(metrics["intent_requests"], 1);
}
