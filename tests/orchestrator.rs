//! Retry, classification and facade tests against a mocked transport.

use async_trait::async_trait;
use courtlistener::retry::NeverRetry;
use courtlistener::{
    CancellationToken, Client, Error, ErrorKind, Params, Payload, RawResponse, RequestMetadata,
    RetryStrategy, StaticProvider, Transport, TransportError,
};
use http::{Method, StatusCode};
use mockall::{mock, Sequence};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

mock! {
    pub Api {}

    #[async_trait]
    impl Transport for Api {
        async fn execute(&self, request: &RequestMetadata) -> Result<RawResponse, TransportError>;
    }
}

type Outcome = Result<RawResponse, TransportError>;

fn status(code: u16, body: &str) -> Outcome {
    Ok(RawResponse::new(StatusCode::from_u16(code).unwrap(), body))
}

fn ok() -> Outcome {
    status(200, "{}")
}

/// Expects exactly one call per outcome, answered in order.
fn scripted(outcomes: impl IntoIterator<Item = Outcome>) -> MockApi {
    let mut transport = MockApi::new();
    let mut seq = Sequence::new();
    for outcome in outcomes {
        transport
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_| outcome);
    }
    transport
}

/// Expects one call matching `matches`, next in `seq`.
fn expect_call<F>(transport: &mut MockApi, seq: &mut Sequence, matches: F, outcome: Outcome)
where
    F: Fn(&RequestMetadata) -> bool + Send + 'static,
{
    transport
        .expect_execute()
        .withf(matches)
        .times(1)
        .in_sequence(seq)
        .return_once(move |_| outcome);
}

fn is(method: Method, path: &'static str) -> impl Fn(&RequestMetadata) -> bool + Send + 'static {
    move |request: &RequestMetadata| request.method == method && request.path == path
}

fn mocked_client(transport: MockApi) -> Client {
    Client::builder()
        .api_token("test-token")
        .retry_delay(Duration::from_millis(5))
        .transport(Arc::new(transport))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_final_client_errors_are_not_retried() {
    for (code, kind) in [
        (401, ErrorKind::Authentication),
        (403, ErrorKind::Authentication),
        (404, ErrorKind::NotFound),
        (400, ErrorKind::Api),
        (422, ErrorKind::Api),
    ] {
        let client = mocked_client(scripted([status(code, "nope")]));
        let err = client.get("dockets/", Params::new()).await.unwrap_err();

        assert_eq!(err.kind(), kind, "status {}", code);
    }
}

#[tokio::test]
async fn test_server_errors_exhaust_attempts() {
    let client = mocked_client(scripted((0..3).map(|_| status(500, "boom"))));
    let err = client.get("courts/", Params::new()).await.unwrap_err();

    assert!(matches!(err, Error::Server { .. }));
    assert_eq!(err.raw_response(), Some("boom"));
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let client = mocked_client(scripted([
        status(429, ""),
        status(429, ""),
        status(200, r#"{"id": 1}"#),
    ]));
    let response = client.get("opinions/1/", Params::new()).await.unwrap();

    assert_eq!(response.attempts, 3);
    assert_eq!(response.data, Payload::Json(json!({"id": 1})));
}

#[tokio::test]
async fn test_rate_limit_exhaustion_surfaces_rate_limit() {
    let client = mocked_client(scripted((0..3).map(|_| status(429, "slow down"))));
    let err = client.get("search/", Params::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert_eq!(err.message(), "Rate limit exceeded. Please try again later.");
}

#[tokio::test]
async fn test_connection_failures_are_retried_then_surface() {
    let client = mocked_client(scripted(
        (0..3).map(|_| Err(TransportError::Connect("refused".into()))),
    ));
    let err = client.get("dockets/", Params::new()).await.unwrap_err();

    assert!(matches!(err, Error::Connection { timed_out: false, .. }));
    assert_eq!(err.message(), "Connection error: refused");
}

#[tokio::test]
async fn test_connection_failure_then_success() {
    let client = mocked_client(scripted([
        Err(TransportError::Timeout("deadline".into())),
        Err(TransportError::Connect("reset".into())),
        status(200, "[]"),
    ]));
    let response = client.get("tag/", Params::new()).await.unwrap();

    assert_eq!(response.attempts, 3);
    assert!(response.was_retried());
    assert_eq!(response.data, Payload::Json(json!([])));
}

#[tokio::test]
async fn test_timeout_is_flagged() {
    let client = mocked_client(scripted(
        (0..3).map(|_| Err(TransportError::Timeout("30s".into()))),
    ));
    let err = client.get("dockets/", Params::new()).await.unwrap_err();

    assert!(matches!(err, Error::Connection { timed_out: true, .. }));
}

#[tokio::test]
async fn test_request_failure_is_final() {
    let client = mocked_client(scripted([Err(TransportError::Request("bad url".into()))]));
    let err = client.get("dockets/", Params::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.message(), "Request failed: bad url");
}

#[tokio::test]
async fn test_lenient_decoding() {
    let client = mocked_client(scripted([
        status(200, ""),
        status(200, "<html>down for maintenance</html>"),
        status(201, r#"{"results": [{"id": 3}], "next": null}"#),
    ]));

    let empty = client.get("a/", Params::new()).await.unwrap();
    assert_eq!(empty.data, Payload::Text(String::new()));

    let html = client.get("b/", Params::new()).await.unwrap();
    assert_eq!(html.as_text(), Some("<html>down for maintenance</html>"));

    let json = client.get("c/", Params::new()).await.unwrap();
    assert_eq!(
        json.data,
        Payload::Json(json!({"results": [{"id": 3}], "next": null}))
    );
}

#[tokio::test]
async fn test_linear_backoff_waits_between_attempts() {
    let client = Client::builder()
        .api_token("test-token")
        .retry_delay(Duration::from_millis(20))
        .transport(Arc::new(scripted([
            status(503, ""),
            status(502, ""),
            status(200, "{}"),
        ])))
        .build()
        .unwrap();

    let start = Instant::now();
    client.get("courts/", Params::new()).await.unwrap();

    // 20ms after the first failure, 40ms after the second.
    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_max_retries_bounds_attempts() {
    let client = Client::builder()
        .api_token("test-token")
        .max_retries(5)
        .retry_delay(Duration::from_millis(1))
        .transport(Arc::new(scripted((0..5).map(|_| status(500, "")))))
        .build()
        .unwrap();
    client.get("courts/", Params::new()).await.unwrap_err();

    let client = Client::builder()
        .api_token("test-token")
        .max_retries(1)
        .transport(Arc::new(scripted([status(500, "")])))
        .build()
        .unwrap();
    client.get("courts/", Params::new()).await.unwrap_err();
}

#[tokio::test]
async fn test_swapped_strategy_and_predicate() {
    let client = Client::builder()
        .api_token("test-token")
        .retry_strategy(RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_retries: 4,
            jitter: true,
        })
        .transport(Arc::new(scripted((0..4).map(|_| status(500, "")))))
        .build()
        .unwrap();
    client.get("courts/", Params::new()).await.unwrap_err();

    let client = Client::builder()
        .api_token("test-token")
        .retry_predicate(Box::new(NeverRetry))
        .transport(Arc::new(scripted([status(500, "")])))
        .build()
        .unwrap();
    client.get("courts/", Params::new()).await.unwrap_err();

    let client = Client::builder()
        .api_token("test-token")
        .retry_strategy(RetryStrategy::None)
        .transport(Arc::new(scripted([status(500, "")])))
        .build()
        .unwrap();
    client.get("courts/", Params::new()).await.unwrap_err();
}

#[tokio::test]
async fn test_missing_token_fails_before_any_call() {
    let mut transport = MockApi::new();
    transport.expect_execute().never();
    let err = Client::builder()
        .api_token("")
        .transport(Arc::new(transport))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let mut transport = MockApi::new();
    transport.expect_execute().never();
    let err = Client::builder()
        .transport(Arc::new(transport))
        .config_provider(StaticProvider::new([("COURTLISTENER_BASE_URL", "http://localhost/")]))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_invalid_settings_are_configuration_errors() {
    assert_eq!(
        Client::builder()
            .api_token("t")
            .max_retries(0)
            .build()
            .unwrap_err()
            .kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        Client::builder()
            .api_token("t")
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err()
            .kind(),
        ErrorKind::Configuration
    );
    assert!(matches!(
        Client::builder().base_url("ftp://example.com/"),
        Err(Error::Configuration(_))
    ));
}

#[tokio::test]
async fn test_cancelled_before_first_attempt() {
    let mut transport = MockApi::new();
    transport.expect_execute().never();
    let client = mocked_client(transport);
    let token = CancellationToken::new();
    token.cancel();

    let err = client
        .request_with_cancellation(RequestMetadata::new(Method::GET, "dockets/"), &token)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_cancelled_during_backoff() {
    let client = Client::builder()
        .api_token("test-token")
        .retry_delay(Duration::from_secs(30))
        .transport(Arc::new(scripted([status(503, "")])))
        .build()
        .unwrap();

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = client
        .request_with_cancellation(RequestMetadata::new(Method::GET, "dockets/"), &token)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_facade_verbs_build_expected_requests() {
    let mut transport = MockApi::new();
    let mut seq = Sequence::new();

    expect_call(
        &mut transport,
        &mut seq,
        |r| r.method == Method::GET && r.path == "alerts/" && r.query.get_str("rate") == Some("dly"),
        ok(),
    );
    expect_call(&mut transport, &mut seq, is(Method::GET, "alerts/12/"), ok());
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.method == Method::POST && r.path == "alerts/" && r.body == Some(json!({"name": "x"})),
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.method == Method::PUT && r.path == "alerts/12/" && r.body == Some(json!({"name": "y"})),
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.method == Method::PATCH && r.path == "alerts/12/" && r.body == Some(json!({"rate": "wly"})),
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.method == Method::DELETE && r.path == "alerts/12/" && r.body.is_none(),
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.path == "alerts/search/" && r.query.get_str("q") == Some("privacy"),
        ok(),
    );
    expect_call(&mut transport, &mut seq, is(Method::GET, "alerts/12/history/"), ok());
    expect_call(&mut transport, &mut seq, is(Method::GET, "alerts/export/"), ok());

    let client = mocked_client(transport);
    let alerts = client.alerts();

    alerts.list(Params::from([("rate", "dly")])).await.unwrap();
    alerts.get(12, Params::new()).await.unwrap();
    alerts.create(json!({"name": "x"})).await.unwrap();
    alerts.update(12, json!({"name": "y"})).await.unwrap();
    alerts.patch(12, json!({"rate": "wly"})).await.unwrap();
    alerts.delete(12).await.unwrap();
    alerts.search(Params::from([("q", "privacy")])).await.unwrap();
    alerts.nested(12, "history/", Params::new()).await.unwrap();
    alerts.action("export/", Params::new()).await.unwrap();
}

#[tokio::test]
async fn test_every_resource_accessor_targets_its_segment() {
    let mut transport = MockApi::new();
    let mut seq = Sequence::new();

    for resource in courtlistener::RESOURCES {
        expect_call(&mut transport, &mut seq, is(Method::GET, resource.segment), ok());
    }
    expect_call(&mut transport, &mut seq, is(Method::GET, "aba-ratings/"), ok());
    expect_call(
        &mut transport,
        &mut seq,
        is(Method::GET, "originating-court-information/9/"),
        ok(),
    );
    expect_call(&mut transport, &mut seq, is(Method::POST, "recap-fetch/"), ok());

    let client = mocked_client(transport);
    for resource in courtlistener::RESOURCES {
        client.endpoint(resource.segment).list(Params::new()).await.unwrap();
    }
    client.aba_ratings().list(Params::new()).await.unwrap();
    client.originating_court_information().get(9, Params::new()).await.unwrap();
    client.recap_fetch().create(json!({"request_type": 1})).await.unwrap();
}

#[tokio::test]
async fn test_filter_sugar_merges_params() {
    let mut transport = MockApi::new();
    let mut seq = Sequence::new();

    expect_call(
        &mut transport,
        &mut seq,
        |r| {
            r.path == "dockets/"
                && r.query.get_str("court") == Some("scotus")
                && r.query.get_str("order_by") == Some("-date_filed")
        },
        ok(),
    );
    // Caller params override the shortcut's key.
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.query.get("assigned_to") == Some(&json!(99)),
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.path == "opinions/" && r.query.get_str("stat_Precedential") == Some("on"),
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| {
            r.query.get_str("order_by") == Some("-date_filed")
                && r.query.get("per_page") == Some(&json!(5))
                && r.query.get_str("court") == Some("ca9")
        },
        ok(),
    );
    // Explicit date and court arguments win.
    expect_call(
        &mut transport,
        &mut seq,
        |r| {
            r.query.get_str("court") == Some("nysd")
                && r.query.get_str("date_filed__gte") == Some("2023-01-01")
                && !r.query.contains_key("date_filed__lte")
        },
        ok(),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| {
            r.query.get("citation_count__gte") == Some(&json!(10))
                && r.query.get("citation_count__lte") == Some(&json!(50))
        },
        ok(),
    );

    let client = mocked_client(transport);
    client
        .dockets()
        .by_court("scotus", Params::from([("order_by", "-date_filed")]))
        .await
        .unwrap();
    client
        .dockets()
        .by_judge(1234, Params::from([("assigned_to", 99)]))
        .await
        .unwrap();
    client.opinions().precedential(Params::new()).await.unwrap();
    client
        .opinions()
        .recent(5, Params::from([("court", "ca9")]))
        .await
        .unwrap();
    client
        .dockets()
        .by_date_range(
            Some("2023-01-01"),
            None,
            Some("nysd"),
            Params::from([("court", "cand"), ("date_filed__gte", "1999-01-01")]),
        )
        .await
        .unwrap();
    client
        .opinions()
        .by_citation_count(10, Some(50), Params::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_irregular_helpers() {
    let mut transport = MockApi::new();
    let mut seq = Sequence::new();

    expect_call(
        &mut transport,
        &mut seq,
        |r| {
            r.query.get_str("docket_number") == Some("1:23-cv-456")
                && r.query.get_str("court") == Some("nysd")
        },
        status(200, r#"{"count": 1, "results": [{"id": 77, "docket_number": "1:23-cv-456"}]}"#),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| !r.query.contains_key("court"),
        status(200, r#"{"count": 0, "results": []}"#),
    );
    for path in [
        "dockets/77/parties/",
        "dockets/77/recap/",
        "opinions/5/citing/",
        "courts/hierarchy/",
        "courts/",
    ] {
        expect_call(&mut transport, &mut seq, is(Method::GET, path), ok());
    }

    let client = mocked_client(transport);

    let found = client
        .dockets()
        .by_docket_number("1:23-cv-456", Some("nysd"))
        .await
        .unwrap();
    assert_eq!(found.and_then(|r| r.get("id").cloned()), Some(json!(77)));

    let missing = client.dockets().by_docket_number("0", None).await.unwrap();
    assert!(missing.is_none());

    client.dockets().parties(77, Params::new()).await.unwrap();
    client.dockets().recap_documents(77, Params::new()).await.unwrap();
    client.opinions().citing(5, Params::new()).await.unwrap();
    client.courts().hierarchy(Params::new()).await.unwrap();
    client.test_connection().await.unwrap();
}

#[tokio::test]
async fn test_paginator_follows_next_and_stops_on_repeat() {
    let mut transport = MockApi::new();
    let mut seq = Sequence::new();

    expect_call(
        &mut transport,
        &mut seq,
        |r| r.path == "courts/" && r.query.get_str("jurisdiction") == Some("F") && !r.query.contains_key("cursor"),
        status(
            200,
            r#"{"count": 3, "next": "https://example.test/api/rest/v4/courts/?cursor=p2", "results": [{"id": 1}]}"#,
        ),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| {
            r.path == "courts/"
                && r.query.get_str("cursor") == Some("p2")
                && r.query.get_str("jurisdiction") == Some("F")
        },
        status(
            200,
            r#"{"count": 3, "next": "https://example.test/api/rest/v4/courts/?cursor=p3", "results": [{"id": 2}]}"#,
        ),
    );
    expect_call(
        &mut transport,
        &mut seq,
        |r| r.query.get_str("cursor") == Some("p3"),
        status(
            200,
            r#"{"count": 3, "next": "https://example.test/api/rest/v4/courts/?cursor=p3", "results": [{"id": 3}]}"#,
        ),
    );

    let client = mocked_client(transport);
    let results = client
        .courts()
        .paginate(Params::from([("jurisdiction", "F")]))
        .collect_results(None)
        .await
        .unwrap();

    assert_eq!(results, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
}

#[tokio::test]
async fn test_paginator_limit_and_non_envelope() {
    let client = mocked_client(scripted([
        status(200, r#"{"next": "https://example.test/x/?page=2", "results": [1, 2, 3]}"#),
        status(200, r#"{"next": null, "results": [4, 5, 6]}"#),
    ]));
    let results = client
        .paginate("people/", Params::new())
        .collect_results(Some(4))
        .await
        .unwrap();
    assert_eq!(results, vec![json!(1), json!(2), json!(3), json!(4)]);

    let client = mocked_client(scripted([status(200, r#"{"detail": "not a list"}"#)]));
    let mut pages = client.paginate("people/", Params::new());
    assert!(pages.next_page().await.unwrap().is_none());
    assert!(pages.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_zero_limit_sends_no_request() {
    let mut transport = MockApi::new();
    transport.expect_execute().never();
    let client = mocked_client(transport);

    let results = client
        .judges()
        .paginate(Params::new())
        .collect_results(Some(0))
        .await
        .unwrap();

    assert!(results.is_empty());
}
