use std::time::Duration;

use fieldops_client::{
    decode_rows, Assignor, ClientSettings, EnvelopeTable, FailureKind, ListSource, ReqwestFetcher,
    Resource, User,
};
use fieldops_core::{build, FilterKey, FilterSet, PageRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> ReqwestFetcher {
    ReqwestFetcher::new(
        ClientSettings::with_base_url(server.uri()),
        EnvelopeTable::default(),
    )
    .expect("client")
}

#[tokio::test]
async fn assignor_list_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assignor"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("accept", "*/*"))
        .respond_with(
            // The backend does not always label JSON as JSON.
            ResponseTemplate::new(200).set_body_raw(
                r#"{"data":{"Assignors":[{"assignorId":"A1","assignor":"Acme"}],"totalNoOfRecords":1}}"#,
                "text/plain",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let descriptor = build("/assignor", &FilterSet::new(), PageRequest::new(0, 10));

    let raw = fetcher
        .fetch(Resource::Assignors, &descriptor, "tok-1")
        .await
        .expect("fetch ok");
    assert_eq!(raw.total_count, 1);
    assert_eq!(
        raw.items,
        vec![json!({"assignorId": "A1", "assignor": "Acme"})]
    );

    let typed = decode_rows::<Assignor>(raw).expect("decode");
    assert_eq!(typed.items[0].assignor_id, "A1");
    assert_eq!(typed.items[0].assignor, "Acme");
}

#[tokio::test]
async fn assignment_filters_reach_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assignments"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .and(query_param("assignedBy", "A1"))
        .and(query_param("startDate", "2024-01-01"))
        .and(query_param("endDate", "2024-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"result": [], "totalNoOfRecords": 20}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = FilterSet::new()
        .with(FilterKey::AssignorId, "A1")
        .with(FilterKey::StartDate, "2024-01-01")
        .with(FilterKey::EndDate, "2024-01-31");
    let descriptor = build("/assignments", &filters, PageRequest::new(20, 10));

    let list = fetcher_for(&server)
        .fetch(Resource::Assignments, &descriptor, "tok")
        .await
        .expect("fetch ok");

    assert!(list.items.is_empty());
    assert_eq!(list.total_count, 20);
}

#[tokio::test]
async fn users_without_count_use_row_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"userId": "U1", "userName": "Ravi", "phoneNumber": "555", "deviceId": "D1"},
                {"userId": 2, "userName": "Mei", "phoneNumber": 777}
            ]
        })))
        .mount(&server)
        .await;

    let descriptor = build("/users", &FilterSet::new(), PageRequest::new(0, 10));
    let raw = fetcher_for(&server)
        .fetch(Resource::Users, &descriptor, "tok")
        .await
        .expect("fetch ok");
    let users = decode_rows::<User>(raw).expect("decode");

    assert_eq!(users.total_count, 2);
    assert_eq!(users.items[1].user_id, "2");
    assert_eq!(users.items[1].phone_number.as_deref(), Some("777"));
    assert_eq!(users.items[1].device_id, None);
}

#[tokio::test]
async fn status_codes_map_to_failure_kinds() {
    let server = MockServer::start().await;
    for (route, status) in [("/assignor", 401), ("/users", 404), ("/assignments", 502)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }
    let fetcher = fetcher_for(&server);
    let page = PageRequest::new(0, 10);

    let cases = [
        (Resource::Assignors, FailureKind::Unauthorized),
        (Resource::Users, FailureKind::NotFound),
        (Resource::Assignments, FailureKind::ServerError(502)),
    ];
    for (resource, expected) in cases {
        let descriptor = build(resource.list_path(), &FilterSet::new(), page);
        let err = fetcher
            .fetch(resource, &descriptor, "tok")
            .await
            .unwrap_err();
        assert_eq!(err.kind, expected, "{resource}");
    }
}

#[tokio::test]
async fn unexpected_envelope_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"rows": []}})))
        .mount(&server)
        .await;

    let descriptor = build("/assignments", &FilterSet::new(), PageRequest::new(0, 10));
    let err = fetcher_for(&server)
        .fetch(Resource::Assignments, &descriptor, "tok")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_backend_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"data": []})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::with_base_url(server.uri())
    };
    let fetcher = ReqwestFetcher::new(settings, EnvelopeTable::default()).expect("client");
    let descriptor = build("/users", &FilterSet::new(), PageRequest::new(0, 10));

    let err = fetcher
        .fetch(Resource::Users, &descriptor, "tok")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn blank_token_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let descriptor = build("/users", &FilterSet::new(), PageRequest::new(0, 10));
    let err = fetcher_for(&server)
        .fetch(Resource::Users, &descriptor, "  ")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Unauthenticated);
}
