//! Pipeline tests over the recorded transport: retry, conditional requests,
//! and pagination, asserted against the exact request sequences the client
//! issues.

use std::cell::RefCell;
use std::time::Duration;

use http::{Method, StatusCode};
use wanikani_api::testing::{
    self, ok_response, rate_limited_response, recorded_client, recorded_client_with,
};
use wanikani_api::transport::RecordedResponse;
use wanikani_api::{
    Error, Id, ListParams, Object, ObjectType, Params, Subject, SubjectListParams, Timestamp,
};

fn kanji(id: u64) -> Subject {
    Subject {
        object: Object {
            id: Id(id),
            object_type: ObjectType::Kanji,
            ..Default::default()
        },
        data: None,
    }
}

#[tokio::test]
async fn test_rate_limit_error_surfaces_immediately_by_default() {
    let (client, transport) = recorded_client();
    transport.seed(vec![rate_limited_response()]);

    let err = client
        .subject_list(&SubjectListParams::default())
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            assert_eq!(code, Some(429));
            assert_eq!(message, "You are rate limited");
        }
        other => panic!("expected Api error, got {:?}", other),
    }

    // Exactly one transport call: no retry budget was configured.
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_rate_limit_retries_within_budget() {
    let (client, transport) = recorded_client_with(|b| b.max_retries(2));
    transport.seed(vec![
        rate_limited_response(),
        rate_limited_response(),
        ok_response("{}"),
    ]);

    let subjects = client
        .subject_list(&SubjectListParams::default())
        .await
        .unwrap();

    assert!(subjects.data.data.is_empty());
    assert!(!subjects.not_modified);

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v2/subjects");
    }
}

#[tokio::test]
async fn test_rate_limit_budget_exhaustion_returns_last_error() {
    let (client, transport) = recorded_client_with(|b| b.max_retries(1));
    transport.seed(vec![rate_limited_response(), rate_limited_response()]);

    let err = client
        .subject_list(&SubjectListParams::default())
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_non_rate_limit_api_error_is_not_retried() {
    let (client, transport) = recorded_client_with(|b| b.max_retries(5));
    transport.seed(vec![RecordedResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"code": 500, "error": "Internal server error"}"#,
    )]);

    let err = client
        .subject_list(&SubjectListParams::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_if_modified_since_not_modified() {
    let (client, transport) = recorded_client();
    transport.seed(vec![RecordedResponse::new(StatusCode::NOT_MODIFIED, "{}")]);

    let subjects = client
        .subject_list(&SubjectListParams {
            params: Params {
                if_modified_since: Some(Timestamp::now()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(subjects.not_modified);
    assert!(subjects.data.data.is_empty());
}

#[tokio::test]
async fn test_if_none_match_not_modified() {
    let (client, transport) = recorded_client();
    transport.seed(vec![RecordedResponse::new(StatusCode::NOT_MODIFIED, "{}")]);

    let subjects = client
        .subject_list(&SubjectListParams {
            params: Params {
                if_none_match: Some("\"an-etag\"".to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(subjects.not_modified);
}

#[tokio::test]
async fn test_call_with_timeout_param_succeeds() {
    let (client, transport) = recorded_client();
    transport.seed(vec![ok_response("{}")]);

    let subjects = client
        .subject_list(&SubjectListParams {
            params: Params {
                timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!subjects.not_modified);
}

#[tokio::test]
async fn test_timeout_cancels_during_backoff_sleep() {
    // Backoff sleeps left on so the second attempt would only start after
    // hundreds of milliseconds, far past the call's budget.
    let (client, transport) = recorded_client_with(|b| b.max_retries(2).retry_sleep(true));
    transport.seed(vec![
        rate_limited_response(),
        rate_limited_response(),
        rate_limited_response(),
    ]);

    let err = client
        .subject_list(&SubjectListParams {
            params: Params {
                timeout: Some(Duration::from_millis(10)),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    // The first attempt ran; the budget expired in the backoff sleep before
    // the second could.
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_expired_timeout_cancels_without_retrying() {
    let (client, transport) = recorded_client_with(|b| b.max_retries(5));
    transport.seed(vec![rate_limited_response(), rate_limited_response()]);

    let err = client
        .subject_list(&SubjectListParams {
            params: Params {
                timeout: Some(Duration::ZERO),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_exhausted_recorded_responses() {
    let (client, _transport) = recorded_client();

    let err = client
        .subject_list(&SubjectListParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoRecordedResponses));
}

#[tokio::test]
async fn test_page_fully_follows_cursors_to_the_end() {
    let (client, transport) = recorded_client();
    transport.seed(vec![
        ok_response(
            r#"{
                "pages": {
                    "per_page": 1000,
                    "next_url": "https://api.wanikani.com/v2/subjects?page_after_id=125",
                    "previous_url": null
                },
                "data": [
                    {"id": 123, "object": "kanji"},
                    {"id": 124, "object": "kanji"},
                    {"id": 125, "object": "kanji"}
                ]
            }"#,
        ),
        ok_response(
            r#"{
                "pages": {
                    "per_page": 1000,
                    "next_url": "https://api.wanikani.com/v2/subjects?page_after_id=128",
                    "previous_url": null
                },
                "data": [
                    {"id": 126, "object": "kanji"},
                    {"id": 127, "object": "kanji"},
                    {"id": 128, "object": "kanji"}
                ]
            }"#,
        ),
        ok_response(
            r#"{
                "pages": {
                    "per_page": 1000,
                    "next_url": null,
                    "previous_url": null
                },
                "data": [
                    {"id": 129, "object": "kanji"},
                    {"id": 130, "object": "kanji"},
                    {"id": 131, "object": "kanji"}
                ]
            }"#,
        ),
    ]);

    let subjects = RefCell::new(Vec::<Subject>::new());
    let subjects_ref = &subjects;
    let client_ref = &client;
    client
        .page_fully(|cursor| async move {
            let page = client_ref
                .subject_list(&SubjectListParams {
                    list: ListParams {
                        page_after_id: cursor,
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .await?;
            subjects_ref.borrow_mut().extend(page.data.data);
            Ok(Some(page.data.pages))
        })
        .await
        .unwrap();

    assert_eq!(
        subjects.into_inner(),
        vec![
            // page 1
            kanji(123),
            kanji(124),
            kanji(125),
            // page 2
            kanji(126),
            kanji(127),
            kanji(128),
            // page 3
            kanji(129),
            kanji(130),
            kanji(131),
        ],
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].query, "");
    assert_eq!(testing::decoded_query(&requests[1].query), "page_after_id=125");
    assert_eq!(testing::decoded_query(&requests[2].query), "page_after_id=128");
}

#[tokio::test]
async fn test_page_fully_caller_can_stop_early() {
    let (client, transport) = recorded_client();
    // Both pages advertise a next page; the closure quits on its own.
    transport.seed(vec![
        ok_response(
            r#"{
                "pages": {"per_page": 1000, "next_url": "https://api.wanikani.com/v2/subjects?page_after_id=124", "previous_url": null},
                "data": [{"id": 123, "object": "kanji"}, {"id": 124, "object": "kanji"}]
            }"#,
        ),
        ok_response(
            r#"{
                "pages": {"per_page": 1000, "next_url": "https://api.wanikani.com/v2/subjects?page_after_id=126", "previous_url": null},
                "data": [{"id": 125, "object": "kanji"}, {"id": 126, "object": "kanji"}]
            }"#,
        ),
    ]);

    let fetches = RefCell::new(0usize);
    let subjects = RefCell::new(Vec::<Subject>::new());
    let fetches_ref = &fetches;
    let subjects_ref = &subjects;
    let client_ref = &client;
    client
        .page_fully(|cursor| async move {
            *fetches_ref.borrow_mut() += 1;
            if *fetches_ref.borrow() > 2 {
                return Ok(None);
            }

            let page = client_ref
                .subject_list(&SubjectListParams {
                    list: ListParams {
                        page_after_id: cursor,
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .await?;
            subjects_ref.borrow_mut().extend(page.data.data);
            Ok(Some(page.data.pages))
        })
        .await
        .unwrap();

    assert_eq!(fetches.into_inner(), 3);
    assert_eq!(subjects.into_inner().len(), 4);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_page_fully_aborts_on_fetch_error() {
    let (client, transport) = recorded_client();
    // One good page pointing at a next page that was never seeded.
    transport.seed(vec![ok_response(
        r#"{
            "pages": {"per_page": 1000, "next_url": "https://api.wanikani.com/v2/subjects?page_after_id=124", "previous_url": null},
            "data": [{"id": 123, "object": "kanji"}]
        }"#,
    )]);

    let client_ref = &client;
    let err = client
        .page_fully(|cursor| async move {
            let page = client_ref
                .subject_list(&SubjectListParams {
                    list: ListParams {
                        page_after_id: cursor,
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .await?;
            Ok(Some(page.data.pages))
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoRecordedResponses));
    assert_eq!(transport.requests().len(), 2);
}
