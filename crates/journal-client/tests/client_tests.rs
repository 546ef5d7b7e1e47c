//! HTTP-level tests for journal-client against a mock server.

use chrono::NaiveDate;
use homework_core::{JournalApi, JournalError};
use journal_client::{JournalClient, JournalConfig};
use mockito::{Matcher, Server};

const LESSONS_PATH: &str = "/journal/lesson/list-by-education";
const SCHEDULE_PATH: &str = "/journal/schedule/list-by-education";

fn client_for(server: &Server) -> JournalClient {
    JournalClient::new(JournalConfig::new(server.url())).unwrap()
}

fn day(d: u32, m: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lesson_page(subject: &str, current: u32, next: u32) -> String {
    format!(
        r#"{{"data": {{"items": [{{
            "subject_name": "{subject}",
            "datetime_from": "03.03.2025 10:00:00",
            "tasks": [{{"task_name": "p.{current}", "files": []}}]
        }}], "current": {current}, "next": {next}}}}}"#
    )
}

#[tokio::test]
async fn test_fetch_lessons_follows_pages() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", LESSONS_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("p_page".into(), "1".into()),
            Matcher::UrlEncoded("p_datetime_from".into(), "01.02.2025 00:00:00".into()),
            Matcher::UrlEncoded("p_datetime_to".into(), "04.03.2025 23:59:59".into()),
            Matcher::UrlEncoded("p_educations[]".into(), "42".into()),
        ]))
        .match_header("x-jwt-token", "secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(lesson_page("Math", 1, 2))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", LESSONS_PATH)
        .match_query(Matcher::UrlEncoded("p_page".into(), "2".into()))
        .with_status(200)
        .with_body(lesson_page("Art", 2, 2))
        .expect(1)
        .create_async()
        .await;

    let lessons = client_for(&server)
        .fetch_lessons(42, day(1, 2, 2025), day(4, 3, 2025), "secret")
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let subjects: Vec<_> = lessons.iter().map(|l| l.subject_name.as_str()).collect();
    assert_eq!(subjects, vec!["Math", "Art"]);
}

#[tokio::test]
async fn test_fetch_schedule_uses_single_day() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SCHEDULE_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("p_datetime_from".into(), "05.03.2025 00:00:00".into()),
            Matcher::UrlEncoded("p_datetime_to".into(), "05.03.2025 23:59:59".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"data": {"items": [], "current": 1, "next": 1}}"#)
        .create_async()
        .await;

    let schedule = client_for(&server)
        .fetch_schedule(7, day(5, 3, 2025), "secret")
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(schedule.is_empty());
}

#[tokio::test]
async fn test_pagination_cap_is_an_error() {
    let mut server = Server::new_async().await;
    // Every page claims another one follows.
    let mock = server
        .mock("GET", LESSONS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(lesson_page("Math", 1, 2))
        .expect(3)
        .create_async()
        .await;

    let client = JournalClient::new(JournalConfig::new(server.url()).with_max_pages(3)).unwrap();
    let err = client
        .fetch_lessons(1, day(1, 3, 2025), day(2, 3, 2025), "secret")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, JournalError::PaginationExhausted { pages: 3, .. }));
}

#[tokio::test]
async fn test_non_success_status_is_fatal() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", LESSONS_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_lessons(1, day(1, 3, 2025), day(2, 3, 2025), "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, JournalError::Status { status: 500, .. }));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn test_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", SCHEDULE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_schedule(1, day(1, 3, 2025), "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, JournalError::Malformed { .. }));
}

#[tokio::test]
async fn test_fetch_file_returns_raw_bytes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/filekit/file/download")
        .match_query(Matcher::UrlEncoded("p_uuid".into(), "f-1".into()))
        .with_status(200)
        .with_body(vec![0x25, 0x50, 0x44, 0x46])
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let first = client.fetch_file("f-1").await.unwrap();
    let second = client.fetch_file("f-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, b"%PDF".to_vec());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_related_children() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/journal/person/related-child-list")
        .match_header("x-jwt-token", "good")
        .with_status(200)
        .with_body(
            r#"{"data": {"items": [{
                "firstname": "Ivan",
                "surname": "Sidorov",
                "educations": [
                    {"education_id": 11, "institution_name": "Lyceum 239", "group_name": "7B"},
                    {"education_id": 12, "institution_name": "Music school", "group_name": "2"}
                ]
            }]}}"#,
        )
        .create_async()
        .await;

    let children = client_for(&server).related_children("good").await.unwrap();

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].last_name, "Sidorov");
    assert_eq!(children[0].educations.len(), 2);
    assert_eq!(children[0].educations[1].education_id, 12);
}

#[tokio::test]
async fn test_related_children_rejected_token() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/journal/person/related-child-list")
        .with_status(401)
        .create_async()
        .await;

    let err = client_for(&server).related_children("bad").await.unwrap_err();

    assert!(err.is_rejection());
}
