mod common;

use axum::http::StatusCode;
use bindery_model::{BookId, Library, Page, ReadList, ReadListMember};
use bindery_server::api::{ApiResponse, CreateReadListRequest, HealthResponse, UpdateReadListRequest};
use common::{ADMIN_KEY, COMICS_READER_KEY, READER_KEY, build_test_app};
use serde_json::{Value, json};

fn data<T>(response: ApiResponse<T>) -> T {
    assert_eq!(response.status, "success");
    response.data.expect("success responses carry data")
}

#[tokio::test]
async fn health_is_public() {
    let app = build_test_app();

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.storage, "memory");
}

#[tokio::test]
async fn api_requires_a_known_key() {
    let app = build_test_app();

    app.server
        .get("/api/v1/readlists")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/v1/readlists")
        .authorization_bearer("not-a-key")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 401);
}

#[tokio::test]
async fn lists_read_lists_sorted_by_name() {
    let app = build_test_app();

    let response = app
        .server
        .get("/api/v1/readlists")
        .authorization_bearer(READER_KEY)
        .add_query_param("sort", "created_at,desc")
        .await;
    response.assert_status_ok();

    let page: Page<ReadList> = data(response.json());
    let names: Vec<&str> = page.content.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Crossover", "Saga Arc"]);
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.size, 20);
    assert!(page.first && page.last);
}

#[tokio::test]
async fn page_json_uses_snake_case_fields() {
    let app = build_test_app();

    let body: Value = app
        .server
        .get("/api/v1/readlists")
        .authorization_bearer(READER_KEY)
        .add_query_param("page", 0)
        .add_query_param("size", 1)
        .await
        .json();

    let page = &body["data"];
    for field in ["content", "total_elements", "total_pages", "number", "size", "first", "last", "empty"] {
        assert!(page.get(field).is_some(), "missing {field}");
    }
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["content"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn repeated_library_filter_and_scope_intersection() {
    let app = build_test_app();

    let page: Page<ReadList> = data(
        app.server
            .get("/api/v1/readlists")
            .authorization_bearer(COMICS_READER_KEY)
            .add_query_param("library_id", app.manga.id)
            .await
            .json(),
    );
    assert!(page.empty);

    let page: Page<ReadList> = data(
        app.server
            .get("/api/v1/readlists")
            .authorization_bearer(READER_KEY)
            .add_query_param("library_id", app.manga.id)
            .add_query_param("library_id", app.comics.id)
            .await
            .json(),
    );
    assert_eq!(page.total_elements, 2);
}

#[tokio::test]
async fn invalid_query_values_are_rejected() {
    let app = build_test_app();

    for (key, value) in [("library_id", "nope"), ("size", "0"), ("size", "51"), ("sort", "rating")] {
        app.server
            .get("/api/v1/readlists")
            .authorization_bearer(READER_KEY)
            .add_query_param(key, value)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn scoped_reader_sees_a_filtered_view() {
    let app = build_test_app();

    let read_list: ReadList = data(
        app.server
            .get(&format!("/api/v1/readlists/{}", app.crossover.id))
            .authorization_bearer(COMICS_READER_KEY)
            .await
            .json(),
    );
    assert!(read_list.filtered);
    assert_eq!(read_list.book_ids, vec![app.comic_books[0].id]);

    let members: Page<ReadListMember> = data(
        app.server
            .get(&format!("/api/v1/readlists/{}/books", app.crossover.id))
            .authorization_bearer(COMICS_READER_KEY)
            .add_query_param("unpaged", true)
            .await
            .json(),
    );
    assert_eq!(members.content.len(), 1);
    assert_eq!(members.content[0].position, 1);
}

#[tokio::test]
async fn members_are_ordered_and_redacted_for_readers() {
    let app = build_test_app();
    let path = format!("/api/v1/readlists/{}/books", app.saga.id);

    let as_reader: Value = app
        .server
        .get(&path)
        .authorization_bearer(READER_KEY)
        .add_query_param("unpaged", true)
        .await
        .json();
    let content = as_reader["data"]["content"].as_array().cloned().unwrap_or_default();
    assert_eq!(content.len(), 3);
    for (index, member) in content.iter().enumerate() {
        assert_eq!(member["position"], index);
        assert!(member.get("file_url").is_none());
    }

    let as_admin: Page<ReadListMember> = data(
        app.server
            .get(&path)
            .authorization_bearer(ADMIN_KEY)
            .add_query_param("unpaged", true)
            .await
            .json(),
    );
    let ids: Vec<BookId> = as_admin.content.iter().map(|m| m.book.id).collect();
    assert_eq!(ids, app.saga.book_ids);
    assert!(as_admin.content.iter().all(|m| m.book.file_url.is_some()));
}

#[tokio::test]
async fn unknown_and_out_of_scope_read_lists_are_not_found() {
    let app = build_test_app();

    app.server
        .get(&format!("/api/v1/readlists/{}", bindery_model::ReadListId::new()))
        .authorization_bearer(ADMIN_KEY)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let manga_only = app
        .server
        .post("/api/v1/readlists")
        .authorization_bearer(ADMIN_KEY)
        .json(&CreateReadListRequest {
            name: "Manga Only".to_string(),
            summary: None,
            book_ids: vec![app.manga_books[1].id],
        })
        .await;
    manga_only.assert_status(StatusCode::CREATED);
    let manga_only: ReadList = data(manga_only.json());

    app.server
        .get(&format!("/api/v1/readlists/{}", manga_only.id))
        .authorization_bearer(COMICS_READER_KEY)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_lifecycle() {
    let app = build_test_app();

    let created = app
        .server
        .post("/api/v1/readlists")
        .authorization_bearer(ADMIN_KEY)
        .json(&json!({
            "name": "Event",
            "summary": "crossover event",
            "book_ids": [app.comic_books[2].id, app.manga_books[0].id],
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let created: ReadList = data(created.json());
    assert_eq!(created.summary, "crossover event");

    app.server
        .patch(&format!("/api/v1/readlists/{}", created.id))
        .authorization_bearer(ADMIN_KEY)
        .json(&UpdateReadListRequest {
            name: Some("Big Event".to_string()),
            ..Default::default()
        })
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let renamed: ReadList = data(
        app.server
            .get(&format!("/api/v1/readlists/{}", created.id))
            .authorization_bearer(ADMIN_KEY)
            .await
            .json(),
    );
    assert_eq!(renamed.name, "Big Event");
    assert_eq!(renamed.book_ids, created.book_ids);

    app.server
        .delete(&format!("/api/v1/readlists/{}", created.id))
        .authorization_bearer(ADMIN_KEY)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/v1/readlists/{}", created.id))
        .authorization_bearer(ADMIN_KEY)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_by_readers_are_forbidden() {
    let app = build_test_app();

    app.server
        .post("/api/v1/readlists")
        .authorization_bearer(READER_KEY)
        .json(&json!({ "name": "Mine" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .delete(&format!("/api/v1/readlists/{}", app.saga.id))
        .authorization_bearer(READER_KEY)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert_eq!(app.catalog.read_list_count().await, 2);
}

#[tokio::test]
async fn conflicting_and_invalid_bodies() {
    let app = build_test_app();

    let conflict = app
        .server
        .post("/api/v1/readlists")
        .authorization_bearer(ADMIN_KEY)
        .json(&json!({ "name": "Saga Arc" }))
        .await;
    conflict.assert_status(StatusCode::CONFLICT);
    let body: Value = conflict.json();
    let message = body["error"]["message"].as_str().unwrap_or_default();
    assert!(message.contains("Saga Arc"));

    let book = app.comic_books[0].id;
    app.server
        .post("/api/v1/readlists")
        .authorization_bearer(ADMIN_KEY)
        .json(&json!({ "name": "Twice", "book_ids": [book, book] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .patch(&format!("/api/v1/readlists/{}", app.saga.id))
        .authorization_bearer(ADMIN_KEY)
        .json(&json!({ "name": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn libraries_follow_the_key_scope() {
    let app = build_test_app();

    let libraries: Vec<Library> = data(
        app.server
            .get("/api/v1/libraries")
            .authorization_bearer(COMICS_READER_KEY)
            .await
            .json(),
    );
    assert_eq!(libraries.len(), 1);
    assert_eq!(libraries[0].id, app.comics.id);

    app.server
        .get(&format!("/api/v1/libraries/{}", app.manga.id))
        .authorization_bearer(COMICS_READER_KEY)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let manga: Library = data(
        app.server
            .get(&format!("/api/v1/libraries/{}", app.manga.id))
            .authorization_bearer(ADMIN_KEY)
            .await
            .json(),
    );
    assert_eq!(manga.name, "Manga");
}
