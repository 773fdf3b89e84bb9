//! API integration tests.
//!
//! These run against a live server with a migrated database:
//! start the server, then `cargo test -- --ignored`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique ISBN per call so reruns against the same database don't collide.
fn fresh_isbn(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", tag, nanos)
}

async fn create_detail_book(
    client: &Client,
    title: &str,
    authors: &[&str],
    isbn: &str,
    copy_count: i32,
) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": title,
            "authors": authors,
            "editions": [
                { "isbn": isbn, "language": "es", "year": 1967, "copy_count": copy_count }
            ]
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse create response")
}

async fn get_book(client: &Client, book_id: i64) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_detail_create_produces_full_aggregate() {
    let client = Client::new();
    let isbn = fresh_isbn("123");

    let created = create_detail_book(
        &client,
        "Cien Años de Soledad",
        &["García Márquez"],
        &isbn,
        3,
    )
    .await;

    let book_id = created["book_id"].as_i64().expect("No book_id");
    assert_eq!(created["author_ids"].as_array().unwrap().len(), 1);
    assert_eq!(created["edition_ids"].as_array().unwrap().len(), 1);

    let (status, detail) = get_book(&client, book_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "cien años de soledad");
    assert_eq!(detail["authors"].as_array().unwrap().len(), 1);
    assert_eq!(detail["authors"][0]["name"], "garcía márquez");

    let editions = detail["editions"].as_array().unwrap();
    assert_eq!(editions.len(), 1);
    assert_eq!(editions[0]["copies"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_delete_cascade_removes_dependents_and_orphaned_author() {
    let client = Client::new();
    let isbn = fresh_isbn("cascade");

    let created = create_detail_book(
        &client,
        "Cascade Subject",
        &["Autora Solitaria Cascade"],
        &isbn,
        2,
    )
    .await;
    let book_id = created["book_id"].as_i64().unwrap();
    let author_id = created["author_ids"][0].as_i64().unwrap();
    let edition_id = created["edition_ids"][0].as_i64().unwrap();

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Book, edition and sole author are all gone
    let (status, _) = get_book(&client, book_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/editions/{}", BASE_URL, edition_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_shared_author_survives_deleting_one_book() {
    let client = Client::new();

    let first = create_detail_book(
        &client,
        "La Casa de los Espíritus",
        &["Isabel Allende Shared"],
        &fresh_isbn("shared-a"),
        1,
    )
    .await;
    let second = create_detail_book(
        &client,
        "De Amor y de Sombra",
        &["Isabel Allende Shared"],
        &fresh_isbn("shared-b"),
        1,
    )
    .await;

    // Both books resolved to the same author
    assert_eq!(first["author_ids"][0], second["author_ids"][0]);
    let author_id = first["author_ids"][0].as_i64().unwrap();

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, first["book_id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, detail) = get_book(&client, second["book_id"].as_i64().unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(detail["authors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"].as_i64() == Some(author_id)));
}

/// Delete a book, retrying while the serializable cascade loses to a
/// concurrent one (503).
async fn delete_book_retrying(client: &Client, book_id: i64) {
    for _ in 0..10 {
        let response = client
            .delete(format!("{}/books/{}", BASE_URL, book_id))
            .send()
            .await
            .expect("Failed to send delete request");
        match response.status() {
            StatusCode::NO_CONTENT => return,
            StatusCode::SERVICE_UNAVAILABLE => continue,
            other => panic!("Unexpected delete status: {}", other),
        }
    }
    panic!("Delete of book {} kept losing its transaction", book_id);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_cascades_still_sweep_shared_orphan() {
    let client = Client::new();

    let first = create_detail_book(
        &client,
        "Race Subject A",
        &["Autora Compartida Race"],
        &fresh_isbn("race-a"),
        1,
    )
    .await;
    let second = create_detail_book(
        &client,
        "Race Subject B",
        &["Autora Compartida Race"],
        &fresh_isbn("race-b"),
        1,
    )
    .await;
    assert_eq!(first["author_ids"][0], second["author_ids"][0]);
    let author_id = first["author_ids"][0].as_i64().unwrap();

    // Both cascades run at once; neither may skip the orphan sweep on the
    // strength of the other's not-yet-committed authorship delete
    tokio::join!(
        delete_book_retrying(&client, first["book_id"].as_i64().unwrap()),
        delete_book_retrying(&client, second["book_id"].as_i64().unwrap()),
    );

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_equivalent_names_resolve_to_one_author() {
    let client = Client::new();

    let created = create_detail_book(
        &client,
        "Name Folding Subject",
        &["  JULIO   Cortázar Folding ", "julio cortázar folding"],
        &fresh_isbn("folding"),
        1,
    )
    .await;

    assert_eq!(created["author_ids"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_unlinking_sole_author_links_sentinel() {
    let client = Client::new();

    let created = create_detail_book(
        &client,
        "Orphanable Subject",
        &["Autor Unico Sentinel"],
        &fresh_isbn("sentinel"),
        1,
    )
    .await;
    let book_id = created["book_id"].as_i64().unwrap();
    let author_id = created["author_ids"][0].as_i64().unwrap();

    let response = client
        .delete(format!("{}/authors/{}/book/{}", BASE_URL, author_id, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, detail) = get_book(&client, book_id).await;
    assert_eq!(status, StatusCode::OK);

    let authors = detail["authors"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["name"], "anonimo");
    assert_eq!(authors[0]["system"], true);

    // The unlinked author had no other books and was swept
    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_unlinking_system_author_is_forbidden() {
    let client = Client::new();

    let created = create_detail_book(
        &client,
        "Sentinel Guard Subject",
        &["Autor Temporal Guard"],
        &fresh_isbn("guard"),
        1,
    )
    .await;
    let book_id = created["book_id"].as_i64().unwrap();
    let author_id = created["author_ids"][0].as_i64().unwrap();

    // Leave the book with only the sentinel
    client
        .delete(format!("{}/authors/{}/book/{}", BASE_URL, author_id, book_id))
        .send()
        .await
        .unwrap();

    let (_, detail) = get_book(&client, book_id).await;
    let sentinel_id = detail["authors"][0]["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/authors/{}/book/{}", BASE_URL, sentinel_id, book_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_deleting_last_edition_is_refused() {
    let client = Client::new();

    let created = create_detail_book(
        &client,
        "Single Edition Subject",
        &["Autor Ediciones"],
        &fresh_isbn("last-ed"),
        1,
    )
    .await;
    let edition_id = created["edition_ids"][0].as_i64().unwrap();

    let response = client
        .delete(format!("{}/editions/{}", BASE_URL, edition_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
#[ignore]
async fn test_copy_removal_guards() {
    let client = Client::new();

    let created = create_detail_book(
        &client,
        "Copy Guard Subject",
        &["Autor Copias"],
        &fresh_isbn("copies"),
        2,
    )
    .await;
    let book_id = created["book_id"].as_i64().unwrap();
    let (_, detail) = get_book(&client, book_id).await;
    let copies = detail["editions"][0]["copies"].as_array().unwrap();
    let first_copy = copies[0]["id"].as_i64().unwrap();
    let second_copy = copies[1]["id"].as_i64().unwrap();

    // Lend out the first copy: removal is refused with "active loan"
    let patron: Value = client
        .post(format!("{}/patrons", BASE_URL))
        .json(&json!({ "name": "Prueba Prestamos" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "copy_id": first_copy, "patron_id": patron["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let check: Value = client
        .get(format!("{}/copies/{}/can-remove", BASE_URL, first_copy))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["can"], false);
    assert_eq!(check["reason"], "active loan");

    let active: Value = client
        .get(format!("{}/loans/copy/{}/active", BASE_URL, first_copy))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(active["copy_id"].as_i64(), Some(first_copy));
    assert!(active["return_date"].is_null());

    let active: Value = client
        .get(format!("{}/loans/copy/{}/active", BASE_URL, second_copy))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(active.is_null());

    // A second active loan for the same copy is a conflict
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .json(&json!({ "copy_id": first_copy, "patron_id": patron["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The unloaned copy can go
    let response = client
        .delete(format!("{}/copies/{}", BASE_URL, second_copy))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Which leaves the loaned one as the last copy of its edition
    let check: Value = client
        .get(format!("{}/copies/{}/can-remove", BASE_URL, first_copy))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["can"], false);
}

#[tokio::test]
#[ignore]
async fn test_added_copies_continue_numbering() {
    let client = Client::new();

    let created = create_detail_book(
        &client,
        "Numbering Subject",
        &["Autor Numeros"],
        &fresh_isbn("numbers"),
        3,
    )
    .await;
    let book_id = created["book_id"].as_i64().unwrap();
    let (_, detail) = get_book(&client, book_id).await;
    let copies = detail["editions"][0]["copies"].as_array().unwrap();
    let edition_id = detail["editions"][0]["id"].as_i64().unwrap();

    let max_existing = copies
        .iter()
        .map(|c| c["copy_number"].as_i64().unwrap())
        .max()
        .unwrap();
    assert_eq!(max_existing, 3);

    let added: Value = client
        .post(format!("{}/copies/edition/{}", BASE_URL, edition_id))
        .json(&json!({ "count": 2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let numbers: Vec<i64> = added
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["copy_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![4, 5]);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflicts() {
    let client = Client::new();
    let isbn = fresh_isbn("dup");

    create_detail_book(&client, "Dup Isbn A", &["Autor Dup"], &isbn, 1).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Dup Isbn B",
            "authors": ["Autor Dup"],
            "editions": [
                { "isbn": isbn, "language": "es", "year": 1970, "copy_count": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
