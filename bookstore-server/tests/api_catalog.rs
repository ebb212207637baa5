//! Catalog API: contributors, publishers, series, sections and products

mod common;

use http::StatusCode;
use serde_json::json;

use bookstore_server::db::Scope;
use common::{TestApp, ids};
use shared::models::Section;

#[tokio::test]
async fn test_author_create_get_and_duplicate() {
    let app = TestApp::new();
    let seller = app.seller().await;

    let res = app
        .post("/author", Some(&seller), json!({"fullName": "John Smith"}))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["fullName"], "John Smith");
    assert_eq!(res.body["books"], json!([]));
    let id = res.body["id"].as_str().unwrap().to_string();

    let fetched = app.get(&format!("/author/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, res.body);

    let dup = app
        .post("/author", Some(&seller), json!({"fullName": "John Smith"}))
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_name_is_free_again_after_soft_delete() {
    let app = TestApp::new();
    let seller = app.seller().await;

    let first = app
        .post("/translator", Some(&seller), json!({"fullName": "Ann Lee"}))
        .await;
    let id = first.body["id"].as_str().unwrap().to_string();

    let del = app.delete(&format!("/translator/{id}"), Some(&seller)).await;
    assert_eq!(del.status, StatusCode::NO_CONTENT);

    let again = app.delete(&format!("/translator/{id}"), Some(&seller)).await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let gone = app.get(&format!("/translator/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let retry = app
        .post("/translator", Some(&seller), json!({"fullName": "Ann Lee"}))
        .await;
    assert_eq!(retry.status, StatusCode::CREATED);
    assert_ne!(retry.body["id"], first.body["id"]);
}

#[tokio::test]
async fn test_catalog_writes_need_staff() {
    let app = TestApp::new();
    let (customer, _) = app
        .signup("reader@example.com", "+380501112233", "secret-pass")
        .await;

    let anonymous = app.post("/author", None, json!({"fullName": "X"})).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forbidden = app
        .post("/author", Some(&customer), json!({"fullName": "X"}))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let listing = app.get("/author", None).await;
    assert_eq!(listing.status, StatusCode::OK);
}

#[tokio::test]
async fn test_section_delete_refused_while_products_linked() {
    let app = TestApp::new();
    let seller = app.seller().await;

    let s1 = app
        .post("/section", Some(&seller), json!({"name": "Fiction"}))
        .await;
    assert_eq!(s1.status, StatusCode::CREATED);
    let s1_id = s1.body["id"].as_str().unwrap().to_string();

    let p1 = app.create_book(&seller, "Dune", 12.5, json!({})).await;
    let p1_id = p1["id"].as_str().unwrap().to_string();

    let linked = app
        .patch(
            &format!("/section/{s1_id}"),
            Some(&seller),
            json!({"products": [p1_id]}),
        )
        .await;
    assert_eq!(linked.status, StatusCode::OK);
    let product = app.get(&format!("/product/{p1_id}"), None).await;
    assert_eq!(ids(&product.body["sections"]), vec![s1_id.clone()]);

    let refused = app.delete(&format!("/section/{s1_id}"), Some(&seller)).await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);

    let unlinked = app
        .patch(&format!("/section/{s1_id}"), Some(&seller), json!({"products": []}))
        .await;
    assert_eq!(unlinked.status, StatusCode::OK);
    let product = app.get(&format!("/product/{p1_id}"), None).await;
    assert!(ids(&product.body["sections"]).is_empty());

    let deleted = app.delete(&format!("/section/{s1_id}"), Some(&seller)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let stored: Section = app
        .state
        .store
        .read()
        .unwrap()
        .find_any(&s1_id)
        .unwrap()
        .unwrap();
    assert!(stored.deleted_at.is_some());

    let listing = app.get("/section", None).await;
    assert!(listing.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_book_relations_are_mirrored() {
    let app = TestApp::new();
    let seller = app.seller().await;

    let author = app
        .post("/author", Some(&seller), json!({"fullName": "Frank Herbert"}))
        .await;
    let author_id = author.body["id"].as_str().unwrap().to_string();
    let editor = app
        .post("/editor", Some(&seller), json!({"fullName": "Sterling Lanier"}))
        .await;
    let editor_id = editor.body["id"].as_str().unwrap().to_string();
    let publisher = app
        .post("/publisher", Some(&seller), json!({"name": "Chilton"}))
        .await;
    let publisher_id = publisher.body["id"].as_str().unwrap().to_string();
    let series = app
        .post(
            "/book-series",
            Some(&seller),
            json!({"name": "Dune Chronicles", "publisher": publisher_id}),
        )
        .await;
    assert_eq!(series.status, StatusCode::CREATED);
    let series_id = series.body["id"].as_str().unwrap().to_string();

    let product = app
        .create_book(
            &seller,
            "Dune",
            15.0,
            json!({
                "authors": [author_id],
                "editors": [editor_id],
                "publisher": publisher_id,
                "series": series_id,
                "year": 1965,
            }),
        )
        .await;
    let book_id = product["details"]["id"].as_str().unwrap().to_string();
    assert_eq!(product["details"]["kind"], "book");
    assert_eq!(product["key"], "dune");

    let author = app.get(&format!("/author/{author_id}"), None).await;
    assert_eq!(ids(&author.body["books"]), vec![book_id.clone()]);
    let editor = app.get(&format!("/editor/{editor_id}"), None).await;
    assert_eq!(ids(&editor.body["books"]), vec![book_id.clone()]);
    let publisher = app.get(&format!("/publisher/{publisher_id}"), None).await;
    assert_eq!(ids(&publisher.body["books"]), vec![book_id.clone()]);
    assert_eq!(ids(&publisher.body["bookSeries"]), vec![series_id.clone()]);
    let series = app.get(&format!("/book-series/{series_id}"), None).await;
    assert_eq!(ids(&series.body["books"]), vec![book_id.clone()]);

    // publisher with books cannot go
    let refused = app
        .delete(&format!("/publisher/{publisher_id}"), Some(&seller))
        .await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);

    // deleting the author unlinks it from the book
    let deleted = app
        .delete(&format!("/author/{author_id}"), Some(&seller))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let product_id = product["id"].as_str().unwrap();
    let detail = app.get(&format!("/product/{product_id}"), None).await;
    assert!(ids(&detail.body["details"]["authors"]).is_empty());
    assert_eq!(ids(&detail.body["details"]["editors"]), vec![editor_id.clone()]);

    // deleting the product releases every remaining back-reference
    let gone = app
        .delete(&format!("/product/{product_id}"), Some(&seller))
        .await;
    assert_eq!(gone.status, StatusCode::NO_CONTENT);
    let editor = app.get(&format!("/editor/{editor_id}"), None).await;
    assert!(ids(&editor.body["books"]).is_empty());
    let publisher = app.get(&format!("/publisher/{publisher_id}"), None).await;
    assert!(ids(&publisher.body["books"]).is_empty());

    let now_free = app
        .delete(&format!("/publisher/{publisher_id}"), Some(&seller))
        .await;
    assert_eq!(now_free.status, StatusCode::NO_CONTENT);
    let series = app.get(&format!("/book-series/{series_id}"), None).await;
    assert_eq!(series.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_codes_keys_and_search() {
    let app = TestApp::new();
    let seller = app.seller().await;

    let author = app
        .post("/author", Some(&seller), json!({"fullName": "Ursula Le Guin"}))
        .await;
    let author_id = author.body["id"].as_str().unwrap().to_string();

    let first = app
        .create_book(&seller, "A Wizard of Earthsea", 9.0, json!({"authors": [author_id]}))
        .await;
    let second = app.create_book(&seller, "Solaris", 11.0, json!({})).await;
    assert!(second["code"].as_u64().unwrap() > first["code"].as_u64().unwrap());

    let by_key = app.get("/product/key/a-wizard-of-earthsea", None).await;
    assert_eq!(by_key.status, StatusCode::OK);
    assert_eq!(by_key.body["id"], first["id"]);

    let found = app.get("/search?query=le%20guin", None).await;
    assert_eq!(found.status, StatusCode::OK);
    let names: Vec<_> = found
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A Wizard of Earthsea".to_string()]);

    let nothing = app.get("/search?query=", None).await;
    assert_eq!(nothing.body, json!([]));
}

#[tokio::test]
async fn test_reviews_owner_or_admin() {
    let app = TestApp::new();
    let seller = app.seller().await;
    let admin = app.admin().await;
    let (alice, _) = app.signup("alice@example.com", "+380501110001", "secret-pass").await;
    let (bob, _) = app.signup("bob@example.com", "+380501110002", "secret-pass").await;

    let product = app.create_book(&seller, "Roadside Picnic", 8.0, json!({})).await;
    let product_id = product["id"].as_str().unwrap();

    let bad = app
        .post(
            &format!("/product/{product_id}/review"),
            Some(&alice),
            json!({"rating": 6}),
        )
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let review = app
        .post(
            &format!("/product/{product_id}/review"),
            Some(&alice),
            json!({"rating": 5, "text": "  Great  "}),
        )
        .await;
    assert_eq!(review.status, StatusCode::CREATED);
    assert_eq!(review.body["text"], "Great");
    let review_id = review.body["id"].as_str().unwrap();

    let listing = app
        .get(&format!("/product/{product_id}/review"), None)
        .await;
    assert_eq!(listing.body.as_array().unwrap().len(), 1);

    let by_bob = app.delete(&format!("/review/{review_id}"), Some(&bob)).await;
    assert_eq!(by_bob.status, StatusCode::FORBIDDEN);

    let by_admin = app.delete(&format!("/review/{review_id}"), Some(&admin)).await;
    assert_eq!(by_admin.status, StatusCode::NO_CONTENT);
}
