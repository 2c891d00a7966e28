mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn note_lifecycle_with_two_owners() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token_u1, user1_id) = common::register_user(server, &client, "noteowner").await?;
    let (token_u2, _) = common::register_user(server, &client, "notereader").await?;

    // Create as U1; the owner field in the payload must be ignored
    let res = client
        .post(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token_u1)
        .json(&json!({
            "title": "A",
            "content": "B",
            "owner": "00000000-0000-0000-0000-000000000000"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let note: serde_json::Value = res.json().await?;
    assert_eq!(note["title"], "A");
    assert_eq!(note["content"], "B");
    assert_eq!(note["owner_id"], user1_id.as_str());
    let note_id = note["id"].as_str().unwrap().to_string();

    // Fetch as U2 -> 403, record exists but caller lacks rights
    let res = client
        .get(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u2)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Fetch as U1 -> 200 with the same fields
    let res = client
        .get(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u1)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await?;
    assert_eq!(fetched["title"], "A");
    assert_eq!(fetched["content"], "B");

    // Update as U2 -> 403 and the record stays unmodified
    let res = client
        .put(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u2)
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Partial update as U1 leaves the other field intact
    let res = client
        .put(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u1)
        .json(&json!({ "content": "B2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await?;
    assert_eq!(updated["title"], "A");
    assert_eq!(updated["content"], "B2");
    assert_eq!(updated["owner_id"], user1_id.as_str());

    // Delete as U2 -> 403; delete as U1 -> 200
    let res = client
        .delete(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u2)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u1)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Gone: fetch -> 404, repeat delete -> 404 (not a second success)
    let res = client
        .get(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u1)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_u1)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn list_returns_only_the_callers_notes() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token_u1, user1_id) = common::register_user(server, &client, "lista").await?;
    let (token_u2, _) = common::register_user(server, &client, "listb").await?;

    for title in ["first", "second"] {
        let res = client
            .post(format!("{}/api/notes", server.base_url))
            .bearer_auth(&token_u1)
            .json(&json!({ "title": title, "content": "body" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .post(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token_u2)
        .json(&json!({ "title": "other owner", "content": "body" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token_u1)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let notes: Vec<serde_json::Value> = res.json().await?;

    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n["owner_id"] == user1_id.as_str()));
    // Insertion order
    assert_eq!(notes[0]["title"], "first");
    assert_eq!(notes[1]["title"], "second");

    Ok(())
}

#[tokio::test]
async fn invalid_input_maps_to_400() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _) = common::register_user(server, &client, "badinput").await?;

    // Non-UUID id
    let res = client
        .get(format!("{}/api/notes/not-a-uuid", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");

    // Missing required field
    let res = client
        .post(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "content": "no title" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Blank title
    let res = client
        .post(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "   ", "content": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
