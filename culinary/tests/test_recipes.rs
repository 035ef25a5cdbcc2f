mod common;

use serde_json::json;

use common::{TestEnv, created_id, items, titles};

#[tokio::test]
async fn created_recipe_is_listed_with_its_id() {
    let env = TestEnv::start();
    let server = env.server();

    let payload = json!({
        "title": "Spicy Ramen",
        "description": "Weeknight noodles",
        "ingredients": ["noodles", "chili oil"],
        "steps": ["boil", "toss"],
        "tags": ["vegan", "quick"],
        "image_url": "https://example.com/ramen.jpg",
        "video_url": null
    });

    let response = server.post("/api/recipes").json(&payload).await;
    let id = created_id(&response);

    let listed = items(&server.get("/api/recipes").await);
    assert_eq!(listed.len(), 1);

    let recipe = &listed[0];
    assert_eq!(recipe["id"], json!(id));
    assert!(recipe.get("_id").is_none());
    for (field, value) in payload.as_object().unwrap() {
        assert_eq!(&recipe[field], value, "field {field}");
    }
}

#[tokio::test]
async fn omitted_fields_are_stored_with_defaults() {
    let env = TestEnv::start();
    let server = env.server();

    server.post("/api/recipes").json(&json!({ "title": "Toast" })).await;

    let recipe = items(&server.get("/api/recipes").await).remove(0);
    assert_eq!(recipe["ingredients"], json!([]));
    assert_eq!(recipe["tags"], json!([]));
    assert_eq!(recipe["description"], json!(null));
    assert!(recipe["created_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let env = TestEnv::start();
    let server = env.server();

    server.post("/api/recipes").json(&json!({ "title": "Spicy Ramen" })).await;
    server.post("/api/recipes").json(&json!({ "title": "Apple Pie" })).await;

    let lower = server.get("/api/recipes").add_query_param("q", "ramen").await;
    assert_eq!(titles(&lower), vec!["Spicy Ramen"]);

    let upper = server.get("/api/recipes").add_query_param("q", "RAMEN").await;
    assert_eq!(titles(&upper), vec!["Spicy Ramen"]);

    let none = server.get("/api/recipes").add_query_param("q", "sushi").await;
    assert!(items(&none).is_empty());
}

#[tokio::test]
async fn search_matches_list_elements() {
    let env = TestEnv::start();
    let server = env.server();

    server
        .post("/api/recipes")
        .json(&json!({
            "title": "Green Curry",
            "ingredients": ["Coconut milk", "basil"],
            "tags": ["vegan", "quick"]
        }))
        .await;

    let by_tag = server.get("/api/recipes").add_query_param("tag", "VEG").await;
    assert_eq!(titles(&by_tag), vec!["Green Curry"]);

    let by_q_tag = server.get("/api/recipes").add_query_param("q", "quick").await;
    assert_eq!(titles(&by_q_tag), vec!["Green Curry"]);

    let by_ingredient = server.get("/api/recipes").add_query_param("q", "coconut").await;
    assert_eq!(titles(&by_ingredient), vec!["Green Curry"]);
}

#[tokio::test]
async fn q_and_tag_must_both_match() {
    let env = TestEnv::start();
    let server = env.server();

    server
        .post("/api/recipes")
        .json(&json!({ "title": "Vegan Ramen", "tags": ["vegan"] }))
        .await;
    server
        .post("/api/recipes")
        .json(&json!({ "title": "Pork Ramen", "tags": ["meat"] }))
        .await;
    server
        .post("/api/recipes")
        .json(&json!({ "title": "Vegan Tacos", "tags": ["vegan"] }))
        .await;

    let response = server
        .get("/api/recipes")
        .add_query_param("q", "ramen")
        .add_query_param("tag", "vegan")
        .await;

    assert_eq!(titles(&response), vec!["Vegan Ramen"]);
}

#[tokio::test]
async fn search_text_is_literal() {
    let env = TestEnv::start();
    let server = env.server();

    server.post("/api/recipes").json(&json!({ "title": "Mac & Cheese (baked)" })).await;
    server.post("/api/recipes").json(&json!({ "title": "Macaroni" })).await;

    let response = server.get("/api/recipes").add_query_param("q", "(baked)").await;
    assert_eq!(titles(&response), vec!["Mac & Cheese (baked)"]);

    let response = server.get("/api/recipes").add_query_param("q", "mac.").await;
    assert!(items(&response).is_empty());
}

#[tokio::test]
async fn empty_q_matches_everything() {
    let env = TestEnv::start();
    let server = env.server();

    server.post("/api/recipes").json(&json!({ "title": "A" })).await;
    server.post("/api/recipes").json(&json!({ "title": "B" })).await;

    let response = server.get("/api/recipes").add_query_param("q", "").await;
    assert_eq!(items(&response).len(), 2);
}
