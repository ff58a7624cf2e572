use actix_web::{http::header::LOCATION, http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use slooze_inventory::auth::SESSION_COOKIE;
use slooze_inventory::server;
use slooze_inventory::state::AppState;
use slooze_inventory::templates::{load_templates, TemplateCache};

fn templates() -> TemplateCache {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates");
    load_templates(&dir).expect("bundled templates should load")
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new(templates()))
                .configure(server::routes),
        )
        .await
    };
}

macro_rules! login {
    ($app:expr, $email:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/session/login")
            .set_json(json!({ "email": $email, "password": $password }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("login should set the session cookie")
            .into_owned()
    }};
}

#[actix_web::test]
async fn manager_login_lands_on_dashboard() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/session/login")
        .set_json(json!({ "email": "manager@example.com", "password": "manager123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["redirect_to"], "/dashboard");
    assert_eq!(body["session"]["role"], "MANAGER");

    let cookie = {
        let req = test::TestRequest::post()
            .uri("/api/session/login")
            .set_json(json!({ "email": "storekeeper@example.com", "password": "store123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["redirect_to"], "/products");
        cookie
    };
    assert!(cookie.is_some());
}

#[actix_web::test]
async fn wrong_password_is_rejected_and_no_session_exists() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/session/login")
        .set_json(json!({ "email": "manager@example.com", "password": "wrongpass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error_message"], "Invalid credentials");
    assert!(state.sessions.current().is_none());

    let req = test::TestRequest::get().uri("/api/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn pages_redirect_without_session() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);

    for path in ["/dashboard", "/products"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
    }

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn store_keeper_is_redirected_from_dashboard() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "storekeeper@example.com", "store123");

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");

    let req = test::TestRequest::get().uri("/products").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("store keeper"));
    assert!(!html.contains("href=\"/dashboard\""));

    let req = test::TestRequest::get().uri("/api/dashboard").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn stale_cookie_loses_access_after_another_login() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let old = login!(app, "manager@example.com", "manager123");
    let _new = login!(app, "storekeeper@example.com", "store123");

    let req = test::TestRequest::get().uri("/api/session").cookie(old.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/dashboard").cookie(old).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn product_listing_filters_and_paginates() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "storekeeper@example.com", "store123");

    let req = test::TestRequest::get().uri("/api/products?page=3").cookie(cookie.clone()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_items"], 15);
    assert_eq!(body["total_pages"], 3);
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["11", "12", "13", "14", "15"]);

    let req = test::TestRequest::get().uri("/api/products?page=4").cookie(cookie.clone()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri("/api/products?q=e&category=Dairy")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Butter", "Cheese"]);

    let req = test::TestRequest::get().uri("/api/categories").cookie(cookie).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["categories"].as_array().unwrap().len(), 7);
}

#[actix_web::test]
async fn manager_adds_eggs_as_sixteen() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "manager@example.com", "manager123");

    let req = test::TestRequest::post()
        .uri("/api/products")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Eggs", "category": "Dairy", "quantity": 40 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["product"]["id"], "16");

    for bad in [
        json!({ "name": "eggs", "category": "Dairy", "quantity": 1 }),
        json!({ "name": "  ", "category": "Dairy", "quantity": 1 }),
        json!({ "name": "Yoghurt", "category": "Dairy", "quantity": -3 }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/products")
            .cookie(cookie.clone())
            .set_json(bad)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }
    assert_eq!(state.inventory.read().await.len(), 16);
}

#[actix_web::test]
async fn store_keeper_edits_but_cannot_add_or_delete() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "storekeeper@example.com", "store123");

    let req = test::TestRequest::post()
        .uri("/api/products")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Eggs", "category": "Dairy", "quantity": 40 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete().uri("/api/products/1").cookie(cookie.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri("/api/products/1")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Rice", "category": "Grains", "quantity": 95 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.inventory.read().await.get("1").map(|p| p.quantity), Some(95));

    let req = test::TestRequest::put()
        .uri("/api/products/99")
        .cookie(cookie)
        .set_json(json!({ "name": "Ghost", "category": "None", "quantity": 1 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.inventory.read().await.len(), 15);
}

#[actix_web::test]
async fn deleted_product_disappears_from_search() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "manager@example.com", "manager123");

    let req = test::TestRequest::delete().uri("/api/products/15").cookie(cookie.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/products?q=15").cookie(cookie.clone()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_items"], 0);

    let req = test::TestRequest::delete().uri("/api/products/15").cookie(cookie).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.inventory.read().await.len(), 14);
}

#[actix_web::test]
async fn dashboard_summary_for_manager() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "manager@example.com", "manager123");

    let req = test::TestRequest::get().uri("/api/dashboard").cookie(cookie.clone()).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["summary"]["total_products"], 15);
    assert_eq!(body["summary"]["active_users"], 2);

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn logout_clears_session_and_cookie() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "manager@example.com", "manager123");

    let req = test::TestRequest::post().uri("/api/session/logout").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string());
    assert_eq!(removal.as_deref(), Some(""));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect_to"], "/login");
    assert!(state.sessions.current().is_none());

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn theme_preference_round_trips() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/theme").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["theme"], "light");

    let req = test::TestRequest::put()
        .uri("/api/theme")
        .set_json(json!({ "theme": "dark" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/login").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("class=\"dark\""));
    assert!(html.contains("id=\"theme-toggle\""));
}

#[actix_web::test]
async fn bad_edits_answer_with_the_json_envelope() {
    let state = Arc::new(AppState::in_memory());
    let app = init_app!(state);
    let cookie = login!(app, "manager@example.com", "manager123");

    let req = test::TestRequest::put()
        .uri("/api/products/6")
        .cookie(cookie.clone())
        .set_json(json!({ "name": "Milk", "category": "Dairy", "quantity": -5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error_message"].as_str().unwrap().contains("negative"));
    assert_eq!(state.inventory.read().await.get("6").map(|p| p.quantity), Some(60));

    let req = test::TestRequest::put()
        .uri("/api/products/6")
        .cookie(cookie.clone())
        .set_json(json!({ "quantity": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::get()
        .uri("/api/products?page=-1")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}
