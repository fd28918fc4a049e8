use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

use salamawy_store::api::auth::{session_key, SESSION_COOKIE};
use salamawy_store::api::{build_app, AppState};
use salamawy_store::cli::create_admin;
use salamawy_store::storage::{MemStore, Storage};

const ADMIN: &str = "owner";
const PASSWORD: &str = "correct-horse";
const IMAGE: &str = "https://cdn.example.com/item.png";

struct Reply {
    status: StatusCode,
    body: Value,
    cookie: Option<Cookie<'static>>,
}

async fn send<S, R, B, E>(app: &S, req: R) -> Reply
where
    S: Service<R, Response = ServiceResponse<B>, Error = E>,
    B: MessageBody,
    E: std::fmt::Debug,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned());
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response is json")
    };
    Reply {
        status,
        body,
        cookie,
    }
}

fn state(store: &Arc<MemStore>) -> AppState {
    let shared: Arc<dyn Storage> = store.clone();
    AppState::new(shared, session_key("integration-test-secret"))
}

async fn store_with_admin() -> Arc<MemStore> {
    let store = Arc::new(MemStore::new());
    create_admin::run(store.as_ref(), ADMIN, PASSWORD)
        .await
        .expect("seed admin");
    store
}

fn login_request() -> TestRequest {
    TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "username": ADMIN, "password": PASSWORD }))
}

fn pubg() -> Value {
    json!({
        "product": { "name": "PUBG Mobile", "currency": "UC", "image": IMAGE },
        "prices": [
            { "value": 660, "label": "660 UC", "price": "450.00" },
            { "value": 60, "label": "60 UC", "price": "45.00" },
        ]
    })
}

#[actix_web::test]
async fn health_reports_storage() {
    let store = Arc::new(MemStore::new());
    let app = test::init_service(build_app(state(&store))).await;

    let reply = send(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "healthy");
    assert_eq!(reply.body["database"], "connected");
}

#[actix_web::test]
async fn admin_writes_need_a_session() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/products")
            .set_json(pubg())
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, json!({ "error": "Unauthorized" }));

    let reply = send(&app, TestRequest::get().uri("/api/admin/dashboard").to_request()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, TestRequest::delete().uri("/api/reviews/1").to_request()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.counts().await.unwrap().products, 0);
}

#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;

    for (username, password) in [(ADMIN, "wrong-password"), ("nobody", PASSWORD)] {
        let reply = send(
            &app,
            TestRequest::post()
                .uri("/api/admin/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body, json!({ "error": "Invalid credentials" }));
        assert!(reply.cookie.is_none());
    }
}

#[actix_web::test]
async fn login_opens_a_session() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;

    let reply = send(&app, TestRequest::get().uri("/api/admin/session").to_request()).await;
    assert_eq!(reply.body, json!({ "authenticated": false }));

    let reply = send(&app, login_request().to_request()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["username"], ADMIN);
    let cookie = reply.cookie.expect("session cookie");

    let reply = send(
        &app,
        TestRequest::get()
            .uri("/api/admin/session")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.body, json!({ "authenticated": true, "username": ADMIN }));

    let reply = send(
        &app,
        TestRequest::get()
            .uri("/api/admin/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["products"], 0);

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.body, json!({ "success": true }));
}

#[actix_web::test]
async fn bootstrap_create_closes_after_first_admin() {
    let store = Arc::new(MemStore::new());
    let app = test::init_service(build_app(state(&store))).await;

    let create = || {
        TestRequest::post()
            .uri("/api/admin/create")
            .set_json(json!({ "username": ADMIN, "password": PASSWORD }))
            .to_request()
    };
    let reply = send(&app, create()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);

    let reply = send(&app, create()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.count_admins().await.unwrap(), 1);

    let reply = send(&app, login_request().to_request()).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[actix_web::test]
async fn product_lifecycle_with_tiers() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/products")
            .cookie(cookie.clone())
            .set_json(pubg())
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["category"], "games");
    assert_eq!(reply.body["isActive"], true);
    let values: Vec<i64> = reply.body["prices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["value"].as_i64().unwrap())
        .collect();
    assert_eq!(values, [60, 660]);
    let id = reply.body["id"].as_i64().unwrap();

    // full tier replacement
    let reply = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/products/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({
                "product": { "name": "PUBG Mobile UC" },
                "prices": [{ "value": 325, "label": "325 UC", "price": "230.00" }]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "PUBG Mobile UC");
    assert_eq!(reply.body["prices"].as_array().unwrap().len(), 1);

    // bare patch keeps the tiers
    let reply = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/products/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "isActive": false }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.body["isActive"], false);
    assert_eq!(reply.body["prices"][0]["value"], 325);

    let reply = send(&app, TestRequest::get().uri("/api/products?all=true").to_request()).await;
    assert_eq!(reply.body, json!([]));

    let reply = send(
        &app,
        TestRequest::get()
            .uri("/api/products?all=true")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.body.as_array().unwrap().len(), 1);

    let reply = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/products/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.body, json!({ "success": true }));

    let reply = send(&app, TestRequest::get().uri(&format!("/api/products/{id}")).to_request()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "error": "Product not found" }));
}

#[actix_web::test]
async fn invalid_input_uses_the_validation_envelope() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/products")
            .cookie(cookie.clone())
            .set_json(json!({
                "product": { "name": " ", "currency": "UC", "image": "not a uri" },
                "prices": []
            }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Validation error");
    let fields: Vec<&str> = reply.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["name", "image"]);

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/products")
            .cookie(cookie.clone())
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"][0]["field"], "body");

    let reply = send(
        &app,
        TestRequest::get()
            .uri("/api/products/abc")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"][0]["field"], "id");
}

#[actix_web::test]
async fn reviews_are_hidden_until_approved() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/reviews")
            .set_json(json!({ "name": "Omar", "game": "PUBG Mobile", "rating": 5, "email": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["isApproved"], false);
    assert_eq!(reply.body["email"], Value::Null);
    let id = reply.body["id"].as_i64().unwrap();

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/reviews")
            .set_json(json!({ "name": "Omar", "game": "PUBG Mobile", "rating": 9 }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"][0]["field"], "rating");

    // visitors asking for pending reviews still only see approved ones
    let reply = send(&app, TestRequest::get().uri("/api/reviews?approved=false").to_request()).await;
    assert_eq!(reply.body, json!([]));

    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");
    let reply = send(
        &app,
        TestRequest::get()
            .uri("/api/reviews?approved=false")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.body.as_array().unwrap().len(), 1);

    let reply = send(
        &app,
        TestRequest::post()
            .uri(&format!("/api/reviews/{id}/approve"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.body["isApproved"], true);

    let reply = send(&app, TestRequest::get().uri("/api/reviews").to_request()).await;
    assert_eq!(reply.body[0]["id"], id);
}

#[actix_web::test]
async fn blog_drafts_stay_private_until_published() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let draft = json!({ "title": "How to top up PUBG", "content": "Open the app..." });
    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-posts")
            .cookie(cookie.clone())
            .set_json(&draft)
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["slug"], "how-to-top-up-pubg");
    assert_eq!(reply.body["publishedAt"], Value::Null);
    let id = reply.body["id"].as_i64().unwrap();

    let public = || {
        TestRequest::get()
            .uri("/api/blog-posts/how-to-top-up-pubg")
            .to_request()
    };
    assert_eq!(send(&app, public()).await.status, StatusCode::NOT_FOUND);

    let reply = send(
        &app,
        TestRequest::post()
            .uri(&format!("/api/admin/blog-posts/{id}/publish"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.body["isPublished"], true);
    assert!(reply.body["publishedAt"].is_string());

    let reply = send(&app, public()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["id"], id);

    // same title again gets a suffixed slug
    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-posts")
            .cookie(cookie.clone())
            .set_json(&draft)
            .to_request(),
    )
    .await;
    assert_eq!(reply.body["slug"], "how-to-top-up-pubg-2");

    // an explicit slug that is taken is a conflict
    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-posts")
            .cookie(cookie)
            .set_json(json!({ "title": "Other", "slug": "how-to-top-up-pubg", "content": "x" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn social_links_move_and_filter() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let mut ids = Vec::new();
    for (order, platform) in ["facebook", "instagram", "tiktok"].into_iter().enumerate() {
        let reply = send(
            &app,
            TestRequest::post()
                .uri("/api/admin/social-links")
                .cookie(cookie.clone())
                .set_json(json!({
                    "platform": platform,
                    "url": format!("https://{platform}.com/salamawy"),
                    "order": order,
                    "isActive": platform != "instagram",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        ids.push(reply.body["id"].as_i64().unwrap());
    }

    let reply = send(
        &app,
        TestRequest::post()
            .uri(&format!("/api/admin/social-links/{}/move", ids[2]))
            .cookie(cookie)
            .set_json(json!({ "direction": "up" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let platforms: Vec<&str> = reply.body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["platform"].as_str().unwrap())
        .collect();
    assert_eq!(platforms, ["facebook", "tiktok", "instagram"]);

    let reply = send(&app, TestRequest::get().uri("/api/social-links").to_request()).await;
    let platforms: Vec<&str> = reply.body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["platform"].as_str().unwrap())
        .collect();
    assert_eq!(platforms, ["facebook", "tiktok"]);
}

#[actix_web::test]
async fn site_settings_drive_whatsapp_links() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(&app, TestRequest::get().uri("/api/site-settings").to_request()).await;
    assert_eq!(reply.body["siteTitle"], "Salamawy Store");
    assert_eq!(reply.body["whatsappNumber"], "201000000000");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/products")
            .cookie(cookie.clone())
            .set_json(pubg())
            .to_request(),
    )
    .await;
    let id = reply.body["id"].as_i64().unwrap();

    let reply = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/products/{id}/whatsapp?lang=en"))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let url = reply.body["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/201000000000?text="));
    assert!(url.ends_with("PUBG%20Mobile%20-%2060%20UC"));

    let reply = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/products/{id}/whatsapp?priceId=999999"))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "error": "Price not found" }));

    let reply = send(
        &app,
        TestRequest::put()
            .uri("/api/admin/site-settings")
            .cookie(cookie)
            .set_json(json!({
                "siteTitle": "Salamawy",
                "heroTitle": "Top-ups",
                "heroSubtitle": "Fast delivery",
                "whatsappNumber": "+201112223333",
                "location": "Cairo",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, TestRequest::get().uri("/api/whatsapp/inquiry").to_request()).await;
    let url = reply.body["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/201112223333?text="));
}

#[actix_web::test]
async fn unknown_api_paths_are_json_404s() {
    let store = Arc::new(MemStore::new());
    let app = test::init_service(build_app(state(&store))).await;

    let reply = send(&app, TestRequest::get().uri("/api/nope").to_request()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "error": "Not found" }));
}

#[actix_web::test]
async fn admin_reads_need_a_session() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-posts")
            .cookie(cookie)
            .set_json(json!({ "title": "Hidden draft", "content": "secret" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);

    for uri in [
        "/api/admin/blog-posts",
        "/api/admin/blog-posts/1",
        "/api/admin/social-links",
        "/api/admin/blog-images",
        "/api/admin/site-settings",
        "/api/%61dmin/blog-posts",
        "/api/admin/%62log-posts",
    ] {
        let reply = send(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(reply.body, json!({ "error": "Unauthorized" }), "{uri}");
    }

    // session endpoints stay reachable without a cookie
    let reply = send(&app, TestRequest::get().uri("/api/admin/session").to_request()).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[actix_web::test]
async fn wrong_typed_update_bodies_are_rejected() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/products")
            .cookie(cookie.clone())
            .set_json(pubg())
            .to_request(),
    )
    .await;
    let id = reply.body["id"].as_i64().unwrap();
    let uri = format!("/api/products/{id}");

    for body in [
        json!({
            "product": { "name": "PUBG Renamed" },
            "prices": [{ "value": 325, "label": "325 UC", "price": 4.99 }]
        }),
        json!({ "product": { "name": "PUBG Renamed" } }),
        json!({ "prices": [] }),
        json!({ "name": 5 }),
    ] {
        let reply = send(
            &app,
            TestRequest::put()
                .uri(&uri)
                .cookie(cookie.clone())
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(reply.body["error"], "Validation error");
        assert_eq!(reply.body["details"][0]["field"], "body");
    }

    let reply = send(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(reply.body["name"], "PUBG Mobile");
    assert_eq!(reply.body["prices"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn service_lifecycle_and_order_link() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/social-media-services")
            .cookie(cookie.clone())
            .set_json(json!({
                "service": {
                    "platform": "instagram",
                    "serviceType": "followers",
                    "name": "Instagram Followers",
                    "image": IMAGE,
                },
                "prices": [
                    { "quantity": 5000, "label": "5K", "price": "400.00" },
                    { "quantity": 1000, "label": "1K", "price": "90.00" },
                ]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["isActive"], true);
    assert_eq!(reply.body["prices"][0]["quantity"], 1000);
    let id = reply.body["id"].as_i64().unwrap();
    let uri = format!("/api/social-media-services/{id}");

    let reply = send(
        &app,
        TestRequest::get()
            .uri(&format!("{uri}/whatsapp?lang=en"))
            .to_request(),
    )
    .await;
    let url = reply.body["url"].as_str().unwrap();
    assert!(url.contains("Hello%20Salamawy%2C%20I%20want%20to%20order%20Instagram%20Followers%20-%201K."));
    assert!(url.ends_with("Can%20you%20tell%20me%20about%20the%20price%3F"));

    let reply = send(
        &app,
        TestRequest::put()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({
                "service": { "name": "IG Followers" },
                "prices": [{ "quantity": 10000, "label": "10K", "price": "750.00" }]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "IG Followers");
    let tiers = reply.body["prices"].as_array().unwrap();
    assert_eq!(tiers.len(), 1);
    assert_eq!(tiers[0]["label"], "10K");

    let reply = send(
        &app,
        TestRequest::delete()
            .uri(&uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(reply.body, json!({ "success": true }));

    let reply = send(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({ "error": "Service not found" }));
}

#[actix_web::test]
async fn announcements_filter_by_active() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let mut ids = Vec::new();
    for (title, kind) in [("Eid sale", "success"), ("Maintenance", "warning")] {
        let reply = send(
            &app,
            TestRequest::post()
                .uri("/api/announcements")
                .cookie(cookie.clone())
                .set_json(json!({ "title": title, "message": "details", "type": kind }))
                .to_request(),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["type"], kind);
        ids.push(reply.body["id"].as_i64().unwrap());
    }

    let reply = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/announcements/{}", ids[1]))
            .cookie(cookie.clone())
            .set_json(json!({ "isActive": false }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.body["isActive"], false);
    assert_eq!(reply.body["title"], "Maintenance");

    let reply = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/announcements/{}", ids[0]))
            .cookie(cookie)
            .set_json(json!({ "type": "urgent" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"][0]["field"], "type");

    let reply = send(&app, TestRequest::get().uri("/api/announcements?active=true").to_request()).await;
    let titles: Vec<&str> = reply.body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Eid sale"]);

    let reply = send(&app, TestRequest::get().uri("/api/announcements").to_request()).await;
    assert_eq!(reply.body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn blog_images_attach_to_existing_posts() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-images")
            .cookie(cookie.clone())
            .set_json(json!({ "postId": 999, "url": IMAGE }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"][0]["field"], "postId");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-posts")
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Gallery", "content": "pics" }))
            .to_request(),
    )
    .await;
    let post_id = reply.body["id"].as_i64().unwrap();

    let mut image_ids = Vec::new();
    for post in [Value::from(post_id), Value::Null] {
        let reply = send(
            &app,
            TestRequest::post()
                .uri("/api/admin/blog-images")
                .cookie(cookie.clone())
                .set_json(json!({ "postId": post, "url": IMAGE, "altText": "" }))
                .to_request(),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body["altText"], Value::Null);
        image_ids.push(reply.body["id"].as_i64().unwrap());
    }

    let reply = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/admin/blog-images?postId={post_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.body.as_array().unwrap().len(), 1);
    assert_eq!(reply.body[0]["id"], image_ids[0]);

    let reply = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/admin/blog-images/{}", image_ids[0]))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(reply.body, json!({ "success": true }));

    let reply = send(
        &app,
        TestRequest::get()
            .uri("/api/admin/blog-images")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let ids: Vec<i64> = reply.body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [image_ids[1]]);
}

#[actix_web::test]
async fn blank_blog_patch_clears_optional_fields() {
    let store = store_with_admin().await;
    let app = test::init_service(build_app(state(&store))).await;
    let cookie = send(&app, login_request().to_request())
        .await
        .cookie
        .expect("session cookie");

    let reply = send(
        &app,
        TestRequest::post()
            .uri("/api/admin/blog-posts")
            .cookie(cookie.clone())
            .set_json(json!({
                "title": "Recharge guide",
                "content": "steps",
                "excerpt": "short version",
                "featuredImage": IMAGE,
            }))
            .to_request(),
    )
    .await;
    let id = reply.body["id"].as_i64().unwrap();
    let uri = format!("/api/admin/blog-posts/{id}");

    let reply = send(
        &app,
        TestRequest::put()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({ "content": "new steps" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.body["excerpt"], "short version");
    assert_eq!(reply.body["featuredImage"], IMAGE);

    let reply = send(
        &app,
        TestRequest::put()
            .uri(&uri)
            .cookie(cookie)
            .set_json(json!({ "excerpt": "", "featuredImage": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["excerpt"], Value::Null);
    assert_eq!(reply.body["featuredImage"], Value::Null);
    assert_eq!(reply.body["content"], "new steps");
}
