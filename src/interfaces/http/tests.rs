//! Router-level tests: requests go through the full layer stack,
//! including the cookie session.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use super::{create_api_router, AppState};
use crate::application::identity::service::tests::FakeProvider;
use crate::application::services::listing::tests::submission;
use crate::config::AppConfig;
use crate::domain::ListingPhotos;
use crate::infrastructure::crypto::password::MIN_COST;
use crate::infrastructure::database::test_database;

const BOUNDARY: &str = "circles-test-boundary";

struct TestApp {
    state: AppState,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    async fn new(operators: &[&str]) -> Self {
        let mut config = AppConfig::default();
        config.access_gate.bcrypt_cost = MIN_COST;
        config.admin.operator_emails = operators.iter().map(|s| s.to_string()).collect();
        config.uploads.dir =
            std::env::temp_dir().join(format!("circles-http-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&config.uploads.dir).await.unwrap();

        let state = AppState::new(test_database().await, &config, Some(Arc::new(FakeProvider)));
        let router = create_api_router(state.clone(), &config, None);
        Self {
            state,
            router,
            cookie: None,
        }
    }

    async fn seed(&self, name: &str, genre: &str, secret: &str, tags: &[&str]) -> i32 {
        let mut form = submission(name, genre, Some(secret));
        for tag in tags {
            form.set_field("tag", tag.to_string());
        }
        self.state
            .listings
            .create(form, ListingPhotos::default(), None)
            .await
            .unwrap()
    }

    async fn send(&mut self, mut req: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            req.headers_mut().insert(COOKIE, cookie.parse().unwrap());
        }
        let resp = self.router.clone().oneshot(req).await.unwrap();
        if let Some(set) = resp.headers().get(SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        resp
    }

    async fn call(&mut self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.send(req).await;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.call("GET", uri, None).await
    }

    async fn unlock(&mut self, id: i32, password: &str) -> StatusCode {
        let body = serde_json::json!({ "password": password });
        self.call("POST", &format!("/circle/admin/{id}/auth"), Some(body))
            .await
            .0
    }

    async fn sign_in(&mut self) {
        let resp = self
            .send(Request::get("/auth/google").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp.headers()[LOCATION].to_str().unwrap().to_string();
        let state = location.rsplit("state=").next().unwrap().to_string();

        let callback = format!("/auth/google/callback?code=good&state={state}");
        let resp = self
            .send(Request::get(callback.as_str()).body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    async fn post_form(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, Vec<u8>)],
    ) -> (StatusCode, Value) {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::post(uri)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();
        let resp = self.send(req).await;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

fn listing_ids(body: &Value) -> Vec<i64> {
    body["data"]["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([20, 120, 200]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[tokio::test]
async fn search_ranks_by_tags_and_echoes_the_filter() {
    let mut app = TestApp::new(&[]).await;
    let one = app.seed("One", "Sports", "pw", &["a"]).await;
    let both = app.seed("Both", "Sports", "pw", &["a", "b"]).await;
    let none = app.seed("None", "Music", "pw", &[]).await;

    let (status, body) = app.get("/search?bigTag=a&bigTag=b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(listing_ids(&body), vec![both as i64, one as i64, none as i64]);
    assert_eq!(body["data"]["tags"], serde_json::json!(["a", "b"]));
    assert_eq!(body["data"]["is_favorite"], false);

    let (_, body) = app.get("/search?searchGenre[]=music&page=abc").await;
    assert_eq!(listing_ids(&body), vec![none as i64]);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["total_pages"], 1);
}

#[tokio::test]
async fn home_lists_every_listing() {
    let mut app = TestApp::new(&[]).await;
    for i in 0..3 {
        app.seed(&format!("Club {i}"), "Sports", "pw", &[]).await;
    }

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    let mut ids = listing_ids(&body);
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(body["data"]["total"], 3);
}

#[tokio::test]
async fn favorites_ignore_bad_ids() {
    let mut app = TestApp::new(&[]).await;
    let a = app.seed("A", "Sports", "pw", &[]).await;
    let b = app.seed("B", "Sports", "pw", &[]).await;

    let (_, body) = app.get(&format!("/searchFav?id={b}&id=oops&id={a}")).await;
    assert_eq!(listing_ids(&body), vec![a as i64, b as i64]);
    assert_eq!(body["data"]["is_favorite"], true);

    let (status, body) = app.get("/searchFav").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing_ids(&body).is_empty());
}

#[tokio::test]
async fn detail_validates_the_id() {
    let mut app = TestApp::new(&[]).await;
    let id = app.seed("Chess", "Culture", "pw", &[]).await;

    let (status, body) = app.get(&format!("/circle/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Chess");
    assert!(body["data"].get("secret_hash").is_none());

    assert_eq!(app.get("/circle/abc").await.0, StatusCode::BAD_REQUEST);
    let (status, body) = app.get("/circle/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn creating_requires_sign_in() {
    let mut app = TestApp::new(&[]).await;
    let (status, _) = app
        .post_form("/circles", &[("circleName", "Chess"), ("mainGenre", "Culture")], &[])
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/me").await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_in_user_creates_listing_with_photo() {
    let mut app = TestApp::new(&[]).await;
    app.sign_in().await;

    let (status, body) = app.get("/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada");

    let (status, body) = app
        .post_form(
            "/circles",
            &[
                ("circleName", "Photo Club"),
                ("mainGenre", "Culture"),
                ("password", "lens"),
                ("tag", "weekly, beginner"),
                ("admissionFee", ""),
                ("slider1", "4"),
            ],
            &[("topPhoto", "cover.png", png_bytes(1200, 300))],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app.get(&format!("/circle/{id}")).await;
    let listing = &body["data"];
    assert_eq!(listing["tags"], serde_json::json!(["weekly", "beginner"]));
    assert_eq!(listing["admission_fee"], Value::Null);
    assert_eq!(listing["slider1"], 4);
    let top = listing["top_photo"].as_str().unwrap().to_string();
    assert!(top.starts_with("/uploads/compressed-topPhoto-"), "{top}");

    let resp = app
        .send(Request::get(top.as_str()).body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mut raw_left = 0;
    let mut entries = tokio::fs::read_dir(app.state.images.root()).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        if entry.file_name().to_string_lossy().starts_with("topPhoto-") {
            raw_left += 1;
        }
    }
    assert_eq!(raw_left, 0);
}

#[tokio::test]
async fn create_rejects_missing_fields_and_bad_files() {
    let mut app = TestApp::new(&[]).await;
    app.sign_in().await;

    let (status, body) = app
        .post_form("/circles", &[("mainGenre", "Culture"), ("password", "pw")], &[])
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "circleName is required");

    let (status, _) = app
        .post_form(
            "/circles",
            &[("circleName", "X"), ("mainGenre", "Y"), ("password", "pw")],
            &[("topPhoto", "virus.exe", b"MZ".to_vec())],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_form(
            "/circles",
            &[("circleName", "X"), ("mainGenre", "Y"), ("password", "pw")],
            &[
                ("topPhoto", "a.png", png_bytes(4, 4)),
                ("topPhoto", "b.png", png_bytes(4, 4)),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gate_controls_owner_pages() {
    let mut app = TestApp::new(&[]).await;
    let id = app.seed("Chess", "Culture", "knight", &[]).await;

    assert_eq!(app.get(&format!("/circle/edit/{id}")).await.0, StatusCode::FORBIDDEN);
    assert_eq!(app.get(&format!("/circle/admin/{id}")).await.0, StatusCode::FORBIDDEN);

    assert_eq!(app.unlock(id, "bishop").await, StatusCode::FORBIDDEN);
    assert_eq!(app.unlock(id, "").await, StatusCode::BAD_REQUEST);
    assert_eq!(app.unlock(id + 1, "knight").await, StatusCode::NOT_FOUND);
    let (status, _) = app.call("POST", "/circle/admin/x/auth", Some(serde_json::json!({"password": "knight"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.unlock(id, "knight").await, StatusCode::OK);
    assert_eq!(app.unlock(id, "knight").await, StatusCode::OK);
    // a later wrong attempt does not revoke the grant
    assert_eq!(app.unlock(id, "bishop").await, StatusCode::FORBIDDEN);

    let (status, body) = app.get(&format!("/circle/edit/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Chess");

    app.get(&format!("/circle/{id}")).await;
    let (status, body) = app.get(&format!("/circle/admin/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["daily_views"][0]["view_count"], 1);

    let (status, _) = app
        .post_form(
            &format!("/circles/edit/{id}"),
            &[("circleName", "Chess Society"), ("mainGenre", "Culture")],
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&format!("/circle/{id}")).await;
    assert_eq!(body["data"]["name"], "Chess Society");

    let (status, _) = app.call("DELETE", &format!("/circle/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.get(&format!("/circle/{id}")).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn grants_do_not_carry_over_to_other_listings() {
    let mut app = TestApp::new(&[]).await;
    let mine = app.seed("Mine", "Culture", "one", &[]).await;
    let other = app.seed("Other", "Culture", "two", &[]).await;

    assert_eq!(app.unlock(mine, "one").await, StatusCode::OK);
    let (status, _) = app.call("DELETE", &format!("/circle/delete/{other}"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unlock_accepts_form_bodies() {
    let mut app = TestApp::new(&[]).await;
    let id = app.seed("Chess", "Culture", "knight", &[]).await;

    let req = Request::post(format!("/circle/admin/{id}/auth"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("password=knight"))
        .unwrap();
    assert_eq!(app.send(req).await.status(), StatusCode::OK);

    let req = Request::post(format!("/circle/admin/{id}/auth"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("other=1"))
        .unwrap();
    assert_eq!(app.send(req).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn site_dashboard_is_for_operators() {
    let mut app = TestApp::new(&["someone-else@example.com"]).await;
    assert_eq!(app.get("/site-stats").await.0, StatusCode::UNAUTHORIZED);

    app.sign_in().await;
    assert_eq!(app.get("/site-stats").await.0, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn site_dashboard_arms_a_single_bypass() {
    let mut app = TestApp::new(&["ada@example.com"]).await;
    let first = app.seed("First", "Culture", "pw", &[]).await;
    let second = app.seed("Second", "Culture", "pw", &[]).await;
    app.get(&format!("/circle/{first}")).await;
    app.sign_in().await;

    let (status, body) = app.get("/site-stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_listings"], 2);
    assert_eq!(body["data"]["total_views"], 1);
    assert_eq!(body["data"]["listings"][0]["id"], first);

    assert_eq!(app.get(&format!("/circle/admin/{second}")).await.0, StatusCode::OK);
    // the bypass is spent but the listing it opened stays granted
    assert_eq!(app.get(&format!("/circle/admin/{second}")).await.0, StatusCode::OK);
    assert_eq!(app.get(&format!("/circle/admin/{first}")).await.0, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn sign_in_rejects_a_forged_state() {
    let mut app = TestApp::new(&[]).await;
    app.send(Request::get("/auth/google").body(Body::empty()).unwrap())
        .await;
    let (status, _) = app.get("/auth/google/callback?code=good&state=forged").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/me").await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_database() {
    let mut app = TestApp::new(&[]).await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
}
