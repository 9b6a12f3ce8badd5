//! End-to-end API tests.
//!
//! Each test builds the full router in-process against a fresh in-memory
//! database and drives it with `tower::ServiceExt::oneshot`, so the whole
//! stack is exercised without binding a socket.

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower::ServiceExt;

use prime_drip_api::config::{AppConfig, JwtConfig};
use prime_drip_api::state::AppState;
use prime_drip_api::{db, middleware, routes};

struct TestApp {
    router: Router,
    pool: SqlitePool,
    // Held so uploaded files outlive the test body.
    _upload_dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("tempdir");

    let config = AppConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        upload_dir: upload_dir.path().to_path_buf(),
        jwt: JwtConfig {
            secret: SecretString::from("kkN2uJ8sQm4xWzR7vTb91cHdYpL3gFa6eZoXiC50"),
            expiry_secs: 3600,
        },
    };

    let pool = db::create_pool(&config.database_url).await.expect("pool");
    db::migrate(&pool).await.expect("migrate");

    let state = AppState::new(config, pool.clone());
    let router = Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::error_envelope))
        .with_state(state);

    TestApp {
        router,
        pool,
        _upload_dir: upload_dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request build");

        self.send(request).await
    }

    async fn register(&self, name: &str, email: &str, password: &str) {
        let (status, _) = self
            .request(
                Method::POST,
                "/v1/auth/register",
                None,
                Some(json!({ "nombre": name, "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().expect("token").to_owned()
    }

    /// Promote a registered user to admin directly in the database, then
    /// log in again so the token carries the new role.
    async fn admin_token(&self, email: &str, password: &str) -> String {
        self.register("Admin", email, password).await;
        sqlx::query("INSERT INTO user_roles (user_id, role_id) SELECT id, 2 FROM users WHERE email = ?1")
            .bind(email)
            .execute(&self.pool)
            .await
            .expect("grant admin role");
        self.login(email, password).await
    }

    async fn seed_product(&self, admin_token: &str, name: &str, price: &str) -> (i64, i64) {
        let (status, body) = self
            .request(
                Method::POST,
                "/v1/categorias",
                Some(admin_token),
                Some(json!({ "nombre": format!("{name} category"), "descripcion": null })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let category_id = body["data"]["id"].as_i64().expect("category id");

        let (status, body) = self
            .request(
                Method::POST,
                "/v1/productos",
                Some(admin_token),
                Some(json!({
                    "nombre": name,
                    "descripcion": "seeded",
                    "precio": price,
                    "stock": 25,
                    "marca": "Drip",
                    "imagenUrl": "/uploads/images/seed.jpg",
                    "activo": true,
                    "categoriaId": category_id,
                    "etiqueta": "Nuevo",
                    "sexo": "Unisex",
                    "isFeatured": false
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let product_id = body["data"]["id"].as_i64().expect("product id");

        (category_id, product_id)
    }
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({
                "nombre": "Ana",
                "email": "Ana@Example.com",
                "telefono": "555-0101",
                "password": "correct horse battery",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseCode"], 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Ana");
    // Emails are normalized to lowercase on the way in.
    assert_eq!(body["data"]["email"], "ana@example.com");

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "email": "ANA@example.COM", "password": "correct horse battery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "Ana");
    assert_eq!(body["data"]["tokenType"], "Bearer");
    assert_eq!(body["data"]["roles"], json!(["ROLE_USER"]));
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitively() {
    let app = spawn_app().await;
    app.register("Ana", "ana@example.com", "correct horse battery")
        .await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({
                "nombre": "Impostor",
                "email": "ANA@EXAMPLE.COM",
                "password": "a different password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/v1/auth/register");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = spawn_app().await;
    app.register("Ana", "ana@example.com", "correct horse battery")
        .await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/auth/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

// ============================================================================
// Authorization gates
// ============================================================================

#[tokio::test]
async fn test_product_listing_requires_admin() {
    let app = spawn_app().await;

    let (status, _) = app.request(Method::GET, "/v1/productos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.register("Ana", "ana@example.com", "correct horse battery")
        .await;
    let user_token = app.login("ana@example.com", "correct horse battery").await;
    let (status, _) = app
        .request(Method::GET, "/v1/productos", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = app.admin_token("boss@example.com", "a strong password").await;
    let (status, body) = app
        .request(Method::GET, "/v1/productos", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = app
        .request(Method::GET, "/v1/productos", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_category_crud_and_name_uniqueness() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/categorias",
            Some(&admin),
            Some(json!({ "nombre": "Shoes", "descripcion": "all footwear" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().expect("id");

    // Duplicate name is rejected.
    let (status, body) = app
        .request(
            Method::POST,
            "/v1/categorias",
            Some(&admin),
            Some(json!({ "nombre": "Shoes", "descripcion": null })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Listing is public.
    let (status, body) = app.request(Method::GET, "/v1/categorias", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/v1/categorias/{id}"),
            Some(&admin),
            Some(json!({ "nombre": "Sneakers", "descripcion": "renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "Sneakers");

    let (status, _) = app
        .request(Method::DELETE, &format!("/v1/categorias/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // A deleted (or never-existing) category reads back as bad input.
    let (status, body) = app
        .request(Method::GET, &format!("/v1/categorias/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], format!("/v1/categorias/{id}"));
}

#[tokio::test]
async fn test_category_delete_blocked_while_referenced() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;
    let (category_id, product_id) = app.seed_product(&admin, "Runner", "89.90").await;

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/v1/categorias/{category_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Once the product is gone the category can be deleted.
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/v1/productos/{product_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/v1/categorias/{category_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;
    let (category_id, product_id) = app.seed_product(&admin, "Runner", "89.90").await;

    // Active listing and by-category filtering are public.
    let (status, body) = app
        .request(Method::GET, "/v1/productos/activos", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["nombre"], "Runner");
    assert_eq!(body["data"][0]["precio"], "89.90");
    assert_eq!(body["data"][0]["etiqueta"], "Nuevo");

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/v1/productos/categoria/{category_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    // Any authenticated user can update.
    app.register("Ana", "ana@example.com", "correct horse battery")
        .await;
    let user_token = app.login("ana@example.com", "correct horse battery").await;
    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/v1/productos/{product_id}"),
            Some(&user_token),
            Some(json!({
                "nombre": "Runner",
                "descripcion": "restocked",
                "precio": "79.90",
                "stock": 3,
                "marca": "Drip",
                "imagenUrl": "/uploads/images/seed.jpg",
                "activo": false,
                "categoriaId": category_id,
                "etiqueta": "Últimas unidades",
                "sexo": "Unisex",
                "isFeatured": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], 3);
    assert_eq!(body["data"]["etiqueta"], "Últimas unidades");

    // Deactivated products drop out of the public listing.
    let (_, body) = app
        .request(Method::GET, "/v1/productos/activos", None, None)
        .await;
    assert_eq!(body["data"], json!([]));

    // Delete is admin-only.
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/v1/productos/{product_id}"),
            Some(&user_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/v1/productos/{product_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(Method::GET, &format!("/v1/productos/{product_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], format!("/v1/productos/{product_id}"));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_guest_cart_merges_duplicate_products() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;
    let (_, product_id) = app.seed_product(&admin, "Runner", "89.90").await;

    // Anonymous creation mints a session token the client must keep.
    let (status, body) = app
        .request(Method::POST, "/v1/carrito", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    let cart_id = body["data"]["carritoId"].as_i64().expect("cart id");
    let session_id = body["data"]["sessionId"].as_str().expect("session").to_owned();
    assert!(body["data"]["usuarioId"].is_null());

    for cantidad in [2, 3] {
        let (status, _) = app
            .request(
                Method::POST,
                "/v1/detalle-carrito",
                None,
                Some(json!({
                    "carritoId": cart_id,
                    "productoId": product_id,
                    "cantidad": cantidad,
                    "precioUnitario": "89.90"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .request(
            Method::GET,
            &format!("/v1/carrito?carritoId={cart_id}&sessionId={session_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["cantidad"], 5);
    assert_eq!(items[0]["precioUnitario"], "89.90");
    assert_eq!(items[0]["productoNombre"], "Runner");
}

#[tokio::test]
async fn test_claim_rebinds_guest_cart_to_user() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;
    let (_, product_id) = app.seed_product(&admin, "Runner", "89.90").await;

    let (_, body) = app
        .request(Method::POST, "/v1/carrito", None, Some(json!({})))
        .await;
    let cart_id = body["data"]["carritoId"].as_i64().expect("cart id");
    let session_id = body["data"]["sessionId"].as_str().expect("session").to_owned();

    app.request(
        Method::POST,
        "/v1/detalle-carrito",
        None,
        Some(json!({
            "carritoId": cart_id,
            "productoId": product_id,
            "cantidad": 1,
            "precioUnitario": "89.90"
        })),
    )
    .await;

    app.register("Ana", "ana@example.com", "correct horse battery")
        .await;
    let token = app.login("ana@example.com", "correct horse battery").await;
    let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE email = 'ana@example.com'")
        .fetch_one(&app.pool)
        .await
        .expect("user id");

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/v1/carrito?carritoId={cart_id}&usuarioId={user_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    // The session credential no longer resolves the cart.
    let (status, _) = app
        .request(
            Method::GET,
            &format!("/v1/carrito?carritoId={cart_id}&sessionId={session_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The user credential does, items intact.
    let (status, body) = app
        .request(
            Method::GET,
            &format!("/v1/carrito?carritoId={cart_id}&usuarioId={user_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));

    // Logged-in lookup finds the claimed cart.
    let (status, body) = app
        .request(Method::GET, "/v1/carrito/usuario", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], cart_id);

    // Mutations with the stale session credential miss and report it.
    let (status, body) = app
        .request(
            Method::PUT,
            "/v1/detalle-carrito",
            None,
            Some(json!({
                "carritoId": cart_id,
                "productoId": product_id,
                "cantidad": 9,
                "sessionId": session_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], false);

    let (status, body) = app
        .request(
            Method::DELETE,
            "/v1/detalle-carrito",
            None,
            Some(json!({
                "carritoId": cart_id,
                "productoId": product_id,
                "usuarioId": user_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);
}

#[tokio::test]
async fn test_claim_of_missing_cart_reports_failure() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(Method::PUT, "/v1/carrito?carritoId=4242&usuarioId=1", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseCode"], 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], false);
}

#[tokio::test]
async fn test_cart_creation_rejects_ambiguous_owner() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/carrito",
            None,
            Some(json!({ "usuarioId": 1, "sessionId": "tok" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["path"], "/v1/carrito");
}

#[tokio::test]
async fn test_cart_fetch_requires_a_credential() {
    let app = spawn_app().await;

    let (_, body) = app
        .request(Method::POST, "/v1/carrito", None, Some(json!({})))
        .await;
    let cart_id = body["data"]["carritoId"].as_i64().expect("cart id");

    let (status, _) = app
        .request(Method::GET, &format!("/v1/carrito?carritoId={cart_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Uploads
// ============================================================================

fn multipart_body(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_image_upload_and_delete() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;

    let boundary = "xBoundary1729";
    let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/upload/product-image")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(boundary, "shoe.PNG", "image/png", &png)))
        .expect("request build");

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    let image_url = body["data"]["imageUrl"].as_str().expect("url").to_owned();
    assert!(image_url.starts_with("/uploads/images/"));
    assert!(image_url.ends_with(".png"));

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/v1/upload/delete-image?imageUrl={image_url}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    // Second delete finds nothing.
    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/v1/upload/delete-image?imageUrl={image_url}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], false);
}

#[tokio::test]
async fn test_upload_rejects_non_image_content() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;

    let boundary = "xBoundary1729";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/upload/product-image")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(
            boundary,
            "notes.txt",
            "text/plain",
            b"hello",
        )))
        .expect("request build");

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_oversized_upload_gets_enveloped_413() {
    let app = spawn_app().await;
    let admin = app.admin_token("boss@example.com", "a strong password").await;

    // Over the route body limit, so the rejection happens below the handler.
    let boundary = "xBoundary1729";
    let huge = vec![0_u8; 7 * 1024 * 1024];
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/upload/product-image")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(boundary, "huge.png", "image/png", &huge)))
        .expect("request build");

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], 413);
    assert_eq!(body["success"], false);
    assert_eq!(body["path"], "/v1/upload/product-image");
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let app = spawn_app().await;
    app.register("Ana", "ana@example.com", "correct horse battery")
        .await;
    let token = app.login("ana@example.com", "correct horse battery").await;

    let boundary = "xBoundary1729";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/upload/product-image")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(boundary, "x.png", "image/png", b"png")))
        .expect("request build");

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Error envelope
// ============================================================================

#[tokio::test]
async fn test_error_envelope_shape() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(Method::GET, "/v1/productos/424242", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["timestamp"].is_string());
    assert_eq!(body["status"], 404);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(body["message"].is_string());
    assert_eq!(body["path"], "/v1/productos/424242");

    // Missing categories surface as validation errors, in the same shape.
    let (status, body) = app
        .request(Method::GET, "/v1/categorias/424242", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["path"], "/v1/categorias/424242");
}
