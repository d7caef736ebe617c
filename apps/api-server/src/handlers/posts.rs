//! Post resource handlers.

use actix_web::{HttpResponse, web};

use posts_core::domain::{Post, PostId};
use posts_shared::DataEnvelope;
use posts_shared::dto::PostResponse;

use super::json_payload;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// GET /api/posts
pub async fn index(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;

    let envelope: DataEnvelope<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(envelope))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let payload = json_payload(&body)?;
    let post = state.posts.create(&payload).await?;

    tracing::info!(post_id = post.id, user_id = %identity.user_id, "Post created");
    Ok(HttpResponse::Created().json(to_response(post)))
}

/// GET /api/posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state.posts.show(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PUT|PATCH /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let payload = json_payload(&body)?;
    let post = state.posts.update(path.into_inner(), &payload).await?;

    tracing::info!(post_id = post.id, user_id = %identity.user_id, "Post updated");
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await?;

    tracing::info!(post_id = id, user_id = %identity.user_id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::http::{Method, StatusCode, header};
    use actix_web::test;
    use serde_json::{Value, json};

    use posts_shared::dto::{PostRequest, PostResponse};

    use crate::testing::{TestContext, test_app};

    fn assert_post_shape(value: &Value) {
        for key in ["id", "title", "created_at", "updated_at"] {
            assert!(value.get(key).is_some(), "missing `{key}` in {value}");
        }
        assert!(value["id"].is_i64());
    }

    #[actix_rt::test]
    async fn test_store() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(ctx.auth_header())
            .set_json(PostRequest {
                title: "El post de prueba".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_post_shape(&body);
        assert_eq!(body["title"], "El post de prueba");
        assert!(ctx.store.contains_title("El post de prueba").await);
    }

    #[actix_rt::test]
    async fn test_store_then_show_roundtrips_title() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        for title in ["a", "Título con acentos ñ", "  padded  "] {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(ctx.auth_header())
                .set_json(json!({ "title": title }))
                .to_request();
            let created: Value = test::call_and_read_body_json(&app, req).await;

            let req = test::TestRequest::get()
                .uri(&format!("/api/posts/{}", created["id"]))
                .insert_header(ctx.auth_header())
                .to_request();
            let shown: Value = test::call_and_read_body_json(&app, req).await;

            assert_eq!(shown["title"], title);
            assert_eq!(shown, created);
        }
    }

    #[actix_rt::test]
    async fn test_validate_title() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(ctx.auth_header())
            .set_json(json!({ "title": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"]["title"].is_array());
        assert!(ctx.store.list_titles().await.is_empty());
    }

    #[actix_rt::test]
    async fn test_store_without_body_requires_title() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(ctx.auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["title"][0], "The title field is required.");
    }

    #[actix_rt::test]
    async fn test_store_malformed_json_is_bad_request() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(ctx.auth_header())
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"title\":")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_show() {
        let ctx = TestContext::new();
        let post = ctx.seed_post("Seeded").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(ctx.auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_post_shape(&body);
        assert_eq!(body["title"], "Seeded");
    }

    #[actix_rt::test]
    async fn test_404_show() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        for uri in ["/api/posts/1000", "/api/posts/not-a-number"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(ctx.auth_header())
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["status"], 404);
        }
    }

    #[actix_rt::test]
    async fn test_update() {
        let ctx = TestContext::new();
        let post = ctx.seed_post("viejo").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(ctx.auth_header())
            .set_json(json!({ "title": "nuevo" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_post_shape(&body);
        assert_eq!(body["title"], "nuevo");
        assert_eq!(body["id"], post.id);
        assert!(ctx.store.contains_title("nuevo").await);
        assert!(!ctx.store.contains_title("viejo").await);
    }

    #[actix_rt::test]
    async fn test_patch_updates_like_put() {
        let ctx = TestContext::new();
        let post = ctx.seed_post("before").await;
        let app = test_app!(ctx);
        actix_rt::time::sleep(Duration::from_millis(5)).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(ctx.auth_header())
            .set_json(json!({ "title": "after" }))
            .to_request();
        let body: PostResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.title, "after");
        assert_eq!(body.created_at, post.created_at);
        assert!(body.updated_at > post.updated_at);
    }

    #[actix_rt::test]
    async fn test_update_errors() {
        let ctx = TestContext::new();
        let post = ctx.seed_post("keep me").await;
        let app = test_app!(ctx);

        let cases = [
            (format!("/api/posts/{}", post.id), json!({ "title": "" }), StatusCode::UNPROCESSABLE_ENTITY),
            (format!("/api/posts/{}", post.id), json!({ "title": 7 }), StatusCode::UNPROCESSABLE_ENTITY),
            ("/api/posts/1000".to_string(), json!({ "title": "nuevo" }), StatusCode::NOT_FOUND),
            ("/api/posts/1000".to_string(), json!({ "title": "" }), StatusCode::NOT_FOUND),
        ];

        for (uri, payload, status) in cases {
            let req = test::TestRequest::put()
                .uri(&uri)
                .insert_header(ctx.auth_header())
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{uri} {payload}");
        }

        assert!(ctx.store.contains_title("keep me").await);
    }

    #[actix_rt::test]
    async fn test_delete() {
        let ctx = TestContext::new();
        let post = ctx.seed_post("to delete").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(ctx.auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(resp).await.is_empty());
        assert!(!ctx.store.contains(post.id).await);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(ctx.auth_header())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(ctx.auth_header())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_index() {
        let ctx = TestContext::new();
        for i in 0..5 {
            ctx.seed_post(&format!("post {i}")).await;
        }
        let app = test_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(ctx.auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let data = body["data"].as_array().expect("data array");
        assert!(data.len() >= 5);
        data.iter().for_each(assert_post_shape);
    }

    #[actix_rt::test]
    async fn test_guest() {
        let ctx = TestContext::new();
        let post = ctx.seed_post("private").await;
        let app = test_app!(ctx);

        let cases = [
            (Method::GET, "/api/posts".to_string()),
            (Method::POST, "/api/posts".to_string()),
            (Method::GET, "/api/posts/1000".to_string()),
            (Method::PUT, "/api/posts/1000".to_string()),
            (Method::PATCH, "/api/posts/1000".to_string()),
            (Method::DELETE, "/api/posts/1000".to_string()),
            (Method::DELETE, format!("/api/posts/{}", post.id)),
            (Method::PUT, "/api/posts/not-a-number".to_string()),
        ];

        for (method, uri) in cases {
            let req = test::TestRequest::default()
                .method(method.clone())
                .uri(&uri)
                .set_json(json!({ "title": "" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }

        // Nothing was touched
        assert!(ctx.store.contains(post.id).await);
        assert_eq!(ctx.store.list_titles().await, vec!["private".to_string()]);
    }

    #[actix_rt::test]
    async fn test_expired_token_is_unauthorized() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(ctx.expired_auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Token Expired");
    }
}
