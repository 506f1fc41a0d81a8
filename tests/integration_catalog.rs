mod common;

use axum::http::StatusCode;
use common::{create_test_user, get_auth_token, send, setup_test_app};
use scholaris_core::{SystemRole, all_permissions};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_login_and_profile(pool: PgPool) {
    let teacher = create_test_user(&pool, SystemRole::Teacher).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": teacher.email, "password": teacher.password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert_eq!(body["user"]["role"], "teacher");
    assert!(body["user"].get("password").is_none());

    let token = body["access_token"].as_str().unwrap().to_string();
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/auth/me",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "teacher");
    let permissions: Vec<&str> = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p.as_str())
        .collect();
    assert!(permissions.contains(&"attendance:mark"));
    assert!(!permissions.contains(&"financial:view"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let student = create_test_user(&pool, SystemRole::Student).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": student.email, "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@school.test", "password": "whatever1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_check_my_permissions(pool: PgPool) {
    let parent = create_test_user(&pool, SystemRole::Parent).await;
    let token = get_auth_token(&pool, &parent).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/me/check",
        Some(&token),
        Some(json!({"permissions": ["grading:view", "system:settings"], "mode": "any"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], true);
    assert_eq!(body["missing"], json!(["system:settings"]));

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/me/check",
        Some(&token),
        Some(json!({"permissions": ["grading:view", "system:settings"]})),
    )
    .await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["mode"], "all");

    let (_, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/auth/me/check",
        Some(&token),
        Some(json!({"permissions": [], "mode": "any"})),
    )
    .await;
    assert_eq!(body["allowed"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_permission_catalogue(pool: PgPool) {
    let admin = create_test_user(&pool, SystemRole::Admin).await;
    let token = get_auth_token(&pool, &admin).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/permissions",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], all_permissions().len());

    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 13);
    let sum: usize = categories
        .iter()
        .map(|c| c["permissions"].as_array().unwrap().len())
        .sum();
    assert_eq!(sum, all_permissions().len());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_category_lookup(pool: PgPool) {
    let admin = create_test_user(&pool, SystemRole::Admin).await;
    let token = get_auth_token(&pool, &admin).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/permissions/categories/library",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"].as_array().unwrap().len(), 6);
    assert_eq!(body["permissions"][0]["token"], "library:view");

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/permissions/categories/cafeteria",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissions"], json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalogue_requires_role_view(pool: PgPool) {
    let teacher = create_test_user(&pool, SystemRole::Teacher).await;
    let token = get_auth_token(&pool, &teacher).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/permissions",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("role:view"));

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/roles",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_templates(pool: PgPool) {
    let super_admin = create_test_user(&pool, SystemRole::SuperAdmin).await;
    let token = get_auth_token(&pool, &super_admin).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/roles",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let roles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["role"].as_str())
        .collect();
    assert_eq!(
        roles,
        vec!["super_admin", "admin", "teacher", "student", "parent"]
    );
    assert_eq!(
        body[0]["permissions"].as_array().unwrap().len(),
        all_permissions().len()
    );

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/roles/student",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Student");

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/roles/principal",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_user_token_rejected(pool: PgPool) {
    let admin = create_test_user(&pool, SystemRole::Admin).await;
    let token = get_auth_token(&pool, &admin).await;

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/roles",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User no longer exists");
}
