// tests/api_tests.rs

use aula_backend::{config::Config, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL and a handle on the app's (in-memory) database so
/// tests can seed rows the API does not manage, e.g. classes.
async fn spawn_app() -> (String, SqlitePool) {
    // One connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite for testing");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

async fn seed_class(pool: &SqlitePool, code: &str, teacher_email: &str) {
    sqlx::query("INSERT INTO class_virtual (code, name, teacher_email) VALUES (?, ?, ?)")
        .bind(code)
        .bind(format!("Classe {}", code))
        .bind(teacher_email)
        .execute(pool)
        .await
        .unwrap();
}

async fn register_and_login(
    client: &reqwest::Client,
    address: &str,
    kind: &str,
    email: &str,
    class_code: Option<&str>,
) -> String {
    let mut body = serde_json::json!({
        "email": email,
        "name": "Mario",
        "surname": "Rossi",
        "password": "password123"
    });
    if let Some(code) = class_code {
        body["class_code"] = serde_json::json!(code);
    }

    let resp = client
        .post(format!("{}/api/auth/{}/register", address, kind))
        .json(&body)
        .send()
        .await
        .expect("Register failed");
    assert_eq!(resp.status().as_u16(), 201);

    let login = client
        .post(format!("{}/api/auth/{}/login", address, kind))
        .json(&serde_json::json!({"email": email, "password": "password123"}))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    login["token"].as_str().expect("Token not found").to_string()
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_student_works() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let email = format!("s_{}@studente.it", &uuid::Uuid::new_v4().to_string()[..8]);

    let response = client
        .post(format!("{}/api/auth/student/register", address))
        .json(&serde_json::json!({
            "email": email,
            "name": "Mario",
            "surname": "Rossi",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn register_student_duplicate_email_conflicts() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "email": "dup@studente.it",
        "name": "Mario",
        "surname": "Rossi",
        "password": "password123"
    });

    let first = client
        .post(format!("{}/api/auth/student/register", address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(format!("{}/api/auth/student/register", address))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn register_fails_validation() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: not an email address
    let response = client
        .post(format!("{}/api/auth/student/register", address))
        .json(&serde_json::json!({
            "email": "not-an-email",
            "name": "Mario",
            "surname": "Rossi",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn protected_routes_require_token_and_role() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // No token at all
    let response = client
        .get(format!("{}/api/student/tasks/assigned", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    // A student token on a teacher route
    let teacher_email = "bianchi@docente.it";
    let _ = register_and_login(&client, &address, "teacher", teacher_email, None).await;
    seed_class(&pool, "3A", teacher_email).await;
    let student_token =
        register_and_login(&client, &address, "student", "a@studente.it", Some("3A")).await;

    let response = client
        .get(format!("{}/api/teacher/classes", address))
        .header("Authorization", format!("Bearer {}", student_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn test_task_assignment_flow() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // 1. A teacher with one class and two enrolled students
    let teacher_email = "bianchi@docente.it";
    let teacher_token = register_and_login(&client, &address, "teacher", teacher_email, None).await;
    seed_class(&pool, "C1", teacher_email).await;
    let token_a = register_and_login(&client, &address, "student", "a@studente.it", Some("C1")).await;
    register_and_login(&client, &address, "student", "b@studente.it", Some("C1")).await;

    // 2. The teacher sees the class
    let classes: Vec<serde_json::Value> = client
        .get(format!("{}/api/teacher/classes", address))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["code"], "C1");

    // 3. Create a task; it fans out to both students
    let create_resp = client
        .post(format!("{}/api/teacher/tasks", address))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .json(&serde_json::json!({
            "title": "Quiz1",
            "description": "Primo quiz di informatica",
            "due_date": "2030-06-30",
            "max_points": 50,
            "class_code": "C1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(create_resp.status().as_u16(), 201);

    // 4. Student A sees it pending, then delivers it
    let assigned: Vec<serde_json::Value> = client
        .get(format!("{}/api/student/tasks/assigned", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["title"], "Quiz1");

    let deliver_resp = client
        .post(format!("{}/api/student/deliveries", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&serde_json::json!({"task_title": "Quiz1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(deliver_resp.status().as_u16(), 200);

    // Delivering again is a conflict
    let deliver_again = client
        .post(format!("{}/api/student/deliveries", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .json(&serde_json::json!({"task_title": "Quiz1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(deliver_again.status().as_u16(), 409);

    // 5. The partition moved and the profile counters followed
    let assigned: Vec<serde_json::Value> = client
        .get(format!("{}/api/student/tasks/assigned", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(assigned.is_empty());

    let completed: Vec<serde_json::Value> = client
        .get(format!("{}/api/student/tasks/completed", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);

    let profile: serde_json::Value = client
        .get(format!("{}/api/student/profile", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["total_points"], 50);
    assert_eq!(profile["tasks_completed"], 1);
    assert_eq!(profile["badges"].as_array().unwrap().len(), 0);

    // 6. The teacher sees student A among the completions
    let completions: Vec<serde_json::Value> = client
        .get(format!("{}/api/teacher/classes/C1/completions", address))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0]["email"], "a@studente.it");

    // 7. A second task with the same title is rejected
    let dup_resp = client
        .post(format!("{}/api/teacher/tasks", address))
        .header("Authorization", format!("Bearer {}", teacher_token))
        .json(&serde_json::json!({
            "title": "Quiz1",
            "description": "Doppione",
            "due_date": "2030-07-31",
            "max_points": 10,
            "class_code": "C1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(dup_resp.status().as_u16(), 409);
}

#[tokio::test]
async fn login_grants_badges_once() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let teacher_email = "bianchi@docente.it";
    let _ = register_and_login(&client, &address, "teacher", teacher_email, None).await;
    seed_class(&pool, "C1", teacher_email).await;
    let _ = register_and_login(&client, &address, "student", "a@studente.it", Some("C1")).await;

    // Push the profile over the first threshold behind the API's back.
    sqlx::query("UPDATE personal_profile SET total_points = 120 WHERE student_email = ?")
        .bind("a@studente.it")
        .execute(&pool)
        .await
        .unwrap();

    let login = client
        .post(format!("{}/api/auth/student/login", address))
        .json(&serde_json::json!({"email": "a@studente.it", "password": "password123"}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(login["badge_outcome"], "all_granted");

    // The second login finds the badge already there.
    let login = client
        .post(format!("{}/api/auth/student/login", address))
        .json(&serde_json::json!({"email": "a@studente.it", "password": "password123"}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(login["badge_outcome"], "already_present");

    let token = login["token"].as_str().unwrap();
    let profile: serde_json::Value = client
        .get(format!("{}/api/student/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let badges = profile["badges"].as_array().unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0]["badge_name"], "Ottimo Inizio");
}
