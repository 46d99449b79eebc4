use crate::helpers::{gmail_send, message_sent, spawn_app, spawn_app_without_token};
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

const VALID_BODY: &str = "firstName=Ada&lastName=Lovelace&email=ada%40example.com&message=Hello";

#[tokio::test]
async fn send_returns_200_for_a_valid_submission() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(message_sent())
        .expect(1)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send(VALID_BODY).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn send_relays_a_message_replying_to_the_submitter() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(message_sent())
        .expect(1)
        .mount(&app.gmail_server)
        .await;

    app.post_send(VALID_BODY).await;

    let messages = app.sent_messages().await;
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert!(message.contains("Reply-To: Ada Lovelace <ada@example.com>\r\n"));
    assert!(message.contains("Subject: Contact Form Submitted!\r\n"));
    assert!(message.ends_with("Ada Lovelace (ada@example.com) sent you a message:\r\n\r\nHello"));
}

#[tokio::test]
async fn send_returns_500_when_fields_are_missing() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.gmail_server)
        .await;

    let test_cases = vec![
        ("lastName=Lovelace&email=ada%40example.com&message=Hello", "missing first name"),
        ("firstName=Ada&email=ada%40example.com&message=Hello", "missing last name"),
        ("firstName=Ada&lastName=Lovelace&message=Hello", "missing email"),
        ("firstName=Ada&lastName=Lovelace&email=ada%40example.com", "missing message"),
        ("firstName=&lastName=Lovelace&email=ada%40example.com&message=Hello", "empty first name"),
        ("firstName=Ada&lastName=Lovelace&email=ada%40example.com&message=", "empty message"),
        ("", "missing everything"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_send(invalid_body).await;

        assert_eq!(
            500,
            response.status().as_u16(),
            "The API did not fail with 500 Internal Server Error when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn send_returns_500_for_a_body_that_is_not_a_form() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.gmail_server)
        .await;

    let response = app
        .api_client
        .post(&format!("{}/send", &app.address))
        .json(&serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "message": "Hello"
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn send_returns_500_when_gmail_rejects_the_message() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send(VALID_BODY).await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn send_returns_500_when_the_message_is_not_labelled_sent() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "17c3b4f0e2a1d9f8",
            "labelIds": ["DRAFT"]
        })))
        .expect(1)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send(VALID_BODY).await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn send_returns_500_without_calling_gmail_when_no_token_is_stored() {
    let app = spawn_app_without_token().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send(VALID_BODY).await;

    assert_eq!(response.status().as_u16(), 500);
    assert!(!app.token_path().exists());
}

#[tokio::test]
async fn send_returns_500_when_the_credentials_are_malformed() {
    let app = spawn_app().await;
    std::fs::write(app.credentials_path(), "{ not json").unwrap();

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send(VALID_BODY).await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn concurrent_submissions_keep_their_own_fields() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(message_sent().set_delay(std::time::Duration::from_millis(100)))
        .expect(2)
        .mount(&app.gmail_server)
        .await;

    let (first, second) = tokio::join!(
        app.post_send(VALID_BODY),
        app.post_send("firstName=Grace&lastName=Hopper&email=grace%40example.com&message=Hi"),
    );
    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);

    let messages = app.sent_messages().await;
    assert_eq!(messages.len(), 2);
    for message in messages {
        let from_ada = message.contains("Reply-To: Ada Lovelace <ada@example.com>")
            && message.ends_with("Ada Lovelace (ada@example.com) sent you a message:\r\n\r\nHello");
        let from_grace = message.contains("Reply-To: Grace Hopper <grace@example.com>")
            && message.ends_with("Grace Hopper (grace@example.com) sent you a message:\r\n\r\nHi");
        assert!(from_ada || from_grace, "Fields got mixed up in:\n{}", message);
    }
}

#[tokio::test]
async fn a_preflight_from_the_allowed_origin_is_accepted() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .request(reqwest::Method::OPTIONS, &format!("{}/send", &app.address))
        .header("Origin", app.allowed_origin.as_str())
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("Access-Control-Allow-Origin")
            .unwrap(),
        app.allowed_origin.as_str()
    );
}

#[tokio::test]
async fn a_preflight_from_another_origin_is_not_allowed() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .request(reqwest::Method::OPTIONS, &format!("{}/send", &app.address))
        .header("Origin", "https://attacker.example.net")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.headers().get("Access-Control-Allow-Origin").is_none());
}

#[tokio::test]
async fn a_preflight_for_a_method_other_than_post_is_not_allowed() {
    let app = spawn_app().await;

    for endpoint in ["send", "sendMail"] {
        let response = app
            .api_client
            .request(reqwest::Method::OPTIONS, &format!("{}/{}", &app.address, endpoint))
            .header("Origin", app.allowed_origin.as_str())
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .expect("Failed to execute request.");

        assert!(
            response.headers().get("Access-Control-Allow-Origin").is_none(),
            "GET was allowed on /{}",
            endpoint
        );
    }
}
