use crate::helpers::{gmail_send, message_sent, spawn_app};
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "messageBody": "<p>Hello</p>"
    })
}

#[tokio::test]
async fn send_mail_returns_200_and_relays_an_html_message() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(message_sent())
        .expect(1)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send_mail(&valid_body()).await;

    assert_eq!(response.status().as_u16(), 200);
    let messages = app.sent_messages().await;
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert!(message.contains("Reply-To: Ada Lovelace <ada@example.com>\r\n"));
    assert!(message.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert!(message.contains("MIME-Version: 1.0\r\n"));
    assert!(message.contains("Subject: =?utf-8?B?"));
    assert!(message.ends_with("\r\n\r\n<p>Hello</p>"));
}

#[tokio::test]
async fn send_mail_returns_400_when_fields_are_missing() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.gmail_server)
        .await;

    let test_cases = vec![
        (
            serde_json::json!({"lastName": "Lovelace", "email": "ada@example.com", "messageBody": "Hi"}),
            "missing first name",
        ),
        (
            serde_json::json!({"firstName": "Ada", "email": "ada@example.com", "messageBody": "Hi"}),
            "missing last name",
        ),
        (
            serde_json::json!({"firstName": "Ada", "lastName": "Lovelace", "messageBody": "Hi"}),
            "missing email",
        ),
        (
            serde_json::json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com"}),
            "missing message body",
        ),
        (
            serde_json::json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "message": "Hi"}),
            "message sent under the form field name",
        ),
        (
            serde_json::json!({"firstName": "", "lastName": "Lovelace", "email": "ada@example.com", "messageBody": "Hi"}),
            "empty first name",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_send_mail(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn send_mail_returns_500_when_gmail_fails() {
    let app = spawn_app().await;

    gmail_send()
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&app.gmail_server)
        .await;

    let response = app.post_send_mail(&valid_body()).await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn send_mail_only_accepts_post() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.gmail_server)
        .await;

    let response = app
        .api_client
        .get(&format!("{}/sendMail", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 500);
}
