use crate::helpers::spawn_app;

#[tokio::test]
async fn home_redirects_permanently_to_the_site() {
    let app = spawn_app().await;

    let response = app.get_home().await;

    assert_eq!(response.status().as_u16(), 301);
    assert_eq!(response.headers().get("Location").unwrap(), app.site_url.as_str());
}
