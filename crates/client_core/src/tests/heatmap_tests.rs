use super::*;

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

async fn chart(Path(login): Path<String>) -> Response {
    match login.as_str() {
        "octocat" => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            "<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>",
        )
            .into_response(),
        "html" => ([(header::CONTENT_TYPE, "text/html")], "<p>oops</p>").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_chart_server() -> anyhow::Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/:login", get(chart));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}"))?)
}

fn source(base: Url) -> HeatmapSource {
    HeatmapSource::new(base, Arc::new(HttpImageLoader::new(Client::new())))
}

#[tokio::test]
async fn image_response_counts_as_loaded() {
    let source = source(spawn_chart_server().await.expect("spawn server"));
    let url = source.url_for("octocat");

    assert_eq!(source.loader().load(&url).await, ImageOutcome::Loaded);
}

#[tokio::test]
async fn missing_image_counts_as_failed() {
    let source = source(spawn_chart_server().await.expect("spawn server"));
    let url = source.url_for("nobody");

    assert_eq!(source.loader().load(&url).await, ImageOutcome::Failed);
}

#[tokio::test]
async fn non_image_content_counts_as_failed() {
    let source = source(spawn_chart_server().await.expect("spawn server"));
    let url = source.url_for("html");

    assert_eq!(source.loader().load(&url).await, ImageOutcome::Failed);
}

#[test]
fn url_appends_login_as_path_segment() {
    let base = Url::parse("https://ghchart.rshah.org").expect("url");
    let source = source(base);

    assert_eq!(
        source.url_for("octocat").as_str(),
        "https://ghchart.rshah.org/octocat"
    );
}

#[test]
fn pending_view_resolves_once() {
    let mut view = HeatmapView::Pending("https://ghchart.rshah.org/octocat".to_string());
    view.resolve(ImageOutcome::Loaded);
    assert_eq!(view.visible_url(), Some("https://ghchart.rshah.org/octocat"));

    view.resolve(ImageOutcome::Failed);
    assert_eq!(view.visible_url(), Some("https://ghchart.rshah.org/octocat"));

    let mut failed = HeatmapView::Pending("https://ghchart.rshah.org/ghost".to_string());
    failed.resolve(ImageOutcome::Failed);
    assert_eq!(failed, HeatmapView::Hidden);
}
