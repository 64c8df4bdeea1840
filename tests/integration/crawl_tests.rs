//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use catalog_crawler::catalog::{DownloadLink, Movie};
use catalog_crawler::config::Config;
use catalog_crawler::crawler::{
    Coordinator, PacingPolicy, ReqwestFetcher, RunLimits, RunPhase, ScraperDom,
};
use catalog_crawler::output::{load_statistics, ScraperStats};
use catalog_crawler::storage::{CheckpointStore, FsCheckpointStore};
use catalog_crawler::CrawlerError;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.output.directory = output_dir.path().display().to_string();
    config
}

fn coordinator(config: Config) -> Coordinator {
    let fetcher = ReqwestFetcher::new(&config.http).expect("Failed to build HTTP client");
    let store = FsCheckpointStore::new(&config.output.directory);
    Coordinator::with_capabilities(
        config,
        Box::new(fetcher),
        Box::new(ScraperDom),
        Box::new(store),
    )
    .expect("Failed to create coordinator")
    .with_pacing(PacingPolicy::none())
}

fn read_artifact(config: &Config, name: &str) -> Option<ScraperStats> {
    let store = FsCheckpointStore::new(&config.output.directory);
    load_statistics(&store, name).expect("Failed to read artifact")
}

fn root_page(categories: &[&str]) -> String {
    let mut body = String::from(r#"<html><body><a href="/about">About</a>"#);
    for category in categories {
        body.push_str(&format!(r#"<a href="/category/{0}/">{0}</a>"#, category));
    }
    body.push_str("</body></html>");
    body
}

fn category_page(movie_paths: &[&str]) -> String {
    let mut body = String::from("<html><body>");
    for movie_path in movie_paths {
        body.push_str(&format!(r#"<a href="{}">Movie</a>"#, movie_path));
    }
    body.push_str("</body></html>");
    body
}

fn detail_page(movie_path: &str, title: &str, server_paths: &[&str]) -> String {
    let mut body = format!(
        r#"<html><head><meta name="description" content="About {1}"></head><body>
        <a href="{0}">{1}</a>
        <img src="/posters/cover.jpg">
        <ul>"#,
        movie_path, title
    );
    for (index, server_path) in server_paths.iter().enumerate() {
        let resolution = if index == 0 { "720p" } else { "1080p" };
        body.push_str(&format!(
            r#"<li><a href="{}">{} {} [1.{}GB]</a></li>"#,
            server_path, title, resolution, index
        ));
    }
    body.push_str("</ul></body></html>");
    body
}

fn server_page(download_path: &str) -> String {
    format!(
        r#"<html><body><a href="/">Home</a><a href="{}">Download Now</a></body></html>"#,
        download_path
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a detail page with two resolvable server links
async fn mount_movie(server: &MockServer, id: u32, title: &str) -> String {
    let slug = title.split_whitespace().next().unwrap_or(title).to_lowercase();
    let movie_path = format!("/movie/{}/{}.html", id, slug);
    let server_paths = [format!("/server/{}/1/", id), format!("/server/{}/2/", id)];

    mount_page(
        server,
        &movie_path,
        detail_page(
            &movie_path,
            title,
            &[server_paths[0].as_str(), server_paths[1].as_str()],
        ),
    )
    .await;
    for (index, server_path) in server_paths.iter().enumerate() {
        mount_page(
            server,
            server_path,
            server_page(&format!("/downloads/{}/{}.mkv", id, index + 1)),
        )
        .await;
    }

    movie_path
}

#[tokio::test]
async fn test_full_crawl_single_category() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", root_page(&["action"])).await;
    let alpha = mount_movie(&mock_server, 101, "Alpha 2021").await;
    let beta = mount_movie(&mock_server, 102, "Beta 2019").await;
    mount_page(&mock_server, "/category/action/", category_page(&[&alpha, &beta])).await;

    let config = create_test_config(&base_url, &output_dir);
    let mut coordinator = coordinator(config.clone());
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(coordinator.phase(), RunPhase::Done);
    assert_eq!(report.categories_found, 1);
    assert_eq!(report.categories_visited, 1);
    assert_eq!(report.movies_extracted, 2);
    assert_eq!(report.total_movies, 2);
    assert_eq!(report.total_links, 4);

    let stats = read_artifact(&config, "filmyzilla_data.json").expect("No completion file");
    assert_eq!(stats.total_movies, 2);
    assert_eq!(stats.total_categories, 1);
    assert_eq!(stats.total_links, 4);
    assert_eq!(stats.categories, vec!["action"]);

    let first = &stats.movies[0];
    assert_eq!(first.id, "101");
    assert_eq!(first.title, "Alpha 2021");
    assert_eq!(first.year, "2021");
    assert_eq!(first.category, "action");
    assert_eq!(first.url, format!("{}{}", base_url, alpha));
    assert_eq!(first.thumbnail, format!("{}/posters/cover.jpg", base_url));
    assert_eq!(first.description, "About Alpha 2021");
    assert_eq!(
        first.links[0],
        DownloadLink {
            quality: "720p".to_string(),
            format: "mkv".to_string(),
            size: "1.0GB".to_string(),
            server_url: format!("{}/server/101/1/", base_url),
            download_url: format!("{}/downloads/101/1.mkv", base_url),
        }
    );
    assert_eq!(first.links[1].quality, "1080p");
    assert_eq!(stats.movies[1].title, "Beta 2019");
}

#[tokio::test]
async fn test_server_pages_receive_detail_referer() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();
    let movie_path = "/movie/7/gamma.html";
    let detail_url = format!("{}{}", base_url, movie_path);

    mount_page(&mock_server, "/", root_page(&["action"])).await;
    mount_page(&mock_server, "/category/action/", category_page(&[movie_path])).await;
    mount_page(
        &mock_server,
        movie_path,
        detail_page(movie_path, "Gamma 2020", &["/server/7/1/"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/server/7/1/"))
        .and(header("referer", detail_url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(server_page("/downloads/7.mkv")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &output_dir);
    let report = coordinator(config).run().await.expect("Crawl failed");
    assert_eq!(report.total_links, 1);
}

#[tokio::test]
async fn test_unresolvable_server_links_keep_sentinels() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();
    let movie_path = "/movie/9/delta.html";

    mount_page(&mock_server, "/", root_page(&["drama"])).await;
    mount_page(&mock_server, "/category/drama/", category_page(&[movie_path])).await;
    mount_page(
        &mock_server,
        movie_path,
        detail_page(movie_path, "Delta 2018", &["/server/9/1/", "/server/9/2/"]),
    )
    .await;
    // First server page has no download anchor, second is not mounted (404)
    mount_page(
        &mock_server,
        "/server/9/1/",
        "<html><body><a href=\"/\">Home</a></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&base_url, &output_dir);
    coordinator(config.clone()).run().await.expect("Crawl failed");

    let stats = read_artifact(&config, "filmyzilla_data.json").unwrap();
    let links = &stats.movies[0].links;
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].download_url, "NOT_FOUND");
    assert_eq!(links[1].download_url, "ERROR");
    assert_eq!(stats.resolved_links(), 0);
}

#[tokio::test]
async fn test_root_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &output_dir);
    let result = coordinator(config.clone()).run().await;

    assert!(matches!(result, Err(CrawlerError::Fetch(_))));
    assert!(read_artifact(&config, "filmyzilla_data.json").is_none());
}

#[tokio::test]
async fn test_category_failure_continues_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", root_page(&["broken", "action"])).await;
    Mock::given(method("GET"))
        .and(path("/category/broken/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let alpha = mount_movie(&mock_server, 101, "Alpha 2021").await;
    mount_page(&mock_server, "/category/action/", category_page(&[&alpha])).await;

    let config = create_test_config(&base_url, &output_dir);
    let report = coordinator(config).run().await.expect("Crawl failed");

    assert_eq!(report.categories_found, 2);
    assert_eq!(report.categories_failed, 1);
    assert_eq!(report.categories_visited, 1);
    assert_eq!(report.total_movies, 1);
}

#[tokio::test]
async fn test_failed_detail_page_is_not_retried_in_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    mount_page(&mock_server, "/", root_page(&["action", "drama"])).await;
    Mock::given(method("GET"))
        .and(path("/movie/5/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    // The same broken item is listed in both categories
    mount_page(
        &mock_server,
        "/category/action/",
        category_page(&["/movie/5/missing.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/category/drama/",
        category_page(&["/movie/5/missing.html"]),
    )
    .await;

    let config = create_test_config(&base_url, &output_dir);
    let report = coordinator(config).run().await.expect("Crawl failed");

    assert_eq!(report.movies_failed, 1);
    assert_eq!(report.movies_skipped, 1);
    assert_eq!(report.total_movies, 0);
}

#[tokio::test]
async fn test_resume_skips_processed_movies() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    let done_path = "/movie/101/alpha.html";
    let done_url = format!("{}{}", base_url, done_path);
    Mock::given(method("GET"))
        .and(path(done_path))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;
    let beta = mount_movie(&mock_server, 102, "Beta 2019").await;
    mount_page(&mock_server, "/", root_page(&["action"])).await;
    mount_page(&mock_server, "/category/action/", category_page(&[done_path, &beta])).await;

    let resumed = Movie {
        id: "101".to_string(),
        title: "Alpha 2021".to_string(),
        url: done_url.clone(),
        thumbnail: String::new(),
        category: "action".to_string(),
        year: "2021".to_string(),
        description: String::new(),
        links: vec![],
    };
    let config = create_test_config(&base_url, &output_dir);
    let store = FsCheckpointStore::new(&config.output.directory);
    store
        .save(
            "progress.json",
            &ScraperStats::from_movies(&[resumed]).to_json().unwrap(),
        )
        .unwrap();

    let report = coordinator(config.clone()).run().await.expect("Crawl failed");

    assert_eq!(report.movies_skipped, 1);
    assert_eq!(report.movies_extracted, 1);
    assert_eq!(report.total_movies, 2);

    let stats = read_artifact(&config, "filmyzilla_data.json").unwrap();
    let beta_url = format!("{}{}", base_url, beta);
    let urls: Vec<&str> = stats.movies.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(urls, vec![done_url.as_str(), beta_url.as_str()]);
}

#[tokio::test]
async fn test_fresh_run_ignores_checkpoint() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    let alpha = mount_movie(&mock_server, 101, "Alpha 2021").await;
    mount_page(&mock_server, "/", root_page(&["action"])).await;
    mount_page(&mock_server, "/category/action/", category_page(&[&alpha])).await;

    let stale = Movie {
        id: "1".to_string(),
        title: "Stale".to_string(),
        url: format!("{}{}", base_url, alpha),
        thumbnail: String::new(),
        category: "old".to_string(),
        year: String::new(),
        description: String::new(),
        links: vec![],
    };
    let config = create_test_config(&base_url, &output_dir);
    FsCheckpointStore::new(&config.output.directory)
        .save(
            "progress.json",
            &ScraperStats::from_movies(&[stale]).to_json().unwrap(),
        )
        .unwrap();

    let report = coordinator(config.clone())
        .fresh(true)
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.movies_skipped, 0);
    let stats = read_artifact(&config, "filmyzilla_data.json").unwrap();
    assert_eq!(stats.total_movies, 1);
    assert_eq!(stats.movies[0].title, "Alpha 2021");
}

#[tokio::test]
async fn test_malformed_checkpoint_starts_fresh() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    let alpha = mount_movie(&mock_server, 101, "Alpha 2021").await;
    let beta = mount_movie(&mock_server, 102, "Beta 2019").await;
    mount_page(&mock_server, "/", root_page(&["action"])).await;
    mount_page(&mock_server, "/category/action/", category_page(&[&alpha, &beta])).await;

    std::fs::write(output_dir.path().join("progress.json"), "{ not json").unwrap();

    let config = create_test_config(&base_url, &output_dir);
    let report = coordinator(config).run().await.expect("Crawl failed");

    assert_eq!(report.movies_skipped, 0);
    assert_eq!(report.total_movies, 2);
}

#[tokio::test]
async fn test_progress_checkpoint_at_interval() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    let alpha = mount_movie(&mock_server, 101, "Alpha 2021").await;
    let beta = mount_movie(&mock_server, 102, "Beta 2019").await;
    let gamma = mount_movie(&mock_server, 103, "Gamma 2020").await;
    mount_page(&mock_server, "/", root_page(&["action"])).await;
    mount_page(
        &mock_server,
        "/category/action/",
        category_page(&[&alpha, &beta, &gamma]),
    )
    .await;

    let mut config = create_test_config(&base_url, &output_dir);
    config.output.checkpoint_interval = 2;
    coordinator(config.clone()).run().await.expect("Crawl failed");

    let progress = read_artifact(&config, "progress.json").expect("No checkpoint written");
    assert_eq!(progress.total_movies, 2);

    let complete = read_artifact(&config, "filmyzilla_data.json").unwrap();
    assert_eq!(complete.total_movies, 3);
}

#[tokio::test]
async fn test_limits_cap_categories_and_movies() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output_dir = TempDir::new().unwrap();

    let alpha = mount_movie(&mock_server, 101, "Alpha 2021").await;
    mount_page(&mock_server, "/", root_page(&["action", "drama"])).await;
    mount_page(
        &mock_server,
        "/category/action/",
        category_page(&[&alpha, "/movie/102/beta.html"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/movie/102/beta.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/category/drama/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &output_dir);
    let report = coordinator(config)
        .with_limits(RunLimits::new(Some(1), Some(1)))
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.categories_found, 2);
    assert_eq!(report.categories_visited, 1);
    assert_eq!(report.total_movies, 1);
}
