use std::sync::Arc;
use url::Url;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};
use page_loader::{MirrorConfig, OutputDir, ResourcePathPlanner, OriginPolicy, TagKind, names};

fn planner_for(page: &str) -> Result<ResourcePathPlanner, Box<dyn std::error::Error>> {
    let page_url = Url::parse(page)?;
    let dir_name = names::named(&page_url, names::DIR_SUFFIX)?;
    Ok(ResourcePathPlanner::new(OriginPolicy::default(), page_url, dir_name))
}

#[test]
fn test_image_on_nested_page() -> Result<(), Box<dyn std::error::Error>> {
    let plan = planner_for("https://example.com/blog/post")?
        .plan("/assets/cat.png", TagKind::Image)
        .ok_or("expected a plan")?;

    assert_eq!(plan.url.as_str(), "https://example.com/assets/cat.png");
    assert_eq!(plan.replacement, "example-com-blog-post_files/example-com-assets-cat.png");
    Ok(())
}

#[test]
fn test_unlabeled_link_on_root_page() -> Result<(), Box<dyn std::error::Error>> {
    let plan = planner_for("https://example.com")?
        .plan("/css/main", TagKind::Link)
        .ok_or("expected a plan")?;

    assert_eq!(plan.file_name, "example-com-css-main.html");
    Ok(())
}

#[test]
fn test_cdn_script_is_left_alone() -> Result<(), Box<dyn std::error::Error>> {
    let plan = planner_for("https://example.com")?
        .plan("https://cdn.other.com/jquery.min.js", TagKind::Script);

    assert!(plan.is_none());
    Ok(())
}

#[tokio::test]
async fn test_download_writes_page_and_resources() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir()?;

    Mock::given(path("/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><link href="/assets/menu.css"></head>
<body><img src="/assets/professions/nodejs.png"><script src="https://js.stripe.com/v3/"></script></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(path("/assets/menu.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string(".menu {}"))
        .mount(&server)
        .await;
    Mock::given(path("/assets/professions/nodejs.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 16]))
        .mount(&server)
        .await;

    let page_url = Url::parse(&format!("{}/courses", server.uri()))?;
    let config = Arc::new(MirrorConfig::new(page_url, OutputDir::Path(tmp.path().to_path_buf())));
    let report = page_loader::download(config).await?;

    assert_eq!(report.page_path, tmp.path().join("127-0-0-1-courses.html"));
    assert_eq!((report.saved, report.failed, report.skipped), (2, 0, 1));

    let files = tmp.path().join("127-0-0-1-courses_files");
    assert_eq!(std::fs::read_to_string(files.join("127-0-0-1-assets-menu.css"))?, ".menu {}");
    assert_eq!(std::fs::read(files.join("127-0-0-1-assets-professions-nodejs.png"))?, vec![7u8; 16]);

    let html = std::fs::read_to_string(&report.page_path)?;
    assert!(html.contains(r#"<link href="127-0-0-1-courses_files/127-0-0-1-assets-menu.css">"#));
    assert!(html.contains(r#"<script src="https://js.stripe.com/v3/"></script>"#));
    Ok(())
}
