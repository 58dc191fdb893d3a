//! End-to-end tests for the site build.
//!
//! These tests lay out a small site on disk, build it, and check the
//! generated output tree.

use std::{fs, path::Path};

use folio_core::Config;
use folio_generator::Builder;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
}

/// Three posts (one bundled with a banner, one draft), two projects and a
/// static stylesheet.
fn sample_site() -> TempDir {
    let site = TempDir::new().unwrap();
    let content = site.path().join("content");

    write(
        &content,
        "blog/stop-using-gifs/index.md",
        r#"---
title: "Stop Using GIFs"
description: "Videos are smaller and look better."
date: 2019-05-01
categories:
  - performance
banner: ./banner.png
---

Use `<video>` elements instead.

```rust
fn main() {}
```
"#,
    );
    write(&content, "blog/stop-using-gifs/banner.png", "png bytes");
    write(
        &content,
        "blog/grid-vs-flexbox.md",
        r#"---
title: "Grid vs Flexbox"
date: 2019-03-10
categories:
  - css
  - performance
---

Grid is for two dimensions.
"#,
    );
    write(
        &content,
        "blog/first.md",
        "---\ntitle: First Post\ndate: 2018-01-01\n---\n\nHello there.\n",
    );
    write(
        &content,
        "blog/unfinished.md",
        "---\ntitle: Unfinished\ndate: 2020-01-01\ndraft: true\n---\n\nTBD\n",
    );
    write(
        &content,
        "projects/react-montreal.md",
        r##"---
title: "React Montreal"
subtitle: "Meetup website"
text_color: "#fff"
background_color: "#61dafb"
weight: 1
---

Built the meetup site.
"##,
    );
    write(
        &content,
        "projects/budget.md",
        "---\ntitle: Budget\nweight: 2\n---\n\nA budgeting app.\n",
    );
    write(site.path(), "static/style.css", "body { margin: 0; }");

    site
}

fn sample_config() -> Config {
    let mut config = Config::new("Robert Cooper", "https://www.example.com");
    config.site.description = Some("Front-end developer".to_string());
    config.build.posts_per_page = 2;
    config
}

fn build(site: &TempDir, config: Config) -> std::path::PathBuf {
    let output = site.path().join("public");
    Builder::new(config, site.path().join("content"), &output)
        .with_static_dir(site.path().join("static"))
        .build()
        .expect("build should succeed");
    output
}

#[test]
fn test_full_build_writes_every_page() {
    let site = sample_site();
    let output = build(&site, sample_config());

    for page in [
        "index.html",
        "404.html",
        "stop-using-gifs/index.html",
        "grid-vs-flexbox/index.html",
        "first/index.html",
        "blog/index.html",
        "blog/2/index.html",
        "categories/performance/index.html",
        "categories/css/index.html",
        "projects/index.html",
        "project/react-montreal/index.html",
        "project/budget/index.html",
        "rss.xml",
        "sitemap.xml",
        "robots.txt",
        "manifest.webmanifest",
        "style.css",
        "stop-using-gifs/banner.png",
    ] {
        assert!(output.join(page).exists(), "missing {page}");
    }

    assert!(!output.join("unfinished/index.html").exists());
    assert!(!output.join("stop-using-gifs/index.md").exists());
}

#[test]
fn test_post_page_links_neighbors() {
    let site = sample_site();
    let output = build(&site, sample_config());

    let middle = read(&output, "grid-vs-flexbox/index.html");
    assert!(middle.contains(r#"Next: <a href="/stop-using-gifs/">Stop Using GIFs</a>"#));
    assert!(middle.contains(r#"Previous: <a href="/first/">First Post</a>"#));
    assert!(middle.contains(r#"href="/categories/css/""#));
    assert!(middle.contains(r#"<div id="reading-progress"></div>"#));

    let newest = read(&output, "stop-using-gifs/index.html");
    assert!(!newest.contains("Next:"));
    assert!(newest.contains(r#"src="/stop-using-gifs/banner.png""#));
    assert!(newest.contains("https://www.example.com/stop-using-gifs/banner.png"));
    assert!(newest.contains("&lt;video&gt;"));
}

#[test]
fn test_home_page() {
    let site = sample_site();
    let output = build(&site, sample_config());

    let home = read(&output, "index.html");
    assert!(home.contains(r#"<h1 class="menu-title">"#));
    assert!(home.contains("Front-end developer"));
    assert!(home.contains(r#"href="/project/react-montreal/""#));
    assert!(home.contains("color: #fff; background-color: #61dafb"));
    assert!(!home.contains("Unfinished"));
    assert!(home.contains(r#"<div id="theme-switch"></div>"#));
    assert!(!home.contains("reading-progress"));
}

#[test]
fn test_blog_pagination() {
    let site = sample_site();
    let output = build(&site, sample_config());

    let first = read(&output, "blog/index.html");
    assert!(first.contains("Stop Using GIFs"));
    assert!(first.contains("Grid vs Flexbox"));
    assert!(!first.contains("First Post"));
    assert!(first.contains(r#"href="/blog/2/""#));
    assert!(first.contains("Older Posts"));
    assert!(!first.contains("Newer Posts"));

    let second = read(&output, "blog/2/index.html");
    assert!(second.contains("First Post"));
    assert!(second.contains("Newer Posts"));
    assert!(!second.contains("Older Posts"));
}

#[test]
fn test_category_page_lists_only_its_posts() {
    let site = sample_site();
    let output = build(&site, sample_config());

    let css = read(&output, "categories/css/index.html");
    assert!(css.contains("Grid vs Flexbox"));
    assert!(!css.contains("Stop Using GIFs"));

    let performance = read(&output, "categories/performance/index.html");
    let gifs = performance.find("Stop Using GIFs").unwrap();
    let grid = performance.find("Grid vs Flexbox").unwrap();
    assert!(gifs < grid, "category posts should be newest first");
}

#[test]
fn test_projects_ordered_by_weight() {
    let site = sample_site();
    let output = build(&site, sample_config());

    let projects = read(&output, "projects/index.html");
    let montreal = projects.find("React Montreal").unwrap();
    let budget = projects.find("Budget").unwrap();
    assert!(montreal < budget);
}

#[test]
fn test_feed_and_sitemap() {
    let site = sample_site();
    let output = build(&site, sample_config());

    let feed = read(&output, "rss.xml");
    assert!(feed.contains("<title>Robert Cooper</title>"));
    assert!(feed.contains("https://www.example.com/stop-using-gifs/"));
    assert!(feed.contains("Videos are smaller and look better."));
    assert!(!feed.contains("Unfinished"));

    let sitemap = read(&output, "sitemap.xml");
    assert!(sitemap.contains("<loc>https://www.example.com/</loc>"));
    assert!(sitemap.contains("<loc>https://www.example.com/blog/2/</loc>"));
    assert!(sitemap.contains("<loc>https://www.example.com/project/budget/</loc>"));
    assert!(!sitemap.contains("404"));

    let robots = read(&output, "robots.txt");
    assert!(robots.contains("Sitemap: https://www.example.com/sitemap.xml"));
}

#[test]
fn test_drafts_included_when_enabled() {
    let site = sample_site();
    let mut config = sample_config();
    config.build.drafts = true;
    let output = build(&site, config);

    assert!(output.join("unfinished/index.html").exists());
}

#[test]
fn test_invalid_post_is_skipped() {
    let site = sample_site();
    write(
        &site.path().join("content"),
        "blog/broken.md",
        "no frontmatter here",
    );
    let output = build(&site, sample_config());

    assert!(output.join("first/index.html").exists());
    assert!(!output.join("broken/index.html").exists());
}

#[test]
fn test_rebuild_is_repeatable() {
    let site = sample_site();
    let first = read(&build(&site, sample_config()), "grid-vs-flexbox/index.html");
    let second = read(&build(&site, sample_config()), "grid-vs-flexbox/index.html");
    assert_eq!(first, second);
}
