//! Check command - validate configuration and content

use std::{collections::HashMap, path::Path};

use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::Config;
use folio_generator::collector::{BLOG_DIR, PROJECTS_DIR, find_markdown_files};
use folio_parser::MarkdownParser;

use super::{SitePaths, load_config};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Collected errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Collected warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and every post and project.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    println!("Checking configuration...");
    let config = load_config(config_path)?;
    println!("  ✓ Configuration valid");

    let paths = SitePaths::resolve(config_path, &config);
    let result = validate(&config, &paths)?;

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Validate configuration values and content files.
pub fn validate(config: &Config, paths: &SitePaths) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    check_config_values(config, &mut result);

    if paths.content.exists() {
        validate_content(config, &paths.content, &mut result)?;
    } else {
        result.add_error(format!(
            "Content directory missing: {}",
            paths.content.display()
        ));
    }

    if !paths.static_dir.exists() {
        result.add_warning(format!(
            "Static directory missing: {}",
            paths.static_dir.display()
        ));
    }

    let output = &paths.output;
    if output.exists() && !output.is_dir() {
        result.add_error(format!(
            "Output path exists but is not a directory: {}",
            output.display()
        ));
    }

    Ok(result)
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if !config.site.url.starts_with("http://") && !config.site.url.starts_with("https://") {
        result.add_warning("site.url should start with http:// or https://");
    }

    if config.site.description.is_none() {
        result.add_warning("site.description is not set; pages fall back to an empty description");
    }

    if config.site.author.is_none() {
        result.add_warning("site.author is not set; the footer uses the site title");
    }
}

/// Parse every post and project, reporting parse failures and URL clashes.
fn validate_content(config: &Config, content_dir: &Path, result: &mut ValidationResult) -> Result<()> {
    let parser = MarkdownParser::with_theme(&config.build.syntax_theme);
    let mut urls: HashMap<String, String> = HashMap::new();
    let mut checked = 0;
    let mut failed = 0;

    let mut claim = |url: String, path: &Path, result: &mut ValidationResult| {
        let source = path.display().to_string();
        if let Some(previous) = urls.insert(url.clone(), source.clone()) {
            result.add_error(format!("{url} is produced by both {previous} and {source}"));
        }
    };

    let posts = find_markdown_files(&content_dir.join(BLOG_DIR)).wrap_err("Failed to list posts")?;
    for path in &posts {
        checked += 1;
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        match parser.parse_post(&content, path) {
            Ok(post) => {
                if post.meta.date.is_none() {
                    result.add_warning(format!("{}: post has no date", path.display()));
                }
                claim(post.url.clone(), path, result);
            }
            Err(e) => {
                result.add_error(format!("{}: {e}", path.display()));
                failed += 1;
            }
        }
    }

    let projects =
        find_markdown_files(&content_dir.join(PROJECTS_DIR)).wrap_err("Failed to list projects")?;
    for path in &projects {
        checked += 1;
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

        match parser.parse_project(&content, path) {
            Ok(project) => claim(project.url.clone(), path, result),
            Err(e) => {
                result.add_error(format!("{}: {e}", path.display()));
                failed += 1;
            }
        }
    }

    if failed == 0 {
        println!("  ✓ All {checked} content files valid");
    } else {
        println!("  ✗ {failed}/{checked} content files have errors");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn site() -> (TempDir, Config, SitePaths) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new("Site", "https://example.com");
        config.site.description = Some("About".to_string());
        config.site.author = Some("Author".to_string());
        let paths = SitePaths::resolve(&dir.path().join("folio.toml"), &config);
        fs::create_dir_all(&paths.static_dir).unwrap();
        (dir, config, paths)
    }

    fn write(paths: &SitePaths, relative: &str, content: &str) {
        let path = paths.content.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_valid_site() {
        let (_dir, config, paths) = site();
        write(&paths, "blog/hello.md", "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi\n");
        write(&paths, "projects/tool.md", "---\ntitle: Tool\n---\n");

        let result = validate(&config, &paths).unwrap();
        assert!(result.errors().is_empty(), "{:?}", result.errors());
        assert!(result.warnings().is_empty(), "{:?}", result.warnings());
    }

    #[test]
    fn test_missing_content_dir_is_error() {
        let (_dir, config, paths) = site();
        let result = validate(&config, &paths).unwrap();
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_parse_error_reported() {
        let (_dir, config, paths) = site();
        write(&paths, "blog/broken.md", "no frontmatter");

        let result = validate(&config, &paths).unwrap();
        assert!(result.errors()[0].contains("broken.md"));
    }

    #[test]
    fn test_duplicate_urls_reported() {
        let (_dir, config, paths) = site();
        write(&paths, "blog/a.md", "---\ntitle: A\ndate: 2024-01-01\nslug: same\n---\n");
        write(&paths, "blog/b.md", "---\ntitle: B\ndate: 2024-01-02\nslug: same\n---\n");

        let result = validate(&config, &paths).unwrap();
        assert!(result.errors().iter().any(|e| e.contains("/same/")));
    }

    #[test]
    fn test_undated_post_warns() {
        let (_dir, config, paths) = site();
        write(&paths, "blog/undated.md", "---\ntitle: Undated\n---\n");

        let result = validate(&config, &paths).unwrap();
        assert!(result.errors().is_empty());
        assert!(result.warnings()[0].contains("no date"));
    }
}
