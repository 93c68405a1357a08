use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("imgstack-unit")
        .join(format!("{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn scheme_split() {
    assert_eq!(url_scheme("https://x/y.png"), Some("https"));
    assert_eq!(url_scheme("file:///a"), Some("file"));
    assert_eq!(url_scheme("relative/a.png"), None);
}

#[test]
fn file_fetcher_reads_plain_relative_and_file_urls() {
    let dir = scratch_dir("fetch");
    std::fs::write(dir.join("a.bin"), b"abc").unwrap();

    let fetcher = FileFetcher::new(&dir);
    assert_eq!(fetcher.fetch("a.bin").unwrap(), b"abc");

    let abs = format!("file://{}", dir.join("a.bin").display());
    assert_eq!(fetcher.fetch(&abs).unwrap(), b"abc");
}

#[test]
fn file_fetcher_errors() {
    let fetcher = FileFetcher::new(scratch_dir("fetch-errors"));
    assert!(matches!(
        fetcher.fetch("missing.png"),
        Err(LoadFailure::Fetch(_))
    ));
    assert!(matches!(
        fetcher.fetch("ftp://host/a.png"),
        Err(LoadFailure::Unsupported(_))
    ));
    assert!(matches!(
        fetcher.fetch("file://"),
        Err(LoadFailure::InvalidUrl(_))
    ));
}

#[test]
fn scheme_fetcher_rejects_unknown_schemes() {
    let fetcher = SchemeFetcher::new(scratch_dir("scheme")).unwrap();
    assert!(matches!(
        fetcher.fetch("gopher://x"),
        Err(LoadFailure::Unsupported(_))
    ));
    #[cfg(not(feature = "http"))]
    assert!(matches!(
        fetcher.fetch("https://example.com/a.png"),
        Err(LoadFailure::Unsupported(_))
    ));
}
