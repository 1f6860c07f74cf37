use httpmock::prelude::*;

use scrubgrid_engine::blacklist::BlacklistIndex;
use scrubgrid_engine::table::ColumnNames;
use scrubgrid_engine::ScrubError;
use scrubgrid_io::source::{BlacklistFetcher, BlacklistSource};

const BLACKLIST_CSV: &str = "Company Name,Email\nGoogle,\n,HR@IBM.com\n";

#[test]
fn fetch_remote_csv_builds_index() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/blacklist.csv");
        then.status(200)
            .header("content-type", "text/csv; charset=utf-8")
            .body(BLACKLIST_CSV);
    });

    let source = BlacklistSource::parse(&server.url("/blacklist.csv")).unwrap();
    let table = source.load().unwrap();
    mock.assert();

    assert_eq!(table.columns, vec!["Company Name", "Email"]);
    let index = BlacklistIndex::from_table(&table, &ColumnNames::default()).unwrap();
    assert!(index.companies().contains("google"));
    assert!(index.emails().contains("hr@ibm.com"));
    assert_eq!(index.companies().len(), 1);
    assert_eq!(index.emails().len(), 1);
}

#[test]
fn http_error_is_io_error_with_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing.csv");
        then.status(404).body("not found");
    });

    let err = BlacklistFetcher::new()
        .unwrap()
        .fetch(&server.url("/missing.csv"))
        .unwrap_err();
    assert!(matches!(err, ScrubError::Io(_)));
    let msg = err.to_string();
    assert!(msg.contains("HTTP 404"), "{msg}");
    assert!(msg.contains("not found"), "{msg}");
}

#[test]
fn html_response_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/private");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("<html><body>Sign in</body></html>");
    });

    let err = BlacklistFetcher::new()
        .unwrap()
        .fetch(&server.url("/private"))
        .unwrap_err();
    assert!(err.to_string().contains("shared publicly"));
}

#[test]
fn connection_failure_is_io_error() {
    // port 9 (discard) is not served by anything in the test environment
    let err = BlacklistFetcher::new()
        .unwrap()
        .fetch("http://127.0.0.1:9/blacklist.csv")
        .unwrap_err();
    assert!(matches!(err, ScrubError::Io(_)));
}

#[test]
fn local_source_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blacklist.csv");
    std::fs::write(&path, BLACKLIST_CSV).unwrap();

    let source = BlacklistSource::parse(path.to_str().unwrap()).unwrap();
    assert!(matches!(source, BlacklistSource::Local(_)));
    assert_eq!(source.load().unwrap().len(), 2);
}
