//! End-to-end tests against a mock Scholar server.
//!
//! The client's `base_url` option points at an `httpmock` server serving
//! citations-page fixtures, so the whole resolve -> fetch -> write pipeline
//! runs without touching the network.

use coauthors::export;
use coauthors::resolve::{resolve, AuthorQuery, FailOnAmbiguous, PickFirst};
use coauthors::scholar::{ClientOptions, ScholarClient};
use coauthors::CoauthorsError;
use httpmock::prelude::*;
use tempfile::TempDir;

const PROFILE_HTML: &str = r##"
<html><body>
  <div id="gsc_prf">
    <div id="gsc_prf_in">Stefan Bringuier</div>
    <div class="gsc_prf_il">Research Scientist</div>
    <div class="gsc_prf_il" id="gsc_prf_ivh">Verified email at ucsd.edu - <a href="#">Homepage</a></div>
  </div>
</body></html>
"##;

const SEARCH_ONE_HTML: &str = r#"
<html><body>
  <div id="gsc_sa_ccl">
    <div class="gsc_1usr">
      <h3 class="gs_ai_name"><a href="/citations?hl=en&amp;user=MhJTimgAAAAJ">Stefan Bringuier</a></h3>
      <div class="gs_ai_aff">Research Scientist</div>
      <div class="gs_ai_eml">Verified email at ucsd.edu</div>
    </div>
  </div>
</body></html>
"#;

const SEARCH_TWO_HTML: &str = r#"
<html><body>
  <div id="gsc_sa_ccl">
    <div class="gsc_1usr">
      <h3 class="gs_ai_name"><a href="/citations?hl=en&amp;user=MhJTimgAAAAJ">Stefan Bringuier</a></h3>
      <div class="gs_ai_aff">Research Scientist</div>
      <div class="gs_ai_eml">Verified email at ucsd.edu</div>
    </div>
    <div class="gsc_1usr">
      <h3 class="gs_ai_name"><a href="/citations?hl=en&amp;user=OtherId00000">Stefan Bringuier</a></h3>
      <div class="gs_ai_aff">Example University</div>
    </div>
  </div>
</body></html>
"#;

const SEARCH_EMPTY_HTML: &str = r#"
<html><body>
  <div id="gsc_sa_ccl"></div>
</body></html>
"#;

const COLLEAGUES_HTML: &str = r#"
<html><body>
  <div id="gsc_sa_ccl">
    <div class="gsc_1usr">
      <h3 class="gs_ai_name"><a href="/citations?hl=en&amp;user=Coauthor0001">Jane Roe</a></h3>
      <div class="gs_ai_aff">Example University</div>
    </div>
    <div class="gsc_1usr">
      <h3 class="gs_ai_name"><a href="/citations?hl=en&amp;user=Coauthor0002">John Doe</a></h3>
      <div class="gs_ai_aff">Dept of Physics, Example University</div>
    </div>
    <div class="gsc_1usr">
      <h3 class="gs_ai_name"><a href="/citations?hl=en&amp;user=Coauthor0003">Jane Roe</a></h3>
      <div class="gs_ai_aff">Example University</div>
    </div>
  </div>
</body></html>
"#;

fn client_for(server: &MockServer) -> ScholarClient {
    let options = ClientOptions {
        proxy: None,
        base_url: Some(server.base_url()),
    };
    ScholarClient::new(&options).expect("Failed to build client")
}

#[tokio::test]
async fn resolve_by_id_returns_expected_profile() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("user", "MhJTimgAAAAJ");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(PROFILE_HTML);
    });

    let client = client_for(&server);
    let query = AuthorQuery::ById("MhJTimgAAAAJ".to_string());
    let author = resolve(&client, &query, &FailOnAmbiguous)
        .await
        .expect("Resolve failed");

    profile_mock.assert();
    assert_eq!(author.name, "Stefan Bringuier");
    assert_eq!(author.scholar_id, "MhJTimgAAAAJ");
    assert_eq!(author.email_domain, "@ucsd.edu");
}

#[tokio::test]
async fn resolve_by_name_unique_match_skips_selector() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("view_op", "search_authors")
            .query_param("mauthors", "Stefan Bringuier");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(SEARCH_ONE_HTML);
    });

    let client = client_for(&server);
    let query = AuthorQuery::ByName {
        name: "Stefan Bringuier".to_string(),
        institution: None,
    };

    // FailOnAmbiguous proves the selector is never consulted for a unique hit
    let author = resolve(&client, &query, &FailOnAmbiguous)
        .await
        .expect("Resolve failed");

    assert_eq!(author.name, "Stefan Bringuier");
    assert_eq!(author.scholar_id, "MhJTimgAAAAJ");
}

#[tokio::test]
async fn resolve_by_name_with_institution_builds_combined_query() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("view_op", "search_authors")
            .query_param("mauthors", "Stefan Bringuier, UCSD");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(SEARCH_ONE_HTML);
    });

    let client = client_for(&server);
    let query = AuthorQuery::ByName {
        name: "Stefan Bringuier".to_string(),
        institution: Some("UCSD".to_string()),
    };
    let author = resolve(&client, &query, &FailOnAmbiguous)
        .await
        .expect("Resolve failed");

    search_mock.assert();
    assert_eq!(author.scholar_id, "MhJTimgAAAAJ");
}

#[tokio::test]
async fn resolve_ambiguous_uses_selector() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("view_op", "search_authors");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(SEARCH_TWO_HTML);
    });

    let client = client_for(&server);
    let query = AuthorQuery::ByName {
        name: "Stefan Bringuier".to_string(),
        institution: None,
    };

    let author = resolve(&client, &query, &PickFirst)
        .await
        .expect("Resolve failed");
    assert_eq!(author.scholar_id, "MhJTimgAAAAJ");

    let err = resolve(&client, &query, &FailOnAmbiguous)
        .await
        .expect_err("Expected ambiguity to fail");
    assert!(matches!(err, CoauthorsError::Selection(_)));
}

#[tokio::test]
async fn resolve_zero_candidates_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("view_op", "search_authors");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(SEARCH_EMPTY_HTML);
    });

    let client = client_for(&server);
    let query = AuthorQuery::ByName {
        name: "No Such Person".to_string(),
        institution: None,
    };

    let err = resolve(&client, &query, &PickFirst)
        .await
        .expect_err("Expected empty search to fail");
    assert!(matches!(err, CoauthorsError::AuthorNotFound(_)));
}

#[tokio::test]
async fn pipeline_writes_coauthor_csv() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("view_op", "search_authors")
            .query_param("mauthors", "Stefan Bringuier");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(SEARCH_ONE_HTML);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/citations")
            .query_param("view_op", "list_colleagues")
            .query_param("user", "MhJTimgAAAAJ");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(COLLEAGUES_HTML);
    });

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("output/coauthors.csv");

    let client = client_for(&server);
    let query = AuthorQuery::ByName {
        name: "Stefan Bringuier".to_string(),
        institution: None,
    };
    let author = resolve(&client, &query, &PickFirst)
        .await
        .expect("Resolve failed");
    export::save_coauthors(&client, &author, &path)
        .await
        .expect("Save failed");

    assert!(path.is_file());

    let content = std::fs::read_to_string(&path).expect("Failed to read output");
    assert!(!content.is_empty());
    assert_eq!(content.lines().next(), Some("Name,Affiliation"));

    // Round-trip: one row per co-author entry, same order, duplicates intact
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let rows: Vec<(String, String)> = reader
        .records()
        .map(|record| {
            let record = record.expect("Bad CSV record");
            (record[0].to_string(), record[1].to_string())
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            (
                "Jane Roe".to_string(),
                "Example University".to_string()
            ),
            (
                "John Doe".to_string(),
                "Dept of Physics, Example University".to_string()
            ),
            (
                "Jane Roe".to_string(),
                "Example University".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn captcha_page_fails_the_fetch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/citations");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html><body>Our systems have detected unusual traffic from your computer network.</body></html>");
    });

    let client = client_for(&server);
    let err = client
        .search_authors("Stefan Bringuier")
        .await
        .expect_err("Expected CAPTCHA wall to fail");
    assert!(matches!(err, CoauthorsError::Captcha));
}
