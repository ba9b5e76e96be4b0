//! npm registry E2E tests against a local HTTP server

mod helper;

use mockito::Server;

use helper::versions_body;
use whatver::command::{self, LocalContext, Query, Rendering};
use whatver::output::Palette;
use whatver::version::registries::NpmRegistry;
use whatver::version::{
    QueryOptions, ResolveError, VersionRecord, fetch_versions, resolve_versions,
    satisfied_versions,
};

async fn serve_versions(server: &mut Server, package: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/{package}").as_str())
        .match_header("accept", "application/vnd.npm.install-v1+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn classifies_versions_against_caret_range() {
    let mut server = Server::new_async().await;
    let mock = serve_versions(
        &mut server,
        "test-package",
        &versions_body(&["1.0.0", "1.1.0", "2.0.0"]),
    )
    .await;
    let registry = NpmRegistry::new(&server.url());

    let result = resolve_versions(
        &registry,
        "test-package",
        Some("^1.0.0"),
        QueryOptions::default(),
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(
        result,
        vec![
            VersionRecord::new("1.0.0", true),
            VersionRecord::new("1.1.0", true),
            VersionRecord::new("2.0.0", false),
        ]
    );
}

#[tokio::test]
async fn tilde_range_with_prerelease_in_registry() {
    let mut server = Server::new_async().await;
    let _mock = serve_versions(
        &mut server,
        "test-package",
        &versions_body(&["1.0.0", "1.1.0", "2.0.0", "2.1.0-beta.1"]),
    )
    .await;
    let registry = NpmRegistry::new(&server.url());

    let hidden = resolve_versions(
        &registry,
        "test-package",
        Some("~1.0.0"),
        QueryOptions::default(),
    )
    .await
    .unwrap();
    let shown = resolve_versions(
        &registry,
        "test-package",
        Some("~1.0.0"),
        QueryOptions {
            show_prerelease: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        hidden,
        vec![
            VersionRecord::new("1.0.0", true),
            VersionRecord::new("1.1.0", false),
            VersionRecord::new("2.0.0", false),
        ]
    );
    assert_eq!(
        shown,
        vec![
            VersionRecord::new("1.0.0", true),
            VersionRecord::new("1.1.0", false),
            VersionRecord::new("2.0.0", false),
            VersionRecord::new("2.1.0-beta.1", false),
        ]
    );
}

#[tokio::test]
async fn missing_package_reports_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/nonexistent-package")
        .with_status(404)
        .with_body(r#"{"error": "Not Found"}"#)
        .create_async()
        .await;
    let registry = NpmRegistry::new(&server.url());

    let err = fetch_versions(&registry, "nonexistent-package").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to fetch package versions: Package 'nonexistent-package' not found in npm registry"
    );
}

#[tokio::test]
async fn server_error_reports_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/test-package")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let registry = NpmRegistry::new(&server.url());

    let err = resolve_versions(&registry, "test-package", None, QueryOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to fetch package versions: 500 Internal Server Error"
    );
}

#[tokio::test]
async fn response_without_versions_is_invalid() {
    let mut server = Server::new_async().await;
    let _mock = serve_versions(&mut server, "invalid-package", r#"{"name": "test-package"}"#).await;
    let registry = NpmRegistry::new(&server.url());

    let err = resolve_versions(&registry, "invalid-package", None, QueryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Fetch(_)));
    assert_eq!(
        err.to_string(),
        "Failed to fetch package versions: Invalid npm registry response format"
    );
}

#[tokio::test]
async fn empty_versions_resolve_to_empty_list() {
    let mut server = Server::new_async().await;
    let _mock = serve_versions(&mut server, "empty-package", r#"{"versions": {}}"#).await;
    let registry = NpmRegistry::new(&server.url());

    let result = satisfied_versions(&registry, "empty-package", "^1.0.0", QueryOptions::default())
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn unreachable_registry_reports_transport_failure() {
    // Nothing listens on the discard port
    let registry = NpmRegistry::new("http://127.0.0.1:9");

    let err = fetch_versions(&registry, "test-package").await.unwrap_err();

    assert!(
        err.to_string()
            .starts_with("Failed to fetch package versions: ")
    );
}

#[tokio::test]
async fn invalid_range_never_reaches_the_registry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let registry = NpmRegistry::new(&server.url());

    for range in ["not-a-semver", ">=1.0.0 <=", "^abc"] {
        let err = resolve_versions(&registry, "test-package", Some(range), QueryOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid semver range: {range}"));
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn command_renders_report_for_scoped_package() {
    let mut server = Server::new_async().await;
    let _info = server
        .mock("GET", "/@types%2Fnode/latest")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "name": "@types/node",
                "_id": "@types/node@20.11.5",
                "description": "TypeScript definitions for node",
                "homepage": "https://github.com/DefinitelyTyped/DefinitelyTyped/tree/master/types/node",
                "dist": {
                    "shasum": "be10c622ca7fcaa3cf226cf80166abc31389d86e",
                    "tarball": "https://registry.npmjs.org/@types/node/-/node-20.11.5.tgz",
                    "signatures": [{"keyid": "SHA256:jl3bwswu80PjjokCgh0o2w5c2U4LhQAE57gj9cz1kzA", "sig": "MEQCIA"}]
                }
            }"#,
        )
        .create_async()
        .await;
    let _versions = serve_versions(
        &mut server,
        "@types%2Fnode",
        &versions_body(&["20.11.5", "18.19.8", "20.11.4", "21.0.0-dev.1"]),
    )
    .await;
    let registry = NpmRegistry::new(&server.url());

    let query = Query {
        package: "@types/node".to_string(),
        range: Some("^20.0.0".to_string()),
        all: true,
        show_prerelease: false,
    };
    let local = LocalContext {
        range: None,
        installed_version: Some("20.11.4".to_string()),
    };
    let rendering = Rendering {
        palette: Palette::plain(),
        width: 80,
    };

    let report = command::run(&registry, &query, &local, rendering)
        .await
        .unwrap();

    assert_eq!(
        report,
        "@types/node | https://github.com/DefinitelyTyped/DefinitelyTyped/tree/master/types/node\n\
         Found @types/node locally with installed: ✔ 20.11.4\n  \
         18.19.8  ✔ 20.11.4    20.11.5\n"
    );
}
