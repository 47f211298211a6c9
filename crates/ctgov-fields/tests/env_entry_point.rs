//! `fetch_trial_fields` resolves its registry from the environment.
//!
//! Kept in its own test binary so no other test shares the variables.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ctgov_fields::config::{BASE_URL_ENV, TIMEOUT_ENV};
use ctgov_fields::{fetch_trial_fields, ConfigError, TrialError};

const RECORD: &str = include_str!("fixtures/NCT01592370.xml");

#[tokio::test]
async fn test_fetch_trial_fields_uses_environment_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ct2/show/NCT01592370"))
        .and(query_param("displayxml", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RECORD))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var(BASE_URL_ENV, format!("{}/ct2/show", server.uri()));
    std::env::set_var(TIMEOUT_ENV, "5000");

    let bucket = fetch_trial_fields("NCT01592370").await.unwrap();
    assert_eq!(bucket.get("ctName").unwrap(), ["Local Institution"]);
    assert_eq!(bucket.get("ctCity").unwrap(), ["Boston", "New Haven"]);
    assert_eq!(bucket.get("ctCountry").unwrap(), ["United States"]);

    // Blank identifiers never reach the network.
    assert!(matches!(
        fetch_trial_fields("   ").await,
        Err(TrialError::Config(ConfigError::EmptyIdentifier))
    ));

    std::env::set_var(TIMEOUT_ENV, "soon");
    assert!(matches!(
        fetch_trial_fields("NCT01592370").await,
        Err(TrialError::Config(ConfigError::InvalidTimeout(_)))
    ));

    std::env::remove_var(BASE_URL_ENV);
    std::env::remove_var(TIMEOUT_ENV);
}
