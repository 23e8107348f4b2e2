use reqwest::blocking::Client;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn blocking_client() -> Client {
    Client::builder().build().unwrap()
}

#[tokio::test]
async fn search_returns_concept_with_broader_on_success() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "wbsearchentities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "search": [{"id": "Q10998", "label": "potato"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "wbgetentities"))
        .and(query_param("ids", "Q10998"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entities": {
                "Q10998": {
                    "claims": {
                        "P279": [
                            {"mainsnak": {"snaktype": "value", "datavalue": {"value": {"id": "Q11004"}}}}
                        ]
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "wbgetentities"))
        .and(query_param("ids", "Q11004"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entities": {
                "Q11004": {
                    "labels": {"en": {"value": "root vegetable"}}
                }
            }
        })))
        .mount(&server)
        .await;

    // `reqwest::blocking` panics if built/used on a thread already driving a
    // Tokio runtime, so both the client and the call run on a blocking pool
    // thread, the same way `serve.rs`'s handlers offload resolver calls.
    let (record, transient) = tokio::task::spawn_blocking(move || {
        let client = blocking_client();
        txr_adapters::wikidata::search(&client, &base_url, "potato", "en")
    })
    .await
    .unwrap();
    assert!(!transient);
    let record = record.expect("expected a concept record");
    assert_eq!(record.uri, "http://www.wikidata.org/entity/Q10998");
    assert_eq!(record.broader.len(), 1);
    assert_eq!(record.broader[0].label, "root vegetable");
}

#[tokio::test]
async fn search_with_no_results_is_authoritative_absence() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "wbsearchentities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"search": []})))
        .mount(&server)
        .await;

    let (record, transient) = tokio::task::spawn_blocking(move || {
        let client = blocking_client();
        txr_adapters::wikidata::search(&client, &base_url, "xyzzy", "en")
    })
    .await
    .unwrap();
    assert!(record.is_none());
    assert!(!transient);
}

#[tokio::test]
async fn search_with_server_error_is_transient() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "wbsearchentities"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (record, transient) = tokio::task::spawn_blocking(move || {
        let client = blocking_client();
        txr_adapters::wikidata::search(&client, &base_url, "potato", "en")
    })
    .await
    .unwrap();
    assert!(record.is_none());
    assert!(transient);
}

#[tokio::test]
async fn labels_filters_to_requested_languages() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/w/rest.php/wikibase/v0/entities/items/Q10998/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "en": "potato",
            "fr": "pomme de terre",
            "de": "Kartoffel",
        })))
        .mount(&server)
        .await;

    let languages = vec!["en".to_string(), "fr".to_string()];
    let labels = tokio::task::spawn_blocking(move || {
        let client = blocking_client();
        txr_adapters::wikidata::labels(
            &client,
            &base_url,
            "http://www.wikidata.org/entity/Q10998",
            &languages,
        )
    })
    .await
    .unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels.get("en").unwrap(), "potato");
    assert_eq!(labels.get("fr").unwrap(), "pomme de terre");
    assert!(!labels.contains_key("de"));
}
