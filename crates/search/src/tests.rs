use std::sync::Arc;

use digital_register_core::{ElasticsearchSettings, PageRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{AddressApiClient, ElasticsearchClient, PropertySearch, SearchError};

fn es_settings(endpoint: String) -> ElasticsearchSettings {
    ElasticsearchSettings {
        endpoint,
        index: "landregistry".to_owned(),
        postcode_doc_type: "property_by_postcode_3".to_owned(),
        address_doc_type: "property_by_address".to_owned(),
    }
}

fn es_client(server: &MockServer) -> ElasticsearchClient {
    ElasticsearchClient::new(es_settings(server.uri()), 50).unwrap()
}

fn es_hits(total: serde_json::Value, titles: &[&str]) -> serde_json::Value {
    let hits: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| json!({"_source": {"title_number": t, "address_string": format!("{t} street"), "uprn": 12}}))
        .collect();
    json!({"hits": {"total": total, "hits": hits}})
}

#[tokio::test]
async fn test_postcode_search_sends_window_and_sort() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/landregistry/property_by_postcode_3/_search"))
        .and(body_partial_json(json!({
            "from": 40,
            "size": 10,
            "query": {"bool": {"filter": [{"term": {"postcode": "PL91AA"}}]}},
            "sort": [
                {"house_number_or_first_number": {"missing": "_last"}},
                {"address_string": {"missing": "_last"}}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_hits(json!(48), &["DN1", "DN2"])))
        .expect(1)
        .mount(&server)
        .await;

    let page = es_client(&server)
        .search_by_postcode("PL91AA", PageRequest { page_number: 2, page_size: 20 })
        .await
        .unwrap();
    assert_eq!(page.total, 48);
    assert_eq!(page.hits.len(), 2);
    assert_eq!(page.hits[0].title_number.as_deref(), Some("DN1"));
    assert_eq!(page.hits[0].uprns, ["12"]);
}

#[tokio::test]
async fn test_address_search_lowercases_and_reads_tracked_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/landregistry/property_by_address/_search"))
        .and(body_partial_json(json!({"query": {"match": {"address_string": "1 high street"}}})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(es_hits(json!({"value": 3, "relation": "eq"}), &["A", "B", "C"])),
        )
        .mount(&server)
        .await;

    let page = es_client(&server)
        .search_by_address("1 High STREET", PageRequest::from_query(None, 20))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.hits.len(), 3);
}

#[tokio::test]
async fn test_page_past_cap_only_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"from": 0, "size": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_hits(json!(200), &[])))
        .expect(1)
        .mount(&server)
        .await;

    let page = es_client(&server)
        .search_by_address("street", PageRequest { page_number: 5, page_size: 20 })
        .await
        .unwrap();
    assert_eq!(page.total, 200);
    assert!(page.hits.is_empty());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = es_client(&server)
        .search_by_postcode("PL91AA", PageRequest::from_query(None, 20))
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Status { code: 503, .. }));
}

#[tokio::test]
async fn test_info_returns_cluster_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200, "name": "es"})))
        .mount(&server)
        .await;

    let info = es_client(&server).info().await.unwrap();
    assert_eq!(info["status"], 200);
}

#[tokio::test]
async fn test_unreachable_cluster_is_connection_error() {
    let client = ElasticsearchClient::new(es_settings("http://127.0.0.1:1".to_owned()), 50).unwrap();
    let err = client.info().await.unwrap_err();
    assert!(err.is_connection());
}

#[tokio::test]
async fn test_address_api_handles_postcode_search() {
    let api = MockServer::start().await;
    let es = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("postcode", "PL91AA"))
        .and(query_param("page_number", "1"))
        .and(query_param("page_size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 21,
            "data": [{"uprn": "100", "postcode": "PL9 1AA", "address_string": "1 street"}]
        })))
        .expect(1)
        .mount(&api)
        .await;

    let client = AddressApiClient::new(&api.uri(), Arc::new(es_client(&es))).unwrap();
    let page = client
        .search_by_postcode("PL91AA", PageRequest { page_number: 1, page_size: 20 })
        .await
        .unwrap();
    assert_eq!(page.total, 21);
    assert_eq!(page.hits[0].uprns, ["100"]);
    assert!(page.hits[0].title_number.is_none());
}

#[tokio::test]
async fn test_address_api_rejects_non_json_body() {
    let api = MockServer::start().await;
    let es = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&api)
        .await;

    let client = AddressApiClient::new(&format!("{}/", api.uri()), Arc::new(es_client(&es))).unwrap();
    let err = client
        .search_by_postcode("PL91AA", PageRequest::from_query(None, 20))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API response body is not JSON");
}

#[tokio::test]
async fn test_address_api_delegates_address_search() {
    let api = MockServer::start().await;
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/landregistry/property_by_address/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(es_hits(json!(1), &["DN9"])))
        .expect(1)
        .mount(&es)
        .await;

    let client = AddressApiClient::new(&api.uri(), Arc::new(es_client(&es))).unwrap();
    let page = client.search_by_address("street", PageRequest::from_query(None, 20)).await.unwrap();
    assert_eq!(page.hits[0].title_number.as_deref(), Some("DN9"));
}
