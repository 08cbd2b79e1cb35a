//! Cache-first serving with network fallback.

mod common;

use common::*;
use taxi_cache_worker::*;

fn running_worker() -> AssetCacheWorker<ScriptedNetwork> {
    let mut worker = AssetCacheWorker::new(WorkerConfig::default(), ScriptedNetwork::serving_site());
    worker.start().unwrap();
    worker
}

#[test]
fn precached_asset_served_without_network() {
    let mut worker = running_worker();
    worker.network_mut().serve_body("/about", "v2 /about");
    let before = worker.network().fetch_count("/about");

    let response = worker.handle_fetch(&Request::new("/about")).unwrap();
    assert_eq!(body(&response), "v1 /about");
    assert_eq!(worker.network().fetch_count("/about"), before);
}

#[test]
fn cached_asset_survives_network_loss() {
    let mut worker = running_worker();
    worker.network_mut().drop_connection("/pricing");
    let response = worker.handle_fetch(&Request::new("/pricing")).unwrap();
    assert_eq!(response.status, 200);
}

#[test]
fn miss_fetched_and_stored() {
    let mut worker = running_worker();
    worker.network_mut().serve_body("/static/img/route-map.png", "png");

    let first = worker.handle_fetch(&Request::new("/static/img/route-map.png")).unwrap();
    assert_eq!(body(&first), "png");
    let second = worker.handle_fetch(&Request::new("/static/img/route-map.png")).unwrap();
    assert_eq!(first, second);
    assert_eq!(worker.network().fetch_count("/static/img/route-map.png"), 1);
}

#[test]
fn error_responses_not_stored() {
    let mut worker = running_worker();
    let response = worker.handle_fetch(&Request::new("/missing")).unwrap();
    assert_eq!(response.status, 404);

    worker.handle_fetch(&Request::new("/missing")).unwrap();
    assert_eq!(worker.network().fetch_count("/missing"), 2);
}

#[test]
fn cross_origin_responses_not_stored() {
    let mut worker = running_worker();
    worker.network_mut().serve_cross_origin("https://mc.yandex.ru/metrika/tag.js");

    let url = "https://mc.yandex.ru/metrika/tag.js";
    let response = worker.handle_fetch(&Request::new(url)).unwrap();
    assert_eq!(response.response_type, ResponseType::Cors);
    worker.handle_fetch(&Request::new(url)).unwrap();
    assert_eq!(worker.network().fetch_count(url), 2);
}

#[test]
fn non_get_goes_to_network() {
    let mut worker = running_worker();
    worker.network_mut().serve(
        "/submit-request",
        Response::basic("/submit-request", 200, r#"{"success":true}"#),
    );

    let post = Request::new("/submit-request").with_method(RequestMethod::Post);
    worker.handle_fetch(&post).unwrap();
    worker.handle_fetch(&post).unwrap();
    assert_eq!(worker.network().fetch_count("/submit-request"), 2);
    assert!(worker.storage().match_request(&Request::new("/submit-request")).is_none());
}

#[test]
fn miss_with_network_down_is_an_error() {
    let mut worker = running_worker();
    worker.network_mut().drop_connection("/news");
    assert!(matches!(
        worker.handle_fetch(&Request::new("/news")),
        Err(WorkerError::Network(_))
    ));
}

#[test]
fn opaque_responses_not_stored() {
    let mut worker = running_worker();
    let url = "https://fonts.example.net/roboto.woff2";
    worker
        .network_mut()
        .serve(url, Response::new(200).with_type(ResponseType::Opaque));

    worker.handle_fetch(&Request::new(url)).unwrap();
    worker.handle_fetch(&Request::new(url)).unwrap();
    assert_eq!(worker.network().fetch_count(url), 2);
}

#[test]
fn precache_accounts_for_every_body() {
    let worker = running_worker();
    let expected: usize = config::DEFAULT_MANIFEST
        .iter()
        .map(|url| format!("v1 {url}").len())
        .sum();
    assert_eq!(worker.storage().usage(), expected);
}
