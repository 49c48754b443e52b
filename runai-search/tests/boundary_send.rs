//! The boundary futures must be `Send` so hosts can box them or hand them
//! to `tokio::spawn`.

use runai_search::{ShoppingConfig, SourceFilter, SourcePreset, WebSearchConfig};
use std::future::Future;

fn assert_send<F: Future + Send>(fut: F) -> F {
    fut
}

#[tokio::test]
async fn test_search_future_is_send() {
    let queries = vec!["Bondi 9".to_owned()];
    let config = WebSearchConfig::default();
    let filter = Some(SourceFilter::Preset(SourcePreset::HighPriority));
    let text = assert_send(runai_search::search(&queries, filter, Some(3), &config)).await;
    assert_eq!(text, "Error: TAVILY_API_KEY not configured");
}

#[tokio::test]
async fn test_shopping_search_future_is_send() {
    let queries = vec!["Bondi 9".to_owned()];
    let config = ShoppingConfig::default();
    let text =
        assert_send(runai_search::shopping_search(&queries, Some(80), None, &config)).await;
    assert_eq!(text, "Error: SERPAPI_KEY not configured");
}

#[tokio::test]
async fn test_boundary_calls_run_on_spawned_tasks() {
    let web = tokio::spawn(async {
        let queries = vec!["Nimbus 27".to_owned()];
        runai_search::search(&queries, None, None, &WebSearchConfig::default()).await
    });
    let shopping = tokio::spawn(async {
        let queries = vec!["Nimbus 27".to_owned()];
        runai_search::shopping_search(&queries, None, None, &ShoppingConfig::default()).await
    });

    assert_eq!(web.await.expect("join"), "Error: TAVILY_API_KEY not configured");
    assert_eq!(shopping.await.expect("join"), "Error: SERPAPI_KEY not configured");
}
