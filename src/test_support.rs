// In-process HTTP stubs for client tests.

use std::net::SocketAddr;

use axum::Router;

/// Serve `app` on an ephemeral localhost port and return its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

/// A localhost address with nothing listening on it.
pub async fn dead_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe local addr");
    drop(listener);
    addr
}

/// Chart-endpoint body with one daily bar per close, starting 2024-01-02.
/// `low` equals `close`; volume is constant.
pub fn chart_body(symbol: &str, closes: &[f64]) -> String {
    let start = 1_704_153_600_i64;
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| start + i * 86_400).collect();
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": {"symbol": symbol},
                "timestamp": timestamps,
                "indicators": {"quote": [{
                    "open": closes,
                    "high": closes,
                    "low": closes,
                    "close": closes,
                    "volume": vec![1_000_000.0; closes.len()],
                }]}
            }],
            "error": null
        }
    })
    .to_string()
}
