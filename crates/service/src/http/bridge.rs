use std::future::Future;
use std::io;

use axum::Router;

async fn serve_on_listener<F>(listener: tokio::net::TcpListener, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Binds `addr` and serves until `shutdown` resolves. `localhost:<port>` is
/// bound on both loopback stacks since it may resolve to either.
pub(crate) async fn run_server<F>(addr: &str, app: Router, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Some(port) = addr.strip_prefix("localhost:") {
        let v4 = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}")).await;
        let v6 = tokio::net::TcpListener::bind(format!("[::1]:{port}")).await;
        return match (v4, v6) {
            (Ok(v4_listener), Ok(v6_listener)) => {
                let (tx, rx) = tokio::sync::watch::channel(false);
                tokio::spawn(async move {
                    shutdown.await;
                    let _ = tx.send(true);
                });
                let v4_task = serve_on_listener(v4_listener, app.clone(), wait_for_flag(rx.clone()));
                let v6_task = serve_on_listener(v6_listener, app, wait_for_flag(rx));
                let (v4_result, v6_result) = tokio::join!(v4_task, v6_task);
                v4_result.and(v6_result)
            }
            (Ok(listener), Err(_)) | (Err(_), Ok(listener)) => {
                serve_on_listener(listener, app, shutdown).await
            }
            (Err(err), Err(_)) => Err(err),
        };
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on_listener(listener, app, shutdown).await
}

async fn wait_for_flag(mut rx: tokio::sync::watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::warn!("ctrl-c handler unavailable: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::warn!("SIGTERM handler unavailable: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("received ctrl-c, shutting down"),
        _ = terminate => log::info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::run_server;
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;

    #[tokio::test]
    async fn server_stops_when_shutdown_resolves() {
        let port = {
            let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            probe.local_addr().expect("addr").port()
        };
        let addr = format!("127.0.0.1:{port}");
        let app = Router::new().route("/ping", get(|| async { "pong" }));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            run_server(&addr, app, async {
                let _ = rx.await;
            })
            .await
        });

        let url = format!("http://127.0.0.1:{port}/ping");
        let mut body = None;
        for _ in 0..50 {
            if let Ok(response) = reqwest::get(&url).await {
                body = response.text().await.ok();
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(body.as_deref(), Some("pong"));

        let _ = tx.send(());
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server exits")
            .expect("join");
        assert!(result.is_ok());
    }
}
