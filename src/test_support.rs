//! Shared fixtures for unit tests: a throwaway API server and file slots.

use crate::client::RequestClient;
use crate::intake::{AllowList, FileSlot};
use crate::model::ClientConfig;
use axum::Router;
use std::path::Path;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn_api(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

pub(crate) fn config_for(base: &str) -> ClientConfig {
    ClientConfig {
        api_base: base.to_string(),
        user_agent: "smart-resume-cli/test".into(),
        timeout: Some(std::time::Duration::from_secs(10)),
        accept: crate::intake::DEFAULT_ACCEPT.into(),
    }
}

pub(crate) fn client_for(base: &str) -> RequestClient {
    RequestClient::new(&config_for(base)).expect("build test client")
}

/// Write `contents` to `dir/name` and select it with the default allow-list.
pub(crate) fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> FileSlot {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    FileSlot::try_select(&path, &AllowList::default()).expect("fixture accepted")
}
