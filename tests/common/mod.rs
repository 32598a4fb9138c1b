//! In-process API server over a throwaway data directory.

#![allow(dead_code)]

use restaurant_records::{transport, ModelRegistry, RecordService};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub data_dir: TempDir,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub async fn start() -> TestServer {
        let data_dir = tempfile::tempdir().expect("temp data dir");
        let service = RecordService::open(data_dir.path(), ModelRegistry::with_defaults())
            .expect("open record service");
        let router = transport::http::create_router(transport::http::AppState::new(service));

        // Bind to an ephemeral port to avoid conflicts between tests.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            data_dir,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("GET")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.get(path).await;
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("JSON body"))
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self.client.post(self.url(path)).json(body).send().await.expect("POST");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("JSON body"))
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self.client.put(self.url(path)).json(body).send().await.expect("PUT");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("JSON body"))
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        let resp = self.client.delete(self.url(path)).send().await.expect("DELETE");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("JSON body"))
    }

    pub fn table_bytes(&self, entity: &str) -> Vec<u8> {
        std::fs::read(self.data_dir.path().join(format!("{}.csv", entity))).expect("table file")
    }
}

pub fn suco() -> Value {
    json!({
        "nome": "Suco",
        "descricao": "Suco de laranja",
        "preco": 8.5,
        "categoria": "Bebida",
        "disponivel": true
    })
}

pub fn cliente(nome: &str, cpf: &str) -> Value {
    json!({
        "nome": nome,
        "email": format!("{}@example.com", nome.to_lowercase()),
        "telefone": "(11) 98765-4321",
        "data_nascimento": "1990-05-17",
        "cpf": cpf
    })
}
