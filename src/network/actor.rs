//! Network actor - runs API calls in the Tokio runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;

/// Network actor that executes API commands and reports outcomes
pub struct NetworkActor {
    client: ApiClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: ApiClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { ticket, bearer, call }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            // Each call runs independently; fan-outs arrive as several commands
                            self.active_requests.spawn(async move {
                                tracing::info!(%ticket, call = call.name(), "Executing request");
                                let outcome = client.execute(bearer.as_deref(), call).await;
                                tracing::info!(%ticket, ok = outcome.is_ok(), "Request completed");
                                let _ = response_tx.send(NetworkResponse { ticket, outcome });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AsyncActionState;
    use crate::messages::{ApiCall, ApiOutcome};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::time::Duration;

    #[tokio::test]
    async fn test_reply_carries_ticket() {
        let app = Router::new().route(
            "/api/profile/:id",
            get(|| async { Json(serde_json::json!({"id": "p1", "username": "ann"})) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let actor = NetworkActor::new(ApiClient::new(&base, Duration::from_secs(5)), resp_tx);
        let handle = tokio::spawn(actor.run(cmd_rx));

        let mut state: AsyncActionState<()> = AsyncActionState::new();
        let ticket = state.start().unwrap();
        cmd_tx
            .send(NetworkCommand::Execute {
                ticket,
                bearer: None,
                call: ApiCall::FetchProfile { id: "p1".into() },
            })
            .unwrap();

        let reply = resp_rx.recv().await.unwrap();
        assert_eq!(reply.ticket, ticket);
        match reply.outcome {
            ApiOutcome::Profile(Ok(profile)) => assert_eq!(profile.username, "ann"),
            other => panic!("unexpected outcome: {:?}", other),
        }

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
