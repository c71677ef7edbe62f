#![allow(dead_code)]

use async_trait::async_trait;
use socksgate_application::ports::{NameResolver, RequestContext};
use socksgate_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Mock NameResolver
// ============================================================================

#[derive(Clone, Default)]
pub struct MockNameResolver {
    answers: Arc<RwLock<HashMap<String, IpAddr>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
}

impl MockNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: Vec<(&str, &str)>) -> Self {
        let map = answers
            .into_iter()
            .map(|(host, ip)| (host.to_string(), ip.parse().unwrap()))
            .collect();

        Self {
            answers: Arc::new(RwLock::new(map)),
            ..Default::default()
        }
    }

    /// Make every lookup wait before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameResolver for MockNameResolver {
    async fn resolve(&self, ctx: &RequestContext, hostname: &str) -> Result<IpAddr, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        ctx.run(async {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.answers
                .read()
                .await
                .get(hostname)
                .copied()
                .ok_or_else(|| DomainError::NoAddresses {
                    domain: hostname.to_string(),
                    family: "IPv4".to_string(),
                })
        })
        .await
    }
}
