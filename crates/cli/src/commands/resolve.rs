use crate::di::Services;
use futures::future::join_all;
use socksgate_application::ports::{NameResolver, RequestContext};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Resolve every hostname concurrently; returns whether all resolved.
pub async fn run(services: &Services, shutdown: &CancellationToken, hostnames: &[String]) -> bool {
    let lookups = hostnames.iter().map(|hostname| async move {
        let ctx = RequestContext::with_cancellation(shutdown.child_token());
        (hostname, services.resolver.resolve(&ctx, hostname.trim()).await)
    });

    let mut all_resolved = true;
    for (hostname, result) in join_all(lookups).await {
        match result {
            Ok(ip) => println!("{hostname}\t{ip}"),
            Err(e) => {
                all_resolved = false;
                warn!(domain = %hostname, error = %e, "Resolution failed");
                println!("{hostname}\terror\t{e}");
            }
        }
    }

    all_resolved
}
