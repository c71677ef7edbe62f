use crate::di::Services;
use futures::future::join_all;
use socksgate_application::ports::RequestContext;
use socksgate_application::use_cases::Admission;
use socksgate_domain::{Command, ConnectionRequest, Destination, DomainError};
use tokio_util::sync::CancellationToken;

/// Admit every destination concurrently; returns whether all were allowed.
pub async fn run(
    services: &Services,
    shutdown: &CancellationToken,
    command: Command,
    destinations: &[String],
) -> bool {
    let checks = destinations.iter().map(|destination| async move {
        let ctx = RequestContext::with_cancellation(shutdown.child_token());
        let request = ConnectionRequest::new(command, Destination::parse(destination.trim()));
        (destination, services.admit.execute(&ctx, request).await)
    });

    let mut all_allowed = true;
    for (destination, outcome) in join_all(checks).await {
        all_allowed &= matches!(outcome, Ok(Admission::Allowed(_)));
        println!("{}", render(destination, &outcome));
    }

    all_allowed
}

fn render(destination: &str, outcome: &Result<Admission, DomainError>) -> String {
    match outcome {
        Ok(Admission::Unreachable { reason, .. }) => {
            format!("{destination}\tunreachable\t{reason}")
        }
        Ok(admission) => match admission.request().ip() {
            Some(ip) => format!("{destination}\t{admission}\t{ip}"),
            None => format!("{destination}\t{admission}"),
        },
        Err(DomainError::Cancelled) => format!("{destination}\tcancelled"),
        Err(e) => format!("{destination}\terror\t{e}"),
    }
}
