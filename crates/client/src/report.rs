//! Batch outcome: resolve a set of queries and decide what the user sees.

use howpopular_core::Error;

use crate::render::{RenderMode, render};
use crate::resolve::{PageSource, Resolver};

/// Shown when any fetch in the batch cannot reach the network.
pub const NETWORK_FAILURE_MESSAGE: &str = "Failed to establish network connection";

/// Shown when the batch produced no results.
pub const NO_RESULTS_MESSAGE: &str = "Sorry, couldn't find any help with that topic";

/// What a batch run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Rendered report lines.
    Rendered(Vec<String>),
    /// Nothing to show.
    NoResults,
    /// The network was unreachable; `guidance` is set for TLS failures.
    NetworkUnavailable { guidance: Option<&'static str> },
}

impl Outcome {
    /// Lines for stdout.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Outcome::Rendered(lines) => lines.clone(),
            Outcome::NoResults => vec![NO_RESULTS_MESSAGE.to_string()],
            Outcome::NetworkUnavailable { .. } => vec![NETWORK_FAILURE_MESSAGE.to_string()],
        }
    }

    /// Remediation for stderr, if any.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Outcome::NetworkUnavailable { guidance } => *guidance,
            _ => None,
        }
    }

    /// Process exit code: TLS failures exit 1, everything else 0.
    pub fn exit_code(&self) -> i32 {
        if self.guidance().is_some() { 1 } else { 0 }
    }
}

/// Resolve `queries` and turn the result into an [`Outcome`].
///
/// Network and TLS failures become [`Outcome::NetworkUnavailable`]; any other
/// error is returned.
pub async fn run<S: PageSource>(resolver: &Resolver<S>, queries: &[String], mode: RenderMode) -> Result<Outcome, Error> {
    match resolver.resolve(queries).await {
        Ok(results) if results.is_empty() => Ok(Outcome::NoResults),
        Ok(results) => Ok(Outcome::Rendered(render(&results, mode))),
        Err(e) if e.is_network_failure() => {
            tracing::debug!("batch aborted: {}", e);
            Ok(Outcome::NetworkUnavailable { guidance: e.remediation() })
        }
        Err(e) => Err(e),
    }
}
