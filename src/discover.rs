use anyhow::{Context, Result};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::Api;

use crate::config::Environment;

/// Ingress resource fronting the platform; its load-balancer hostname is
/// the preferred base URL when none is given explicitly.
const FRONTEND_INGRESS: &str = "frontend";

/// Localhost URL used when no ingress hostname can be discovered.
pub fn fallback_url(env: Environment) -> String {
    format!("http://localhost:{}", env.fallback_port())
}

/// Resolve the base URL from the cluster, falling back to the
/// environment-derived localhost URL on any failure. Never errors: the
/// check runner only ever sees a resolved base URL string.
pub async fn discover_base_url(env: Environment, verbose: bool) -> String {
    match ingress_hostname().await {
        Ok(hostname) => format!("http://{hostname}"),
        Err(e) => {
            if verbose {
                eprintln!("Ingress discovery failed: {e:#}");
            }
            fallback_url(env)
        }
    }
}

/// Fetch the frontend ingress and read its load-balancer hostname.
async fn ingress_hostname() -> Result<String> {
    let client = kube::Client::try_default()
        .await
        .context("Failed to connect to cluster")?;
    let ingresses: Api<Ingress> = Api::default_namespaced(client);
    let ingress = ingresses
        .get(FRONTEND_INGRESS)
        .await
        .with_context(|| format!("Failed to fetch ingress '{FRONTEND_INGRESS}'"))?;

    ingress
        .status
        .and_then(|status| status.load_balancer)
        .and_then(|lb| lb.ingress)
        .and_then(|entries| entries.into_iter().next())
        .and_then(|entry| entry.hostname)
        .filter(|hostname| !hostname.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Ingress has no load-balancer hostname"))
}
