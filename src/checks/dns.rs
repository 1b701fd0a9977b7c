//! Host name resolution
//!
//! Resolves target hosts with the system resolver configuration through
//! hickory-resolver.

use crate::utils::ProbeError;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::Resolver;
use std::net::IpAddr;
use tracing::debug;

/// Type alias for the Tokio async resolver
type TokioResolver = Resolver<TokioConnectionProvider>;

fn system_resolver(host: &str) -> Result<TokioResolver, ProbeError> {
    TokioResolver::builder_tokio()
        .map(|builder| builder.build())
        .map_err(|e| ProbeError::Dns {
            host: host.to_string(),
            message: format!("failed to create system resolver: {}", e),
        })
}

/// Resolve a host to its addresses, in the order the resolver returned them.
///
/// IP literals are returned as-is without a query.
pub async fn resolve_host(host: &str) -> Result<Vec<IpAddr>, ProbeError> {
    if let Ok(ip) = host.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    let resolver = system_resolver(host)?;
    let lookup = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| ProbeError::Dns {
            host: host.to_string(),
            message: e.to_string(),
        })?;

    let addresses: Vec<IpAddr> = lookup.iter().collect();
    debug!("resolved {} to {:?}", host, addresses);

    if addresses.is_empty() {
        return Err(ProbeError::Dns {
            host: host.to_string(),
            message: "no such host".to_string(),
        });
    }
    Ok(addresses)
}

/// IPv4 addresses of a host as strings, empty when resolution fails
pub async fn ipv4_addresses(host: &str) -> Vec<String> {
    match resolve_host(host).await {
        Ok(addresses) => addresses
            .into_iter()
            .filter(IpAddr::is_ipv4)
            .map(|ip| ip.to_string())
            .collect(),
        Err(e) => {
            debug!("ipv4 lookup for {} failed: {}", host, e);
            Vec::new()
        }
    }
}
