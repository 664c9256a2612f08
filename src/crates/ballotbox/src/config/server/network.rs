//! Voter network restriction
//!
//! When an allowed CIDR range is configured, voter routes reject clients whose
//! address falls outside it. Admin routes are not restricted.

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use ipnet::IpNet;
use std::net::{IpAddr, SocketAddr};
use tracing::warn;

use crate::api::error::ApiError;

/// Network guard middleware state
#[derive(Debug, Clone, Default)]
pub struct NetworkGuard {
    allowed: Option<IpNet>,
}

impl NetworkGuard {
    pub fn new(allowed: Option<IpNet>) -> Self {
        Self { allowed }
    }

    /// Guard that admits every client
    pub fn unrestricted() -> Self {
        Self { allowed: None }
    }

    pub fn allowed(&self) -> Option<&IpNet> {
        self.allowed.as_ref()
    }

    /// Whether a client address may reach voter routes
    pub fn permits(&self, addr: IpAddr) -> bool {
        match &self.allowed {
            None => true,
            Some(net) => net.contains(&addr.to_canonical()),
        }
    }
}

/// Network guard middleware for Axum
pub async fn network_guard_middleware(
    State(guard): State<NetworkGuard>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = client.ip().to_canonical();

    match guard.allowed() {
        Some(net) if !guard.permits(client_ip) => {
            warn!(client = %client_ip, allowed = %net, "Voter request from outside allowed network");
            ApiError::Forbidden(format!(
                "Access denied: client address {} is outside the allowed network {}",
                client_ip, net
            ))
            .into_response()
        }
        _ => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_permits_everyone() {
        let guard = NetworkGuard::unrestricted();
        assert!(guard.permits("8.8.8.8".parse().unwrap()));
        assert!(guard.permits("::1".parse().unwrap()));
    }

    #[test]
    fn test_cidr_membership() {
        let guard = NetworkGuard::new(Some("192.168.1.0/24".parse().unwrap()));
        assert!(guard.permits("192.168.1.42".parse().unwrap()));
        assert!(!guard.permits("192.168.2.1".parse().unwrap()));
    }

    #[test]
    fn test_ipv4_mapped_address_is_canonicalized() {
        let guard = NetworkGuard::new(Some("10.0.0.0/8".parse().unwrap()));
        assert!(guard.permits("::ffff:10.1.2.3".parse().unwrap()));
    }
}
