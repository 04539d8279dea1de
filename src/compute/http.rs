// ABOUTME: HTTP/1.1 health endpoint probe.
// ABOUTME: One GET per poll; 2xx is healthy, everything else is not.

use bytes::Bytes;
use http_body_util::Empty;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::net::TcpStream;

use super::ComputeError;

/// Budget for one probe attempt (connect + request + response headers).
/// The rollout's polling loop owns the overall health timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// GET the health endpoint once.
///
/// Returns `Ok(true)` on a 2xx response, `Ok(false)` on any other status,
/// connection failure, or per-attempt timeout. Only a malformed endpoint
/// URL is an error: that is a configuration defect, not an observation.
pub async fn probe_health(endpoint: &str) -> Result<bool, ComputeError> {
    let (authority, host, port, path) = parse_endpoint(endpoint)?;

    let attempt = async {
        let stream = TcpStream::connect((host.as_str(), port)).await.ok()?;
        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await.ok()?;

        // Drive the connection until the request below completes.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let request = Request::builder()
            .uri(path)
            .header(hyper::header::HOST, authority)
            .body(Empty::<Bytes>::new())
            .ok()?;

        let response = sender.send_request(request).await.ok()?;
        Some(response.status().is_success())
    };

    match tokio::time::timeout(PROBE_TIMEOUT, attempt).await {
        Ok(Some(healthy)) => Ok(healthy),
        Ok(None) | Err(_) => Ok(false),
    }
}

/// Split `http://host[:port]/path` into (authority, host, port, path).
fn parse_endpoint(endpoint: &str) -> Result<(String, String, u16, String), ComputeError> {
    let invalid = |reason: &str| ComputeError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };

    let rest = endpoint
        .strip_prefix("http://")
        .ok_or_else(|| invalid("only http:// endpoints are supported"))?;

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };

    if authority.is_empty() {
        return Err(invalid("missing host"));
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse::<u16>()
                .map_err(|_| invalid("invalid port"))?;
            (host, port)
        }
        None => (authority, 80),
    };

    if host.is_empty() {
        return Err(invalid("missing host"));
    }

    Ok((
        authority.to_string(),
        host.to_string(),
        port,
        path.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_endpoint_with_port_and_path() {
        let (authority, host, port, path) =
            parse_endpoint("http://10.0.0.4:8000/health").unwrap();
        assert_eq!(authority, "10.0.0.4:8000");
        assert_eq!(host, "10.0.0.4");
        assert_eq!(port, 8000);
        assert_eq!(path, "/health");
    }

    #[test]
    fn defaults_port_and_path() {
        let (_, host, port, path) = parse_endpoint("http://app.internal").unwrap();
        assert_eq!(host, "app.internal");
        assert_eq!(port, 80);
        assert_eq!(path, "/");
    }

    #[test]
    fn rejects_https() {
        assert!(parse_endpoint("https://app.internal/health").is_err());
    }

    #[test]
    fn rejects_missing_host() {
        assert!(parse_endpoint("http:///health").is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unhealthy_not_an_error() {
        // Port 9 (discard) is almost never listening on loopback.
        let healthy = probe_health("http://127.0.0.1:9/health").await.unwrap();
        assert!(!healthy);
    }
}
