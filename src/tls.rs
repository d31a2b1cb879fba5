//! TLS certificate chain inspection.
//!
//! Dials an endpoint with rustls, captures the peer's certificate chain, and
//! summarizes each certificate. Roots default to the webpki bundle; a caller
//! can also supply its own PEM roots.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

const DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// The parts of a certificate worth looking at when walking a chain.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CertificateSummary {
    pub serial: String,
    pub subject: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl fmt::Display for CertificateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sub: {}, validity: {} to {}",
            self.serial,
            self.subject,
            self.not_before.format("%Y-%m-%d"),
            self.not_after.format("%Y-%m-%d"),
        )
    }
}

/// Summarizes a DER-encoded certificate.
pub fn summarize_der(der: &[u8]) -> Result<CertificateSummary> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| Error::CertificateParse(e.to_string()))?;

    let to_utc = |seconds: i64| {
        DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::CertificateParse("validity out of range".to_string()))
    };
    Ok(CertificateSummary {
        serial: cert.raw_serial_as_string(),
        subject: cert.subject().to_string(),
        not_before: to_utc(cert.validity().not_before.timestamp())?,
        not_after: to_utc(cert.validity().not_after.timestamp())?,
    })
}

/// PEM-encodes a DER certificate.
pub fn pem_encode_certificate(der: &[u8]) -> String {
    ::pem::encode(&::pem::Pem::new("CERTIFICATE", der.to_vec()))
}

/// Builds a root store from PEM-encoded certificates.
pub fn root_store_from_pem(pem: &[u8]) -> Result<RootCertStore> {
    let mut store = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut io::Cursor::new(pem)) {
        store.add(cert?)?;
    }
    Ok(store)
}

fn webpki_root_store() -> RootCertStore {
    let mut store = RootCertStore::empty();
    store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    store
}

/// Dials `host:port` and returns the peer's DER certificate chain, verified
/// against the webpki root bundle.
pub async fn peer_chain(host: &str, port: u16) -> Result<Vec<Vec<u8>>> {
    peer_chain_with_roots(host, port, webpki_root_store()).await
}

/// Same as [`peer_chain`] but verifying against caller-supplied roots.
pub async fn peer_chain_with_roots(
    host: &str,
    port: u16,
    roots: RootCertStore,
) -> Result<Vec<Vec<u8>>> {
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let server_name = ServerName::try_from(host.to_owned())
        .map_err(|_| Error::InvalidServerName(host.to_owned()))?;
    let tcp = tokio::time::timeout(DIAL_TIMEOUT, TcpStream::connect((host, port)))
        .await
        .map_err(io::Error::from)??;
    let stream = connector.connect(server_name, tcp).await?;
    tracing::debug!(host, port, "TLS handshake complete");

    let (_, session) = stream.get_ref();
    let certs = session
        .peer_certificates()
        .ok_or(Error::MissingPeerCertificates)?;
    Ok(certs.iter().map(|cert| cert.as_ref().to_vec()).collect())
}

/// Dials and summarizes the whole peer chain, leaf first.
pub async fn inspect_chain(host: &str, port: u16) -> Result<Vec<CertificateSummary>> {
    let chain = peer_chain(host, port).await?;
    chain.iter().map(|der| summarize_der(der)).collect()
}

/// Go Daddy Root Certificate Authority - G2, kept as an offline reference
/// certificate for the PEM path.
pub const GODADDY_ROOT_G2: &str = "-----BEGIN CERTIFICATE-----
MIIDxTCCAq2gAwIBAgIBADANBgkqhkiG9w0BAQsFADCBgzELMAkGA1UEBhMCVVMx
EDAOBgNVBAgTB0FyaXpvbmExEzARBgNVBAcTClNjb3R0c2RhbGUxGjAYBgNVBAoT
EUdvRGFkZHkuY29tLCBJbmMuMTEwLwYDVQQDEyhHbyBEYWRkeSBSb290IENlcnRp
ZmljYXRlIEF1dGhvcml0eSAtIEcyMB4XDTA5MDkwMTAwMDAwMFoXDTM3MTIzMTIz
NTk1OVowgYMxCzAJBgNVBAYTAlVTMRAwDgYDVQQIEwdBcml6b25hMRMwEQYDVQQH
EwpTY290dHNkYWxlMRowGAYDVQQKExFHb0RhZGR5LmNvbSwgSW5jLjExMC8GA1UE
AxMoR28gRGFkZHkgUm9vdCBDZXJ0aWZpY2F0ZSBBdXRob3JpdHkgLSBHMjCCASIw
DQYJKoZIhvcNAQEBBQADggEPADCCAQoCggEBAL9xYgjx+lk09xvJGKP3gElY6SKD
E6bFIEMBO4Tx5oVJnyfq9oQbTqC023CYxzIBsQU+B07u9PpPL1kwIuerGVZr4oAH
/PMWdYA5UXvl+TW2dE6pjYIT5LY/qQOD+qK+ihVqf94Lw7YZFAXK6sOoBJQ7Rnwy
DfMAZiLIjWltNowRGLfTshxgtDj6AozO091GB94KPutdfMh8+7ArU6SSYmlRJQVh
GkSBjCypQ5Yj36w6gZoOKcUcqeldHraenjAKOc7xiID7S13MMuyFYkMlNAJWJwGR
tDtwKj9useiciAF9n9T521NtYJ2/LOdYq7hfRvzOxBsDPAnrSTFcaUaz4EcCAwEA
AaNCMEAwDwYDVR0TAQH/BAUwAwEB/zAOBgNVHQ8BAf8EBAMCAQYwHQYDVR0OBBYE
FDqahQcQZyi27/a9BUFuIMGU2g/eMA0GCSqGSIb3DQEBCwUAA4IBAQCZ21151fmX
WWcDYfF+OwYxdS2hII5PZYe096acvNjpL9DbWu7PdIxztDhC2gV7+AJ1uP2lsdeu
9tfeE8tTEH6KRtGX+rcuKxGrkLAngPnon1rpN5+r5N9ss4UXnT3ZJE95kTXWXwTr
gIOrmgIttRD02JDHBHNA7XIloKmf7J6raBKZV8aPEjoJpL1E/QYVN8Gb5DKj7Tjo
2GTzLH4U/ALqn83/B2gX2yKQOC16jdFU8WnjXzPKej17CuPKf1855eJ1usV2GDPO
LPAvTK33sefOT6jEm0pUBsV/fdUID+Ic/n4XuKxe9tQWskMJDE32p2u0mYRlynqI
4uJEvlz36hz1
-----END CERTIFICATE-----
";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn reference_der() -> Vec<u8> {
        ::pem::parse(GODADDY_ROOT_G2).unwrap().into_contents()
    }

    #[test]
    fn summarize_reference_root() {
        let summary = summarize_der(&reference_der()).unwrap();

        assert_eq!(summary.serial, "00");
        assert!(
            summary.subject.contains("Go Daddy Root Certificate Authority - G2"),
            "unexpected subject: {}",
            summary.subject
        );
        assert_eq!(summary.not_before.year(), 2009);
        assert_eq!(summary.not_after.year(), 2037);
    }

    #[test]
    fn summary_renders_validity_window() {
        let summary = summarize_der(&reference_der()).unwrap();
        let line = summary.to_string();
        assert!(line.contains("validity: 2009-09-01 to 2037-12-31"), "got: {line}");
    }

    #[test]
    fn pem_encoding_round_trips() {
        let der = reference_der();
        let encoded = pem_encode_certificate(&der);
        assert!(encoded.starts_with("-----BEGIN CERTIFICATE-----"));

        let back = ::pem::parse(&encoded).unwrap().into_contents();
        assert_eq!(back, der);
    }

    #[test]
    fn root_store_accepts_pem_roots() {
        let store = root_store_from_pem(GODADDY_ROOT_G2.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn garbage_is_not_a_certificate() {
        assert!(summarize_der(b"not a certificate").is_err());
    }

    // Network tests only run when pointed at a live endpoint.

    #[tokio::test]
    async fn live_chain_inspection() {
        let Ok(host) = std::env::var("TLS_PROBE_HOST") else {
            eprintln!("set TLS_PROBE_HOST to run the live TLS test");
            return;
        };
        let summaries = inspect_chain(&host, 443).await.unwrap();
        assert!(!summaries.is_empty());
        for summary in &summaries {
            assert!(summary.not_before < summary.not_after);
        }
    }
}
