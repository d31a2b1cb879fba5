use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("time parse error: {0}")]
    TimeParse(#[from] chrono::ParseError),
    #[error("local time {0} does not exist in {1}")]
    NonexistentLocalTime(chrono::NaiveDateTime, chrono_tz::Tz),
    #[error("invalid mail address: {0}")]
    MailAddress(#[from] lettre::address::AddressError),
    #[error("could not assemble message: {0}")]
    MailMessage(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),
    #[error("invalid server name: {0}")]
    InvalidServerName(String),
    #[error("peer presented no certificates")]
    MissingPeerCertificates,
    #[error("certificate parse error: {0}")]
    CertificateParse(String),
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),
    #[error("PKCS#1 encoding error: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),
    #[error("PKCS#8 encoding error: {0}")]
    Pkcs8(#[from] rsa::pkcs8::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}
