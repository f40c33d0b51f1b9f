// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {thiserror::Error, x509_certificate::X509CertificateError};

/// Unified error type for profile generation and signing.
#[derive(Debug, Error)]
pub enum MobileConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("plist serialization error: {0}")]
    Plist(#[from] plist::Error),

    #[error("PEM decode error: {0}")]
    PemDecode(#[from] pem::PemError),

    #[error("X.509 certificate error: {0}")]
    X509(#[from] X509CertificateError),

    #[error("error creating cryptographic signature: {0}")]
    SignatureCreation(#[from] signature::Error),

    #[error("private key does not match the signing certificate")]
    KeyCertificateMismatch,

    #[error("unsupported digest algorithm: {0}")]
    UnsupportedDigestAlgorithm(String),
}
