// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Apple configuration profile (`.mobileconfig`) generation and signing.

Apple operating systems can auto configure email and contacts accounts by
installing a *configuration profile*, an XML property list describing the
account and its servers. This crate generates those profiles and can wrap
them in a CMS (RFC 5652 / PKCS#7) `SignedData` structure so devices show
the profile as verified.

Two account flavors are supported:

* [EmailAccount] describes an IMAP + SMTP email account and renders a
  `com.apple.mail.managed` payload.
* [CardDavAccount] describes a CardDAV contacts account and renders a
  `com.apple.carddav.account` payload.

Every input field is optional. Rendering applies conservative defaults
(localhost servers, anonymous credentials, freshly generated payload
UUIDs) so a minimal description still yields an installable profile.

Signing is handled by [ProfileSigner], which is constructed from a PEM
certificate and PKCS#8 private key and embeds the rendered XML as the
encapsulated content of the signature.

# Examples

Render a profile as XML:

```
use apple_mobileconfig::{EmailAccount, ImapServer};

let account = EmailAccount {
    email_address: Some("user@example.com".to_string()),
    imap: ImapServer {
        hostname: Some("imap.example.com".to_string()),
        secure: Some(true),
        ..Default::default()
    },
    ..Default::default()
};

let xml = account.to_xml()?;
assert!(xml.contains("imap.example.com"));
# Ok::<(), apple_mobileconfig::MobileConfigError>(())
```
*/

pub mod error;
pub mod profile;
pub mod signing;

pub use {
    error::MobileConfigError,
    profile::{CardDavAccount, CardDavServer, EmailAccount, ImapServer, SmtpServer},
    signing::{DigestType, ProfileSigner},
};
