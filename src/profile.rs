// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration profile generation.
//!
//! This module defines account descriptions for IMAP email and CardDAV
//! contacts and renders them as `.mobileconfig` property lists. Every input
//! field is optional; anything left unset is filled in with the defaults
//! Apple's own profile tooling tends to produce (localhost servers,
//! anonymous credentials, fresh payload UUIDs).

use {
    crate::{error::MobileConfigError, signing::ProfileSigner},
    plist::{Dictionary, Value},
    std::io::Write,
    uuid::Uuid,
};

/// Address used when no email address is provided.
const DEFAULT_EMAIL_ADDRESS: &str = "admin@localhost";

/// Reverse-domain payload identifier used when none is provided.
const DEFAULT_IDENTIFIER: &str = "com.kreata.anonymous";

/// Incoming (IMAP) server settings for an email profile.
#[derive(Clone, Debug, Default)]
pub struct ImapServer {
    pub hostname: Option<String>,
    /// Server port. Defaults to 993 when `secure` is set, otherwise 143.
    pub port: Option<u16>,
    /// Whether to use SSL. Defaults to true when the port is 993.
    pub secure: Option<bool>,
    /// Login username. Falls back to the account email address.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Outgoing (SMTP) server settings for an email profile.
#[derive(Clone, Debug, Default)]
pub struct SmtpServer {
    pub hostname: Option<String>,
    /// Server port. Defaults to 465 when `secure` is set, otherwise 587.
    pub port: Option<u16>,
    /// Whether to use SSL. Defaults to true when the port is 465.
    pub secure: Option<bool>,
    /// Login username. Falls back to the resolved IMAP username.
    pub username: Option<String>,
    /// Outgoing password. When unset the profile instructs the device to
    /// reuse the incoming password instead of embedding a second secret.
    pub password: Option<String>,
}

/// CardDAV server settings for a contacts profile.
#[derive(Clone, Debug, Default)]
pub struct CardDavServer {
    pub hostname: Option<String>,
    /// Server port. Defaults to 443 when `secure` is set, otherwise 80.
    pub port: Option<u16>,
    /// Whether to use SSL. Defaults to true when the port is 443.
    pub secure: Option<bool>,
    /// Principal URL advertised to the device. Defaults to empty.
    pub principal_url: Option<String>,
    /// Login username. Falls back to the account email address.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Description of an IMAP email account to render as a configuration profile.
///
/// All fields are optional. `to_plist()` applies the defaulting rules and
/// produces the plist value; the other methods layer XML serialization and
/// CMS signing on top of it.
#[derive(Clone, Debug, Default)]
pub struct EmailAccount {
    /// Address configured on the device. Also the username fallback.
    pub email_address: Option<String>,
    /// Organization name shown in the profile installer.
    pub organization: Option<String>,
    /// Reverse-domain identifier for the profile and its payload.
    pub identifier: Option<String>,
    /// Profile title shown in the installer.
    pub display_name: Option<String>,
    /// Longer profile description shown in the installer.
    pub display_description: Option<String>,
    /// Name of the mail account as it appears in Mail settings.
    pub account_name: Option<String>,
    /// Description of the mail account payload.
    pub account_description: Option<String>,
    pub imap: ImapServer,
    pub smtp: SmtpServer,
    /// UUID for the account payload. Generated when unset.
    pub content_uuid: Option<String>,
    /// UUID for the enclosing profile. Generated when unset.
    pub plist_uuid: Option<String>,
}

/// Description of a CardDAV contacts account to render as a configuration
/// profile.
#[derive(Clone, Debug, Default)]
pub struct CardDavAccount {
    /// Username fallback for the DAV account.
    pub email_address: Option<String>,
    pub organization: Option<String>,
    pub identifier: Option<String>,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub account_name: Option<String>,
    pub account_description: Option<String>,
    pub dav: CardDavServer,
    /// UUID for the account payload. Generated when unset.
    pub content_uuid: Option<String>,
    /// UUID for the enclosing profile. Generated when unset.
    pub plist_uuid: Option<String>,
}

fn resolved_uuid(explicit: &Option<String>) -> String {
    explicit
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Wrap a payload dictionary in the outer `Configuration` dictionary.
fn configuration_plist(
    payload: Dictionary,
    display_description: &Option<String>,
    display_name: &str,
    identifier: &str,
    organization: &Option<String>,
    plist_uuid: &Option<String>,
) -> Value {
    let mut root = Dictionary::new();

    root.insert(
        "PayloadContent".into(),
        Value::Array(vec![Value::Dictionary(payload)]),
    );
    if let Some(value) = display_description {
        root.insert("PayloadDescription".into(), Value::from(value.as_str()));
    }
    root.insert("PayloadDisplayName".into(), Value::from(display_name));
    root.insert("PayloadIdentifier".into(), Value::from(identifier));
    if let Some(value) = organization {
        root.insert("PayloadOrganization".into(), Value::from(value.as_str()));
    }
    root.insert("PayloadRemovalDisallowed".into(), Value::from(false));
    root.insert("PayloadType".into(), Value::from("Configuration"));
    root.insert("PayloadUUID".into(), Value::from(resolved_uuid(plist_uuid)));
    root.insert("PayloadVersion".into(), Value::from(1i64));

    Value::Dictionary(root)
}

/// Serialize a plist value to XML, matching Apple's formatting conventions.
fn plist_to_xml(value: &Value) -> Result<String, MobileConfigError> {
    // Ideally we'd write direct to the output. However, Apple's XML writer
    // doesn't emit a space for empty elements. e.g. we do `<true />` and
    // Apple does `<true/>`. Normalize to Apple's format so generated
    // profiles diff cleanly against device-exported ones.
    let mut data = Vec::<u8>::new();
    value.to_writer_xml(&mut data)?;

    let data = String::from_utf8(data).expect("XML should be valid UTF-8");
    let data = data
        .replace("<dict />", "<dict/>")
        .replace("<true />", "<true/>")
        .replace("<false />", "<false/>");

    Ok(data)
}

impl EmailAccount {
    /// Render this account as a plist value, applying all defaulting rules.
    ///
    /// Unset payload UUIDs are resolved to fresh random values on every
    /// call.
    pub fn to_plist(&self) -> Value {
        let email_address = self
            .email_address
            .clone()
            .unwrap_or_else(|| DEFAULT_EMAIL_ADDRESS.to_string());
        let identifier = self
            .identifier
            .clone()
            .unwrap_or_else(|| DEFAULT_IDENTIFIER.to_string());
        let display_name = self
            .display_name
            .clone()
            .unwrap_or_else(|| "Mail Account".to_string());
        let account_name = self
            .account_name
            .clone()
            .unwrap_or_else(|| "IMAP Account".to_string());

        let imap_hostname = self
            .imap
            .hostname
            .clone()
            .unwrap_or_else(|| "localhost".to_string());
        let imap_port = self
            .imap
            .port
            .unwrap_or(if self.imap.secure == Some(true) { 993 } else { 143 });
        let imap_secure = self.imap.secure.unwrap_or(imap_port == 993);
        // Username fallback uses the raw email address, not the defaulted
        // one, so an absent address yields `anonymous` rather than
        // `admin@localhost`.
        let imap_username = self
            .imap
            .username
            .clone()
            .or_else(|| self.email_address.clone())
            .unwrap_or_else(|| "anonymous".to_string());
        let imap_password = self.imap.password.clone().unwrap_or_default();

        let smtp_hostname = self
            .smtp
            .hostname
            .clone()
            .unwrap_or_else(|| "localhost".to_string());
        let smtp_port = self
            .smtp
            .port
            .unwrap_or(if self.smtp.secure == Some(true) { 465 } else { 587 });
        let smtp_secure = self.smtp.secure.unwrap_or(smtp_port == 465);
        let smtp_username = self
            .smtp
            .username
            .clone()
            .unwrap_or_else(|| imap_username.clone());

        let mut payload = Dictionary::new();

        if let Some(value) = &self.account_description {
            payload.insert(
                "EmailAccountDescription".into(),
                Value::from(value.as_str()),
            );
        }
        payload.insert("EmailAccountType".into(), Value::from("EmailTypeIMAP"));
        payload.insert("EmailAddress".into(), Value::from(email_address));
        payload.insert(
            "IncomingMailServerAuthentication".into(),
            Value::from("EmailAuthPassword"),
        );
        payload.insert(
            "IncomingMailServerHostName".into(),
            Value::from(imap_hostname),
        );
        payload.insert(
            "IncomingMailServerPortNumber".into(),
            Value::from(imap_port as i64),
        );
        payload.insert("IncomingMailServerUseSSL".into(), Value::from(imap_secure));
        payload.insert(
            "IncomingMailServerUsername".into(),
            Value::from(imap_username),
        );
        payload.insert("IncomingPassword".into(), Value::from(imap_password));
        payload.insert(
            "OutgoingMailServerAuthentication".into(),
            Value::from("EmailAuthPassword"),
        );
        payload.insert(
            "OutgoingMailServerHostName".into(),
            Value::from(smtp_hostname),
        );
        payload.insert(
            "OutgoingMailServerPortNumber".into(),
            Value::from(smtp_port as i64),
        );
        payload.insert("OutgoingMailServerUseSSL".into(), Value::from(smtp_secure));
        payload.insert(
            "OutgoingMailServerUsername".into(),
            Value::from(smtp_username),
        );
        match &self.smtp.password {
            Some(password) => {
                payload.insert("OutgoingPassword".into(), Value::from(password.as_str()));
            }
            None => {
                payload.insert(
                    "OutgoingPasswordSameAsIncomingPassword".into(),
                    Value::from(true),
                );
            }
        }
        payload.insert(
            "PayloadDescription".into(),
            Value::from("Configures email account."),
        );
        payload.insert("PayloadDisplayName".into(), Value::from(account_name));
        payload.insert("PayloadIdentifier".into(), Value::from(identifier.as_str()));
        if let Some(value) = &self.organization {
            payload.insert("PayloadOrganization".into(), Value::from(value.as_str()));
        }
        payload.insert(
            "PayloadType".into(),
            Value::from("com.apple.mail.managed"),
        );
        payload.insert(
            "PayloadUUID".into(),
            Value::from(resolved_uuid(&self.content_uuid)),
        );
        payload.insert("PayloadVersion".into(), Value::from(1i64));
        payload.insert("PreventAppSheet".into(), Value::from(false));
        payload.insert("PreventMove".into(), Value::from(false));
        payload.insert("SMIMEEnabled".into(), Value::from(false));

        configuration_plist(
            payload,
            &self.display_description,
            &display_name,
            &identifier,
            &self.organization,
            &self.plist_uuid,
        )
    }

    /// Render this account as `.mobileconfig` XML.
    pub fn to_xml(&self) -> Result<String, MobileConfigError> {
        plist_to_xml(&self.to_plist())
    }

    /// Render this account as `.mobileconfig` XML to a writer.
    pub fn to_writer_xml(&self, mut writer: impl Write) -> Result<(), MobileConfigError> {
        writer.write_all(self.to_xml()?.as_bytes())?;
        writer.write_all(b"\n")?;

        Ok(())
    }

    /// Render this account and wrap the XML in a DER-encoded CMS signature.
    pub fn to_signed_der(&self, signer: &ProfileSigner) -> Result<Vec<u8>, MobileConfigError> {
        let xml = self.to_xml()?;

        signer.sign(xml.as_bytes())
    }
}

impl CardDavAccount {
    /// Render this account as a plist value, applying all defaulting rules.
    pub fn to_plist(&self) -> Value {
        let identifier = self
            .identifier
            .clone()
            .unwrap_or_else(|| DEFAULT_IDENTIFIER.to_string());
        let display_name = self
            .display_name
            .clone()
            .unwrap_or_else(|| "Mail Account".to_string());

        let dav_hostname = self
            .dav
            .hostname
            .clone()
            .unwrap_or_else(|| "localhost".to_string());
        let dav_port = self
            .dav
            .port
            .unwrap_or(if self.dav.secure == Some(true) { 443 } else { 80 });
        let dav_secure = self.dav.secure.unwrap_or(dav_port == 443);
        let dav_username = self
            .dav
            .username
            .clone()
            .or_else(|| self.email_address.clone())
            .unwrap_or_else(|| "anonymous".to_string());
        let dav_password = self.dav.password.clone().unwrap_or_default();
        let principal_url = self.dav.principal_url.clone().unwrap_or_default();

        let mut payload = Dictionary::new();

        if let Some(value) = &self.account_description {
            payload.insert(
                "CardDAVAccountDescription".into(),
                Value::from(value.as_str()),
            );
        }
        payload.insert("CardDAVHostName".into(), Value::from(dav_hostname));
        payload.insert("CardDAVPassword".into(), Value::from(dav_password));
        payload.insert("CardDAVPort".into(), Value::from(dav_port as i64));
        payload.insert("CardDAVPrincipalURL".into(), Value::from(principal_url));
        payload.insert("CardDAVUseSSL".into(), Value::from(dav_secure));
        payload.insert(
            "CardDAVUsername".into(),
            Value::from(dav_username.as_str()),
        );
        payload.insert(
            "PayloadDescription".into(),
            Value::from(format!("{} contacts", dav_username)),
        );
        payload.insert(
            "PayloadDisplayName".into(),
            Value::from(format!("{} contacts", dav_username)),
        );
        payload.insert("PayloadIdentifier".into(), Value::from(identifier.as_str()));
        if let Some(value) = &self.organization {
            payload.insert("PayloadOrganization".into(), Value::from(value.as_str()));
        }
        payload.insert(
            "PayloadType".into(),
            Value::from("com.apple.carddav.account"),
        );
        payload.insert(
            "PayloadUUID".into(),
            Value::from(resolved_uuid(&self.content_uuid)),
        );
        payload.insert("PayloadVersion".into(), Value::from(1i64));

        configuration_plist(
            payload,
            &self.display_description,
            &display_name,
            &identifier,
            &self.organization,
            &self.plist_uuid,
        )
    }

    /// Render this account as `.mobileconfig` XML.
    pub fn to_xml(&self) -> Result<String, MobileConfigError> {
        plist_to_xml(&self.to_plist())
    }

    /// Render this account as `.mobileconfig` XML to a writer.
    pub fn to_writer_xml(&self, mut writer: impl Write) -> Result<(), MobileConfigError> {
        writer.write_all(self.to_xml()?.as_bytes())?;
        writer.write_all(b"\n")?;

        Ok(())
    }

    /// Render this account and wrap the XML in a DER-encoded CMS signature.
    pub fn to_signed_der(&self, signer: &ProfileSigner) -> Result<Vec<u8>, MobileConfigError> {
        let xml = self.to_xml()?;

        signer.sign(xml.as_bytes())
    }
}
