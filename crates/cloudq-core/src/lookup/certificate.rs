//! Certificate manager lookups.

use super::{Lookups, Scope};
use crate::cloud::{Provider, Service};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// ARN of the first certificate issued for `domain`.
    pub fn acm_arn(&self, domain: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Acm)?;
            client
                .list_certificates()?
                .into_iter()
                .find(|cert| cert.domain_name == domain)
                .map(|cert| cert.certificate_arn)
                .ok_or_else(|| {
                    LookupError::NotFound(format!("Certificate {domain} does not exist"))
                })
        })
    }

    /// ARN of the first certificate tagged `Name=tag_name`.
    pub fn acm_arn_by_tag_name(&self, tag_name: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Acm)?;
            for cert in client.list_certificates()? {
                let tags = client.list_tags_for_certificate(&cert.certificate_arn)?;
                if tags.iter().any(|t| t.key == "Name" && t.value == tag_name) {
                    return Ok(cert.certificate_arn);
                }
            }
            Err(LookupError::NotFound(format!(
                "Certificate {tag_name} does not exist"
            )))
        })
    }
}
