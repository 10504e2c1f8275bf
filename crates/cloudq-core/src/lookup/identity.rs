//! Account and IAM lookups.

use super::{Lookups, Scope};
use crate::cloud::{Provider, Service};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

/// Account id embedded in an ARN (`arn:partition:service:region:account:resource`).
fn arn_account(arn: &str) -> Option<&str> {
    arn.split(':').nth(4).filter(|id| !id.is_empty())
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// Account id taken from the ARN of the first IAM user.
    pub fn account_id(&self, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Iam)?;
            let users = client.list_users()?;
            users
                .first()
                .and_then(|u| arn_account(&u.arn))
                .map(str::to_string)
                .ok_or_else(|| LookupError::NotFound("Failed to retrieve account id".into()))
        })
    }

    /// ARN of the IAM instance profile `name`.
    pub fn instance_profile(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Iam)?;
            Ok(client.get_instance_profile(name)?.arn)
        })
    }

    /// ARN of the IAM server certificate `name`.
    pub fn server_certificate(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Iam)?;
            Ok(client.get_server_certificate(name)?.arn)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::arn_account;

    #[test]
    fn account_is_fifth_arn_field() {
        assert_eq!(
            arn_account("arn:aws:iam::123456789012:user/ops"),
            Some("123456789012")
        );
        assert_eq!(arn_account("arn:aws:iam"), None);
        assert_eq!(arn_account("arn:aws:iam:::user/ops"), None);
    }
}
