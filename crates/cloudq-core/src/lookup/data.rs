//! Queue, table, stream, database and cache lookups.

use std::str::FromStr;

use super::{Lookups, Scope};
use crate::cloud::{CloudApi, DbInstance, Endpoint, Provider, Service};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

/// Which queue identifier [`Lookups::sqs`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueKey {
    #[default]
    Arn,
    Url,
}

impl FromStr for QueueKey {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arn" => Ok(QueueKey::Arn),
            "url" => Ok(QueueKey::Url),
            other => Err(LookupError::InvalidArgument(format!(
                "key must be arn or url, got {other}"
            ))),
        }
    }
}

/// Table ARN with its final `/name` segment removed.
fn base_arn(arn: &str) -> &str {
    arn.rsplit_once('/').map_or(arn, |(base, _)| base)
}

fn db_endpoint(client: &dyn CloudApi, name: &str) -> LookupResult<Endpoint> {
    let mut instances: Vec<DbInstance> = client.describe_db_instances(name)?;
    if instances.len() != 1 {
        return Err(LookupError::Ambiguous("More than rds 1 instance found".into()));
    }
    instances
        .remove(0)
        .endpoint
        .ok_or_else(|| LookupError::NotFound("instance has no endpoint".into()))
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// ARN or URL of the queue `name`.
    pub fn sqs(&self, name: &str, key: QueueKey, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Sqs)?;
            let url = client.get_queue_url(name)?;
            match key {
                QueueKey::Url => Ok(url),
                QueueKey::Arn => Ok(client.get_queue_arn(&url)?),
            }
        })
    }

    /// Table ARN prefix of the account, derived from the first listed table.
    pub fn dynamodb_base_arn(&self, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::DynamoDb)?;
            let table = client
                .list_tables(1)?
                .into_iter()
                .next()
                .ok_or_else(|| LookupError::NotFound("Unable to find 1 DynamoDB Table".into()))?;
            let arn = client.describe_table(&table)?.table_arn;
            Ok(base_arn(&arn).to_string())
        })
    }

    /// ARN of the stream `name`.
    pub fn kinesis_stream_arn(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Kinesis)?;
            Ok(client.describe_stream(name)?.stream_arn)
        })
    }

    /// Endpoint address of the database instance `name`.
    ///
    /// Every failure, including provider errors, is reported as not found
    /// and is therefore never retried.
    pub fn rds_endpoint(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.rds_lookup(name, scope, |endpoint| Some(endpoint.address))
    }

    /// Hosted zone id of the database instance `name`.
    pub fn rds_hosted_zone_id(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.rds_lookup(name, scope, |endpoint| endpoint.hosted_zone_id)
    }

    fn rds_lookup(
        &self,
        name: &str,
        scope: &Scope,
        pick: impl Fn(Endpoint) -> Option<String>,
    ) -> LookupResult<String> {
        self.retrying(|| {
            let found = self
                .client(scope, Service::Rds)
                .and_then(|client| db_endpoint(client.as_ref(), name))
                .and_then(|endpoint| {
                    pick(endpoint)
                        .ok_or_else(|| LookupError::NotFound("endpoint field missing".into()))
                });
            found.map_err(|e| LookupError::NotFound(format!("DBInstance {name} not found: {e}")))
        })
    }

    /// Configuration endpoint address of the cache cluster `name`.
    pub fn elasticache_endpoint(&self, name: &str, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::ElastiCache)?;
            client
                .describe_cache_clusters(name)?
                .into_iter()
                .next()
                .and_then(|cluster| cluster.configuration_endpoint)
                .map(|endpoint| endpoint.address)
                .ok_or_else(|| {
                    LookupError::NotFound(format!(
                        "Could not retrieve ip for {name}: no configuration endpoint"
                    ))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_arn_drops_table_name() {
        assert_eq!(
            base_arn("arn:aws:dynamodb:us-west-2:123456789012:table/orders"),
            "arn:aws:dynamodb:us-west-2:123456789012:table"
        );
        assert_eq!(base_arn("no-slash"), "no-slash");
    }

    #[test]
    fn queue_key_parses() {
        assert_eq!("url".parse::<QueueKey>().unwrap(), QueueKey::Url);
        assert_eq!(QueueKey::default(), QueueKey::Arn);
        assert!("name".parse::<QueueKey>().is_err());
    }
}
