//! Cloud client boundary.
//!
//! Lookups talk to the provider only through [`Provider`] (client
//! acquisition) and [`CloudApi`] (read-only queries). Record types mirror the
//! provider's describe output so inventory snapshots can be written by hand
//! or captured from real API responses.

mod error;
mod filter;
mod records;

pub use error::{ClientError, ErrorDetail, ErrorResponse};
pub use filter::{tag_filter, Filter};
pub use records::*;

use std::fmt;

/// Provider service a client is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Ec2,
    Iam,
    Sqs,
    Acm,
    ElastiCache,
    Rds,
    DynamoDb,
    Kinesis,
}

impl Service {
    /// Endpoint prefix used by the provider (e.g. `ec2`, `elasticache`).
    pub fn as_str(self) -> &'static str {
        match self {
            Service::Ec2 => "ec2",
            Service::Iam => "iam",
            Service::Sqs => "sqs",
            Service::Acm => "acm",
            Service::ElastiCache => "elasticache",
            Service::Rds => "rds",
            Service::DynamoDb => "dynamodb",
            Service::Kinesis => "kinesis",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only queries used by the lookup layer.
///
/// A client is bound to one region and one [`Service`]; calling an operation
/// of another service fails with a [`ClientError`].
pub trait CloudApi {
    fn describe_vpcs(&self, filters: &[Filter]) -> Result<Vec<Vpc>, ClientError>;
    fn describe_subnets(&self, filters: &[Filter]) -> Result<Vec<Subnet>, ClientError>;
    fn describe_security_groups(&self, filters: &[Filter])
        -> Result<Vec<SecurityGroup>, ClientError>;
    fn describe_instances(&self, filters: &[Filter]) -> Result<Vec<Reservation>, ClientError>;
    /// `ids` restricts the result to those route tables; unknown ids are an error.
    fn describe_route_tables(
        &self,
        ids: &[String],
        filters: &[Filter],
    ) -> Result<Vec<RouteTable>, ClientError>;
    fn describe_availability_zones(&self) -> Result<Vec<AvailabilityZone>, ClientError>;
    /// `owners` accepts account ids and `self`.
    fn describe_images(&self, owners: &[String], filters: &[Filter])
        -> Result<Vec<Image>, ClientError>;

    fn list_users(&self) -> Result<Vec<User>, ClientError>;
    fn get_instance_profile(&self, name: &str) -> Result<InstanceProfile, ClientError>;
    fn get_server_certificate(&self, name: &str) -> Result<ServerCertificate, ClientError>;

    fn get_queue_url(&self, name: &str) -> Result<String, ClientError>;
    fn get_queue_arn(&self, url: &str) -> Result<String, ClientError>;

    fn list_tables(&self, limit: usize) -> Result<Vec<String>, ClientError>;
    fn describe_table(&self, name: &str) -> Result<Table, ClientError>;

    fn describe_stream(&self, name: &str) -> Result<Stream, ClientError>;

    fn list_certificates(&self) -> Result<Vec<CertificateSummary>, ClientError>;
    fn list_tags_for_certificate(&self, arn: &str) -> Result<Vec<Tag>, ClientError>;

    fn describe_cache_clusters(&self, id: &str) -> Result<Vec<CacheCluster>, ClientError>;
    fn describe_db_instances(&self, id: &str) -> Result<Vec<DbInstance>, ClientError>;
}

/// Acquires service clients for a region and optional named credential profile.
pub trait Provider {
    fn client(
        &self,
        region: &str,
        service: Service,
        profile: Option<&str>,
    ) -> Result<Box<dyn CloudApi + '_>, ClientError>;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn client(
        &self,
        region: &str,
        service: Service,
        profile: Option<&str>,
    ) -> Result<Box<dyn CloudApi + '_>, ClientError> {
        (**self).client(region, service, profile)
    }
}
