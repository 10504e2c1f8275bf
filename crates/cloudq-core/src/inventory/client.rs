//! [`CloudApi`] served from one region of an [`Inventory`].

use super::select::{matches, select, validate};
use super::{Inventory, RegionInventory};
use crate::cloud::{
    AvailabilityZone, CacheCluster, CertificateSummary, ClientError, CloudApi, DbInstance, Filter,
    Image, Instance, InstanceProfile, Reservation, RouteTable, SecurityGroup, ServerCertificate,
    Service, Stream, Subnet, Table, Tag, User, Vpc,
};

pub(super) struct InventoryClient<'a> {
    inventory: &'a Inventory,
    records: &'a RegionInventory,
    service: Service,
}

impl<'a> InventoryClient<'a> {
    pub(super) fn new(inventory: &'a Inventory, records: &'a RegionInventory, service: Service) -> Self {
        Self {
            inventory,
            records,
            service,
        }
    }

    /// Common preamble: the operation must belong to this client's service,
    /// and pending faults fire before the call is served.
    fn begin(&self, operation: &str, service: Service) -> Result<&'a RegionInventory, ClientError> {
        if self.service != service {
            return Err(ClientError::new(
                operation,
                "InvalidAction",
                format!(
                    "The action {operation} is not valid for this web service ({})",
                    self.service
                ),
            ));
        }
        if let Some(err) = self.inventory.take_fault(operation) {
            return Err(err);
        }
        Ok(self.records)
    }
}

impl CloudApi for InventoryClient<'_> {
    fn describe_vpcs(&self, filters: &[Filter]) -> Result<Vec<Vpc>, ClientError> {
        let op = "DescribeVpcs";
        select(op, &self.begin(op, Service::Ec2)?.vpcs, filters)
    }

    fn describe_subnets(&self, filters: &[Filter]) -> Result<Vec<Subnet>, ClientError> {
        let op = "DescribeSubnets";
        select(op, &self.begin(op, Service::Ec2)?.subnets, filters)
    }

    fn describe_security_groups(
        &self,
        filters: &[Filter],
    ) -> Result<Vec<SecurityGroup>, ClientError> {
        let op = "DescribeSecurityGroups";
        select(op, &self.begin(op, Service::Ec2)?.security_groups, filters)
    }

    fn describe_instances(&self, filters: &[Filter]) -> Result<Vec<Reservation>, ClientError> {
        let op = "DescribeInstances";
        let records = self.begin(op, Service::Ec2)?;
        validate::<Instance>(op, filters)?;
        // Reservations are returned only with their matching instances.
        Ok(records
            .reservations
            .iter()
            .filter_map(|r| {
                let instances: Vec<Instance> = r
                    .instances
                    .iter()
                    .filter(|i| matches(*i, filters))
                    .cloned()
                    .collect();
                (!instances.is_empty()).then(|| Reservation {
                    reservation_id: r.reservation_id.clone(),
                    instances,
                })
            })
            .collect())
    }

    fn describe_route_tables(
        &self,
        ids: &[String],
        filters: &[Filter],
    ) -> Result<Vec<RouteTable>, ClientError> {
        let op = "DescribeRouteTables";
        let records = self.begin(op, Service::Ec2)?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !records.route_tables.iter().any(|rt| &rt.route_table_id == *id))
        {
            return Err(ClientError::new(
                op,
                "InvalidRouteTableID.NotFound",
                format!("The routeTable ID '{missing}' does not exist"),
            ));
        }
        let tables = select(op, &records.route_tables, filters)?;
        Ok(tables
            .into_iter()
            .filter(|rt| ids.is_empty() || ids.contains(&rt.route_table_id))
            .collect())
    }

    fn describe_availability_zones(&self) -> Result<Vec<AvailabilityZone>, ClientError> {
        let op = "DescribeAvailabilityZones";
        Ok(self.begin(op, Service::Ec2)?.availability_zones.clone())
    }

    fn describe_images(
        &self,
        owners: &[String],
        filters: &[Filter],
    ) -> Result<Vec<Image>, ClientError> {
        let op = "DescribeImages";
        let records = self.begin(op, Service::Ec2)?;
        let account = self.inventory.account_id();
        let owned = |img: &Image| {
            owners.is_empty()
                || owners
                    .iter()
                    .any(|o| o == &img.owner_id || (o == "self" && img.owner_id == account))
        };
        Ok(select(op, &records.images, filters)?
            .into_iter()
            .filter(|img| owned(img))
            .collect())
    }

    fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let op = "ListUsers";
        Ok(self.begin(op, Service::Iam)?.users.clone())
    }

    fn get_instance_profile(&self, name: &str) -> Result<InstanceProfile, ClientError> {
        let op = "GetInstanceProfile";
        self.begin(op, Service::Iam)?
            .instance_profiles
            .iter()
            .find(|p| p.instance_profile_name == name)
            .cloned()
            .ok_or_else(|| {
                ClientError::new(
                    op,
                    "NoSuchEntity",
                    format!("Instance Profile {name} cannot be found."),
                )
            })
    }

    fn get_server_certificate(&self, name: &str) -> Result<ServerCertificate, ClientError> {
        let op = "GetServerCertificate";
        self.begin(op, Service::Iam)?
            .server_certificates
            .iter()
            .find(|c| c.server_certificate_name == name)
            .cloned()
            .ok_or_else(|| {
                ClientError::new(
                    op,
                    "NoSuchEntity",
                    format!("The Server Certificate with name {name} cannot be found."),
                )
            })
    }

    fn get_queue_url(&self, name: &str) -> Result<String, ClientError> {
        let op = "GetQueueUrl";
        self.begin(op, Service::Sqs)?
            .queues
            .iter()
            .find(|q| q.queue_name == name)
            .map(|q| q.queue_url.clone())
            .ok_or_else(|| non_existent_queue(op))
    }

    fn get_queue_arn(&self, url: &str) -> Result<String, ClientError> {
        let op = "GetQueueAttributes";
        self.begin(op, Service::Sqs)?
            .queues
            .iter()
            .find(|q| q.queue_url == url)
            .map(|q| q.queue_arn.clone())
            .ok_or_else(|| non_existent_queue(op))
    }

    fn list_tables(&self, limit: usize) -> Result<Vec<String>, ClientError> {
        let op = "ListTables";
        Ok(self
            .begin(op, Service::DynamoDb)?
            .tables
            .iter()
            .take(limit)
            .map(|t| t.table_name.clone())
            .collect())
    }

    fn describe_table(&self, name: &str) -> Result<Table, ClientError> {
        let op = "DescribeTable";
        self.begin(op, Service::DynamoDb)?
            .tables
            .iter()
            .find(|t| t.table_name == name)
            .cloned()
            .ok_or_else(|| {
                ClientError::new(
                    op,
                    "ResourceNotFoundException",
                    format!("Requested resource not found: Table: {name} not found"),
                )
            })
    }

    fn describe_stream(&self, name: &str) -> Result<Stream, ClientError> {
        let op = "DescribeStream";
        self.begin(op, Service::Kinesis)?
            .streams
            .iter()
            .find(|s| s.stream_name == name)
            .cloned()
            .ok_or_else(|| {
                ClientError::new(
                    op,
                    "ResourceNotFoundException",
                    format!("Stream {name} under account {} not found.", self.inventory.account_id()),
                )
            })
    }

    fn list_certificates(&self) -> Result<Vec<CertificateSummary>, ClientError> {
        let op = "ListCertificates";
        Ok(self
            .begin(op, Service::Acm)?
            .certificates
            .iter()
            .map(|c| CertificateSummary {
                domain_name: c.domain_name.clone(),
                certificate_arn: c.certificate_arn.clone(),
            })
            .collect())
    }

    fn list_tags_for_certificate(&self, arn: &str) -> Result<Vec<Tag>, ClientError> {
        let op = "ListTagsForCertificate";
        self.begin(op, Service::Acm)?
            .certificates
            .iter()
            .find(|c| c.certificate_arn == arn)
            .map(|c| c.tags.clone())
            .ok_or_else(|| {
                ClientError::new(
                    op,
                    "ResourceNotFoundException",
                    format!("Could not find certificate {arn}."),
                )
            })
    }

    fn describe_cache_clusters(&self, id: &str) -> Result<Vec<CacheCluster>, ClientError> {
        let op = "DescribeCacheClusters";
        let found: Vec<CacheCluster> = self
            .begin(op, Service::ElastiCache)?
            .cache_clusters
            .iter()
            .filter(|c| c.cache_cluster_id == id)
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(ClientError::new(
                op,
                "CacheClusterNotFound",
                format!("CacheCluster {id} not found."),
            ));
        }
        Ok(found)
    }

    fn describe_db_instances(&self, id: &str) -> Result<Vec<DbInstance>, ClientError> {
        let op = "DescribeDBInstances";
        let found: Vec<DbInstance> = self
            .begin(op, Service::Rds)?
            .db_instances
            .iter()
            .filter(|d| d.db_instance_identifier == id)
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(ClientError::new(
                op,
                "DBInstanceNotFound",
                format!("DBInstance {id} not found."),
            ));
        }
        Ok(found)
    }
}

fn non_existent_queue(op: &str) -> ClientError {
    ClientError::new(
        op,
        "AWS.SimpleQueueService.NonExistentQueue",
        "The specified queue does not exist for this wsdl version.",
    )
}
