//! Shared inventory fixture for lookup integration tests.
//!
//! One populated region (`us-west-2`) and one nearly empty region
//! (`eu-west-1`). Lookups are built with a [`TrackingSleeper`] so retries
//! are observable and never block.

#![allow(dead_code)]

use cloudq_core::inventory::{Fault, Inventory};
use cloudq_core::lookup::{Lookups, Scope};
use cloudq_core::retry::{Backoff, TrackingSleeper};

pub const REGION: &str = "us-west-2";
pub const ACCOUNT: &str = "123456789012";

pub const INVENTORY_JSON: &str = r#"{
  "account_id": "123456789012",
  "profiles": ["default", "ops"],
  "regions": {
    "us-west-2": {
      "Vpcs": [
        {"VpcId": "vpc-prod", "CidrBlock": "10.0.0.0/16",
         "Tags": [{"Key": "Name", "Value": "production"}]},
        {"VpcId": "vpc-stage", "CidrBlock": "10.1.0.0/16",
         "Tags": [{"Key": "Name", "Value": "Staging"}]},
        {"VpcId": "vpc-default", "CidrBlock": "172.31.0.0/16", "IsDefault": true,
         "Tags": [{"Key": "Name", "Value": "default"}]},
        {"VpcId": "vpc-scratch", "CidrBlock": "10.2.0.0/16"}
      ],
      "Subnets": [
        {"SubnetId": "subnet-c", "VpcId": "vpc-prod", "CidrBlock": "10.0.3.0/24",
         "AvailabilityZone": "us-west-2c", "Tags": [{"Key": "tier", "Value": "web"}]},
        {"SubnetId": "subnet-a", "VpcId": "vpc-prod", "CidrBlock": "10.0.1.0/24",
         "AvailabilityZone": "us-west-2a", "Tags": [{"Key": "tier", "Value": "web"}]},
        {"SubnetId": "subnet-b", "VpcId": "vpc-prod", "CidrBlock": "10.0.2.0/24",
         "AvailabilityZone": "us-west-2b", "Tags": [{"Key": "tier", "Value": "db"}]},
        {"SubnetId": "subnet-s1", "VpcId": "vpc-stage", "CidrBlock": "10.1.1.0/24",
         "AvailabilityZone": "us-west-2a"}
      ],
      "SecurityGroups": [
        {"GroupId": "sg-web", "GroupName": "web", "VpcId": "vpc-prod",
         "IpPermissions": [
           {"IpProtocol": "tcp", "FromPort": 443, "ToPort": 443,
            "IpRanges": [{"CidrIp": "10.0.0.0/8"}, {"CidrIp": "192.168.0.0/16"}]},
           {"IpProtocol": "tcp", "FromPort": 80, "ToPort": 80,
            "IpRanges": [{"CidrIp": "0.0.0.0/0"}]}
         ],
         "Tags": [{"Key": "Name", "Value": "web-elb"}, {"Key": "env", "Value": "prod"},
                  {"Key": "service", "Value": "web"}]},
        {"GroupId": "sg-db", "GroupName": "db", "VpcId": "vpc-prod",
         "Tags": [{"Key": "Name", "Value": "db"}, {"Key": "env", "Value": "prod"},
                  {"Key": "service", "Value": "db"}]},
        {"GroupId": "sg-dup1", "GroupName": "dup-a", "VpcId": "vpc-prod",
         "Tags": [{"Key": "Name", "Value": "dup"}]},
        {"GroupId": "sg-dup2", "GroupName": "dup-b", "VpcId": "vpc-prod",
         "Tags": [{"Key": "Name", "Value": "dup"}]},
        {"GroupId": "sg-stage-web", "GroupName": "web", "VpcId": "vpc-stage",
         "Tags": [{"Key": "env", "Value": "stage"}]}
      ],
      "Reservations": [
        {"ReservationId": "r-1", "Instances": [
          {"InstanceId": "i-web1", "PrivateIpAddress": "10.0.1.10", "PublicIpAddress": "54.0.0.1",
           "Tags": [{"Key": "Name", "Value": "web"}, {"Key": "env", "Value": "prod"},
                    {"Key": "service", "Value": "web"}]}
        ]},
        {"ReservationId": "r-2", "Instances": [
          {"InstanceId": "i-web2", "PrivateIpAddress": "10.0.1.11", "PublicIpAddress": "54.0.0.2",
           "Tags": [{"Key": "Name", "Value": "web"}, {"Key": "env", "Value": "prod"},
                    {"Key": "service", "Value": "web"}, {"Key": "canary", "Value": "true"}]}
        ]},
        {"ReservationId": "r-3", "Instances": [
          {"InstanceId": "i-db", "State": {"Name": "stopped"}, "PrivateIpAddress": "10.0.2.10",
           "Tags": [{"Key": "Name", "Value": "db"}, {"Key": "env", "Value": "prod"},
                    {"Key": "service", "Value": "db"}]}
        ]},
        {"ReservationId": "r-4", "Instances": [
          {"InstanceId": "i-bastion", "PrivateIpAddress": "10.0.1.5", "PublicIpAddress": "54.0.0.9",
           "Tags": [{"Key": "Name", "Value": "bastion"}]},
          {"InstanceId": "i-anon", "PrivateIpAddress": "10.0.1.6"}
        ]}
      ],
      "RouteTables": [
        {"RouteTableId": "rtb-main", "VpcId": "vpc-prod",
         "Associations": [{"Main": true}]},
        {"RouteTableId": "rtb-prod-a", "VpcId": "vpc-prod",
         "Associations": [{"Main": false, "SubnetId": "subnet-a"},
                          {"Main": false, "SubnetId": "subnet-b"}]},
        {"RouteTableId": "rtb-stage", "VpcId": "vpc-stage",
         "Associations": [{"Main": false, "SubnetId": "subnet-s1"}]}
      ],
      "AvailabilityZones": [
        {"ZoneName": "us-west-2c"}, {"ZoneName": "us-west-2a"}, {"ZoneName": "us-west-2b"}
      ],
      "Images": [
        {"ImageId": "ami-app1", "Name": "app-1", "OwnerId": "123456789012",
         "CreationDate": "2024-01-01T00:00:00.000Z",
         "Tags": [{"Key": "ArchivedDate", "Value": "2024-03-01"}]},
        {"ImageId": "ami-app2", "Name": "app-2", "OwnerId": "123456789012",
         "CreationDate": "2024-02-01T00:00:00.000Z"},
        {"ImageId": "ami-app3", "Name": "app-3", "OwnerId": "123456789012",
         "CreationDate": "2024-03-01T00:00:00.000Z"},
        {"ImageId": "ami-jammy-jan", "Name": "ubuntu-jammy-20240101", "OwnerId": "099720109477",
         "CreationDate": "2024-01-01T00:00:00.000Z"},
        {"ImageId": "ami-jammy-jun", "Name": "ubuntu-jammy-20240601", "OwnerId": "099720109477",
         "CreationDate": "2024-06-01T00:00:00.000Z"},
        {"ImageId": "ami-jammy-arm", "Name": "ubuntu-jammy-20240701", "OwnerId": "099720109477",
         "Architecture": "arm64", "CreationDate": "2024-07-01T00:00:00.000Z"}
      ],
      "Users": [
        {"UserName": "ops", "Arn": "arn:aws:iam::123456789012:user/ops"}
      ],
      "InstanceProfiles": [
        {"InstanceProfileName": "web-role",
         "Arn": "arn:aws:iam::123456789012:instance-profile/web-role"}
      ],
      "ServerCertificates": [
        {"ServerCertificateName": "www",
         "Arn": "arn:aws:iam::123456789012:server-certificate/www"}
      ],
      "Queues": [
        {"QueueName": "jobs",
         "QueueUrl": "https://sqs.us-west-2.amazonaws.com/123456789012/jobs",
         "QueueArn": "arn:aws:sqs:us-west-2:123456789012:jobs"}
      ],
      "Tables": [
        {"TableName": "orders", "TableArn": "arn:aws:dynamodb:us-west-2:123456789012:table/orders"}
      ],
      "Streams": [
        {"StreamName": "events", "StreamARN": "arn:aws:kinesis:us-west-2:123456789012:stream/events"}
      ],
      "Certificates": [
        {"DomainName": "example.com",
         "CertificateArn": "arn:aws:acm:us-west-2:123456789012:certificate/aaaa",
         "Tags": [{"Key": "Name", "Value": "wildcard"}]},
        {"DomainName": "api.example.com",
         "CertificateArn": "arn:aws:acm:us-west-2:123456789012:certificate/bbbb"}
      ],
      "CacheClusters": [
        {"CacheClusterId": "sessions",
         "ConfigurationEndpoint": {"Address": "sessions.cfg.usw2.cache.amazonaws.com", "Port": 11211}},
        {"CacheClusterId": "single-node"}
      ],
      "DbInstances": [
        {"DBInstanceIdentifier": "main-db",
         "Endpoint": {"Address": "main-db.abc.us-west-2.rds.amazonaws.com", "Port": 5432,
                      "HostedZoneId": "Z1PVIF0B656C1W"}}
      ]
    },
    "eu-west-1": {
      "AvailabilityZones": [{"ZoneName": "eu-west-1a"}]
    }
  }
}"#;

pub fn inventory() -> Inventory {
    Inventory::from_json_str(INVENTORY_JSON).expect("fixture inventory parses")
}

/// Lookups over the fixture with the default backoff and a tracking sleeper.
pub fn lookups() -> Lookups<Inventory, TrackingSleeper> {
    lookups_with(inventory(), Backoff::default())
}

pub fn lookups_with(inventory: Inventory, backoff: Backoff) -> Lookups<Inventory, TrackingSleeper> {
    Lookups::new(inventory)
        .with_backoff(backoff)
        .with_sleeper(TrackingSleeper::new())
}

/// Fixture lookups with faults queued before the first call.
pub fn faulty(faults: impl IntoIterator<Item = Fault>) -> Lookups<Inventory, TrackingSleeper> {
    let inv = inventory();
    for fault in faults {
        inv.push_fault(fault);
    }
    lookups_with(inv, Backoff::default())
}

pub fn scope() -> Scope {
    Scope::new(REGION)
}
