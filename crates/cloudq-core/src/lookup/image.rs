//! Machine image lookups.

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::{exactly_one, field, Lookups, Scope};
use crate::cloud::{tag_filter, CloudApi, Filter, Image, Provider, Service, Tagged};
use crate::error::{LookupError, LookupResult};
use crate::retry::Sleeper;

/// Canonical's publisher account.
pub const CANONICAL_OWNER: &str = "099720109477";

const ARCHIVED_TAG: &str = "ArchivedDate";

/// Sort key for image results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSort {
    /// A record field by provider name, e.g. `CreationDate`.
    Attribute(String),
    /// A tag value; images without the tag sort as empty.
    Tag(String),
}

impl ImageSort {
    fn key(&self, image: &Image) -> String {
        match self {
            ImageSort::Attribute(attr) => match field(image, attr) {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            },
            ImageSort::Tag(key) => image.tag(key).unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(LookupError::InvalidArgument(format!(
                "order must be asc or desc, got {other}"
            ))),
        }
    }
}

/// Image search parameters. Defaults target Canonical's x86_64 HVM images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageQuery {
    pub name: String,
    pub arch: String,
    pub virtualization_type: String,
    pub owner: String,
    pub tags: Vec<(String, String)>,
    pub sort: Option<ImageSort>,
    pub order: SortOrder,
    /// Report an empty result as an error instead of an empty list.
    pub fail_if_empty: bool,
}

impl ImageQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arch: "x86_64".to_string(),
            virtualization_type: "hvm".to_string(),
            owner: CANONICAL_OWNER.to_string(),
            tags: Vec::new(),
            sort: None,
            order: SortOrder::default(),
            fail_if_empty: false,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_virtualization_type(mut self, virt: impl Into<String>) -> Self {
        self.virtualization_type = virt.into();
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    pub fn sorted_by(mut self, sort: ImageSort, order: SortOrder) -> Self {
        self.sort = Some(sort);
        self.order = order;
        self
    }

    pub fn fail_if_empty(mut self) -> Self {
        self.fail_if_empty = true;
        self
    }

    fn filters(&self) -> Vec<Filter> {
        self.tags
            .iter()
            .map(|(k, v)| tag_filter(k, v.as_str()))
            .chain([
                Filter::new("name", [self.name.as_str()]),
                Filter::new("architecture", [self.arch.as_str()]),
                Filter::new("virtualization-type", [self.virtualization_type.as_str()]),
            ])
            .collect()
    }
}

fn find_images(client: &dyn CloudApi, query: &ImageQuery, region: &str) -> LookupResult<Vec<Image>> {
    let mut images = client.describe_images(&[query.owner.clone()], &query.filters())?;
    if images.is_empty() && query.fail_if_empty {
        return Err(LookupError::NotFound(format!(
            "No image was found with name {} in region {region}",
            query.name
        )));
    }
    if let Some(sort) = &query.sort {
        images.sort_by(|a, b| {
            let ord: Ordering = sort.key(a).cmp(&sort.key(b));
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }
    Ok(images)
}

impl<P: Provider, S: Sleeper> Lookups<P, S> {
    /// Images matching `query`, sorted when the query asks for it.
    pub fn ami_images(&self, query: &ImageQuery, scope: &Scope) -> LookupResult<Vec<Image>> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            find_images(client.as_ref(), query, &scope.region)
        })
    }

    /// Id of the single image matching `query`.
    pub fn ami_image_id(&self, query: &ImageQuery, scope: &Scope) -> LookupResult<String> {
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let image = exactly_one(
                find_images(client.as_ref(), query, &scope.region)?,
                || {
                    format!(
                        "No image was found with name {} in region {}",
                        query.name, scope.region
                    )
                },
                |_| {
                    format!(
                        "More than 1 image was found with name {} in region {}",
                        query.name, scope.region
                    )
                },
            )?;
            Ok(image.image_id)
        })
    }

    /// Id of the most recently created image named `name` published by `owner`.
    pub fn latest_ami_id(&self, name: &str, owner: &str, scope: &Scope) -> LookupResult<String> {
        let query = ImageQuery::new(name)
            .with_owner(owner)
            .sorted_by(ImageSort::Attribute("CreationDate".into()), SortOrder::Desc);
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            find_images(client.as_ref(), &query, &scope.region)?
                .into_iter()
                .next()
                .map(|image| image.image_id)
                .ok_or_else(|| {
                    LookupError::NotFound(format!(
                        "No image was found with name {name} in region {}",
                        scope.region
                    ))
                })
        })
    }

    /// Ids of the account's own images named `name`, minus `exclude_ami` and,
    /// when `exclude_archived` is set, any image already tagged `ArchivedDate`.
    /// Sorted and free of duplicates.
    pub fn older_images(
        &self,
        query: &ImageQuery,
        exclude_ami: Option<&str>,
        exclude_archived: bool,
        scope: &Scope,
    ) -> LookupResult<Vec<String>> {
        let query = query.clone().with_owner("self");
        self.retrying(|| {
            let client = self.client(scope, Service::Ec2)?;
            let ids: BTreeSet<String> = find_images(client.as_ref(), &query, &scope.region)?
                .into_iter()
                .filter(|image| !(exclude_archived && image.tag(ARCHIVED_TAG).is_some()))
                .filter(|image| Some(image.image_id.as_str()) != exclude_ami)
                .map(|image| image.image_id)
                .collect();
            Ok(ids.into_iter().collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Tag;

    fn image(id: &str, created: &str, tier: Option<&str>) -> Image {
        Image {
            image_id: id.into(),
            creation_date: created.into(),
            tags: tier.map(|t| vec![Tag::new("Tier", t)]).unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn query_builds_provider_filters() {
        let q = ImageQuery::new("ubuntu-*").with_tag("State", "current");
        let filters = q.filters();
        let names: Vec<&str> = filters.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["tag:State", "name", "architecture", "virtualization-type"]
        );
        assert_eq!(q.owner, CANONICAL_OWNER);
    }

    #[test]
    fn sort_keys_read_attributes_and_tags() {
        let img = image("ami-1", "2024-01-01", Some("gold"));
        assert_eq!(ImageSort::Attribute("CreationDate".into()).key(&img), "2024-01-01");
        assert_eq!(ImageSort::Tag("Tier".into()).key(&img), "gold");
        assert_eq!(ImageSort::Tag("Missing".into()).key(&img), "");
    }

    #[test]
    fn order_parses() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
    }
}
