use serde::{Deserialize, Serialize};

/// EC2-style query filter: a record matches when any value matches.
/// Multiple filters are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// `tag:<key>` filter matching a single value.
pub fn tag_filter(key: &str, value: impl Into<String>) -> Filter {
    Filter::new(format!("tag:{key}"), [value.into()])
}
