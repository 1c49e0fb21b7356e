//! Record kinds returned by `torero get <kind> --raw`.
//!
//! Each record is deserialized straight from one element of torero's JSON
//! array. Required fields are plain types, optional ones are `Option` or
//! `#[serde(default)]`. Services, decorators and repositories keep any field
//! they don't name in `extra` so newer torero output survives the round trip;
//! secrets drop unknown fields so secret material can never leak through.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The four resource kinds torero manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Service,
    Decorator,
    Repository,
    Secret,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Service,
        ResourceKind::Decorator,
        ResourceKind::Repository,
        ResourceKind::Secret,
    ];

    /// Noun used as the `torero get` subcommand argument and URL segment.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Service => "services",
            ResourceKind::Decorator => "decorators",
            ResourceKind::Repository => "repositories",
            ResourceKind::Secret => "secrets",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Service => "service",
            ResourceKind::Decorator => "decorator",
            ResourceKind::Repository => "repository",
            ResourceKind::Secret => "secret",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// torero writes `"tags": null` for untagged records; read that as no tags.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A record kind the executor can fetch and look up by name.
pub trait Resource: DeserializeOwned + Serialize + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn name(&self) -> &str;

    /// torero's `type` field, when the kind has one.
    fn resource_type(&self) -> Option<&str>;

    /// Whether records of this kind carry tags at all.
    const HAS_TAGS: bool = true;

    fn tags(&self) -> &[String] {
        &[]
    }
}

/// An automation service registered with torero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registries: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Service {
    const KIND: ResourceKind = ResourceKind::Service;

    fn name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> Option<&str> {
        Some(&self.service_type)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A decorator: an input schema torero applies to a service run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    pub name: String,
    #[serde(rename = "type")]
    pub decorator_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Decorator {
    const KIND: ResourceKind = ResourceKind::Decorator;
    const HAS_TAGS: bool = false;

    fn name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> Option<&str> {
        Some(&self.decorator_type)
    }
}

/// A source repository torero pulls service code from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(rename = "type")]
    pub repository_type: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Branch or tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Name of the secret holding the deploy key, never the key itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Repository {
    const KIND: ResourceKind = ResourceKind::Repository;

    fn name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> Option<&str> {
        Some(&self.repository_type)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Secret metadata. No `extra` map: any field not listed here (a `value`, for
/// instance) is discarded during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl Resource for Secret {
    const KIND: ResourceKind = ResourceKind::Secret;

    fn name(&self) -> &str {
        &self.name
    }

    fn resource_type(&self) -> Option<&str> {
        self.secret_type.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Keep records whose `type` equals `resource_type`. Order is preserved.
pub fn filter_by_type<T: Resource>(records: Vec<T>, resource_type: &str) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| r.resource_type() == Some(resource_type))
        .collect()
}

/// Keep records carrying `tag`. Order is preserved.
pub fn filter_by_tag<T: Resource>(records: Vec<T>, tag: &str) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| r.tags().iter().any(|t| t == tag))
        .collect()
}

/// Sorted, de-duplicated `type` values across `records`.
pub fn distinct_types<T: Resource>(records: &[T]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.resource_type())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
