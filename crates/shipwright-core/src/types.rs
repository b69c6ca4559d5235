// SPDX-FileCopyrightText: 2026 Shipwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by capability contracts and the plugin registry.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// String-keyed configuration handed to a plugin on `init`.
pub type PluginConfig = HashMap<String, String>;

/// Identifies the capability contract a registry store holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Generic,
    Deployer,
    Provider,
}

impl CapabilityKind {
    /// Every known kind, in registry order.
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Generic,
        CapabilityKind::Deployer,
        CapabilityKind::Provider,
    ];

    /// Name of the trait a value must implement to live in this kind's store.
    pub fn contract_name(self) -> &'static str {
        match self {
            CapabilityKind::Generic => "Plugin",
            CapabilityKind::Deployer => "Deployer",
            CapabilityKind::Provider => "Provider",
        }
    }
}

/// Which self-reported accessor supplies a plugin's registry identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSource {
    /// `Plugin::package_name`.
    #[default]
    PackageName,
    /// `Plugin::name`.
    Name,
}

/// Input widget used to render a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Password,
    Select,
    Checkbox,
    Number,
    Textarea,
}

/// Declarative description of one configuration key a plugin accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    /// Config key, e.g. "apiKey".
    pub key: String,
    /// User-facing label, e.g. "API Key".
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Allowed values for `select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Value applied when the host supplies none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Free-form UI metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ConfigField {
    /// A field with the given key, label and input type; everything else empty.
    pub fn new(key: impl Into<String>, label: impl Into<String>, input_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            input_type,
            required: false,
            placeholder: None,
            options: Vec::new(),
            help_text: None,
            default: None,
            group: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

// --- Deployer types ---

/// Status reported by a deployer while a deployment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Progress,
    Success,
    Failed,
}

/// Result of a finished `Deployer::deploy` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutcome {
    /// Link to the revision the deployer created, when it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_url: Option<String>,
}

/// A service currently running on a deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningService {
    pub name: String,
    pub image: String,
    pub status: String,
}

/// A deployment affected by a revision of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedRevision {
    pub service: String,
    /// ISO-8601 timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

// --- Provider types ---

/// A release published on a source-control provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub name: String,
    /// ISO-8601 timestamp (YYYY-MM-DDTHH:MM:SSZ).
    pub created_at: String,
    pub draft: bool,
    pub repository: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A deployment record created on a source-control provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: i64,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_url: Option<String>,
}

/// A pull request on a source-control provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub head_branch: String,
    pub base_branch: String,
}
