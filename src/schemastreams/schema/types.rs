//! Registry data model: artifact types, registration policies and metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;

/// Kind of schema document stored under an artifact id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactType {
    Avro,
    Protobuf,
    Json,
    Openapi,
    Asyncapi,
    Graphql,
    Kconnect,
    Wsdl,
    Xsd,
    Xml,
}

impl ArtifactType {
    /// Value sent in the `X-Registry-ArtifactType` header
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Avro => "AVRO",
            ArtifactType::Protobuf => "PROTOBUF",
            ArtifactType::Json => "JSON",
            ArtifactType::Openapi => "OPENAPI",
            ArtifactType::Asyncapi => "ASYNCAPI",
            ArtifactType::Graphql => "GRAPHQL",
            ArtifactType::Kconnect => "KCONNECT",
            ArtifactType::Wsdl => "WSDL",
            ArtifactType::Xsd => "XSD",
            ArtifactType::Xml => "XML",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVRO" => Ok(ArtifactType::Avro),
            "PROTOBUF" => Ok(ArtifactType::Protobuf),
            "JSON" => Ok(ArtifactType::Json),
            "OPENAPI" => Ok(ArtifactType::Openapi),
            "ASYNCAPI" => Ok(ArtifactType::Asyncapi),
            "GRAPHQL" => Ok(ArtifactType::Graphql),
            "KCONNECT" => Ok(ArtifactType::Kconnect),
            "WSDL" => Ok(ArtifactType::Wsdl),
            "XSD" => Ok(ArtifactType::Xsd),
            "XML" => Ok(ArtifactType::Xml),
            other => Err(SchemaError::Configuration {
                message: format!("Unknown artifact type '{}'", other),
            }),
        }
    }
}

/// What the registry should do when the artifact id is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IfExists {
    /// Reject with 409
    Fail,
    /// Always add a new version
    Update,
    /// Return the latest version unchanged
    Return,
    /// Return the version with identical content, otherwise add a new version
    #[default]
    ReturnOrUpdate,
}

impl IfExists {
    /// Value of the `ifExists` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            IfExists::Fail => "FAIL",
            IfExists::Update => "UPDATE",
            IfExists::Return => "RETURN",
            IfExists::ReturnOrUpdate => "RETURN_OR_UPDATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactState {
    #[default]
    Enabled,
    Disabled,
    Deprecated,
    Deleted,
}

/// Metadata of one artifact version as returned by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetaData {
    pub id: String,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    pub version: i32,
    pub global_id: i64,
    #[serde(default)]
    pub state: ArtifactState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Epoch milliseconds
    #[serde(default)]
    pub created_on: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub modified_on: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Error body returned by the registry on failure
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryErrorBody {
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}
