//! Reading and writing `<Kind>List` documents.
//!
//! Input must be a single YAML (or JSON) document whose `apiVersion` and
//! `kind` name the list type of the expected binding kind. Output uses the
//! same shape so it can be fed back into this tool or `kubectl apply -f`.

use crate::binding::RbacBinding;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
    #[error("input is empty; expected a {expected} document")]
    Empty { expected: &'static str },
    #[error("input contains more than one document; expected a single {expected}")]
    MultipleDocuments { expected: &'static str },
    #[error("input is not a {expected} document: {source}")]
    Malformed {
        expected: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("expected kind {expected}, found {}", .found.as_deref().unwrap_or("<none>"))]
    UnexpectedKind {
        expected: &'static str,
        found: Option<String>,
    },
    #[error("expected apiVersion {expected}, found {}", .found.as_deref().unwrap_or("<none>"))]
    UnexpectedApiVersion {
        expected: &'static str,
        found: Option<String>,
    },
    #[error("item {index} is not a valid {kind}: {source}")]
    InvalidItem {
        index: usize,
        kind: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to encode YAML: {0}")]
    EncodeYaml(#[source] serde_yaml::Error),
    #[error("failed to encode JSON: {0}")]
    EncodeJson(#[source] serde_json::Error),
}

/// Loosely typed view used to validate the envelope before decoding items.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawList {
    api_version: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    items: Option<Vec<serde_yaml::Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListDocument<'a, B> {
    api_version: &'static str,
    items: &'a [B],
    kind: &'static str,
    metadata: ListMeta,
}

pub fn read_binding_list<B: RbacBinding, R: Read>(mut reader: R) -> Result<Vec<B>, ManifestError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(ManifestError::Read)?;
    parse_binding_list(&text)
}

pub fn parse_binding_list<B: RbacBinding>(text: &str) -> Result<Vec<B>, ManifestError> {
    let expected = B::LIST_KIND;
    if text.trim().is_empty() {
        return Err(ManifestError::Empty { expected });
    }

    // Bare `---` separators produce null documents; only real content counts.
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|source| ManifestError::Malformed { expected, source })?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    if documents.len() > 1 {
        return Err(ManifestError::MultipleDocuments { expected });
    }
    let first = documents.pop().ok_or(ManifestError::Empty { expected })?;
    let raw: RawList = serde_yaml::from_value(first)
        .map_err(|source| ManifestError::Malformed { expected, source })?;

    if raw.kind.as_deref() != Some(expected) {
        return Err(ManifestError::UnexpectedKind {
            expected,
            found: raw.kind,
        });
    }
    if raw.api_version.as_deref() != Some(B::API_VERSION) {
        return Err(ManifestError::UnexpectedApiVersion {
            expected: B::API_VERSION,
            found: raw.api_version,
        });
    }

    raw.items
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_yaml::from_value(item).map_err(|source| ManifestError::InvalidItem {
                index,
                kind: B::KIND,
                source,
            })
        })
        .collect()
}

pub fn write_binding_list<B: RbacBinding, W: Write>(
    mut writer: W,
    items: &[B],
    format: OutputFormat,
) -> Result<(), ManifestError> {
    let document = ListDocument {
        api_version: B::API_VERSION,
        items,
        kind: B::LIST_KIND,
        metadata: ListMeta::default(),
    };
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut writer, &document).map_err(ManifestError::EncodeYaml)?
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &document)
                .map_err(ManifestError::EncodeJson)?;
            writeln!(writer).map_err(ManifestError::Write)?;
        }
    }
    writer.flush().map_err(ManifestError::Write)
}
