//! Form templates: versioned field layouts loaded from TOML.
//!
//! A template names every field of one form layout and says how each is
//! located and drawn. The layout of the medical leave form is embedded and
//! available through [`FormTemplate::medical_leave`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use formstamp_core::{FieldSpec, Point, RoleContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MEDICAL_LEAVE_TOML: &str = include_str!("../templates/medical_leave.toml");

/// Errors loading a template or looking up one of its fields.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("template has no field \"{0}\"")]
    UnknownField(String),

    #[error("field \"{field}\": {reason}")]
    InvalidField { field: String, reason: String },
}

/// Per-field offset as written in a template.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetDef {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// How a template field is located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum StrategyDef {
    /// Scored search; the role comes from the record unless fixed here.
    TextSearch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
    },
    Fixed {
        at: [f64; 2],
    },
    FixedChoice {
        yes: [f64; 2],
        no: [f64; 2],
    },
}

/// One `[fields.<name>]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    #[serde(flatten)]
    pub strategy: StrategyDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default)]
    pub offset: OffsetDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

/// A named, versioned set of field layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub fields: BTreeMap<String, TemplateField>,
}

impl FormTemplate {
    /// The embedded medical leave form layout.
    pub fn medical_leave() -> Result<Self, TemplateError> {
        Self::from_toml_str(MEDICAL_LEAVE_TOML)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TemplateError> {
        let template: FormTemplate = toml::from_str(text)?;
        template.validate()?;
        Ok(template)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Build the [`FieldSpec`] for `name`.
    ///
    /// `role` is used by text-search fields that do not pin a role.
    pub fn field(&self, name: &str, role: RoleContext) -> Result<FieldSpec, TemplateError> {
        let def = self
            .fields
            .get(name)
            .ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;

        let mut spec = match &def.strategy {
            StrategyDef::TextSearch { role: pinned } => {
                let role = match pinned {
                    Some(text) => parse_role(name, text)?,
                    None => role,
                };
                FieldSpec::text_search(name, role)
            }
            StrategyDef::Fixed { at } => FieldSpec::fixed(name, point(*at)),
            StrategyDef::FixedChoice { yes, no } => FieldSpec::choice(name, point(*yes), point(*no)),
        };

        if let Some(page) = def.page {
            spec = spec.on_page(page);
        }
        spec = spec.with_offset(def.offset.x, def.offset.y);
        if let Some(size) = def.font_size {
            spec = spec.with_font_size(size);
        }
        if let Some(radius) = def.radius {
            spec = spec.with_radius(radius);
        }
        Ok(spec)
    }

    fn validate(&self) -> Result<(), TemplateError> {
        for (name, def) in &self.fields {
            let invalid = |reason: &str| TemplateError::InvalidField {
                field: name.clone(),
                reason: reason.to_string(),
            };
            if let StrategyDef::TextSearch { role: Some(role) } = &def.strategy {
                parse_role(name, role)?;
            }
            if def.font_size.is_some_and(|s| s <= 0.0) {
                return Err(invalid("font_size must be positive"));
            }
            if def.radius.is_some_and(|r| r <= 0.0) {
                return Err(invalid("radius must be positive"));
            }
        }
        Ok(())
    }
}

fn parse_role(field: &str, text: &str) -> Result<RoleContext, TemplateError> {
    text.parse().map_err(|reason| TemplateError::InvalidField {
        field: field.to_string(),
        reason,
    })
}

fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}
