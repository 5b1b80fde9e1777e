//! Field descriptions: what to find on a form and what to draw there.

use std::fmt;
use std::str::FromStr;

use crate::geometry::Point;

/// Default font size for text marks, in points.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Default radius of a yes/no bubble mark, in points.
pub const DEFAULT_RADIUS: f64 = 4.0;

/// Which of the two mutually exclusive subjects a search disambiguates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RoleContext {
    Employee,
    Patient,
}

impl RoleContext {
    /// Lowercase token searched for in extracted text.
    pub fn token(self) -> &'static str {
        match self {
            RoleContext::Employee => "employee",
            RoleContext::Patient => "patient",
        }
    }

    /// The competing role, whose presence on a line is penalized.
    pub fn other(self) -> RoleContext {
        match self {
            RoleContext::Employee => RoleContext::Patient,
            RoleContext::Patient => RoleContext::Employee,
        }
    }
}

impl fmt::Display for RoleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for RoleContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(RoleContext::Employee),
            "patient" => Ok(RoleContext::Patient),
            other => Err(format!(
                "unknown role '{other}' (expected 'employee' or 'patient')"
            )),
        }
    }
}

/// How a field's write position is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorStrategy {
    /// Scored search for a "name" line near the role label.
    TextSearch { role: RoleContext },
    /// A constant position, used for free-text values.
    FixedCoordinate { at: Point },
    /// Two constant positions; a yes/no value selects one of them.
    FixedChoice { yes: Point, no: Point },
}

/// Per-field nudge applied after resolution. Positive `y` moves down the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Describes one field of a form: where it lives and how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Identifier used in logs, reports and errors.
    pub name: String,
    /// Page to search or to draw on. `None` scans every page for text
    /// searches and means page 0 for fixed coordinates.
    pub target_page: Option<usize>,
    pub strategy: AnchorStrategy,
    pub offset: Offset,
    /// Font size for text marks.
    pub font_size: f64,
    /// Radius for bubble marks.
    pub radius: f64,
}

impl FieldSpec {
    fn with_strategy(name: impl Into<String>, strategy: AnchorStrategy) -> Self {
        Self {
            name: name.into(),
            target_page: None,
            strategy,
            offset: Offset::default(),
            font_size: DEFAULT_FONT_SIZE,
            radius: DEFAULT_RADIUS,
        }
    }

    pub fn text_search(name: impl Into<String>, role: RoleContext) -> Self {
        Self::with_strategy(name, AnchorStrategy::TextSearch { role })
    }

    pub fn fixed(name: impl Into<String>, at: Point) -> Self {
        Self::with_strategy(name, AnchorStrategy::FixedCoordinate { at })
    }

    pub fn choice(name: impl Into<String>, yes: Point, no: Point) -> Self {
        Self::with_strategy(name, AnchorStrategy::FixedChoice { yes, no })
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.target_page = Some(page);
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = Offset::new(x, y);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }
}

/// What to draw for a field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Mark {
    /// A text string.
    Text(String),
    /// A filled bubble at the yes (`true`) or no (`false`) position.
    Choice(bool),
}

impl Mark {
    /// True for text marks with nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, Mark::Text(text) if text.trim().is_empty())
    }
}

/// One unit of work for the filler: a field and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct FillRequest {
    pub field: FieldSpec,
    pub mark: Mark,
}

impl FillRequest {
    pub fn new(field: FieldSpec, mark: Mark) -> Self {
        Self { field, mark }
    }
}

/// Resolved write position for one field, in top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub x: f64,
    /// Distance from the top of the page.
    pub y: f64,
    pub page_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tokens_and_other() {
        assert_eq!(RoleContext::Employee.token(), "employee");
        assert_eq!(RoleContext::Employee.other(), RoleContext::Patient);
        assert_eq!(RoleContext::Patient.other(), RoleContext::Employee);
    }

    #[test]
    fn role_from_str_is_case_insensitive() {
        assert_eq!("Patient".parse::<RoleContext>(), Ok(RoleContext::Patient));
        assert_eq!(" EMPLOYEE ".parse::<RoleContext>(), Ok(RoleContext::Employee));
        assert!("doctor".parse::<RoleContext>().is_err());
    }

    #[test]
    fn field_builders_set_defaults() {
        let field = FieldSpec::choice(
            "serious_condition",
            Point::new(500.3, 508.9),
            Point::new(554.9, 508.9),
        )
        .on_page(1)
        .with_offset(-13.0, 5.0);
        assert_eq!(field.target_page, Some(1));
        assert_eq!(field.offset, Offset::new(-13.0, 5.0));
        assert_eq!(field.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(field.radius, DEFAULT_RADIUS);
    }

    #[test]
    fn blank_marks() {
        assert!(Mark::Text("   ".to_string()).is_blank());
        assert!(Mark::Text(String::new()).is_blank());
        assert!(!Mark::Text("Jordan".to_string()).is_blank());
        assert!(!Mark::Choice(false).is_blank());
    }
}
