// CutoffScout - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no UI.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::FilterError;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Cell
// =============================================================================

/// One loosely-typed field of a record, exactly as it appeared in the input.
///
/// The source data is hand-maintained JSON: codes are sometimes numbers,
/// cutoffs are sometimes missing or null, and the odd row carries a value of
/// the wrong shape altogether. Records always deserialise; shape problems are
/// reported when a filter actually looks at the field.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Number(f64),
    Text(String),
    /// Booleans, arrays and objects.
    Other(serde_json::Value),
}

impl Cell {
    /// String form used by text filters and renderers.
    ///
    /// Numbers render without a trailing `.0` so that a numeric college code
    /// `1` reads as `"1"`. Null reads as the empty string. `Other` has no
    /// string form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Null => Some(Cow::Borrowed("")),
            Cell::Number(n) => Some(Cow::Owned(format_number(*n))),
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Other(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Cell::Null => "null".to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => format!("\"{s}\""),
            Cell::Other(v) => v.to_string(),
        }
    }
}

/// Integral numbers go out as JSON integers so `195` stays `195`, not `195.0`.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_unit(),
            Cell::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Other(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Other(v) => write!(f, "{v}"),
            other => f.write_str(other.as_text().as_deref().unwrap_or_default()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<Option<f64>> for Cell {
    fn from(n: Option<f64>) -> Self {
        n.map(Cell::Number).unwrap_or(Cell::Null)
    }
}

/// Render a number the way the source data writes it: integers bare.
pub fn format_number(n: f64) -> String {
    match as_integer(n) {
        Some(i) => i.to_string(),
        None => format!("{n}"),
    }
}

fn as_integer(n: f64) -> Option<i64> {
    (n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15).then_some(n as i64)
}

// =============================================================================
// Quota
// =============================================================================

/// The nine community-quota categories that carry a cutoff per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quota {
    Oc,
    Bc,
    Bcm,
    Mbc,
    MbcDnc,
    MbcV,
    Sc,
    Sca,
    St,
}

impl Quota {
    /// All quotas in column order.
    pub const ALL: [Quota; 9] = [
        Quota::Oc,
        Quota::Bc,
        Quota::Bcm,
        Quota::Mbc,
        Quota::MbcDnc,
        Quota::MbcV,
        Quota::Sc,
        Quota::Sca,
        Quota::St,
    ];

    /// Column name as it appears in the data and on screen.
    pub fn name(&self) -> &'static str {
        match self {
            Quota::Oc => "OC",
            Quota::Bc => "BC",
            Quota::Bcm => "BCM",
            Quota::Mbc => "MBC",
            Quota::MbcDnc => "MBCDNC",
            Quota::MbcV => "MBCV",
            Quota::Sc => "SC",
            Quota::Sca => "SCA",
            Quota::St => "ST",
        }
    }

    /// Position in [`Quota::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quota {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Quota::ALL
            .iter()
            .copied()
            .find(|q| q.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilterError::UnknownQuota {
                name: wanted.to_string(),
            })
    }
}

// =============================================================================
// Record
// =============================================================================

/// One college-branch row with its nine cutoffs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque row id carried through from the source, if any.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    #[serde(rename = "coc", default)]
    pub college_code: Cell,

    #[serde(rename = "con", default)]
    pub college_name: Cell,

    #[serde(rename = "brc", default)]
    pub branch_code: Cell,

    #[serde(rename = "brn", default)]
    pub branch_name: Cell,

    #[serde(rename = "OC", default, skip_serializing_if = "Cell::is_null")]
    pub oc: Cell,
    #[serde(rename = "BC", default, skip_serializing_if = "Cell::is_null")]
    pub bc: Cell,
    #[serde(rename = "BCM", default, skip_serializing_if = "Cell::is_null")]
    pub bcm: Cell,
    #[serde(rename = "MBC", default, skip_serializing_if = "Cell::is_null")]
    pub mbc: Cell,
    #[serde(rename = "MBCDNC", default, skip_serializing_if = "Cell::is_null")]
    pub mbc_dnc: Cell,
    #[serde(rename = "MBCV", default, skip_serializing_if = "Cell::is_null")]
    pub mbc_v: Cell,
    #[serde(rename = "SC", default, skip_serializing_if = "Cell::is_null")]
    pub sc: Cell,
    #[serde(rename = "SCA", default, skip_serializing_if = "Cell::is_null")]
    pub sca: Cell,
    #[serde(rename = "ST", default, skip_serializing_if = "Cell::is_null")]
    pub st: Cell,
}

impl Record {
    /// The cutoff cell for one quota.
    pub fn cutoff(&self, quota: Quota) -> &Cell {
        match quota {
            Quota::Oc => &self.oc,
            Quota::Bc => &self.bc,
            Quota::Bcm => &self.bcm,
            Quota::Mbc => &self.mbc,
            Quota::MbcDnc => &self.mbc_dnc,
            Quota::MbcV => &self.mbc_v,
            Quota::Sc => &self.sc,
            Quota::Sca => &self.sca,
            Quota::St => &self.st,
        }
    }
}

// =============================================================================
// CutoffRange
// =============================================================================

/// An inclusive (low, high) pair as supplied by a range slider.
///
/// The pair may arrive reversed; consumers normalise with [`CutoffRange::bounds`].
/// `(0, 0)` is the "inactive" sentinel, not a literal zero-to-zero range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffRange {
    pub low: f64,
    pub high: f64,
}

impl CutoffRange {
    /// The sentinel marking a range filter as switched off.
    pub const INACTIVE: CutoffRange = CutoffRange {
        low: 0.0,
        high: 0.0,
    };

    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// True when both raw values are falsy (zero or NaN).
    pub fn is_inactive(&self) -> bool {
        is_falsy(self.low) && is_falsy(self.high)
    }

    /// Normalised `(min, max)` regardless of supply order.
    pub fn bounds(&self) -> (f64, f64) {
        (self.low.min(self.high), self.low.max(self.high))
    }
}

impl Default for CutoffRange {
    fn default() -> Self {
        Self::INACTIVE
    }
}

impl From<(f64, f64)> for CutoffRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

impl fmt::Display for CutoffRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_number(self.low),
            format_number(self.high)
        )
    }
}

/// Zero and NaN count as "not set" for range bounds.
pub fn is_falsy(v: f64) -> bool {
    v == 0.0 || v.is_nan()
}

// =============================================================================
// Branch lookup
// =============================================================================

/// One choice offered by the branch-code multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOption {
    pub value: String,
    pub label: String,
}
