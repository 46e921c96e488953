//! Work-breakdown-structure codes.
//!
//! Codes are dot-separated non-negative integers. Phases own top-level codes
//! (`1`, `2`) and tasks extend their phase's prefix (`2.3`, `2.3.1`). Codes
//! compare segment by segment, so `1.9 < 1.10` and a prefix sorts before every
//! code that extends it.

use super::WbsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hierarchical display code for a phase or task.
///
/// # Examples
///
/// ```
/// use planwright::ordering::{WbsCode, code_between};
///
/// let previous = WbsCode::parse("1.2")?;
/// let next = WbsCode::parse("1.5")?;
/// assert_eq!(code_between(Some(&previous), Some(&next))?.to_string(), "1.3");
/// # Ok::<(), planwright::ordering::WbsError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WbsCode {
    segments: Vec<u32>,
}

impl WbsCode {
    /// Parses a dot-separated code.
    ///
    /// # Errors
    ///
    /// Returns [`WbsError::Malformed`] when the value is empty or contains a
    /// segment that is not a non-negative integer.
    pub fn parse(value: &str) -> Result<Self, WbsError> {
        let trimmed = value.trim();
        let segments = trimmed
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
                    return Err(WbsError::Malformed(value.to_owned()));
                }
                segment
                    .parse::<u32>()
                    .map_err(|_| WbsError::Malformed(value.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Creates a single-segment code such as a phase's `3`.
    #[must_use]
    pub fn root(number: u32) -> Self {
        Self {
            segments: vec![number],
        }
    }

    /// Returns the numeric segments.
    #[must_use]
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the code of this code's `number`-th child.
    #[must_use]
    pub fn child(&self, number: u32) -> Self {
        let mut segments = self.segments.clone();
        segments.push(number);
        Self { segments }
    }

    /// Returns the code that directly follows this one at the same depth.
    #[must_use]
    pub fn next_sibling(&self) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            *last = last.saturating_add(1);
        }
        Self { segments }
    }

    /// Returns `true` when `self` extends `prefix` by at least one segment.
    #[must_use]
    pub fn is_descendant_of(&self, prefix: &Self) -> bool {
        self.segments.len() > prefix.segments.len() && self.segments.starts_with(&prefix.segments)
    }

    /// Returns `true` when `self` extends `prefix` by exactly one segment.
    #[must_use]
    pub fn is_child_of(&self, prefix: &Self) -> bool {
        self.segments.len() == prefix.segments.len() + 1 && self.segments.starts_with(&prefix.segments)
    }

    fn from_segments(segments: Vec<u32>) -> Self {
        Self { segments }
    }
}

impl TryFrom<String> for WbsCode {
    type Error = WbsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WbsCode> for String {
    fn from(code: WbsCode) -> Self {
        code.to_string()
    }
}

impl FromStr for WbsCode {
    type Err = WbsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for WbsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            write!(f, "{first}")?;
        }
        for segment in segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

/// Returns a code strictly between `previous` and `next`.
///
/// The first diverging segment is bisected. When the midpoint collides with
/// the lower segment, a `.1` segment is appended to `previous` instead. A
/// missing `next` yields the next sibling of `previous`; both missing yields
/// `1`.
///
/// # Errors
///
/// Returns [`WbsError::InvalidRange`] when `previous >= next`, or
/// [`WbsError::NoRoom`] when `next` ends in zero segments that leave nothing
/// below it (such codes are never generated here).
pub fn code_between(previous: Option<&WbsCode>, next: Option<&WbsCode>) -> Result<WbsCode, WbsError> {
    match (previous, next) {
        (None, None) => Ok(WbsCode::root(1)),
        (Some(lower), None) => Ok(lower.next_sibling()),
        (None, Some(upper)) => between_segments(&[], upper.segments()).map(WbsCode::from_segments),
        (Some(lower), Some(upper)) => {
            if lower >= upper {
                return Err(WbsError::InvalidRange {
                    lower: lower.to_string(),
                    upper: upper.to_string(),
                });
            }
            between_segments(lower.segments(), upper.segments()).map(WbsCode::from_segments)
        }
    }
}

/// Returns a code strictly between `previous` and `next` that `is_taken`
/// rejects as unused.
///
/// Candidates that are already taken become the new lower bound, so the
/// search walks deeper until it finds a free code.
///
/// # Errors
///
/// Returns the same errors as [`code_between`].
pub fn code_between_unused(
    previous: Option<&WbsCode>,
    next: Option<&WbsCode>,
    is_taken: impl Fn(&WbsCode) -> bool,
) -> Result<WbsCode, WbsError> {
    let mut candidate = code_between(previous, next)?;
    while is_taken(&candidate) {
        candidate = code_between(Some(&candidate), next)?;
    }
    Ok(candidate)
}

/// Returns the code after the highest direct child of `parent` among
/// `existing`, or the first child when there is none.
///
/// A `None` parent addresses the top level (phase codes).
#[must_use]
pub fn next_child_code<'a>(
    parent: Option<&WbsCode>,
    existing: impl IntoIterator<Item = &'a WbsCode>,
) -> WbsCode {
    let highest = existing
        .into_iter()
        .filter(|code| match parent {
            Some(prefix) => code.is_child_of(prefix),
            None => code.depth() == 1,
        })
        .filter_map(|code| code.segments().last().copied())
        .max();
    let number = highest.map_or(1, |value| value.saturating_add(1));
    match parent {
        Some(prefix) => prefix.child(number),
        None => WbsCode::root(number),
    }
}

fn between_segments(lower: &[u32], upper: &[u32]) -> Result<Vec<u32>, WbsError> {
    let shared = lower
        .iter()
        .zip(upper)
        .take_while(|(left, right)| left == right)
        .count();

    match (lower.get(shared), upper.get(shared)) {
        (Some(&low), Some(&high)) if low < high => {
            let middle = low + ((high - low) >> 1);
            let mut segments = lower.to_vec();
            if middle > low {
                segments.truncate(shared);
                segments.push(middle);
            } else {
                segments.push(1);
            }
            Ok(segments)
        }
        (None, Some(&high)) => {
            let mut segments = lower.to_vec();
            if high >= 2 {
                segments.push(high >> 1);
                return Ok(segments);
            }
            // Generated codes never end in a zero segment, which keeps room
            // below every code for later insertions.
            segments.push(0);
            if high == 1 {
                segments.push(1);
                return Ok(segments);
            }
            let rest = upper.get(shared + 1..).unwrap_or_default();
            if rest.is_empty() {
                return Err(WbsError::NoRoom(render(upper)));
            }
            segments.extend(between_segments(&[], rest)?);
            Ok(segments)
        }
        _ => Err(WbsError::InvalidRange {
            lower: render(lower),
            upper: render(upper),
        }),
    }
}

fn render(segments: &[u32]) -> String {
    WbsCode::from_segments(segments.to_vec()).to_string()
}
