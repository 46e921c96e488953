//! Fractional-indexing order keys.
//!
//! A key is an *integer part* followed by an optional *fraction*. The head
//! character of the integer part encodes its length (`a`..`z` for 2..27
//! characters, `A`..`Z` for the mirrored negative range), so that plain
//! byte-wise comparison of two keys orders them numerically. Fractions never
//! end in `0`, which keeps every key's successor space open.
//!
//! Appending after the last key increments the integer part (`a0`, `a1`, ...),
//! while inserting between two neighbours extends the fraction. The length of
//! the fraction grows logarithmically with the number of insertions made at
//! the same point.

use super::OrderKeyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const BASE: usize = 62;
const ZERO: u8 = b'0';
const HIGHEST: u8 = b'z';

/// Integer part with no predecessor; keys must carry a fraction to sort here.
const SMALLEST_INTEGER: &[u8] = b"A00000000000000000000000000";

/// Opaque, lexicographically sortable position of a record among its
/// siblings.
///
/// # Examples
///
/// ```
/// use planwright::ordering::{OrderKey, key_between};
///
/// let lower = OrderKey::parse("a1")?;
/// let upper = OrderKey::parse("a3")?;
/// let key = key_between(Some(&lower), Some(&upper))?;
/// assert_eq!(key.as_str(), "a2");
/// assert!(lower < key && key < upper);
/// # Ok::<(), planwright::ordering::OrderKeyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey(String);

impl OrderKey {
    /// Parses and validates a stored order key.
    ///
    /// # Errors
    ///
    /// Returns [`OrderKeyError::InvalidKey`] when the value uses characters
    /// outside the base-62 alphabet, has a truncated integer part, or ends its
    /// fraction with `0`.
    pub fn parse(value: impl Into<String>) -> Result<Self, OrderKeyError> {
        let raw = value.into();
        validate(&raw)?;
        Ok(Self(raw))
    }

    /// Returns the key assigned to the first record of an empty list.
    #[must_use]
    pub fn first() -> Self {
        Self("a0".to_owned())
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn from_digits(digits: Vec<u8>) -> Result<Self, OrderKeyError> {
        String::from_utf8(digits)
            .map(Self)
            .map_err(|err| OrderKeyError::InvalidKey(String::from_utf8_lossy(err.as_bytes()).into_owned()))
    }
}

impl TryFrom<String> for OrderKey {
    type Error = OrderKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.0
    }
}

impl FromStr for OrderKey {
    type Err = OrderKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl AsRef<str> for OrderKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates a key that sorts strictly between `lower` and `upper`.
///
/// A missing `lower` means "before everything", a missing `upper` means
/// "after everything". Neither bound is modified.
///
/// # Errors
///
/// Returns [`OrderKeyError::InvalidRange`] when both bounds are given and
/// `lower >= upper`, or [`OrderKeyError::Exhausted`] at the representational
/// extremes of the key space.
pub fn key_between(
    lower: Option<&OrderKey>,
    upper: Option<&OrderKey>,
) -> Result<OrderKey, OrderKeyError> {
    match (lower, upper) {
        (None, None) => Ok(OrderKey::first()),
        (None, Some(upper_key)) => key_before(upper_key.as_bytes()),
        (Some(lower_key), None) => key_after(lower_key.as_bytes()),
        (Some(lower_key), Some(upper_key)) => {
            if lower_key >= upper_key {
                return Err(OrderKeyError::InvalidRange {
                    lower: lower_key.to_string(),
                    upper: upper_key.to_string(),
                });
            }
            key_inside(lower_key.as_bytes(), upper_key.as_bytes())
        }
    }
}

/// Generates `count` ascending keys strictly between `lower` and `upper`.
///
/// Open-ended ranges produce consecutive integer keys; bounded ranges are
/// filled by bisection so the resulting keys stay short.
///
/// # Errors
///
/// Returns the same errors as [`key_between`].
pub fn keys_between(
    lower: Option<&OrderKey>,
    upper: Option<&OrderKey>,
    count: usize,
) -> Result<Vec<OrderKey>, OrderKeyError> {
    match count {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![key_between(lower, upper)?]),
        _ => {}
    }

    match (lower, upper) {
        (_, None) => {
            let mut keys = Vec::with_capacity(count);
            let mut current = key_between(lower, None)?;
            keys.push(current.clone());
            for _ in 1..count {
                current = key_between(Some(&current), None)?;
                keys.push(current.clone());
            }
            Ok(keys)
        }
        (None, Some(_)) => {
            let mut keys = Vec::with_capacity(count);
            let mut current = key_between(None, upper)?;
            keys.push(current.clone());
            for _ in 1..count {
                current = key_between(None, Some(&current))?;
                keys.push(current.clone());
            }
            keys.reverse();
            Ok(keys)
        }
        (Some(_), Some(_)) => {
            let middle = key_between(lower, upper)?;
            let below = count >> 1;
            let mut keys = keys_between(lower, Some(&middle), below)?;
            let above = keys_between(Some(&middle), upper, count - below - 1)?;
            keys.push(middle);
            keys.extend(above);
            Ok(keys)
        }
    }
}

fn key_before(upper: &[u8]) -> Result<OrderKey, OrderKeyError> {
    let (integer, fraction) = split_key(upper)?;
    if integer == SMALLEST_INTEGER {
        let mut key = integer.to_vec();
        key.extend(midpoint(&[], Some(fraction))?);
        return OrderKey::from_digits(key);
    }
    if integer.len() < upper.len() {
        return OrderKey::from_digits(integer.to_vec());
    }
    decrement_integer(integer)?
        .ok_or(OrderKeyError::Exhausted)
        .and_then(OrderKey::from_digits)
}

fn key_after(lower: &[u8]) -> Result<OrderKey, OrderKeyError> {
    let (integer, fraction) = split_key(lower)?;
    match increment_integer(integer)? {
        Some(next) => OrderKey::from_digits(next),
        None => {
            let mut key = integer.to_vec();
            key.extend(midpoint(fraction, None)?);
            OrderKey::from_digits(key)
        }
    }
}

fn key_inside(lower: &[u8], upper: &[u8]) -> Result<OrderKey, OrderKeyError> {
    let (lower_integer, lower_fraction) = split_key(lower)?;
    let (upper_integer, upper_fraction) = split_key(upper)?;

    if lower_integer == upper_integer {
        let mut key = lower_integer.to_vec();
        key.extend(midpoint(lower_fraction, Some(upper_fraction))?);
        return OrderKey::from_digits(key);
    }

    let next = increment_integer(lower_integer)?.ok_or(OrderKeyError::Exhausted)?;
    if next.as_slice() < upper {
        return OrderKey::from_digits(next);
    }

    let mut key = lower_integer.to_vec();
    key.extend(midpoint(lower_fraction, None)?);
    OrderKey::from_digits(key)
}

/// Returns a digit string strictly between two fractions.
///
/// `lower` is treated as right-padded with zeros; a missing `upper` stands
/// for one past the end of the alphabet.
fn midpoint(lower: &[u8], upper: Option<&[u8]>) -> Result<Vec<u8>, OrderKeyError> {
    if let Some(upper_digits) = upper {
        let shared = upper_digits
            .iter()
            .enumerate()
            .take_while(|(index, digit)| lower.get(*index).copied().unwrap_or(ZERO) == **digit)
            .count();
        if shared > 0 {
            let mut key = upper_digits.get(..shared).unwrap_or_default().to_vec();
            key.extend(midpoint(
                lower.get(shared..).unwrap_or_default(),
                Some(upper_digits.get(shared..).unwrap_or_default()),
            )?);
            return Ok(key);
        }
    }

    let lower_digit = match lower.first() {
        Some(byte) => digit_value(*byte).ok_or(OrderKeyError::Exhausted)?,
        None => 0,
    };
    let upper_digit = match upper {
        Some(digits) => {
            let head = digits.first().ok_or(OrderKeyError::Exhausted)?;
            digit_value(*head).ok_or(OrderKeyError::Exhausted)?
        }
        None => BASE,
    };

    if upper_digit > lower_digit + 1 {
        return Ok(vec![digit_at((lower_digit + upper_digit + 1) >> 1)?]);
    }

    match upper {
        Some(digits) if digits.len() > 1 => Ok(digits.get(..1).unwrap_or_default().to_vec()),
        _ => {
            let mut key = vec![digit_at(lower_digit)?];
            key.extend(midpoint(lower.get(1..).unwrap_or_default(), None)?);
            Ok(key)
        }
    }
}

fn increment_integer(integer: &[u8]) -> Result<Option<Vec<u8>>, OrderKeyError> {
    let (&head, tail) = integer.split_first().ok_or(OrderKeyError::Exhausted)?;
    let mut body = tail.to_vec();
    let mut carry = true;
    for slot in body.iter_mut().rev() {
        let next = digit_value(*slot).ok_or(OrderKeyError::Exhausted)? + 1;
        if next == BASE {
            *slot = ZERO;
        } else {
            *slot = digit_at(next)?;
            carry = false;
            break;
        }
    }

    if !carry {
        return Ok(Some(with_head(head, body)));
    }

    match head {
        b'Z' => Ok(Some(vec![b'a', ZERO])),
        b'z' => Ok(None),
        _ => {
            let next_head = head + 1;
            if next_head > b'a' {
                body.push(ZERO);
            } else {
                body.pop();
            }
            Ok(Some(with_head(next_head, body)))
        }
    }
}

fn decrement_integer(integer: &[u8]) -> Result<Option<Vec<u8>>, OrderKeyError> {
    let (&head, tail) = integer.split_first().ok_or(OrderKeyError::Exhausted)?;
    let mut body = tail.to_vec();
    let mut borrow = true;
    for slot in body.iter_mut().rev() {
        let value = digit_value(*slot).ok_or(OrderKeyError::Exhausted)?;
        if value == 0 {
            *slot = HIGHEST;
        } else {
            *slot = digit_at(value - 1)?;
            borrow = false;
            break;
        }
    }

    if !borrow {
        return Ok(Some(with_head(head, body)));
    }

    match head {
        b'a' => Ok(Some(vec![b'Z', HIGHEST])),
        b'A' => Ok(None),
        _ => {
            let previous_head = head - 1;
            if previous_head < b'Z' {
                body.push(HIGHEST);
            } else {
                body.pop();
            }
            Ok(Some(with_head(previous_head, body)))
        }
    }
}

fn with_head(head: u8, body: Vec<u8>) -> Vec<u8> {
    let mut key = Vec::with_capacity(body.len() + 1);
    key.push(head);
    key.extend(body);
    key
}

fn validate(key: &str) -> Result<(), OrderKeyError> {
    let invalid = || OrderKeyError::InvalidKey(key.to_owned());
    let bytes = key.as_bytes();
    if bytes == SMALLEST_INTEGER || !bytes.iter().all(|byte| digit_value(*byte).is_some()) {
        return Err(invalid());
    }
    let integer = integer_part(bytes).ok_or_else(invalid)?;
    let fraction = bytes.get(integer.len()..).unwrap_or_default();
    if fraction.last() == Some(&ZERO) {
        return Err(invalid());
    }
    Ok(())
}

fn split_key(key: &[u8]) -> Result<(&[u8], &[u8]), OrderKeyError> {
    let integer = integer_part(key)
        .ok_or_else(|| OrderKeyError::InvalidKey(String::from_utf8_lossy(key).into_owned()))?;
    Ok((integer, key.get(integer.len()..).unwrap_or_default()))
}

fn integer_part(key: &[u8]) -> Option<&[u8]> {
    let length = integer_length(*key.first()?)?;
    key.get(..length)
}

const fn integer_length(head: u8) -> Option<usize> {
    match head {
        b'a'..=b'z' => Some((head - b'a') as usize + 2),
        b'A'..=b'Z' => Some((b'Z' - head) as usize + 2),
        _ => None,
    }
}

const fn digit_value(byte: u8) -> Option<usize> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as usize),
        b'A'..=b'Z' => Some((byte - b'A') as usize + 10),
        b'a'..=b'z' => Some((byte - b'a') as usize + 36),
        _ => None,
    }
}

fn digit_at(value: usize) -> Result<u8, OrderKeyError> {
    DIGITS.get(value).copied().ok_or(OrderKeyError::Exhausted)
}
