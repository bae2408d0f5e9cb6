//! Ethereum ABI codec over ordered type schemas.
//!
//! An [`AbiSchema`] is the ordered parameter list of a method input, a method output or
//! an event. Values travel as [`DynSolValue`]s: encoding checks arity and types before
//! writing the canonical head/tail layout, decoding rejects any buffer whose length is
//! not the canonical encoding length of the schema.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, B256, U256};
use std::fmt;
use thiserror::Error;

/// Size in bytes of a single ABI word.
pub const WORD_SIZE: usize = 32;

/// Errors raised by the ABI codec.
#[derive(Debug, Error)]
pub enum AbiError {
    /// A type string could not be parsed into an ABI type.
    #[error("invalid ABI type `{ty}`: {source}")]
    InvalidType {
        /// The rejected type string.
        ty: String,
        /// Parser error.
        #[source]
        source: alloy_dyn_abi::Error,
    },
    /// The buffer length is not the canonical encoding length of the schema.
    #[error("expected {expected} bytes of ABI data, got {actual}")]
    LengthMismatch {
        /// Canonical length for the schema (or the minimum head size).
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
    /// The number of values does not match the schema.
    #[error("expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Number of types in the schema.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },
    /// A value does not conform to the type at its position.
    #[error("value at position {index} is not a `{expected}`")]
    TypeMismatch {
        /// Position of the offending value.
        index: usize,
        /// Canonical name of the expected type.
        expected: String,
    },
    /// The buffer decodes, but a word carries bits its type does not allow, e.g. a
    /// `bool` of `2` or an address with non-zero high bytes.
    #[error("ABI data is not canonically encoded")]
    NonCanonical,
    /// The underlying decoder rejected the buffer, e.g. an offset past its end.
    #[error(transparent)]
    Decode(#[from] alloy_dyn_abi::Error),
}

/// Ordered list of ABI types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbiSchema {
    types: Vec<DynSolType>,
}

impl AbiSchema {
    /// Schema without parameters.
    pub const fn empty() -> Self {
        Self { types: Vec::new() }
    }

    /// Creates a schema from already parsed types.
    pub const fn new(types: Vec<DynSolType>) -> Self {
        Self { types }
    }

    /// Parses a schema from Solidity type strings, e.g. `["bool", "bytes32"]`.
    pub fn parse<I, S>(types: I) -> Result<Self, AbiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        types
            .into_iter()
            .map(|ty| {
                let ty = ty.as_ref();
                DynSolType::parse(ty).map_err(|source| AbiError::InvalidType {
                    ty: ty.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The types in declaration order.
    pub fn types(&self) -> &[DynSolType] {
        &self.types
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the schema has no parameters.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Comma separated canonical type names, as they appear inside a signature.
    pub fn canonical(&self) -> String {
        self.types
            .iter()
            .map(|ty| ty.sol_type_name())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether any parameter is dynamically sized.
    pub fn is_dynamic(&self) -> bool {
        self.static_size().is_none()
    }

    /// Encoded length when every parameter is static.
    pub fn static_size(&self) -> Option<usize> {
        self.types
            .iter()
            .map(static_words)
            .sum::<Option<usize>>()
            .map(|words| words * WORD_SIZE)
    }

    /// Length of the head section: static parameters inline, one offset word per dynamic one.
    pub fn head_size(&self) -> usize {
        self.types
            .iter()
            .map(|ty| static_words(ty).unwrap_or(1) * WORD_SIZE)
            .sum()
    }

    /// Encodes `values` as a parameter list.
    pub fn encode(&self, values: &[DynSolValue]) -> Result<Vec<u8>, AbiError> {
        self.check(values)?;
        Ok(encode_params(values))
    }

    /// Decodes a parameter list, requiring `data` to be exactly its canonical encoding.
    ///
    /// Dirty padding and trailing bytes are rejected.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
        match self.static_size() {
            Some(expected) if data.len() != expected => {
                return Err(AbiError::LengthMismatch {
                    expected,
                    actual: data.len(),
                })
            }
            Some(0) => return Ok(Vec::new()),
            Some(_) => {}
            None => {
                let head = self.head_size();
                if data.len() < head {
                    return Err(AbiError::LengthMismatch {
                        expected: head,
                        actual: data.len(),
                    });
                }
            }
        }

        let values = match DynSolType::Tuple(self.types.clone()).abi_decode_params(data)? {
            DynSolValue::Tuple(values) => values,
            other => vec![other],
        };

        let canonical = encode_params(&values);
        if canonical.len() != data.len() {
            return Err(AbiError::LengthMismatch {
                expected: canonical.len(),
                actual: data.len(),
            });
        }
        if canonical != data || !values.iter().all(is_canonical) {
            return Err(AbiError::NonCanonical);
        }

        Ok(values)
    }

    /// Checks arity and per-position types of `values`.
    pub fn check(&self, values: &[DynSolValue]) -> Result<(), AbiError> {
        if values.len() != self.types.len() {
            return Err(AbiError::ArityMismatch {
                expected: self.types.len(),
                actual: values.len(),
            });
        }
        for (index, (ty, value)) in self.types.iter().zip(values).enumerate() {
            if !ty.matches(value) {
                return Err(AbiError::TypeMismatch {
                    index,
                    expected: ty.sol_type_name().into_owned(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for AbiSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.canonical())
    }
}

/// Topic value of an indexed event argument.
///
/// Word-sized values are placed directly. Byte strings and strings are hashed over
/// their raw contents. Arrays and tuples are hashed over their in-place encoding:
/// elements concatenated without offsets or length words, byte strings padded to a
/// word boundary.
pub fn topic_for(value: &DynSolValue) -> B256 {
    match value {
        DynSolValue::Bytes(bytes) => keccak256(bytes),
        DynSolValue::String(string) => keccak256(string.as_bytes()),
        DynSolValue::Array(_) | DynSolValue::FixedArray(_) | DynSolValue::Tuple(_) => {
            let mut preimage = Vec::new();
            topic_preimage(value, &mut preimage);
            keccak256(preimage)
        }
        other => other
            .as_word()
            .unwrap_or_else(|| keccak256(other.abi_encode())),
    }
}

fn topic_preimage(value: &DynSolValue, out: &mut Vec<u8>) {
    match value {
        DynSolValue::Bytes(bytes) => push_padded(bytes, out),
        DynSolValue::String(string) => push_padded(string.as_bytes(), out),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            for item in items {
                topic_preimage(item, out);
            }
        }
        other => match other.as_word() {
            Some(word) => out.extend_from_slice(word.as_slice()),
            None => out.extend_from_slice(&other.abi_encode()),
        },
    }
}

fn push_padded(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes);
    let rem = bytes.len() % WORD_SIZE;
    if rem != 0 {
        out.resize(out.len() + WORD_SIZE - rem, 0);
    }
}

/// Whether a decoded value is within the range of its declared type.
fn is_canonical(value: &DynSolValue) -> bool {
    match value {
        DynSolValue::Uint(value, bits) => value.bit_len() <= *bits,
        DynSolValue::Int(value, bits) if *bits < 256 => {
            // every bit above the sign bit must repeat it
            let upper = value.into_raw() >> (*bits - 1);
            upper.is_zero() || upper == U256::MAX >> (*bits - 1)
        }
        DynSolValue::FixedBytes(word, size) => word[*size..].iter().all(|byte| *byte == 0),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().all(is_canonical)
        }
        _ => true,
    }
}

fn encode_params(values: &[DynSolValue]) -> Vec<u8> {
    if values.is_empty() {
        return Vec::new();
    }
    DynSolValue::Tuple(values.to_vec()).abi_encode_params()
}

/// Number of head words a static type occupies, `None` for dynamic types.
fn static_words(ty: &DynSolType) -> Option<usize> {
    match ty {
        DynSolType::Bytes | DynSolType::String | DynSolType::Array(_) => None,
        DynSolType::FixedArray(inner, len) => static_words(inner).map(|words| words * len),
        DynSolType::Tuple(inner) => inner.iter().map(static_words).sum(),
        _ => Some(1),
    }
}
