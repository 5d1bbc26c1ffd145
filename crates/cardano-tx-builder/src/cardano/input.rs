//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Hash, cbor, pallas};
use anyhow::anyhow;
use std::{fmt, str::FromStr};

/// A reference to a transaction output: the id of the transaction that produced it, and its
/// position among that transaction's outputs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, cbor::Encode, cbor::Decode)]
#[repr(transparent)]
#[cbor(transparent)]
pub struct Input(#[n(0)] pallas::TransactionInput);

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.transaction_id(), self.output_index())
    }
}

// -------------------------------------------------------------------- Building

impl Input {
    /// See also [`input!`](crate::input).
    pub fn new(transaction_id: Hash<32>, output_index: u64) -> Self {
        Self(pallas::TransactionInput {
            transaction_id: pallas::Hash::from(transaction_id),
            index: output_index,
        })
    }
}

// ------------------------------------------------------------------ Inspecting

impl Input {
    pub fn transaction_id(&self) -> Hash<32> {
        Hash::from(self.0.transaction_id)
    }

    pub fn output_index(&self) -> u64 {
        self.0.index
    }
}

// ----------------------------------------------------------- Converting (from)

impl From<pallas::TransactionInput> for Input {
    fn from(input: pallas::TransactionInput) -> Self {
        Self(input)
    }
}

/// Parse the usual `{transaction id}#{output index}` notation.
impl FromStr for Input {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (id, ix) = s
            .split_once('#')
            .ok_or_else(|| anyhow!("malformed output reference: {s}; expected id#index"))?;

        Ok(Self::new(
            id.parse()?,
            ix.parse()
                .map_err(|e| anyhow!("{e}").context(format!("invalid output index: {ix}")))?,
        ))
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<Input> for pallas::TransactionInput {
    fn from(input: Input) -> Self {
        input.0
    }
}

impl From<&Input> for pallas::TransactionInput {
    fn from(input: &Input) -> Self {
        input.0.clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{Input, any, input};
    use proptest::prelude::*;

    // -------------------------------------------------------------- Unit tests

    #[test]
    fn display_input() {
        assert_eq!(
            input!(
                "702206530b2e1566e90b3aec753bd0abbf397842bd5421e0c3d23ed10167b3ce",
                42
            )
            .to_string(),
            "702206530b2e1566e90b3aec753bd0abbf397842bd5421e0c3d23ed10167b3ce#42",
        );
    }

    #[test]
    fn reject_missing_index() {
        assert!(
            "702206530b2e1566e90b3aec753bd0abbf397842bd5421e0c3d23ed10167b3ce"
                .parse::<Input>()
                .is_err()
        );
    }

    // -------------------------------------------------------------- Properties

    proptest! {
        #[test]
        fn display_parse_roundtrip(input in any::input()) {
            let input_back: Input = input.to_string().parse().map_err(|e| TestCaseError::fail(format!("{e:?}")))?;
            prop_assert_eq!(input, input_back);
        }
    }

    // -------------------------------------------------------------- Generators

    pub mod generators {
        use super::*;

        prop_compose! {
            pub fn input()(id in any::hash32(), ix in 0u64..256) -> Input {
                Input::new(id, ix)
            }
        }
    }
}
