//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Input, Output};
use std::fmt;

/// An unspent output, together with the reference of where it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    input: Input,
    output: Output,
}

impl fmt::Display for Utxo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.input, self.output)
    }
}

impl Utxo {
    pub fn new(input: Input, output: Output) -> Self {
        Self { input, output }
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn into_parts(self) -> (Input, Output) {
        (self.input, self.output)
    }
}

impl From<(Input, Output)> for Utxo {
    fn from((input, output): (Input, Output)) -> Self {
        Self::new(input, output)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{Address, Credential, NetworkId, Output, Utxo, Value, any};
    use proptest::prelude::*;

    pub mod generators {
        use super::*;

        prop_compose! {
            /// A UTxO held by a key, on a testnet.
            pub fn utxo()(
                input in any::input(),
                payment in any::hash28(),
                lovelace in 1_000_000u64..100_000_000_000,
            ) -> Utxo {
                let address = Address::new(NetworkId::TESTNET, Credential::from_key(payment));
                Utxo::new(input, Output::new(address.into(), Value::new(lovelace)))
            }
        }
    }
}
