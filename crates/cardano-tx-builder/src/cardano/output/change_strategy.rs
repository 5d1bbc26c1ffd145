//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Address, Output, ProtocolParameters, Value};
use anyhow::anyhow;
use std::{collections::VecDeque, fmt};

/// Where the leftover of a balanced transaction goes.
///
/// The strategy receives the remaining value and the declared outputs, and is expected to place
/// the change somewhere in those outputs.
pub struct ChangeStrategy(
    #[allow(clippy::type_complexity)]
    Box<dyn FnOnce(Value<u64>, &mut VecDeque<Output>) -> anyhow::Result<()> + Send>,
);

impl fmt::Debug for ChangeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeStrategy(..)")
    }
}

// --------------------------------------------------------------------- Running

impl ChangeStrategy {
    pub fn apply(self, change: Value<u64>, outputs: &mut VecDeque<Output>) -> anyhow::Result<()> {
        self.0(change, outputs)
    }
}

// -------------------------------------------------------------------- Building

impl Default for ChangeStrategy {
    fn default() -> Self {
        Self::new(|change, _outputs| {
            Err(anyhow!("change={change}")
                .context("no change address set; the leftover value has nowhere to go"))
        })
    }
}

impl ChangeStrategy {
    pub fn new(
        strategy: impl FnOnce(Value<u64>, &mut VecDeque<Output>) -> anyhow::Result<()>
        + Send
        + 'static,
    ) -> Self {
        Self(Box::new(strategy))
    }

    /// Send the change to the given address, as a new output appended after all others. Fails
    /// when the change is too small to constitute an output on its own.
    pub fn as_last_output(change_address: Address, params: &ProtocolParameters) -> Self {
        let params = params.clone();
        Self::new(move |change, outputs| {
            let output = Output::new(change_address, change);
            let minimum = output.minimum_deposit(&params);
            if output.value().lovelace() < minimum {
                return Err(anyhow!(
                    "change={} lovelace, minimum required={minimum}",
                    output.value().lovelace()
                )
                .context("not enough funds to create a sufficiently large change output"));
            }
            outputs.push_back(output);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{ChangeStrategy, ProtocolParameters, address, value};
    use std::collections::VecDeque;

    #[test]
    fn default_strategy_fails() {
        let mut outputs = VecDeque::new();
        assert!(
            ChangeStrategy::default()
                .apply(value!(5_000_000), &mut outputs)
                .is_err()
        );
        assert!(outputs.is_empty());
    }

    #[test]
    fn change_goes_last() {
        let params = ProtocolParameters::mainnet();
        let mut outputs = VecDeque::from([crate::output!("addr1v83gkkw3nqzakg5xynlurqcfqhgd65vkfvf5xv8tx25ufds2yvy2h", value!(2_000_000))]);
        ChangeStrategy::as_last_output(address!("addr1v83gkkw3nqzakg5xynlurqcfqhgd65vkfvf5xv8tx25ufds2yvy2h"), &params)
            .apply(value!(3_000_000), &mut outputs)
            .unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].value().lovelace(), 3_000_000);
    }

    #[test]
    fn dust_change_is_rejected() {
        let params = ProtocolParameters::mainnet();
        let mut outputs = VecDeque::new();
        assert!(
            ChangeStrategy::as_last_output(address!("addr1v83gkkw3nqzakg5xynlurqcfqhgd65vkfvf5xv8tx25ufds2yvy2h"), &params)
                .apply(value!(1_000), &mut outputs)
                .is_err()
        );
    }
}
