//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::PlutusVersion;
use std::collections::BTreeMap;

/// The subset of protocol parameters needed to balance and cost transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolParameters {
    /// Multiplier coefficient on fee, in lovelace/bytes
    fee_per_byte: u64,

    /// Flat/fixed fee, in lovelace
    fee_constant: u64,

    /// Price of a single memory execution unit, in lovelace/unit
    price_mem: f64,

    /// Price of a single cpu execution unit, in lovelace/unit
    price_cpu: f64,

    /// Collateral required, as a percentage of the fee
    collateral_percentage: u64,

    /// Deposit per byte of serialised output, in lovelace/bytes
    coins_per_utxo_byte: u64,

    /// Cost models, per Plutus language
    cost_models: BTreeMap<PlutusVersion, Vec<i64>>,

    /// The network POSIX start time, in seconds.
    start_time: u64,

    /// The first (not-necessarily active) slot of the Shelley era.
    first_shelley_slot: u64,
}

/// Fixed overhead accounted for every output in the minimum deposit, in bytes.
const OUTPUT_OVERHEAD: u64 = 160;

// ------------------------------------------------------------------ Inspecting

impl ProtocolParameters {
    /// Base transaction fee, computed from the size of a serialised transaction.
    pub fn base_fee(&self, size: u64) -> u64 {
        size * self.fee_per_byte + self.fee_constant
    }

    pub fn price_mem(&self, execution_units: u64) -> u64 {
        (self.price_mem * execution_units as f64).ceil() as u64
    }

    pub fn price_cpu(&self, execution_units: u64) -> u64 {
        (self.price_cpu * execution_units as f64).ceil() as u64
    }

    /// Collateral required for a transaction paying the given fee, rounded up.
    ///
    /// ```rust
    /// # use cardano_tx_builder::ProtocolParameters;
    /// assert_eq!(ProtocolParameters::mainnet().minimum_collateral(200_001), 300_002);
    /// ```
    pub fn minimum_collateral(&self, fee: u64) -> u64 {
        (fee * self.collateral_percentage).div_ceil(100)
    }

    /// Minimum lovelace an output must hold given its serialised size.
    pub fn minimum_deposit(&self, output_size: u64) -> u64 {
        (OUTPUT_OVERHEAD + output_size) * self.coins_per_utxo_byte
    }

    pub fn cost_model(&self, version: PlutusVersion) -> Option<&Vec<i64>> {
        self.cost_models.get(&version)
    }
}

// --------------------------------------------------------------------- Building

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            fee_per_byte: 0,
            fee_constant: 0,
            price_mem: 0.0,
            price_cpu: 0.0,
            collateral_percentage: 0,
            coins_per_utxo_byte: 0,
            cost_models: BTreeMap::new(),
            start_time: 0,
            first_shelley_slot: 0,
        }
    }
}

impl ProtocolParameters {
    pub fn with_fee_per_byte(mut self, fee_per_byte: u64) -> Self {
        self.fee_per_byte = fee_per_byte;
        self
    }

    pub fn with_fee_constant(mut self, fee_constant: u64) -> Self {
        self.fee_constant = fee_constant;
        self
    }

    pub fn with_execution_price_mem(mut self, price_mem: f64) -> Self {
        self.price_mem = price_mem;
        self
    }

    pub fn with_execution_price_cpu(mut self, price_cpu: f64) -> Self {
        self.price_cpu = price_cpu;
        self
    }

    pub fn with_collateral_percentage(mut self, collateral_percentage: u64) -> Self {
        self.collateral_percentage = collateral_percentage;
        self
    }

    pub fn with_coins_per_utxo_byte(mut self, coins_per_utxo_byte: u64) -> Self {
        self.coins_per_utxo_byte = coins_per_utxo_byte;
        self
    }

    pub fn with_cost_model(mut self, version: PlutusVersion, cost_model: Vec<i64>) -> Self {
        self.cost_models.insert(version, cost_model);
        self
    }

    pub fn with_start_time(mut self, start_time: u64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_first_shelley_slot(mut self, first_shelley_slot: u64) -> Self {
        self.first_shelley_slot = first_shelley_slot;
        self
    }

    /// Mainnet parameters at the time of writing. Prefer fetching them from a provider; only
    /// the Plutus V3 cost model is known here.
    pub fn mainnet() -> Self {
        Self::default()
            .with_fee_per_byte(44)
            .with_fee_constant(155381)
            .with_execution_price_mem(0.0577)
            .with_execution_price_cpu(7.21e-05)
            .with_collateral_percentage(150)
            .with_coins_per_utxo_byte(4310)
            .with_start_time(1506203091)
            .with_first_shelley_slot(4492800)
            .with_cost_model(
                PlutusVersion::V3,
                vec![
                    100788, 420, 1, 1, 1000, 173, 0, 1, 1000, 59957, 4, 1, 11183, 32, 201305, 8356,
                    4, 16000, 100, 16000, 100, 16000, 100, 16000, 100, 16000, 100, 16000, 100, 100,
                    100, 16000, 100, 94375, 32, 132994, 32, 61462, 4, 72010, 178, 0, 1, 22151, 32,
                    91189, 769, 4, 2, 85848, 123203, 7305, -900, 1716, 549, 57, 85848, 0, 1, 1,
                    1000, 42921, 4, 2, 24548, 29498, 38, 1, 898148, 27279, 1, 51775, 558, 1, 39184,
                    1000, 60594, 1, 141895, 32, 83150, 32, 15299, 32, 76049, 1, 13169, 4, 22100,
                    10, 28999, 74, 1, 28999, 74, 1, 43285, 552, 1, 44749, 541, 1, 33852, 32, 68246,
                    32, 72362, 32, 7243, 32, 7391, 32, 11546, 32, 85848, 123203, 7305, -900, 1716,
                    549, 57, 85848, 0, 1, 90434, 519, 0, 1, 74433, 32, 85848, 123203, 7305, -900,
                    1716, 549, 57, 85848, 0, 1, 1, 85848, 123203, 7305, -900, 1716, 549, 57, 85848,
                    0, 1, 955506, 213312, 0, 2, 270652, 22588, 4, 1457325, 64566, 4, 20467, 1, 4,
                    0, 141992, 32, 100788, 420, 1, 1, 81663, 32, 59498, 32, 20142, 32, 24588, 32,
                    20744, 32, 25933, 32, 24623, 32, 43053543, 10, 53384111, 14333, 10, 43574283,
                    26308, 10, 16000, 100, 16000, 100, 962335, 18, 2780678, 6, 442008, 1, 52538055,
                    3756, 18, 267929, 18, 76433006, 8868, 18, 52948122, 18, 1995836, 36, 3227919,
                    12, 901022, 1, 166917843, 4307, 36, 284546, 36, 158221314, 26549, 36, 74698472,
                    36, 333849714, 1, 254006273, 72, 2174038, 72, 2261318, 64571, 4, 207616, 8310,
                    4, 1293828, 28716, 63, 0, 1, 1006041, 43623, 251, 0, 1, 100181, 726, 719, 0, 1,
                    100181, 726, 719, 0, 1, 100181, 726, 719, 0, 1, 107878, 680, 0, 1, 95336, 1,
                    281145, 18848, 0, 1, 180194, 159, 1, 1, 158519, 8942, 0, 1, 159378, 8813, 0, 1,
                    107490, 3298, 1, 106057, 655, 1, 1964219, 24520, 3,
                ],
            )
    }

    pub fn preprod() -> Self {
        Self::mainnet()
            .with_start_time(1654041600)
            .with_first_shelley_slot(86400)
    }

    pub fn preview() -> Self {
        Self::mainnet()
            .with_start_time(1666656000)
            .with_first_shelley_slot(0)
    }
}

// -------------------------------------------------------------- Converting (to)

impl From<&ProtocolParameters> for uplc::tx::SlotConfig {
    fn from(params: &ProtocolParameters) -> Self {
        let byron_slot_length = 20; // in seconds
        Self {
            slot_length: 1000, // Shelley slot length, in milliseconds
            zero_slot: params.first_shelley_slot,
            zero_time: (params.start_time + byron_slot_length * params.first_shelley_slot) * 1000,
        }
    }
}
