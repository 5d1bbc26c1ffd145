//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{ProtocolParameters, pallas};
use std::fmt;

/// Memory and cpu budget spent by one script execution. Ordered by memory first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExecutionUnits {
    mem: u64,
    cpu: u64,
}

impl fmt::Display for ExecutionUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ mem: {}, cpu: {} }}", self.mem, self.cpu)
    }
}

impl ExecutionUnits {
    pub fn new(mem: u64, cpu: u64) -> Self {
        Self { mem, cpu }
    }

    pub fn mem(&self) -> u64 {
        self.mem
    }

    pub fn cpu(&self) -> u64 {
        self.cpu
    }

    /// What executing within this budget costs, in lovelace.
    pub fn cost(&self, params: &ProtocolParameters) -> u64 {
        params.price_mem(self.mem) + params.price_cpu(self.cpu)
    }
}

impl From<pallas::ExUnits> for ExecutionUnits {
    fn from(ex_units: pallas::ExUnits) -> Self {
        Self::new(ex_units.mem, ex_units.steps)
    }
}

impl From<ExecutionUnits> for pallas::ExUnits {
    fn from(ex_units: ExecutionUnits) -> Self {
        pallas::ExUnits {
            mem: ex_units.mem,
            steps: ex_units.cpu,
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{ExecutionUnits, ProtocolParameters, any, pallas};
    use proptest::prelude::*;

    #[test]
    fn cost_rounds_each_price_up() {
        let params = ProtocolParameters::default()
            .with_execution_price_mem(0.0577)
            .with_execution_price_cpu(7.21e-05);
        // ceil(1000 * 0.0577) + ceil(1_000_000 * 7.21e-05)
        assert_eq!(ExecutionUnits::new(1000, 1_000_000).cost(&params), 58 + 73);
    }

    #[test]
    fn ordered_by_memory_first() {
        assert!(ExecutionUnits::new(1, 100) < ExecutionUnits::new(2, 0));
        assert!(ExecutionUnits::new(1, 0) < ExecutionUnits::new(1, 1));
    }

    proptest! {
        #[test]
        fn pallas_roundtrip(execution_units in any::execution_units()) {
            let execution_units_back = ExecutionUnits::from(pallas::ExUnits::from(execution_units));
            prop_assert_eq!(execution_units, execution_units_back);
        }
    }

    pub mod generators {
        use super::*;

        prop_compose! {
            pub fn execution_units()(mem in 0u64..14_000_000, cpu in 0u64..10_000_000_000) -> ExecutionUnits {
                ExecutionUnits::new(mem, cpu)
            }
        }
    }
}
