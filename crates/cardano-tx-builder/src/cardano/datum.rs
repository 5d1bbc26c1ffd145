//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Hash, PlutusData, pallas};
use std::fmt;

/// A datum attached to an [`Output`](crate::Output): either only its hash, or the data itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Datum {
    Hash(Hash<32>),
    Inline(PlutusData<'static>),
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Hash(hash) => write!(f, "Hash({hash})"),
            Datum::Inline(data) => write!(f, "Inline({data})"),
        }
    }
}

impl Datum {
    pub fn as_inline(&self) -> Option<&PlutusData<'static>> {
        match self {
            Datum::Inline(data) => Some(data),
            Datum::Hash(..) => None,
        }
    }
}

// ----------------------------------------------------------- Converting (from)

impl From<&pallas::DatumOption> for Datum {
    fn from(datum: &pallas::DatumOption) -> Self {
        match datum {
            pallas::DatumOption::Hash(hash) => Datum::Hash(Hash::from(hash)),
            pallas::DatumOption::Data(data) => Datum::Inline(PlutusData::from(data.0.clone())),
        }
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<&Datum> for pallas::DatumOption {
    fn from(datum: &Datum) -> Self {
        match datum {
            Datum::Hash(hash) => pallas::DatumOption::Hash(pallas::Hash::from(*hash)),
            Datum::Inline(data) => {
                pallas::DatumOption::Data(pallas::CborWrap(pallas::PlutusData::from(data.clone())))
            }
        }
    }
}
