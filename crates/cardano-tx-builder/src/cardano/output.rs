//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Address, Datum, PlutusData, ProtocolParameters, Value, cbor, cbor::ToCbor, pallas};
use std::fmt;

pub mod change_strategy;

/// A transaction output: assets locked at an address, possibly alongside a datum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    address: Address,
    value: Value<u64>,
    datum: Option<Datum>,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = f.debug_struct("Output");
        output.field("address", &format_args!("{}", self.address));
        output.field("value", &format_args!("{}", self.value));
        if let Some(datum) = &self.datum {
            output.field("datum", &format_args!("{datum}"));
        }
        output.finish()
    }
}

// -------------------------------------------------------------------- Building

impl Output {
    /// See also [`output!`](crate::output!).
    pub fn new(address: Address, value: Value<u64>) -> Self {
        Self {
            address,
            value,
            datum: None,
        }
    }

    pub fn with_datum(mut self, datum: Datum) -> Self {
        self.datum = Some(datum);
        self
    }

    pub fn with_inline_datum(self, data: PlutusData<'static>) -> Self {
        self.with_datum(Datum::Inline(data))
    }

    /// Raise the lovelace held by the output to the minimum deposit, if it is below. Outputs
    /// already holding enough are left untouched.
    pub fn with_minimum_deposit(mut self, params: &ProtocolParameters) -> Self {
        // The deposit depends on the output size, which grows with the lovelace quantity.
        loop {
            let minimum = self.minimum_deposit(params);
            if self.value.lovelace() >= minimum {
                return self;
            }
            self.value.with_lovelace(minimum);
        }
    }
}

// ------------------------------------------------------------------ Inspecting

impl Output {
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn value(&self) -> &Value<u64> {
        &self.value
    }

    pub fn datum(&self) -> Option<&Datum> {
        self.datum.as_ref()
    }

    pub fn inline_datum(&self) -> Option<&PlutusData<'static>> {
        self.datum.as_ref()?.as_inline()
    }

    /// The minimum lovelace the ledger accepts in this output, as it currently is.
    pub fn minimum_deposit(&self, params: &ProtocolParameters) -> u64 {
        params.minimum_deposit(self.to_cbor().len() as u64)
    }
}

// ----------------------------------------------------------- Converting (from)

impl TryFrom<&pallas::TransactionOutput> for Output {
    type Error = anyhow::Error;

    fn try_from(output: &pallas::TransactionOutput) -> anyhow::Result<Self> {
        let (address, value, datum) = match output {
            pallas::TransactionOutput::Legacy(legacy) => (
                legacy.address.as_slice(),
                Value::from(&legacy.amount),
                legacy.datum_hash.as_ref().map(|hash| Datum::Hash(hash.into())),
            ),
            pallas::TransactionOutput::PostAlonzo(output) => (
                output.address.as_slice(),
                Value::from(&output.value),
                output.datum_option.as_ref().map(Datum::from),
            ),
        };

        Ok(Self {
            address: Address::try_from(address)
                .map_err(|e| e.context("invalid transaction output address"))?,
            value,
            datum,
        })
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<&Output> for pallas::TransactionOutput {
    fn from(output: &Output) -> Self {
        pallas::TransactionOutput::PostAlonzo(pallas::PostAlonzoTransactionOutput {
            address: pallas::Bytes::from(<Vec<u8>>::from(&output.address)),
            value: pallas::Value::from(&output.value),
            datum_option: output.datum.as_ref().map(pallas::DatumOption::from),
            script_ref: None,
        })
    }
}

// -------------------------------------------------------------------- Encoding

impl<C> cbor::Encode<C> for Output {
    fn encode<W: cbor::encode::write::Write>(
        &self,
        e: &mut cbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), cbor::encode::Error<W::Error>> {
        pallas::TransactionOutput::from(self).encode(e, ctx)
    }
}

impl<'d, C> cbor::Decode<'d, C> for Output {
    fn decode(d: &mut cbor::Decoder<'d>, ctx: &mut C) -> Result<Self, cbor::decode::Error> {
        let output: pallas::TransactionOutput = d.decode_with(ctx)?;
        Self::try_from(&output).map_err(cbor::decode::Error::message)
    }
}
