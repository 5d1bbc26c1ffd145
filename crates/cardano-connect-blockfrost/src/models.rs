//! Conversion of Blockfrost responses into ledger types.

use anyhow::{Context, anyhow};
use blockfrost_openapi::models::{
    AddressUtxoContentInner, EpochParamContent, TxContentOutputAmountInner, TxContentUtxo,
};
use cardano_tx_builder::{
    Address, AssetId, Datum, Hash, Input, Network, Output, PlutusData, PlutusVersion,
    ProtocolParameters, Utxo, Value, cbor,
};
use log::warn;
use std::collections::BTreeMap;

const UNIT_LOVELACE: &str = "lovelace";

/// `GET /txs/{hash}/utxos`
pub(crate) fn tx_utxos(response: TxContentUtxo) -> anyhow::Result<Vec<Utxo>> {
    let transaction_id: Hash<32> = response.hash.parse()?;
    response
        .outputs
        .into_iter()
        .map(|output| {
            let input = Input::new(transaction_id, u64::try_from(output.output_index)?);
            let output = into_output(
                &output.address,
                &output.amount,
                output.data_hash,
                output.inline_datum,
            )
            .with_context(|| format!("malformed output at {input}"))?;
            Ok(Utxo::new(input, output))
        })
        .collect()
}

/// `GET /addresses/{address}/utxos`
pub(crate) fn address_utxo(utxo: AddressUtxoContentInner) -> anyhow::Result<Utxo> {
    let input = Input::new(utxo.tx_hash.parse()?, u64::try_from(utxo.output_index)?);
    let output = into_output(
        &utxo.address,
        &utxo.amount,
        utxo.data_hash,
        utxo.inline_datum,
    )
    .with_context(|| format!("malformed output at {input}"))?;
    Ok(Utxo::new(input, output))
}

/// `GET /epochs/latest/parameters`
///
/// Fetched parameters override the defaults of the network; the slot configuration always
/// comes from the latter.
pub(crate) fn protocol_parameters(
    network: Network,
    params: &EpochParamContent,
) -> anyhow::Result<ProtocolParameters> {
    let mut protocol_parameters = ProtocolParameters::from(network)
        .with_fee_per_byte(u64::try_from(params.min_fee_a)?)
        .with_fee_constant(u64::try_from(params.min_fee_b)?);

    if let Some(price_mem) = params.price_mem {
        protocol_parameters = protocol_parameters.with_execution_price_mem(price_mem);
    }

    if let Some(price_step) = params.price_step {
        protocol_parameters = protocol_parameters.with_execution_price_cpu(price_step);
    }

    if let Some(collateral_percent) = params.collateral_percent {
        protocol_parameters =
            protocol_parameters.with_collateral_percentage(u64::try_from(collateral_percent)?);
    }

    if let Some(coins_per_utxo_size) = &params.coins_per_utxo_size {
        protocol_parameters = protocol_parameters.with_coins_per_utxo_byte(
            coins_per_utxo_size
                .parse()
                .with_context(|| format!("malformed coins_per_utxo_size: {coins_per_utxo_size}"))?,
        );
    }

    // Raw cost models come as an untyped JSON object, possibly null.
    let cost_models: Option<BTreeMap<String, Vec<i64>>> =
        serde_json::from_value(serde_json::to_value(&params.cost_models_raw)?)
            .context("malformed cost models")?;

    for (language, cost_model) in cost_models.unwrap_or_default() {
        match language.parse::<PlutusVersion>() {
            Ok(version) => {
                protocol_parameters = protocol_parameters.with_cost_model(version, cost_model)
            }
            Err(e) => warn!("ignoring cost model for unknown language {language}: {e}"),
        }
    }

    Ok(protocol_parameters)
}

fn into_output(
    address: &str,
    amount: &[TxContentOutputAmountInner],
    data_hash: Option<String>,
    inline_datum: Option<String>,
) -> anyhow::Result<Output> {
    let address = Address::try_from(address)?;

    let mut value = Value::default();
    for TxContentOutputAmountInner { unit, quantity } in amount {
        let quantity: u64 = quantity
            .parse()
            .with_context(|| format!("malformed quantity of {unit}: {quantity}"))?;
        if unit == UNIT_LOVELACE {
            value.with_lovelace(quantity);
        } else {
            value = value.with_asset(&unit.parse::<AssetId>()?, quantity);
        }
    }

    let output = Output::new(address, value);

    // Blockfrost reports the hash of inline datums too; the inline form prevails.
    match (inline_datum, data_hash) {
        (Some(inline_datum), _) => {
            let bytes = hex::decode(&inline_datum)
                .map_err(|e| anyhow!(e).context("malformed inline datum"))?;
            let data: PlutusData<'static> = cbor::decode(&bytes)
                .map_err(|e| anyhow!("{e}").context("malformed inline datum"))?;
            Ok(output.with_inline_datum(data))
        }
        (None, Some(data_hash)) => Ok(output.with_datum(Datum::Hash(data_hash.parse()?))),
        (None, None) => Ok(output),
    }
}
