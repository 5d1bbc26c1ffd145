//! Token metadata, as held in the inline datum of a CIP-68 reference token.
//!
//! The datum is `Constr 0 [metadata, version, extra]`, where `metadata` maps utf-8 encoded keys
//! to values, and `extra` is always empty here.

use anyhow::{Context, anyhow};
use cardano_tx_builder::PlutusData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the datum layout.
pub const DATUM_VERSION: u64 = 1;

pub type Metadata = BTreeMap<String, Metadatum>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metadatum {
    Int(i64),
    Text(String),
    List(Vec<Metadatum>),
    Map(BTreeMap<String, Metadatum>),
}

impl From<&str> for Metadatum {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<i64> for Metadatum {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&Metadatum> for PlutusData<'static> {
    fn from(metadatum: &Metadatum) -> Self {
        match metadatum {
            Metadatum::Int(i) => PlutusData::integer(*i),
            Metadatum::Text(text) => PlutusData::bytes(text.as_bytes()),
            Metadatum::List(elems) => PlutusData::list(elems.iter().map(PlutusData::from)),
            Metadatum::Map(map) => map_to_data(map),
        }
    }
}

impl TryFrom<&PlutusData<'_>> for Metadatum {
    type Error = anyhow::Error;

    fn try_from(data: &PlutusData<'_>) -> anyhow::Result<Self> {
        if let Some(bytes) = data.as_bytes() {
            return Ok(Self::Text(bytes_to_text(bytes)));
        }

        if let Some(elems) = data.as_list() {
            return elems
                .map(|elem| Self::try_from(&elem))
                .collect::<anyhow::Result<_>>()
                .map(Self::List);
        }

        if let Some(kvs) = data.as_map() {
            return map_from_data(kvs).map(Self::Map);
        }

        data.as_integer::<i64>()
            .map(Self::Int)
            .ok_or_else(|| anyhow!("unsupported metadatum: {data}"))
    }
}

/// The inline datum of a reference token carrying the given metadata.
pub fn to_datum(metadata: &Metadata) -> PlutusData<'static> {
    PlutusData::constr(
        0,
        [
            map_to_data(metadata),
            PlutusData::integer(DATUM_VERSION),
            PlutusData::list(vec![]),
        ],
    )
}

pub fn from_datum(datum: &PlutusData<'_>) -> anyhow::Result<Metadata> {
    let fields = datum
        .as_fields(0)
        .ok_or_else(|| anyhow!("not a reference token datum: {datum}"))?;

    let kvs = fields
        .first()
        .and_then(|metadata| metadata.as_map())
        .ok_or_else(|| anyhow!("reference token datum without a metadata map"))?;

    map_from_data(kvs).context("malformed reference token metadata")
}

fn map_to_data(map: &BTreeMap<String, Metadatum>) -> PlutusData<'static> {
    PlutusData::map(
        map.iter()
            .map(|(key, value)| (PlutusData::bytes(key.as_bytes()), PlutusData::from(value))),
    )
}

fn map_from_data<'a>(
    kvs: impl Iterator<Item = (PlutusData<'a>, PlutusData<'a>)>,
) -> anyhow::Result<BTreeMap<String, Metadatum>> {
    kvs.map(|(key, value)| {
        let key = key
            .as_bytes()
            .map(bytes_to_text)
            .ok_or_else(|| anyhow!("non-bytes metadata key: {key}"))?;
        let value = Metadatum::try_from(&value).with_context(|| format!("under key {key}"))?;
        Ok((key, value))
    })
    .collect()
}

/// Text when the bytes are valid utf-8, base16 otherwise.
fn bytes_to_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::{Metadata, Metadatum, from_datum, to_datum};
    use cardano_tx_builder::{PlutusData, cbor::ToCbor};
    use std::collections::BTreeMap;

    fn metadata() -> Metadata {
        serde_json::from_str(
            r#"{
                "name": "Nami",
                "image": "ipfs://QmRhTTbUrPYEw3mJGGhQqQST9k86v1DPBiTTWJGKDJsVFw",
                "edition": 7,
                "tags": ["wallet", "cat"],
                "traits": { "eyes": "green", "lives": 9 }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parse_json_metadata() {
        let metadata = metadata();
        assert_eq!(metadata.get("edition"), Some(&Metadatum::Int(7)));
        assert_eq!(metadata.get("name"), Some(&Metadatum::from("Nami")));
        assert_eq!(
            metadata.get("tags"),
            Some(&Metadatum::List(vec!["wallet".into(), "cat".into()]))
        );
        assert_eq!(
            metadata.get("traits"),
            Some(&Metadatum::Map(BTreeMap::from([
                ("eyes".to_string(), "green".into()),
                ("lives".to_string(), Metadatum::Int(9)),
            ])))
        );
    }

    #[test]
    fn datum_layout() {
        let metadata = Metadata::from([("name".to_string(), Metadatum::from("Nami"))]);

        assert_eq!(
            to_datum(&metadata),
            PlutusData::constr(
                0,
                [
                    PlutusData::map([(PlutusData::bytes(b"name"), PlutusData::bytes(b"Nami"))]),
                    PlutusData::integer(1),
                    PlutusData::list(vec![]),
                ]
            )
        );

        assert_eq!(
            to_datum(&metadata).to_cbor_hex(),
            "d8799fa1446e616d65444e616d690180ff"
        );
    }

    #[test]
    fn datum_back_to_metadata() {
        let metadata = metadata();
        assert_eq!(from_datum(&to_datum(&metadata)).unwrap(), metadata);
    }

    #[test]
    fn non_utf8_bytes_decode_as_base16() {
        let datum = PlutusData::constr(
            0,
            [
                PlutusData::map([(PlutusData::bytes(b"hash"), PlutusData::bytes([0xffu8, 0xfe]))]),
                PlutusData::integer(1),
                PlutusData::list(vec![]),
            ],
        );

        assert_eq!(
            from_datum(&datum).unwrap().get("hash"),
            Some(&Metadatum::from("fffe"))
        );
    }

    #[test]
    fn reject_malformed_datums() {
        assert!(from_datum(&PlutusData::constr(1, [])).is_err());
        assert!(from_datum(&PlutusData::constr(0, [PlutusData::integer(1)])).is_err());
        assert!(
            from_datum(&PlutusData::constr(
                0,
                [PlutusData::map([(
                    PlutusData::integer(1),
                    PlutusData::bytes(b"one")
                )])]
            ))
            .is_err()
        );
    }
}
