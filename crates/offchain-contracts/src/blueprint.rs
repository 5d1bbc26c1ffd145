//! Plutus blueprints (CIP-57), as produced by the validators' compiler.
//!
//! Validators are handled as opaque bytecode: a blueprint only tells where to find them, and how
//! many parameters they expect.

use crate::error::BlueprintError;
use cardano_tx_builder::{PlutusData, PlutusScript, PlutusVersion, cbor::ToCbor};
use log::debug;
use serde::Deserialize;
use serde_with::{hex::Hex, serde_as};
use std::{fs, path::Path, str::FromStr};

#[derive(Debug, Clone, Deserialize)]
pub struct Blueprint {
    pub preamble: Preamble,
    pub validators: Vec<Validator>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preamble {
    pub title: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub plutus_version: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validator {
    pub title: String,
    /// CBOR-wrapped flat-encoded UPLC program.
    #[serde_as(as = "Hex")]
    pub compiled_code: Vec<u8>,
    #[serde(default)]
    pub hash: Option<String>,
    /// Parameter schemas; only their count matters here.
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,
}

impl Blueprint {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlueprintError> {
        let path = path.as_ref();
        debug!("loading blueprint from {}", path.display());
        fs::read_to_string(path)?.parse()
    }

    pub fn validator(&self, title: &str) -> Result<&Validator, BlueprintError> {
        self.validators
            .iter()
            .find(|validator| validator.title == title)
            .ok_or_else(|| BlueprintError::UnknownValidator(title.to_string()))
    }
}

impl FromStr for Blueprint {
    type Err = BlueprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Validator {
    /// The compiled code applied to the given parameters, in order. Without parameters, the code
    /// is returned unchanged.
    pub fn apply_params(&self, params: &[PlutusData<'_>]) -> Result<Vec<u8>, BlueprintError> {
        if !self.parameters.is_empty() && params.len() != self.parameters.len() {
            return Err(BlueprintError::ParameterMismatch {
                title: self.title.clone(),
                expected: self.parameters.len(),
                got: params.len(),
            });
        }

        if params.is_empty() {
            return Ok(self.compiled_code.clone());
        }

        let params = PlutusData::list(params.iter().cloned()).to_cbor();

        uplc::tx::apply_params_to_script(&params, &self.compiled_code).map_err(|e| {
            BlueprintError::ApplyParams {
                title: self.title.clone(),
                message: e.to_string(),
            }
        })
    }

    pub fn script(
        &self,
        version: PlutusVersion,
        params: &[PlutusData<'_>],
    ) -> Result<PlutusScript, BlueprintError> {
        Ok(PlutusScript::new(version, self.apply_params(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::Blueprint;
    use crate::error::BlueprintError;
    use cardano_tx_builder::{PlutusData, PlutusVersion, hash};

    const BLUEPRINT: &str = r#"{
        "preamble": {
            "title": "acme/contracts",
            "version": "0.0.0",
            "plutusVersion": "v3"
        },
        "validators": [
            {
                "title": "always.always.spend",
                "compiledCode": "46010100222601",
                "hash": "61a2f28177fecb2172720461ab5a517530e4dceac8e5b54c01cfb23f"
            },
            {
                "title": "gated.gated.mint",
                "compiledCode": "450101002261",
                "parameters": [
                    { "title": "owner", "schema": { "dataType": "bytes" } }
                ]
            }
        ]
    }"#;

    #[test]
    fn unparameterised_script() {
        let blueprint: Blueprint = BLUEPRINT.parse().unwrap();
        assert_eq!(blueprint.preamble.plutus_version.as_deref(), Some("v3"));

        let validator = blueprint.validator("always.always.spend").unwrap();
        assert_eq!(validator.apply_params(&[]).unwrap(), validator.compiled_code);

        let script = validator.script(PlutusVersion::V3, &[]).unwrap();
        assert_eq!(
            script.hash(),
            hash!("61a2f28177fecb2172720461ab5a517530e4dceac8e5b54c01cfb23f")
        );
    }

    #[test]
    fn parameterised_script() {
        let blueprint: Blueprint = BLUEPRINT.parse().unwrap();
        let validator = blueprint.validator("gated.gated.mint").unwrap();

        let applied = validator
            .apply_params(&[PlutusData::bytes([1u8; 28])])
            .unwrap();
        assert_ne!(applied, validator.compiled_code);

        let other = validator
            .apply_params(&[PlutusData::bytes([2u8; 28])])
            .unwrap();
        assert_ne!(applied, other);
    }

    #[test]
    fn parameter_count_mismatch() {
        let blueprint: Blueprint = BLUEPRINT.parse().unwrap();
        let validator = blueprint.validator("gated.gated.mint").unwrap();
        assert!(matches!(
            validator.apply_params(&[PlutusData::integer(0), PlutusData::integer(1)]),
            Err(BlueprintError::ParameterMismatch {
                expected: 1,
                got: 2,
                ..
            })
        ));
    }

    #[test]
    fn unknown_validator() {
        let blueprint: Blueprint = BLUEPRINT.parse().unwrap();
        assert!(matches!(
            blueprint.validator("nope.nope.spend"),
            Err(BlueprintError::UnknownValidator(title)) if title == "nope.nope.spend"
        ));
    }
}
