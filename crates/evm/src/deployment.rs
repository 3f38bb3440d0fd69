// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::JsonAbi,
    primitives::{Address, Bytes, TxHash, U256},
};
use anyhow::{anyhow, bail, Context, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A constructor argument. Only the primitive kinds the deploy scripts pass are supported.
///
/// Saved as `{"type": .., "value": ..}`. Plain json values as written by hardhat-deploy are read too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstructorArg {
    Address(Address),
    Uint(U256),
    Bool(bool),
    String(String),
}

impl ConstructorArg {
    /// Convert to an abi value of the parameter type declared by the constructor
    pub fn to_sol_value(&self, ty: &DynSolType) -> Result<DynSolValue> {
        use ConstructorArg::*;
        Ok(match (self, ty) {
            (Address(a), DynSolType::Address) => DynSolValue::Address(*a),
            (Uint(v), DynSolType::Uint(size)) => DynSolValue::Uint(*v, *size),
            (Bool(b), DynSolType::Bool) => DynSolValue::Bool(*b),
            (String(s), DynSolType::String) => DynSolValue::String(s.clone()),
            (String(s), DynSolType::Address) => DynSolValue::Address(
                s.parse::<alloy::primitives::Address>()
                    .map_err(|e| anyhow!("Invalid address argument {s:?}: {e}"))?,
            ),
            (String(s), DynSolType::Uint(size)) => DynSolValue::Uint(
                s.parse::<U256>()
                    .map_err(|e| anyhow!("Invalid uint argument {s:?}: {e}"))?,
                *size,
            ),
            (arg, ty) => bail!("Cannot pass {} as a constructor parameter of type {}", arg, ty),
        })
    }

    /// Read an argument from either the tagged form or a plain json value
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => n
                .as_u64()
                .map(|v| Self::Uint(U256::from(v)))
                .ok_or_else(|| anyhow!("Unsupported numeric argument {}", n)),
            Value::String(s) if s.len() == 42 && s.starts_with("0x") => match s.parse::<Address>() {
                Ok(address) => Ok(Self::Address(address)),
                Err(_) => Ok(Self::String(s.clone())),
            },
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Object(map) => match (map.get("type").and_then(Value::as_str), map.get("value")) {
                (Some("address"), Some(v)) => Ok(Self::Address(serde_json::from_value(v.clone())?)),
                (Some("uint"), Some(v)) => Ok(Self::Uint(serde_json::from_value(v.clone())?)),
                (Some("bool"), Some(Value::Bool(b))) => Ok(Self::Bool(*b)),
                (Some("string"), Some(Value::String(s))) => Ok(Self::String(s.clone())),
                // ethers BigNumber
                (Some("BigNumber"), _) => {
                    let hex = map
                        .get("hex")
                        .and_then(Value::as_str)
                        .ok_or_else(|| anyhow!("BigNumber argument without hex: {}", value))?;
                    Ok(Self::Uint(hex.parse::<U256>().map_err(|e| {
                        anyhow!("Invalid BigNumber argument {}: {}", hex, e)
                    })?))
                }
                _ => bail!("Unsupported constructor argument {}", value),
            },
            _ => bail!("Unsupported constructor argument {}", value),
        }
    }
}

impl<'de> Deserialize<'de> for ConstructorArg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConstructorArg::from_json(&value).map_err(de::Error::custom)
    }
}

impl From<Address> for ConstructorArg {
    fn from(value: Address) -> Self {
        ConstructorArg::Address(value)
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorArg::Address(a) => write!(f, "{a}"),
            ConstructorArg::Uint(v) => write!(f, "{v}"),
            ConstructorArg::Bool(b) => write!(f, "{b}"),
            ConstructorArg::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// ABI encode constructor arguments against the contract's declared constructor
pub fn encode_constructor_args(abi: &JsonAbi, args: &[ConstructorArg]) -> Result<Bytes> {
    let Some(constructor) = &abi.constructor else {
        if args.is_empty() {
            return Ok(Bytes::new());
        }
        bail!(
            "Contract has no constructor but {} arguments were given",
            args.len()
        );
    };

    if constructor.inputs.len() != args.len() {
        bail!(
            "Constructor expects {} arguments but {} were given",
            constructor.inputs.len(),
            args.len()
        );
    }

    let values = constructor
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param
                .resolve()
                .with_context(|| format!("Unsupported constructor parameter {}", param.name))?;
            arg.to_sol_value(&ty)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(constructor.abi_encode_input(&values)?.into())
}

/// The outcome of deploying one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Missing from hardhat-deploy records. The store fills it from the file name.
    #[serde(default)]
    pub contract_name: String,
    pub address: Address,
    pub args: Vec<ConstructorArg>,
    pub abi: JsonAbi,
    pub transaction_hash: Option<TxHash>,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    /// Blocks waited for on top of the deployment
    #[serde(default)]
    pub confirmations: u64,
}

impl DeploymentRecord {
    /// The contract's interface descriptor as written for the front end
    pub fn abi_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.abi)?)
    }
}

/// Deployed contracts by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deployments(BTreeMap<String, DeploymentRecord>);

impl Deployments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record replacing any earlier deployment of the same contract
    pub fn insert(&mut self, record: DeploymentRecord) -> Option<DeploymentRecord> {
        self.0.insert(record.contract_name.clone(), record)
    }

    pub fn get(&self, contract_name: &str) -> Option<&DeploymentRecord> {
        self.0.get(contract_name)
    }

    pub fn require(&self, contract_name: &str) -> Result<&DeploymentRecord> {
        self.get(contract_name)
            .ok_or_else(|| anyhow!("No deployment found for: {}", contract_name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeploymentRecord> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
