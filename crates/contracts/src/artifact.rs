use {
    alloy::{
        dyn_abi::{DynSolValue, JsonAbiExt},
        json_abi::JsonAbi,
        primitives::Bytes,
    },
    serde::Deserialize,
    std::{
        ffi::OsStr,
        path::{Path, PathBuf},
    },
    thiserror::Error,
    walkdir::WalkDir,
};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no artifact for contract {name} found in {dir:?}")]
    NotFound { name: String, dir: PathBuf },
    #[error("found multiple artifacts for contract {name}: {paths:?}")]
    Ambiguous { name: String, paths: Vec<PathBuf> },
    #[error("failed to read artifact {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact")]
    Parse(#[from] serde_json::Error),
    #[error("contract {0} has no bytecode, it is either abstract or an interface")]
    NotDeployable(String),
    #[error("contract {0} references external libraries that need to be linked first")]
    NeedsLinking(String),
    #[error("contract {name} has malformed bytecode")]
    InvalidBytecode {
        name: String,
        #[source]
        source: const_hex::FromHexError,
    },
    #[error("contract {name} has no constructor but {count} arguments were provided")]
    UnexpectedArguments { name: String, count: usize },
    #[error("arguments do not match the constructor of contract {name}")]
    Encoding {
        name: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },
}

/// A compiled contract: its ABI and creation bytecode.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// On-disk layout. Hardhat stores the bytecode as a hex string, Foundry
/// nests it in an object next to the link references.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    #[serde(default)]
    contract_name: String,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl Artifact {
    /// Searches `dir` recursively for the artifact of contract `name`
    /// (`<name>.json`) and returns its path.
    pub fn find(dir: &Path, name: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut paths: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| {
                entry.file_type().is_file() && entry.file_name() == OsStr::new(&file_name)
            })
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        match paths.len() {
            0 => Err(ArtifactError::NotFound {
                name: name.to_string(),
                dir: dir.to_path_buf(),
            }),
            1 => Ok(paths.remove(0)),
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                paths,
            }),
        }
    }

    /// Finds and loads the artifact of contract `name` below `dir`.
    pub fn find_and_load(dir: &Path, name: &str) -> Result<Self, ArtifactError> {
        let path = Self::find(dir, name)?;
        let mut artifact = Self::load(&path)?;
        if artifact.contract_name.is_empty() {
            artifact.contract_name = name.to_string();
        }
        Ok(artifact)
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        tracing::debug!(?path, "loading contract artifact");
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let name = raw.contract_name;
        let hex = match raw.bytecode {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        };

        // Unlinked library references are left as `__$<hash>$__` placeholders.
        if hex.contains("__") {
            return Err(ArtifactError::NeedsLinking(name));
        }
        let bytecode = const_hex::decode(hex.trim())
            .map_err(|source| ArtifactError::InvalidBytecode {
                name: name.clone(),
                source,
            })?;
        if bytecode.is_empty() {
            return Err(ArtifactError::NotDeployable(name));
        }

        Ok(Self {
            contract_name: name,
            abi: raw.abi,
            bytecode: bytecode.into(),
        })
    }

    /// Returns the code of a contract creation transaction: the creation
    /// bytecode followed by the ABI encoded constructor arguments.
    pub fn creation_code(&self, args: &[DynSolValue]) -> Result<Bytes, ArtifactError> {
        let encoded_args = match self.abi.constructor() {
            Some(constructor) => {
                constructor
                    .abi_encode_input(args)
                    .map_err(|source| ArtifactError::Encoding {
                        name: self.contract_name.clone(),
                        source,
                    })?
            }
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(ArtifactError::UnexpectedArguments {
                    name: self.contract_name.clone(),
                    count: args.len(),
                });
            }
        };

        let mut code = Vec::with_capacity(self.bytecode.len() + encoded_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&encoded_args);
        Ok(code.into())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{Address, address},
        std::fs,
    };

    const BYTECODE: &str = "0x6080604052";

    fn hardhat_artifact(bytecode: &str) -> String {
        serde_json::json!({
            "_format": "hh-sol-artifact-1",
            "contractName": "DynamicWhitelist",
            "sourceName": "contracts/DynamicWhitelist.sol",
            "abi": [
                {
                    "inputs": [
                        {
                            "internalType": "address[]",
                            "name": "initialWhitelist",
                            "type": "address[]"
                        }
                    ],
                    "stateMutability": "nonpayable",
                    "type": "constructor"
                },
                {
                    "inputs": [
                        { "internalType": "address", "name": "account", "type": "address" }
                    ],
                    "name": "isWhitelisted",
                    "outputs": [{ "internalType": "bool", "name": "", "type": "bool" }],
                    "stateMutability": "view",
                    "type": "function"
                }
            ],
            "bytecode": bytecode,
            "deployedBytecode": "0x",
            "linkReferences": {},
            "deployedLinkReferences": {}
        })
        .to_string()
    }

    fn addresses(addresses: &[Address]) -> Vec<DynSolValue> {
        vec![DynSolValue::Array(
            addresses.iter().copied().map(DynSolValue::Address).collect(),
        )]
    }

    #[test]
    fn parses_hardhat_artifact() {
        let artifact = Artifact::from_json(&hardhat_artifact(BYTECODE)).unwrap();

        assert_eq!(artifact.contract_name, "DynamicWhitelist");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60u8, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.constructor().is_some());
    }

    #[test]
    fn parses_foundry_artifact() {
        let json = serde_json::json!({
            "abi": [],
            "bytecode": { "object": BYTECODE, "linkReferences": {} },
        })
        .to_string();

        let artifact = Artifact::from_json(&json).unwrap();

        assert_eq!(artifact.bytecode.len(), 5);
        assert!(artifact.abi.constructor().is_none());
    }

    #[test]
    fn rejects_interfaces() {
        let err = Artifact::from_json(&hardhat_artifact("0x")).unwrap_err();
        assert!(matches!(err, ArtifactError::NotDeployable(name) if name == "DynamicWhitelist"));
    }

    #[test]
    fn rejects_unlinked_bytecode() {
        let bytecode = "0x6080__$2b1d7f5e5ab2e8a95b4ab4bbd1a8e9d8c1$__6040";
        let err = Artifact::from_json(&hardhat_artifact(bytecode)).unwrap_err();
        assert!(matches!(err, ArtifactError::NeedsLinking(_)));
    }

    #[test]
    fn appends_encoded_constructor_arguments() {
        let artifact = Artifact::from_json(&hardhat_artifact(BYTECODE)).unwrap();
        let account = address!("0x010149cBd3dC42860EA6901fa36328b2dfaFC3DA");

        let code = artifact.creation_code(&addresses(&[account])).unwrap();

        // offset, length and a single padded address
        assert_eq!(code.len(), 5 + 3 * 32);
        assert_eq!(&code[..5], artifact.bytecode.as_ref());
        assert_eq!(code[5 + 31], 0x20);
        assert_eq!(code[5 + 63], 1);
        assert_eq!(&code[code.len() - 20..], account.as_slice());
    }

    #[test]
    fn encodes_empty_whitelist() {
        let artifact = Artifact::from_json(&hardhat_artifact(BYTECODE)).unwrap();

        let code = artifact.creation_code(&addresses(&[])).unwrap();

        assert_eq!(code.len(), 5 + 2 * 32);
        assert!(code[5 + 32..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn rejects_mismatching_arguments() {
        let artifact = Artifact::from_json(&hardhat_artifact(BYTECODE)).unwrap();

        let err = artifact.creation_code(&[]).unwrap_err();
        assert!(matches!(err, ArtifactError::Encoding { .. }));

        let err = artifact
            .creation_code(&[DynSolValue::Bool(true)])
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Encoding { .. }));
    }

    #[test]
    fn rejects_arguments_without_constructor() {
        let json = serde_json::json!({
            "contractName": "Empty",
            "abi": [],
            "bytecode": BYTECODE,
        })
        .to_string();
        let artifact = Artifact::from_json(&json).unwrap();

        assert_eq!(artifact.creation_code(&[]).unwrap().len(), 5);
        let err = artifact.creation_code(&addresses(&[])).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::UnexpectedArguments { count: 1, .. }
        ));
    }

    #[test]
    fn finds_artifact_by_contract_name() {
        let dir = tempfile::tempdir().unwrap();
        let contract_dir = dir.path().join("contracts/DynamicWhitelist.sol");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::write(
            contract_dir.join("DynamicWhitelist.json"),
            hardhat_artifact(BYTECODE),
        )
        .unwrap();
        fs::write(contract_dir.join("DynamicWhitelist.dbg.json"), "{}").unwrap();

        let path = Artifact::find(dir.path(), "DynamicWhitelist").unwrap();
        assert_eq!(path, contract_dir.join("DynamicWhitelist.json"));

        let artifact = Artifact::find_and_load(dir.path(), "DynamicWhitelist").unwrap();
        assert_eq!(artifact.contract_name, "DynamicWhitelist");
    }

    #[test]
    fn reports_missing_and_ambiguous_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::find(dir.path(), "DynamicWhitelist").unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound { .. }));

        for source in ["a/DynamicWhitelist.sol", "b/DynamicWhitelist.sol"] {
            let contract_dir = dir.path().join(source);
            fs::create_dir_all(&contract_dir).unwrap();
            fs::write(contract_dir.join("DynamicWhitelist.json"), "{}").unwrap();
        }
        let err = Artifact::find(dir.path(), "DynamicWhitelist").unwrap_err();
        assert!(matches!(err, ArtifactError::Ambiguous { paths, .. } if paths.len() == 2));
    }
}
