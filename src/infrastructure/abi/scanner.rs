//! Artifact scanner - discovers compiled contracts in a build directory

use std::fs;
use std::path::Path;
use std::time::Instant;

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::domain::{ContractArtifact, ContractRegistry};

/// Artifacts larger than this are skipped
const MAX_ARTIFACT_BYTES: u64 = 5 * 1024 * 1024;

/// Build directory scanner
///
/// Understands solc `--abi --bin` output (`Name.abi` + `Name.bin`) and
/// forge/hardhat JSON artifacts (`Name.json` with `abi` and `bytecode`).
pub struct ArtifactScanner;

impl ArtifactScanner {
    /// Scan a build directory and register every artifact found
    pub fn scan(root: impl AsRef<Path>) -> ContractRegistry {
        let started = Instant::now();
        let root = root.as_ref();
        let mut registry = ContractRegistry::new();
        let mut candidates = Vec::new();
        let mut errors = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("abi" | "json")
            ) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    errors.push(format!("{}: {}", path.display(), err));
                    continue;
                }
            };
            if metadata.len() > MAX_ARTIFACT_BYTES {
                continue;
            }

            candidates.push(path.to_path_buf());
        }

        // Registration order decides selector resolution, keep it stable.
        candidates.sort();

        for path in &candidates {
            match Self::load_artifact(path) {
                Ok(Some(artifact)) => {
                    tracing::debug!(contract = %artifact.name, path = %path.display(), "loaded artifact");
                    registry.add(artifact);
                }
                Ok(None) => {}
                Err(err) => errors.push(format!("{}: {:#}", path.display(), err)),
            }
        }

        registry.scanned_files = candidates.len();
        registry.scan_errors = errors;
        registry.scan_ms = started.elapsed().as_millis();

        registry
    }

    /// Load a single artifact; `Ok(None)` for JSON files that carry no ABI
    fn load_artifact(path: &Path) -> Result<Option<ContractArtifact>> {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            return Ok(None);
        };

        let (abi, bytecode) = if path.extension().and_then(|s| s.to_str()) == Some("abi") {
            let abi: JsonAbi = serde_json::from_str(&fs::read_to_string(path)?)
                .context("invalid ABI")?;
            let bin = path.with_extension("bin");
            let bytecode = if bin.is_file() {
                Self::parse_bytecode(&fs::read_to_string(&bin)?)
                    .with_context(|| format!("invalid bytecode in {}", bin.display()))?
            } else {
                None
            };
            (abi, bytecode)
        } else {
            let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            let Some(abi_value) = value.get("abi") else {
                return Ok(None);
            };
            let abi: JsonAbi = serde_json::from_value(abi_value.clone()).context("invalid ABI")?;
            let bytecode = match value.get("bytecode") {
                Some(serde_json::Value::String(hex)) => Self::parse_bytecode(hex)?,
                Some(object) => match object.get("object").and_then(|o| o.as_str()) {
                    Some(hex) => Self::parse_bytecode(hex)?,
                    None => None,
                },
                None => None,
            };
            (abi, bytecode)
        };

        Ok(Some(ContractArtifact {
            name: name.to_string(),
            abi,
            bytecode,
            source: path.to_path_buf(),
        }))
    }

    /// Decode hex bytecode; empty input means "nothing to deploy"
    fn parse_bytecode(text: &str) -> Result<Option<Bytes>> {
        let trimmed = text.trim();
        let payload = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if payload.is_empty() {
            return Ok(None);
        }
        Ok(Some(Bytes::from(hex::decode(payload)?)))
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| matches!(name, ".git" | "target" | "node_modules" | "cache"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME_ABI: &str = r#"[
        {"type":"function","name":"menu","inputs":[{"name":"token","type":"bytes32"}],"outputs":[],"stateMutability":"view"},
        {"type":"event","name":"Menu_Title","inputs":[{"name":"menu","type":"string","indexed":false},{"name":"title","type":"string","indexed":false}],"anonymous":false}
    ]"#;

    #[test]
    fn test_scan_solc_pairs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Home.abi"), HOME_ABI).unwrap();
        fs::write(dir.path().join("Home.bin"), "6080604052\n").unwrap();
        fs::write(dir.path().join("IHome.abi"), HOME_ABI).unwrap();

        let registry = ArtifactScanner::scan(dir.path());
        assert!(registry.scan_errors.is_empty(), "{:?}", registry.scan_errors);
        assert_eq!(registry.len(), 2);

        let home = registry.contract("Home").unwrap();
        assert_eq!(home.bytecode.as_ref().unwrap().to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(registry.contract("IHome").unwrap().bytecode.is_none());
        assert!(registry.resolve_selector("menu").is_some());
    }

    #[test]
    fn test_scan_forge_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("Home.sol");
        fs::create_dir_all(&out).unwrap();
        let artifact = format!(r#"{{"abi":{HOME_ABI},"bytecode":{{"object":"0x6080"}}}}"#);
        fs::write(out.join("Home.json"), artifact).unwrap();
        fs::write(out.join("meta.json"), r#"{"compiler":"solc"}"#).unwrap();

        let cache = dir.path().join("cache");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("Stale.json"), format!(r#"{{"abi":{HOME_ABI}}}"#)).unwrap();

        let registry = ArtifactScanner::scan(dir.path());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.contract("Home").unwrap().bytecode.as_ref().unwrap().len(),
            2
        );
    }

    #[test]
    fn test_scan_records_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Broken.abi"), "not json").unwrap();

        let registry = ArtifactScanner::scan(dir.path());
        assert!(registry.is_empty());
        assert_eq!(registry.scan_errors.len(), 1);
        assert!(registry.scan_errors[0].contains("Broken.abi"));
    }

    #[test]
    fn test_parse_bytecode() {
        assert_eq!(ArtifactScanner::parse_bytecode("  0x  ").unwrap(), None);
        assert_eq!(
            ArtifactScanner::parse_bytecode("0xdead\n").unwrap(),
            Some(Bytes::from(vec![0xde, 0xad]))
        );
        assert!(ArtifactScanner::parse_bytecode("zz").is_err());
    }

    #[test]
    fn test_is_ignored_dir() {
        assert!(ArtifactScanner::is_ignored_dir(Path::new(".git")));
        assert!(ArtifactScanner::is_ignored_dir(Path::new("node_modules")));
        assert!(!ArtifactScanner::is_ignored_dir(Path::new("out")));
        assert!(!ArtifactScanner::is_ignored_dir(Path::new("build")));
    }
}
