//! Loads an analysis input directory from disk
//!
//! ```text
//! <input>/locations.json
//! <input>/artifacts.json
//! <input>/capabilities/*.json
//! <input>/variants/<name>/graph.json
//! <input>/variants/<name>/bytecode.json
//! <input>/variants/<name>/abi.json          (optional)
//! <input>/variants/<name>/sources.json      (optional)
//! <input>/variants/<name>/android-res.json  (optional)
//! ```

use crate::analysis::{AnalysisInput, VariantInput};
use crate::cache::{CacheKey, FactCache};
use crate::error::{AnalysisError, Result};
use crate::graph::{GraphViewBuilder, ResolutionResult};
use crate::model::{AndroidResSource, Location};
use crate::synthesis::{
    CapabilityRecord, DependencySynthesizer, ExplodingAbi, ExplodingBytecode,
    ExplodingSourceCode, PhysicalArtifact, ProjectVariantSynthesizer,
};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

const LOCATIONS: &str = "locations.json";
const ARTIFACTS: &str = "artifacts.json";
const CAPABILITIES_DIR: &str = "capabilities";
const VARIANTS_DIR: &str = "variants";

/// Reads input files through a shared [`FactCache`]
pub struct InputLoader<'a> {
    root: PathBuf,
    cache: &'a FactCache<Value>,
}

impl<'a> InputLoader<'a> {
    pub fn new(root: impl Into<PathBuf>, cache: &'a FactCache<Value>) -> Self {
        Self {
            root: root.into(),
            cache,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self) -> Result<AnalysisInput> {
        info!("Loading analysis input from {}", self.root.display());

        let locations: Vec<Location> = self.read_optional(&self.root.join(LOCATIONS))?;

        let mut synthesizer = DependencySynthesizer::new();
        let artifacts: Vec<PhysicalArtifact> = self.read(&self.root.join(ARTIFACTS))?;
        synthesizer.extend_artifacts(artifacts);

        let capability_files = self.json_files(&self.root.join(CAPABILITIES_DIR))?;
        let capabilities = capability_files
            .par_iter()
            .map(|path| self.read::<Vec<CapabilityRecord>>(path))
            .collect::<Result<Vec<_>>>()?;
        for records in capabilities {
            synthesizer.extend_capabilities(records);
        }
        let dependencies = synthesizer.build()?;

        let variant_dirs = self.variant_dirs()?;
        let variants = variant_dirs
            .par_iter()
            .map(|(name, dir)| self.load_variant(name, dir))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Loaded {} locations, {} dependencies, {} variants ({} files cached)",
            locations.len(),
            dependencies.len(),
            variants.len(),
            self.cache.len()
        );

        Ok(AnalysisInput {
            dependencies,
            locations: locations.into_iter().collect(),
            variants,
        })
    }

    fn load_variant(&self, name: &str, dir: &Path) -> Result<VariantInput> {
        trace!("Loading variant {} from {}", name, dir.display());

        let resolution: ResolutionResult = self.read(&dir.join("graph.json"))?;
        let graph = GraphViewBuilder::from_resolution(name, &resolution);

        let mut synthesizer = ProjectVariantSynthesizer::new(name, resolution.root.clone());
        let bytecode: Vec<ExplodingBytecode> = self.read(&dir.join("bytecode.json"))?;
        let abi: Vec<ExplodingAbi> = self.read_optional(&dir.join("abi.json"))?;
        let sources: Vec<ExplodingSourceCode> = self.read_optional(&dir.join("sources.json"))?;
        let res: Vec<AndroidResSource> = self.read_optional(&dir.join("android-res.json"))?;

        bytecode.into_iter().for_each(|b| synthesizer.add_bytecode(b));
        abi.into_iter().for_each(|a| synthesizer.add_abi(a));
        sources.into_iter().for_each(|s| synthesizer.add_source_code(s));
        res.into_iter().for_each(|r| synthesizer.add_android_res(r));

        Ok(VariantInput {
            project: synthesizer.build(&graph)?,
            graph,
        })
    }

    /// `variants/<name>` directories, sorted by name
    fn variant_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        let dir = self.root.join(VARIANTS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut variants = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(&dir, e))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            variants.push((name, entry.into_path()));
        }
        Ok(variants)
    }

    /// `*.json` files directly inside `dir`, sorted by name; none if `dir` is missing
    fn json_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let (key, bytes) = CacheKey::from_path(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let json = |source| AnalysisError::Json {
            path: path.to_path_buf(),
            source,
        };
        let value = self
            .cache
            .get_or_try_compute(key, || serde_json::from_slice::<Value>(&bytes))
            .map_err(json)?;
        serde::Deserialize::deserialize(&*value).map_err(json)
    }

    fn read_optional<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            trace!("No {}, treating as empty", path.display());
            return Ok(T::default());
        }
        self.read(path)
    }
}

fn walk_error(dir: &Path, error: walkdir::Error) -> AnalysisError {
    let path = error.path().unwrap_or(dir).to_path_buf();
    AnalysisError::Io {
        path,
        source: error.into(),
    }
}

/// Load `root` with a cache scoped to this call
pub fn load_input(root: &Path) -> Result<AnalysisInput> {
    let cache = FactCache::new();
    InputLoader::new(root, &cache).load()
}
