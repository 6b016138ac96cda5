//! Settings, solution and result files read and written by the `folio-runtime` binary.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use folio_challenges::portfolio::Solution;
use folio_structs::config::RunConfig;
use folio_utils::{compress_obj, decompress_obj, dejsonify, jsonify_pretty};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

/// `None` gives the defaults. Otherwise `settings` is a path ending in `.json` or a json string.
pub fn load_settings(settings: Option<&str>) -> Result<RunConfig> {
    let Some(settings) = settings else {
        return Ok(RunConfig::default());
    };
    let settings = if settings.ends_with(".json") {
        fs::read_to_string(settings)
            .map_err(|e| anyhow!("Failed to read settings file {}: {}", settings, e))?
    } else {
        settings.to_string()
    };

    dejsonify::<RunConfig>(&settings).map_err(|e| anyhow!("Failed to parse settings: {}", e))
}

/// Reads a solution from `-` (stdin), a `.zlib` file, a `.json` file or a json string.
pub fn load_solution(solution: &str) -> Result<Solution> {
    let map = if solution.ends_with(".zlib") {
        let bytes = fs::read(solution)
            .map_err(|e| anyhow!("Failed to read solution file {}: {}", solution, e))?;
        decompress_obj::<Map<String, Value>>(&bytes)?
    } else {
        let text = if solution == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow!("Failed to read solution from stdin: {}", e))?;
            buffer
        } else if solution.ends_with(".json") {
            fs::read_to_string(solution)
                .map_err(|e| anyhow!("Failed to read solution file {}: {}", solution, e))?
        } else {
            solution.to_string()
        };
        dejsonify::<Map<String, Value>>(&text)
            .map_err(|e| anyhow!("Failed to parse solution: {}", e))?
    };
    solution_from_map(map)
}

/// Accepts a bare solution or the output of `solve`, which nests it under `solution`.
pub fn solution_from_map(mut map: Map<String, Value>) -> Result<Solution> {
    if let Some(Value::Object(nested)) = map.remove("solution") {
        map = nested;
    }
    Solution::try_from(map).map_err(|e| anyhow!("Invalid solution: {}", e))
}

/// Where results requested at `path` are written.
///
/// A directory gets a `results_<YYYYmmdd_HHMMSS>.json` file inside it, and compressed
/// output always ends in `.zlib` so [`load_solution`] reads it back as zlib.
pub fn output_path(path: &Path, compress: bool, now: DateTime<Utc>) -> PathBuf {
    let path = if path.is_dir() {
        path.join(format!("results_{}.json", now.format("%Y%m%d_%H%M%S")))
    } else {
        path.to_path_buf()
    };
    if compress && path.extension().map_or(true, |ext| ext != "zlib") {
        let mut name = path.into_os_string();
        name.push(".zlib");
        PathBuf::from(name)
    } else {
        path
    }
}

pub fn write_output<T: Serialize>(path: &Path, data: &T, compress: bool) -> Result<()> {
    if compress {
        fs::write(path, compress_obj(data)?)?;
    } else {
        fs::write(path, jsonify_pretty(data)?)?;
    }
    Ok(())
}
