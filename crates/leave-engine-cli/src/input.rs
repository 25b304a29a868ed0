use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use leave_engine::{parse_date_only, Override, Overrides, PlanInput};

/// Read the raw input text from a file, or stdin when the path is `-`.
pub fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read input from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read and deserialize a household input file.
pub fn load(path: &Path) -> Result<PlanInput> {
    let text = read_text(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse household JSON from {}", path.display()))
}

/// Apply one `--override` flag to `overrides`.
///
/// Accepts `DATE=DIRECTIVE` and `START..END=DIRECTIVE`. Unlike overrides
/// read from the input file, a malformed flag is an error.
pub fn apply_override_flag(overrides: &mut Overrides, flag: &str) -> Result<()> {
    let Some((dates, directive)) = flag.split_once('=') else {
        bail!("override '{flag}' must look like DATE=DIRECTIVE");
    };
    let directive: Override = directive
        .parse()
        .with_context(|| format!("in override '{flag}'"))?;

    match dates.split_once("..") {
        Some((start, end)) => {
            overrides
                .insert_range(start, end, directive)
                .with_context(|| format!("in override '{flag}'"))?;
        }
        None => {
            let date = parse_date_only(dates).with_context(|| format!("in override '{flag}'"))?;
            overrides.insert(date, directive);
        }
    }
    Ok(())
}
