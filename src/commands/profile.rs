// ABOUTME: Profile command implementation.
// ABOUTME: Prints the settings an environment key resolves to.

use bascule::config::Config;
use bascule::diagnostics::Diagnostics;
use bascule::error::Result;
use bascule::output::{Output, OutputMode};
use std::path::Path;

use super::note_defaulted;

pub fn show_profile(dir: &Path, environment: Option<&str>, output: &Output) -> Result<()> {
    let config = Config::discover(dir)?;
    let profile = config.resolve_profile(environment)?;

    let mut diagnostics = Diagnostics::default();
    note_defaulted(&profile, &mut diagnostics);
    for warning in diagnostics.warnings() {
        output.warning(warning);
    }

    match output.mode() {
        OutputMode::Json => output.result("", &profile),
        OutputMode::Normal | OutputMode::Quiet => {
            print!("{}", serde_yaml::to_string(&profile)?);
        }
    }
    Ok(())
}
