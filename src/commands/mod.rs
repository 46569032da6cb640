// ABOUTME: Command module aggregator for the bascule CLI.
// ABOUTME: Re-exports profile and rehearse command handlers.

mod profile;
mod rehearse;

pub use profile::show_profile;
pub use rehearse::rehearse;

use bascule::config::Profile;
use bascule::diagnostics::{Diagnostics, Warning};

/// Record a warning when the environment key fell back to a default profile.
fn note_defaulted(profile: &Profile, diagnostics: &mut Diagnostics) {
    if let bascule::config::ProfileSource::Defaulted { requested } = &profile.source {
        let fallback = profile.name.as_deref().unwrap_or("base settings");
        diagnostics.warn(Warning::profile_defaulted(format!(
            "no profile named {requested}, using {fallback}"
        )));
    }
}
