//! `vrd project` — derive a scoped projection from a full document.

use std::path::Path;

use anyhow::{bail, Result};

use vrd_document::{to_json, ProjectionKind};

fn parse_profile(profile: &str) -> Result<ProjectionKind> {
    match profile {
        "cause-of-death" => Ok(ProjectionKind::CauseOfDeathCodedContent),
        "demographic" => Ok(ProjectionKind::DemographicCodedContent),
        "roster" => Ok(ProjectionKind::MortalityRoster),
        other => bail!("unknown projection profile `{other}` (expected cause-of-death, demographic or roster)"),
    }
}

pub fn run(file: &Path, profile: &str, alias: bool, out: Option<&Path>) -> Result<()> {
    let kind = parse_profile(profile)?;
    let doc = super::load_document(file, false)?;
    let projection = doc.project(kind, alias);
    let bytes = to_json(&projection)?;
    super::emit(&bytes, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_names() {
        assert_eq!(
            parse_profile("roster").unwrap(),
            ProjectionKind::MortalityRoster
        );
        assert!(parse_profile("everything").is_err());
    }
}
