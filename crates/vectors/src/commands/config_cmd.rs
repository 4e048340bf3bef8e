//! Config command implementation

use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use super::GlobalArgs;

/// Print the effective configuration and the directories derived from it
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let config = global.resolve()?;
    let layout = config.layout();

    if global.json {
        let output = json!({
            "config": config,
            "layout": {
                "provisioningCbor": layout.provisioning_cbor(),
                "verificationCbor": layout.verification_cbor(),
                "verificationJson": layout.verification_json(),
                "verificationKeys": layout.verification_keys(),
            }
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let show = |p: &Option<PathBuf>| match p {
        Some(p) => p.display().to_string(),
        None => "(unset)".to_string(),
    };

    println!("root:              {}", config.paths.root.display());
    println!("work_dir:          {}", show(&config.paths.work_dir));
    println!("cocli_templates:   {}", show(&config.paths.cocli_templates));
    println!("evcli_templates:   {}", show(&config.paths.evcli_templates));
    println!("cocli:             {}", config.tools.cocli);
    println!("evcli:             {}", config.tools.evcli);
    println!("go-psa:            {}", config.tools.go_psa);
    println!("go-cose-cli:       {}", config.tools.go_cose_cli);
    println!();
    println!("provisioning/cbor: {}", layout.provisioning_cbor().display());
    println!("verification/cbor: {}", layout.verification_cbor().display());
    println!("verification/json: {}", layout.verification_json().display());
    println!("verification/keys: {}", layout.verification_keys().display());
    Ok(())
}
