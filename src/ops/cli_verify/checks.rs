//! The tools a runtime install must ship, and the output each must print.

use super::types::CliCheck;

/// Matches `1.2.3` with an optional pre-release tail such as `.rc1`.
pub const VERSION_RE: &str = r"(\d{1,2}\.\d{1,2}\.\d{1,2}(\.[a-z0-9.]+)?)";

/// The default check list, in reporting order.
pub fn default_checks() -> Vec<CliCheck> {
    let v = VERSION_RE;
    vec![
        CliCheck::new("bundle -v", format!(r"\A(?:Bundler version )?{v}")),
        CliCheck::new("erb --version", format!(r"\A{v}")),
        CliCheck::new("gem --version", format!(r"\A{v}")),
        CliCheck::new("irb --version", format!(r"\Airb +{v}")),
        CliCheck::new("racc --version", format!(r"\Aracc version {v}")),
        CliCheck::new("rake -V", format!(r"\Arake, version {v}")),
        CliCheck::new("rbs -v", format!(r"\Arbs {v}")),
        CliCheck::new("rdbg -v", format!(r"\Ardbg {v}")),
        CliCheck::new("rdoc -v", format!(r"\A{v}")),
        CliCheck::new("test-unit --version", format!(r"\A(?:test-unit )?{v}")),
        CliCheck::new("typeprof --version", format!(r"{v}\z")),
    ]
}
