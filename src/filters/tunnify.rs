use crate::{
    filters::OutlineFilter,
    harmonize::{tunnify_path, HarmonizeMode},
};

/// A filter that balances the handles of every curve in every master
#[derive(Default)]
pub struct Tunnify(HarmonizeMode);

impl Tunnify {
    /// Create a new Tunnify filter
    pub fn new(mode: HarmonizeMode) -> Self {
        Tunnify(mode)
    }
}

impl OutlineFilter for Tunnify {
    fn apply(&self, masters: &mut crate::MasterSet) -> Result<(), crate::GeometryError> {
        log::info!("Tunnifying glyph '{}' ({:?})", masters.glyph, self.0);
        for (id, outline) in masters.masters.iter_mut() {
            let mut adjusted = 0;
            let mut unchanged = 0;
            for path in outline.paths.iter_mut() {
                let report = tunnify_path(path, self.0)?;
                adjusted += report.adjusted;
                unchanged += report.unchanged;
            }
            log::debug!(
                "  {}: {} segments adjusted, {} left alone",
                id,
                adjusted,
                unchanged
            );
        }
        Ok(())
    }

    fn from_str(s: &str) -> Result<Self, crate::GeometryError>
    where
        Self: Sized,
    {
        match s.trim() {
            "" | "mean" => Ok(Tunnify::new(HarmonizeMode::Mean)),
            "geometric" => Ok(Tunnify::new(HarmonizeMode::Geometric)),
            other => Err(crate::GeometryError::FilterError(format!(
                "Unknown tunnify mode '{}', expected 'mean' or 'geometric'",
                other
            ))),
        }
    }

    #[cfg(feature = "cli")]
    fn arg() -> clap::Arg
    where
        Self: Sized,
    {
        clap::Arg::new("tunnify")
            .long("tunnify")
            .help("Balance curve handles (mode: mean or geometric)")
            .value_name("MODE")
            .num_args(0..=1)
            .default_missing_value("mean")
            .action(clap::ArgAction::Append)
    }
}
