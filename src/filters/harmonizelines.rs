use crate::{filters::OutlineFilter, harmonize::harmonize_lines_path};

/// A filter that fits curve handles to the lines they continue smoothly
#[derive(Default)]
pub struct HarmonizeLines;

impl HarmonizeLines {
    /// Create a new HarmonizeLines filter
    pub fn new() -> Self {
        HarmonizeLines
    }
}

impl OutlineFilter for HarmonizeLines {
    fn apply(&self, masters: &mut crate::MasterSet) -> Result<(), crate::GeometryError> {
        log::info!("Harmonizing line joints of glyph '{}'", masters.glyph);
        for (id, outline) in masters.masters.iter_mut() {
            let mut adjusted = 0;
            for path in outline.paths.iter_mut() {
                adjusted += harmonize_lines_path(path)?.adjusted;
            }
            log::debug!("  {}: {} handles adjusted", id, adjusted);
        }
        Ok(())
    }

    fn from_str(_s: &str) -> Result<Self, crate::GeometryError>
    where
        Self: Sized,
    {
        Ok(HarmonizeLines::new())
    }

    #[cfg(feature = "cli")]
    fn arg() -> clap::Arg
    where
        Self: Sized,
    {
        clap::Arg::new("harmonizelines")
            .long("harmonize-lines")
            .help("Harmonize curve handles at smooth line-to-curve joints")
            .action(clap::ArgAction::SetTrue)
    }
}
