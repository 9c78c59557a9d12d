use crate::{filters::OutlineFilter, harmonize::harmonize_joints_path};

/// A filter that slides smooth nodes between two curves to balance their
/// handles
#[derive(Default)]
pub struct HarmonizeJoints;

impl HarmonizeJoints {
    /// Create a new HarmonizeJoints filter
    pub fn new() -> Self {
        HarmonizeJoints
    }
}

impl OutlineFilter for HarmonizeJoints {
    fn apply(&self, masters: &mut crate::MasterSet) -> Result<(), crate::GeometryError> {
        log::info!("Harmonizing curve joints of glyph '{}'", masters.glyph);
        for (id, outline) in masters.masters.iter_mut() {
            let mut adjusted = 0;
            for path in outline.paths.iter_mut() {
                adjusted += harmonize_joints_path(path)?.adjusted;
            }
            log::debug!("  {}: {} nodes moved", id, adjusted);
        }
        Ok(())
    }

    fn from_str(_s: &str) -> Result<Self, crate::GeometryError>
    where
        Self: Sized,
    {
        Ok(HarmonizeJoints::new())
    }

    #[cfg(feature = "cli")]
    fn arg() -> clap::Arg
    where
        Self: Sized,
    {
        clap::Arg::new("harmonizejoints")
            .long("harmonize-joints")
            .help("Move smooth nodes between two curves to balance their handles")
            .action(clap::ArgAction::SetTrue)
    }
}
