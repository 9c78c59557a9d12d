use crate::{filters::OutlineFilter, insert::insert_inflections_in_masters, MasterId};

/// A filter that adds on-curve nodes at the inflections of every curve.
///
/// Inflections are found in one reference master (the first one, unless
/// named) and inserted at the same curve parameters in all masters.
#[derive(Default)]
pub struct AddInflections(Option<MasterId>);

impl AddInflections {
    /// Create a new AddInflections filter
    pub fn new(reference: Option<MasterId>) -> Self {
        AddInflections(reference)
    }
}

impl OutlineFilter for AddInflections {
    fn apply(&self, masters: &mut crate::MasterSet) -> Result<(), crate::GeometryError> {
        let group = masters.ids();
        let Some(source) = self.0.clone().or_else(|| group.first().cloned()) else {
            return Ok(());
        };
        log::info!(
            "Adding inflections to glyph '{}' using master {}",
            masters.glyph,
            source
        );
        let path_count = masters.get(&source)?.paths.len();
        for path_index in 0..path_count {
            insert_inflections_in_masters(masters, &source, &group, path_index)?;
        }
        Ok(())
    }

    fn from_str(s: &str) -> Result<Self, crate::GeometryError>
    where
        Self: Sized,
    {
        let s = s.trim();
        Ok(AddInflections::new(if s.is_empty() {
            None
        } else {
            Some(MasterId::from(s))
        }))
    }

    #[cfg(feature = "cli")]
    fn arg() -> clap::Arg
    where
        Self: Sized,
    {
        clap::Arg::new("addinflections")
            .long("add-inflections")
            .help("Add nodes at curve inflections, measured in the given master")
            .value_name("MASTER")
            .num_args(0..=1)
            .default_missing_value("")
            .action(clap::ArgAction::Append)
    }
}
