use crate::{dekink::dekink, filters::OutlineFilter, GeometryError, MasterId};

/// A filter that copies the relative position of one smooth-connection
/// node from a master to all the others
pub struct Dekink {
    source: MasterId,
    path: usize,
    node: usize,
}

impl Dekink {
    /// Create a new Dekink filter
    pub fn new(source: impl Into<MasterId>, path: usize, node: usize) -> Self {
        Dekink {
            source: source.into(),
            path,
            node,
        }
    }
}

impl OutlineFilter for Dekink {
    fn apply(&self, masters: &mut crate::MasterSet) -> Result<(), GeometryError> {
        log::info!(
            "Dekinking node {} of path {} in glyph '{}' from {}",
            self.node,
            self.path,
            masters.glyph,
            self.source
        );
        let group = masters.ids();
        let report = dekink(masters, &self.source, &group, self.path, self.node)?;
        if !report.skipped.is_empty() {
            log::warn!(
                "Could not dekink masters: {}",
                report
                    .skipped
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(())
    }

    fn from_str(s: &str) -> Result<Self, GeometryError>
    where
        Self: Sized,
    {
        let bad = || {
            GeometryError::FilterError(format!(
                "Bad dekink argument '{}', expected MASTER:PATH:NODE",
                s
            ))
        };
        // Master names may themselves contain colons
        let mut parts = s.trim().rsplitn(3, ':');
        let node = parts.next().and_then(|n| n.parse().ok()).ok_or_else(bad)?;
        let path = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let source = parts.next().filter(|m| !m.is_empty()).ok_or_else(bad)?;
        Ok(Dekink::new(source, path, node))
    }

    #[cfg(feature = "cli")]
    fn arg() -> clap::Arg
    where
        Self: Sized,
    {
        clap::Arg::new("dekink")
            .long("dekink")
            .help("Synchronize a smooth node across masters (MASTER:PATH:NODE)")
            .value_name("MASTER:PATH:NODE")
            .action(clap::ArgAction::Append)
    }
}
