//! Whole-glyph operations which can be chained from the command line.

/// Macro to declare filters with less boilerplate
///
/// Usage: `declare_filters! { TypeName(module_name) => "cli_name", ... }`
macro_rules! declare_filters {
    ($($(#[$meta:meta])* $type:ident($module:ident) => $name:literal),* $(,)?) => {
        // Import modules
        $(
            $(#[$meta])*
            mod $module;
        )*

        // Re-export types
        $(
            $(#[$meta])*
            pub use $module::$type;
        )*

        // Generate filter_group function
        #[cfg(feature = "cli")]
        #[doc="Add filter arguments to a clap Command"]
        pub fn filter_group(mut command: clap::Command) -> clap::Command {
            command = command.next_help_heading("Outline filters");
            let mut ids = Vec::new();
            $(
                $(#[$meta])*
                {
                    let arg = $type::arg();
                    ids.push(arg.get_id().clone());
                    command = command.arg(arg);
                }
            )*
            command.group(clap::ArgGroup::new("filters").args(ids).multiple(true))
        }

        // Generate cli_to_filter function
        #[cfg(feature = "cli")]
        #[doc="Convert a CLI filter name and argument to an OutlineFilter instance"]
        pub fn cli_to_filter(name: &str, arg: &str) -> Result<Box<dyn OutlineFilter>, crate::GeometryError> {
            Ok(match name {
                $(
                    $(#[$meta])*
                    $name => Box::new($type::from_str(arg)?),
                )*
                _ => {
                    return Err(crate::GeometryError::FilterError(format!(
                        "Unknown filter: {}",
                        name
                    )))
                }
            })
        }
    };
}

// Declare all filters in one place
declare_filters! {
    Tunnify(tunnify) => "tunnify",
    HarmonizeLines(harmonizelines) => "harmonizelines",
    HarmonizeJoints(harmonizejoints) => "harmonizejoints",
    AddInflections(addinflections) => "addinflections",
    Dekink(dekink) => "dekink",
}

/// A trait for filters that can be applied to the outlines of a glyph
pub trait OutlineFilter {
    /// Apply the filter to every master of the given glyph
    fn apply(&self, masters: &mut crate::MasterSet) -> Result<(), crate::GeometryError>;

    /// Parse an OutlineFilter from a string argument
    fn from_str(s: &str) -> Result<Self, crate::GeometryError>
    where
        Self: Sized;

    #[cfg(feature = "cli")]
    /// Get the clap argument for this filter
    fn arg() -> clap::Arg
    where
        Self: Sized;
}
