//! Decoration of every member of a type.
//!
//! Each member becomes its own [`Profiled`] target named
//! `<TypeName>.<member>`, so members write separate reports by default.
//! With an explicit `output_file` all members share that file and the
//! last call wins.

use super::config::ProfileConfig;
use super::wrapper::{Profiled, ReportSettings};
use crate::utils::error::ConfigurationError;
use log::debug;
use std::panic::Location;

/// Wraps the members of one type with a shared configuration
///
/// **Public** - returned by [`decorate_type`]
#[derive(Debug, Clone)]
pub struct TypeProfiler {
    type_name: String,
    settings: ReportSettings,
}

/// Validate `config` once for all members of `T`
///
/// **Public** - type-level counterpart of `decorate`
///
/// # Errors
/// * `ConfigurationError` - invalid `sort_by`, raised before any member is wrapped
///
/// # Example
/// ```ignore
/// let members = decorate_type::<Inventory>(ProfileConfig::default())?;
/// let restock = members.member("restock", |inv: &mut Inventory, n: u32| inv.restock(n));
/// ```
pub fn decorate_type<T: ?Sized>(config: ProfileConfig) -> Result<TypeProfiler, ConfigurationError> {
    let settings = ReportSettings::from_config(config)?;
    let type_name = short_type_name(std::any::type_name::<T>()).to_string();
    debug!("Decorating members of {}", type_name);

    Ok(TypeProfiler {
        type_name,
        settings,
    })
}

impl TypeProfiler {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Qualified target name of a member
    pub fn qualified_name(&self, member: &str) -> String {
        format!("{}.{}", self.type_name, member)
    }

    /// Wrap one member
    ///
    /// Infallible: the configuration was validated by [`decorate_type`].
    #[track_caller]
    pub fn member<F>(&self, member: &str, target: F) -> Profiled<F> {
        Profiled::from_settings(
            self.qualified_name(member),
            Location::caller(),
            target,
            self.settings.clone(),
        )
    }
}

/// Type name without module path or generic arguments
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Inventory;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("my_crate::shop::Inventory"), "Inventory");
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec"
        );
        assert_eq!(short_type_name("u32"), "u32");
    }

    #[test]
    fn test_members_get_separate_files() {
        let members = decorate_type::<Inventory>(ProfileConfig::default()).unwrap();
        assert_eq!(members.type_name(), "Inventory");

        let restock = members.member("restock", |count: u32| count + 1);
        let audit = members.member("audit", || ());

        assert_eq!(restock.name(), "Inventory.restock");
        assert_eq!(restock.output_path(), PathBuf::from("Inventory.restock.prof"));
        assert_eq!(audit.output_path(), PathBuf::from("Inventory.audit.prof"));
    }

    #[test]
    fn test_members_share_explicit_file() {
        let members =
            decorate_type::<Inventory>(ProfileConfig::new().with_output_file("shop.prof")).unwrap();

        let restock = members.member("restock", |count: u32| count + 1);
        let audit = members.member("audit", || ());
        assert_eq!(restock.output_path(), audit.output_path());
    }

    #[test]
    fn test_invalid_config_rejected_eagerly() {
        let result = decorate_type::<Inventory>(ProfileConfig::new().with_sort_by("nope"));
        assert!(result.is_err());
    }
}
