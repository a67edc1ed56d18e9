//! Default mount backend.

use std::path::{Component, Path};
use std::sync::Arc;

use chain_meta::{PluginDatabase, PluginSpec, PluginStatus};

use super::{BackendInterface, MountBackendInterface, SerializeInterface, has_role};
use crate::constants::{MOUNTPOINTS_PATH, RESOLVER_ROLE, STORAGE_ROLE};
use crate::error::{Error, Result};
use crate::keyset::{KeySet, escape_segment, serialize_plugins};

/// Namespaces a mountpoint may start with, besides the cascading `/`.
const NAMESPACES: &[&str] = &["system", "user", "spec", "dir"];

/// Backend holding one resolver, one storage and any number of other plugins.
///
/// Serialized below `system/chain/mountpoints/<escaped mountpoint>`:
///
/// ```text
/// <base>                     = <mountpoint>
/// <base>/config/path         = <config file>
/// <base>/config/<key>        = backend configuration
/// <base>/plugins/#0          = <name>#<ref>
/// <base>/plugins/#0/name     = <name>
/// <base>/plugins/#0/ref      = <ref>
/// <base>/plugins/#0/config/… = plugin configuration
/// ```
pub struct MountBackend {
    database: Arc<dyn PluginDatabase>,
    plugins: Vec<PluginSpec>,
    resolver: Option<String>,
    storage: Option<String>,
    mountpoint: String,
    backend_config: KeySet,
    config_file: String,
}

impl MountBackend {
    pub fn new(database: Arc<dyn PluginDatabase>) -> Self {
        Self {
            database,
            plugins: Vec::new(),
            resolver: None,
            storage: None,
            mountpoint: String::new(),
            backend_config: KeySet::new(),
            config_file: String::new(),
        }
    }

    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Key below which this backend is serialized.
    pub fn base_key(&self) -> String {
        format!("{}/{}", MOUNTPOINTS_PATH, escape_segment(&self.mountpoint))
    }

    fn check_role(slot: &Option<String>, role: &str, plugin: &PluginSpec) -> Result<()> {
        match slot {
            Some(existing) => Err(Error::RoleConflict {
                role: role.to_string(),
                existing: existing.clone(),
                plugin: plugin.full_name(),
            }),
            None => Ok(()),
        }
    }
}

impl BackendInterface for MountBackend {
    fn add_plugin(&mut self, plugin: &PluginSpec) -> Result<()> {
        if self.database.status(plugin) == PluginStatus::Missing {
            return Err(chain_meta::Error::PluginNotFound {
                name: plugin.name().to_string(),
            }
            .into());
        }

        let is_resolver = has_role(self.database.as_ref(), plugin, RESOLVER_ROLE)?;
        let is_storage = has_role(self.database.as_ref(), plugin, STORAGE_ROLE)?;
        if is_resolver {
            Self::check_role(&self.resolver, RESOLVER_ROLE, plugin)?;
        }
        if is_storage {
            Self::check_role(&self.storage, STORAGE_ROLE, plugin)?;
        }

        if is_resolver {
            self.resolver = Some(plugin.full_name());
        }
        if is_storage {
            self.storage = Some(plugin.full_name());
        }
        self.plugins.push(plugin.clone());
        Ok(())
    }
}

impl SerializeInterface for MountBackend {
    fn serialize(&self, ret: &mut KeySet) -> Result<()> {
        if self.mountpoint.is_empty() {
            return Err(Error::InvalidMountpoint {
                mountpoint: String::new(),
                reason: "no mountpoint set".to_string(),
            });
        }

        let base = self.base_key();
        ret.insert(base.clone(), self.mountpoint.clone());
        ret.insert(format!("{}/config/path", base), self.config_file.clone());
        for (key, value) in &self.backend_config {
            ret.insert(format!("{}/config/{}", base, key), value.clone());
        }
        serialize_plugins(&format!("{}/plugins", base), &self.plugins, ret);
        Ok(())
    }
}

impl MountBackendInterface for MountBackend {
    fn set_mountpoint(&mut self, mountpoint: &str, mount_conf: &KeySet) -> Result<()> {
        validate_mountpoint(mountpoint)?;

        let key = format!("{}/{}", MOUNTPOINTS_PATH, escape_segment(mountpoint));
        if mount_conf.contains_key(&key) {
            return Err(Error::MountpointInUse {
                mountpoint: mountpoint.to_string(),
            });
        }

        self.mountpoint = mountpoint.to_string();
        Ok(())
    }

    fn mountpoint(&self) -> &str {
        &self.mountpoint
    }

    fn set_backend_config(&mut self, config: &KeySet) {
        self.backend_config = config.clone();
    }

    fn use_config_file(&mut self, file: &str) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidConfigFile {
            file: file.to_string(),
            reason: reason.to_string(),
        };

        if file.is_empty() {
            return Err(invalid("file name must not be empty"));
        }
        if Path::new(file)
            .components()
            .any(|c| c == Component::ParentDir)
        {
            return Err(invalid("file name must not contain '..'"));
        }
        if self.resolver.is_none() {
            return Err(invalid("no resolver plugin to resolve the file"));
        }

        self.config_file = file.to_string();
        Ok(())
    }

    fn validated(&self) -> bool {
        self.resolver.is_some() && self.storage.is_some()
    }

    fn status(&self) -> String {
        let mut problems = Vec::new();
        if self.resolver.is_none() {
            problems.push("No resolver plugin added");
        }
        if self.storage.is_none() {
            problems.push("No storage plugin added");
        }

        if problems.is_empty() {
            "The backend is valid and ready to be mounted".to_string()
        } else {
            problems.join("\n")
        }
    }
}

/// Check that `mountpoint` names a key a backend can be mounted at.
pub fn validate_mountpoint(mountpoint: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidMountpoint {
        mountpoint: mountpoint.to_string(),
        reason: reason.to_string(),
    };

    if mountpoint.is_empty() {
        return Err(invalid("mountpoint must not be empty"));
    }
    if mountpoint == "/" {
        return Ok(());
    }
    if mountpoint.contains("//") || mountpoint.ends_with('/') {
        return Err(invalid("must not contain empty key name parts"));
    }
    if mountpoint.starts_with('/') {
        return Ok(());
    }

    let namespace = mountpoint.split('/').next().unwrap_or_default();
    if !NAMESPACES.contains(&namespace) {
        return Err(invalid("must start with '/' or one of system, user, spec, dir"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_meta::{MemoryPluginDatabase, PluginManifest};
    use rstest::rstest;

    fn backend() -> MountBackend {
        let database = MemoryPluginDatabase::new()
            .with(PluginManifest::new("resolver").with_provides(&["resolver"]))
            .with(PluginManifest::new("dump").with_provides(&["storage"]))
            .with(PluginManifest::new("ini").with_provides(&["storage"]))
            .with(PluginManifest::new("sync"));
        MountBackend::new(Arc::new(database))
    }

    fn spec(name: &str) -> PluginSpec {
        PluginSpec::new(name).unwrap()
    }

    #[rstest]
    #[case("/")]
    #[case("/app")]
    #[case("system/app")]
    #[case("user/app/nested")]
    #[case("spec")]
    #[case("dir")]
    fn test_valid_mountpoints(#[case] mountpoint: &str) {
        assert!(validate_mountpoint(mountpoint).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("app")]
    #[case("proc/app")]
    #[case("user//app")]
    #[case("//app")]
    #[case("/a//b")]
    #[case("user/")]
    #[case("/app/")]
    fn test_invalid_mountpoints(#[case] mountpoint: &str) {
        let err = validate_mountpoint(mountpoint).unwrap_err();
        assert!(matches!(err, Error::InvalidMountpoint { .. }));
    }

    #[test]
    fn test_validated_needs_resolver_and_storage() {
        let mut b = backend();
        assert!(!b.validated());
        assert!(b.status().contains("No resolver"));
        assert!(b.status().contains("No storage"));

        b.add_plugin(&spec("resolver")).unwrap();
        b.add_plugin(&spec("dump")).unwrap();
        b.add_plugin(&spec("sync")).unwrap();
        assert!(b.validated());
        assert!(b.status().contains("ready"));
    }

    #[test]
    fn test_role_matched_by_plugin_name() {
        let database = MemoryPluginDatabase::new()
            .with(PluginManifest::new("resolver"))
            .with(PluginManifest::new("storage"));
        let mut b = MountBackend::new(Arc::new(database));
        b.add_plugin(&spec("resolver")).unwrap();
        b.add_plugin(&spec("storage")).unwrap();
        assert!(b.validated());
        assert!(b.use_config_file("../app.ecf").is_err());
    }

    #[test]
    fn test_second_storage_rejected() {
        let mut b = backend();
        b.add_plugin(&spec("dump")).unwrap();
        let err = b.add_plugin(&spec("ini")).unwrap_err();
        assert!(matches!(err, Error::RoleConflict { ref role, .. } if role == "storage"));
        assert_eq!(b.plugins().len(), 1);
    }

    #[test]
    fn test_missing_plugin_rejected() {
        let mut b = backend();
        let err = b.add_plugin(&spec("nothing")).unwrap_err();
        assert!(matches!(
            err,
            Error::Meta(chain_meta::Error::PluginNotFound { .. })
        ));
    }

    #[test]
    fn test_mountpoint_in_use() {
        let mut b = backend();
        let mut mount_conf = KeySet::new();
        mount_conf.insert(
            format!("{}/user\\/app", MOUNTPOINTS_PATH),
            "user/app".to_string(),
        );

        let err = b.set_mountpoint("user/app", &mount_conf).unwrap_err();
        assert!(matches!(err, Error::MountpointInUse { .. }));
        assert!(b.set_mountpoint("user/other", &mount_conf).is_ok());
        assert_eq!(b.mountpoint(), "user/other");
    }

    #[test]
    fn test_config_file_requires_resolver() {
        let mut b = backend();
        let err = b.use_config_file("app.ecf").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigFile { .. }));

        b.add_plugin(&spec("resolver")).unwrap();
        assert!(b.use_config_file("../app.ecf").is_err());
        b.use_config_file("app.ecf").unwrap();
        assert_eq!(b.config_file(), "app.ecf");
    }

    #[test]
    fn test_serialize_without_mountpoint_fails() {
        let b = backend();
        let mut ks = KeySet::new();
        assert!(b.serialize(&mut ks).is_err());
        assert!(ks.is_empty());
    }
}
