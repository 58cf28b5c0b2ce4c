//! Mapping filesystem paths to public URLs.
//!
//! The resource engine never reads process-wide state to find out where the
//! site lives. It is handed a [`Storage`]: the [`StorageConfig`] plus a
//! [`PathResolver`] capability. [`RootResolver`] is the stock resolver, a
//! plain prefix swap from `filesystem_root` to `public_root`.

use crate::config::StorageConfig;
use std::path::{Component, Path, PathBuf};

/// Turns an absolute filesystem path into the URL it is served at.
pub trait PathResolver {
    /// `None` when the path is not publicly reachable.
    fn resolve(&self, path: &Path) -> Option<String>;
}

/// Replaces the filesystem root prefix with the public URL prefix.
///
/// With root `/var/www/site` and public root `https://example.com/`,
/// `/var/www/site/img/a.jpg` resolves to `https://example.com/img/a.jpg`.
/// Paths outside the root, or climbing out of it with `..`, do not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootResolver {
    filesystem_root: PathBuf,
    public_root: String,
}

impl RootResolver {
    pub fn new(filesystem_root: impl Into<PathBuf>, public_root: impl Into<String>) -> Self {
        Self {
            filesystem_root: filesystem_root.into(),
            public_root: public_root.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.filesystem_root, &config.public_root)
    }
}

impl PathResolver for RootResolver {
    fn resolve(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.filesystem_root).ok()?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }

        let base = self.public_root.trim_end_matches('/');
        Some(format!("{}/{}", base, segments.join("/")))
    }
}

/// Everything a resource needs to know about where files live.
pub struct Storage {
    config: StorageConfig,
    resolver: Box<dyn PathResolver>,
}

impl Storage {
    /// Storage using a [`RootResolver`] built from the same config.
    pub fn new(config: StorageConfig) -> Self {
        let resolver = RootResolver::from_config(&config);
        Self::with_resolver(config, resolver)
    }

    pub fn with_resolver(config: StorageConfig, resolver: impl PathResolver + 'static) -> Self {
        Self {
            config,
            resolver: Box::new(resolver),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver.as_ref()
    }

    pub fn url_for(&self, path: &Path) -> Option<String> {
        self.resolver.resolve(path)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> RootResolver {
        RootResolver::new("/var/www/site", "https://example.com/")
    }

    #[test]
    fn resolves_path_under_root() {
        assert_eq!(
            resolver().resolve(Path::new("/var/www/site/img/a.jpg")),
            Some("https://example.com/img/a.jpg".into())
        );
    }

    #[test]
    fn public_root_without_trailing_slash() {
        let r = RootResolver::new("/var/www/site", "/media");
        assert_eq!(
            r.resolve(Path::new("/var/www/site/a/b.png")),
            Some("/media/a/b.png".into())
        );
    }

    #[test]
    fn root_itself_resolves_to_public_root() {
        assert_eq!(
            resolver().resolve(Path::new("/var/www/site")),
            Some("https://example.com/".into())
        );
    }

    #[test]
    fn path_outside_root_does_not_resolve() {
        assert_eq!(resolver().resolve(Path::new("/etc/passwd")), None);
        assert_eq!(resolver().resolve(Path::new("/var/www/sites/a.jpg")), None);
    }

    #[test]
    fn parent_components_do_not_resolve() {
        assert_eq!(
            resolver().resolve(Path::new("/var/www/site/../secret/a.jpg")),
            None
        );
    }

    #[test]
    fn storage_uses_custom_resolver() {
        struct Fixed;
        impl PathResolver for Fixed {
            fn resolve(&self, _path: &Path) -> Option<String> {
                Some("fixed".into())
            }
        }

        let storage = Storage::with_resolver(StorageConfig::default(), Fixed);
        assert_eq!(storage.url_for(Path::new("/anywhere")), Some("fixed".into()));
    }

    #[test]
    fn storage_default_resolver_follows_config() {
        let storage = Storage::new(StorageConfig {
            filesystem_root: "/srv".into(),
            public_root: "/pub/".into(),
            ..StorageConfig::default()
        });
        assert_eq!(
            storage.url_for(Path::new("/srv/x/y.gif")),
            Some("/pub/x/y.gif".into())
        );
    }
}
