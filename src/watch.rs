//! Poll files and folders for modification-time changes and rerun a build.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use ignore::WalkBuilder;

use crate::core::shutdown::ShutdownToken;
use crate::error::WatchError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Modification-time snapshot of every file under a set of roots.
#[derive(Debug)]
pub struct Watcher {
    roots: Vec<PathBuf>,
    last: HashMap<PathBuf, SystemTime>,
}

impl Watcher {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            last: HashMap::new(),
        }
    }

    /// Take a new snapshot and report whether anything was added, removed, or
    /// modified since the previous one. The first poll always reports a change.
    ///
    /// On error the previous snapshot is kept.
    pub fn poll(&mut self) -> Result<bool, WatchError> {
        let mut next = HashMap::with_capacity(self.last.len());
        let mut changed = false;

        for root in &self.roots {
            // Hidden and ignored files count too: build inputs are not filtered.
            let walker = WalkBuilder::new(root).standard_filters(false).build();
            for entry in walker {
                let entry = entry.map_err(|source| WatchError::Walk {
                    path: root.clone(),
                    source,
                })?;
                let metadata = entry.metadata().map_err(|source| WatchError::Walk {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                let modified = metadata.modified().map_err(|source| WatchError::Metadata {
                    path: entry.path().to_path_buf(),
                    source,
                })?;

                let path = entry.into_path();
                if self.last.get(&path) != Some(&modified) {
                    changed = true;
                }
                next.insert(path, modified);
            }
        }

        if self.last.keys().any(|path| !next.contains_key(path)) {
            changed = true;
        }
        self.last = next;
        Ok(changed)
    }
}

/// Passed to the build callback so it can check for newer changes mid-build.
pub struct Rebuild<'a> {
    watcher: &'a mut Watcher,
    restart: bool,
    error: Option<WatchError>,
}

impl Rebuild<'_> {
    /// Re-poll now. Once this has returned `true`, the build runs again right
    /// after the callback returns.
    pub fn changed_again(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.watcher.poll() {
            Ok(changed) => {
                self.restart |= changed;
                changed
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }
}

/// Poll `roots` every `interval` and call `build` whenever something changed.
///
/// Returns `Ok(())` once `shutdown` is cancelled. Poll errors, including ones
/// hit through [`Rebuild::changed_again`], end the loop.
pub fn watch_and_build<I, P, F>(
    roots: I,
    interval: Duration,
    shutdown: &ShutdownToken,
    mut build: F,
) -> Result<(), WatchError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
    F: FnMut(&mut Rebuild<'_>),
{
    let mut watcher = Watcher::new(roots);
    loop {
        loop {
            if shutdown.wait_timeout(interval) {
                return Ok(());
            }
            if watcher.poll()? {
                break;
            }
        }

        let mut restart = true;
        while restart {
            if shutdown.is_cancelled() {
                return Ok(());
            }
            tracing::debug!("change detected; building");
            let mut rebuild = Rebuild {
                watcher: &mut watcher,
                restart: false,
                error: None,
            };
            build(&mut rebuild);
            if let Some(err) = rebuild.error {
                return Err(err);
            }
            restart = rebuild.restart;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    use super::{watch_and_build, Watcher};
    use crate::core::shutdown::ShutdownToken;
    use crate::error::WatchError;

    fn touch(path: &Path, secs_after_epoch: u64) {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .expect("open file");
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
            .expect("set mtime");
    }

    #[test]
    fn first_poll_reports_change_then_settles() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.rs"), 100);

        let mut watcher = Watcher::new([dir.path()]);
        assert!(watcher.poll().expect("poll"));
        assert!(!watcher.poll().expect("poll"));
    }

    #[test]
    fn modification_addition_and_removal_are_changes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("src");
        fs::create_dir(&nested).expect("mkdir");
        let file = nested.join("main.rs");
        touch(&file, 100);

        let mut watcher = Watcher::new([dir.path()]);
        watcher.poll().expect("initial poll");

        touch(&file, 200);
        assert!(watcher.poll().expect("poll after modify"));
        assert!(!watcher.poll().expect("quiet poll"));

        touch(&nested.join(".hidden"), 100);
        assert!(watcher.poll().expect("poll after add"));

        fs::remove_file(&file).expect("remove");
        assert!(watcher.poll().expect("poll after remove"));
        assert!(!watcher.poll().expect("quiet poll"));
    }

    #[test]
    fn single_file_root_is_watched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("build.rs");
        touch(&file, 100);

        let mut watcher = Watcher::new([&file]);
        watcher.poll().expect("initial poll");
        touch(&file, 101);
        assert!(watcher.poll().expect("poll"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut watcher = Watcher::new([dir.path().join("missing")]);
        assert!(matches!(watcher.poll(), Err(WatchError::Walk { .. })));
    }

    #[test]
    fn build_runs_on_change_and_stops_on_shutdown() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.txt"), 100);
        let shutdown = ShutdownToken::new();

        let mut builds = 0;
        watch_and_build([dir.path()], Duration::from_millis(5), &shutdown, |_| {
            builds += 1;
            shutdown.cancel();
        })
        .expect("watch");
        assert_eq!(builds, 1);
    }

    #[test]
    fn change_seen_mid_build_restarts_immediately() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("a.txt");
        touch(&file, 100);
        let shutdown = ShutdownToken::new();

        let mut builds = 0;
        watch_and_build([dir.path()], Duration::from_millis(5), &shutdown, |rebuild| {
            builds += 1;
            if builds == 1 {
                touch(&file, 200);
                assert!(rebuild.changed_again());
                // Consumed by the previous poll, but the restart stays requested.
                assert!(!rebuild.changed_again());
            } else {
                shutdown.cancel();
            }
        })
        .expect("watch");
        assert_eq!(builds, 2);
    }

    #[test]
    fn error_during_rebuild_poll_ends_the_loop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("src");
        fs::create_dir(&root).expect("mkdir");
        touch(&root.join("a.txt"), 100);
        let shutdown = ShutdownToken::new();

        let result = watch_and_build([&root], Duration::from_millis(5), &shutdown, |rebuild| {
            fs::remove_dir_all(&root).expect("remove root");
            assert!(!rebuild.changed_again());
        });
        assert!(matches!(result, Err(WatchError::Walk { .. })));
    }
}
