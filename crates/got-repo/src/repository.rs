use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::atomic::write_atomic;
use crate::config::RepoConfig;
use crate::error::{RepoError, RepoResult};

/// Name of the hidden storage directory inside a worktree.
pub const GOT_DIR: &str = ".got";

/// Branch that a fresh `HEAD` points at.
pub const DEFAULT_BRANCH: &str = "master";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

/// Directories that must exist below `.got/` for the repository to be usable.
const REQUIRED_DIRS: &[&[&str]] = &[
    &["branches"],
    &["objects"],
    &["refs", "tags"],
    &["refs", "heads"],
];

const CONFIG_FILE: &str = "config";

/// Characters that are forbidden anywhere in a branch name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Options for [`Repository::init_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitOptions {
    /// Branch name written into `HEAD`.
    pub default_branch: String,
    /// Contents of the `description` file.
    pub description: String,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            default_branch: DEFAULT_BRANCH.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Handle to an initialized repository.
///
/// Holds the absolute worktree path and the parsed metadata. The handle owns
/// no open files, so it is cheap to clone and safe to share between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    worktree: PathBuf,
    got_dir: PathBuf,
    config: RepoConfig,
}

impl Repository {
    /// Initialize a repository at `path` with default options.
    pub fn init(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::init_with(path, &InitOptions::default())
    }

    /// Initialize a repository at `path`.
    ///
    /// `path` may be missing (it is created) or an empty directory. A
    /// non-empty directory or a file is rejected before anything is written.
    pub fn init_with(path: impl AsRef<Path>, options: &InitOptions) -> RepoResult<Self> {
        validate_branch_name(&options.default_branch)?;
        let path = path.as_ref();
        let requested = std::path::absolute(path).map_err(|source| RepoError::InvalidPath {
            path: path.to_path_buf(),
            source,
        })?;

        match fs::metadata(&requested) {
            Ok(meta) if !meta.is_dir() => return Err(RepoError::NotADirectory(requested)),
            Ok(_) => {
                let mut entries = fs::read_dir(&requested).map_err(|source| {
                    RepoError::InvalidPath {
                        path: requested.clone(),
                        source,
                    }
                })?;
                if entries.next().is_some() {
                    return Err(RepoError::NotEmpty(requested));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&requested).map_err(RepoError::io(&requested))?;
            }
            Err(source) => {
                return Err(RepoError::InvalidPath {
                    path: requested,
                    source,
                })
            }
        }

        let worktree = canonicalize(&requested)?;
        let config = RepoConfig::default();

        // Populate `.got` inside a sibling staging directory, then rename it
        // into the worktree so the subtree appears all at once.
        let staging = tempfile::Builder::new()
            .prefix(".got-init-")
            .tempdir_in(&worktree)
            .map_err(RepoError::io(&worktree))?;
        let staged = staging.path().join(GOT_DIR);
        create_got_dir(&staged)?;
        populate(&staged, options, &config)?;

        let got_dir = worktree.join(GOT_DIR);
        fs::rename(&staged, &got_dir).map_err(RepoError::io(&got_dir))?;

        info!(
            worktree = %worktree.display(),
            branch = %options.default_branch,
            "initialized repository"
        );
        Ok(Self {
            worktree,
            got_dir,
            config,
        })
    }

    /// Open the repository whose worktree is exactly `path`.
    pub fn load(path: impl AsRef<Path>) -> RepoResult<Self> {
        let worktree = canonicalize(path.as_ref())?;
        Self::load_canonical(worktree)
    }

    /// Open the repository containing `path`, searching parent directories.
    pub fn find(path: impl AsRef<Path>) -> RepoResult<Self> {
        let start = canonicalize(path.as_ref())?;
        let mut current = start.as_path();
        loop {
            if current.join(GOT_DIR).is_dir() {
                debug!(
                    start = %start.display(),
                    worktree = %current.display(),
                    "found repository"
                );
                return Self::load_canonical(current.to_path_buf());
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return Err(RepoError::NoRepositoryFound(start)),
            }
        }
    }

    fn load_canonical(worktree: PathBuf) -> RepoResult<Self> {
        let got_dir = worktree.join(GOT_DIR);
        let not_a_repo = |reason: String| RepoError::NotARepository {
            path: worktree.clone(),
            reason,
        };

        if !got_dir.is_dir() {
            return Err(not_a_repo(format!("missing {GOT_DIR} directory")));
        }
        for segments in REQUIRED_DIRS {
            let dir = join_all(&got_dir, segments.iter());
            if !dir.is_dir() {
                return Err(not_a_repo(format!(
                    "missing {GOT_DIR}/{} directory",
                    segments.join("/")
                )));
            }
        }

        let config_path = got_dir.join(CONFIG_FILE);
        let raw = match fs::read_to_string(&config_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(not_a_repo(format!("missing {GOT_DIR}/{CONFIG_FILE}")));
            }
            Err(e) => return Err(RepoError::io(&config_path)(e)),
        };
        let config = RepoConfig::from_toml_str(&raw)
            .map_err(|e| not_a_repo(format!("unparsable {GOT_DIR}/{CONFIG_FILE}: {e}")))?;
        if !config.is_supported() {
            return Err(not_a_repo(format!(
                "unsupported repositoryformatversion {}",
                config.core.repository_format_version
            )));
        }

        Ok(Self {
            worktree,
            got_dir,
            config,
        })
    }

    /// Join `segments` onto the `.got` directory.
    ///
    /// ```
    /// # use got_repo::Repository;
    /// # let dir = tempfile::tempdir().unwrap();
    /// let repo = Repository::init(dir.path()).unwrap();
    /// let p = repo.path_to(["objects", "ab"]);
    /// assert!(p.ends_with(".got/objects/ab"));
    /// ```
    pub fn path_to<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        join_all(&self.got_dir, segments)
    }

    /// Absolute path of the working directory.
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    /// Absolute path of the `.got` directory.
    pub fn got_dir(&self) -> &Path {
        &self.got_dir
    }

    /// Directory holding loose objects.
    pub fn objects_dir(&self) -> PathBuf {
        self.path_to(["objects"])
    }

    /// Parsed `config` metadata.
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }
}

fn populate(dir: &Path, options: &InitOptions, config: &RepoConfig) -> RepoResult<()> {
    for segments in REQUIRED_DIRS {
        let sub = join_all(dir, segments.iter());
        fs::create_dir_all(&sub).map_err(RepoError::io(&sub))?;
    }

    let markers = [
        ("description", options.description.clone()),
        ("HEAD", format!("ref: refs/heads/{}\n", options.default_branch)),
        (CONFIG_FILE, config.to_toml_string()?),
    ];
    for (name, contents) in markers {
        let path = dir.join(name);
        write_atomic(&path, contents.as_bytes()).map_err(RepoError::io(&path))?;
    }
    Ok(())
}

/// Create the storage root with mode 0o775, still filtered through the
/// process umask.
fn create_got_dir(path: &Path) -> RepoResult<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o775);
    }
    builder.create(path).map_err(RepoError::io(path))
}

fn join_all<I, S>(base: &Path, segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut path = base.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    path
}

fn canonicalize(path: &Path) -> RepoResult<PathBuf> {
    fs::canonicalize(path).map_err(|source| RepoError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_branch_name(name: &str) -> RepoResult<()> {
    let invalid = |reason: &str| {
        Err(RepoError::InvalidBranchName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };
    if name.is_empty() {
        return invalid("branch name must not be empty");
    }
    if name.contains(FORBIDDEN_CHARS) {
        return invalid("contains a forbidden character");
    }
    if name.contains("..") || name.contains("//") {
        return invalid("must not contain '..' or '//'");
    }
    if name.starts_with(['.', '/']) || name.ends_with(['.', '/']) || name.ends_with(".lock") {
        return invalid("must not start or end with '.' or '/', or end with '.lock'");
    }
    Ok(())
}
