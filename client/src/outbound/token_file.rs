//! File-backed session persistence.
//!
//! The session lives in a single JSON file inside a capability-scoped
//! directory. Writes go to a staging file first and are renamed into place,
//! so a crash never leaves a half-written session behind. On Unix the file
//! is readable by its owner only.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(unix)]
use cap_std::fs::OpenOptionsExt;
use cap_std::fs::{Dir, OpenOptions};
use cap_std::ambient_authority;

use crate::domain::Session;
use crate::domain::ports::{TokenStore, TokenStoreError};

/// File name of the persisted session.
pub const TOKEN_FILE_NAME: &str = "clinica.token";
const STAGING_FILE_NAME: &str = ".clinica.token.tmp";
#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Token store keeping the session in `<dir>/clinica.token`.
pub struct FileTokenStore {
    dir: Dir,
    path: PathBuf,
}

impl FileTokenStore {
    /// Open (creating if needed) the directory holding the session file.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, TokenStoreError> {
        let dir = dir.as_ref();
        Dir::create_ambient_dir_all(dir, ambient_authority()).map_err(|err| io_error(dir, &err))?;
        let handle =
            Dir::open_ambient_dir(dir, ambient_authority()).map_err(|err| io_error(dir, &err))?;
        Ok(Self {
            dir: handle,
            path: dir.join(TOKEN_FILE_NAME),
        })
    }

    /// Full path of the session file, for diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_staging(&self, encoded: &[u8]) -> io::Result<()> {
        match self.dir.remove_file(STAGING_FILE_NAME) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(SESSION_FILE_MODE);
        let mut file = self.dir.open_with(STAGING_FILE_NAME, &options)?;
        file.write_all(encoded)?;
        file.sync_all()
    }
}

fn io_error(path: &Path, err: &io::Error) -> TokenStoreError {
    TokenStoreError::io(format!("{}: {err}", path.display()))
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Session>, TokenStoreError> {
        let raw = match self.dir.read(TOKEN_FILE_NAME) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&self.path, &err)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|err| TokenStoreError::corrupt(err.to_string()))
    }

    async fn save(&self, session: &Session) -> Result<(), TokenStoreError> {
        let encoded = serde_json::to_vec(session)
            .map_err(|err| TokenStoreError::io(format!("encode session: {err}")))?;
        self.write_staging(&encoded)
            .map_err(|err| io_error(&self.path, &err))?;
        self.dir
            .rename(STAGING_FILE_NAME, &self.dir, TOKEN_FILE_NAME)
            .map_err(|err| io_error(&self.path, &err))
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        match self.dir.remove_file(TOKEN_FILE_NAME) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&self.path, &err)),
        }
    }
}
