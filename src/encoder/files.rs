//! Sequential batch driver.
//!
//! One message-encryption call per file, strictly in order, each
//! completed (or aborted and cleaned up) before the next begins.
//! Individual failures are logged and reported through the status
//! sink; the batch continues.

use std::fs::{self, File};
use std::io::{BufRead, BufWriter};
use std::path::{Path, PathBuf};

use tracing::error;

use crate::error::EncodeError;
use crate::input::Input;
use crate::keys::{Keyring, PublicKeyEncrypt};
use crate::status::StatusEvent;

use super::Encoder;

impl<'a> Encoder<'a> {
    /// Encrypt each file to the recipient set, writing `<name>.gpg`
    /// (or `<name>.asc` with armor) next to it. With an empty list,
    /// file names are read as lines from standard input.
    ///
    /// A failed file leaves no partial output behind.
    pub fn encode_crypt_files(
        &mut self,
        files: &[PathBuf],
        recipients: &[String],
        keyring: &dyn Keyring,
        engine: &dyn PublicKeyEncrypt,
    ) {
        if files.is_empty() {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("reading file list from stdin failed: {e}");
                        return;
                    }
                };
                if line.is_empty() {
                    error!("empty file name in input list");
                    return;
                }
                self.encode_one(Path::new(&line), recipients, keyring, engine);
            }
        } else {
            for path in files {
                self.encode_one(path, recipients, keyring, engine);
            }
        }
    }

    fn encode_one(
        &mut self,
        path: &Path,
        recipients: &[String],
        keyring: &dyn Keyring,
        engine: &dyn PublicKeyEncrypt,
    ) {
        self.status
            .status(StatusEvent::FileStart(path.display().to_string()));
        if let Err(e) = self.encode_crypt_file(path, recipients, keyring, engine) {
            error!(file = %path.display(), "encryption failed: {e}");
        }
        self.status.status(StatusEvent::FileDone);
    }

    fn encode_crypt_file(
        &mut self,
        path: &Path,
        recipients: &[String],
        keyring: &dyn Keyring,
        engine: &dyn PublicKeyEncrypt,
    ) -> Result<(), EncodeError> {
        let input = Input::open(path)?;
        let out_path = output_name(path, self.opts.armor);
        let file = File::create(&out_path).map_err(|source| EncodeError::Open {
            path: out_path.display().to_string(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        match self.encode_crypt(input, &mut out, recipients, keyring, engine) {
            Ok(()) => Ok(()),
            Err(e) => {
                // cancel: drop the handle and remove the partial file
                drop(out);
                let _ = fs::remove_file(&out_path);
                Err(e)
            }
        }
    }
}

fn output_name(path: &Path, armor: bool) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(if armor { ".asc" } else { ".gpg" });
    PathBuf::from(name)
}
