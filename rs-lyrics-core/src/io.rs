use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Reads a whole text file into memory.
pub fn read_text<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Serializes `value` with `postcard` and writes it to `path`.
pub fn write_binary<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
	let bytes = postcard::to_stdvec(value)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Reads a `postcard` file written by [`write_binary`].
pub fn read_binary<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

/// Builds the path of a file derived from `input_path`, next to it.
///
/// The extension is appended to the full file name, so a corpus directory
/// and a corpus file sharing a stem never share an output file.
///
/// Example:
/// `data/songs` + `"bin"` → `data/songs.bin`
/// `data/songs.txt` + `"bin"` → `data/songs.txt.bin`
pub fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let file_name = input_path
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output_name = file_name.to_os_string();
	output_name.push(".");
	output_name.push(output_extension);

	Ok(input_path.with_file_name(output_name))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Lists the corpora available in a data directory, sorted by name.
///
/// A corpus is either a sub-directory (one `.txt` file per song) or a
/// `.txt` file (songs separated by `---` lines). Names are returned as
/// they must be passed back to load them.
pub fn list_corpora<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
	let mut corpora = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
			continue;
		};
		if path.is_dir() || path.extension() == Some(std::ffi::OsStr::new("txt")) {
			corpora.push(name);
		}
	}

	corpora.sort();
	Ok(corpora)
}
