use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::corpus::split_sentences;

/// Extension of corpus files.
pub const CORPUS_EXTENSION: &str = "txt";

/// Reads a whole text file into memory.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	fs::read_to_string(filename)
}

/// Reads a corpus file and splits it into sentences on `delimiter`.
///
/// Empty sentences are dropped; see `corpus::split_sentences`.
pub fn load_sentences<P: AsRef<Path>>(filename: P, delimiter: char) -> io::Result<Vec<String>> {
	let sentences = split_sentences(&read_file(&filename)?, delimiter);
	log::info!("loaded {} sentences from {}", sentences.len(), filename.as_ref().display());
	Ok(sentences)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/news.txt"` → `"news"`
/// - `"news.txt"` → `"news"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists the corpus names (file stems) of every `extension` file in `dir`.
///
/// Subdirectories are ignored. Names are sorted.
pub fn list_corpora<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut names = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			names.push(get_filename(&path)?);
		}
	}

	names.sort();
	Ok(names)
}
