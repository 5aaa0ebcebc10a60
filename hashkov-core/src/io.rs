//! File helpers shared by corpus training and persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Lines of a text file, without the blank ones.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let contents = fs::read_to_string(filename)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Same file name with another extension, e.g. `data/posts.dat` with
/// `"bin"` gives `data/posts.bin`.
pub(crate) fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();
	if input_path.file_stem().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"));
	}
	Ok(input_path.with_extension(output_extension))
}

/// Stems of the regular files of `dir` carrying `extension`, sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut stems = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
			continue;
		}
		if let Some(stem) = path.file_stem() {
			stems.push(stem.to_string_lossy().into_owned());
		}
	}
	stems.sort();
	Ok(stems)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_swaps_extension() {
		assert_eq!(build_output_path("data/posts.dat", "bin").unwrap(), PathBuf::from("data/posts.bin"));
		assert_eq!(build_output_path("posts", "bin").unwrap(), PathBuf::from("posts.bin"));
		assert!(build_output_path("", "bin").is_err());
	}

	#[test]
	fn read_and_list() {
		let dir = std::env::temp_dir().join(format!("hashkov-io-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("b.dat"), "first\r\n\n  \nsecond\n").unwrap();
		fs::write(dir.join("a.dat"), "").unwrap();
		fs::write(dir.join("a.bin"), "").unwrap();

		assert_eq!(read_file(dir.join("b.dat")).unwrap(), vec!["first", "second"]);
		assert_eq!(list_files(&dir, "dat").unwrap(), vec!["a", "b"]);

		fs::remove_dir_all(&dir).unwrap();
	}
}
